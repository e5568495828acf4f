use error_stack::Report;

use kernel::interface::access::{AccessGate, DependOnAccessGate, Identity, Operation};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, BorrowingRecordQuery, DependOnBookQuery, DependOnBorrowingRecordQuery,
};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    require_positive, require_text, BookAuthor, BookId, BookTitle, Isbn, NewBook, PublishedDate,
};
use kernel::{EntityKind, KernelError};

use crate::transfer::{
    BookDto, CreateBookDto, DeleteBookDto, GetBookDto, SearchBookDto, UpdateBookDto,
};

#[async_trait::async_trait]
pub trait GetBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookQuery + DependOnAccessGate
{
    async fn get_book(
        &self,
        identity: &Identity,
        dto: GetBookDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadCatalog)?;
        let id = BookId::new(require_positive("id", dto.id)?);

        let mut connection = self.database_connection().transact().await?;
        let book = self
            .book_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Book, id)))?;
        Ok(BookDto::from(book))
    }

    async fn get_all_books(
        &self,
        identity: &Identity,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadCatalog)?;

        let mut connection = self.database_connection().transact().await?;
        let books = self.book_query().find_all(&mut connection).await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    async fn search_books(
        &self,
        identity: &Identity,
        dto: SearchBookDto,
    ) -> error_stack::Result<Vec<BookDto>, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadCatalog)?;

        let mut connection = self.database_connection().transact().await?;
        let books = self
            .book_query()
            .find_by_title_containing(&mut connection, &dto.title)
            .await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> GetBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait CreateBookService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnBookModifier + DependOnAccessGate
{
    async fn create_book(
        &self,
        identity: &Identity,
        dto: CreateBookDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ManageCatalog)?;
        let book = NewBook::new(
            BookTitle::new(require_text("title", dto.title)?),
            BookAuthor::new(dto.author),
            Isbn::new(dto.isbn),
            dto.published_date.map(PublishedDate::new),
        );

        let mut connection = self.database_connection().transact().await?;
        let book = self.book_modifier().create(&mut connection, &book).await?;
        connection.commit().await?;

        tracing::debug!("created book {}", book.id().as_ref());
        Ok(BookDto::from(book))
    }
}

impl<T> CreateBookService for T where
    T: DependOnDatabaseConnection + DependOnBookModifier + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnAccessGate
{
    async fn update_book(
        &self,
        identity: &Identity,
        dto: UpdateBookDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ManageCatalog)?;
        let id = BookId::new(require_positive("id", dto.id)?);
        let title = BookTitle::new(require_text("title", dto.title)?);

        let mut connection = self.database_connection().transact().await?;
        let mut book = self
            .book_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Book, id)))?;

        book.substitute(|book| {
            *book.title = title;
            *book.author = BookAuthor::new(dto.author);
            *book.isbn = Isbn::new(dto.isbn);
            *book.published_date = dto.published_date.map(PublishedDate::new);
        });
        self.book_modifier().update(&mut connection, &book).await?;
        connection.commit().await?;

        Ok(BookDto::from(book))
    }
}

impl<T> UpdateBookService for T where
    T: DependOnDatabaseConnection + DependOnBookQuery + DependOnBookModifier + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait DeleteBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnBookModifier
    + DependOnBorrowingRecordQuery
    + DependOnAccessGate
{
    /// Books that appear in the lending history cannot be deleted.
    async fn delete_book(
        &self,
        identity: &Identity,
        dto: DeleteBookDto,
    ) -> error_stack::Result<(), KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ManageCatalog)?;
        let id = BookId::new(require_positive("id", dto.id)?);

        let mut connection = self.database_connection().transact().await?;
        self.book_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Book, id)))?;

        let history = self
            .borrowing_record_query()
            .find_by_book_id(&mut connection, &id)
            .await?;
        if !history.is_empty() {
            return Err(Report::new(KernelError::STILL_REFERENCED).attach_printable(format!(
                "book {} appears in {} borrowing records",
                id.as_ref(),
                history.len()
            )));
        }

        self.book_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;
        tracing::debug!("deleted book {}", id.as_ref());
        Ok(())
    }
}

impl<T> DeleteBookService for T where
    T: DependOnDatabaseConnection
        + DependOnBookQuery
        + DependOnBookModifier
        + DependOnBorrowingRecordQuery
        + DependOnAccessGate
{
}

#[cfg(test)]
mod test {
    use time::macros::date;

    use kernel::{EntityKind, KernelError};

    use crate::service::{
        BorrowBookService, CreateBookService, DeleteBookService, GetBookService, UpdateBookService,
    };
    use crate::test::{librarian, patron, TestModule};
    use crate::transfer::{
        BorrowBookDto, CreateBookDto, DeleteBookDto, GetBookDto, SearchBookDto, UpdateBookDto,
    };

    fn create(title: &str) -> CreateBookDto {
        CreateBookDto {
            title: title.to_string(),
            author: "Frank Herbert".to_string(),
            isbn: "9780441013593".to_string(),
            published_date: Some(date!(1965 - 08 - 01)),
        }
    }

    #[tokio::test]
    async fn catalog_lifecycle() -> error_stack::Result<(), KernelError> {
        let module = TestModule::starting_on(date!(2024 - 03 - 01));
        let dune = module.create_book(&librarian(), create("Dune")).await?;
        module
            .create_book(&librarian(), create("Children of Dune"))
            .await?;
        module.create_book(&librarian(), create("Emma")).await?;

        let found = module
            .search_books(
                &patron(),
                SearchBookDto {
                    title: "Dune".to_string(),
                },
            )
            .await?;
        assert_eq!(found.len(), 2);

        let updated = module
            .update_book(
                &librarian(),
                UpdateBookDto {
                    id: dune.id,
                    title: "Dune Messiah".to_string(),
                    author: dune.author.clone(),
                    isbn: "9780593098233".to_string(),
                    published_date: None,
                },
            )
            .await?;
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(
            module
                .get_book(&patron(), GetBookDto { id: dune.id })
                .await?,
            updated
        );

        module
            .delete_book(&librarian(), DeleteBookDto { id: dune.id })
            .await?;
        let err = module
            .get_book(&patron(), GetBookDto { id: dune.id })
            .await
            .unwrap_err();
        assert_eq!(
            err.current_context(),
            &KernelError::NotFound {
                entity: EntityKind::Book,
                id: dune.id
            }
        );
        assert_eq!(module.get_all_books(&patron()).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn lent_book_cannot_be_deleted() -> error_stack::Result<(), KernelError> {
        let module = TestModule::starting_on(date!(2024 - 03 - 01));
        let book = module.book("Dune").await;
        let reader = module.patron("Ada").await;
        module
            .borrow_book(
                &librarian(),
                BorrowBookDto {
                    book_id: book.id,
                    patron_id: reader.id,
                },
            )
            .await?;

        let err = module
            .delete_book(&librarian(), DeleteBookDto { id: book.id })
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &KernelError::STILL_REFERENCED);
        assert!(module
            .get_book(&patron(), GetBookDto { id: book.id })
            .await
            .is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn writes_are_checked() {
        let module = TestModule::starting_on(date!(2024 - 03 - 01));

        let err = module
            .create_book(&patron(), create("Dune"))
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &KernelError::Unauthorized);

        let err = module
            .create_book(&librarian(), create("  "))
            .await
            .unwrap_err();
        assert_eq!(
            err.current_context(),
            &KernelError::Validation { field: "title" }
        );

        let err = module
            .update_book(
                &librarian(),
                UpdateBookDto {
                    id: 12,
                    title: "Dune".to_string(),
                    author: String::new(),
                    isbn: String::new(),
                    published_date: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.current_context(),
            &KernelError::NotFound {
                entity: EntityKind::Book,
                id: 12
            }
        );
    }
}
