use sqlx::PgConnection;
use time::Date;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookTitle, Isbn, NewBook, PublishedDate,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id_for_update(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con).await
    }

    async fn find_by_title_containing(
        &self,
        con: &mut PostgresConnection,
        fragment: &str,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_by_title_containing(con, fragment).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        book: &NewBook,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author: String,
    isbn: String,
    published_date: Option<Date>,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            Isbn::new(value.isbn),
            value.published_date.map(PublishedDate::new),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, isbn, published_date
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_by_id_for_update(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, isbn, published_date
            FROM books
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, isbn, published_date
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_by_title_containing(
        con: &mut PgConnection,
        fragment: &str,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, isbn, published_date
            FROM books
            WHERE strpos(title, $1) > 0
            ORDER BY id
            "#,
        )
        .bind(fragment)
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn create(con: &mut PgConnection, book: &NewBook) -> error_stack::Result<Book, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            INSERT INTO books (title, author, isbn, published_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, author, isbn, published_date
            "#,
        )
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.isbn().as_ref())
        .bind(book.published_date().map(|date| *date.as_ref()))
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Book::from(row))
    }

    async fn update(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4, published_date = $5
            WHERE id = $1
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.isbn().as_ref())
        .bind(book.published_date().map(|date| *date.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rand::distributions::{Alphanumeric, DistString};
    use time::macros::date;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{BookAuthor, BookTitle, Isbn, NewBook, PublishedDate};
    use kernel::KernelError;

    use crate::database::postgres::{PostgresBookRepository, PostgresDatabase};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let marker = Alphanumeric.sample_string(&mut rand::thread_rng(), 12);

        let book = PostgresBookRepository
            .create(
                &mut con,
                &NewBook::new(
                    BookTitle::new(format!("Dune {marker}")),
                    BookAuthor::new("Frank Herbert"),
                    Isbn::new("9780441013593"),
                    Some(PublishedDate::new(date!(1965 - 08 - 01))),
                ),
            )
            .await?;

        let found = PostgresBookRepository.find_by_id(&mut con, book.id()).await?;
        assert_eq!(found, Some(book.clone()));

        let searched = PostgresBookRepository
            .find_by_title_containing(&mut con, &marker)
            .await?;
        assert_eq!(searched, vec![book.clone()]);

        let book = book.reconstruct(|b| b.title = BookTitle::new(format!("Dune Messiah {marker}")));
        PostgresBookRepository.update(&mut con, &book).await?;
        let found = PostgresBookRepository
            .find_by_id_for_update(&mut con, book.id())
            .await?;
        assert_eq!(found, Some(book.clone()));

        PostgresBookRepository.delete(&mut con, book.id()).await?;
        let found = PostgresBookRepository.find_by_id(&mut con, book.id()).await?;
        assert!(found.is_none());

        Ok(())
    }
}
