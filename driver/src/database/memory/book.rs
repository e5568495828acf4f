use error_stack::Report;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookId, NewBook};
use kernel::KernelError;

use crate::database::memory::{InMemoryTransaction, Sequence};

pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.books.get(id).cloned())
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        // the transaction already holds the whole store
        self.find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        Ok(con.books.values().cloned().collect())
    }

    async fn find_by_title_containing(
        &self,
        con: &mut InMemoryTransaction,
        fragment: &str,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        Ok(con
            .books
            .values()
            .filter(|book| book.title().as_ref().contains(fragment))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &NewBook,
    ) -> error_stack::Result<Book, KernelError> {
        let id = BookId::new(Sequence::next(&mut con.sequence.book));
        let book = book.clone().into_book(id);
        con.books.insert(id, book.clone());
        Ok(book)
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        if let Some(stored) = con.books.get_mut(book.id()) {
            *stored = book.clone();
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        if con.records.values().any(|record| record.book_id() == book_id) {
            return Err(Report::new(KernelError::STILL_REFERENCED)
                .attach_printable(format!("book {} has borrowing records", book_id.as_ref())));
        }
        con.books.remove(book_id);
        Ok(())
    }
}
