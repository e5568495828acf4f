use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{
    Author, AuthorId, Book, BookId, BorrowingRecord, BorrowingRecordId, Patron, PatronId,
};
use kernel::KernelError;

pub use self::{author::*, book::*, borrowing_record::*, patron::*};

mod author;
mod book;
mod borrowing_record;
mod patron;

/// Process local storage backend.
///
/// A transaction owns the whole store until it ends, so transactions never
/// interleave. Each one works on a full copy of the store, read-only ones
/// included, which keeps it suited to tests and small demos only.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    store: Arc<Mutex<Store>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = Arc::clone(&self.store).lock_owned().await;
        let working = guard.clone();
        Ok(InMemoryTransaction { guard, working })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    books: BTreeMap<BookId, Book>,
    patrons: BTreeMap<PatronId, Patron>,
    authors: BTreeMap<AuthorId, Author>,
    records: BTreeMap<BorrowingRecordId, BorrowingRecord>,
    sequence: Sequence,
}

#[derive(Debug, Clone, Default)]
struct Sequence {
    book: i64,
    patron: i64,
    author: i64,
    record: i64,
}

impl Sequence {
    fn next(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Store>,
    working: Store,
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let Self { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl Deref for InMemoryTransaction {
    type Target = Store;
    fn deref(&self) -> &Self::Target {
        &self.working
    }
}

impl DerefMut for InMemoryTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.working
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{BookAuthor, BookTitle, Isbn, NewBook};
    use kernel::KernelError;

    use crate::database::memory::{InMemoryBookRepository, InMemoryDatabase};

    fn dune() -> NewBook {
        NewBook::new(
            BookTitle::new("Dune"),
            BookAuthor::new("Frank Herbert"),
            Isbn::new("9780441013593"),
            None,
        )
    }

    #[tokio::test]
    async fn committed_changes_are_visible() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;
        let book = InMemoryBookRepository.create(&mut con, &dune()).await?;
        con.commit().await?;

        let mut con = db.transact().await?;
        let found = InMemoryBookRepository.find_by_id(&mut con, book.id()).await?;
        assert_eq!(found, Some(book));
        Ok(())
    }

    #[tokio::test]
    async fn dropped_transaction_discards_changes() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        {
            let mut con = db.transact().await?;
            InMemoryBookRepository.create(&mut con, &dune()).await?;
        }
        let mut con = db.transact().await?;
        assert!(InMemoryBookRepository.find_all(&mut con).await?.is_empty());
        con.roll_back().await?;
        Ok(())
    }

    #[tokio::test]
    async fn transactions_do_not_interleave() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let con = db.transact().await?;

        let waiting = tokio::spawn({
            let db = db.clone();
            async move { db.transact().await.map(|_| ()) }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        con.commit().await?;
        waiting.await.expect("task panicked")?;
        Ok(())
    }
}
