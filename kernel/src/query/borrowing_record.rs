use time::Date;

use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, BorrowingRecord, BorrowingRecordId, PatronId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BorrowingRecordQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BorrowingRecordId,
    ) -> error_stack::Result<Option<BorrowingRecord>, KernelError>;

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError>;

    async fn find_by_book_id(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError>;

    async fn find_by_patron_id(
        &self,
        con: &mut Self::Transaction,
        patron_id: &PatronId,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError>;

    /// The record without a return date for `book_id`, if the book is on loan.
    async fn find_active_by_book_id(
        &self,
        con: &mut Self::Transaction,
        book_id: &BookId,
    ) -> error_stack::Result<Option<BorrowingRecord>, KernelError>;

    /// Active records whose due date is strictly before `today`.
    async fn find_overdue(
        &self,
        con: &mut Self::Transaction,
        today: &Date,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError>;
}

pub trait DependOnBorrowingRecordQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BorrowingRecordQuery: BorrowingRecordQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn borrowing_record_query(&self) -> &Self::BorrowingRecordQuery;
}
