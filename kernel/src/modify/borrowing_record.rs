use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BorrowingRecord, BorrowingRecordId, NewBorrowingRecord, ReturnDate};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BorrowingRecordModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        record: &NewBorrowingRecord,
    ) -> error_stack::Result<BorrowingRecord, KernelError>;

    /// Sets the return date of an active record. Returns `false` when no active
    /// record with `id` exists, leaving any existing return date unchanged.
    async fn mark_returned(
        &self,
        con: &mut Self::Transaction,
        id: &BorrowingRecordId,
        date: &ReturnDate,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnBorrowingRecordModifier:
    'static + Sync + Send + DependOnDatabaseConnection
{
    type BorrowingRecordModifier: BorrowingRecordModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn borrowing_record_modifier(&self) -> &Self::BorrowingRecordModifier;
}
