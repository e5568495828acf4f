use error_stack::Report;
use time::Date;

use kernel::interface::query::BorrowingRecordQuery;
use kernel::interface::update::BorrowingRecordModifier;
use kernel::prelude::entity::{
    BookId, BorrowingRecord, BorrowingRecordId, NewBorrowingRecord, PatronId, ReturnDate,
};
use kernel::KernelError;

use crate::database::memory::{InMemoryTransaction, Sequence};

pub struct InMemoryBorrowingRecordRepository;

impl InMemoryBorrowingRecordRepository {
    fn filtered(
        con: &InMemoryTransaction,
        predicate: impl Fn(&BorrowingRecord) -> bool,
    ) -> Vec<BorrowingRecord> {
        con.records
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl BorrowingRecordQuery for InMemoryBorrowingRecordRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BorrowingRecordId,
    ) -> error_stack::Result<Option<BorrowingRecord>, KernelError> {
        Ok(con.records.get(id).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        Ok(con.records.values().cloned().collect())
    }

    async fn find_by_book_id(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        Ok(Self::filtered(con, |record| record.book_id() == book_id))
    }

    async fn find_by_patron_id(
        &self,
        con: &mut InMemoryTransaction,
        patron_id: &PatronId,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        Ok(Self::filtered(con, |record| record.patron_id() == patron_id))
    }

    async fn find_active_by_book_id(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Option<BorrowingRecord>, KernelError> {
        Ok(con
            .records
            .values()
            .find(|record| record.book_id() == book_id && record.is_active())
            .cloned())
    }

    async fn find_overdue(
        &self,
        con: &mut InMemoryTransaction,
        today: &Date,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        let mut overdue = Self::filtered(con, |record| record.is_overdue(today));
        overdue.sort_by_key(|record| (*record.due_date().as_ref(), *record.id()));
        Ok(overdue)
    }
}

#[async_trait::async_trait]
impl BorrowingRecordModifier for InMemoryBorrowingRecordRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        record: &NewBorrowingRecord,
    ) -> error_stack::Result<BorrowingRecord, KernelError> {
        let on_loan = con
            .records
            .values()
            .any(|active| active.book_id() == record.book_id() && active.is_active());
        if on_loan {
            return Err(Report::new(KernelError::BOOK_ON_LOAN).attach_printable(format!(
                "book {} already has an active record",
                record.book_id().as_ref()
            )));
        }
        let id = BorrowingRecordId::new(Sequence::next(&mut con.sequence.record));
        let record = record.clone().into_record(id);
        con.records.insert(id, record.clone());
        Ok(record)
    }

    async fn mark_returned(
        &self,
        con: &mut InMemoryTransaction,
        id: &BorrowingRecordId,
        date: &ReturnDate,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(con
            .records
            .get_mut(id)
            .map(|record| record.mark_returned(*date))
            .unwrap_or(false))
    }
}
