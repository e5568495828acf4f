use error_stack::Report;

use kernel::interface::access::{AccessGate, DependOnAccessGate, Identity, Operation};
use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, BorrowingRecordQuery, DependOnBookQuery, DependOnBorrowingRecordQuery,
    DependOnPatronQuery, PatronQuery,
};
use kernel::interface::update::{BorrowingRecordModifier, DependOnBorrowingRecordModifier};
use kernel::prelude::entity::{
    require_positive, BookId, BorrowingRecordId, LoanPeriod, NewBorrowingRecord, PatronId,
    ReturnDate,
};
use kernel::{EntityKind, KernelError};

use crate::transfer::{
    BorrowBookDto, BorrowingRecordDto, GetBorrowingRecordDto, GetRecordsFromBookIdDto,
    GetRecordsFromPatronIdDto, ReturnBookDto,
};

#[async_trait::async_trait]
pub trait GetBorrowingRecordService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBorrowingRecordQuery
    + DependOnAccessGate
{
    async fn get_borrowing_record(
        &self,
        identity: &Identity,
        dto: GetBorrowingRecordDto,
    ) -> error_stack::Result<BorrowingRecordDto, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadLoans)?;
        let id = BorrowingRecordId::new(require_positive("id", dto.id)?);

        let mut connection = self.database_connection().transact().await?;
        let record = self
            .borrowing_record_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::not_found(EntityKind::BorrowingRecord, id))
            })?;
        Ok(BorrowingRecordDto::from(record))
    }

    async fn get_all_borrowing_records(
        &self,
        identity: &Identity,
    ) -> error_stack::Result<Vec<BorrowingRecordDto>, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadLoans)?;

        let mut connection = self.database_connection().transact().await?;
        let records = self
            .borrowing_record_query()
            .find_all(&mut connection)
            .await?;
        Ok(records.into_iter().map(BorrowingRecordDto::from).collect())
    }

    async fn get_records_from_book(
        &self,
        identity: &Identity,
        dto: GetRecordsFromBookIdDto,
    ) -> error_stack::Result<Vec<BorrowingRecordDto>, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadLoans)?;
        let book_id = BookId::new(require_positive("bookId", dto.book_id)?);

        let mut connection = self.database_connection().transact().await?;
        let records = self
            .borrowing_record_query()
            .find_by_book_id(&mut connection, &book_id)
            .await?;
        Ok(records.into_iter().map(BorrowingRecordDto::from).collect())
    }

    async fn get_records_from_patron(
        &self,
        identity: &Identity,
        dto: GetRecordsFromPatronIdDto,
    ) -> error_stack::Result<Vec<BorrowingRecordDto>, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadLoans)?;
        let patron_id = PatronId::new(require_positive("patronId", dto.patron_id)?);

        let mut connection = self.database_connection().transact().await?;
        let records = self
            .borrowing_record_query()
            .find_by_patron_id(&mut connection, &patron_id)
            .await?;
        Ok(records.into_iter().map(BorrowingRecordDto::from).collect())
    }
}

impl<T> GetBorrowingRecordService for T where
    T: DependOnDatabaseConnection + DependOnBorrowingRecordQuery + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait GetOverdueService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBorrowingRecordQuery
    + DependOnClock
    + DependOnAccessGate
{
    /// Active loans whose due date has passed, judged against the clock at the
    /// moment of the call.
    async fn get_overdue_records(
        &self,
        identity: &Identity,
    ) -> error_stack::Result<Vec<BorrowingRecordDto>, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ListOverdue)?;
        let today = self.clock().today();

        let mut connection = self.database_connection().transact().await?;
        let records = self
            .borrowing_record_query()
            .find_overdue(&mut connection, &today)
            .await?;
        Ok(records.into_iter().map(BorrowingRecordDto::from).collect())
    }
}

impl<T> GetOverdueService for T where
    T: DependOnDatabaseConnection + DependOnBorrowingRecordQuery + DependOnClock + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait BorrowBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBookQuery
    + DependOnPatronQuery
    + DependOnBorrowingRecordQuery
    + DependOnBorrowingRecordModifier
    + DependOnClock
    + DependOnAccessGate
{
    async fn borrow_book(
        &self,
        identity: &Identity,
        dto: BorrowBookDto,
    ) -> error_stack::Result<BorrowingRecordDto, KernelError> {
        self.access_gate().authorize(identity, Operation::Borrow)?;
        let book_id = BookId::new(require_positive("bookId", dto.book_id)?);
        let patron_id = PatronId::new(require_positive("patronId", dto.patron_id)?);

        let mut connection = self.database_connection().transact().await?;

        // Holding the book serializes concurrent borrows of it.
        self.book_query()
            .find_by_id_for_update(&mut connection, &book_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Book, book_id)))?;
        self.patron_query()
            .find_by_id(&mut connection, &patron_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Patron, patron_id)))?;

        if let Some(active) = self
            .borrowing_record_query()
            .find_active_by_book_id(&mut connection, &book_id)
            .await?
        {
            tracing::debug!(
                "book {} is on loan by record {}",
                book_id.as_ref(),
                active.id().as_ref()
            );
            return Err(Report::new(KernelError::BOOK_ON_LOAN).attach_printable(format!(
                "book {} is held by record {}",
                book_id.as_ref(),
                active.id().as_ref()
            )));
        }

        let record = NewBorrowingRecord::open(
            book_id,
            patron_id,
            self.clock().today(),
            &LoanPeriod::default(),
        )?;
        let record = self
            .borrowing_record_modifier()
            .create(&mut connection, &record)
            .await?;
        connection.commit().await?;

        tracing::info!(
            "book {} borrowed by patron {} as record {}, due {}",
            book_id.as_ref(),
            patron_id.as_ref(),
            record.id().as_ref(),
            record.due_date().as_ref()
        );
        Ok(BorrowingRecordDto::from(record))
    }
}

impl<T> BorrowBookService for T where
    T: DependOnDatabaseConnection
        + DependOnBookQuery
        + DependOnPatronQuery
        + DependOnBorrowingRecordQuery
        + DependOnBorrowingRecordModifier
        + DependOnClock
        + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait ReturnBookService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnBorrowingRecordQuery
    + DependOnBorrowingRecordModifier
    + DependOnClock
    + DependOnAccessGate
{
    /// Closes the loan with today's date. A record that was already returned is
    /// handed back unchanged.
    async fn return_book(
        &self,
        identity: &Identity,
        dto: ReturnBookDto,
    ) -> error_stack::Result<BorrowingRecordDto, KernelError> {
        self.access_gate().authorize(identity, Operation::Return)?;
        let id = BorrowingRecordId::new(require_positive("id", dto.id)?);

        let mut connection = self.database_connection().transact().await?;
        let mut record = self
            .borrowing_record_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::not_found(EntityKind::BorrowingRecord, id))
            })?;

        if !record.is_active() {
            tracing::debug!("record {} was already returned", id.as_ref());
            return Ok(BorrowingRecordDto::from(record));
        }

        let date = ReturnDate::new(self.clock().today());
        let updated = self
            .borrowing_record_modifier()
            .mark_returned(&mut connection, &id, &date)
            .await?;
        if !updated {
            // Returned by someone else between the read and the write.
            let current = self
                .borrowing_record_query()
                .find_by_id(&mut connection, &id)
                .await?
                .ok_or_else(|| {
                    Report::new(KernelError::not_found(EntityKind::BorrowingRecord, id))
                })?;
            return Ok(BorrowingRecordDto::from(current));
        }
        record.mark_returned(date);
        connection.commit().await?;

        tracing::info!(
            "record {} returned on {} (book {}, patron {})",
            id.as_ref(),
            date.as_ref(),
            record.book_id().as_ref(),
            record.patron_id().as_ref()
        );
        Ok(BorrowingRecordDto::from(record))
    }
}

impl<T> ReturnBookService for T where
    T: DependOnDatabaseConnection
        + DependOnBorrowingRecordQuery
        + DependOnBorrowingRecordModifier
        + DependOnClock
        + DependOnAccessGate
{
}
