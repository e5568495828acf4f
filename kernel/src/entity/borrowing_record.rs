mod dates;
mod id;
mod loan_period;

pub use self::{dates::*, id::*, loan_period::*};
use destructure::{Destructure, Mutation};
use time::Date;
use vodca::References;

use crate::entity::{BookId, PatronId};

/// One loan of a book to a patron.
///
/// A record is *active* while it has no return date. The return date is set at
/// most once and never changes afterwards.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct BorrowingRecord {
    id: BorrowingRecordId,
    book_id: BookId,
    patron_id: PatronId,
    borrow_date: BorrowDate,
    due_date: DueDate,
    return_date: Option<ReturnDate>,
}

impl BorrowingRecord {
    pub fn new(
        id: BorrowingRecordId,
        book_id: BookId,
        patron_id: PatronId,
        borrow_date: BorrowDate,
        due_date: DueDate,
        return_date: Option<ReturnDate>,
    ) -> Self {
        Self {
            id,
            book_id,
            patron_id,
            borrow_date,
            due_date,
            return_date,
        }
    }

    pub fn is_active(&self) -> bool {
        self.return_date.is_none()
    }

    pub fn is_overdue(&self, today: &Date) -> bool {
        self.is_active() && self.due_date.is_passed(today)
    }

    /// Records the return. Returns `false` and leaves the record untouched when
    /// it was already returned.
    pub fn mark_returned(&mut self, date: ReturnDate) -> bool {
        if !self.is_active() {
            return false;
        }
        self.substitute(|record| *record.return_date = Some(date));
        true
    }
}

/// A loan about to be opened; the store assigns its id.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct NewBorrowingRecord {
    book_id: BookId,
    patron_id: PatronId,
    borrow_date: BorrowDate,
    due_date: DueDate,
}

impl NewBorrowingRecord {
    /// Opens a loan starting `today`, due one [`LoanPeriod`] later.
    pub fn open(
        book_id: BookId,
        patron_id: PatronId,
        today: Date,
        period: &LoanPeriod,
    ) -> error_stack::Result<Self, crate::KernelError> {
        let borrow_date = BorrowDate::new(today);
        let due_date = period.due_date_for(&borrow_date)?;
        Ok(Self {
            book_id,
            patron_id,
            borrow_date,
            due_date,
        })
    }

    pub fn into_record(self, id: BorrowingRecordId) -> BorrowingRecord {
        BorrowingRecord::new(
            id,
            self.book_id,
            self.patron_id,
            self.borrow_date,
            self.due_date,
            None,
        )
    }
}

#[cfg(test)]
mod test {
    use time::macros::date;

    use super::{BorrowingRecordId, LoanPeriod, NewBorrowingRecord, ReturnDate};
    use crate::entity::{BookId, DueDate, PatronId};

    fn opened_on(today: time::Date) -> super::BorrowingRecord {
        NewBorrowingRecord::open(BookId::new(1), PatronId::new(1), today, &LoanPeriod::default())
            .unwrap()
            .into_record(BorrowingRecordId::new(1))
    }

    #[test]
    fn overdue_only_after_due_date() {
        let record = opened_on(date!(2024 - 01 - 01));
        assert_eq!(record.due_date(), &DueDate::new(date!(2024 - 01 - 15)));
        assert!(!record.is_overdue(&date!(2024 - 01 - 15)));
        assert!(record.is_overdue(&date!(2024 - 01 - 16)));
    }

    #[test]
    fn return_is_recorded_once() {
        let mut record = opened_on(date!(2024 - 01 - 01));
        assert!(record.mark_returned(ReturnDate::new(date!(2024 - 01 - 21))));
        assert!(!record.mark_returned(ReturnDate::new(date!(2024 - 01 - 30))));
        assert_eq!(
            record.return_date(),
            &Some(ReturnDate::new(date!(2024 - 01 - 21)))
        );
        assert!(!record.is_overdue(&date!(2024 - 02 - 01)));
    }
}
