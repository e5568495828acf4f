use error_stack::Report;
use time::Duration;

use crate::entity::{BorrowDate, DueDate};
use crate::KernelError;

pub const LOAN_PERIOD_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanPeriod(Duration);

impl LoanPeriod {
    fn days(days: i64) -> Self {
        Self(Duration::days(days))
    }

    pub fn due_date_for(&self, borrowed: &BorrowDate) -> error_stack::Result<DueDate, KernelError> {
        borrowed
            .as_ref()
            .checked_add(self.0)
            .map(DueDate::new)
            .ok_or_else(|| {
                Report::new(KernelError::Internal)
                    .attach_printable(format!("due date out of range for {:?}", borrowed))
            })
    }
}

impl Default for LoanPeriod {
    fn default() -> Self {
        Self::days(LOAN_PERIOD_DAYS)
    }
}
