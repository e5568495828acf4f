use serde::{Deserialize, Serialize};
use time::Date;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct BorrowDate(Date);

impl BorrowDate {
    pub fn new(date: impl Into<Date>) -> Self {
        Self(date.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct DueDate(Date);

impl DueDate {
    pub fn new(date: impl Into<Date>) -> Self {
        Self(date.into())
    }

    /// True when `today` is strictly after the due date.
    pub fn is_passed(&self, today: &Date) -> bool {
        self.0 < *today
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct ReturnDate(Date);

impl ReturnDate {
    pub fn new(date: impl Into<Date>) -> Self {
        Self(date.into())
    }
}
