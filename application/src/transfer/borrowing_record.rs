use time::Date;

use kernel::prelude::entity::{BorrowingRecord, DestructBorrowingRecord};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BorrowingRecordDto {
    pub id: i64,
    pub book_id: i64,
    pub patron_id: i64,
    pub borrow_date: Date,
    pub due_date: Date,
    pub return_date: Option<Date>,
}

impl From<BorrowingRecord> for BorrowingRecordDto {
    fn from(value: BorrowingRecord) -> Self {
        let DestructBorrowingRecord {
            id,
            book_id,
            patron_id,
            borrow_date,
            due_date,
            return_date,
        } = value.into_destruct();
        Self {
            id: id.into(),
            book_id: book_id.into(),
            patron_id: patron_id.into(),
            borrow_date: borrow_date.into(),
            due_date: due_date.into(),
            return_date: return_date.map(Date::from),
        }
    }
}

pub struct GetBorrowingRecordDto {
    pub id: i64,
}

pub struct GetRecordsFromBookIdDto {
    pub book_id: i64,
}

pub struct GetRecordsFromPatronIdDto {
    pub patron_id: i64,
}

pub struct BorrowBookDto {
    pub book_id: i64,
    pub patron_id: i64,
}

pub struct ReturnBookDto {
    pub id: i64,
}
