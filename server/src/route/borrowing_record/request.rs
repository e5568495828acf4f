use application::transfer::{
    BorrowBookDto, GetBorrowingRecordDto, GetRecordsFromBookIdDto, GetRecordsFromPatronIdDto,
    ReturnBookDto,
};
use serde::Deserialize;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    book_id: i64,
    patron_id: i64,
}

#[derive(Debug)]
pub struct GetRequest {
    id: i64,
}

impl GetRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct ReturnRequest {
    id: i64,
}

impl ReturnRequest {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct BookRecordsRequest {
    book_id: i64,
}

impl BookRecordsRequest {
    pub fn new(book_id: i64) -> Self {
        Self { book_id }
    }
}

#[derive(Debug)]
pub struct PatronRecordsRequest {
    patron_id: i64,
}

impl PatronRecordsRequest {
    pub fn new(patron_id: i64) -> Self {
        Self { patron_id }
    }
}

pub struct Transformer;

impl Intake<BorrowRequest> for Transformer {
    type To = BorrowBookDto;
    fn emit(&self, input: BorrowRequest) -> Self::To {
        BorrowBookDto {
            book_id: input.book_id,
            patron_id: input.patron_id,
        }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetBorrowingRecordDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetBorrowingRecordDto { id: input.id }
    }
}

impl Intake<ReturnRequest> for Transformer {
    type To = ReturnBookDto;
    fn emit(&self, input: ReturnRequest) -> Self::To {
        ReturnBookDto { id: input.id }
    }
}

impl Intake<BookRecordsRequest> for Transformer {
    type To = GetRecordsFromBookIdDto;
    fn emit(&self, input: BookRecordsRequest) -> Self::To {
        GetRecordsFromBookIdDto {
            book_id: input.book_id,
        }
    }
}

impl Intake<PatronRecordsRequest> for Transformer {
    type To = GetRecordsFromPatronIdDto;
    fn emit(&self, input: PatronRecordsRequest) -> Self::To {
        GetRecordsFromPatronIdDto {
            patron_id: input.patron_id,
        }
    }
}
