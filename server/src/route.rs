mod author;
mod book;
mod borrowing_record;
mod patron;

pub use self::{
    author::AuthorRouter, book::BookRouter, borrowing_record::BorrowingRecordRouter,
    patron::PatronRouter,
};
