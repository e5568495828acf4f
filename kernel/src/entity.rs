mod author;
mod book;
mod borrowing_record;
mod common;
mod patron;

pub use self::{author::*, book::*, borrowing_record::*, common::*, patron::*};
