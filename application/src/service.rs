mod author;
mod book;
mod borrowing_record;
mod patron;

pub use self::{author::*, book::*, borrowing_record::*, patron::*};
