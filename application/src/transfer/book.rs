use time::Date;

use kernel::prelude::entity::{Book, DestructBook};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: Option<Date>,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            author,
            isbn,
            published_date,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            published_date: published_date.map(Date::from),
        }
    }
}

pub struct GetBookDto {
    pub id: i64,
}

pub struct SearchBookDto {
    pub title: String,
}

pub struct CreateBookDto {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: Option<Date>,
}

pub struct UpdateBookDto {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_date: Option<Date>,
}

pub struct DeleteBookDto {
    pub id: i64,
}
