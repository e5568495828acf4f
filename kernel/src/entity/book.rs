mod author;
mod id;
mod isbn;
mod published_date;
mod title;

pub use self::{author::*, id::*, isbn::*, published_date::*, title::*};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    isbn: Isbn,
    published_date: Option<PublishedDate>,
}

impl Book {
    pub fn new(
        id: BookId,
        title: BookTitle,
        author: BookAuthor,
        isbn: Isbn,
        published_date: Option<PublishedDate>,
    ) -> Self {
        Self {
            id,
            title,
            author,
            isbn,
            published_date,
        }
    }
}

/// A book that has not been stored yet; the store assigns its id.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct NewBook {
    title: BookTitle,
    author: BookAuthor,
    isbn: Isbn,
    published_date: Option<PublishedDate>,
}

impl NewBook {
    pub fn new(
        title: BookTitle,
        author: BookAuthor,
        isbn: Isbn,
        published_date: Option<PublishedDate>,
    ) -> Self {
        Self {
            title,
            author,
            isbn,
            published_date,
        }
    }

    pub fn into_book(self, id: BookId) -> Book {
        Book::new(id, self.title, self.author, self.isbn, self.published_date)
    }
}
