use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Free-text author line as printed on the book, not a reference to an [`Author`](crate::entity::Author).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookAuthor(String);

impl BookAuthor {
    pub fn new(author: impl Into<String>) -> Self {
        Self(author.into())
    }
}
