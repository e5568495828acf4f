mod date_of_birth;
mod id;
mod name;

pub use self::{date_of_birth::*, id::*, name::*};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Author {
    id: AuthorId,
    name: AuthorName,
    date_of_birth: Option<DateOfBirth>,
}

impl Author {
    pub fn new(id: AuthorId, name: AuthorName, date_of_birth: Option<DateOfBirth>) -> Self {
        Self {
            id,
            name,
            date_of_birth,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct NewAuthor {
    name: AuthorName,
    date_of_birth: Option<DateOfBirth>,
}

impl NewAuthor {
    pub fn new(name: AuthorName, date_of_birth: Option<DateOfBirth>) -> Self {
        Self {
            name,
            date_of_birth,
        }
    }

    pub fn into_author(self, id: AuthorId) -> Author {
        Author::new(id, self.name, self.date_of_birth)
    }
}
