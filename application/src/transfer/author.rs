use time::Date;

use kernel::prelude::entity::{Author, DestructAuthor};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AuthorDto {
    pub id: i64,
    pub name: String,
    pub date_of_birth: Option<Date>,
}

impl From<Author> for AuthorDto {
    fn from(value: Author) -> Self {
        let DestructAuthor {
            id,
            name,
            date_of_birth,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            date_of_birth: date_of_birth.map(Date::from),
        }
    }
}

pub struct GetAuthorDto {
    pub id: i64,
}

pub struct SearchAuthorDto {
    pub name: String,
}

pub struct CreateAuthorDto {
    pub name: String,
    pub date_of_birth: Option<Date>,
}

pub struct UpdateAuthorDto {
    pub id: i64,
    pub name: String,
    pub date_of_birth: Option<Date>,
}

pub struct DeleteAuthorDto {
    pub id: i64,
}
