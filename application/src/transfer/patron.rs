use kernel::prelude::entity::{DestructPatron, Patron};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PatronDto {
    pub id: i64,
    pub name: String,
    pub contact_info: String,
}

impl From<Patron> for PatronDto {
    fn from(value: Patron) -> Self {
        let DestructPatron {
            id,
            name,
            contact_info,
        } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            contact_info: contact_info.into(),
        }
    }
}

pub struct GetPatronDto {
    pub id: i64,
}

pub struct SearchPatronDto {
    pub name: String,
}

pub struct CreatePatronDto {
    pub name: String,
    pub contact_info: String,
}

pub struct UpdatePatronDto {
    pub id: i64,
    pub name: String,
    pub contact_info: String,
}

pub struct DeletePatronDto {
    pub id: i64,
}
