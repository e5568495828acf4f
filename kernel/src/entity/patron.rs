mod contact_info;
mod id;
mod name;

pub use self::{contact_info::*, id::*, name::*};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Patron {
    id: PatronId,
    name: PatronName,
    contact_info: ContactInfo,
}

impl Patron {
    pub fn new(id: PatronId, name: PatronName, contact_info: ContactInfo) -> Self {
        Self {
            id,
            name,
            contact_info,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct NewPatron {
    name: PatronName,
    contact_info: ContactInfo,
}

impl NewPatron {
    pub fn new(name: PatronName, contact_info: ContactInfo) -> Self {
        Self { name, contact_info }
    }

    pub fn into_patron(self, id: PatronId) -> Patron {
        Patron::new(id, self.name, self.contact_info)
    }
}
