use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct ContactInfo(String);

impl ContactInfo {
    pub fn new(contact: impl Into<String>) -> Self {
        Self(contact.into())
    }
}
