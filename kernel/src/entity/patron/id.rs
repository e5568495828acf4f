use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Fromln, AsRefln)]
pub struct PatronId(i64);

impl PatronId {
    pub fn new(id: impl Into<i64>) -> Self {
        Self(id.into())
    }
}
