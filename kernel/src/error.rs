use std::fmt::{Display, Formatter};

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EntityKind {
    Book,
    Author,
    Patron,
    BorrowingRecord,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Book => write!(f, "Book"),
            EntityKind::Author => write!(f, "Author"),
            EntityKind::Patron => write!(f, "Patron"),
            EntityKind::BorrowingRecord => write!(f, "Borrowing record"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum KernelError {
    NotFound { entity: EntityKind, id: i64 },
    Conflict { reason: &'static str },
    Unauthorized,
    Validation { field: &'static str },
    Timeout,
    Internal,
}

impl KernelError {
    pub const BOOK_ON_LOAN: Self = Self::Conflict {
        reason: "book already on loan",
    };
    pub const STILL_REFERENCED: Self = Self::Conflict {
        reason: "record is referenced by borrowing records",
    };

    pub fn not_found(entity: EntityKind, id: impl AsRef<i64>) -> Self {
        Self::NotFound {
            entity,
            id: *id.as_ref(),
        }
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound { entity, id } => write!(f, "{entity} not found with id: {id}"),
            KernelError::Conflict { reason } => write!(f, "Conflict: {reason}"),
            KernelError::Unauthorized => write!(f, "Operation not permitted"),
            KernelError::Validation { field } => write!(f, "Invalid value for field `{field}`"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
