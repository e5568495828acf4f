use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Librarian,
    Patron,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Librarian => write!(f, "LIBRARIAN"),
            Role::Patron => write!(f, "PATRON"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Accepts `admin`, `ADMIN` and the `ROLE_ADMIN` authority spelling alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();
        let name = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        match name {
            "ADMIN" => Ok(Role::Admin),
            "LIBRARIAN" => Ok(Role::Librarian),
            "PATRON" => Ok(Role::Patron),
            _ => Err(UnknownRole(trimmed.to_string())),
        }
    }
}

/// The verified role set of a caller. Credentials never reach this crate.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Identity {
    roles: HashSet<Role>,
}

impl Identity {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Operation {
    ReadLoans,
    Borrow,
    Return,
    ListOverdue,
    ReadCatalog,
    ManageCatalog,
}

const EVERY_ROLE: &[Role] = &[Role::Patron, Role::Librarian, Role::Admin];
const STAFF: &[Role] = &[Role::Librarian, Role::Admin];

impl Operation {
    pub fn permitted_roles(&self) -> &'static [Role] {
        match self {
            Operation::ReadLoans | Operation::ReadCatalog => EVERY_ROLE,
            Operation::Borrow
            | Operation::Return
            | Operation::ListOverdue
            | Operation::ManageCatalog => STAFF,
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::ReadLoans => write!(f, "read borrowing records"),
            Operation::Borrow => write!(f, "borrow a book"),
            Operation::Return => write!(f, "return a book"),
            Operation::ListOverdue => write!(f, "list overdue loans"),
            Operation::ReadCatalog => write!(f, "read the catalog"),
            Operation::ManageCatalog => write!(f, "modify the catalog"),
        }
    }
}

pub trait AccessGate: 'static + Sync + Send {
    fn authorize(
        &self,
        identity: &Identity,
        operation: Operation,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnAccessGate: 'static + Sync + Send {
    type AccessGate: AccessGate;
    fn access_gate(&self) -> &Self::AccessGate;
}

/// Grants an operation when the caller holds any of its permitted roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleAccessGate;

impl AccessGate for RoleAccessGate {
    fn authorize(
        &self,
        identity: &Identity,
        operation: Operation,
    ) -> error_stack::Result<(), KernelError> {
        let permitted = operation.permitted_roles();
        if identity.has_any(permitted) {
            return Ok(());
        }
        let required = permitted
            .iter()
            .map(Role::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Err(Report::new(KernelError::Unauthorized)
            .attach_printable(format!("{operation} requires one of [{required}]")))
    }
}

#[cfg(test)]
mod test {
    use super::{AccessGate, Identity, Operation, Role, RoleAccessGate};
    use crate::KernelError;

    #[test]
    fn role_names_are_lenient() {
        assert_eq!("librarian".parse::<Role>(), Ok(Role::Librarian));
        assert_eq!("ROLE_ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" Patron ".parse::<Role>(), Ok(Role::Patron));
        assert!("USER".parse::<Role>().is_err());
    }

    #[test]
    fn patrons_may_read_but_not_lend() {
        let patron = Identity::new([Role::Patron]);
        assert!(RoleAccessGate.authorize(&patron, Operation::ReadLoans).is_ok());
        assert!(RoleAccessGate.authorize(&patron, Operation::ReadCatalog).is_ok());
        for operation in [
            Operation::Borrow,
            Operation::Return,
            Operation::ListOverdue,
            Operation::ManageCatalog,
        ] {
            let err = RoleAccessGate.authorize(&patron, operation).unwrap_err();
            assert_eq!(err.current_context(), &KernelError::Unauthorized);
        }
    }

    #[test]
    fn staff_may_do_everything() {
        let librarian = Identity::new([Role::Librarian]);
        assert!(RoleAccessGate.authorize(&librarian, Operation::Borrow).is_ok());
        assert!(RoleAccessGate
            .authorize(&librarian, Operation::ListOverdue)
            .is_ok());
        let anonymous = Identity::default();
        assert!(RoleAccessGate
            .authorize(&anonymous, Operation::ReadLoans)
            .is_err());
    }
}
