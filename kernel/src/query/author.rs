use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Author, AuthorId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait AuthorQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError>;

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Author>, KernelError>;

    async fn find_by_name_containing(
        &self,
        con: &mut Self::Transaction,
        fragment: &str,
    ) -> error_stack::Result<Vec<Author>, KernelError>;
}

pub trait DependOnAuthorQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type AuthorQuery: AuthorQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn author_query(&self) -> &Self::AuthorQuery;
}
