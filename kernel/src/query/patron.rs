use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Patron, PatronId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait PatronQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &PatronId,
    ) -> error_stack::Result<Option<Patron>, KernelError>;

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<Vec<Patron>, KernelError>;

    async fn find_by_name_containing(
        &self,
        con: &mut Self::Transaction,
        fragment: &str,
    ) -> error_stack::Result<Vec<Patron>, KernelError>;
}

pub trait DependOnPatronQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type PatronQuery: PatronQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn patron_query(&self) -> &Self::PatronQuery;
}
