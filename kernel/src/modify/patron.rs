use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Patron, PatronId, NewPatron};
use crate::KernelError;

#[async_trait::async_trait]
pub trait PatronModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        patron: &NewPatron,
    ) -> error_stack::Result<Patron, KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        patron: &Patron,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        patron_id: &PatronId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnPatronModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type PatronModifier: PatronModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn patron_modifier(&self) -> &Self::PatronModifier;
}
