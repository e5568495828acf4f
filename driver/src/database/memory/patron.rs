use error_stack::Report;

use kernel::interface::query::PatronQuery;
use kernel::interface::update::PatronModifier;
use kernel::prelude::entity::{NewPatron, Patron, PatronId};
use kernel::KernelError;

use crate::database::memory::{InMemoryTransaction, Sequence};

pub struct InMemoryPatronRepository;

#[async_trait::async_trait]
impl PatronQuery for InMemoryPatronRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &PatronId,
    ) -> error_stack::Result<Option<Patron>, KernelError> {
        Ok(con.patrons.get(id).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Patron>, KernelError> {
        Ok(con.patrons.values().cloned().collect())
    }

    async fn find_by_name_containing(
        &self,
        con: &mut InMemoryTransaction,
        fragment: &str,
    ) -> error_stack::Result<Vec<Patron>, KernelError> {
        Ok(con
            .patrons
            .values()
            .filter(|patron| patron.name().as_ref().contains(fragment))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl PatronModifier for InMemoryPatronRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        patron: &NewPatron,
    ) -> error_stack::Result<Patron, KernelError> {
        let id = PatronId::new(Sequence::next(&mut con.sequence.patron));
        let patron = patron.clone().into_patron(id);
        con.patrons.insert(id, patron.clone());
        Ok(patron)
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        patron: &Patron,
    ) -> error_stack::Result<(), KernelError> {
        if let Some(stored) = con.patrons.get_mut(patron.id()) {
            *stored = patron.clone();
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        patron_id: &PatronId,
    ) -> error_stack::Result<(), KernelError> {
        if con
            .records
            .values()
            .any(|record| record.patron_id() == patron_id)
        {
            return Err(Report::new(KernelError::STILL_REFERENCED).attach_printable(format!(
                "patron {} has borrowing records",
                patron_id.as_ref()
            )));
        }
        con.patrons.remove(patron_id);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::PatronQuery;
    use kernel::interface::update::PatronModifier;
    use kernel::prelude::entity::{ContactInfo, NewPatron, PatronName};
    use kernel::KernelError;

    use crate::database::memory::{InMemoryDatabase, InMemoryPatronRepository};

    #[tokio::test]
    async fn find_by_name() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;
        let ada = InMemoryPatronRepository
            .create(
                &mut con,
                &NewPatron::new(PatronName::new("Ada Lovelace"), ContactInfo::new("ada@example.com")),
            )
            .await?;
        InMemoryPatronRepository
            .create(
                &mut con,
                &NewPatron::new(PatronName::new("Alan Turing"), ContactInfo::new("alan@example.com")),
            )
            .await?;

        let found = InMemoryPatronRepository
            .find_by_name_containing(&mut con, "Love")
            .await?;
        assert_eq!(found, vec![ada.clone()]);
        assert_eq!(InMemoryPatronRepository.find_all(&mut con).await?.len(), 2);

        InMemoryPatronRepository.delete(&mut con, ada.id()).await?;
        let found = InMemoryPatronRepository.find_by_id(&mut con, ada.id()).await?;
        assert!(found.is_none());
        Ok(())
    }
}
