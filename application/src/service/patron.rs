use error_stack::Report;

use kernel::interface::access::{AccessGate, DependOnAccessGate, Identity, Operation};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BorrowingRecordQuery, DependOnBorrowingRecordQuery, DependOnPatronQuery, PatronQuery,
};
use kernel::interface::update::{DependOnPatronModifier, PatronModifier};
use kernel::prelude::entity::{
    require_positive, require_text, ContactInfo, NewPatron, PatronId, PatronName,
};
use kernel::{EntityKind, KernelError};

use crate::transfer::{
    CreatePatronDto, DeletePatronDto, GetPatronDto, PatronDto, SearchPatronDto, UpdatePatronDto,
};

#[async_trait::async_trait]
pub trait GetPatronService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnPatronQuery + DependOnAccessGate
{
    async fn get_patron(
        &self,
        identity: &Identity,
        dto: GetPatronDto,
    ) -> error_stack::Result<PatronDto, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadCatalog)?;
        let id = PatronId::new(require_positive("id", dto.id)?);

        let mut connection = self.database_connection().transact().await?;
        let patron = self
            .patron_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Patron, id)))?;
        Ok(PatronDto::from(patron))
    }

    async fn get_all_patrons(
        &self,
        identity: &Identity,
    ) -> error_stack::Result<Vec<PatronDto>, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadCatalog)?;

        let mut connection = self.database_connection().transact().await?;
        let patrons = self.patron_query().find_all(&mut connection).await?;
        Ok(patrons.into_iter().map(PatronDto::from).collect())
    }

    async fn search_patrons(
        &self,
        identity: &Identity,
        dto: SearchPatronDto,
    ) -> error_stack::Result<Vec<PatronDto>, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadCatalog)?;

        let mut connection = self.database_connection().transact().await?;
        let patrons = self
            .patron_query()
            .find_by_name_containing(&mut connection, &dto.name)
            .await?;
        Ok(patrons.into_iter().map(PatronDto::from).collect())
    }
}

impl<T> GetPatronService for T where
    T: DependOnDatabaseConnection + DependOnPatronQuery + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait CreatePatronService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnPatronModifier + DependOnAccessGate
{
    async fn create_patron(
        &self,
        identity: &Identity,
        dto: CreatePatronDto,
    ) -> error_stack::Result<PatronDto, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ManageCatalog)?;
        let patron = NewPatron::new(
            PatronName::new(require_text("name", dto.name)?),
            ContactInfo::new(dto.contact_info),
        );

        let mut connection = self.database_connection().transact().await?;
        let patron = self
            .patron_modifier()
            .create(&mut connection, &patron)
            .await?;
        connection.commit().await?;

        tracing::debug!("created patron {}", patron.id().as_ref());
        Ok(PatronDto::from(patron))
    }
}

impl<T> CreatePatronService for T where
    T: DependOnDatabaseConnection + DependOnPatronModifier + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait UpdatePatronService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnPatronQuery
    + DependOnPatronModifier
    + DependOnAccessGate
{
    async fn update_patron(
        &self,
        identity: &Identity,
        dto: UpdatePatronDto,
    ) -> error_stack::Result<PatronDto, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ManageCatalog)?;
        let id = PatronId::new(require_positive("id", dto.id)?);
        let name = PatronName::new(require_text("name", dto.name)?);

        let mut connection = self.database_connection().transact().await?;
        let mut patron = self
            .patron_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Patron, id)))?;

        patron.substitute(|patron| {
            *patron.name = name;
            *patron.contact_info = ContactInfo::new(dto.contact_info);
        });
        self.patron_modifier()
            .update(&mut connection, &patron)
            .await?;
        connection.commit().await?;

        Ok(PatronDto::from(patron))
    }
}

impl<T> UpdatePatronService for T where
    T: DependOnDatabaseConnection + DependOnPatronQuery + DependOnPatronModifier + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait DeletePatronService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnPatronQuery
    + DependOnPatronModifier
    + DependOnBorrowingRecordQuery
    + DependOnAccessGate
{
    async fn delete_patron(
        &self,
        identity: &Identity,
        dto: DeletePatronDto,
    ) -> error_stack::Result<(), KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ManageCatalog)?;
        let id = PatronId::new(require_positive("id", dto.id)?);

        let mut connection = self.database_connection().transact().await?;
        self.patron_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Patron, id)))?;

        let history = self
            .borrowing_record_query()
            .find_by_patron_id(&mut connection, &id)
            .await?;
        if !history.is_empty() {
            return Err(Report::new(KernelError::STILL_REFERENCED).attach_printable(format!(
                "patron {} appears in {} borrowing records",
                id.as_ref(),
                history.len()
            )));
        }

        self.patron_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;
        tracing::debug!("deleted patron {}", id.as_ref());
        Ok(())
    }
}

impl<T> DeletePatronService for T where
    T: DependOnDatabaseConnection
        + DependOnPatronQuery
        + DependOnPatronModifier
        + DependOnBorrowingRecordQuery
        + DependOnAccessGate
{
}

#[cfg(test)]
mod test {
    use time::macros::date;

    use kernel::KernelError;

    use crate::service::{
        BorrowBookService, DeletePatronService, GetPatronService, ReturnBookService,
        UpdatePatronService,
    };
    use crate::test::{librarian, patron, TestModule};
    use crate::transfer::{
        BorrowBookDto, DeletePatronDto, ReturnBookDto, SearchPatronDto, UpdatePatronDto,
    };

    #[tokio::test]
    async fn update_and_search() -> error_stack::Result<(), KernelError> {
        let module = TestModule::starting_on(date!(2024 - 03 - 01));
        let ada = module.patron("Ada").await;
        module.patron("Alan").await;

        let renamed = module
            .update_patron(
                &librarian(),
                UpdatePatronDto {
                    id: ada.id,
                    name: "Ada Lovelace".to_string(),
                    contact_info: ada.contact_info.clone(),
                },
            )
            .await?;
        let found = module
            .search_patrons(
                &patron(),
                SearchPatronDto {
                    name: "Love".to_string(),
                },
            )
            .await?;
        assert_eq!(found, vec![renamed]);
        assert_eq!(module.get_all_patrons(&patron()).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn patron_with_history_is_kept() -> error_stack::Result<(), KernelError> {
        let module = TestModule::starting_on(date!(2024 - 03 - 01));
        let book = module.book("Dune").await;
        let ada = module.patron("Ada").await;
        let record = module
            .borrow_book(
                &librarian(),
                BorrowBookDto {
                    book_id: book.id,
                    patron_id: ada.id,
                },
            )
            .await?;
        module
            .return_book(&librarian(), ReturnBookDto { id: record.id })
            .await?;

        let err = module
            .delete_patron(&librarian(), DeletePatronDto { id: ada.id })
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &KernelError::STILL_REFERENCED);

        let alan = module.patron("Alan").await;
        module
            .delete_patron(&librarian(), DeletePatronDto { id: alan.id })
            .await?;
        Ok(())
    }
}
