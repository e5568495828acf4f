use error_stack::Report;

use kernel::interface::access::{AccessGate, DependOnAccessGate, Identity, Operation};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{AuthorQuery, DependOnAuthorQuery};
use kernel::interface::update::{AuthorModifier, DependOnAuthorModifier};
use kernel::prelude::entity::{
    require_positive, require_text, AuthorId, AuthorName, DateOfBirth, NewAuthor,
};
use kernel::{EntityKind, KernelError};

use crate::transfer::{
    AuthorDto, CreateAuthorDto, DeleteAuthorDto, GetAuthorDto, SearchAuthorDto, UpdateAuthorDto,
};

#[async_trait::async_trait]
pub trait GetAuthorService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnAuthorQuery + DependOnAccessGate
{
    async fn get_author(
        &self,
        identity: &Identity,
        dto: GetAuthorDto,
    ) -> error_stack::Result<AuthorDto, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadCatalog)?;
        let id = AuthorId::new(require_positive("id", dto.id)?);

        let mut connection = self.database_connection().transact().await?;
        let author = self
            .author_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Author, id)))?;
        Ok(AuthorDto::from(author))
    }

    async fn get_all_authors(
        &self,
        identity: &Identity,
    ) -> error_stack::Result<Vec<AuthorDto>, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadCatalog)?;

        let mut connection = self.database_connection().transact().await?;
        let authors = self.author_query().find_all(&mut connection).await?;
        Ok(authors.into_iter().map(AuthorDto::from).collect())
    }

    async fn search_authors(
        &self,
        identity: &Identity,
        dto: SearchAuthorDto,
    ) -> error_stack::Result<Vec<AuthorDto>, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ReadCatalog)?;

        let mut connection = self.database_connection().transact().await?;
        let authors = self
            .author_query()
            .find_by_name_containing(&mut connection, &dto.name)
            .await?;
        Ok(authors.into_iter().map(AuthorDto::from).collect())
    }
}

impl<T> GetAuthorService for T where
    T: DependOnDatabaseConnection + DependOnAuthorQuery + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait CreateAuthorService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnAuthorModifier + DependOnAccessGate
{
    async fn create_author(
        &self,
        identity: &Identity,
        dto: CreateAuthorDto,
    ) -> error_stack::Result<AuthorDto, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ManageCatalog)?;
        let author = NewAuthor::new(
            AuthorName::new(require_text("name", dto.name)?),
            dto.date_of_birth.map(DateOfBirth::new),
        );

        let mut connection = self.database_connection().transact().await?;
        let author = self
            .author_modifier()
            .create(&mut connection, &author)
            .await?;
        connection.commit().await?;
        Ok(AuthorDto::from(author))
    }
}

impl<T> CreateAuthorService for T where
    T: DependOnDatabaseConnection + DependOnAuthorModifier + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait UpdateAuthorService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnAuthorQuery
    + DependOnAuthorModifier
    + DependOnAccessGate
{
    async fn update_author(
        &self,
        identity: &Identity,
        dto: UpdateAuthorDto,
    ) -> error_stack::Result<AuthorDto, KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ManageCatalog)?;
        let id = AuthorId::new(require_positive("id", dto.id)?);
        let name = AuthorName::new(require_text("name", dto.name)?);

        let mut connection = self.database_connection().transact().await?;
        let mut author = self
            .author_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Author, id)))?;

        author.substitute(|author| {
            *author.name = name;
            *author.date_of_birth = dto.date_of_birth.map(DateOfBirth::new);
        });
        self.author_modifier()
            .update(&mut connection, &author)
            .await?;
        connection.commit().await?;
        Ok(AuthorDto::from(author))
    }
}

impl<T> UpdateAuthorService for T where
    T: DependOnDatabaseConnection + DependOnAuthorQuery + DependOnAuthorModifier + DependOnAccessGate
{
}

#[async_trait::async_trait]
pub trait DeleteAuthorService:
    'static
    + Sync
    + Send
    + DependOnDatabaseConnection
    + DependOnAuthorQuery
    + DependOnAuthorModifier
    + DependOnAccessGate
{
    async fn delete_author(
        &self,
        identity: &Identity,
        dto: DeleteAuthorDto,
    ) -> error_stack::Result<(), KernelError> {
        self.access_gate()
            .authorize(identity, Operation::ManageCatalog)?;
        let id = AuthorId::new(require_positive("id", dto.id)?);

        let mut connection = self.database_connection().transact().await?;
        self.author_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found(EntityKind::Author, id)))?;
        self.author_modifier().delete(&mut connection, &id).await?;
        connection.commit().await?;
        Ok(())
    }
}

impl<T> DeleteAuthorService for T where
    T: DependOnDatabaseConnection + DependOnAuthorQuery + DependOnAuthorModifier + DependOnAccessGate
{
}

#[cfg(test)]
mod test {
    use time::macros::date;

    use kernel::{EntityKind, KernelError};

    use crate::service::{
        CreateAuthorService, DeleteAuthorService, GetAuthorService, UpdateAuthorService,
    };
    use crate::test::{librarian, patron, TestModule};
    use crate::transfer::{
        CreateAuthorDto, DeleteAuthorDto, GetAuthorDto, SearchAuthorDto, UpdateAuthorDto,
    };

    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let module = TestModule::starting_on(date!(2024 - 03 - 01));
        let le_guin = module
            .create_author(
                &librarian(),
                CreateAuthorDto {
                    name: "Ursula Le Guin".to_string(),
                    date_of_birth: Some(date!(1929 - 10 - 21)),
                },
            )
            .await?;

        let updated = module
            .update_author(
                &librarian(),
                UpdateAuthorDto {
                    id: le_guin.id,
                    name: "Ursula K. Le Guin".to_string(),
                    date_of_birth: le_guin.date_of_birth,
                },
            )
            .await?;
        assert_eq!(
            module
                .search_authors(
                    &patron(),
                    SearchAuthorDto {
                        name: "K. Le".to_string()
                    }
                )
                .await?,
            vec![updated]
        );

        let err = module
            .create_author(
                &librarian(),
                CreateAuthorDto {
                    name: String::new(),
                    date_of_birth: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.current_context(),
            &KernelError::Validation { field: "name" }
        );

        module
            .delete_author(&librarian(), DeleteAuthorDto { id: le_guin.id })
            .await?;
        let err = module
            .get_author(&patron(), GetAuthorDto { id: le_guin.id })
            .await
            .unwrap_err();
        assert_eq!(
            err.current_context(),
            &KernelError::NotFound {
                entity: EntityKind::Author,
                id: le_guin.id
            }
        );
        assert!(module.get_all_authors(&patron()).await?.is_empty());
        Ok(())
    }
}
