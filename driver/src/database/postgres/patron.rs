use sqlx::PgConnection;

use kernel::interface::query::PatronQuery;
use kernel::interface::update::PatronModifier;
use kernel::prelude::entity::{ContactInfo, NewPatron, Patron, PatronId, PatronName};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresPatronRepository;

#[async_trait::async_trait]
impl PatronQuery for PostgresPatronRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &PatronId,
    ) -> error_stack::Result<Option<Patron>, KernelError> {
        PgPatronInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Patron>, KernelError> {
        PgPatronInternal::find_all(con).await
    }

    async fn find_by_name_containing(
        &self,
        con: &mut PostgresConnection,
        fragment: &str,
    ) -> error_stack::Result<Vec<Patron>, KernelError> {
        PgPatronInternal::find_by_name_containing(con, fragment).await
    }
}

#[async_trait::async_trait]
impl PatronModifier for PostgresPatronRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        patron: &NewPatron,
    ) -> error_stack::Result<Patron, KernelError> {
        PgPatronInternal::create(con, patron).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        patron: &Patron,
    ) -> error_stack::Result<(), KernelError> {
        PgPatronInternal::update(con, patron).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        patron_id: &PatronId,
    ) -> error_stack::Result<(), KernelError> {
        PgPatronInternal::delete(con, patron_id).await
    }
}

#[derive(sqlx::FromRow)]
struct PatronRow {
    id: i64,
    name: String,
    contact_info: String,
}

impl From<PatronRow> for Patron {
    fn from(row: PatronRow) -> Self {
        Patron::new(
            PatronId::new(row.id),
            PatronName::new(row.name),
            ContactInfo::new(row.contact_info),
        )
    }
}

pub(in crate::database) struct PgPatronInternal;

impl PgPatronInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &PatronId,
    ) -> error_stack::Result<Option<Patron>, KernelError> {
        let row = sqlx::query_as::<_, PatronRow>(
            // language=postgresql
            r#"
            SELECT id, name, contact_info
            FROM patrons
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Patron::from))
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Patron>, KernelError> {
        let rows = sqlx::query_as::<_, PatronRow>(
            // language=postgresql
            r#"
            SELECT id, name, contact_info
            FROM patrons
            ORDER BY id
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Patron::from).collect())
    }

    async fn find_by_name_containing(
        con: &mut PgConnection,
        fragment: &str,
    ) -> error_stack::Result<Vec<Patron>, KernelError> {
        let rows = sqlx::query_as::<_, PatronRow>(
            // language=postgresql
            r#"
            SELECT id, name, contact_info
            FROM patrons
            WHERE strpos(name, $1) > 0
            ORDER BY id
            "#,
        )
        .bind(fragment)
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Patron::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        patron: &NewPatron,
    ) -> error_stack::Result<Patron, KernelError> {
        let row = sqlx::query_as::<_, PatronRow>(
            // language=postgresql
            r#"
            INSERT INTO patrons (name, contact_info)
            VALUES ($1, $2)
            RETURNING id, name, contact_info
            "#,
        )
        .bind(patron.name().as_ref())
        .bind(patron.contact_info().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Patron::from(row))
    }

    async fn update(con: &mut PgConnection, patron: &Patron) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE patrons
            SET name = $2, contact_info = $3
            WHERE id = $1
            "#,
        )
        .bind(patron.id().as_ref())
        .bind(patron.name().as_ref())
        .bind(patron.contact_info().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        patron_id: &PatronId,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM patrons
            WHERE id = $1
            "#,
        )
        .bind(patron_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rand::distributions::{Alphanumeric, DistString};

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::PatronQuery;
    use kernel::interface::update::PatronModifier;
    use kernel::prelude::entity::{ContactInfo, NewPatron, PatronName};
    use kernel::KernelError;

    use crate::database::postgres::{PostgresDatabase, PostgresPatronRepository};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn find_by_id() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;
        let marker = Alphanumeric.sample_string(&mut rand::thread_rng(), 12);

        let patron = PostgresPatronRepository
            .create(
                &mut connection,
                &NewPatron::new(
                    PatronName::new(format!("Ada {marker}")),
                    ContactInfo::new("ada@example.com"),
                ),
            )
            .await?;

        let found = PostgresPatronRepository
            .find_by_id(&mut connection, patron.id())
            .await?;
        assert_eq!(found, Some(patron.clone()));

        let patron = patron.reconstruct(|p| p.contact_info = ContactInfo::new("ada@example.org"));
        PostgresPatronRepository
            .update(&mut connection, &patron)
            .await?;

        let searched = PostgresPatronRepository
            .find_by_name_containing(&mut connection, &marker)
            .await?;
        assert_eq!(searched, vec![patron.clone()]);

        PostgresPatronRepository
            .delete(&mut connection, patron.id())
            .await?;
        let found = PostgresPatronRepository
            .find_by_id(&mut connection, patron.id())
            .await?;
        assert!(found.is_none());

        Ok(())
    }
}
