use sqlx::PgConnection;
use time::Date;

use kernel::interface::query::AuthorQuery;
use kernel::interface::update::AuthorModifier;
use kernel::prelude::entity::{Author, AuthorId, AuthorName, DateOfBirth, NewAuthor};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresAuthorRepository;

#[async_trait::async_trait]
impl AuthorQuery for PostgresAuthorRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        PgAuthorInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        PgAuthorInternal::find_all(con).await
    }

    async fn find_by_name_containing(
        &self,
        con: &mut PostgresConnection,
        fragment: &str,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        PgAuthorInternal::find_by_name_containing(con, fragment).await
    }
}

#[async_trait::async_trait]
impl AuthorModifier for PostgresAuthorRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        author: &NewAuthor,
    ) -> error_stack::Result<Author, KernelError> {
        PgAuthorInternal::create(con, author).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        author: &Author,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorInternal::update(con, author).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        PgAuthorInternal::delete(con, author_id).await
    }
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: i64,
    name: String,
    date_of_birth: Option<Date>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Author::new(
            AuthorId::new(row.id),
            AuthorName::new(row.name),
            row.date_of_birth.map(DateOfBirth::new),
        )
    }
}

pub(in crate::database) struct PgAuthorInternal;

impl PgAuthorInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT id, name, date_of_birth
            FROM authors
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Author::from))
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Author>, KernelError> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT id, name, date_of_birth
            FROM authors
            ORDER BY id
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn find_by_name_containing(
        con: &mut PgConnection,
        fragment: &str,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        let rows = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            SELECT id, name, date_of_birth
            FROM authors
            WHERE strpos(name, $1) > 0
            ORDER BY id
            "#,
        )
        .bind(fragment)
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Author::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        author: &NewAuthor,
    ) -> error_stack::Result<Author, KernelError> {
        let row = sqlx::query_as::<_, AuthorRow>(
            // language=postgresql
            r#"
            INSERT INTO authors (name, date_of_birth)
            VALUES ($1, $2)
            RETURNING id, name, date_of_birth
            "#,
        )
        .bind(author.name().as_ref())
        .bind(author.date_of_birth().map(|date| *date.as_ref()))
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Author::from(row))
    }

    async fn update(con: &mut PgConnection, author: &Author) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE authors
            SET name = $2, date_of_birth = $3
            WHERE id = $1
            "#,
        )
        .bind(author.id().as_ref())
        .bind(author.name().as_ref())
        .bind(author.date_of_birth().map(|date| *date.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM authors
            WHERE id = $1
            "#,
        )
        .bind(author_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rand::distributions::{Alphanumeric, DistString};
    use time::macros::date;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::AuthorQuery;
    use kernel::interface::update::AuthorModifier;
    use kernel::prelude::entity::{AuthorName, DateOfBirth, NewAuthor};
    use kernel::KernelError;

    use crate::database::postgres::{PostgresAuthorRepository, PostgresDatabase};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn find_by_id() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut connection = db.transact().await?;
        let marker = Alphanumeric.sample_string(&mut rand::thread_rng(), 12);

        let author = PostgresAuthorRepository
            .create(
                &mut connection,
                &NewAuthor::new(
                    AuthorName::new(format!("Ursula {marker}")),
                    Some(DateOfBirth::new(date!(1929 - 10 - 21))),
                ),
            )
            .await?;

        let found = PostgresAuthorRepository
            .find_by_id(&mut connection, author.id())
            .await?;
        assert_eq!(found, Some(author.clone()));

        let author = author.reconstruct(|a| a.date_of_birth = None);
        PostgresAuthorRepository
            .update(&mut connection, &author)
            .await?;

        let searched = PostgresAuthorRepository
            .find_by_name_containing(&mut connection, &marker)
            .await?;
        assert_eq!(searched, vec![author.clone()]);

        PostgresAuthorRepository
            .delete(&mut connection, author.id())
            .await?;
        let found = PostgresAuthorRepository
            .find_by_id(&mut connection, author.id())
            .await?;
        assert!(found.is_none());

        Ok(())
    }
}
