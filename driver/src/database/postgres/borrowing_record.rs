use sqlx::{Error, PgConnection};
use time::Date;

use kernel::interface::query::BorrowingRecordQuery;
use kernel::interface::update::BorrowingRecordModifier;
use kernel::prelude::entity::{
    BookId, BorrowDate, BorrowingRecord, BorrowingRecordId, DueDate, NewBorrowingRecord, PatronId,
    ReturnDate,
};
use kernel::{EntityKind, KernelError};

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

const ACTIVE_LOAN_INDEX: &str = "borrowing_records_active_book_idx";
const BOOK_FOREIGN_KEY: &str = "borrowing_records_book_id_fkey";
const PATRON_FOREIGN_KEY: &str = "borrowing_records_patron_id_fkey";

pub struct PostgresBorrowingRecordRepository;

#[async_trait::async_trait]
impl BorrowingRecordQuery for PostgresBorrowingRecordRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &BorrowingRecordId,
    ) -> error_stack::Result<Option<BorrowingRecord>, KernelError> {
        PgBorrowingRecordInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        PgBorrowingRecordInternal::find_all(con).await
    }

    async fn find_by_book_id(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        PgBorrowingRecordInternal::find_by_book_id(con, book_id).await
    }

    async fn find_by_patron_id(
        &self,
        con: &mut PostgresConnection,
        patron_id: &PatronId,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        PgBorrowingRecordInternal::find_by_patron_id(con, patron_id).await
    }

    async fn find_active_by_book_id(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Option<BorrowingRecord>, KernelError> {
        PgBorrowingRecordInternal::find_active_by_book_id(con, book_id).await
    }

    async fn find_overdue(
        &self,
        con: &mut PostgresConnection,
        today: &Date,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        PgBorrowingRecordInternal::find_overdue(con, today).await
    }
}

#[async_trait::async_trait]
impl BorrowingRecordModifier for PostgresBorrowingRecordRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        record: &NewBorrowingRecord,
    ) -> error_stack::Result<BorrowingRecord, KernelError> {
        PgBorrowingRecordInternal::create(con, record).await
    }

    async fn mark_returned(
        &self,
        con: &mut PostgresConnection,
        id: &BorrowingRecordId,
        date: &ReturnDate,
    ) -> error_stack::Result<bool, KernelError> {
        PgBorrowingRecordInternal::mark_returned(con, id, date).await
    }
}

#[derive(sqlx::FromRow)]
struct BorrowingRecordRow {
    id: i64,
    book_id: i64,
    patron_id: i64,
    borrow_date: Date,
    due_date: Date,
    return_date: Option<Date>,
}

impl From<BorrowingRecordRow> for BorrowingRecord {
    fn from(row: BorrowingRecordRow) -> Self {
        BorrowingRecord::new(
            BorrowingRecordId::new(row.id),
            BookId::new(row.book_id),
            PatronId::new(row.patron_id),
            BorrowDate::new(row.borrow_date),
            DueDate::new(row.due_date),
            row.return_date.map(ReturnDate::new),
        )
    }
}

pub(in crate::database) struct PgBorrowingRecordInternal;

impl PgBorrowingRecordInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BorrowingRecordId,
    ) -> error_stack::Result<Option<BorrowingRecord>, KernelError> {
        let row = sqlx::query_as::<_, BorrowingRecordRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, patron_id, borrow_date, due_date, return_date
            FROM borrowing_records
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(BorrowingRecord::from))
    }

    async fn find_all(
        con: &mut PgConnection,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        let rows = sqlx::query_as::<_, BorrowingRecordRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, patron_id, borrow_date, due_date, return_date
            FROM borrowing_records
            ORDER BY id
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(BorrowingRecord::from).collect())
    }

    async fn find_by_book_id(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        let rows = sqlx::query_as::<_, BorrowingRecordRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, patron_id, borrow_date, due_date, return_date
            FROM borrowing_records
            WHERE book_id = $1
            ORDER BY id
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(BorrowingRecord::from).collect())
    }

    async fn find_by_patron_id(
        con: &mut PgConnection,
        patron_id: &PatronId,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        let rows = sqlx::query_as::<_, BorrowingRecordRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, patron_id, borrow_date, due_date, return_date
            FROM borrowing_records
            WHERE patron_id = $1
            ORDER BY id
            "#,
        )
        .bind(patron_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(BorrowingRecord::from).collect())
    }

    async fn find_active_by_book_id(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Option<BorrowingRecord>, KernelError> {
        let row = sqlx::query_as::<_, BorrowingRecordRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, patron_id, borrow_date, due_date, return_date
            FROM borrowing_records
            WHERE book_id = $1 AND return_date IS NULL
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(BorrowingRecord::from))
    }

    async fn find_overdue(
        con: &mut PgConnection,
        today: &Date,
    ) -> error_stack::Result<Vec<BorrowingRecord>, KernelError> {
        let rows = sqlx::query_as::<_, BorrowingRecordRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, patron_id, borrow_date, due_date, return_date
            FROM borrowing_records
            WHERE return_date IS NULL AND due_date < $1
            ORDER BY due_date, id
            "#,
        )
        .bind(today)
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(BorrowingRecord::from).collect())
    }

    async fn create(
        con: &mut PgConnection,
        record: &NewBorrowingRecord,
    ) -> error_stack::Result<BorrowingRecord, KernelError> {
        let row = sqlx::query_as::<_, BorrowingRecordRow>(
            // language=postgresql
            r#"
            INSERT INTO borrowing_records (book_id, patron_id, borrow_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id, patron_id, borrow_date, due_date, return_date
            "#,
        )
        .bind(record.book_id().as_ref())
        .bind(record.patron_id().as_ref())
        .bind(record.borrow_date().as_ref())
        .bind(record.due_date().as_ref())
        .fetch_one(con)
        .await
        .convert_error()
        .map_err(|report| {
            let rejected = match report.downcast_ref::<Error>() {
                Some(Error::Database(db)) => match db.constraint() {
                    Some(ACTIVE_LOAN_INDEX) => Some(KernelError::BOOK_ON_LOAN),
                    // the referenced row went away after it was read
                    Some(BOOK_FOREIGN_KEY) => {
                        Some(KernelError::not_found(EntityKind::Book, *record.book_id()))
                    }
                    Some(PATRON_FOREIGN_KEY) => Some(KernelError::not_found(
                        EntityKind::Patron,
                        *record.patron_id(),
                    )),
                    _ => None,
                },
                _ => None,
            };
            match rejected {
                Some(context) => report.change_context(context),
                None => report,
            }
        })?;
        Ok(BorrowingRecord::from(row))
    }

    async fn mark_returned(
        con: &mut PgConnection,
        id: &BorrowingRecordId,
        date: &ReturnDate,
    ) -> error_stack::Result<bool, KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE borrowing_records
            SET return_date = $2
            WHERE id = $1 AND return_date IS NULL
            "#,
        )
        .bind(id.as_ref())
        .bind(date.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod test {
    use time::macros::date;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::{BookQuery, BorrowingRecordQuery};
    use kernel::interface::update::{BookModifier, BorrowingRecordModifier, PatronModifier};
    use kernel::prelude::entity::{
        BookAuthor, BookTitle, ContactInfo, Isbn, LoanPeriod, NewBook, NewBorrowingRecord,
        NewPatron, PatronId, PatronName, ReturnDate,
    };
    use kernel::{EntityKind, KernelError};

    use crate::database::postgres::{
        PostgresBookRepository, PostgresBorrowingRecordRepository, PostgresDatabase,
        PostgresPatronRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let book = PostgresBookRepository
            .create(
                &mut con,
                &NewBook::new(
                    BookTitle::new("The Dispossessed"),
                    BookAuthor::new("Ursula K. Le Guin"),
                    Isbn::new("9780060512750"),
                    None,
                ),
            )
            .await?;
        let patron = PostgresPatronRepository
            .create(
                &mut con,
                &NewPatron::new(PatronName::new("Shevek"), ContactInfo::new("anarres")),
            )
            .await?;

        let opened = NewBorrowingRecord::open(
            *book.id(),
            *patron.id(),
            date!(2024 - 01 - 01),
            &LoanPeriod::default(),
        )?;
        let record = PostgresBorrowingRecordRepository
            .create(&mut con, &opened)
            .await?;

        let active = PostgresBorrowingRecordRepository
            .find_active_by_book_id(&mut con, book.id())
            .await?;
        assert_eq!(active, Some(record.clone()));

        let second = PostgresBorrowingRecordRepository
            .create(&mut con, &opened)
            .await;
        assert_eq!(
            second.unwrap_err().current_context(),
            &KernelError::BOOK_ON_LOAN
        );
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn return_is_written_once() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let book = PostgresBookRepository
            .create(
                &mut con,
                &NewBook::new(
                    BookTitle::new("Solaris"),
                    BookAuthor::new("Stanisław Lem"),
                    Isbn::new("9780156027601"),
                    None,
                ),
            )
            .await?;
        let patron = PostgresPatronRepository
            .create(
                &mut con,
                &NewPatron::new(PatronName::new("Kris"), ContactInfo::new("station")),
            )
            .await?;
        let record = PostgresBorrowingRecordRepository
            .create(
                &mut con,
                &NewBorrowingRecord::open(
                    *book.id(),
                    *patron.id(),
                    date!(2024 - 01 - 01),
                    &LoanPeriod::default(),
                )?,
            )
            .await?;

        let overdue = PostgresBorrowingRecordRepository
            .find_overdue(&mut con, &date!(2024 - 01 - 16))
            .await?;
        assert!(overdue.contains(&record));

        let first = ReturnDate::new(date!(2024 - 01 - 21));
        assert!(PostgresBorrowingRecordRepository
            .mark_returned(&mut con, record.id(), &first)
            .await?);
        assert!(!PostgresBorrowingRecordRepository
            .mark_returned(&mut con, record.id(), &ReturnDate::new(date!(2024 - 02 - 01)))
            .await?);

        let found = PostgresBorrowingRecordRepository
            .find_by_id(&mut con, record.id())
            .await?
            .expect("record exists");
        assert_eq!(found.return_date(), &Some(first));

        let by_patron = PostgresBorrowingRecordRepository
            .find_by_patron_id(&mut con, patron.id())
            .await?;
        assert_eq!(by_patron, vec![found]);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn missing_patron_is_not_a_loan_conflict() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let book = PostgresBookRepository
            .create(
                &mut con,
                &NewBook::new(
                    BookTitle::new("Roadside Picnic"),
                    BookAuthor::new("Arkady and Boris Strugatsky"),
                    Isbn::new("9781613743416"),
                    None,
                ),
            )
            .await?;

        let ghost = PatronId::new(i64::MAX);
        let result = PostgresBorrowingRecordRepository
            .create(
                &mut con,
                &NewBorrowingRecord::open(
                    *book.id(),
                    ghost,
                    date!(2024 - 04 - 01),
                    &LoanPeriod::default(),
                )?,
            )
            .await;
        assert_eq!(
            result.unwrap_err().current_context(),
            &KernelError::NotFound {
                entity: EntityKind::Patron,
                id: i64::MAX
            }
        );
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn racing_borrows_open_one_loan() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let book = PostgresBookRepository
            .create(
                &mut con,
                &NewBook::new(
                    BookTitle::new("Hyperion"),
                    BookAuthor::new("Dan Simmons"),
                    Isbn::new("9780553283686"),
                    None,
                ),
            )
            .await?;
        let patron = PostgresPatronRepository
            .create(
                &mut con,
                &NewPatron::new(PatronName::new("Brawne"), ContactInfo::new("lusus")),
            )
            .await?;
        con.commit().await?;

        let opened = NewBorrowingRecord::open(
            *book.id(),
            *patron.id(),
            date!(2024 - 05 - 01),
            &LoanPeriod::default(),
        )?;
        let borrows = (0..2)
            .map(|_| {
                let db = db.clone();
                let opened = opened.clone();
                tokio::spawn(async move {
                    let mut con = db.transact().await?;
                    PostgresBookRepository
                        .find_by_id_for_update(&mut con, opened.book_id())
                        .await?;
                    let record = PostgresBorrowingRecordRepository
                        .create(&mut con, &opened)
                        .await?;
                    con.commit().await?;
                    Ok::<_, error_stack::Report<KernelError>>(record)
                })
            })
            .collect::<Vec<_>>();

        let mut opened_loans = 0;
        for borrow in borrows {
            match borrow.await.expect("borrow task panicked") {
                Ok(_) => opened_loans += 1,
                Err(report) => {
                    assert_eq!(report.current_context(), &KernelError::BOOK_ON_LOAN)
                }
            }
        }
        assert_eq!(opened_loans, 1);

        let mut con = db.transact().await?;
        let history = PostgresBorrowingRecordRepository
            .find_by_book_id(&mut con, book.id())
            .await?;
        assert_eq!(history.len(), 1);
        Ok(())
    }
}
