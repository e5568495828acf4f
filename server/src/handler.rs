use std::ops::Deref;
use std::sync::Arc;

use vodca::References;

use driver::database::{
    PostgresAuthorRepository, PostgresBookRepository, PostgresBorrowingRecordRepository,
    PostgresDatabase, PostgresPatronRepository,
};
use kernel::interface::access::{DependOnAccessGate, RoleAccessGate};
use kernel::interface::clock::{DependOnClock, SystemClock};
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{
    DependOnAuthorQuery, DependOnBookQuery, DependOnBorrowingRecordQuery, DependOnPatronQuery,
};
use kernel::interface::update::{
    DependOnAuthorModifier, DependOnBookModifier, DependOnBorrowingRecordModifier,
    DependOnPatronModifier,
};
use kernel::KernelError;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    pgpool: PostgresDatabase,
    system_clock: SystemClock,
    role_gate: RoleAccessGate,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;

        Ok(Self {
            pgpool,
            system_clock: SystemClock,
            role_gate: RoleAccessGate,
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        self.pgpool()
    }
}

impl DependOnClock for Handler {
    type Clock = SystemClock;
    fn clock(&self) -> &Self::Clock {
        self.system_clock()
    }
}

impl DependOnAccessGate for Handler {
    type AccessGate = RoleAccessGate;
    fn access_gate(&self) -> &Self::AccessGate {
        self.role_gate()
    }
}

impl DependOnBookQuery for Handler {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for Handler {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnPatronQuery for Handler {
    type PatronQuery = PostgresPatronRepository;
    fn patron_query(&self) -> &Self::PatronQuery {
        &PostgresPatronRepository
    }
}

impl DependOnPatronModifier for Handler {
    type PatronModifier = PostgresPatronRepository;
    fn patron_modifier(&self) -> &Self::PatronModifier {
        &PostgresPatronRepository
    }
}

impl DependOnAuthorQuery for Handler {
    type AuthorQuery = PostgresAuthorRepository;
    fn author_query(&self) -> &Self::AuthorQuery {
        &PostgresAuthorRepository
    }
}

impl DependOnAuthorModifier for Handler {
    type AuthorModifier = PostgresAuthorRepository;
    fn author_modifier(&self) -> &Self::AuthorModifier {
        &PostgresAuthorRepository
    }
}

impl DependOnBorrowingRecordQuery for Handler {
    type BorrowingRecordQuery = PostgresBorrowingRecordRepository;
    fn borrowing_record_query(&self) -> &Self::BorrowingRecordQuery {
        &PostgresBorrowingRecordRepository
    }
}

impl DependOnBorrowingRecordModifier for Handler {
    type BorrowingRecordModifier = PostgresBorrowingRecordRepository;
    fn borrowing_record_modifier(&self) -> &Self::BorrowingRecordModifier {
        &PostgresBorrowingRecordRepository
    }
}
