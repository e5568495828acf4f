use std::sync::Mutex;

use time::{Date, Duration};

use driver::database::{
    InMemoryAuthorRepository, InMemoryBookRepository, InMemoryBorrowingRecordRepository,
    InMemoryDatabase, InMemoryPatronRepository,
};
use kernel::interface::access::{DependOnAccessGate, Identity, Role, RoleAccessGate};
use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{
    DependOnAuthorQuery, DependOnBookQuery, DependOnBorrowingRecordQuery, DependOnPatronQuery,
};
use kernel::interface::update::{
    DependOnAuthorModifier, DependOnBookModifier, DependOnBorrowingRecordModifier,
    DependOnPatronModifier,
};

use crate::service::{CreateBookService, CreatePatronService};
use crate::transfer::{BookDto, CreateBookDto, CreatePatronDto, PatronDto};

pub struct FixedClock(Mutex<Date>);

impl FixedClock {
    pub fn advance(&self, days: i64) {
        let mut today = self.0.lock().unwrap();
        *today += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> Date {
        *self.0.lock().unwrap()
    }
}

/// Wires the services to the in-memory store and a clock the test controls.
pub struct TestModule {
    database: InMemoryDatabase,
    clock: FixedClock,
}

impl TestModule {
    pub fn starting_on(today: Date) -> Self {
        Self {
            database: InMemoryDatabase::new(),
            clock: FixedClock(Mutex::new(today)),
        }
    }

    pub fn advance(&self, days: i64) {
        self.clock.advance(days);
    }

    pub async fn book(&self, title: &str) -> BookDto {
        self.create_book(
            &librarian(),
            CreateBookDto {
                title: title.to_string(),
                author: "Anonymous".to_string(),
                isbn: "0000000000".to_string(),
                published_date: None,
            },
        )
        .await
        .unwrap()
    }

    pub async fn patron(&self, name: &str) -> PatronDto {
        self.create_patron(
            &librarian(),
            CreatePatronDto {
                name: name.to_string(),
                contact_info: format!("{}@example.com", name.to_lowercase()),
            },
        )
        .await
        .unwrap()
    }
}

pub fn librarian() -> Identity {
    Identity::new([Role::Librarian])
}

pub fn patron() -> Identity {
    Identity::new([Role::Patron])
}

impl DependOnDatabaseConnection for TestModule {
    type DatabaseConnection = InMemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl DependOnClock for TestModule {
    type Clock = FixedClock;
    fn clock(&self) -> &Self::Clock {
        &self.clock
    }
}

impl DependOnAccessGate for TestModule {
    type AccessGate = RoleAccessGate;
    fn access_gate(&self) -> &Self::AccessGate {
        &RoleAccessGate
    }
}

impl DependOnBookQuery for TestModule {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for TestModule {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}

impl DependOnPatronQuery for TestModule {
    type PatronQuery = InMemoryPatronRepository;
    fn patron_query(&self) -> &Self::PatronQuery {
        &InMemoryPatronRepository
    }
}

impl DependOnPatronModifier for TestModule {
    type PatronModifier = InMemoryPatronRepository;
    fn patron_modifier(&self) -> &Self::PatronModifier {
        &InMemoryPatronRepository
    }
}

impl DependOnAuthorQuery for TestModule {
    type AuthorQuery = InMemoryAuthorRepository;
    fn author_query(&self) -> &Self::AuthorQuery {
        &InMemoryAuthorRepository
    }
}

impl DependOnAuthorModifier for TestModule {
    type AuthorModifier = InMemoryAuthorRepository;
    fn author_modifier(&self) -> &Self::AuthorModifier {
        &InMemoryAuthorRepository
    }
}

impl DependOnBorrowingRecordQuery for TestModule {
    type BorrowingRecordQuery = InMemoryBorrowingRecordRepository;
    fn borrowing_record_query(&self) -> &Self::BorrowingRecordQuery {
        &InMemoryBorrowingRecordRepository
    }
}

impl DependOnBorrowingRecordModifier for TestModule {
    type BorrowingRecordModifier = InMemoryBorrowingRecordRepository;
    fn borrowing_record_modifier(&self) -> &Self::BorrowingRecordModifier {
        &InMemoryBorrowingRecordRepository
    }
}
