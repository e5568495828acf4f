use kernel::interface::query::AuthorQuery;
use kernel::interface::update::AuthorModifier;
use kernel::prelude::entity::{Author, AuthorId, NewAuthor};
use kernel::KernelError;

use crate::database::memory::{InMemoryTransaction, Sequence};

pub struct InMemoryAuthorRepository;

#[async_trait::async_trait]
impl AuthorQuery for InMemoryAuthorRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &AuthorId,
    ) -> error_stack::Result<Option<Author>, KernelError> {
        Ok(con.authors.get(id).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        Ok(con.authors.values().cloned().collect())
    }

    async fn find_by_name_containing(
        &self,
        con: &mut InMemoryTransaction,
        fragment: &str,
    ) -> error_stack::Result<Vec<Author>, KernelError> {
        Ok(con
            .authors
            .values()
            .filter(|author| author.name().as_ref().contains(fragment))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl AuthorModifier for InMemoryAuthorRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        author: &NewAuthor,
    ) -> error_stack::Result<Author, KernelError> {
        let id = AuthorId::new(Sequence::next(&mut con.sequence.author));
        let author = author.clone().into_author(id);
        con.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        author: &Author,
    ) -> error_stack::Result<(), KernelError> {
        if let Some(stored) = con.authors.get_mut(author.id()) {
            *stored = author.clone();
        }
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        author_id: &AuthorId,
    ) -> error_stack::Result<(), KernelError> {
        con.authors.remove(author_id);
        Ok(())
    }
}
