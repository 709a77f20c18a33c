use super::DatabaseRow;
use crate::{
    queries::company::{child_ids, delete, exists, get, get_all, insert, update},
    PgDatabaseAutocommit, PgDatabaseTransaction,
};
use async_trait::async_trait;
use charging::database::{CompanyRepo, Repo, Result};
use model::{company::Company, WithId};
use sqlx::prelude::FromRow;
use utility::id::Id;

#[derive(Debug, Clone, FromRow)]
pub struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

impl DatabaseRow for CompanyRow {
    type Model = Company;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        Company {
            name: self.name,
            parent_id: self.parent_id.map(Id::new),
        }
    }
}

// Repo

#[async_trait]
impl Repo<Company> for PgDatabaseAutocommit {
    async fn get(&mut self, id: Id<Company>) -> Result<WithId<Company>> {
        get(&self.pool, id).await
    }

    async fn get_all(&mut self) -> Result<Vec<WithId<Company>>> {
        get_all(&self.pool).await
    }

    async fn insert(&mut self, element: Company) -> Result<WithId<Company>> {
        insert(&self.pool, element).await
    }

    async fn update(&mut self, element: WithId<Company>) -> Result<WithId<Company>> {
        update(&self.pool, element).await
    }

    async fn delete(&mut self, id: Id<Company>) -> Result<()> {
        delete(&self.pool, id).await
    }

    async fn exists(&mut self, id: Id<Company>) -> Result<bool> {
        exists(&self.pool, id).await
    }
}

#[async_trait]
impl<'a> Repo<Company> for PgDatabaseTransaction<'a> {
    async fn get(&mut self, id: Id<Company>) -> Result<WithId<Company>> {
        get(&mut *self.tx, id).await
    }

    async fn get_all(&mut self) -> Result<Vec<WithId<Company>>> {
        get_all(&mut *self.tx).await
    }

    async fn insert(&mut self, element: Company) -> Result<WithId<Company>> {
        insert(&mut *self.tx, element).await
    }

    async fn update(&mut self, element: WithId<Company>) -> Result<WithId<Company>> {
        update(&mut *self.tx, element).await
    }

    async fn delete(&mut self, id: Id<Company>) -> Result<()> {
        delete(&mut *self.tx, id).await
    }

    async fn exists(&mut self, id: Id<Company>) -> Result<bool> {
        exists(&mut *self.tx, id).await
    }
}

// Company Repo

#[async_trait]
impl CompanyRepo for PgDatabaseAutocommit {
    async fn child_ids(&mut self, parents: &[Id<Company>]) -> Result<Vec<Id<Company>>> {
        child_ids(&self.pool, parents).await
    }
}

#[async_trait]
impl<'a> CompanyRepo for PgDatabaseTransaction<'a> {
    async fn child_ids(&mut self, parents: &[Id<Company>]) -> Result<Vec<Id<Company>>> {
        child_ids(&mut *self.tx, parents).await
    }
}
