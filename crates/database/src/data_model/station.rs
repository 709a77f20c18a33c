use super::DatabaseRow;
use crate::{
    queries::station::{
        delete, exists, get, get_all, get_by_companies, insert, radius_candidates,
        update,
    },
    PgDatabaseAutocommit, PgDatabaseTransaction,
};
use async_trait::async_trait;
use charging::database::{Repo, Result, StationRepo};
use model::{company::Company, station::Station, WithId};
use sqlx::prelude::FromRow;
use utility::id::Id;

#[derive(Debug, Clone, FromRow)]
pub struct StationRow {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub company_id: i64,
}

impl DatabaseRow for StationRow {
    type Model = Station;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        Station {
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            company_id: Id::new(self.company_id),
        }
    }
}

// Repo

#[async_trait]
impl Repo<Station> for PgDatabaseAutocommit {
    async fn get(&mut self, id: Id<Station>) -> Result<WithId<Station>> {
        get(&self.pool, id).await
    }

    async fn get_all(&mut self) -> Result<Vec<WithId<Station>>> {
        get_all(&self.pool).await
    }

    async fn insert(&mut self, element: Station) -> Result<WithId<Station>> {
        insert(&self.pool, element).await
    }

    async fn update(&mut self, element: WithId<Station>) -> Result<WithId<Station>> {
        update(&self.pool, element).await
    }

    async fn delete(&mut self, id: Id<Station>) -> Result<()> {
        delete(&self.pool, id).await
    }

    async fn exists(&mut self, id: Id<Station>) -> Result<bool> {
        exists(&self.pool, id).await
    }
}

#[async_trait]
impl<'a> Repo<Station> for PgDatabaseTransaction<'a> {
    async fn get(&mut self, id: Id<Station>) -> Result<WithId<Station>> {
        get(&mut *self.tx, id).await
    }

    async fn get_all(&mut self) -> Result<Vec<WithId<Station>>> {
        get_all(&mut *self.tx).await
    }

    async fn insert(&mut self, element: Station) -> Result<WithId<Station>> {
        insert(&mut *self.tx, element).await
    }

    async fn update(&mut self, element: WithId<Station>) -> Result<WithId<Station>> {
        update(&mut *self.tx, element).await
    }

    async fn delete(&mut self, id: Id<Station>) -> Result<()> {
        delete(&mut *self.tx, id).await
    }

    async fn exists(&mut self, id: Id<Station>) -> Result<bool> {
        exists(&mut *self.tx, id).await
    }
}

// Station Repo

#[async_trait]
impl StationRepo for PgDatabaseAutocommit {
    async fn radius_candidates(
        &mut self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<WithId<Station>>> {
        radius_candidates(&self.pool, latitude, longitude, radius_km).await
    }

    async fn get_by_companies(
        &mut self,
        companies: &[Id<Company>],
    ) -> Result<Vec<WithId<Station>>> {
        get_by_companies(&self.pool, companies).await
    }
}

#[async_trait]
impl<'a> StationRepo for PgDatabaseTransaction<'a> {
    async fn radius_candidates(
        &mut self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<WithId<Station>>> {
        radius_candidates(&mut *self.tx, latitude, longitude, radius_km).await
    }

    async fn get_by_companies(
        &mut self,
        companies: &[Id<Company>],
    ) -> Result<Vec<WithId<Station>>> {
        get_by_companies(&mut *self.tx, companies).await
    }
}
