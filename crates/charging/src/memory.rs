//! In-memory implementation of [`Database`] for tests and local development.
//!
//! Mirrors the behaviour of the relational schema: references are checked on
//! write, and deleting a company cascades to its child companies and to the
//! stations of all of them. Transactions lock the whole store until they are
//! committed or dropped.

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use model::{
    company::Company,
    station::{SearchArea, Station},
    WithId,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use utility::id::{Id, IdWrapper};

use crate::database::{
    CompanyRepo, Database, DatabaseAutocommit, DatabaseError, DatabaseTransaction,
    Repo, Result, StationRepo,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    companies: BTreeMap<i64, Company>,
    stations: BTreeMap<i64, Station>,
    last_company_id: i64,
    last_station_id: i64,
}

impl Tables {
    fn company(&self, id: Id<Company>) -> Result<WithId<Company>> {
        self.companies
            .get(&id.raw())
            .cloned()
            .map(|company| WithId::new(id, company))
            .ok_or(DatabaseError::NotFound)
    }

    fn all_companies(&self) -> Vec<WithId<Company>> {
        self.companies
            .iter()
            .map(|(id, company)| WithId::new(Id::new(*id), company.clone()))
            .collect()
    }

    fn check_parent(&self, company: &Company) -> Result<()> {
        match company.parent_id {
            Some(parent) if !self.companies.contains_key(&parent.raw()) => {
                Err(DatabaseError::MissingReference)
            }
            _ => Ok(()),
        }
    }

    fn insert_company(&mut self, company: Company) -> Result<WithId<Company>> {
        self.check_parent(&company)?;
        self.last_company_id += 1;
        let id = self.last_company_id;
        self.companies.insert(id, company.clone());
        Ok(WithId::new(Id::new(id), company))
    }

    fn update_company(&mut self, company: WithId<Company>) -> Result<WithId<Company>> {
        if !self.companies.contains_key(&company.id.raw()) {
            return Err(DatabaseError::NotFound);
        }
        self.check_parent(&company.content)?;
        self.companies
            .insert(company.id.raw(), company.content.clone());
        Ok(company)
    }

    fn delete_company(&mut self, id: Id<Company>) -> Result<()> {
        if !self.companies.contains_key(&id.raw()) {
            return Err(DatabaseError::NotFound);
        }
        // cascade
        let mut doomed = HashSet::from([id.raw()]);
        let mut worklist = vec![id.raw()];
        while let Some(parent) = worklist.pop() {
            for (child, company) in &self.companies {
                if company.parent_id.raw() == Some(parent) && doomed.insert(*child) {
                    worklist.push(*child);
                }
            }
        }
        self.companies.retain(|id, _| !doomed.contains(id));
        self.stations
            .retain(|_, station| !doomed.contains(&station.company_id.raw()));
        Ok(())
    }

    fn child_ids(&self, parents: &[Id<Company>]) -> Vec<Id<Company>> {
        let parents = parents.raw();
        self.companies
            .iter()
            .filter(|(_, company)| {
                company
                    .parent_id
                    .is_some_and(|parent| parents.contains(&parent.raw()))
            })
            .map(|(id, _)| Id::new(*id))
            .collect()
    }

    fn station(&self, id: Id<Station>) -> Result<WithId<Station>> {
        self.stations
            .get(&id.raw())
            .cloned()
            .map(|station| WithId::new(id, station))
            .ok_or(DatabaseError::NotFound)
    }

    fn stations_where<F>(&self, predicate: F) -> Vec<WithId<Station>>
    where
        F: Fn(&Station) -> bool,
    {
        self.stations
            .iter()
            .filter(|(_, station)| predicate(station))
            .map(|(id, station)| WithId::new(Id::new(*id), station.clone()))
            .collect()
    }

    fn check_owner(&self, station: &Station) -> Result<()> {
        if self.companies.contains_key(&station.company_id.raw()) {
            Ok(())
        } else {
            Err(DatabaseError::MissingReference)
        }
    }

    fn insert_station(&mut self, station: Station) -> Result<WithId<Station>> {
        self.check_owner(&station)?;
        self.last_station_id += 1;
        let id = self.last_station_id;
        self.stations.insert(id, station.clone());
        Ok(WithId::new(Id::new(id), station))
    }

    fn update_station(&mut self, station: WithId<Station>) -> Result<WithId<Station>> {
        if !self.stations.contains_key(&station.id.raw()) {
            return Err(DatabaseError::NotFound);
        }
        self.check_owner(&station.content)?;
        self.stations.insert(station.id.raw(), station.content.clone());
        Ok(station)
    }

    fn delete_station(&mut self, id: Id<Station>) -> Result<()> {
        self.stations
            .remove(&id.raw())
            .map(|_| ())
            .ok_or(DatabaseError::NotFound)
    }

    fn radius_candidates(&self, area: SearchArea) -> Vec<WithId<Station>> {
        match area.bounding_box() {
            Some(bbox) => self.stations_where(|station| {
                bbox.contains(station.latitude, station.longitude)
            }),
            None => self.stations_where(|_| true),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryAutocommit {
    tables: Arc<Mutex<Tables>>,
}

impl DatabaseAutocommit for MemoryAutocommit {}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl DatabaseTransaction for MemoryTransaction {
    async fn commit(self) -> Result<()> {
        let MemoryTransaction { mut guard, working } = self;
        *guard = working;
        Ok(())
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    type Transaction = MemoryTransaction;
    type Autocommit = MemoryAutocommit;

    async fn transaction(&self) -> Result<Self::Transaction> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTransaction { guard, working })
    }

    fn auto(&self) -> Self::Autocommit {
        MemoryAutocommit {
            tables: self.tables.clone(),
        }
    }
}

/// Implements all repos for a handle, given how to reach its tables.
macro_rules! memory_repos {
    ($handle:ty, $this:ident => $tables:expr) => {
        #[async_trait]
        impl Repo<Company> for $handle {
            async fn get(&mut self, id: Id<Company>) -> Result<WithId<Company>> {
                let $this = self;
                $tables.company(id)
            }

            async fn get_all(&mut self) -> Result<Vec<WithId<Company>>> {
                let $this = self;
                Ok($tables.all_companies())
            }

            async fn insert(&mut self, element: Company) -> Result<WithId<Company>> {
                let $this = self;
                $tables.insert_company(element)
            }

            async fn update(
                &mut self,
                element: WithId<Company>,
            ) -> Result<WithId<Company>> {
                let $this = self;
                $tables.update_company(element)
            }

            async fn delete(&mut self, id: Id<Company>) -> Result<()> {
                let $this = self;
                $tables.delete_company(id)
            }

            async fn exists(&mut self, id: Id<Company>) -> Result<bool> {
                let $this = self;
                Ok($tables.companies.contains_key(&id.raw()))
            }
        }

        #[async_trait]
        impl CompanyRepo for $handle {
            async fn child_ids(
                &mut self,
                parents: &[Id<Company>],
            ) -> Result<Vec<Id<Company>>> {
                let $this = self;
                Ok($tables.child_ids(parents))
            }
        }

        #[async_trait]
        impl Repo<Station> for $handle {
            async fn get(&mut self, id: Id<Station>) -> Result<WithId<Station>> {
                let $this = self;
                $tables.station(id)
            }

            async fn get_all(&mut self) -> Result<Vec<WithId<Station>>> {
                let $this = self;
                Ok($tables.stations_where(|_| true))
            }

            async fn insert(&mut self, element: Station) -> Result<WithId<Station>> {
                let $this = self;
                $tables.insert_station(element)
            }

            async fn update(
                &mut self,
                element: WithId<Station>,
            ) -> Result<WithId<Station>> {
                let $this = self;
                $tables.update_station(element)
            }

            async fn delete(&mut self, id: Id<Station>) -> Result<()> {
                let $this = self;
                $tables.delete_station(id)
            }

            async fn exists(&mut self, id: Id<Station>) -> Result<bool> {
                let $this = self;
                Ok($tables.stations.contains_key(&id.raw()))
            }
        }

        #[async_trait]
        impl StationRepo for $handle {
            async fn radius_candidates(
                &mut self,
                latitude: f64,
                longitude: f64,
                radius_km: f64,
            ) -> Result<Vec<WithId<Station>>> {
                let $this = self;
                let area = SearchArea::new(latitude, longitude, radius_km);
                Ok($tables.radius_candidates(area))
            }

            async fn get_by_companies(
                &mut self,
                companies: &[Id<Company>],
            ) -> Result<Vec<WithId<Station>>> {
                let $this = self;
                Ok($tables.stations_where(|station| companies.contains(&station.company_id)))
            }
        }
    };
}

memory_repos!(MemoryAutocommit, this => this.tables.lock().await);
memory_repos!(MemoryTransaction, this => this.working);

#[cfg(test)]
mod tests {
    use super::*;

    async fn company(
        database: &MemoryDatabase,
        name: &str,
        parent: Option<&WithId<Company>>,
    ) -> WithId<Company> {
        database
            .auto()
            .insert(Company::new(name, parent.map(|parent| parent.id)))
            .await
            .unwrap()
    }

    async fn station(database: &MemoryDatabase, owner: &WithId<Company>) -> WithId<Station> {
        database
            .auto()
            .insert(Station::new("S", 0.0, 0.0, owner.id))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn ids_are_generated_in_order() {
        let database = MemoryDatabase::new();
        let first = company(&database, "A", None).await;
        let second = company(&database, "B", Some(&first)).await;
        assert_eq!(first.id.raw(), 1);
        assert_eq!(second.id.raw(), 2);
        assert_eq!(
            Repo::<Company>::get(&mut database.auto(), second.id).await.unwrap(),
            second
        );
    }

    #[tokio::test]
    async fn references_are_checked() {
        let database = MemoryDatabase::new();
        let result = database
            .auto()
            .insert(Company::new("Orphan", Some(Id::new(9))))
            .await;
        assert!(matches!(result, Err(DatabaseError::MissingReference)));

        let result = database
            .auto()
            .insert(Station::new("S", 0.0, 0.0, Id::new(9)))
            .await;
        assert!(matches!(result, Err(DatabaseError::MissingReference)));
    }

    #[tokio::test]
    async fn deleting_company_cascades() {
        let database = MemoryDatabase::new();
        let root = company(&database, "Root", None).await;
        let child = company(&database, "Child", Some(&root)).await;
        let grandchild = company(&database, "Grandchild", Some(&child)).await;
        let other = company(&database, "Other", None).await;
        station(&database, &grandchild).await;
        let kept = station(&database, &other).await;

        database.auto().delete(child.id).await.unwrap();

        let mut auto = database.auto();
        let companies = Repo::<Company>::get_all(&mut auto).await.unwrap();
        assert_eq!(
            companies.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![root.id, other.id]
        );
        let stations = Repo::<Station>::get_all(&mut auto).await.unwrap();
        assert_eq!(stations, vec![kept]);
    }

    #[tokio::test]
    async fn deleting_missing_rows_is_not_found() {
        let database = MemoryDatabase::new();
        let result = database.auto().delete(Id::<Company>::new(1)).await;
        assert!(matches!(result, Err(DatabaseError::NotFound)));
        let result = database.auto().delete(Id::<Station>::new(1)).await;
        assert!(matches!(result, Err(DatabaseError::NotFound)));
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let database = MemoryDatabase::new();
        {
            let mut tx = database.transaction().await.unwrap();
            tx.insert(Company::new("Temporary", None)).await.unwrap();
        }
        let mut tx = database.transaction().await.unwrap();
        let created = tx.insert(Company::new("Kept", None)).await.unwrap();
        tx.commit().await.unwrap();

        let companies = Repo::<Company>::get_all(&mut database.auto()).await.unwrap();
        assert_eq!(companies, vec![created]);
    }

    #[tokio::test]
    async fn radius_candidates_cover_the_circle() {
        let database = MemoryDatabase::new();
        let owner = company(&database, "Owner", None).await;
        let mut auto = database.auto();
        let near = auto
            .insert(Station::new("Near", 0.5, 0.5, owner.id))
            .await
            .unwrap();
        auto.insert(Station::new("Far", 40.0, 40.0, owner.id))
            .await
            .unwrap();

        let candidates = auto.radius_candidates(0.0, 0.0, 100.0).await.unwrap();
        assert_eq!(candidates, vec![near]);

        // no bounding box around the pole, everything is a candidate
        let candidates = auto.radius_candidates(89.99, 0.0, 100.0).await.unwrap();
        assert_eq!(candidates.len(), 2);
    }
}
