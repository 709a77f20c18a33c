use model::{
    company::Company,
    station::{SearchArea, Station},
    WithDistance, WithId,
};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    database::{Database, DatabaseTransaction, Repo, StationRepo},
    query,
    validation::{Validate, ValidationError},
    RequestError, RequestResult,
};

/// Entry point for all operations on the charging network. Every operation
/// validates its input and runs within a single transaction.
#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database + Send + Sync + Sized + 'static,
{
    pub database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }
}

fn missing_company(id: Id<Company>, role: &str) -> RequestError {
    RequestError::Unprocessable(format!("{} with id {} doesn't exist", role, id))
}

impl<D> Client<D>
where
    D: Database,
{
    pub async fn get_companies(&self) -> RequestResult<Vec<WithId<Company>>> {
        Ok(Repo::<Company>::get_all(&mut self.database.auto()).await?)
    }

    pub async fn get_company(&self, id: Id<Company>) -> RequestResult<WithId<Company>> {
        Ok(self.database.auto().get(id).await?)
    }

    pub async fn create_company(
        &self,
        company: Company,
    ) -> RequestResult<WithId<Company>> {
        company.validate()?;

        let mut tx = self.database.transaction().await?;
        if let Some(parent_id) = company.parent_id {
            if !tx.exists(parent_id).await? {
                return Err(missing_company(parent_id, "Parent company"));
            }
        }
        let company = tx.insert(company).await?;
        tx.commit().await?;

        log::info!("created company {} ({})", company.id, company.content.name);
        Ok(company)
    }

    /// Replaces name and parent of an existing company.
    ///
    /// The new parent must exist and must not be the company itself or one of
    /// its descendants, so updates never introduce a cycle.
    pub async fn update_company(
        &self,
        company: WithId<Company>,
    ) -> RequestResult<WithId<Company>> {
        company.validate()?;

        let mut tx = self.database.transaction().await?;
        if !tx.exists(company.id).await? {
            return Err(RequestError::NotFound);
        }
        if let Some(parent_id) = company.content.parent_id {
            if !tx.exists(parent_id).await? {
                return Err(missing_company(parent_id, "Parent company"));
            }
            let subtree = query::company_subtree(&mut tx, company.id).await?;
            if subtree.contains(&parent_id) {
                return Err(ValidationError::DescendantParent.into());
            }
        }
        let company = tx.update(company).await?;
        tx.commit().await?;

        log::info!("updated company {}", company.id);
        Ok(company)
    }

    /// Deletes a company together with all of its descendants and their stations.
    pub async fn delete_company(&self, id: Id<Company>) -> RequestResult<()> {
        self.database.auto().delete(id).await?;
        log::info!("deleted company {}", id);
        Ok(())
    }
}

impl<D> Client<D>
where
    D: Database,
{
    pub async fn get_station(&self, id: Id<Station>) -> RequestResult<WithId<Station>> {
        Ok(self.database.auto().get(id).await?)
    }

    pub async fn create_station(
        &self,
        station: Station,
    ) -> RequestResult<WithId<Station>> {
        station.validate()?;

        let mut tx = self.database.transaction().await?;
        if !tx.exists(station.company_id).await? {
            return Err(missing_company(station.company_id, "Company"));
        }
        let station = tx.insert(station).await?;
        tx.commit().await?;

        log::info!("created station {} ({})", station.id, station.content.name);
        Ok(station)
    }

    pub async fn update_station(
        &self,
        station: WithId<Station>,
    ) -> RequestResult<WithId<Station>> {
        station.validate()?;

        let mut tx = self.database.transaction().await?;
        if !tx.exists(station.id).await? {
            return Err(RequestError::NotFound);
        }
        if !tx.exists(station.content.company_id).await? {
            return Err(missing_company(station.content.company_id, "Company"));
        }
        let station = tx.update(station).await?;
        tx.commit().await?;

        log::info!("updated station {}", station.id);
        Ok(station)
    }

    pub async fn delete_station(&self, id: Id<Station>) -> RequestResult<()> {
        self.database.auto().delete(id).await?;
        log::info!("deleted station {}", id);
        Ok(())
    }

    /// All stations within the search area, nearest first.
    pub async fn search_stations(
        &self,
        area: SearchArea,
    ) -> RequestResult<Vec<WithDistance<WithId<Station>>>> {
        area.validate()?;

        self.database
            .auto()
            .radius_candidates(area.latitude, area.longitude, area.radius_km)
            .await?
            .let_owned(|candidates| Ok(query::within_radius(candidates, &area)))
    }

    /// All stations owned by the company or any of its descendants, ordered
    /// by id.
    pub async fn stations_owned_by(
        &self,
        company_id: Id<Company>,
    ) -> RequestResult<Vec<WithId<Station>>> {
        let mut tx = self.database.transaction().await?;
        if !tx.exists(company_id).await? {
            return Err(RequestError::NotFound);
        }
        let companies = query::company_subtree(&mut tx, company_id)
            .await?
            .into_iter()
            .collect::<Vec<_>>();
        let mut stations = tx.get_by_companies(&companies).await?;
        tx.commit().await?;

        stations.sort_by_key(|station| station.id);
        Ok(stations)
    }
}
