use std::{error, fmt, result};

use async_trait::async_trait;
use model::{company::Company, station::Station, WithId};
use serde::Serialize;
use utility::id::{HasId, Id};

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    /// A row references another row which does not exist (anymore).
    MissingReference,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "row not found"),
            Self::MissingReference => write!(f, "referenced row does not exist"),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl error::Error for DatabaseError {}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait Repo<T>
where
    T: Serialize + HasId,
    <T as HasId>::IdType: fmt::Debug + Clone + Serialize,
{
    async fn get(&mut self, id: Id<T>) -> Result<WithId<T>>;
    async fn get_all(&mut self) -> Result<Vec<WithId<T>>>;
    async fn insert(&mut self, element: T) -> Result<WithId<T>>;
    async fn update(&mut self, element: WithId<T>) -> Result<WithId<T>>;
    /// Deletes the element and everything depending on it.
    async fn delete(&mut self, id: Id<T>) -> Result<()>;
    async fn exists(&mut self, id: Id<T>) -> Result<bool>;
}

#[async_trait]
pub trait CompanyRepo: Repo<Company> {
    /// Returns the ids of all companies whose parent is one of `parents`.
    async fn child_ids(
        &mut self,
        parents: &[Id<Company>],
    ) -> Result<Vec<Id<Company>>>;
}

#[async_trait]
pub trait StationRepo: Repo<Station> {
    /// Returns at least every station within `radius_km` of the given point.
    ///
    /// # WARNING
    ///
    /// Implementations may narrow the result at database level, but are
    /// required to return too many stations rather than omitting some. The
    /// exact distance filter is applied by the caller.
    async fn radius_candidates(
        &mut self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<WithId<Station>>>;

    async fn get_by_companies(
        &mut self,
        companies: &[Id<Company>],
    ) -> Result<Vec<WithId<Station>>>;
}

pub trait DatabaseOperations: CompanyRepo + StationRepo + Send {}

impl<T> DatabaseOperations for T where T: CompanyRepo + StationRepo + Send {}

#[async_trait]
pub trait DatabaseTransaction: DatabaseOperations {
    async fn commit(self) -> Result<()>;
}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// trait to implement a charging network database.
/// multiple concurrent accesses should be possible by e.g. cloning the database object.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized + 'static {
    type Transaction: DatabaseTransaction + Send;
    type Autocommit: DatabaseAutocommit + Send;

    /// Begins a transaction, which is rolled back if dropped without commit.
    async fn transaction(&self) -> Result<Self::Transaction>;

    fn auto(&self) -> Self::Autocommit;
}
