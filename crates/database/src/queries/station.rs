use charging::database::Result;
use model::{
    company::Company,
    station::{SearchArea, Station},
    WithId,
};
use sqlx::{Executor, Postgres};
use utility::{
    id::{Id, IdWrapper},
    let_also::LetAlso,
};

use crate::data_model::{station::StationRow, with_id, with_ids};

use super::{convert_error, expect_affected};

pub async fn get<'c, E>(executor: E, id: Id<Station>) -> Result<WithId<Station>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, latitude, longitude, company_id
        FROM stations
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: StationRow| with_id(row))
    .map_err(convert_error)
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<Station>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, latitude, longitude, company_id
        FROM stations
        ORDER BY id;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|stations: Vec<StationRow>| Ok(with_ids(stations)))
}

pub async fn insert<'c, E>(executor: E, station: Station) -> Result<WithId<Station>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO stations(name, latitude, longitude, company_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, latitude, longitude, company_id;
        ",
    )
    .bind(&station.name)
    .bind(station.latitude)
    .bind(station.longitude)
    .bind(station.company_id.raw())
    .fetch_one(executor)
    .await
    .map(|row: StationRow| with_id(row))
    .map_err(convert_error)
}

pub async fn update<'c, E>(
    executor: E,
    station: WithId<Station>,
) -> Result<WithId<Station>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE stations
        SET name = $2, latitude = $3, longitude = $4, company_id = $5
        WHERE id = $1
        RETURNING id, name, latitude, longitude, company_id;
        ",
    )
    .bind(station.id.raw())
    .bind(&station.content.name)
    .bind(station.content.latitude)
    .bind(station.content.longitude)
    .bind(station.content.company_id.raw())
    .fetch_one(executor)
    .await
    .map(|row: StationRow| with_id(row))
    .map_err(convert_error)
}

pub async fn delete<'c, E>(executor: E, id: Id<Station>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM stations WHERE id = $1;")
        .bind(id.raw())
        .execute(executor)
        .await
        .let_owned(expect_affected)
}

pub async fn exists<'c, E>(executor: E, id: Id<Station>) -> Result<bool>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM stations WHERE id = $1);")
        .bind(id.raw())
        .fetch_one(executor)
        .await
        .map_err(convert_error)
}

/// Stations inside the bounding box of the search circle. Without a usable
/// box (poles, antimeridian) every station is a candidate.
pub async fn radius_candidates<'c, E>(
    executor: E,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> Result<Vec<WithId<Station>>>
where
    E: Executor<'c, Database = Postgres>,
{
    let area = SearchArea::new(latitude, longitude, radius_km);
    let rows: std::result::Result<Vec<StationRow>, sqlx::Error> = match area.bounding_box() {
        Some(bbox) => {
            sqlx::query_as(
                "
                SELECT id, name, latitude, longitude, company_id
                FROM stations
                WHERE
                    latitude BETWEEN $1 AND $2
                    AND longitude BETWEEN $3 AND $4;
                ",
            )
            .bind(bbox.min_latitude)
            .bind(bbox.max_latitude)
            .bind(bbox.min_longitude)
            .bind(bbox.max_longitude)
            .fetch_all(executor)
            .await
        }
        None => {
            sqlx::query_as(
                "
                SELECT id, name, latitude, longitude, company_id
                FROM stations;
                ",
            )
            .fetch_all(executor)
            .await
        }
    };
    rows.map_err(convert_error)?
        .let_owned(|stations| Ok(with_ids(stations)))
}

pub async fn get_by_companies<'c, E>(
    executor: E,
    companies: &[Id<Company>],
) -> Result<Vec<WithId<Station>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, latitude, longitude, company_id
        FROM stations
        WHERE company_id = ANY($1)
        ORDER BY id;
        ",
    )
    .bind(companies.raw())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|stations: Vec<StationRow>| Ok(with_ids(stations)))
}
