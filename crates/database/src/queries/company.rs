use charging::database::Result;
use model::{company::Company, WithId};
use sqlx::{Executor, Postgres};
use utility::{
    id::{Id, IdWrapper},
    let_also::LetAlso,
};

use crate::data_model::{company::CompanyRow, with_id, with_ids};

use super::{convert_error, expect_affected};

pub async fn get<'c, E>(executor: E, id: Id<Company>) -> Result<WithId<Company>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, parent_id
        FROM companies
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map(|row: CompanyRow| with_id(row))
    .map_err(convert_error)
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<Company>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, parent_id
        FROM companies
        ORDER BY id;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|companies: Vec<CompanyRow>| Ok(with_ids(companies)))
}

pub async fn insert<'c, E>(executor: E, company: Company) -> Result<WithId<Company>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO companies(name, parent_id)
        VALUES ($1, $2)
        RETURNING id, name, parent_id;
        ",
    )
    .bind(&company.name)
    .bind(company.parent_id.raw())
    .fetch_one(executor)
    .await
    .map(|row: CompanyRow| with_id(row))
    .map_err(convert_error)
}

pub async fn update<'c, E>(
    executor: E,
    company: WithId<Company>,
) -> Result<WithId<Company>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE companies
        SET name = $2, parent_id = $3
        WHERE id = $1
        RETURNING id, name, parent_id;
        ",
    )
    .bind(company.id.raw())
    .bind(&company.content.name)
    .bind(company.content.parent_id.raw())
    .fetch_one(executor)
    .await
    .map(|row: CompanyRow| with_id(row))
    .map_err(convert_error)
}

/// Child companies and their stations are removed by `ON DELETE CASCADE`.
pub async fn delete<'c, E>(executor: E, id: Id<Company>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM companies WHERE id = $1;")
        .bind(id.raw())
        .execute(executor)
        .await
        .let_owned(expect_affected)
}

pub async fn exists<'c, E>(executor: E, id: Id<Company>) -> Result<bool>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM companies WHERE id = $1);")
        .bind(id.raw())
        .fetch_one(executor)
        .await
        .map_err(convert_error)
}

pub async fn child_ids<'c, E>(
    executor: E,
    parents: &[Id<Company>],
) -> Result<Vec<Id<Company>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_scalar(
        "
        SELECT id
        FROM companies
        WHERE parent_id = ANY($1);
        ",
    )
    .bind(parents.raw())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|ids: Vec<i64>| Ok(ids.into_iter().map(Id::new).collect()))
}
