use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Json, Router,
};
use charging::database::Database;
use model::{company::Company, station::Station, WithId};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{
        route_not_found, schema, HateoasResult, RouteErrorResponse, RouteResult,
        VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

use super::stations::station_hateoas;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/companies{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/schema", get(schema::<Company>))
        .route(
            "/:id",
            get(get_company::<D>)
                .put(update_company::<D>)
                .delete(delete_company::<D>),
        )
        .route("/:id/stations", get(get_owned_stations::<D>))
        .route("/", get(get_companies::<D>).post(create_company::<D>))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_companies<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithId<Company>>>> {
    client
        .get_companies()
        .await
        .map(|companies| {
            companies
                .into_iter()
                .map(|company| company_hateoas(company, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_company<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<Company>> {
    client
        .get_company(Id::new(id))
        .await
        .map(|company| company_hateoas(company, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn create_company<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(company): Json<Company>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<WithId<Company>>>)> {
    client
        .create_company(company)
        .await
        .map(|company| (StatusCode::CREATED, company_hateoas(company, base_url).json()))
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

async fn update_company<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(company): Json<Company>,
) -> HateoasResult<WithId<Company>> {
    client
        .update_company(WithId::new(Id::new(id), company))
        .await
        .map(|company| company_hateoas(company, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::PUT)
                .with_uri(original_uri.path())
        })
}

async fn delete_company<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client }): State<WebState<D>>,
) -> RouteResult<StatusCode> {
    client
        .delete_company(Id::new(id))
        .await
        .map(|_| StatusCode::OK)
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::DELETE)
                .with_uri(original_uri.path())
        })
}

/// Stations of the company and of all companies below it.
async fn get_owned_stations<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithId<Station>>>> {
    client
        .stations_owned_by(Id::new(id))
        .await
        .map(|stations| {
            stations
                .into_iter()
                .map(|station| station_hateoas(station, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

pub(crate) fn company_hateoas(
    company: WithId<Company>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<Company>> {
    let id = company.id;
    let parent_id = company.content.parent_id;
    hateoas::Response::builder(company, base_url)
        .link("self", resource!("/{}", id))
        .link("stations", resource!("/{}/stations", id))
        .link_option("parent", parent_id.map(|parent| resource!("/{}", parent)))
        .build()
}
