use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Json, Router,
};
use charging::database::Database;
use model::{
    station::{SearchArea, Station},
    WithDistance, WithId,
};
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

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/stations{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/schema", get(schema::<Station>))
        .route(
            "/:id",
            get(get_station::<D>)
                .put(update_station::<D>)
                .delete(delete_station::<D>),
        )
        .route("/", get(search_stations::<D>).post(create_station::<D>))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// `?latitude=..&longitude=..&radiusKm=..`, nearest station first.
async fn search_stations<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState<D>>,
    Query(area): Query<SearchArea>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<WithId<Station>>>>> {
    client
        .search_stations(area)
        .await
        .map(|stations| {
            stations
                .into_iter()
                .map(|station| station_with_distance_hateoas(station, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_station<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<Station>> {
    client
        .get_station(Id::new(id))
        .await
        .map(|station| station_hateoas(station, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn create_station<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(station): Json<Station>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<WithId<Station>>>)> {
    client
        .create_station(station)
        .await
        .map(|station| (StatusCode::CREATED, station_hateoas(station, base_url).json()))
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

async fn update_station<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client }): State<WebState<D>>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(station): Json<Station>,
) -> HateoasResult<WithId<Station>> {
    client
        .update_station(WithId::new(Id::new(id), station))
        .await
        .map(|station| station_hateoas(station, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::PUT)
                .with_uri(original_uri.path())
        })
}

async fn delete_station<D: Database>(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<i64>,
    State(WebState { client }): State<WebState<D>>,
) -> RouteResult<StatusCode> {
    client
        .delete_station(Id::new(id))
        .await
        .map(|_| StatusCode::OK)
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::DELETE)
                .with_uri(original_uri.path())
        })
}

pub(crate) fn station_hateoas(
    station: WithId<Station>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<Station>> {
    let id = station.id;
    let company_id = station.content.company_id;
    let nearby = nearby_resource(&station.content);
    hateoas::Response::builder(station, base_url)
        .link("self", resource!("/{}", id))
        .link("company", super::companies::resource!("/{}", company_id))
        .link("nearby", nearby)
        .build()
}

fn station_with_distance_hateoas(
    station: WithDistance<WithId<Station>>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<WithId<Station>>> {
    let id = station.content.id;
    let company_id = station.content.content.company_id;
    hateoas::Response::builder(station, base_url)
        .link("self", resource!("/{}", id))
        .link("company", super::companies::resource!("/{}", company_id))
        .build()
}

fn nearby_resource(station: &Station) -> String {
    resource!(
        "?latitude={}&longitude={}&radiusKm=1",
        station.latitude,
        station.longitude
    )
}
