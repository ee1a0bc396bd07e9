use crate::error::{CatalogError, ErrorBody};
use crate::query::UniversityQueryParams;
use crate::{Catalog, Comparison, UniversityPage};
use axum::Json;
use axum::extract::{Query, State};
use campus_derive::{api_handler, api_model};
use campus_kernel::domain::constants::CATALOG_TAG;
use campus_kernel::server::ApiState;
use chrono::{Datelike, Utc};

#[api_model(deny_unknown_fields = false)]
#[derive(Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompareParams {
    /// Two comma-separated record ids.
    pub ids: Option<String>,
}

fn current_year() -> i32 {
    Utc::now().year()
}

#[api_handler(
    get,
    path = "/api/universities",
    params(UniversityQueryParams),
    responses(
        (status = OK, description = "One page of matching universities", body = UniversityPage),
        (status = BAD_REQUEST, description = "Unknown sort key", body = ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Store failure", body = ErrorBody),
    ),
    tag = CATALOG_TAG,
)]
pub(crate) async fn list_universities(
    State(state): State<ApiState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<UniversityPage>, CatalogError> {
    let params = UniversityQueryParams::from_pairs(pairs)?;
    let catalog = state.try_get_slice::<Catalog>()?;
    Ok(Json(catalog.search(&params, current_year()).await?))
}

#[api_handler(
    get,
    path = "/api/universities/compare",
    params(CompareParams),
    responses(
        (status = OK, description = "Side-by-side comparison", body = Comparison),
        (status = BAD_REQUEST, description = "Not exactly two distinct ids", body = ErrorBody),
        (status = NOT_FOUND, description = "A university does not exist", body = ErrorBody),
    ),
    tag = CATALOG_TAG,
)]
pub(crate) async fn compare_universities(
    State(state): State<ApiState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Comparison>, CatalogError> {
    let catalog = state.try_get_slice::<Catalog>()?;
    let ids =
        pairs.into_iter().find(|(key, _)| key == "ids").map(|(_, ids)| ids).unwrap_or_default();
    Ok(Json(catalog.compare(&ids, current_year()).await?))
}
