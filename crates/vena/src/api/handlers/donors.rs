use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use axum_extra::extract::{Query, WithRejection};
use libvena::prelude::*;
use tracing::instrument;
use validator::Validate;

use crate::api::{
  AppState,
  dto::{CompatibleDonorsParams, DonorListParams, DonorMatchParams},
  errors::AppError,
  middlewares::json_rejection::TypedJson,
};

pub async fn list_donors<D: DonorStore, R: RequestStore>(
  State(state): State<AppState<D, R>>,
  WithRejection(Query(params), _): WithRejection<Query<DonorListParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
  params.validate()?;

  let filter = DonorFilter {
    blood_group: params.blood_group,
    city: params.city,
    limit: params.limit,
    offset: params.offset,
  };

  Ok(Json(state.vena.donors(&filter).await?))
}

pub async fn create_donor<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>, TypedJson(donor): TypedJson<NewDonor>) -> Result<impl IntoResponse, AppError> {
  Ok((StatusCode::CREATED, Json(state.vena.create_donor(donor).await?)))
}

pub async fn get_donor<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>, Path(id): Path<i64>) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.donor(id).await?))
}

pub async fn update_donor<D: DonorStore, R: RequestStore>(
  State(state): State<AppState<D, R>>,
  Path(id): Path<i64>,
  TypedJson(patch): TypedJson<DonorPatch>,
) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.update_donor(id, patch).await?))
}

pub async fn delete_donor<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>, Path(id): Path<i64>) -> Result<impl IntoResponse, AppError> {
  state.vena.delete_donor(id).await?;

  Ok(StatusCode::NO_CONTENT)
}

/// Blood requests the donor can serve, most urgent and best scored first.
#[instrument(skip_all)]
pub async fn donor_matches<D: DonorStore, R: RequestStore>(
  State(state): State<AppState<D, R>>,
  Path(id): Path<i64>,
  WithRejection(Query(params), _): WithRejection<Query<DonorMatchParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
  params.validate()?;

  let matches = state.vena.find_requests_for_donor_by_id(id, params.city_exact_match, params.active_only, params.limit).await?;

  Ok(Json(matches))
}

/// Donors whose blood serves the given recipient group, optionally narrowed
/// to one city.
pub async fn search_compatible_donors<D: DonorStore, R: RequestStore>(
  State(state): State<AppState<D, R>>,
  WithRejection(Query(params), _): WithRejection<Query<CompatibleDonorsParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
  params.validate()?;

  let donors = state.vena.compatible_donors(&params.blood_group, params.city.as_deref(), params.limit).await?;

  Ok(Json(donors))
}

pub async fn donor_statistics<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.donor_statistics().await?))
}
