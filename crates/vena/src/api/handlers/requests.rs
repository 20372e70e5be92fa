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
  dto::{RequestListParams, RequestMatchParams},
  errors::AppError,
  middlewares::json_rejection::TypedJson,
};

pub async fn list_requests<D: DonorStore, R: RequestStore>(
  State(state): State<AppState<D, R>>,
  WithRejection(Query(params), _): WithRejection<Query<RequestListParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
  params.validate()?;

  let filter = RequestFilter {
    blood_group: params.blood_group,
    city: params.city,
    status: params.status,
    urgency: params.urgency,
    limit: params.limit,
    offset: params.offset,
  };

  Ok(Json(state.vena.requests(&filter).await?))
}

pub async fn create_request<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>, TypedJson(request): TypedJson<NewBloodRequest>) -> Result<impl IntoResponse, AppError> {
  Ok((StatusCode::CREATED, Json(state.vena.create_request(request).await?)))
}

pub async fn get_request<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>, Path(id): Path<i64>) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.request(id).await?))
}

pub async fn update_request<D: DonorStore, R: RequestStore>(
  State(state): State<AppState<D, R>>,
  Path(id): Path<i64>,
  TypedJson(patch): TypedJson<BloodRequestPatch>,
) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.update_request(id, patch).await?))
}

pub async fn delete_request<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>, Path(id): Path<i64>) -> Result<impl IntoResponse, AppError> {
  state.vena.delete_request(id).await?;

  Ok(StatusCode::NO_CONTENT)
}

pub async fn fulfill_request<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>, Path(id): Path<i64>) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.fulfill_request(id).await?))
}

pub async fn active_requests<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.active_requests().await?))
}

pub async fn critical_requests<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.critical_requests().await?))
}

/// Donors able to serve the request, best match first. A request that is no
/// longer active matches nothing.
#[instrument(skip_all)]
pub async fn request_matches<D: DonorStore, R: RequestStore>(
  State(state): State<AppState<D, R>>,
  Path(id): Path<i64>,
  WithRejection(Query(params), _): WithRejection<Query<RequestMatchParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
  params.validate()?;

  let matches = state.vena.find_matching_donors_by_request_id(id, params.city_exact_match, params.limit).await?;

  Ok(Json(matches))
}

pub async fn request_statistics<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.request_statistics().await?))
}
