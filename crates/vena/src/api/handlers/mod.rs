mod donors;
mod matching;
mod requests;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use libvena::prelude::*;

use crate::api::{AppState, errors::AppError};

pub(super) use self::donors::{create_donor, delete_donor, donor_matches, donor_statistics, get_donor, list_donors, search_compatible_donors, update_donor};
pub(super) use self::matching::{compatibility_info, matching_statistics};
pub(super) use self::requests::{
  active_requests, create_request, critical_requests, delete_request, fulfill_request, get_request, list_requests, request_matches, request_statistics, update_request,
};

pub async fn not_found() -> impl IntoResponse {
  AppError::ResourceNotFound("resource not found".to_string())
}

pub async fn healthz() -> StatusCode {
  StatusCode::OK
}

pub async fn readyz<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>) -> Result<impl IntoResponse, AppError> {
  match state.vena.health().await {
    Ok(true) => Ok(StatusCode::OK),
    _ => Ok(StatusCode::SERVICE_UNAVAILABLE),
  }
}

pub async fn prometheus<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>) -> Result<impl IntoResponse, AppError> {
  match &state.prometheus {
    Some(handle) => Ok(handle.render()),
    None => Err(AppError::ResourceNotFound("metrics are not enabled".to_string())),
  }
}
