use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::{Query, WithRejection};
use libvena::prelude::*;
use tracing::instrument;

use crate::api::{AppState, dto::CompatibilityParams, errors::AppError};

/// System-wide matching potential, recomputed on every call.
#[instrument(skip_all)]
pub async fn matching_statistics<D: DonorStore, R: RequestStore>(State(state): State<AppState<D, R>>) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.matching_statistics().await?))
}

/// Who a blood group can receive from and donate to.
pub async fn compatibility_info<D: DonorStore, R: RequestStore>(
  State(state): State<AppState<D, R>>,
  WithRejection(Query(params), _): WithRejection<Query<CompatibilityParams>, AppError>,
) -> Result<impl IntoResponse, AppError> {
  Ok(Json(state.vena.compatibility_info(&params.blood_group)?))
}
