use std::{borrow::Cow, error::Error};

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use libvena::prelude::*;
use serde_json::json;
use tracing::*;
use validator::ValidationErrors;

/// Wire shape of every error response: status, message, optional details.
pub(crate) struct ApiError(pub StatusCode, pub String, pub Option<Vec<String>>);

#[derive(Debug, thiserror::Error)]
#[allow(dead_code)]
pub enum AppError {
  #[error("invalid blood group: {0:?}")]
  InvalidBloodGroup(String),
  #[error("{0}")]
  ResourceNotFound(String),
  #[error("{0}")]
  BadRequest(String),
  #[error("invalid query parameter")]
  InvalidQuery(#[from] axum_extra::extract::QueryRejection),
  #[error("request failed validation")]
  InvalidParams(#[from] ValidationErrors),
  #[error("storage error: {0}")]
  StoreError(String),
  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("server error, please check your logs for more information")]
  ServerError,
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}

impl From<VenaError> for AppError {
  fn from(value: VenaError) -> Self {
    match value {
      VenaError::InvalidBloodGroup(group) => AppError::InvalidBloodGroup(group),
      VenaError::DonorNotFound(_) | VenaError::RequestNotFound(_) => AppError::ResourceNotFound(value.to_string()),
      VenaError::RequestFulfilled(_) => AppError::BadRequest(value.to_string()),
      VenaError::StoreError(err) => AppError::StoreError(err),
      VenaError::OtherError(err) => AppError::OtherError(err),
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    error!(error = self.source(), "{}", self.to_string());

    ApiError::from(&self).into_response()
  }
}

impl From<&AppError> for ApiError {
  fn from(value: &AppError) -> Self {
    match value {
      AppError::InvalidBloodGroup(_) | AppError::BadRequest(_) => ApiError(StatusCode::BAD_REQUEST, value.to_string(), None),
      AppError::ResourceNotFound(_) => ApiError(StatusCode::NOT_FOUND, value.to_string(), None),
      AppError::InvalidQuery(err) => ApiError(StatusCode::BAD_REQUEST, value.to_string(), Some(vec![err.to_string()])),
      AppError::InvalidParams(errs) => ApiError(StatusCode::UNPROCESSABLE_ENTITY, value.to_string(), Some(validation_messages(errs))),
      AppError::StoreError(_) => ApiError(StatusCode::INTERNAL_SERVER_ERROR, value.to_string(), None),
      _ => ApiError(StatusCode::INTERNAL_SERVER_ERROR, value.to_string(), None),
    }
  }
}

pub(crate) fn validation_messages(errs: &ValidationErrors) -> Vec<String> {
  errs.field_errors().into_iter().flat_map(|(_, f)| f.clone()).filter_map(|f| f.message.map(Cow::into_owned)).collect()
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let payload = match self.2 {
      Some(details) => json!({
          "message": self.1.to_string(),
          "details": details,
      }),
      None => json!({
          "message": self.1.to_string(),
      }),
    };

    (self.0, Json(payload)).into_response()
  }
}
