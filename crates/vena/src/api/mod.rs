use axum::{
  Router,
  extract::Request,
  middleware,
  routing::{get, post},
};
use libvena::prelude::*;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use crate::api::config::Config;

pub mod config;
pub mod dto;
pub mod errors;

pub mod handlers;
mod middlewares;

#[derive(Clone)]
pub struct AppState<D: DonorStore, R: RequestStore> {
  pub config: Config,
  pub prometheus: Option<PrometheusHandle>,
  pub vena: Vena<D, R>,
}

pub fn routes<D: DonorStore, R: RequestStore>(config: &Config, vena: Vena<D, R>) -> anyhow::Result<Router> {
  let prometheus = match config.enable_prometheus {
    true => Some(crate::trace::build_prometheus()?),
    false => None,
  };

  let state = AppState {
    config: config.clone(),
    prometheus,
    vena,
  };

  Ok(
    Router::new()
      .route("/api/donors", get(handlers::list_donors).post(handlers::create_donor))
      .route("/api/donors/statistics", get(handlers::donor_statistics))
      .route("/api/donors/search/compatible", get(handlers::search_compatible_donors))
      .route("/api/donors/{id}", get(handlers::get_donor).put(handlers::update_donor).delete(handlers::delete_donor))
      .route("/api/donors/{id}/matches", get(handlers::donor_matches))
      .route("/api/requests", get(handlers::list_requests).post(handlers::create_request))
      .route("/api/requests/statistics", get(handlers::request_statistics))
      .route("/api/requests/filter/active", get(handlers::active_requests))
      .route("/api/requests/filter/critical", get(handlers::critical_requests))
      .route("/api/requests/{id}", get(handlers::get_request).put(handlers::update_request).delete(handlers::delete_request))
      .route("/api/requests/{id}/fulfill", post(handlers::fulfill_request))
      .route("/api/requests/{id}/matches", get(handlers::request_matches))
      .route("/api/matching/statistics", get(handlers::matching_statistics))
      .route("/api/matching/compatibility", get(handlers::compatibility_info))
      .fallback(handlers::not_found)
      .layer(middleware::from_fn(middlewares::metrics))
      .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| middlewares::create_request_span(req)))
      // The routes below will not go through the observability middlewares above
      .route("/healthz", get(handlers::healthz))
      .route("/readyz", get(handlers::readyz))
      .route("/metrics", get(handlers::prometheus))
      .layer(middleware::from_fn(middlewares::logging::api_logger))
      .layer(middleware::from_fn(middlewares::request_id))
      .with_state(state),
  )
}
