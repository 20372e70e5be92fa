use libvena::prelude::*;
use serde::Deserialize;
use serde_inline_default::serde_inline_default;
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct DonorListParams {
  #[serde(default)]
  pub blood_group: Option<BloodGroup>,
  #[serde(default)]
  pub city: Option<String>,
  #[serde(default)]
  #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
  pub limit: Option<usize>,
  #[serde(default)]
  pub offset: Option<usize>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct RequestListParams {
  #[serde(default)]
  pub blood_group: Option<BloodGroup>,
  #[serde(default)]
  pub city: Option<String>,
  #[serde(default)]
  pub status: Option<RequestStatus>,
  #[serde(default)]
  pub urgency: Option<Urgency>,
  #[serde(default)]
  #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
  pub limit: Option<usize>,
  #[serde(default)]
  pub offset: Option<usize>,
}

/// Query parameters of the donor-to-requests matching endpoint.
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct DonorMatchParams {
  #[serde_inline_default(true)]
  pub city_exact_match: bool,
  #[serde_inline_default(true)]
  pub active_only: bool,
  #[serde(default)]
  #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
  pub limit: Option<usize>,
}

/// Query parameters of the request-to-donors matching endpoint.
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct RequestMatchParams {
  #[serde_inline_default(true)]
  pub city_exact_match: bool,
  #[serde(default)]
  #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
  pub limit: Option<usize>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct CompatibleDonorsParams {
  pub blood_group: String,
  #[serde(default)]
  pub city: Option<String>,
  #[serde(default)]
  #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
  pub limit: Option<usize>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct CompatibilityParams {
  pub blood_group: String,
}
