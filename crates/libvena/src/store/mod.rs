pub mod memory;
pub mod mock;

use crate::{
  error::VenaError,
  model::{BloodGroup, BloodRequest, BloodRequestPatch, Donor, DonorPatch, NewBloodRequest, NewDonor, RequestStatus, Urgency},
};

/// Data access contract for donor records. The engine only ever reads
/// through `get`/`list`/`count`; the mutating operations exist for the
/// service surface built on top of it.
#[allow(async_fn_in_trait)]
pub trait DonorStore: Clone + Send + Sync + 'static {
  fn health(&self) -> impl Future<Output = Result<bool, VenaError>> + Send;
  fn create(&self, donor: NewDonor) -> impl Future<Output = Result<Donor, VenaError>> + Send;
  fn get(&self, id: i64) -> impl Future<Output = Result<Option<Donor>, VenaError>> + Send;
  fn list(&self, filter: &DonorFilter) -> impl Future<Output = Result<Vec<Donor>, VenaError>> + Send;
  fn update(&self, id: i64, patch: DonorPatch) -> impl Future<Output = Result<Option<Donor>, VenaError>> + Send;
  fn delete(&self, id: i64) -> impl Future<Output = Result<bool, VenaError>> + Send;
  fn count(&self, filter: &DonorFilter) -> impl Future<Output = Result<usize, VenaError>> + Send;
}

/// Data access contract for blood request records.
#[allow(async_fn_in_trait)]
pub trait RequestStore: Clone + Send + Sync + 'static {
  fn health(&self) -> impl Future<Output = Result<bool, VenaError>> + Send;
  fn create(&self, request: NewBloodRequest) -> impl Future<Output = Result<BloodRequest, VenaError>> + Send;
  fn get(&self, id: i64) -> impl Future<Output = Result<Option<BloodRequest>, VenaError>> + Send;
  fn list(&self, filter: &RequestFilter) -> impl Future<Output = Result<Vec<BloodRequest>, VenaError>> + Send;
  fn update(&self, id: i64, patch: BloodRequestPatch) -> impl Future<Output = Result<Option<BloodRequest>, VenaError>> + Send;
  fn delete(&self, id: i64) -> impl Future<Output = Result<bool, VenaError>> + Send;
  fn count(&self, filter: &RequestFilter) -> impl Future<Output = Result<usize, VenaError>> + Send;
  fn fulfill(&self, id: i64) -> impl Future<Output = Result<Option<BloodRequest>, VenaError>> + Send;
}

/// Donor listing criteria. City comparison is case-insensitive, blood group
/// is exact.
#[derive(Clone, Debug, Default)]
pub struct DonorFilter {
  pub blood_group: Option<BloodGroup>,
  pub city: Option<String>,
  pub limit: Option<usize>,
  pub offset: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct RequestFilter {
  pub blood_group: Option<BloodGroup>,
  pub city: Option<String>,
  pub status: Option<RequestStatus>,
  pub urgency: Option<Urgency>,
  pub limit: Option<usize>,
  pub offset: Option<usize>,
}
