use crate::{
  error::VenaError,
  model::{BloodRequest, BloodRequestPatch, Donor, DonorPatch, NewBloodRequest, NewDonor},
  store::{DonorFilter, DonorStore, RequestFilter, RequestStore},
};

/// A store whose every operation fails, for exercising error propagation.
/// Stands in for either collaborator.
#[derive(Clone, Copy, Debug, Default)]
pub struct FailingStore;

fn unavailable<T>() -> Result<T, VenaError> {
  Err(VenaError::StoreError("storage backend unavailable".to_string()))
}

impl DonorStore for FailingStore {
  async fn health(&self) -> Result<bool, VenaError> {
    Ok(false)
  }

  async fn create(&self, _: NewDonor) -> Result<Donor, VenaError> {
    unavailable()
  }

  async fn get(&self, _: i64) -> Result<Option<Donor>, VenaError> {
    unavailable()
  }

  async fn list(&self, _: &DonorFilter) -> Result<Vec<Donor>, VenaError> {
    unavailable()
  }

  async fn update(&self, _: i64, _: DonorPatch) -> Result<Option<Donor>, VenaError> {
    unavailable()
  }

  async fn delete(&self, _: i64) -> Result<bool, VenaError> {
    unavailable()
  }

  async fn count(&self, _: &DonorFilter) -> Result<usize, VenaError> {
    unavailable()
  }
}

impl RequestStore for FailingStore {
  async fn health(&self) -> Result<bool, VenaError> {
    Ok(false)
  }

  async fn create(&self, _: NewBloodRequest) -> Result<BloodRequest, VenaError> {
    unavailable()
  }

  async fn get(&self, _: i64) -> Result<Option<BloodRequest>, VenaError> {
    unavailable()
  }

  async fn list(&self, _: &RequestFilter) -> Result<Vec<BloodRequest>, VenaError> {
    unavailable()
  }

  async fn update(&self, _: i64, _: BloodRequestPatch) -> Result<Option<BloodRequest>, VenaError> {
    unavailable()
  }

  async fn delete(&self, _: i64) -> Result<bool, VenaError> {
    unavailable()
  }

  async fn count(&self, _: &RequestFilter) -> Result<usize, VenaError> {
    unavailable()
  }

  async fn fulfill(&self, _: i64) -> Result<Option<BloodRequest>, VenaError> {
    unavailable()
  }
}
