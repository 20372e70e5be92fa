#[derive(Debug, thiserror::Error)]
pub enum VenaError {
  #[error("invalid blood group: {0:?}")]
  InvalidBloodGroup(String),
  #[error("donor {0} not found")]
  DonorNotFound(i64),
  #[error("blood request {0} not found")]
  RequestNotFound(i64),
  #[error("blood request {0} is already fulfilled")]
  RequestFulfilled(i64),
  #[error("storage error: {0}")]
  StoreError(String),
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),
}
