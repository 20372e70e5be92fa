mod compat;
mod error;
mod matching;
mod model;
mod stats;
mod store;
mod vena;

pub mod scoring;

pub mod prelude {
  pub use crate::compat::{CompatibilityDetails, CompatibilityInfo, CompatibilityMap};
  pub use crate::error::VenaError;
  pub use crate::model::{
    BloodGroup, BloodRequest, BloodRequestPatch, Donor, DonorMatch, DonorPatch, DonorSummary, MatchDetails, NewBloodRequest, NewDonor, RequestMatch, RequestStatus, RequestSummary, Urgency,
  };
  pub use crate::scoring::calculate_match_score;
  pub use crate::stats::{BloodGroupBreakdown, DonorStatistics, MatchingStatistics, RequestStatistics, StatusDistribution, UrgencyBreakdown};
  pub use crate::store::{
    DonorFilter, DonorStore, RequestFilter, RequestStore,
    memory::{MemoryDonorStore, MemoryRequestStore},
    mock::FailingStore,
  };
  pub use crate::vena::Vena;
}
