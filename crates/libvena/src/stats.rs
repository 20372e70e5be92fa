use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::Serialize;
use tracing::instrument;

use crate::{
  compat::CompatibilityMap,
  error::VenaError,
  matching::finder,
  model::{BloodGroup, RequestStatus, Urgency},
  store::{DonorFilter, DonorStore, RequestFilter, RequestStore},
};

/// System-wide matching potential. Always computed from scratch, there is no
/// cached aggregate anywhere.
#[derive(Clone, Debug, Serialize)]
pub struct MatchingStatistics {
  pub total_active_requests: usize,
  pub total_donors: usize,
  pub requests_with_potential_matches: usize,
  pub total_potential_matches: usize,
  /// Percentage of active requests with at least one potential donor, 0
  /// when there are no active requests.
  pub match_rate: f64,
  pub blood_group_breakdown: BTreeMap<BloodGroup, BloodGroupBreakdown>,
  pub urgency_breakdown: BTreeMap<Urgency, UrgencyBreakdown>,
  pub last_updated: Timestamp,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct BloodGroupBreakdown {
  pub active_requests: usize,
  pub available_donors: usize,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct UrgencyBreakdown {
  pub total_requests: usize,
  pub requests_with_matches: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct DonorStatistics {
  pub total_donors: usize,
  pub blood_group_distribution: BTreeMap<BloodGroup, usize>,
  pub city_distribution: BTreeMap<String, usize>,
  pub last_updated: Timestamp,
}

#[derive(Clone, Debug, Serialize)]
pub struct RequestStatistics {
  pub total_requests: usize,
  pub status_distribution: StatusDistribution,
  pub urgency_distribution: BTreeMap<Urgency, usize>,
  pub blood_group_distribution: BTreeMap<BloodGroup, usize>,
  pub city_distribution: BTreeMap<String, usize>,
  pub last_updated: Timestamp,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct StatusDistribution {
  pub active: usize,
  pub fulfilled: usize,
}

#[instrument(skip_all)]
pub(crate) async fn matching_statistics<D: DonorStore, R: RequestStore>(compat: &CompatibilityMap, donors: &D, requests: &R) -> Result<MatchingStatistics, VenaError> {
  let active = requests.list(&RequestFilter { status: Some(RequestStatus::Active), ..Default::default() }).await?;
  let all_donors = donors.list(&DonorFilter::default()).await?;

  let mut requests_with_potential_matches = 0usize;
  let mut total_potential_matches = 0usize;

  // One finder pass per active request, re-querying the donor store each
  // time.
  for request in &active {
    let matches = finder::donors_for_request(compat, donors, request, false, None).await?;

    if !matches.is_empty() {
      requests_with_potential_matches += 1;
      total_potential_matches += matches.len();
    }
  }

  let mut blood_group_breakdown = BTreeMap::new();

  for group in BloodGroup::ALL {
    blood_group_breakdown.insert(
      group,
      BloodGroupBreakdown {
        active_requests: active.iter().filter(|request| request.blood_group == group).count(),
        available_donors: all_donors.iter().filter(|donor| donor.blood_group == group).count(),
      },
    );
  }

  // The urgency pass reruns the finder per bucket instead of reusing the
  // counts above. Tables are community-scale, the extra reads are fine.
  let mut urgency_breakdown = BTreeMap::new();

  for urgency in Urgency::ALL {
    let bucket = active.iter().filter(|request| request.urgency == urgency).collect::<Vec<_>>();
    let mut requests_with_matches = 0usize;

    for request in &bucket {
      if !finder::donors_for_request(compat, donors, request, false, None).await?.is_empty() {
        requests_with_matches += 1;
      }
    }

    urgency_breakdown.insert(
      urgency,
      UrgencyBreakdown {
        total_requests: bucket.len(),
        requests_with_matches,
      },
    );
  }

  let match_rate = match active.len() {
    0 => 0.0,
    total => requests_with_potential_matches as f64 / total as f64 * 100.0,
  };

  tracing::debug!(active_requests = active.len(), donors = all_donors.len(), match_rate = match_rate, "computed matching statistics");

  Ok(MatchingStatistics {
    total_active_requests: active.len(),
    total_donors: all_donors.len(),
    requests_with_potential_matches,
    total_potential_matches,
    match_rate,
    blood_group_breakdown,
    urgency_breakdown,
    last_updated: Timestamp::now(),
  })
}

pub(crate) async fn donor_statistics<D: DonorStore>(donors: &D) -> Result<DonorStatistics, VenaError> {
  let total_donors = donors.count(&DonorFilter::default()).await?;

  let mut blood_group_distribution = BTreeMap::new();

  for group in BloodGroup::ALL {
    let count = donors.count(&DonorFilter { blood_group: Some(group), ..Default::default() }).await?;

    blood_group_distribution.insert(group, count);
  }

  let mut city_distribution = BTreeMap::<String, usize>::new();

  for donor in donors.list(&DonorFilter::default()).await? {
    *city_distribution.entry(donor.city).or_default() += 1;
  }

  Ok(DonorStatistics {
    total_donors,
    blood_group_distribution,
    city_distribution,
    last_updated: Timestamp::now(),
  })
}

pub(crate) async fn request_statistics<R: RequestStore>(requests: &R) -> Result<RequestStatistics, VenaError> {
  let total_requests = requests.count(&RequestFilter::default()).await?;

  let status_distribution = StatusDistribution {
    active: requests.count(&RequestFilter { status: Some(RequestStatus::Active), ..Default::default() }).await?,
    fulfilled: requests.count(&RequestFilter { status: Some(RequestStatus::Fulfilled), ..Default::default() }).await?,
  };

  let mut urgency_distribution = BTreeMap::new();

  for urgency in Urgency::ALL {
    let count = requests.count(&RequestFilter { urgency: Some(urgency), ..Default::default() }).await?;

    urgency_distribution.insert(urgency, count);
  }

  let mut blood_group_distribution = BTreeMap::new();

  for group in BloodGroup::ALL {
    let count = requests.count(&RequestFilter { blood_group: Some(group), ..Default::default() }).await?;

    blood_group_distribution.insert(group, count);
  }

  let mut city_distribution = BTreeMap::<String, usize>::new();

  for request in requests.list(&RequestFilter::default()).await? {
    *city_distribution.entry(request.city).or_default() += 1;
  }

  Ok(RequestStatistics {
    total_requests,
    status_distribution,
    urgency_distribution,
    blood_group_distribution,
    city_distribution,
    last_updated: Timestamp::now(),
  })
}
