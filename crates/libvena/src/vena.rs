use std::collections::BTreeSet;

use itertools::Itertools;

use crate::{
  compat::{CompatibilityInfo, CompatibilityMap},
  error::VenaError,
  matching::finder,
  model::{BloodGroup, BloodRequest, BloodRequestPatch, Donor, DonorMatch, DonorPatch, NewBloodRequest, NewDonor, RequestMatch, RequestStatus, Urgency},
  scoring,
  stats::{self, DonorStatistics, MatchingStatistics, RequestStatistics},
  store::{DonorFilter, DonorStore, RequestFilter, RequestStore},
};

/// The main entrypoint for using the vena library.
///
/// `Vena` ties the two record stores to the blood-group compatibility rules
/// and exposes record management, donor/request matching and statistics on
/// top of them. The compatibility table is built once in the constructor
/// and never changes afterwards.
///
/// The engine never mutates records while matching: every matching or
/// statistics call is an independent sequence of store reads.
///
/// # Examples
///
/// ```rust
/// # use libvena::prelude::*;
/// # tokio_test::block_on(async {
/// let vena = Vena::new(MemoryDonorStore::new(), MemoryRequestStore::new());
///
/// let donor = vena
///   .create_donor(NewDonor::builder().name("John Doe").blood_group(BloodGroup::ONegative).city("Delhi").contact_number("9876543210").build())
///   .await
///   .unwrap();
///
/// let request = vena
///   .create_request(
///     NewBloodRequest::builder()
///       .patient_name("Jane Smith")
///       .blood_group(BloodGroup::APositive)
///       .city("Delhi")
///       .urgency(Urgency::Critical)
///       .contact_number("9123456780")
///       .build(),
///   )
///   .await
///   .unwrap();
///
/// let matches = vena.find_matching_donors(&request, false, None).await.unwrap();
///
/// assert_eq!(matches[0].donor.id, donor.id);
/// assert_eq!(matches[0].match_score, 80.0);
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct Vena<D: DonorStore, R: RequestStore> {
  donors: D,
  requests: R,
  compat: CompatibilityMap,
}

impl<D: DonorStore, R: RequestStore> Vena<D, R> {
  /// Create an engine over the given store implementations.
  ///
  /// This struct can be safely cloned and sent across thread boundaries,
  /// clones share the underlying stores.
  pub fn new(donors: D, requests: R) -> Vena<D, R> {
    Vena {
      donors,
      requests,
      compat: CompatibilityMap::new(),
    }
  }

  /// Availability of both backing stores.
  pub async fn health(&self) -> Result<bool, VenaError> {
    Ok(self.donors.health().await? && self.requests.health().await?)
  }

  pub fn compatibility(&self) -> &CompatibilityMap {
    &self.compat
  }

  // Donor records.

  pub async fn create_donor(&self, donor: NewDonor) -> Result<Donor, VenaError> {
    let donor = self.donors.create(donor).await?;

    tracing::info!(donor_id = donor.id, "registered donor");

    Ok(donor)
  }

  pub async fn donor(&self, id: i64) -> Result<Donor, VenaError> {
    self.donors.get(id).await?.ok_or(VenaError::DonorNotFound(id))
  }

  pub async fn donors(&self, filter: &DonorFilter) -> Result<Vec<Donor>, VenaError> {
    self.donors.list(filter).await
  }

  pub async fn update_donor(&self, id: i64, patch: DonorPatch) -> Result<Donor, VenaError> {
    self.donors.update(id, patch).await?.ok_or(VenaError::DonorNotFound(id))
  }

  pub async fn delete_donor(&self, id: i64) -> Result<(), VenaError> {
    match self.donors.delete(id).await? {
      true => Ok(()),
      false => Err(VenaError::DonorNotFound(id)),
    }
  }

  pub async fn donor_statistics(&self) -> Result<DonorStatistics, VenaError> {
    stats::donor_statistics(&self.donors).await
  }

  // Blood request records.

  pub async fn create_request(&self, request: NewBloodRequest) -> Result<BloodRequest, VenaError> {
    let request = self.requests.create(request).await?;

    tracing::info!(request_id = request.id, urgency = %request.urgency, "opened blood request");

    Ok(request)
  }

  pub async fn request(&self, id: i64) -> Result<BloodRequest, VenaError> {
    self.requests.get(id).await?.ok_or(VenaError::RequestNotFound(id))
  }

  pub async fn requests(&self, filter: &RequestFilter) -> Result<Vec<BloodRequest>, VenaError> {
    self.requests.list(filter).await
  }

  pub async fn update_request(&self, id: i64, patch: BloodRequestPatch) -> Result<BloodRequest, VenaError> {
    self.requests.update(id, patch).await?.ok_or(VenaError::RequestNotFound(id))
  }

  pub async fn delete_request(&self, id: i64) -> Result<(), VenaError> {
    match self.requests.delete(id).await? {
      true => Ok(()),
      false => Err(VenaError::RequestNotFound(id)),
    }
  }

  /// Mark a request as fulfilled. Fulfilling an already fulfilled request is
  /// a no-op.
  pub async fn fulfill_request(&self, id: i64) -> Result<BloodRequest, VenaError> {
    let request = self.requests.fulfill(id).await?.ok_or(VenaError::RequestNotFound(id))?;

    tracing::info!(request_id = request.id, "blood request fulfilled");

    Ok(request)
  }

  pub async fn active_requests(&self) -> Result<Vec<BloodRequest>, VenaError> {
    let filter = RequestFilter {
      status: Some(RequestStatus::Active),
      ..Default::default()
    };

    self.requests.list(&filter).await
  }

  /// Active requests at Critical urgency.
  pub async fn critical_requests(&self) -> Result<Vec<BloodRequest>, VenaError> {
    let filter = RequestFilter {
      status: Some(RequestStatus::Active),
      urgency: Some(Urgency::Critical),
      ..Default::default()
    };

    self.requests.list(&filter).await
  }

  pub async fn request_statistics(&self) -> Result<RequestStatistics, VenaError> {
    stats::request_statistics(&self.requests).await
  }

  // Matching.

  /// Rank donors able to serve an already materialized request.
  pub async fn find_matching_donors(&self, request: &BloodRequest, city_exact_match: bool, limit: Option<usize>) -> Result<Vec<DonorMatch>, VenaError> {
    finder::donors_for_request(&self.compat, &self.donors, request, city_exact_match, limit).await
  }

  /// Rank donors for the request with the given id.
  ///
  /// Fails with [`VenaError::RequestNotFound`] when the id does not resolve.
  /// A request that is no longer active matches nothing, which is reported
  /// as an empty list rather than an error.
  pub async fn find_matching_donors_by_request_id(&self, id: i64, city_exact_match: bool, limit: Option<usize>) -> Result<Vec<DonorMatch>, VenaError> {
    let request = self.request(id).await?;

    if request.status != RequestStatus::Active {
      tracing::warn!(request_id = id, "attempted to match a non-active blood request");

      return Ok(Vec::new());
    }

    self.find_matching_donors(&request, city_exact_match, limit).await
  }

  /// Rank blood requests that an already materialized donor can serve.
  pub async fn find_requests_for_donor(&self, donor: &Donor, city_exact_match: bool, active_only: bool, limit: Option<usize>) -> Result<Vec<RequestMatch>, VenaError> {
    finder::requests_for_donor(&self.compat, &self.requests, donor, city_exact_match, active_only, limit).await
  }

  /// Rank blood requests for the donor with the given id.
  ///
  /// Fails with [`VenaError::DonorNotFound`] when the id does not resolve.
  pub async fn find_requests_for_donor_by_id(&self, id: i64, city_exact_match: bool, active_only: bool, limit: Option<usize>) -> Result<Vec<RequestMatch>, VenaError> {
    let donor = self.donor(id).await?;

    self.find_requests_for_donor(&donor, city_exact_match, active_only, limit).await
  }

  /// Donor groups that may give to the recipient group.
  ///
  /// Fails with [`VenaError::InvalidBloodGroup`] for anything that is not
  /// one of the eight canonical spellings.
  pub fn compatible_blood_groups(&self, blood_group: &str) -> Result<&BTreeSet<BloodGroup>, VenaError> {
    Ok(self.compat.donors_for(blood_group.parse()?))
  }

  /// Both directions of the compatibility relation for one group.
  pub fn compatibility_info(&self, blood_group: &str) -> Result<CompatibilityInfo, VenaError> {
    Ok(self.compat.info(blood_group.parse()?))
  }

  /// Donors whose blood can serve a recipient of the given group,
  /// optionally narrowed to one city. Plain records, not scored matches.
  pub async fn compatible_donors(&self, blood_group: &str, city: Option<&str>, limit: Option<usize>) -> Result<Vec<Donor>, VenaError> {
    let recipient: BloodGroup = blood_group.parse()?;
    let mut donors = Vec::new();

    for group in self.compat.donors_for(recipient) {
      let filter = DonorFilter {
        blood_group: Some(*group),
        city: city.map(str::to_string),
        ..Default::default()
      };

      donors.extend(self.donors.list(&filter).await?);
    }

    // Groups are disjoint so this should never drop anything, kept in line
    // with the listing endpoints anyway.
    let mut donors = donors.into_iter().unique_by(|donor| donor.id).collect::<Vec<_>>();

    if let Some(limit) = limit {
      donors.truncate(limit);
    }

    Ok(donors)
  }

  /// Score one donor/request pair without touching the stores.
  pub fn score(&self, donor: &Donor, request: &BloodRequest, city_exact_match: bool) -> f64 {
    scoring::calculate_match_score(&self.compat, donor, request, city_exact_match)
  }

  /// System-wide matching statistics, recomputed from scratch on each call.
  pub async fn matching_statistics(&self) -> Result<MatchingStatistics, VenaError> {
    stats::matching_statistics(&self.compat, &self.donors, &self.requests).await
  }
}
