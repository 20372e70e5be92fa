use itertools::Itertools;
use metrics::histogram;
use tracing::instrument;

use crate::{
  compat::CompatibilityMap,
  error::VenaError,
  model::{BloodRequest, Donor, DonorMatch, RequestMatch, RequestStatus},
  scoring,
  store::{DonorFilter, DonorStore, RequestFilter, RequestStore},
};

/// Rank donors able to serve `request`, best match first.
///
/// Ties on the score keep store order; the truncation keeps the top `limit`
/// entries of the sorted list.
#[instrument(skip_all, fields(request_id = request.id))]
pub(crate) async fn donors_for_request<D: DonorStore>(
  compat: &CompatibilityMap,
  donors: &D,
  request: &BloodRequest,
  city_exact_match: bool,
  limit: Option<usize>,
) -> Result<Vec<DonorMatch>, VenaError> {
  // Matching is a no-op for requests that are no longer active.
  if request.status != RequestStatus::Active {
    return Ok(Vec::new());
  }

  let mut matches = Vec::new();

  // Compatible groups are queried one at a time, in canonical order, so tie
  // ordering stays deterministic.
  for group in compat.donors_for(request.blood_group) {
    let filter = DonorFilter {
      blood_group: Some(*group),
      city: city_exact_match.then(|| request.city.clone()),
      ..Default::default()
    };

    for donor in donors.list(&filter).await? {
      matches.push(scoring::donor_match(compat, donor, request, city_exact_match));
    }
  }

  let mut matches = matches.into_iter().sorted_by(|lhs, rhs| rhs.match_score.total_cmp(&lhs.match_score)).collect::<Vec<_>>();

  if let Some(limit) = limit {
    matches.truncate(limit);
  }

  histogram!("vena_matches_per_request").record(matches.len() as f64);

  tracing::info!(matches = matches.len(), "found matching donors for blood request");

  Ok(matches)
}

/// Rank blood requests that `donor` can serve.
///
/// Urgency dominates the ordering: a low-urgency perfect match never
/// outranks a critical partial match. With `city_exact_match` the candidates
/// come from a single store query on the donor's own blood group and city;
/// otherwise every request is fetched and filtered by compatibility here.
#[instrument(skip_all, fields(donor_id = donor.id))]
pub(crate) async fn requests_for_donor<R: RequestStore>(
  compat: &CompatibilityMap,
  requests: &R,
  donor: &Donor,
  city_exact_match: bool,
  active_only: bool,
  limit: Option<usize>,
) -> Result<Vec<RequestMatch>, VenaError> {
  let candidates = match city_exact_match {
    true => {
      let filter = RequestFilter {
        blood_group: Some(donor.blood_group),
        city: Some(donor.city.clone()),
        ..Default::default()
      };

      requests.list(&filter).await?
    }

    false => {
      let all = requests.list(&RequestFilter::default()).await?;

      all.into_iter().filter(|request| compat.is_compatible(donor.blood_group, request.blood_group)).collect()
    }
  };

  let mut matches = candidates
    .into_iter()
    .filter(|request| !active_only || request.status == RequestStatus::Active)
    .filter(|request| compat.is_compatible(donor.blood_group, request.blood_group))
    .map(|request| scoring::request_match(compat, donor, request, city_exact_match))
    .sorted_by(|lhs, rhs| rhs.urgency_priority.cmp(&lhs.urgency_priority).then_with(|| rhs.match_score.total_cmp(&lhs.match_score)))
    .collect::<Vec<_>>();

  if let Some(limit) = limit {
    matches.truncate(limit);
  }

  histogram!("vena_matches_per_donor").record(matches.len() as f64);

  tracing::info!(matches = matches.len(), "found matching blood requests for donor");

  Ok(matches)
}
