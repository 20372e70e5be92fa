use metrics::histogram;
use tracing::instrument;

use crate::{
  compat::CompatibilityMap,
  matching::{self, FEATURES, run_features},
  model::{BloodRequest, Donor, DonorMatch, MatchDetails, RequestMatch},
};

/// Compute the 0-100 match quality score for a donor/request pair.
///
/// The score is an additive point model: 40 points for blood compatibility,
/// 20 for an identical blood group, 30 for a case-insensitive city match and
/// up to 10 for the request urgency, capped at 100.
///
/// `city_exact_match` mirrors the search mode of the caller. It does not
/// currently influence the score and is only kept for signature
/// compatibility.
#[instrument(name = "score_pair", skip_all, fields(donor_id = donor.id, request_id = request.id))]
pub fn calculate_match_score(compat: &CompatibilityMap, donor: &Donor, request: &BloodRequest, _city_exact_match: bool) -> f64 {
  let mut features = Vec::with_capacity(FEATURES.len());

  // The weights already peak at exactly 100, the clamp is kept as a guard.
  let score = run_features(compat, donor, request, FEATURES, &mut features).clamp(0.0, 100.0);

  tracing::debug!(score = score, "computed match score");

  histogram!("vena_match_scores").record(score);

  score
}

pub(crate) fn donor_match(compat: &CompatibilityMap, donor: Donor, request: &BloodRequest, city_exact_match: bool) -> DonorMatch {
  let match_score = calculate_match_score(compat, &donor, request, city_exact_match);

  DonorMatch {
    match_score,
    blood_compatible: compat.is_compatible(donor.blood_group, request.blood_group),
    city_match: matching::city_matches(&donor.city, &request.city),
    exact_blood_match: donor.blood_group == request.blood_group,
    match_details: details(&donor, request),
    donor: donor.into(),
  }
}

pub(crate) fn request_match(compat: &CompatibilityMap, donor: &Donor, request: BloodRequest, city_exact_match: bool) -> RequestMatch {
  let match_score = calculate_match_score(compat, donor, &request, city_exact_match);

  RequestMatch {
    match_score,
    urgency_priority: request.urgency.priority(),
    blood_compatible: compat.is_compatible(donor.blood_group, request.blood_group),
    city_match: matching::city_matches(&donor.city, &request.city),
    exact_blood_match: donor.blood_group == request.blood_group,
    match_details: details(donor, &request),
    request: request.into(),
  }
}

fn details(donor: &Donor, request: &BloodRequest) -> MatchDetails {
  MatchDetails {
    donor_blood_group: donor.blood_group,
    required_blood_group: request.blood_group,
    donor_city: donor.city.clone(),
    required_city: request.city.clone(),
    request_urgency: request.urgency,
  }
}
