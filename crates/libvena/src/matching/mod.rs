mod features;

pub(crate) mod finder;

use crate::{
  compat::CompatibilityMap,
  matching::features::{BloodCompatible, CityMatch, ExactBloodMatch, UrgencyWeight},
  model::{BloodRequest, Donor},
};

/// One component of the match score. Every feature yields a value in
/// [0, 1] which is then multiplied by its weight in points.
pub(crate) trait Feature: Send + Sync {
  fn name(&self) -> &'static str;
  fn score_feature(&self, compat: &CompatibilityMap, donor: &Donor, request: &BloodRequest) -> f64;
}

/// Weighted feature table for the additive scoring model. Weights sum to
/// the maximum attainable score of 100.
pub(crate) const FEATURES: &[(&dyn Feature, f64)] = &[(&BloodCompatible, 40.0), (&ExactBloodMatch, 20.0), (&CityMatch, 30.0), (&UrgencyWeight, 10.0)];

pub(crate) fn run_features(compat: &CompatibilityMap, donor: &Donor, request: &BloodRequest, features: &[(&dyn Feature, f64)], results: &mut Vec<(&'static str, f64)>) -> f64 {
  features.iter().fold(0.0, |score, (func, weight)| {
    let feature_score = func.score_feature(compat, donor, request);

    results.push((func.name(), feature_score));

    tracing::trace!(feature = func.name(), score = feature_score, "computed feature score");

    score + (feature_score * weight)
  })
}

/// Case-insensitive city equality, the only normalization applied to
/// location fields anywhere in the engine.
pub(crate) fn city_matches(lhs: &str, rhs: &str) -> bool {
  lhs.to_lowercase() == rhs.to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::city_matches;

  #[test]
  fn city_comparison_ignores_case() {
    assert!(city_matches("Delhi", "delhi"));
    assert!(city_matches("MUMBAI", "mumbai"));
    assert!(!city_matches("Delhi", "New Delhi"));
    assert!(!city_matches("Delhi", " Delhi"));
  }
}
