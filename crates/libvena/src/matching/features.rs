use crate::{
  compat::CompatibilityMap,
  matching::{Feature, city_matches},
  model::{BloodRequest, Donor, Urgency},
};

/// Base compatibility: the donor may legally give to the recipient.
pub(super) struct BloodCompatible;

impl Feature for BloodCompatible {
  fn name(&self) -> &'static str {
    "blood_compatible"
  }

  fn score_feature(&self, compat: &CompatibilityMap, donor: &Donor, request: &BloodRequest) -> f64 {
    match compat.is_compatible(donor.blood_group, request.blood_group) {
      true => 1.0,
      false => 0.0,
    }
  }
}

/// Bonus for an identical blood group, additive with base compatibility.
pub(super) struct ExactBloodMatch;

impl Feature for ExactBloodMatch {
  fn name(&self) -> &'static str {
    "exact_blood_match"
  }

  fn score_feature(&self, _: &CompatibilityMap, donor: &Donor, request: &BloodRequest) -> f64 {
    match donor.blood_group == request.blood_group {
      true => 1.0,
      false => 0.0,
    }
  }
}

pub(super) struct CityMatch;

impl Feature for CityMatch {
  fn name(&self) -> &'static str {
    "city_match"
  }

  fn score_feature(&self, _: &CompatibilityMap, donor: &Donor, request: &BloodRequest) -> f64 {
    match city_matches(&donor.city, &request.city) {
      true => 1.0,
      false => 0.0,
    }
  }
}

/// Unconditional urgency bonus: 10, 7, 4 or 1 points once weighted.
pub(super) struct UrgencyWeight;

impl Feature for UrgencyWeight {
  fn name(&self) -> &'static str {
    "urgency"
  }

  fn score_feature(&self, _: &CompatibilityMap, _: &Donor, request: &BloodRequest) -> f64 {
    match request.urgency {
      Urgency::Critical => 1.0,
      Urgency::High => 0.7,
      Urgency::Medium => 0.4,
      Urgency::Low => 0.1,
    }
  }
}

#[cfg(test)]
mod tests {
  use float_cmp::approx_eq;

  use super::{BloodCompatible, CityMatch, ExactBloodMatch, UrgencyWeight};
  use crate::{
    compat::CompatibilityMap,
    matching::Feature,
    model::{BloodGroup, BloodRequest, Donor, Urgency},
  };

  fn donor(group: BloodGroup, city: &str) -> Donor {
    Donor::builder().id(1).name("John Doe").blood_group(group).city(city).contact_number("9876543210").build()
  }

  fn request(group: BloodGroup, city: &str, urgency: Urgency) -> BloodRequest {
    BloodRequest::builder().id(1).patient_name("Jane Smith").blood_group(group).city(city).urgency(urgency).contact_number("9876543210").build()
  }

  #[test]
  fn blood_compatibility_feature() {
    let compat = CompatibilityMap::new();

    let compatible = BloodCompatible.score_feature(&compat, &donor(BloodGroup::ONegative, "Delhi"), &request(BloodGroup::APositive, "Delhi", Urgency::Low));
    assert_eq!(compatible, 1.0);

    let incompatible = BloodCompatible.score_feature(&compat, &donor(BloodGroup::APositive, "Delhi"), &request(BloodGroup::ONegative, "Delhi", Urgency::Low));
    assert_eq!(incompatible, 0.0);
  }

  #[test]
  fn exact_match_is_independent_of_compatibility() {
    let compat = CompatibilityMap::new();
    let pair = (donor(BloodGroup::ONegative, "Delhi"), request(BloodGroup::APositive, "Delhi", Urgency::Low));

    assert_eq!(ExactBloodMatch.score_feature(&compat, &pair.0, &pair.1), 0.0);
    assert_eq!(BloodCompatible.score_feature(&compat, &pair.0, &pair.1), 1.0);
  }

  #[test]
  fn city_feature_ignores_case() {
    let compat = CompatibilityMap::new();

    assert_eq!(CityMatch.score_feature(&compat, &donor(BloodGroup::OPositive, "DELHI"), &request(BloodGroup::OPositive, "delhi", Urgency::Low)), 1.0);
    assert_eq!(CityMatch.score_feature(&compat, &donor(BloodGroup::OPositive, "Mumbai"), &request(BloodGroup::OPositive, "Delhi", Urgency::Low)), 0.0);
  }

  #[test]
  fn urgency_feature_scales_with_severity() {
    let compat = CompatibilityMap::new();
    let probe = |urgency| UrgencyWeight.score_feature(&compat, &donor(BloodGroup::OPositive, "Delhi"), &request(BloodGroup::OPositive, "Delhi", urgency));

    assert!(approx_eq!(f64, probe(Urgency::Critical), 1.0));
    assert!(approx_eq!(f64, probe(Urgency::High), 0.7));
    assert!(approx_eq!(f64, probe(Urgency::Medium), 0.4));
    assert!(approx_eq!(f64, probe(Urgency::Low), 0.1));
  }
}
