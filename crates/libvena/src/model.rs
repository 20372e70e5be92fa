use std::{borrow::Cow, fmt, str::FromStr, sync::LazyLock};

use jiff::Timestamp;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::VenaError;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").unwrap());
static CONTACT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10,15}$").unwrap());
static HOSPITAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\.\-&,]+$").unwrap());

/// AB0 type plus Rh factor. The discriminant order is the canonical display
/// order used across listings and breakdowns.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BloodGroup {
  #[serde(rename = "A+")]
  APositive,
  #[serde(rename = "A-")]
  ANegative,
  #[serde(rename = "B+")]
  BPositive,
  #[serde(rename = "B-")]
  BNegative,
  #[serde(rename = "AB+")]
  AbPositive,
  #[serde(rename = "AB-")]
  AbNegative,
  #[serde(rename = "O+")]
  OPositive,
  #[serde(rename = "O-")]
  ONegative,
}

impl BloodGroup {
  pub const ALL: [BloodGroup; 8] = [
    BloodGroup::APositive,
    BloodGroup::ANegative,
    BloodGroup::BPositive,
    BloodGroup::BNegative,
    BloodGroup::AbPositive,
    BloodGroup::AbNegative,
    BloodGroup::OPositive,
    BloodGroup::ONegative,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      BloodGroup::APositive => "A+",
      BloodGroup::ANegative => "A-",
      BloodGroup::BPositive => "B+",
      BloodGroup::BNegative => "B-",
      BloodGroup::AbPositive => "AB+",
      BloodGroup::AbNegative => "AB-",
      BloodGroup::OPositive => "O+",
      BloodGroup::ONegative => "O-",
    }
  }
}

impl fmt::Display for BloodGroup {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BloodGroup {
  type Err = VenaError;

  // Canonical spellings only, "o+" or "ab+" are rejected.
  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "A+" => Ok(BloodGroup::APositive),
      "A-" => Ok(BloodGroup::ANegative),
      "B+" => Ok(BloodGroup::BPositive),
      "B-" => Ok(BloodGroup::BNegative),
      "AB+" => Ok(BloodGroup::AbPositive),
      "AB-" => Ok(BloodGroup::AbNegative),
      "O+" => Ok(BloodGroup::OPositive),
      "O-" => Ok(BloodGroup::ONegative),
      other => Err(VenaError::InvalidBloodGroup(other.to_string())),
    }
  }
}

/// Request severity, ordered from least to most urgent.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Urgency {
  Low,
  Medium,
  High,
  Critical,
}

impl Urgency {
  pub const ALL: [Urgency; 4] = [Urgency::Critical, Urgency::High, Urgency::Medium, Urgency::Low];

  /// Sort priority used when ranking requests, higher outranks lower.
  pub fn priority(self) -> u8 {
    match self {
      Urgency::Critical => 4,
      Urgency::High => 3,
      Urgency::Medium => 2,
      Urgency::Low => 1,
    }
  }
}

impl fmt::Display for Urgency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Urgency::Low => f.write_str("Low"),
      Urgency::Medium => f.write_str("Medium"),
      Urgency::High => f.write_str("High"),
      Urgency::Critical => f.write_str("Critical"),
    }
  }
}

/// Fulfilled is terminal: a request may go Active -> Fulfilled, never back.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum RequestStatus {
  #[default]
  Active,
  Fulfilled,
}

#[derive(Clone, Debug, Deserialize, Serialize, bon::Builder)]
#[builder(on(String, into))]
pub struct Donor {
  pub id: i64,
  pub name: String,
  pub blood_group: BloodGroup,
  pub city: String,
  pub contact_number: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[builder(default = Timestamp::UNIX_EPOCH)]
  pub created_at: Timestamp,
}

#[derive(Clone, Debug, Deserialize, Serialize, bon::Builder)]
#[builder(on(String, into))]
pub struct BloodRequest {
  pub id: i64,
  pub patient_name: String,
  pub blood_group: BloodGroup,
  pub city: String,
  pub urgency: Urgency,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hospital_name: Option<String>,
  pub contact_number: String,
  #[builder(default)]
  pub status: RequestStatus,
  #[builder(default = Timestamp::UNIX_EPOCH)]
  pub created_at: Timestamp,
}

/// Payload for registering a donor. The store assigns id and created_at.
#[derive(Clone, Debug, Deserialize, Validate, bon::Builder)]
#[builder(on(String, into))]
pub struct NewDonor {
  #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"), custom(function = validate_person_name))]
  pub name: String,
  pub blood_group: BloodGroup,
  #[validate(length(min = 1, max = 100, message = "city must be between 1 and 100 characters"), custom(function = validate_not_blank))]
  pub city: String,
  #[validate(custom(function = validate_contact_number))]
  pub contact_number: String,
  #[serde(default)]
  #[validate(email(message = "email must be a valid address"))]
  pub email: Option<String>,
}

/// Partial donor update, absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize, Validate, bon::Builder)]
#[builder(on(String, into))]
pub struct DonorPatch {
  #[serde(default)]
  #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"), custom(function = validate_person_name))]
  pub name: Option<String>,
  #[serde(default)]
  pub blood_group: Option<BloodGroup>,
  #[serde(default)]
  #[validate(length(min = 1, max = 100, message = "city must be between 1 and 100 characters"), custom(function = validate_not_blank))]
  pub city: Option<String>,
  #[serde(default)]
  #[validate(custom(function = validate_contact_number))]
  pub contact_number: Option<String>,
  #[serde(default)]
  #[validate(email(message = "email must be a valid address"))]
  pub email: Option<String>,
}

/// Payload for opening a blood request. Status always starts Active.
#[derive(Clone, Debug, Deserialize, Validate, bon::Builder)]
#[builder(on(String, into))]
pub struct NewBloodRequest {
  #[validate(length(min = 1, max = 100, message = "patient name must be between 1 and 100 characters"), custom(function = validate_person_name))]
  pub patient_name: String,
  pub blood_group: BloodGroup,
  #[validate(length(min = 1, max = 100, message = "city must be between 1 and 100 characters"), custom(function = validate_not_blank))]
  pub city: String,
  pub urgency: Urgency,
  #[serde(default)]
  #[validate(length(max = 100, message = "hospital name must be at most 100 characters"), custom(function = validate_hospital_name))]
  pub hospital_name: Option<String>,
  #[validate(custom(function = validate_contact_number))]
  pub contact_number: String,
}

/// Partial request update, absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize, Validate, bon::Builder)]
#[builder(on(String, into))]
pub struct BloodRequestPatch {
  #[serde(default)]
  #[validate(length(min = 1, max = 100, message = "patient name must be between 1 and 100 characters"), custom(function = validate_person_name))]
  pub patient_name: Option<String>,
  #[serde(default)]
  pub blood_group: Option<BloodGroup>,
  #[serde(default)]
  #[validate(length(min = 1, max = 100, message = "city must be between 1 and 100 characters"), custom(function = validate_not_blank))]
  pub city: Option<String>,
  #[serde(default)]
  pub urgency: Option<Urgency>,
  #[serde(default)]
  #[validate(length(max = 100, message = "hospital name must be at most 100 characters"), custom(function = validate_hospital_name))]
  pub hospital_name: Option<String>,
  #[serde(default)]
  #[validate(custom(function = validate_contact_number))]
  pub contact_number: Option<String>,
  #[serde(default)]
  pub status: Option<RequestStatus>,
}

/// Donor fields echoed inside a match record.
#[derive(Clone, Debug, Serialize)]
pub struct DonorSummary {
  pub id: i64,
  pub name: String,
  pub blood_group: BloodGroup,
  pub city: String,
  pub contact_number: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

impl From<Donor> for DonorSummary {
  fn from(donor: Donor) -> DonorSummary {
    DonorSummary {
      id: donor.id,
      name: donor.name,
      blood_group: donor.blood_group,
      city: donor.city,
      contact_number: donor.contact_number,
      email: donor.email,
    }
  }
}

/// Request fields echoed inside a match record.
#[derive(Clone, Debug, Serialize)]
pub struct RequestSummary {
  pub id: i64,
  pub patient_name: String,
  pub blood_group: BloodGroup,
  pub city: String,
  pub urgency: Urgency,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hospital_name: Option<String>,
  pub contact_number: String,
  pub created_at: Timestamp,
}

impl From<BloodRequest> for RequestSummary {
  fn from(request: BloodRequest) -> RequestSummary {
    RequestSummary {
      id: request.id,
      patient_name: request.patient_name,
      blood_group: request.blood_group,
      city: request.city,
      urgency: request.urgency,
      hospital_name: request.hospital_name,
      contact_number: request.contact_number,
      created_at: request.created_at,
    }
  }
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchDetails {
  pub donor_blood_group: BloodGroup,
  pub required_blood_group: BloodGroup,
  pub donor_city: String,
  pub required_city: String,
  pub request_urgency: Urgency,
}

/// A scored donor candidate for one blood request. Computed on demand and
/// never persisted.
#[derive(Clone, Debug, Serialize)]
pub struct DonorMatch {
  pub donor: DonorSummary,
  pub match_score: f64,
  pub blood_compatible: bool,
  pub city_match: bool,
  pub exact_blood_match: bool,
  pub match_details: MatchDetails,
}

/// A scored request candidate for one donor.
#[derive(Clone, Debug, Serialize)]
pub struct RequestMatch {
  pub request: RequestSummary,
  pub match_score: f64,
  pub urgency_priority: u8,
  pub blood_compatible: bool,
  pub city_match: bool,
  pub exact_blood_match: bool,
  pub match_details: MatchDetails,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
  let mut error = ValidationError::new(code);
  error.message = Some(Cow::Borrowed(message));
  error
}

fn validate_person_name(value: &str) -> Result<(), ValidationError> {
  match NAME_PATTERN.is_match(value.trim()) {
    true => Ok(()),
    false => Err(invalid("person_name", "name must contain only letters and spaces")),
  }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
  match value.trim().is_empty() {
    false => Ok(()),
    true => Err(invalid("not_blank", "value cannot be blank")),
  }
}

// Separators are tolerated on input, only the digits are counted.
fn validate_contact_number(value: &str) -> Result<(), ValidationError> {
  let digits: String = value.chars().filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')')).collect();

  match CONTACT_PATTERN.is_match(&digits) {
    true => Ok(()),
    false => Err(invalid("contact_number", "contact number must contain 10 to 15 digits")),
  }
}

fn validate_hospital_name(value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Ok(());
  }

  match HOSPITAL_PATTERN.is_match(value.trim()) {
    true => Ok(()),
    false => Err(invalid("hospital_name", "hospital name contains invalid characters")),
  }
}
