use std::sync::Arc;

use itertools::Itertools;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::{
  error::VenaError,
  matching::city_matches,
  model::{BloodRequest, BloodRequestPatch, Donor, DonorPatch, NewBloodRequest, NewDonor, RequestStatus},
  store::{DonorFilter, DonorStore, RequestFilter, RequestStore},
};

/// The bundled donor store: a plain table behind a read/write lock. Records
/// are handed out by value, so readers never observe a write in progress.
/// Listing order is newest first.
#[derive(Clone, Debug, Default)]
pub struct MemoryDonorStore {
  table: Arc<RwLock<Table<Donor>>>,
}

/// The bundled blood request store.
#[derive(Clone, Debug, Default)]
pub struct MemoryRequestStore {
  table: Arc<RwLock<Table<BloodRequest>>>,
}

#[derive(Debug)]
struct Table<T> {
  records: Vec<T>,
  sequence: i64,
}

impl<T> Default for Table<T> {
  fn default() -> Table<T> {
    Table { records: Vec::new(), sequence: 0 }
  }
}

impl MemoryDonorStore {
  pub fn new() -> MemoryDonorStore {
    MemoryDonorStore::default()
  }

  /// Pre-populated store, mostly useful in tests. The sequence counter
  /// resumes after the highest seeded id.
  pub fn with_donors(donors: Vec<Donor>) -> MemoryDonorStore {
    MemoryDonorStore {
      table: Arc::new(RwLock::new(Table {
        sequence: donors.iter().map(|donor| donor.id).max().unwrap_or(0),
        records: donors,
      })),
    }
  }
}

impl MemoryRequestStore {
  pub fn new() -> MemoryRequestStore {
    MemoryRequestStore::default()
  }

  pub fn with_requests(requests: Vec<BloodRequest>) -> MemoryRequestStore {
    MemoryRequestStore {
      table: Arc::new(RwLock::new(Table {
        sequence: requests.iter().map(|request| request.id).max().unwrap_or(0),
        records: requests,
      })),
    }
  }
}

impl DonorFilter {
  fn matches(&self, donor: &Donor) -> bool {
    self.blood_group.is_none_or(|group| donor.blood_group == group) && self.city.as_deref().is_none_or(|city| city_matches(&donor.city, city))
  }
}

impl RequestFilter {
  fn matches(&self, request: &BloodRequest) -> bool {
    self.blood_group.is_none_or(|group| request.blood_group == group)
      && self.city.as_deref().is_none_or(|city| city_matches(&request.city, city))
      && self.status.is_none_or(|status| request.status == status)
      && self.urgency.is_none_or(|urgency| request.urgency == urgency)
  }
}

fn newest_first<T>(records: impl Iterator<Item = T>, key: impl Fn(&T) -> (Timestamp, i64)) -> Vec<T> {
  records.sorted_by(|lhs, rhs| key(rhs).cmp(&key(lhs))).collect()
}

fn paginate<T>(records: Vec<T>, offset: Option<usize>, limit: Option<usize>) -> Vec<T> {
  records.into_iter().skip(offset.unwrap_or(0)).take(limit.unwrap_or(usize::MAX)).collect()
}

impl DonorStore for MemoryDonorStore {
  async fn health(&self) -> Result<bool, VenaError> {
    Ok(true)
  }

  async fn create(&self, donor: NewDonor) -> Result<Donor, VenaError> {
    let mut table = self.table.write().await;

    table.sequence += 1;

    let donor = Donor {
      id: table.sequence,
      name: donor.name.trim().to_string(),
      blood_group: donor.blood_group,
      city: donor.city,
      contact_number: donor.contact_number,
      email: donor.email,
      created_at: Timestamp::now(),
    };

    table.records.push(donor.clone());

    Ok(donor)
  }

  async fn get(&self, id: i64) -> Result<Option<Donor>, VenaError> {
    Ok(self.table.read().await.records.iter().find(|donor| donor.id == id).cloned())
  }

  async fn list(&self, filter: &DonorFilter) -> Result<Vec<Donor>, VenaError> {
    let donors = newest_first(self.table.read().await.records.iter().filter(|donor| filter.matches(donor)).cloned(), |donor| (donor.created_at, donor.id));

    Ok(paginate(donors, filter.offset, filter.limit))
  }

  async fn update(&self, id: i64, patch: DonorPatch) -> Result<Option<Donor>, VenaError> {
    let mut table = self.table.write().await;

    let Some(donor) = table.records.iter_mut().find(|donor| donor.id == id) else {
      return Ok(None);
    };

    if let Some(name) = patch.name {
      donor.name = name.trim().to_string();
    }
    if let Some(blood_group) = patch.blood_group {
      donor.blood_group = blood_group;
    }
    if let Some(city) = patch.city {
      donor.city = city;
    }
    if let Some(contact_number) = patch.contact_number {
      donor.contact_number = contact_number;
    }
    if let Some(email) = patch.email {
      donor.email = Some(email);
    }

    Ok(Some(donor.clone()))
  }

  async fn delete(&self, id: i64) -> Result<bool, VenaError> {
    let mut table = self.table.write().await;
    let before = table.records.len();

    table.records.retain(|donor| donor.id != id);

    Ok(table.records.len() < before)
  }

  async fn count(&self, filter: &DonorFilter) -> Result<usize, VenaError> {
    Ok(self.table.read().await.records.iter().filter(|donor| filter.matches(donor)).count())
  }
}

impl RequestStore for MemoryRequestStore {
  async fn health(&self) -> Result<bool, VenaError> {
    Ok(true)
  }

  async fn create(&self, request: NewBloodRequest) -> Result<BloodRequest, VenaError> {
    let mut table = self.table.write().await;

    table.sequence += 1;

    let request = BloodRequest {
      id: table.sequence,
      patient_name: request.patient_name.trim().to_string(),
      blood_group: request.blood_group,
      city: request.city,
      urgency: request.urgency,
      hospital_name: request.hospital_name,
      contact_number: request.contact_number,
      status: RequestStatus::Active,
      created_at: Timestamp::now(),
    };

    table.records.push(request.clone());

    Ok(request)
  }

  async fn get(&self, id: i64) -> Result<Option<BloodRequest>, VenaError> {
    Ok(self.table.read().await.records.iter().find(|request| request.id == id).cloned())
  }

  async fn list(&self, filter: &RequestFilter) -> Result<Vec<BloodRequest>, VenaError> {
    let requests = newest_first(self.table.read().await.records.iter().filter(|request| filter.matches(request)).cloned(), |request| (request.created_at, request.id));

    Ok(paginate(requests, filter.offset, filter.limit))
  }

  async fn update(&self, id: i64, patch: BloodRequestPatch) -> Result<Option<BloodRequest>, VenaError> {
    let mut table = self.table.write().await;

    let Some(request) = table.records.iter_mut().find(|request| request.id == id) else {
      return Ok(None);
    };

    // Fulfilled is terminal, a request can never be reactivated.
    if request.status == RequestStatus::Fulfilled && patch.status == Some(RequestStatus::Active) {
      return Err(VenaError::RequestFulfilled(id));
    }

    if let Some(patient_name) = patch.patient_name {
      request.patient_name = patient_name.trim().to_string();
    }
    if let Some(blood_group) = patch.blood_group {
      request.blood_group = blood_group;
    }
    if let Some(city) = patch.city {
      request.city = city;
    }
    if let Some(urgency) = patch.urgency {
      request.urgency = urgency;
    }
    if let Some(hospital_name) = patch.hospital_name {
      request.hospital_name = Some(hospital_name);
    }
    if let Some(contact_number) = patch.contact_number {
      request.contact_number = contact_number;
    }
    if let Some(status) = patch.status {
      request.status = status;
    }

    Ok(Some(request.clone()))
  }

  async fn delete(&self, id: i64) -> Result<bool, VenaError> {
    let mut table = self.table.write().await;
    let before = table.records.len();

    table.records.retain(|request| request.id != id);

    Ok(table.records.len() < before)
  }

  async fn count(&self, filter: &RequestFilter) -> Result<usize, VenaError> {
    Ok(self.table.read().await.records.iter().filter(|request| filter.matches(request)).count())
  }

  async fn fulfill(&self, id: i64) -> Result<Option<BloodRequest>, VenaError> {
    self
      .update(
        id,
        BloodRequestPatch {
          status: Some(RequestStatus::Fulfilled),
          ..Default::default()
        },
      )
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::{MemoryDonorStore, MemoryRequestStore};
  use crate::{
    error::VenaError,
    model::{BloodGroup, BloodRequestPatch, DonorPatch, NewBloodRequest, NewDonor, RequestStatus, Urgency},
    store::{DonorFilter, DonorStore, RequestFilter, RequestStore},
  };

  fn new_donor(name: &str, group: BloodGroup, city: &str) -> NewDonor {
    NewDonor::builder().name(name).blood_group(group).city(city).contact_number("9876543210").build()
  }

  fn new_request(patient: &str, group: BloodGroup, city: &str, urgency: Urgency) -> NewBloodRequest {
    NewBloodRequest::builder().patient_name(patient).blood_group(group).city(city).urgency(urgency).contact_number("9123456780").build()
  }

  #[tokio::test]
  async fn create_assigns_increasing_ids() {
    let store = MemoryDonorStore::new();

    let first = store.create(new_donor("Alice Brown", BloodGroup::APositive, "Delhi")).await.unwrap();
    let second = store.create(new_donor("Bob Green", BloodGroup::ONegative, "Mumbai")).await.unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert!(second.created_at >= first.created_at);
  }

  #[tokio::test]
  async fn create_trims_the_name() {
    let store = MemoryDonorStore::new();
    let donor = store.create(new_donor("  Alice Brown  ", BloodGroup::APositive, "Delhi")).await.unwrap();

    assert_eq!(donor.name, "Alice Brown");
  }

  #[tokio::test]
  async fn list_filters_and_paginates() {
    let store = MemoryDonorStore::new();

    for (name, group, city) in [
      ("Alice Brown", BloodGroup::APositive, "Delhi"),
      ("Bob Green", BloodGroup::APositive, "Mumbai"),
      ("Cara White", BloodGroup::ONegative, "delhi"),
    ] {
      store.create(new_donor(name, group, city)).await.unwrap();
    }

    let by_group = store.list(&DonorFilter { blood_group: Some(BloodGroup::APositive), ..Default::default() }).await.unwrap();
    assert_eq!(by_group.len(), 2);

    // City comparison is case-insensitive, like the donor lookup queries.
    let by_city = store.list(&DonorFilter { city: Some("DELHI".to_string()), ..Default::default() }).await.unwrap();
    assert_eq!(by_city.len(), 2);

    let paged = store.list(&DonorFilter { limit: Some(1), offset: Some(1), ..Default::default() }).await.unwrap();
    assert_eq!(paged.len(), 1);

    assert_eq!(store.count(&DonorFilter::default()).await.unwrap(), 3);
  }

  #[tokio::test]
  async fn list_returns_newest_first() {
    let store = MemoryDonorStore::new();

    store.create(new_donor("Alice Brown", BloodGroup::APositive, "Delhi")).await.unwrap();
    store.create(new_donor("Bob Green", BloodGroup::APositive, "Delhi")).await.unwrap();

    let donors = store.list(&DonorFilter::default()).await.unwrap();

    assert_eq!(donors.first().map(|donor| donor.id), Some(2));
  }

  #[tokio::test]
  async fn update_applies_only_present_fields() {
    let store = MemoryDonorStore::new();
    let donor = store.create(new_donor("Alice Brown", BloodGroup::APositive, "Delhi")).await.unwrap();

    let updated = store.update(donor.id, DonorPatch { city: Some("Mumbai".to_string()), ..Default::default() }).await.unwrap().unwrap();

    assert_eq!(updated.city, "Mumbai");
    assert_eq!(updated.name, "Alice Brown");

    assert!(store.update(999, DonorPatch::default()).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn delete_reports_existence() {
    let store = MemoryDonorStore::new();
    let donor = store.create(new_donor("Alice Brown", BloodGroup::APositive, "Delhi")).await.unwrap();

    assert!(store.delete(donor.id).await.unwrap());
    assert!(!store.delete(donor.id).await.unwrap());
    assert!(store.get(donor.id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn fulfilled_requests_never_reactivate() {
    let store = MemoryRequestStore::new();
    let request = store.create(new_request("Jane Smith", BloodGroup::BPositive, "Delhi", Urgency::High)).await.unwrap();

    let fulfilled = store.fulfill(request.id).await.unwrap().unwrap();
    assert_eq!(fulfilled.status, RequestStatus::Fulfilled);

    // Fulfilling again is a harmless no-op.
    assert!(store.fulfill(request.id).await.unwrap().is_some());

    let reactivation = store.update(request.id, BloodRequestPatch { status: Some(RequestStatus::Active), ..Default::default() }).await;
    assert!(matches!(reactivation, Err(VenaError::RequestFulfilled(_))));
  }

  #[tokio::test]
  async fn request_filter_covers_status_and_urgency() {
    let store = MemoryRequestStore::new();

    let critical = store.create(new_request("Jane Smith", BloodGroup::BPositive, "Delhi", Urgency::Critical)).await.unwrap();
    store.create(new_request("John Doe", BloodGroup::BPositive, "Delhi", Urgency::Low)).await.unwrap();
    store.fulfill(critical.id).await.unwrap();

    let active = store.list(&RequestFilter { status: Some(RequestStatus::Active), ..Default::default() }).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].urgency, Urgency::Low);

    let critical_only = store.list(&RequestFilter { urgency: Some(Urgency::Critical), ..Default::default() }).await.unwrap();
    assert_eq!(critical_only.len(), 1);
    assert_eq!(critical_only[0].status, RequestStatus::Fulfilled);
  }
}
