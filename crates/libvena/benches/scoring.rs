use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use libvena::prelude::*;

fn match_score(c: &mut Criterion) {
  let compat = CompatibilityMap::new();
  let donor = Donor::builder().id(1).name("John Doe").blood_group(BloodGroup::ONegative).city("Delhi").contact_number("9876543210").build();
  let request = BloodRequest::builder()
    .id(1)
    .patient_name("Jane Smith")
    .blood_group(BloodGroup::APositive)
    .city("Delhi")
    .urgency(Urgency::Critical)
    .contact_number("9123456780")
    .build();

  c.bench_function("match_score", |b| b.iter(|| black_box(calculate_match_score(&compat, &donor, &request, false))));
}

fn compatibility_lookup(c: &mut Criterion) {
  let compat = CompatibilityMap::new();

  c.bench_function("compatibility_lookup", |b| {
    b.iter(|| {
      for donor in BloodGroup::ALL {
        for recipient in BloodGroup::ALL {
          black_box(compat.is_compatible(donor, recipient));
        }
      }
    })
  });
}

criterion_group!(benches, match_score, compatibility_lookup);
criterion_main!(benches);
