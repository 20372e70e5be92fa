use std::collections::BTreeSet;

use ahash::{HashMap, HashMapExt};
use serde::Serialize;

use crate::model::BloodGroup;

use BloodGroup::*;

/// AB0/Rh donation rules: which donor groups may give to each recipient
/// group. Built once when the engine is constructed and never mutated, so it
/// can be shared freely by reference.
#[derive(Clone, Debug)]
pub struct CompatibilityMap {
  donors_for: HashMap<BloodGroup, BTreeSet<BloodGroup>>,
}

impl CompatibilityMap {
  /// Build the canonical table. [`crate::prelude::Vena`] does this on
  /// construction, standalone scoring is the only reason to call it
  /// directly.
  pub fn new() -> CompatibilityMap {
    let mut donors_for = HashMap::with_capacity(8);

    donors_for.insert(APositive, BTreeSet::from([APositive, ANegative, OPositive, ONegative]));
    donors_for.insert(ANegative, BTreeSet::from([ANegative, ONegative]));
    donors_for.insert(BPositive, BTreeSet::from([BPositive, BNegative, OPositive, ONegative]));
    donors_for.insert(BNegative, BTreeSet::from([BNegative, ONegative]));
    // Universal recipient
    donors_for.insert(AbPositive, BTreeSet::from(BloodGroup::ALL));
    donors_for.insert(AbNegative, BTreeSet::from([ANegative, BNegative, AbNegative, ONegative]));
    donors_for.insert(OPositive, BTreeSet::from([OPositive, ONegative]));
    // The universal donor can only receive from O-
    donors_for.insert(ONegative, BTreeSet::from([ONegative]));

    CompatibilityMap { donors_for }
  }
}

impl Default for CompatibilityMap {
  fn default() -> CompatibilityMap {
    CompatibilityMap::new()
  }
}

impl CompatibilityMap {
  /// Donor groups that may give to `recipient`, never empty.
  pub fn donors_for(&self, recipient: BloodGroup) -> &BTreeSet<BloodGroup> {
    self.donors_for.get(&recipient).expect("compatibility table covers every blood group")
  }

  pub fn is_compatible(&self, donor: BloodGroup, recipient: BloodGroup) -> bool {
    self.donors_for(recipient).contains(&donor)
  }

  /// Recipient groups that `donor` may give to, derived from the donor table.
  pub fn recipients_for(&self, donor: BloodGroup) -> BTreeSet<BloodGroup> {
    BloodGroup::ALL.into_iter().filter(|recipient| self.is_compatible(donor, *recipient)).collect()
  }

  pub(crate) fn info(&self, group: BloodGroup) -> CompatibilityInfo {
    let can_receive_from = self.donors_for(group).iter().copied().collect::<Vec<_>>();
    let can_donate_to = self.recipients_for(group).into_iter().collect::<Vec<_>>();

    CompatibilityInfo {
      blood_group: group,
      is_universal_donor: group == ONegative,
      is_universal_recipient: group == AbPositive,
      compatibility_details: CompatibilityDetails {
        total_compatible_donors: can_receive_from.len(),
        total_compatible_recipients: can_donate_to.len(),
      },
      can_receive_from,
      can_donate_to,
    }
  }
}

/// Both directions of the compatibility relation for one blood group.
#[derive(Clone, Debug, Serialize)]
pub struct CompatibilityInfo {
  pub blood_group: BloodGroup,
  pub can_receive_from: Vec<BloodGroup>,
  pub can_donate_to: Vec<BloodGroup>,
  pub is_universal_donor: bool,
  pub is_universal_recipient: bool,
  pub compatibility_details: CompatibilityDetails,
}

#[derive(Clone, Debug, Serialize)]
pub struct CompatibilityDetails {
  pub total_compatible_donors: usize,
  pub total_compatible_recipients: usize,
}
