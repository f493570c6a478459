//! Categorical normalizer — maps free-text archive values onto canonical
//! labels.
//!
//! Every field owns an ordered rule table. Input is trimmed and lower-cased,
//! the table is scanned top to bottom and the first matching rule's label is
//! returned. Inputs that match no rule fall through to a title-cased copy of
//! themselves, so an unmapped value is never turned into an absence.
//!
//! Rule order is part of the contract: `"1st military"` is `First Class`,
//! not `Military`, because the class rule is listed first.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ─── Rules ───────────────────────────────────────────────────────────────────

/// The substring test a [`Rule`] applies to the lower-cased input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
  /// At least one token occurs in the input.
  Any(&'static [&'static str]),
  /// Every token occurs in the input.
  All(&'static [&'static str]),
}

impl Predicate {
  pub fn matches(&self, lowered: &str) -> bool {
    match self {
      Self::Any(tokens) => tokens.iter().any(|t| lowered.contains(t)),
      Self::All(tokens) => tokens.iter().all(|t| lowered.contains(t)),
    }
  }
}

/// One `(predicate, label)` pair of a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
  pub when:  Predicate,
  pub label: &'static str,
}

const fn any(tokens: &'static [&'static str], label: &'static str) -> Rule {
  Rule { when: Predicate::Any(tokens), label }
}

const fn all(tokens: &'static [&'static str], label: &'static str) -> Rule {
  Rule { when: Predicate::All(tokens), label }
}

pub const CLASS_RULES: &[Rule] = &[
  any(&["first", "1st"], "First Class"),
  any(&["second", "2nd"], "Second Class"),
  any(&["third", "3rd"], "Third Class"),
  any(&["military"], "Military"),
  any(&["civil"], "Civil"),
];

// "xxii" contains "xii", so the XXII rule has to stay ahead of the XII one.
pub const ACT_RULES: &[Rule] = &[
  all(&["xiv", "1868"], "Act XIV of 1868"),
  all(&["xxii", "1864"], "Act XXII of 1864"),
  all(&["iii", "1880"], "Act III of 1880"),
  all(&["xii", "1864"], "Act XII of 1864"),
  any(&["voluntary"], "Voluntary System"),
];

pub const REGION_RULES: &[Rule] = &[
  any(&["madras"], "Madras Presidency"),
  any(&["burma"], "Burma"),
  any(&["punjab"], "Punjab"),
  any(&["central provinces"], "Central Provinces"),
  any(&["north-western provinces", "oudh"], "North-Western Provinces & Oudh"),
];

pub const COUNTRY_RULES: &[Rule] = &[
  any(&["british india"], "British India"),
  any(&["burma"], "British Burma"),
];

// ─── Fields ──────────────────────────────────────────────────────────────────

/// A categorical column the normalizer knows how to standardize.
///
/// The string form is the column name used in every archive table.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Field {
  Class,
  Act,
  Region,
  Country,
}

impl Field {
  pub fn rules(self) -> &'static [Rule] {
    match self {
      Self::Class => CLASS_RULES,
      Self::Act => ACT_RULES,
      Self::Region => REGION_RULES,
      Self::Country => COUNTRY_RULES,
    }
  }

  /// Apply this field's rule table to a raw value.
  pub fn normalize(self, value: Option<&str>) -> Option<String> {
    apply_rules(self.rules(), value)
  }

  /// Whitespace cleanup followed by [`Field::normalize`]; this is what the
  /// standardization driver writes back.
  pub fn standardize(self, value: Option<&str>) -> Option<String> {
    let cleaned = clean_text(value);
    self.normalize(cleaned.as_deref())
  }
}

/// Scan `rules` in order and return the first matching label, or the
/// title-cased input when nothing matches.
pub fn apply_rules(rules: &[Rule], value: Option<&str>) -> Option<String> {
  let lowered = value?.trim().to_lowercase();
  if lowered.is_empty() {
    return None;
  }

  let label = rules
    .iter()
    .find(|rule| rule.when.matches(&lowered))
    .map(|rule| rule.label.to_owned());

  Some(label.unwrap_or_else(|| title_case(&lowered)))
}

// ─── Text helpers ────────────────────────────────────────────────────────────

/// Collapse internal whitespace runs to a single space and trim both ends.
/// Absent or blank input stays absent.
pub fn clean_text(value: Option<&str>) -> Option<String> {
  let joined = value?.split_whitespace().collect::<Vec<_>>().join(" ");
  (!joined.is_empty()).then_some(joined)
}

/// Upper-case the first letter of every alphabetic run and lower-case the
/// rest, so `"n.w. provinces"` becomes `"N.W. Provinces"`.
pub fn title_case(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  let mut in_word = false;
  for c in value.chars() {
    if c.is_alphabetic() {
      if in_word {
        out.extend(c.to_lowercase());
      } else {
        out.extend(c.to_uppercase());
      }
      in_word = true;
    } else {
      out.push(c);
      in_word = false;
    }
  }
  out
}
