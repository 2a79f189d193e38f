//! The person record, the sole entity of the registry.
//!
//! `age`, `gender` and `nationality` are derived server-side on create.
//! A [`PersonDraft`] may carry client values for them, but the service
//! overwrites those before anything is persisted.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store-assigned identifier. Always positive once assigned.
pub type PersonId = i64;

/// A person record that has not been stored yet (or the mutable part of
/// one that has).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDraft {
  pub name:        String,
  #[serde(default)]
  pub surname:     String,
  #[serde(default)]
  pub patronymic:  String,
  #[serde(default)]
  pub age:         i32,
  #[serde(default)]
  pub gender:      String,
  #[serde(default)]
  pub nationality: String,
}

impl PersonDraft {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  /// Strip surrounding whitespace from the name.
  pub fn trim_name(&mut self) { trim_in_place(&mut self.name) }

  /// Reject drafts whose name is empty or whitespace.
  pub fn validate(&self) -> Result<()> { validate_name(&self.name) }

  pub fn with_id(self, id: PersonId) -> Person {
    Person {
      id,
      name:        self.name,
      surname:     self.surname,
      patronymic:  self.patronymic,
      age:         self.age,
      gender:      self.gender,
      nationality: self.nationality,
    }
  }
}

/// A stored person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:          PersonId,
  pub name:        String,
  pub surname:     String,
  pub patronymic:  String,
  pub age:         i32,
  pub gender:      String,
  pub nationality: String,
}

impl Person {
  pub fn trim_name(&mut self) { trim_in_place(&mut self.name) }

  pub fn validate(&self) -> Result<()> { validate_name(&self.name) }

  pub fn into_draft(self) -> PersonDraft {
    PersonDraft {
      name:        self.name,
      surname:     self.surname,
      patronymic:  self.patronymic,
      age:         self.age,
      gender:      self.gender,
      nationality: self.nationality,
    }
  }
}

fn trim_in_place(s: &mut String) {
  let trimmed = s.trim();
  if trimmed.len() != s.len() {
    *s = trimmed.to_owned();
  }
}

fn validate_name(name: &str) -> Result<()> {
  if name.trim().is_empty() {
    return Err(Error::EmptyName);
  }
  Ok(())
}
