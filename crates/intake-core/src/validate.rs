//! Intake validation: raw submission in, [`NewLead`] or per-field errors out.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result, lead::NewLead};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
  )
  .expect("email pattern is valid")
});

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A single failed constraint, keyed by the wire name of the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: String,
}

impl FieldError {
  pub fn new(field: &'static str, message: impl Into<String>) -> Self {
    Self {
      field,
      message: message.into(),
    }
  }
}

/// Every constraint a submission failed. Serialises as
/// `{"errors": [{"field": ..., "message": ...}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
  pub errors: Vec<FieldError>,
}

impl ValidationErrors {
  pub fn push(&mut self, error: FieldError) { self.errors.push(error); }

  pub fn is_empty(&self) -> bool { self.errors.is_empty() }

  pub fn has(&self, field: &str) -> bool {
    self.errors.iter().any(|e| e.field == field)
  }
}

impl From<FieldError> for ValidationErrors {
  fn from(error: FieldError) -> Self {
    Self {
      errors: vec![error],
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("validation failed")?;
    for (i, e) in self.errors.iter().enumerate() {
      let sep = if i == 0 { ": " } else { "; " };
      write!(f, "{sep}{}: {}", e.field, e.message)?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

// ─── Submission ──────────────────────────────────────────────────────────────

/// Unvalidated intake fields, as received from JSON or a multipart form.
/// Missing fields deserialise to empty values so that they are reported as
/// validation errors instead of decode failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadSubmission {
  pub first_name:             String,
  pub last_name:              String,
  pub email:                  String,
  pub country_of_citizenship: String,
  pub linkedin_url:           Option<String>,
  pub google_scholar_url:     Option<String>,
  pub visa_categories:        Vec<String>,
  pub help_description:       String,
}

impl LeadSubmission {
  /// Record one text field of a form submission. Unknown names are ignored.
  ///
  /// `visaCategories` may arrive either as a JSON array or as repeated plain
  /// values; both accumulate.
  pub fn set_form_field(&mut self, name: &str, value: String) -> Result<()> {
    match name {
      "firstName" => self.first_name = value,
      "lastName" => self.last_name = value,
      "email" => self.email = value,
      "countryOfCitizenship" => self.country_of_citizenship = value,
      "linkedinUrl" => self.linkedin_url = Some(value),
      "googleScholarUrl" => self.google_scholar_url = Some(value),
      "helpDescription" => self.help_description = value,
      "visaCategories" | "visaCategories[]" => {
        if value.trim_start().starts_with('[') {
          let parsed: Vec<String> = serde_json::from_str(&value).map_err(|e| {
            Error::MalformedInput(format!("visaCategories is not a JSON string array: {e}"))
          })?;
          self.visa_categories.extend(parsed);
        } else {
          self.visa_categories.push(value);
        }
      }
      _ => {}
    }
    Ok(())
  }

  /// Validate every field.
  pub fn validate(self) -> Result<NewLead, ValidationErrors> {
    self.validate_with(std::iter::empty())
  }

  /// Validate every field, also reporting `extra` errors found by the caller
  /// (e.g. on an attachment). Fails if either set is non-empty.
  pub fn validate_with(
    self,
    extra: impl IntoIterator<Item = FieldError>,
  ) -> Result<NewLead, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let first_name = self.first_name.trim().to_owned();
    if first_name.chars().count() < 2 {
      errors.push(FieldError::new(
        "firstName",
        "First name must be at least 2 characters.",
      ));
    }

    let last_name = self.last_name.trim().to_owned();
    if last_name.chars().count() < 2 {
      errors.push(FieldError::new(
        "lastName",
        "Last name must be at least 2 characters.",
      ));
    }

    let email = self.email.trim().to_owned();
    if !EMAIL.is_match(&email) {
      errors.push(FieldError::new("email", "Invalid email address."));
    }

    let country_of_citizenship = self.country_of_citizenship.trim().to_owned();
    if country_of_citizenship.is_empty() {
      errors.push(FieldError::new(
        "countryOfCitizenship",
        "Country of citizenship is required.",
      ));
    }

    let linkedin_url = optional_url(self.linkedin_url);
    if linkedin_url.as_deref().is_some_and(|u| !is_web_url(u)) {
      errors.push(FieldError::new("linkedinUrl", "Invalid LinkedIn URL."));
    }

    let google_scholar_url = optional_url(self.google_scholar_url);
    if google_scholar_url.as_deref().is_some_and(|u| !is_web_url(u)) {
      errors.push(FieldError::new(
        "googleScholarUrl",
        "Invalid Google Scholar URL.",
      ));
    }

    let mut visa_categories: Vec<String> = Vec::new();
    for category in self.visa_categories {
      let category = category.trim();
      if !category.is_empty() && !visa_categories.iter().any(|c| c == category) {
        visa_categories.push(category.to_owned());
      }
    }
    if visa_categories.is_empty() {
      errors.push(FieldError::new(
        "visaCategories",
        "Please select at least one visa category.",
      ));
    }

    let help_description = self.help_description.trim().to_owned();
    if help_description.chars().count() < 10 {
      errors.push(FieldError::new(
        "helpDescription",
        "Please provide more information (at least 10 characters).",
      ));
    }

    errors.errors.extend(extra);
    if !errors.is_empty() {
      return Err(errors);
    }

    Ok(NewLead {
      first_name,
      last_name,
      email,
      country_of_citizenship,
      linkedin_url,
      google_scholar_url,
      visa_categories,
      help_description,
    })
  }
}

/// Blank optional URLs count as absent.
fn optional_url(raw: Option<String>) -> Option<String> {
  raw
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
}

fn is_web_url(raw: &str) -> bool {
  Url::parse(raw)
    .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
    .unwrap_or(false)
}
