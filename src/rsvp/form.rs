//! RSVP form validation
//!
//! Rules follow the page: name and email need at least two characters after
//! trimming, the email must look like `a@b.c`, and a home country must be
//! picked. Invalid fields are cleared; valid ones are kept.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::matchday::CountryCatalog;
use crate::roster::NewAttendance;

const MIN_FIELD_CHARS: usize = 2;

fn looks_like_email(value: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").ok())
        .as_ref()
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// Field values as entered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country_code: String,
}

/// Form fields that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    HomeCountry,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Name => write!(f, "name"),
            Field::Email => write!(f, "email"),
            Field::HomeCountry => write!(f, "home_country"),
        }
    }
}

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Rejected form: the failed rules and the form with invalid fields cleared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub errors: Vec<FieldError>,
    pub form: RsvpForm,
}

impl Rejected {
    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl RsvpForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            country_code: country_code.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.country_code.is_empty()
    }

    /// Check every rule and build the store payload
    ///
    /// `countries` resolves the picked code to the name stored with the
    /// record.
    pub fn validate(&self, countries: &CountryCatalog) -> Result<NewAttendance, Rejected> {
        let name = self.name.trim();
        let email = self.email.trim();
        let code = self.country_code.trim();

        let mut errors = Vec::new();
        let mut cleared = self.clone();

        if name.chars().count() < MIN_FIELD_CHARS {
            errors.push(FieldError::new(
                Field::Name,
                "Name must be at least 2 characters",
            ));
            cleared.name.clear();
        }

        if email.is_empty() {
            errors.push(FieldError::new(Field::Email, "Email is required"));
            cleared.email.clear();
        } else if email.chars().count() < MIN_FIELD_CHARS || !looks_like_email(email) {
            errors.push(FieldError::new(Field::Email, "Email address is not valid"));
            cleared.email.clear();
        }

        let country = if code.is_empty() {
            errors.push(FieldError::new(Field::HomeCountry, "Pick your home country"));
            cleared.country_code.clear();
            None
        } else {
            match countries.get(code) {
                Some(country) => Some(country),
                None => {
                    errors.push(FieldError::new(
                        Field::HomeCountry,
                        format!("Unknown country: {}", code),
                    ));
                    cleared.country_code.clear();
                    None
                }
            }
        };

        match country {
            Some(country) if errors.is_empty() => Ok(NewAttendance::new(
                name,
                email,
                country.code.clone(),
                country.name.clone(),
            )),
            _ => Err(Rejected {
                errors,
                form: cleared,
            }),
        }
    }
}
