//! Name validation and normalization.
//!
//! Pure functions, no I/O. Names are restricted to Latin and Cyrillic
//! letters, spaces, and hyphens; every space- or hyphen-separated token is
//! title-cased. `normalize` is idempotent, which keeps re-registration and
//! duplicate comparison stable.

use crate::error::{Result, ShiftError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-zА-Яа-яЁё][A-Za-zА-Яа-яЁё\- ]{0,49}$").unwrap()
    })
}

/// Validate and normalize one name piece.
///
/// Collapses whitespace runs, then capitalizes the first letter of each
/// space/hyphen-separated token and lowercases the rest.
pub fn normalize(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !name_re().is_match(trimmed) {
        return Err(ShiftError::InvalidName);
    }

    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::with_capacity(collapsed.len());
    let mut token_start = true;
    for ch in collapsed.chars() {
        if ch == ' ' || ch == '-' {
            out.push(ch);
            token_start = true;
        } else if token_start {
            out.extend(ch.to_uppercase());
            token_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    Ok(out)
}

/// Fold a name for duplicate comparison: lowercase, whitespace collapsed.
pub fn fold_for_compare(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn initial(value: &str) -> Option<char> {
    value
        .chars()
        .find(|c| c.is_alphabetic())
        .and_then(|c| c.to_uppercase().next())
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A validated, normalized name triple collected during registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub last: String,
    pub first: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
}

impl Profile {
    /// Build a profile from raw user input. An empty middle name is allowed
    /// and stored as `None`; last and first are mandatory.
    pub fn from_raw(last: &str, first: &str, middle: Option<&str>) -> Result<Profile> {
        let middle = match middle.map(str::trim) {
            None | Some("") => None,
            Some(m) => Some(normalize(m)?),
        };
        Ok(Profile {
            last: normalize(last)?,
            first: normalize(first)?,
            middle,
        })
    }

    /// "Last First Middle" with absent pieces skipped.
    pub fn full_name(&self) -> String {
        let mut parts = vec![self.last.as_str(), self.first.as_str()];
        if let Some(m) = &self.middle {
            parts.push(m.as_str());
        }
        parts.join(" ")
    }

    /// Compact form for sheet display: "Last F. M." or "Last F.".
    pub fn compact(&self) -> String {
        let mut pieces = vec![self.last.clone()];
        if let Some(i) = initial(&self.first) {
            pieces.push(format!("{i}."));
        }
        if let Some(i) = self.middle.as_deref().and_then(initial) {
            pieces.push(format!("{i}."));
        }
        pieces.join(" ")
    }

    /// Greeting form: "First Middle" or just "First".
    pub fn display_name(&self) -> String {
        match &self.middle {
            Some(m) => format!("{} {}", self.first, m),
            None => self.first.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
