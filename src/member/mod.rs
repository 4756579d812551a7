//! Member records as they come out of the record store
//!
//! Record shapes are loose: identities arrive as strings or numbers, sponsor
//! references and referral codes are sometimes missing and sometimes empty.
//! Everything is normalised here so the tree and statistics code only ever
//! sees `Option` for "absent" and never has to test for falsy values.

mod lenient;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fold a key for case-insensitive comparison.
///
/// Keys are trimmed and lower-cased. Both referral codes and sponsor
/// references go through this before any lookup.
pub fn fold(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Flat member record (read-only to this crate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique identity.
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub id: String,

    /// Display name.
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub name: String,

    /// Identity or referral code of the inviting member; `None` for a root member.
    #[serde(
        default,
        alias = "sponsor",
        alias = "referredBy",
        deserialize_with = "lenient::optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub sponsor_id: Option<String>,

    /// Referral code handed out by this member.
    #[serde(
        default,
        deserialize_with = "lenient::optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub referral_code: Option<String>,

    /// Registration timestamp.
    #[serde(
        default,
        alias = "createdAt",
        alias = "joinDate",
        deserialize_with = "lenient::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub joined_at: Option<DateTime<Utc>>,

    /// Activity flag.
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,

    /// Profile image reference.
    #[serde(
        default,
        alias = "profileImage",
        deserialize_with = "lenient::optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Member {
    /// Active root member with no sponsor and no referral code.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sponsor_id: None,
            referral_code: None,
            joined_at: None,
            active: true,
            avatar: None,
        }
    }

    /// Set the sponsor reference (identity or referral code). Blank means absent.
    pub fn with_sponsor(mut self, sponsor: impl Into<String>) -> Self {
        self.sponsor_id = non_blank(sponsor.into());
        self
    }

    /// Set the referral code. Blank means absent.
    pub fn with_referral_code(mut self, code: impl Into<String>) -> Self {
        self.referral_code = non_blank(code.into());
        self
    }

    /// Set the registration timestamp.
    pub fn with_joined_at(mut self, joined_at: DateTime<Utc>) -> Self {
        self.joined_at = Some(joined_at);
        self
    }

    /// Set the activity flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Referral code, or the empty string when absent.
    pub fn referral_code(&self) -> &str {
        self.referral_code.as_deref().unwrap_or_default()
    }

    /// Sponsor reference with surrounding whitespace removed, if any.
    pub fn sponsor(&self) -> Option<&str> {
        self.sponsor_id
            .as_deref()
            .map(str::trim)
            .filter(|sponsor| !sponsor.is_empty())
    }

    /// Key under which this member's downline is filed by referral code.
    ///
    /// `None` when the member has no usable referral code; an empty code
    /// must never match an empty sponsor reference.
    pub fn placement_key(&self) -> Option<String> {
        self.referral_code
            .as_deref()
            .map(fold)
            .filter(|key| !key.is_empty())
    }

    /// Key under which this member's downline is filed by identity.
    pub fn identity_key(&self) -> Option<String> {
        Some(fold(&self.id)).filter(|key| !key.is_empty())
    }

    /// Whether `reference` names this member by identity.
    pub fn is_identified_by(&self, reference: &str) -> bool {
        let id = self.id.trim();
        !id.is_empty() && id == reference.trim()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
