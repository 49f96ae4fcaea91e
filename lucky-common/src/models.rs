//! Group and probability override data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Per-group probability overrides: member name -> tier
///
/// Keyed by display name, so renaming a member drops its override.
pub type OverrideMap = BTreeMap<String, Tier>;

/// A named collection of members that draws are run against
///
/// Timestamps serialize as Unix epoch milliseconds, the format the front end
/// and the JSON store files use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub group_name: String,
    pub members: Vec<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Absent only on records written before last-used tracking existed
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_used: Option<DateTime<Utc>>,
}

impl Group {
    /// Sort key for recency ordering; never-used groups count as 0
    pub fn last_used_millis(&self) -> i64 {
        self.last_used.map(|t| t.timestamp_millis()).unwrap_or(0)
    }
}

/// Input for creating a group
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub group_name: String,
    pub members: Vec<String>,
}

impl NewGroup {
    pub fn new(group_name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            group_name: group_name.into(),
            members,
        }
    }
}

/// Input for updating a group; omitted fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupUpdate {
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub members: Option<Vec<String>>,
}

/// Probability override tier for one member
///
/// Older front-end builds stored colours (`white`, `green`, `red`); those
/// spellings are still accepted on input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    #[serde(alias = "white")]
    Fair,
    #[serde(alias = "green")]
    Favored,
    #[serde(alias = "red")]
    Suppressed,
}

impl Tier {
    pub const FAIR_WEIGHT: f64 = 1.0;
    pub const FAVORED_WEIGHT: f64 = 1.1;
    pub const SUPPRESSED_WEIGHT: f64 = 0.001;

    /// Relative selection weight for this tier
    pub fn weight(self) -> f64 {
        match self {
            Tier::Fair => Self::FAIR_WEIGHT,
            Tier::Favored => Self::FAVORED_WEIGHT,
            Tier::Suppressed => Self::SUPPRESSED_WEIGHT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Fair => "fair",
            Tier::Favored => "favored",
            Tier::Suppressed => "suppressed",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fair" | "white" => Ok(Tier::Fair),
            "favored" | "green" => Ok(Tier::Favored),
            "suppressed" | "red" => Ok(Tier::Suppressed),
            other => Err(crate::Error::Validation(format!("unknown tier '{}'", other))),
        }
    }
}

/// Result of one draw: the winner plus the member list it was drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub winner: String,
    pub members: Vec<String>,
}
