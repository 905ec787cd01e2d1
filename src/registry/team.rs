use std::{fmt, str::FromStr};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug, Hash, Default,
)]
pub enum ShirtSize {
    #[serde(rename = "XS")]
    ExtraSmall,
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    #[default]
    Medium,
    #[serde(rename = "L")]
    Large,
    #[serde(rename = "XL")]
    ExtraLarge,
    #[serde(rename = "XXL")]
    DoubleExtraLarge,
}

impl ShirtSize {
    pub const ALL: [ShirtSize; 6] = [
        ShirtSize::ExtraSmall,
        ShirtSize::Small,
        ShirtSize::Medium,
        ShirtSize::Large,
        ShirtSize::ExtraLarge,
        ShirtSize::DoubleExtraLarge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShirtSize::ExtraSmall => "XS",
            ShirtSize::Small => "S",
            ShirtSize::Medium => "M",
            ShirtSize::Large => "L",
            ShirtSize::ExtraLarge => "XL",
            ShirtSize::DoubleExtraLarge => "XXL",
        }
    }
}

impl fmt::Display for ShirtSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShirtSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShirtSize::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown shirt size `{s}`"))
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    /// Holds one of the limited slots.
    Confirmed,
    /// Registered beyond capacity, waiting for a slot to open up.
    Waitlisted,
}

impl TeamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamStatus::Confirmed => "confirmed",
            TeamStatus::Waitlisted => "waitlisted",
        }
    }
}

impl fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Athlete {
    pub name: String,
    pub shirt_size: ShirtSize,
    pub phone: String,
}

/// The fields of a team supplied by whoever fills in the registration form.
/// The registry assigns everything else.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct TeamDraft {
    pub team_name: String,
    pub contact_email: String,
    pub athletes: [Athlete; 2],
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Team {
    pub id: Uuid,
    pub team_name: String,
    pub contact_email: String,
    pub athletes: [Athlete; 2],
    pub status: TeamStatus,
    pub timestamp: DateTime<Utc>,
}

impl Team {
    pub fn from_draft(
        draft: TeamDraft,
        status: TeamStatus,
        id: Uuid,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Team {
            id,
            team_name: draft.team_name,
            contact_email: draft.contact_email,
            athletes: draft.athletes,
            status,
            timestamp,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == TeamStatus::Confirmed
    }

    pub fn is_waitlisted(&self) -> bool {
        self.status == TeamStatus::Waitlisted
    }

    /// Formats the registration instant the same way everywhere it is shown
    /// (pages and exports).
    pub fn registered_at(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
