use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a tracked application. Declaration order is the order used
/// when sorting by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Applied,
    Interview,
    #[serde(rename = "In Review")]
    InReview,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Applied,
        Status::Interview,
        Status::InReview,
        Status::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Applied => "Applied",
            Status::Interview => "Interview",
            Status::InReview => "In Review",
            Status::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "applied" => Ok(Status::Applied),
            "interview" => Ok(Status::Interview),
            "inreview" => Ok(Status::InReview),
            "rejected" => Ok(Status::Rejected),
            _ => Err(format!(
                "unknown status '{}' (expected Applied, Interview, In Review or Rejected)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub job_url: String,
    pub job_title: String,
    #[serde(with = "crate::utils::time::flexible_date")]
    pub date_of_application: DateTime<Utc>,
    pub company: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    pub status: Status,
}

/// Optional text fields may arrive as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl JobApplication {
    /// Case-insensitive substring match on title or company.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        needle_lowercase.is_empty()
            || self.job_title.to_lowercase().contains(needle_lowercase)
            || self.company.to_lowercase().contains(needle_lowercase)
    }
}
