use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::job_application::{JobApplication, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    #[serde(default)]
    pub applied: u64,
    #[serde(default)]
    pub interview: u64,
    #[serde(default)]
    pub in_review: u64,
    #[serde(default)]
    pub rejected: u64,
}

impl StatusCounts {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Applied => self.applied += 1,
            Status::Interview => self.interview += 1,
            Status::InReview => self.in_review += 1,
            Status::Rejected => self.rejected += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.applied + self.interview + self.in_review + self.rejected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Monthly,
    Yearly,
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(Period::Monthly),
            "yearly" | "year" => Ok(Period::Yearly),
            other => Err(format!("unknown period '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub applied: u64,
    #[serde(default)]
    pub interview: u64,
    #[serde(default)]
    pub in_review: u64,
    #[serde(default)]
    pub rejected: u64,
    #[serde(default)]
    pub monthly: BTreeMap<String, StatusCounts>,
    #[serde(default)]
    pub yearly: BTreeMap<String, StatusCounts>,
}

impl Analytics {
    /// Derives the aggregate from a list of records. Monthly buckets are keyed
    /// `YYYY-MM`, yearly buckets `YYYY`.
    pub fn from_applications(applications: &[JobApplication]) -> Self {
        let mut overall = StatusCounts::default();
        let mut monthly: BTreeMap<String, StatusCounts> = BTreeMap::new();
        let mut yearly: BTreeMap<String, StatusCounts> = BTreeMap::new();

        for app in applications {
            let date = app.date_of_application;
            overall.record(app.status);
            monthly
                .entry(format!("{:04}-{:02}", date.year(), date.month()))
                .or_default()
                .record(app.status);
            yearly
                .entry(format!("{:04}", date.year()))
                .or_default()
                .record(app.status);
        }

        Self {
            total: applications.len() as u64,
            applied: overall.applied,
            interview: overall.interview,
            in_review: overall.in_review,
            rejected: overall.rejected,
            monthly,
            yearly,
        }
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            applied: self.applied,
            interview: self.interview,
            in_review: self.in_review,
            rejected: self.rejected,
        }
    }

    /// Chart series for the selected period, oldest first.
    pub fn series(&self, period: Period) -> Vec<(String, StatusCounts)> {
        let source = match period {
            Period::Monthly => &self.monthly,
            Period::Yearly => &self.yearly,
        };
        source.iter().map(|(k, v)| (k.clone(), *v)).collect()
    }

    pub fn summary_cards(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("Total Applications", self.total),
            ("Applied Applications", self.applied),
            ("Interview Applications", self.interview),
            ("In Review Applications", self.in_review),
            ("Rejected Applications", self.rejected),
        ]
    }
}
