use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::job_application::{JobApplication, Status};

/// Body of `POST /jobapp` and `PUT /jobapp/{id}`. Only the fields that are set
/// are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[validate(length(min = 1, message = "Job title cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_application: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Company cannot be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl JobApplicationPayload {
    pub fn is_empty(&self) -> bool {
        *self == JobApplicationPayload::default()
    }

    /// Overlays the fields set in `other`.
    pub fn apply(&mut self, other: JobApplicationPayload) {
        if other.job_url.is_some() {
            self.job_url = other.job_url;
        }
        if other.job_title.is_some() {
            self.job_title = other.job_title;
        }
        if other.date_of_application.is_some() {
            self.date_of_application = other.date_of_application;
        }
        if other.company.is_some() {
            self.company = other.company;
        }
        if other.location.is_some() {
            self.location = other.location;
        }
        if other.status.is_some() {
            self.status = other.status;
        }
    }
}

impl From<&JobApplication> for JobApplicationPayload {
    fn from(app: &JobApplication) -> Self {
        Self {
            job_url: Some(app.job_url.clone()),
            job_title: Some(app.job_title.clone()),
            date_of_application: Some(app.date_of_application.date_naive()),
            company: Some(app.company.clone()),
            location: Some(app.location.clone()),
            status: Some(app.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatusPayload {
    pub id: String,
    pub status: Status,
}
