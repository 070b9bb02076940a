use serde::{Deserialize, Serialize};

use crate::models::settings::Theme;

/// Body of `PATCH /settings/update`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdatePayload {
    pub name: String,
    pub theme: Theme,
    pub weekly_reminder: bool,
    pub monthly_reminder: bool,
    pub email_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl std::fmt::Debug for SettingsUpdatePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsUpdatePayload")
            .field("name", &self.name)
            .field("theme", &self.theme)
            .field("weekly_reminder", &self.weekly_reminder)
            .field("monthly_reminder", &self.monthly_reminder)
            .field("email_notification", &self.email_notification)
            .field("email", &self.email)
            .field("changes_password", &self.new_password.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureResponse {
    pub profile_picture_url: String,
}
