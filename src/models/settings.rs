use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Canonical account settings as held by the gateway.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub weekly_reminder: bool,
    #[serde(default)]
    pub monthly_reminder: bool,
    #[serde(default)]
    pub email_notification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl UserSettings {
    /// Folds the gateway's canonical copy into local state. A response that
    /// omits the picture keeps the one already known.
    pub fn merge(&mut self, canonical: UserSettings) {
        let picture = canonical
            .profile_picture
            .filter(|p| !p.trim().is_empty())
            .or_else(|| self.profile_picture.take());
        *self = UserSettings {
            profile_picture: picture,
            ..canonical
        };
    }
}

/// Staged, unconfirmed edits. Empty fields are "not supplied".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsDraft {
    pub new_name: String,
    pub confirm_new_name: String,
    pub new_email: String,
    pub confirm_new_email: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl SettingsDraft {
    pub fn clear(&mut self) {
        *self = SettingsDraft::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == SettingsDraft::default()
    }
}

/// Image selected locally but not uploaded yet.
#[derive(Clone, PartialEq, Eq)]
pub struct PendingPicture {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PendingPicture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingPicture")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
