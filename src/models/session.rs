use serde::{Deserialize, Serialize};

pub const DEFAULT_AVATAR: &str = "/default-avatar.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<String>,
    pub user_name: String,
    pub profile_picture_url: String,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            token: None,
            user_name: String::new(),
            profile_picture_url: DEFAULT_AVATAR.to_string(),
        }
    }
}
