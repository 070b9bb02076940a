use std::sync::Arc;

use crate::error::Result;
use crate::models::session::{Session, DEFAULT_AVATAR};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::utils::token::normalize_token;

pub const TOKEN_KEY: &str = "token";
pub const USER_NAME_KEY: &str = "userName";
pub const PROFILE_PICTURE_KEY: &str = "userProfilePicture";

/// Single source of truth for "is a user logged in". Cloned into every
/// component that needs the session; clones share the same storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self> {
        Ok(Self::new(Arc::new(FileStore::open(path)?)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn get_token(&self) -> Result<Option<String>> {
        Ok(normalize_token(self.storage.get(TOKEN_KEY)?))
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.get_token()?.is_some())
    }

    /// Stores a freshly issued session. A `None` picture leaves any cached
    /// picture untouched.
    pub fn set_session(&self, token: &str, user_name: &str, picture_url: Option<&str>) -> Result<()> {
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_NAME_KEY, user_name)?;
        if let Some(url) = picture_url {
            self.storage.set(PROFILE_PICTURE_KEY, url)?;
        }
        tracing::info!(user = %user_name, "Session started");
        Ok(())
    }

    /// Refreshes the cached display fields without touching the token.
    pub fn cache_profile(&self, user_name: &str, picture_url: Option<&str>) -> Result<()> {
        self.storage.set(USER_NAME_KEY, user_name)?;
        match picture_url.filter(|p| !p.trim().is_empty()) {
            Some(url) => self.storage.set(PROFILE_PICTURE_KEY, url),
            None => self.storage.set(PROFILE_PICTURE_KEY, DEFAULT_AVATAR),
        }
    }

    pub fn clear_session(&self) -> Result<()> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_NAME_KEY)?;
        self.storage.remove(PROFILE_PICTURE_KEY)?;
        tracing::info!("Session cleared");
        Ok(())
    }

    pub fn session(&self) -> Result<Session> {
        let user_name = self.storage.get(USER_NAME_KEY)?.unwrap_or_default();
        let profile_picture_url = self
            .storage
            .get(PROFILE_PICTURE_KEY)?
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR.to_string());
        Ok(Session {
            token: self.get_token()?,
            user_name,
            profile_picture_url,
        })
    }
}
