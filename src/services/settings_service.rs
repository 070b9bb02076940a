use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::middleware::in_flight::InFlight;
use crate::models::settings::{PendingPicture, SettingsDraft, Theme, UserSettings};
use crate::services::gateway::RemoteGateway;
use crate::services::session_store::SessionStore;
use crate::services::settings_reconciler::reconcile;

pub const UPDATE_SUCCESS: &str = "Settings updated successfully!";
pub const UPDATE_FAILED: &str = "Failed to update settings. Please try again.";
pub const LOAD_FAILED: &str = "Failed to load settings.";
pub const NO_FILE_SELECTED: &str = "No file selected";
pub const UPLOAD_SUCCESS: &str = "Profile picture uploaded successfully";
pub const UPLOAD_FAILED: &str = "Failed to upload profile picture";

#[derive(Debug, Clone, Default)]
pub struct SettingsView {
    pub settings: UserSettings,
    pub draft: SettingsDraft,
    pub pending_picture: Option<PendingPicture>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl SettingsView {
    pub fn toggle_theme(&mut self) -> Theme {
        self.settings.theme = self.settings.theme.toggled();
        self.settings.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
    }

    pub fn set_weekly_reminder(&mut self, enabled: bool) {
        self.settings.weekly_reminder = enabled;
    }

    pub fn set_monthly_reminder(&mut self, enabled: bool) {
        self.settings.monthly_reminder = enabled;
    }

    pub fn set_email_notification(&mut self, enabled: bool) {
        self.settings.email_notification = enabled;
    }

    fn fail(&mut self, err: Error, fallback: &str) -> Error {
        self.success = None;
        self.error = Some(err.user_message(fallback));
        err
    }

    fn succeed(&mut self, message: &str) {
        self.error = None;
        self.success = Some(message.to_string());
    }
}

#[derive(Clone)]
pub struct SettingsService {
    gateway: Arc<dyn RemoteGateway>,
    session: SessionStore,
    in_flight: InFlight,
}

impl SettingsService {
    pub fn new(gateway: Arc<dyn RemoteGateway>, session: SessionStore) -> Self {
        Self {
            gateway,
            session,
            in_flight: InFlight::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_pending()
    }

    pub async fn load(&self, view: &mut SettingsView) -> Result<()> {
        match self.gateway.fetch_settings().await {
            Ok(settings) => {
                self.session
                    .cache_profile(&settings.name, settings.profile_picture.as_deref())?;
                view.settings = settings;
                view.error = None;
                Ok(())
            }
            Err(e) => Err(view.fail(e, LOAD_FAILED)),
        }
    }

    /// Sends the staged edits. On failure the draft is kept so the user can
    /// correct it.
    pub async fn submit(&self, view: &mut SettingsView) -> Result<()> {
        let payload = match reconcile(&view.settings, &view.draft) {
            Ok(payload) => payload,
            Err(e) => return Err(view.fail(e, UPDATE_FAILED)),
        };

        let _ticket = match self.in_flight.try_begin() {
            Ok(ticket) => ticket,
            Err(e) => return Err(view.fail(e, UPDATE_FAILED)),
        };
        match self.gateway.update_settings(&payload).await {
            Ok(canonical) => {
                view.settings.merge(canonical);
                view.draft.clear();
                self.session.cache_profile(
                    &view.settings.name,
                    view.settings.profile_picture.as_deref(),
                )?;
                tracing::info!(name = %view.settings.name, "Settings updated");
                view.succeed(UPDATE_SUCCESS);
                Ok(())
            }
            Err(e) => Err(view.fail(e, UPDATE_FAILED)),
        }
    }

    /// Stages a local image for upload.
    pub async fn select_picture(&self, view: &mut SettingsView, path: &Path) -> Result<()> {
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => {
                return Err(view.fail(
                    Error::Validation(format!("Invalid file name: {}", path.display())),
                    UPLOAD_FAILED,
                ))
            }
        };
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read picture");
                return Err(view.fail(
                    Error::Io(e),
                    &format!("Could not read {}", path.display()),
                ));
            }
        };
        if bytes.is_empty() {
            return Err(view.fail(
                Error::Validation(format!("{} is empty", file_name)),
                UPLOAD_FAILED,
            ));
        }
        tracing::debug!(file = %file_name, size = bytes.len(), "Picture selected");
        view.pending_picture = Some(PendingPicture { file_name, bytes });
        Ok(())
    }

    pub async fn upload_picture(&self, view: &mut SettingsView) -> Result<String> {
        let picture = match view.pending_picture.clone() {
            Some(picture) => picture,
            None => {
                return Err(view.fail(
                    Error::Validation(NO_FILE_SELECTED.to_string()),
                    UPLOAD_FAILED,
                ))
            }
        };

        let _ticket = match self.in_flight.try_begin() {
            Ok(ticket) => ticket,
            Err(e) => return Err(view.fail(e, UPLOAD_FAILED)),
        };
        match self
            .gateway
            .upload_profile_picture(&picture.file_name, picture.bytes)
            .await
        {
            Ok(response) => {
                let url = response.profile_picture_url;
                view.settings.profile_picture = Some(url.clone());
                view.pending_picture = None;
                self.session.cache_profile(&view.settings.name, Some(&url))?;
                tracing::info!(%url, "Profile picture uploaded");
                view.succeed(UPLOAD_SUCCESS);
                Ok(url)
            }
            Err(e) => Err(view.fail(e, UPLOAD_FAILED)),
        }
    }
}
