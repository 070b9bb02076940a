use std::sync::Arc;

use validator::Validate;

use crate::dto::job_dto::{JobApplicationPayload, UpdateStatusPayload};
use crate::error::{Error, Result};
use crate::middleware::in_flight::InFlight;
use crate::models::job_application::{JobApplication, Status};
use crate::models::session::Session;
use crate::services::collection_view::{self, PageSlice, SortSpec, ViewState};
use crate::services::gateway::RemoteGateway;
use crate::services::session_store::SessionStore;
use crate::utils::time;

pub const LOAD_FAILED: &str = "Failed to load applications. Please try again.";
pub const SAVE_FAILED: &str = "Failed to save application. Please try again.";
pub const STATUS_FAILED: &str = "Failed to update status. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete application. Please try again.";

/// State behind the home view: the loaded records, the list controls, the
/// add/edit form and the cached profile shown in the header.
#[derive(Debug, Clone, Default)]
pub struct HomeView {
    pub applications: Vec<JobApplication>,
    pub view: ViewState,
    pub form: JobApplicationPayload,
    /// Id of the record being edited; `None` means the form creates.
    pub editing: Option<String>,
    pub profile: Session,
    pub error: Option<String>,
}

impl HomeView {
    pub fn new(page_size: usize) -> Self {
        Self {
            view: ViewState::with_page_size(page_size),
            ..Default::default()
        }
    }

    pub fn visible(&self) -> PageSlice {
        collection_view::apply(&self.applications, &self.view)
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.view.set_search(query);
    }

    pub fn set_sort(&mut self, spec: SortSpec) {
        self.view.set_sort(spec);
    }

    pub fn set_page(&mut self, page: usize) {
        self.view.set_page(page);
    }

    pub fn find(&self, id: &str) -> Option<&JobApplication> {
        self.applications.iter().find(|app| app.id == id)
    }

    /// Prefills the form from an existing record.
    pub fn begin_edit(&mut self, id: &str) -> Result<()> {
        let app = self
            .find(id)
            .ok_or_else(|| Error::NotFound(format!("application {}", id)))?;
        self.form = JobApplicationPayload::from(app);
        self.editing = Some(id.to_string());
        Ok(())
    }

    pub fn reset_form(&mut self) {
        self.form = JobApplicationPayload::default();
        self.editing = None;
    }
}

#[derive(Clone)]
pub struct ApplicationService {
    gateway: Arc<dyn RemoteGateway>,
    session: SessionStore,
    in_flight: InFlight,
    page_size: usize,
}

impl ApplicationService {
    pub fn new(gateway: Arc<dyn RemoteGateway>, session: SessionStore, page_size: usize) -> Self {
        Self {
            gateway,
            session,
            in_flight: InFlight::new(),
            page_size,
        }
    }

    pub fn new_view(&self) -> HomeView {
        HomeView::new(self.page_size)
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_pending()
    }

    /// Entry into the home view: the list plus the profile for the header.
    pub async fn load(&self, home: &mut HomeView) -> Result<()> {
        self.reload(home).await?;
        home.profile = self.refresh_profile().await?;
        Ok(())
    }

    /// Replaces the local list with the gateway's copy.
    pub async fn reload(&self, home: &mut HomeView) -> Result<()> {
        match self.gateway.list_applications().await {
            Ok(applications) => {
                tracing::debug!(count = applications.len(), "Applications loaded");
                home.applications = applications;
                home.error = None;
                Ok(())
            }
            Err(e) => Err(record(home, e, LOAD_FAILED)),
        }
    }

    /// Reads the profile from the settings endpoint and caches it in the
    /// session. Anything but an auth failure falls back to the cached copy.
    async fn refresh_profile(&self) -> Result<Session> {
        match self.gateway.fetch_settings().await {
            Ok(settings) => {
                self.session
                    .cache_profile(&settings.name, settings.profile_picture.as_deref())?;
            }
            Err(e) if e.is_auth() => return Err(e),
            Err(e) => tracing::warn!(error = %e, "Failed to load profile, using cached values"),
        }
        self.session.session()
    }

    /// Creates a record, or updates the one being edited, then reloads.
    pub async fn submit_form(&self, home: &mut HomeView) -> Result<()> {
        let payload = match self.prepare(home) {
            Ok(payload) => payload,
            Err(e) => return Err(record(home, e, SAVE_FAILED)),
        };

        let _ticket = self.in_flight.try_begin()?;
        let saved = match &home.editing {
            Some(id) => self.gateway.update_application(id, &payload).await,
            None => self.gateway.create_application(&payload).await,
        };
        match saved {
            Ok(app) => {
                tracing::info!(id = %app.id, title = %app.job_title, "Application saved");
                home.reset_form();
                self.reload(home).await
            }
            Err(e) => Err(record(home, e, SAVE_FAILED)),
        }
    }

    fn prepare(&self, home: &HomeView) -> Result<JobApplicationPayload> {
        let mut payload = home.form.clone();
        payload.validate()?;
        if home.editing.is_some() {
            if payload.is_empty() {
                return Err(Error::Validation("Nothing to update".to_string()));
            }
            return Ok(payload);
        }

        if payload.job_title.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(Error::Validation("Job title is required".to_string()));
        }
        if payload.company.as_deref().map_or(true, |c| c.trim().is_empty()) {
            return Err(Error::Validation("Company is required".to_string()));
        }
        payload
            .date_of_application
            .get_or_insert_with(|| time::now().date_naive());
        payload.status.get_or_insert(Status::Applied);
        Ok(payload)
    }

    pub async fn update_status(&self, home: &mut HomeView, id: &str, status: Status) -> Result<()> {
        let _ticket = self.in_flight.try_begin()?;
        let payload = UpdateStatusPayload {
            id: id.to_string(),
            status,
        };
        match self.gateway.update_status(&payload).await {
            Ok(()) => {
                tracing::info!(%id, %status, "Application status updated");
                self.reload(home).await
            }
            Err(e) => Err(record(home, e, STATUS_FAILED)),
        }
    }

    pub async fn delete(&self, home: &mut HomeView, id: &str) -> Result<()> {
        let _ticket = self.in_flight.try_begin()?;
        match self.gateway.delete_application(id).await {
            Ok(()) => {
                tracing::info!(%id, "Application deleted");
                if home.editing.as_deref() == Some(id) {
                    home.reset_form();
                }
                self.reload(home).await
            }
            Err(e) => Err(record(home, e, DELETE_FAILED)),
        }
    }
}

fn record(home: &mut HomeView, err: Error, fallback: &str) -> Error {
    home.error = Some(err.user_message(fallback));
    err
}
