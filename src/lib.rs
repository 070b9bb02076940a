pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::routes::navigator::Navigator;
use crate::services::{
    analytics_service::AnalyticsService, application_service::ApplicationService,
    auth_service::AuthService, gateway::HttpGateway, gateway::RemoteGateway,
    session_store::SessionStore, settings_service::SettingsService,
};

#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    pub gateway: Arc<dyn RemoteGateway>,
    pub auth_service: AuthService,
    pub application_service: ApplicationService,
    pub analytics_service: AnalyticsService,
    pub settings_service: SettingsService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let session = SessionStore::open(&config.storage_path)?;
        let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::new(config, session.clone())?);
        Ok(Self::with_gateway(session, gateway, config.page_size))
    }

    pub fn with_gateway(
        session: SessionStore,
        gateway: Arc<dyn RemoteGateway>,
        page_size: usize,
    ) -> Self {
        let auth_service = AuthService::new(gateway.clone(), session.clone());
        let application_service =
            ApplicationService::new(gateway.clone(), session.clone(), page_size);
        let analytics_service = AnalyticsService::new(gateway.clone());
        let settings_service = SettingsService::new(gateway.clone(), session.clone());

        Self {
            session,
            gateway,
            auth_service,
            application_service,
            analytics_service,
            settings_service,
        }
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.session.clone())
    }
}
