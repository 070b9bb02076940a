use std::sync::Arc;

use crate::dto::auth_dto::{LoginPayload, RegisterPayload};
use crate::error::Result;
use crate::middleware::in_flight::InFlight;
use crate::models::session::Session;
use crate::services::gateway::RemoteGateway;
use crate::services::session_store::SessionStore;
use crate::utils::validation::validate;

pub const REGISTER_SUCCESS: &str = "Registration successful! Please sign in.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
pub const LOGIN_FAILED: &str = "Sign-in failed. Check your credentials and try again.";

#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn RemoteGateway>,
    session: SessionStore,
    in_flight: InFlight,
}

impl AuthService {
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

    /// Creates the account. The caller is expected to send the user to the
    /// sign-in view afterwards; no session is started.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let payload = RegisterPayload {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validate(&payload)?;

        let _ticket = self.in_flight.try_begin()?;
        self.gateway.register(&payload).await?;
        tracing::info!(email = %payload.email, "Account registered");
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let payload = LoginPayload {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validate(&payload)?;

        let _ticket = self.in_flight.try_begin()?;
        let response = self.gateway.login(&payload).await?;
        self.session
            .set_session(&response.token, &response.user.name, None)?;
        self.session.session()
    }

    pub fn logout(&self) -> Result<()> {
        self.session.clear_session()
    }
}
