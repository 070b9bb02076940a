use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::dto::auth_dto::{LoginPayload, LoginResponse, RegisterPayload};
use crate::dto::job_dto::{JobApplicationPayload, UpdateStatusPayload};
use crate::dto::settings_dto::{ProfilePictureResponse, SettingsUpdatePayload};
use crate::error::{Error, Result};
use crate::models::analytics::Analytics;
use crate::models::job_application::JobApplication;
use crate::models::settings::UserSettings;
use crate::services::session_store::SessionStore;
use crate::utils::token::bearer_header;

/// Contract of the remote REST API. Every method except `register` and
/// `login` is authenticated with the session's bearer token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn register(&self, payload: &RegisterPayload) -> Result<()>;
    async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse>;

    async fn list_applications(&self) -> Result<Vec<JobApplication>>;
    async fn create_application(&self, payload: &JobApplicationPayload) -> Result<JobApplication>;
    async fn update_application(
        &self,
        id: &str,
        payload: &JobApplicationPayload,
    ) -> Result<JobApplication>;
    async fn update_status(&self, payload: &UpdateStatusPayload) -> Result<()>;
    async fn delete_application(&self, id: &str) -> Result<()>;

    async fn fetch_settings(&self) -> Result<UserSettings>;
    async fn update_settings(&self, payload: &SettingsUpdatePayload) -> Result<UserSettings>;
    async fn upload_profile_picture(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ProfilePictureResponse>;

    async fn fetch_analytics(&self) -> Result<Analytics>;
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    session: SessionStore,
}

impl HttpGateway {
    pub fn new(config: &Config, session: SessionStore) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, config.api_url.clone(), session))
    }

    pub fn with_client(client: Client, base_url: Url, session: SessionStore) -> Self {
        Self {
            client,
            base_url,
            session,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Config(format!("Invalid endpoint {}: {}", path, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "Gateway request");
        Ok(self.client.request(method, url))
    }

    /// Attaches the bearer token, refusing to send anything without one.
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self
            .session
            .get_token()?
            .ok_or_else(|| Error::Auth("no session token".to_string()))?;
        Ok(self
            .request(method, path)?
            .header(reqwest::header::AUTHORIZATION, bearer_header(&token)))
    }

    /// Sends the request and classifies failures. A 401/403 on an
    /// authenticated call means the stored token is no longer accepted.
    async fn send(&self, builder: RequestBuilder, authenticated: bool) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body);
        tracing::warn!(%status, message = message.as_deref().unwrap_or(""), "Gateway rejected request");

        if authenticated && (status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN) {
            return Err(Error::Auth(message.unwrap_or_else(|| status.to_string())));
        }
        Err(Error::Remote { status, message })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        authenticated: bool,
    ) -> Result<T> {
        let response = self.send(builder, authenticated).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_unit(&self, builder: RequestBuilder, authenticated: bool) -> Result<()> {
        let response = self.send(builder, authenticated).await?;
        // Body content is irrelevant ("ok", {} or empty); drain it.
        let _ = response.bytes().await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn register(&self, payload: &RegisterPayload) -> Result<()> {
        let builder = self.request(Method::POST, "auth/register")?.json(payload);
        self.send_unit(builder, false).await
    }

    async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse> {
        let builder = self.request(Method::POST, "auth/login")?.json(payload);
        self.send_json(builder, false).await
    }

    async fn list_applications(&self) -> Result<Vec<JobApplication>> {
        self.send_json(self.authed(Method::GET, "jobapp")?, true).await
    }

    async fn create_application(&self, payload: &JobApplicationPayload) -> Result<JobApplication> {
        let builder = self.authed(Method::POST, "jobapp")?.json(payload);
        self.send_json(builder, true).await
    }

    async fn update_application(
        &self,
        id: &str,
        payload: &JobApplicationPayload,
    ) -> Result<JobApplication> {
        let path = format!("jobapp/{}", encode_segment(id));
        let builder = self.authed(Method::PUT, &path)?.json(payload);
        self.send_json(builder, true).await
    }

    async fn update_status(&self, payload: &UpdateStatusPayload) -> Result<()> {
        let builder = self.authed(Method::PUT, "jobapp/update-status")?.json(payload);
        self.send_unit(builder, true).await
    }

    async fn delete_application(&self, id: &str) -> Result<()> {
        let path = format!("jobapp/{}", encode_segment(id));
        self.send_unit(self.authed(Method::DELETE, &path)?, true).await
    }

    async fn fetch_settings(&self) -> Result<UserSettings> {
        self.send_json(self.authed(Method::GET, "settings")?, true).await
    }

    async fn update_settings(&self, payload: &SettingsUpdatePayload) -> Result<UserSettings> {
        let builder = self.authed(Method::PATCH, "settings/update")?.json(payload);
        self.send_json(builder, true).await
    }

    async fn upload_profile_picture(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ProfilePictureResponse> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(guess_image_mime(file_name))?;
        let form = reqwest::multipart::Form::new().part("profilePicture", part);
        let builder = self
            .authed(Method::POST, "settings/upload-profile-picture")?
            .multipart(form);
        self.send_json(builder, true).await
    }

    async fn fetch_analytics(&self) -> Result<Analytics> {
        self.send_json(self.authed(Method::GET, "analytics")?, true).await
    }
}

/// Pulls a human-readable message out of an error body: `{"message": ..}`,
/// `{"error": ..}`, or a short plain-text body.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(str::to_string),
        Err(_) if trimmed.len() <= 200 && !trimmed.starts_with('<') => Some(trimmed.to_string()),
        Err(_) => None,
    }
}

fn encode_segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn guess_image_mime(file_name: &str) -> &'static str {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
