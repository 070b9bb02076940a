#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path as UrlPath, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Extension, Json, Router,
};
use chrono::{NaiveTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use job_compass::config::Config;
use job_compass::dto::auth_dto::{LoginPayload, RegisterPayload};
use job_compass::dto::job_dto::{JobApplicationPayload, UpdateStatusPayload};
use job_compass::dto::settings_dto::SettingsUpdatePayload;
use job_compass::models::analytics::Analytics;
use job_compass::models::job_application::{JobApplication, Status};
use job_compass::models::settings::UserSettings;
use job_compass::AppState;

const SECRET: &str = "fake-gateway-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Default)]
struct Account {
    password: String,
    settings: UserSettings,
    applications: Vec<JobApplication>,
}

#[derive(Default)]
struct Counters {
    settings_updates: usize,
    uploads: usize,
}

/// In-process stand-in for the REST API, keyed by account email.
#[derive(Clone, Default)]
pub struct FakeGateway {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    counters: Arc<Mutex<Counters>>,
}

impl FakeGateway {
    pub fn settings_updates(&self) -> usize {
        self.counters.lock().unwrap().settings_updates
    }

    pub fn uploads(&self) -> usize {
        self.counters.lock().unwrap().uploads
    }
}

/// Starts the fake on an ephemeral port and returns its API base URL.
pub async fn spawn() -> (String, FakeGateway) {
    let fake = FakeGateway::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = router(fake.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake gateway");
    });
    (format!("http://{}/api", addr), fake)
}

pub fn client(base_url: &str, dir: &Path) -> AppState {
    let config = Config::new(base_url, dir.join("session.json")).expect("config");
    AppState::new(&config).expect("app state")
}

fn router(fake: FakeGateway) -> Router {
    let protected = Router::new()
        .route("/jobapp", get(list_applications).post(create_application))
        .route("/jobapp/update-status", put(update_status))
        .route(
            "/jobapp/:id",
            put(update_application).delete(delete_application),
        )
        .route("/settings", get(get_settings))
        .route("/settings/update", patch(update_settings))
        .route("/settings/upload-profile-picture", post(upload_picture))
        .route("/analytics", get(analytics))
        .route_layer(middleware::from_fn(require_bearer_auth));

    let api = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .merge(protected)
        .with_state(fake);

    Router::new().nest("/api", api)
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn issue_token(email: &str) -> String {
    let claims = Claims {
        sub: email.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("token")
}

async fn require_bearer_auth(mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"missing_authorization"})),
        )
            .into_response();
    };
    let Some(token) = auth_header
        .to_str()
        .ok()
        .and_then(|s| s.strip_prefix("Bearer "))
    else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unsupported_scheme"})),
        )
            .into_response();
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &validation,
    ) {
        Ok(data) => {
            req.extensions_mut().insert(data.claims);
            next.run(req).await
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"invalid_token"})),
        )
            .into_response(),
    }
}

async fn register(State(fake): State<FakeGateway>, Json(payload): Json<RegisterPayload>) -> Response {
    let mut accounts = fake.accounts.lock().unwrap();
    if accounts.contains_key(&payload.email) {
        return reject(StatusCode::BAD_REQUEST, "User already exists");
    }
    accounts.insert(
        payload.email.clone(),
        Account {
            password: payload.password,
            settings: UserSettings {
                name: payload.name,
                email: payload.email,
                ..Default::default()
            },
            applications: Vec::new(),
        },
    );
    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response()
}

async fn login(State(fake): State<FakeGateway>, Json(payload): Json<LoginPayload>) -> Response {
    let accounts = fake.accounts.lock().unwrap();
    match accounts.get(&payload.email) {
        Some(account) if account.password == payload.password => Json(json!({
            "token": issue_token(&payload.email),
            "user": { "name": account.settings.name, "email": payload.email }
        }))
        .into_response(),
        _ => reject(StatusCode::BAD_REQUEST, "Invalid credentials"),
    }
}

async fn list_applications(
    State(fake): State<FakeGateway>,
    Extension(claims): Extension<Claims>,
) -> Response {
    let mut accounts = fake.accounts.lock().unwrap();
    let account = accounts.entry(claims.sub).or_default();
    Json(account.applications.clone()).into_response()
}

async fn create_application(
    State(fake): State<FakeGateway>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<JobApplicationPayload>,
) -> Response {
    let (Some(job_title), Some(company)) = (payload.job_title, payload.company) else {
        return reject(StatusCode::BAD_REQUEST, "jobTitle and company are required");
    };
    let date = payload
        .date_of_application
        .unwrap_or_else(|| Utc::now().date_naive());
    let app = JobApplication {
        id: Uuid::new_v4().simple().to_string(),
        job_url: payload.job_url.unwrap_or_default(),
        job_title,
        date_of_application: date.and_time(NaiveTime::MIN).and_utc(),
        company,
        location: payload.location.unwrap_or_default(),
        status: payload.status.unwrap_or(Status::Applied),
    };

    let mut accounts = fake.accounts.lock().unwrap();
    accounts
        .entry(claims.sub)
        .or_default()
        .applications
        .push(app.clone());
    (StatusCode::CREATED, Json(app)).into_response()
}

async fn update_application(
    State(fake): State<FakeGateway>,
    Extension(claims): Extension<Claims>,
    UrlPath(id): UrlPath<String>,
    Json(payload): Json<JobApplicationPayload>,
) -> Response {
    let mut accounts = fake.accounts.lock().unwrap();
    let account = accounts.entry(claims.sub).or_default();
    let Some(app) = account.applications.iter_mut().find(|a| a.id == id) else {
        return reject(StatusCode::NOT_FOUND, "Job application not found");
    };
    if let Some(v) = payload.job_url {
        app.job_url = v;
    }
    if let Some(v) = payload.job_title {
        app.job_title = v;
    }
    if let Some(v) = payload.date_of_application {
        app.date_of_application = v.and_time(NaiveTime::MIN).and_utc();
    }
    if let Some(v) = payload.company {
        app.company = v;
    }
    if let Some(v) = payload.location {
        app.location = v;
    }
    if let Some(v) = payload.status {
        app.status = v;
    }
    Json(app.clone()).into_response()
}

async fn update_status(
    State(fake): State<FakeGateway>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Response {
    let mut accounts = fake.accounts.lock().unwrap();
    let account = accounts.entry(claims.sub).or_default();
    match account.applications.iter_mut().find(|a| a.id == payload.id) {
        Some(app) => {
            app.status = payload.status;
            Json(json!({ "message": "Status updated" })).into_response()
        }
        None => reject(StatusCode::NOT_FOUND, "Job application not found"),
    }
}

async fn delete_application(
    State(fake): State<FakeGateway>,
    Extension(claims): Extension<Claims>,
    UrlPath(id): UrlPath<String>,
) -> Response {
    let mut accounts = fake.accounts.lock().unwrap();
    let account = accounts.entry(claims.sub).or_default();
    let before = account.applications.len();
    account.applications.retain(|a| a.id != id);
    if account.applications.len() == before {
        return reject(StatusCode::NOT_FOUND, "Job application not found");
    }
    Json(json!({ "message": "Job application deleted" })).into_response()
}

async fn get_settings(
    State(fake): State<FakeGateway>,
    Extension(claims): Extension<Claims>,
) -> Response {
    let mut accounts = fake.accounts.lock().unwrap();
    Json(accounts.entry(claims.sub).or_default().settings.clone()).into_response()
}

async fn update_settings(
    State(fake): State<FakeGateway>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SettingsUpdatePayload>,
) -> Response {
    fake.counters.lock().unwrap().settings_updates += 1;

    let mut accounts = fake.accounts.lock().unwrap();
    let account = accounts.entry(claims.sub).or_default();
    if let Some(new_password) = payload.new_password {
        if payload.current_password.as_deref() != Some(account.password.as_str()) {
            return reject(StatusCode::BAD_REQUEST, "Current password is incorrect");
        }
        account.password = new_password;
    }
    let settings = &mut account.settings;
    settings.name = payload.name;
    settings.theme = payload.theme;
    settings.weekly_reminder = payload.weekly_reminder;
    settings.monthly_reminder = payload.monthly_reminder;
    settings.email_notification = payload.email_notification;
    if let Some(email) = payload.email {
        settings.email = email;
    }
    Json(settings.clone()).into_response()
}

async fn upload_picture(
    State(fake): State<FakeGateway>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Response {
    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("profilePicture") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        match field.bytes().await {
            Ok(bytes) if !bytes.is_empty() => upload = Some(file_name),
            _ => return reject(StatusCode::BAD_REQUEST, "Empty upload"),
        }
    }
    let Some(file_name) = upload else {
        return reject(StatusCode::BAD_REQUEST, "No file uploaded");
    };

    fake.counters.lock().unwrap().uploads += 1;
    let url = format!("/uploads/{}", file_name);
    let mut accounts = fake.accounts.lock().unwrap();
    accounts.entry(claims.sub).or_default().settings.profile_picture = Some(url.clone());
    Json(json!({ "profilePictureUrl": url })).into_response()
}

async fn analytics(
    State(fake): State<FakeGateway>,
    Extension(claims): Extension<Claims>,
) -> Response {
    let mut accounts = fake.accounts.lock().unwrap();
    let account = accounts.entry(claims.sub).or_default();
    Json(Analytics::from_applications(&account.applications)).into_response()
}
