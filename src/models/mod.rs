pub mod analytics;
pub mod job_application;
pub mod session;
pub mod settings;
pub mod user;
