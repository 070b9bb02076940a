pub mod analytics_service;
pub mod application_service;
pub mod auth_service;
pub mod collection_view;
pub mod gateway;
pub mod session_store;
pub mod settings_reconciler;
pub mod settings_service;
