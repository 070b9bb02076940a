pub mod access_guard;
pub mod in_flight;
