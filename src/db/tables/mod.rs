pub mod auth_sessions;
pub mod boards;
pub mod notes;
pub mod users;
