pub mod account;
pub mod boards;
pub mod health;
pub mod notes;
