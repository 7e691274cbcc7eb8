pub mod config;
pub mod events;
pub mod store;
pub mod sys;
