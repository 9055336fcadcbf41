pub mod bot;
pub mod broadcast;
pub mod config;
pub mod delivery;
pub mod error;
pub mod generation;
pub mod health;
pub mod openrouter;
pub mod triage;
pub mod types;

pub use bot::run;
