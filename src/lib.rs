pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod models;
pub mod render;
pub mod services;
pub mod session;

pub use controller::{Controller, NavigationOutcome};
pub use error::{AppError, AppResult};
