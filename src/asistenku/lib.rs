// src/asistenku/lib.rs

#[macro_use]
pub mod utils;

pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod navigation;
pub mod query;
pub mod routes;
pub mod services;
pub mod storage;

pub use backend::{BackendInterface, CanisterBackend, LocalBackend};
pub use config::ClientConfig;
pub use error::AsistenkuError;
pub use navigation::{Navigator, Screen};
pub use query::{Hooks, QueryClient};
