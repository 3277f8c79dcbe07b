//! Launch applications with the Metal performance HUD enabled.
//!
//! The application is opened through the platform opener (`open` on macOS)
//! with `MTL_HUD_ENABLED=1` added to an otherwise unchanged copy of the
//! current environment.

pub mod app;
pub mod browse;
pub mod error;
pub mod launcher;

pub use app::{Action, Alerts, App, AppState, TerminalAlerts};
pub use browse::BundleFilter;
pub use error::LaunchError;
pub use launcher::{
    launch, LaunchRequest, Launcher, SpawnRequest, Spawner, SystemSpawner, HUD_ENV_VALUE,
    HUD_ENV_VAR,
};
