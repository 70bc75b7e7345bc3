pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::HttpPricingApi, storage::LocalStorage};
pub use app::server::{router, serve, AppState};
pub use app::session::{run_session, ConsoleNotifier};
pub use config::AppConfig;
pub use crate::core::editor::MatrixEditor;
pub use domain::model::{Matrix, Term, Tier, TierPrices};
pub use utils::error::{PricingError, Result};
