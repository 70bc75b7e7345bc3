pub mod derive;
pub mod editor;
pub mod store;
pub mod validate;

pub use crate::domain::model::{Matrix, Term, Tier, TierPrices};
pub use crate::domain::ports::{Notifier, PricingApi, Storage};
pub use crate::utils::error::Result;
