//! Services for usage aggregation and querying

pub mod aggregator;
pub mod names;
pub mod usage_service;

pub use aggregator::Aggregator;
pub use names::{display_name_or_id, DisplayNameResolver, NameCatalog};
pub use usage_service::UsageService;
