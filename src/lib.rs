pub mod aggregate;
pub mod audit;
pub mod bundle;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod net;
pub mod normalize;
pub mod operators;
pub mod period;
pub mod policy;
pub mod rollup;
pub mod store;

pub use bundle::{assemble, AnalyticsBundle};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
