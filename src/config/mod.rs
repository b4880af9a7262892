//! Configuration loading and validation.
//!
//! A YAML file with `session`, `messages`, `bridge` and `observability`
//! sections, all optional.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, LoadWarning, LoaderOptions, load_or_default};
pub use schema::{BridgeSettings, FarthestConfig, ObservabilitySettings, SessionSettings};
pub use validation::{ValidationResult, Validator};
