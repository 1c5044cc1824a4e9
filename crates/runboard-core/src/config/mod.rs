pub mod interpolation;
pub mod loader;
pub mod schema;
pub mod validation;

pub use interpolation::interpolate;
pub use loader::{
    ConfigLoadError,
    ConfigLoadResult,
    ConfigLoader,
};
pub use schema::{
    ClientConfig,
    GitHubConfig,
    RunboardConfig,
    ServerConfig,
};
pub use validation::{
    validate_client,
    validate_server,
    ValidationResult,
};
