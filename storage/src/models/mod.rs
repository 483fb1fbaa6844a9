//! Persisted document shapes.

mod configuration;
mod profiles;

pub use configuration::{
    ConfigUpdate, Configuration, DEFAULT_CONTEXT_LIMIT, DEFAULT_MAX_WIDTH, DEFAULT_MODEL_NAME,
    DEFAULT_REFRESH_RATE,
};
pub use profiles::default_profiles;
