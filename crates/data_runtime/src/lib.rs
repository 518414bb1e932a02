//! data_runtime: spec schemas and loaders.
//!
//! Spec databases ship built-in defaults and accept TOML overrides under
//! `data/config/`, so the action core and tools can boot without any files
//! on disk. Validation of names (status kinds, cost kinds, effect kinds)
//! happens downstream when the registry is built.

pub mod loader;
pub mod specs {
    pub mod abilities;
    pub mod projectiles;
    pub mod shooters;
}
pub mod configs {
    pub mod status;
}
