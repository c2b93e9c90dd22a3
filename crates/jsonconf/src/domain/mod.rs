//! Domain layer: the config-type capability, the options model and the
//! lifecycle listener registry.
//!
//! Nothing here touches the file system.

pub mod config_file;
pub mod lifecycle;
pub mod options;

pub use config_file::{short_type_name, ConfigFile};
pub use lifecycle::{Lifecycle, LifecycleEvent, ListenerId};
pub use options::ConfigOptions;
