//! # jsonconf
//!
//! Declare a configuration struct, then load it from and save it to a JSON
//! file with one call.
//!
//! ```no_run
//! use jsonconf::ConfigFile;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Settings {
//!     text: Option<String>,
//! }
//!
//! impl ConfigFile for Settings {}
//!
//! # fn main() -> Result<(), jsonconf::ConfigError> {
//! // Reads Settings.json, or writes and returns a default when it is missing.
//! let mut settings = jsonconf::load::<Settings>(None, None)?.expect("created");
//! settings.text = Some("Hello!".into());
//! settings.save(None, None)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture overview
//!
//! - **`domain`** – The [`ConfigFile`] capability, [`ConfigOptions`] (with the
//!   process-wide default) and the [`Lifecycle`] listener registry.
//!
//! - **`application`** – [`ConfigStore`] runs load/read/create; [`Config`] is
//!   the bound instance that saves itself.
//!
//! - **`infrastructure`** – The [`FileSystem`] seam and its OS and in-memory
//!   implementations.
//!
//! JSON handling, including the relaxed [`Dialect`], lives in the
//! `jsonconf-codec` crate and is re-exported here.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

use std::path::Path;
use std::sync::Arc;

pub use application::{attempt, Attempt, Binding, Config, ConfigStore};
pub use domain::{ConfigFile, ConfigOptions, Lifecycle, LifecycleEvent, ListenerId};
pub use error::ConfigError;
pub use infrastructure::file_system::memory::MemoryFileSystem;
pub use infrastructure::file_system::{FileSystem, OsFileSystem};
pub use jsonconf_codec::{decode, encode, CodecError, Dialect};

/// [`ConfigStore::load`] on the OS file system.
pub fn load<T: ConfigFile>(
    path: Option<&Path>,
    options: Option<Arc<ConfigOptions>>,
) -> Result<Option<Config<T>>, ConfigError> {
    ConfigStore::default().load(path, options)
}

/// [`ConfigStore::try_load`] on the OS file system.
pub fn try_load<T: ConfigFile>(
    path: Option<&Path>,
    options: Option<Arc<ConfigOptions>>,
) -> Attempt<Option<Config<T>>> {
    ConfigStore::default().try_load(path, options)
}

/// [`ConfigStore::read`] on the OS file system.
pub fn read<T: ConfigFile>(
    path: Option<&Path>,
    options: Option<Arc<ConfigOptions>>,
) -> Result<Option<Config<T>>, ConfigError> {
    ConfigStore::default().read(path, options)
}

/// [`ConfigStore::create`] on the OS file system.
pub fn create<T: ConfigFile>(
    path: Option<&Path>,
    options: Option<Arc<ConfigOptions>>,
) -> Result<Config<T>, ConfigError> {
    ConfigStore::default().create(path, options)
}
