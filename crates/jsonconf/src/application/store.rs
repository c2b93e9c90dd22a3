//! Load/read/create orchestration.
//!
//! [`ConfigStore`] decides, for a config type `T`, where its file is, which
//! options apply, and whether to read the file, build a default, or return
//! nothing:
//!
//! ```text
//! load(path?, options?)
//!  ├─ resolve path     explicit → T::default_path()
//!  ├─ resolve options  explicit → T::default_options() → store fallback → global
//!  ├─ file exists?
//!  │    ├─ yes → read   → decode → bind → Reading
//!  │    └─ no  → create_if_missing?
//!  │              ├─ yes → create → T::default() → bind → Creating → save?
//!  │              └─ no  → None (nothing written)
//!  └─ produced an instance → Loaded
//! ```
//!
//! Every call touches the file system; there is no cache keyed by path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonconf_codec::codec;
use tracing::{debug, info};

use crate::application::attempt::{attempt, Attempt};
use crate::application::config::{Binding, Config};
use crate::domain::{ConfigFile, ConfigOptions, Lifecycle, LifecycleEvent};
use crate::error::ConfigError;
use crate::infrastructure::file_system::{FileSystem, OsFileSystem};

/// Entry point for loading config types through a file system.
#[derive(Clone)]
pub struct ConfigStore {
    file_system: Arc<dyn FileSystem>,
    fallback: Option<Arc<ConfigOptions>>,
}

impl Default for ConfigStore {
    /// OS file system, no store-level fallback (types without their own
    /// options use [`ConfigOptions::global`]).
    fn default() -> Self {
        Self {
            file_system: Arc::new(OsFileSystem::new()),
            fallback: None,
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `file_system` for every existence check, read and write, including
    /// saves of instances this store produces.
    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = file_system;
        self
    }

    /// Pins the options used for types that declare none, instead of reading
    /// the process-wide global.
    pub fn with_fallback_options(mut self, options: Arc<ConfigOptions>) -> Self {
        self.fallback = Some(options);
        self
    }

    /// Path for `T`: `explicit` if given, else [`ConfigFile::default_path`].
    pub fn resolve_path<T: ConfigFile>(&self, explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(T::default_path, Path::to_path_buf)
    }

    /// Options for `T`: `explicit`, else [`ConfigFile::default_options`], else
    /// the store fallback, else [`ConfigOptions::global`] as it is right now.
    pub fn resolve_options<T: ConfigFile>(
        &self,
        explicit: Option<Arc<ConfigOptions>>,
    ) -> Arc<ConfigOptions> {
        explicit
            .or_else(T::default_options)
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(ConfigOptions::global)
    }

    // ── Load ─────────────────────────────────────────────────────────────────

    /// Loads `T`: reads the file if it exists, otherwise creates a default
    /// when the options allow it, otherwise returns `Ok(None)`.
    ///
    /// Fires [`LifecycleEvent::Loaded`] once on a produced instance, after
    /// the read or create (including its immediate save) completed.
    ///
    /// # Errors
    ///
    /// Propagates existence-check, read, decode and write errors unchanged.
    pub fn load<T: ConfigFile>(
        &self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
    ) -> Result<Option<Config<T>>, ConfigError> {
        self.load_with(path, options, Lifecycle::new())
    }

    /// [`ConfigStore::load`] with listeners attached from the start.  The
    /// lifecycle moves into the produced instance.
    pub fn load_with<T: ConfigFile>(
        &self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
        lifecycle: Lifecycle<T>,
    ) -> Result<Option<Config<T>>, ConfigError> {
        let path = self.resolve_path::<T>(path);
        let options = self.resolve_options::<T>(options);

        let exists = self
            .file_system
            .exists(&path)
            .map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;

        let loaded = if exists {
            self.read_resolved(path, options, lifecycle)?
        } else if options.create_if_missing {
            Some(self.create_resolved(path, options, lifecycle)?)
        } else {
            debug!("{} is missing and creation is disabled", path.display());
            None
        };

        Ok(loaded.map(|mut config| {
            config.fire(LifecycleEvent::Loaded);
            config
        }))
    }

    /// Non-throwing [`ConfigStore::load`].
    pub fn try_load<T: ConfigFile>(
        &self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
    ) -> Attempt<Option<Config<T>>> {
        attempt("load", || self.load(path, options))
    }

    /// Non-throwing [`ConfigStore::load_with`].
    pub fn try_load_with<T: ConfigFile>(
        &self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
        lifecycle: Lifecycle<T>,
    ) -> Attempt<Option<Config<T>>> {
        attempt("load", || self.load_with(path, options, lifecycle))
    }

    // ── Read ─────────────────────────────────────────────────────────────────

    /// Reads and decodes the file without checking existence first.
    ///
    /// A file holding the JSON literal `null` yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotFound`] when the file is absent,
    /// [`ConfigError::Malformed`] for invalid JSON,
    /// [`ConfigError::SchemaMismatch`] when the shape does not fit `T`,
    /// [`ConfigError::Io`] for other read failures.
    pub fn read<T: ConfigFile>(
        &self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
    ) -> Result<Option<Config<T>>, ConfigError> {
        self.read_with(path, options, Lifecycle::new())
    }

    /// [`ConfigStore::read`] with listeners attached from the start.
    pub fn read_with<T: ConfigFile>(
        &self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
        lifecycle: Lifecycle<T>,
    ) -> Result<Option<Config<T>>, ConfigError> {
        let path = self.resolve_path::<T>(path);
        let options = self.resolve_options::<T>(options);
        self.read_resolved(path, options, lifecycle)
    }

    fn read_resolved<T: ConfigFile>(
        &self,
        path: PathBuf,
        options: Arc<ConfigOptions>,
        lifecycle: Lifecycle<T>,
    ) -> Result<Option<Config<T>>, ConfigError> {
        debug!("reading config from {}", path.display());

        let text = self
            .file_system
            .read_to_string(&path)
            .map_err(|source| ConfigError::from_read(path.clone(), source))?;

        let payload = match codec::decode::<T>(&text, options.dialect()) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("{} holds null, treating as no config", path.display());
                return Ok(None);
            }
            Err(source) => return Err(ConfigError::from_decode(path, source)),
        };

        let mut config = Config::bound(
            payload,
            Binding { path, options },
            lifecycle,
            Arc::clone(&self.file_system),
        );
        config.fire(LifecycleEvent::Reading);
        Ok(Some(config))
    }

    // ── Create ───────────────────────────────────────────────────────────────

    /// Builds `T::default()`, binds it, and saves it right away when
    /// `save_on_create` is set.  Never returns "absent".
    ///
    /// # Errors
    ///
    /// Only the immediate save can fail.
    pub fn create<T: ConfigFile>(
        &self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
    ) -> Result<Config<T>, ConfigError> {
        self.create_with(path, options, Lifecycle::new())
    }

    /// [`ConfigStore::create`] with listeners attached from the start.
    pub fn create_with<T: ConfigFile>(
        &self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
        lifecycle: Lifecycle<T>,
    ) -> Result<Config<T>, ConfigError> {
        let path = self.resolve_path::<T>(path);
        let options = self.resolve_options::<T>(options);
        self.create_resolved(path, options, lifecycle)
    }

    fn create_resolved<T: ConfigFile>(
        &self,
        path: PathBuf,
        options: Arc<ConfigOptions>,
        lifecycle: Lifecycle<T>,
    ) -> Result<Config<T>, ConfigError> {
        let save_now = options.save_on_create;
        let mut config = Config::bound(
            T::default(),
            Binding { path, options },
            lifecycle,
            Arc::clone(&self.file_system),
        );
        config.fire(LifecycleEvent::Creating);

        if save_now {
            if let Some(path) = config.path() {
                info!("writing default config to {}", path.display());
            }
            config.save(None, None)?;
        }
        Ok(config)
    }
}
