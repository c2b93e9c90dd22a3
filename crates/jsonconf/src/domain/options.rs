//! Options bundle controlling load/create/save behaviour, plus the
//! process-wide default bundle.
//!
//! # Global options
//!
//! [`ConfigOptions::global`] is read at the moment an operation resolves its
//! options, never captured earlier.  Replacing the global with
//! [`ConfigOptions::set_global`] therefore changes the behaviour of every
//! subsequent load of a type that declares no default options of its own.
//! Readers receive an `Arc` snapshot, so a bundle in use is never mutated
//! underneath them; they simply do not see later replacements.
//!
//! Prefer [`crate::ConfigStore::with_fallback_options`] when the choice can be
//! passed explicitly.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use jsonconf_codec::Dialect;

/// Behaviour switches for one configuration file.
///
/// Cloning is a shallow snapshot: clones share the same [`Dialect`].
///
/// # Example
///
/// ```rust
/// use jsonconf::ConfigOptions;
///
/// let options = ConfigOptions::default().with_save_on_create(false);
/// assert!(options.create_if_missing);
/// assert!(!options.save_on_create);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigOptions {
    /// When the file is missing, build a default instance instead of
    /// returning nothing.
    pub create_if_missing: bool,
    /// Persist a freshly built default instance immediately.
    pub save_on_create: bool,
    /// Serializer switches; shared, never mutated after construction.
    pub dialect: Arc<Dialect>,
}

impl Default for ConfigOptions {
    /// | Field             | Default               |
    /// |-------------------|-----------------------|
    /// | create_if_missing | `true`                |
    /// | save_on_create    | `true`                |
    /// | dialect           | `Dialect::default()`  |
    fn default() -> Self {
        Self {
            create_if_missing: true,
            save_on_create: true,
            dialect: Arc::new(Dialect::default()),
        }
    }
}

impl ConfigOptions {
    /// Same as [`ConfigOptions::default`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    pub fn with_save_on_create(mut self, save_on_create: bool) -> Self {
        self.save_on_create = save_on_create;
        self
    }

    /// Replaces the dialect.  Accepts an owned [`Dialect`] or an existing
    /// `Arc` to share one dialect between bundles.
    pub fn with_dialect(mut self, dialect: impl Into<Arc<Dialect>>) -> Self {
        self.dialect = dialect.into();
        self
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Wraps the bundle for binding to config instances.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Returns the current process-wide default bundle.
    pub fn global() -> Arc<ConfigOptions> {
        let guard = global_slot()
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replaces the process-wide default bundle, returning the previous one.
    pub fn set_global(options: ConfigOptions) -> Arc<ConfigOptions> {
        let mut guard = global_slot()
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(options))
    }

    /// Restores the process-wide default to [`ConfigOptions::default`].
    pub fn reset_global() -> Arc<ConfigOptions> {
        Self::set_global(ConfigOptions::default())
    }
}

fn global_slot() -> &'static RwLock<Arc<ConfigOptions>> {
    static GLOBAL: OnceLock<RwLock<Arc<ConfigOptions>>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(Arc::new(ConfigOptions::default())))
}
