//! A loaded (or created) configuration instance.
//!
//! [`Config<T>`] pairs the user payload with the file it is bound to, the
//! options it was loaded with, its lifecycle listeners and the file system it
//! writes through.  Only the payload is serialized; binding and listeners
//! never reach the file.
//!
//! The payload is reachable through `Deref`/`DerefMut`, so fields read
//! naturally: `config.text`.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonconf_codec::{codec, CodecError, Dialect};
use tracing::debug;

use crate::application::attempt::{attempt, Attempt};
use crate::domain::config_file::{dispatch_hook, ConfigFile};
use crate::domain::{ConfigOptions, Lifecycle, LifecycleEvent, ListenerId};
use crate::error::ConfigError;
use crate::infrastructure::file_system::{FileSystem, OsFileSystem};

/// The file location and options an instance was produced with.  Always set
/// together.
#[derive(Debug, Clone)]
pub struct Binding {
    pub path: PathBuf,
    pub options: Arc<ConfigOptions>,
}

/// A configuration payload bound to its file.
pub struct Config<T> {
    payload: T,
    binding: Option<Binding>,
    lifecycle: Lifecycle<T>,
    file_system: Arc<dyn FileSystem>,
}

impl<T> Config<T> {
    /// Wraps `payload` without binding it.  Saving requires either an
    /// explicit path and options or a prior [`Config::bind`].
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            binding: None,
            lifecycle: Lifecycle::new(),
            file_system: Arc::new(OsFileSystem::new()),
        }
    }

    pub(crate) fn bound(
        payload: T,
        binding: Binding,
        lifecycle: Lifecycle<T>,
        file_system: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            payload,
            binding: Some(binding),
            lifecycle,
            file_system,
        }
    }

    /// Replaces the file system used by [`Config::save`].
    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = file_system;
        self
    }

    /// Binds path and options together.
    pub fn bind(&mut self, path: impl Into<PathBuf>, options: Arc<ConfigOptions>) {
        self.binding = Some(Binding {
            path: path.into(),
            options,
        });
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.binding.as_ref().map(|b| b.path.as_path())
    }

    pub fn options(&self) -> Option<&Arc<ConfigOptions>> {
        self.binding.as_ref().map(|b| &b.options)
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub fn lifecycle_mut(&mut self) -> &mut Lifecycle<T> {
        &mut self.lifecycle
    }

    /// Registers a listener for this instance's future events.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(LifecycleEvent, &mut T) + Send + 'static,
    {
        self.lifecycle.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.lifecycle.unsubscribe(id)
    }
}

impl<T: ConfigFile> Config<T> {
    /// Fires `event`: the payload's own hook first, then listeners.
    pub(crate) fn fire(&mut self, event: LifecycleEvent) {
        dispatch_hook(&mut self.payload, event);
        self.lifecycle.emit(event, &mut self.payload);
    }

    /// The payload as JSON under the default dialect, for display and
    /// debugging.  Independent of the bound options; never used by save.
    pub fn to_json(&self) -> Result<String, CodecError> {
        codec::encode(&self.payload, &Dialect::default())
    }

    /// Writes the payload to its file.
    ///
    /// `path` and `options` override the binding for this call only; the
    /// binding is left unchanged.  Fires [`LifecycleEvent::Saving`] before
    /// serializing and [`LifecycleEvent::Saved`] after the write.  The file
    /// content is replaced in full.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Unbound`] if no path or options are bound or given.
    /// - [`ConfigError::Encode`] if serialization fails, or if ordinal enum
    ///   output would not read back as the same payload.
    /// - [`ConfigError::Io`] if the write fails.
    pub fn save(
        &mut self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
    ) -> Result<(), ConfigError> {
        let (path, options) = self.save_target(path, options)?;
        debug!("saving config to {}", path.display());

        self.fire(LifecycleEvent::Saving);

        let text = codec::encode_verified(&self.payload, options.dialect()).map_err(|source| {
            ConfigError::Encode {
                path: path.clone(),
                source,
            }
        })?;
        self.file_system
            .write(&path, &text)
            .map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;

        self.fire(LifecycleEvent::Saved);
        Ok(())
    }

    /// Non-throwing [`Config::save`].
    pub fn try_save(
        &mut self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
    ) -> Attempt<()> {
        attempt("save", || self.save(path, options))
    }

    /// Re-reads the bound file into this instance, keeping binding and
    /// listeners.  Fires [`LifecycleEvent::Reading`] on success.
    ///
    /// Returns `false`, leaving the payload untouched, when the file holds
    /// the literal `null`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Unbound`] if the instance is not bound; otherwise the
    /// same errors as a read.
    pub fn reload(&mut self) -> Result<bool, ConfigError> {
        let Binding { path, options } = self.binding.clone().ok_or(ConfigError::Unbound)?;
        debug!("reloading config from {}", path.display());

        let text = self
            .file_system
            .read_to_string(&path)
            .map_err(|source| ConfigError::from_read(path.clone(), source))?;
        match codec::decode::<T>(&text, options.dialect()) {
            Ok(Some(payload)) => {
                self.payload = payload;
                self.fire(LifecycleEvent::Reading);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(source) => Err(ConfigError::from_decode(path, source)),
        }
    }

    fn save_target(
        &self,
        path: Option<&Path>,
        options: Option<Arc<ConfigOptions>>,
    ) -> Result<(PathBuf, Arc<ConfigOptions>), ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| self.binding.as_ref().map(|b| b.path.clone()));
        let options = options.or_else(|| self.binding.as_ref().map(|b| Arc::clone(&b.options)));
        match (path, options) {
            (Some(path), Some(options)) => Ok((path, options)),
            _ => Err(ConfigError::Unbound),
        }
    }
}

impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.payload
    }
}

impl<T> DerefMut for Config<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.payload
    }
}

impl<T: fmt::Debug> fmt::Debug for Config<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("payload", &self.payload)
            .field("binding", &self.binding)
            .field("lifecycle", &self.lifecycle)
            .finish_non_exhaustive()
    }
}
