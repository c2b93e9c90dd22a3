//! The capability a payload type implements to become a config file.
//!
//! A config type is an ordinary serde struct.  Implementing [`ConfigFile`]
//! declares where it lives by default, which options it prefers, and
//! optionally reacts to lifecycle events.  All methods have defaults, so the
//! common case is an empty impl:
//!
//! ```rust
//! use jsonconf::ConfigFile;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct Settings {
//!     text: Option<String>,
//! }
//!
//! impl ConfigFile for Settings {}
//!
//! assert_eq!(Settings::default_path().to_str(), Some("Settings.json"));
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::lifecycle::LifecycleEvent;
use super::options::ConfigOptions;

/// Per-type defaults and hooks for a configuration payload.
pub trait ConfigFile: Serialize + DeserializeOwned + Default {
    /// Path used when none is given: `<TypeName>.json` in the working
    /// directory.
    fn default_path() -> PathBuf {
        PathBuf::from(format!("{}.json", short_type_name::<Self>()))
    }

    /// Options used when none are given.  `None` defers to the store's
    /// fallback and then to [`ConfigOptions::global`].
    fn default_options() -> Option<Arc<ConfigOptions>> {
        None
    }

    /// Called after a read deserialized the file.
    fn on_read(&mut self) {}

    /// Called after a default instance was constructed, before any immediate
    /// save.
    fn on_create(&mut self) {}

    /// Called once a load produced this instance.
    fn on_loaded(&mut self) {}

    /// Called before the payload is serialized for a save.
    fn on_saving(&mut self) {}

    /// Called after the save wrote the file.
    fn on_saved(&mut self) {}
}

/// Routes `event` to the matching hook method of `payload`.
pub(crate) fn dispatch_hook<T: ConfigFile>(payload: &mut T, event: LifecycleEvent) {
    match event {
        LifecycleEvent::Reading => payload.on_read(),
        LifecycleEvent::Creating => payload.on_create(),
        LifecycleEvent::Loaded => payload.on_loaded(),
        LifecycleEvent::Saving => payload.on_saving(),
        LifecycleEvent::Saved => payload.on_saved(),
    }
}

/// Last path segment of the type's name, generic arguments stripped.
///
/// `my_app::settings::Settings<u8>` becomes `Settings`.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Default, Serialize, Deserialize)]
    struct Plain {}

    impl ConfigFile for Plain {}

    #[derive(Default, Serialize, Deserialize)]
    struct Counting {
        calls: Vec<String>,
    }

    impl ConfigFile for Counting {
        fn default_path() -> PathBuf {
            PathBuf::from("conf/counting.json")
        }

        fn on_read(&mut self) {
            self.calls.push("read".into());
        }

        fn on_saved(&mut self) {
            self.calls.push("saved".into());
        }
    }

    #[derive(Default, Serialize, Deserialize)]
    struct Wrapper<T> {
        inner: T,
    }

    #[test]
    fn test_default_path_uses_type_name() {
        assert_eq!(Plain::default_path(), PathBuf::from("Plain.json"));
    }

    #[test]
    fn test_default_path_can_be_overridden() {
        assert_eq!(Counting::default_path(), PathBuf::from("conf/counting.json"));
    }

    #[test]
    fn test_short_type_name_strips_generics_and_modules() {
        assert_eq!(short_type_name::<Wrapper<Vec<u8>>>(), "Wrapper");
        assert_eq!(short_type_name::<String>(), "String");
    }

    #[test]
    fn test_default_options_is_none() {
        assert!(Plain::default_options().is_none());
    }

    #[test]
    fn test_dispatch_routes_to_hooks() {
        let mut counting = Counting::default();
        dispatch_hook(&mut counting, LifecycleEvent::Reading);
        dispatch_hook(&mut counting, LifecycleEvent::Loaded);
        dispatch_hook(&mut counting, LifecycleEvent::Saved);
        assert_eq!(counting.calls, vec!["read".to_string(), "saved".to_string()]);
    }
}
