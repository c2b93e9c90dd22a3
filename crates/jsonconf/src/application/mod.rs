//! Application layer: the load/read/create/save orchestration.
//!
//! # Sub-modules
//!
//! - **`store`**   – Resolves path and options for a config type and decides
//!   between reading the file, creating a default, or returning nothing.
//!
//! - **`config`**  – The bound instance: payload plus path, options and
//!   listeners.  Owns `save` and `reload`.
//!
//! - **`attempt`** – The non-throwing adapter behind every `try_*` call.
//!
//! This layer talks to files only through the
//! [`FileSystem`](crate::infrastructure::file_system::FileSystem) trait.

pub mod attempt;
pub mod config;
pub mod store;

pub use attempt::{attempt, Attempt};
pub use config::{Binding, Config};
pub use store::ConfigStore;
