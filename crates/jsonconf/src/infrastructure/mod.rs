//! Infrastructure layer: OS-facing adapters.
//!
//! **Dependency rule**: this layer may depend on `domain`, but MUST NOT be
//! imported by the `domain` layer.

pub mod file_system;
