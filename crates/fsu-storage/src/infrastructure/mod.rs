//! Infrastructure layer: OS-facing adapters.
//!
//! **Dependency rule**: this layer may depend on `fsu_core`, but the domain
//! crate never imports anything from here.

pub mod storage;
