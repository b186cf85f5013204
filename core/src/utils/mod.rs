//! Utility modules for Tickler.
//!
//! # Modules
//!
//! - [`debounce`]: Trailing-edge debouncing for coalescing bursts of writes

pub mod debounce;

pub use debounce::{Debouncer, DebouncerError, DEFAULT_DEBOUNCE_MS};
