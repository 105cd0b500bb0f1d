//! Browser instance manager.
//!
//! Reuses a Chrome already listening on the debug port, or launches one with
//! a persistent profile so the booking session's login survives restarts.

mod manager_core;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::BrowserError;

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
