//! # slotwatch Browser
//!
//! Drives the booking page in a local Chrome over the DevTools Protocol.
//!
//! [`BrowserManager`] finds or launches Chrome with a persistent profile, so
//! an authenticated booking session survives restarts. [`CdpPageDriver`]
//! adapts one attached page to the core's `PageDriver` trait.

mod cdp;
mod driver;
mod manager;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use driver::CdpPageDriver;
pub use manager::{BrowserError, BrowserManager};
