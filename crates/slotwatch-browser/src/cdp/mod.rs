//! Chrome DevTools Protocol (CDP) client.
//!
//! Talks to Chrome/Chromium over the browser WebSocket using the CDP
//! JSON-RPC protocol. Only the Page, DOM, Runtime and Input domains are used.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let page = client.new_page(None).await?;
//! page.navigate("https://example.com").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use session::PageSession;
