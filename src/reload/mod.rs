//! Reload Module
//!
//! Decides what a batch of file changes means for connected clients and
//! delivers the result.
//!
//! ```text
//! watcher -> HotUpdate (filter, rebuild) -> HotChannel -> clients
//! ```
//!
//! - `hot` - change filtering and rebuild decision
//! - `message` - notification payloads (full reload, error overlay)
//! - `server` - WebSocket broadcaster implementing `HotChannel`

pub mod hot;
pub mod message;
pub mod server;

pub use hot::HotUpdate;
pub use message::HotPayload;
pub use server::WsBroadcaster;
