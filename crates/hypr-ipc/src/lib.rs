//! Client library for the Hyprland compositor's IPC
//!
//! Hyprland exposes two Unix domain sockets per instance:
//!
//! - the **control socket** (`.socket.sock`), for command/response
//!   exchanges. [`RequestClient`] opens a fresh connection per request,
//!   batches multi-parameter commands with the `[[BATCH]]` syntax, checks
//!   responses for the protocol's `"ok"` success markers, and decodes JSON
//!   payloads into the records in [`types`].
//! - the **event socket** (`.socket2.sock`), streaming newline-terminated
//!   `TYPE>>DATA` lifecycle notifications. [`EventClient`] holds that
//!   connection open and yields typed [`EventRecord`]s in wire order.
//!
//! The two paths are independent: run the event client on its own task
//! alongside request calls. Neither applies timeouts or retries; wrap calls
//! in `tokio::time::timeout` for bounded latency, and redial the event
//! client after it terminates if you want to resume the stream.
//!
//! ```ignore
//! use hypr_ipc::{EventClient, RequestClient};
//!
//! let client = RequestClient::from_env()?;
//! client.dispatch(&["exec kitty".into()]).await?;
//!
//! let mut events = EventClient::from_env().await?;
//! while let Some(record) = events.next_event().await? {
//!     println!("{} {}", record.kind, record.data);
//! }
//! ```

mod batch;
mod client;
mod error;
mod events;
mod transport;
pub mod types;

pub use batch::{prepare_requests, MAX_COMMANDS};
pub use client::{socket_paths, RequestClient};
pub use error::HyprError;
pub use events::{EventClient, EventKind, EventRecord, EVENT_SEPARATOR};
pub use types::{
    ConfigOption, CursorPos, Monitor, RawRequest, RawResponse, Version, Window, Workspace,
    WorkspaceRef,
};
