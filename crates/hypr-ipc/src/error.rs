//! Error types for Hyprland IPC operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when communicating with the Hyprland compositor
#[derive(Debug, Error)]
pub enum HyprError {
    /// The HYPRLAND_INSTANCE_SIGNATURE environment variable is not set
    #[error("HYPRLAND_INSTANCE_SIGNATURE environment variable not set - is Hyprland running?")]
    InstanceNotSet,

    /// A constructor was given an empty socket path
    #[error("request or event socket path is empty")]
    EmptySocketPath,

    /// Failed to connect to a Hyprland socket
    #[error("Failed to connect to Hyprland socket at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a request to the socket
    #[error("Failed to send request to Hyprland: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Failed to read a response or event from the socket
    #[error("Failed to receive data from Hyprland: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The batcher was given an empty command name
    #[error("empty command")]
    EmptyCommand,

    /// A raw request of zero bytes was submitted
    #[error("empty request")]
    EmptyRequest,

    /// A zero-length response where content was expected
    #[error("empty response")]
    EmptyResponse,

    /// The response contained fewer success markers than submitted commands
    #[error("got ok: {got}, want: {want}, response: {response}")]
    Validation {
        got: usize,
        want: usize,
        response: String,
    },

    /// Failed to decode a structured response payload
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}
