//! Event stream client for the Hyprland event socket
//!
//! Hyprland streams lifecycle notifications over a second socket as
//! newline-terminated records of the form `TYPE>>DATA`. `EventClient` holds
//! that connection open for its whole lifetime and yields one
//! [`EventRecord`] per record, in the exact byte order the compositor wrote
//! them.
//!
//! Reads from the socket land at arbitrary chunk boundaries, so a record
//! can be split mid-line. [`LineDecoder`] buffers the partial tail of each
//! chunk and prefixes it onto the next, guaranteeing no record is lost,
//! duplicated, or emitted early across read boundaries.
//!
//! The stream is not restartable: once the connection reports end-of-stream
//! or a read error, the sequence ends. Reconnection policy belongs to the
//! caller, who redials by constructing a new client.

use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;

use tokio::io::AsyncReadExt;
use tokio::net::UnixStream;
use tracing::{debug, warn};

use crate::client::socket_paths;
use crate::error::HyprError;
use crate::transport::BUF_SIZE;

/// Separator between the event type and its payload on the wire
pub const EVENT_SEPARATOR: &str = ">>";

/// Classification of an event by its wire name
///
/// Covers the event types Hyprland emits on the event socket; anything the
/// compositor adds later arrives as `Unknown` with the wire name preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `workspace` - the focused workspace changed
    Workspace,
    /// `focusedmon` - focus moved to another monitor
    FocusedMonitor,
    /// `activewindow` - the focused window changed (class and title)
    ActiveWindow,
    /// `activewindowv2` - the focused window changed (address)
    ActiveWindowV2,
    /// `fullscreen` - a window entered or left fullscreen
    Fullscreen,
    /// `monitoradded` - a monitor was connected
    MonitorAdded,
    /// `monitorremoved` - a monitor was disconnected
    MonitorRemoved,
    /// `createworkspace` - a workspace was created
    CreateWorkspace,
    /// `destroyworkspace` - a workspace was destroyed
    DestroyWorkspace,
    /// `moveworkspace` - a workspace moved to another monitor
    MoveWorkspace,
    /// `openwindow` - a window was opened
    OpenWindow,
    /// `closewindow` - a window was closed
    CloseWindow,
    /// `movewindow` - a window moved to another workspace
    MoveWindow,
    /// `openlayer` - a layer surface was mapped
    OpenLayer,
    /// `closelayer` - a layer surface was unmapped
    CloseLayer,
    /// `submap` - a keybind submap changed
    Submap,
    /// `changefloatingmode` - a window toggled floating
    ChangeFloatingMode,
    /// `urgent` - a window requested attention
    Urgent,
    /// `screencast` - a screencast started or stopped
    Screencast,
    /// `windowtitle` - a window title changed
    WindowTitle,
    /// Any event type this crate does not know about
    Unknown(String),
}

impl EventKind {
    /// Classify a wire event name.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "workspace" => Self::Workspace,
            "focusedmon" => Self::FocusedMonitor,
            "activewindow" => Self::ActiveWindow,
            "activewindowv2" => Self::ActiveWindowV2,
            "fullscreen" => Self::Fullscreen,
            "monitoradded" => Self::MonitorAdded,
            "monitorremoved" => Self::MonitorRemoved,
            "createworkspace" => Self::CreateWorkspace,
            "destroyworkspace" => Self::DestroyWorkspace,
            "moveworkspace" => Self::MoveWorkspace,
            "openwindow" => Self::OpenWindow,
            "closewindow" => Self::CloseWindow,
            "movewindow" => Self::MoveWindow,
            "openlayer" => Self::OpenLayer,
            "closelayer" => Self::CloseLayer,
            "submap" => Self::Submap,
            "changefloatingmode" => Self::ChangeFloatingMode,
            "urgent" => Self::Urgent,
            "screencast" => Self::Screencast,
            "windowtitle" => Self::WindowTitle,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The wire name for this event type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Workspace => "workspace",
            Self::FocusedMonitor => "focusedmon",
            Self::ActiveWindow => "activewindow",
            Self::ActiveWindowV2 => "activewindowv2",
            Self::Fullscreen => "fullscreen",
            Self::MonitorAdded => "monitoradded",
            Self::MonitorRemoved => "monitorremoved",
            Self::CreateWorkspace => "createworkspace",
            Self::DestroyWorkspace => "destroyworkspace",
            Self::MoveWorkspace => "moveworkspace",
            Self::OpenWindow => "openwindow",
            Self::CloseWindow => "closewindow",
            Self::MoveWindow => "movewindow",
            Self::OpenLayer => "openlayer",
            Self::CloseLayer => "closelayer",
            Self::Submap => "submap",
            Self::ChangeFloatingMode => "changefloatingmode",
            Self::Urgent => "urgent",
            Self::Screencast => "screencast",
            Self::WindowTitle => "windowtitle",
            Self::Unknown(name) => name,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One event from the compositor: its classified type and the unparsed
/// remainder of the line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub kind: EventKind,
    pub data: String,
}

/// Splits an incoming byte stream into complete lines.
///
/// Two states: accumulating a line, and line complete. Bytes of a line
/// whose `\n` has not arrived yet stay buffered until a later chunk
/// delivers the terminator, so chunk boundaries can fall anywhere.
#[derive(Debug, Default)]
pub(crate) struct LineDecoder {
    partial: Vec<u8>,
}

impl LineDecoder {
    /// Consume one chunk and return every line it completed, in order.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            self.partial.extend_from_slice(&rest[..pos]);
            let line = std::mem::take(&mut self.partial);
            lines.push(String::from_utf8_lossy(&line).into_owned());
            rest = &rest[pos + 1..];
        }
        self.partial.extend_from_slice(rest);

        lines
    }

    /// Whether an unterminated line is currently buffered.
    pub(crate) fn has_partial(&self) -> bool {
        !self.partial.is_empty()
    }
}

/// Parse one complete line into an event record.
///
/// Splits on the first `>>`; lines without a separator are not valid
/// records and yield `None`.
fn parse_record(line: &str) -> Option<EventRecord> {
    let (kind, data) = line.split_once(EVENT_SEPARATOR)?;
    Some(EventRecord {
        kind: EventKind::from_wire(kind),
        data: data.to_string(),
    })
}

/// Client for the Hyprland event socket
///
/// Owns one long-lived connection, dialed at construction and held until
/// the client is dropped. Call [`EventClient::next_event`] in a loop,
/// typically from a dedicated task running parallel to request calls
/// (requests and events use independent sockets).
///
/// Not safe for concurrent reads from multiple tasks: the partial-line
/// buffer is single-reader state. Hold the client behind `&mut`.
///
/// # Example
///
/// ```ignore
/// let mut events = EventClient::from_env().await?;
/// while let Some(record) = events.next_event().await? {
///     println!("{} {}", record.kind, record.data);
/// }
/// // Ok(None): the compositor closed the stream. Redial to resume.
/// ```
#[derive(Debug)]
pub struct EventClient {
    stream: UnixStream,
    decoder: LineDecoder,
    pending: VecDeque<EventRecord>,
    done: bool,
}

impl EventClient {
    /// Dial the event socket at an explicit path.
    ///
    /// The path is usually
    /// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket2.sock`;
    /// use [`EventClient::from_env`] to resolve it automatically.
    ///
    /// # Errors
    ///
    /// Returns `HyprError::EmptySocketPath` for an empty path and
    /// `HyprError::ConnectionFailed` if the dial fails.
    pub async fn connect(event_socket: impl Into<PathBuf>) -> Result<Self, HyprError> {
        let socket_path = event_socket.into();
        if socket_path.as_os_str().is_empty() {
            return Err(HyprError::EmptySocketPath);
        }

        let stream =
            UnixStream::connect(&socket_path)
                .await
                .map_err(|e| HyprError::ConnectionFailed {
                    path: socket_path.clone(),
                    source: e,
                })?;

        debug!(path = %socket_path.display(), "event stream connected");

        Ok(Self {
            stream,
            decoder: LineDecoder::default(),
            pending: VecDeque::new(),
            done: false,
        })
    }

    /// Dial the event socket advertised in the environment.
    ///
    /// # Errors
    ///
    /// Returns `HyprError::InstanceNotSet` if `HYPRLAND_INSTANCE_SIGNATURE`
    /// is missing or empty, plus the errors from [`EventClient::connect`].
    pub async fn from_env() -> Result<Self, HyprError> {
        let (_, event_socket) = socket_paths()?;
        Self::connect(event_socket).await
    }

    /// Dial from the environment, panicking on failure.
    ///
    /// Convenience for script-style callers; use [`EventClient::from_env`]
    /// for recoverable construction.
    ///
    /// # Panics
    ///
    /// Panics if socket discovery or the dial fails.
    pub async fn must() -> Self {
        match Self::from_env().await {
            Ok(client) => client,
            Err(e) => panic!("failed to construct Hyprland event client: {e}"),
        }
    }

    /// Wait for and return the next event.
    ///
    /// Suspends until a complete record is available, then returns it.
    /// Events come back in the exact order the compositor wrote them, with
    /// no loss across read boundaries. Closing the connection while a read
    /// is in flight terminates the iteration cleanly.
    ///
    /// Returns `Ok(None)` once the compositor closes the stream; every call
    /// after that also returns `Ok(None)`. A read error is surfaced once,
    /// after the last valid event, and likewise ends the sequence. A
    /// trailing line with no terminator at end-of-stream is incomplete and
    /// is discarded, never emitted as a record.
    ///
    /// # Errors
    ///
    /// Returns `HyprError::ReceiveFailed` if reading from the socket fails.
    pub async fn next_event(&mut self) -> Result<Option<EventRecord>, HyprError> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Ok(Some(record));
            }
            if self.done {
                return Ok(None);
            }

            let mut buf = [0u8; BUF_SIZE];
            let n = match self.stream.read(&mut buf).await {
                Ok(n) => n,
                Err(e) => {
                    self.done = true;
                    return Err(HyprError::ReceiveFailed(e));
                }
            };

            if n == 0 {
                if self.decoder.has_partial() {
                    warn!("event stream closed mid-line; discarding partial record");
                }
                self.done = true;
                continue;
            }

            for line in self.decoder.feed(&buf[..n]) {
                match parse_record(&line) {
                    Some(record) => self.pending.push_back(record),
                    None => warn!(line = %line, "skipping malformed event line"),
                }
            }
        }
    }
}
