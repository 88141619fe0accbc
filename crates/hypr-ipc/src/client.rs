//! Request client for the Hyprland control socket
//!
//! `RequestClient` issues commands over the control socket and returns
//! typed results. Each call opens its own connection (see
//! [`crate::transport`]), so a client value is cheap, holds no live
//! resources, and is safe to use from multiple concurrent callers.
//!
//! Responses to state-changing commands are checked by counting the
//! protocol's in-band `"ok"` success markers; the check can be disabled via
//! the [`RequestClient::validate`] toggle for callers that prefer to skip
//! scanning every response.

use std::env;
use std::path::PathBuf;

use nix::unistd::Uid;
use serde::de::DeserializeOwned;

use crate::batch::prepare_requests;
use crate::error::HyprError;
use crate::transport;
use crate::types::{
    ConfigOption, CursorPos, Monitor, RawRequest, RawResponse, Version, Window, Workspace,
};

/// Environment variable naming the running Hyprland instance
const INSTANCE_SIGNATURE_ENV: &str = "HYPRLAND_INSTANCE_SIGNATURE";

/// Environment variable for the user runtime directory
const RUNTIME_DIR_ENV: &str = "XDG_RUNTIME_DIR";

/// Resolve the request and event socket paths from the environment
///
/// Returns `(request_socket, event_socket)`, i.e.
/// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock` and
/// `.socket2.sock`. When `XDG_RUNTIME_DIR` is unset the standard
/// `/run/user/<uid>` location is used instead, matching hyprctl.
///
/// # Errors
///
/// Returns `HyprError::InstanceNotSet` if `HYPRLAND_INSTANCE_SIGNATURE`
/// is missing or empty.
pub fn socket_paths() -> Result<(PathBuf, PathBuf), HyprError> {
    let instance = env::var(INSTANCE_SIGNATURE_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(HyprError::InstanceNotSet)?;

    let runtime_dir = env::var(RUNTIME_DIR_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/run/user").join(Uid::current().to_string()));

    let base = runtime_dir.join("hypr").join(instance);
    Ok((base.join(".socket.sock"), base.join(".socket2.sock")))
}

/// Decode a validated response into a typed value.
///
/// Read-only commands return data payloads rather than `"ok"` markers and
/// come through here without going past the validator.
fn decode_response<T: DeserializeOwned>(response: &RawResponse) -> Result<T, HyprError> {
    if response.is_empty() {
        return Err(HyprError::EmptyResponse);
    }
    serde_json::from_slice(response).map_err(HyprError::Decode)
}

/// Client for issuing commands to the Hyprland compositor
///
/// # Example
///
/// ```ignore
/// let client = RequestClient::from_env()?;
/// let window = client.active_window().await?;
/// println!("focused: {}", window.title);
/// ```
#[derive(Debug, Clone)]
pub struct RequestClient {
    /// Whether to check responses for the expected number of `"ok"`
    /// markers. Defaults to `true`; disable to skip scanning every
    /// response at the expense of not surfacing some IPC failures.
    pub validate: bool,

    /// Path to the control socket; a fresh connection is dialed per request
    socket_path: PathBuf,
}

impl RequestClient {
    /// Create a client for an explicit control socket path.
    ///
    /// The path is usually
    /// `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/.socket.sock`;
    /// use [`RequestClient::from_env`] to resolve it automatically.
    ///
    /// # Errors
    ///
    /// Returns `HyprError::EmptySocketPath` if the path is empty.
    pub fn new(request_socket: impl Into<PathBuf>) -> Result<Self, HyprError> {
        let socket_path = request_socket.into();
        if socket_path.as_os_str().is_empty() {
            return Err(HyprError::EmptySocketPath);
        }
        Ok(Self {
            validate: true,
            socket_path,
        })
    }

    /// Create a client using the socket advertised in the environment.
    ///
    /// # Errors
    ///
    /// Returns `HyprError::InstanceNotSet` if `HYPRLAND_INSTANCE_SIGNATURE`
    /// is missing or empty.
    pub fn from_env() -> Result<Self, HyprError> {
        let (request_socket, _) = socket_paths()?;
        Self::new(request_socket)
    }

    /// Create a client from the environment, panicking on failure.
    ///
    /// Convenience for script-style callers; everything else in this crate
    /// returns `Result`. Use [`RequestClient::from_env`] for recoverable
    /// construction.
    ///
    /// # Panics
    ///
    /// Panics if the instance signature is not present in the environment.
    pub fn must() -> Self {
        match Self::from_env() {
            Ok(client) => client,
            Err(e) => panic!("failed to construct Hyprland request client: {e}"),
        }
    }

    /// Send a raw request and return the raw reply.
    ///
    /// Low-level escape hatch, equivalent to piping a command into the
    /// control socket: `request(b"dispatch exec kitty")`. No batching and
    /// no validation happen at this level; an invalid request generally
    /// comes back as something other than `"ok"`.
    ///
    /// # Errors
    ///
    /// Returns `HyprError::EmptyRequest` for a zero-byte request and the
    /// transport errors from dialing, writing, or reading.
    pub async fn request(&self, request: &RawRequest) -> Result<RawResponse, HyprError> {
        transport::send(&self.socket_path, request).await
    }

    /// Run one logical command, batching parameters as needed, and return
    /// the concatenated responses in request order.
    async fn do_request(&self, command: &str, params: &[String]) -> Result<RawResponse, HyprError> {
        let requests = prepare_requests(command, params)?;

        let mut response = Vec::new();
        for request in &requests {
            response.extend(self.request(request).await?);
        }

        if response.is_empty() {
            return Err(HyprError::EmptyResponse);
        }
        Ok(response)
    }

    /// Check a response for the expected number of success markers.
    ///
    /// Counts non-overlapping occurrences of the literal `"ok"` and expects
    /// at least one per submitted parameter (or one for parameterless
    /// commands). This is a heuristic, not a parse: payload text that
    /// happens to contain `"ok"` can over-count, which is deliberately not
    /// treated as failure. Skipped entirely when [`Self::validate`] is off,
    /// except that an empty response always fails.
    fn validate_response(&self, params: &[String], response: &RawResponse) -> Result<(), HyprError> {
        if response.is_empty() {
            return Err(HyprError::EmptyResponse);
        }
        if !self.validate {
            return Ok(());
        }

        let text = String::from_utf8_lossy(response);
        let got = text.matches("ok").count();
        let want = params.len().max(1);

        if got < want {
            return Err(HyprError::Validation {
                got,
                want,
                response: text.into_owned(),
            });
        }
        Ok(())
    }

    /// Get the currently focused window, like `hyprctl activewindow`.
    pub async fn active_window(&self) -> Result<Window, HyprError> {
        let response = self.do_request("activewindow", &[]).await?;
        decode_response(&response)
    }

    /// Get the currently focused workspace, like `hyprctl activeworkspace`.
    pub async fn active_workspace(&self) -> Result<Workspace, HyprError> {
        let response = self.do_request("activeworkspace", &[]).await?;
        decode_response(&response)
    }

    /// List all windows, like `hyprctl clients`.
    pub async fn clients(&self) -> Result<Vec<Window>, HyprError> {
        let response = self.do_request("clients", &[]).await?;
        decode_response(&response)
    }

    /// Get the cursor position, like `hyprctl cursorpos`.
    pub async fn cursor_pos(&self) -> Result<CursorPos, HyprError> {
        let response = self.do_request("cursorpos", &[]).await?;
        decode_response(&response)
    }

    /// List all monitors, like `hyprctl monitors`.
    pub async fn monitors(&self) -> Result<Vec<Monitor>, HyprError> {
        let response = self.do_request("monitors", &[]).await?;
        decode_response(&response)
    }

    /// List all workspaces, like `hyprctl workspaces`.
    pub async fn workspaces(&self) -> Result<Vec<Workspace>, HyprError> {
        let response = self.do_request("workspaces", &[]).await?;
        decode_response(&response)
    }

    /// Look up a configuration option, like `hyprctl getoption <name>`.
    pub async fn get_option(&self, name: &str) -> Result<ConfigOption, HyprError> {
        let response = self.do_request("getoption", &[name.to_string()]).await?;
        decode_response(&response)
    }

    /// Get compositor build information, like `hyprctl version`.
    pub async fn version(&self) -> Result<Version, HyprError> {
        let response = self.do_request("version", &[]).await?;
        decode_response(&response)
    }

    /// Get the splash phrase, like `hyprctl splash`. Returned verbatim.
    pub async fn splash(&self) -> Result<String, HyprError> {
        let response = self.do_request("splash", &[]).await?;
        Ok(String::from_utf8_lossy(&response).into_owned())
    }

    /// Run dispatchers, like `hyprctl dispatch`.
    ///
    /// Multiple dispatchers are sent in batch mode, split across requests
    /// when they exceed the per-request command limit.
    ///
    /// # Example
    ///
    /// ```ignore
    /// client
    ///     .dispatch(&["exec kitty".into(), "workspace 2".into()])
    ///     .await?;
    /// ```
    pub async fn dispatch(&self, params: &[String]) -> Result<(), HyprError> {
        let response = self.do_request("dispatch", params).await?;
        self.validate_response(params, &response)
    }

    /// Set configuration keywords, like `hyprctl keyword`.
    pub async fn keyword(&self, params: &[String]) -> Result<(), HyprError> {
        let response = self.do_request("keyword", params).await?;
        self.validate_response(params, &response)
    }

    /// Enter kill mode, like `hyprctl kill`. Does not wait for a click.
    pub async fn kill(&self) -> Result<(), HyprError> {
        let response = self.do_request("kill", &[]).await?;
        self.validate_response(&[], &response)
    }

    /// Reload the compositor configuration, like `hyprctl reload`.
    pub async fn reload(&self) -> Result<(), HyprError> {
        let response = self.do_request("reload", &[]).await?;
        self.validate_response(&[], &response)
    }

    /// Set the cursor theme and size, like `hyprctl setcursor`.
    pub async fn set_cursor(&self, theme: &str, size: u16) -> Result<(), HyprError> {
        let params = vec![format!("{theme} {size}")];
        let response = self.do_request("setcursor", &params).await?;
        self.validate_response(&params, &response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::UnixListener;

    // Serializes tests that touch process-global environment variables.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Spawn a fake compositor serving `replies.len()` connections, one
    /// canned reply each, in order. Returns the payloads it received.
    fn spawn_server(
        path: &Path,
        replies: Vec<Vec<u8>>,
    ) -> tokio::task::JoinHandle<Vec<Vec<u8>>> {
        let listener = UnixListener::bind(path).unwrap();
        tokio::spawn(async move {
            let mut received = Vec::new();
            for reply in replies {
                let (mut conn, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 16 * 1024];
                let n = conn.read(&mut buf).await.unwrap();
                received.push(buf[..n].to_vec());
                conn.write_all(&reply).await.unwrap();
            }
            received
        })
    }

    fn client_for(path: &Path) -> RequestClient {
        RequestClient::new(path).unwrap()
    }

    fn params(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_rejects_empty_path() {
        let err = RequestClient::new("").unwrap_err();
        assert!(matches!(err, HyprError::EmptySocketPath));
    }

    #[test]
    fn from_env_requires_instance_signature() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let original = std::env::var(INSTANCE_SIGNATURE_ENV).ok();

        std::env::remove_var(INSTANCE_SIGNATURE_ENV);
        let result = RequestClient::from_env();

        if let Some(val) = original {
            std::env::set_var(INSTANCE_SIGNATURE_ENV, val);
        }

        assert!(matches!(result.unwrap_err(), HyprError::InstanceNotSet));
    }

    #[test]
    fn empty_instance_signature_is_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let original = std::env::var(INSTANCE_SIGNATURE_ENV).ok();

        std::env::set_var(INSTANCE_SIGNATURE_ENV, "");
        let result = socket_paths();

        match original {
            Some(val) => std::env::set_var(INSTANCE_SIGNATURE_ENV, val),
            None => std::env::remove_var(INSTANCE_SIGNATURE_ENV),
        }

        assert!(matches!(result.unwrap_err(), HyprError::InstanceNotSet));
    }

    #[test]
    fn socket_paths_follow_hyprctl_layout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let original_sig = std::env::var(INSTANCE_SIGNATURE_ENV).ok();
        let original_dir = std::env::var(RUNTIME_DIR_ENV).ok();

        std::env::set_var(INSTANCE_SIGNATURE_ENV, "abc123");
        std::env::set_var(RUNTIME_DIR_ENV, "/run/user/1000");
        let result = socket_paths();

        match original_sig {
            Some(val) => std::env::set_var(INSTANCE_SIGNATURE_ENV, val),
            None => std::env::remove_var(INSTANCE_SIGNATURE_ENV),
        }
        match original_dir {
            Some(val) => std::env::set_var(RUNTIME_DIR_ENV, val),
            None => std::env::remove_var(RUNTIME_DIR_ENV),
        }

        let (request, event) = result.unwrap();
        assert_eq!(
            request,
            PathBuf::from("/run/user/1000/hypr/abc123/.socket.sock")
        );
        assert_eq!(
            event,
            PathBuf::from("/run/user/1000/hypr/abc123/.socket2.sock")
        );
    }

    // -------------------------------------------------------------------
    // Validator
    // -------------------------------------------------------------------

    #[test]
    fn validation_passes_with_enough_markers() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&dir.path().join("x.sock"));

        let response = b"okok".to_vec();
        assert!(client
            .validate_response(&params(&["a", "b"]), &response)
            .is_ok());
    }

    #[test]
    fn validation_expects_one_marker_for_parameterless_commands() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&dir.path().join("x.sock"));

        assert!(client.validate_response(&[], &b"ok".to_vec()).is_ok());

        let err = client
            .validate_response(&[], &b"unknown command".to_vec())
            .unwrap_err();
        match err {
            HyprError::Validation { got, want, .. } => {
                assert_eq!(got, 0);
                assert_eq!(want, 1);
            }
            other => panic!("expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn validation_reports_counts_and_raw_response() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&dir.path().join("x.sock"));

        let err = client
            .validate_response(&params(&["a", "b", "c"]), &b"okInvalid dispatcherok".to_vec())
            .unwrap_err();
        match err {
            HyprError::Validation { got, want, response } => {
                assert_eq!(got, 2);
                assert_eq!(want, 3);
                assert!(response.contains("Invalid dispatcher"));
            }
            other => panic!("expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn over_counting_is_not_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let client = client_for(&dir.path().join("x.sock"));

        // Payload text containing "ok" inflates the count; the heuristic
        // only flags under-counting.
        assert!(client
            .validate_response(&params(&["a"]), &b"okok broken token".to_vec())
            .is_ok());
    }

    #[test]
    fn disabled_validation_accepts_any_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = client_for(&dir.path().join("x.sock"));
        client.validate = false;

        assert!(client
            .validate_response(&params(&["a", "b"]), &b"total garbage".to_vec())
            .is_ok());
    }

    #[test]
    fn empty_response_fails_regardless_of_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = client_for(&dir.path().join("x.sock"));
        client.validate = false;

        let err = client.validate_response(&[], &Vec::new()).unwrap_err();
        assert!(matches!(err, HyprError::EmptyResponse));
    }

    // -------------------------------------------------------------------
    // Decoder
    // -------------------------------------------------------------------

    #[test]
    fn decode_rejects_empty_response() {
        let err = decode_response::<Version>(&Vec::new()).unwrap_err();
        assert!(matches!(err, HyprError::EmptyResponse));
    }

    #[test]
    fn decode_wraps_parse_failures() {
        let err = decode_response::<Version>(&b"not json".to_vec()).unwrap_err();
        assert!(matches!(err, HyprError::Decode(_)));
    }

    #[test]
    fn decode_produces_typed_values() {
        let cursor: CursorPos = decode_response(&br#"{"x": 100, "y": 250}"#.to_vec()).unwrap();
        assert_eq!(cursor, CursorPos { x: 100, y: 250 });
    }

    // -------------------------------------------------------------------
    // End-to-end over a real socket
    // -------------------------------------------------------------------

    #[tokio::test]
    async fn active_window_decodes_server_reply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypr.sock");
        let reply = br#"{"address": "0x1ead", "class": "kitty", "title": "~", "pid": 7}"#.to_vec();
        let server = spawn_server(&path, vec![reply]);

        let window = client_for(&path).active_window().await.unwrap();
        assert_eq!(window.class, "kitty");
        assert_eq!(window.pid, 7);

        let received = server.await.unwrap();
        assert_eq!(received[0], b"j/activewindow");
    }

    #[tokio::test]
    async fn dispatch_batches_two_params_into_one_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypr.sock");
        let server = spawn_server(&path, vec![b"okok".to_vec()]);

        client_for(&path)
            .dispatch(&params(&["exec kitty", "workspace 2"]))
            .await
            .unwrap();

        let received = server.await.unwrap();
        assert_eq!(
            received[0],
            b"j/[[BATCH]]dispatch exec kitty;dispatch workspace 2;"
        );
    }

    #[tokio::test]
    async fn dispatch_splits_params_over_the_command_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypr.sock");
        // 31 params: one full chunk of 30 plus a chunk of 1, so two
        // connections; each reply carries one marker per sub-command.
        let server = spawn_server(&path, vec![b"ok".repeat(30), b"ok".to_vec()]);

        let many: Vec<String> = (0..31).map(|i| format!("workspace {i}")).collect();
        client_for(&path).dispatch(&many).await.unwrap();

        let received = server.await.unwrap();
        assert_eq!(received.len(), 2);
        assert!(received[0].starts_with(b"j/[[BATCH]]"));
        assert!(received[1].starts_with(b"j/[[BATCH]]"));
    }

    #[tokio::test]
    async fn dispatch_surfaces_partial_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypr.sock");
        let server = spawn_server(&path, vec![b"okInvalid dispatcher".to_vec()]);

        let err = client_for(&path)
            .dispatch(&params(&["exec kitty", "bad one"]))
            .await
            .unwrap_err();
        match err {
            HyprError::Validation { got, want, .. } => {
                assert_eq!(got, 1);
                assert_eq!(want, 2);
            }
            other => panic!("expected Validation, got: {other:?}"),
        }

        server.await.unwrap();
    }

    #[tokio::test]
    async fn empty_reply_fails_even_without_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypr.sock");
        // Server closes without writing anything.
        let server = spawn_server(&path, vec![Vec::new()]);

        let mut client = client_for(&path);
        client.validate = false;

        let err = client.reload().await.unwrap_err();
        assert!(matches!(err, HyprError::EmptyResponse));

        server.await.unwrap();
    }

    #[tokio::test]
    async fn version_round_trips_typed_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypr.sock");
        let reply =
            br#"{"branch": "main", "commit": "deadbeef", "dirty": false, "tag": "v0.41.0"}"#
                .to_vec();
        let server = spawn_server(&path, vec![reply]);

        let version = client_for(&path).version().await.unwrap();
        assert_eq!(version.commit, "deadbeef");
        assert_eq!(version.tag, "v0.41.0");

        let received = server.await.unwrap();
        assert_eq!(received[0], b"j/version");
    }

    #[tokio::test]
    async fn set_cursor_sends_theme_and_size_as_one_param() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hypr.sock");
        let server = spawn_server(&path, vec![b"ok".to_vec()]);

        client_for(&path).set_cursor("Adwaita", 32).await.unwrap();

        let received = server.await.unwrap();
        assert_eq!(received[0], b"j/setcursor Adwaita 32");
    }
}
