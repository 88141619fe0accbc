//! Command batching for the request protocol
//!
//! Hyprland enforces a hidden limit on commands per request: past it,
//! sub-commands are silently dropped or error out, which would only be
//! observable later as a validation mismatch. Pre-splitting parameter lists
//! into `[[BATCH]]` requests of at most [`MAX_COMMANDS`] avoids that class
//! of failure entirely. Concatenating the responses of the produced
//! requests, in order, reproduces exactly what a single unbounded request
//! would have returned.

use crate::error::HyprError;
use crate::types::RawRequest;

/// Protocol-mandated upper bound on commands per request
pub const MAX_COMMANDS: usize = 30;

/// Marker that switches a request body into batch mode
const BATCH_PREFIX: &str = "[[BATCH]]";

/// Turn one logical command invocation into one or more raw requests.
///
/// - Zero params: a single request of just `command`.
/// - One param: a single request of `command param`.
/// - Two or more params: always batch mode, even below the limit, with
///   params split into contiguous chunks of at most [`MAX_COMMANDS`] and
///   one request per chunk, in original parameter order.
///
/// # Errors
///
/// Returns `HyprError::EmptyCommand` if `command` is empty.
///
/// # Example
///
/// ```ignore
/// let requests = prepare_requests("dispatch", &["exec kitty".into()])?;
/// assert_eq!(requests[0], b"dispatch exec kitty");
/// ```
pub fn prepare_requests(command: &str, params: &[String]) -> Result<Vec<RawRequest>, HyprError> {
    if command.is_empty() {
        return Err(HyprError::EmptyCommand);
    }

    let requests = match params {
        [] => vec![command.as_bytes().to_vec()],
        [param] => vec![format!("{command} {param}").into_bytes()],
        _ => params
            .chunks(MAX_COMMANDS)
            .map(|chunk| {
                let mut request = String::from(BATCH_PREFIX);
                for param in chunk {
                    request.push_str(command);
                    request.push(' ');
                    request.push_str(param);
                    request.push(';');
                }
                request.into_bytes()
            })
            .collect(),
    };

    Ok(requests)
}
