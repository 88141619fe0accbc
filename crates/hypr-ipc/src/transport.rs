//! Request transport for the Hyprland control socket
//!
//! Every request opens a fresh connection: the protocol does not multiplex
//! commands on one stream, so one-shot connections sidestep framing
//! ambiguity entirely. The outgoing payload carries a two-byte `"j/"` marker
//! selecting JSON-formatted replies.
//!
//! ## Framing
//!
//! Hyprland sends no length prefix or delimiter on the control socket. The
//! end of a reply is inferred: a read that returns fewer bytes than the
//! buffer size means the message is complete, and EOF means the peer closed.
//! A reply that is an exact multiple of the buffer size therefore needs one
//! extra zero-byte read before it can be considered complete.
//!
//! The heuristic lives in [`read_reply`], generic over `AsyncRead`, so it
//! can be revisited in one place if the compositor protocol ever grows real
//! framing, and so callers can inject deadlines or cancellation around the
//! underlying stream.

use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::debug;

use crate::error::HyprError;
use crate::types::{RawRequest, RawResponse};

/// Read buffer size; also the short-read threshold for end-of-message
pub(crate) const BUF_SIZE: usize = 8192;

/// Output-mode marker prepended to every request, selecting JSON replies
const JSON_MODE_PREFIX: &[u8; 2] = b"j/";

/// Read one complete reply from `reader` using the short-read heuristic.
///
/// Reads into a fixed-size buffer until a read returns fewer bytes than the
/// buffer (end of message) or zero bytes (end of stream), concatenating all
/// chunks in order. A full-buffer read is never taken as complete on its
/// own; the loop always issues another read, which confirms end-of-stream
/// for replies that are an exact multiple of the buffer size.
pub(crate) async fn read_reply<R>(reader: &mut R) -> std::io::Result<RawResponse>
where
    R: AsyncRead + Unpin,
{
    let mut response = Vec::new();
    let mut buf = [0u8; BUF_SIZE];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        response.extend_from_slice(&buf[..n]);
        if n < BUF_SIZE {
            break;
        }
    }

    Ok(response)
}

/// Send one raw request over a fresh connection and collect the full reply.
///
/// Dials `socket_path`, writes the `"j/"`-prefixed payload in one
/// operation, then reads until the framing heuristic signals completion.
/// The connection is dropped (and thereby closed) on every exit path.
///
/// # Errors
///
/// Returns `HyprError::EmptyRequest` for a zero-byte request,
/// `HyprError::ConnectionFailed` if the dial fails,
/// `HyprError::SendFailed` if the write does not complete, and
/// `HyprError::ReceiveFailed` if reading the reply fails.
pub(crate) async fn send(socket_path: &Path, request: &RawRequest) -> Result<RawResponse, HyprError> {
    if request.is_empty() {
        return Err(HyprError::EmptyRequest);
    }

    let mut stream =
        UnixStream::connect(socket_path)
            .await
            .map_err(|e| HyprError::ConnectionFailed {
                path: socket_path.to_path_buf(),
                source: e,
            })?;

    let mut payload = Vec::with_capacity(JSON_MODE_PREFIX.len() + request.len());
    payload.extend_from_slice(JSON_MODE_PREFIX);
    payload.extend_from_slice(request);

    stream
        .write_all(&payload)
        .await
        .map_err(HyprError::SendFailed)?;
    stream.flush().await.map_err(HyprError::SendFailed)?;

    debug!(bytes = payload.len(), "sent request");

    let response = read_reply(&mut stream)
        .await
        .map_err(HyprError::ReceiveFailed)?;

    debug!(bytes = response.len(), "received reply");

    Ok(response)
}
