//! Handshake race between the readiness frame and the deadline.

use futures_util::{Stream, StreamExt};
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::error::ProtocolError;

use crate::domain::ProbeOutcome;

/// First byte of the voice server's readiness frame.
pub const HANDSHAKE_MARKER: u8 = 0x00;

/// Returns `true` if a binary payload is a readiness frame.
#[must_use]
pub fn is_handshake_frame(payload: &[u8]) -> bool {
    payload.first() == Some(&HANDSHAKE_MARKER)
}

/// Reads `stream` until the handshake arrives, the socket ends, or
/// `deadline` passes, and returns how the attempt settled.
///
/// Binary frames that do not start with the marker are other protocol
/// traffic and are skipped, as are text, ping and pong frames. The
/// deadline is checked before each read, so a flood of ignored frames
/// cannot hold the attempt open past it.
pub async fn await_handshake<S>(stream: &mut S, deadline: Instant) -> ProbeOutcome
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    let sleep = tokio::time::sleep_until(deadline);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            biased;

            () = &mut sleep => return ProbeOutcome::TimedOut,

            frame = stream.next() => match frame {
                Some(Ok(Message::Binary(payload))) => {
                    if is_handshake_frame(&payload) {
                        return ProbeOutcome::Connected;
                    }
                    tracing::debug!(
                        len = payload.len(),
                        first_byte = ?payload.first(),
                        "ignoring non-handshake frame"
                    );
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(?frame, "server closed before handshake");
                    return ProbeOutcome::ClosedEarly;
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return classify_error(&err),
                None => return ProbeOutcome::ClosedEarly,
            },
        }
    }
}

/// Maps a socket error to a probe outcome.
///
/// Losing the connection without a close handshake counts as a premature
/// close; everything else is a transport failure.
#[must_use]
pub fn classify_error(err: &WsError) -> ProbeOutcome {
    match err {
        WsError::ConnectionClosed
        | WsError::AlreadyClosed
        | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake) => {
            ProbeOutcome::ClosedEarly
        }
        other => ProbeOutcome::TransportError(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::stream;

    use super::*;

    type Frame = Result<Message, WsError>;

    const DEADLINE: Duration = Duration::from_millis(5_000);

    fn binary(bytes: &[u8]) -> Frame {
        Ok(Message::Binary(bytes.to_vec().into()))
    }

    /// Frames followed by a socket that stays open and silent.
    fn then_silence(frames: Vec<Frame>) -> impl Stream<Item = Frame> + Unpin {
        stream::iter(frames).chain(stream::pending())
    }

    #[test]
    fn marker_must_lead_the_payload() {
        assert!(is_handshake_frame(&[0x00]));
        assert!(is_handshake_frame(&[0x00, 0x05, 0x07]));
        assert!(!is_handshake_frame(&[0x01, 0x00]));
        assert!(!is_handshake_frame(&[]));
    }

    #[tokio::test(start_paused = true)]
    async fn handshake_settles_connected() {
        let mut frames = then_silence(vec![binary(&[0x00, 0x01]), binary(&[0x00])]);
        let outcome = await_handshake(&mut frames, Instant::now() + DEADLINE).await;
        assert_eq!(outcome, ProbeOutcome::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn other_traffic_before_handshake_is_skipped() {
        let mut frames = then_silence(vec![
            Ok(Message::Text("hello".into())),
            binary(&[]),
            binary(&[0x02, 0x00]),
            binary(&[0x00]),
        ]);
        let outcome = await_handshake(&mut frames, Instant::now() + DEADLINE).await;
        assert_eq!(outcome, ProbeOutcome::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_marker_does_not_short_circuit_timeout() {
        let start = Instant::now();
        let mut frames = then_silence(vec![binary(&[0x01, 0x00, 0x00])]);
        let outcome = await_handshake(&mut frames, start + DEADLINE).await;
        assert_eq!(outcome, ProbeOutcome::TimedOut);
        assert!(start.elapsed() >= DEADLINE);
    }

    #[tokio::test(start_paused = true)]
    async fn silence_times_out_at_deadline() {
        let start = Instant::now();
        let mut frames = then_silence(Vec::new());
        let outcome = await_handshake(&mut frames, start + DEADLINE).await;
        assert_eq!(outcome, ProbeOutcome::TimedOut);
        assert!(start.elapsed() >= DEADLINE);
        assert!(start.elapsed() < DEADLINE + Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn close_frame_settles_closed_early() {
        let mut frames = then_silence(vec![binary(&[0x03]), Ok(Message::Close(None))]);
        let outcome = await_handshake(&mut frames, Instant::now() + DEADLINE).await;
        assert_eq!(outcome, ProbeOutcome::ClosedEarly);
    }

    #[tokio::test(start_paused = true)]
    async fn stream_end_settles_closed_early() {
        let mut frames = stream::iter(vec![binary(&[0x07])]);
        let outcome = await_handshake(&mut frames, Instant::now() + DEADLINE).await;
        assert_eq!(outcome, ProbeOutcome::ClosedEarly);
    }

    #[tokio::test(start_paused = true)]
    async fn socket_error_settles_transport_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let mut frames = then_silence(vec![Err(WsError::Io(io))]);
        let outcome = await_handshake(&mut frames, Instant::now() + DEADLINE).await;
        assert!(matches!(outcome, ProbeOutcome::TransportError(_)));
    }

    #[test]
    fn reset_without_close_counts_as_closed() {
        let reset = WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake);
        assert_eq!(classify_error(&reset), ProbeOutcome::ClosedEarly);
        assert_eq!(classify_error(&WsError::ConnectionClosed), ProbeOutcome::ClosedEarly);
    }
}
