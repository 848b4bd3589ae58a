//! WebSocket boundary for the signal relay.
//!
//! One task reads frames and feeds the relay; a second drains the
//! connection's outbound queue to the socket in order. The reader also
//! pings the client and gives up on connections that stay silent past the
//! idle timeout, so abandoned sessions still leave their rooms.

use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::{Message, MessageStream, Session};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::core::SignalRelay;
use crate::models::{ClientEvent, ServerEvent};
use crate::routes::AppState;

/// WebSocket liveness settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    /// How often the server pings the client
    pub interval: Duration,
    /// How long a connection may go without any inbound frame
    pub timeout: Duration,
}

impl Heartbeat {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Tracks when a connection was last heard from
#[derive(Debug, Clone, Copy)]
pub struct Liveness {
    last_seen: Instant,
    timeout: Duration,
}

impl Liveness {
    pub fn new(now: Instant, timeout: Duration) -> Self {
        Self {
            last_seen: now,
            timeout,
        }
    }

    /// Record an inbound frame (pongs included)
    pub fn touch(&mut self, now: Instant) {
        self.last_seen = now;
    }

    /// True once nothing has arrived for longer than the timeout
    pub fn is_stale(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_seen) > self.timeout
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws", web::get().to(signal_socket));
}

/// GET /ws - upgrade to a signaling socket
async fn signal_socket(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, session, stream) = actix_ws::handle(&req, body)?;

    actix_web::rt::spawn(run_connection(
        state.relay.clone(),
        state.heartbeat,
        session,
        stream,
    ));

    Ok(response)
}

async fn run_connection(
    relay: Arc<SignalRelay>,
    heartbeat: Heartbeat,
    mut session: Session,
    mut stream: MessageStream,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let id = relay.connect(tx).id();

    tracing::info!("Signaling connection {} established", id);

    let mut writer = session.clone();
    let writer_task = actix_web::rt::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to encode event for {}: {}", id, e);
                    continue;
                }
            };
            if writer.text(text).await.is_err() {
                break;
            }
        }
    });

    let mut liveness = Liveness::new(Instant::now(), heartbeat.timeout);
    let mut ticker = tokio::time::interval(heartbeat.interval);

    loop {
        tokio::select! {
            frame = stream.recv() => {
                let Some(frame) = frame else { break };
                liveness.touch(Instant::now());

                match frame {
                    Ok(Message::Text(text)) => {
                        if let Some(event) = parse_frame(&text) {
                            relay.handle_event(id, event);
                        }
                    }
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(reason)) => {
                        tracing::debug!("Connection {} sent close: {:?}", id, reason);
                        break;
                    }
                    Ok(Message::Binary(_)) => {
                        tracing::debug!("Ignoring binary frame on {}", id);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("Protocol error on {}: {}", id, e);
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                if liveness.is_stale(Instant::now()) {
                    tracing::info!(
                        "Connection {} silent for over {:?}, dropping",
                        id,
                        heartbeat.timeout
                    );
                    break;
                }
                if session.ping(b"").await.is_err() {
                    break;
                }
            }
        }
    }

    relay.on_disconnect(id);

    // The relay has released its sender, so the writer exits once drained
    let _ = writer_task.await;
    let _ = session.close(None).await;

    tracing::info!("Signaling connection {} closed", id);
}

/// Parse a text frame into a client event.
///
/// Malformed frames and frames with a blank `roomId` are dropped.
pub fn parse_frame(text: &str) -> Option<ClientEvent> {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) if event.room_id().trim().is_empty() => {
            tracing::debug!("Dropping {} without roomId", event.name());
            None
        }
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!("Dropping malformed frame: {}", e);
            None
        }
    }
}
