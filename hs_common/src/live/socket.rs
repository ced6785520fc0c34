use actix_web::{rt, web, HttpRequest, HttpResponse};
use actix_ws::{Message, MessageStream, Session};
use log::*;
use tokio::sync::broadcast::{self, error::RecvError};

use super::{
    events::{ClientEvent, LiveEvent},
    monitor::{LiveMonitor, MonitorError},
};

/// Upgrades the request to a WebSocket and attaches it to the monitor as a live observer.
///
/// The observer first receives the monitor's snapshot, then every event published while it stays connected. Text
/// frames from the client are decoded as [`ClientEvent`]s.
pub async fn live_session(
    req: HttpRequest,
    body: web::Payload,
    monitor: web::Data<LiveMonitor>,
) -> Result<HttpResponse, actix_web::Error> {
    let events = monitor.subscribe().map_err(actix_web::error::ErrorServiceUnavailable)?;
    let (response, session, msg_stream) = actix_ws::handle(&req, body)?;
    let monitor = monitor.get_ref().clone();
    let peer = req.peer_addr().map(|a| a.to_string()).unwrap_or_else(|| "unknown".into());
    info!("📡️ Observer {peer} connected");
    rt::spawn(async move {
        run_session(session, msg_stream, events, monitor).await;
        info!("📡️ Observer {peer} disconnected");
    });
    Ok(response)
}

async fn send_event(session: &mut Session, event: &LiveEvent) -> Result<(), MonitorError> {
    let text = serde_json::to_string(event).map_err(|e| MonitorError::EncodingError(e.to_string()))?;
    session.text(text).await.map_err(|_| MonitorError::ShutDown)
}

async fn run_session(
    mut session: Session,
    mut msg_stream: MessageStream,
    mut events: broadcast::Receiver<LiveEvent>,
    monitor: LiveMonitor,
) {
    for event in monitor.snapshot() {
        if let Err(e) = send_event(&mut session, &event).await {
            debug!("📡️ Could not send snapshot. {e}");
            return;
        }
    }
    loop {
        tokio::select! {
            msg = msg_stream.recv() => match msg {
                Some(Ok(Message::Text(text))) => match decode_client_event(&text) {
                    Ok(event) => monitor.handle_client_event(event),
                    Err(e) => warn!("📡️ {e}"),
                },
                Some(Ok(Message::Ping(bytes))) => {
                    if session.pong(&bytes).await.is_err() {
                        break;
                    }
                },
                Some(Ok(Message::Close(reason))) => {
                    trace!("📡️ Observer closed the connection: {reason:?}");
                    break;
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    debug!("📡️ Push channel protocol error. {e}");
                    break;
                },
                None => break,
            },
            event = events.recv() => match event {
                Ok(event) => {
                    if let Err(e) = send_event(&mut session, &event).await {
                        debug!("📡️ Dropping observer. {e}");
                        break;
                    }
                },
                Err(RecvError::Lagged(n)) => warn!("📡️ Observer fell behind and missed {n} events"),
                Err(RecvError::Closed) => break,
            },
        }
    }
    let _ = session.close(None).await;
}

pub fn decode_client_event(text: &str) -> Result<ClientEvent, MonitorError> {
    serde_json::from_str(text).map_err(|e| MonitorError::InvalidClientEvent(e.to_string()))
}
