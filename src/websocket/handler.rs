use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ServerError;
use crate::models::{AppState, ChessWebSocketMessage, ClientMessage, ServerMessage};
use crate::session::ClientHandle;

/// WebSocket handler for chess games
pub struct ChessWebSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
}

/// Sends server messages to a socket actor through its mailbox
pub struct ActorHandle {
    session_id: String,
    recipient: Recipient<ChessWebSocketMessage>,
}

impl ClientHandle for ActorHandle {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn is_open(&self) -> bool {
        self.recipient.connected()
    }

    fn send(&self, message: &ServerMessage) -> Result<(), ServerError> {
        if !self.recipient.connected() {
            return Err(ServerError::Transport(self.session_id.clone()));
        }
        let text = serde_json::to_string(message)?;
        self.recipient.do_send(ChessWebSocketMessage(text));
        Ok(())
    }
}

impl Actor for ChessWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, _: &mut Self::Context) {
        info!("WebSocket connection started: {}", self.id);
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        let dropped = self.app_state.sessions.drop_session(&self.id);
        let swept = self.app_state.sessions.sweep();
        info!(
            "WebSocket connection closed: {} ({} registrations dropped, {} swept)",
            self.id, dropped, swept
        );
    }
}

impl Handler<ChessWebSocketMessage> for ChessWebSocket {
    type Result = ();

    fn handle(&mut self, msg: ChessWebSocketMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for ChessWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                debug!("Received {} bytes from {}", text.len(), self.id);
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => self.handle_message(client_msg, ctx),
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        self.reply(ServerMessage::error(format!("Error: invalid message format: {}", e)), ctx);
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.reply(ServerMessage::error("Error: binary messages are not supported"), ctx);
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl ChessWebSocket {
    pub fn new(app_state: web::Data<AppState>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            app_state,
        }
    }

    pub fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let origin: Arc<dyn ClientHandle> = Arc::new(ActorHandle {
            session_id: self.id.clone(),
            recipient: ctx.address().recipient(),
        });
        self.app_state.commands.handle_message(&origin, msg);
    }

    fn reply(&self, message: ServerMessage, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(&message) {
            Ok(text) => ctx.text(text),
            Err(e) => warn!("Failed to serialize reply: {}", e),
        }
    }
}

// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let socket = ChessWebSocket::new(app_state);
    info!("New WebSocket connection: {}", socket.id);
    ws::start(socket, &req, stream)
}
