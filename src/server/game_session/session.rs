use actix::{Actor, ActorContext, Addr, AsyncContext, Handler, StreamHandler};
use actix_web::{error, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::server::game_session::messages::{
    ClientAction, ProcessClientMessage, RegisterSession, ServerMessage, UnregisterSession,
};
use crate::server::game_session::server::{CreateGame, GetGameSession};
use crate::server::ws_error::ws_error_message;

/// WebSocket actor bridging one connected client to its game session.
pub struct GameSessionActor {
    pub game_id: Uuid,
    pub client_id: Uuid,
    pub session_addr: Addr<crate::server::game_session::server::GameSession>,
}

impl Actor for GameSessionActor {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.session_addr.do_send(RegisterSession {
            client_id: self.client_id,
            addr: ctx.address(),
        });
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        self.session_addr.do_send(UnregisterSession {
            client_id: self.client_id,
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameSessionActor {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                let action: ClientAction = match serde_json::from_str(&text) {
                    Ok(action) => action,
                    Err(_) => {
                        ctx.text(ws_error_message(
                            "INVALID_ACTION",
                            "Could not parse client action",
                            Some(&self.game_id.to_string()),
                        ));
                        return;
                    }
                };
                self.session_addr.do_send(ProcessClientMessage { msg: action });
            }
            Ok(ws::Message::Ping(payload)) => ctx.pong(&payload),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            _ => (),
        }
    }
}

impl Handler<ServerMessage> for GameSessionActor {
    type Result = ();

    fn handle(&mut self, msg: ServerMessage, ctx: &mut Self::Context) -> Self::Result {
        match serde_json::to_string(&msg) {
            Ok(text) => ctx.text(text),
            Err(_) => ctx.text(ws_error_message(
                "SERIALIZE_FAILED",
                "Failed to serialize server message",
                None,
            )),
        }
    }
}

#[derive(Deserialize)]
pub struct CreateGameRequest {
    #[serde(default)]
    pub player_name: String,
}

#[derive(Serialize)]
pub struct CreateGameResponse {
    pub game_id: Uuid,
}

/// HTTP handler: create a new game session and return its id.
pub async fn create_game(
    body: web::Json<CreateGameRequest>,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let game_id = data
        .game_session_manager
        .send(CreateGame {
            player_name: body.into_inner().player_name,
        })
        .await
        .map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().json(CreateGameResponse { game_id }))
}

/// HTTP handler: upgrade to the game session WebSocket.
pub async fn ws_game(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let game_id = req
        .match_info()
        .get("game_id")
        .ok_or_else(|| error::ErrorBadRequest("Missing game_id"))?;
    let game_id = Uuid::parse_str(game_id).map_err(error::ErrorBadRequest)?;

    let session_addr = data
        .game_session_manager
        .send(GetGameSession { game_id })
        .await
        .map_err(error::ErrorInternalServerError)?
        .map_err(error::ErrorBadRequest)?;

    ws::start(
        GameSessionActor {
            game_id,
            client_id: Uuid::new_v4(),
            session_addr,
        },
        &req,
        stream,
    )
}
