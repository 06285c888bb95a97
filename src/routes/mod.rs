use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::error::ServerError;
use crate::models::{AppState, GameId};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[serde(default)]
    pub game_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameRequest {
    pub player_color: String,
    #[serde(rename = "gameID")]
    pub game_id: GameId,
}

/// HTTP handler for the index page
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Chess server")
}

fn auth_token(req: &HttpRequest) -> &str {
    req.headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub async fn login(
    app_state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ServerError> {
    let token = app_state.service.login(&body.username)?;
    Ok(HttpResponse::Ok().json(json!({ "username": body.username.trim(), "authToken": token })))
}

pub async fn logout(req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ServerError> {
    app_state.service.logout(auth_token(&req))?;
    Ok(HttpResponse::Ok().json(json!({})))
}

pub async fn list_games(req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, ServerError> {
    let games = app_state.service.list_games(auth_token(&req))?;
    Ok(HttpResponse::Ok().json(json!({ "games": games })))
}

pub async fn create_game(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    body: web::Json<CreateGameRequest>,
) -> Result<HttpResponse, ServerError> {
    let game_id = app_state
        .service
        .create_game(auth_token(&req), &body.game_name)?;
    Ok(HttpResponse::Ok().json(json!({ "gameID": game_id })))
}

pub async fn join_game(
    req: HttpRequest,
    app_state: web::Data<AppState>,
    body: web::Json<JoinGameRequest>,
) -> Result<HttpResponse, ServerError> {
    app_state
        .service
        .join_game(auth_token(&req), body.game_id, &body.player_color)?;
    Ok(HttpResponse::Ok().json(json!({})))
}

pub async fn clear(app_state: web::Data<AppState>) -> Result<HttpResponse, ServerError> {
    app_state.service.clear()?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(crate::websocket::ws_index)))
        .service(
            web::resource("/session")
                .route(web::post().to(login))
                .route(web::delete().to(logout)),
        )
        .service(
            web::resource("/game")
                .route(web::get().to(list_games))
                .route(web::post().to(create_game))
                .route(web::put().to(join_game)),
        )
        .service(web::resource("/db").route(web::delete().to(clear)))
        .service(web::resource("/").route(web::get().to(index)));
}
