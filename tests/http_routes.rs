use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use chess_live_server::models::AppState;
use chess_live_server::routes::configure_routes;

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_rt::test]
async fn index_responds() {
    let app = app!();
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(resp.status().is_success());
}

#[actix_rt::test]
async fn lobby_flow() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/session")
        .set_json(json!({ "username": "alice" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["username"], "alice");
    let token = body["authToken"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/game")
        .insert_header(("authorization", token.as_str()))
        .set_json(json!({ "gameName": "evening" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["gameID"], 1);

    let req = test::TestRequest::put()
        .uri("/game")
        .insert_header(("authorization", token.as_str()))
        .set_json(json!({ "playerColor": "WHITE", "gameID": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri("/game")
        .insert_header(("authorization", token.as_str()))
        .set_json(json!({ "playerColor": "WHITE", "gameID": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/game")
        .insert_header(("authorization", token.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let games = body["games"].as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["gameName"], "evening");
    assert_eq!(games[0]["whiteUsername"], "alice");
    assert!(games[0]["blackUsername"].is_null());

    let req = test::TestRequest::delete()
        .uri("/session")
        .insert_header(("authorization", token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/game")
        .insert_header(("authorization", token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn errors_carry_a_message() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/game")
        .insert_header(("authorization", "bogus"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "error: invalid auth token");
}

#[actix_rt::test]
async fn join_unknown_game_is_not_found() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/session")
        .set_json(json!({ "username": "bob" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["authToken"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri("/game")
        .insert_header(("authorization", token.as_str()))
        .set_json(json!({ "playerColor": "BLACK", "gameID": 9 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn clear_removes_everything() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/session")
        .set_json(json!({ "username": "carol" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["authToken"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete().uri("/db").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/game")
        .insert_header(("authorization", token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
