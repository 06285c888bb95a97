use actix_web::{web, App, HttpServer};
use log::{error, info};

use chess_live_server::config::ServerConfig;
use chess_live_server::models::AppState;
use chess_live_server::routes::configure_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.log_filter.clone()));

    info!("Starting chess server at http://{}", config.bind_address);

    // Create shared application state
    let app_state = web::Data::new(AppState::in_memory());

    // Prune connections that closed without a LEAVE
    let sessions = app_state.sessions.clone();
    let sweep_interval = config.sweep_interval;
    actix_rt::spawn(async move {
        let mut interval = actix_rt::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            sessions.sweep();
        }
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(configure_routes)
    })
    .bind(config.bind_address.as_str());

    match server {
        Ok(server) => server.run().await,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_address, e);
            Err(e)
        }
    }
}
