use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};

use taskhive::auth::TokenService;
use taskhive::config::Config;
use taskhive::routes;
use taskhive::state::AppState;
use taskhive::store::PgStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let store = PgStore::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let state = AppState::new(Arc::new(store), TokenService::new(&config.jwt_secret));

    log::info!("Starting TaskHive server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, &state))
    })
    .bind((config.server_host.clone(), config.server_port))?
    .run()
    .await
}
