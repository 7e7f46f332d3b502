use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod access_token;
mod auth;
mod config;
mod controllers;
mod db;
mod models;

use config::Config;
use db::Database;

pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let port = config.port;

    let db = Arc::new(
        Database::new(&config.database_url).expect("Failed to open database"),
    );
    log::info!("Database ready at {}", config.database_url);

    // Reap expired login sessions in the background.
    {
        let db_cleanup = db.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
            interval.tick().await; // skip immediate tick
            loop {
                interval.tick().await;
                match db_cleanup.cleanup_expired_sessions() {
                    Ok(0) => {}
                    Ok(count) => {
                        log::info!("[SESSION_CLEANUP] Removed {} expired session(s)", count);
                    }
                    Err(e) => {
                        log::error!("[SESSION_CLEANUP] Failed to clean up sessions: {}", e);
                    }
                }
            }
        });
    }

    let static_dir = config::static_dir();
    log::info!("Starting NoteBoard server on port {}", port);
    log::info!("Serving board client from: {}", static_dir);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                config: config.clone(),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::account::config)
            .configure(controllers::notes::config)
            .service(Files::new("/static", static_dir.clone()))
            // Registers the single-segment board view catch-all, so it goes last.
            .configure(controllers::boards::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
