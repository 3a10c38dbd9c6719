use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use trip_planner_api::{config::AppConfig, db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("{}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let client = db::mongo::create_mongo_client(&config.mongo_uri)
        .await
        .map_err(|e| {
            error!("Failed to create MongoDB client: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;
    let database = client.database(&config.database_name);

    // signup relies on the unique email index for its conflict check
    db::mongo::ensure_indexes(&database).await.map_err(|e| {
        error!("Could not ensure indexes: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let database = web::Data::new(database);
    let auth = web::Data::new(config.auth.clone());

    info!("Binding to {}:{}", config.host, config.port);

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
            .app_data(database.clone())
            .app_data(auth.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
