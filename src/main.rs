use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};
use sqlx::mysql::MySqlPoolOptions;

use company_employees::config::Config;
use company_employees::repository::{mysql::run_migrations, RepositoryManager};
use company_employees::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = MySqlPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            error!("Failed to create pool: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e)
        })?;

    run_migrations(&pool).await.map_err(|e| {
        error!("Failed to run migrations: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let repositories = web::Data::new(RepositoryManager::mysql(pool));
    let auth_settings = web::Data::new(config.auth_settings());

    info!("Server running at http://{}", config.server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(repositories.clone())
            .app_data(auth_settings.clone())
            .configure(routes::routes::configure)
    })
    .bind(&config.server_address)?
    .run()
    .await
}
