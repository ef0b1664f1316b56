use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use showcase_admin::auth::TokenVerifier;
use showcase_admin::config::AppConfig;
use showcase_admin::create_pool;
use showcase_admin::handlers;
use showcase_admin::storage::LocalStorage;
use tracing_subscriber::EnvFilter;

/// Room for multipart framing around the largest accepted file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let db = create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    let db_data = web::Data::new(db);
    tracing::info!("Connected to database, migrations applied");

    let verifier = web::Data::new(TokenVerifier::from_config(&config.auth));

    let storage = LocalStorage::new(&config.upload_dir, &config.public_base_url);
    storage.ensure_root().await?;
    let upload_root = storage.root().to_path_buf();
    let storage_data = web::Data::new(storage);

    let payload_limit = config.upload_max_bytes * 2 + MULTIPART_OVERHEAD;
    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(env = %config.app_env, "Server running at http://{bind_addr}");
    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(verifier.clone())
            .app_data(storage_data.clone())
            .app_data(config_data.clone())
            .app_data(web::PayloadConfig::new(payload_limit))
            .service(Files::new("/uploads", upload_root.clone()))
            .configure(handlers::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
