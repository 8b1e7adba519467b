mod api;
mod config;
mod middleware;
mod models;
mod seeds;
mod services;
mod storage;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::services::AssistantClient;
use crate::storage::Repository;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();

    log::info!("🚀 Starting Dues Service...");
    log::info!("🗄️  Storage backend: {:?}", config.storage_backend);

    let storage = match storage::build_storage(&config).await {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("❌ Failed to open storage: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };
    let repo = Repository::new(storage);

    // 🌱 First read seeds the demo clubs and roster into an empty store
    match (repo.clubs().await, repo.members().await) {
        (Ok(clubs), Ok(members)) => {
            log::info!("✅ Store ready: {} clubs, {} members", clubs.len(), members.len())
        }
        (Err(e), _) | (_, Err(e)) => log::warn!("⚠️  Store warmup failed: {}", e),
    }

    let assistant = AssistantClient::new(config.assistant.clone());
    if !assistant.is_configured() {
        log::warn!("⚠️  GEMINI_API_KEY not set, assistant endpoints will answer with fallback text");
    }

    let bind = (config.host.clone(), config.port);
    log::info!("🌐 Server starting on {}:{}", bind.0, bind.1);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", bind.0, bind.1);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", bind.0, bind.1);

    let repo_data = web::Data::new(repo);
    let assistant_data = web::Data::new(assistant);
    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        let cors = config_data
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(repo_data.clone())
            .app_data(config_data.clone())
            .app_data(assistant_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
    })
    .bind(bind)?
    .run()
    .await
}
