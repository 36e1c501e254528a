use alumni_hub::{auth::ensure_jwt_secret_is_valid, connect_to_db, upload};
use axum::{http::Method, Extension};
use envconfig::Envconfig;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Envconfig)]
struct Config {
    #[envconfig(from = "DATABASE_URL")]
    pub db_url: String,
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alumni_hub=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::init_from_env().unwrap();
    ensure_jwt_secret_is_valid();
    upload::ensure_media_config_is_valid();

    let pool = connect_to_db(&config.db_url);
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_origin(Any);
    let app = alumni_hub::app().layer(Extension(pool)).layer(cors);

    tracing::info!(port = config.port, "alumni hub listening");
    axum::Server::bind(&([0, 0, 0, 0], config.port).into())
        .serve(app.into_make_service())
        .await
        .unwrap();
}
