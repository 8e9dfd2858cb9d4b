use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use referral_api::{config, database, handlers, middleware};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting referral API in {:?} mode", config.environment);

    database::migrate()
        .await
        .context("cannot prepare database schema")?;

    let app = app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("referral API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}

fn app() -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Authenticated users
        .merge(referral_routes())
        // Administrators
        .merge(admin_routes());

    if config::config().security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
}

fn referral_routes() -> Router {
    use axum::routing::post;
    use handlers::protected::referrals;

    Router::new()
        .route(
            "/api/references",
            post(referrals::submit_candidate).get(referrals::list_requests),
        )
        .route("/api/cvs", get(referrals::download_document))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::jwt_auth_middleware))
                .layer(DefaultBodyLimit::max(
                    config::config().api.max_upload_size_bytes,
                )),
        )
}

fn admin_routes() -> Router {
    use handlers::elevated::referrals;

    // Identity is established first, privilege judged second; the admin gate
    // never runs without the authentication gate ahead of it.
    Router::new()
        .route(
            "/api/admin/references",
            get(referrals::list_all_requests).put(referrals::update_request_status),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::jwt_auth_middleware))
                .layer(axum_middleware::from_fn(
                    middleware::require_admin_middleware,
                )),
        )
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Referral API",
            "version": version,
            "description": "Referral tracking backend - candidate submissions with a reviewed request lifecycle",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/signup, /auth/login (public)",
                "references": "/api/references (authenticated)",
                "cvs": "/api/cvs?id= (authenticated)",
                "admin": "/api/admin/references (administrators)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
