use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use news_service::db::{self, PgArticleRepository, PgCommentStore};
use news_service::handlers::{self, HealthState};
use news_service::middleware::JwtVerifier;
use news_service::services::{CommentService, ContentRewriter, PostService};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

/// News Service
///
/// # Routes
///
/// - `GET /posts/{id_or_slug}` - Article page with sidebars and comment tree
/// - `POST /comments` - Publish a comment (bearer token required)
/// - `/api/v1/health`, `/api/v1/health/ready`, `/api/v1/health/live` - Probes
/// - `/metrics` - Prometheus metrics
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Support container healthchecks via CLI subcommand
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "healthcheck" {
                let port = std::env::var("NEWS_SERVICE_PORT").unwrap_or_else(|_| "8080".into());
                let url = format!("http://127.0.0.1:{}/api/v1/health", port);
                match reqwest::Client::new().get(&url).send().await {
                    Ok(resp) if resp.status().is_success() => return Ok(()),
                    Ok(resp) => {
                        eprintln!("healthcheck HTTP status: {}", resp.status());
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"));
                    }
                    Err(e) => {
                        eprintln!("healthcheck HTTP error: {}", e);
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"));
                    }
                }
            }
        }
    }

    dotenvy::dotenv().ok();

    // Load configuration
    let config = match news_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.app.json_logs);

    tracing::info!("Starting news-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let verifier = match JwtVerifier::from_config(&config.auth) {
        Ok(verifier) => Arc::new(verifier),
        Err(e) => {
            tracing::error!("JWT verifier setup failed: {:#}", e);
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to initialize JWT verifier: {e}"),
            ));
        }
    };

    let db_pool = match db::create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if config.database.run_migrations {
        if let Err(e) = db::run_migrations(&db_pool).await {
            tracing::error!("Database migrations failed: {:#}", e);
            return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
        }
        tracing::info!("Database migrations applied");
    }

    let articles = Arc::new(PgArticleRepository::new(db_pool.clone()));
    let comments = Arc::new(PgCommentStore::new(db_pool.clone()));

    let comment_service = web::Data::new(CommentService::new(
        articles.clone(),
        comments,
        config.site.local_offset,
    ));
    let post_service = web::Data::new(PostService::new(
        articles,
        ContentRewriter::new(config.site.url.clone()),
    ));
    let health_state = web::Data::new(HealthState::new(db_pool));

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(comment_service.clone())
            .app_data(post_service.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(news_service::metrics::serve_metrics))
            // Health check endpoints
            .route("/api/v1/health", web::get().to(handlers::health_summary))
            .route("/api/v1/health/ready", web::get().to(handlers::readiness_summary))
            .route("/api/v1/health/live", web::get().to(handlers::liveness_check))
            .configure(handlers::configure(verifier.clone()))
    })
    .bind(&http_bind_address)?
    .workers(config.app.workers)
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let result = tokio::select! {
        joined = &mut server_task => joined,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            server_task.await
        }
    };

    tracing::info!("news-service shutting down");

    match result {
        Ok(served) => served,
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
    }
}
