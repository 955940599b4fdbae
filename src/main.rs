mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::error::set_expose_error_details;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::router::{build_router, AppServices};
use crate::core::{database, middleware};
use crate::features::auth::AdminAccess;
use crate::features::guestbook::PgGuestRepository;
use crate::modules::storage::{
    LocalFsBackend, ObjectStorageBackend, StorageBackend, UploadDispatcher,
};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Every missing setting is reported before anything connects
    let config = Config::from_env().map_err(|e| {
        tracing::error!("{}", e);
        anyhow::anyhow!(e)
    })?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}, environment={}",
        worker_threads,
        std::process::id(),
        config.app.environment
    );
    tracing::info!("Configuration loaded successfully");

    set_expose_error_details(!config.app.is_production());

    if config.database.shares_direct_url() {
        tracing::warn!(
            "DATABASE_URL and DIRECT_URL are identical; migrations will run through the application pool endpoint"
        );
    }

    // Run migrations over the direct connection
    tracing::info!(
        "Running database migrations on {}...",
        database::display_host(&config.database.direct_url)
    );
    database::run_migrations(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!(
        "Database connection pool created: {}",
        database::display_host(&config.database.url)
    );

    // Primary storage: S3-compatible bucket
    let object_storage = ObjectStorageBackend::new(&config.storage)
        .map_err(|e| anyhow::anyhow!("Failed to initialize object storage: {}", e))?;
    object_storage.prepare().await;
    tracing::info!(
        "Object storage initialized for bucket: {}",
        object_storage.bucket_name()
    );

    // Fallback storage: local uploads directory
    let local_storage = LocalFsBackend::new(
        &config.local_upload.directory,
        &config.local_upload.url_prefix,
    );
    if let Err(e) = local_storage.ensure_directory().await {
        tracing::warn!("Local uploads directory unavailable: {}", e);
    }
    tracing::info!(
        "Local upload fallback at {} served under {}",
        local_storage.root().display(),
        config.local_upload.url_prefix
    );

    let backends: Vec<Arc<dyn StorageBackend>> =
        vec![Arc::new(object_storage), Arc::new(local_storage)];
    let dispatcher = Arc::new(UploadDispatcher::new(backends));

    let admin_access = AdminAccess::from_token(config.app.admin_token.clone());
    if admin_access.is_open() {
        tracing::warn!(
            "ADMIN_TOKEN is not set: admin routes (list, detail, update, delete) are OPEN to every caller"
        );
    } else {
        tracing::info!("Admin routes protected by bearer token");
    }

    let services = AppServices::new(
        Arc::new(PgGuestRepository::new(pool)),
        dispatcher,
        admin_access,
    );
    tracing::info!("Guestbook services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    let app = Router::new()
        .merge(swagger)
        .merge(build_router(&services, &config.local_upload))
        .layer(
            ServiceBuilder::new()
                // Generate X-Request-Id using UUID v7 (or use client-provided one)
                .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::MakeSpanWithRequestId)
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                // Propagate X-Request-Id to response headers
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::cors_layer(
                    config.app.cors_allowed_origins.clone(),
                )),
        );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
