use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use portfolio_api::{
    errors::expose_error_details,
    graceful_shutdown::stop_on_signal,
    mail::notifier::build_notifier,
    repositories::store::connect_store,
    routes::configure_routes,
    server::{cors::build_cors, logging::init_tracing},
    settings::AppConfig,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.is_production());
    tracing::info!("Loaded configuration: {:?}", config);

    expose_error_details(config.is_development());

    let store = connect_store(&config).await;
    let notifier = build_notifier(&config);

    let app_state = web::Data::new(AppState::new(&config, store, notifier));

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let cors_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(build_cors(&cors_config))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .disable_signals()
    .bind(server_addr)?
    .run();

    actix_rt::spawn(stop_on_signal(server.handle()));

    server.await
}
