use agrilogix_api::{
    app,
    metrics::Metrics,
    state::{AppState, AuthConfig},
};
use agrilogix_store::{
    DbClient, Notifier, PostgresCatalogRepository, PostgresColdChainRepository,
    PostgresOrderRepository, PostgresShipmentRepository, RedisClient,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "agrilogix_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = agrilogix_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting AgriLogix API on port {}", config.server.port);

    // Postgres
    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");
    let business_rules = db
        .fetch_business_rules(config.business_rules.clone())
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to configured business rules: {}", e);
            config.business_rules.clone()
        });

    // Redis
    let redis = RedisClient::new(&config.redis.url)
        .await
        .expect("Failed to connect to Redis");

    // Kafka
    let notifier = Notifier::new(&config.kafka.brokers, &config.kafka.notifications_topic)
        .expect("Failed to create Kafka producer");

    let catalog_repo = Arc::new(PostgresCatalogRepository {
        pool: db.pool.clone(),
    });

    let app_state = AppState {
        redis: Arc::new(redis),
        notifier: Arc::new(notifier),
        farm_repo: catalog_repo.clone(),
        product_repo: catalog_repo,
        order_repo: Arc::new(PostgresOrderRepository {
            pool: db.pool.clone(),
        }),
        shipment_repo: Arc::new(PostgresShipmentRepository {
            pool: db.pool.clone(),
        }),
        coldchain_repo: Arc::new(PostgresColdChainRepository {
            pool: db.pool.clone(),
        }),
        business_rules,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        metrics: Arc::new(Metrics::new()),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
