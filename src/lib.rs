pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod services;
pub mod store;

use std::sync::Arc;
use tokio::task;

use services::blobs::BlobStore;
use services::bookings::BookingService;
use store::{BookingStore, EventStore, PgStore, UserStore};

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub db: database::Database,
    pub redis: redis_client::RedisClient,
    pub cache: cache::CacheService,
    pub users: Arc<dyn UserStore>,
    pub events: Arc<dyn EventStore>,
    pub bookings: BookingService,
    pub blobs: BlobStore,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        let redis = redis_client::RedisClient::new(&config.redis.url).await?;

        let store = Arc::new(PgStore::new(db.pool.clone()));
        let users: Arc<dyn UserStore> = store.clone();
        let events: Arc<dyn EventStore> = store.clone();
        let booking_store: Arc<dyn BookingStore> = store;

        let cache = cache::CacheService::new(redis.clone(), events.clone());
        let bookings = BookingService::new(booking_store, events.clone());
        let blobs = BlobStore::new(config.uploads.dir.clone(), config.uploads.base_url.clone());

        let state = Arc::new(Self {
            config,
            db,
            redis,
            cache,
            users,
            events,
            bookings,
            blobs,
        });

        let state_for_bg = state.clone();
        task::spawn(async move {
            // Warmup cache in the background
            state_for_bg.cache.warmup_cache().await;
        });

        Ok(state)
    }
}
