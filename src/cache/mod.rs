use crate::redis_client::RedisClient;
use crate::store::EventStore;
use std::sync::Arc;
use tracing::info;

pub mod events;
pub mod seats;

#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    events: Arc<dyn EventStore>,
}

impl CacheService {
    pub fn new(redis: RedisClient, events: Arc<dyn EventStore>) -> Self {
        Self { redis, events }
    }

    // Cache warmup on startup
    pub async fn warmup_cache(&self) {
        info!("Starting cache warmup...");

        // Preload the event catalog
        let _ = self.get_events().await;

        info!("Cache warmup done");
    }
}
