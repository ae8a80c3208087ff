use crate::cache::CacheService;
use crate::models::Event;
use redis::AsyncCommands;

const EVENTS_KEY: &str = "events";
const EVENTS_TTL_SECONDS: u64 = 3600;

impl CacheService {
    // Event catalog, cache-first
    pub async fn get_events(&self) -> Vec<Event> {
        if let Ok(events) = self.get_events_from_cache().await {
            return events;
        }

        // Cache miss or cache down - go to the store
        if let Ok(events) = self.events.list().await {
            let _ = self.save_events_to_cache(&events).await;
            return events;
        }

        vec![]
    }

    pub async fn invalidate_events(&self) {
        let mut conn = self.redis.conn.clone();
        let _: Result<(), redis::RedisError> = conn.del(EVENTS_KEY).await;
    }

    async fn get_events_from_cache(&self) -> Result<Vec<Event>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        let data: String = conn.get(EVENTS_KEY).await?;
        let events: Vec<Event> = serde_json::from_str(&data)
            .map_err(|_| redis::RedisError::from((redis::ErrorKind::TypeError, "Parse error")))?;
        Ok(events)
    }

    async fn save_events_to_cache(&self, events: &[Event]) -> Result<(), redis::RedisError> {
        let data = serde_json::to_string(events)
            .map_err(|_| redis::RedisError::from((redis::ErrorKind::TypeError, "Serialize error")))?;
        let mut conn = self.redis.conn.clone();
        conn.set_ex(EVENTS_KEY, data, EVENTS_TTL_SECONDS).await
    }
}
