use crate::cache::CacheService;
use redis::AsyncCommands;
use uuid::Uuid;

const SEATS_TTL_SECONDS: u64 = 300;

impl CacheService {
    /// Cached reserved-seat projection for an event, as a JSON string.
    pub async fn get_cached_seats(&self, event_id: Uuid) -> Result<Option<String>, redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        conn.get(format!("seats:{event_id}")).await
    }

    pub async fn cache_seats(&self, event_id: Uuid, json: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.redis.conn.clone();
        conn.set_ex(format!("seats:{event_id}"), json, SEATS_TTL_SECONDS)
            .await
    }

    /// Dropped after every booking mutation that touches the event.
    pub async fn invalidate_seats(&self, event_id: Uuid) {
        let mut conn = self.redis.conn.clone();
        let _: Result<(), redis::RedisError> = conn.del(format!("seats:{event_id}")).await;
    }
}
