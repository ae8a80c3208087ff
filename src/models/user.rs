use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub favorite_categories: Vec<String>,
    pub favorite_events: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Profile payload returned by the auth endpoints. Never includes the
    /// password hash.
    pub fn profile_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "email": self.email,
            "full_name": self.full_name,
            "phone": self.phone,
            "city": self.city,
            "avatar_url": self.avatar_url,
            "role": self.role,
            "favorite_categories": self.favorite_categories,
            "favorite_events": self.favorite_events,
        })
    }
}
