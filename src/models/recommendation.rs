use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One generated recommendation for a (user, calendar day) pair. At most one
/// exists per user per UTC day, enforced by lookup-before-create; once
/// written it is immutable until the next day triggers a new one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyRecommendation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub recommendation: String,
}
