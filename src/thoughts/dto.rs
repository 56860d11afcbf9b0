use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::Thought;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtBody {
    pub id: Uuid,
    pub message: String,
    pub hearts: i32,
    pub author_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Thought> for ThoughtBody {
    fn from(t: Thought) -> Self {
        Self {
            id: t.id,
            message: t.message,
            hearts: t.hearts,
            author_id: t.author_id,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateThoughtRequest {
    pub message: String,
}

/// Partial edit: absent fields keep their prior values.
#[derive(Debug, Default, Deserialize)]
pub struct EditThoughtRequest {
    pub message: Option<String>,
    pub hearts: Option<i32>,
}

/// Query string for the hearts filter. The value is kept raw so an
/// unparsable number falls back to the unfiltered set.
#[derive(Debug, Default, Deserialize)]
pub struct HeartsFilter {
    pub hearts: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HeartsBody {
    pub hearts: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thought_body_is_camel_case() {
        let body = ThoughtBody {
            id: Uuid::new_v4(),
            message: "hello".into(),
            hearts: 0,
            author_id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("authorId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("author_id").is_none());
    }
}
