use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Faults surfaced by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("duplicate record")]
    Duplicate,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User record in the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Opaque bearer token, issued once at signup.
    #[serde(skip_serializing)]
    pub access_token: String,
    pub created_at: OffsetDateTime,
}

/// Thought record in the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Thought {
    pub id: Uuid,
    pub message: String,
    pub hearts: i32,
    /// Owning user; set once at creation, never reassigned.
    pub author_id: Uuid,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct NewThought {
    pub message: String,
    pub author_id: Uuid,
}

/// Partial update: present fields overwrite, absent fields keep prior values.
#[derive(Debug, Clone, Default)]
pub struct ThoughtPatch {
    pub message: Option<String>,
    pub hearts: Option<i32>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::Duplicate`] when the email
    /// is already taken (case-insensitive).
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;

    /// Case-insensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Exact lookup by access token.
    async fn find_by_token(&self, token: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait ThoughtStore: Send + Sync {
    /// All thoughts, most recent first.
    async fn list(&self) -> StoreResult<Vec<Thought>>;

    /// Thoughts with an exact heart count, or the unfiltered set when `None`.
    async fn list_by_hearts(&self, hearts: Option<i32>) -> StoreResult<Vec<Thought>>;

    async fn get(&self, id: Uuid) -> StoreResult<Thought>;

    async fn create(&self, new: NewThought) -> StoreResult<Thought>;

    async fn update(&self, id: Uuid, patch: ThoughtPatch) -> StoreResult<Thought>;

    /// Atomic "add 1" on the heart counter. Returns the new count.
    /// Concurrent likes must each independently add 1 (no lost updates).
    async fn like(&self, id: Uuid) -> StoreResult<i32>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Remove every thought. Used by database seeding.
    async fn delete_all(&self) -> StoreResult<()>;
}
