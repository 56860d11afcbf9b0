use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{
    NewThought, NewUser, StoreError, StoreResult, Thought, ThoughtPatch, ThoughtStore, User,
    UserStore,
};

/// Postgres backend over a shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    /// Run pending migrations. A failure is logged and tolerated so a
    /// pre-provisioned schema still boots.
    pub async fn migrate(&self) {
        if let Err(e) = sqlx::migrate!("./migrations").run(&self.pool).await {
            tracing::warn!(error = %e, "migration failed; continuing with existing schema");
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(anyhow::Error::new(e))
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, access_token)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, access_token, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.access_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate
            } else {
                backend(e)
            }
        })
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, access_token, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn find_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, access_token, created_at
            FROM users
            WHERE access_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }
}

#[async_trait]
impl ThoughtStore for PgStore {
    async fn list(&self) -> StoreResult<Vec<Thought>> {
        sqlx::query_as::<_, Thought>(
            r#"
            SELECT id, message, hearts, author_id, created_at
            FROM thoughts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(backend)
    }

    async fn list_by_hearts(&self, hearts: Option<i32>) -> StoreResult<Vec<Thought>> {
        match hearts {
            Some(hearts) => sqlx::query_as::<_, Thought>(
                r#"
                SELECT id, message, hearts, author_id, created_at
                FROM thoughts
                WHERE hearts = $1
                ORDER BY created_at DESC
                "#,
            )
            .bind(hearts)
            .fetch_all(&self.pool)
            .await
            .map_err(backend),
            None => self.list().await,
        }
    }

    async fn get(&self, id: Uuid) -> StoreResult<Thought> {
        sqlx::query_as::<_, Thought>(
            r#"
            SELECT id, message, hearts, author_id, created_at
            FROM thoughts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)
    }

    async fn create(&self, new: NewThought) -> StoreResult<Thought> {
        sqlx::query_as::<_, Thought>(
            r#"
            INSERT INTO thoughts (id, message, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, message, hearts, author_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.message)
        .bind(new.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)
    }

    async fn update(&self, id: Uuid, patch: ThoughtPatch) -> StoreResult<Thought> {
        sqlx::query_as::<_, Thought>(
            r#"
            UPDATE thoughts
            SET message = COALESCE($2, message),
                hearts = COALESCE($3, hearts)
            WHERE id = $1
            RETURNING id, message, hearts, author_id, created_at
            "#,
        )
        .bind(id)
        .bind(patch.message)
        .bind(patch.hearts)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)
    }

    async fn like(&self, id: Uuid) -> StoreResult<i32> {
        // Single-statement increment; the database serializes concurrent
        // likes so none are lost.
        let hearts: Option<i32> = sqlx::query_scalar(
            r#"
            UPDATE thoughts
            SET hearts = hearts + 1
            WHERE id = $1
            RETURNING hearts
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        hearts.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let deleted: Option<Uuid> =
            sqlx::query_scalar(r#"DELETE FROM thoughts WHERE id = $1 RETURNING id"#)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        deleted.map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn delete_all(&self) -> StoreResult<()> {
        sqlx::query(r#"DELETE FROM thoughts"#)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}
