use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    NewThought, NewUser, StoreError, StoreResult, Thought, ThoughtStore, User, UserStore,
    ThoughtPatch,
};

#[derive(Default)]
struct State {
    users: Vec<User>,
    // Insertion order tracks created_at order, so listing newest-first
    // is a reversed walk.
    thoughts: Vec<Thought>,
}

/// In-memory backend. Used when no `DATABASE_URL` is configured and by the
/// test suites. All mutations run under a single write lock, which makes the
/// like increment atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> StoreError {
        StoreError::Backend(anyhow::anyhow!("memory store lock poisoned"))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut state = self.state.write().map_err(|_| Self::lock_poisoned())?;
        if state
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&new.email))
        {
            return Err(StoreError::Duplicate);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            access_token: new.access_token,
            created_at: OffsetDateTime::now_utc(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().map_err(|_| Self::lock_poisoned())?;
        Ok(state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().map_err(|_| Self::lock_poisoned())?;
        Ok(state.users.iter().find(|u| u.access_token == token).cloned())
    }
}

#[async_trait]
impl ThoughtStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Thought>> {
        let state = self.state.read().map_err(|_| Self::lock_poisoned())?;
        Ok(state.thoughts.iter().rev().cloned().collect())
    }

    async fn list_by_hearts(&self, hearts: Option<i32>) -> StoreResult<Vec<Thought>> {
        let state = self.state.read().map_err(|_| Self::lock_poisoned())?;
        Ok(state
            .thoughts
            .iter()
            .rev()
            .filter(|t| hearts.map_or(true, |h| t.hearts == h))
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> StoreResult<Thought> {
        let state = self.state.read().map_err(|_| Self::lock_poisoned())?;
        state
            .thoughts
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, new: NewThought) -> StoreResult<Thought> {
        let mut state = self.state.write().map_err(|_| Self::lock_poisoned())?;
        let thought = Thought {
            id: Uuid::new_v4(),
            message: new.message,
            hearts: 0,
            author_id: new.author_id,
            created_at: OffsetDateTime::now_utc(),
        };
        state.thoughts.push(thought.clone());
        Ok(thought)
    }

    async fn update(&self, id: Uuid, patch: ThoughtPatch) -> StoreResult<Thought> {
        let mut state = self.state.write().map_err(|_| Self::lock_poisoned())?;
        let thought = state
            .thoughts
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        if let Some(message) = patch.message {
            thought.message = message;
        }
        if let Some(hearts) = patch.hearts {
            thought.hearts = hearts;
        }
        Ok(thought.clone())
    }

    async fn like(&self, id: Uuid) -> StoreResult<i32> {
        let mut state = self.state.write().map_err(|_| Self::lock_poisoned())?;
        let thought = state
            .thoughts
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound)?;
        thought.hearts += 1;
        Ok(thought.hearts)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|_| Self::lock_poisoned())?;
        let before = state.thoughts.len();
        state.thoughts.retain(|t| t.id != id);
        if state.thoughts.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_all(&self) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|_| Self::lock_poisoned())?;
        state.thoughts.clear();
        Ok(())
    }
}
