use serde::Deserialize;
use tracing::info;

use crate::auth::{password::hash_password, token::generate_access_token};
use crate::state::AppState;
use crate::store::{NewThought, NewUser, StoreError, ThoughtPatch, ThoughtStore, UserStore};

const SEED_DATA: &str = include_str!("../data/thoughts.json");
const SEED_EMAIL: &str = "seed@happythoughts.local";

#[derive(Debug, Deserialize)]
struct SeedThought {
    message: String,
    #[serde(default)]
    hearts: i32,
}

/// Wipe all thoughts and reload them from the bundled data file,
/// attributed to a dedicated seed account. Runs when `RESET_DB=true`.
pub async fn seed_database(state: &AppState) -> anyhow::Result<()> {
    info!("seeding database");

    let seed_user = match state.users.find_by_email(SEED_EMAIL).await? {
        Some(user) => user,
        None => {
            let created = state
                .users
                .create_user(NewUser {
                    email: SEED_EMAIL.into(),
                    password_hash: hash_password(&generate_access_token())?,
                    access_token: generate_access_token(),
                })
                .await;
            match created {
                Ok(user) => user,
                // Lost a race with another instance seeding the same store.
                Err(StoreError::Duplicate) => state
                    .users
                    .find_by_email(SEED_EMAIL)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("seed user vanished"))?,
                Err(e) => return Err(e.into()),
            }
        }
    };

    state.thoughts.delete_all().await?;

    let seeds: Vec<SeedThought> = serde_json::from_str(SEED_DATA)?;
    let count = seeds.len();
    for seed in seeds {
        let thought = state
            .thoughts
            .create(NewThought {
                message: seed.message,
                author_id: seed_user.id,
            })
            .await?;
        if seed.hearts != 0 {
            state
                .thoughts
                .update(
                    thought.id,
                    ThoughtPatch {
                        message: None,
                        hearts: Some(seed.hearts),
                    },
                )
                .await?;
        }
    }

    info!(count, "seeded thoughts");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let state = AppState::in_memory();
        seed_database(&state).await.unwrap();
        let first = state.thoughts.list().await.unwrap();
        assert!(!first.is_empty());

        seed_database(&state).await.unwrap();
        let second = state.thoughts.list().await.unwrap();
        assert_eq!(first.len(), second.len());
    }

    #[tokio::test]
    async fn seeded_thoughts_carry_hearts_from_data() {
        let state = AppState::in_memory();
        seed_database(&state).await.unwrap();
        let thoughts = state.thoughts.list().await.unwrap();
        assert!(thoughts.iter().any(|t| t.hearts > 0));
    }
}
