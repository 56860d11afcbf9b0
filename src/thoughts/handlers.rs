use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::Identity,
    error::ApiError,
    response::Envelope,
    state::AppState,
    store::{NewThought, StoreError, Thought, ThoughtPatch, ThoughtStore, User},
};

use super::dto::{
    CreateThoughtRequest, EditThoughtRequest, HeartsBody, HeartsFilter, ThoughtBody,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/thoughts", get(list_thoughts))
        .route("/thoughts/like", get(list_by_hearts))
        .route("/thoughts/:id", get(get_thought))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/thoughts", post(create_thought))
        .route("/thoughts/:id", axum::routing::patch(edit_thought).delete(delete_thought))
        .route("/thoughts/:id/like", post(like_thought))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidArgument("Invalid ID format".into()))
}

fn not_found(e: StoreError) -> ApiError {
    match e {
        StoreError::NotFound => ApiError::NotFound("Thought not found".into()),
        other => other.into(),
    }
}

/// Only a thought's author may mutate or delete it.
fn ensure_owner(identity: &User, thought: &Thought, action: &str) -> Result<(), ApiError> {
    if thought.author_id != identity.id {
        return Err(ApiError::Forbidden(format!(
            "You can only {action} your own thoughts"
        )));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_thoughts(State(state): State<AppState>) -> Result<Envelope, ApiError> {
    let thoughts = state.thoughts.list().await.map_err(ApiError::from)?;
    let items: Vec<ThoughtBody> = thoughts.into_iter().map(ThoughtBody::from).collect();
    Ok(Envelope::ok(items, "Thoughts retrieved"))
}

#[instrument(skip(state))]
pub async fn list_by_hearts(
    State(state): State<AppState>,
    Query(filter): Query<HeartsFilter>,
) -> Result<Envelope, ApiError> {
    // An absent or unparsable value falls back to the unfiltered set.
    let hearts = filter.hearts.as_deref().and_then(|v| v.parse::<i32>().ok());
    let thoughts = state
        .thoughts
        .list_by_hearts(hearts)
        .await
        .map_err(ApiError::from)?;

    if thoughts.is_empty() {
        return Ok(Envelope::fail(
            StatusCode::NOT_FOUND,
            Vec::<ThoughtBody>::new(),
            "No thoughts match the query",
        ));
    }
    let items: Vec<ThoughtBody> = thoughts.into_iter().map(ThoughtBody::from).collect();
    Ok(Envelope::ok(items, "Thoughts retrieved"))
}

#[instrument(skip(state))]
pub async fn get_thought(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope, ApiError> {
    let id = parse_id(&id)?;
    let thought = state.thoughts.get(id).await.map_err(not_found)?;
    Ok(Envelope::ok(ThoughtBody::from(thought), "Success"))
}

#[instrument(skip(state, user, payload))]
pub async fn create_thought(
    State(state): State<AppState>,
    Identity(user): Identity,
    Json(payload): Json<CreateThoughtRequest>,
) -> Result<Envelope, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::InvalidArgument("Message must not be empty".into()));
    }
    let thought = state
        .thoughts
        .create(NewThought {
            message: payload.message,
            author_id: user.id,
        })
        .await
        .map_err(ApiError::from)?;

    info!(thought_id = %thought.id, author_id = %user.id, "thought created");
    Ok(Envelope::created(
        ThoughtBody::from(thought),
        "Thought created successfully",
    ))
}

#[instrument(skip(state, user, payload))]
pub async fn edit_thought(
    State(state): State<AppState>,
    Identity(user): Identity,
    Path(id): Path<String>,
    Json(payload): Json<EditThoughtRequest>,
) -> Result<Envelope, ApiError> {
    let id = parse_id(&id)?;
    if matches!(&payload.message, Some(m) if m.trim().is_empty()) {
        return Err(ApiError::InvalidArgument("Message must not be empty".into()));
    }

    let thought = state.thoughts.get(id).await.map_err(not_found)?;
    ensure_owner(&user, &thought, "edit")?;

    let updated = state
        .thoughts
        .update(
            id,
            ThoughtPatch {
                message: payload.message,
                hearts: payload.hearts,
            },
        )
        .await
        .map_err(not_found)?;

    info!(thought_id = %id, author_id = %user.id, "thought updated");
    Ok(Envelope::ok(
        ThoughtBody::from(updated),
        "Thought updated successfully",
    ))
}

#[instrument(skip(state))]
pub async fn like_thought(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope, ApiError> {
    let id = parse_id(&id)?;
    let hearts = state.thoughts.like(id).await.map_err(not_found)?;
    Ok(Envelope::ok(HeartsBody { hearts }, "Thought liked"))
}

#[instrument(skip(state, user))]
pub async fn delete_thought(
    State(state): State<AppState>,
    Identity(user): Identity,
    Path(id): Path<String>,
) -> Result<Envelope, ApiError> {
    let id = parse_id(&id)?;
    let thought = state.thoughts.get(id).await.map_err(not_found)?;
    ensure_owner(&user, &thought, "delete")?;

    state.thoughts.delete(id).await.map_err(not_found)?;

    info!(thought_id = %id, author_id = %user.id, "thought deleted");
    Ok(Envelope::ok(id, "Thought deleted successfully"))
}
