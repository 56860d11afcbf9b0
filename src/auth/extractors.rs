use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{User, UserStore};

/// Authenticated identity resolved from the bearer token.
///
/// Including this extractor in a handler signature is the auth guard: it
/// runs before the store is touched and short-circuits with 401 on failure.
pub struct Identity(pub User);

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let user = resolve_bearer(state.users.as_ref(), header).await?;
        Ok(Identity(user))
    }
}

/// Resolve a raw `Authorization` header value to a user. A literal
/// `"Bearer "` prefix is stripped if present; the remainder is looked up
/// verbatim as an access token.
pub async fn resolve_bearer(
    users: &dyn UserStore,
    header: Option<&str>,
) -> Result<User, ApiError> {
    let raw = header.ok_or(ApiError::Unauthenticated)?;
    let token = raw
        .strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .unwrap_or(raw)
        .trim();
    if token.is_empty() {
        return Err(ApiError::Unauthenticated);
    }
    match users.find_by_token(token).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(ApiError::Unauthenticated),
        Err(e) => Err(ApiError::Internal(anyhow::Error::new(e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewUser};

    async fn store_with_user(token: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_user(NewUser {
                email: "bearer@example.com".into(),
                password_hash: "hash".into(),
                access_token: token.into(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn resolves_token_with_bearer_prefix() {
        let store = store_with_user("tok123").await;
        let user = resolve_bearer(&store, Some("Bearer tok123")).await.unwrap();
        assert_eq!(user.email, "bearer@example.com");
    }

    #[tokio::test]
    async fn resolves_bare_token_without_prefix() {
        let store = store_with_user("tok123").await;
        assert!(resolve_bearer(&store, Some("tok123")).await.is_ok());
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let store = store_with_user("tok123").await;
        let err = resolve_bearer(&store, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[tokio::test]
    async fn unknown_token_is_unauthenticated() {
        let store = store_with_user("tok123").await;
        let err = resolve_bearer(&store, Some("Bearer nope")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[tokio::test]
    async fn empty_bearer_is_unauthenticated() {
        let store = store_with_user("tok123").await;
        let err = resolve_bearer(&store, Some("Bearer ")).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }
}
