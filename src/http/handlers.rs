//! Resource handlers for the posts API.
//!
//! # Responsibilities
//! - `list` / `get`: read a snapshot at the resolved store path
//! - `create`: sanitize, validate, append, read back
//!
//! # Design Decisions
//! - Absence of data is a 200 with a null snapshot, never a 404; callers
//!   treat an empty collection and a missing one identically
//! - `created` is always the store's server-side timestamp, never the
//!   gateway clock
//! - The response to a create echoes the read-back record with the
//!   store-assigned `key` added, so the caller sees exactly what persisted

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::Value;

use crate::auth::Identity;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::model::{NewPost, PostRecord};

/// `GET /posts/` and `GET /posts/{id}`.
///
/// Both shapes are the same read with a narrower path; the resolved store
/// key is derived from the request path itself.
pub async fn read_posts(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ApiError> {
    let resolved = state.resolver.resolve(uri.path());

    let snapshot = state
        .store
        .read(&resolved, state.order_by_created)
        .await
        .inspect_err(|error| {
            tracing::error!(path = %resolved, error = %error, "Store read failed");
        })?;

    Ok((StatusCode::OK, Json(snapshot)).into_response())
}

/// `POST /posts/`: create a post attributed to the authenticated identity.
pub async fn create_post(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    identity: Option<Extension<Identity>>,
    Json(body): Json<NewPost>,
) -> Result<Response, ApiError> {
    // The gate attaches the identity on configured routes. Refuse to write
    // unattributed records if the route was left ungated by configuration.
    let Some(Extension(identity)) = identity else {
        return Err(ApiError::Unauthenticated(
            "No authenticated identity.".to_string(),
        ));
    };

    let title = sanitized_field(&state, body.title.as_deref());
    let content = sanitized_field(&state, body.content.as_deref());
    let (Some(title), Some(content)) = (title, content) else {
        return Err(ApiError::InvalidInput("Invalid content or title".to_string()));
    };

    let resolved = state.resolver.resolve(uri.path());
    let record = PostRecord::new(&identity, title, content);
    let value = serde_json::to_value(&record).map_err(|e| {
        // Serialization of a PostRecord cannot fail in practice; surface it
        // as invalid input rather than panicking if it ever does.
        ApiError::InvalidInput(e.to_string())
    })?;

    let key = state.store.push(&resolved, &value).await.inspect_err(|error| {
        tracing::error!(path = %resolved, error = %error, "Store push failed");
    })?;

    // Read back the persisted record so the response carries the
    // server-assigned timestamp, then attach the generated key.
    let child = state.resolver.resolve(&format!("{}/{key}", uri.path()));
    let mut persisted = state.store.read(&child, false).await.inspect_err(|error| {
        tracing::error!(path = %child, error = %error, "Read-back after push failed");
    })?;

    if let Value::Object(ref mut fields) = persisted {
        fields.insert("key".to_string(), Value::String(key.clone()));
    }

    tracing::info!(key = %key, author = %identity.subject, "Post created");
    Ok((StatusCode::CREATED, Json(persisted)).into_response())
}

/// Fallback for paths outside the route table.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Sanitize an optional field; `None` means absent or empty after cleaning.
fn sanitized_field(state: &AppState, raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    let clean = state.sanitizer.sanitize(raw);
    if clean.trim().is_empty() {
        None
    } else {
        Some(clean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthPolicy;
    use crate::sanitize::StripTags;
    use crate::store::{DocumentStore, PathResolver, StoreError};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-memory double recording every store call.
    #[derive(Default)]
    struct FakeStore {
        reads: AtomicUsize,
        pushed: Mutex<Option<(String, Value)>>,
        fail: bool,
    }

    #[async_trait]
    impl DocumentStore for FakeStore {
        async fn read(&self, path: &str, _order: bool) -> Result<Value, StoreError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Status {
                    code: 503,
                    message: "down".into(),
                });
            }
            if path.ends_with("/generated-key") {
                Ok(json!({
                    "author": {"uid": "user-1"},
                    "title": "t",
                    "content": "c",
                    "created": 1700000000000u64,
                }))
            } else {
                Ok(Value::Null)
            }
        }

        async fn push(&self, path: &str, value: &Value) -> Result<String, StoreError> {
            if self.fail {
                return Err(StoreError::Status {
                    code: 503,
                    message: "down".into(),
                });
            }
            *self.pushed.lock().unwrap() = Some((path.to_string(), value.clone()));
            Ok("generated-key".to_string())
        }
    }

    struct NoVerify;

    #[async_trait]
    impl crate::auth::TokenVerifier for NoVerify {
        async fn verify(&self, _token: &str) -> Result<Identity, crate::auth::VerifyError> {
            Err(crate::auth::VerifyError::Rejected("unused".into()))
        }
    }

    fn state_with(store: Arc<FakeStore>) -> AppState {
        AppState {
            store,
            verifier: Arc::new(NoVerify),
            sanitizer: Arc::new(StripTags),
            resolver: Arc::new(PathResolver::new("app")),
            policy: AuthPolicy::default(),
            order_by_created: false,
        }
    }

    fn identity() -> Option<Extension<Identity>> {
        Some(Extension(Identity {
            subject: "user-1".to_string(),
            name: None,
        }))
    }

    fn uri(path: &str) -> OriginalUri {
        OriginalUri(path.parse().unwrap())
    }

    #[tokio::test]
    async fn create_without_identity_is_refused_before_store() {
        let store = Arc::new(FakeStore::default());
        let result = create_post(
            State(state_with(store.clone())),
            uri("/posts/"),
            None,
            Json(NewPost {
                title: Some("t".into()),
                content: Some("c".into()),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
        assert!(store.pushed.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_markup_only_title_before_store() {
        let store = Arc::new(FakeStore::default());
        let result = create_post(
            State(state_with(store.clone())),
            uri("/posts/"),
            identity(),
            Json(NewPost {
                title: Some("<br/>".into()),
                content: Some("fine".into()),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
        assert!(store.pushed.lock().unwrap().is_none());
        assert_eq!(store.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let store = Arc::new(FakeStore::default());
        let result = create_post(
            State(state_with(store)),
            uri("/posts/"),
            identity(),
            Json(NewPost {
                title: None,
                content: Some("   ".into()),
            }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn create_persists_author_and_returns_key() {
        let store = Arc::new(FakeStore::default());
        let response = create_post(
            State(state_with(store.clone())),
            uri("/posts/"),
            identity(),
            Json(NewPost {
                title: Some("<b>hello</b>".into()),
                content: Some("world".into()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let (path, value) = store.pushed.lock().unwrap().clone().unwrap();
        assert_eq!(path, "app/posts/");
        assert_eq!(value["author"]["uid"], "user-1");
        assert_eq!(value["title"], "hello");
        assert_eq!(value["created"][".sv"], "timestamp");

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["key"], "generated-key");
        assert_eq!(body["created"], 1700000000000u64);
    }

    #[tokio::test]
    async fn read_missing_collection_is_null_snapshot() {
        let store = Arc::new(FakeStore::default());
        let response = read_posts(State(state_with(store)), uri("/posts/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"null");
    }

    #[tokio::test]
    async fn store_failure_maps_to_store_error() {
        let store = Arc::new(FakeStore {
            fail: true,
            ..FakeStore::default()
        });
        let result = read_posts(State(state_with(store)), uri("/posts/")).await;
        assert!(matches!(result, Err(ApiError::Store(_))));
    }
}
