use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use bytes::Bytes;

use tandem_types::api::UploadResponse;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// POST /uploads/{bucket}/{name}
///
/// Raw body upload. The response URL is what goes into a message's
/// content or a memory's photo list.
pub async fn upload(
    State(state): State<AppState>,
    Path((bucket, name)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    if !crate::storage::Storage::is_valid_bucket(&bucket) {
        return Err(ApiError::Invalid(format!("unknown bucket: {bucket}")));
    }
    if body.is_empty() {
        return Err(ApiError::Invalid("upload body is empty".into()));
    }
    if body.len() > MAX_FILE_SIZE {
        return Err(ApiError::Invalid("upload exceeds the 50 MB limit".into()));
    }

    let url = state
        .storage
        .store(&bucket, &name, &body)
        .await
        .map_err(ApiError::Internal)?;
    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppStateInner;
    use crate::harmony::Harmony;
    use crate::storage::Storage;
    use std::sync::Arc;
    use tandem_db::Database;
    use tandem_gateway::dispatcher::Dispatcher;
    use uuid::Uuid;

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("tandem-uploads-{}", Uuid::new_v4()));
        Arc::new(AppStateInner {
            db: Arc::new(Database::open_in_memory().unwrap()),
            dispatcher: Dispatcher::default(),
            storage: Storage::new(dir, "http://localhost:4000".into())
                .await
                .unwrap(),
            harmony: Harmony::disabled(),
        })
    }

    #[tokio::test]
    async fn upload_returns_a_public_url() {
        let state = test_state().await;
        let (status, Json(response)) = upload(
            State(state),
            Path(("chat-media".into(), "voice note.ogg".into())),
            Bytes::from_static(b"audio bytes"),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(response.url.contains("/media/chat-media/"));
        assert!(response.url.ends_with("voice_note.ogg"));
    }

    #[tokio::test]
    async fn empty_and_misbucketed_uploads_are_rejected() {
        let state = test_state().await;
        let err = upload(
            State(state.clone()),
            Path(("chat-media".into(), "x.png".into())),
            Bytes::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));

        let err = upload(
            State(state),
            Path(("secrets".into(), "x.png".into())),
            Bytes::from_static(b"data"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
    }
}
