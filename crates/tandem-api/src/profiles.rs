use axum::Json;
use axum::extract::{Path, State};

use tandem_types::api::UpdateProfileRequest;
use tandem_types::events::{Change, FeedEvent};
use tandem_types::models::{Person, Profile};

use crate::error::{ApiError, ApiResult};
use crate::{AppState, blocking};

/// GET /profiles
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Profile>>> {
    let profiles = blocking(move || state.db.all_profiles()).await?;
    Ok(Json(profiles))
}

/// PATCH /profiles/{name}
///
/// Partial update of mood, theme color or avatar. Absent fields keep
/// their stored values.
pub async fn update(
    State(state): State<AppState>,
    Path(name): Path<Person>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Profile>> {
    let db_state = state.clone();
    let updated = blocking(move || {
        db_state.db.update_profile(
            name,
            req.current_mood.as_deref(),
            req.theme_color.as_deref(),
            req.avatar_url.as_deref(),
        )
    })
    .await?
    .ok_or(ApiError::NotFound("profile"))?;

    state
        .dispatcher
        .broadcast(FeedEvent::Profile(Change::Updated(updated.clone())));
    Ok(Json(updated))
}
