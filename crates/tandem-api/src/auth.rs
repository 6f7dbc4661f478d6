use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use tandem_types::api::{CreateProfileRequest, LoginRequest};
use tandem_types::events::{Change, FeedEvent};
use tandem_types::models::{Person, Profile};

use crate::error::{ApiError, ApiResult};
use crate::{AppState, blocking};

/// GET /auth/profiles/{name}
///
/// Tells the PIN screen whether to show "create" or "login". A 404 here
/// means "new user", not a failure; the client branches on the kind.
pub async fn probe(
    State(state): State<AppState>,
    Path(name): Path<Person>,
) -> ApiResult<Json<Profile>> {
    let profile = blocking(move || state.db.get_profile_by_name(name)).await?;
    profile.map(Json).ok_or(ApiError::NotFound("profile"))
}

/// POST /auth/profiles
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProfileRequest>,
) -> ApiResult<(StatusCode, Json<Profile>)> {
    if req.pin.len() != 4 || !req.pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::Invalid("PIN must be exactly 4 digits".into()));
    }

    let profile = Profile {
        id: Uuid::new_v4(),
        display_name: req.display_name,
        pin: req.pin,
        theme_color: Some(req.display_name.default_theme().to_string()),
        current_mood: None,
        avatar_url: None,
        created_at: Utc::now(),
    };

    let inserted = profile.clone();
    let db_state = state.clone();
    let result = blocking(move || {
        // PIN uniqueness is checked up front for the friendly message;
        // the UNIQUE constraints still back it up under races.
        if db_state.db.pin_in_use(&inserted.pin)? {
            return Ok(None);
        }
        db_state.db.create_profile(&inserted)?;
        Ok(Some(()))
    })
    .await;

    match result {
        Ok(Some(())) => {}
        Ok(None) => {
            return Err(ApiError::Conflict(
                "This PIN is already used! Choose a unique one.".into(),
            ));
        }
        Err(ApiError::Conflict(_)) => {
            // The insert itself hit a UNIQUE constraint. Work out which
            // one so the client can switch to the right screen.
            let db_state = state.clone();
            let name = req.display_name;
            let exists =
                blocking(move || Ok(db_state.db.get_profile_by_name(name)?.is_some())).await?;
            let message = if exists {
                "Profile exists! Please login."
            } else {
                "This PIN is already used! Choose a unique one."
            };
            return Err(ApiError::Conflict(message.into()));
        }
        Err(e) => return Err(e),
    }

    state
        .dispatcher
        .broadcast(FeedEvent::Profile(Change::Inserted(profile.clone())));
    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Profile>> {
    let name = req.display_name;
    let profile = blocking(move || state.db.get_profile_by_name(name))
        .await?
        .ok_or(ApiError::NotFound("profile"))?;

    if profile.pin != req.pin {
        return Err(ApiError::WrongPin);
    }
    Ok(Json(profile))
}

/// DELETE /auth/profiles/{name}
///
/// Forgot-PIN reset. Removes only the profile row; messages, tasks and
/// the rest key off the person's name and survive.
pub async fn reset(
    State(state): State<AppState>,
    Path(name): Path<Person>,
) -> ApiResult<StatusCode> {
    let db_state = state.clone();
    let removed = blocking(move || {
        let existing = db_state.db.get_profile_by_name(name)?;
        match existing {
            Some(profile) => {
                db_state.db.delete_profile(name)?;
                Ok(Some(profile.id))
            }
            None => Ok(None),
        }
    })
    .await?;

    match removed {
        Some(id) => {
            state
                .dispatcher
                .broadcast(FeedEvent::Profile(Change::Deleted { id }));
            Ok(StatusCode::NO_CONTENT)
        }
        // Already gone; the reset flow treats that as success.
        None => Ok(StatusCode::NO_CONTENT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::Harmony;
    use crate::storage::Storage;
    use crate::AppStateInner;
    use std::sync::Arc;
    use tandem_db::Database;
    use tandem_gateway::dispatcher::Dispatcher;

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("tandem-auth-{}", Uuid::new_v4()));
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
    async fn create_then_login_round_trip() {
        let state = test_state().await;

        let (status, Json(profile)) = create(
            State(state.clone()),
            Json(CreateProfileRequest {
                display_name: Person::Lulu,
                pin: "1234".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(profile.theme_color.as_deref(), Some("#f43f5e"));

        let Json(logged_in) = login(
            State(state),
            Json(LoginRequest {
                display_name: Person::Lulu,
                pin: "1234".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(logged_in.id, profile.id);
    }

    #[tokio::test]
    async fn wrong_pin_is_called_out() {
        let state = test_state().await;
        create(
            State(state.clone()),
            Json(CreateProfileRequest {
                display_name: Person::Lala,
                pin: "4321".into(),
            }),
        )
        .await
        .unwrap();

        let err = login(
            State(state),
            Json(LoginRequest {
                display_name: Person::Lala,
                pin: "0000".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Werey is this ur profile ?");
    }

    #[tokio::test]
    async fn duplicate_pin_gets_the_friendly_message() {
        let state = test_state().await;
        create(
            State(state.clone()),
            Json(CreateProfileRequest {
                display_name: Person::Lulu,
                pin: "1234".into(),
            }),
        )
        .await
        .unwrap();

        let err = create(
            State(state),
            Json(CreateProfileRequest {
                display_name: Person::Lala,
                pin: "1234".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("This PIN is already used!"));
    }

    #[tokio::test]
    async fn duplicate_profile_suggests_login() {
        let state = test_state().await;
        for pin in ["1234", "9999"] {
            let result = create(
                State(state.clone()),
                Json(CreateProfileRequest {
                    display_name: Person::Lulu,
                    pin: pin.into(),
                }),
            )
            .await;
            if pin == "1234" {
                assert!(result.is_ok());
            } else {
                assert_eq!(
                    result.unwrap_err().to_string(),
                    "Profile exists! Please login."
                );
            }
        }
    }

    #[tokio::test]
    async fn short_pin_is_rejected() {
        let state = test_state().await;
        let err = create(
            State(state),
            Json(CreateProfileRequest {
                display_name: Person::Lulu,
                pin: "12".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Invalid(_)));
    }
}
