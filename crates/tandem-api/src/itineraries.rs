use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use tandem_types::api::CreateItineraryRequest;
use tandem_types::events::{Change, FeedEvent};
use tandem_types::models::ItineraryItem;

use crate::error::{ApiError, ApiResult};
use crate::{AppState, blocking};

/// GET /itineraries — soonest date first, then by time within a day.
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<ItineraryItem>>> {
    let items = blocking(move || state.db.list_itineraries()).await?;
    Ok(Json(items))
}

/// POST /itineraries
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateItineraryRequest>,
) -> ApiResult<(StatusCode, Json<ItineraryItem>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Invalid("itinerary title is empty".into()));
    }

    let item = ItineraryItem {
        id: Uuid::new_v4(),
        title: req.title,
        date: req.date,
        time: req.time,
        location: req.location,
        notes: req.notes,
        created_at: Utc::now(),
    };

    let stored = item.clone();
    let db_state = state.clone();
    blocking(move || db_state.db.insert_itinerary(&stored)).await?;

    state
        .dispatcher
        .broadcast(FeedEvent::Itinerary(Change::Inserted(item.clone())));
    Ok((StatusCode::CREATED, Json(item)))
}

/// DELETE /itineraries/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let db_state = state.clone();
    let removed = blocking(move || db_state.db.delete_itinerary(id)).await?;
    if !removed {
        return Err(ApiError::NotFound("itinerary"));
    }

    state
        .dispatcher
        .broadcast(FeedEvent::Itinerary(Change::Deleted { id }));
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppStateInner;
    use crate::harmony::Harmony;
    use crate::storage::Storage;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tandem_db::Database;
    use tandem_gateway::dispatcher::Dispatcher;

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("tandem-itineraries-{}", Uuid::new_v4()));
        Arc::new(AppStateInner {
            db: Arc::new(Database::open_in_memory().unwrap()),
            dispatcher: Dispatcher::default(),
            storage: Storage::new(dir, "http://localhost:4000".into())
                .await
                .unwrap(),
            harmony: Harmony::disabled(),
        })
    }

    fn plan_req(title: &str, date: NaiveDate, time: Option<&str>) -> CreateItineraryRequest {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "date": date,
            "time": time,
            "location": null,
            "notes": null,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn plans_sort_by_date_then_time() {
        let state = test_state().await;
        let day = NaiveDate::from_ymd_opt(2025, 9, 20).unwrap();
        let later_day = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();

        create(State(state.clone()), Json(plan_req("dinner", day, Some("19:00"))))
            .await
            .unwrap();
        create(State(state.clone()), Json(plan_req("museum", day, Some("10:00"))))
            .await
            .unwrap();
        create(State(state.clone()), Json(plan_req("trip", later_day, None)))
            .await
            .unwrap();

        let Json(items) = list(State(state)).await.unwrap();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["museum", "dinner", "trip"]);
    }
}
