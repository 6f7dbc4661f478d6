use axum::Json;
use axum::extract::State;
use chrono::Utc;
use std::collections::BTreeMap;

use tandem_types::api::Summary;

use crate::error::ApiResult;
use crate::{AppState, blocking};

/// GET /summary
///
/// The dashboard rollup: pending task count, next upcoming plan, total
/// saved across saving goals, open requests and both moods. Assembled
/// in one blocking pass so the numbers are from one moment.
pub async fn get(State(state): State<AppState>) -> ApiResult<Json<Summary>> {
    let today = Utc::now().date_naive();
    let summary = blocking(move || {
        let pending_tasks = state.db.pending_task_count()?;
        let next_event = state.db.next_itinerary(today)?;
        let total_saved = state.db.total_saved()?;
        let pending_requests = state.db.pending_requests()?;

        let mut moods = BTreeMap::new();
        for profile in state.db.all_profiles()? {
            if let Some(mood) = profile.current_mood {
                moods.insert(profile.display_name, mood);
            }
        }

        Ok(Summary {
            pending_tasks,
            next_event,
            total_saved,
            pending_requests,
            moods,
        })
    })
    .await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppStateInner;
    use crate::harmony::Harmony;
    use crate::storage::Storage;
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use tandem_db::Database;
    use tandem_gateway::dispatcher::Dispatcher;
    use tandem_types::models::{
        Assignee, FinanceItem, GoalKind, ItineraryItem, Person, Priority, Task, TaskStatus,
    };
    use uuid::Uuid;

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("tandem-summary-{}", Uuid::new_v4()));
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
    async fn summary_rolls_up_each_corner() {
        let state = test_state().await;
        let now = Utc::now();

        state
            .db
            .insert_task(&Task {
                id: Uuid::new_v4(),
                title: "water plants".into(),
                description: None,
                assigned_to: Assignee::Both,
                created_by: Person::Lulu,
                status: TaskStatus::Pending,
                priority: Priority::Low,
                is_shared: true,
                due_date: None,
                created_at: now,
            })
            .unwrap();

        for (kind, amount) in [(GoalKind::Saving, 300.0), (GoalKind::Expense, 50.0)] {
            state
                .db
                .insert_finance(&FinanceItem {
                    id: Uuid::new_v4(),
                    title: "goal".into(),
                    target_amount: 1000.0,
                    current_amount: amount,
                    kind,
                    created_at: now,
                })
                .unwrap();
        }

        state
            .db
            .insert_itinerary(&ItineraryItem {
                id: Uuid::new_v4(),
                title: "weekend away".into(),
                date: (now + Duration::days(3)).date_naive(),
                time: None,
                location: None,
                notes: None,
                created_at: now,
            })
            .unwrap();

        let Json(summary) = get(State(state)).await.unwrap();
        assert_eq!(summary.pending_tasks, 1);
        assert_eq!(summary.total_saved, 300.0);
        assert_eq!(summary.next_event.unwrap().title, "weekend away");
        assert!(summary.pending_requests.is_empty());
        assert!(summary.moods.is_empty());
    }
}
