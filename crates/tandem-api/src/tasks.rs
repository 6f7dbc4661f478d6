use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use uuid::Uuid;

use tandem_types::api::{CreateCommentRequest, CreateTaskRequest, SetTaskStatusRequest};
use tandem_types::events::{Change, FeedEvent};
use tandem_types::models::{Assignee, Priority, Task, TaskComment, TaskStatus};

use crate::error::{ApiError, ApiResult};
use crate::{AppState, blocking};

/// GET /tasks
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    let tasks = blocking(move || state.db.list_tasks()).await?;
    Ok(Json(tasks))
}

/// POST /tasks
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Invalid("task title is empty".into()));
    }

    let task = Task {
        id: Uuid::new_v4(),
        title: req.title,
        description: req.description,
        assigned_to: req.assigned_to,
        created_by: req.created_by,
        status: TaskStatus::Pending,
        priority: req.priority.unwrap_or(Priority::Medium),
        is_shared: req.assigned_to == Assignee::Both,
        due_date: req.due_date,
        created_at: Utc::now(),
    };

    let stored = task.clone();
    let db_state = state.clone();
    blocking(move || db_state.db.insert_task(&stored)).await?;

    state
        .dispatcher
        .broadcast(FeedEvent::Task(Change::Inserted(task.clone())));
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /tasks/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetTaskStatusRequest>,
) -> ApiResult<Json<Task>> {
    let db_state = state.clone();
    let updated = blocking(move || db_state.db.set_task_status(id, req.status))
        .await?
        .ok_or(ApiError::NotFound("task"))?;

    state
        .dispatcher
        .broadcast(FeedEvent::Task(Change::Updated(updated.clone())));
    Ok(Json(updated))
}

/// DELETE /tasks/{id}
///
/// Comments go with the task via the FK cascade; clients watching the
/// detail view drop them when the Task Deleted event lands.
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let db_state = state.clone();
    let removed = blocking(move || db_state.db.delete_task(id)).await?;
    if !removed {
        return Err(ApiError::NotFound("task"));
    }

    state
        .dispatcher
        .broadcast(FeedEvent::Task(Change::Deleted { id }));
    Ok(StatusCode::NO_CONTENT)
}

/// GET /tasks/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskComment>>> {
    let comments = blocking(move || state.db.list_comments(id)).await?;
    Ok(Json(comments))
}

/// POST /tasks/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<TaskComment>)> {
    if req.content.trim().is_empty() {
        return Err(ApiError::Invalid("comment content is empty".into()));
    }

    let comment = TaskComment {
        id: Uuid::new_v4(),
        task_id: id,
        author: req.author,
        content: req.content,
        created_at: Utc::now(),
    };

    let stored = comment.clone();
    let db_state = state.clone();
    let result = blocking(move || db_state.db.insert_comment(&stored)).await;
    match result {
        Ok(()) => {}
        // The FK fails when the task is gone; report that, not a 500.
        Err(ApiError::Internal(e)) if tandem_db::is_fk_violation(&e) => {
            return Err(ApiError::NotFound("task"));
        }
        Err(e) => return Err(e),
    }

    state
        .dispatcher
        .broadcast(FeedEvent::TaskComment(Change::Inserted(comment.clone())));
    Ok((StatusCode::CREATED, Json(comment)))
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
    use tandem_types::models::Person;

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("tandem-tasks-{}", Uuid::new_v4()));
        Arc::new(AppStateInner {
            db: Arc::new(Database::open_in_memory().unwrap()),
            dispatcher: Dispatcher::default(),
            storage: Storage::new(dir, "http://localhost:4000".into())
                .await
                .unwrap(),
            harmony: Harmony::disabled(),
        })
    }

    fn task_req(title: &str, assignee: Assignee) -> CreateTaskRequest {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "description": null,
            "assigned_to": assignee.as_str(),
            "created_by": "Lulu",
            "priority": null,
            "due_date": null,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn new_tasks_default_to_pending_medium() {
        let state = test_state().await;
        let (_, Json(task)) = create(State(state), Json(task_req("dishes", Assignee::Lala)))
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.is_shared);
    }

    #[tokio::test]
    async fn both_assignee_marks_shared() {
        let state = test_state().await;
        let (_, Json(task)) = create(State(state), Json(task_req("plan trip", Assignee::Both)))
            .await
            .unwrap();
        assert!(task.is_shared);
    }

    #[tokio::test]
    async fn status_toggle_round_trips() {
        let state = test_state().await;
        let (_, Json(task)) = create(
            State(state.clone()),
            Json(task_req("laundry", Assignee::Lulu)),
        )
        .await
        .unwrap();

        let Json(updated) = set_status(
            State(state),
            Path(task.id),
            Json(SetTaskStatusRequest {
                status: task.status.toggled(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn delete_broadcasts_so_open_views_can_dismiss() {
        let state = test_state().await;
        let (_, Json(task)) = create(
            State(state.clone()),
            Json(task_req("short lived", Assignee::Lulu)),
        )
        .await
        .unwrap();

        let mut rx = state.dispatcher.subscribe();
        delete(State(state), Path(task.id)).await.unwrap();

        match rx.recv().await.unwrap() {
            FeedEvent::Task(Change::Deleted { id }) => assert_eq!(id, task.id),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn comment_on_missing_task_is_not_found() {
        let state = test_state().await;
        let err = create_comment(
            State(state),
            Path(Uuid::new_v4()),
            Json(CreateCommentRequest {
                author: Person::Lulu,
                content: "hello?".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("task")));
    }

    #[tokio::test]
    async fn comments_list_in_creation_order() {
        let state = test_state().await;
        let (_, Json(task)) = create(
            State(state.clone()),
            Json(task_req("groceries", Assignee::Both)),
        )
        .await
        .unwrap();

        for text in ["first", "second"] {
            create_comment(
                State(state.clone()),
                Path(task.id),
                Json(CreateCommentRequest {
                    author: Person::Lala,
                    content: text.into(),
                }),
            )
            .await
            .unwrap();
        }

        let Json(comments) = list_comments(State(state), Path(task.id)).await.unwrap();
        let texts: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, ["first", "second"]);
    }
}
