use crate::{
    auth::{can_act_on_task, AuthenticatedUser},
    error::AppError,
    models::{NewTask, StatusUpdateRequest, TaskInput, TaskStatus, TaskView},
    security::sanitize_text,
    store::Store,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Path identifiers arrive as raw strings so a malformed id maps to the
/// contractual 400 body instead of the framework's default path-extraction
/// error.
fn parse_task_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid task ID format".into()))
}

/// Create a task owned by the caller.
///
/// Title and description are validated against their ceilings, then
/// sanitized (angle brackets stripped, 500-char storage cap) before they
/// reach the gateway. Status always starts as `pending`.
#[post("")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = store
        .insert_task(NewTask {
            user_id: user.id,
            title: sanitize_text(&task_data.title),
            description: sanitize_text(&task_data.description),
        })
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Task created successfully",
        "task": TaskView::from(&task)
    })))
}

/// List the caller's tasks, newest first. An empty list is a normal 200.
#[get("")]
pub async fn list_tasks(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = store.tasks_for_user(user.id).await?;
    let views: Vec<TaskView> = tasks.iter().map(TaskView::from).collect();

    Ok(HttpResponse::Ok().json(json!({
        "message": "Tasks retrieved successfully",
        "count": views.len(),
        "tasks": views
    })))
}

/// Fetch a single task by id.
///
/// Reads are not ownership-filtered: any authenticated caller may fetch any
/// task by id. Listing is already scoped to the owner; this endpoint keeps
/// the observed contract, which has no permission failure for reads.
#[get("/{id}")]
pub async fn get_task(
    store: web::Data<dyn Store>,
    _user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_task_id(&task_id)?;

    let task = store
        .find_task_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "task": TaskView::from(&task)
    })))
}

/// Update a task's status.
///
/// Existence is checked before permission, so a missing task is a 404 even
/// for callers who would not have been allowed to touch it. An absent
/// status is a valid no-op update; the record's `updatedAt` refreshes
/// either way.
#[patch("/{id}")]
pub async fn update_task_status(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
    update_data: web::Json<StatusUpdateRequest>,
) -> Result<impl Responder, AppError> {
    let id = parse_task_id(&task_id)?;

    update_data.validate()?;
    let status = match update_data.status.as_deref() {
        Some(raw) => Some(
            raw.parse::<TaskStatus>()
                .map_err(|_| AppError::BadRequest("Invalid status value".into()))?,
        ),
        None => None,
    };

    let task = store
        .find_task_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if !can_act_on_task(&task, &user) {
        return Err(AppError::Forbidden(
            "You do not have permission to update this task".into(),
        ));
    }

    // The task can vanish between fetch and update; that race reports as a
    // plain 404. Concurrent status writes are last-writer-wins.
    let updated = store
        .update_task_status(id, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task updated successfully",
        "task": TaskView::from(&updated)
    })))
}

/// Delete a task. Owner or admin only; deleting an already-deleted id is a
/// clean 404.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = parse_task_id(&task_id)?;

    let task = store
        .find_task_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if !can_act_on_task(&task, &user) {
        return Err(AppError::Forbidden(
            "You do not have permission to delete this task".into(),
        ));
    }

    if !store.delete_task(id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully"
    })))
}
