use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{TaskInput, TaskPatch},
    state::AppState,
    store::RepoError,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

/// Update payload; the patch rides under a `task` key.
#[derive(Debug, Deserialize)]
pub struct TaskUpdateBody {
    pub task: TaskPatch,
}

/// Retrieves the authenticated user's tasks, oldest first.
#[get("/my-tasks")]
pub async fn my_tasks(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.find_by_owner(user.0.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 200,
        "result": tasks
    })))
}

/// Creates a task owned by the authenticated user.
///
/// The owner is re-resolved from storage rather than trusted from the token
/// snapshot, so a deleted account cannot keep creating tasks on a
/// still-valid token.
#[post("/create")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: CurrentUser,
    input: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let input = input.into_inner();
    input.validate()?;

    let task = state
        .coordinator
        .create_owned(input, user.0.id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::Forbidden("Not authorized".into()),
            other => other.into(),
        })?;

    Ok(HttpResponse::Created().json(json!({
        "status": 201,
        "result": task
    })))
}

/// Retrieves a single task by its slug.
#[get("/task/{slug}")]
pub async fn get_task(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 200,
        "result": task
    })))
}

/// Updates a task's mutable fields (title, content, completion flag).
#[put("/task/{slug}")]
pub async fn update_task(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    body: web::Json<TaskUpdateBody>,
) -> Result<impl Responder, AppError> {
    let patch = body.into_inner().task;
    patch.validate()?;

    let task = state.tasks.update_task(&slug, patch).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 200,
        "result": task
    })))
}

/// Deletes a task and detaches it from its owner's reference list.
#[delete("/task/{slug}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = state.coordinator.delete_owned(&slug).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 200,
        "result": task
    })))
}
