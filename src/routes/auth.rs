use crate::{
    auth::{hash_password, verify_password, LoginInput, RegisterInput},
    error::AppError,
    models::UserSnapshot,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// Persists the account with a hashed credential and returns it. The
/// username is stored lowercased; registering a name already taken in any
/// casing surfaces the storage layer's duplicate-key envelope.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<RegisterInput>,
) -> Result<impl Responder, AppError> {
    let input = input.into_inner();
    if input.username.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    let password_hash = hash_password(&input.password)?;
    let user = state
        .users
        .create_user(&input.username, &password_hash)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "status": 201,
        "result": user
    })))
}

/// Login user
///
/// Checks the credentials and returns a fresh token alongside the user
/// snapshot it embeds. An unknown username is a 404; a wrong password a 403.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<impl Responder, AppError> {
    let input = input.into_inner();
    if input.username.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    let user = state
        .users
        .find_by_username(&input.username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if !verify_password(&input.password, &user.password_hash)? {
        return Err(AppError::Forbidden("Wrong password".into()));
    }

    let snapshot = UserSnapshot::from(&user);
    let token = state.tokens.issue(snapshot.clone())?;

    Ok(HttpResponse::Ok().json(json!({
        "status": 200,
        "authToken": format!("JWT {}", token),
        "result": snapshot
    })))
}
