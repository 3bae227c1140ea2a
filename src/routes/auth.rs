use crate::{
    auth::{
        hash_password, issue_token, verify_password, AuthResponse, AuthenticatedUser,
        LoginRequest, RegisterRequest, TokenKeys,
    },
    config::Config,
    error::AppError,
    models::{NewUser, Role, UserView},
    security::sanitize_email,
    store::Store,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates an account with the default `user` role and returns a session
/// token. The email is normalized before the conflict check so the same
/// address cannot register twice under different casing.
#[post("/register")]
pub async fn register(
    store: web::Data<dyn Store>,
    keys: web::Data<TokenKeys>,
    config: web::Data<Config>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let email = sanitize_email(&register_data.email);

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&register_data.password, config.bcrypt_cost)?;

    // The unique index still backstops the pre-check: a concurrent insert
    // of the same email surfaces as DuplicateEmail and maps to 409.
    let user = store
        .insert_user(NewUser {
            email,
            name: register_data.name.trim().to_string(),
            password_hash,
            role: Role::User,
        })
        .await?;

    let token = issue_token(&keys, user.id, user.role)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".to_string(),
        token,
        user: UserView::brief(&user),
    }))
}

/// Login user
///
/// An unknown email and a wrong password produce the same response, so the
/// endpoint cannot be used to enumerate registered addresses.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    keys: web::Data<TokenKeys>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = store
        .find_user_by_email(&sanitize_email(&login_data.email))
        .await?;

    match user {
        Some(user) if verify_password(&login_data.password, &user.password_hash) => {
            let token = issue_token(&keys, user.id, user.role)?;
            Ok(HttpResponse::Ok().json(AuthResponse {
                message: "Login successful".to_string(),
                token,
                user: UserView::brief(&user),
            }))
        }
        _ => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}

/// Logout
///
/// Tokens are stateless, so there is nothing to revoke server-side; the
/// client discards its token. This endpoint only acknowledges the request,
/// and only to an authenticated caller.
pub async fn logout(_user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Logout successful"
    }))
}

/// Current user
///
/// Resolves the identity embedded in the verified token. A 404 here means
/// the account vanished after the token was issued; tokens are not revoked
/// on deletion, so this staleness window is bounded by the token expiry.
#[get("")]
pub async fn current_user(
    store: web::Data<dyn Store>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = store
        .find_user_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "user": UserView::profile(&user)
    })))
}
