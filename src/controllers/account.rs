//! Account registration, login and logout.
//!
//! Passwords are hashed with argon2id; a successful register or login
//! creates an auth session row and sets the `BoardSession` cookie.

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;

use crate::AppState;
use crate::auth;

const MAX_USERNAME_LEN: usize = 256;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    username: String,
    password: String,
    password_confirmation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err("Username must be between 1 and 256 characters.");
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Username may only contain letters and digits.");
    }
    Ok(())
}

async fn register(
    data: web::Data<AppState>,
    body: web::Form<RegisterRequest>,
) -> impl Responder {
    if let Err(message) = validate_username(&body.username) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": message }));
    }

    if body.password.len() < MIN_PASSWORD_LEN {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Password must be at least 8 characters."
        }));
    }

    if let Some(confirmation) = &body.password_confirmation {
        if confirmation != &body.password {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "The password and confirmation do not match."
            }));
        }
    }

    match data.db.get_user_by_username(&body.username) {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "The username is already taken."
            }));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to check username: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    }

    let password_hash = match auth::hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => {
            log::error!("Failed to hash password: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    let user = match data.db.create_user(&body.username, &password_hash) {
        Ok(u) => u,
        Err(e) => {
            log::error!("Failed to create user: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // Registration signs the user in right away.
    match data.db.create_session(user.id) {
        Ok(session) => HttpResponse::Ok()
            .cookie(auth::build_session_cookie(session.token))
            .json(serde_json::json!({ "success": true })),
        Err(e) => {
            log::error!("Failed to create session: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

async fn login(data: web::Data<AppState>, body: web::Form<LoginRequest>) -> impl Responder {
    let user = match data.db.get_user_by_username(&body.username) {
        Ok(Some(u)) => Some(u),
        Ok(None) => None,
        Err(e) => {
            log::error!("Failed to look up user: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }));
        }
    };

    let user = match user {
        Some(u) if auth::verify_password(&body.password, &u.password_hash) => u,
        // Same response for unknown user and bad password.
        _ => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "The username or password is incorrect."
            }));
        }
    };

    match data.db.create_session(user.id) {
        Ok(session) => HttpResponse::Ok()
            .cookie(auth::build_session_cookie(session.token))
            .json(serde_json::json!({ "success": true })),
        Err(e) => {
            log::error!("Failed to create session: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

async fn logout(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Some(cookie) = req.cookie(auth::SESSION_COOKIE) {
        if let Err(e) = data.db.delete_session(cookie.value()) {
            log::error!("Failed to delete session: {}", e);
        }
    }

    HttpResponse::Ok()
        .cookie(auth::clear_session_cookie())
        .json(serde_json::json!({ "success": true }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/Account")
            .route("/Register", web::post().to(register))
            .route("/Login", web::post().to(login))
            .route("/Logout", web::post().to(logout)),
    );
}
