//! Note endpoints and the cookie-based ownership checks.
//!
//! Reads are public. Mutations require the `NoteAccessToken` cookie and,
//! for update/delete, the presented token must equal the token stamped on
//! the note at creation. Ownership failures and the per-board cap are
//! HTTP 200 with `success: false` so the client branches on one field.

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;

use crate::AppState;
use crate::access_token;
use crate::models::note::{MAX_CAPTION_LEN, MAX_CONTENT_LEN, MAX_NOTES_PER_BOARD};
use crate::models::{ActionResponse, Board, NoteModel};

const NO_COOKIE_MESSAGE: &str =
    "The cookie for the access token is not set, do you have cookies disabled?";
const NO_ACCESS_MESSAGE: &str = "You do not have access to this note.";

#[derive(Debug, Deserialize)]
struct BoardQuery {
    #[serde(rename = "boardId")]
    board_id: String,
}

/// The `BoardId` header carried by note mutation requests
fn board_id_from_request(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("BoardId")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Look up a board, mapping absence to 404 and db failure to 500
fn find_board(data: &web::Data<AppState>, board_id: &str) -> Result<Board, HttpResponse> {
    match data.db.get_board(board_id) {
        Ok(Some(board)) => Ok(board),
        Ok(None) => Err(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Board not found"
        }))),
        Err(e) => {
            log::error!("Failed to get board: {}", e);
            Err(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            })))
        }
    }
}

/// One of caption/content may be blank, but not both; lengths are capped.
/// Limits are in characters, not bytes, so multibyte input is counted
/// the same way the client's maxLength attribute counts it.
fn validate_note_fields(caption: &str, content: &str) -> bool {
    if caption.is_empty() && content.is_empty() {
        return false;
    }

    caption.chars().count() <= MAX_CAPTION_LEN && content.chars().count() <= MAX_CONTENT_LEN
}

/// All notes on a board (token never leaves the server)
async fn get_all(data: web::Data<AppState>, query: web::Query<BoardQuery>) -> impl Responder {
    if let Err(resp) = find_board(&data, &query.board_id) {
        return resp;
    }

    match data.db.list_notes(&query.board_id) {
        Ok(notes) => {
            let models: Vec<NoteModel> = notes.iter().map(NoteModel::from).collect();
            HttpResponse::Ok().json(models)
        }
        Err(e) => {
            log::error!("Failed to list notes: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

/// Ids of the caller's notes on a board. First-time visitors (no cookie,
/// or a malformed one) get a fresh token set on the response and own
/// nothing yet.
async fn get_owned(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<BoardQuery>,
) -> impl Responder {
    if let Err(resp) = find_board(&data, &query.board_id) {
        return resp;
    }

    let token = match access_token::token_from_request(&req) {
        Some(t) => t,
        None => {
            let token = access_token::generate();
            return HttpResponse::Ok()
                .cookie(access_token::build_cookie(token))
                .json(Vec::<i64>::new());
        }
    };

    match data.db.list_owned_note_ids(&query.board_id, &token) {
        Ok(ids) => HttpResponse::Ok().json(ids),
        Err(e) => {
            log::error!("Failed to list owned notes: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

async fn create(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NoteModel>,
) -> impl Responder {
    let board_id = match board_id_from_request(&req) {
        Some(id) => id,
        None => return HttpResponse::BadRequest().finish(),
    };

    let caption = body.caption.trim();
    let content = body.content.trim();

    if !validate_note_fields(caption, content) {
        return HttpResponse::BadRequest().finish();
    }

    let board = match find_board(&data, &board_id) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match data.db.count_notes(&board.id) {
        Ok(count) if count >= MAX_NOTES_PER_BOARD => {
            return HttpResponse::Ok().json(ActionResponse::failure(format!(
                "This board has reached the maximum limit of {} notes.",
                MAX_NOTES_PER_BOARD
            )));
        }
        Ok(_) => {}
        Err(e) => {
            log::error!("Failed to count notes: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    }

    let token = match access_token::token_from_request(&req) {
        Some(t) => t,
        None => return HttpResponse::Ok().json(ActionResponse::failure(NO_COOKIE_MESSAGE)),
    };

    match data.db.create_note(&board.id, caption, content, &token) {
        Ok(note) => HttpResponse::Ok().json(ActionResponse::created(note.id)),
        Err(e) => {
            log::error!("Failed to create note: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

async fn update(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NoteModel>,
) -> impl Responder {
    let board_id = match board_id_from_request(&req) {
        Some(id) => id,
        None => return HttpResponse::BadRequest().finish(),
    };

    let caption = body.caption.trim();
    let content = body.content.trim();

    if !validate_note_fields(caption, content) {
        return HttpResponse::BadRequest().finish();
    }

    let board = match find_board(&data, &board_id) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let note = match data.db.get_note(&board.id, body.id) {
        Ok(Some(n)) => n,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Note not found"
            }));
        }
        Err(e) => {
            log::error!("Failed to get note: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    let token = match access_token::token_from_request(&req) {
        Some(t) => t,
        None => return HttpResponse::Ok().json(ActionResponse::failure(NO_COOKIE_MESSAGE)),
    };

    if token != note.access_token {
        return HttpResponse::Ok().json(ActionResponse::failure(NO_ACCESS_MESSAGE));
    }

    match data.db.update_note(note.id, caption, content) {
        Ok(_) => HttpResponse::Ok().json(ActionResponse::ok()),
        Err(e) => {
            log::error!("Failed to update note: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

async fn delete(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<i64>,
) -> impl Responder {
    let board_id = match board_id_from_request(&req) {
        Some(id) => id,
        None => return HttpResponse::BadRequest().finish(),
    };

    let board = match find_board(&data, &board_id) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let note = match data.db.get_note(&board.id, body.into_inner()) {
        Ok(Some(n)) => n,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Note not found"
            }));
        }
        Err(e) => {
            log::error!("Failed to get note: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    let token = match access_token::token_from_request(&req) {
        Some(t) => t,
        None => return HttpResponse::Ok().json(ActionResponse::failure(NO_COOKIE_MESSAGE)),
    };

    if token != note.access_token {
        return HttpResponse::Ok().json(ActionResponse::failure(NO_ACCESS_MESSAGE));
    }

    match data.db.delete_note(note.id) {
        Ok(_) => HttpResponse::Ok().json(ActionResponse::ok()),
        Err(e) => {
            log::error!("Failed to delete note: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/Note")
            .route("/GetAll", web::get().to(get_all))
            .route("/GetOwned", web::get().to(get_owned))
            .route("/Create", web::post().to(create))
            .route("/Update", web::post().to(update))
            .route("/Delete", web::post().to(delete)),
    );
}
