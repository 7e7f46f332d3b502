//! Board endpoints: the public board view, authenticated creation and
//! the owner's board list.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Deserialize;

use crate::AppState;
use crate::auth;
use crate::models::BoardModel;
use crate::models::board::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};

#[derive(Debug, Deserialize)]
struct CreateBoardRequest {
    title: String,
    #[serde(default)]
    description: String,
}

/// Public board view: anyone with the id may look.
/// Registered as the catch-all `GET /{boardId}` route.
async fn view(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let board_id = path.into_inner();

    match data.db.get_board(&board_id) {
        Ok(Some(board)) => HttpResponse::Ok().json(BoardModel::from(board)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Board not found"
        })),
        Err(e) => {
            log::error!("Failed to get board: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

/// Create a board and redirect to its view
async fn create(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Form<CreateBoardRequest>,
) -> impl Responder {
    let user = match auth::authenticate(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    let title = body.title.trim();
    let description = body.description.trim();

    // Limits are in characters, not bytes.
    if title.is_empty()
        || title.chars().count() > MAX_TITLE_LEN
        || description.chars().count() > MAX_DESCRIPTION_LEN
    {
        return HttpResponse::BadRequest().finish();
    }

    match data.db.create_board(title, description, user.id) {
        Ok(board) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, format!("/{}", board.id)))
            .finish(),
        Err(e) => {
            // Covers the (never-expected) board id collision as well.
            log::error!("Failed to create board: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

/// Boards owned by the signed-in user
async fn list(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = match auth::authenticate(&data, &req) {
        Ok(u) => u,
        Err(resp) => return resp,
    };

    match data.db.list_boards_for_user(user.id) {
        Ok(boards) => {
            let models: Vec<BoardModel> = boards.into_iter().map(BoardModel::from).collect();
            HttpResponse::Ok().json(models)
        }
        Err(e) => {
            log::error!("Failed to list boards: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/Board")
            .route("/Create", web::post().to(create))
            .route("/List", web::get().to(list)),
    );
    // Single-segment catch-all; every other route has more segments.
    cfg.service(web::resource("/{board_id}").route(web::get().to(view)));
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};
    use tempfile::tempdir;

    use crate::controllers::test_helpers::test_state;

    #[actix_web::test]
    async fn test_create_requires_authentication() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(super::config)).await;

        let req = test::TestRequest::post()
            .uri("/Board/Create")
            .set_form([("title", "My board")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_create_redirects_to_board_view() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let user = state.db.create_user("alice", "hash").unwrap();
        let session = state.db.create_session(user.id).unwrap();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(super::config)).await;

        let req = test::TestRequest::post()
            .uri("/Board/Create")
            .cookie(crate::auth::build_session_cookie(session.token.clone()))
            .set_form([("title", "  My board  "), ("description", "notes here")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 303);

        let location = resp
            .headers()
            .get(actix_web::http::header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let board_id = location.trim_start_matches('/').to_string();
        assert_eq!(board_id.len(), 16);

        // Title was trimmed before persisting.
        let board = state.db.get_board(&board_id).unwrap().unwrap();
        assert_eq!(board.title, "My board");

        // The public view works without any session.
        let req = test::TestRequest::get().uri(&location).to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], board_id.as_str());
        assert_eq!(body["title"], "My board");
        assert_eq!(body["description"], "notes here");
        assert!(body.get("lastEditDate").is_some());
    }

    #[actix_web::test]
    async fn test_create_validates_fields() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let user = state.db.create_user("alice", "hash").unwrap();
        let session = state.db.create_session(user.id).unwrap();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(super::config)).await;

        // Blank title
        let req = test::TestRequest::post()
            .uri("/Board/Create")
            .cookie(crate::auth::build_session_cookie(session.token.clone()))
            .set_form([("title", "   ")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        // Title over 100 chars
        let long_title = "x".repeat(101);
        let req = test::TestRequest::post()
            .uri("/Board/Create")
            .cookie(crate::auth::build_session_cookie(session.token.clone()))
            .set_form([("title", long_title.as_str())])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        // Description over 500 chars
        let long_desc = "x".repeat(501);
        let req = test::TestRequest::post()
            .uri("/Board/Create")
            .cookie(crate::auth::build_session_cookie(session.token.clone()))
            .set_form([("title", "ok"), ("description", long_desc.as_str())])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_create_limits_count_characters_not_bytes() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let user = state.db.create_user("alice", "hash").unwrap();
        let session = state.db.create_session(user.id).unwrap();
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(super::config)).await;

        // 100 Cyrillic characters are 200 bytes of UTF-8, still within the cap.
        let title = "ж".repeat(100);
        let description = "я".repeat(500);
        let req = test::TestRequest::post()
            .uri("/Board/Create")
            .cookie(crate::auth::build_session_cookie(session.token.clone()))
            .set_form([("title", title.as_str()), ("description", description.as_str())])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 303);

        // One character over the cap is still rejected.
        let title = "ж".repeat(101);
        let req = test::TestRequest::post()
            .uri("/Board/Create")
            .cookie(crate::auth::build_session_cookie(session.token))
            .set_form([("title", title.as_str())])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_list_requires_authentication() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(super::config)).await;

        let req = test::TestRequest::get().uri("/Board/List").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_register_login_list_round_trip() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(crate::controllers::account::config)
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/Account/Register")
            .set_form([("username", "alice"), ("password", "hunter2hunter2")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::post()
            .uri("/Account/Login")
            .set_form([("username", "alice"), ("password", "hunter2hunter2")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let session = resp
            .response()
            .cookies()
            .find(|c| c.name() == crate::auth::SESSION_COOKIE)
            .expect("login must set the session cookie")
            .into_owned();

        let req = test::TestRequest::post()
            .uri("/Board/Create")
            .cookie(session.clone())
            .set_form([("title", "My board")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 303);

        let req = test::TestRequest::get()
            .uri("/Board/List")
            .cookie(session)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        let boards = body.as_array().unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0]["title"], "My board");
    }

    #[actix_web::test]
    async fn test_list_returns_own_boards_only() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let alice = state.db.create_user("alice", "hash").unwrap();
        let bob = state.db.create_user("bob", "hash").unwrap();
        state.db.create_board("Mine", "", alice.id).unwrap();
        state.db.create_board("Theirs", "", bob.id).unwrap();
        let session = state.db.create_session(alice.id).unwrap();

        let app =
            test::init_service(App::new().app_data(state.clone()).configure(super::config)).await;

        let req = test::TestRequest::get()
            .uri("/Board/List")
            .cookie(crate::auth::build_session_cookie(session.token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        let boards = body.as_array().unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(boards[0]["title"], "Mine");
    }

    #[actix_web::test]
    async fn test_view_missing_board_is_404() {
        let dir = tempdir().unwrap();
        let state = test_state(&dir);
        let app =
            test::init_service(App::new().app_data(state.clone()).configure(super::config)).await;

        let req = test::TestRequest::get().uri("/AAAAAAAAAAAAAAAA").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
