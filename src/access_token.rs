//! Note access-token protocol.
//!
//! Every browser gets an opaque bearer secret in the `NoteAccessToken`
//! cookie; owning a note means presenting the token it was created with.
//! Validity is structural (length and base64 shape), never a database
//! lookup. A malformed token is treated exactly like an absent one:
//! `GET /Note/GetOwned` reissues, mutation endpoints report a
//! success-shaped failure.

use actix_web::HttpRequest;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;

/// Cookie holding the per-browser bearer secret
pub const ACCESS_TOKEN_COOKIE: &str = "NoteAccessToken";

/// Raw token material: 32 random bytes
pub const TOKEN_BYTE_LEN: usize = 32;

/// 4 * ceiling(32 / 3) — the encoded length of a full token
pub const TOKEN_ENCODED_LEN: usize = 44;

/// Generate a fresh access token: 32 random bytes, standard base64.
pub fn generate() -> String {
    let mut bytes = [0u8; TOKEN_BYTE_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);

    STANDARD.encode(bytes)
}

/// Structural well-formedness check: encoded length within bounds,
/// valid base64, and no more than 32 decoded bytes.
pub fn is_well_formed(token: &str) -> bool {
    if token.len() > TOKEN_ENCODED_LEN {
        return false;
    }

    match STANDARD.decode(token) {
        Ok(bytes) => bytes.len() <= TOKEN_BYTE_LEN,
        Err(_) => false,
    }
}

/// Read the access token from the request cookie, if present and
/// well-formed. Malformed tokens come back as `None`.
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    req.cookie(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| is_well_formed(t))
}

/// Build the long-lived cookie carrying a freshly issued token.
/// Twenty years stands in for "never expires"; browsers cap it anyway.
pub fn build_cookie(token: String) -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::days(365 * 20))
        .finish()
}
