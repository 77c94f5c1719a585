use axum::response::{Json, Redirect};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::auth::UserSession;

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot notice carried to the next rendered view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// What a view endpoint hands to the renderer
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub view: &'static str,
    pub user: Option<UserSession>,
    pub flash: Option<Flash>,
    pub data: T,
}

pub fn push_flash(jar: CookieJar, kind: FlashKind, message: impl Into<String>) -> CookieJar {
    let flash = Flash {
        kind,
        message: message.into(),
    };

    match serde_json::to_string(&flash) {
        Ok(value) => jar.add(
            Cookie::build((FLASH_COOKIE, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        ),
        Err(e) => {
            tracing::warn!("Dropping flash notice: {}", e);
            jar
        }
    }
}

/// Read and clear the pending notice
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let flash = serde_json::from_str(cookie.value()).ok();
    (jar.add(removal_cookie(FLASH_COOKIE)), flash)
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.add(removal_cookie(SESSION_COOKIE))
}

// Added explicitly: the jar only emits removals for cookies the request carried
fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, "")).path("/").http_only(true).build();
    cookie.make_removal();
    cookie
}

/// Serve a view, consuming any pending flash notice
pub fn render<T: Serialize>(
    jar: CookieJar,
    view: &'static str,
    user: Option<UserSession>,
    data: T,
) -> (CookieJar, Json<Page<T>>) {
    let (jar, flash) = take_flash(jar);
    (
        jar,
        Json(Page {
            view,
            user,
            flash,
            data,
        }),
    )
}

/// Redirect after a successful mutation
pub fn notice(jar: CookieJar, message: impl Into<String>, to: &str) -> (CookieJar, Redirect) {
    (push_flash(jar, FlashKind::Success, message), Redirect::to(to))
}
