use axum::{
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use super::state::AppState;
use super::views::{notice, render};
use crate::auth::{admin_only_middleware, OrRedirect, Rejection, UserSession};
use crate::models::validation::normalize_identifier;
use crate::models::AccountView;

#[derive(Debug, Serialize)]
pub struct AccountsView {
    pub accounts: Vec<AccountView>,
}

/// Admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/accounts", get(list_accounts))
        .route("/admin/accounts/:identifier/delete", post(delete_account))
        .route_layer(middleware::from_fn(admin_only_middleware))
}

async fn list_accounts(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
) -> impl IntoResponse {
    let accounts = state.accounts.list().await;
    let accounts = accounts.iter().map(AccountView::from).collect();

    render(jar, "accounts", Some(user), AccountsView { accounts })
}

/// Remove an account and drop every client link pointing at it
#[tracing::instrument(skip(state, user, jar), fields(admin = %user.identifier))]
async fn delete_account(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
    Path(identifier): Path<String>,
) -> Result<(CookieJar, Redirect), Rejection> {
    let identifier = normalize_identifier(&identifier).or_redirect("/admin/accounts")?;
    let removed = state
        .accounts
        .remove(&identifier)
        .await
        .or_redirect("/admin/accounts")?;
    let unlinked = state
        .clients
        .unlink_account(&removed.identifier)
        .await
        .or_redirect("/admin/accounts")?;

    tracing::info!(
        "Account {} removed, {} client links cleared",
        removed.identifier,
        unlinked
    );
    Ok(notice(
        jar,
        format!("Account {} removed", removed.identifier),
        "/admin/accounts",
    ))
}
