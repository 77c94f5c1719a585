use axum::{
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Extension, Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use super::state::AppState;
use super::views::{notice, render};
use crate::auth::{instructor_or_admin_middleware, AppError, OrRedirect, Rejection, Role, UserSession};
use crate::models::validation::{normalize_identifier, optional, required};
use crate::models::{AccountView, ClientSummary, NewClient};

#[derive(Debug, Default, Deserialize)]
pub struct ClientForm {
    pub name: Option<String>,
    pub goal: Option<String>,
    pub student: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub clients: Vec<ClientSummary>,
}

#[derive(Debug, Serialize)]
pub struct NewClientView {
    pub available_students: Vec<AccountView>,
}

/// Client roster management, instructors and above
pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/clients/new", get(new_client_form))
        .route("/clients", post(create_client))
        .route("/clients/:id/delete", post(delete_client))
        .route_layer(middleware::from_fn(instructor_or_admin_middleware))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
) -> impl IntoResponse {
    let clients = state.clients.list().await;
    let clients = clients.iter().map(ClientSummary::from).collect();

    render(jar, "dashboard", Some(user), Dashboard { clients })
}

/// Students not yet linked to any client
async fn new_client_form(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
) -> impl IntoResponse {
    let linked = state.clients.linked_students().await;
    let available_students = state
        .accounts
        .students()
        .await
        .iter()
        .filter(|account| !linked.contains(&account.identifier))
        .map(AccountView::from)
        .collect();

    render(jar, "client_form", Some(user), NewClientView { available_students })
}

#[tracing::instrument(skip(state, user, jar, form), fields(instructor = %user.identifier))]
async fn create_client(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
    Form(form): Form<ClientForm>,
) -> Result<(CookieJar, Redirect), Rejection> {
    let linked_student = match optional(form.student.as_deref()) {
        Some(raw) => {
            let identifier = normalize_identifier(&raw).or_redirect("/clients/new")?;
            match state.accounts.get(&identifier).await {
                Some(account) if account.role == Role::Student => Some(identifier),
                _ => {
                    return Err(AppError::validation(format!("'{}' is not a registered student", identifier))
                        .redirect_to("/clients/new"))
                }
            }
        }
        None => None,
    };

    let request = NewClient {
        name: required(form.name.as_deref(), "Name").or_redirect("/clients/new")?,
        goal: required(form.goal.as_deref(), "Goal").or_redirect("/clients/new")?,
        owner_instructor: Some(user.identifier.clone()),
        linked_student,
    };

    let client = state.clients.create(request).await.or_redirect("/clients/new")?;

    Ok(notice(
        jar,
        format!("Client {} registered", client.name),
        &format!("/clients/{}/workouts", client.id),
    ))
}

#[tracing::instrument(skip(state, jar))]
async fn delete_client(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<u64>,
) -> Result<(CookieJar, Redirect), Rejection> {
    let removed = state.clients.delete(id).await.or_redirect("/")?;

    Ok(notice(jar, format!("Client {} removed", removed.name), "/"))
}
