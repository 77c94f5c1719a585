use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Redirect},
    routing::get,
    Extension, Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use super::state::AppState;
use super::views::{notice, render};
use crate::auth::{instructor_or_admin_middleware, OrRedirect, Rejection, UserSession};
use crate::models::validation::{normalize_identifier, optional, required};
use crate::models::{AccountView, PaymentStatus, PaymentUpdate};

#[derive(Debug, Default, Deserialize)]
pub struct PaymentForm {
    pub identifier: Option<String>,
    pub status: Option<String>,
    pub payment_type: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentsView {
    pub students: Vec<AccountView>,
    pub statuses: [PaymentStatus; 2],
}

pub fn payment_routes() -> Router<AppState> {
    Router::new().route(
        "/payments",
        get(list_payments)
            .post(update_payment)
            .route_layer(middleware::from_fn(instructor_or_admin_middleware)),
    )
}

async fn list_payments(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
) -> impl IntoResponse {
    let students = state.accounts.students().await;
    let view = PaymentsView {
        students: students.iter().map(AccountView::from).collect(),
        statuses: [PaymentStatus::Pending, PaymentStatus::Paid],
    };

    render(jar, "payments", Some(user), view)
}

#[tracing::instrument(skip(state, user, jar, form), fields(caller = %user.identifier))]
async fn update_payment(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
    Form(form): Form<PaymentForm>,
) -> Result<(CookieJar, Redirect), Rejection> {
    let identifier = required(form.identifier.as_deref(), "Student").or_redirect("/payments")?;
    let identifier = normalize_identifier(&identifier).or_redirect("/payments")?;
    let status = required(form.status.as_deref(), "Status").or_redirect("/payments")?;

    let update = PaymentUpdate {
        status: PaymentStatus::from(status),
        payment_type: optional(form.payment_type.as_deref()),
        reason: optional(form.reason.as_deref()),
    };
    let account = state
        .accounts
        .set_payment_status(&identifier, update)
        .await
        .or_redirect("/payments")?;

    Ok(notice(
        jar,
        format!(
            "Payment status of {} set to {}",
            account.name, account.payment_status
        ),
        "/payments",
    ))
}
