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
use crate::auth::{
    ensure_can_view_client, instructor_or_admin_middleware, AppError, OrRedirect, Rejection,
    UserSession,
};
use crate::models::validation::{parse_count, parse_optional_measurement, required};
use crate::models::{
    normalize_plan_name, CatalogExercise, ClientSummary, ExerciseEntry, EXERCISE_CATALOG,
};

#[derive(Debug, Default, Deserialize)]
pub struct ExerciseForm {
    pub plan: Option<String>,
    pub exercise: Option<String>,
    pub sets: Option<String>,
    pub reps: Option<String>,
    pub load: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveExerciseForm {
    pub plan: Option<String>,
    pub index: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutView {
    pub client: ClientSummary,
    pub plans: Vec<String>,
    pub selected_plan: Option<String>,
    pub exercises: Vec<ExerciseEntry>,
    pub catalog: &'static [CatalogExercise],
}

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/clients/:id/workouts", get(show_workouts))
        .route("/clients/:id/workouts/:plan", get(show_plan))
        .route(
            "/clients/:id/workouts/exercises",
            post(add_exercise).route_layer(middleware::from_fn(instructor_or_admin_middleware)),
        )
        .route(
            "/clients/:id/workouts/exercises/remove",
            post(remove_exercise).route_layer(middleware::from_fn(instructor_or_admin_middleware)),
        )
}

fn workouts_path(client_id: u64, plan: Option<&str>) -> String {
    match plan {
        Some(plan) => format!(
            "/clients/{}/workouts/{}",
            client_id,
            urlencoding::encode(plan)
        ),
        None => format!("/clients/{}/workouts", client_id),
    }
}

async fn show_workouts(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, Rejection> {
    workout_view(state, user, jar, id, None).await
}

async fn show_plan(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
    Path((id, plan)): Path<(u64, String)>,
) -> Result<impl IntoResponse, Rejection> {
    workout_view(state, user, jar, id, Some(plan)).await
}

/// Plan view; an unknown or missing plan name falls back to the first plan
async fn workout_view(
    state: AppState,
    user: UserSession,
    jar: CookieJar,
    id: u64,
    plan: Option<String>,
) -> Result<impl IntoResponse, Rejection> {
    let landing = user.role.landing_path();
    let client = state
        .clients
        .get(id)
        .await
        .ok_or_else(|| AppError::not_found(format!("Client {} not found", id)))
        .or_redirect(landing)?;
    ensure_can_view_client(&user, &client).or_redirect(landing)?;

    let selected_plan = client.selected_plan(plan.as_deref()).map(str::to_string);
    let exercises = selected_plan
        .as_deref()
        .and_then(|name| client.plan(name))
        .map(<[ExerciseEntry]>::to_vec)
        .unwrap_or_default();

    let view = WorkoutView {
        client: ClientSummary::from(&client),
        plans: client.plan_names(),
        selected_plan,
        exercises,
        catalog: EXERCISE_CATALOG,
    };

    Ok(render(jar, "workouts", Some(user), view))
}

#[tracing::instrument(skip(state, jar, form))]
async fn add_exercise(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<u64>,
    Form(form): Form<ExerciseForm>,
) -> Result<(CookieJar, Redirect), Rejection> {
    let back = workouts_path(id, None);

    let plan = required(form.plan.as_deref(), "Plan").or_redirect(&back)?;
    let entry = ExerciseEntry {
        name: required(form.exercise.as_deref(), "Exercise").or_redirect(&back)?,
        sets: parse_count(form.sets.as_deref(), "Sets").or_redirect(&back)?,
        reps: parse_count(form.reps.as_deref(), "Reps").or_redirect(&back)?,
        load: parse_optional_measurement(form.load.as_deref(), "Load").or_redirect(&back)?,
    };

    let added = state
        .clients
        .add_exercise(id, &plan, entry)
        .await
        .or_redirect(&back)?;

    let plan = normalize_plan_name(&plan);
    Ok(notice(
        jar,
        format!("{} added to plan {}", added.name, plan),
        &workouts_path(id, Some(&plan)),
    ))
}

#[tracing::instrument(skip(state, jar, form))]
async fn remove_exercise(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<u64>,
    Form(form): Form<RemoveExerciseForm>,
) -> Result<(CookieJar, Redirect), Rejection> {
    let back = workouts_path(id, None);

    let plan = required(form.plan.as_deref(), "Plan").or_redirect(&back)?;
    let index = required(form.index.as_deref(), "Position")
        .and_then(|raw| {
            raw.parse::<usize>()
                .map_err(|_| AppError::validation("Position must be a whole number"))
        })
        .or_redirect(&back)?;

    let removed = state
        .clients
        .remove_exercise(id, &plan, index)
        .await
        .or_redirect(&back)?;

    // The plan is gone once its last exercise is removed
    let plan = normalize_plan_name(&plan);
    let still_there = state
        .clients
        .get(id)
        .await
        .is_some_and(|client| client.plan(&plan).is_some());
    let to = if still_there {
        workouts_path(id, Some(&plan))
    } else {
        back
    };

    Ok(notice(jar, format!("{} removed from plan {}", removed.name, plan), &to))
}
