use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use fitcoach_core::account::{self, AccountError, CoachSignup, UserSignup};
use fitcoach_core::plan::{self, GeneratorOptions, PlanServiceError};
use fitcoach_db::models::{BodyRegion, FitnessLevel};
use fitcoach_db::queries::exercises::{self as exercise_db, NewExercise};
use fitcoach_db::queries::fitness_entries::{self as entry_db, NewFitnessEntry};
use fitcoach_db::queries::{coaches as coach_db, is_unique_violation, users as user_db};

use crate::resolve::{check_days, rng_for};

/// MIME type of an xlsx workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

type HandlerResult = Result<axum::response::Response, AppError>;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.into(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!("request failed: {err:#}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::UserNotFound(_) | AccountError::CoachNotFound(_) => {
                Self::not_found(err.to_string())
            }
            AccountError::MissingField(_) | AccountError::InvalidProfile(_) => {
                Self::bad_request(err.to_string())
            }
            AccountError::NameTaken(_) => Self::conflict(err.to_string()),
            AccountError::Database(e) => Self::internal(e),
        }
    }
}

impl From<PlanServiceError> for AppError {
    fn from(err: PlanServiceError) -> Self {
        match err {
            PlanServiceError::UserNotFound(_) => Self::not_found(err.to_string()),
            PlanServiceError::InvalidProfile(_) | PlanServiceError::Generate(_) => {
                Self::bad_request(err.to_string())
            }
            PlanServiceError::Export(e) => Self::internal(e.into()),
            PlanServiceError::Database(e) => Self::internal(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

fn day_count(days: u32) -> Result<u32, AppError> {
    check_days(days).map_err(|e| AppError::bad_request(e.to_string()))
}

/// JSON body extractor whose rejections render as [`AppError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
struct ApiJson<T>(T);

/// Query-string extractor whose rejections render as [`AppError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
struct ApiQuery<T>(T);

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub fitness_level: Option<FitnessLevel>,
}

#[derive(Debug, Deserialize)]
pub struct AssignCoachRequest {
    pub coach_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseRequest {
    pub name: String,
    pub region: BodyRegion,
    pub sets: i32,
    pub reps: i32,
    pub equipment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WorkoutPlanRequest {
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub days: u32,
    pub fitness_level: Option<FitnessLevel>,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub days: u32,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct FitnessEntryRequest {
    pub exercise_name: String,
    #[serde(default)]
    pub weight: f64,
    pub sets: i32,
    pub reps: i32,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Shared handler state: the pool plus generator options from config.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub generator: GeneratorOptions,
}

pub fn build_router(pool: PgPool, generator: GeneratorOptions) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/login", post(login))
        .route("/api/users", post(create_user))
        .route("/api/users/{id}", get(get_user).put(update_user))
        .route("/api/users/{id}/coach", post(assign_coach))
        .route("/api/users/{id}/workout-plan", post(generate_plan))
        .route("/api/users/{id}/workout-plan/export", post(export_plan))
        .route("/api/users/{id}/workout-plans", get(list_plans))
        .route("/api/users/{id}/fitness-data", post(record_fitness_data))
        .route(
            "/api/users/{id}/fitness-data/{exercise}",
            get(get_fitness_data),
        )
        .route("/api/coaches", get(list_coaches).post(create_coach))
        .route("/api/coaches/{id}/students", get(list_students))
        .route("/api/exercises", get(list_exercises).post(add_exercise))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { pool, generator })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(
    pool: PgPool,
    generator: GeneratorOptions,
    bind: &str,
    port: u16,
) -> Result<()> {
    let app = build_router(pool, generator);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("fitcoach serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("fitcoach serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> HandlerResult {
    match account::login(&state.pool, &req.name, &req.password).await? {
        Some(outcome) => Ok(Json(outcome).into_response()),
        None => Err(AppError::unauthorized("invalid name or password")),
    }
}

async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UserSignup>,
) -> HandlerResult {
    let user = account::create_user(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

async fn get_user(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let user = user_db::get_user(&state.pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("user {id} not found")))?;
    Ok(Json(user).into_response())
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<ProfileUpdateRequest>,
) -> HandlerResult {
    plan::update_profile(
        &state.pool,
        id,
        req.age,
        req.weight,
        req.height,
        req.fitness_level,
    )
    .await?;
    Ok(Json(serde_json::json!({ "message": "User data updated successfully" })).into_response())
}

async fn assign_coach(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<AssignCoachRequest>,
) -> HandlerResult {
    let user = account::assign_coach(&state.pool, id, req.coach_id).await?;
    Ok(Json(user).into_response())
}

async fn create_coach(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CoachSignup>,
) -> HandlerResult {
    let coach = account::create_coach(&state.pool, &req).await?;
    Ok((StatusCode::CREATED, Json(coach)).into_response())
}

async fn list_coaches(State(state): State<AppState>) -> HandlerResult {
    let coaches = coach_db::list_coaches(&state.pool)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(coaches).into_response())
}

async fn list_students(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let students = account::students_of(&state.pool, id).await?;
    Ok(Json(students).into_response())
}

async fn list_exercises(State(state): State<AppState>) -> HandlerResult {
    let exercises = exercise_db::list_exercises(&state.pool)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(exercises).into_response())
}

async fn add_exercise(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ExerciseRequest>,
) -> HandlerResult {
    let name = req.name.trim().to_owned();
    if name.is_empty() {
        return Err(AppError::bad_request("name must not be empty"));
    }
    if req.sets <= 0 || req.reps <= 0 {
        return Err(AppError::bad_request(format!(
            "sets and reps must be positive (got {}x{})",
            req.sets, req.reps
        )));
    }

    let existing = exercise_db::list_exercises_for_region(&state.pool, req.region)
        .await
        .map_err(AppError::internal)?;
    if existing.iter().any(|e| e.name == name) {
        return Err(AppError::conflict(format!(
            "exercise {name:?} already exists for {}",
            req.region
        )));
    }

    let exercise = exercise_db::insert_exercise(
        &state.pool,
        &NewExercise {
            name: name.clone(),
            region: req.region,
            sets: req.sets,
            reps: req.reps,
            equipment: req.equipment,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::conflict(format!(
                "exercise {name:?} already exists for {}",
                req.region
            ))
        } else {
            AppError::internal(e)
        }
    })?;
    Ok((StatusCode::CREATED, Json(exercise)).into_response())
}

async fn generate_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<WorkoutPlanRequest>,
) -> HandlerResult {
    let days = day_count(req.days)?;
    plan::update_profile(
        &state.pool,
        id,
        req.age,
        req.weight,
        req.height,
        req.fitness_level,
    )
    .await?;

    let mut rng = rng_for(req.seed);
    let stored = plan::generate_for_user(&state.pool, id, days, &state.generator, &mut rng).await?;
    Ok(Json(stored.plan).into_response())
}

async fn export_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiQuery(query): ApiQuery<ExportQuery>,
) -> HandlerResult {
    let days = day_count(query.days)?;
    let mut rng = rng_for(query.seed);
    let bytes = plan::export_for_user(&state.pool, id, days, &state.generator, &mut rng).await?;

    let disposition = format!("attachment; filename=\"workout_plan_user_{id}.xlsx\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn list_plans(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult {
    let plans = plan::list_plans(&state.pool, id).await?;
    if plans.is_empty() {
        return Err(AppError::not_found(format!(
            "no workout plans found for user {id}"
        )));
    }
    Ok(Json(plans).into_response())
}

async fn record_fitness_data(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(req): ApiJson<FitnessEntryRequest>,
) -> HandlerResult {
    if req.exercise_name.trim().is_empty() {
        return Err(AppError::bad_request("exercise_name must not be empty"));
    }
    if req.sets <= 0 || req.reps <= 0 {
        return Err(AppError::bad_request("sets and reps must be positive"));
    }
    if !req.weight.is_finite() || req.weight < 0.0 {
        return Err(AppError::bad_request("weight must not be negative"));
    }

    user_db::get_user(&state.pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("user {id} not found")))?;

    let entry = entry_db::insert_fitness_entry(
        &state.pool,
        &NewFitnessEntry {
            user_id: id,
            performed_on: req.date.unwrap_or_else(|| Utc::now().date_naive()),
            exercise_name: req.exercise_name.trim(),
            weight: req.weight,
            sets: req.sets,
            reps: req.reps,
        },
    )
    .await
    .map_err(AppError::internal)?;
    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

async fn get_fitness_data(
    State(state): State<AppState>,
    Path((id, exercise)): Path<(Uuid, String)>,
) -> HandlerResult {
    let entries = entry_db::list_entries_for_exercise(&state.pool, id, &exercise)
        .await
        .map_err(AppError::internal)?;
    if entries.is_empty() {
        return Err(AppError::not_found(format!(
            "no fitness data for {exercise:?}"
        )));
    }
    Ok(Json(entries).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use sqlx::PgPool;
    use tower::ServiceExt;

    use fitcoach_core::plan::GeneratorOptions;
    use fitcoach_test_utils::{create_test_db, drop_test_db};

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    async fn send_request(pool: PgPool, uri: &str) -> axum::response::Response {
        let app = super::build_router(pool, GeneratorOptions::default());
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn send_json(
        pool: PgPool,
        method: Method,
        uri: &str,
        body: Value,
    ) -> axum::response::Response {
        let app = super::build_router(pool, GeneratorOptions::default());
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), 16 * 1_048_576)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn create_user(pool: &PgPool, name: &str) -> String {
        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/users",
            json!({"name": name, "password": "pw", "age": 25, "weight": 70.0, "height": 175.0}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_json(resp).await["id"].as_str().unwrap().to_owned()
    }

    async fn add_squat(pool: &PgPool) {
        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/exercises",
            json!({"name": "Squat", "region": "legs", "sets": 3, "reps": 10, "equipment": "Barbell"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_health() {
        let (pool, db_name) = create_test_db().await;

        let resp = send_request(pool.clone(), "/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"status": "ok"}));

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let (pool, db_name) = create_test_db().await;

        let id = create_user(&pool, "alice").await;
        let resp = send_request(pool.clone(), &format!("/api/users/{id}")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["name"], "alice");
        assert_eq!(json["fitness_level"], "intermediate");
        assert!(json.get("password").is_none(), "password must not be exposed");

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/users",
            json!({"name": "alice", "password": "x", "age": 30, "weight": 60.0, "height": 160.0}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let (pool, db_name) = create_test_db().await;

        let random_id = uuid::Uuid::new_v4();
        let resp = send_request(pool.clone(), &format!("/api/users/{random_id}")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_json(resp).await["error"].is_string());

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_update_user() {
        let (pool, db_name) = create_test_db().await;

        let id = create_user(&pool, "bob").await;
        let resp = send_json(
            pool.clone(),
            Method::PUT,
            &format!("/api/users/{id}"),
            json!({"age": 26, "weight": 80.0, "height": 180.0, "fitness_level": "advanced"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            json!({"message": "User data updated successfully"})
        );

        let json = body_json(send_request(pool.clone(), &format!("/api/users/{id}")).await).await;
        assert_eq!(json["age"], 26);
        assert_eq!(json["fitness_level"], "advanced");

        let resp = send_json(
            pool.clone(),
            Method::PUT,
            &format!("/api/users/{id}"),
            json!({"age": 26, "weight": -1.0, "height": 180.0}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_login() {
        let (pool, db_name) = create_test_db().await;

        let user_id = create_user(&pool, "carol").await;
        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/coaches",
            json!({"name": "dave", "password": "cpw"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/login",
            json!({"name": "carol", "password": "pw"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!({"id": user_id, "role": "user"}));

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/login",
            json!({"name": "dave", "password": "cpw"}),
        )
        .await;
        assert_eq!(body_json(resp).await["role"], "coach");

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/login",
            json!({"name": "carol", "password": "nope"}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_coach_assignment() {
        let (pool, db_name) = create_test_db().await;

        let user_id = create_user(&pool, "erin").await;
        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/coaches",
            json!({"name": "frank", "password": "cpw", "specialization": "mobility"}),
        )
        .await;
        let coach_id = body_json(resp).await["id"].as_str().unwrap().to_owned();

        let resp = send_json(
            pool.clone(),
            Method::POST,
            &format!("/api/users/{user_id}/coach"),
            json!({"coach_id": coach_id}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["coach_id"], coach_id.as_str());

        let resp = send_request(pool.clone(), &format!("/api/coaches/{coach_id}/students")).await;
        let students = body_json(resp).await;
        assert_eq!(students.as_array().unwrap().len(), 1);
        assert_eq!(students[0]["name"], "erin");

        let resp = send_request(pool.clone(), "/api/coaches").await;
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

        let random_id = uuid::Uuid::new_v4();
        let resp =
            send_request(pool.clone(), &format!("/api/coaches/{random_id}/students")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_exercises() {
        let (pool, db_name) = create_test_db().await;

        add_squat(&pool).await;
        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/exercises",
            json!({"name": "Squat", "region": "legs", "sets": 4, "reps": 8}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/exercises",
            json!({"name": "Plank", "region": "back", "sets": 0, "reps": 8}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // Names are case-sensitive, like the catalog's unique key.
        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/exercises",
            json!({"name": "squat", "region": "legs", "sets": 4, "reps": 8}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = send_request(pool.clone(), "/api/exercises").await;
        let json = body_json(resp).await;
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["region"], "legs");

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_concurrent_exercise_posts_conflict() {
        let (pool, db_name) = create_test_db().await;

        for round in 0..5 {
            let body = json!({"name": format!("Lunge {round}"), "region": "legs", "sets": 3, "reps": 12});
            let (a, b) = tokio::join!(
                send_json(pool.clone(), Method::POST, "/api/exercises", body.clone()),
                send_json(pool.clone(), Method::POST, "/api/exercises", body.clone()),
            );
            let mut statuses = [a.status(), b.status()];
            statuses.sort();
            assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
        }

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_generate_workout_plan() {
        let (pool, db_name) = create_test_db().await;

        add_squat(&pool).await;
        let id = create_user(&pool, "gina").await;

        let resp = send_json(
            pool.clone(),
            Method::POST,
            &format!("/api/users/{id}/workout-plan"),
            json!({"age": 25, "weight": 71.3, "height": 180.0, "days": 2, "seed": 7}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(
            json,
            json!([
                {"day": "Day 1", "exercises": [
                    {"region": "legs", "name": "Squat", "sets": 3, "reps": 10, "equipment": "Barbell"}
                ]},
                {"day": "Day 2", "exercises": []}
            ])
        );

        let resp = send_request(pool.clone(), &format!("/api/users/{id}/workout-plans")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let plans = body_json(resp).await;
        assert_eq!(plans.as_array().unwrap().len(), 1);
        assert_eq!(plans[0]["days"], 2);

        let resp =
            send_request(pool.clone(), &format!("/api/users/{id}/fitness-data/Squat")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let entries = body_json(resp).await;
        assert_eq!(entries[0]["weight"], 0.0);
        assert_eq!(entries[0]["sets"], 3);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_generate_rejects_bad_input() {
        let (pool, db_name) = create_test_db().await;

        let id = create_user(&pool, "hank").await;
        let uri = format!("/api/users/{id}/workout-plan");

        for body in [
            json!({"age": 25, "weight": 0.0, "height": 180.0, "days": 7}),
            json!({"age": 25, "weight": 70.0, "height": 180.0, "days": 0}),
            json!({"age": 25, "weight": 70.0, "height": 180.0, "days": 366}),
        ] {
            let resp = send_json(pool.clone(), Method::POST, &uri, body.clone()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body}");
        }

        let random_id = uuid::Uuid::new_v4();
        let resp = send_json(
            pool.clone(),
            Method::POST,
            &format!("/api/users/{random_id}/workout-plan"),
            json!({"age": 25, "weight": 70.0, "height": 180.0, "days": 7}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    async fn assert_json_bad_request(response: axum::response::Response, context: &str) {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{context}");
        let json = body_json(response).await;
        assert!(json["error"].is_string(), "{context}: {json}");
    }

    #[tokio::test]
    async fn test_undecodable_input_is_json_bad_request() {
        let (pool, db_name) = create_test_db().await;

        let id = create_user(&pool, "lena").await;
        let plan_uri = format!("/api/users/{id}/workout-plan");

        let resp = send_json(
            pool.clone(),
            Method::POST,
            &plan_uri,
            json!({"age": 25, "weight": 70.0, "height": 180.0, "days": -1}),
        )
        .await;
        assert_json_bad_request(resp, "negative days").await;

        let resp = send_json(
            pool.clone(),
            Method::POST,
            &plan_uri,
            json!({"age": 25, "weight": 70.0, "height": 180.0, "days": 7, "fitness_level": "expert"}),
        )
        .await;
        assert_json_bad_request(resp, "unknown fitness level").await;

        let resp = send_json(
            pool.clone(),
            Method::POST,
            "/api/exercises",
            json!({"name": "Neck Curl", "region": "neck", "sets": 3, "reps": 10}),
        )
        .await;
        assert_json_bad_request(resp, "unknown region").await;

        let app = super::build_router(pool.clone(), GeneratorOptions::default());
        let resp = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/login")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_json_bad_request(resp, "malformed body").await;

        let app = super::build_router(pool.clone(), GeneratorOptions::default());
        let resp = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(format!("/api/users/{id}/workout-plan/export"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_json_bad_request(resp, "export without days").await;

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_workout_plans_not_found_when_none() {
        let (pool, db_name) = create_test_db().await;

        let id = create_user(&pool, "ivy").await;
        let resp = send_request(pool.clone(), &format!("/api/users/{id}/workout-plans")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_export_workout_plan() {
        let (pool, db_name) = create_test_db().await;

        add_squat(&pool).await;
        let id = create_user(&pool, "jack").await;

        let app = super::build_router(pool.clone(), GeneratorOptions::default());
        let resp = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(format!("/api/users/{id}/workout-plan/export?days=7&seed=3"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let headers = resp.headers();
        assert_eq!(headers["content-type"], super::XLSX_CONTENT_TYPE);
        assert_eq!(
            headers["content-disposition"],
            format!("attachment; filename=\"workout_plan_user_{id}.xlsx\"").as_str()
        );
        assert!(body_bytes(resp).await.starts_with(b"PK"));

        // Export does not store a plan.
        let resp = send_request(pool.clone(), &format!("/api/users/{id}/workout-plans")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        pool.close().await;
        drop_test_db(&db_name).await;
    }

    #[tokio::test]
    async fn test_fitness_data() {
        let (pool, db_name) = create_test_db().await;

        let id = create_user(&pool, "kate").await;
        let uri = format!("/api/users/{id}/fitness-data");

        let resp = send_request(pool.clone(), &format!("{uri}/Deadlift")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        for (date, weight) in [("2025-03-02", 105.0), ("2025-03-01", 100.0)] {
            let resp = send_json(
                pool.clone(),
                Method::POST,
                &uri,
                json!({"exercise_name": "Deadlift", "weight": weight, "sets": 3, "reps": 5, "date": date}),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp = send_request(pool.clone(), &format!("{uri}/Deadlift")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let entries = body_json(resp).await;
        assert_eq!(entries[0]["performed_on"], "2025-03-01");
        assert_eq!(entries[1]["weight"], 105.0);

        let random_id = uuid::Uuid::new_v4();
        let resp = send_json(
            pool.clone(),
            Method::POST,
            &format!("/api/users/{random_id}/fitness-data"),
            json!({"exercise_name": "Deadlift", "sets": 3, "reps": 5}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        pool.close().await;
        drop_test_db(&db_name).await;
    }
}
