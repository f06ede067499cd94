//! Marketplace routes
//!
//! Procedures are exposed as `POST /rpc/<resource>.<procedure>` with camelCase
//! JSON bodies. Only `/health` and `/profiles/:username` are reachable
//! without a bearer token.

use axum::{
    Json, Router, async_trait,
    extract::{FromRequest, Path, Request, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{CurrentUser, auth_middleware},
    models::{
        CreateProjectRequest, DeleteProjectRequest, RoleFlags, UpdateProfileRequest,
        UpdateProjectRequest, UpdateRoleRequest, UserIdRequest,
    },
    state::AppState,
};

/// JSON body extractor whose rejections use the API error envelope
pub struct Input<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Input<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Create the router for the marketplace service
pub fn create_router(state: AppState) -> Router {
    let rpc_routes = Router::new()
        .route("/rpc/user.sync", post(sync_user))
        .route("/rpc/user.me", post(current_user))
        .route("/rpc/user.updateRole", post(update_role))
        .route("/rpc/user.switchRole", post(switch_role))
        .route("/rpc/user.updateProfile", post(update_profile))
        .route("/rpc/user.getProfile", post(get_profile))
        .route("/rpc/portfolio.createProject", post(create_project))
        .route("/rpc/portfolio.updateProject", post(update_project))
        .route("/rpc/portfolio.deleteProject", post(delete_project))
        .route("/rpc/portfolio.getProjects", post(get_projects))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/profiles/:username", get(get_public_profile))
        .merge(rpc_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match &state.db_pool {
        Some(pool) => match common::database::health_check(pool).await {
            Ok(true) => "ok",
            _ => "unavailable",
        },
        None => "in-memory",
    };

    let status = if database == "unavailable" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ok" } else { "degraded" },
            "service": "marketplace",
            "database": database,
        })),
    )
}

/// Public profile by username; no authentication
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let profile = state.user_service.public_profile(&username).await?;
    Ok(Json(profile))
}

/// Upsert the caller's user row from their identity claims
pub async fn sync_user(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let outcome = state.user_service.sync_identity(&caller).await?;
    Ok(Json(outcome))
}

/// The caller's own profile
pub async fn current_user(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let profile = state.user_service.current_user(&caller).await?;
    Ok(Json(profile))
}

pub async fn update_role(
    State(state): State<AppState>,
    caller: CurrentUser,
    Input(payload): Input<UpdateRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let roles = RoleFlags::new(payload.is_freelancer, payload.is_client);
    let user = state
        .user_service
        .select_role(&caller, &payload.user_id, roles)
        .await?;
    Ok(Json(user))
}

pub async fn switch_role(
    State(state): State<AppState>,
    caller: CurrentUser,
    Input(payload): Input<UserIdRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_service
        .switch_role(&caller, &payload.user_id)
        .await?;
    Ok(Json(user))
}

pub async fn update_profile(
    State(state): State<AppState>,
    caller: CurrentUser,
    Input(payload): Input<UpdateProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_service.update_profile(&caller, payload).await?;
    Ok(Json(user))
}

pub async fn get_profile(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Input(payload): Input<UserIdRequest>,
) -> ApiResult<impl IntoResponse> {
    let profile = state.user_service.get_profile(&payload.user_id).await?;
    Ok(Json(profile))
}

pub async fn create_project(
    State(state): State<AppState>,
    caller: CurrentUser,
    Input(payload): Input<CreateProjectRequest>,
) -> ApiResult<impl IntoResponse> {
    let project = state
        .portfolio_service
        .create_project(&caller, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<AppState>,
    caller: CurrentUser,
    Input(payload): Input<UpdateProjectRequest>,
) -> ApiResult<impl IntoResponse> {
    let project = state
        .portfolio_service
        .update_project(&caller, payload)
        .await?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    caller: CurrentUser,
    Input(payload): Input<DeleteProjectRequest>,
) -> ApiResult<impl IntoResponse> {
    let project = state
        .portfolio_service
        .delete_project(&caller, payload)
        .await?;
    Ok(Json(project))
}

pub async fn get_projects(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Input(payload): Input<UserIdRequest>,
) -> ApiResult<impl IntoResponse> {
    let projects = state
        .portfolio_service
        .get_projects(&payload.user_id)
        .await?;
    Ok(Json(projects))
}
