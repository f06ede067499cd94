//! Portfolio project operations

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    access::{authorize_owner, ensure_self},
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
    models::{
        CreateProjectRequest, DeleteProjectRequest, PortfolioProject, UpdateProjectRequest,
    },
    repositories::{PortfolioRepository, RepositoryError, UserRepository},
};

/// Domain operations over portfolio projects
#[derive(Clone)]
pub struct PortfolioService {
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn PortfolioRepository>,
}

impl PortfolioService {
    pub fn new(users: Arc<dyn UserRepository>, projects: Arc<dyn PortfolioRepository>) -> Self {
        Self { users, projects }
    }

    pub async fn create_project(
        &self,
        caller: &CurrentUser,
        request: CreateProjectRequest,
    ) -> ApiResult<PortfolioProject> {
        ensure_self(caller, &request.user_id)?;

        let user_id = request.user_id.clone();
        let draft = request.draft()?;

        if self.users.find_by_id(&user_id).await?.is_none() {
            return Err(ApiError::NotFound("User"));
        }

        let project = match self.projects.create(&user_id, &draft).await {
            Ok(project) => project,
            Err(RepositoryError::MissingOwner) => return Err(ApiError::NotFound("User")),
            Err(e) => return Err(e.into()),
        };
        info!("User {} created project {}", user_id, project.id);
        Ok(project)
    }

    pub async fn update_project(
        &self,
        caller: &CurrentUser,
        request: UpdateProjectRequest,
    ) -> ApiResult<PortfolioProject> {
        let project = self
            .owned_project(caller, &request.project_id, &request.user_id)
            .await?;
        let draft = request.draft()?;

        let updated = self
            .projects
            .update(project.id, &draft)
            .await?
            .ok_or(ApiError::NotFoundOrUnauthorized)?;

        info!("User {} updated project {}", caller.id, updated.id);
        Ok(updated)
    }

    pub async fn delete_project(
        &self,
        caller: &CurrentUser,
        request: DeleteProjectRequest,
    ) -> ApiResult<PortfolioProject> {
        let project = self
            .owned_project(caller, &request.project_id, &request.user_id)
            .await?;

        let deleted = self
            .projects
            .delete(project.id)
            .await?
            .ok_or(ApiError::NotFoundOrUnauthorized)?;

        info!("User {} deleted project {}", caller.id, deleted.id);
        Ok(deleted)
    }

    /// Newest first. Any authenticated caller may list any user's projects.
    pub async fn get_projects(&self, user_id: &str) -> ApiResult<Vec<PortfolioProject>> {
        Ok(self.projects.list_by_user(user_id).await?)
    }

    /// Load a project the caller is allowed to mutate.
    ///
    /// A caller acting for someone else is turned away before the store is
    /// consulted, so the response never depends on whether the project exists.
    async fn owned_project(
        &self,
        caller: &CurrentUser,
        project_id: &str,
        user_id: &str,
    ) -> ApiResult<PortfolioProject> {
        if caller.id != user_id {
            warn!(
                "User {} attempted to modify project {} on behalf of {}",
                caller.id, project_id, user_id
            );
            return Err(ApiError::NotFoundOrUnauthorized);
        }

        let project = match Uuid::parse_str(project_id) {
            Ok(id) => self.projects.find_by_id(id).await?,
            Err(_) => None,
        };

        authorize_owner(
            caller,
            user_id,
            project,
            |p: &PortfolioProject| p.user_id.as_str(),
            ApiError::NotFoundOrUnauthorized,
        )
    }
}
