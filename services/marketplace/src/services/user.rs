//! User lifecycle operations: identity sync, roles and profile edits

use std::sync::Arc;
use tracing::info;

use crate::{
    access::ensure_self,
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
    models::{
        DisplayFields, NewUser, PublicProfile, RoleFlags, SyncOutcome, UpdateProfileRequest,
        User, UserProfile,
    },
    repositories::{
        EMAIL_CONSTRAINT, PortfolioRepository, USER_ID_CONSTRAINT, USERNAME_CONSTRAINT,
        UserRepository,
    },
};

/// Domain operations over users
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn PortfolioRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, projects: Arc<dyn PortfolioRepository>) -> Self {
        Self { users, projects }
    }

    /// Reconcile the caller's identity-provider profile with the users table.
    ///
    /// Keyed by email: a known email refreshes the display fields of the
    /// existing row. An unknown email on a known id means the provider
    /// changed the address, so the row takes the new email. Otherwise a row
    /// is created under the caller's id.
    pub async fn sync_identity(&self, caller: &CurrentUser) -> ApiResult<SyncOutcome> {
        let email = caller
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or(ApiError::MissingEmail)?;

        let display = DisplayFields {
            first_name: caller.first_name.clone().unwrap_or_default(),
            last_name: caller.last_name.clone().unwrap_or_default(),
            profile_image: caller.image_url.clone(),
        };

        if let Some(outcome) = self.reconcile(&caller.id, email, &display).await? {
            return Ok(outcome);
        }

        let new_user = NewUser {
            id: caller.id.clone(),
            email: email.to_string(),
            display: display.clone(),
        };

        match self.users.create(&new_user).await {
            Ok(user) => {
                info!("Created user {} on first sync", user.id);
                Ok(SyncOutcome::Created(user))
            }
            // A concurrent first sync won the insert; fall back to the update path.
            Err(e)
                if e.is_unique_violation_of(EMAIL_CONSTRAINT)
                    || e.is_unique_violation_of(USER_ID_CONSTRAINT) =>
            {
                self.reconcile(&caller.id, email, &display)
                    .await?
                    .ok_or_else(|| e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Update an existing row matched by email, then by id. `None` when
    /// neither matches.
    async fn reconcile(
        &self,
        id: &str,
        email: &str,
        display: &DisplayFields,
    ) -> ApiResult<Option<SyncOutcome>> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            return self.refresh_display(&existing.id, display).await.map(Some);
        }

        let Some(user) = self.users.update_identity(id, email, display).await? else {
            return Ok(None);
        };

        info!("User {} changed email address on sync", user.id);
        Ok(Some(SyncOutcome::Updated(user)))
    }

    async fn refresh_display(&self, id: &str, display: &DisplayFields) -> ApiResult<SyncOutcome> {
        let user = self
            .users
            .update_display_fields(id, display)
            .await?
            .ok_or(ApiError::NotFound("User"))?;

        info!("Refreshed display fields for user {}", user.id);
        Ok(SyncOutcome::Updated(user))
    }

    /// Set both role flags exactly as supplied.
    pub async fn select_role(
        &self,
        caller: &CurrentUser,
        user_id: &str,
        roles: RoleFlags,
    ) -> ApiResult<User> {
        ensure_self(caller, user_id)?;

        let user = self
            .users
            .set_roles(user_id, roles)
            .await?
            .ok_or(ApiError::NotFound("User"))?;

        info!(
            "User {} selected roles freelancer={} client={}",
            user.id, user.is_freelancer, user.is_client
        );
        Ok(user)
    }

    /// Toggle between the freelancer and client roles.
    pub async fn switch_role(&self, caller: &CurrentUser, user_id: &str) -> ApiResult<User> {
        ensure_self(caller, user_id)?;

        let user = self
            .users
            .switch_roles(user_id)
            .await?
            .ok_or(ApiError::NotFound("User"))?;

        info!(
            "User {} switched roles to freelancer={} client={}",
            user.id, user.is_freelancer, user.is_client
        );
        Ok(user)
    }

    /// Replace the editable profile fields of the caller's own record.
    pub async fn update_profile(
        &self,
        caller: &CurrentUser,
        request: UpdateProfileRequest,
    ) -> ApiResult<User> {
        ensure_self(caller, &request.user_id)?;

        let user_id = request.user_id.clone();
        let update = request.into_update()?;

        if self
            .users
            .username_taken_by_other(&update.username, &user_id)
            .await?
        {
            return Err(ApiError::UsernameTaken);
        }

        let user = self
            .users
            .update_profile(&user_id, &update)
            .await
            .map_err(|e| match e {
                // Lost the race against another writer claiming the same name.
                e if e.is_unique_violation_of(USERNAME_CONSTRAINT) => ApiError::UsernameTaken,
                e => ApiError::from(e),
            })?
            .ok_or(ApiError::NotFound("User"))?;

        info!("Updated profile for user {}", user.id);
        Ok(user)
    }

    /// Any authenticated caller may read any profile through this path.
    pub async fn get_profile(&self, user_id: &str) -> ApiResult<UserProfile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::NotFound("User"))?;
        let portfolio_projects = self.projects.list_by_user(&user.id).await?;

        Ok(UserProfile {
            user,
            portfolio_projects,
        })
    }

    /// The caller's own record; `NotFound` until the first identity sync.
    pub async fn current_user(&self, caller: &CurrentUser) -> ApiResult<UserProfile> {
        self.get_profile(&caller.id).await
    }

    /// Anonymous lookup by exact username.
    pub async fn public_profile(&self, username: &str) -> ApiResult<PublicProfile> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(ApiError::NotFound("Profile"))?;
        let projects = self.projects.list_by_user(&user.id).await?;

        Ok(PublicProfile::new(user, projects))
    }
}
