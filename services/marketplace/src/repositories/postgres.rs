//! PostgreSQL-backed repositories

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{PortfolioRepository, RepositoryResult, UserRepository};
use crate::models::{
    DisplayFields, NewUser, PortfolioProject, ProfileUpdate, ProjectDraft, RoleFlags, User,
};

/// User repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, profile_image,
                   is_freelancer, is_client, about, skills, social_links, contact_info,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, profile_image,
                   is_freelancer, is_client, about, skills, social_links, contact_info,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, first_name, last_name, profile_image,
                   is_freelancer, is_client, about, skills, social_links, contact_info,
                   created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn username_taken_by_other(
        &self,
        username: &str,
        user_id: &str,
    ) -> RepositoryResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users WHERE username = $1 AND id <> $2
            )
            "#,
        )
        .bind(username)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn create(&self, new_user: &NewUser) -> RepositoryResult<User> {
        info!("Creating user {} for {}", new_user.id, new_user.email);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, profile_image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, username, first_name, last_name, profile_image,
                      is_freelancer, is_client, about, skills, social_links, contact_info,
                      created_at, updated_at
            "#,
        )
        .bind(&new_user.id)
        .bind(&new_user.email)
        .bind(&new_user.display.first_name)
        .bind(&new_user.display.last_name)
        .bind(&new_user.display.profile_image)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_display_fields(
        &self,
        id: &str,
        fields: &DisplayFields,
    ) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, profile_image = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, username, first_name, last_name, profile_image,
                      is_freelancer, is_client, about, skills, social_links, contact_info,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.profile_image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_identity(
        &self,
        id: &str,
        email: &str,
        fields: &DisplayFields,
    ) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, first_name = $3, last_name = $4, profile_image = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, username, first_name, last_name, profile_image,
                      is_freelancer, is_client, about, skills, social_links, contact_info,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.profile_image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn set_roles(&self, id: &str, roles: RoleFlags) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_freelancer = $2, is_client = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, username, first_name, last_name, profile_image,
                      is_freelancer, is_client, about, skills, social_links, contact_info,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(roles.is_freelancer)
        .bind(roles.is_client)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn switch_roles(&self, id: &str) -> RepositoryResult<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(bool, bool)> = sqlx::query_as(
            r#"
            SELECT is_freelancer, is_client
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((is_freelancer, is_client)) = current else {
            return Ok(None);
        };
        let next = RoleFlags::new(is_freelancer, is_client).switched();

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_freelancer = $2, is_client = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, username, first_name, last_name, profile_image,
                      is_freelancer, is_client, about, skills, social_links, contact_info,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(next.is_freelancer)
        .bind(next.is_client)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(user))
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, about = $3, skills = $4, social_links = $5,
                contact_info = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, username, first_name, last_name, profile_image,
                      is_freelancer, is_client, about, skills, social_links, contact_info,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.username)
        .bind(&update.about)
        .bind(&update.skills)
        .bind(&update.social_links)
        .bind(&update.contact_info)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Portfolio project repository
#[derive(Clone)]
pub struct PgPortfolioRepository {
    pool: PgPool,
}

impl PgPortfolioRepository {
    /// Create a new portfolio repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioRepository for PgPortfolioRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<PortfolioProject>> {
        let project = sqlx::query_as::<_, PortfolioProject>(
            r#"
            SELECT id, user_id, title, description, link, images, created_at, updated_at
            FROM portfolio_projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<PortfolioProject>> {
        let projects = sqlx::query_as::<_, PortfolioProject>(
            r#"
            SELECT id, user_id, title, description, link, images, created_at, updated_at
            FROM portfolio_projects
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn create(
        &self,
        user_id: &str,
        draft: &ProjectDraft,
    ) -> RepositoryResult<PortfolioProject> {
        let project = sqlx::query_as::<_, PortfolioProject>(
            r#"
            INSERT INTO portfolio_projects (id, user_id, title, description, link, images)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, link, images, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.link)
        .bind(&draft.images)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn update(
        &self,
        id: Uuid,
        draft: &ProjectDraft,
    ) -> RepositoryResult<Option<PortfolioProject>> {
        let project = sqlx::query_as::<_, PortfolioProject>(
            r#"
            UPDATE portfolio_projects
            SET title = $2, description = $3, link = $4, images = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, description, link, images, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.link)
        .bind(&draft.images)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Option<PortfolioProject>> {
        let project = sqlx::query_as::<_, PortfolioProject>(
            r#"
            DELETE FROM portfolio_projects
            WHERE id = $1
            RETURNING id, user_id, title, description, link, images, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }
}
