//! In-process store implementing both repository traits
//!
//! Mirrors the constraints of the SQL schema: unique `id`, `email` and
//! `username` on users, and projects that reference an existing user.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    EMAIL_CONSTRAINT, PortfolioRepository, RepositoryError, RepositoryResult, USER_ID_CONSTRAINT,
    USERNAME_CONSTRAINT, UserRepository,
};
use crate::models::{
    DisplayFields, NewUser, PortfolioProject, ProfileUpdate, ProjectDraft, RoleFlags, User,
};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    /// Insertion order, oldest first
    projects: Vec<PortfolioProject>,
}

impl Tables {
    fn username_holder(&self, username: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.username.as_deref() == Some(username))
    }

    fn update_user(&mut self, id: &str, apply: impl FnOnce(&mut User)) -> Option<User> {
        let user = self.users.get_mut(id)?;
        apply(user);
        user.updated_at = Utc::now();
        Some(user.clone())
    }
}

/// Shared in-memory store; clones see the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(self.tables.lock().await.username_holder(username).cloned())
    }

    async fn username_taken_by_other(
        &self,
        username: &str,
        user_id: &str,
    ) -> RepositoryResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .username_holder(username)
            .is_some_and(|holder| holder.id != user_id))
    }

    async fn create(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let mut tables = self.tables.lock().await;

        if tables.users.contains_key(&new_user.id) {
            return Err(RepositoryError::UniqueViolation(
                USER_ID_CONSTRAINT.to_string(),
            ));
        }
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(RepositoryError::UniqueViolation(EMAIL_CONSTRAINT.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: new_user.id.clone(),
            email: new_user.email.clone(),
            username: None,
            first_name: Some(new_user.display.first_name.clone()),
            last_name: Some(new_user.display.last_name.clone()),
            profile_image: new_user.display.profile_image.clone(),
            is_freelancer: false,
            is_client: false,
            about: None,
            skills: Vec::new(),
            social_links: Vec::new(),
            contact_info: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id.clone(), user.clone());

        Ok(user)
    }

    async fn update_display_fields(
        &self,
        id: &str,
        fields: &DisplayFields,
    ) -> RepositoryResult<Option<User>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.update_user(id, |user| {
            user.first_name = Some(fields.first_name.clone());
            user.last_name = Some(fields.last_name.clone());
            user.profile_image = fields.profile_image.clone();
        }))
    }

    async fn update_identity(
        &self,
        id: &str,
        email: &str,
        fields: &DisplayFields,
    ) -> RepositoryResult<Option<User>> {
        let mut tables = self.tables.lock().await;

        if tables.users.values().any(|u| u.email == email && u.id != id) {
            return Err(RepositoryError::UniqueViolation(EMAIL_CONSTRAINT.to_string()));
        }

        Ok(tables.update_user(id, |user| {
            user.email = email.to_string();
            user.first_name = Some(fields.first_name.clone());
            user.last_name = Some(fields.last_name.clone());
            user.profile_image = fields.profile_image.clone();
        }))
    }

    async fn set_roles(&self, id: &str, roles: RoleFlags) -> RepositoryResult<Option<User>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.update_user(id, |user| {
            user.is_freelancer = roles.is_freelancer;
            user.is_client = roles.is_client;
        }))
    }

    async fn switch_roles(&self, id: &str) -> RepositoryResult<Option<User>> {
        let mut tables = self.tables.lock().await;
        Ok(tables.update_user(id, |user| {
            let next = user.roles().switched();
            user.is_freelancer = next.is_freelancer;
            user.is_client = next.is_client;
        }))
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> RepositoryResult<Option<User>> {
        let mut tables = self.tables.lock().await;

        if tables
            .username_holder(&update.username)
            .is_some_and(|holder| holder.id != id)
        {
            return Err(RepositoryError::UniqueViolation(
                USERNAME_CONSTRAINT.to_string(),
            ));
        }

        Ok(tables.update_user(id, |user| {
            user.username = Some(update.username.clone());
            user.about = update.about.clone();
            user.skills = update.skills.clone();
            user.social_links = update.social_links.clone();
            user.contact_info = update.contact_info.clone();
        }))
    }
}

#[async_trait]
impl PortfolioRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<PortfolioProject>> {
        let tables = self.tables.lock().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<PortfolioProject>> {
        let tables = self.tables.lock().await;
        let mut projects: Vec<PortfolioProject> = tables
            .projects
            .iter()
            .rev()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        // Stable sort keeps later inserts first when timestamps tie.
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn create(
        &self,
        user_id: &str,
        draft: &ProjectDraft,
    ) -> RepositoryResult<PortfolioProject> {
        let mut tables = self.tables.lock().await;

        if !tables.users.contains_key(user_id) {
            return Err(RepositoryError::MissingOwner);
        }

        let now = Utc::now();
        let project = PortfolioProject {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            link: draft.link.clone(),
            images: draft.images.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.projects.push(project.clone());

        Ok(project)
    }

    async fn update(
        &self,
        id: Uuid,
        draft: &ProjectDraft,
    ) -> RepositoryResult<Option<PortfolioProject>> {
        let mut tables = self.tables.lock().await;
        let Some(project) = tables.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        project.title = draft.title.clone();
        project.description = draft.description.clone();
        project.link = draft.link.clone();
        project.images = draft.images.clone();
        project.updated_at = Utc::now();

        Ok(Some(project.clone()))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Option<PortfolioProject>> {
        let mut tables = self.tables.lock().await;
        let position = tables.projects.iter().position(|p| p.id == id);
        Ok(position.map(|index| tables.projects.remove(index)))
    }
}
