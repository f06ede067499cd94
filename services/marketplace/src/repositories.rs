//! Repositories for database operations
//!
//! The domain services talk to storage only through [`UserRepository`] and
//! [`PortfolioRepository`]. [`postgres`] is the production implementation;
//! [`memory`] keeps everything in process for tests and local runs.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    DisplayFields, NewUser, PortfolioProject, ProfileUpdate, ProjectDraft, RoleFlags, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgPortfolioRepository, PgUserRepository};

/// Name of the unique constraint guarding `users.username`
pub const USERNAME_CONSTRAINT: &str = "users_username_key";
/// Name of the unique constraint guarding `users.email`
pub const EMAIL_CONSTRAINT: &str = "users_email_key";
/// Name of the primary key constraint on `users.id`
pub const USER_ID_CONSTRAINT: &str = "users_pkey";

/// Repository failure
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// A unique constraint rejected the write; carries the constraint name
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The referenced owning user does not exist
    #[error("Owning user does not exist")]
    MissingOwner,

    /// Any other database failure
    #[error("Database query error: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(constraint) = common::error::unique_violation(&err) {
            return RepositoryError::UniqueViolation(constraint);
        }
        if common::error::foreign_key_violation(&err).is_some() {
            return RepositoryError::MissingOwner;
        }
        RepositoryError::Query(err)
    }
}

impl RepositoryError {
    pub fn is_unique_violation_of(&self, constraint: &str) -> bool {
        matches!(self, RepositoryError::UniqueViolation(c) if c == constraint)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage for [`User`] rows
///
/// Mutations return `Ok(None)` when no row has the given id.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    /// Whether a user other than `user_id` already holds `username`.
    async fn username_taken_by_other(&self, username: &str, user_id: &str)
    -> RepositoryResult<bool>;

    async fn create(&self, new_user: &NewUser) -> RepositoryResult<User>;

    async fn update_display_fields(
        &self,
        id: &str,
        fields: &DisplayFields,
    ) -> RepositoryResult<Option<User>>;

    /// Replace the email address along with the display fields.
    async fn update_identity(
        &self,
        id: &str,
        email: &str,
        fields: &DisplayFields,
    ) -> RepositoryResult<Option<User>>;

    async fn set_roles(&self, id: &str, roles: RoleFlags) -> RepositoryResult<Option<User>>;

    /// Atomically apply [`RoleFlags::switched`] to the stored flags.
    async fn switch_roles(&self, id: &str) -> RepositoryResult<Option<User>>;

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> RepositoryResult<Option<User>>;
}

/// Storage for [`PortfolioProject`] rows
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<PortfolioProject>>;

    /// All projects of a user, newest first.
    async fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<PortfolioProject>>;

    async fn create(&self, user_id: &str, draft: &ProjectDraft)
    -> RepositoryResult<PortfolioProject>;

    /// Overwrite the editable fields. The owner is never touched.
    async fn update(
        &self,
        id: Uuid,
        draft: &ProjectDraft,
    ) -> RepositoryResult<Option<PortfolioProject>>;

    /// Remove the row permanently, returning what was deleted.
    async fn delete(&self, id: Uuid) -> RepositoryResult<Option<PortfolioProject>>;
}
