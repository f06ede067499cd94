//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{FieldErrors, validate_username};

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier issued by the identity provider
    pub id: String,
    pub email: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
    pub is_freelancer: bool,
    pub is_client: bool,
    pub about: Option<String>,
    pub skills: Vec<String>,
    pub social_links: Vec<String>,
    pub contact_info: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn roles(&self) -> RoleFlags {
        RoleFlags {
            is_freelancer: self.is_freelancer,
            is_client: self.is_client,
        }
    }

    /// "First Last", falling back to the username and then the email.
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full = full.trim();

        if !full.is_empty() {
            full.to_string()
        } else if let Some(username) = &self.username {
            username.clone()
        } else {
            self.email.clone()
        }
    }
}

/// The two role flags carried by every user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleFlags {
    pub is_freelancer: bool,
    pub is_client: bool,
}

impl RoleFlags {
    pub fn new(is_freelancer: bool, is_client: bool) -> Self {
        Self {
            is_freelancer,
            is_client,
        }
    }

    /// Role after a switch.
    ///
    /// Dual-role users land on client; everyone else has the freelancer flag
    /// flipped and the client flag set to its opposite. Switching therefore
    /// oscillates between exactly two states and never re-enters dual role.
    pub fn switched(self) -> Self {
        let is_freelancer = if self.is_freelancer && self.is_client {
            false
        } else {
            !self.is_freelancer
        };

        Self {
            is_freelancer,
            is_client: !is_freelancer,
        }
    }
}

/// Display fields copied from the identity provider on every sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFields {
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
}

/// Row inserted on a user's first identity sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub display: DisplayFields,
}

/// Validated, fully-resolved profile write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: String,
    pub about: Option<String>,
    pub skills: Vec<String>,
    pub social_links: Vec<String>,
    pub contact_info: Vec<String>,
}

/// Result of reconciling the caller's identity with the users table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "user", rename_all = "lowercase")]
pub enum SyncOutcome {
    /// First sync: a new row was inserted
    Created(User),
    /// The email was already known: display fields were refreshed
    Updated(User),
}

impl SyncOutcome {
    pub fn user(&self) -> &User {
        match self {
            SyncOutcome::Created(user) | SyncOutcome::Updated(user) => user,
        }
    }

    pub fn into_user(self) -> User {
        match self {
            SyncOutcome::Created(user) | SyncOutcome::Updated(user) => user,
        }
    }
}

/// Input for `user.updateRole`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub user_id: String,
    pub is_freelancer: bool,
    pub is_client: bool,
}

/// Input for procedures that only name a user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdRequest {
    pub user_id: String,
}

/// Input for `user.updateProfile`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub user_id: String,
    pub username: String,
    pub about: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social_links: Option<Vec<String>>,
    pub contact_info: Option<Vec<String>>,
}

impl UpdateProfileRequest {
    /// Validate the payload and resolve omitted fields to their empty values.
    pub fn into_update(self) -> Result<ProfileUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("username", validate_username(&self.username));

        errors.into_result(ProfileUpdate {
            username: self.username,
            about: self.about,
            skills: self.skills.unwrap_or_default(),
            social_links: self.social_links.unwrap_or_default(),
            contact_info: self.contact_info.unwrap_or_default(),
        })
    }
}
