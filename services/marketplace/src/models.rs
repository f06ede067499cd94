//! API models for request and response payloads

use serde::Serialize;

pub mod portfolio;
pub mod user;

pub use portfolio::{
    CreateProjectRequest, DeleteProjectRequest, PortfolioProject, ProjectDraft,
    UpdateProjectRequest,
};
pub use user::{
    DisplayFields, NewUser, ProfileUpdate, RoleFlags, SyncOutcome, UpdateProfileRequest,
    UpdateRoleRequest, User, UserIdRequest,
};

/// A user together with their portfolio, newest project first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub portfolio_projects: Vec<PortfolioProject>,
}

/// Anonymous view of a profile, served by username
///
/// Omits the email address and internal timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub username: Option<String>,
    pub display_name: String,
    /// Short description suitable for a page's meta description
    pub summary: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
    pub is_freelancer: bool,
    pub is_client: bool,
    pub about: Option<String>,
    pub skills: Vec<String>,
    pub social_links: Vec<String>,
    pub contact_info: Vec<String>,
    pub portfolio_projects: Vec<PortfolioProject>,
}

impl PublicProfile {
    pub fn new(user: User, portfolio_projects: Vec<PortfolioProject>) -> Self {
        let display_name = user.display_name();
        let summary = match user.about.as_deref().map(str::trim) {
            Some(about) if !about.is_empty() => about.to_string(),
            _ => format!("View {}'s freelancer profile.", display_name),
        };

        Self {
            id: user.id,
            username: user.username,
            display_name,
            summary,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_image: user.profile_image,
            is_freelancer: user.is_freelancer,
            is_client: user.is_client,
            about: user.about,
            skills: user.skills,
            social_links: user.social_links,
            contact_info: user.contact_info,
            portfolio_projects,
        }
    }
}
