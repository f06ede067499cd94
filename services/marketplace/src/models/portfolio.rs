//! Portfolio project model and request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{FieldErrors, normalize_link, validate_required, validate_url};

/// Portfolio project entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProject {
    pub id: Uuid,
    /// Owning user; fixed at creation
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated project fields, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub images: Vec<String>,
}

impl ProjectDraft {
    /// Validate raw project fields.
    ///
    /// An empty `link` counts as no link; omitted `images` become an empty list.
    pub fn parse(
        title: String,
        description: String,
        link: Option<String>,
        images: Option<Vec<String>>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let link = normalize_link(link);
        let images = images.unwrap_or_default();

        errors.check("title", validate_required(&title, "Title"));
        errors.check("description", validate_required(&description, "Description"));

        if let Some(link) = &link {
            errors.check("link", validate_url(link));
        }

        for (index, image) in images.iter().enumerate() {
            if let Err(message) = validate_url(image) {
                errors.add("images", format!("Image {}: {}", index, message));
            }
        }

        errors.into_result(Self {
            title,
            description,
            link,
            images,
        })
    }
}

/// Input for `portfolio.createProject`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub images: Option<Vec<String>>,
}

impl CreateProjectRequest {
    pub fn draft(self) -> Result<ProjectDraft, FieldErrors> {
        ProjectDraft::parse(self.title, self.description, self.link, self.images)
    }
}

/// Input for `portfolio.updateProject`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub project_id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub images: Option<Vec<String>>,
}

impl UpdateProjectRequest {
    pub fn draft(self) -> Result<ProjectDraft, FieldErrors> {
        ProjectDraft::parse(self.title, self.description, self.link, self.images)
    }
}

/// Input for `portfolio.deleteProject`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProjectRequest {
    pub project_id: String,
    pub user_id: String,
}
