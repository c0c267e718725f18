use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    entities::{labels::labelled_enum, option_fields::OptionField},
    errors::AppError,
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: u64 = 200;
const MAX_DESCRIPTION_LENGTH: u64 = 5000;
const MAX_LABELS: usize = 30;
const MAX_LABEL_LENGTH: usize = 50;

// ───── Enumerations ───────────────────────────────────────────────────
labelled_enum! {
    ProjectStatus("project status") {
        Completed => "Completed",
        InProgress => "In Progress",
        Planning => "Planning",
    }
    default = Completed
}

labelled_enum! {
    ProjectCategory("project category") {
        Frontend => "Frontend",
        Backend => "Backend",
        FullStack => "Full Stack",
        Mobile => "Mobile",
        Other => "Other",
    }
    default = FullStack
}

labelled_enum! {
    ProjectDifficulty("project difficulty") {
        Beginner => "Beginner",
        Intermediate => "Intermediate",
        Advanced => "Advanced",
    }
    default = Intermediate
}

// ───── Domain Model ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub image: String,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub status: ProjectStatus,
    pub category: ProjectCategory,
    pub difficulty: ProjectDifficulty,
    pub featured: bool,
    pub completion_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub views: i64,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Database Model ─────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub image: String,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub status: String,
    pub category: String,
    pub difficulty: String,
    pub featured: bool,
    pub completion_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub views: i64,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = AppError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let corrupt = |e: crate::entities::labels::UnknownLabel| {
            AppError::StorageError(format!("Stored project {} is corrupt: {}", row.id, e))
        };

        Ok(Project {
            status: row.status.parse().map_err(corrupt)?,
            category: row.category.parse().map_err(corrupt)?,
            difficulty: row.difficulty.parse().map_err(corrupt)?,
            id: row.id,
            title: row.title,
            description: row.description,
            technologies: row.technologies,
            image: row.image,
            live_url: row.live_url,
            github_url: row.github_url,
            featured: row.featured,
            completion_date: row.completion_date,
            tags: row.tags,
            views: row.views,
            likes: row.likes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ───── Input & Validation Requests ────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct NewProjectRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = MAX_DESCRIPTION_LENGTH, message = "Description is required"))]
    pub description: String,

    #[validate(custom(function = "validate_labels"))]
    pub technologies: Vec<String>,

    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,

    #[validate(custom(function = "validate_url"))]
    pub live_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub github_url: Option<String>,

    pub status: ProjectStatus,
    pub category: ProjectCategory,
    pub difficulty: ProjectDifficulty,
    pub featured: bool,

    #[serde(deserialize_with = "completion_date::optional")]
    pub completion_date: Option<NaiveDate>,

    #[validate(custom(function = "validate_labels"))]
    pub tags: Vec<String>,
}

impl NewProjectRequest {
    /// Trims text the way the stored record expects it.
    pub fn normalized(self) -> Self {
        NewProjectRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            technologies: normalize_labels(self.technologies),
            image: self.image.trim().to_string(),
            live_url: normalize_url(self.live_url),
            github_url: normalize_url(self.github_url),
            tags: normalize_labels(self.tags),
            ..self
        }
    }

    pub fn into_project(self, now: DateTime<Utc>) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            technologies: self.technologies,
            image: self.image,
            live_url: self.live_url,
            github_url: self.github_url,
            status: self.status,
            category: self.category,
            difficulty: self.difficulty,
            featured: self.featured,
            completion_date: self.completion_date,
            tags: self.tags,
            views: 0,
            likes: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update over the editable project fields. Counters, ids and
/// timestamps are not part of it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "Title cannot be empty"),
        custom(function = "reject_null")
    )]
    pub title: OptionField<String>,

    #[validate(
        length(min = 1, max = MAX_DESCRIPTION_LENGTH, message = "Description cannot be empty"),
        custom(function = "reject_null")
    )]
    pub description: OptionField<String>,

    #[validate(custom(function = "validate_optional_labels"))]
    pub technologies: OptionField<Vec<String>>,

    #[validate(
        length(min = 1, message = "Image cannot be empty"),
        custom(function = "reject_null")
    )]
    pub image: OptionField<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub live_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub github_url: OptionField<String>,

    #[validate(custom(function = "reject_null"))]
    pub status: OptionField<ProjectStatus>,

    #[validate(custom(function = "reject_null"))]
    pub featured: OptionField<bool>,

    #[validate(custom(function = "reject_null"))]
    pub category: OptionField<ProjectCategory>,

    #[validate(custom(function = "reject_null"))]
    pub difficulty: OptionField<ProjectDifficulty>,

    #[serde(deserialize_with = "completion_date::field")]
    pub completion_date: OptionField<NaiveDate>,

    #[validate(custom(function = "validate_optional_labels"))]
    pub tags: OptionField<Vec<String>>,
}

impl UpdateProjectRequest {
    pub fn normalized(self) -> Self {
        let trim = |s: String| s.trim().to_string();
        UpdateProjectRequest {
            title: self.title.map_value(trim),
            description: self.description.map_value(trim),
            technologies: self.technologies.map_value(normalize_labels),
            image: self.image.map_value(trim),
            live_url: match self.live_url.map_value(trim) {
                OptionField::SetToValue(url) if url.is_empty() => OptionField::SetToNull,
                other => other,
            },
            github_url: match self.github_url.map_value(trim) {
                OptionField::SetToValue(url) if url.is_empty() => OptionField::SetToNull,
                other => other,
            },
            tags: self.tags.map_value(normalize_labels),
            ..self
        }
    }
}

impl Project {
    /// Applies every field present in `update`, leaving the rest untouched.
    pub fn apply_update(&mut self, update: &UpdateProjectRequest, now: DateTime<Utc>) {
        update.title.apply_to(&mut self.title);
        update.description.apply_to(&mut self.description);
        update.technologies.apply_to(&mut self.technologies);
        update.image.apply_to(&mut self.image);
        update.live_url.apply_to_option(&mut self.live_url);
        update.github_url.apply_to_option(&mut self.github_url);
        update.status.apply_to(&mut self.status);
        update.featured.apply_to(&mut self.featured);
        update.category.apply_to(&mut self.category);
        update.difficulty.apply_to(&mut self.difficulty);
        update.completion_date.apply_to_option(&mut self.completion_date);
        update.tags.apply_to(&mut self.tags);
        self.updated_at = now;
    }

    /// Lowercased words of the searchable text: title, description, technologies.
    fn search_tokens(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.title.as_str())
            .chain(std::iter::once(self.description.as_str()))
            .chain(self.technologies.iter().map(String::as_str))
            .flat_map(|text| text.split(|c: char| !c.is_alphanumeric()))
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
    }
}

// ───── Listing filters ────────────────────────────────────────────────

/// Raw query string of `GET /api/projects`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub featured: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub category: Option<ProjectCategory>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

impl ProjectFilter {
    pub fn from_query(query: &ProjectListQuery) -> Result<Self, AppError> {
        let status = present(&query.status)
            .map(|s| s.parse::<ProjectStatus>())
            .transpose()
            .map_err(|e| AppError::invalid_field("status", e.to_string()))?;
        let category = present(&query.category)
            .map(|s| s.parse::<ProjectCategory>())
            .transpose()
            .map_err(|e| AppError::invalid_field("category", e.to_string()))?;
        let featured = present(&query.featured)
            .map(|s| match s.to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(AppError::invalid_field("featured", "featured must be true or false")),
            })
            .transpose()?;

        Ok(ProjectFilter {
            status,
            category,
            featured,
            search: present(&query.search).map(str::to_string),
        })
    }

    /// Lowercased alphanumeric search words; any one of them matching is enough.
    pub fn search_terms(&self) -> Vec<String> {
        self.search
            .as_deref()
            .map(|text| {
                text.split(|c: char| !c.is_alphanumeric())
                    .filter(|word| !word.is_empty())
                    .map(str::to_lowercase)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn matches(&self, project: &Project) -> bool {
        if self.status.is_some_and(|s| s != project.status) {
            return false;
        }
        if self.category.is_some_and(|c| c != project.category) {
            return false;
        }
        if self.featured.is_some_and(|f| f != project.featured) {
            return false;
        }
        if self.search.is_some() {
            let terms = self.search_terms();
            return project
                .search_tokens()
                .any(|token| terms.iter().any(|term| token.starts_with(term.as_str())));
        }
        true
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ───── API Response Models ────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub total_pages: i64,
    pub current_page: u32,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct FeaturedProjectsResponse {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub project: Project,
}

#[derive(Debug, Serialize)]
pub struct ProjectMutationResponse {
    pub message: String,
    pub project: Project,
}

#[derive(Debug, Serialize)]
pub struct ProjectLikedResponse {
    pub message: String,
    pub likes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total_projects: i64,
    pub featured_projects: i64,
    pub completed_projects: i64,
    pub total_views: i64,
    pub total_likes: i64,
}

// ───── Validation Helpers ─────────────────────────────────────────────

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

pub fn validate_optional_url(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_url(url)?;
    }
    Ok(())
}

pub fn validate_labels(labels: &[String]) -> Result<(), ValidationError> {
    if labels.len() > MAX_LABELS {
        return Err(new_validation_error("too_many_labels", "Too many entries provided"));
    }
    if labels.iter().any(|label| label.chars().count() > MAX_LABEL_LENGTH) {
        return Err(new_validation_error("label_too_long", "Entries must be at most 50 characters"));
    }
    Ok(())
}

pub fn validate_optional_labels(value: &OptionField<Vec<String>>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(labels) => validate_labels(labels),
        OptionField::SetToNull => Err(new_validation_error("null_list", "Use an empty list instead of null")),
        OptionField::Unchanged => Ok(()),
    }
}

pub fn reject_null<T>(value: &OptionField<T>) -> Result<(), ValidationError> {
    if value.is_set_to_null() {
        return Err(new_validation_error("null_required", "This field cannot be null"));
    }
    Ok(())
}

fn normalize_labels(labels: Vec<String>) -> Vec<String> {
    labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

fn normalize_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

/// Completion dates arrive either as `YYYY-MM-DD` or as a full RFC 3339
/// timestamp; timestamps keep their UTC calendar date.
pub fn parse_completion_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| format!("invalid completion date '{}', expected YYYY-MM-DD or an ISO 8601 timestamp", raw))
}

mod completion_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer};

    use super::parse_completion_date;
    use crate::entities::option_fields::OptionField;

    pub fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse_completion_date(&raw).map_err(D::Error::custom))
            .transpose()
    }

    pub fn field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OptionField<NaiveDate>, D::Error> {
        Ok(match optional(deserializer)? {
            Some(date) => OptionField::SetToValue(date),
            None => OptionField::SetToNull,
        })
    }
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}
