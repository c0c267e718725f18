use tracing::info;
use validator::Validate;

use crate::{
    constants::{DEFAULT_PROJECT_PAGE_SIZE, FEATURED_PROJECTS_LIMIT},
    entities::{
        pagination::PageRequest,
        project::{
            FeaturedProjectsResponse, NewProjectRequest, Project, ProjectFilter, ProjectLikedResponse,
            ProjectListQuery, ProjectListResponse, ProjectMutationResponse, ProjectStats,
            UpdateProjectRequest,
        },
    },
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::valid_uuid::valid_uuid,
};

const NOT_FOUND: &str = "Project not found";

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R) -> Self {
        ProjectHandler { project_repo }
    }

    /// Lists projects newest first, filtered and paginated from the raw query.
    pub async fn list_projects(&self, query: &ProjectListQuery) -> Result<ProjectListResponse, AppError> {
        let page = PageRequest::from_query(
            query.page.as_deref(),
            query.limit.as_deref(),
            DEFAULT_PROJECT_PAGE_SIZE,
        )?;
        let filter = ProjectFilter::from_query(query)?;

        let projects = self.project_repo.list_projects(&filter, &page).await?;
        let total = self.project_repo.count_projects(&filter).await?;

        Ok(ProjectListResponse {
            projects,
            total_pages: page.total_pages(total),
            current_page: page.page,
            total,
        })
    }

    pub async fn featured_projects(&self) -> Result<FeaturedProjectsResponse, AppError> {
        let projects = self
            .project_repo
            .list_featured_projects(FEATURED_PROJECTS_LIMIT)
            .await?;

        Ok(FeaturedProjectsResponse { projects })
    }

    /// Fetches a project and counts the view.
    pub async fn view_project(&self, id: &str) -> Result<Project, AppError> {
        let valid_id = valid_uuid(id, NOT_FOUND)?;
        self.project_repo.increment_views(&valid_id).await
    }

    pub async fn create_project(&self, request: NewProjectRequest) -> Result<ProjectMutationResponse, AppError> {
        let request = request.normalized();
        request.validate()?;

        let project = self
            .project_repo
            .create_project(&request.into_project(chrono::Utc::now()))
            .await?;

        info!(project_id = %project.id, "Project created");
        Ok(ProjectMutationResponse {
            message: "Project created successfully".to_string(),
            project,
        })
    }

    pub async fn update_project(
        &self,
        id: &str,
        request: UpdateProjectRequest,
    ) -> Result<ProjectMutationResponse, AppError> {
        let valid_id = valid_uuid(id, NOT_FOUND)?;

        let request = request.normalized();
        request.validate()?;

        let project = self.project_repo.update_project(&valid_id, &request).await?;

        Ok(ProjectMutationResponse {
            message: "Project updated successfully".to_string(),
            project,
        })
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id, NOT_FOUND)?;
        self.project_repo.delete_project(&valid_id).await?;

        info!(project_id = %valid_id, "Project deleted");
        Ok(())
    }

    pub async fn like_project(&self, id: &str) -> Result<ProjectLikedResponse, AppError> {
        let valid_id = valid_uuid(id, NOT_FOUND)?;
        let likes = self.project_repo.increment_likes(&valid_id).await?;

        Ok(ProjectLikedResponse {
            message: "Project liked successfully".to_string(),
            likes,
        })
    }

    pub async fn project_stats(&self) -> Result<ProjectStats, AppError> {
        self.project_repo.project_stats().await
    }
}
