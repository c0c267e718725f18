use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Encode, Postgres, QueryBuilder, Type};
use uuid::Uuid;

use crate::{
    entities::{
        option_fields::OptionField,
        pagination::PageRequest,
        project::{Project, ProjectFilter, ProjectRow, ProjectStats, UpdateProjectRequest},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxRepo,
};

/// Matches the expression of `idx_projects_search`. The `simple` config does
/// no stemming, so results agree with `ProjectFilter::matches`.
const SEARCH_DOCUMENT: &str = "projects_search_document(title, description, technologies)";

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, project: &Project) -> Result<Project, AppError>;
    async fn list_projects(&self, filter: &ProjectFilter, page: &PageRequest) -> Result<Vec<Project>, AppError>;
    async fn count_projects(&self, filter: &ProjectFilter) -> Result<i64, AppError>;
    async fn list_featured_projects(&self, limit: u32) -> Result<Vec<Project>, AppError>;
    async fn update_project(&self, id: &Uuid, update: &UpdateProjectRequest) -> Result<Project, AppError>;
    /// Atomically adds one view and returns the updated record.
    async fn increment_views(&self, id: &Uuid) -> Result<Project, AppError>;
    /// Atomically adds one like and returns the new count.
    async fn increment_likes(&self, id: &Uuid) -> Result<i64, AppError>;
    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
    async fn project_stats(&self) -> Result<ProjectStats, AppError>;
}

#[async_trait]
impl<T: ProjectRepository + ?Sized> ProjectRepository for Arc<T> {
    async fn create_project(&self, project: &Project) -> Result<Project, AppError> {
        (**self).create_project(project).await
    }

    async fn list_projects(&self, filter: &ProjectFilter, page: &PageRequest) -> Result<Vec<Project>, AppError> {
        (**self).list_projects(filter, page).await
    }

    async fn count_projects(&self, filter: &ProjectFilter) -> Result<i64, AppError> {
        (**self).count_projects(filter).await
    }

    async fn list_featured_projects(&self, limit: u32) -> Result<Vec<Project>, AppError> {
        (**self).list_featured_projects(limit).await
    }

    async fn update_project(&self, id: &Uuid, update: &UpdateProjectRequest) -> Result<Project, AppError> {
        (**self).update_project(id, update).await
    }

    async fn increment_views(&self, id: &Uuid) -> Result<Project, AppError> {
        (**self).increment_views(id).await
    }

    async fn increment_likes(&self, id: &Uuid) -> Result<i64, AppError> {
        (**self).increment_likes(id).await
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_project(id).await
    }

    async fn project_stats(&self) -> Result<ProjectStats, AppError> {
        (**self).project_stats().await
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

fn push_project_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProjectFilter) {
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(category) = filter.category {
        builder.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(featured) = filter.featured {
        builder.push(" AND featured = ").push_bind(featured);
    }
    if filter.search.is_some() {
        let terms = filter.search_terms();
        if terms.is_empty() {
            builder.push(" AND FALSE");
        } else {
            // Prefix match on every term, any term may match
            let query = terms
                .iter()
                .map(|term| format!("{}:*", term))
                .collect::<Vec<_>>()
                .join(" | ");
            builder
                .push(" AND ")
                .push(SEARCH_DOCUMENT)
                .push(" @@ to_tsquery('simple', ")
                .push_bind(query)
                .push(")");
        }
    }
}

/// Appends `, column = value` for fields present in a partial update.
fn push_assignment<'a, T>(builder: &mut QueryBuilder<'a, Postgres>, column: &str, field: &OptionField<T>)
where
    T: Clone + Send + 'a + Encode<'a, Postgres> + Type<Postgres>,
{
    match field {
        OptionField::Unchanged => {}
        OptionField::SetToNull => {
            builder.push(format!(", {} = NULL", column));
        }
        OptionField::SetToValue(value) => {
            builder.push(format!(", {} = ", column)).push_bind(value.clone());
        }
    }
}

#[async_trait]
impl ProjectRepository for SqlxRepo {
    async fn create_project(&self, project: &Project) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (
                id, title, description, technologies, image, live_url, github_url,
                status, category, difficulty, featured, completion_date, tags,
                views, likes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.technologies)
        .bind(&project.image)
        .bind(&project.live_url)
        .bind(&project.github_url)
        .bind(project.status.as_str())
        .bind(project.category.as_str())
        .bind(project.difficulty.as_str())
        .bind(project.featured)
        .bind(project.completion_date)
        .bind(&project.tags)
        .bind(project.views)
        .bind(project.likes)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_projects(&self, filter: &ProjectFilter, page: &PageRequest) -> Result<Vec<Project>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM projects WHERE TRUE");
        push_project_filters(&mut builder, filter);

        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(page.limit as i64);
        builder.push(" OFFSET ").push_bind(page.offset());

        let rows: Vec<ProjectRow> = builder
            .build_query_as::<ProjectRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn count_projects(&self, filter: &ProjectFilter) -> Result<i64, AppError> {
        // Same filter predicate as listing
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM projects WHERE TRUE");
        push_project_filters(&mut builder, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn list_featured_projects(&self, limit: u32) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT * FROM projects
            WHERE featured = TRUE
            ORDER BY created_at DESC
            LIMIT $1
            "#
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn update_project(&self, id: &Uuid, update: &UpdateProjectRequest) -> Result<Project, AppError> {
        let mut builder = QueryBuilder::new("UPDATE projects SET updated_at = NOW()");

        push_assignment(&mut builder, "title", &update.title);
        push_assignment(&mut builder, "description", &update.description);
        push_assignment(&mut builder, "technologies", &update.technologies);
        push_assignment(&mut builder, "image", &update.image);
        push_assignment(&mut builder, "live_url", &update.live_url);
        push_assignment(&mut builder, "github_url", &update.github_url);
        push_assignment(&mut builder, "status", &update.status.clone().map_value(|s| s.as_str()));
        push_assignment(&mut builder, "featured", &update.featured);
        push_assignment(&mut builder, "category", &update.category.clone().map_value(|c| c.as_str()));
        push_assignment(&mut builder, "difficulty", &update.difficulty.clone().map_value(|d| d.as_str()));
        push_assignment(&mut builder, "completion_date", &update.completion_date);
        push_assignment(&mut builder, "tags", &update.tags);

        builder.push(" WHERE id = ").push_bind(*id);
        builder.push(" RETURNING *");

        let row = builder
            .build_query_as::<ProjectRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)?;

        row.try_into()
    }

    async fn increment_views(&self, id: &Uuid) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects
            SET views = views + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)?;

        row.try_into()
    }

    async fn increment_likes(&self, id: &Uuid) -> Result<i64, AppError> {
        let likes: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE projects
            SET likes = likes + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING likes
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        likes.ok_or_else(not_found)
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        Ok(())
    }

    async fn project_stats(&self) -> Result<ProjectStats, AppError> {
        let (total_projects, featured_projects, completed_projects, total_views, total_likes) =
            sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE featured),
                    COUNT(*) FILTER (WHERE status = 'Completed'),
                    COALESCE(SUM(views), 0)::BIGINT,
                    COALESCE(SUM(likes), 0)::BIGINT
                FROM projects
                "#
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(ProjectStats {
            total_projects,
            featured_projects,
            completed_projects,
            total_views,
            total_likes,
        })
    }
}
