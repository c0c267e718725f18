use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{
        contact::{
            Contact, ContactFilter, ContactPriority, ContactRow, ContactStats, ContactStatus,
            PriorityCount, RecentContact,
        },
        pagination::PageRequest,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxRepo,
};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact(&self, contact: &Contact) -> Result<Contact, AppError>;
    async fn get_contact_by_id(&self, id: &Uuid) -> Result<Contact, AppError>;
    async fn list_contacts(&self, filter: &ContactFilter, page: &PageRequest) -> Result<Vec<Contact>, AppError>;
    async fn count_contacts(&self, filter: &ContactFilter) -> Result<i64, AppError>;
    /// Sets the status in one statement; `replied_at` is only stamped when
    /// still empty and the new status is Replied.
    async fn update_contact_status(
        &self,
        id: &Uuid,
        status: ContactStatus,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Contact, AppError>;
    async fn delete_contact(&self, id: &Uuid) -> Result<(), AppError>;
    async fn contact_stats(&self, recent_limit: u32) -> Result<ContactStats, AppError>;
}

#[async_trait]
impl<T: ContactRepository + ?Sized> ContactRepository for Arc<T> {
    async fn create_contact(&self, contact: &Contact) -> Result<Contact, AppError> {
        (**self).create_contact(contact).await
    }

    async fn get_contact_by_id(&self, id: &Uuid) -> Result<Contact, AppError> {
        (**self).get_contact_by_id(id).await
    }

    async fn list_contacts(&self, filter: &ContactFilter, page: &PageRequest) -> Result<Vec<Contact>, AppError> {
        (**self).list_contacts(filter, page).await
    }

    async fn count_contacts(&self, filter: &ContactFilter) -> Result<i64, AppError> {
        (**self).count_contacts(filter).await
    }

    async fn update_contact_status(
        &self,
        id: &Uuid,
        status: ContactStatus,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Contact, AppError> {
        (**self).update_contact_status(id, status, notes, now).await
    }

    async fn delete_contact(&self, id: &Uuid) -> Result<(), AppError> {
        (**self).delete_contact(id).await
    }

    async fn contact_stats(&self, recent_limit: u32) -> Result<ContactStats, AppError> {
        (**self).contact_stats(recent_limit).await
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Contact not found".into())
}

/// Escapes LIKE wildcards so the search text matches literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_contact_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ContactFilter) {
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(priority) = filter.priority {
        builder.push(" AND priority = ").push_bind(priority.as_str());
    }
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder.push(" AND (name ILIKE ").push_bind(pattern.clone());
        builder.push(" OR email ILIKE ").push_bind(pattern.clone());
        builder.push(" OR subject ILIKE ").push_bind(pattern.clone());
        builder.push(" OR message ILIKE ").push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
impl ContactRepository for SqlxRepo {
    async fn create_contact(&self, contact: &Contact) -> Result<Contact, AppError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            INSERT INTO contacts (
                id, name, email, subject, message, status, priority,
                ip_address, user_agent, notes, replied_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#
        )
        .bind(contact.id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(contact.status.as_str())
        .bind(contact.priority.as_str())
        .bind(&contact.ip_address)
        .bind(&contact.user_agent)
        .bind(&contact.notes)
        .bind(contact.replied_at)
        .bind(contact.created_at)
        .bind(contact.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get_contact_by_id(&self, id: &Uuid) -> Result<Contact, AppError> {
        let row = sqlx::query_as::<_, ContactRow>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)?;

        row.try_into()
    }

    async fn list_contacts(&self, filter: &ContactFilter, page: &PageRequest) -> Result<Vec<Contact>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM contacts WHERE TRUE");
        push_contact_filters(&mut builder, filter);

        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(page.limit as i64);
        builder.push(" OFFSET ").push_bind(page.offset());

        let rows: Vec<ContactRow> = builder
            .build_query_as::<ContactRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Contact::try_from).collect()
    }

    async fn count_contacts(&self, filter: &ContactFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM contacts WHERE TRUE");
        push_contact_filters(&mut builder, filter);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update_contact_status(
        &self,
        id: &Uuid,
        status: ContactStatus,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Contact, AppError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            UPDATE contacts SET
                status = $1,
                notes = COALESCE($2, notes),
                replied_at = CASE
                    WHEN $1 = 'Replied' THEN COALESCE(replied_at, $3)
                    ELSE replied_at
                END,
                updated_at = $3
            WHERE id = $4
            RETURNING *
            "#
        )
        .bind(status.as_str())
        .bind(notes)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)?;

        row.try_into()
    }

    async fn delete_contact(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        Ok(())
    }

    async fn contact_stats(&self, recent_limit: u32) -> Result<ContactStats, AppError> {
        let (total_contacts, new_contacts, replied_contacts, archived_contacts) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'New'),
                    COUNT(*) FILTER (WHERE status = 'Replied'),
                    COUNT(*) FILTER (WHERE status = 'Archived')
                FROM contacts
                "#
            )
            .fetch_one(&self.pool)
            .await?;

        let grouped = sqlx::query_as::<_, (String, i64)>(
            "SELECT priority, COUNT(*) FROM contacts GROUP BY priority"
        )
        .fetch_all(&self.pool)
        .await?;

        let mut priority_breakdown = grouped
            .into_iter()
            .map(|(priority, count)| {
                priority
                    .parse::<ContactPriority>()
                    .map(|priority| PriorityCount { priority, count })
                    .map_err(|e| AppError::StorageError(format!("Stored contact is corrupt: {}", e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        priority_breakdown.sort_by_key(|entry| entry.priority);

        let recent = sqlx::query_as::<_, ContactRow>(
            "SELECT * FROM contacts ORDER BY created_at DESC LIMIT $1"
        )
        .bind(recent_limit as i64)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Contact::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(ContactStats {
            total_contacts,
            new_contacts,
            replied_contacts,
            archived_contacts,
            priority_breakdown,
            recent_contacts: recent.iter().map(RecentContact::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("ada"), "%ada%");
    }
}
