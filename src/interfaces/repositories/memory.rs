use std::{
    cmp::Reverse,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::{
    entities::{
        contact::{Contact, ContactFilter, ContactStats, ContactStatus, PriorityCount, RecentContact},
        pagination::PageRequest,
        project::{Project, ProjectFilter, ProjectStats, ProjectStatus, UpdateProjectRequest},
    },
    errors::AppError,
    repositories::{contact::ContactRepository, project::ProjectRepository},
};

/// Record plus its insertion sequence, which orders records created
/// within the same clock tick.
#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    record: T,
}

/// In-process Data Store Adapter.
///
/// Every mutation of a single record happens under that entry's shard lock,
/// so counter increments never lose updates.
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: DashMap<Uuid, Stored<Project>>,
    contacts: DashMap<Uuid, Stored<Contact>>,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}

/// Newest first: creation time, then insertion order.
fn newest_first<T, F>(map: &DashMap<Uuid, Stored<T>>, keep: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
    Stored<T>: HasCreatedAt,
{
    let mut records: Vec<Stored<T>> = map
        .iter()
        .filter(|entry| keep(&entry.value().record))
        .map(|entry| entry.value().clone())
        .collect();
    records.sort_by_key(|stored| Reverse((stored.created_at(), stored.seq)));
    records.into_iter().map(|stored| stored.record).collect()
}

fn page_of<T>(records: Vec<T>, page: &PageRequest) -> Vec<T> {
    records
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect()
}

trait HasCreatedAt {
    fn created_at(&self) -> DateTime<Utc>;
}

impl HasCreatedAt for Stored<Project> {
    fn created_at(&self) -> DateTime<Utc> {
        self.record.created_at
    }
}

impl HasCreatedAt for Stored<Contact> {
    fn created_at(&self) -> DateTime<Utc> {
        self.record.created_at
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn create_project(&self, project: &Project) -> Result<Project, AppError> {
        let stored = Stored { seq: self.next_seq(), record: project.clone() };
        self.projects.insert(project.id, stored);
        Ok(project.clone())
    }

    async fn list_projects(&self, filter: &ProjectFilter, page: &PageRequest) -> Result<Vec<Project>, AppError> {
        Ok(page_of(newest_first(&self.projects, |p| filter.matches(p)), page))
    }

    async fn count_projects(&self, filter: &ProjectFilter) -> Result<i64, AppError> {
        let count = self
            .projects
            .iter()
            .filter(|entry| filter.matches(&entry.value().record))
            .count();
        Ok(count as i64)
    }

    async fn list_featured_projects(&self, limit: u32) -> Result<Vec<Project>, AppError> {
        let mut featured = newest_first(&self.projects, |p| p.featured);
        featured.truncate(limit as usize);
        Ok(featured)
    }

    async fn update_project(&self, id: &Uuid, update: &UpdateProjectRequest) -> Result<Project, AppError> {
        let mut entry = self.projects.get_mut(id).ok_or_else(project_not_found)?;
        entry.record.apply_update(update, Utc::now());
        Ok(entry.record.clone())
    }

    async fn increment_views(&self, id: &Uuid) -> Result<Project, AppError> {
        let mut entry = self.projects.get_mut(id).ok_or_else(project_not_found)?;
        entry.record.views += 1;
        entry.record.updated_at = Utc::now();
        Ok(entry.record.clone())
    }

    async fn increment_likes(&self, id: &Uuid) -> Result<i64, AppError> {
        let mut entry = self.projects.get_mut(id).ok_or_else(project_not_found)?;
        entry.record.likes += 1;
        entry.record.updated_at = Utc::now();
        Ok(entry.record.likes)
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        self.projects
            .remove(id)
            .map(|_| ())
            .ok_or_else(project_not_found)
    }

    async fn project_stats(&self) -> Result<ProjectStats, AppError> {
        let stats = self.projects.iter().fold(ProjectStats::default(), |mut stats, entry| {
            let project = &entry.value().record;
            stats.total_projects += 1;
            stats.featured_projects += project.featured as i64;
            stats.completed_projects += (project.status == ProjectStatus::Completed) as i64;
            stats.total_views += project.views;
            stats.total_likes += project.likes;
            stats
        });
        Ok(stats)
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create_contact(&self, contact: &Contact) -> Result<Contact, AppError> {
        let stored = Stored { seq: self.next_seq(), record: contact.clone() };
        self.contacts.insert(contact.id, stored);
        Ok(contact.clone())
    }

    async fn get_contact_by_id(&self, id: &Uuid) -> Result<Contact, AppError> {
        self.contacts
            .get(id)
            .map(|entry| entry.record.clone())
            .ok_or_else(contact_not_found)
    }

    async fn list_contacts(&self, filter: &ContactFilter, page: &PageRequest) -> Result<Vec<Contact>, AppError> {
        Ok(page_of(newest_first(&self.contacts, |c| filter.matches(c)), page))
    }

    async fn count_contacts(&self, filter: &ContactFilter) -> Result<i64, AppError> {
        let count = self
            .contacts
            .iter()
            .filter(|entry| filter.matches(&entry.value().record))
            .count();
        Ok(count as i64)
    }

    async fn update_contact_status(
        &self,
        id: &Uuid,
        status: ContactStatus,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Contact, AppError> {
        let mut entry = self.contacts.get_mut(id).ok_or_else(contact_not_found)?;
        entry.record.transition(status, notes, now);
        Ok(entry.record.clone())
    }

    async fn delete_contact(&self, id: &Uuid) -> Result<(), AppError> {
        self.contacts
            .remove(id)
            .map(|_| ())
            .ok_or_else(contact_not_found)
    }

    async fn contact_stats(&self, recent_limit: u32) -> Result<ContactStats, AppError> {
        let contacts = newest_first(&self.contacts, |_| true);

        let count_status = |status: ContactStatus| {
            contacts.iter().filter(|c| c.status == status).count() as i64
        };

        let mut priority_breakdown: Vec<PriorityCount> = Vec::new();
        for contact in &contacts {
            match priority_breakdown.iter_mut().find(|entry| entry.priority == contact.priority) {
                Some(entry) => entry.count += 1,
                None => priority_breakdown.push(PriorityCount { priority: contact.priority, count: 1 }),
            }
        }
        priority_breakdown.sort_by_key(|entry| entry.priority);

        Ok(ContactStats {
            total_contacts: contacts.len() as i64,
            new_contacts: count_status(ContactStatus::New),
            replied_contacts: count_status(ContactStatus::Replied),
            archived_contacts: count_status(ContactStatus::Archived),
            priority_breakdown,
            recent_contacts: contacts
                .iter()
                .take(recent_limit as usize)
                .map(RecentContact::from)
                .collect(),
        })
    }
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

fn contact_not_found() -> AppError {
    AppError::NotFound("Contact not found".into())
}
