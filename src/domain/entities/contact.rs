use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{entities::labels::labelled_enum, errors::AppError};

labelled_enum! {
    ContactStatus("contact status") {
        New => "New",
        Replied => "Replied",
        Archived => "Archived",
    }
    default = New
}

labelled_enum! {
    ContactPriority("contact priority") {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
    default = Medium
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub priority: ContactPriority,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub notes: Option<String>,
    pub replied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ContactRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub priority: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub notes: Option<String>,
    pub replied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = AppError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let corrupt = |e: crate::entities::labels::UnknownLabel| {
            AppError::StorageError(format!("Stored contact {} is corrupt: {}", row.id, e))
        };

        Ok(Contact {
            status: row.status.parse().map_err(corrupt)?,
            priority: row.priority.parse().map_err(corrupt)?,
            id: row.id,
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            notes: row.notes,
            replied_at: row.replied_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Contact {
    /// Moves the contact to `status`. `repliedAt` is stamped the first time
    /// the contact becomes Replied and is kept afterwards.
    pub fn transition(&mut self, status: ContactStatus, notes: Option<&str>, now: DateTime<Utc>) {
        self.status = status;
        if let Some(notes) = notes {
            self.notes = Some(notes.to_string());
        }
        if status == ContactStatus::Replied && self.replied_at.is_none() {
            self.replied_at = Some(now);
        }
        self.updated_at = now;
    }
}

/// Caller details captured with a submission.
#[derive(Debug, Clone, Default)]
pub struct RequestOrigin {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

// ───── Input & Validation Requests ────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewContactForm {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email must be a valid address")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 200, message = "Subject is required"))]
    pub subject: String,

    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

impl NewContactForm {
    pub fn normalized(self) -> Self {
        NewContactForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }

    pub fn into_contact(self, origin: RequestOrigin, now: DateTime<Utc>) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
            status: ContactStatus::New,
            priority: ContactPriority::default(),
            ip_address: origin.ip_address,
            user_agent: origin.user_agent,
            notes: None,
            replied_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateContactStatusRequest {
    pub status: ContactStatus,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplyRequest {
    #[validate(length(min = 1, max = 10000, message = "Reply message is required"))]
    pub reply_message: String,
}

// ───── Listing filters ────────────────────────────────────────────────

/// Raw query string of `GET /api/contact`.
#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
    pub search: Option<String>,
}

impl ContactFilter {
    pub fn from_query(query: &ContactListQuery) -> Result<Self, AppError> {
        let present = |value: &Option<String>| {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
        };

        let status = present(&query.status)
            .map(|s| s.parse::<ContactStatus>())
            .transpose()
            .map_err(|e| AppError::invalid_field("status", e.to_string()))?;
        let priority = present(&query.priority)
            .map(|s| s.parse::<ContactPriority>())
            .transpose()
            .map_err(|e| AppError::invalid_field("priority", e.to_string()))?;

        Ok(ContactFilter {
            status,
            priority,
            search: present(&query.search),
        })
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        if self.status.is_some_and(|s| s != contact.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != contact.priority) {
            return false;
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                [&contact.name, &contact.email, &contact.subject, &contact.message]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

// ───── API Response Models ────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmittedResponse {
    pub message: String,
    pub contact_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListResponse {
    pub contacts: Vec<Contact>,
    pub total_pages: i64,
    pub current_page: u32,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub contact: Contact,
}

#[derive(Debug, Serialize)]
pub struct ContactMutationResponse {
    pub message: String,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityCount {
    pub priority: ContactPriority,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentContact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Contact> for RecentContact {
    fn from(contact: &Contact) -> Self {
        RecentContact {
            id: contact.id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            subject: contact.subject.clone(),
            status: contact.status,
            created_at: contact.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
    pub total_contacts: i64,
    pub new_contacts: i64,
    pub replied_contacts: i64,
    pub archived_contacts: i64,
    pub priority_breakdown: Vec<PriorityCount>,
    pub recent_contacts: Vec<RecentContact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> Contact {
        NewContactForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: "Collaboration".into(),
            message: "Let's build a compiler".into(),
        }
        .into_contact(RequestOrigin::default(), Utc::now())
    }

    #[test]
    fn blank_fields_fail_validation_after_trimming() {
        let form = NewContactForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: "Hi".into(),
            message: "   ".into(),
        }
        .normalized();

        let err = AppError::from(form.validate().unwrap_err());
        assert!(matches!(err, AppError::ValidationError(ref f) if f.len() == 1 && f[0].field == "message"));
    }

    #[test]
    fn replied_at_is_stamped_once() {
        let mut contact = submission();
        let first = Utc::now();
        contact.transition(ContactStatus::Replied, None, first);
        assert_eq!(contact.replied_at, Some(first));

        let later = first + chrono::Duration::minutes(5);
        contact.transition(ContactStatus::Replied, Some("followed up"), later);
        assert_eq!(contact.replied_at, Some(first));
        assert_eq!(contact.notes.as_deref(), Some("followed up"));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let contact = submission();
        let filter = |needle: &str| ContactFilter { search: Some(needle.into()), ..Default::default() };

        assert!(filter("COMPILER").matches(&contact));
        assert!(filter("example.c").matches(&contact));
        assert!(!filter("kernel").matches(&contact));
    }
}
