use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const DEFAULT_PROJECT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_CONTACT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Featured projects shown on the landing page.
pub const FEATURED_PROJECTS_LIMIT: u32 = 6;

/// Submissions listed in the contact stats overview.
pub const RECENT_CONTACTS_LIMIT: u32 = 5;
