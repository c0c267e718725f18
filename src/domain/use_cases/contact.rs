use chrono::Utc;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    constants::{DEFAULT_CONTACT_PAGE_SIZE, RECENT_CONTACTS_LIMIT},
    entities::{
        contact::{
            Contact, ContactFilter, ContactListQuery, ContactListResponse, ContactStats,
            ContactStatus, ContactSubmittedResponse, NewContactForm, ReplyRequest, RequestOrigin,
            UpdateContactStatusRequest,
        },
        pagination::PageRequest,
    },
    errors::AppError,
    mail::{
        notifier::Notifier,
        templates::{reply_email, submission_notification},
    },
    repositories::contact::ContactRepository,
    utils::valid_uuid::valid_uuid,
};

const NOT_FOUND: &str = "Contact not found";

pub struct ContactHandler<R, N>
where
    R: ContactRepository,
    N: Notifier,
{
    pub contact_repo: R,
    pub notifier: N,
    /// Recipient of new-submission notifications.
    pub notify_to: Option<String>,
    /// Signature on replies.
    pub owner_name: String,
}

impl<R, N> ContactHandler<R, N>
where
    R: ContactRepository,
    N: Notifier,
{
    pub fn new(contact_repo: R, notifier: N, notify_to: Option<String>, owner_name: String) -> Self {
        ContactHandler {
            contact_repo,
            notifier,
            notify_to,
            owner_name,
        }
    }

    /// Stores a contact form submission, then tells the owner about it.
    ///
    /// The notification is best effort: a failed send is logged and the
    /// submission still succeeds.
    pub async fn submit_contact(
        &self,
        form: NewContactForm,
        origin: RequestOrigin,
    ) -> Result<ContactSubmittedResponse, AppError> {
        let form = form.normalized();
        form.validate()?;

        let now = Utc::now();
        let contact = self
            .contact_repo
            .create_contact(&form.into_contact(origin, now))
            .await?;

        info!(contact_id = %contact.id, "Contact submission stored");
        self.notify_owner(&contact).await;

        Ok(ContactSubmittedResponse {
            message: "Message sent successfully! I'll get back to you soon.".to_string(),
            contact_id: contact.id,
        })
    }

    async fn notify_owner(&self, contact: &Contact) {
        if !self.notifier.is_configured() {
            return;
        }
        let Some(to) = self.notify_to.as_deref() else {
            return;
        };

        let email = submission_notification(contact, to, contact.created_at);
        if let Err(e) = self.notifier.send(&email).await {
            warn!(contact_id = %contact.id, error = %e, "Contact notification failed");
        }
    }

    pub async fn list_contacts(&self, query: &ContactListQuery) -> Result<ContactListResponse, AppError> {
        let page = PageRequest::from_query(
            query.page.as_deref(),
            query.limit.as_deref(),
            DEFAULT_CONTACT_PAGE_SIZE,
        )?;
        let filter = ContactFilter::from_query(query)?;

        let contacts = self.contact_repo.list_contacts(&filter, &page).await?;
        let total = self.contact_repo.count_contacts(&filter).await?;

        Ok(ContactListResponse {
            contacts,
            total_pages: page.total_pages(total),
            current_page: page.page,
            total,
        })
    }

    pub async fn get_contact(&self, id: &str) -> Result<Contact, AppError> {
        let valid_id = valid_uuid(id, NOT_FOUND)?;
        self.contact_repo.get_contact_by_id(&valid_id).await
    }

    pub async fn update_status(
        &self,
        id: &str,
        request: UpdateContactStatusRequest,
    ) -> Result<Contact, AppError> {
        let valid_id = valid_uuid(id, NOT_FOUND)?;
        request.validate()?;

        self.contact_repo
            .update_contact_status(&valid_id, request.status, request.notes.as_deref(), Utc::now())
            .await
    }

    /// Emails the reply to the contact and marks it Replied once the mail
    /// API has accepted it.
    pub async fn reply_to_contact(&self, id: &str, request: ReplyRequest) -> Result<Contact, AppError> {
        let valid_id = valid_uuid(id, NOT_FOUND)?;
        let request = ReplyRequest { reply_message: request.reply_message.trim().to_string() };
        request.validate()?;

        let contact = self.contact_repo.get_contact_by_id(&valid_id).await?;

        if !self.notifier.is_configured() {
            return Err(AppError::ServiceUnavailable(
                "Email service is not configured".to_string(),
            ));
        }

        let email = reply_email(&contact, &request.reply_message, &self.owner_name);
        self.notifier.send(&email).await?;

        info!(contact_id = %contact.id, "Reply sent");
        self.contact_repo
            .update_contact_status(&valid_id, ContactStatus::Replied, None, Utc::now())
            .await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id, NOT_FOUND)?;
        self.contact_repo.delete_contact(&valid_id).await
    }

    pub async fn contact_stats(&self) -> Result<ContactStats, AppError> {
        self.contact_repo.contact_stats(RECENT_CONTACTS_LIMIT).await
    }
}
