use async_trait::async_trait;
use mockall::mock;
use portfolio_api::{
    entities::contact::{ContactStatus, NewContactForm, ReplyRequest, RequestOrigin},
    errors::AppError,
    mail::notifier::{Notifier, NotifyError, OutgoingEmail},
    repositories::{contact::ContactRepository, memory::MemoryStore},
    use_cases::contact::ContactHandler,
};
use std::sync::Arc;

mock! {
    pub Mailer {}

    #[async_trait]
    impl Notifier for Mailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError>;
        fn is_configured(&self) -> bool;
    }
}

fn form() -> NewContactForm {
    NewContactForm {
        name: "  Ada Lovelace ".into(),
        email: "ada@example.com".into(),
        subject: "Analytical engine".into(),
        message: "Can it compute Bernoulli numbers?".into(),
    }
}

fn handler(store: Arc<MemoryStore>, mailer: MockMailer) -> ContactHandler<Arc<MemoryStore>, MockMailer> {
    ContactHandler::new(store, mailer, Some("owner@example.com".into()), "Owner".into())
}

#[tokio::test]
async fn submission_survives_a_failed_notification() {
    let store = Arc::new(MemoryStore::new());
    let mut mailer = MockMailer::new();
    mailer.expect_is_configured().return_const(true);
    mailer
        .expect_send()
        .withf(|email: &OutgoingEmail| email.to == "owner@example.com")
        .times(1)
        .returning(|_| Err(NotifyError::Transport("timeout".into())));

    let response = handler(store.clone(), mailer)
        .submit_contact(form(), RequestOrigin::default())
        .await
        .unwrap();

    let stored = store.get_contact_by_id(&response.contact_id).await.unwrap();
    assert_eq!(stored.name, "Ada Lovelace");
    assert_eq!(stored.status, ContactStatus::New);
}

#[tokio::test]
async fn submission_skips_notification_without_mail() {
    let store = Arc::new(MemoryStore::new());
    let mut mailer = MockMailer::new();
    mailer.expect_is_configured().return_const(false);
    mailer.expect_send().never();

    let result = handler(store, mailer)
        .submit_contact(form(), RequestOrigin::default())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn invalid_submission_never_reaches_the_store_or_mailer() {
    let store = Arc::new(MemoryStore::new());
    let mut mailer = MockMailer::new();
    mailer.expect_is_configured().return_const(true);
    mailer.expect_send().never();

    let mut bad = form();
    bad.subject = "".into();
    let err = handler(store.clone(), mailer)
        .submit_contact(bad, RequestOrigin::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
    let stats = store.contact_stats(5).await.unwrap();
    assert_eq!(stats.total_contacts, 0);
}

#[tokio::test]
async fn reply_delivery_failure_leaves_contact_untouched() {
    let store = Arc::new(MemoryStore::new());
    let mut mailer = MockMailer::new();
    mailer.expect_is_configured().return_const(true);
    mailer
        .expect_send()
        .withf(|email: &OutgoingEmail| email.to == "owner@example.com")
        .returning(|_| Ok(()));
    mailer
        .expect_send()
        .withf(|email: &OutgoingEmail| email.to == "ada@example.com")
        .times(1)
        .returning(|_| Err(NotifyError::Rejected { status: 401, body: "bad key".into() }));

    let handler = handler(store.clone(), mailer);
    let id = handler
        .submit_contact(form(), RequestOrigin::default())
        .await
        .unwrap()
        .contact_id;

    let err = handler
        .reply_to_contact(&id.to_string(), ReplyRequest { reply_message: "Yes".into() })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DeliveryError(_)));
    let stored = store.get_contact_by_id(&id).await.unwrap();
    assert_eq!(stored.status, ContactStatus::New);
    assert!(stored.replied_at.is_none());
}

#[tokio::test]
async fn reply_marks_contact_replied() {
    let store = Arc::new(MemoryStore::new());
    let mut mailer = MockMailer::new();
    mailer.expect_is_configured().return_const(true);
    mailer
        .expect_send()
        .withf(|email: &OutgoingEmail| email.to == "owner@example.com")
        .returning(|_| Ok(()));
    mailer
        .expect_send()
        .withf(|email: &OutgoingEmail| {
            email.to == "ada@example.com" && email.subject == "Re: Analytical engine"
        })
        .times(1)
        .returning(|_| Ok(()));

    let handler = handler(store, mailer);
    let id = handler
        .submit_contact(form(), RequestOrigin::default())
        .await
        .unwrap()
        .contact_id;

    let contact = handler
        .reply_to_contact(&id.to_string(), ReplyRequest { reply_message: " It can. ".into() })
        .await
        .unwrap();

    assert_eq!(contact.status, ContactStatus::Replied);
    assert!(contact.replied_at.is_some());
}

#[tokio::test]
async fn reply_to_unknown_contact_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let mut mailer = MockMailer::new();
    mailer.expect_is_configured().return_const(true);
    mailer.expect_send().never();

    let err = handler(store, mailer)
        .reply_to_contact(&uuid::Uuid::new_v4().to_string(), ReplyRequest { reply_message: "Hi".into() })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}
