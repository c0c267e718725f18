use ammonia::clean_text;
use chrono::{DateTime, Utc};

use crate::{entities::contact::Contact, mail::notifier::OutgoingEmail};

/// Escapes user text for an HTML body and keeps its line breaks.
fn escape_multiline(text: &str) -> String {
    text.lines().map(clean_text).collect::<Vec<_>>().join("<br>")
}

/// Tells the site owner about a new contact form submission.
pub fn submission_notification(contact: &Contact, to: &str, received_at: DateTime<Utc>) -> OutgoingEmail {
    let html_body = format!(
        "<h2>New Contact Form Submission</h2>\
         <p><strong>Name:</strong> {name}</p>\
         <p><strong>Email:</strong> {email}</p>\
         <p><strong>Subject:</strong> {subject}</p>\
         <p><strong>Message:</strong></p>\
         <p>{message}</p>\
         <hr>\
         <p><small>Submitted on: {received}</small></p>",
        name = clean_text(&contact.name),
        email = clean_text(&contact.email),
        subject = clean_text(&contact.subject),
        message = escape_multiline(&contact.message),
        received = received_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: format!("New Contact Form Submission: {}", contact.subject),
        html_body,
    }
}

/// The owner's reply, sent to the address the contact left.
pub fn reply_email(contact: &Contact, reply_message: &str, owner_name: &str) -> OutgoingEmail {
    let html_body = format!(
        "<p>Dear {name},</p>\
         <p>Thank you for reaching out to me. Here's my response:</p>\
         <div style=\"background-color: #f5f5f5; padding: 15px; margin: 15px 0; border-left: 4px solid #007bff;\">\
         {reply}\
         </div>\
         <p>Best regards,<br>{owner}</p>\
         <hr>\
         <p><small>This is an automated response to your message: \"{subject}\"</small></p>",
        name = clean_text(&contact.name),
        reply = escape_multiline(reply_message),
        owner = clean_text(owner_name),
        subject = clean_text(&contact.subject),
    );

    OutgoingEmail {
        to: contact.email.clone(),
        subject: format!("Re: {}", contact.subject),
        html_body,
    }
}
