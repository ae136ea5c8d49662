//! Staff notification dispatch over SMTP.
//!
//! Notifications are strictly best-effort and detached from the request
//! that triggered them: [`Notifier::dispatch`] renders the message and
//! spawns an untracked send task, then returns immediately. The submitter
//! never learns whether, or when, the notification went out.
//!
//! - SMTP unconfigured: dispatch is a no-op logged at `warn` (a normal
//!   startup state, not an error).
//! - Send failure: logged at `error` and discarded. No retry, no
//!   dead-letter. Process shutdown may abandon in-flight sends.

use std::fmt::Write as _;
use std::sync::Arc;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use tutorlane_core::{ContactMessage, DemoBooking, SubjectQuery};

use crate::config::SmtpConfig;

/// Errors that can occur when sending a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build the email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid sender or recipient address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// A rendered notification, ready to send.
#[derive(Debug, Clone)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Deep-link context available to notification bodies.
#[derive(Debug, Clone, Default)]
pub struct DeepLinks {
    /// Contact number for WhatsApp deep-links (digits only).
    pub whatsapp_number: String,
}

impl DeepLinks {
    /// WhatsApp chat link for the configured number, if any.
    #[must_use]
    pub fn whatsapp_url(&self) -> Option<String> {
        if self.whatsapp_number.trim().is_empty() {
            None
        } else {
            Some(format!("https://wa.me/{}", self.whatsapp_number.trim()))
        }
    }
}

/// A record that can render itself as a staff notification.
///
/// Rendering must be a pure function of the record: no mutation, no
/// re-reading from the store.
pub trait LeadNotification {
    fn notification(&self, links: &DeepLinks) -> Notification;
}

struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    to_address: String,
}

/// Fire-and-forget notification dispatcher.
#[derive(Clone)]
pub struct Notifier {
    mailer: Option<Arc<Mailer>>,
    links: DeepLinks,
}

impl Notifier {
    /// Build a notifier from optional SMTP configuration.
    ///
    /// A missing configuration produces a disabled notifier that logs and
    /// skips every dispatch.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay parameters are invalid.
    pub fn new(smtp: Option<&SmtpConfig>, links: DeepLinks) -> Result<Self, NotifyError> {
        let mailer = match smtp {
            Some(config) => {
                let credentials = Credentials::new(
                    config.username.clone(),
                    config.password.expose_secret().to_string(),
                );

                let transport =
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
                        .port(config.port)
                        .credentials(credentials)
                        .build();

                Some(Arc::new(Mailer {
                    transport,
                    from_address: config.from_address.clone(),
                    to_address: config.to_address.clone(),
                }))
            }
            None => None,
        };

        Ok(Self { mailer, links })
    }

    /// A notifier that skips every dispatch (tests, local development).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            mailer: None,
            links: DeepLinks::default(),
        }
    }

    /// Render and dispatch a notification for a freshly persisted record.
    ///
    /// Returns immediately; the send runs as a detached task. The caller
    /// must only invoke this after the record has been durably persisted.
    pub fn dispatch<R: LeadNotification>(&self, kind: &'static str, record: &R) {
        let notification = record.notification(&self.links);

        let Some(mailer) = self.mailer.clone() else {
            tracing::warn!(kind, "SMTP not configured, skipping staff notification");
            return;
        };

        tokio::spawn(async move {
            match mailer.send(&notification).await {
                Ok(()) => {
                    tracing::info!(kind, subject = %notification.subject, "Staff notification sent");
                }
                Err(e) => {
                    tracing::error!(kind, error = %e, "Failed to send staff notification");
                }
            }
        });
    }
}

impl Mailer {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(self
                .to_address
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(self.to_address.clone()))?)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())?;

        self.transport.send(email).await?;
        Ok(())
    }
}

/// Append a labeled line, skipping blank values.
fn push_field(body: &mut String, label: &str, value: &str) {
    if !value.trim().is_empty() {
        let _ = writeln!(body, "{label}: {value}");
    }
}

fn push_links(body: &mut String, links: &DeepLinks) {
    if let Some(url) = links.whatsapp_url() {
        let _ = writeln!(body, "\nReply on WhatsApp: {url}");
    }
}

impl LeadNotification for DemoBooking {
    fn notification(&self, links: &DeepLinks) -> Notification {
        let mut body = String::new();
        push_field(&mut body, "Name", &self.name);
        push_field(&mut body, "Email", &self.email);
        push_field(&mut body, "Phone", &self.phone);
        push_field(&mut body, "Grade level", &self.grade_level);
        push_field(&mut body, "Subject interest", &self.subject_interest);
        push_field(&mut body, "Preferred date", &self.preferred_date);
        push_field(&mut body, "Message", &self.message);
        let _ = writeln!(body, "Booked at: {}", self.created_at.to_rfc3339());
        push_links(&mut body, links);

        Notification {
            subject: format!("New demo booking from {}", self.name),
            body,
        }
    }
}

impl LeadNotification for SubjectQuery {
    fn notification(&self, links: &DeepLinks) -> Notification {
        let mut body = String::new();
        push_field(&mut body, "Name", &self.name);
        push_field(&mut body, "Email", &self.email);
        push_field(&mut body, "Phone", &self.phone);
        push_field(&mut body, "Subject", &self.subject);
        push_field(&mut body, "Query type", &self.query_type);
        push_field(&mut body, "Message", &self.message);
        push_links(&mut body, links);

        Notification {
            subject: format!("New {} query from {}", self.subject, self.name),
            body,
        }
    }
}

impl LeadNotification for ContactMessage {
    fn notification(&self, links: &DeepLinks) -> Notification {
        let mut body = String::new();
        push_field(&mut body, "Name", &self.name);
        push_field(&mut body, "Email", &self.email);
        push_field(&mut body, "Phone", &self.phone);
        push_field(&mut body, "Message", &self.message);
        push_links(&mut body, links);

        Notification {
            subject: format!("New contact message from {}", self.name),
            body,
        }
    }
}
