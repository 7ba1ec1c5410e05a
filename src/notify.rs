use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info};

use crate::{
    config::SmtpConfig,
    sanitize,
    store::{AdventureSubmission, ContactSubmission},
};

/// Rendered notification ready for a transport.
#[derive(Debug, Clone)]
pub struct Outgoing {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Outcome of a send attempt. Notification is best-effort, so transports
/// report failure here instead of returning an error.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub success: bool,
    pub message: String,
    /// Set by the logging fallback so the pipeline stays inspectable
    /// without real SMTP credentials.
    pub preview: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: Outgoing) -> Delivery;
}

/// Real SMTP delivery via lettre.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            from: config.from.parse()?,
            to: config.to.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: Outgoing) -> Delivery {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(&mail.subject)
            .multipart(MultiPart::alternative_plain_html(
                mail.text.clone(),
                mail.html.clone(),
            ));

        let message = match message {
            Ok(m) => m,
            Err(e) => {
                error!(error = %e, "failed to build notification message");
                return Delivery {
                    success: false,
                    message: format!("message build failed: {e}"),
                    preview: None,
                };
            }
        };

        match self.transport.send(message).await {
            Ok(_) => {
                info!(subject = %mail.subject, "notification sent");
                Delivery {
                    success: true,
                    message: "sent".into(),
                    preview: None,
                }
            }
            Err(e) => {
                error!(error = %e, subject = %mail.subject, "smtp send failed");
                Delivery {
                    success: false,
                    message: format!("smtp send failed: {e}"),
                    preview: None,
                }
            }
        }
    }
}

/// Fallback transport used when SMTP is not configured: logs the rendered
/// message so local development can inspect what would have been sent.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Outgoing) -> Delivery {
        info!(subject = %mail.subject, body = %mail.text, "smtp not configured, logging notification");
        Delivery {
            success: true,
            message: "logged (smtp not configured)".into(),
            preview: Some(format!("log://notification/{}", mail.subject)),
        }
    }
}

fn html_row(label: &str, value: &str) -> String {
    // Fields were sanitized before persistence; cleaning again at render
    // time keeps the renderer safe on its own.
    let value = sanitize::clean(Some(value));
    format!("<tr><td><strong>{label}</strong></td><td>{value}</td></tr>")
}

fn text_row(label: &str, value: &str) -> String {
    format!("{label}: {}\n", sanitize::clean(Some(value)))
}

pub fn contact_email(record: &ContactSubmission) -> Outgoing {
    let name = format!("{} {}", record.first_name, record.last_name);
    let interests = record.interests.join(", ");

    let mut text = String::new();
    text.push_str("New contact inquiry\n\n");
    text.push_str(&text_row("Name", &name));
    text.push_str(&text_row("Email", &record.email));
    text.push_str(&text_row("Phone", record.phone.as_deref().unwrap_or("-")));
    text.push_str(&text_row(
        "Preferred visit date",
        record.visit_date.as_deref().unwrap_or("-"),
    ));
    text.push_str(&text_row("Interests", &interests));
    text.push_str(&text_row(
        "Message",
        record.message.as_deref().unwrap_or("-"),
    ));

    let html = format!(
        "<h2>New contact inquiry</h2><table>{}{}{}{}{}{}</table>",
        html_row("Name", &name),
        html_row("Email", &record.email),
        html_row("Phone", record.phone.as_deref().unwrap_or("-")),
        html_row(
            "Preferred visit date",
            record.visit_date.as_deref().unwrap_or("-")
        ),
        html_row("Interests", &interests),
        html_row("Message", record.message.as_deref().unwrap_or("-")),
    );

    Outgoing {
        subject: format!("Contact inquiry #{} from {name}", record.id),
        text,
        html,
    }
}

pub fn adventure_email(record: &AdventureSubmission) -> Outgoing {
    let name = format!("{} {}", record.first_name, record.last_name);
    let dates = format!(
        "{} - {}",
        record.start_date.as_deref().unwrap_or("-"),
        record.end_date.as_deref().unwrap_or("-"),
    );

    let mut text = String::new();
    text.push_str("New adventure package request\n\n");
    text.push_str(&text_row("Name", &name));
    text.push_str(&text_row("Email", &record.email));
    text.push_str(&text_row("Phone", record.phone.as_deref().unwrap_or("-")));
    text.push_str(&text_row("Dates", &dates));
    text.push_str(&text_row("Departure airport", &record.departure_airport));
    text.push_str(&text_row("Group size", &record.group_size.to_string()));
    text.push_str(&text_row("Packages", &record.package_ids.join(", ")));
    text.push_str(&text_row("Accommodations", &record.accommodation_ids.join(", ")));
    text.push_str(&text_row("Activities", &record.activity_ids.join(", ")));
    text.push_str(&text_row(
        "Additional requests",
        record.additional_requests.as_deref().unwrap_or("-"),
    ));
    text.push_str(&text_row("Language", &record.language));

    let html = format!(
        "<h2>New adventure package request</h2><table>{}{}{}{}{}{}{}{}{}{}{}</table>",
        html_row("Name", &name),
        html_row("Email", &record.email),
        html_row("Phone", record.phone.as_deref().unwrap_or("-")),
        html_row("Dates", &dates),
        html_row("Departure airport", &record.departure_airport),
        html_row("Group size", &record.group_size.to_string()),
        html_row("Packages", &record.package_ids.join(", ")),
        html_row("Accommodations", &record.accommodation_ids.join(", ")),
        html_row("Activities", &record.activity_ids.join(", ")),
        html_row(
            "Additional requests",
            record.additional_requests.as_deref().unwrap_or("-")
        ),
        html_row("Language", &record.language),
    );

    Outgoing {
        subject: format!("Adventure request #{} from {name}", record.id),
        text,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn contact_record() -> ContactSubmission {
        ContactSubmission {
            id: 1,
            first_name: "Anna".into(),
            last_name: "Svensson".into(),
            email: "anna@example.com".into(),
            phone: None,
            visit_date: Some("2026-12-01".into()),
            interests: vec!["snowmobile-tour".into(), "aurora".into()],
            message: Some("Looking forward to it".into()),
            submitted_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn contact_email_carries_all_fields() {
        let mail = contact_email(&contact_record());
        assert!(mail.subject.contains("#1"));
        assert!(mail.text.contains("anna@example.com"));
        assert!(mail.text.contains("snowmobile-tour, aurora"));
        assert!(mail.html.contains("<h2>New contact inquiry</h2>"));
    }

    #[test]
    fn script_content_never_reaches_the_html_body() {
        let mut record = contact_record();
        record.message = Some("<script>alert('x')</script>".into());
        let mail = contact_email(&record);
        assert!(!mail.html.contains("<script>"));
    }

    #[tokio::test]
    async fn log_mailer_reports_preview() {
        let delivery = LogMailer.send(contact_email(&contact_record())).await;
        assert!(delivery.success);
        assert!(delivery.preview.is_some());
    }
}
