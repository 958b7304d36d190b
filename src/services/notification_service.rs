//! Best-effort confirmation mail sent after a record is created.
//!
//! Sensitive identifiers are masked before rendering. Every failure is logged
//! and reported as `false`; nothing here can fail the record operation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use handlebars::Handlebars;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::common::get_handlebars;
use crate::errors::NotificationError;
use crate::vle_types::VleRecord;

const TEXT_TEMPLATE: &str = include_str!("../../templates/email_confirmation.txt.hbs");
const HTML_TEMPLATE: &str = include_str!("../../templates/email_confirmation.html.hbs");

pub const DEFAULT_SUBJECT: &str = "Employee Details Submission Confirmation";
const NOT_PROVIDED: &str = "Not provided";

/// SMTP submission settings
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub admin_bcc: Option<String>,
    pub subject: String,
    pub timeout: Duration,
}

/// A fully rendered message ready for transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub bcc: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl OutboundEmail {
    /// Build a multipart/alternative message. The Bcc recipient is part of
    /// the envelope only.
    pub fn to_message(&self) -> Result<Message, NotificationError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .to(parse_mailbox(&self.to)?)
            .subject(self.subject.clone())
            .date_now();

        if let Some(bcc) = &self.bcc {
            builder = builder.bcc(parse_mailbox(bcc)?);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                self.text_body.clone(),
                self.html_body.clone(),
            ))
            .map_err(|e| NotificationError::Build(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| NotificationError::invalid_address(address, e))
}

/// Mail transport seam
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), NotificationError>;
}

/// STARTTLS SMTP submission
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, NotificationError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_server)
            .map_err(|e| NotificationError::Transport(e.to_string()))?
            .port(settings.smtp_port)
            .timeout(Some(settings.timeout));

        if let Some(username) = &settings.username {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                settings.password.clone().unwrap_or_default(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), NotificationError> {
        let message = email.to_message()?;
        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// `**** **** ` followed by the last four characters
pub fn mask_aadhar(aadhar: &str) -> String {
    match last_chars(aadhar, 4) {
        Some(tail) => format!("**** **** {}", tail),
        None => NOT_PROVIDED.to_string(),
    }
}

/// First two and last two characters kept, middle replaced
pub fn mask_pan(pan: &str) -> String {
    let pan = pan.trim();
    if pan.chars().count() < 4 {
        return NOT_PROVIDED.to_string();
    }
    let head: String = pan.chars().take(2).collect();
    let tail = last_chars(pan, 2).unwrap_or_default();
    format!("{}*****{}", head, tail)
}

/// `****` followed by the last four characters
pub fn mask_account(account: &str) -> String {
    match last_chars(account, 4) {
        Some(tail) => format!("****{}", tail),
        None => NOT_PROVIDED.to_string(),
    }
}

fn last_chars(value: &str, n: usize) -> Option<String> {
    let value = value.trim();
    let count = value.chars().count();
    if count < 4 {
        return None;
    }
    Some(value.chars().skip(count - n).collect())
}

/// Renders and sends confirmation mail
pub struct NotificationDispatcher {
    mailer: Option<Arc<dyn Mailer>>,
    from: String,
    admin_bcc: Option<String>,
    subject: String,
    templates: Handlebars<'static>,
}

impl NotificationDispatcher {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        from: impl Into<String>,
        admin_bcc: Option<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            mailer: Some(mailer),
            from: from.into(),
            admin_bcc: admin_bcc.filter(|bcc| !bcc.trim().is_empty()),
            subject: subject.into(),
            templates: get_handlebars(),
        }
    }

    /// A dispatcher that never sends
    pub fn disabled() -> Self {
        Self {
            mailer: None,
            from: String::new(),
            admin_bcc: None,
            subject: DEFAULT_SUBJECT.to_string(),
            templates: get_handlebars(),
        }
    }

    /// SMTP-backed dispatcher, or a disabled one when mail is not configured
    /// or the transport cannot be built.
    pub fn from_settings(settings: Option<&MailSettings>) -> Self {
        let Some(settings) = settings else {
            info!("Mail settings not configured, confirmation mail disabled");
            return Self::disabled();
        };

        match SmtpMailer::new(settings) {
            Ok(mailer) => {
                info!(
                    "Confirmation mail enabled via {}:{}",
                    settings.smtp_server, settings.smtp_port
                );
                Self::new(
                    Arc::new(mailer),
                    settings.from.clone(),
                    settings.admin_bcc.clone(),
                    settings.subject.clone(),
                )
            }
            Err(e) => {
                error!("Failed to set up SMTP transport, confirmation mail disabled: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    /// The record as shown in mail: identifiers masked, optional values filled in
    pub fn masked_view(record: &VleRecord) -> Value {
        json!({
            "vle_type": record.vle_type.as_str(),
            "csc_id": record.csc_id,
            "division": record.division,
            "district": record.district,
            "block": record.block,
            "grampanchayat": record.grampanchayat,
            "lgd_code": record.lgd_code,
            "first_name": record.first_name,
            "father_name": record.father_name,
            "mother_name": record.mother_name,
            "surname": record.surname,
            "dob": record.dob.format("%Y-%m-%d").to_string(),
            "blood_group": record.blood_group,
            "gender": record.gender,
            "marital_status": record.marital_status,
            "spouse_name": record.spouse_name,
            "num_children": record.num_children,
            "anniversary_date": record
                .anniversary_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            "religion": record.religion,
            "category": record.category,
            "caste": record.caste,
            "education": record.education,
            "institute_name": record.institute_name,
            "cibil_score": record.cibil_score,
            "contact_number": record.contact_number,
            "whatsapp_number": record.whatsapp_number,
            "email": record.email,
            "permanent_address": record.permanent_address,
            "current_address": record
                .current_address
                .clone()
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
            "pan_number": mask_pan(&record.pan_number),
            "aadhar_number": mask_aadhar(&record.aadhar_number),
            "bank_name": record.bank_name,
            "ifsc_code": record.ifsc_code,
            "account_number": mask_account(&record.account_number),
            "branch_name": record.branch_name,
        })
    }

    /// Plain-text and HTML bodies
    pub fn render(&self, record: &VleRecord) -> Result<(String, String), NotificationError> {
        let view = Self::masked_view(record);
        let text = self.templates.render_template(TEXT_TEMPLATE, &view)?;
        let html = self.templates.render_template(HTML_TEMPLATE, &view)?;
        Ok((text, html))
    }

    pub fn compose(&self, recipient: &str, record: &VleRecord) -> Result<OutboundEmail, NotificationError> {
        let (text_body, html_body) = self.render(record)?;
        Ok(OutboundEmail {
            from: self.from.clone(),
            to: recipient.trim().to_string(),
            bcc: self.admin_bcc.clone(),
            subject: self.subject.clone(),
            text_body,
            html_body,
        })
    }

    /// Render and send; `true` only when the transport accepted the message.
    pub async fn notify(&self, recipient: &str, record: &VleRecord) -> bool {
        let Some(mailer) = &self.mailer else {
            debug!("Confirmation mail disabled, skipping {}", record.csc_id);
            return false;
        };

        let email = match self.compose(recipient, record) {
            Ok(email) => email,
            Err(e) => {
                warn!("Failed to prepare confirmation mail for {}: {}", record.csc_id, e);
                return false;
            }
        };

        match mailer.send(&email).await {
            Ok(()) => {
                info!("Confirmation mail sent for {}", record.csc_id);
                true
            }
            Err(e) => {
                error!("Error sending confirmation mail for {}: {}", record.csc_id, e);
                false
            }
        }
    }

    /// Send on a detached task so the caller never waits on the mail server.
    pub fn dispatch(self: &Arc<Self>, recipient: String, record: VleRecord) -> JoinHandle<bool> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            let sent = dispatcher.notify(&recipient, &record).await;
            if !sent && dispatcher.is_enabled() {
                warn!("Email sending failed but record {} was saved", record.csc_id);
            }
            sent
        })
    }
}
