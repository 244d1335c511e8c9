use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::AssessmentSubmission;
use super::report::ReportDocument;
use super::scoring::ScoreResult;
use crate::config::SmtpSettings;

pub const NOTIFICATION_SUBJECT: &str = "Remote Home Check Assessment Results";

/// Outbound message delivering an assessment result to the patient.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<ReportDocument>,
}

/// Trait describing outbound notification transports.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, notification: &Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("smtp not configured (missing {})", .missing.join(", "))]
    NotConfigured { missing: Vec<&'static str> },
    #[error("outbox unavailable at {}: {source}", .path.display())]
    Outbox {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to encode message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Builds the patient notification for a scored assessment.
pub fn compose_notification(
    submission: &AssessmentSubmission,
    scores: &ScoreResult,
    care_plan: &str,
    attachment: Option<ReportDocument>,
) -> Notification {
    let patient = &submission.patient;
    let attachment_note = if attachment.is_some() {
        "Please see the attached report for detailed results.\n\n"
    } else {
        ""
    };

    let body = format!(
        "Dear {name},\n\
         \n\
         Your Remote Home Check assessment has been completed.\n\
         \n\
         Scores:\n\
         - Physical Health: {physical:.1}/100\n\
         - Mental Health: {mental:.1}/100\n\
         - Insight Score: {insight:.1}/100\n\
         - Tier: {tier}\n\
         - Previous Tier: {previous}\n\
         \n\
         Care Plan Suggestion:\n\
         {care_plan}\n\
         \n\
         {attachment_note}\
         Best regards,\n\
         Remote Home Check Team\n",
        name = patient.name.as_deref().unwrap_or("User"),
        physical = f64::from(scores.physical_score),
        mental = f64::from(scores.mental_score),
        insight = scores.insight_score,
        tier = scores.tier,
        previous = patient
            .previous_tier
            .as_ref()
            .map_or("N/A", |tier| tier.label()),
    );

    Notification {
        to: patient.email.clone(),
        subject: NOTIFICATION_SUBJECT.to_string(),
        body,
        attachment,
    }
}

#[derive(Debug, Serialize)]
struct SpooledMessage<'a> {
    message_id: String,
    queued_at: DateTime<Utc>,
    relay: String,
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<SpooledAttachment<'a>>,
}

#[derive(Debug, Serialize)]
struct SpooledAttachment<'a> {
    file_name: &'a str,
    content_type: String,
    path: String,
}

/// Dispatcher that spools messages into an outbox directory drained by the mail relay.
///
/// Messages are only accepted once every SMTP setting is present, so an unconfigured
/// deployment reports undelivered notifications instead of silently queueing them.
#[derive(Debug, Clone)]
pub struct OutboxDispatcher {
    outbox_dir: PathBuf,
    smtp: SmtpSettings,
}

impl OutboxDispatcher {
    pub fn new(outbox_dir: impl Into<PathBuf>, smtp: SmtpSettings) -> Self {
        Self {
            outbox_dir: outbox_dir.into(),
            smtp,
        }
    }

    pub fn outbox_dir(&self) -> &Path {
        &self.outbox_dir
    }

    fn outbox_error(path: &Path, source: io::Error) -> NotificationError {
        NotificationError::Outbox {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl NotificationDispatcher for OutboxDispatcher {
    fn dispatch(&self, notification: &Notification) -> Result<(), NotificationError> {
        let missing = self.smtp.missing_fields();
        if !missing.is_empty() {
            warn!(
                to = %notification.to,
                subject = %notification.subject,
                missing = ?missing,
                "smtp not configured; notification not queued"
            );
            return Err(NotificationError::NotConfigured { missing });
        }

        fs::create_dir_all(&self.outbox_dir)
            .map_err(|source| Self::outbox_error(&self.outbox_dir, source))?;

        let message_id = uuid::Uuid::new_v4().to_string();

        let attachment = match &notification.attachment {
            Some(document) => {
                let path = self
                    .outbox_dir
                    .join(format!("{message_id}-{}", document.file_name));
                fs::write(&path, &document.body)
                    .map_err(|source| Self::outbox_error(&path, source))?;
                Some(SpooledAttachment {
                    file_name: &document.file_name,
                    content_type: document.content_type.to_string(),
                    path: path.display().to_string(),
                })
            }
            None => None,
        };

        let message = SpooledMessage {
            message_id: message_id.clone(),
            queued_at: Utc::now(),
            relay: format!(
                "{}:{}",
                self.smtp.server.as_deref().unwrap_or_default(),
                self.smtp.port
            ),
            from: self.smtp.username.as_deref().unwrap_or_default(),
            to: &notification.to,
            subject: &notification.subject,
            body: &notification.body,
            attachment,
        };

        let path = self.outbox_dir.join(format!("{message_id}.json"));
        let encoded = serde_json::to_vec_pretty(&message)?;
        fs::write(&path, encoded).map_err(|source| Self::outbox_error(&path, source))?;

        info!(to = %notification.to, %message_id, "notification queued for delivery");
        Ok(())
    }
}
