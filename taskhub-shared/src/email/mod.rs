/// Email delivery adapter
///
/// Wraps the SES client for plain-text notification email, plus the
/// rendering of due-task reminder messages. Delivery is fire-and-forget
/// from the caller's perspective: a failed send is an error to log, not a
/// reason to retry or queue.

use crate::models::task::DueTaskReminder;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use tracing::debug;

/// Error type for email operations
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// Failed to assemble the message
    #[error("Failed to build email: {0}")]
    Build(String),

    /// The delivery service rejected or failed the send
    #[error("Failed to send email: {0}")]
    Send(String),
}

/// SES-backed mailer with a fixed sender address
#[derive(Debug, Clone)]
pub struct Mailer {
    client: aws_sdk_sesv2::Client,
    sender: String,
}

impl Mailer {
    /// Creates a mailer from an existing client
    pub fn new(client: aws_sdk_sesv2::Client, sender: String) -> Self {
        Self { client, sender }
    }

    /// Creates a mailer using the ambient AWS configuration
    pub async fn from_env(sender: String) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_sesv2::Client::new(&config), sender)
    }

    /// Sends a plain-text email to a single recipient
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Send` if the delivery service fails the send
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        debug!(to, subject, "Sending email");

        let subject = Content::builder()
            .data(subject)
            .build()
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let text = Content::builder()
            .data(body)
            .build()
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let message = Message::builder()
            .subject(subject)
            .body(Body::builder().text(text).build())
            .build();

        self.client
            .send_email()
            .from_email_address(&self.sender)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await
            .map_err(|e| EmailError::Send(e.to_string()))?;

        Ok(())
    }

    /// Sends a due-task reminder to the task's assignee, or the project
    /// owner when the task is unassigned
    pub async fn send_due_reminder(&self, reminder: &DueTaskReminder) -> Result<(), EmailError> {
        let (recipient, name) = reminder.recipient();
        let subject = reminder_subject(&reminder.title);
        let body = reminder_body(name, reminder);

        self.send(recipient, &subject, &body).await
    }
}

/// Subject line for a due-task reminder
pub fn reminder_subject(task_title: &str) -> String {
    format!("Reminder: Task \"{}\" is due today", task_title)
}

/// Plain-text body for a due-task reminder
pub fn reminder_body(recipient_name: &str, reminder: &DueTaskReminder) -> String {
    format!(
        "Hello {},\n\n\
         This is a reminder that your task \"{}\" in project \"{}\" is due today.\n\n\
         Task Status: {}\n\n\
         Please complete this task as soon as possible.\n\n\
         Regards,\nTaskhub",
        recipient_name,
        reminder.title,
        reminder.project_title,
        reminder.status.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskStatus;
    use uuid::Uuid;

    fn sample_reminder() -> DueTaskReminder {
        DueTaskReminder {
            task_id: Uuid::new_v4(),
            title: "Write doc".to_string(),
            status: TaskStatus::InProgress,
            project_title: "Launch".to_string(),
            owner_email: "owner@example.com".to_string(),
            owner_name: "Alice".to_string(),
            assignee_email: None,
            assignee_name: None,
        }
    }

    #[test]
    fn test_reminder_subject_names_the_task() {
        assert_eq!(
            reminder_subject("Write doc"),
            "Reminder: Task \"Write doc\" is due today"
        );
    }

    #[test]
    fn test_reminder_body_mentions_task_project_and_status() {
        let body = reminder_body("Alice", &sample_reminder());

        assert!(body.starts_with("Hello Alice,"));
        assert!(body.contains("\"Write doc\""));
        assert!(body.contains("\"Launch\""));
        assert!(body.contains("Task Status: in_progress"));
    }
}
