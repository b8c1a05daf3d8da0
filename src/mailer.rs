//! Outbound mail. Delivery is a log transport: messages are rendered with
//! the configured sender and written to the log instead of a real SMTP
//! session, matching how the original system shipped.

use crate::config;

#[derive(Debug)]
pub struct Message {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub async fn send(message: Message) -> Result<(), MailError> {
    let smtp = &config::config().smtp;
    tracing::info!(
        from = %format!("{} <{}>", smtp.from_name, smtp.from_email),
        to = %message.to,
        subject = %message.subject,
        "outbound mail: {}",
        message.body,
    );
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),
}
