use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::message::OutboundMail;
use crate::config::{MailConfig, SmtpConfig};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("invalid recipient '{0}'")]
    InvalidRecipient(String),
    #[error("invalid sender '{0}'")]
    InvalidSender(String),
}

/// Delivery channel used by the dispatcher worker.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError>;

    /// Short label for startup logs.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Picks the SMTP relay when one is configured and the log transport otherwise.
pub fn select_transport(config: &MailConfig) -> Result<Arc<dyn MailTransport>, MailError> {
    match &config.smtp {
        Some(smtp) => Ok(Arc::new(SmtpTransport::new(smtp)?)),
        None => Ok(Arc::new(LogTransport)),
    }
}

/// Transport that writes each rendered message to the tracing output.
#[derive(Debug, Default, Clone)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError> {
        if !mail.to.contains('@') {
            return Err(MailError::InvalidRecipient(mail.to.clone()));
        }
        info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            bytes = mail.to_wire().len(),
            "mail delivered to log transport"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// STARTTLS relay delivery, authenticated with PLAIN/LOGIN when credentials are set.
pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|err| MailError::Transport(err.to_string()))?
            .port(config.port);
        if let Some(credentials) = &config.credentials {
            builder = builder.credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ));
        }

        info!(host = %config.host, port = config.port, "smtp relay configured");
        Ok(Self {
            mailer: builder.build(),
        })
    }
}

fn build_message(mail: &OutboundMail) -> Result<Message, MailError> {
    let from: Mailbox = mail
        .from
        .parse()
        .map_err(|_| MailError::InvalidSender(mail.from.clone()))?;
    let to: Mailbox = mail
        .to
        .parse()
        .map_err(|_| MailError::InvalidRecipient(mail.to.clone()))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(mail.html.clone())
        .map_err(|err| MailError::Transport(err.to_string()))
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, mail: &OutboundMail) -> Result<(), MailError> {
        let message = build_message(mail)?;
        self.mailer
            .send(message)
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
