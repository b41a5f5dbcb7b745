//! Best-effort outbound mail.
//!
//! Services hand messages to a [`MailQueue`] without waiting. A single [`MailDispatcher`]
//! worker renders each message and passes it to a [`MailTransport`]: an SMTP relay when
//! one is configured, the log otherwise. Delivery is at-most-once: failures are logged
//! and the message is dropped.

pub mod dispatcher;
pub mod message;
pub mod transport;

pub use dispatcher::{DispatchStats, MailDispatcher, MailQueue, MailWorker};
pub use message::{MailMessage, OutboundMail};
pub use transport::{select_transport, LogTransport, MailError, MailTransport, SmtpTransport};
