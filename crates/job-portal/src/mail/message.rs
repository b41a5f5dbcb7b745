use serde::Serialize;

pub const DEFAULT_SUBJECT: &str = "Job Portal Notification";

/// Message as produced by the services: recipient plus an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body_html: String,
}

impl MailMessage {
    pub fn notification(to: impl Into<String>, body_html: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: DEFAULT_SUBJECT.to_string(),
            body_html: body_html.into(),
        }
    }
}

/// Fully rendered message handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub headers: Vec<(String, String)>,
    pub html: String,
}

impl OutboundMail {
    pub fn render(sender: &str, message: &MailMessage) -> Self {
        let headers = vec![
            ("From".to_string(), sender.to_string()),
            ("To".to_string(), message.to.clone()),
            ("Subject".to_string(), message.subject.clone()),
            ("MIME-Version".to_string(), "1.0".to_string()),
            (
                "Content-Type".to_string(),
                "text/html; charset=UTF-8".to_string(),
            ),
        ];

        Self {
            from: sender.to_string(),
            to: message.to.clone(),
            subject: message.subject.clone(),
            headers,
            html: render_envelope(&message.subject, &message.body_html),
        }
    }

    /// RFC 5322 style text: CRLF separated headers, blank line, HTML body.
    pub fn to_wire(&self) -> String {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\r\n");
        format!("{headers}\r\n\r\n{}", self.html)
    }
}

fn render_envelope(title: &str, body_html: &str) -> String {
    format!(
        r#"<html>
<head>
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        h2 {{ color: #4CAF50; }}
        p {{ font-size: 16px; }}
        .footer {{ margin-top: 20px; font-size: 14px; color: #777; }}
    </style>
</head>
<body>
    <h2>{title}</h2>
    <p>{body_html}</p>
    <div class="footer">
        <hr>
        <p>Best regards,<br><strong>Job Portal Team</strong></p>
    </div>
</body>
</html>
"#
    )
}
