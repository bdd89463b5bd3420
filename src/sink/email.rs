//! Digest-email sink built on a `lettre` SMTP transport: renders all
//! headlines and their related-free matches into a single digest message
//! and sends it with exponential-backoff retry.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use crate::error::SinkError;
use crate::model::Headline;

use super::OutputSink;

const RETRY_BACKOFF: [Duration; 3] = [
    Duration::from_secs(2),
    Duration::from_secs(4),
    Duration::from_secs(8),
];

pub struct EmailSink {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailSink {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("SMTP_HOST")?;
        let user = std::env::var("EMAIL_FROM")?;
        let pass = std::env::var("EMAIL_PASSWORD")?;
        let to_addr = std::env::var("EMAIL_TO")?;

        let creds = Credentials::new(user.clone(), pass);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)?
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from: user.parse()?,
            to: to_addr.parse()?,
        })
    }

    fn render(&self, headlines: &[Headline]) -> Message {
        let subject = format!("Carbon market digest: {} headlines", headlines.len());
        let mut body = String::new();
        for h in headlines {
            body.push_str(&format!("{}\n{}\n", h.title, h.url));
            for rel in &h.related_free {
                body.push_str(&format!("  ↳ {} ({:.2}) {}\n", rel.title, rel.score, rel.url));
            }
            body.push('\n');
        }

        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body)
            .expect("rendered digest body is valid message content")
    }

    async fn send_with_retry(&self, msg: Message) -> Result<(), SinkError> {
        let mut last_err = None;
        for attempt in 0..=RETRY_BACKOFF.len() {
            match self.mailer.send(msg.clone()).await {
                Ok(_) => return Ok(()),
                Err(e) => {
                    last_err = Some(e);
                    if let Some(delay) = RETRY_BACKOFF.get(attempt) {
                        tracing::warn!(attempt, "email send failed, retrying");
                        tokio::time::sleep(*delay).await;
                    }
                }
            }
        }
        Err(SinkError::Email(
            last_err.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }
}

#[async_trait]
impl OutputSink for EmailSink {
    async fn emit(&self, headlines: &[Headline]) -> Result<(), SinkError> {
        if headlines.is_empty() {
            return Ok(());
        }
        let msg = self.render(headlines);
        self.send_with_retry(msg).await
    }

    fn name(&self) -> &'static str {
        "email"
    }
}
