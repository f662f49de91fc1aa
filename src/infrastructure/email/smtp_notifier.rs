use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::auth::errors::NotifyError;
use crate::domain::auth::ports::ResetNotifier;
use crate::domain::auth::value_objects::Email;
use crate::infrastructure::config::SmtpConfig;

/// Builds the frontend reset link carrying the token
fn reset_link(reset_url: &str, token: &str) -> String {
  format!("{}?reset_password_token={}", reset_url, token)
}

/// SMTP implementation of the ResetNotifier trait
///
/// Fire-and-report: a delivery failure is returned to the caller, never
/// retried here.
pub struct SmtpResetNotifier {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from: Mailbox,
  reset_url: String,
}

impl SmtpResetNotifier {
  /// Creates a notifier over an already-built transport
  pub fn new(
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    reset_url: String,
  ) -> Self {
    Self {
      transport,
      from,
      reset_url,
    }
  }

  /// Creates a notifier from the SMTP configuration section
  pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
    let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
      .map_err(|e| NotifyError::Transport(e.to_string()))?
      .port(config.port)
      .credentials(Credentials::new(
        config.username.clone(),
        config.password.clone(),
      ))
      .build();

    let from = config
      .from
      .parse::<Mailbox>()
      .map_err(|e| NotifyError::Message(format!("Invalid from address: {}", e)))?;

    Ok(Self::new(transport, from, config.reset_url.clone()))
  }
}

#[async_trait]
impl ResetNotifier for SmtpResetNotifier {
  async fn send_reset_password_email(
    &self,
    email: &Email,
    token: &str,
  ) -> Result<(), NotifyError> {
    let link = reset_link(&self.reset_url, token);

    let body = format!(
      "<html>\n<body>\n<h2>Password Reset</h2>\n\
       <p>Click the link below to reset your password:</p>\n\
       <a href=\"{link}\">{link}</a>\n\
       <p>This link expires in 1 hour.</p>\n</body>\n</html>",
    );

    let message = Message::builder()
      .from(self.from.clone())
      .to(
        email
          .as_str()
          .parse::<Mailbox>()
          .map_err(|e| NotifyError::Message(format!("Invalid recipient address: {}", e)))?,
      )
      .subject("Password Reset")
      .header(ContentType::TEXT_HTML)
      .body(body)
      .map_err(|e| NotifyError::Message(e.to_string()))?;

    self
      .transport
      .send(message)
      .await
      .map(|_| ())
      .map_err(|e| {
        tracing::error!("Failed to deliver reset email: {}", e);
        NotifyError::Transport(e.to_string())
      })
  }
}
