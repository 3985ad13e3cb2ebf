use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    config::EmailConfig,
    mailer::{MailMessage, Mailer},
};

const INVITATION_SUBJECT: &str = "You are invited to an event!";

/// Sends guest invitations. Failures never reach the caller.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    public_base_url: String,
    enabled: bool,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, config: &EmailConfig) -> Self {
        Self {
            mailer,
            public_base_url: config.public_base_url.clone(),
            enabled: config.enabled,
        }
    }

    pub fn invitation(&self, name: &str, event_id: i64) -> MailMessage {
        MailMessage {
            subject: INVITATION_SUBJECT.to_string(),
            body: format!(
                "Hello {name},\n\nYou have been invited to an event. Click the link below to view details:\n\n{}/events/{event_id}",
                self.public_base_url
            ),
        }
    }

    /// One attempt, no retry.
    pub async fn notify(&self, recipient: &str, name: &str, event_id: i64) {
        if !self.enabled {
            warn!(event_id, "email disabled, skipping invitation");
            return;
        }
        let message = self.invitation(name, event_id);
        match self.mailer.send(recipient, &message).await {
            Ok(()) => info!(event_id, "invitation sent"),
            Err(e) => error!(event_id, error = %e, "failed to send invitation"),
        }
    }
}
