//! Lead submission workflow.

use chrono::Local;
use serde::Serialize;
use uuid::Uuid;

use super::{LeadEmail, LeadError, LeadRegistry, LeadRequest, Mailer};
use crate::storage::MailSettings;

/// Confirmation of an accepted lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadReceipt {
    pub id: Uuid,
    pub message_id: String,
}

/// Validates, de-duplicates and forwards leads.
pub struct LeadService<M: Mailer> {
    mailer: M,
    settings: MailSettings,
    registry: LeadRegistry,
}

impl<M: Mailer> LeadService<M> {
    pub fn new(mailer: M, settings: MailSettings) -> Self {
        Self {
            mailer,
            settings,
            registry: LeadRegistry::new(),
        }
    }

    pub fn registry(&self) -> &LeadRegistry {
        &self.registry
    }

    /// Handle a parsed lead.
    ///
    /// The lead is reserved before delivery and only kept once the
    /// notification has been sent, so a failed delivery can be retried.
    pub async fn submit(&self, request: LeadRequest) -> Result<LeadReceipt, LeadError> {
        if !request.has_required_fields() {
            return Err(LeadError::MissingFields);
        }

        let invalid = request.validate_form();
        if !invalid.is_empty() {
            tracing::info!("Rejecting lead with invalid fields: {:?}", invalid);
            return Err(LeadError::Invalid(invalid));
        }

        let Some(reservation) = self.registry.reserve(request.key()) else {
            tracing::info!("Rejecting duplicate lead from {}", request.email);
            return Err(LeadError::Duplicate);
        };

        let email = LeadEmail::compose(&request, &self.settings, Local::now().naive_local());
        let message_id = self.mailer.send(&email).await.map_err(|e| {
            tracing::error!("Failed to deliver lead notification: {}", e);
            LeadError::Mail(e)
        })?;
        reservation.confirm();

        let receipt = LeadReceipt {
            id: Uuid::new_v4(),
            message_id,
        };
        tracing::info!("Accepted lead {} ({})", receipt.id, receipt.message_id);
        Ok(receipt)
    }
}
