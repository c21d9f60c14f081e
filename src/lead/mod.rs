//! Lead capture: the "Quero meu exemplar" form submission.
//!
//! A lead is validated, checked against the leads already accepted by this
//! process, and forwarded by email to a fixed recipient.

pub mod email;
pub mod mailer;
pub mod registry;
pub mod service;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export main types
pub use email::LeadEmail;
pub use mailer::{ConfiguredMailer, LogMailer, MailError, Mailer, RelayMailer};
pub use registry::{LeadKey, LeadRegistry, Reservation};
pub use service::{LeadReceipt, LeadService};

/// Lead submission errors.
#[derive(Debug, Error)]
pub enum LeadError {
    #[error("Todos os campos são obrigatórios")]
    MissingFields,

    #[error("Dados inválidos")]
    Invalid(Vec<FieldError>),

    #[error("Lead já cadastrado")]
    Duplicate,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Mail delivery failed: {0}")]
    Mail(#[from] MailError),
}

impl LeadError {
    /// HTTP status reported for this error.
    pub fn status(&self) -> u16 {
        match self {
            LeadError::MissingFields | LeadError::Invalid(_) | LeadError::Duplicate => 400,
            LeadError::InvalidBody(_) | LeadError::Mail(_) => 500,
        }
    }

    /// Message shown to the visitor. Internal details are never exposed.
    pub fn public_message(&self) -> String {
        match self {
            LeadError::MissingFields | LeadError::Invalid(_) | LeadError::Duplicate => {
                self.to_string()
            }
            LeadError::InvalidBody(_) | LeadError::Mail(_) => {
                "Erro interno do servidor".to_string()
            }
        }
    }

    /// Translation keys of the rejected fields.
    pub fn field_keys(&self) -> Vec<&'static str> {
        match self {
            LeadError::Invalid(fields) => fields.iter().map(FieldError::i18n_key).collect(),
            _ => Vec::new(),
        }
    }
}

/// A form field failing validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Name,
    Email,
    Phone,
}

impl FieldError {
    /// Translation key of the message for this error.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            FieldError::Name => "form.errorName",
            FieldError::Email => "form.errorEmail",
            FieldError::Phone => "form.errorPhone",
        }
    }
}

/// Lead form payload, as posted by the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRequest {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefone: String,
}

impl LeadRequest {
    pub fn new(nome: &str, email: &str, telefone: &str) -> Self {
        Self {
            nome: nome.to_string(),
            email: email.to_string(),
            telefone: telefone.to_string(),
        }
    }

    /// Parse a JSON request body.
    pub fn from_json(body: &[u8]) -> Result<Self, LeadError> {
        serde_json::from_slice(body).map_err(|e| LeadError::InvalidBody(e.to_string()))
    }

    /// All three fields are present and not blank.
    pub fn has_required_fields(&self) -> bool {
        [&self.nome, &self.email, &self.telefone]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Phone number with every non-digit removed.
    pub fn phone_digits(&self) -> String {
        self.telefone.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Form rules: name of at least 3 characters, a plausible email and a
    /// phone of 8 to 15 digits.
    pub fn validate_form(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.nome.trim().chars().count() < 3 {
            errors.push(FieldError::Name);
        }
        if !looks_like_email(&self.email) {
            errors.push(FieldError::Email);
        }
        if !(8..=15).contains(&self.phone_digits().len()) {
            errors.push(FieldError::Phone);
        }

        errors
    }

    /// Key used to detect repeated submissions.
    pub fn key(&self) -> LeadKey {
        LeadKey::new(&self.email, &self.phone_digits())
    }
}

/// Matches `\S+@\S+\.\S+` anywhere in the input.
fn looks_like_email(input: &str) -> bool {
    input.split_whitespace().any(|token| {
        let Some((at, _)) = token.char_indices().skip(1).find(|(_, c)| *c == '@') else {
            return false;
        };
        let domain = &token[at + 1..];
        domain
            .char_indices()
            .skip(1)
            .any(|(i, c)| c == '.' && i + 1 < domain.len())
    })
}
