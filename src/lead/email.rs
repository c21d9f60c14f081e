//! Notification email for a new lead.

use chrono::NaiveDateTime;
use maud::{html, Markup};
use serde::Serialize;

use super::LeadRequest;
use crate::storage::MailSettings;

/// Subject line of every lead notification.
pub const LEAD_SUBJECT: &str = "📚 Novo interesse no livro \"Economia guiada por IA\"";

const ORIGIN: &str = "Página \"Quero meu exemplar\"";

/// A composed notification, ready for a [`super::Mailer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadEmail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl LeadEmail {
    /// Compose the notification for `lead`, stamped with `sent_at` (local time).
    pub fn compose(lead: &LeadRequest, settings: &MailSettings, sent_at: NaiveDateTime) -> Self {
        let stamp = format_timestamp(sent_at);

        Self {
            from: settings.sender().to_string(),
            to: settings.recipient.clone(),
            reply_to: lead.email.clone(),
            subject: LEAD_SUBJECT.to_string(),
            html: render_html(lead, &stamp).into_string(),
            text: render_text(lead, &stamp),
        }
    }
}

/// `dd/mm/yyyy, HH:MM:SS`, as pt-BR renders dates.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

fn render_text(lead: &LeadRequest, stamp: &str) -> String {
    format!(
        "Novo interesse no livro \"Economia guiada por IA\"\n\n\
         Dados do interessado:\n\
         Nome: {}\n\
         E-mail: {}\n\
         Telefone: {}\n\n\
         Data: {}\n\
         Origem: {}",
        lead.nome, lead.email, lead.telefone, stamp, ORIGIN
    )
}

fn render_html(lead: &LeadRequest, stamp: &str) -> Markup {
    html! {
        div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; background-color: #000; color: #fff; padding: 20px; border-radius: 10px;" {
            div style="text-align: center; border-bottom: 1px solid #333; padding-bottom: 20px; margin-bottom: 30px;" {
                h1 style="color: #fff; margin: 0; font-size: 24px;" { "Economia guiada por IA" }
                p style="color: #ccc; margin: 5px 0 0 0;" { "Novo lead interessado no livro" }
            }
            div style="background-color: #111; padding: 25px; border-radius: 8px; border: 1px solid #333;" {
                h2 style="color: #fff; margin-top: 0; font-size: 18px; border-bottom: 1px solid #333; padding-bottom: 10px;" {
                    "📋 Dados do Interessado"
                }
                div style="margin: 20px 0;" {
                    p style="margin: 10px 0;" { strong { "👤 Nome:" } " " span style="color: #ccc;" { (lead.nome) } }
                    p style="margin: 10px 0;" { strong { "📧 E-mail:" } " " span style="color: #ccc;" { (lead.email) } }
                    p style="margin: 10px 0;" { strong { "📱 Telefone:" } " " span style="color: #ccc;" { (lead.telefone) } }
                }
                div style="margin-top: 30px; padding-top: 20px; border-top: 1px solid #333;" {
                    p style="color: #888; font-size: 12px; margin: 5px 0;" { "📅 " strong { "Data:" } " " (stamp) }
                    p style="color: #888; font-size: 12px; margin: 5px 0;" { "🌐 " strong { "Origem:" } " " (ORIGIN) }
                }
            }
            div style="text-align: center; margin-top: 30px; padding-top: 20px; border-top: 1px solid #333;" {
                p style="color: #666; font-size: 12px;" {
                    "Este e-mail foi gerado automaticamente pelo sistema de captação de leads."
                    br;
                    "Para responder ao interessado, use: "
                    strong style="color: #fff;" { (lead.email) }
                }
            }
        }
    }
}
