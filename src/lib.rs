//! Livro Landing - landing page for the book "Economia Guiada por IA"
//!
//! Serves a localized (pt/en/es) landing page and a lead capture endpoint
//! that forwards interested readers to the publisher by email. The
//! [`i18n::LocaleStore`] holds the active locale on the client and resolves
//! dot-path translation keys for the page components.

pub mod i18n;
pub mod lead;
pub mod page;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use i18n::{LocaleBinding, LocaleConfig, LocaleStore, Runtime};
pub use lead::{LeadRequest, LeadService};
pub use storage::config::AppConfig;
