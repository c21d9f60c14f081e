//! Server-side rendering of the landing page.
//!
//! Anonymous renders use a server-runtime store and are always in the default
//! locale. A visitor's request runs the store as a client over the visitor's
//! saved locale and `Accept-Language` preference, so the selector choice
//! survives reloads.

use maud::{html, Markup, DOCTYPE};

use crate::i18n::catalog::locale_label;
use crate::i18n::{
    FixedLanguage, LocaleConfig, LocaleStore, MemoryStorage, PreferenceStorage, Runtime,
    TranslationValue, LOCALE_STORAGE_KEY,
};
use crate::lead::LeadError;

/// What a page request knows about its visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Visitor {
    /// Locale saved from an earlier visit
    pub saved_locale: Option<String>,
    /// Most preferred language tag of the browser
    pub language: Option<String>,
}

/// Result of a lead form post, shown above the form.
#[derive(Debug, Clone, Copy)]
pub enum FormNotice<'a> {
    Sent,
    Failed(&'a LeadError),
}

/// A page rendered for a visitor.
#[derive(Debug)]
pub struct VisitorPage {
    pub html: Markup,
    /// Locale the page was rendered in
    pub locale: String,
    /// Locale to keep for the next visit
    pub saved_locale: Option<String>,
}

/// Render the full page for `config` in its default locale.
pub fn render_landing(config: &LocaleConfig) -> String {
    let store = LocaleStore::new(config.clone(), Runtime::Server);
    render_with(&store).into_string()
}

/// Render the page for `visitor`, switching to `requested` first if given.
///
/// An unsupported `requested` locale is ignored.
pub fn render_for_visitor(
    config: &LocaleConfig,
    visitor: &Visitor,
    requested: Option<&str>,
    notice: Option<FormNotice<'_>>,
) -> VisitorPage {
    let storage = match &visitor.saved_locale {
        Some(saved) => MemoryStorage::with_entry(LOCALE_STORAGE_KEY, saved),
        None => MemoryStorage::new(),
    };
    let language = FixedLanguage(visitor.language.clone());
    let store = LocaleStore::new(config.clone(), Runtime::client(storage.clone(), language));

    store.hydrate();
    if let Some(locale) = requested {
        store.set_locale(locale);
    }

    VisitorPage {
        html: render_page(&store, notice),
        locale: store.get_locale(),
        saved_locale: storage.get(LOCALE_STORAGE_KEY).ok().flatten(),
    }
}

/// Render the page with whatever locale `store` currently has.
pub fn render_with(store: &LocaleStore) -> Markup {
    render_page(store, None)
}

fn render_page(store: &LocaleStore, notice: Option<FormNotice<'_>>) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(store.get_locale()) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (store.text("author.bookTitle")) " | " (store.text("author.name")) }
            }
            body {
                (header(store))
                main {
                    (hero(store))
                    (features(store))
                    (author(store))
                    (faq(store))
                    (lead_form(store, notice))
                }
                (footer(store))
            }
        }
    }
}

fn header(store: &LocaleStore) -> Markup {
    let current = store.get_locale();
    html! {
        header id="header" {
            nav {
                ul class="horizontallist" {
                    li { a href="#hero" { (store.text("navigation.home")) } }
                    li { a href="#features" { (store.text("navigation.about")) } }
                    li { a href="#lead-form" { (store.text("navigation.contact")) } }
                }
            }
            form class="language-selector" method="get" action="/" aria-label="Selecionar idioma" {
                @for code in store.locales() {
                    @if let Some(label) = locale_label(code) {
                        button type="submit" name="lang" value=(code) title=(label.full_name)
                            aria-pressed=(if *code == current { "true" } else { "false" }) {
                            (label.short)
                        }
                    }
                }
            }
        }
    }
}

fn hero(store: &LocaleStore) -> Markup {
    html! {
        section id="hero" {
            h1 {
                @for line in 1..=5 {
                    span class="title-line" { (store.text(&format!("hero.titleLine{}", line))) }
                }
            }
            a class="cta" href="#lead-form" { (store.text("hero.cta")) }
        }
    }
}

fn features(store: &LocaleStore) -> Markup {
    html! {
        section id="features" {
            h2 {
                @for line in 1..=3 {
                    span class="title-line" { (store.text(&format!("features.aiTitleLine{}", line))) }
                }
            }
            p class="book-description" {
                @for line in 1..=3 {
                    (store.text(&format!("features.bookDescriptionLine{}", line))) " "
                }
            }
            h3 { (store.text("features.aboutBook")) }
            p { (store.text("features.bookContent1")) }
            p { (store.text("features.bookContent2")) }
            h3 { (store.text("features.benefitsTitle")) }
            ul class="benefits" {
                @for benefit in store.list("features.benefits") {
                    @if let Some(text) = benefit.as_text() {
                        li { (text) }
                    }
                }
            }
            div class="future" {
                h3 { (store.text("features.futureTitle")) }
                p { (store.text("features.futureDescription")) }
                a class="cta" href="#lead-form" { (store.text("features.freePreview")) }
            }
        }
    }
}

fn author(store: &LocaleStore) -> Markup {
    html! {
        section id="author" {
            h2 { (store.text("author.aboutAuthor")) }
            h3 { (store.text("author.name")) }
            @for bio in 1..=3 {
                p { (store.text(&format!("author.bio{}", bio))) }
            }
            div class="testimonials" {
                @for testimonial in store.list("author.testimonials") {
                    (record(&testimonial, "text", "author"))
                }
            }
        }
    }
}

fn faq(store: &LocaleStore) -> Markup {
    html! {
        section id="faq" {
            h2 { (store.text("faq.title")) }
            @for entry in store.list("faq.questions") {
                @if let (Some(question), Some(answer)) = (entry.field("question"), entry.field("answer")) {
                    details {
                        summary { (question) }
                        p { (answer) }
                    }
                }
            }
        }
    }
}

fn record(value: &TranslationValue, body: &str, caption: &str) -> Markup {
    html! {
        @if let Some(text) = value.field(body) {
            blockquote {
                p { (text) }
                @if let Some(caption) = value.field(caption) {
                    footer { (caption) }
                }
            }
        }
    }
}

/// Messages for a rejected lead, in the store's locale where possible.
fn failure_messages(store: &LocaleStore, error: &LeadError) -> Vec<String> {
    match error {
        LeadError::Invalid(fields) => fields
            .iter()
            .map(|field| store.text(field.i18n_key()))
            .collect(),
        LeadError::MissingFields => vec![store.text("form.required")],
        LeadError::Duplicate => vec![error.public_message()],
        LeadError::InvalidBody(_) | LeadError::Mail(_) => vec![store.text("form.error")],
    }
}

fn lead_form(store: &LocaleStore, notice: Option<FormNotice<'_>>) -> Markup {
    html! {
        section id="lead-form" {
            h2 { (store.text("form.title")) }
            p { (store.text("form.subtitle")) }
            @if let Some(FormNotice::Sent) = notice {
                p class="form-success" role="status" { (store.text("form.success")) }
            }
            @if let Some(FormNotice::Failed(error)) = notice {
                div class="form-error" role="alert" {
                    @for message in failure_messages(store, error) {
                        p { (message) }
                    }
                }
            }
            form method="post" action="/api/lead" {
                label for="nome" { (store.text("form.name")) }
                input type="text" id="nome" name="nome" required minlength="3";
                label for="email" { (store.text("form.email")) }
                input type="email" id="email" name="email" required;
                label for="telefone" { (store.text("form.phone")) }
                input type="tel" id="telefone" name="telefone" required;
                button type="submit" data-sending=(store.text("form.sending")) {
                    (store.text("form.submit"))
                }
            }
        }
    }
}

fn footer(store: &LocaleStore) -> Markup {
    html! {
        footer id="footer" {
            p { (store.text("footer.publisherName")) }
            a class="cta" href="#lead-form" { (store.text("footer.ctaButton")) }
            ul class="horizontallist" {
                li { (store.text("footer.privacyPolicy")) }
                li { (store.text("footer.termsOfUse")) }
                li { (store.text("footer.contact")) }
            }
            p {
                (store.text("footer.humanaSiteLabel")) " "
                a href="https://humana.ai" { "humana.ai" }
            }
            p { (store.text("footer.eduardoLabel")) }
        }
    }
}
