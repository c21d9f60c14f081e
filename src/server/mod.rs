//! HTTP server for the landing page and the lead endpoint.
//!
//! Routes:
//! - `GET /?lang=<code>` renders the page for the visitor, switching locale
//!   when `lang` is given
//! - `POST /api/lead` accepts a lead as JSON (answering JSON) or as a browser
//!   form post (answering with the page)

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use maud::Markup;
use rocket::data::{Limits, ToByteUnit};
use rocket::form::Form;
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{self, FromRequest, Request};
use rocket::serde::json::{json, Json, Value};
use rocket::{Build, FromForm, Rocket, State};

use crate::i18n::{preferred_from_header, LocaleConfig, LOCALE_STORAGE_KEY};
use crate::lead::{LeadError, LeadReceipt, LeadRequest, LeadService, Mailer};
use crate::page::{render_for_visitor, FormNotice, Visitor, VisitorPage};
use crate::storage::ServerSettings;

/// Idle connections are closed after this many seconds.
const KEEP_ALIVE_SECS: u32 = 5;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe front for a [`LeadService`], shared by request handlers.
pub trait LeadHandler: Send + Sync {
    fn submit(&self, lead: LeadRequest) -> BoxFuture<'_, Result<LeadReceipt, LeadError>>;
}

impl<M: Mailer + 'static> LeadHandler for LeadService<M> {
    fn submit(&self, lead: LeadRequest) -> BoxFuture<'_, Result<LeadReceipt, LeadError>> {
        Box::pin(LeadService::submit(self, lead))
    }
}

/// Managed state holding the lead handler.
pub struct LeadEndpoint(Arc<dyn LeadHandler>);

/// Lead form fields as posted by the page. Absent fields are treated as blank.
#[derive(Debug, FromForm)]
pub struct LeadForm {
    nome: Option<String>,
    email: Option<String>,
    telefone: Option<String>,
}

impl From<LeadForm> for LeadRequest {
    fn from(form: LeadForm) -> Self {
        LeadRequest {
            nome: form.nome.unwrap_or_default(),
            email: form.email.unwrap_or_default(),
            telefone: form.telefone.unwrap_or_default(),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Visitor {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        request::Outcome::Success(Visitor {
            saved_locale: request
                .cookies()
                .get(LOCALE_STORAGE_KEY)
                .map(|cookie| cookie.value().to_string()),
            language: request
                .headers()
                .get_one("Accept-Language")
                .and_then(preferred_from_header),
        })
    }
}

/// Store the visitor's locale choice when it changed.
fn remember_locale(cookies: &CookieJar<'_>, visitor: &Visitor, page: &VisitorPage) {
    let Some(saved) = &page.saved_locale else {
        return;
    };
    if visitor.saved_locale.as_ref() == Some(saved) {
        return;
    }

    tracing::debug!("Saving visitor locale: {}", saved);
    cookies.add(
        Cookie::build((LOCALE_STORAGE_KEY, saved.clone()))
            .path("/")
            .same_site(SameSite::Lax)
            .permanent(),
    );
}

fn status_of(result: &Result<LeadReceipt, LeadError>) -> Status {
    match result {
        Ok(_) => Status::Ok,
        Err(e) => Status::new(e.status()),
    }
}

#[rocket::get("/?<lang>")]
fn index(
    lang: Option<&str>,
    visitor: Visitor,
    cookies: &CookieJar<'_>,
    site: &State<LocaleConfig>,
) -> Markup {
    let page = render_for_visitor(site, &visitor, lang, None);
    remember_locale(cookies, &visitor, &page);
    page.html
}

#[rocket::post("/api/lead", format = "form", data = "<form>")]
async fn submit_lead_form(
    form: Form<LeadForm>,
    visitor: Visitor,
    endpoint: &State<LeadEndpoint>,
    site: &State<LocaleConfig>,
) -> (Status, Markup) {
    let result = endpoint.0.submit(form.into_inner().into()).await;
    log_failure(&result);

    let notice = match &result {
        Ok(_) => FormNotice::Sent,
        Err(e) => FormNotice::Failed(e),
    };
    let page = render_for_visitor(site, &visitor, None, Some(notice));
    (status_of(&result), page.html)
}

#[rocket::post("/api/lead", data = "<body>", rank = 2)]
async fn submit_lead_json(body: Vec<u8>, endpoint: &State<LeadEndpoint>) -> (Status, Json<Value>) {
    let result = match LeadRequest::from_json(&body) {
        Ok(lead) => endpoint.0.submit(lead).await,
        Err(e) => Err(e),
    };
    log_failure(&result);

    let body = match &result {
        Ok(_) => json!({ "message": "Enviado com sucesso" }),
        Err(e @ LeadError::Invalid(_)) => {
            json!({ "error": e.public_message(), "fields": e.field_keys() })
        }
        Err(e) => json!({ "error": e.public_message() }),
    };
    (status_of(&result), Json(body))
}

fn log_failure(result: &Result<LeadReceipt, LeadError>) {
    if let Err(e) = result {
        if e.status() >= 500 {
            tracing::error!("Erro ao processar solicitação: {}", e);
        }
    }
}

/// Build the server for `site`, forwarding leads to `leads`.
pub fn build<M: Mailer + 'static>(
    settings: &ServerSettings,
    site: LocaleConfig,
    leads: LeadService<M>,
) -> Rocket<Build> {
    let max_body = settings.max_body_bytes.bytes();
    let limits = Limits::default()
        .limit("form", max_body)
        .limit("json", max_body)
        .limit("bytes", max_body);

    let figment = rocket::Config::figment()
        .merge(("address", settings.host.clone()))
        .merge(("port", settings.port))
        .merge(("keep_alive", KEEP_ALIVE_SECS))
        .merge(("limits", limits));

    rocket::custom(figment)
        .manage(site)
        .manage(LeadEndpoint(Arc::new(leads)))
        .mount(
            "/",
            rocket::routes![index, submit_lead_form, submit_lead_json],
        )
}
