//! Integration tests for the landing page routes and the lead endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use livro_landing::i18n::site_config;
use livro_landing::lead::{LeadEmail, LeadService, MailError, Mailer};
use livro_landing::server;
use livro_landing::storage::{MailSettings, ServerSettings};
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};

/// Mailer that counts deliveries and fails on demand.
#[derive(Default)]
struct CountingMailer {
    delivered: Arc<AtomicUsize>,
    fail: bool,
}

impl Mailer for CountingMailer {
    async fn send(&self, _email: &LeadEmail) -> Result<String, MailError> {
        if self.fail {
            return Err(MailError::Rejected(502));
        }
        let n = self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(format!("msg-{}", n))
    }
}

async fn start(mailer: CountingMailer) -> Client {
    let settings = ServerSettings {
        max_body_bytes: 1024,
        ..Default::default()
    };
    let leads = LeadService::new(mailer, MailSettings::default());
    Client::tracked(server::build(&settings, site_config().unwrap(), leads))
        .await
        .unwrap()
}

async fn post_lead(client: &Client, body: Value) -> (Status, Value) {
    let response = client
        .post("/api/lead")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_json().await.unwrap())
}

#[rocket::async_test]
async fn test_page_is_served_in_default_locale() {
    let client = start(CountingMailer::default()).await;

    let response = client.get("/").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap();
    assert!(html.contains(r#"<html lang="pt">"#));
    assert!(html.contains("Quero meu exemplar"));
    assert!(html.contains(r#"<form method="post" action="/api/lead">"#));

    let missing = client.get("/nope").dispatch().await;
    assert_eq!(missing.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_lead_lifecycle() {
    let mailer = CountingMailer::default();
    let delivered = Arc::clone(&mailer.delivered);
    let client = start(mailer).await;

    let lead = json!({ "nome": "Ana", "email": "ana@example.com", "telefone": "(11) 99999-8888" });

    let (status, body) = post_lead(&client, lead.clone()).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({ "message": "Enviado com sucesso" }));

    let (status, body) = post_lead(&client, lead).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body, json!({ "error": "Lead já cadastrado" }));

    let (status, body) = post_lead(&client, json!({ "nome": "Ana" })).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body, json!({ "error": "Todos os campos são obrigatórios" }));

    assert_eq!(delivered.load(Ordering::SeqCst), 1);
}

#[rocket::async_test]
async fn test_urlencoded_form_post() {
    let mailer = CountingMailer::default();
    let delivered = Arc::clone(&mailer.delivered);
    let client = start(mailer).await;

    let response = client
        .post("/api/lead")
        .header(ContentType::Form)
        .body("nome=Ana+Lima&email=ana%40example.com&telefone=11999998888")
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.content_type(), Some(ContentType::HTML));
    let html = response.into_string().await.unwrap();
    assert!(html.contains("Dados enviados com sucesso!"));
    assert_eq!(delivered.load(Ordering::SeqCst), 1);

    // The same lead again, as JSON, is a duplicate.
    let lead = json!({ "nome": "Ana Lima", "email": "ana@example.com", "telefone": "11999998888" });
    let (status, _) = post_lead(&client, lead).await;
    assert_eq!(status, Status::BadRequest);
}

#[rocket::async_test]
async fn test_invalid_form_post_shows_field_messages() {
    let mailer = CountingMailer::default();
    let delivered = Arc::clone(&mailer.delivered);
    let client = start(mailer).await;

    let response = client
        .post("/api/lead")
        .header(ContentType::Form)
        .body("nome=Al&email=ana&telefone=123")
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    let html = response.into_string().await.unwrap();
    assert!(html.contains(r#"role="alert""#));
    assert!(html.contains("Digite pelo menos 3 letras no nome."));
    assert_eq!(delivered.load(Ordering::SeqCst), 0);
}

#[rocket::async_test]
async fn test_invalid_fields_are_listed() {
    let client = start(CountingMailer::default()).await;

    let lead = json!({ "nome": "Ana", "email": "ana@example", "telefone": "11999998888" });
    let (status, body) = post_lead(&client, lead).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(
        body,
        json!({ "error": "Dados inválidos", "fields": ["form.errorEmail"] })
    );
}

#[rocket::async_test]
async fn test_delivery_failure_is_internal_error() {
    let client = start(CountingMailer {
        fail: true,
        ..Default::default()
    })
    .await;

    let lead = json!({ "nome": "Ana", "email": "ana@example.com", "telefone": "11999998888" });
    let (status, body) = post_lead(&client, lead).await;
    assert_eq!(status, Status::InternalServerError);
    assert_eq!(body, json!({ "error": "Erro interno do servidor" }));
}

#[rocket::async_test]
async fn test_oversized_body_is_rejected() {
    let client = start(CountingMailer::default()).await;

    let padding = "x".repeat(4096);
    let response = client
        .post("/api/lead")
        .header(ContentType::JSON)
        .body(json!({ "nome": padding }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::PayloadTooLarge);
}
