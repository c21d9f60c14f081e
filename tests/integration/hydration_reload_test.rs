//! Integration tests for locale persistence across page loads.

use std::cell::Cell;
use std::rc::Rc;

use livro_landing::i18n::{
    site_config, FixedLanguage, LocaleBinding, LocaleStore, MemoryStorage, PreferenceStorage,
    Runtime, LOCALE_STORAGE_KEY,
};
use livro_landing::lead::{LeadService, LogMailer};
use livro_landing::page::render_with;
use livro_landing::server;
use livro_landing::storage::{MailSettings, ServerSettings};
use rocket::http::{Header, Status};
use rocket::local::asynchronous::Client;

async fn client() -> Client {
    let leads = LeadService::new(LogMailer, MailSettings::default());
    let rocket = server::build(&ServerSettings::default(), site_config().unwrap(), leads);
    Client::tracked(rocket).await.unwrap()
}

#[test]
fn test_choice_survives_reload() {
    let storage = MemoryStorage::new();
    let store_with = |storage: &MemoryStorage| {
        LocaleStore::new(
            site_config().unwrap(),
            Runtime::client(storage.clone(), FixedLanguage::new("en-GB")),
        )
    };

    let first = store_with(&storage);
    first.hydrate();
    assert_eq!(first.get_locale(), "en");
    assert!(first.set_locale("es"));

    // A fresh store over the same storage, as after a page reload.
    let reloaded = store_with(&storage);
    assert_eq!(reloaded.get_locale(), "pt");
    reloaded.hydrate();
    assert_eq!(reloaded.get_locale(), "es");
    assert_eq!(reloaded.text("faq.title"), "Preguntas Frecuentes");
}

#[rocket::async_test]
async fn test_selected_locale_is_remembered_by_cookie() {
    let client = client().await;

    let chosen = client.get("/?lang=es").dispatch().await;
    assert_eq!(chosen.status(), Status::Ok);
    let cookie = chosen.cookies().get(LOCALE_STORAGE_KEY).cloned().unwrap();
    assert_eq!(cookie.value(), "es");
    assert!(chosen
        .into_string()
        .await
        .unwrap()
        .contains(r#"<html lang="es">"#));

    // The tracked client sends the cookie back, overriding the header.
    let reload = client
        .get("/")
        .header(Header::new("Accept-Language", "en-US"))
        .dispatch()
        .await;
    let html = reload.into_string().await.unwrap();
    assert!(html.contains(r#"<html lang="es">"#));
    assert!(html.contains("Preguntas Frecuentes"));
}

#[rocket::async_test]
async fn test_unknown_cookie_locale_is_ignored() {
    let client = client().await;

    let response = client
        .get("/")
        .cookie((LOCALE_STORAGE_KEY, "xx"))
        .header(Header::new("Accept-Language", "en-GB,en;q=0.8"))
        .dispatch()
        .await;

    assert!(response.cookies().get(LOCALE_STORAGE_KEY).is_none());
    let html = response.into_string().await.unwrap();
    assert!(html.contains(r#"<html lang="en">"#));
}

#[rocket::async_test]
async fn test_unsupported_selection_keeps_current_locale() {
    let client = client().await;

    let response = client
        .get("/?lang=de")
        .cookie((LOCALE_STORAGE_KEY, "en"))
        .dispatch()
        .await;

    assert!(response.cookies().get(LOCALE_STORAGE_KEY).is_none());
    let html = response.into_string().await.unwrap();
    assert!(html.contains(r#"<html lang="en">"#));
}

#[test]
fn test_binding_rerenders_after_hydration() {
    let storage = MemoryStorage::with_entry(LOCALE_STORAGE_KEY, "en");

    let store = Rc::new(LocaleStore::new(
        site_config().unwrap(),
        Runtime::client(storage.clone(), FixedLanguage::none()),
    ));

    // Server markup and the first client render agree.
    let before = render_with(&store).into_string();
    assert!(before.contains(r#"<html lang="pt">"#));

    let renders = Rc::new(Cell::new(0));
    let counter = Rc::clone(&renders);
    let _watch = store.subscribe(move || counter.set(counter.get() + 1));

    let binding = LocaleBinding::attach(Rc::clone(&store));
    assert!(binding.is_hydrated());
    assert_eq!(binding.locale(), "en");
    assert_eq!(renders.get(), 1);

    let after = render_with(&store).into_string();
    assert!(after.contains(r#"<html lang="en">"#));

    binding.detach();
    assert_eq!(store.listener_count(), 1);
    assert_eq!(storage.get(LOCALE_STORAGE_KEY).unwrap(), Some("en".to_string()));
}
