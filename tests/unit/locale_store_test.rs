//! Unit tests for locale detection, switching and notification.

use std::cell::RefCell;
use std::rc::Rc;

use livro_landing::i18n::{
    site_config, FixedLanguage, LocaleStore, MemoryStorage, PreferenceStorage, Runtime,
    TranslationValue, LOCALE_STORAGE_KEY,
};

fn client(storage: &MemoryStorage, language: Option<&str>) -> LocaleStore {
    let language = match language {
        Some(tag) => FixedLanguage::new(tag),
        None => FixedLanguage::none(),
    };
    LocaleStore::new(
        site_config().unwrap(),
        Runtime::client(storage.clone(), language),
    )
}

#[test]
fn test_starts_on_default_before_hydration() {
    let storage = MemoryStorage::with_entry(LOCALE_STORAGE_KEY, "en");
    let store = client(&storage, Some("es-ES"));

    assert_eq!(store.get_locale(), "pt");
    assert!(!store.is_hydrated());
}

#[test]
fn test_persisted_locale_wins_over_language() {
    let storage = MemoryStorage::with_entry(LOCALE_STORAGE_KEY, "en");
    let store = client(&storage, Some("es-ES"));
    store.hydrate();

    assert_eq!(store.get_locale(), "en");
    assert!(store.is_hydrated());
}

#[test]
fn test_language_primary_subtag_is_used() {
    let storage = MemoryStorage::new();
    let store = client(&storage, Some("es-MX"));
    store.hydrate();

    assert_eq!(store.get_locale(), "es");
}

#[test]
fn test_unsupported_sources_fall_back_to_default() {
    let storage = MemoryStorage::with_entry(LOCALE_STORAGE_KEY, "fr");
    let store = client(&storage, Some("de-DE"));
    store.hydrate();
    assert_eq!(store.get_locale(), "pt");

    let store = client(&MemoryStorage::new(), None);
    store.hydrate();
    assert_eq!(store.get_locale(), "pt");
}

#[test]
fn test_server_never_hydrates() {
    let store = LocaleStore::new(site_config().unwrap(), Runtime::Server);
    store.hydrate();

    assert!(!store.is_hydrated());
    assert_eq!(store.get_locale(), "pt");
}

#[test]
fn test_second_hydrate_does_nothing() {
    let storage = MemoryStorage::new();
    let store = client(&storage, Some("en-US"));
    store.hydrate();
    assert_eq!(store.get_locale(), "en");

    storage.set(LOCALE_STORAGE_KEY, "es").unwrap();
    store.hydrate();
    assert_eq!(store.get_locale(), "en");
}

#[test]
fn test_set_locale_persists_and_notifies() {
    let storage = MemoryStorage::new();
    let store = client(&storage, None);
    let calls = Rc::new(RefCell::new(0));

    let counter = Rc::clone(&calls);
    let _subscription = store.subscribe(move || *counter.borrow_mut() += 1);

    assert!(store.set_locale("es"));
    assert_eq!(store.get_locale(), "es");
    assert_eq!(storage.get(LOCALE_STORAGE_KEY).unwrap().as_deref(), Some("es"));
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_invalid_locale_changes_nothing() {
    let storage = MemoryStorage::new();
    let store = client(&storage, None);
    let calls = Rc::new(RefCell::new(0));

    let counter = Rc::clone(&calls);
    let _subscription = store.subscribe(move || *counter.borrow_mut() += 1);

    assert!(!store.set_locale("fr"));
    assert_eq!(store.get_locale(), "pt");
    assert_eq!(storage.get(LOCALE_STORAGE_KEY).unwrap(), None);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_translation_lookup() {
    let store = client(&MemoryStorage::new(), None);

    assert_eq!(store.text("hero.cta"), "Quero meu exemplar");
    assert_eq!(store.text("hero.doesNotExist"), "hero.doesNotExist");
    assert_eq!(store.text("hero"), "hero");
    assert!(matches!(store.t("features.benefits"), TranslationValue::List(_)));

    store.set_locale("en");
    assert_eq!(store.text("hero.cta"), "Get my copy");
}

#[test]
fn test_listeners_run_in_order_and_unsubscribe() {
    let store = client(&MemoryStorage::new(), None);
    let order = Rc::new(RefCell::new(Vec::new()));

    let first = {
        let order = Rc::clone(&order);
        store.subscribe(move || order.borrow_mut().push("first"))
    };
    let _second = {
        let order = Rc::clone(&order);
        store.subscribe(move || order.borrow_mut().push("second"))
    };

    store.set_locale("en");
    assert_eq!(*order.borrow(), vec!["first", "second"]);

    first.unsubscribe();
    store.set_locale("es");
    assert_eq!(*order.borrow(), vec!["first", "second", "second"]);
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn test_hydrate_then_switch_scenario() {
    let storage = MemoryStorage::new();
    let store = client(&storage, Some("en-US"));
    let seen = Rc::new(RefCell::new(Vec::new()));

    let _subscription = {
        let seen = Rc::clone(&seen);
        store.subscribe(move || seen.borrow_mut().push(()))
    };

    store.hydrate();
    assert_eq!(store.get_locale(), "en");
    assert_eq!(seen.borrow().len(), 1);

    store.set_locale("pt");
    assert_eq!(store.text("hero.cta"), "Quero meu exemplar");
    assert_eq!(storage.get(LOCALE_STORAGE_KEY).unwrap().as_deref(), Some("pt"));
    assert_eq!(seen.borrow().len(), 2);
}
