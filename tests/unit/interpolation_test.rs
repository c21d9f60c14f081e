//! Unit tests for placeholder substitution through the store.

use livro_landing::i18n::{interpolate, LocaleConfig, LocaleStore, Runtime, TranslationTable, Variables};
use livro_landing::t;

fn store() -> LocaleStore {
    let mut table = TranslationTable::new();
    table
        .insert_json(
            "pt",
            r#"{ "greeting": "Olá, {{name}}! Você tem {{count}} mensagens.", "plain": "Sem variáveis" }"#,
        )
        .unwrap();
    let config = LocaleConfig::new("pt", &["pt"], table).unwrap();
    LocaleStore::new(config, Runtime::Server)
}

#[test]
fn test_all_placeholders_replaced() {
    let store = store();
    let vars = Variables::new().with("name", "Ana").with("count", 3);

    assert_eq!(
        store.text_args("greeting", &vars),
        "Olá, Ana! Você tem 3 mensagens."
    );
}

#[test]
fn test_unknown_placeholder_is_kept() {
    let store = store();
    let vars = Variables::new().with("name", "Ana");

    assert_eq!(
        store.text_args("greeting", &vars),
        "Olá, Ana! Você tem {{count}} mensagens."
    );
}

#[test]
fn test_text_without_placeholders_is_unchanged() {
    let store = store();
    let vars = Variables::new().with("name", "Ana");

    assert_eq!(store.text_args("plain", &vars), "Sem variáveis");
    assert_eq!(store.text("greeting"), "Olá, {{name}}! Você tem {{count}} mensagens.");
}

#[test]
fn test_missing_key_is_not_interpolated() {
    let store = store();
    assert_eq!(t!(store, "nope.{{name}}", "name" => "Ana"), "nope.{{name}}");
}

#[test]
fn test_macro_forms() {
    let store = store();
    assert_eq!(t!(store, "plain"), "Sem variáveis");
    assert_eq!(
        t!(store, "greeting", "name" => "Rui", "count" => 0),
        "Olá, Rui! Você tem 0 mensagens."
    );
}

#[test]
fn test_placeholder_names_are_words() {
    let vars = Variables::from([("a_1", "x")]);
    assert_eq!(interpolate("{{a_1}} {{a-1}} {{ a_1 }}", Some(&vars)), "x {{a-1}} {{ a_1 }}");
}
