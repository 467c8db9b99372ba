//! Tests for legacy variable migration

use domain_content::{migrate_legacy_variables, substitute_variables};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

fn vars(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

#[test]
fn legacy_values_become_placeholders() {
    let config = r##"{"title":"Blog","identifier":"blog","content_types":[{"identifier":"news","settings":{"bg":"#fff"}}]}"##;

    let migrated = migrate_legacy_variables(config, &vars(json!({"color": "#fff"}))).unwrap();

    assert_eq!(
        migrated,
        r##"{"title":"Blog","identifier":"blog","variables":{"color":"#fff"},"content_types":[{"identifier":"news","settings":{"bg":"color"}}]}"##
    );
}

#[test]
fn leading_keys_move_to_front_in_stable_order() {
    let config = r#"{"roles":["ROLE_PUBLIC"],"identifier":"blog","content_types":[],"title":"Blog"}"#;

    let migrated = migrate_legacy_variables(config, &vars(json!({"n": 5}))).unwrap();
    let root: Value = serde_json::from_str(&migrated).unwrap();
    let keys: Vec<&str> = root.as_object().unwrap().keys().map(String::as_str).collect();

    // Remaining keys keep their input order.
    assert_eq!(keys, vec!["title", "identifier", "variables", "roles", "content_types"]);
}

#[test]
fn migration_then_substitution_restores_values() {
    let config = r#"{"title":"Blog","identifier":"blog","locales":["de","en"],"limit":25}"#;
    let legacy = vars(json!({"langs": ["de", "en"], "page": 25}));

    let migrated = migrate_legacy_variables(config, &legacy).unwrap();
    let mut root: Value = serde_json::from_str(&migrated).unwrap();
    substitute_variables(&mut root).unwrap();

    assert_eq!(
        root,
        json!({"title": "Blog", "identifier": "blog", "locales": ["de", "en"], "limit": 25})
    );
}

#[test]
fn replacement_is_literal_text_substitution() {
    // Known hazard: every textual occurrence of the encoded value is rewritten,
    // including ones that were never meant as a variable.
    let config = r#"{"title":"en","identifier":"blog","locales":["en"]}"#;

    let migrated = migrate_legacy_variables(config, &vars(json!({"lang": "en"}))).unwrap();

    assert_eq!(
        migrated,
        r#"{"title":"lang","identifier":"blog","variables":{"lang":"en"},"locales":["lang"]}"#
    );
}

#[test]
fn non_object_config_is_rejected() {
    assert!(migrate_legacy_variables("[1]", &vars(json!({"a": 1}))).is_err());
}
