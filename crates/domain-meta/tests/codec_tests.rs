//! Tests for the canonical configuration codec

use std::collections::BTreeMap;

use domain_meta::{ConfigCodec, ContentType, DomainEntity, FieldDef, SettingType, ViewDef};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Map, Value, json};

#[test]
fn untitled_domain_canonical_text() {
    let codec = ConfigCodec::new();
    let domain = DomainEntity::new("Untitled Domain", "untitled");

    assert_eq!(
        codec.serialize(&domain),
        concat!(
            r#"{"title":"Untitled Domain","identifier":"untitled","content_types":[],"setting_types":[],"#,
            r#""domain_member_types":[{"title":"Editors","identifier":"editor","fields":[]},"#,
            r#"{"title":"Viewers","identifier":"viewer","fields":[]}],"#,
            r#""roles":["ROLE_PUBLIC","ROLE_EDITOR","ROLE_ADMINISTRATOR"]}"#
        )
    );
}

#[test]
fn pretty_and_compact_forms_parse_to_same_canonical_text() {
    let codec = ConfigCodec::new();
    let domain = DomainEntity::new("Blog", "blog");

    let pretty = codec.serialize_pretty(&domain);
    assert!(pretty.contains('\n'));
    assert_eq!(codec.canonicalize(&pretty).unwrap(), codec.serialize(&domain));
}

#[rstest]
#[case(r#"{"title":"Blog","identifier":"blog","roles":["ROLE_PUBLIC"]}"#)]
#[case(r#"{ "roles": ["ROLE_PUBLIC"], "identifier": "blog", "title": "Blog" }"#)]
#[case("{\n  \"identifier\": \"blog\",\n  \"title\": \"Blog\",\n  \"roles\": [\"ROLE_PUBLIC\"]\n}")]
#[case(r#"{"title":"Blog","identifier":"blog","variables":{"@public":"ROLE_PUBLIC"},"roles":["@public"]}"#)]
fn equivalent_documents_share_canonical_text(#[case] text: &str) {
    let codec = ConfigCodec::new();
    let expected = codec
        .canonicalize(r#"{"title":"Blog","identifier":"blog","roles":["ROLE_PUBLIC"]}"#)
        .unwrap();
    assert_eq!(codec.canonicalize(text).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("{")]
#[case("null")]
#[case(r#"{"title":1,"identifier":"blog"}"#)]
#[case(r#"{"title":"Blog","identifier":"blog","variables":"nope"}"#)]
#[case(r#"{"title":"Blog","identifier":"blog","content_types":[{"title":"No identifier"}]}"#)]
fn malformed_documents_fail_to_parse(#[case] text: &str) {
    assert!(ConfigCodec::new().parse(text).is_err());
}

#[test]
fn field_settings_key_order_is_irrelevant() {
    let codec = ConfigCodec::new();
    let a = codec
        .canonicalize(r#"{"title":"B","identifier":"b","content_types":[{"identifier":"n","fields":[{"identifier":"f","type":"text","settings":{"a":1,"b":2}}]}]}"#)
        .unwrap();
    let b = codec
        .canonicalize(r#"{"title":"B","identifier":"b","content_types":[{"identifier":"n","fields":[{"identifier":"f","type":"text","settings":{"b":2,"a":1}}]}]}"#)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn content_type_members_keep_their_order() {
    let codec = ConfigCodec::new();
    let text = codec
        .canonicalize(concat!(
            r#"{"permissions":{"view":"ROLE_PUBLIC"},"identifier":"b","title":"B","content_types":[{"#,
            r#""locales":["de"],"permissions":{"update":"ROLE_EDITOR"},"fields":[],"#,
            r#""description":"Posts","icon":"pen","identifier":"news","title":"News"}]}"#
        ))
        .unwrap();

    assert_eq!(
        text,
        concat!(
            r#"{"title":"B","identifier":"b","content_types":[{"title":"News","identifier":"news","#,
            r#""icon":"pen","description":"Posts","fields":[],"#,
            r#""views":[{"title":"All","identifier":"all","type":"table"}],"#,
            r#""permissions":{"update":"ROLE_EDITOR"},"locales":["de"]}],"setting_types":[],"#,
            r#""domain_member_types":[{"title":"Editors","identifier":"editor","fields":[]},"#,
            r#"{"title":"Viewers","identifier":"viewer","fields":[]}],"#,
            r#""roles":["ROLE_PUBLIC","ROLE_EDITOR","ROLE_ADMINISTRATOR"],"#,
            r#""permissions":{"view":"ROLE_PUBLIC"}}"#
        )
    );
}

#[test]
fn canonical_value_matches_text() {
    let codec = ConfigCodec::new();
    let domain = DomainEntity::new("Blog", "blog");
    let value: Value = serde_json::from_str(&codec.serialize(&domain)).unwrap();
    assert_eq!(value, codec.to_value(&domain));
    assert_eq!(value["roles"], json!(["ROLE_PUBLIC", "ROLE_EDITOR", "ROLE_ADMINISTRATOR"]));
}

fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

fn arb_settings() -> impl Strategy<Value = Map<String, Value>> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z #]{0,6}".prop_map(Value::String),
    ];
    prop::collection::btree_map("[a-z]{1,5}", leaf, 0..4).prop_map(|m| m.into_iter().collect())
}

fn arb_field() -> impl Strategy<Value = FieldDef> {
    (
        "[A-Za-z ]{0,8}",
        arb_identifier(),
        "(text|number|reference)",
        arb_settings(),
    )
        .prop_map(|(title, identifier, field_type, settings)| FieldDef {
            title,
            identifier,
            field_type,
            settings,
        })
}

fn arb_view() -> impl Strategy<Value = ViewDef> {
    ("[A-Za-z ]{0,8}", arb_identifier(), arb_settings()).prop_map(|(title, identifier, settings)| {
        ViewDef {
            title,
            identifier,
            view_type: "table".to_string(),
            settings,
        }
    })
}

fn arb_permissions() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("(view|create|update|delete)", "[A-Z_]{1,12}", 0..3)
}

fn arb_content_type() -> impl Strategy<Value = ContentType> {
    (
        "[A-Za-z ]{0,8}",
        arb_identifier(),
        prop::option::of("[a-z]{1,6}"),
        prop::collection::vec(arb_field(), 0..3),
        prop::collection::vec(arb_view(), 1..3),
        arb_permissions(),
        prop::collection::vec("[a-z]{2}", 0..3),
    )
        .prop_map(|(title, identifier, icon, fields, views, permissions, locales)| ContentType {
            title,
            identifier,
            icon,
            description: None,
            fields,
            views,
            permissions,
            locales,
        })
}

fn arb_setting_type() -> impl Strategy<Value = SettingType> {
    (arb_identifier(), prop::collection::vec(arb_field(), 0..3)).prop_map(|(identifier, fields)| {
        SettingType {
            title: identifier.to_uppercase(),
            identifier,
            icon: None,
            description: Some("settings".to_string()),
            fields,
            permissions: BTreeMap::new(),
            locales: Vec::new(),
        }
    })
}

fn arb_domain() -> impl Strategy<Value = DomainEntity> {
    (
        "[A-Za-z ]{1,12}",
        arb_identifier(),
        prop::collection::vec(arb_content_type(), 0..3),
        prop::collection::vec(arb_setting_type(), 0..2),
        prop::collection::vec("ROLE_[A-Z]{1,8}", 1..4),
        arb_permissions(),
    )
        .prop_map(|(title, identifier, content_types, setting_types, roles, permissions)| {
            let mut domain = DomainEntity::new(title, identifier);
            domain.content_types = content_types;
            domain.setting_types = setting_types;
            domain.roles = roles;
            domain.permissions = permissions;
            domain
        })
}

proptest! {
    #[test]
    fn serialize_parse_round_trip(domain in arb_domain()) {
        let codec = ConfigCodec::new();
        let text = codec.serialize(&domain);
        let parsed = codec.parse(&text).unwrap();
        prop_assert_eq!(codec.serialize(&parsed), text);
    }

    #[test]
    fn pretty_text_round_trips(domain in arb_domain()) {
        let codec = ConfigCodec::new();
        let parsed = codec.parse(&codec.serialize_pretty(&domain)).unwrap();
        prop_assert_eq!(codec.serialize(&parsed), codec.serialize(&domain));
    }
}
