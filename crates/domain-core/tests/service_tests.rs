//! Domain and membership services against in-memory and on-disk backends

use domain_core::{
    CheckStatus, DomainRules, DomainService, Error, FileStore, FlowState, FlowWarning,
    MembershipService, MemoryStore, PendingEdit, RecordingNotifier, Step, Store, StoreState,
};
use std::collections::BTreeSet;

use domain_fs::{ConfigSource, DomainKey, FsConfigSource, MemoryConfigSource};
use domain_meta::{Accessor, ApiKey, ConfigCodec, DomainMember, Organization, User};
use domain_test_utils::fixtures::{BLOG_DOMAIN, BLOG_DOMAIN_RETITLED, TEST_USER};
use domain_test_utils::workspace::TestWorkspace;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use serde_json::{Map, Value};

fn acme_store() -> MemoryStore {
    let mut state = StoreState::default();
    let mut acme = Organization::new("acme", "ACME");
    acme.members.push(User::new(TEST_USER.email, TEST_USER.name));
    acme.api_keys.push(ApiKey::new("deploy"));
    state.organizations.insert("acme".into(), acme);
    MemoryStore::with_state(state)
}

fn acme_store_with_blog() -> MemoryStore {
    let mut store = acme_store();
    let blog = ConfigCodec::new()
        .parse(BLOG_DOMAIN)
        .unwrap()
        .with_organization("acme");
    store.persist(&blog);
    store.flush().unwrap();
    store
}

type MemoryDomains = DomainService<MemoryStore, MemoryConfigSource, DomainRules>;

/// Config source whose directory listing always fails
struct UnlistableSource(MemoryConfigSource);

impl ConfigSource for UnlistableSource {
    fn exists(&self, key: &DomainKey) -> bool {
        self.0.exists(key)
    }

    fn read(&self, key: &DomainKey) -> domain_fs::Result<String> {
        self.0.read(key)
    }

    fn list_available(&self, organization: &str) -> domain_fs::Result<BTreeSet<String>> {
        Err(domain_fs::Error::io(
            format!("config/{organization}"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        ))
    }

    fn write(&mut self, key: &DomainKey, content: &str) -> domain_fs::Result<()> {
        self.0.write(key, content)
    }
}

#[fixture]
fn domains() -> MemoryDomains {
    DomainService::new(acme_store(), MemoryConfigSource::new(), DomainRules)
}

#[fixture]
fn members() -> MembershipService<MemoryStore, RecordingNotifier> {
    MembershipService::new(
        acme_store_with_blog(),
        RecordingNotifier::new(),
        "https://cms.example.com",
    )
}

// Domains

#[rstest]
fn create_persists_and_writes_config(mut domains: MemoryDomains) {
    let outcome = domains.create("acme", BLOG_DOMAIN).unwrap();

    let created = outcome.done().expect("domain should be created");
    assert_eq!(created.organization, "acme");
    assert!(domains.store().find_domain("acme", "blog").is_some());
    let written = domains.source().get(&DomainKey::new("acme", "blog")).unwrap();
    assert_eq!(
        ConfigCodec::new().canonicalize(written).unwrap(),
        ConfigCodec::new().canonicalize(BLOG_DOMAIN).unwrap()
    );
}

#[rstest]
fn create_rejects_unparsable_text(mut domains: MemoryDomains) {
    let outcome = domains.create("acme", "{").unwrap();

    assert_eq!(outcome.errors()[0].message, "Could not parse domain definition JSON.");
    assert_eq!(domains.store().flush_count(), 0);
}

#[rstest]
fn create_rejects_taken_identifier(mut domains: MemoryDomains) {
    assert!(domains.create("acme", BLOG_DOMAIN).unwrap().is_done());

    let outcome = domains.create("acme", BLOG_DOMAIN_RETITLED).unwrap();

    assert_eq!(outcome.errors()[0].path, "identifier");
    assert_eq!(domains.store().domains("acme").len(), 1);
}

#[rstest]
fn create_requires_known_organization(mut domains: MemoryDomains) {
    assert!(matches!(
        domains.create("globex", BLOG_DOMAIN),
        Err(Error::OrganizationNotFound { .. })
    ));
}

#[rstest]
fn create_seed_is_untitled(domains: MemoryDomains) {
    let seed = ConfigCodec::new().parse(&domains.create_seed()).unwrap();
    assert_eq!(seed.title, "Untitled Domain");
    assert_eq!(seed.identifier, "untitled");
}

#[test]
fn index_lists_importable_configs() {
    let source = MemoryConfigSource::new()
        .with(DomainKey::new("acme", "blog"), BLOG_DOMAIN)
        .with(DomainKey::new("acme", "shop"), "{}");
    let domains = DomainService::new(acme_store_with_blog(), source, DomainRules);

    let index = domains.index("acme").unwrap();

    assert_eq!(index.domains.len(), 1);
    assert_eq!(index.missing, vec!["shop".to_string()]);
    assert!(index.warnings.is_empty());
}

#[test]
fn listing_failure_is_a_warning() {
    let source = UnlistableSource(
        MemoryConfigSource::new().with(DomainKey::new("acme", "blog"), BLOG_DOMAIN),
    );
    let domains = DomainService::new(acme_store_with_blog(), source, DomainRules);

    let index = domains.index("acme").unwrap();
    assert_eq!(index.domains.len(), 1);
    assert_eq!(index.domains[0].identifier, "blog");
    assert!(index.missing.is_empty());
    assert_eq!(index.warnings.len(), 1);
    assert!(index.warnings[0].starts_with("Cannot list configuration files"));

    let report = domains.check("acme").unwrap();
    assert_eq!(report.status, CheckStatus::Healthy);
    assert!(report.unimported.is_empty());
    assert_eq!(report.messages.len(), 1);
    assert!(report.messages[0].starts_with("Cannot list configuration files"));
}

#[test]
fn import_seed_reads_filesystem_config() {
    let source = MemoryConfigSource::new()
        .with(DomainKey::new("acme", "blog"), BLOG_DOMAIN)
        .with(DomainKey::new("acme", "broken"), "[1, 2");
    let domains = DomainService::new(acme_store(), source, DomainRules);

    assert_eq!(domains.import_seed("acme", "blog").unwrap(), BLOG_DOMAIN);
    assert!(matches!(
        domains.import_seed("acme", "broken"),
        Err(Error::ConfigSource { .. })
    ));
    assert!(matches!(
        domains.import_seed("acme", "absent"),
        Err(Error::ConfigSource { .. })
    ));
}

#[test]
fn update_reconciles_drifted_file_on_disk() {
    let workspace = TestWorkspace::new().with_manifest("");
    let store = FileStore::open(workspace.root().join(".domains/store.json")).unwrap();
    let mut domains = DomainService::new(
        store,
        FsConfigSource::new(workspace.root().join("config")),
        DomainRules,
    );
    domains.store_mut().save_organization(Organization::new("acme", "ACME"));
    domains.store_mut().flush().unwrap();
    assert!(domains.create("acme", BLOG_DOMAIN).unwrap().is_done());
    workspace.assert_file_exists("config/acme/blog.json");

    workspace.write_config("acme", "blog", BLOG_DOMAIN_RETITLED);
    assert_eq!(domains.check("acme").unwrap().status, CheckStatus::Drifted);

    let mut session = domains.begin_update("acme", "blog").unwrap();
    assert_eq!(session.warnings(), &[FlowWarning::Drift]);
    let seed = session.seed().to_string();

    let step = domains.apply_update(&mut session, &PendingEdit::submit(seed)).unwrap();
    assert!(matches!(step, Step::Preview(_)));
    let step = domains.apply_update(&mut session, &PendingEdit::confirm()).unwrap();
    assert!(matches!(step, Step::Committed(_)));
    assert_eq!(session.state(), FlowState::Committed);

    let reopened = FileStore::open(workspace.root().join(".domains/store.json")).unwrap();
    assert_eq!(reopened.find_domain("acme", "blog").unwrap().title, "Company Blog");
    assert!(domains.check("acme").unwrap().is_healthy());
    workspace.assert_file_contains("config/acme/blog.json", "Company Blog");
}

#[test]
fn update_writes_missing_config() {
    let workspace = TestWorkspace::new();
    let mut domains = DomainService::new(
        acme_store_with_blog(),
        FsConfigSource::new(workspace.root().join("config")),
        DomainRules,
    );
    assert_eq!(domains.check("acme").unwrap().status, CheckStatus::Missing);

    let mut session = domains.begin_update("acme", "blog").unwrap();
    assert!(session.entity().is_config_changed());
    let seed = session.seed().to_string();
    domains.apply_update(&mut session, &PendingEdit::submit(seed)).unwrap();
    domains.apply_update(&mut session, &PendingEdit::confirm()).unwrap();

    workspace.assert_file_exists("config/acme/blog.json");
    assert!(domains.check("acme").unwrap().is_healthy());
}

#[test]
fn update_renames_domain_with_its_members() {
    let mut store = acme_store_with_blog();
    let member = DomainMember::new("acme", "blog", "editor", Accessor::of(&ApiKey::new("ci")));
    store.persist_member(&member);
    store.flush().unwrap();
    let source = MemoryConfigSource::new().with(DomainKey::new("acme", "blog"), BLOG_DOMAIN);
    let mut domains = DomainService::new(store, source, DomainRules);

    let mut session = domains.begin_update("acme", "blog").unwrap();
    let renamed = BLOG_DOMAIN.replace(r#""identifier": "blog""#, r#""identifier": "journal""#);
    let step = domains.apply_update(&mut session, &PendingEdit::submit(renamed)).unwrap();
    assert!(matches!(step, Step::Preview(_)));
    let step = domains.apply_update(&mut session, &PendingEdit::confirm()).unwrap();
    assert!(matches!(step, Step::Committed(_)));

    let written = domains.source().get(&DomainKey::new("acme", "journal")).unwrap();
    assert!(written.contains(r#""journal""#));
    assert!(domains.store().find_domain("acme", "blog").is_none());
    assert!(domains.store().find_domain("acme", "journal").is_some());
    let moved = domains.store().members("acme", "journal", None);
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].id, member.id);
    assert!(domains.store().members("acme", "blog", None).is_empty());

    let report = domains.check("acme").unwrap();
    assert!(report.is_healthy());
    assert_eq!(report.unimported, vec!["blog".to_string()]);
}

#[test]
fn check_reports_every_kind_of_problem() {
    let codec = ConfigCodec::new();
    let mut store = acme_store_with_blog();
    for identifier in ["news", "shop"] {
        let domain = codec
            .parse(&BLOG_DOMAIN.replace(r#""identifier": "blog""#, &format!(r#""identifier": "{identifier}""#)))
            .unwrap()
            .with_organization("acme");
        store.persist(&domain);
    }
    store.flush().unwrap();

    let source = MemoryConfigSource::new()
        .with(DomainKey::new("acme", "blog"), BLOG_DOMAIN_RETITLED)
        .with(DomainKey::new("acme", "news"), "not json")
        .with(DomainKey::new("acme", "legacy"), BLOG_DOMAIN);
    let domains = DomainService::new(store, source, DomainRules);

    let report = domains.check("acme").unwrap();

    assert_eq!(report.status, CheckStatus::Broken);
    assert_eq!(report.drifted.len(), 1);
    assert_eq!(report.drifted[0].domain, "acme/blog");
    assert!(report.drifted[0].changes[0].starts_with("~ title"));
    assert_eq!(report.broken[0].domain, "acme/news");
    assert_eq!(report.missing[0].domain, "acme/shop");
    assert_eq!(report.unimported, vec!["legacy".to_string()]);
}

#[test]
fn delete_refuses_domains_with_members() {
    let mut store = acme_store_with_blog();
    let member = DomainMember::new("acme", "blog", "editor", Accessor::of(&ApiKey::new("ci")));
    store.persist_member(&member);
    store.flush().unwrap();
    let mut domains = DomainService::new(store, MemoryConfigSource::new(), DomainRules);

    let outcome = domains.delete("acme", "blog").unwrap();
    assert_eq!(outcome.errors()[0].path, "members");
    assert!(domains.store().find_domain("acme", "blog").is_some());

    domains.store_mut().remove_member(member.id);
    domains.store_mut().flush().unwrap();
    assert!(domains.delete("acme", "blog").unwrap().is_done());
    assert!(domains.store().find_domain("acme", "blog").is_none());
}

#[test]
fn delete_keeps_config_file() {
    let source = MemoryConfigSource::new().with(DomainKey::new("acme", "blog"), BLOG_DOMAIN);
    let mut domains = DomainService::new(acme_store_with_blog(), source, DomainRules);

    assert!(domains.delete("acme", "blog").unwrap().is_done());
    assert!(domains.source().get(&DomainKey::new("acme", "blog")).is_some());
    assert_eq!(domains.index("acme").unwrap().missing, vec!["blog".to_string()]);
}

// Memberships

#[rstest]
fn candidates_exclude_existing_members(mut members: MembershipService<MemoryStore, RecordingNotifier>) {
    let candidates = members.candidates("acme", "blog", "editor").unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].label, "deploy (API key)");

    let user = candidates[1].id;
    let outcome = members
        .add_member("acme", "blog", "editor", user, vec!["ROLE_EDITOR".into()])
        .unwrap();
    assert!(outcome.is_done());

    let remaining = members.candidates("acme", "blog", "editor").unwrap();
    assert_eq!(remaining.len(), 1);
    // still a candidate for another member type
    assert_eq!(members.candidates("acme", "blog", "viewer").unwrap().len(), 2);

    let again = members
        .add_member("acme", "blog", "editor", user, Vec::new())
        .unwrap();
    assert_eq!(again.errors()[0].path, "accessor");
}

#[rstest]
fn add_member_checks_roles(mut members: MembershipService<MemoryStore, RecordingNotifier>) {
    let user = members.candidates("acme", "blog", "editor").unwrap()[1].id;

    let outcome = members
        .add_member("acme", "blog", "editor", user, vec!["ROLE_OWNER".into()])
        .unwrap();

    assert_eq!(outcome.errors()[0].path, "roles[0]");
    assert!(members.list("acme", "blog", "editor").unwrap().members.is_empty());
}

#[rstest]
fn unknown_member_type_is_an_error(members: MembershipService<MemoryStore, RecordingNotifier>) {
    assert!(matches!(
        members.list("acme", "blog", "author"),
        Err(Error::Meta(_))
    ));
}

#[rstest]
fn invite_saves_and_notifies(mut members: MembershipService<MemoryStore, RecordingNotifier>) {
    let invitation = members
        .invite("acme", "blog", "viewer", "new@example.com", vec!["ROLE_PUBLIC".into()])
        .unwrap()
        .done()
        .expect("invitation should be saved");

    assert_eq!(invitation.token.len(), 43);
    let listing = members.list("acme", "blog", "viewer").unwrap();
    assert_eq!(listing.invitations, vec![invitation.clone()]);

    let sent = members.notifier().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "new@example.com");
    assert_eq!(sent[0].template, "invitation");
    assert_eq!(
        sent[0].data["accept_url"],
        Value::String(format!(
            "https://cms.example.com/profile/accept-invitation?token={}",
            invitation.token
        ))
    );
}

#[test]
fn invite_survives_notifier_failure() {
    let mut members = MembershipService::new(
        acme_store_with_blog(),
        RecordingNotifier::failing(),
        "https://cms.example.com",
    );

    let outcome = members
        .invite("acme", "blog", "viewer", "new@example.com", Vec::new())
        .unwrap();

    assert!(outcome.is_done());
    assert_eq!(members.list("acme", "blog", "viewer").unwrap().invitations.len(), 1);
}

#[rstest]
fn invite_rejects_bad_email(mut members: MembershipService<MemoryStore, RecordingNotifier>) {
    let outcome = members
        .invite("acme", "blog", "viewer", "not-an-email", Vec::new())
        .unwrap();

    assert_eq!(outcome.errors()[0].path, "email");
    assert!(members.notifier().sent().is_empty());
    assert!(members.store().state().invitations.is_empty());
}

#[rstest]
fn update_member_validates_data(mut members: MembershipService<MemoryStore, RecordingNotifier>) {
    let user = members.candidates("acme", "blog", "editor").unwrap()[1].id;
    let member = members
        .add_member("acme", "blog", "editor", user, Vec::new())
        .unwrap()
        .done()
        .unwrap();
    let flushes = members.store().flush_count();

    let mut data = Map::new();
    data.insert("nickname".into(), Value::String("ada".into()));
    let outcome = members
        .update_member("acme", "blog", "editor", member.id, Some(vec!["ROLE_EDITOR".into()]), Some(data))
        .unwrap();

    assert_eq!(outcome.errors()[0].path, "data.nickname");
    assert_eq!(members.store().flush_count(), flushes);
    assert!(members.list("acme", "blog", "editor").unwrap().members[0].roles.is_empty());

    let outcome = members
        .update_member("acme", "blog", "editor", member.id, Some(vec!["ROLE_EDITOR".into()]), None)
        .unwrap();
    assert_eq!(outcome.done().unwrap().roles, vec!["ROLE_EDITOR".to_string()]);
}

#[rstest]
fn remove_member_and_delete_invite(mut members: MembershipService<MemoryStore, RecordingNotifier>) {
    let user = members.candidates("acme", "blog", "editor").unwrap()[1].id;
    let member = members
        .add_member("acme", "blog", "editor", user, Vec::new())
        .unwrap()
        .done()
        .unwrap();
    let invitation = members
        .invite("acme", "blog", "editor", "new@example.com", Vec::new())
        .unwrap()
        .done()
        .unwrap();

    members.remove_member("acme", "blog", "editor", member.id).unwrap();
    members.delete_invite("acme", "blog", "editor", invitation.id).unwrap();

    let listing = members.list("acme", "blog", "editor").unwrap();
    assert!(listing.members.is_empty());
    assert!(listing.invitations.is_empty());
    assert!(matches!(
        members.remove_member("acme", "blog", "editor", member.id),
        Err(Error::MemberNotFound { .. })
    ));
}

#[test]
fn organizations_users_and_keys_are_validated() {
    let mut members = MembershipService::new(MemoryStore::new(), RecordingNotifier::new(), "");

    assert!(members.add_organization("acme", "ACME").unwrap().is_done());
    assert_eq!(
        members.add_organization("acme", "Again").unwrap().errors()[0].path,
        "identifier"
    );
    assert!(!members.add_organization("Not Valid", "X").unwrap().is_done());

    assert!(members.add_user("acme", TEST_USER.email, TEST_USER.name).unwrap().is_done());
    assert!(!members.add_user("acme", "ADA@example.com", "").unwrap().is_done());
    assert!(members.add_api_key("acme", "deploy").unwrap().is_done());
    assert!(!members.add_api_key("acme", "deploy").unwrap().is_done());

    let acme = members.store().organization("acme").unwrap();
    assert_eq!(acme.members.len(), 1);
    assert_eq!(acme.api_keys.len(), 1);
}
