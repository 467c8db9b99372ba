//! Configuration documents shared by test suites.
//!
//! The documents are plain text so that every crate, including the lowest
//! layers, can use them without depending on the schema types.

/// The configuration offered when creating a domain.
pub const UNTITLED_DOMAIN: &str = r#"{"title":"Untitled Domain","identifier":"untitled"}"#;

/// A blog domain with one content type, one setting type and table view
/// settings.
pub const BLOG_DOMAIN: &str = r##"{
  "title": "Blog",
  "identifier": "blog",
  "content_types": [
    {
      "title": "Articles",
      "identifier": "articles",
      "fields": [
        {"title": "Headline", "identifier": "headline", "type": "text"},
        {"title": "Body", "identifier": "body", "type": "textarea"}
      ],
      "views": [
        {
          "title": "All",
          "identifier": "all",
          "type": "table",
          "settings": {"limit": 10, "orderBy": [{"field": "headline", "order": "ASC"}]}
        }
      ],
      "permissions": {"view content": "true", "update content": "member.type == \"editor\""}
    }
  ],
  "setting_types": [
    {"title": "Website", "identifier": "website", "fields": [
      {"title": "Color", "identifier": "color", "type": "text", "settings": {"default": "#fff"}}
    ]}
  ]
}"##;

/// [`BLOG_DOMAIN`] with different formatting and key order, but the same
/// meaning.
pub const BLOG_DOMAIN_REORDERED: &str = r##"{"setting_types":[{"fields":[{"settings":{"default":"#fff"},"type":"text","identifier":"color","title":"Color"}],"identifier":"website","title":"Website"}],"identifier":"blog","content_types":[{"permissions":{"update content":"member.type == \"editor\"","view content":"true"},"views":[{"settings":{"orderBy":[{"order":"ASC","field":"headline"}],"limit":10},"type":"table","identifier":"all","title":"All"}],"fields":[{"type":"text","identifier":"headline","title":"Headline"},{"type":"textarea","identifier":"body","title":"Body"}],"identifier":"articles","title":"Articles"}],"title":"Blog"}"##;

/// [`BLOG_DOMAIN`] with a renamed title.
pub const BLOG_DOMAIN_RETITLED: &str = r##"{
  "title": "Company Blog",
  "identifier": "blog",
  "content_types": [
    {
      "title": "Articles",
      "identifier": "articles",
      "fields": [
        {"title": "Headline", "identifier": "headline", "type": "text"},
        {"title": "Body", "identifier": "body", "type": "textarea"}
      ],
      "views": [
        {
          "title": "All",
          "identifier": "all",
          "type": "table",
          "settings": {"limit": 10, "orderBy": [{"field": "headline", "order": "ASC"}]}
        }
      ],
      "permissions": {"view content": "true", "update content": "member.type == \"editor\""}
    }
  ],
  "setting_types": [
    {"title": "Website", "identifier": "website", "fields": [
      {"title": "Color", "identifier": "color", "type": "text", "settings": {"default": "#fff"}}
    ]}
  ]
}"##;

/// A person used wherever a test needs an organization member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestUser {
    pub email: &'static str,
    pub name: &'static str,
}

/// The default organization member of test scenarios.
pub const TEST_USER: TestUser = TestUser {
    email: "ada@example.com",
    name: "Ada Lovelace",
};

/// A second member, for tests that need more than one.
pub const OTHER_USER: TestUser = TestUser {
    email: "grace@example.com",
    name: "Grace Hopper",
};
