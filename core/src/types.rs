//! Record DTOs for the ArchivesSpace REST API.
//!
//! # Design
//! These types mirror the JSONModel shapes the server exchanges, defined
//! independently of the mock-server crate; integration tests catch schema
//! drift. Server-stamped audit fields (creator, timestamps) repeat across
//! every record kind, so they live once in [`AuditInfo`] and are composed in
//! with `#[serde(flatten)]`.
//!
//! Optional fields are omitted from payloads when absent, matching the
//! server's "send only what you mean" update semantics. `lock_version` is
//! always serialized: the server requires it for optimistic-concurrency
//! checks on updates. Genuinely open-ended slots (linked entities, rights
//! statements, envelope `stale`/`error`) stay `serde_json::Value` until their
//! full shape set is pinned down.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Path segment for the four agent collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentType {
    People,
    CorporateEntities,
    Families,
    Software,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::People => "people",
            AgentType::CorporateEntities => "corporate_entities",
            AgentType::Families => "families",
            AgentType::Software => "software",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-stamped provenance metadata present on every record kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuditInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_mtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_mtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
}

/// Uniform response body returned by every mutating operation.
///
/// Exactly one of two cases holds: `error` is populated (the mutation was
/// rejected, possibly inside a 2xx response), or the remaining fields
/// describe the outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// An ArchivesSpace repository record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    /// Numeric id; backfilled from `uri` when the server omits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub repo_code: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_representation: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_institution_name: Option<String>,
    #[serde(default)]
    pub lock_version: i64,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

/// A date subrecord (used for agent existence dates and name use dates).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Date {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    #[serde(default)]
    pub lock_version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

/// Text content of a subnote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NoteText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub publish: bool,
}

/// Biographical/historical note attached to an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NoteBiogHist {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnotes: Vec<NoteText>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub publish: bool,
}

/// A single name form for a person agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NamePerson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    #[serde(default)]
    pub lock_version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_of_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub sort_name_auto_generate: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub authorized: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_display_name: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_order: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_dates: Vec<Date>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

/// Contact details attached to an agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentContact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    #[serde(default)]
    pub lock_version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telephones: Vec<String>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

/// A complete agent record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    #[serde(default)]
    pub lock_version: i64,
    /// Numeric id; backfilled from `uri` after a get.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub publish: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_linked_to_published_record: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<NamePerson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<NamePerson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_agents: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates_of_existence: Vec<Date>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agent_contacts: Vec<AgentContact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_agent_roles: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_documents: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rights_statements: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<NoteBiogHist>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

/// External identifier as found in accession records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalId {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

/// Physical extent subrecord of an accession.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Extent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    #[serde(default)]
    pub lock_version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub physical_details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent_type: Option<String>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

/// Institution-defined free-form field set on accession records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserDefined {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    #[serde(default)]
    pub lock_version: i64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub boolean_1: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub boolean_2: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub boolean_3: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub boolean_4: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub boolean_5: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Value>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

/// An accession record scoped under a repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Accession {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonmodel_type: Option<String>,
    #[serde(default)]
    pub lock_version: i64,
    /// Numeric id; backfilled from `uri` after a get.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub suppressed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_string: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub publish: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accession_date: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub restrictions_apply: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub use_restrictions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_0: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_1: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_ids: Vec<ExternalId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_accessions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_events: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extents: Vec<Extent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<Date>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_documents: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rights_statements: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deaccessions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_resources: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_agents: Vec<Agent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_defined: Option<UserDefined>,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_roundtrips_through_json() {
        let repo = Repository {
            jsonmodel_type: Some("repository".to_string()),
            repo_code: "MS".to_string(),
            name: "Manuscripts".to_string(),
            uri: Some("/repositories/16".to_string()),
            country: Some("US".to_string()),
            lock_version: 2,
            audit: AuditInfo {
                created_by: Some("admin".to_string()),
                create_time: Some("2015-11-19T00:43:00Z".to_string()),
                ..AuditInfo::default()
            },
            ..Repository::default()
        };
        let json = serde_json::to_string(&repo).unwrap();
        let back: Repository = serde_json::from_str(&json).unwrap();
        assert_eq!(back, repo);
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let repo = Repository {
            repo_code: "MS".to_string(),
            name: "Manuscripts".to_string(),
            ..Repository::default()
        };
        let json = serde_json::to_value(&repo).unwrap();
        assert_eq!(json["repo_code"], "MS");
        assert_eq!(json["lock_version"], 0);
        assert!(json.get("uri").is_none());
        assert!(json.get("country").is_none());
        assert!(json.get("created_by").is_none());
    }

    #[test]
    fn audit_fields_flatten_to_top_level() {
        let json = r#"{
            "repo_code": "1447893780",
            "name": "This is a test",
            "created_by": "admin",
            "last_modified_by": "admin",
            "create_time": "2015-11-19T00:43:00Z",
            "system_mtime": "2015-11-19T00:43:00Z",
            "user_mtime": "2015-11-19T00:43:00Z",
            "jsonmodel_type": "repository",
            "lock_version": 0,
            "uri": "/repositories/16",
            "agent_representation": {"ref": "/agents/corporate_entities/15"}
        }"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.audit.created_by.as_deref(), Some("admin"));
        assert_eq!(repo.audit.user_mtime.as_deref(), Some("2015-11-19T00:43:00Z"));
        assert_eq!(repo.uri.as_deref(), Some("/repositories/16"));
        assert!(repo.id.is_none());
    }

    #[test]
    fn envelope_decodes_create_response() {
        let json = r#"{"status":"Created","id":3,"lock_version":0,"stale":null,"uri":"/repositories/3","warnings":[]}"#;
        let envelope: ResponseEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.status.as_deref(), Some("Created"));
        assert_eq!(envelope.id, Some(3));
        assert_eq!(envelope.uri.as_deref(), Some("/repositories/3"));
        assert!(envelope.warnings.is_empty());
        assert!(envelope.error.is_none());
    }

    #[test]
    fn envelope_decodes_bare_error() {
        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"error":"Some error message here"}"#).unwrap();
        assert!(envelope.status.is_none());
        assert_eq!(envelope.error, Some(serde_json::json!("Some error message here")));
    }

    #[test]
    fn agent_roundtrips_with_nested_records() {
        let agent = Agent {
            jsonmodel_type: Some("agent_person".to_string()),
            agent_type: Some("agent_person".to_string()),
            publish: true,
            names: vec![NamePerson {
                primary_name: Some("Doiel".to_string()),
                rest_of_name: Some("Robert".to_string()),
                sort_name_auto_generate: true,
                ..NamePerson::default()
            }],
            dates_of_existence: vec![Date {
                begin: Some("1964".to_string()),
                date_type: Some("range".to_string()),
                ..Date::default()
            }],
            notes: vec![NoteBiogHist {
                label: Some("Biography".to_string()),
                subnotes: vec![NoteText {
                    content: Some("Archivist.".to_string()),
                    publish: true,
                    ..NoteText::default()
                }],
                ..NoteBiogHist::default()
            }],
            ..Agent::default()
        };
        let json = serde_json::to_string(&agent).unwrap();
        let back: Agent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, agent);
    }

    #[test]
    fn agent_false_flags_are_omitted() {
        let agent = Agent::default();
        let json = serde_json::to_value(&agent).unwrap();
        assert!(json.get("publish").is_none());
        assert!(json.get("is_linked_to_published_record").is_none());
        assert!(json.get("names").is_none());
    }

    #[test]
    fn accession_roundtrips_with_extents() {
        let accession = Accession {
            jsonmodel_type: Some("accession".to_string()),
            title: Some("Test Accession".to_string()),
            accession_date: Some("2015-11-20".to_string()),
            id_0: Some("2015".to_string()),
            id_1: Some("011".to_string()),
            extents: vec![Extent {
                number: Some("1".to_string()),
                physical_details: "12 linear feet".to_string(),
                portion: Some("whole".to_string()),
                extent_type: Some("linear_feet".to_string()),
                ..Extent::default()
            }],
            external_ids: vec![ExternalId {
                external_id: Some("LP-2015-011".to_string()),
                source: Some("legacy".to_string()),
                ..ExternalId::default()
            }],
            ..Accession::default()
        };
        let json = serde_json::to_string(&accession).unwrap();
        let back: Accession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, accession);
    }

    #[test]
    fn accession_user_defined_is_typed() {
        let accession = Accession {
            title: Some("Gift".to_string()),
            user_defined: Some(UserDefined {
                boolean_1: true,
                text_1: Some("gift".to_string()),
                ..UserDefined::default()
            }),
            ..Accession::default()
        };
        let json = serde_json::to_value(&accession).unwrap();
        assert_eq!(json["user_defined"]["boolean_1"], true);
        assert_eq!(json["user_defined"]["text_1"], "gift");
        let back: Accession = serde_json::from_value(json).unwrap();
        assert_eq!(back.user_defined, accession.user_defined);
    }

    #[test]
    fn extent_always_serializes_physical_details() {
        let extent = Extent::default();
        let json = serde_json::to_value(&extent).unwrap();
        assert_eq!(json["physical_details"], "");
        assert!(json.get("number").is_none());
    }

    #[test]
    fn agent_type_path_segments() {
        assert_eq!(AgentType::People.as_str(), "people");
        assert_eq!(AgentType::CorporateEntities.as_str(), "corporate_entities");
        assert_eq!(AgentType::Families.to_string(), "families");
        assert_eq!(AgentType::Software.to_string(), "software");
    }

    #[test]
    fn user_defined_roundtrips() {
        let ud = UserDefined {
            boolean_1: true,
            text_1: Some("gift".to_string()),
            ..UserDefined::default()
        };
        let json = serde_json::to_value(&ud).unwrap();
        assert_eq!(json["boolean_1"], true);
        assert!(json.get("boolean_2").is_none());
        let back: UserDefined = serde_json::from_value(json).unwrap();
        assert_eq!(back, ud);
    }
}
