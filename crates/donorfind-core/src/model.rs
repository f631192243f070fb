//! Records served by the donor API.
//!
//! All of these are owned by the backend and treated as read-only here.
//! Deserialization is deliberately forgiving: optional fields default when
//! absent and malformed timestamps become `None`, so a syntactically valid
//! payload always yields a record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::timestamp;

/// A nonprofit or foundation tracked for potential grant relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ein: Option<String>,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(default)]
    pub ntee_code: Option<String>,
    #[serde(default)]
    pub assets_total: Option<Decimal>,
    #[serde(default)]
    pub grants_total: Option<Decimal>,
    #[serde(default)]
    pub irs_subsection: Option<i64>,
    /// Bare hostname or full URL, as stored by the backend.
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Tag describing what an [`EnrichmentRecord`]'s `raw` payload contains.
///
/// The backend treats this as an open set, so unknown tags are preserved
/// in [`EnrichmentKind::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnrichmentKind {
    CompanyProfile,
    PageMarkdown,
    WebsiteSource,
    SiteExtract,
    Other(String),
}

impl EnrichmentKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            EnrichmentKind::CompanyProfile => "company_profile",
            EnrichmentKind::PageMarkdown => "page_markdown",
            EnrichmentKind::WebsiteSource => "website_source",
            EnrichmentKind::SiteExtract => "site_extract",
            EnrichmentKind::Other(tag) => tag,
        }
    }
}

impl From<String> for EnrichmentKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "company_profile" => EnrichmentKind::CompanyProfile,
            "page_markdown" => EnrichmentKind::PageMarkdown,
            "website_source" => EnrichmentKind::WebsiteSource,
            "site_extract" => EnrichmentKind::SiteExtract,
            _ => EnrichmentKind::Other(tag),
        }
    }
}

impl From<EnrichmentKind> for String {
    fn from(kind: EnrichmentKind) -> Self {
        match kind {
            EnrichmentKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EnrichmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider an [`EnrichmentRecord`] was obtained from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnrichmentSource {
    Propublica,
    Apollo,
    Firecrawl,
    Scraper,
    Other(String),
}

impl EnrichmentSource {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            EnrichmentSource::Propublica => "propublica",
            EnrichmentSource::Apollo => "apollo",
            EnrichmentSource::Firecrawl => "firecrawl",
            EnrichmentSource::Scraper => "scraper",
            EnrichmentSource::Other(tag) => tag,
        }
    }
}

impl From<String> for EnrichmentSource {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "propublica" => EnrichmentSource::Propublica,
            "apollo" => EnrichmentSource::Apollo,
            "firecrawl" => EnrichmentSource::Firecrawl,
            "scraper" => EnrichmentSource::Scraper,
            _ => EnrichmentSource::Other(tag),
        }
    }
}

impl From<EnrichmentSource> for String {
    fn from(source: EnrichmentSource) -> Self {
        match source {
            EnrichmentSource::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EnrichmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supplementary data about a donor from a company-data provider or crawl.
///
/// Several records of the same kind/source pair may exist (versions over
/// time); storage order is not guaranteed, `created_at` is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub id: i64,
    pub donor_id: i64,
    pub kind: EnrichmentKind,
    pub source: EnrichmentSource,
    /// Evidence locator.
    #[serde(default)]
    pub url: Option<String>,
    /// Untyped payload whose shape depends on `kind`.
    #[serde(default)]
    pub raw: serde_json::Value,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

impl EnrichmentRecord {
    #[must_use]
    pub fn is(&self, kind: &EnrichmentKind, source: &EnrichmentSource) -> bool {
        &self.kind == kind && &self.source == source
    }
}

/// A person listed on the organization's website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadershipEntry {
    pub name: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileContacts {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub address: Option<String>,
}

impl ProfileContacts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.address.is_none()
    }
}

/// Structured profile extracted from a donor's website
/// (`raw` of a `company_profile` enrichment).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub about: Option<String>,
    pub mission: Option<String>,
    pub grantmaking: Option<String>,
    pub apply_instructions: Option<String>,
    pub program_areas: Vec<String>,
    pub leadership: Vec<LeadershipEntry>,
    pub contacts: ProfileContacts,
}

impl CompanyProfile {
    /// Read a profile out of an enrichment payload.
    ///
    /// Returns `None` unless `raw` is a JSON object. Individual fields with
    /// an unexpected type are dropped; blank strings count as absent.
    #[must_use]
    pub fn from_raw(raw: &serde_json::Value) -> Option<Self> {
        let obj = raw.as_object()?;
        let text = |key: &str| obj.get(key).and_then(non_blank);

        let program_areas = obj
            .get("program_areas")
            .map(string_list)
            .unwrap_or_default();

        let leadership = obj
            .get("leadership")
            .and_then(serde_json::Value::as_array)
            .map(|people| {
                people
                    .iter()
                    .filter_map(|person| {
                        let name = person.get("name").and_then(non_blank)?;
                        let title = person.get("title").and_then(non_blank);
                        Some(LeadershipEntry { name, title })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let contacts = obj
            .get("contacts")
            .and_then(serde_json::Value::as_object)
            .map(|c| ProfileContacts {
                emails: c.get("emails").map(string_list).unwrap_or_default(),
                phones: c.get("phones").map(string_list).unwrap_or_default(),
                address: c.get("address").and_then(non_blank),
            })
            .unwrap_or_default();

        Some(Self {
            about: text("about"),
            mission: text("mission"),
            grantmaking: text("grantmaking"),
            apply_instructions: text("apply_instructions"),
            program_areas,
            leadership,
            contacts,
        })
    }
}

fn non_blank(value: &serde_json::Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(non_blank).collect())
        .unwrap_or_default()
}

/// A person associated with a donor, captured by an enrichment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub donor_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    /// `"apollo"` or `"firecrawl"`.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A grant made by a donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub donor_id: Option<i64>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub recipient_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub recipient_ein: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
}

/// Response of `GET /donors/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorDetail {
    pub donor: DonorRecord,
    #[serde(default)]
    pub grants: Vec<GrantRecord>,
    #[serde(default)]
    pub contacts: Vec<ContactRecord>,
    #[serde(default)]
    pub enrichments: Vec<EnrichmentRecord>,
}

/// Response of `GET /donors`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorPage {
    pub items: Vec<DonorRecord>,
    pub total: u64,
}

/// A donor returned by semantic search, with its embedding distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticHit {
    #[serde(flatten)]
    pub donor: DonorRecord,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub doc: Option<String>,
}

/// Response of `POST /donors/search/semantic`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticPage {
    pub items: Vec<SemanticHit>,
    pub count: u64,
}

/// EINs arrive as strings from the database but as integers from some
/// ingest paths; accept both.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn donor_deserializes_with_only_required_fields() {
        let donor: DonorRecord = serde_json::from_value(json!({"id": 7, "name": "Acme Fund"}))
            .expect("minimal donor should parse");
        assert_eq!(donor.id, 7);
        assert!(donor.website.is_none());
        assert!(donor.assets_total.is_none());
        assert!(donor.created_at.is_none());
    }

    #[test]
    fn donor_accepts_numeric_ein_and_bad_timestamp() {
        let donor: DonorRecord = serde_json::from_value(json!({
            "id": 1,
            "name": "Acme Fund",
            "ein": 941234567,
            "assets_total": 1234567,
            "created_at": "not a date"
        }))
        .unwrap();
        assert_eq!(donor.ein.as_deref(), Some("941234567"));
        assert_eq!(donor.assets_total, Some(Decimal::from(1_234_567)));
        assert!(donor.created_at.is_none());
    }

    #[test]
    fn unknown_enrichment_tags_are_preserved() {
        let record: EnrichmentRecord = serde_json::from_value(json!({
            "id": 3,
            "donor_id": 1,
            "kind": "linkedin_snapshot",
            "source": "clearbit",
            "raw": null
        }))
        .unwrap();
        assert_eq!(
            record.kind,
            EnrichmentKind::Other("linkedin_snapshot".to_string())
        );
        assert_eq!(record.source.as_str(), "clearbit");
        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["kind"], "linkedin_snapshot");
    }

    #[test]
    fn known_enrichment_tags_map_to_variants() {
        let record: EnrichmentRecord = serde_json::from_value(json!({
            "id": 3,
            "donor_id": 1,
            "kind": "company_profile",
            "source": "firecrawl",
            "url": "https://example.org",
            "raw": {},
            "created_at": "2024-05-01T00:00:00+00:00"
        }))
        .unwrap();
        assert!(record.is(&EnrichmentKind::CompanyProfile, &EnrichmentSource::Firecrawl));
        assert!(record.created_at.is_some());
    }

    #[test]
    fn company_profile_from_non_object_is_none() {
        assert!(CompanyProfile::from_raw(&json!(null)).is_none());
        assert!(CompanyProfile::from_raw(&json!("markdown text")).is_none());
        assert!(CompanyProfile::from_raw(&json!([1, 2])).is_none());
    }

    #[test]
    fn company_profile_drops_wrong_typed_fields() {
        let profile = CompanyProfile::from_raw(&json!({
            "about": "  We fund libraries. ",
            "mission": 42,
            "program_areas": ["Literacy", 7, "", "Arts"],
            "leadership": [
                {"name": "Ada Park", "title": "Director"},
                {"title": "Nameless"},
                {"name": "Ben Ito"}
            ],
            "contacts": {"emails": "info@example.org", "phones": ["555-0100"], "address": " "}
        }))
        .unwrap();
        assert_eq!(profile.about.as_deref(), Some("We fund libraries."));
        assert!(profile.mission.is_none());
        assert_eq!(profile.program_areas, vec!["Literacy", "Arts"]);
        assert_eq!(profile.leadership.len(), 2);
        assert_eq!(profile.leadership[1].title, None);
        assert!(profile.contacts.emails.is_empty());
        assert_eq!(profile.contacts.phones, vec!["555-0100"]);
        assert!(profile.contacts.address.is_none());
    }

    #[test]
    fn semantic_hit_flattens_donor_fields() {
        let page: SemanticPage = serde_json::from_value(json!({
            "items": [{"id": 9, "name": "Kids First", "state": "CA", "distance": 0.21}],
            "count": 1
        }))
        .unwrap();
        assert_eq!(page.items[0].donor.name, "Kids First");
        assert_eq!(page.items[0].distance, Some(0.21));
    }

    #[test]
    fn detail_defaults_missing_collections() {
        let detail: DonorDetail =
            serde_json::from_value(json!({"donor": {"id": 1, "name": "Solo"}})).unwrap();
        assert!(detail.grants.is_empty());
        assert!(detail.contacts.is_empty());
        assert!(detail.enrichments.is_empty());
    }
}
