//! Donor profile aggregation.
//!
//! [`build_profile_view`] reconciles a donor's base record with its
//! enrichments, contacts, and grants into one display-ready [`ProfileView`].
//! It performs selection and truncation only; none of the inputs are
//! modified and nothing here can fail.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format::{format_location, format_money, normalize_website};
use crate::model::{
    CompanyProfile, ContactRecord, DonorRecord, EnrichmentKind, EnrichmentRecord,
    EnrichmentSource, GrantRecord, LeadershipEntry, ProfileContacts,
};

/// Maximum number of evidence pages shown.
pub const MAX_EVIDENCE_PAGES: usize = 5;
/// Maximum number of program areas shown.
pub const MAX_PROGRAM_AREAS: usize = 8;
/// Maximum number of leadership entries shown.
pub const MAX_LEADERSHIP: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub donor_id: i64,
    pub name: String,
    pub location: Option<String>,
    pub website_url: Option<String>,
    pub assets: String,
    pub grants_total: String,
    pub has_assets: bool,
    pub has_grants_total: bool,
    /// Latest website-derived profile, if one has been captured.
    pub profile: Option<StructuredProfile>,
    /// Crawled pages backing the profile, in storage order.
    pub evidence: Vec<EvidencePage>,
    /// The donor's own mission / NTEE text from the base record.
    pub mission_code: Option<String>,
    pub contacts: Vec<ContactLine>,
    pub grants: Vec<GrantLine>,
}

impl ProfileView {
    /// Prompt shown in place of the structured profile when none exists.
    #[must_use]
    pub fn crawl_hint(&self) -> Option<String> {
        if self.profile.is_some() {
            return None;
        }
        Some(format!(
            "No website profile captured yet. Visit the donor's website above, or run the crawl endpoint: POST /donors/{}/crawl",
            self.donor_id
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredProfile {
    pub enrichment_id: i64,
    pub about: Option<String>,
    pub mission: Option<String>,
    pub program_areas: Vec<String>,
    pub grantmaking: Option<String>,
    pub apply_instructions: Option<String>,
    /// Present only when at least one channel is populated.
    pub contact_channels: Option<ProfileContacts>,
    pub leadership: Vec<LeadershipEntry>,
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidencePage {
    pub enrichment_id: i64,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactLine {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantLine {
    pub year: Option<i32>,
    pub recipient: Option<String>,
    pub amount: String,
    pub purpose: Option<String>,
}

/// Build the display model for a donor's detail page.
#[must_use]
pub fn build_profile_view(
    donor: &DonorRecord,
    enrichments: &[EnrichmentRecord],
    contacts: &[ContactRecord],
    grants: &[GrantRecord],
) -> ProfileView {
    let profile = latest_firecrawl_profile(enrichments).and_then(|record| {
        CompanyProfile::from_raw(&record.raw).map(|parsed| structure(record, parsed))
    });

    let evidence = enrichments
        .iter()
        .filter(|e| e.is(&EnrichmentKind::PageMarkdown, &EnrichmentSource::Firecrawl))
        .take(MAX_EVIDENCE_PAGES)
        .map(|e| EvidencePage {
            enrichment_id: e.id,
            url: e.url.clone(),
        })
        .collect();

    ProfileView {
        donor_id: donor.id,
        name: donor.name.clone(),
        location: format_location(donor.city.as_deref(), donor.state.as_deref()),
        website_url: normalize_website(donor.website.as_deref()),
        assets: format_money(donor.assets_total),
        grants_total: format_money(donor.grants_total),
        has_assets: donor.assets_total.is_some(),
        has_grants_total: donor.grants_total.is_some(),
        profile,
        evidence,
        mission_code: donor
            .mission
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        contacts: contacts
            .iter()
            .map(|c| ContactLine {
                name: c.name.clone(),
                title: c.title.clone(),
                email: c.email.clone(),
                source: c.source.clone(),
            })
            .collect(),
        grants: grants
            .iter()
            .map(|g| GrantLine {
                year: g.year,
                recipient: g.recipient_name.clone(),
                amount: format_money(g.amount),
                purpose: g.purpose.clone(),
            })
            .collect(),
    }
}

/// Newest `company_profile`/`firecrawl` enrichment by `created_at`.
///
/// Undated records rank below every dated one. Among equal timestamps the
/// last one in storage order wins.
fn latest_firecrawl_profile(enrichments: &[EnrichmentRecord]) -> Option<&EnrichmentRecord> {
    enrichments
        .iter()
        .filter(|e| e.is(&EnrichmentKind::CompanyProfile, &EnrichmentSource::Firecrawl))
        .max_by_key(|e| e.created_at)
}

fn structure(record: &EnrichmentRecord, parsed: CompanyProfile) -> StructuredProfile {
    let CompanyProfile {
        about,
        mission,
        grantmaking,
        apply_instructions,
        mut program_areas,
        mut leadership,
        contacts,
    } = parsed;
    program_areas.truncate(MAX_PROGRAM_AREAS);
    leadership.truncate(MAX_LEADERSHIP);

    StructuredProfile {
        enrichment_id: record.id,
        about,
        mission,
        program_areas,
        grantmaking,
        apply_instructions,
        contact_channels: (!contacts.is_empty()).then_some(contacts),
        leadership,
        saved_at: record.created_at,
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
