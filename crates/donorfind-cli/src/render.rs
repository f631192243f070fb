//! Plain-text rendering of API responses and profile views.
//!
//! Every function here is pure and returns the text to print, without a
//! trailing newline.

use donorfind_client::TriggerAck;
use donorfind_core::format::PLACEHOLDER;
use donorfind_core::profile::{ContactLine, GrantLine};
use donorfind_core::{
    format_location, format_money, format_timestamp, normalize_website, DonorPage, DonorRecord,
    ProfileView, SemanticPage, StructuredProfile,
};

const NAME_WIDTH: usize = 40;
const LOCATION_WIDTH: usize = 24;

pub(crate) fn render_donor_list(page: &DonorPage) -> String {
    if page.items.is_empty() {
        return "No donors found.".to_string();
    }

    let mut lines = vec![format!(
        "{:<6}{:<name$}{:<loc$}{:>16}  WEBSITE",
        "ID",
        "NAME",
        "LOCATION",
        "ASSETS",
        name = NAME_WIDTH,
        loc = LOCATION_WIDTH,
    )];
    lines.extend(page.items.iter().map(|donor| {
        format!(
            "{:<6}{:<name$}{:<loc$}{:>16}  {}",
            donor.id,
            truncate(&donor.name, NAME_WIDTH - 2),
            truncate(&location(donor), LOCATION_WIDTH - 2),
            format_money(donor.assets_total),
            website(donor),
            name = NAME_WIDTH,
            loc = LOCATION_WIDTH,
        )
    }));
    lines.push(String::new());
    lines.push(format!(
        "{} shown \u{2022} {} total",
        page.items.len(),
        page.total
    ));
    lines.join("\n")
}

pub(crate) fn render_semantic_results(page: &SemanticPage) -> String {
    if page.items.is_empty() {
        return "No semantic matches.".to_string();
    }

    let mut lines = Vec::new();
    for (rank, hit) in page.items.iter().enumerate() {
        let distance = hit
            .distance
            .map_or_else(|| PLACEHOLDER.to_string(), |d| format!("{d:.3}"));
        lines.push(format!(
            "{:>3}. [{}] {}  ({})  distance {}",
            rank + 1,
            hit.donor.id,
            hit.donor.name,
            location(&hit.donor),
            distance,
        ));
        if let Some(mission) = hit.donor.mission.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            lines.push(format!("     {}", truncate(mission, 100)));
        }
    }
    lines.push(String::new());
    lines.push(format!("{} semantic matches", page.count));
    lines.join("\n")
}

pub(crate) fn render_profile(view: &ProfileView) -> String {
    let mut lines = vec![format!("{} (#{})", view.name, view.donor_id)];
    lines.extend(view.location.clone());
    lines.push(format!(
        "Website: {}",
        view.website_url.as_deref().unwrap_or(PLACEHOLDER)
    ));
    if view.has_assets {
        lines.push(format!("Assets: {}", view.assets));
    }
    if view.has_grants_total {
        lines.push(format!("Grants: {}", view.grants_total));
    }

    lines.push(String::new());
    lines.push("== Website profile ==".to_string());
    match &view.profile {
        Some(profile) => lines.extend(profile_lines(profile)),
        None => lines.extend(view.crawl_hint()),
    }

    if !view.evidence.is_empty() {
        lines.push(String::new());
        lines.push("== Evidence pages ==".to_string());
        lines.extend(view.evidence.iter().map(|page| {
            format!(
                "  - {} (#{})",
                page.url.as_deref().unwrap_or(PLACEHOLDER),
                page.enrichment_id
            )
        }));
    }

    lines.push(String::new());
    lines.push("== Details ==".to_string());
    lines.push(format!(
        "Mission code: {}",
        view.mission_code.as_deref().unwrap_or(PLACEHOLDER)
    ));

    if !view.contacts.is_empty() {
        lines.push(String::new());
        lines.push("== Contacts ==".to_string());
        lines.extend(view.contacts.iter().map(contact_line));
    }

    if !view.grants.is_empty() {
        lines.push(String::new());
        lines.push("== Grants ==".to_string());
        lines.push(format!("{:<6}{:>14}  RECIPIENT", "YEAR", "AMOUNT"));
        lines.extend(view.grants.iter().map(grant_line));
    }

    lines.join("\n")
}

fn profile_lines(profile: &StructuredProfile) -> Vec<String> {
    let texts = [
        ("About", &profile.about),
        ("Mission", &profile.mission),
        ("Grantmaking", &profile.grantmaking),
        ("How to apply", &profile.apply_instructions),
    ];
    let mut lines: Vec<String> = texts
        .into_iter()
        .filter_map(|(label, text)| text.as_ref().map(|t| format!("{label}: {t}")))
        .collect();

    if !profile.program_areas.is_empty() {
        lines.push(format!("Program areas: {}", profile.program_areas.join(", ")));
    }
    if let Some(channels) = &profile.contact_channels {
        let parts: Vec<&str> = channels
            .emails
            .iter()
            .chain(&channels.phones)
            .chain(&channels.address)
            .map(String::as_str)
            .collect();
        lines.push(format!("Contact: {}", parts.join("; ")));
    }
    if !profile.leadership.is_empty() {
        lines.push("Leadership:".to_string());
        lines.extend(profile.leadership.iter().map(|person| match &person.title {
            Some(title) => format!("  - {}, {title}", person.name),
            None => format!("  - {}", person.name),
        }));
    }
    lines.push(format!(
        "Saved: {} (enrichment #{})",
        format_timestamp(profile.saved_at),
        profile.enrichment_id
    ));
    lines
}

fn contact_line(contact: &ContactLine) -> String {
    let mut line = format!("  - {}", contact.name.as_deref().unwrap_or(PLACEHOLDER));
    if let Some(title) = &contact.title {
        line.push_str(&format!(", {title}"));
    }
    if let Some(email) = &contact.email {
        line.push_str(&format!(" <{email}>"));
    }
    if let Some(source) = &contact.source {
        line.push_str(&format!(" [{source}]"));
    }
    line
}

fn grant_line(grant: &GrantLine) -> String {
    let year = grant
        .year
        .map_or_else(|| PLACEHOLDER.to_string(), |y| y.to_string());
    let mut line = format!(
        "{:<6}{:>14}  {}",
        year,
        grant.amount,
        grant.recipient.as_deref().unwrap_or(PLACEHOLDER)
    );
    if let Some(purpose) = &grant.purpose {
        line.push_str(&format!(" ({})", truncate(purpose, 60)));
    }
    line
}

pub(crate) fn render_trigger_ack(action: &str, donor_id: Option<i64>, ack: &TriggerAck) -> String {
    let head = match donor_id {
        Some(id) => format!("{action} requested for donor {id} (HTTP {})", ack.status),
        None => format!("{action} requested (HTTP {})", ack.status),
    };
    match &ack.body {
        Some(body) => format!("{head}\n{body}"),
        None => head,
    }
}

fn location(donor: &DonorRecord) -> String {
    format_location(donor.city.as_deref(), donor.state.as_deref())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn website(donor: &DonorRecord) -> String {
    normalize_website(donor.website.as_deref()).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars.saturating_sub(3)).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
