use super::{FOOTER, PLAYBOOK};
use crate::application::report::{CombinedReport, DailyFeed, StackReport};
use crate::domain::entities::annotated_listing::AnnotatedListing;

const RULE_WIDTH: usize = 80;

fn merchants_line(listing: &AnnotatedListing) -> String {
    let signals = listing.signals();
    let mut line = format!("Merchants: {}", signals.merchants.join(", "));
    if !signals.cashback_portals.is_empty() {
        line.push_str(&format!(" | Cashback: {}", signals.cashback_portals.join(", ")));
    }
    line
}

/// The stack hint followed by any chip notes.
pub(crate) fn daily_hint(listing: &AnnotatedListing) -> String {
    let narrative = listing.narrative();
    let mut parts: Vec<&str> = Vec::new();
    if !narrative.hint.is_empty() {
        parts.push(&narrative.hint);
    }
    parts.extend(narrative.chip_notes.iter().map(String::as_str));
    parts.join(" ")
}

fn stack_entry(lines: &mut Vec<String>, rank: usize, listing: &AnnotatedListing) {
    let narrative = listing.narrative();
    lines.push(format!("{rank}. [{}] {}", listing.score(), listing.title()));
    lines.push(format!("   {}", merchants_line(listing)));
    lines.push(format!("   {}", listing.link()));
    if !narrative.hint.is_empty() {
        lines.push(format!("   Hint: {}", narrative.hint));
    }
    if let Some(note) = &narrative.cashback_note {
        lines.push(format!("   {note}"));
    }
    if !narrative.why.is_empty() {
        lines.push(format!("   Why this stack works: {}", narrative.why));
    }
    if !narrative.recipe.is_empty() {
        lines.push("   📋 Stack Recipe:".to_string());
        for (i, step) in narrative.recipe.iter().enumerate() {
            lines.push(format!("      {}. {step}", i + 1));
        }
    }
    lines.push(String::new());
}

pub fn stack(report: &StackReport) -> String {
    let mut lines = vec![format!("🏆 Best Stacks Today — {}", report.date), String::new()];

    if report.top.is_empty() {
        lines.push("No stacks found today.".to_string());
        lines.push(String::new());
    }
    for (i, listing) in report.top.iter().enumerate() {
        stack_entry(&mut lines, i + 1, listing);
    }

    if !report.excluded.is_empty() {
        lines.push("=== ⚠️ Excluded Apple Chip Deals ===".to_string());
        lines.push(format!("These were excluded from Top {}:", report.top_n));
        lines.push(String::new());
        for (i, listing) in report.excluded.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, listing.title()));
            lines.push(format!("   {}", listing.link()));
            lines.push(format!(
                "   Reason: {}",
                listing.exclusion_reason().unwrap_or("Unknown reason")
            ));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

fn daily_entry(rank: usize, listing: &AnnotatedListing) -> String {
    let signals = listing.signals();
    let narrative = listing.narrative();

    let mut head = format!("{rank}. {}", listing.title());
    if !signals.merchants.is_empty() {
        head.push_str(&format!(" | Merchants: {}", signals.merchants.join(", ")));
    }
    if !signals.cashback_portals.is_empty() {
        head.push_str(&format!(" | Cashback: {}", signals.cashback_portals.join(", ")));
    }
    if let Some(chip) = &signals.chip {
        head.push_str(&format!(
            " | Apple Chip: {chip} | Confidence: {}",
            narrative.display_confidence
        ));
    }

    let mut entry = format!("{head}\n    {}", listing.link());
    let hint = daily_hint(listing);
    if !hint.is_empty() {
        entry.push_str(&format!("\n    Stack hint: {hint}"));
    }
    if let Some(note) = &narrative.cashback_note {
        entry.push_str(&format!("\n    {note}"));
    }
    entry
}

pub fn daily(feed: &DailyFeed) -> String {
    let mut sections = vec![
        format!("Daily Deal Stack Report — {}", feed.date),
        format!("Focus keywords: {}", feed.keywords.join(", ")),
        String::new(),
    ];

    for group in feed.groups.iter().filter(|g| !g.listings.is_empty()) {
        sections.push(format!("=== {} (top {}) ===", group.source, group.listings.len()));
        for (i, listing) in group.listings.iter().enumerate() {
            sections.push(daily_entry(i + 1, listing));
        }
        sections.push(String::new());
    }

    if !feed.excluded.is_empty() {
        sections.push("=== ⚠️ Low Confidence Apple Deals (Excluded from Main List) ===".to_string());
        sections.push("These deals lack physical retailer or stock/C&C signals.".to_string());
        sections.push(String::new());
        for (i, listing) in feed.excluded.iter().enumerate() {
            let chip = listing
                .signals()
                .chip
                .as_ref()
                .map(|c| c.name.as_str())
                .unwrap_or("Unknown");
            sections.push(format!("{}. {} | Chip: {chip}\n    {}", i + 1, listing.title(), listing.link()));
        }
        sections.push(String::new());
    }

    sections.push(format!("🔥 OzBargain Trending (Top {})", feed.trending.len()));
    sections.push("Hot deals right now (from /hot).".to_string());
    sections.push(String::new());
    if feed.trending.is_empty() {
        sections.push("No trending deals found today.".to_string());
    }
    for (i, deal) in feed.trending.iter().enumerate() {
        sections.push(format!("{}. {}\n    {}", i + 1, deal.title(), deal.link()));
    }
    sections.push(String::new());

    sections.push("=== Quick stacking playbook ===".to_string());
    for (i, step) in PLAYBOOK.iter().enumerate() {
        sections.push(format!("{}) {step}", i + 1));
    }
    sections.push(String::new());

    sections.join("\n")
}

pub fn combined(report: &CombinedReport) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let stack_text = match &report.stack {
        Ok(stack_report) => stack(stack_report),
        Err(e) => format!("⚠️ Stack report failed: {e}"),
    };
    let daily_text = match &report.daily {
        Ok(feed) => daily(feed),
        Err(e) => format!("⚠️ Daily report failed: {e}"),
    };

    [
        rule.clone(),
        format!("COMBINED DEAL REPORT — {}", report.date),
        rule.clone(),
        String::new(),
        stack_text,
        String::new(),
        rule.clone(),
        String::new(),
        daily_text,
        String::new(),
        rule,
        FOOTER.to_string(),
        String::new(),
    ]
    .join("\n")
}
