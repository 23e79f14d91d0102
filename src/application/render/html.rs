use super::plain::daily_hint;
use super::{escape_html as esc, FOOTER, PLAYBOOK};
use crate::application::report::{CombinedReport, DailyFeed, StackReport};
use crate::domain::entities::annotated_listing::AnnotatedListing;
use crate::domain::values::arbitrage::ArbitrageConfidence;

const KEYWORD_PREVIEW: usize = 10;
const NOTE_STYLE: &str = "margin-top:6px;padding:6px 8px;background:#fff3cd;border-left:3px solid #ffc107;border-radius:3px;color:#856404;font-size:11px;";

fn badge_color(confidence: ArbitrageConfidence) -> &'static str {
    match confidence {
        ArbitrageConfidence::High => "#28a745",
        ArbitrageConfidence::Medium => "#ffc107",
        ArbitrageConfidence::Low => "#dc3545",
        ArbitrageConfidence::None => "#6c757d",
    }
}

fn badge(confidence: ArbitrageConfidence) -> String {
    format!(
        "<span style='background:{};color:#fff;padding:2px 6px;border-radius:3px;font-size:11px;font-weight:700;'>{confidence}</span>",
        badge_color(confidence)
    )
}

fn link(href: &str, text: &str) -> String {
    format!(
        "<a href=\"{}\" style=\"color:#1155cc;text-decoration:none;\">{}</a>",
        esc(href),
        esc(text)
    )
}

fn recipe_block(steps: &[String]) -> String {
    if steps.is_empty() {
        return String::new();
    }
    let items: String = steps
        .iter()
        .map(|s| format!("<li style='margin:3px 0;'>{}</li>", esc(s)))
        .collect();
    format!(
        "<div style='margin-top:8px;padding:8px;background:#f0f8ff;border-left:3px solid #4a90e2;border-radius:4px;'>\
         <div style='font-weight:700;color:#2c5aa0;font-size:12px;margin-bottom:4px;'>📋 Stack Recipe:</div>\
         <ol style='margin:4px 0 0 18px;padding:0;color:#333;font-size:11px;line-height:16px;'>{items}</ol></div>"
    )
}

fn stack_row(rank: usize, listing: &AnnotatedListing) -> String {
    let signals = listing.signals();
    let narrative = listing.narrative();

    let mut meta = format!("Merchants: {}", esc(&signals.merchants.join(", ")));
    if !signals.cashback_portals.is_empty() {
        meta.push_str(&format!("<br>Cashback: {}", esc(&signals.cashback_portals.join(", "))));
    }

    let mut extra = String::new();
    if !narrative.hint.is_empty() {
        extra.push_str(&format!(
            "<div style='margin-top:6px;color:#333;font-size:12px;'><b>Hint:</b> {}</div>",
            esc(&narrative.hint)
        ));
    }
    if let Some(note) = &narrative.cashback_note {
        extra.push_str(&format!("<div style='{NOTE_STYLE}'>{}</div>", esc(note)));
    }
    if !narrative.why.is_empty() {
        extra.push_str(&format!(
            "<div style='margin-top:6px;color:#1f6f43;font-size:12px;'><b>Why this stack works:</b> {}</div>",
            esc(&narrative.why)
        ));
    }
    extra.push_str(&recipe_block(&narrative.recipe));

    format!(
        "<tr><td style=\"padding:8px 10px;vertical-align:top;color:#666;\">{rank}.</td>\
         <td style=\"padding:8px 10px;\">\
         <div style=\"font-size:14px;line-height:20px;\"><b>[{}]</b> {}</div>\
         <div style=\"margin-top:4px;color:#555;font-size:12px;\">{meta}</div>{extra}</td></tr>",
        listing.score(),
        link(listing.link(), listing.title())
    )
}

pub fn stack(report: &StackReport) -> String {
    let rows: String = if report.top.is_empty() {
        "<tr><td style='padding:10px;color:#666;'>No stacks found today.</td></tr>".to_string()
    } else {
        report
            .top
            .iter()
            .enumerate()
            .map(|(i, l)| stack_row(i + 1, l))
            .collect()
    };

    let mut excluded = String::new();
    if !report.excluded.is_empty() {
        let items: String = report
            .excluded
            .iter()
            .enumerate()
            .map(|(i, l)| {
                format!(
                    "<div style='margin:4px 0;font-size:12px;'>{}. {} - <span style='color:#666;'>{}</span></div>",
                    i + 1,
                    link(l.link(), l.title()),
                    esc(l.exclusion_reason().unwrap_or("Unknown reason"))
                )
            })
            .collect();
        excluded = format!(
            "<div style=\"margin:10px 0;padding:12px;border:1px solid #ffc107;border-radius:6px;background:#fff8e1;\">\
             <h3 style=\"margin:0 0 8px 0;color:#856404;font-size:14px;\">⚠️ Excluded Apple Chip Deals</h3>\
             <div style=\"color:#666;font-size:11px;margin-bottom:6px;\">These were excluded from Top {}:</div>{items}</div>",
            report.top_n
        );
    }

    format!(
        "<div style=\"margin:20px 0;padding:16px;border:2px solid #4a90e2;border-radius:8px;background:#f0f8ff;\">\
         <h2 style=\"margin:0 0 10px 0;color:#2c5aa0;\">🏆 Best Stacks Today — {}</h2>\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"border-collapse:collapse;background:#fff;border-radius:6px;\">{rows}</table>\
         {excluded}</div>",
        report.date
    )
}

fn card(title: &str, subtitle: &str, inner: &str) -> String {
    let sub = if subtitle.is_empty() {
        String::new()
    } else {
        format!(
            "<div style='color:#666;font-size:12px;margin-top:4px;'>{}</div>",
            esc(subtitle)
        )
    };
    format!(
        "<table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"border:1px solid #eee;border-radius:14px;margin:14px 0;background:#fff;\">\
         <tr><td style=\"padding:14px 14px 10px 14px;\"><div style=\"font-size:16px;font-weight:700;\">{}</div>{sub}</td></tr>\
         <tr><td style=\"padding:0 10px 12px 10px;\">{inner}</td></tr></table>",
        esc(title)
    )
}

fn deal_table(rows: &str) -> String {
    let rows = if rows.is_empty() {
        "<tr><td style='padding:10px;color:#666;'>No items found.</td></tr>"
    } else {
        rows
    };
    format!("<table width='100%' cellpadding='0' cellspacing='0' style='border-collapse:collapse;'>{rows}</table>")
}

/// `meta_html` and `hint_html` must already be escaped.
fn deal_row(rank: usize, title: &str, href: &str, meta_html: &str, hint_html: &str) -> String {
    let meta = if meta_html.is_empty() {
        String::new()
    } else {
        format!("<div style='margin-top:4px;color:#555;font-size:12px;'>{meta_html}</div>")
    };
    let hint = if hint_html.is_empty() {
        String::new()
    } else {
        format!("<div style='margin-top:6px;color:#333;font-size:12px;'><b>Stack hint:</b> {hint_html}</div>")
    };
    format!(
        "<tr><td style=\"padding:10px 6px;border-top:1px solid #eee;vertical-align:top;width:34px;color:#666;\">{rank}.</td>\
         <td style=\"padding:10px 6px;border-top:1px solid #eee;vertical-align:top;\">\
         <div style=\"font-size:14px;line-height:20px;\">{}</div>{meta}{hint}</td></tr>",
        link(href, title)
    )
}

fn daily_row(rank: usize, listing: &AnnotatedListing) -> String {
    let signals = listing.signals();
    let narrative = listing.narrative();

    let mut meta = Vec::new();
    if !signals.merchants.is_empty() {
        meta.push(format!("Merchants: {}", esc(&signals.merchants.join(", "))));
    }
    if !signals.cashback_portals.is_empty() {
        meta.push(format!("Cashback: {}", esc(&signals.cashback_portals.join(", "))));
    }
    if let Some(chip) = &signals.chip {
        meta.push(format!(
            "{} Apple Chip: {}",
            badge(narrative.display_confidence),
            esc(&chip.name)
        ));
    }

    let mut hint = Vec::new();
    let text = daily_hint(listing);
    if !text.is_empty() {
        hint.push(esc(&text));
    }
    if let Some(note) = &narrative.cashback_note {
        hint.push(format!("<div style='{NOTE_STYLE}'>{}</div>", esc(note)));
    }

    deal_row(
        rank,
        listing.title(),
        listing.link(),
        &meta.join(" | "),
        &hint.join("<br>"),
    )
}

pub fn daily(feed: &DailyFeed) -> String {
    let mut sections = Vec::new();

    let mut preview = feed
        .keywords
        .iter()
        .take(KEYWORD_PREVIEW)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if feed.keywords.len() > KEYWORD_PREVIEW {
        preview.push('…');
    }
    sections.push(format!(
        "<div style=\"padding:14px 16px;border:1px solid #eee;border-radius:14px;background:#fff;\">\
         <div style=\"font-size:18px;font-weight:800;\">Daily Deal Stack Report</div>\
         <div style=\"margin-top:6px;color:#666;font-size:13px;\">{}</div>\
         <div style=\"margin-top:8px;color:#666;font-size:12px;\">Keywords: {}</div></div>",
        feed.date,
        esc(&preview)
    ));

    for group in &feed.groups {
        let rows: String = group
            .listings
            .iter()
            .enumerate()
            .map(|(i, l)| daily_row(i + 1, l))
            .collect();
        sections.push(card(
            &group.source.to_string(),
            &format!("Top {} items", group.listings.len()),
            &deal_table(&rows),
        ));
    }

    if !feed.excluded.is_empty() {
        let rows: String = feed
            .excluded
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let signals = l.signals();
                let chip = signals.chip.as_ref().map(|c| c.name.as_str()).unwrap_or("Unknown");
                let meta = format!("{} Apple Chip: {}", badge(ArbitrageConfidence::Low), esc(chip));
                deal_row(i + 1, l.title(), l.link(), &meta, &esc(&daily_hint(l)))
            })
            .collect();
        sections.push(card(
            "⚠️ Low Confidence Apple Deals",
            "Excluded from main list: lack physical retailer or stock/C&C signals",
            &deal_table(&rows),
        ));
    }

    let rows: String = feed
        .trending
        .iter()
        .enumerate()
        .map(|(i, d)| deal_row(i + 1, d.title(), d.link(), "", ""))
        .collect();
    sections.push(card(
        "🔥 OzBargain Trending",
        "Hot deals right now (/hot)",
        &deal_table(&rows),
    ));

    let playbook: String = PLAYBOOK
        .iter()
        .map(|step| format!("<li>{}</li>", esc(step)))
        .collect();
    sections.push(card(
        "🧠 Quick stacking playbook",
        "",
        &format!("<ol style=\"margin:10px 0 0 18px;color:#333;font-size:13px;line-height:18px;\">{playbook}</ol>"),
    ));

    format!(
        "<div style=\"margin:20px 0;padding:16px;border:1px solid #ddd;border-radius:8px;background:#fff;\">{}</div>",
        sections.concat()
    )
}

fn failure_block(heading: &str, error: &str) -> String {
    format!(
        "<div style=\"margin:20px 0;padding:16px;border:2px solid #dc3545;border-radius:8px;background:#f8d7da;\">\
         <h2 style=\"margin:0 0 10px 0;color:#721c24;\">⚠️ {heading}</h2>\
         <p style=\"margin:0;color:#721c24;\">Error: {}</p></div>",
        esc(error)
    )
}

/// Wraps a body fragment in a complete email document.
pub fn document(body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n</head>\n\
         <body style=\"margin:0;padding:0;background:#f6f7f9;font-family:Arial,Helvetica,sans-serif;\">\n\
         <div style=\"max-width:800px;margin:0 auto;padding:20px;\">\n{body}\n\
         <div style=\"margin-top:30px;padding:16px;text-align:center;color:#999;font-size:11px;border-top:1px solid #ddd;\">{FOOTER}</div>\n\
         </div>\n</body>\n</html>"
    )
}

pub fn combined(report: &CombinedReport) -> String {
    let stack_html = match &report.stack {
        Ok(r) => stack(r),
        Err(e) => failure_block("Stack Report Failed", e),
    };
    let daily_html = match &report.daily {
        Ok(feed) => daily(feed),
        Err(e) => failure_block("Daily Report Failed", e),
    };
    let section_heading = "margin:0 0 15px 0;padding-bottom:10px;border-bottom:2px solid #4a90e2;color:#2c5aa0;font-size:20px;";

    document(&format!(
        "<div style=\"text-align:center;padding:20px;background:#fff;border:1px solid #ddd;border-radius:8px;margin-bottom:20px;\">\
         <h1 style=\"margin:0;color:#333;\">Combined Deal Report</h1>\
         <p style=\"margin:8px 0 0 0;color:#666;\">{}</p>\
         <div style=\"margin-top:12px;\">\
         <a href=\"#stack-report\" style=\"color:#4a90e2;text-decoration:none;margin:0 8px;font-size:13px;\">Top Stacks</a>\
         <span style=\"color:#ddd;\">|</span>\
         <a href=\"#daily-report\" style=\"color:#4a90e2;text-decoration:none;margin:0 8px;font-size:13px;\">Full Feed</a>\
         </div></div>\n\
         <div id=\"stack-report\" style=\"margin-bottom:30px;\"><h2 style=\"{section_heading}\">📊 Top Stack Report</h2>{stack_html}</div>\n\
         <div id=\"daily-report\" style=\"margin-bottom:30px;\"><h2 style=\"{section_heading}\">📰 Full Daily Deal Feed</h2>{daily_html}</div>",
        report.date
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::report::{build_daily_feed, build_stack_report, prepare};
    use crate::domain::entities::listing::Listing;
    use crate::domain::values::signal_config::SignalConfig;
    use crate::domain::values::source::Source;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn sample() -> Vec<AnnotatedListing> {
        prepare(
            vec![
                Listing::new(Source::OzBargain, "Apple <Gift> Cards & 10x points at Coles", "https://o/1?a=1&b=2"),
                Listing::new(Source::OzBargain, "MacBook Pro M4 Max at Harvey Norman - Pickup", "https://o/2"),
                Listing::new(Source::OzBargain, "MacBook Air M3 online", "https://o/3"),
            ],
            &SignalConfig::default(),
        )
    }

    #[test]
    fn test_stack_html_escapes_titles_and_links() {
        let html = stack(&build_stack_report(date(), &sample(), 5));
        assert!(html.contains("Apple &lt;Gift&gt; Cards &amp; 10x points at Coles"));
        assert!(html.contains("https://o/1?a=1&amp;b=2"));
        assert!(!html.contains("<Gift>"));
        assert!(html.contains("Excluded Apple Chip Deals"));
    }

    #[test]
    fn test_daily_html_shows_badges_and_empty_groups() {
        let cfg = SignalConfig::default();
        let html = daily(&build_daily_feed(date(), &sample(), Vec::new(), 10, &cfg));
        assert!(html.contains("#28a745;color:#fff;padding:2px 6px;border-radius:3px;font-size:11px;font-weight:700;'>HIGH</span> Apple Chip: M4 Max"));
        assert!(html.contains("No items found."));
        assert!(html.contains("Low Confidence Apple Deals"));
        assert!(html.contains("Quick stacking playbook"));
    }

    #[test]
    fn test_combined_html_failure_placeholder() {
        let report = CombinedReport {
            date: date(),
            stack: Ok(build_stack_report(date(), &sample(), 5)),
            daily: Err("feed <down>".into()),
        };
        let html = combined(&report);
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("Daily Report Failed"));
        assert!(html.contains("Error: feed &lt;down&gt;"));
        assert!(html.contains("Best Stacks Today"));
    }
}
