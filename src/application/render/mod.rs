//! Plain-text and HTML rendering of the report views.

pub mod html;
pub mod plain;

use crate::application::report::{CombinedReport, DailyFeed, StackReport};
use crate::domain::ports::transport::OutgoingReport;

pub const DAILY_SUBJECT: &str = "Daily Deal Feed";
pub const COMBINED_SUBJECT: &str = "Combined Daily Deal Report";

pub(crate) const FOOTER: &str = "Generated by Daily Deal Agent";

pub(crate) const PLAYBOOK: [&str; 4] = [
    "Start with points promo on gift cards (e.g., 20x) → base return.",
    "Use the correct gift card type at the target merchant (Ultimate/TCN vs Apple-only).",
    "If buying online via cashback portal, confirm portal terms allow gift-card/account-balance payments.",
    "If portal excludes gift-card payments, you still keep the base points return.",
];

/// Escapes the five characters that are unsafe in HTML text and attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn stack_subject(top_n: usize) -> String {
    format!("Top {top_n} Stack Report")
}

pub fn stack_email(report: &StackReport) -> OutgoingReport {
    OutgoingReport {
        subject: stack_subject(report.top_n),
        plain: plain::stack(report),
        html: html::document(&html::stack(report)),
    }
}

pub fn daily_email(feed: &DailyFeed) -> OutgoingReport {
    OutgoingReport {
        subject: DAILY_SUBJECT.to_string(),
        plain: plain::daily(feed),
        html: html::document(&html::daily(feed)),
    }
}

pub fn combined_email(report: &CombinedReport) -> OutgoingReport {
    OutgoingReport {
        subject: COMBINED_SUBJECT.to_string(),
        plain: plain::combined(report),
        html: html::combined(report),
    }
}
