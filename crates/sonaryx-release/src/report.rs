// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat reports for daily and fallback runs.

use chrono::NaiveDate;
use sonaryx_core::{CheckResult, OutboundMessage};
use strum::Display;

/// Mention IDs shorter than this are discarded.
const MIN_MENTION_ID_LEN: usize = 5;

/// Which pass produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RunKind {
    Daily,
    Fallback,
}

/// Who gets pinged when a report lists releases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Audience {
    /// Normalized user IDs, also used as the mention allow-list.
    pub ids: Vec<String>,
    /// Plain text shown when there are no IDs.
    pub text: Option<String>,
}

impl Audience {
    pub fn new(raw_ids: &[String], text: Option<String>) -> Self {
        Self {
            ids: parse_mention_ids(raw_ids),
            text: text
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }

    fn mention_line(&self) -> Option<String> {
        if self.ids.is_empty() {
            return self.text.clone();
        }
        Some(
            self.ids
                .iter()
                .map(|id| format!("<@{id}>"))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    fn attach(&self, text: String) -> OutboundMessage {
        OutboundMessage::text(text).with_mentions(self.ids.clone())
    }
}

/// Normalize configured mention tokens.
///
/// Entries may hold several IDs separated by spaces, commas, tabs or
/// newlines. Each token keeps its digits only and must have at least five.
pub fn parse_mention_ids(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|entry| entry.split([' ', ',', '\n', '\t']))
        .map(|token| token.chars().filter(char::is_ascii_digit).collect::<String>())
        .filter(|id| id.len() >= MIN_MENTION_ID_LEN)
        .collect()
}

fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn link_lines(results: &[CheckResult]) -> String {
    results
        .iter()
        .filter(|r| !r.link.is_empty())
        .map(|r| format!("* {}", r.link))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Report for a primary run on `today`.
pub fn daily_report(today: NaiveDate, releases: &[CheckResult], audience: &Audience) -> OutboundMessage {
    if releases.is_empty() {
        return OutboundMessage::text(
            "Release check completed.\n\nNo new releases found for any subscribed artists.",
        );
    }

    let mut lines = vec![
        format!(":calendar: Daily Release Report — **{}**", long_date(today)),
        String::new(),
        format!("> New releases today:   **{}**", releases.len()),
    ];
    if let Some(mentions) = audience.mention_line() {
        lines.push(format!("> Interested members: {mentions}"));
    }
    lines.push(String::new());
    lines.push(link_lines(releases));

    audience.attach(lines.join("\n"))
}

/// Combined report for a fallback run.
pub fn fallback_report(
    today: NaiveDate,
    yesterday: NaiveDate,
    missed: &[CheckResult],
    todays: &[CheckResult],
    audience: &Audience,
) -> OutboundMessage {
    if missed.is_empty() && todays.is_empty() {
        return OutboundMessage::text(format!(
            "Fallback check completed.\n\nNo missed releases from {yesterday} and no new releases today."
        ));
    }

    let mut lines = vec![
        format!(":alarm_clock: Fallback Release Report — **{}**", long_date(today)),
        String::new(),
    ];
    if !missed.is_empty() {
        lines.push(format!("> Missed releases from {yesterday}: **{}**", missed.len()));
    }
    if !todays.is_empty() {
        lines.push(format!("> New releases today ({today}): **{}**", todays.len()));
    }
    if let Some(mentions) = audience.mention_line() {
        lines.push(format!("> Interested members: {mentions}"));
    }
    lines.push(String::new());

    if !missed.is_empty() {
        lines.push("**Missed Releases:**".to_string());
        lines.push(link_lines(missed));
    }
    if !todays.is_empty() {
        if !missed.is_empty() {
            lines.push(String::new());
        }
        lines.push("**Today's Releases:**".to_string());
        lines.push(link_lines(todays));
    }

    audience.attach(lines.join("\n"))
}

/// Notification for a run that failed as a whole.
pub fn failure_notice(kind: RunKind, error: &dyn std::fmt::Display) -> OutboundMessage {
    OutboundMessage::text(format!("❌ {kind} release check failed: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonaryx_test_utils::fixtures::{release, ymd};

    fn result(id: &str) -> CheckResult {
        CheckResult::new("A", release(id, "A", "2024-01-05"))
    }

    #[test]
    fn mention_ids_are_split_and_cleaned() {
        let raw = vec![
            "<@123456789>, 987654321".to_string(),
            "12\t55555\n".to_string(),
        ];
        assert_eq!(
            parse_mention_ids(&raw),
            vec!["123456789", "987654321", "55555"]
        );
    }

    #[test]
    fn daily_report_layout() {
        let audience = Audience::new(&["111111".to_string()], None);
        let msg = daily_report(ymd(2024, 1, 5), &[result("a"), result("b")], &audience);

        assert_eq!(
            msg.text,
            ":calendar: Daily Release Report — **Friday, January 5, 2024**\n\
             \n\
             > New releases today:   **2**\n\
             > Interested members: <@111111>\n\
             \n\
             * https://open.spotify.com/album/a\n\
             * https://open.spotify.com/album/b"
        );
        assert_eq!(msg.mention_ids, vec!["111111"]);
    }

    #[test]
    fn daily_report_falls_back_to_mention_text() {
        let audience = Audience::new(&[], Some("@everyone who cares".into()));
        let msg = daily_report(ymd(2024, 1, 5), &[result("a")], &audience);
        assert!(msg.text.contains("> Interested members: @everyone who cares"));
        assert!(msg.mention_ids.is_empty());
    }

    #[test]
    fn empty_daily_report_pings_nobody() {
        let audience = Audience::new(&["111111".to_string()], None);
        let msg = daily_report(ymd(2024, 1, 5), &[], &audience);
        assert_eq!(
            msg.text,
            "Release check completed.\n\nNo new releases found for any subscribed artists."
        );
        assert!(msg.mention_ids.is_empty());
    }

    #[test]
    fn fallback_report_has_both_sections() {
        let msg = fallback_report(
            ymd(2024, 1, 5),
            ymd(2024, 1, 4),
            &[result("m")],
            &[result("t")],
            &Audience::default(),
        );
        assert_eq!(
            msg.text,
            ":alarm_clock: Fallback Release Report — **Friday, January 5, 2024**\n\
             \n\
             > Missed releases from 2024-01-04: **1**\n\
             > New releases today (2024-01-05): **1**\n\
             \n\
             **Missed Releases:**\n\
             * https://open.spotify.com/album/m\n\
             \n\
             **Today's Releases:**\n\
             * https://open.spotify.com/album/t"
        );
    }

    #[test]
    fn empty_fallback_report() {
        let msg = fallback_report(ymd(2024, 1, 5), ymd(2024, 1, 4), &[], &[], &Audience::default());
        assert_eq!(
            msg.text,
            "Fallback check completed.\n\nNo missed releases from 2024-01-04 and no new releases today."
        );
    }

    #[test]
    fn failure_notice_names_the_run() {
        let msg = failure_notice(RunKind::Fallback, &"database is locked");
        assert_eq!(msg.text, "❌ Fallback release check failed: database is locked");
    }
}
