// SPDX-FileCopyrightText: 2026 Sonaryx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splitting long messages for Discord's per-message length limit.

/// Discord rejects message content longer than this.
pub const DISCORD_MAX_LEN: usize = 2000;

/// Split `text` at the best boundary at or before `max_len` bytes.
///
/// Prefers a paragraph break, then a line break, then a space. Falls back
/// to a hard split on a char boundary.
pub fn split_at_boundary(text: &str, max_len: usize) -> (&str, &str) {
    if text.len() <= max_len {
        return (text, "");
    }

    let mut cut = max_len;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let search_region = &text[..cut];

    if let Some(pos) = search_region.rfind("\n\n").filter(|&p| p > 0) {
        return (&text[..pos], text[pos + 2..].trim_start_matches('\n'));
    }
    if let Some(pos) = search_region.rfind('\n').filter(|&p| p > 0) {
        return (&text[..pos], &text[pos + 1..]);
    }
    if let Some(pos) = search_region.rfind(' ').filter(|&p| p > 0) {
        return (&text[..pos], &text[pos + 1..]);
    }

    if cut == 0 {
        // A single char wider than max_len; emit it whole rather than loop.
        let first = text.chars().next().map_or(text.len(), char::len_utf8);
        return (&text[..first], &text[first..]);
    }
    (&text[..cut], &text[cut..])
}

/// Break `text` into chunks no longer than `max_len` bytes each.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let (head, tail) = split_at_boundary(rest, max_len);
        if !head.is_empty() {
            chunks.push(head.to_string());
        }
        rest = tail;
    }
    chunks
}
