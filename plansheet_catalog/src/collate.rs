// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Korean-tailored ordering for drawing ids.
//!
//! Drawing ids are short codes such as `00`, `01-1`, `A-101`, or `지하1층`.
//! Sibling lists are ordered the way a Korean locale collator would order
//! them: separators and punctuation first, then digits, then Hangul, then
//! Han, then Latin letters (case-insensitively), then everything else.
//! Characters inside one group compare by code point, which for precomposed
//! Hangul syllables is already dictionary order.
//!
//! This is a primary-strength approximation of the CLDR `ko` tailoring and
//! not a full UCA implementation. Ties at primary strength are broken by case,
//! lowercase first as at tertiary strength, and then by plain string
//! comparison so the order is total and stable.

use core::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Separator,
    Digit,
    Hangul,
    Han,
    Latin,
    Other,
}

fn group(c: char) -> Group {
    match c {
        c if c.is_whitespace() || c.is_ascii_punctuation() => Group::Separator,
        '\u{2000}'..='\u{206F}' | '\u{3000}'..='\u{303F}' => Group::Separator,
        c if c.is_numeric() => Group::Digit,
        '\u{1100}'..='\u{11FF}'
        | '\u{3130}'..='\u{318F}'
        | '\u{A960}'..='\u{A97F}'
        | '\u{AC00}'..='\u{D7AF}' => Group::Hangul,
        '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}' => Group::Han,
        c if c.is_alphabetic() && c < '\u{0250}' => Group::Latin,
        _ => Group::Other,
    }
}

fn primary_key(c: char) -> (Group, char) {
    let folded = c.to_lowercase().next().unwrap_or(c);
    (group(c), folded)
}

/// Compares two drawing ids in Korean locale order.
#[must_use]
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary_key)
        .cmp(b.chars().map(primary_key))
        .then_with(|| a.chars().map(char::is_uppercase).cmp(b.chars().map(char::is_uppercase)))
        .then_with(|| a.cmp(b))
}
