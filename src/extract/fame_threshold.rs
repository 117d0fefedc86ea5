//! Best-effort "minimum fame" lookup in a clan description.
//!
//! Clan leaders write requirements in every shape imaginable ("1.3k fame",
//! "war fame req 1,300", "Min: 1500"). The extractor collects every number
//! that could be a fame figure, scores it by the words around it and keeps
//! the most plausible one.
//!
//! Token rules: 1-4 digits, an optional `.`/`,` plus 1-3 digits, optional
//! whitespace and a `k`/`K` suffix. The token must sit between
//! non-alphanumeric characters (or the text edges). The leading boundary
//! character is part of the match, so the next token can only start after
//! the previous one ends.

use std::sync::LazyLock;

use chrono::{Datelike, Utc};
use regex::Regex;

const MIN_THRESHOLD: i64 = 100;
const MAX_THRESHOLD: i64 = 4000;
const FIRST_IGNORED_YEAR: i64 = 2015;
const CONTEXT_RADIUS: usize = 24;

const MAX_INTEGER_DIGITS: usize = 4;
const MAX_FRACTION_DIGITS: usize = 3;

const FAME_WORDS: &[&str] = &["fame"];
const REQUIREMENT_WORDS: &[&str] = &["min", "minimum", "req", "required", "requirement"];
const WAR_WORDS: &[&str] = &["war", "river", "race"];

static THOUSANDS_GROUPING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}(,\d{3})+$").expect("thousands grouping pattern is valid")
});

/// A number that survived range filtering, with its context score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FameThresholdCandidate {
    pub value: u32,
    pub score: u32,
    /// Character offset of the number in the description.
    pub index: usize,
}

/// A raw token match. Offsets are character indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TokenMatch {
    number_start: usize,
    number_end: usize,
    kilo: bool,
    end: usize,
}

fn is_boundary(c: char) -> bool {
    !c.is_ascii_alphanumeric()
}

fn digit_run(chars: &[char], from: usize, max: usize) -> usize {
    chars[from..]
        .iter()
        .take(max)
        .take_while(|c| c.is_ascii_digit())
        .count()
}

/// Try to match a token whose number begins at `number_start`.
///
/// Mirrors greedy regex backtracking: longest integer part first, then the
/// longest fraction, then the most whitespace, then the suffix.
fn match_number_at(chars: &[char], number_start: usize) -> Option<TokenMatch> {
    let len = chars.len();
    let integer_max = digit_run(chars, number_start, MAX_INTEGER_DIGITS);

    for integer_len in (1..=integer_max).rev() {
        let integer_end = number_start + integer_len;

        let mut number_ends = Vec::with_capacity(MAX_FRACTION_DIGITS + 1);
        if integer_end < len && matches!(chars[integer_end], '.' | ',') {
            let fraction_max = digit_run(chars, integer_end + 1, MAX_FRACTION_DIGITS);
            number_ends.extend((1..=fraction_max).rev().map(|n| integer_end + 1 + n));
        }
        number_ends.push(integer_end);

        for number_end in number_ends {
            let spaces = chars[number_end..]
                .iter()
                .take_while(|c| c.is_whitespace())
                .count();

            for space_len in (0..=spaces).rev() {
                let after_space = number_end + space_len;
                let has_suffix = after_space < len && matches!(chars[after_space], 'k' | 'K');

                let ends = if has_suffix {
                    vec![(after_space + 1, true), (after_space, false)]
                } else {
                    vec![(after_space, false)]
                };

                for (end, kilo) in ends {
                    if end == len || is_boundary(chars[end]) {
                        return Some(TokenMatch {
                            number_start,
                            number_end,
                            kilo,
                            end,
                        });
                    }
                }
            }
        }
    }

    None
}

/// Try to match a token (boundary included) starting exactly at `start`.
fn match_token_at(chars: &[char], start: usize) -> Option<TokenMatch> {
    if start == 0 {
        if let Some(found) = match_number_at(chars, 0) {
            return Some(found);
        }
    }
    if start < chars.len() && is_boundary(chars[start]) {
        return match_number_at(chars, start + 1);
    }
    None
}

fn find_tokens(chars: &[char]) -> Vec<TokenMatch> {
    let mut tokens = Vec::new();
    let mut position = 0;

    while position < chars.len() {
        match match_token_at(chars, position) {
            Some(token) => {
                position = token.end;
                tokens.push(token);
            }
            None => position += 1,
        }
    }

    tokens
}

/// Parse a number that may use either `.` or `,` as decimal or grouping mark.
fn parse_numeric_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = if raw.contains('.') && raw.contains(',') {
        raw.replace(',', "")
    } else if raw.contains(',') {
        if THOUSANDS_GROUPING.is_match(raw) {
            raw.replace(',', "")
        } else {
            raw.replacen(',', ".", 1)
        }
    } else {
        raw.to_string()
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn normalize_threshold_value(raw: &str, kilo: bool) -> Option<i64> {
    let parsed = parse_numeric_value(raw)?;
    let value = if kilo { parsed * 1000.0 } else { parsed };
    Some(value.round() as i64)
}

fn is_ignored_year(value: i64, current_year: i64) -> bool {
    (FIRST_IGNORED_YEAR..=current_year).contains(&value)
}

fn contains_word(context: &str, words: &[&str]) -> bool {
    context
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|token| words.contains(&token))
}

/// UTF-16 offset of every char boundary. Context windows are measured in
/// UTF-16 units, where an emoji spans two.
fn utf16_offsets(chars: &[char]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(chars.len() + 1);
    let mut unit = 0;
    offsets.push(unit);
    for c in chars {
        unit += c.len_utf16();
        offsets.push(unit);
    }
    offsets
}

fn score_context(
    chars: &[char],
    offsets: &[usize],
    number_start: usize,
    number_end: usize,
) -> u32 {
    let from = offsets[number_start].saturating_sub(CONTEXT_RADIUS);
    let to = offsets[number_end] + CONTEXT_RADIUS;
    let context: String = chars
        .iter()
        .enumerate()
        .filter(|(i, _)| offsets[*i] >= from && offsets[i + 1] <= to)
        .map(|(_, c)| c)
        .collect::<String>()
        .to_lowercase();

    let mut score = 0;
    if contains_word(&context, FAME_WORDS) {
        score += 3;
    }
    if contains_word(&context, REQUIREMENT_WORDS) {
        score += 2;
    }
    if contains_word(&context, WAR_WORDS) {
        score += 1;
    }
    score
}

fn collect_candidates(description: &str, current_year: i64) -> Vec<FameThresholdCandidate> {
    let chars: Vec<char> = description.chars().collect();
    let offsets = utf16_offsets(&chars);

    find_tokens(&chars)
        .into_iter()
        .filter_map(|token| {
            let raw: String = chars[token.number_start..token.number_end].iter().collect();
            let value = normalize_threshold_value(&raw, token.kilo)?;

            if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&value)
                || is_ignored_year(value, current_year)
            {
                return None;
            }

            Some(FameThresholdCandidate {
                value: value as u32,
                score: score_context(&chars, &offsets, token.number_start, token.number_end),
                index: token.number_start,
            })
        })
        .collect()
}

fn best_candidate(mut candidates: Vec<FameThresholdCandidate>) -> Option<FameThresholdCandidate> {
    candidates.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.value.cmp(&b.value))
            .then(a.index.cmp(&b.index))
    });
    candidates.into_iter().next()
}

/// Extract the fame requirement a clan advertises in its description.
pub fn extract_clan_fame_threshold(description: Option<&str>) -> Option<u32> {
    let description = description.filter(|d| !d.is_empty())?;
    let current_year = i64::from(Utc::now().year());
    best_candidate(collect_candidates(description, current_year)).map(|c| c.value)
}
