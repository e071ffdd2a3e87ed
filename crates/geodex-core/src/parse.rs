//! Free-form query parsing: pulls country, region and abbreviation hints
//! out of the input before the matchers run.
//!
//! All matching is done with case-insensitive prefix/suffix checks over
//! folded strings. Building regexes out of runtime data (country names,
//! user input) is forbidden here: unescaped metacharacters turn into both
//! wrong matches and pathological scan times.

use crate::admin;
use crate::model::Geodex;
use crate::text;

/// Longest input (in characters) that reaches the matchers. Anything
/// longer is truncated on a character boundary; the cap bounds the
/// Levenshtein work a hostile input can demand.
pub(crate) const MAX_INPUT_RUNES: usize = 256;

/// Parsed query pieces.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct QueryPieces {
    /// ISO-2 country code, or empty.
    pub country: String,
    /// Uppercased region code, or empty.
    pub region: String,
    /// Standalone 2-3 letter tokens of the *original* input.
    pub abbrevs: Vec<String>,
    /// Remaining tokens after extraction, split on single spaces.
    pub tokens: Vec<String>,
}

impl Geodex {
    /// Splits a query into `(country?, region?, abbreviations, tokens)`.
    ///
    /// Extraction order: country name, US state code, international admin
    /// division. Each extractor strips the matched span; the abbreviation
    /// list is collected from the input *before* any stripping.
    pub(crate) fn extract_location_pieces(&self, input: &str) -> QueryPieces {
        let abbrevs = text::abbreviation_tokens(input);
        let mut remainder = input.to_string();
        let mut country = String::new();
        let mut region = String::new();

        // Country names, five shapes: "France", "France, X", "France X",
        // "X, France", "X France". First hit wins.
        for info in &self.countries {
            if info.country.is_empty() {
                continue;
            }
            let name = text::fold(&info.country);
            if text::eq_fold(&remainder, &info.country) {
                country = info.iso.clone();
                remainder.clear();
                break;
            }
            if let Some(rest) = text::strip_prefix_fold(&remainder, &format!("{name}, "))
                .or_else(|| text::strip_prefix_fold(&remainder, &format!("{name} ")))
            {
                country = info.iso.clone();
                remainder = rest;
                break;
            }
            if let Some(rest) = text::strip_suffix_fold(&remainder, &format!(", {name}"))
                .or_else(|| text::strip_suffix_fold(&remainder, &format!(" {name}")))
            {
                country = info.iso.clone();
                remainder = rest;
                break;
            }
        }

        // US state codes, same five shapes, iterated in sorted order.
        for code in admin::US_STATE_CODES {
            let folded = code.to_lowercase();
            let mut hit = false;
            if text::eq_fold(&remainder, code) {
                remainder.clear();
                hit = true;
            } else if let Some(rest) =
                text::strip_prefix_fold(&remainder, &format!("{folded}, "))
                    .or_else(|| text::strip_prefix_fold(&remainder, &format!("{folded} ")))
            {
                remainder = rest;
                hit = true;
            } else if let Some(rest) =
                text::strip_suffix_fold(&remainder, &format!(", {folded}"))
                    .or_else(|| text::strip_suffix_fold(&remainder, &format!(" {folded}")))
            {
                remainder = rest;
                hit = true;
            }
            if hit {
                region = (*code).to_string();
                if country.is_empty() {
                    country = "US".to_string();
                }
                break;
            }
        }

        // International admin divisions: a trailing 2-3 char token such as
        // "Toronto, ON" or "Sydney NSW".
        if region.is_empty() {
            let parts: Vec<String> = remainder.split(' ').map(str::to_string).collect();
            if parts.len() >= 2 {
                let last = parts[parts.len() - 1].trim_matches([',', ' ']);
                let len = last.chars().count();
                if (2..=3).contains(&len) {
                    let code = last.to_uppercase();
                    if !country.is_empty() && self.is_admin_division(&country, &code) {
                        region = code;
                        remainder = parts[..parts.len() - 1].join(" ");
                    } else if country.is_empty() {
                        let owner = self.admin_division_country(&code);
                        if !owner.is_empty() {
                            region = code;
                            country = owner;
                            remainder = parts[..parts.len() - 1].join(" ");
                        }
                    }
                }
            }
        }

        let remainder = remainder.trim_matches([' ', ',']);
        QueryPieces {
            country,
            region,
            abbrevs,
            tokens: remainder.split(' ').map(str::to_string).collect(),
        }
    }
}
