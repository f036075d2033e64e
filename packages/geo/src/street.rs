//! Street-address token parsing for the across-the-street heuristic.
//!
//! Addresses arrive in provider-normalized but inconsistent forms:
//! `"101 E Capitol St NE"`, `"101 E CAPITOL ST NE, WASHINGTON, DC"`.
//! Parsing here extracts the leading house number and the street-name
//! token sequence that follows it; city/state tails after a comma are
//! dropped.

use regex::Regex;
use std::sync::LazyLock;

/// Regex for a leading house number (e.g., "101", "4800-B").
static HOUSE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)").expect("valid regex"));

/// A street address split into its house number and street tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    /// Leading house number.
    pub house_number: u64,
    /// Uppercased street-name tokens after the house number.
    pub street_tokens: Vec<String>,
}

/// Parses the leading house number and street-name tokens from an
/// address. Returns `None` when there is no leading house number or no
/// street name follows it.
#[must_use]
pub fn parse_address(address: &str) -> Option<ParsedAddress> {
    // Drop city/state tails: "101 MAIN ST, SPRINGFIELD, IL" -> "101 MAIN ST"
    let street_part = address.split(',').next().unwrap_or(address);

    let captures = HOUSE_NUMBER_RE.captures(street_part)?;
    let number_match = captures.get(1)?;
    let house_number = number_match.as_str().parse::<u64>().ok()?;

    let street_tokens: Vec<String> = street_part[number_match.end()..]
        .split_whitespace()
        .map(|token| {
            token
                .trim_matches(|c: char| !c.is_ascii_alphanumeric())
                .to_uppercase()
        })
        .filter(|token| !token.is_empty())
        .collect();

    if street_tokens.is_empty() {
        return None;
    }

    Some(ParsedAddress {
        house_number,
        street_tokens,
    })
}

/// Returns `true` when the two addresses share a street name:
/// one address's street-token sequence appears as a contiguous
/// subsequence of the other's (case-insensitive).
///
/// Containment rather than equality tolerates one side carrying extra
/// directional or suffix tokens (`"E CAPITOL ST NE"` vs `"CAPITOL ST"`).
#[must_use]
pub fn same_street(a: &ParsedAddress, b: &ParsedAddress) -> bool {
    let (shorter, longer) = if a.street_tokens.len() <= b.street_tokens.len() {
        (&a.street_tokens, &b.street_tokens)
    } else {
        (&b.street_tokens, &a.street_tokens)
    };
    longer
        .windows(shorter.len())
        .any(|window| window == shorter.as_slice())
}

/// Returns `true` when two addresses are on the same street with
/// opposite house-number parity (the across-the-street precondition;
/// the distance bound is applied by the classifier).
#[must_use]
pub fn is_across_street_pair(target_address: &str, candidate_address: &str) -> bool {
    let (Some(target), Some(candidate)) = (
        parse_address(target_address),
        parse_address(candidate_address),
    ) else {
        return false;
    };

    same_street(&target, &candidate)
        && (target.house_number % 2) != (candidate.house_number % 2)
}
