//! Identity & canonicalization — deterministic lead keys.
//!
//! Determinism is load-bearing: re-running identity on the same raw input
//! at any time, from any process, must yield the same key. This is what
//! makes the whole pipeline restartable without duplicate leads.

use sha2::{Digest, Sha256};

/// Country used when a raw record carries none.
pub const DEFAULT_COUNTRY: &str = "us";

/// Legal-entity suffix tokens stripped during canonicalization.
const LEGAL_SUFFIXES: &[&str] = &["llc", "inc", "corp", "ltd", "co", "company", "the"];

/// Canonicalize a business name for deduplication.
///
/// Lowercases, strips punctuation, collapses whitespace, and removes
/// legal-entity suffix tokens wherever they appear as whole words.
/// "Pro Plumbing LLC" and "pro plumbing" both canonicalize to
/// "pro plumbing".
pub fn canonicalize(name: &str) -> String {
    let lowered: String = name
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    lowered
        .split_whitespace()
        .filter(|token| !LEGAL_SUFFIXES.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive the identity key for a lead: SHA-256 hex over the pipe-joined,
/// lowercased, trimmed `canonical_name|city|region|country` tuple.
///
/// `country` defaults to [`DEFAULT_COUNTRY`] when absent or blank.
pub fn identity_key(
    canonical_name: &str,
    city: Option<&str>,
    region: Option<&str>,
    country: Option<&str>,
) -> String {
    let norm = |s: Option<&str>| s.unwrap_or("").trim().to_lowercase();

    let country = match country {
        Some(c) if !c.trim().is_empty() => c.trim().to_lowercase(),
        _ => DEFAULT_COUNTRY.to_string(),
    };

    let tuple = format!(
        "{}|{}|{}|{}",
        canonical_name.trim().to_lowercase(),
        norm(city),
        norm(region),
        country,
    );

    let digest = Sha256::digest(tuple.as_bytes());
    let mut hex = String::with_capacity(64);
    for byte in digest {
        use std::fmt::Write;
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_strips_suffixes_and_punctuation() {
        assert_eq!(canonicalize("Pro Plumbing LLC"), "pro plumbing");
        assert_eq!(canonicalize("pro plumbing"), "pro plumbing");
        assert_eq!(canonicalize("The Tidy Co."), "tidy");
        assert_eq!(canonicalize("Acme, Inc."), "acme");
        assert_eq!(canonicalize("  Spaced   Out  Corp "), "spaced out");
    }

    #[test]
    fn canonicalize_keeps_interior_words() {
        // "co" is only dropped as a whole token, never as a substring.
        assert_eq!(canonicalize("Coastal Cleaning"), "coastal cleaning");
        assert_eq!(canonicalize("Company of Heroes"), "of heroes");
    }

    #[test]
    fn identity_is_deterministic_across_raw_variants() {
        let a = identity_key(
            &canonicalize("Pro Plumbing LLC"),
            Some("Austin"),
            Some("TX"),
            None,
        );
        let b = identity_key(
            &canonicalize("pro plumbing"),
            Some("austin"),
            Some("tx"),
            Some("US"),
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn identity_differs_by_location() {
        let austin = identity_key("pro plumbing", Some("austin"), Some("tx"), None);
        let dallas = identity_key("pro plumbing", Some("dallas"), Some("tx"), None);
        assert_ne!(austin, dallas);
    }

    #[test]
    fn blank_country_falls_back_to_default() {
        let blank = identity_key("acme", Some("boise"), Some("id"), Some("  "));
        let none = identity_key("acme", Some("boise"), Some("id"), None);
        assert_eq!(blank, none);
    }
}
