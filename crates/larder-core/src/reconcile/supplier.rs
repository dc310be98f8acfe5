//! Supplier-name normalization and matching.
//!
//! Extracted supplier names are noisy: tax codes, registration numbers, and
//! addresses get concatenated onto the company name by OCR. `clean` strips
//! that boilerplate, `normalize_for_matching` produces a comparison key, and
//! `find_match` resolves a name against the known suppliers.

use crate::models::supplier::Supplier;

use super::patterns::{EDGE_QUOTES, noise_patterns, WHITESPACE};

/// Strip legal/registration noise from a raw supplier string.
///
/// Empty input is returned unchanged. If stripping removes everything, the
/// original input is returned untouched: a noisy canonical name is still more
/// useful than an empty one.
pub fn clean(raw: &str) -> String {
    if raw.trim().is_empty() {
        return raw.to_string();
    }

    let mut name = raw.trim().to_string();
    for pattern in noise_patterns() {
        name = pattern.replace_all(&name, "").into_owned();
    }

    let name = EDGE_QUOTES.replace_all(name.trim(), "");
    let name = WHITESPACE.replace_all(&name, " ");
    let name = name.trim();

    if name.is_empty() {
        raw.to_string()
    } else {
        name.to_string()
    }
}

/// Produce the canonical comparison key for a supplier name.
///
/// Returns an empty string when nothing useful survives cleaning.
pub fn normalize_for_matching(name: &str) -> String {
    let cleaned = clean(name);
    let lowered: String = cleaned
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201a}' | '`' => '\'',
            '\u{201c}' | '\u{201d}' | '\u{201e}' => '"',
            _ => c,
        })
        .collect();

    WHITESPACE.replace_all(&lowered, " ").trim().to_string()
}

/// Find the best existing supplier for an extracted name.
///
/// Two passes, first match wins: exact normalized equality, then substring
/// containment in either direction (OCR often drops a legal suffix like
/// "UAB"). Empty input never matches. Absence of a match is a normal outcome
/// surfaced to a human reviewer; this function never invents a supplier.
pub fn find_match<'a>(extracted_name: &str, candidates: &'a [Supplier]) -> Option<&'a Supplier> {
    let needle = normalize_for_matching(extracted_name);
    if needle.is_empty() {
        return None;
    }

    if let Some(exact) = candidates
        .iter()
        .find(|s| normalize_for_matching(&s.name) == needle)
    {
        return Some(exact);
    }

    candidates.iter().find(|s| {
        let candidate = normalize_for_matching(&s.name);
        !candidate.is_empty() && (candidate.contains(&needle) || needle.contains(&candidate))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_strips_lithuanian_vat_code() {
        assert_eq!(
            clean("UAB Šviežia mėsa, PVM mokėtojo kodas LT100001738313"),
            "UAB Šviežia mėsa"
        );
    }

    #[test]
    fn test_clean_strips_company_code_and_address() {
        assert_eq!(
            clean("UAB Daržovės, įmonės kodas 300001738, juridinis adresas: Gedimino pr. 1, Vilnius"),
            "UAB Daržovės"
        );
    }

    #[test]
    fn test_clean_strips_english_annotations() {
        assert_eq!(clean("Fresh Foods Ltd VAT no 123456789"), "Fresh Foods Ltd");
        assert_eq!(clean("Fresh Foods Ltd, Tax ID: AB-1234"), "Fresh Foods Ltd");
        assert_eq!(
            clean("Fresh Foods Ltd Registration No: 556677"),
            "Fresh Foods Ltd"
        );
    }

    #[test]
    fn test_clean_strips_bare_country_tax_code() {
        assert_eq!(clean("UAB Pieno žvaigždės LT119511515"), "UAB Pieno žvaigždės");
    }

    #[test]
    fn test_clean_strips_edge_quotes_and_collapses_whitespace() {
        assert_eq!(clean("  \"Vilniaus   duona\"  "), "Vilniaus duona");
        assert_eq!(clean("„Vilniaus duona“"), "Vilniaus duona");
    }

    #[test]
    fn test_clean_empty_input_unchanged() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   "), "   ");
    }

    #[test]
    fn test_clean_never_empties_nonempty_input() {
        // Name that is nothing but a tax code falls back to the original.
        assert_eq!(clean("LT100001738313"), "LT100001738313");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let samples = [
            "UAB Šviežia mėsa, PVM mokėtojo kodas LT100001738313",
            "Fresh Foods Ltd VAT no 123456789",
            "  \"Vilniaus   duona\"  ",
            "LT100001738313",
            "Plain Supplier",
        ];
        for raw in samples {
            let once = clean(raw);
            assert_eq!(clean(&once), once, "clean not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_normalize_for_matching() {
        assert_eq!(
            normalize_for_matching("UAB Šviežia Mėsa, PVM mokėtojo kodas LT100001738313"),
            "uab šviežia mėsa"
        );
        assert_eq!(normalize_for_matching("„Vilniaus duona“"), "vilniaus duona");
        assert_eq!(normalize_for_matching("O’Brien Foods"), "o'brien foods");
        assert_eq!(normalize_for_matching("   "), "");
    }

    #[test]
    fn test_find_match_exact_beats_partial() {
        let candidates = vec![
            Supplier::new("s1", "Šviežia mėsa ir daržovės"),
            Supplier::new("s2", "UAB Šviežia mėsa"),
        ];
        // s1 would match by containment, but s2 is the exact match.
        let matched = find_match("uab šviežia mėsa", &candidates).unwrap();
        assert_eq!(matched.id, "s2");
    }

    #[test]
    fn test_find_match_containment_handles_dropped_suffix() {
        let candidates = vec![Supplier::new("s1", "UAB Vilniaus duona")];
        let matched = find_match("Vilniaus duona", &candidates).unwrap();
        assert_eq!(matched.id, "s1");
    }

    #[test]
    fn test_find_match_first_match_wins() {
        let candidates = vec![
            Supplier::new("s1", "Baltic Fish"),
            Supplier::new("s2", "Baltic"),
        ];
        // Both are contained in the extracted name; the first candidate wins.
        let matched = find_match("Baltic Fish Export LT119511515", &candidates).unwrap();
        assert_eq!(matched.id, "s1");
    }

    #[test]
    fn test_find_match_no_guess_on_empty_input() {
        let candidates = vec![Supplier::new("s1", "Anything")];
        assert!(find_match("", &candidates).is_none());
        assert!(find_match("   ", &candidates).is_none());
    }

    #[test]
    fn test_find_match_empty_candidates() {
        assert!(find_match("UAB Šviežia mėsa", &[]).is_none());
    }

    #[test]
    fn test_find_match_no_match() {
        let candidates = vec![Supplier::new("s1", "Baltic Fish")];
        assert!(find_match("Kauno grūdai", &candidates).is_none());
    }
}
