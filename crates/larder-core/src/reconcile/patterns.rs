//! Regex patterns for supplier-name noise stripping and product-name
//! normalization.
//!
//! OCR frequently reads a supplier block as one line that concatenates the
//! company name with its legal boilerplate (tax codes, registration numbers,
//! addresses). These patterns remove the boilerplate together with the
//! digits/letters attached to it.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Lithuanian VAT payer code: "PVM mokėtojo kodas LT100001738313"
    pub static ref VAT_PAYER_CODE: Regex = Regex::new(
        r"(?i)[,;]?\s*PVM\s+mok[ėe]tojo\s+kodas[\s:]*[A-Z]{0,2}\s?\d{9,12}"
    ).unwrap();

    // Lithuanian company/registration code: "įmonės kodas 300001738"
    pub static ref COMPANY_CODE: Regex = Regex::new(
        r"(?i)[,;]?\s*(?:[įi]mon[ėe]s|registracijos)\s+kodas[\s:]*\d{7,11}"
    ).unwrap();

    // Lithuanian address fragments: "juridinis adresas: ..." / "adresas: ..."
    // Removes everything to the end of the string; the address always trails
    // the name in extracted supplier blocks.
    pub static ref ADDRESS_FRAGMENT: Regex = Regex::new(
        r"(?i)[,;]?\s*(?:juridinis\s+)?adresas\b[\s:]*.*$"
    ).unwrap();

    // Bare country-prefixed tax code: "LT100001738313", "PL 1234567890"
    pub static ref COUNTRY_TAX_CODE: Regex = Regex::new(
        r"[,;]?\s*\b[A-Z]{2}\s?\d{9,11}\b"
    ).unwrap();

    // English annotations: "VAT no 123456789", "Tax ID: AB-1234",
    // "Registration No: 12345"
    pub static ref VAT_ANNOTATION: Regex = Regex::new(
        r"(?i)[,;]?\s*\bVAT(?:\s+payer)?(?:\s+(?:no|number|code))?\.?[\s:]*[A-Z]{0,2}\s?[\d][\d\s-]{5,}"
    ).unwrap();

    pub static ref TAX_ID_ANNOTATION: Regex = Regex::new(
        r"(?i)[,;]?\s*\bTax\s+ID\.?[\s:]*[A-Za-z0-9-]+"
    ).unwrap();

    pub static ref REGISTRATION_ANNOTATION: Regex = Regex::new(
        r"(?i)[,;]?\s*\bRegistration\s+No\.?[\s:]*[A-Za-z0-9-]+"
    ).unwrap();

    // Quote characters wrapping the whole name: `"Šviežia mėsa" -> Šviežia mėsa`
    pub static ref EDGE_QUOTES: Regex = Regex::new(
        "^[\"'„“”‚‘’`]+|[\"'„“”‚‘’`]+$"
    ).unwrap();

    // Runs of whitespace (including what pattern removal leaves behind).
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Punctuation stripped from product names before comparison.
    pub static ref PRODUCT_PUNCTUATION: Regex = Regex::new(r"[^\p{L}\p{N}\s]").unwrap();
}

/// Noise patterns applied in order by the supplier-name cleaner.
///
/// Labeled codes run before the bare country-prefixed pattern so the label is
/// removed together with its digits.
pub fn noise_patterns() -> [&'static Regex; 7] {
    [
        &VAT_PAYER_CODE,
        &COMPANY_CODE,
        &ADDRESS_FRAGMENT,
        &VAT_ANNOTATION,
        &TAX_ID_ANNOTATION,
        &REGISTRATION_ANNOTATION,
        &COUNTRY_TAX_CODE,
    ]
}
