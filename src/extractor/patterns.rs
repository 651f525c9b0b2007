// file: src/extractor/patterns.rs
// description: compiled regex patterns for fallback entity extraction
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref EMAIL: Regex = Regex::new(
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"
    ).expect("EMAIL regex is valid");

    pub static ref ISO_DATE: Regex = Regex::new(
        r"\b(\d{4})-(\d{2})-(\d{2})\b"
    ).expect("ISO_DATE regex is valid");

    pub static ref MONTH_YEAR: Regex = Regex::new(
        r"\b(January|February|March|April|May|June|July|August|September|October|November|December)\s+(\d{4})\b"
    ).expect("MONTH_YEAR regex is valid");

    pub static ref AMOUNT_USD: Regex = Regex::new(
        r"\$\s*[0-9,]+(?:\.[0-9]{2})?\s*(?:million|M|billion|B|thousand|K)?"
    ).expect("AMOUNT_USD regex is valid");

    // Regulation and standard names common in enterprise documents
    pub static ref REGULATION: Regex = Regex::new(
        r"\b(GDPR|CCPA|HIPAA|SOX|FERPA|GLBA|PCI[ -]DSS|ISO[ -]27001|SOC[ -]2|NIST)\b"
    ).expect("REGULATION regex is valid");

    // Capitalized multi-word phrases, a rough stand-in for organization names
    pub static ref PROPER_PHRASE: Regex = Regex::new(
        r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3})\b"
    ).expect("PROPER_PHRASE regex is valid");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(EMAIL.is_match("contact legal@example.com for details"));
        assert!(!EMAIL.is_match("not an email"));
    }

    #[test]
    fn test_regulation_pattern() {
        assert!(REGULATION.is_match("subject to GDPR requirements"));
        assert!(REGULATION.is_match("certified under ISO 27001"));
        assert!(REGULATION.is_match("PCI-DSS scope"));
        assert!(!REGULATION.is_match("general policy text"));
    }

    #[test]
    fn test_date_patterns() {
        assert!(ISO_DATE.is_match("effective 2024-01-15"));
        assert!(MONTH_YEAR.is_match("revised March 2024"));
    }

    #[test]
    fn test_amount_pattern() {
        assert!(AMOUNT_USD.is_match("fines up to $20 million"));
        assert!(AMOUNT_USD.is_match("a $1,500.00 fee"));
    }
}
