// file: src/extractor/entities.rs
// description: regex-based entity extraction used when no NLP service is configured
// reference: internal extraction logic

use crate::extractor::patterns;
use regex::Regex;
use std::collections::HashSet;

/// Maximum entities returned per document. Keeps prompt sizes and graph
/// fan-out bounded for pathological inputs.
const MAX_ENTITIES: usize = 50;

pub struct EntityExtractor;

impl EntityExtractor {
    /// Extract entity strings from text, deduplicated in order of first
    /// occurrence. A rough local substitute for the managed NLP service.
    pub fn extract(text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut entities = Vec::new();

        let patterns: [&Regex; 5] = [
            &patterns::REGULATION,
            &patterns::EMAIL,
            &patterns::AMOUNT_USD,
            &patterns::ISO_DATE,
            &patterns::MONTH_YEAR,
        ];

        for pattern in patterns {
            for m in pattern.find_iter(text) {
                let entity = m.as_str().trim().to_string();
                if seen.insert(entity.clone()) {
                    entities.push(entity);
                }
                if entities.len() >= MAX_ENTITIES {
                    return entities;
                }
            }
        }

        // Proper phrases last: noisiest pattern, only fills remaining slots
        for m in patterns::PROPER_PHRASE.find_iter(text) {
            let entity = m.as_str().trim().to_string();
            if seen.insert(entity.clone()) {
                entities.push(entity);
            }
            if entities.len() >= MAX_ENTITIES {
                break;
            }
        }

        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_regulations_and_dates() {
        let text = "This Data Retention policy implements GDPR and CCPA, effective 2024-01-15.";
        let entities = EntityExtractor::extract(text);

        assert!(entities.contains(&"GDPR".to_string()));
        assert!(entities.contains(&"CCPA".to_string()));
        assert!(entities.contains(&"2024-01-15".to_string()));
    }

    #[test]
    fn test_deduplicates_preserving_order() {
        let text = "GDPR applies. GDPR fines reach $20 million under GDPR.";
        let entities = EntityExtractor::extract(text);

        let gdpr_count = entities.iter().filter(|e| *e == "GDPR").count();
        assert_eq!(gdpr_count, 1);
        assert_eq!(entities[0], "GDPR");
    }

    #[test]
    fn test_empty_text_yields_no_entities() {
        assert!(EntityExtractor::extract("").is_empty());
    }

    #[test]
    fn test_entity_cap() {
        let text = (0..100)
            .map(|i| format!("2024-01-{:02}", (i % 28) + 1))
            .collect::<Vec<_>>()
            .join(" dated ");
        let entities = EntityExtractor::extract(&text);
        assert!(entities.len() <= MAX_ENTITIES);
    }
}
