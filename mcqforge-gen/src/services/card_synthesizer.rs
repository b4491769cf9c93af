//! Heuristic card synthesis
//!
//! One card per chunk. Candidate terms are word-like tokens of at least four
//! characters starting with a letter; the first term is the correct answer
//! and the first six terms are the options.

use crate::models::{Card, CardError, Chunk, MIN_OPTIONS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Maximum number of terms collected from a chunk
pub const MAX_TERMS: usize = 8;

/// Options used when a chunk yields no terms at all
pub const PLACEHOLDER_TERMS: [&str; 6] = [
    "ConceptA", "ConceptB", "ConceptC", "ConceptD", "ConceptE", "ConceptF",
];

static TERM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z][A-Za-z0-9\-]{3,}\b").expect("term pattern is valid"));

/// Extract up to [`MAX_TERMS`] terms, deduplicated case-insensitively in
/// first-seen order
pub fn extract_terms(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut terms = Vec::new();

    for m in TERM_PATTERN.find_iter(text) {
        let token = m.as_str();
        if seen.insert(token.to_lowercase()) {
            terms.push(token.to_string());
            if terms.len() >= MAX_TERMS {
                break;
            }
        }
    }

    terms
}

/// Fill `terms` up to the minimum option count
///
/// No terms → the placeholder set. Fewer than six → sequential
/// `Distractor{n}` labels, skipping any label that collides with a term.
pub fn pad_terms(mut terms: Vec<String>) -> Vec<String> {
    if terms.is_empty() {
        return PLACEHOLDER_TERMS.iter().map(|t| t.to_string()).collect();
    }

    let mut seen: HashSet<String> = terms.iter().map(|t| t.to_lowercase()).collect();
    let mut n = 1;
    while terms.len() < MIN_OPTIONS {
        let label = format!("Distractor{}", n);
        n += 1;
        if seen.insert(label.to_lowercase()) {
            terms.push(label);
        }
    }
    terms
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CardSynthesizer;

impl CardSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Build the single card for `chunk`
    pub fn synthesize(&self, chunk: &Chunk) -> Result<Card, CardError> {
        let terms = pad_terms(extract_terms(chunk.text()));

        let correct = terms[0].clone();
        let options: Vec<String> = terms.into_iter().take(MIN_OPTIONS).collect();

        let question = format!("High-yield term associated with {}", chunk.topic());
        let extra = format!(
            "Rationale: {} appears prominently in the chunk for {}.<br><br>Source Anchor: {}",
            correct,
            chunk.topic(),
            chunk.chunk_id()
        );

        Card::new(question, options, vec![correct], extra)
    }
}
