//! Two-stage answer resolution
//!
//! 1. Containment pass: first topic, in declared order, with any
//!    trigger phrase occurring as a substring of the normalized input
//!    wins immediately.
//! 2. Similarity pass: Ratcliff/Obershelp ratio between the normalized
//!    input and each topic identifier; best topic wins only when its
//!    ratio is strictly greater than the running best and strictly
//!    greater than 0.5. Ties keep the earlier topic.

use std::sync::Arc;

use crate::knowledge::KnowledgeBase;

const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Resolves free-text input to a canonical answer
#[derive(Debug, Clone)]
pub struct Matcher {
    kb: Arc<KnowledgeBase>,
}

impl Matcher {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    /// Resolve an utterance to an answer, or `None` when nothing in
    /// the knowledge base is close enough
    pub fn resolve(&self, input: &str) -> Option<&str> {
        let input = input.trim().to_lowercase();

        // Containment pass, first match in topic order wins
        for topic in self.kb.topics() {
            if topic.triggers.iter().any(|t| input.contains(t.as_str())) {
                return Some(&topic.answer);
            }
        }

        // Similarity pass over topic identifiers
        let mut best_ratio = 0.0_f64;
        let mut best_answer = None;
        for topic in self.kb.topics() {
            let ratio = similarity_ratio(&input, &topic.name.to_lowercase());
            if ratio > best_ratio && ratio > SIMILARITY_THRESHOLD {
                best_ratio = ratio;
                best_answer = Some(topic.answer.as_str());
            }
        }

        best_answer
    }
}

/// Ratcliff/Obershelp similarity: `2 * M / (len(a) + len(b))` where
/// `M` is the total size of the longest-matching-block alignment.
/// Symmetric, in [0, 1], 1.0 for identical strings.
fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_len(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total characters covered by recursively taking the longest common
/// block and descending into the unmatched flanks
fn matching_len(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_match(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_len(&a[..i], &b[..j]) + matching_len(&a[i + size..], &b[j + size..])
}

/// Longest common contiguous block, earliest in `a` then `b` on ties
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // lengths[j] = length of common suffix ending at a[i-1], b[j-1]
    let mut lengths = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        let mut prev = 0;
        for j in 0..b.len() {
            let current = lengths[j + 1];
            if a[i] == b[j] {
                let len = prev + 1;
                lengths[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            } else {
                lengths[j + 1] = 0;
            }
            prev = current;
        }
    }

    best
}
