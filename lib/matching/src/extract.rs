//! Constraint extraction from free text
//!
//! Pattern-based: no parsing beyond a handful of regular expressions.
//! The [`ConstraintExtractor`] trait is the seam for swapping in a smarter
//! parser later without touching the rest of the engine.

use crate::constraints::ConstraintSet;
use regex::Regex;
use std::sync::OnceLock;

/// Turns an utterance into a [`ConstraintSet`]
pub trait ConstraintExtractor: Send + Sync {
    fn extract(&self, utterance: &str) -> ConstraintSet;
}

struct Patterns {
    bed: Regex,
    bath: Regex,
    price: Regex,
    location_start: Regex,
    location_span: Regex,
    clause_end: Regex,
    article: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        // A count is required for every phrasing; "2.5 baths" is not an integer count,
        // but a sentence stop before the count ("austin.3 bed") is fine
        bed: Regex::new(r"(?:^\.?|[^\d.]|[^\d]\.)(\d+)\s*-?\s*bed(?:room)?s?\b")
            .expect("bed pattern"),
        bath: Regex::new(r"(?:^\.?|[^\d.]|[^\d]\.)(\d+)\s*-?\s*bath(?:room)?s?\b")
            .expect("bath pattern"),
        price: Regex::new(r"\b(?:under|below|less\s+than)\s*\$?\s*(\d{1,3}(?:,\d{3})+|\d+)")
            .expect("price pattern"),
        location_start: Regex::new(r"\bin\s+").expect("location pattern"),
        location_span: Regex::new(r"^[a-z][a-z'\-\s]*(?:,\s*[a-z][a-z'\-\s]*)?")
            .expect("location span pattern"),
        clause_end: Regex::new(r"\b(?:under|below|less|with|for|around|near|priced|that|in)\b")
            .expect("clause pattern"),
        article: Regex::new(r"^(?:a|an|the)\s+").expect("article pattern"),
    })
}

/// Regex-driven extractor for bedrooms, bathrooms, price ceiling and location
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ConstraintExtractor for PatternExtractor {
    fn extract(&self, utterance: &str) -> ConstraintSet {
        let text = utterance.to_lowercase();
        let p = patterns();

        let (city, state) = match extract_location(p, &text) {
            Some((city, state)) => (Some(city), state),
            None => (None, None),
        };

        ConstraintSet {
            bed: extract_count(&p.bed, &text),
            bath: extract_count(&p.bath, &text),
            price: extract_price(&p.price, &text),
            city,
            state,
        }
    }
}

fn extract_count(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn extract_price(re: &Regex, text: &str) -> Option<f64> {
    let amount = re.captures(text)?.get(1)?.as_str().replace(',', "");
    amount.parse().ok()
}

/// The place is read after the last "in" that is followed by a name, so
/// "interested in a house in austin" reads Austin rather than "House".
fn extract_location(p: &Patterns, text: &str) -> Option<(String, Option<String>)> {
    let starts: Vec<usize> = p.location_start.find_iter(text).map(|m| m.end()).collect();
    starts
        .into_iter()
        .rev()
        .find_map(|start| location_at(p, &text[start..]))
}

fn location_at(p: &Patterns, rest: &str) -> Option<(String, Option<String>)> {
    let span = p.location_span.find(rest)?.as_str();
    let span = match p.clause_end.find(span) {
        Some(m) => &span[..m.start()],
        None => span,
    };
    let span = p.article.replace(span.trim(), "");

    let mut parts = span.splitn(2, ',').map(str::trim);
    let city = parts.next().filter(|s| !s.is_empty())?;
    let state = parts.next().filter(|s| !s.is_empty()).map(title_case);

    Some((title_case(city), state))
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so "winston-salem"
/// becomes "Winston-Salem".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.split_whitespace().collect::<Vec<_>>().join(" ").chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(s: &str) -> ConstraintSet {
        PatternExtractor::new().extract(s)
    }

    #[test]
    fn test_full_query() {
        let c = extract("3 bedroom house in Austin under $400,000");
        assert_eq!(c.bed, Some(3));
        assert_eq!(c.price, Some(400_000.0));
        assert_eq!(c.city.as_deref(), Some("Austin"));
        assert_eq!(c.state, None);
        assert_eq!(c.bath, None);
    }

    #[test]
    fn test_bed_phrasings() {
        for (text, n) in [
            ("2 bed", 2),
            ("4 beds please", 4),
            ("a 5-bedroom home", 5),
            ("need 3bedrooms", 3),
            ("10 bedroom mansion", 10),
        ] {
            assert_eq!(extract(text).bed, Some(n), "{}", text);
        }
    }

    #[test]
    fn test_bedroom_without_count_is_ignored() {
        assert_eq!(extract("a bedroom near the park").bed, None);
        assert_eq!(extract("bedrooms in Dallas").bed, None);
    }

    #[test]
    fn test_first_bed_occurrence_wins() {
        assert_eq!(extract("2 bed or maybe 3 bed").bed, Some(2));
    }

    #[test]
    fn test_bath() {
        assert_eq!(extract("3 bed 2 bath").bath, Some(2));
        assert_eq!(extract("2 bathrooms").bath, Some(2));
        assert_eq!(extract("2.5 baths").bath, None);
    }

    #[test]
    fn test_price_ceiling_phrasings() {
        assert_eq!(extract("under $400000").price, Some(400_000.0));
        assert_eq!(extract("below 1,250,000").price, Some(1_250_000.0));
        assert_eq!(extract("less than $ 99,000").price, Some(99_000.0));
        // an amount without a ceiling qualifier is not a constraint
        assert_eq!(extract("around $300,000").price, None);
    }

    #[test]
    fn test_location_with_state() {
        let c = extract("2 bed in san francisco, california below $1,000,000");
        assert_eq!(c.city.as_deref(), Some("San Francisco"));
        assert_eq!(c.state.as_deref(), Some("California"));
    }

    #[test]
    fn test_location_clause_ends() {
        let c = extract("house in the woodlands with a pool");
        assert_eq!(c.city.as_deref(), Some("Woodlands"));

        let c = extract("condo in new york. 2 bath");
        assert_eq!(c.city.as_deref(), Some("New York"));
        assert_eq!(c.bath, Some(2));
    }

    #[test]
    fn test_location_uses_last_in_phrase() {
        let c = extract("I'm interested in a house in Austin under $400,000");
        assert_eq!(c.city.as_deref(), Some("Austin"));
        assert_eq!(c.price, Some(400_000.0));

        // a trailing "in" without a place name does not hide the earlier one
        let c = extract("3 bed in denver, colorado in 2025");
        assert_eq!(c.city.as_deref(), Some("Denver"));
        assert_eq!(c.state.as_deref(), Some("Colorado"));
    }

    #[test]
    fn test_count_after_sentence_stop() {
        let c = extract("house in Austin.3 bed");
        assert_eq!(c.bed, Some(3));
        assert_eq!(c.city.as_deref(), Some("Austin"));
        assert_eq!(extract(".2 bath").bath, Some(2));
        assert_eq!(extract("need 2.5 baths").bath, None);
    }

    #[test]
    fn test_in_inside_word_is_not_location() {
        let c = extract("find a cabin");
        assert!(c.city.is_none());
    }

    #[test]
    fn test_greeting_is_empty() {
        assert!(extract("hello").is_empty());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("winston-salem"), "Winston-Salem");
        assert_eq!(title_case("  salt   lake city "), "Salt Lake City");
        assert_eq!(title_case("o'fallon"), "O'Fallon");
    }
}
