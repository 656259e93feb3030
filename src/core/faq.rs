//! FAQ content for calculator pages.
//!
//! Content comes from an external [`FaqProvider`]. A [`FaqCatalog`] pairs the
//! provider with per-page fallback lists supplied at construction and serves
//! the fallback whenever the provider fails or has nothing for a page.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub order: u32,
}

#[derive(Debug, Error)]
pub enum FaqError {
    #[error("FAQ provider unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read FAQ file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid FAQ JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait FaqProvider: Send + Sync {
    fn faqs(&self, page_id: &str) -> Result<Vec<FaqEntry>, FaqError>;
}

/// Provider backed by an in-memory map of page id to entries.
#[derive(Debug, Default, Clone)]
pub struct StaticFaqProvider {
    pages: HashMap<String, Vec<FaqEntry>>,
}

impl StaticFaqProvider {
    pub fn new(pages: HashMap<String, Vec<FaqEntry>>) -> Self {
        Self { pages }
    }

    /// Parses `{"page-id": [{"id", "question", "answer", "order"}, ...]}`.
    pub fn from_json(json: &str) -> Result<Self, FaqError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_file(path: &Path) -> Result<Self, FaqError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

impl FaqProvider for StaticFaqProvider {
    fn faqs(&self, page_id: &str) -> Result<Vec<FaqEntry>, FaqError> {
        Ok(self.pages.get(page_id).cloned().unwrap_or_default())
    }
}

/// Stands in for a backend that cannot be reached.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableFaqProvider;

impl FaqProvider for UnavailableFaqProvider {
    fn faqs(&self, _page_id: &str) -> Result<Vec<FaqEntry>, FaqError> {
        Err(FaqError::Unavailable("no FAQ backend configured".to_string()))
    }
}

pub struct FaqCatalog {
    provider: Box<dyn FaqProvider>,
    fallback: HashMap<String, Vec<FaqEntry>>,
}

impl FaqCatalog {
    pub fn new(provider: Box<dyn FaqProvider>) -> Self {
        Self {
            provider,
            fallback: HashMap::new(),
        }
    }

    pub fn with_fallback(mut self, page_id: &str, entries: Vec<FaqEntry>) -> Self {
        self.fallback.insert(page_id.to_string(), entries);
        self
    }

    /// Catalog with the built-in fallback content for every calculator page.
    pub fn with_builtin_fallbacks(provider: Box<dyn FaqProvider>) -> Self {
        builtin_fallbacks()
            .into_iter()
            .fold(Self::new(provider), |catalog, (page, entries)| {
                catalog.with_fallback(page, entries)
            })
    }

    pub fn resolve(&self, page_id: &str) -> Vec<FaqEntry> {
        let mut entries = match self.provider.faqs(page_id) {
            Ok(entries) if !entries.is_empty() => entries,
            Ok(_) => self.fallback_for(page_id),
            Err(e) => {
                warn!("FAQ provider failed for page {page_id}: {e}; serving fallback");
                self.fallback_for(page_id)
            }
        };
        entries.sort_by_key(|entry| entry.order);
        entries
    }

    fn fallback_for(&self, page_id: &str) -> Vec<FaqEntry> {
        self.fallback.get(page_id).cloned().unwrap_or_default()
    }
}

pub const PAGE_IDS: [&str; 6] = [
    "401k-calculator",
    "digital-wellness-calculator",
    "fraction-calculator",
    "paint-calculator",
    "percentage-calculator",
    "salary-to-hourly-calculator",
];

fn entry(page: &str, order: u32, question: &str, answer: &str) -> FaqEntry {
    FaqEntry {
        id: format!("{page}-{order}"),
        question: question.to_string(),
        answer: answer.to_string(),
        order,
    }
}

fn builtin_fallbacks() -> Vec<(&'static str, Vec<FaqEntry>)> {
    let [k401, wellness, fraction, paint, percentage, salary] = PAGE_IDS;
    vec![
        (
            k401,
            vec![
                entry(
                    k401,
                    1,
                    "How much can I contribute to a 401(k) in 2025?",
                    "Employees can defer up to $23,500. Savers aged 50 or older can contribute up to $31,000 including catch-up contributions.",
                ),
                entry(
                    k401,
                    2,
                    "How does an employer match work?",
                    "Your employer contributes a percentage of what you put in, up to a share of your salary. A 50% match on the first 6% means contributing 6% earns an extra 3% of salary.",
                ),
                entry(
                    k401,
                    3,
                    "What does purchasing power mean here?",
                    "It is the projected balance expressed in today's dollars, assuming 3% annual inflation.",
                ),
            ],
        ),
        (
            wellness,
            vec![
                entry(
                    wellness,
                    1,
                    "How is the wellness score calculated?",
                    "The score starts at 100 and loses points for recreational time above the guideline, heavy social media use, frequent pickups and late-night screen use. Educational and productive time earns a small bonus.",
                ),
                entry(
                    wellness,
                    2,
                    "How much recreational screen time is recommended?",
                    "About one hour a day for children and two hours for teens and adults.",
                ),
            ],
        ),
        (
            fraction,
            vec![
                entry(
                    fraction,
                    1,
                    "How do you add fractions with different denominators?",
                    "Rewrite both fractions over the least common denominator, add the numerators, then simplify.",
                ),
                entry(
                    fraction,
                    2,
                    "How do you divide fractions?",
                    "Multiply the first fraction by the reciprocal of the second. Dividing by zero is undefined.",
                ),
            ],
        ),
        (
            paint,
            vec![
                entry(
                    paint,
                    1,
                    "How much area does a gallon of paint cover?",
                    "Roughly 400 square feet on smooth walls, dropping to about 250 square feet on rough surfaces.",
                ),
                entry(
                    paint,
                    2,
                    "Do I need two coats?",
                    "Two coats give even color in most rooms, especially over a darker color or fresh drywall.",
                ),
            ],
        ),
        (
            percentage,
            vec![
                entry(
                    percentage,
                    1,
                    "How do I calculate a percentage change?",
                    "Subtract the original value from the new value, divide by the original value, and multiply by 100.",
                ),
                entry(
                    percentage,
                    2,
                    "Why doesn't a 20% increase followed by a 20% decrease return the original value?",
                    "The decrease applies to the larger, increased value. 100 becomes 120, and 20% off 120 is 96.",
                ),
            ],
        ),
        (
            salary,
            vec![
                entry(
                    salary,
                    1,
                    "How do I convert an annual salary to an hourly wage?",
                    "Divide the salary by the hours worked in a year. At 40 hours a week for 52 weeks that is 2,080 hours.",
                ),
                entry(
                    salary,
                    2,
                    "What is the difference between marginal and effective tax rate?",
                    "The marginal rate applies to your last dollar of income. The effective rate is total tax divided by total income.",
                ),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with(provider: Box<dyn FaqProvider>) -> FaqCatalog {
        FaqCatalog::new(provider).with_fallback(
            "percentage-calculator",
            vec![
                entry("percentage-calculator", 2, "Second?", "Two."),
                entry("percentage-calculator", 1, "First?", "One."),
            ],
        )
    }

    #[test]
    fn provider_failure_serves_sorted_fallback() {
        let catalog = catalog_with(Box::new(UnavailableFaqProvider));
        let faqs = catalog.resolve("percentage-calculator");
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].question, "First?");
        assert_eq!(faqs[1].order, 2);
    }

    #[test]
    fn empty_provider_result_serves_fallback() {
        let catalog = catalog_with(Box::new(StaticFaqProvider::default()));
        assert_eq!(catalog.resolve("percentage-calculator").len(), 2);
        assert!(catalog.resolve("unknown-page").is_empty());
    }

    #[test]
    fn provider_entries_win_and_are_sorted() {
        let json = r#"{
          "percentage-calculator": [
            {"id": "b", "question": "Later?", "answer": "Yes.", "order": 9},
            {"id": "a", "question": "Sooner?", "answer": "Yes.", "order": 3}
          ]
        }"#;
        let provider = StaticFaqProvider::from_json(json).expect("valid json");
        let catalog = catalog_with(Box::new(provider));
        let faqs = catalog.resolve("percentage-calculator");
        assert_eq!(
            faqs.iter().map(|f| f.id.as_str()).collect::<Vec<_>>(),
            ["a", "b"]
        );
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = StaticFaqProvider::from_json("{not json").expect_err("invalid json");
        assert!(matches!(err, FaqError::Json(_)));
    }

    #[test]
    fn builtin_fallbacks_cover_every_page() {
        let catalog = FaqCatalog::with_builtin_fallbacks(Box::new(UnavailableFaqProvider));
        for page in PAGE_IDS {
            let faqs = catalog.resolve(page);
            assert!(!faqs.is_empty(), "no fallback for {page}");
            assert!(faqs.windows(2).all(|w| w[0].order <= w[1].order));
            assert!(faqs.iter().all(|f| f.id.starts_with(page)));
        }
    }
}
