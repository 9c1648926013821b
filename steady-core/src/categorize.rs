//! Keyword-count category suggestion.
//!
//! Title and description are lowercased and scanned for each category's
//! keywords as plain substrings ("eat" matches inside "heat"). The category
//! with the strictly highest hit count wins.

use serde::{Deserialize, Serialize};

use crate::keywords::category_keywords;
use crate::task::TaskCategory;

/// Hits needed for full confidence.
const FULL_CONFIDENCE_HITS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: TaskCategory,
    pub confidence: f64,
}

pub(crate) fn scoring_text(title: &str, description: Option<&str>) -> String {
    format!("{} {}", title, description.unwrap_or("")).to_lowercase()
}

fn keyword_hits(text: &str, category: TaskCategory) -> usize {
    category_keywords(category)
        .iter()
        .filter(|kw| text.contains(*kw))
        .count()
}

fn confidence_for(hits: usize) -> f64 {
    if hits == 0 {
        0.0
    } else {
        (hits as f64 / FULL_CONFIDENCE_HITS).min(1.0)
    }
}

/// Suggest a category for a task.
pub fn categorize(title: &str, description: Option<&str>) -> CategoryResult {
    let text = scoring_text(title, description);

    let mut best = TaskCategory::Other;
    let mut max_hits = 0usize;
    for category in TaskCategory::ALL {
        let hits = keyword_hits(&text, category);
        if hits > max_hits {
            max_hits = hits;
            best = category;
        }
    }

    CategoryResult {
        category: if max_hits > 0 { best } else { TaskCategory::Other },
        confidence: confidence_for(max_hits),
    }
}

/// Up to three categories with any keyword hits, most confident first.
/// Equal confidences keep scoring order.
pub fn suggest_categories(title: &str, description: Option<&str>) -> Vec<CategoryResult> {
    let text = scoring_text(title, description);

    let mut out: Vec<CategoryResult> = TaskCategory::ALL
        .into_iter()
        .map(|category| CategoryResult {
            category,
            confidence: confidence_for(keyword_hits(&text, category)),
        })
        .filter(|r| r.confidence > 0.0)
        .collect();

    out.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    out.truncate(3);
    out
}
