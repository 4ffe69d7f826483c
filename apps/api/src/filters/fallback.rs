//! Fixed filters used when no model output could be validated.

use crate::filters::model::{FilterDefinition, FilterSet};

pub const FALLBACK_FREE_TEXT_KEY: &str = "fallback_free_text";

/// The fallback set: a free-text filter first, then detail level and
/// interest areas.
pub fn fallback_filter_set() -> FilterSet {
    FilterSet::new(vec![
        FilterDefinition::free_text(FALLBACK_FREE_TEXT_KEY, "Describe your requirements:"),
        FilterDefinition::single_choice(
            "fallback_detail_level",
            "What level of detail do you require?",
            &["Basic", "Intermediate", "Advanced"],
        ),
        FilterDefinition::multi_choice(
            "fallback_interest_areas",
            "Which areas are you most interested in?",
            &["Design", "Functionality", "Performance", "Usability"],
        ),
    ])
}
