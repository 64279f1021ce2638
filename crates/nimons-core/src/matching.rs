//! Name-based assembly matching.
//!
//! Distinct from order validation in [`crate::recipe`]: this path only looks
//! at display names, so two foods always combine into *something*.

use crate::id::ItemIds;
use crate::item::{Dish, Food};

/// A named combination: every keyword must appear somewhere across the two
/// names (case-insensitive).
struct Combination {
    keywords: &'static [&'static str],
    result: &'static str,
}

/// Checked in order; the first full keyword match wins.
const COMBINATIONS: &[Combination] = &[
    Combination {
        keywords: &["sushi base", "cucumber", "chopped"],
        result: "Kappa Maki",
    },
    Combination {
        keywords: &["sushi base", "fish", "chopped"],
        result: "Sake Maki",
    },
    Combination {
        keywords: &["sushi base", "shrimp", "cooked"],
        result: "Ebi Maki",
    },
    Combination {
        keywords: &["nori", "rice", "cooked"],
        result: "Sushi Base",
    },
    Combination {
        keywords: &["rice", "cooked", "fish", "chopped"],
        result: "Sake Nigiri",
    },
    Combination {
        keywords: &["rice", "cooked", "shrimp"],
        result: "Ebi Nigiri",
    },
];

/// The named dish two foods combine into, if any.
pub fn combined_name(a: &str, b: &str) -> Option<&'static str> {
    let haystack = format!("{} {}", a.to_lowercase(), b.to_lowercase());
    COMBINATIONS
        .iter()
        .find(|combo| combo.keywords.iter().all(|kw| haystack.contains(kw)))
        .map(|combo| combo.result)
}

/// Combine two foods into one dish. Never fails: without a named match the
/// dish is called `"<a> + <b>"`.
pub fn assemble(a: Food, b: Food, ids: &mut ItemIds) -> Dish {
    let (name_a, name_b) = (a.name(), b.name());
    let name = combined_name(&name_a, &name_b)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{name_a} + {name_b}"));

    let mut components = a.into_components();
    components.extend(b.into_components());
    Dish::new(name, components, ids)
}
