//! Turns raw catalog records into the shapes the screens render.

use crate::catalog::RawMeal;
use crate::model::{Difficulty, Ingredient, Recipe, RecipeDetail};

/// The catalog exposes at most 20 numbered ingredient columns.
pub const MAX_INGREDIENT_SLOTS: usize = 20;

const DESCRIPTION_LIMIT: usize = 100;
const FALLBACK_DESCRIPTION: &str = "Délicieuse recette italienne";

/// Fallback label for categories outside the table.
pub const FALLBACK_CATEGORY: &str = "Autre";

// Ordered: the reverse lookup takes the first entry carrying a label,
// so "Viandes" resolves to Beef.
const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("Pasta", "Pâtes"),
    ("Dessert", "Desserts"),
    ("Side", "Accompagnements"),
    ("Starter", "Entrées"),
    ("Breakfast", "Petit-déjeuner"),
    ("Beef", "Viandes"),
    ("Chicken", "Viandes"),
    ("Lamb", "Viandes"),
    ("Pork", "Viandes"),
    ("Goat", "Viandes"),
    ("Seafood", "Poissons"),
    ("Vegetarian", "Végétarien"),
    ("Vegan", "Végétarien"),
    ("Miscellaneous", "Autre"),
];

/// Localized label for a source category, `"Autre"` when unmapped.
pub fn localized_category(source: &str) -> &'static str {
    CATEGORY_LABELS
        .iter()
        .find(|(src, _)| *src == source)
        .map(|(_, label)| *label)
        .unwrap_or(FALLBACK_CATEGORY)
}

/// First source category carrying the given localized label.
pub fn source_category(label: &str) -> Option<&'static str> {
    CATEGORY_LABELS
        .iter()
        .find(|(_, l)| *l == label)
        .map(|(src, _)| *src)
}

/// Collects the non-blank numbered ingredient columns in slot order,
/// each paired with its (possibly blank) measure.
pub fn ingredients(raw: &RawMeal) -> Vec<Ingredient> {
    (1..=MAX_INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let ingredient = raw.ingredient(slot)?.trim();
            if ingredient.is_empty() {
                return None;
            }
            Some(Ingredient {
                ingredient: ingredient.to_string(),
                measure: raw.measure(slot).unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}

/// Splits an instructions blob into trimmed, non-empty steps.
pub fn instruction_steps(instructions: &str) -> Vec<String> {
    instructions
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Heuristic minutes estimate; the catalog has no real prep-time field.
pub fn preparation_time(ingredient_count: usize, step_count: usize) -> u32 {
    (ingredient_count * 5 + step_count * 3).clamp(15, 120) as u32
}

pub fn difficulty(preparation_time: u32) -> Difficulty {
    if preparation_time < 30 {
        Difficulty::Facile
    } else if preparation_time < 60 {
        Difficulty::Moyen
    } else {
        Difficulty::Difficile
    }
}

fn summary_description(instructions: Option<&str>) -> String {
    match instructions {
        Some(text) if !text.trim().is_empty() => {
            let end = text
                .char_indices()
                .nth(DESCRIPTION_LIMIT)
                .map(|(index, _)| index)
                .unwrap_or(text.len());
            format!("{}...", &text[..end])
        }
        _ => FALLBACK_DESCRIPTION.to_string(),
    }
}

/// List-view [`Recipe`] from one raw record.
pub fn summarize(raw: &RawMeal) -> Recipe {
    let ingredient_count = ingredients(raw).len();
    // a missing instructions blob counts as a single step
    let step_count = raw
        .instructions
        .as_deref()
        .map(|text| instruction_steps(text).len())
        .unwrap_or(1);

    let prep = preparation_time(ingredient_count, step_count);

    Recipe {
        id: raw.id.clone(),
        name: raw.name.clone(),
        image: raw.thumbnail.clone().unwrap_or_default(),
        description: summary_description(raw.instructions.as_deref()),
        preparation_time: prep,
        difficulty: difficulty(prep),
        category: localized_category(raw.category.as_deref().unwrap_or_default()).to_string(),
    }
}

/// Detail-view [`RecipeDetail`] from one raw record.
pub fn detail(raw: &RawMeal) -> RecipeDetail {
    RecipeDetail {
        id: raw.id.clone(),
        name: raw.name.clone(),
        category: raw.category.clone().unwrap_or_default(),
        area: raw.area.clone().unwrap_or_default(),
        instructions: raw
            .instructions
            .as_deref()
            .map(instruction_steps)
            .unwrap_or_default(),
        ingredients: ingredients(raw),
        image: raw.thumbnail.clone().unwrap_or_default(),
        video: raw.youtube.clone().filter(|url| !url.is_empty()),
    }
}
