pub mod config;
pub mod mood;
pub mod prompt;

use moodring_core::Category;

/// Categories from repeated `--category` flags, or all of them.
pub fn categories_or_all(categories: Vec<Category>) -> Vec<Category> {
    if categories.is_empty() {
        Category::ALL.to_vec()
    } else {
        let mut unique = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        unique
    }
}
