use crate::product::Rating;

/// Highest ingredient count still rated green.
pub const LOW_MAX: usize = 4;
/// Highest ingredient count still rated amber.
pub const MEDIUM_MAX: usize = 9;

#[must_use]
pub const fn compute_rating(ingredient_count: usize) -> Rating {
    if ingredient_count <= LOW_MAX {
        Rating::Low
    } else if ingredient_count <= MEDIUM_MAX {
        Rating::Medium
    } else {
        Rating::High
    }
}
