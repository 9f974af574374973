use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::product::IngredientList;
use crate::text::RawText;

static DEFAULT_EXTRACTOR: LazyLock<IngredientExtractor> =
    LazyLock::new(IngredientExtractor::with_default_patterns);

static PAREN_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("paren span pattern is valid"));

static BRACKET_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()\[\]{}]").expect("bracket pattern is valid"));

static PAREN_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("paren group pattern is valid"));

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;]").expect("separator pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Spanish,
    French,
}

impl Language {
    /// Header patterns are tried in this order.
    pub const PRIORITY: [Self; 3] = [Self::English, Self::Spanish, Self::French];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Spanish => "spanish",
            Self::French => "french",
        }
    }

    /// Singular header keyword; an optional plural `s` is always accepted.
    #[must_use]
    pub fn header_keyword(&self) -> &'static str {
        match self {
            Self::English => "ingredient",
            Self::Spanish => "ingrediente",
            Self::French => "ingrédient",
        }
    }

    /// Keywords that end an ingredient section early.
    #[must_use]
    pub fn stop_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::English => &["allergen", "nutrition", "contains"],
            Self::Spanish => &["alérgeno", "nutrición", "contiene"],
            Self::French => &["allergène", "nutrition", "contient"],
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the ingredient section was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "language")]
pub enum ExtractionStrategy {
    Header(Language),
    LongestLine,
}

pub struct HeaderPattern {
    pub language: Language,
    pub regex: Regex,
}

impl HeaderPattern {
    /// Matches the header keyword, then `:` or whitespace, and lazily captures
    /// up to the first newline, end of text or stop keyword.
    pub fn new(language: Language) -> Result<Self, regex::Error> {
        let stops: Vec<String> = language
            .stop_keywords()
            .iter()
            .map(|k| regex::escape(k))
            .collect();

        let pattern = format!(
            r"(?s){}s?[:\s]+(.*?)(?:\n|$|{})",
            regex::escape(language.header_keyword()),
            stops.join("|"),
        );

        Ok(Self {
            language,
            regex: Regex::new(&pattern)?,
        })
    }

    /// Captured section text, which may be empty.
    pub fn capture<'t>(&self, lowered: &'t str) -> Option<&'t str> {
        self.regex
            .captures(lowered)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Pulls an ingredient list out of unstructured label text.
pub struct IngredientExtractor {
    patterns: Vec<HeaderPattern>,
}

impl IngredientExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: HeaderPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn with_default_patterns() -> Self {
        let mut extractor = Self::new();

        for language in Language::PRIORITY {
            match HeaderPattern::new(language) {
                Ok(p) => extractor.patterns.push(p),
                Err(e) => tracing::warn!("Skipping {} header pattern: {}", language, e),
            }
        }

        extractor
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.patterns.iter().map(|p| p.language)
    }

    pub fn extract(&self, text: &RawText) -> IngredientList {
        self.extract_with_strategy(text).0
    }

    pub fn extract_with_strategy(&self, text: &RawText) -> (IngredientList, ExtractionStrategy) {
        let lowered = text.lowercased();
        let (section, strategy) = self.locate_section(&lowered);

        tracing::debug!(?strategy, section_len = section.len(), "Located ingredient section");

        let stripped = strip_brackets(section);
        let primary = split_tokens(&stripped);
        let nested = sub_ingredients(&lowered);

        (IngredientList::from_tokens(primary.chain(nested)), strategy)
    }

    fn locate_section<'t>(&self, lowered: &'t str) -> (&'t str, ExtractionStrategy) {
        for pattern in &self.patterns {
            if let Some(section) = pattern.capture(lowered) {
                return (section, ExtractionStrategy::Header(pattern.language));
            }
        }

        (longest_line(lowered), ExtractionStrategy::LongestLine)
    }
}

impl Default for IngredientExtractor {
    fn default() -> Self {
        Self::with_default_patterns()
    }
}

/// First line with the most characters; ties go to the earliest line.
fn longest_line(text: &str) -> &str {
    text.split('\n')
        .fold(("", 0), |(best, best_len), line| {
            let len = line.chars().count();
            if len > best_len {
                (line, len)
            } else {
                (best, best_len)
            }
        })
        .0
}

/// Drops `(...)` groups with their contents, since those come back later as
/// sub-ingredients, then strips every remaining bracket character.
fn strip_brackets(section: &str) -> String {
    let without_groups = PAREN_SPAN.replace_all(section, "");
    BRACKET_CHAR.replace_all(&without_groups, "").into_owned()
}

fn split_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// Every `(...)` group in the whole text, in document order.
fn sub_ingredients(lowered: &str) -> Vec<String> {
    PAREN_GROUP
        .captures_iter(lowered)
        .filter_map(|caps| caps.get(1))
        .flat_map(|group| split_tokens(group.as_str()).collect::<Vec<_>>())
        .collect()
}

/// Splits a catalog-supplied ingredients string on `,`/`;` without any
/// header search.
pub fn split_ingredient_text(text: &str) -> IngredientList {
    IngredientList::from_tokens(split_tokens(text))
}

/// Extracts ingredients with the default English, Spanish and French patterns.
pub fn extract_ingredients(text: &str) -> IngredientList {
    DEFAULT_EXTRACTOR.extract(&RawText::from(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Rating, MAX_INGREDIENTS};

    fn extract(text: &str) -> Vec<String> {
        extract_ingredients(text).into_vec()
    }

    #[test]
    fn test_empty_text() {
        assert!(extract("").is_empty());
        assert!(extract("   \n \t").is_empty());
        assert_eq!(extract_ingredients("").rating(), Rating::Low);
    }

    #[test]
    fn test_english_header() {
        assert_eq!(
            extract("Ingredients: Water, Sugar, Salt"),
            vec!["water", "sugar", "salt"]
        );
    }

    #[test]
    fn test_sub_ingredients_appended_after_primary() {
        assert_eq!(
            extract("Ingredients: Water, Oil (Palm, Sunflower), Salt"),
            vec!["water", "oil", "salt", "palm", "sunflower"]
        );
    }

    #[test]
    fn test_singular_header_and_whitespace_separator() {
        assert_eq!(extract("INGREDIENT flour; yeast"), vec!["flour", "yeast"]);
    }

    #[test]
    fn test_section_stops_at_newline() {
        assert_eq!(
            extract("Ingredients: oats, honey\nBest before 2025"),
            vec!["oats", "honey"]
        );
    }

    #[test]
    fn test_section_stops_at_english_keywords() {
        assert_eq!(
            extract("Ingredients: milk, cocoa Contains: soy"),
            vec!["milk", "cocoa"]
        );
        assert_eq!(
            extract("ingredients: rice, salt nutrition facts per 100g"),
            vec!["rice", "salt"]
        );
        assert_eq!(
            extract("ingredients: peanuts allergen info"),
            vec!["peanuts"]
        );
    }

    #[test]
    fn test_spanish_header() {
        let (list, strategy) = IngredientExtractor::default()
            .extract_with_strategy(&RawText::new("Ingredientes: Agua, Azúcar contiene gluten"));

        assert_eq!(list.as_slice(), ["agua", "azúcar"]);
        assert_eq!(strategy, ExtractionStrategy::Header(Language::Spanish));
    }

    #[test]
    fn test_french_header() {
        let (list, strategy) = IngredientExtractor::default()
            .extract_with_strategy(&RawText::new("Ingrédients : Farine, Beurre, Sel. Contient: lait"));

        assert_eq!(list.as_slice(), ["farine", "beurre", "sel."]);
        assert_eq!(strategy, ExtractionStrategy::Header(Language::French));
    }

    #[test]
    fn test_english_wins_over_later_languages() {
        let (list, strategy) = IngredientExtractor::default().extract_with_strategy(
            &RawText::new("Ingrédients: sucre\nIngredients: sugar, cocoa"),
        );

        assert_eq!(strategy, ExtractionStrategy::Header(Language::English));
        assert_eq!(list.as_slice(), ["sugar", "cocoa"]);
    }

    #[test]
    fn test_fallback_to_longest_line() {
        let (list, strategy) = IngredientExtractor::default()
            .extract_with_strategy(&RawText::new("Net wt 500g\nflour, water, yeast, salt\nBake"));

        assert_eq!(strategy, ExtractionStrategy::LongestLine);
        assert_eq!(list.as_slice(), ["flour", "water", "yeast", "salt"]);
    }

    #[test]
    fn test_longest_line_prefers_first_on_tie() {
        assert_eq!(longest_line("ab\ncd"), "ab");
        assert_eq!(longest_line(""), "");
    }

    #[test]
    fn test_empty_capture_still_collects_sub_ingredients() {
        assert_eq!(
            extract("Per serving (fat, salt)\ningredients: contains nuts"),
            vec!["fat", "salt"]
        );
    }

    #[test]
    fn test_sub_ingredients_from_anywhere_in_text() {
        assert_eq!(
            extract("Ingredients: tea, lemon\nEnergy (kcal; kj)"),
            vec!["tea", "lemon", "kcal", "kj"]
        );
    }

    #[test]
    fn test_square_and_curly_brackets_stripped_keep_contents() {
        assert_eq!(
            extract("Ingredients: beans [organic], rice {brown}, salt)"),
            vec!["beans organic", "rice brown", "salt"]
        );
        assert_eq!(
            extract("Ingredients: beans [organic], acid {e330}, salt"),
            vec!["beans organic", "acid e330", "salt"]
        );
    }

    #[test]
    fn test_every_stop_keyword_ends_section() {
        let headers = [
            (Language::English, "Ingredients:"),
            (Language::Spanish, "Ingredientes:"),
            (Language::French, "Ingrédients :"),
        ];

        for (language, header) in headers {
            for stop in language.stop_keywords() {
                let text = format!("{header} eau, sel {stop}: lait");
                let (list, strategy) =
                    IngredientExtractor::default().extract_with_strategy(&RawText::new(text));

                assert_eq!(strategy, ExtractionStrategy::Header(language), "{language} {stop}");
                assert_eq!(list.as_slice(), ["eau", "sel"], "{language} {stop}");
            }
        }
    }

    #[test]
    fn test_accented_stop_keywords_in_upper_case() {
        assert_eq!(extract("Ingredientes: agua, sal ALÉRGENO: leche"), vec!["agua", "sal"]);
        assert_eq!(extract("Ingredientes: agua, sal NUTRICIÓN"), vec!["agua", "sal"]);
        assert_eq!(extract("Ingrédients: eau, sel ALLERGÈNE: lait"), vec!["eau", "sel"]);
    }

    #[test]
    fn test_longest_line_many_short_lines_after_long_one() {
        let long = "x".repeat(200_000);
        let text = format!("{long}\n{}", "ab\n".repeat(20_000));

        assert_eq!(longest_line(&text).len(), 200_000);
        assert_eq!(longest_line("é\nab"), "ab");
    }

    #[test]
    fn test_duplicates_are_kept() {
        assert_eq!(
            extract("Ingredients: salt, salt (salt)"),
            vec!["salt", "salt", "salt"]
        );
    }

    #[test]
    fn test_truncates_to_cap_in_order() {
        let items: Vec<String> = (0..60).map(|i| format!("item{i}")).collect();
        let text = format!("Ingredients: {}", items.join(", "));

        let list = extract(&text);

        assert_eq!(list.len(), MAX_INGREDIENTS);
        assert_eq!(list, items[..50].to_vec());
    }

    #[test]
    fn test_truncation_counts_sub_ingredients() {
        let items: Vec<String> = (0..48).map(|i| format!("i{i}")).collect();
        let text = format!("Ingredients: {}\n(a, b, c, d)", items.join(", "));

        let list = extract(&text);

        assert_eq!(list.len(), 50);
        assert_eq!(list[48], "a");
        assert_eq!(list[49], "b");
    }

    #[test]
    fn test_idempotent() {
        let text = "Ingredients: Water, Oil (Palm, Sunflower), Salt";
        assert_eq!(extract(text), extract(text));
    }

    #[test]
    fn test_split_ingredient_text_keeps_case() {
        let list = split_ingredient_text("Sugar, Palm Oil; Hazelnuts 13%, , ");
        assert_eq!(list.as_slice(), ["Sugar", "Palm Oil", "Hazelnuts 13%"]);
    }

    #[test]
    fn test_custom_pattern_list() {
        let extractor = IngredientExtractor::new()
            .with_pattern(HeaderPattern::new(Language::French).unwrap());

        assert_eq!(extractor.languages().collect::<Vec<_>>(), vec![Language::French]);

        let (_, strategy) =
            extractor.extract_with_strategy(&RawText::new("Ingredients: water, salt"));
        assert_eq!(strategy, ExtractionStrategy::LongestLine);
    }
}
