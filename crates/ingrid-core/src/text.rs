use serde::{Deserialize, Serialize};

/// Unstructured label text as it came out of OCR or a catalog field.
///
/// The original casing is kept; every matcher works on [`RawText::lowercased`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawText(String);

impl RawText {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Joins recognized OCR fragments with single spaces.
    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for fragment in fragments {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(fragment.as_ref());
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn lowercased(&self) -> String {
        self.0.to_lowercase()
    }
}

impl From<&str> for RawText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for RawText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl AsRef<str> for RawText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fragments_joins_with_space() {
        let text = RawText::from_fragments(["Ingredients:", "Water,", "Salt"]);
        assert_eq!(text.as_str(), "Ingredients: Water, Salt");
    }

    #[test]
    fn test_from_no_fragments_is_empty() {
        let text = RawText::from_fragments(Vec::<String>::new());
        assert!(text.is_blank());
        assert_eq!(text.as_str(), "");
    }

    #[test]
    fn test_lowercased_keeps_original() {
        let text = RawText::new("Ingrédients: SUCRE");
        assert_eq!(text.lowercased(), "ingrédients: sucre");
        assert_eq!(text.as_str(), "Ingrédients: SUCRE");
    }

    #[test]
    fn test_blank_detection() {
        assert!(RawText::new("  \n\t ").is_blank());
        assert!(!RawText::new(" salt ").is_blank());
    }
}
