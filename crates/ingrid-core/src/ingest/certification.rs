use std::sync::LazyLock;

use crate::product::{Certification, CertificationSet};

static DEFAULT_DETECTOR: LazyLock<CertificationDetector> =
    LazyLock::new(CertificationDetector::default);

/// Keywords whose presence (as a plain substring) implies a certification.
#[derive(Debug, Clone)]
pub struct KeywordFamily {
    pub certification: Certification,
    pub keywords: Vec<String>,
}

impl KeywordFamily {
    pub fn new<I, S>(certification: Certification, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            certification,
            keywords: keywords
                .into_iter()
                .map(|k| Into::<String>::into(k).to_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn organic() -> Self {
        Self::new(
            Certification::Organic,
            ["organic", "bio", "orgánico", "biologique", "usda organic"],
        )
    }

    #[must_use]
    pub fn non_gmo() -> Self {
        Self::new(
            Certification::NonGmo,
            ["non-gmo", "non gmo", "without gmo", "gmo free", "sin ogm"],
        )
    }

    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Text-only certification detection; families are checked in order and
/// each contributes its label at most once.
#[derive(Debug, Clone)]
pub struct CertificationDetector {
    families: Vec<KeywordFamily>,
}

impl CertificationDetector {
    #[must_use]
    pub fn new(families: Vec<KeywordFamily>) -> Self {
        Self { families }
    }

    pub fn detect(&self, text: &str) -> CertificationSet {
        let lowered = text.to_lowercase();

        self.families
            .iter()
            .filter(|family| family.matches(&lowered))
            .map(|family| family.certification)
            .collect()
    }
}

impl Default for CertificationDetector {
    fn default() -> Self {
        Self::new(vec![KeywordFamily::organic(), KeywordFamily::non_gmo()])
    }
}

pub fn detect_certifications(text: &str) -> CertificationSet {
    DEFAULT_DETECTOR.detect(text)
}
