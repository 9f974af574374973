use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on the number of tokens an [`IngredientList`] may hold.
pub const MAX_INGREDIENTS: usize = 50;

/// Traffic-light rating derived from ingredient count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "green")]
    Low,
    #[serde(rename = "amber")]
    Medium,
    #[serde(rename = "red")]
    High,
}

impl Rating {
    #[must_use]
    pub fn from_count(count: usize) -> Self {
        crate::ingest::compute_rating(count)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "green",
            Self::Medium => "amber",
            Self::High => "red",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Rating {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "green" | "low" => Ok(Self::Low),
            "amber" | "medium" => Ok(Self::Medium),
            "red" | "high" => Ok(Self::High),
            _ => Err(crate::Error::InvalidRating(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Certification {
    #[serde(rename = "Organic")]
    Organic,
    #[serde(rename = "Non-GMO")]
    NonGmo,
    #[serde(rename = "USDA Organic")]
    UsdaOrganic,
}

impl Certification {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Organic => "Organic",
            Self::NonGmo => "Non-GMO",
            Self::UsdaOrganic => "USDA Organic",
        }
    }
}

impl std::fmt::Display for Certification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Certification {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Organic" => Ok(Self::Organic),
            "Non-GMO" => Ok(Self::NonGmo),
            "USDA Organic" => Ok(Self::UsdaOrganic),
            _ => Err(crate::Error::InvalidCertification(s.to_string())),
        }
    }
}

/// Ordered, duplicate-free certification labels.
///
/// `UsdaOrganic` subsumes `Organic`: the two never coexist in one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Certification>", into = "Vec<Certification>")]
pub struct CertificationSet {
    labels: Vec<Certification>,
}

impl CertificationSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the set changed.
    pub fn insert(&mut self, cert: Certification) -> bool {
        if self.contains(cert) {
            return false;
        }

        match cert {
            Certification::Organic if self.contains(Certification::UsdaOrganic) => false,
            Certification::UsdaOrganic => {
                self.labels.retain(|c| *c != Certification::Organic);
                self.labels.push(cert);
                true
            }
            _ => {
                self.labels.push(cert);
                true
            }
        }
    }

    #[must_use]
    pub fn contains(&self, cert: Certification) -> bool {
        self.labels.contains(&cert)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Certification> {
        self.labels.iter()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.labels.iter().map(Certification::label).collect()
    }

    pub fn as_slice(&self) -> &[Certification] {
        &self.labels
    }
}

impl From<Vec<Certification>> for CertificationSet {
    fn from(certs: Vec<Certification>) -> Self {
        certs.into_iter().collect()
    }
}

impl From<CertificationSet> for Vec<Certification> {
    fn from(set: CertificationSet) -> Self {
        set.labels
    }
}

impl FromIterator<Certification> for CertificationSet {
    fn from_iter<I: IntoIterator<Item = Certification>>(iter: I) -> Self {
        let mut set = Self::new();
        for cert in iter {
            set.insert(cert);
        }
        set
    }
}

impl<'a> IntoIterator for &'a CertificationSet {
    type Item = &'a Certification;
    type IntoIter = std::slice::Iter<'a, Certification>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

/// Ingredient tokens in extraction order.
///
/// Tokens are trimmed and never empty; at most [`MAX_INGREDIENTS`] are kept.
/// Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct IngredientList {
    tokens: Vec<String>,
}

impl IngredientList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims each token, drops blanks and keeps the first [`MAX_INGREDIENTS`].
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .filter_map(|t| {
                let t = t.as_ref().trim();
                (!t.is_empty()).then(|| t.to_string())
            })
            .take(MAX_INGREDIENTS)
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn rating(&self) -> Rating {
        Rating::from_count(self.len())
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.tokens
    }
}

impl From<Vec<String>> for IngredientList {
    fn from(tokens: Vec<String>) -> Self {
        Self::from_tokens(tokens)
    }
}

impl From<IngredientList> for Vec<String> {
    fn from(list: IngredientList) -> Self {
        list.tokens
    }
}

impl<'a> IntoIterator for &'a IngredientList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    Barcode,
    Ocr,
    Text,
}

impl ScanType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Barcode => "barcode",
            Self::Ocr => "ocr",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The analysed product handed to whatever stores scan history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub ingredients: IngredientList,
    pub ingredient_count: usize,
    pub rating: Rating,
    #[serde(default)]
    pub certifications: CertificationSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub scan_type: ScanType,
    pub created_at: DateTime<Utc>,
}

impl ProductInfo {
    /// Count and rating are derived from `ingredients`.
    #[must_use]
    pub fn new(name: String, scan_type: ScanType, ingredients: IngredientList) -> Self {
        Self {
            id: Uuid::new_v4(),
            barcode: None,
            name,
            brand: None,
            ingredient_count: ingredients.len(),
            rating: ingredients.rating(),
            ingredients,
            certifications: CertificationSet::new(),
            image_url: None,
            scan_type,
            created_at: Utc::now(),
        }
    }

    /// Placeholder returned when no OCR engine can run.
    #[must_use]
    pub fn service_unavailable() -> Self {
        Self::new(
            "OCR Service Unavailable".to_string(),
            ScanType::Ocr,
            IngredientList::new(),
        )
    }

    #[must_use]
    pub fn with_barcode(mut self, barcode: String) -> Self {
        self.barcode = Some(barcode);
        self
    }

    #[must_use]
    pub fn with_brand(mut self, brand: Option<String>) -> Self {
        self.brand = brand;
        self
    }

    #[must_use]
    pub fn with_certifications(mut self, certifications: CertificationSet) -> Self {
        self.certifications = certifications;
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }
}
