use std::collections::HashSet;

use thiserror::Error;

use super::Language;

pub const MAX_GRID_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("difficulty catalog is empty")]
    Empty,
    #[error("difficulty `{0}` is declared more than once")]
    DuplicateId(String),
    #[error("difficulty `{id}` has grid size {size}, expected 1..={}", MAX_GRID_SIZE)]
    InvalidSize { id: String, size: u32 },
    #[error("difficulty `{id}` declares {total} tiles for a {size}x{size} grid")]
    TotalMismatch { id: String, size: u32, total: u32 },
    #[error("default difficulty `{0}` is not in the catalog")]
    UnknownDefault(String),
}

#[readonly::make]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Difficulty {
    pub id: String,
    pub name_ko: String,
    pub name_en: String,
    pub size: u32,
    pub total: u32,
}

impl Difficulty {
    pub fn new(id: &str, name_ko: &str, name_en: &str, size: u32) -> Self {
        Self::declared(id, name_ko, name_en, size, size.saturating_mul(size))
    }

    /// A difficulty whose tile count is stated separately; checked by the catalog.
    pub fn declared(id: &str, name_ko: &str, name_en: &str, size: u32, total: u32) -> Self {
        Self {
            id: id.to_string(),
            name_ko: name_ko.to_string(),
            name_en: name_en.to_string(),
            size,
            total,
        }
    }

    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::Ko => &self.name_ko,
            Language::En => &self.name_en,
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.size == 0 || self.size > MAX_GRID_SIZE {
            return Err(CatalogError::InvalidSize {
                id: self.id.clone(),
                size: self.size,
            });
        }
        if self.total != self.size * self.size {
            return Err(CatalogError::TotalMismatch {
                id: self.id.clone(),
                size: self.size,
                total: self.total,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DifficultyCatalog {
    difficulties: Vec<Difficulty>,
    default_id: String,
}

impl DifficultyCatalog {
    pub fn new(difficulties: Vec<Difficulty>, default_id: &str) -> Result<Self, CatalogError> {
        if difficulties.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for difficulty in &difficulties {
            difficulty.validate()?;
            if !seen.insert(difficulty.id.as_str()) {
                return Err(CatalogError::DuplicateId(difficulty.id.clone()));
            }
        }
        if !seen.contains(default_id) {
            return Err(CatalogError::UnknownDefault(default_id.to_string()));
        }
        Ok(Self {
            difficulties,
            default_id: default_id.to_string(),
        })
    }

    pub const STANDARD_DEFAULT_ID: &'static str = "normal";

    pub fn standard_difficulties() -> Vec<Difficulty> {
        vec![
            Difficulty::new("easy", "LITE", "LITE", 3),
            Difficulty::new("normal", "CLASSIC", "CLASSIC", 5),
            Difficulty::new("hard", "ELITE", "ELITE", 6),
        ]
    }

    /// The built-in catalog without validation; `new` checks the same entries.
    pub fn standard() -> Self {
        Self {
            difficulties: Self::standard_difficulties(),
            default_id: Self::STANDARD_DEFAULT_ID.to_string(),
        }
    }

    pub fn all(&self) -> &[Difficulty] {
        &self.difficulties
    }

    pub fn get(&self, id: &str) -> Option<&Difficulty> {
        self.difficulties.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn default_difficulty(&self) -> &Difficulty {
        self.get(&self.default_id)
            .unwrap_or(&self.difficulties[0])
    }

    pub fn resolve(&self, id: &str) -> &Difficulty {
        self.get(id).unwrap_or_else(|| self.default_difficulty())
    }
}
