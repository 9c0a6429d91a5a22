//! Business-relevant place categories.

use std::collections::BTreeSet;

use serde::Deserialize;

const BUILTIN_CATEGORIES: &str = include_str!("../data/categories.toml");

#[derive(Debug, Deserialize)]
struct CategoriesFile {
    categories: Vec<String>,
}

/// The set of category tags counted by trend reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    categories: BTreeSet<String>,
}

impl AllowList {
    /// Returns the embedded allow-list.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (it ships with the crate and
    /// is covered by tests).
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_CATEGORIES)
            .unwrap_or_else(|e| panic!("Embedded category allow-list is invalid: {e}"))
    }

    /// Parses an allow-list from TOML of the form `categories = [...]`.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the document is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let file: CategoriesFile = toml::de::from_str(text)?;
        Ok(file.categories.iter().map(String::as_str).collect())
    }

    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for AllowList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            categories: iter
                .into_iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_all_categories() {
        let list = AllowList::builtin();
        assert_eq!(list.len(), 32);
        for category in ["restaurant", "cafe", "pharmacy", "gym", "bakery", "veterinary_care"] {
            assert!(list.contains(category), "missing {category}");
        }
    }

    #[test]
    fn generic_tags_are_excluded() {
        let list = AllowList::builtin();
        assert!(!list.contains("establishment"));
        assert!(!list.contains("point_of_interest"));
        assert!(!list.contains("food"));
    }

    #[test]
    fn custom_list() {
        let list = AllowList::from_toml_str(r#"categories = ["Cafe", " "]"#).unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.contains("cafe"));
    }
}
