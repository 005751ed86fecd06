//! Severe element catalogs.
//!
//! A catalog is assembled once through a [`CatalogBuilder`] and frozen with
//! [`CatalogBuilder::build`]. The frozen [`SevereCatalog`] has no mutating
//! methods, so it can be shared across threads by reference, and every
//! [`SevereCatalog::lookup`] hands out an owned copy.

use std::collections::HashMap;

use tracing::trace;

use super::{SevereCategory, SevereElement, Severity};
use crate::error::{IngestError, Result};

/// Maximum length of a severe element name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a severe element description, in characters.
pub const MAX_DESC_LEN: usize = 255;

fn check_text<'v>(
    field: &'static str,
    value: Option<&'v str>,
    max: usize,
) -> Result<&'v str> {
    match value {
        Some(v) if v.chars().count() <= max => Ok(v),
        Some(v) => Err(IngestError::InvalidSevereElement {
            field,
            value: format!("{} characters (max {})", v.chars().count(), max),
        }),
        None => Err(IngestError::InvalidSevereElement {
            field,
            value: "<none>".to_string(),
        }),
    }
}

/// Mutable staging area for one category's catalog.
#[derive(Debug)]
pub struct CatalogBuilder {
    category: SevereCategory,
    entries: Vec<SevereElement>,
    index: HashMap<String, usize>,
}

impl CatalogBuilder {
    pub fn new(category: SevereCategory) -> Self {
        Self {
            category,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a catalog entry.
    ///
    /// Fails with [`IngestError::InvalidSevereElement`] when the name or the
    /// description is missing or longer than 255 characters, and with
    /// [`IngestError::DuplicateSevereElement`] when the name is already taken.
    /// Both are configuration errors, never data errors.
    pub fn register<'a>(
        &mut self,
        name: impl Into<Option<&'a str>>,
        severity: Severity,
        description: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self> {
        let name = check_text("name", name.into(), MAX_NAME_LEN)?;
        let description = check_text("description", description.into(), MAX_DESC_LEN)?;

        if self.index.contains_key(name) {
            return Err(IngestError::DuplicateSevereElement {
                category: self.category.label().to_string(),
                name: name.to_string(),
            });
        }
        if !name.starts_with(self.category.prefix()) {
            // Prefixes are a naming convention only.
            trace!(category = %self.category.label(), name = %name, "unprefixed severe element");
        }

        self.index.insert(name.to_string(), self.entries.len());
        self.entries
            .push(SevereElement::new(name, severity, description));
        Ok(self)
    }

    /// Like [`register`](Self::register), with the severity given as its
    /// string code.
    pub fn register_code<'a>(
        &mut self,
        name: impl Into<Option<&'a str>>,
        severity_code: &str,
        description: impl Into<Option<&'a str>>,
    ) -> Result<&mut Self> {
        let severity: Severity = severity_code.parse()?;
        self.register(name, severity, description)
    }

    /// Freeze the catalog.
    pub fn build(self) -> SevereCatalog {
        SevereCatalog {
            category: self.category,
            entries: self.entries,
            index: self.index,
        }
    }
}

/// Read-only catalog of severe elements for one category.
#[derive(Debug)]
pub struct SevereCatalog {
    category: SevereCategory,
    entries: Vec<SevereElement>,
    index: HashMap<String, usize>,
}

impl SevereCatalog {
    pub fn builder(category: SevereCategory) -> CatalogBuilder {
        CatalogBuilder::new(category)
    }

    pub fn category(&self) -> SevereCategory {
        self.category
    }

    /// Owned copy of the entry called `name`.
    ///
    /// Condition codes are constants in calling code, so an absent or unknown
    /// name is a programming error and yields
    /// [`IngestError::UnknownSevereElement`].
    pub fn lookup<'a>(&self, name: impl Into<Option<&'a str>>) -> Result<SevereElement> {
        let name = name.into();
        name.and_then(|n| self.index.get(n))
            .map(|&i| self.entries[i].clone())
            .ok_or_else(|| {
                IngestError::UnknownSevereElement(name.unwrap_or("<none>").to_string())
            })
    }

    /// Membership test; false for `None` and unknown names.
    pub fn is_valid<'a>(&self, name: impl Into<Option<&'a str>>) -> bool {
        name.into().is_some_and(|n| self.index.contains_key(n))
    }

    /// Entry names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Owned copies of every entry, in registration order.
    pub fn snapshot(&self) -> Vec<SevereElement> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest_state::FileId;

    fn sample() -> SevereCatalog {
        let mut b = SevereCatalog::builder(SevereCategory::Limitation);
        b.register("L_ONE", Severity::Note, "first")
            .unwrap()
            .register("L_TWO", Severity::Bit, "second")
            .unwrap();
        b.build()
    }

    #[test]
    fn test_lookup_returns_independent_copies() {
        let catalog = sample();
        let a = catalog.lookup("L_ONE").unwrap();
        let b = catalog.lookup("L_ONE").unwrap();
        assert_eq!(a, b);
        assert!(!std::ptr::eq(a.name.as_ptr(), b.name.as_ptr()));

        let tagged = a.with_subject(FileId::from("F1"));
        assert_eq!(tagged.subject, Some(FileId::from("F1")));
        assert_eq!(catalog.lookup("L_ONE").unwrap().subject, None);
    }

    #[test]
    fn test_lookup_unknown_or_none_is_fatal() {
        let catalog = sample();
        let err = catalog.lookup("L_MISSING").unwrap_err();
        assert!(matches!(err, IngestError::UnknownSevereElement(ref n) if n == "L_MISSING"));
        assert!(err.is_fatal());
        assert!(catalog.lookup(None).is_err());
    }

    #[test]
    fn test_is_valid() {
        let catalog = sample();
        assert!(catalog.is_valid("L_TWO"));
        assert!(!catalog.is_valid("L_THREE"));
        assert!(!catalog.is_valid(None));
    }

    #[test]
    fn test_register_rejects_long_name() {
        let mut b = CatalogBuilder::new(SevereCategory::Inhibitor);
        let long = "I".repeat(256);
        let err = b.register(long.as_str(), Severity::Note, "d").unwrap_err();
        assert!(matches!(err, IngestError::InvalidSevereElement { field: "name", .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_register_accepts_boundary_lengths() {
        let mut b = CatalogBuilder::new(SevereCategory::Inhibitor);
        let name = "I".repeat(255);
        let desc = "d".repeat(255);
        b.register(name.as_str(), Severity::Note, desc.as_str())
            .unwrap();
        assert!(b.build().is_valid(name.as_str()));
    }

    #[test]
    fn test_register_rejects_missing_or_long_description() {
        let mut b = CatalogBuilder::new(SevereCategory::Anomaly);
        let err = b.register("A_X", Severity::Note, None).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidSevereElement {
                field: "description",
                ..
            }
        ));
        let long = "d".repeat(256);
        assert!(b.register("A_X", Severity::Note, long.as_str()).is_err());
    }

    #[test]
    fn test_register_rejects_missing_name() {
        let mut b = CatalogBuilder::new(SevereCategory::Anomaly);
        assert!(b.register(None, Severity::Note, "d").is_err());
    }

    #[test]
    fn test_register_code_rejects_invalid_severity() {
        let mut b = CatalogBuilder::new(SevereCategory::Quirk);
        let err = b.register_code("Q_X", "SEVERE", "d").unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidSevereElement {
                field: "severity",
                ..
            }
        ));
        b.register_code("Q_Y", "UNKNOWN", "placeholder").unwrap();
        assert_eq!(b.build().len(), 1);
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut b = CatalogBuilder::new(SevereCategory::Anomaly);
        b.register("A_X", Severity::Note, "d").unwrap();
        let err = b.register("A_X", Severity::Bit, "other").unwrap_err();
        assert!(matches!(err, IngestError::DuplicateSevereElement { .. }));
    }

    #[test]
    fn test_names_keep_registration_order() {
        let catalog = sample();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["L_ONE", "L_TWO"]);
    }
}
