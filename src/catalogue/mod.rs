//! Catalogue of utility-library functions and their native alternatives.
//!
//! The built-in table ships as `catalogue.json` next to this module. Each
//! entry's `alternative` is the target pattern handed to the autofix engine.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::autofix::{PatternKind, SpecializedHandler};

const BUILTIN_CATALOGUE: &str = include_str!("catalogue.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntry {
    pub name: String,
    pub alternative: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Whether the generic strategy for `alternative` may run when the
    /// specialized handler declines.
    #[serde(default = "default_fallback")]
    pub fallback: bool,
}

fn default_fallback() -> bool {
    true
}

impl CatalogueEntry {
    /// Entry for a configured alternative that has no built-in counterpart.
    pub fn custom(name: &str, alternative: &str) -> Self {
        Self {
            name: name.to_string(),
            alternative: alternative.to_string(),
            category: "Custom".to_string(),
            note: None,
            fallback: true,
        }
    }

    /// Label of the rewrite route this entry takes.
    pub fn fix_kind(&self) -> &'static str {
        if SpecializedHandler::for_function(&self.name).is_some() {
            "specialized"
        } else {
            PatternKind::classify(&self.alternative, &self.name).label()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    entries: BTreeMap<String, CatalogueEntry>,
}

impl Catalogue {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOGUE).context("Failed to load the built-in catalogue")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CatalogueEntry> =
            serde_json::from_str(json).context("Invalid catalogue JSON")?;
        Ok(Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.name.clone(), entry))
                .collect(),
        })
    }

    /// Apply configured `name → pattern` overrides.
    ///
    /// An overridden entry keeps its category and note; its pattern is
    /// user-supplied, so the generic fallback is always allowed.
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (name, alternative) in overrides {
            self.entries
                .entry(name.clone())
                .and_modify(|entry| {
                    entry.alternative = alternative.clone();
                    entry.fallback = true;
                })
                .or_insert_with(|| CatalogueEntry::custom(name, alternative));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&CatalogueEntry> {
        self.entries.get(name)
    }

    /// Look up an entry ignoring ASCII case, as per-method package names
    /// (`lodash.groupby`) are lowercase.
    pub fn find_ignore_case(&self, name: &str) -> Option<&CatalogueEntry> {
        self.get(name).or_else(|| {
            self.entries
                .values()
                .find(|entry| entry.name.eq_ignore_ascii_case(name))
        })
    }

    /// All entries, sorted by function name.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogueEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
