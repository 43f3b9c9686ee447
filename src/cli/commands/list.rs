use std::path::Path;

use anyhow::{Result, bail};

use super::super::args::ListCommand;
use super::{CommandResult, CommandSummary, ListSummary, helper::summary_only};
use crate::{
    catalogue::{Catalogue, CatalogueEntry},
    config::load_config,
};

pub fn list(cmd: ListCommand) -> Result<CommandResult> {
    let config = load_config(Path::new("."))?.config;
    let catalogue = Catalogue::builtin()?.with_overrides(&config.alternatives);
    let entries = filter_entries(&catalogue, cmd.category.as_deref())?;

    Ok(summary_only(CommandSummary::List(ListSummary { entries })))
}

/// Entries in `category` (case-insensitive), or all of them.
fn filter_entries(catalogue: &Catalogue, category: Option<&str>) -> Result<Vec<CatalogueEntry>> {
    let entries: Vec<CatalogueEntry> = catalogue
        .entries()
        .filter(|entry| category.is_none_or(|c| entry.category.eq_ignore_ascii_case(c)))
        .cloned()
        .collect();

    if let Some(category) = category
        && entries.is_empty()
    {
        let mut known: Vec<&str> = catalogue.entries().map(|e| e.category.as_str()).collect();
        known.sort_unstable();
        known.dedup();
        bail!(
            "Unknown category '{}' (expected one of: {})",
            category,
            known.join(", ")
        );
    }
    Ok(entries)
}
