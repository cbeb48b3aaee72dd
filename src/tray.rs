//! Category-grouped quick-access projection.
//!
//! Rebuilt in full from the committed rows after every save; the menu is
//! never patched incrementally.

use crate::db::LinkRecord;

/// Group label applied to rows without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Disabled entry shown when no links survive filtering.
pub const EMPTY_PLACEHOLDER: &str = "No links yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub name: String,
    pub entries: Vec<MenuEntry>,
}

/// Read-only, fully materialized projection of the link list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryMenu {
    pub groups: Vec<CategoryGroup>,
}

/// Flat menu item, in render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    /// Disabled category header.
    Header(String),
    /// Clickable link entry.
    Link { title: String, url: String },
    Separator,
    /// Disabled placeholder for an empty list.
    Placeholder(&'static str),
}

impl CategoryMenu {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Flatten to the menu shape the tray renders: a header and its entries
    /// per category, separators between categories, or the placeholder
    /// alone.
    pub fn items(&self) -> Vec<MenuItem> {
        if self.groups.is_empty() {
            return vec![MenuItem::Placeholder(EMPTY_PLACEHOLDER)];
        }

        let mut items = Vec::new();
        for (index, group) in self.groups.iter().enumerate() {
            if index > 0 {
                items.push(MenuItem::Separator);
            }
            items.push(MenuItem::Header(group.name.clone()));
            for entry in &group.entries {
                items.push(MenuItem::Link {
                    title: entry.title.clone(),
                    url: entry.url.clone(),
                });
            }
        }
        items
    }
}

/// Build the projection from the committed rows. Categories appear in the
/// order they are first encountered; entries within a category are sorted by
/// title, case-insensitively, with input order breaking ties.
pub fn build_menu(rows: &[LinkRecord]) -> CategoryMenu {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for row in rows {
        let title = row.title.trim();
        let url = row.url.trim();
        if title.is_empty() || url.is_empty() {
            // Tolerate legacy rows that predate entry validation.
            continue;
        }

        let category = row.category.trim();
        let name = if category.is_empty() {
            UNCATEGORIZED
        } else {
            category
        };

        let entry = MenuEntry {
            title: title.to_string(),
            url: url.to_string(),
        };
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.entries.push(entry),
            None => groups.push(CategoryGroup {
                name: name.to_string(),
                entries: vec![entry],
            }),
        }
    }

    for group in &mut groups {
        // sort_by is stable, so equal titles keep their original row order.
        group
            .entries
            .sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    }

    CategoryMenu { groups }
}
