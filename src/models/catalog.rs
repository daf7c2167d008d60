use serde::{Deserialize, Serialize};

/// Title shown for placeholder items when no real catalog is available
pub const PLACEHOLDER_TITLE: &str = "No Movie Available";

/// One recommendable entry in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Position in the catalog; also the row/column in the similarity matrix
    pub index: usize,
    /// Display title, not guaranteed unique
    pub title: String,
    /// Identifier in the metadata provider's namespace
    pub external_id: Option<u64>,
}

/// Ordered set of items, indexed consistently with the similarity matrix
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Builds a catalog from `(title, external_id)` rows in matrix order.
    ///
    /// Indices are assigned from row position, so `items[i].index == i` always holds.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<u64>)>,
    {
        let items = rows
            .into_iter()
            .enumerate()
            .map(|(index, (title, external_id))| Item {
                index,
                title,
                external_id,
            })
            .collect();

        Self { items }
    }

    /// Catalog of `count` placeholder items without external ids
    pub fn placeholder(count: usize) -> Self {
        Self::from_rows((0..count).map(|_| (PLACEHOLDER_TITLE.to_string(), None)))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Looks up an item by exact title.
    ///
    /// Duplicate titles resolve to the lowest index.
    pub fn find_by_title(&self, title: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.title == title)
    }

    /// Titles in catalog order, duplicates included
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.title.as_str())
    }
}
