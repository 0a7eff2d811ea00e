use std::collections::{BTreeSet, HashMap};

/// One mapping row as loaded from a002_product_mapping.
#[derive(Debug, Clone)]
pub struct MappingRow {
    pub raw_name: String,
    pub mapped_title: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Matched {
        mapped_title: String,
        category_id: Option<i64>,
    },
    Unmatched,
}

/// Exact-name lookup index over the full mapping table, built once per
/// aggregation request. A row with a NULL/empty mapped_title resolves
/// as Unmatched so the name surfaces to the curation queue instead of
/// silently aggregating.
#[derive(Debug, Default)]
pub struct MappingIndex {
    by_name: HashMap<String, (String, Option<i64>)>,
    /// Every distinct (mapped_title, category_id), in first-encounter
    /// order. The rollup uses this to show zero-valued catalog entries.
    catalog: Vec<(String, Option<i64>)>,
}

impl MappingIndex {
    pub fn from_rows(rows: Vec<MappingRow>) -> Self {
        let mut by_name = HashMap::new();
        let mut catalog: Vec<(String, Option<i64>)> = Vec::new();

        for row in rows {
            let title = match row.mapped_title {
                Some(t) if !t.trim().is_empty() => t,
                _ => continue,
            };

            if !catalog.iter().any(|(t, _)| t == &title) {
                catalog.push((title.clone(), row.category_id));
            }
            by_name.insert(row.raw_name, (title, row.category_id));
        }

        Self { by_name, catalog }
    }

    /// Exact string equality on the raw name; never an error.
    pub fn resolve(&self, raw_name: &str) -> Resolution {
        match self.by_name.get(raw_name) {
            Some((title, category_id)) => Resolution::Matched {
                mapped_title: title.clone(),
                category_id: *category_id,
            },
            None => Resolution::Unmatched,
        }
    }

    pub fn catalog(&self) -> &[(String, Option<i64>)] {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Deduplicated, deterministically ordered set of raw names that failed
/// resolution. Surfaced in every summary response so operators can add
/// mappings; never an error condition.
pub type UnmatchedSet = BTreeSet<String>;

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> MappingIndex {
        MappingIndex::from_rows(vec![
            MappingRow {
                raw_name: "舰载熊猫挂件--蓝马甲".into(),
                mapped_title: Some("熊猫挂件".into()),
                category_id: Some(1),
            },
            MappingRow {
                raw_name: "舰载熊猫挂件--红马甲".into(),
                mapped_title: Some("熊猫挂件".into()),
                category_id: Some(1),
            },
            MappingRow {
                raw_name: "待定新品".into(),
                mapped_title: None,
                category_id: Some(2),
            },
        ])
    }

    #[test]
    fn test_exact_match_resolves() {
        let idx = index();
        assert_eq!(
            idx.resolve("舰载熊猫挂件--蓝马甲"),
            Resolution::Matched {
                mapped_title: "熊猫挂件".into(),
                category_id: Some(1),
            }
        );
    }

    #[test]
    fn test_no_substring_matching() {
        // A name that merely contains a mapped name must not resolve.
        let idx = index();
        assert_eq!(idx.resolve("舰载熊猫挂件"), Resolution::Unmatched);
    }

    #[test]
    fn test_null_mapped_title_is_unmatched() {
        let idx = index();
        assert_eq!(idx.resolve("待定新品"), Resolution::Unmatched);
        // And it must not appear in the catalog either.
        assert!(idx.catalog().iter().all(|(t, _)| t != "待定新品"));
    }

    #[test]
    fn test_catalog_keeps_first_encounter_order_and_dedupes() {
        let idx = index();
        assert_eq!(idx.catalog(), &[("熊猫挂件".to_string(), Some(1))]);
    }
}
