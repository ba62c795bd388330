//! core::index
//!
//! Flattened lookup index over a reference tree.
//!
//! # Layout
//!
//! Entries are stored once in an arena. Each normalized name maps to a bucket
//! of arena positions, kept in pre-order traversal order. A metro station is
//! stored once but may be reachable from up to three buckets (bare name,
//! "city station", "line station").
//!
//! The vocabulary is the sorted, deduplicated set of bucket keys and is the
//! candidate pool for fuzzy matching.
//!
//! # Invariants
//!
//! - Every bucket is non-empty
//! - Every vocabulary name is a bucket key and vice versa
//! - Entries are never mutated after construction

use std::collections::HashMap;

use serde::Serialize;

use super::normalize::Normalizer;
use super::tree::{AreaNode, MetroCity};

/// Depth of every metro station (city → line → station).
pub const STATION_DEPTH: usize = 2;

/// Separator used in human-readable entry paths.
pub const PATH_SEPARATOR: &str = " > ";

/// Behaviour shared by indexed records.
pub trait IndexEntry {
    /// Canonical identifier returned to callers.
    fn id(&self) -> &str;

    /// Distance from a root node; deeper is more specific.
    fn depth(&self) -> usize;

    /// Human-readable ancestry, for diagnostics only.
    fn path(&self) -> &str;
}

/// A flattened administrative area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaEntry {
    pub id: String,
    pub name: String,
    pub depth: usize,
    pub path: String,
}

impl IndexEntry for AreaEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// A flattened metro station with its city and line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetroEntry {
    pub id: String,
    pub station_name: String,
    pub city_id: String,
    pub city_name: String,
    pub line_id: String,
    pub line_name: String,
    pub path: String,
    pub depth: usize,
}

impl IndexEntry for MetroEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// Normalized name → candidate entries, plus the fuzzy vocabulary.
#[derive(Debug, Clone)]
pub struct NameIndex<E> {
    entries: Vec<E>,
    buckets: HashMap<String, Vec<usize>>,
    vocabulary: Vec<String>,
}

impl<E: IndexEntry> NameIndex<E> {
    /// Candidates registered under `key`, in insertion order.
    ///
    /// Returns `None` if `key` is not an index key.
    pub fn lookup(&self, key: &str) -> Option<Vec<&E>> {
        self.buckets
            .get(key)
            .map(|slots| slots.iter().map(|&slot| &self.entries[slot]).collect())
    }

    /// Check whether `key` is an index key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.buckets.contains_key(key)
    }

    /// Sorted, deduplicated index keys.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// All stored entries in traversal order.
    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of keys whose bucket holds more than one distinct identifier.
    pub fn ambiguous_key_count(&self) -> usize {
        self.buckets
            .values()
            .filter(|slots| {
                let first = self.entries[slots[0]].id();
                slots.iter().any(|&slot| self.entries[slot].id() != first)
            })
            .count()
    }

    /// Deepest entry depth, or `None` for an empty index.
    pub fn max_depth(&self) -> Option<usize> {
        self.entries.iter().map(IndexEntry::depth).max()
    }

    /// Check whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates entries and keys, then freezes them into a [`NameIndex`].
struct IndexBuilder<E> {
    entries: Vec<E>,
    buckets: HashMap<String, Vec<usize>>,
}

impl<E> IndexBuilder<E> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    /// Store an entry and return its arena slot.
    fn store(&mut self, entry: E) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Register `slot` under `key`.
    fn register(&mut self, key: String, slot: usize) {
        self.buckets.entry(key).or_default().push(slot);
    }

    fn finish(self) -> NameIndex<E> {
        let mut vocabulary: Vec<String> = self.buckets.keys().cloned().collect();
        vocabulary.sort_unstable();

        NameIndex {
            entries: self.entries,
            buckets: self.buckets,
            vocabulary,
        }
    }
}

/// Flatten an area forest into a name index.
///
/// Pre-order traversal; roots have depth 0. Nodes whose name normalizes to
/// an empty key are skipped, but their children are still visited.
pub fn build_area_index(forest: &[AreaNode], normalizer: &Normalizer) -> NameIndex<AreaEntry> {
    let mut builder = IndexBuilder::new();

    // (node, depth, ancestry path)
    let mut stack: Vec<(&AreaNode, usize, String)> = forest
        .iter()
        .rev()
        .map(|root| (root, 0, String::new()))
        .collect();

    while let Some((node, depth, parent_path)) = stack.pop() {
        let path = if depth == 0 {
            node.name.clone()
        } else {
            format!("{}{}{}", parent_path, PATH_SEPARATOR, node.name)
        };

        let key = normalizer.normalize(&node.name);
        if !key.is_empty() {
            let slot = builder.store(AreaEntry {
                id: node.id.clone(),
                name: node.name.clone(),
                depth,
                path: path.clone(),
            });
            builder.register(key, slot);
        }

        for child in node.areas.iter().rev() {
            stack.push((child, depth + 1, path.clone()));
        }
    }

    builder.finish()
}

/// Flatten a metro forest into a name index.
///
/// Each station is stored once and registered under its bare name, under
/// "city station" and under "line station", skipping keys that are empty or
/// equal to one already used for the same station.
pub fn build_metro_index(cities: &[MetroCity], normalizer: &Normalizer) -> NameIndex<MetroEntry> {
    let mut builder = IndexBuilder::new();

    for city in cities {
        for line in &city.lines {
            for station in &line.stations {
                let bare = normalizer.normalize(&station.name);
                let with_city = normalizer.normalize(&format!("{} {}", city.name, station.name));
                let with_line = normalizer.normalize(&format!("{} {}", line.name, station.name));

                let mut keys: Vec<String> = Vec::with_capacity(3);
                for key in [bare, with_city, with_line] {
                    if !key.is_empty() && !keys.contains(&key) {
                        keys.push(key);
                    }
                }
                if keys.is_empty() {
                    continue;
                }

                let slot = builder.store(MetroEntry {
                    id: station.id.clone(),
                    station_name: station.name.clone(),
                    city_id: city.id.clone(),
                    city_name: city.name.clone(),
                    line_id: line.id.clone(),
                    line_name: line.name.clone(),
                    path: [city.name.as_str(), line.name.as_str(), station.name.as_str()].join(PATH_SEPARATOR),
                    depth: STATION_DEPTH,
                });
                for key in keys {
                    builder.register(key, slot);
                }
            }
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::{MetroLine, MetroStation};

    fn sample_areas() -> Vec<AreaNode> {
        vec![
            AreaNode::with_children(
                "113",
                "Россия",
                vec![
                    AreaNode::with_children(
                        "1620",
                        "Республика Марий Эл",
                        vec![AreaNode::leaf("1621", "Йошкар-Ола")],
                    ),
                    AreaNode::leaf("1", "Москва"),
                ],
            ),
            AreaNode::with_children("16", "Беларусь", vec![AreaNode::leaf("1002", "Минск")]),
        ]
    }

    fn sample_metro() -> Vec<MetroCity> {
        vec![MetroCity {
            id: "1".into(),
            name: "Москва".into(),
            lines: vec![MetroLine {
                id: "l1".into(),
                name: "Сокольническая".into(),
                stations: vec![
                    MetroStation {
                        id: "s1".into(),
                        name: "Сокольники".into(),
                    },
                    MetroStation {
                        id: "s2".into(),
                        name: "Красносельская".into(),
                    },
                ],
            }],
        }]
    }

    #[test]
    fn area_depths_and_paths() {
        let index = build_area_index(&sample_areas(), &Normalizer::areas());

        let yola = index.lookup("йошкар-ола").unwrap();
        assert_eq!(yola.len(), 1);
        assert_eq!(yola[0].depth, 2);
        assert_eq!(yola[0].path, "Россия > Республика Марий Эл > Йошкар-Ола");

        let russia = index.lookup("россия").unwrap();
        assert_eq!(russia[0].depth, 0);
        assert_eq!(russia[0].path, "Россия");
    }

    #[test]
    fn area_entries_are_pre_order() {
        let index = build_area_index(&sample_areas(), &Normalizer::areas());
        let ids: Vec<&str> = index.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["113", "1620", "1621", "1", "16", "1002"]);
    }

    #[test]
    fn vocabulary_is_sorted_and_unique() {
        let forest = vec![
            AreaNode::leaf("1", "Москва"),
            AreaNode::leaf("2", "г. Москва"),
            AreaNode::leaf("3", "Абакан"),
        ];
        let index = build_area_index(&forest, &Normalizer::areas());

        assert_eq!(index.vocabulary(), &["абакан", "москва"]);
        assert_eq!(index.lookup("москва").unwrap().len(), 2);
        assert_eq!(index.key_count(), 2);
        assert_eq!(index.ambiguous_key_count(), 1);
    }

    #[test]
    fn unnamed_nodes_are_skipped_but_children_indexed() {
        let forest = vec![AreaNode::with_children(
            "",
            "",
            vec![AreaNode::leaf("7", "Тверь"), AreaNode::leaf("8", "!!!")],
        )];
        let index = build_area_index(&forest, &Normalizer::areas());

        assert_eq!(index.entries().len(), 1);
        let tver = index.lookup("тверь").unwrap();
        assert_eq!(tver[0].depth, 1);
        assert_eq!(tver[0].path, " > Тверь");
    }

    #[test]
    fn empty_forest_yields_empty_index() {
        let index = build_area_index(&[], &Normalizer::areas());
        assert!(index.is_empty());
        assert!(index.vocabulary().is_empty());
        assert_eq!(index.max_depth(), None);
    }

    #[test]
    fn deep_tree_does_not_recurse() {
        let mut node = AreaNode::leaf("leaf", "Лист");
        for i in 0..2_000 {
            node = AreaNode::with_children(format!("n{}", i), "Узел", vec![node]);
        }
        let index = build_area_index(std::slice::from_ref(&node), &Normalizer::areas());

        assert_eq!(index.lookup("лист").unwrap()[0].depth, 2_000);
        assert_eq!(index.max_depth(), Some(2_000));
    }

    #[test]
    fn metro_registers_three_keys() {
        let index = build_metro_index(&sample_metro(), &Normalizer::metro());

        for key in [
            "сокольники",
            "москва сокольники",
            "сокольническая сокольники",
        ] {
            let bucket = index.lookup(key).unwrap();
            assert_eq!(bucket.len(), 1, "key {}", key);
            assert_eq!(bucket[0].id, "s1");
            assert_eq!(bucket[0].depth, STATION_DEPTH);
        }

        assert_eq!(index.entries().len(), 2);
        assert_eq!(index.vocabulary().len(), 6);
    }

    #[test]
    fn metro_entry_metadata() {
        let index = build_metro_index(&sample_metro(), &Normalizer::metro());
        let entry = index.lookup("красносельская").unwrap()[0];

        assert_eq!(entry.city_id, "1");
        assert_eq!(entry.city_name, "Москва");
        assert_eq!(entry.line_id, "l1");
        assert_eq!(entry.line_name, "Сокольническая");
        assert_eq!(entry.path, "Москва > Сокольническая > Красносельская");
    }

    #[test]
    fn metro_skips_duplicate_keys_for_one_station() {
        // Nameless city and line collapse both combos onto the bare name
        let cities = vec![MetroCity {
            id: "9".into(),
            name: String::new(),
            lines: vec![MetroLine {
                id: "l9".into(),
                name: "!!".into(),
                stations: vec![MetroStation {
                    id: "s9".into(),
                    name: "Центр".into(),
                }],
            }],
        }];
        let index = build_metro_index(&cities, &Normalizer::metro());

        assert_eq!(index.vocabulary(), &["центр"]);
        assert_eq!(index.lookup("центр").unwrap().len(), 1);
    }

    #[test]
    fn metro_station_without_name_still_reachable_by_combo() {
        let cities = vec![MetroCity {
            id: "1".into(),
            name: "Казань".into(),
            lines: vec![MetroLine {
                id: "l".into(),
                name: "Центральная".into(),
                stations: vec![MetroStation {
                    id: "x".into(),
                    name: String::new(),
                }],
            }],
        }];
        let index = build_metro_index(&cities, &Normalizer::metro());

        assert!(index.contains_key("казань"));
        assert!(index.contains_key("центральная"));
        assert!(!index.contains_key(""));
    }
}
