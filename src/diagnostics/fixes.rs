// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Quick fixes of the last analysis, indexed by document and range.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::analyzer::RosieFix;
use crate::types::Range;

type RangeFixes = Vec<(Range, Vec<RosieFix>)>;

/// Per-document index of the fixes proposed for each diagnostic range.
///
/// Ranges are kept in registration order so that lookups return fixes in the
/// order the analyzer reported them.
#[derive(Debug, Default)]
pub struct FixRegistry {
    fixes: RwLock<HashMap<String, RangeFixes>>,
}

impl FixRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `fix` under `range`. A fix equal to one already stored for that range is ignored.
    pub fn register_fix(&self, uri: &str, range: Range, fix: RosieFix) {
        let mut fixes = self.fixes.write().unwrap_or_else(PoisonError::into_inner);
        let ranges = fixes.entry(uri.to_string()).or_default();

        let index = match ranges.iter().position(|(existing, _)| *existing == range) {
            Some(index) => index,
            None => {
                ranges.push((range, Vec::new()));
                ranges.len() - 1
            }
        };

        let registered = &mut ranges[index].1;
        if !registered.contains(&fix) {
            registered.push(fix);
        }
    }

    /// Fixes of every range of `uri` that contains `query`.
    pub fn get_fixes(&self, uri: &str, query: &Range) -> Vec<RosieFix> {
        self.fixes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
            .map(|ranges| {
                ranges
                    .iter()
                    .filter(|(range, _)| range.contains(query))
                    .flat_map(|(_, fixes)| fixes.iter().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Forget the fixes of one document.
    pub fn reset_for_document(&self, uri: &str) {
        self.fixes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uri);
    }

    /// Forget the fixes of every document.
    pub fn clear(&self) {
        self.fixes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of ranges with fixes for a document.
    pub fn range_count(&self, uri: &str) -> usize {
        self.fixes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalyzerPosition, EditType, RosieFixEdit};

    const URI: &str = "file:///workspace/main.py";

    fn fix(description: &str) -> RosieFix {
        RosieFix {
            description: description.to_string(),
            edits: vec![RosieFixEdit {
                start: AnalyzerPosition::new(1, 1),
                end: AnalyzerPosition::new(1, 4),
                edit_type: EditType::Update,
                content: Some("new".to_string()),
            }],
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = FixRegistry::new();
        let range = Range::from_coords(1, 0, 1, 10);
        registry.register_fix(URI, range, fix("first"));
        registry.register_fix(URI, range, fix("second"));

        let fixes = registry.get_fixes(URI, &Range::from_coords(1, 2, 1, 5));
        assert_eq!(fixes, vec![fix("first"), fix("second")]);
        assert!(registry.get_fixes("file:///other.py", &range).is_empty());
    }

    #[test]
    fn test_duplicate_fix_ignored() {
        let registry = FixRegistry::new();
        let range = Range::from_coords(1, 0, 1, 10);
        registry.register_fix(URI, range, fix("first"));
        registry.register_fix(URI, range, fix("first"));

        assert_eq!(registry.get_fixes(URI, &range).len(), 1);
        assert_eq!(registry.range_count(URI), 1);
    }

    #[test]
    fn test_containment_is_closed() {
        let registry = FixRegistry::new();
        let range = Range::from_coords(1, 0, 1, 10);
        registry.register_fix(URI, range, fix("first"));

        assert_eq!(registry.get_fixes(URI, &range).len(), 1);
        assert_eq!(registry.get_fixes(URI, &Range::from_coords(1, 10, 1, 10)).len(), 1);
        assert!(registry.get_fixes(URI, &Range::from_coords(1, 5, 1, 11)).is_empty());
        assert!(registry.get_fixes(URI, &Range::from_coords(2, 0, 2, 1)).is_empty());
    }

    #[test]
    fn test_union_across_ranges_in_registration_order() {
        let registry = FixRegistry::new();
        registry.register_fix(URI, Range::from_coords(0, 0, 5, 0), fix("outer"));
        registry.register_fix(URI, Range::from_coords(1, 0, 1, 10), fix("inner"));

        let fixes = registry.get_fixes(URI, &Range::from_coords(1, 3, 1, 4));
        assert_eq!(fixes, vec![fix("outer"), fix("inner")]);
    }

    #[test]
    fn test_reset_and_clear() {
        let registry = FixRegistry::new();
        let range = Range::from_coords(1, 0, 1, 10);
        registry.register_fix(URI, range, fix("first"));
        registry.register_fix("file:///workspace/other.py", range, fix("first"));

        registry.reset_for_document(URI);
        assert!(registry.get_fixes(URI, &range).is_empty());
        assert_eq!(registry.get_fixes("file:///workspace/other.py", &range).len(), 1);

        registry.clear();
        assert!(registry
            .get_fixes("file:///workspace/other.py", &range)
            .is_empty());
    }
}
