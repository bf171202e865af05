//! Bounded multi-selection and its derived value.

use std::collections::HashSet;

use serde::Serialize;

use crate::region::{Region, RegionId};

/// How many regions may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionLimit {
    Unlimited,
    AtMost(usize),
}

impl SelectionLimit {
    /// Interpret the `maxSelections` option: negative values lift the cap,
    /// zero keeps the selection permanently empty.
    pub fn from_option(max_selections: i64) -> Self {
        match usize::try_from(max_selections) {
            Ok(max) => SelectionLimit::AtMost(max),
            Err(_) => SelectionLimit::Unlimited,
        }
    }

    /// Whether the derived value is a single key rather than a list.
    pub fn is_single(&self) -> bool {
        *self == SelectionLimit::AtMost(1)
    }

    /// Whether the derived value is a list of keys. Only caps of two or
    /// more produce one; an unlimited or zero cap reports no key at all.
    pub fn is_multiple(&self) -> bool {
        matches!(self, SelectionLimit::AtMost(max) if *max >= 2)
    }

    fn exceeded_by(&self, len: usize) -> bool {
        match self {
            SelectionLimit::Unlimited => false,
            SelectionLimit::AtMost(max) => len > *max,
        }
    }
}

/// The selection's externally visible value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SelectionValue {
    /// Single-selection mode: the selected key, or `null`
    Single(Option<String>),
    /// Multi-selection mode: keys of selected regions, oldest first
    Multiple(Vec<String>),
}

/// Selection rules shared by every toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionPolicy {
    pub limit: SelectionLimit,
    pub disable_key: Option<String>,
    pub value_key: Option<String>,
}

impl SelectionPolicy {
    /// Derive the value of `selection`. `None` when no value key is configured.
    ///
    /// A cap of one gives the first selected key, a cap of two or more gives
    /// every non-empty key in selection order, and any other cap gives `null`.
    pub fn derive_value(&self, selection: &Selection, regions: &[Region]) -> Option<SelectionValue> {
        let key = self.value_key.as_deref()?;
        let value_of = |id: &RegionId| regions.get(id.index()).and_then(|r| r.value(Some(key)));

        if self.limit.is_single() {
            let value = selection.ids().first().and_then(value_of).map(str::to_string);
            Some(SelectionValue::Single(value))
        } else if self.limit.is_multiple() {
            let values = selection
                .ids()
                .iter()
                .filter_map(value_of)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            Some(SelectionValue::Multiple(values))
        } else {
            Some(SelectionValue::Single(None))
        }
    }
}

/// What a toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    /// The region is disabled and was left alone
    Rejected,
    /// The region was appended; `evicted` lists regions dropped to respect the limit
    Added { evicted: Vec<RegionId> },
    /// The region was deselected
    Removed,
}

/// Ordered set of selected regions, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    order: Vec<RegionId>,
    members: HashSet<RegionId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: RegionId) -> bool {
        self.members.contains(&id)
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[RegionId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Select or deselect `region`, then evict the oldest entries until the
    /// limit holds again.
    pub fn toggle(&mut self, region: &Region, policy: &SelectionPolicy) -> Toggle {
        if region.is_disabled(policy.disable_key.as_deref()) {
            return Toggle::Rejected;
        }

        let id = region.id();
        if self.members.remove(&id) {
            self.order.retain(|selected| *selected != id);
            return Toggle::Removed;
        }

        self.order.push(id);
        self.members.insert(id);

        let mut evicted = Vec::new();
        while policy.limit.exceeded_by(self.order.len()) {
            let oldest = self.order.remove(0);
            self.members.remove(&oldest);
            evicted.push(oldest);
        }
        Toggle::Added { evicted }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::AreaDefinition;

    fn regions(keys: &[&str]) -> Vec<Region> {
        keys.iter()
            .enumerate()
            .map(|(i, key)| {
                Region::new(
                    RegionId(i),
                    AreaDefinition::new("rect", "0,0,1,1").with_attribute("target", *key),
                )
            })
            .collect()
    }

    fn policy(max: i64) -> SelectionPolicy {
        SelectionPolicy {
            limit: SelectionLimit::from_option(max),
            disable_key: Some("disabled".to_string()),
            value_key: Some("target".to_string()),
        }
    }

    #[test]
    fn test_limit_from_option() {
        assert_eq!(SelectionLimit::from_option(1), SelectionLimit::AtMost(1));
        assert_eq!(SelectionLimit::from_option(0), SelectionLimit::AtMost(0));
        assert_eq!(SelectionLimit::from_option(-1), SelectionLimit::Unlimited);
    }

    #[test]
    fn test_single_selection_replaces() {
        let regions = regions(&["a", "b"]);
        let policy = policy(1);
        let mut selection = Selection::new();

        assert_eq!(selection.toggle(&regions[0], &policy), Toggle::Added { evicted: vec![] });
        assert_eq!(selection.ids(), &[RegionId(0)]);
        assert_eq!(
            policy.derive_value(&selection, &regions),
            Some(SelectionValue::Single(Some("a".to_string())))
        );

        assert_eq!(
            selection.toggle(&regions[1], &policy),
            Toggle::Added {
                evicted: vec![RegionId(0)]
            }
        );
        assert_eq!(selection.ids(), &[RegionId(1)]);
        assert!(!selection.contains(RegionId(0)));
        assert_eq!(
            policy.derive_value(&selection, &regions),
            Some(SelectionValue::Single(Some("b".to_string())))
        );
    }

    #[test]
    fn test_two_of_three_keeps_most_recent() {
        let regions = regions(&["a", "b", "c"]);
        let policy = policy(2);
        let mut selection = Selection::new();

        for region in &regions {
            selection.toggle(region, &policy);
        }
        assert_eq!(selection.ids(), &[RegionId(1), RegionId(2)]);
        assert_eq!(
            policy.derive_value(&selection, &regions),
            Some(SelectionValue::Multiple(vec!["b".to_string(), "c".to_string()]))
        );
    }

    #[test]
    fn test_toggle_round_trip() {
        let regions = regions(&["a", "b", "c"]);
        for max in [2, 3, -1] {
            let policy = policy(max);
            let mut selection = Selection::new();
            selection.toggle(&regions[0], &policy);

            let before = selection.clone();
            let value_before = policy.derive_value(&selection, &regions);

            // On then off for an unselected region
            selection.toggle(&regions[2], &policy);
            selection.toggle(&regions[2], &policy);
            assert_eq!(selection, before);
            assert_eq!(policy.derive_value(&selection, &regions), value_before);

            // Off then on for the only selected region
            selection.toggle(&regions[0], &policy);
            selection.toggle(&regions[0], &policy);
            assert_eq!(selection, before);
            assert_eq!(policy.derive_value(&selection, &regions), value_before);
        }
    }

    #[test]
    fn test_removing_last_region() {
        let regions = regions(&["a"]);

        let single = policy(1);
        let mut selection = Selection::new();
        selection.toggle(&regions[0], &single);
        assert_eq!(selection.toggle(&regions[0], &single), Toggle::Removed);
        assert!(selection.is_empty());
        assert_eq!(
            single.derive_value(&selection, &regions),
            Some(SelectionValue::Single(None))
        );

        let multi = policy(3);
        assert_eq!(
            multi.derive_value(&selection, &regions),
            Some(SelectionValue::Multiple(vec![]))
        );
    }

    #[test]
    fn test_disabled_region_is_rejected() {
        let mut regions = regions(&["a"]);
        regions[0].set_attribute("disabled", "");
        let mut selection = Selection::new();

        assert_eq!(selection.toggle(&regions[0], &policy(1)), Toggle::Rejected);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_zero_limit_keeps_selection_empty() {
        let regions = regions(&["a"]);
        let policy = policy(0);
        let mut selection = Selection::new();

        assert_eq!(
            selection.toggle(&regions[0], &policy),
            Toggle::Added {
                evicted: vec![RegionId(0)]
            }
        );
        assert!(selection.is_empty());
        assert_eq!(
            policy.derive_value(&selection, &regions),
            Some(SelectionValue::Single(None))
        );
    }

    #[test]
    fn test_unlimited_never_evicts() {
        let regions = regions(&["a", "b", "c", "d"]);
        let policy = policy(-1);
        let mut selection = Selection::new();
        for region in &regions {
            selection.toggle(region, &policy);
        }
        assert_eq!(selection.len(), 4);
        // No key is reported without a positive cap
        assert_eq!(
            policy.derive_value(&selection, &regions),
            Some(SelectionValue::Single(None))
        );
    }

    #[test]
    fn test_value_shape_follows_cap() {
        let regions = regions(&["a"]);
        let cases = [
            (-5, SelectionValue::Single(None)),
            (-1, SelectionValue::Single(None)),
            (0, SelectionValue::Single(None)),
            (1, SelectionValue::Single(Some("a".to_string()))),
            (2, SelectionValue::Multiple(vec!["a".to_string()])),
        ];
        for (max, expected) in cases {
            let policy = policy(max);
            let mut selection = Selection::new();
            selection.toggle(&regions[0], &policy);
            assert_eq!(policy.derive_value(&selection, &regions), Some(expected), "max {}", max);
        }
    }

    #[test]
    fn test_cap_holds_for_any_activation_sequence() {
        let regions = regions(&["a", "b", "c", "d", "e"]);
        let sequence = [0, 1, 2, 1, 3, 4, 0, 0, 2, 4, 3, 1];

        for k in 1..=4usize {
            let policy = policy(k as i64);
            let mut selection = Selection::new();
            // Model: the k most recent toggled-on regions that were not toggled off
            let mut model: Vec<usize> = Vec::new();

            for &i in &sequence {
                selection.toggle(&regions[i], &policy);
                if let Some(pos) = model.iter().position(|&m| m == i) {
                    model.remove(pos);
                } else {
                    model.push(i);
                    if model.len() > k {
                        model.remove(0);
                    }
                }

                assert!(selection.len() <= k);
                let ids: Vec<usize> = selection.ids().iter().map(RegionId::index).collect();
                assert_eq!(ids, model);
            }
        }
    }

    #[test]
    fn test_value_skips_missing_keys() {
        let mut regions = regions(&["a", "", "c"]);
        regions[2].remove_attribute("target");
        let policy = policy(3);
        let mut selection = Selection::new();
        for region in &regions {
            selection.toggle(region, &policy);
        }
        assert_eq!(
            policy.derive_value(&selection, &regions),
            Some(SelectionValue::Multiple(vec!["a".to_string()]))
        );
    }

    #[test]
    fn test_no_value_key_means_no_value() {
        let regions = regions(&["a"]);
        let policy = SelectionPolicy {
            value_key: None,
            ..policy(1)
        };
        let mut selection = Selection::new();
        selection.toggle(&regions[0], &policy);
        assert_eq!(policy.derive_value(&selection, &regions), None);
    }

    #[test]
    fn test_value_serializes_like_the_dom_value() {
        let single = SelectionValue::Single(None);
        assert_eq!(serde_json::to_string(&single).unwrap(), "null");
        let multi = SelectionValue::Multiple(vec!["a".to_string()]);
        assert_eq!(serde_json::to_string(&multi).unwrap(), "[\"a\"]");
    }
}
