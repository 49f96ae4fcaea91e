//! Probability resolver: member names + overrides -> weights

use crate::models::{OverrideMap, Tier};
use serde::{Deserialize, Serialize};

/// A member name paired with its selection weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedMember {
    pub name: String,
    pub weight: f64,
}

impl WeightedMember {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Resolve one weight per member, preserving input order
///
/// Members without an override entry are `fair`. Override entries naming
/// someone who is not a member are ignored.
pub fn resolve_weights(members: &[String], overrides: &OverrideMap) -> Vec<WeightedMember> {
    members
        .iter()
        .map(|name| {
            let tier = overrides.get(name).copied().unwrap_or(Tier::Fair);
            WeightedMember::new(name.clone(), tier.weight())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_fair_without_overrides() {
        let weights = resolve_weights(&names(&["a", "b", "c"]), &OverrideMap::new());
        assert_eq!(weights.len(), 3);
        assert!(weights.iter().all(|w| w.weight == 1.0));
        assert_eq!(weights[2].name, "c");
    }

    #[test]
    fn test_tier_mapping_in_input_order() {
        let mut overrides = OverrideMap::new();
        overrides.insert("b".to_string(), Tier::Favored);
        overrides.insert("c".to_string(), Tier::Suppressed);
        overrides.insert("ghost".to_string(), Tier::Favored);

        let weights = resolve_weights(&names(&["c", "a", "b"]), &overrides);
        assert_eq!(
            weights,
            vec![
                WeightedMember::new("c", 0.001),
                WeightedMember::new("a", 1.0),
                WeightedMember::new("b", 1.1),
            ]
        );
    }

    #[test]
    fn test_override_lookup_is_case_sensitive() {
        let mut overrides = OverrideMap::new();
        overrides.insert("alice".to_string(), Tier::Suppressed);

        let weights = resolve_weights(&names(&["Alice"]), &overrides);
        assert_eq!(weights[0].weight, 1.0);
    }

    #[test]
    fn test_resolver_is_deterministic() {
        let mut overrides = OverrideMap::new();
        overrides.insert("x".to_string(), Tier::Favored);
        let members = names(&["x", "y", "z"]);

        let first = resolve_weights(&members, &overrides);
        for _ in 0..10 {
            assert_eq!(resolve_weights(&members, &overrides), first);
        }
    }

    #[test]
    fn test_total_weight_positive_when_non_empty() {
        let mut overrides = OverrideMap::new();
        overrides.insert("only".to_string(), Tier::Suppressed);
        let total: f64 = resolve_weights(&names(&["only"]), &overrides)
            .iter()
            .map(|w| w.weight)
            .sum();
        assert!(total > 0.0);
    }
}
