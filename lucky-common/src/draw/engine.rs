//! Weighted random selection
//!
//! One draw samples `r` uniformly from `[0, total)` and walks the members in
//! order, subtracting each weight until the remainder reaches zero. If
//! floating-point rounding leaves the walk without a winner, the first member
//! wins.

use super::random::RandomSource;
use super::resolver::WeightedMember;
use crate::{Error, Result};

/// Pick one winner from `members`
///
/// Fails with [`Error::InvalidInput`] for an empty list, a negative or
/// non-finite weight, or a non-positive total.
pub fn draw(members: &[WeightedMember], rng: &dyn RandomSource) -> Result<String> {
    let total = total_weight(members)?;
    let r = rng.next_f64() * total;
    Ok(pick(members, r).name.clone())
}

fn total_weight(members: &[WeightedMember]) -> Result<f64> {
    if members.is_empty() {
        return Err(Error::InvalidInput("cannot draw from an empty member list".to_string()));
    }

    let mut total = 0.0;
    for member in members {
        if !member.weight.is_finite() || member.weight < 0.0 {
            return Err(Error::InvalidInput(format!(
                "member '{}' has unusable weight {}",
                member.name, member.weight
            )));
        }
        total += member.weight;
    }

    if total <= 0.0 {
        return Err(Error::InvalidInput("total weight must be positive".to_string()));
    }
    Ok(total)
}

/// Walk the cumulative weights; `members` must be non-empty
fn pick(members: &[WeightedMember], r: f64) -> &WeightedMember {
    let mut remainder = r;
    for member in members {
        remainder -= member.weight;
        if remainder <= 0.0 {
            return member;
        }
    }
    &members[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::random::{FixedRandom, SeededRandom};

    fn weighted(list: &[(&str, f64)]) -> Vec<WeightedMember> {
        list.iter().map(|(n, w)| WeightedMember::new(*n, *w)).collect()
    }

    #[test]
    fn test_single_member_always_wins() {
        let members = weighted(&[("Solo", 1.0)]);
        let rng = SeededRandom::new(7);
        for _ in 0..100 {
            assert_eq!(draw(&members, &rng).unwrap(), "Solo");
        }
    }

    #[test]
    fn test_empty_list_is_invalid_input() {
        let err = draw(&[], &SeededRandom::new(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_unusable_weights_rejected() {
        let rng = SeededRandom::new(1);
        for bad in [f64::NAN, f64::INFINITY, -1.0] {
            let members = weighted(&[("a", 1.0), ("b", bad)]);
            assert!(matches!(draw(&members, &rng), Err(Error::InvalidInput(_))));
        }
        let zeros = weighted(&[("a", 0.0), ("b", 0.0)]);
        assert!(matches!(draw(&zeros, &rng), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_walk_selects_by_cumulative_weight() {
        let members = weighted(&[("a", 1.0), ("b", 2.0), ("c", 1.0)]);
        // total = 4.0; r = u * 4
        let cases = [(0.0, "a"), (0.2, "a"), (0.25, "a"), (0.3, "b"), (0.74, "b"), (0.8, "c"), (0.99, "c")];
        for (u, expected) in cases {
            let rng = FixedRandom::new(vec![u]);
            assert_eq!(draw(&members, &rng).unwrap(), expected, "u = {}", u);
        }
    }

    #[test]
    fn test_zero_weight_member_never_selected_mid_list() {
        let members = weighted(&[("a", 1.0), ("zero", 0.0), ("c", 1.0)]);
        let rng = SeededRandom::new(99);
        for _ in 0..1_000 {
            assert_ne!(draw(&members, &rng).unwrap(), "zero");
        }
    }

    #[test]
    fn test_rounding_overrun_falls_back_to_first() {
        let members = weighted(&[("first", 0.1), ("second", 0.2), ("third", 0.3)]);
        // A remainder that never reaches zero models accumulated rounding error
        assert_eq!(pick(&members, 10.0).name, "first");
    }

    #[test]
    fn test_suppressed_member_still_reachable() {
        let members = weighted(&[("a", 1.0), ("tiny", 0.001)]);
        // total = 1.001; u just below 1 lands in the tiny slot
        let rng = FixedRandom::new(vec![0.9999]);
        assert_eq!(draw(&members, &rng).unwrap(), "tiny");
    }
}
