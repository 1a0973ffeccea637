//! Bounded dataset history
//!
//! Retention is a pure decision: given every dataset ordered newest first and
//! a capacity, return the datasets to evict. Callers do the deleting.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Default number of datasets kept
pub const DEFAULT_MAX_DATASETS: usize = 5;

/// Creation metadata needed to rank datasets by recency
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatasetAge {
    pub id: i32,
    pub created_at: DateTime<Utc>,
}

/// Order datasets newest first.
///
/// Creation times can collide, so ties fall back to the identifier: a higher
/// identifier was inserted later.
pub fn rank_by_recency(mut datasets: Vec<DatasetAge>) -> Vec<i32> {
    datasets.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    datasets.into_iter().map(|d| d.id).collect()
}

/// Order datasets for retention right after inserting `newest`.
///
/// The dataset just created always ranks first, whatever its timestamp, so
/// it survives any capacity above zero. The rest follow [`rank_by_recency`].
pub fn rank_after_insert(newest: i32, existing: Vec<DatasetAge>) -> Vec<i32> {
    let others = existing.into_iter().filter(|d| d.id != newest).collect();
    let mut ranked = vec![newest];
    ranked.extend(rank_by_recency(others));
    ranked
}

/// Identifiers to evict so that only the `max_keep` most recent remain
pub fn enforce<I>(ids_by_recency_desc: &[I], max_keep: usize) -> BTreeSet<I>
where
    I: Ord + Copy,
{
    ids_by_recency_desc.iter().skip(max_keep).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid timestamp")
            + Duration::seconds(seconds)
    }

    #[test]
    fn test_enforce_under_capacity_keeps_all() {
        assert!(enforce(&[3, 2, 1], 5).is_empty());
        assert!(enforce(&[3, 2, 1], 3).is_empty());
        assert!(enforce::<i32>(&[], 0).is_empty());
    }

    #[test]
    fn test_enforce_evicts_oldest() {
        let evicted = enforce(&[7, 6, 5, 4, 3, 2, 1], 5);
        assert_eq!(evicted, BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_enforce_zero_evicts_everything() {
        assert_eq!(enforce(&[9, 8], 0), BTreeSet::from([8, 9]));
    }

    #[test]
    fn test_newest_is_never_evicted_with_capacity() {
        let ids: Vec<i32> = (1..=20).rev().collect();
        for max_keep in 1..25 {
            let evicted = enforce(&ids, max_keep);
            assert!(!evicted.contains(&20));
            assert_eq!(evicted.len(), ids.len().saturating_sub(max_keep));
        }
    }

    #[test]
    fn test_new_dataset_ranks_first_despite_older_timestamp() {
        let ranked = rank_after_insert(
            2,
            vec![
                DatasetAge { id: 1, created_at: at(300) },
                DatasetAge { id: 2, created_at: at(0) },
            ],
        );
        assert_eq!(ranked, vec![2, 1]);
        assert_eq!(enforce(&ranked, 1), BTreeSet::from([1]));
        assert_eq!(enforce(&ranked, 0), BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_rank_by_recency_breaks_ties_by_id() {
        let ranked = rank_by_recency(vec![
            DatasetAge { id: 1, created_at: at(0) },
            DatasetAge { id: 3, created_at: at(10) },
            DatasetAge { id: 2, created_at: at(10) },
            DatasetAge { id: 4, created_at: at(5) },
        ]);
        assert_eq!(ranked, vec![3, 2, 4, 1]);
    }
}
