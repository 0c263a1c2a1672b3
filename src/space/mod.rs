//! Schedule spaces: lazy, exhaustive, symmetry-reduced enumeration of
//! concurrent test cases.
//!
//! A [`ScheduleSpace`] walks every distinct [`Schedule`] admitted by a
//! [`SpaceConfig`], without duplication and without omission up to the
//! configured symmetry reductions: when `thread_sym` is set, exactly one
//! representative of each thread-permutation equivalence class is emitted;
//! `generic_vals` additionally collapses value relabelings to a canonical
//! numbering. The sequence is finite, forward-only, and strictly
//! increasing in the composite order of the level hierarchy (see
//! [`core`]); there is no rewind.
//!
//! # Usage
//!
//! ```
//! use u_verify::config::SpaceConfig;
//! use u_verify::models::DsKind;
//! use u_verify::space::ScheduleSpace;
//!
//! let config = SpaceConfig::new(DsKind::Set)
//!     .with_nthread((1, 2))
//!     .with_nstep((1, 2))
//!     .with_npre_add((0, 1));
//! let space = ScheduleSpace::new(config).unwrap();
//! for schedule in space {
//!     assert!(schedule.is_consistent());
//! }
//! ```

mod core;

use crate::config::{ConfigError, SpaceConfig};
use crate::models::Schedule;

use self::core::SpaceCore;

/// An exhaustive enumerator over the canonical schedules of one
/// configuration.
///
/// Implements [`Iterator`]; `None` is the exhaustion signal, after which
/// the space stays exhausted. One instance is meant to be drained by a
/// single run (the dispatcher shares it behind a lock); it cannot be
/// restarted.
pub struct ScheduleSpace {
    core: Option<SpaceCore>,
}

impl ScheduleSpace {
    /// Validates `config` and positions the space at its first schedule.
    ///
    /// A valid configuration may still describe an empty space (for
    /// example when every thread count in range exceeds `nstep.hi`); the
    /// iterator is then exhausted from the start.
    pub fn new(config: SpaceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            core: SpaceCore::start(config),
        })
    }

    /// Whether no further schedules remain.
    pub fn is_exhausted(&self) -> bool {
        self.core.is_none()
    }
}

impl Iterator for ScheduleSpace {
    type Item = Schedule;

    fn next(&mut self) -> Option<Schedule> {
        let core = self.core.as_mut()?;
        let snapshot = core.snapshot();
        if !core.advance_past_current() {
            self.core = None;
        }
        Some(snapshot)
    }
}

impl std::fmt::Debug for ScheduleSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleSpace")
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::combinatorics::next_perm_hi;
    use crate::models::{DsKind, Op, Step};

    fn collect(config: SpaceConfig) -> Vec<Schedule> {
        ScheduleSpace::new(config).unwrap().collect()
    }

    /// Hashable identity of a schedule, ignoring the (unset) lease id.
    type Key = (usize, usize, Vec<Step>, Vec<Vec<Step>>);

    fn key(s: &Schedule) -> Key {
        (s.nthread, s.nstep, s.pre_adds.clone(), s.threads.clone())
    }

    fn assert_all_distinct_and_consistent(schedules: &[Schedule]) {
        let mut seen = HashSet::new();
        for s in schedules {
            assert!(s.is_consistent(), "inconsistent schedule {s}");
            assert!(s.threads.iter().all(|t| !t.is_empty()), "empty thread in {s}");
            assert!(seen.insert(key(s)), "duplicate schedule {s}");
        }
    }

    // ---- regression counts ------------------------------------------

    #[test]
    fn test_set_space_reference_count() {
        let config = SpaceConfig::new(DsKind::Set)
            .with_nthread((2, 2))
            .with_nstep((1, 3))
            .with_npre_add((0, 2))
            .with_value_bound(2)
            .with_thread_sym(true);
        let schedules = collect(config);
        assert_all_distinct_and_consistent(&schedules);
        assert_eq!(schedules.len(), 711);
    }

    #[test]
    fn test_set_space_without_thread_sym() {
        let config = SpaceConfig::new(DsKind::Set)
            .with_nthread((2, 2))
            .with_nstep((1, 3))
            .with_npre_add((0, 2))
            .with_value_bound(2)
            .with_thread_sym(false);
        let schedules = collect(config);
        assert_all_distinct_and_consistent(&schedules);
        assert_eq!(schedules.len(), 1404);
    }

    #[test]
    fn test_set_space_small_count() {
        let config = SpaceConfig::new(DsKind::Set)
            .with_nthread((1, 2))
            .with_nstep((1, 2))
            .with_npre_add((0, 1))
            .with_value_bound(2);
        assert_eq!(collect(config).len(), 126);
    }

    #[test]
    fn test_pqueue_space_reference_count() {
        let config = SpaceConfig::new(DsKind::PQueue)
            .with_nthread((1, 3))
            .with_nstep((1, 4))
            .with_npre_add((0, 1))
            .with_generic_vals(true)
            .with_distinct_priorities(true)
            .with_adds_dominate(true)
            .with_thread_sym(true)
            .with_no_all_add(true);
        let schedules = collect(config);
        assert_all_distinct_and_consistent(&schedules);
        assert_eq!(schedules.len(), 584);
    }

    #[test]
    fn test_pqueue_small_distinct_count() {
        let config = SpaceConfig::new(DsKind::PQueue)
            .with_nthread((1, 2))
            .with_nstep((1, 3))
            .with_npre_add((0, 1))
            .with_generic_vals(true)
            .with_distinct_priorities(true);
        assert_eq!(collect(config).len(), 160);
    }

    #[test]
    fn test_pqueue_non_generic_count() {
        let config = SpaceConfig::new(DsKind::PQueue)
            .with_nthread((2, 2))
            .with_nstep((2, 2))
            .with_npre_add((0, 0))
            .with_generic_vals(false);
        assert_eq!(collect(config).len(), 12);
    }

    #[test]
    fn test_queue_space_counts() {
        let config = SpaceConfig::new(DsKind::Queue)
            .with_nthread((1, 2))
            .with_nstep((1, 3))
            .with_npre_add((0, 1))
            .with_generic_vals(true)
            .with_adds_dominate(true);
        let schedules = collect(config);
        assert_all_distinct_and_consistent(&schedules);
        assert_eq!(schedules.len(), 35);

        let config = SpaceConfig::new(DsKind::Queue)
            .with_nthread((2, 2))
            .with_nstep((1, 2))
            .with_npre_add((0, 0))
            .with_generic_vals(false)
            .with_thread_sym(false);
        assert_eq!(collect(config).len(), 7);
    }

    // ---- filters and edge cases --------------------------------------

    #[test]
    fn test_no_all_add_survives_rejected_first_assignment() {
        // With a single 1-step thread and no pre-adds, the all-ADD start
        // is rejected outright; the lone REMOVE schedule must still come
        // out rather than the space reporting empty.
        let config = SpaceConfig::new(DsKind::PQueue)
            .with_nthread((1, 1))
            .with_nstep((1, 1))
            .with_npre_add((0, 0))
            .with_no_all_add(true);
        let schedules = collect(config);
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].threads, vec![vec![Step::remove()]]);
    }

    #[test]
    fn test_no_all_add_small_window_count() {
        let config = SpaceConfig::new(DsKind::PQueue)
            .with_nthread((1, 1))
            .with_nstep((1, 2))
            .with_npre_add((0, 1))
            .with_no_all_add(true);
        let schedules = collect(config);
        assert_all_distinct_and_consistent(&schedules);
        assert_eq!(schedules.len(), 14);
        // every concurrent step list contains at least one REMOVE
        for s in &schedules {
            assert!(s.threads.iter().flatten().any(|st| st.op == Op::Remove));
        }
    }

    #[test]
    fn test_adds_dominate_filter_holds() {
        let config = SpaceConfig::new(DsKind::Queue)
            .with_nthread((1, 2))
            .with_nstep((1, 3))
            .with_npre_add((0, 1))
            .with_adds_dominate(true);
        for s in collect(config) {
            let adds = s.pre_adds.len()
                + s.threads.iter().flatten().filter(|st| st.op == Op::Add).count();
            let removes = s.threads.iter().flatten().filter(|st| st.op == Op::Remove).count();
            assert!(adds >= removes, "adds do not dominate in {s}");
        }
    }

    #[test]
    fn test_nstep_lo_clamped_to_thread_count() {
        // nstep 1..3 with exactly two threads: counts 1 below the thread
        // count are clamped, not rejected, so enumeration starts at 2
        let config = SpaceConfig::new(DsKind::Set)
            .with_nthread((2, 2))
            .with_nstep((1, 3))
            .with_npre_add((0, 0))
            .with_value_bound(2);
        let schedules = collect(config);
        assert!(!schedules.is_empty());
        assert!(schedules.iter().all(|s| s.nstep >= 2 && s.nstep <= 3));
        assert!(schedules.iter().any(|s| s.nstep == 2));
    }

    #[test]
    fn test_thread_counts_beyond_nstep_hi_are_skipped() {
        // nthread may range past nstep.hi; those thread counts admit no
        // schedule and must be skipped silently.
        let config = SpaceConfig::new(DsKind::Set)
            .with_nthread((1, 3))
            .with_nstep((1, 2))
            .with_npre_add((0, 0))
            .with_value_bound(1);
        let schedules = collect(config);
        assert!(!schedules.is_empty());
        assert!(schedules.iter().all(|s| s.nthread <= 2));
    }

    #[test]
    fn test_set_pre_adds_are_canonical() {
        let config = SpaceConfig::new(DsKind::Set)
            .with_nthread((1, 1))
            .with_nstep((1, 1))
            .with_npre_add((2, 2))
            .with_value_bound(2);
        for s in collect(config) {
            assert_eq!(s.pre_adds, vec![Step::add(0), Step::add(1)]);
        }
    }

    #[test]
    fn test_generic_vals_number_adds_in_encounter_order() {
        let config = SpaceConfig::new(DsKind::Queue)
            .with_nthread((2, 2))
            .with_nstep((2, 3))
            .with_npre_add((1, 1))
            .with_generic_vals(true);
        for s in collect(config) {
            let added: Vec<u32> = s
                .pre_adds
                .iter()
                .chain(s.threads.iter().flatten())
                .filter(|st| st.op == Op::Add)
                .map(|st| st.value.unwrap())
                .collect();
            let expect: Vec<u32> = (0..added.len() as u32).collect();
            assert_eq!(added, expect, "non-canonical numbering in {s}");
        }
    }

    #[test]
    fn test_distinct_priorities_scores_are_permutations() {
        let config = SpaceConfig::new(DsKind::PQueue)
            .with_nthread((1, 2))
            .with_nstep((1, 3))
            .with_npre_add((0, 1))
            .with_distinct_priorities(true);
        for s in collect(config) {
            let mut scores: Vec<u32> = s
                .pre_adds
                .iter()
                .chain(s.threads.iter().flatten())
                .filter(|st| st.op == Op::Add)
                .map(|st| st.score.unwrap())
                .collect();
            scores.sort_unstable();
            let expect: Vec<u32> = (0..scores.len() as u32).collect();
            assert_eq!(scores, expect, "scores not a permutation in {s}");
        }
    }

    #[test]
    fn test_queue_steps_carry_queue_arity() {
        let config = SpaceConfig::new(DsKind::Queue)
            .with_nthread((1, 2))
            .with_nstep((1, 2))
            .with_npre_add((0, 1));
        for s in collect(config) {
            for st in s.threads.iter().flatten().chain(s.pre_adds.iter()) {
                match st.op {
                    Op::Add => assert!(st.value.is_some() && st.score.is_none()),
                    Op::Remove => assert!(st.value.is_none() && st.score.is_none()),
                    Op::Contains => panic!("CONTAINS emitted for a queue"),
                }
            }
        }
    }

    #[test]
    fn test_empty_nthread_range_yields_empty_space() {
        // inverted ranges never pass validation, but the core itself must
        // treat them as an exhausted space rather than panicking
        let cfg = SpaceConfig::new(DsKind::Set).with_nthread((2, 1));
        assert!(super::core::SpaceCore::start(cfg).is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected_before_construction() {
        let config = SpaceConfig::new(DsKind::Set).with_nstep((4, 2));
        assert!(ScheduleSpace::new(config).is_err());
    }

    // ---- symmetry soundness and completeness --------------------------
    //
    // The reduced enumeration must visit exactly one member of every
    // equivalence class the plain enumeration visits: no class missed, no
    // class visited twice. Classes are canonicalized by trying all thread
    // permutations (and renumbering values in encounter order under
    // generic_vals) and keeping the least key.

    fn canonical_key(s: &Schedule, generic_vals: bool) -> Key {
        let mut perm: Vec<u32> = (0..s.nthread as u32).collect();
        let mut best: Option<Key> = None;
        loop {
            let threads: Vec<Vec<Step>> = perm
                .iter()
                .map(|&i| s.threads[i as usize].clone())
                .collect();
            let (pre_adds, threads) = if generic_vals {
                renumber_values(&s.pre_adds, &threads)
            } else {
                (s.pre_adds.clone(), threads)
            };
            let cand = (s.nthread, s.nstep, pre_adds, threads);
            if best.as_ref().map_or(true, |b| cand < *b) {
                best = Some(cand);
            }
            if !next_perm_hi(&mut perm) {
                break;
            }
        }
        best.unwrap()
    }

    fn renumber_values(pre_adds: &[Step], threads: &[Vec<Step>]) -> (Vec<Step>, Vec<Vec<Step>>) {
        let mut map: Vec<(u32, u32)> = Vec::new();
        let mut renumber = |step: &Step| {
            let mut step = *step;
            if let Some(v) = step.value {
                let new = match map.iter().find(|(old, _)| *old == v) {
                    Some(&(_, new)) => new,
                    None => {
                        let new = map.len() as u32;
                        map.push((v, new));
                        new
                    }
                };
                step.value = Some(new);
            }
            step
        };
        let pre = pre_adds.iter().map(&mut renumber).collect();
        let ths = threads
            .iter()
            .map(|row| row.iter().map(&mut renumber).collect())
            .collect();
        (pre, ths)
    }

    fn cross_check_symmetry(config: SpaceConfig) {
        let generic = config.generic_vals && config.kind != DsKind::Set;
        let plain: HashSet<Key> = collect(config.clone().with_thread_sym(false))
            .iter()
            .map(|s| canonical_key(s, generic))
            .collect();
        let mut reduced = HashSet::new();
        for s in collect(config.with_thread_sym(true)) {
            let k = canonical_key(&s, generic);
            assert!(reduced.insert(k), "class visited twice: {s}");
        }
        assert_eq!(reduced, plain, "reduced enumeration misses or invents classes");
    }

    #[test]
    fn test_set_symmetry_cross_check() {
        cross_check_symmetry(
            SpaceConfig::new(DsKind::Set)
                .with_nthread((1, 3))
                .with_nstep((1, 4))
                .with_npre_add((0, 1))
                .with_value_bound(2),
        );
    }

    #[test]
    fn test_queue_symmetry_cross_check() {
        cross_check_symmetry(
            SpaceConfig::new(DsKind::Queue)
                .with_nthread((1, 3))
                .with_nstep((1, 3))
                .with_npre_add((0, 1))
                .with_generic_vals(true)
                .with_adds_dominate(true),
        );
        cross_check_symmetry(
            SpaceConfig::new(DsKind::Queue)
                .with_nthread((1, 3))
                .with_nstep((1, 3))
                .with_npre_add((0, 1))
                .with_generic_vals(false),
        );
    }

    #[test]
    fn test_pqueue_symmetry_cross_check() {
        cross_check_symmetry(
            SpaceConfig::new(DsKind::PQueue)
                .with_nthread((1, 3))
                .with_nstep((1, 3))
                .with_npre_add((0, 1))
                .with_generic_vals(true)
                .with_distinct_priorities(true),
        );
        cross_check_symmetry(
            SpaceConfig::new(DsKind::PQueue)
                .with_nthread((1, 2))
                .with_nstep((1, 3))
                .with_npre_add((0, 1))
                .with_generic_vals(true)
                .with_distinct_priorities(true)
                .with_adds_dominate(true)
                .with_no_all_add(true),
        );
    }
}
