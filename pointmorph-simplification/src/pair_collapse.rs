//! Nearest-pair collapse decimation
//!
//! The point cloud analogue of greedy edge collapse: the closest pair of
//! live points is repeatedly merged into its midpoint. Candidates sit in a
//! min-priority queue keyed by squared distance and are re-evaluated lazily
//! when one of their endpoints has moved or been removed. Nearest neighbour
//! queries go through an R*-tree that is kept in sync with the live points.

use crate::{check_removal, Decimator};
use priority_queue::PriorityQueue;
use pointmorph_core::{Point3f, PointCloud3f, Result};
use rstar::primitives::GeomWithData;
use rstar::RTree;
use std::cmp::Ordering;

type IndexedPoint = GeomWithData<[f32; 3], usize>;

// ============================================================
// Pair Cost for Priority Queue
// ============================================================

#[derive(Debug, Clone)]
struct PairCost {
    a: usize,
    b: usize,
    stamp_a: u32,
    stamp_b: u32,
    /// Squared distance between `a` and `b` when the candidate was queued
    cost: f32,
}

impl PartialEq for PairCost {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal
    }
}
impl Eq for PairCost {}

impl PartialOrd for PairCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PairCost {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: smallest cost first
        other.cost.total_cmp(&self.cost)
    }
}

// ============================================================
// Live point set
// ============================================================

struct LivePoints {
    positions: Vec<Point3f>,
    alive: Vec<bool>,
    /// Bumped whenever a point moves, invalidating queued candidates
    stamps: Vec<u32>,
    tree: RTree<IndexedPoint>,
}

impl LivePoints {
    fn new(cloud: &PointCloud3f) -> Self {
        let positions = cloud.points.clone();
        let items = positions
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x, p.y, p.z], i))
            .collect();
        Self {
            alive: vec![true; positions.len()],
            stamps: vec![0; positions.len()],
            tree: RTree::bulk_load(items),
            positions,
        }
    }

    fn item(&self, i: usize) -> IndexedPoint {
        let p = self.positions[i];
        GeomWithData::new([p.x, p.y, p.z], i)
    }

    /// Closest other live point to `i`
    fn nearest(&self, i: usize) -> Option<(usize, f32)> {
        let p = self.positions[i];
        self.tree
            .nearest_neighbor_iter(&[p.x, p.y, p.z])
            .find(|candidate| candidate.data != i)
            .map(|candidate| {
                let j = candidate.data;
                (j, (self.positions[j] - p).norm_squared())
            })
    }

    /// Merge `drop` into `keep` at their midpoint
    fn collapse(&mut self, keep: usize, drop: usize) {
        let keep_item = self.item(keep);
        let drop_item = self.item(drop);
        self.tree.remove(&keep_item);
        self.tree.remove(&drop_item);

        self.positions[keep] = nalgebra::center(&self.positions[keep], &self.positions[drop]);
        self.stamps[keep] = self.stamps[keep].wrapping_add(1);
        self.alive[drop] = false;

        self.tree.insert(self.item(keep));
    }

    fn into_cloud(self) -> PointCloud3f {
        self.positions
            .into_iter()
            .zip(self.alive)
            .filter_map(|(p, alive)| alive.then_some(p))
            .collect()
    }
}

// ============================================================
// Pair Collapse Decimator
// ============================================================

/// Greedy nearest-pair collapse decimator.
///
/// Each collapse keeps the lower of the two indices, so surviving points
/// keep their relative order.
#[derive(Debug, Clone, Default)]
pub struct PairCollapseDecimator {
    /// Stop early once the closest remaining pair is farther apart than this
    pub max_distance: Option<f32>,
}

impl PairCollapseDecimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(max_distance: Option<f32>) -> Self {
        Self { max_distance }
    }

    fn push_candidate(
        live: &LivePoints,
        queue: &mut PriorityQueue<usize, PairCost>,
        next_id: &mut usize,
        a: usize,
    ) {
        if let Some((b, cost)) = live.nearest(a) {
            queue.push(
                *next_id,
                PairCost {
                    a,
                    b,
                    stamp_a: live.stamps[a],
                    stamp_b: live.stamps[b],
                    cost,
                },
            );
            *next_id += 1;
        }
    }
}

impl Decimator for PairCollapseDecimator {
    fn decimate(&self, cloud: &PointCloud3f, remove: usize) -> Result<PointCloud3f> {
        check_removal(cloud, remove)?;
        if remove == 0 {
            return Ok(cloud.clone());
        }

        let mut live = LivePoints::new(cloud);
        let mut queue = PriorityQueue::new();
        let mut next_id = 0usize;
        for i in 0..cloud.len() {
            Self::push_candidate(&live, &mut queue, &mut next_id, i);
        }

        let max_cost = self.max_distance.map(|d| d * d);
        let mut removed = 0usize;

        while removed < remove {
            let Some((_, pair)) = queue.pop() else {
                break;
            };
            if !live.alive[pair.a] {
                continue;
            }
            if !live.alive[pair.b]
                || live.stamps[pair.a] != pair.stamp_a
                || live.stamps[pair.b] != pair.stamp_b
            {
                Self::push_candidate(&live, &mut queue, &mut next_id, pair.a);
                continue;
            }
            if let Some(max_cost) = max_cost {
                if pair.cost > max_cost {
                    break;
                }
            }

            let (keep, drop) = (pair.a.min(pair.b), pair.a.max(pair.b));
            live.collapse(keep, drop);
            removed += 1;
            Self::push_candidate(&live, &mut queue, &mut next_id, keep);
        }

        if removed < remove {
            log::warn!(
                "pair collapse removed {} of {} requested points",
                removed,
                remove
            );
        }
        log::debug!(
            "pair collapse: {} -> {} points",
            cloud.len(),
            cloud.len() - removed
        );

        Ok(live.into_cloud())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_line(n: usize, spacing: f32) -> PointCloud3f {
        (0..n)
            .map(|i| Point3f::new(i as f32 * spacing, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn test_zero_removal_is_identity() {
        let cloud = make_line(5, 1.0);
        let result = PairCollapseDecimator::new().decimate(&cloud, 0).unwrap();
        assert_eq!(result, cloud);
    }

    #[test]
    fn test_too_many_removals_rejected() {
        let cloud = make_line(3, 1.0);
        assert!(PairCollapseDecimator::new().decimate(&cloud, 4).is_err());
    }

    #[test]
    fn test_closest_pair_collapses_first() {
        let cloud = PointCloud3f::from_points(vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(10.0, 0.0, 0.0),
            Point3f::new(10.2, 0.0, 0.0),
            Point3f::new(20.0, 0.0, 0.0),
        ]);
        let result = PairCollapseDecimator::new().decimate(&cloud, 1).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[0], Point3f::new(0.0, 0.0, 0.0));
        assert_relative_eq!(result[1].x, 10.1, epsilon = 1e-5);
        assert_eq!(result[2], Point3f::new(20.0, 0.0, 0.0));
    }

    #[test]
    fn test_exact_count_without_threshold() {
        let cloud = make_line(50, 0.5);
        let result = PairCollapseDecimator::new().decimate(&cloud, 20).unwrap();
        assert_eq!(result.len(), 30);
    }

    #[test]
    fn test_survivors_keep_relative_order() {
        let cloud = make_line(40, 1.0);
        let result = PairCollapseDecimator::new().decimate(&cloud, 15).unwrap();
        for pair in result.points.windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
    }

    #[test]
    fn test_max_distance_stops_early() {
        let cloud = PointCloud3f::from_points(vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(0.1, 0.0, 0.0),
            Point3f::new(5.0, 0.0, 0.0),
            Point3f::new(10.0, 0.0, 0.0),
        ]);
        let decimator = PairCollapseDecimator::with_params(Some(1.0));
        let result = decimator.decimate(&cloud, 3).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_duplicate_points_collapse() {
        let cloud = PointCloud3f::from_points(vec![Point3f::new(1.0, 1.0, 1.0); 6]);
        let result = PairCollapseDecimator::new().decimate(&cloud, 5).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0], Point3f::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_cannot_collapse_past_single_point() {
        let cloud = make_line(3, 1.0);
        let result = PairCollapseDecimator::new().decimate(&cloud, 3).unwrap();
        assert_eq!(result.len(), 1);
    }
}
