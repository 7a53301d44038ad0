//! Arc-length parameterization of an enemy path
//!
//! A [`PathModel`] turns an ordered list of waypoints into two piecewise
//! affine functions of distance traveled, one per axis. Lookups are a binary
//! search over the cumulative lengths followed by two line evaluations.
//!
//! The tables carry one sentinel on each side of the real segments:
//! - index 0 is a constant at the first waypoint with cumulative length `0`
//! - the last index is a constant at the final waypoint with length `+inf`
//!
//! so out-of-range queries clamp to the path ends instead of extrapolating.

use crate::affine::AffineLine;
use crate::error::PathError;
use crate::geometry::Point;
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct PathModel {
    waypoints: Vec<Point>,
    cumulative_lengths: Vec<f64>,
    segments_x: Vec<AffineLine>,
    segments_y: Vec<AffineLine>,
}

impl PathModel {
    /// Builds the segment tables for `waypoints`.
    ///
    /// Consecutive duplicate waypoints are collapsed before fitting, so a
    /// zero-length step never reaches [`AffineLine::from_points`]. A path that
    /// collapses to a single waypoint is a valid constant path of length 0.
    pub fn new(mut waypoints: Vec<Point>) -> Result<Self, PathError> {
        if waypoints.is_empty() {
            return Err(PathError::EmptyPath);
        }
        if let Some(index) = waypoints.iter().position(|p| !p.is_finite()) {
            return Err(PathError::NonFiniteWaypoint { index });
        }

        let supplied = waypoints.len();
        waypoints.dedup();
        if waypoints.len() != supplied {
            debug!(
                "Collapsed {} duplicate waypoint(s) in path of {}",
                supplied - waypoints.len(),
                supplied
            );
        }

        let capacity = waypoints.len() + 1;
        let mut cumulative_lengths = Vec::with_capacity(capacity);
        let mut segments_x = Vec::with_capacity(capacity);
        let mut segments_y = Vec::with_capacity(capacity);

        let first = waypoints[0];
        cumulative_lengths.push(0.0);
        segments_x.push(AffineLine::constant(first.x));
        segments_y.push(AffineLine::constant(first.y));

        let mut length = 0.0;
        for pair in waypoints.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            let next = length + prev.distance(&curr);
            if !next.is_finite() {
                return Err(PathError::NonFiniteLength {
                    index: cumulative_lengths.len(),
                });
            }

            segments_x.push(AffineLine::from_points(length, prev.x, next, curr.x)?);
            segments_y.push(AffineLine::from_points(length, prev.y, next, curr.y)?);
            cumulative_lengths.push(next);
            length = next;
        }

        let last = waypoints[waypoints.len() - 1];
        cumulative_lengths.push(f64::INFINITY);
        segments_x.push(AffineLine::constant(last.x));
        segments_y.push(AffineLine::constant(last.y));

        debug!(
            "Built path with {} waypoints, length {:.3}",
            waypoints.len(),
            length
        );

        Ok(Self {
            waypoints,
            cumulative_lengths,
            segments_x,
            segments_y,
        })
    }

    /// Total arc length, excluding the `+inf` sentinel.
    pub fn path_length(&self) -> f64 {
        self.cumulative_lengths[self.cumulative_lengths.len() - 2]
    }

    /// Returns the position reached after traveling `length` along the path.
    ///
    /// Lengths at or below zero resolve to the first waypoint, lengths past
    /// the end to the last one. NaN resolves to the first waypoint. A length
    /// that lands exactly on a waypoint returns that waypoint verbatim.
    pub fn point_along_path(&self, length: f64) -> Point {
        let idx = self.segment_index(length);
        // cumulative_lengths[i] is the distance to waypoints[i] for every real entry
        if idx < self.waypoints.len() && self.cumulative_lengths[idx] == length {
            return self.waypoints[idx];
        }
        Point {
            x: self.segments_x[idx].evaluate(length),
            y: self.segments_y[idx].evaluate(length),
        }
    }

    /// `count` points evenly spaced by arc length, both ends included.
    pub fn sample(&self, count: usize) -> Vec<Point> {
        match count {
            0 => Vec::new(),
            1 => vec![self.point_along_path(0.0)],
            _ => {
                let step = self.path_length() / (count - 1) as f64;
                (0..count)
                    .map(|i| self.point_along_path(i as f64 * step))
                    .collect()
            }
        }
    }

    /// Waypoints after duplicate collapsing.
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    /// Distance to each waypoint, padded with `0` in front and `+inf` at the end.
    pub fn cumulative_lengths(&self) -> &[f64] {
        &self.cumulative_lengths
    }

    /// X coordinate as a function of arc length, index-aligned with the lengths.
    pub fn segments_x(&self) -> &[AffineLine] {
        &self.segments_x
    }

    /// Y coordinate as a function of arc length, index-aligned with the lengths.
    pub fn segments_y(&self) -> &[AffineLine] {
        &self.segments_y
    }

    // Leftmost index whose cumulative length is >= length. An exact hit picks
    // the matching entry, a miss picks the first entry strictly greater.
    fn segment_index(&self, length: f64) -> usize {
        self.cumulative_lengths.partition_point(|&c| c < length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn l_path() -> PathModel {
        PathModel::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_shapes() {
        let path = l_path();
        assert_eq!(path.cumulative_lengths().len(), 4);
        assert_eq!(path.segments_x().len(), 4);
        assert_eq!(path.segments_y().len(), 4);
        assert_eq!(path.cumulative_lengths()[0], 0.0);
        assert_eq!(path.cumulative_lengths()[3], f64::INFINITY);
        assert!(path
            .cumulative_lengths()
            .windows(2)
            .all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_l_path_queries() {
        let path = l_path();
        assert_eq!(path.path_length(), 20.0);
        assert_eq!(path.point_along_path(0.0), Point::new(0.0, 0.0));
        assert_eq!(path.point_along_path(10.0), Point::new(10.0, 0.0));

        let mid = path.point_along_path(15.0);
        assert_approx_eq!(mid.x, 10.0, 1e-12);
        assert_approx_eq!(mid.y, 5.0, 1e-12);

        assert_eq!(path.point_along_path(-5.0), Point::new(0.0, 0.0));
        assert_eq!(path.point_along_path(1000.0), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_infinite_and_nan_queries_clamp() {
        let path = l_path();
        assert_eq!(path.point_along_path(f64::NEG_INFINITY), Point::new(0.0, 0.0));
        assert_eq!(path.point_along_path(f64::INFINITY), Point::new(10.0, 10.0));
        assert_eq!(path.point_along_path(f64::NAN), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_diagonal_segment() {
        let path = PathModel::new(vec![Point::new(1.0, 1.0), Point::new(4.0, 5.0)]).unwrap();
        assert_approx_eq!(path.path_length(), 5.0, 1e-12);

        let p = path.point_along_path(2.5);
        assert_approx_eq!(p.x, 2.5, 1e-12);
        assert_approx_eq!(p.y, 3.0, 1e-12);
    }

    #[test]
    fn test_distance_matches_length_on_straight_segment() {
        let path = PathModel::new(vec![
            Point::new(0.0, 0.0),
            Point::new(6.0, 8.0),
            Point::new(6.0, 20.0),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let (lo, hi) = if rng.gen_bool(0.5) {
                (0.0, 10.0)
            } else {
                (10.0, 22.0)
            };
            let a: f64 = rng.gen_range(lo..hi);
            let b: f64 = rng.gen_range(lo..hi);
            let (l1, l2) = if a < b { (a, b) } else { (b, a) };

            let p1 = path.point_along_path(l1);
            let p2 = path.point_along_path(l2);
            assert_approx_eq!(p1.distance(&p2), l2 - l1, 1e-9);
        }
    }

    #[test]
    fn test_out_of_range_lengths_clamp_to_ends() {
        let path = l_path();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let below: f64 = rng.gen_range(-1e6..0.0);
            let above: f64 = rng.gen_range(20.0001..1e6);
            assert_eq!(path.point_along_path(below), Point::new(0.0, 0.0));
            assert_eq!(path.point_along_path(above), Point::new(10.0, 10.0));
        }
    }

    #[test]
    fn test_single_waypoint_is_constant() {
        let path = PathModel::new(vec![Point::new(3.0, 4.0)]).unwrap();
        assert_eq!(path.path_length(), 0.0);
        assert_eq!(path.cumulative_lengths().len(), 2);

        for length in [-10.0, 0.0, 0.5, 1e9] {
            assert_eq!(path.point_along_path(length), Point::new(3.0, 4.0));
        }
    }

    #[test]
    fn test_duplicate_waypoints_are_collapsed() {
        let path = PathModel::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ])
        .unwrap();

        assert_eq!(path.waypoints().len(), 3);
        assert_eq!(path.path_length(), 20.0);
        assert_eq!(path.point_along_path(10.0), Point::new(10.0, 0.0));

        let p = path.point_along_path(5.0);
        assert!(p.x.is_finite() && p.y.is_finite());
        assert_approx_eq!(p.x, 5.0, 1e-12);
    }

    #[test]
    fn test_all_duplicates_collapse_to_single_point() {
        let path = PathModel::new(vec![Point::new(2.0, 2.0); 4]).unwrap();
        assert_eq!(path.path_length(), 0.0);
        assert_eq!(path.point_along_path(3.0), Point::new(2.0, 2.0));
    }

    #[test]
    fn test_revisiting_a_point_is_not_collapsed() {
        let path = PathModel::new(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(path.waypoints().len(), 3);
        assert_eq!(path.path_length(), 10.0);

        let p = path.point_along_path(7.5);
        assert_approx_eq!(p.x, 2.5, 1e-12);
    }

    #[test]
    fn test_empty_path_is_rejected() {
        assert_eq!(PathModel::new(Vec::new()), Err(PathError::EmptyPath));
    }

    #[test]
    fn test_non_finite_waypoint_is_rejected() {
        let result = PathModel::new(vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)]);
        assert_eq!(result, Err(PathError::NonFiniteWaypoint { index: 1 }));
    }

    #[test]
    fn test_queries_on_waypoints_are_exact() {
        let mut rng = StdRng::seed_from_u64(1000);

        for _ in 0..1000 {
            let waypoints: Vec<Point> = (0..4)
                .map(|_| Point::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)))
                .collect();
            let path = PathModel::new(waypoints.clone()).unwrap();

            assert_eq!(path.point_along_path(path.path_length()), waypoints[3]);
            for (i, waypoint) in waypoints.iter().enumerate() {
                let length = path.cumulative_lengths()[i];
                assert_eq!(path.point_along_path(length), *waypoint);
            }
        }
    }

    #[test]
    fn test_tiny_step_is_kept() {
        let path = PathModel::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1e-200, 0.0),
            Point::new(5.0, 0.0),
        ])
        .unwrap();

        assert_eq!(path.waypoints().len(), 3);
        assert_eq!(path.path_length(), 5.0);
        assert_eq!(path.point_along_path(5.0), Point::new(5.0, 0.0));
    }

    #[test]
    fn test_huge_coordinates_keep_finite_length() {
        let path = PathModel::new(vec![Point::new(0.0, 0.0), Point::new(1e200, 0.0)]).unwrap();
        assert_eq!(path.path_length(), 1e200);

        let mid = path.point_along_path(5e199);
        assert_approx_eq!(mid.x / 1e200, 0.5, 1e-12);
        assert_eq!(mid.y, 0.0);
    }

    #[test]
    fn test_overflowing_length_is_rejected() {
        let result = PathModel::new(vec![
            Point::new(0.0, 0.0),
            Point::new(f64::MAX, 0.0),
            Point::new(0.0, 0.0),
        ]);
        assert_eq!(result, Err(PathError::NonFiniteLength { index: 2 }));
    }

    #[test]
    fn test_step_lost_to_rounding_is_degenerate() {
        let result = PathModel::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1e17, 0.0),
            Point::new(1e17, 1.0),
        ]);
        assert!(matches!(result, Err(PathError::DegenerateSegment { .. })));
    }

    #[test]
    fn test_sample() {
        let path = l_path();
        assert!(path.sample(0).is_empty());
        assert_eq!(path.sample(1), vec![Point::new(0.0, 0.0)]);

        let points = path.sample(5);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_approx_eq!(points[2].x, 10.0, 1e-12);
        assert_approx_eq!(points[2].y, 0.0, 1e-12);
        assert_approx_eq!(points[4].x, 10.0, 1e-12);
        assert_approx_eq!(points[4].y, 10.0, 1e-12);
    }
}
