//! Ordered start/waypoint/goal point sequence.
//!
//! A `PointSequence` is a value: every operation returns a new sequence and
//! leaves the receiver untouched, so callers can compare old and new lists.
//! With two or more points the first is always the start and the last the
//! goal; `order` always equals the array position.

use crate::point::{Point, PointPatch, PointType, clamp_comment};

/// Direction for [`PointSequence::move_point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSequence {
    points: Vec<Point>,
}

impl PointSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole sequence, e.g. when opening a saved route.
    ///
    /// Points are sorted by their stored `order`; roles and orders are then
    /// re-derived from position.
    pub fn load(mut points: Vec<Point>) -> Self {
        points.sort_by_key(|p| p.order);
        Self::from_positions(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Add a point and return the new sequence with the new point's id.
    ///
    /// The first point becomes the start, the second the goal, and every
    /// later point is inserted as the last waypoint before the goal.
    pub fn insert(&self, lat: f64, lng: f64, comment: Option<&str>) -> (Self, String) {
        let mut point = Point::new(lat, lng, PointType::Waypoint, self.points.len());
        if let Some(comment) = comment {
            point.comment = clamp_comment(comment);
        }
        let id = point.id.clone();

        let mut points = self.points.clone();
        match points.len() {
            0 => {
                point.point_type = PointType::Start;
                points.push(point);
            }
            1 => {
                point.point_type = PointType::Goal;
                points.push(point);
            }
            _ => match points.iter().position(|p| p.point_type == PointType::Goal) {
                Some(goal_index) => points.insert(goal_index, point),
                None => points.push(point),
            },
        }

        (Self::reorder(points), id)
    }

    /// Merge `patch` into the point with `id`. Unknown ids leave the
    /// sequence unchanged.
    pub fn update(&self, id: &str, patch: &PointPatch) -> Self {
        let mut points = self.points.clone();
        if let Some(point) = points.iter_mut().find(|p| p.id == id) {
            patch.apply(point);
        }
        Self { points }
    }

    /// Delete the point with `id` and re-derive every role and order, so a
    /// removed start or goal is replaced by the new first or last point.
    pub fn remove(&self, id: &str) -> Self {
        let remaining = self
            .points
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect();
        Self::from_positions(remaining)
    }

    /// Swap a waypoint with its neighbour in `direction`.
    ///
    /// Returns `None` when the id is unknown, the move would leave the
    /// sequence, or either point is not a waypoint. Start and goal never move.
    pub fn move_point(&self, id: &str, direction: Direction) -> Option<Self> {
        let current = self.points.iter().position(|p| p.id == id)?;
        let target = match direction {
            Direction::Up => current.checked_sub(1)?,
            Direction::Down => current + 1,
        };
        if target >= self.points.len() {
            return None;
        }
        if self.points[current].point_type != PointType::Waypoint
            || self.points[target].point_type != PointType::Waypoint
        {
            return None;
        }

        let mut points = self.points.clone();
        points.swap(current, target);
        Some(Self::reorder(points))
    }

    pub fn clear(&self) -> Self {
        Self::new()
    }

    pub fn has_start_and_goal(&self) -> bool {
        let has_start = self.points.iter().any(|p| p.point_type == PointType::Start);
        let has_goal = self.points.iter().any(|p| p.point_type == PointType::Goal);
        has_start && has_goal
    }

    fn reorder(mut points: Vec<Point>) -> Self {
        for (index, point) in points.iter_mut().enumerate() {
            point.order = index;
        }
        Self { points }
    }

    fn from_positions(mut points: Vec<Point>) -> Self {
        let len = points.len();
        for (index, point) in points.iter_mut().enumerate() {
            point.point_type = PointType::for_position(index, len);
            point.order = index;
        }
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(seq: &PointSequence) -> Vec<PointType> {
        seq.points().iter().map(|p| p.point_type).collect()
    }

    fn orders(seq: &PointSequence) -> Vec<usize> {
        seq.points().iter().map(|p| p.order).collect()
    }

    fn build(n: usize) -> (PointSequence, Vec<String>) {
        let mut seq = PointSequence::new();
        let mut ids = Vec::new();
        for i in 0..n {
            let (next, id) = seq.insert(35.0 + i as f64 * 0.01, 139.0, None);
            seq = next;
            ids.push(id);
        }
        (seq, ids)
    }

    fn assert_invariants(seq: &PointSequence) {
        let n = seq.len();
        assert_eq!(orders(seq), (0..n).collect::<Vec<_>>());
        if n == 1 {
            assert_eq!(seq.points()[0].point_type, PointType::Start);
        }
        if n >= 2 {
            let t = types(seq);
            assert_eq!(t.iter().filter(|t| **t == PointType::Start).count(), 1);
            assert_eq!(t.iter().filter(|t| **t == PointType::Goal).count(), 1);
            assert_eq!(t[0], PointType::Start);
            assert_eq!(t[n - 1], PointType::Goal);
        }
    }

    #[test]
    fn test_first_insert_is_start() {
        let (seq, id) = PointSequence::new().insert(35.0, 139.0, None);
        assert_eq!(types(&seq), vec![PointType::Start]);
        assert_eq!(seq.points()[0].id, id);
        assert_eq!(seq.points()[0].order, 0);
    }

    #[test]
    fn test_second_insert_is_goal() {
        let (seq, _) = build(2);
        assert_eq!(types(&seq), vec![PointType::Start, PointType::Goal]);
        assert_eq!(orders(&seq), vec![0, 1]);
    }

    #[test]
    fn test_third_insert_goes_before_goal() {
        let (seq, ids) = build(3);
        assert_eq!(
            types(&seq),
            vec![PointType::Start, PointType::Waypoint, PointType::Goal]
        );
        assert_eq!(seq.points()[1].id, ids[2]);
        assert_eq!(seq.points()[2].id, ids[1]);
    }

    #[test]
    fn test_later_inserts_become_last_waypoint() {
        let (seq, ids) = build(5);
        let order: Vec<&str> = seq.points().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec![&ids[0], &ids[2], &ids[3], &ids[4], &ids[1]]);
        assert_invariants(&seq);
    }

    #[test]
    fn test_insert_does_not_touch_receiver() {
        let (seq, _) = build(2);
        let before = seq.clone();
        let _ = seq.insert(36.0, 140.0, None);
        assert_eq!(seq, before);
    }

    #[test]
    fn test_insert_with_comment() {
        let (seq, id) = PointSequence::new().insert(35.0, 139.0, Some("駅"));
        assert_eq!(seq.find(&id).unwrap().comment, "駅");
        let (seq, id) = seq.insert(35.0, 139.0, None);
        assert_eq!(seq.find(&id).unwrap().comment, "");
    }

    #[test]
    fn test_update_merges_fields() {
        let (seq, ids) = build(2);
        let updated = seq.update(&ids[1], &PointPatch::location(36.0, 140.0));
        let point = updated.find(&ids[1]).unwrap();
        assert_eq!(point.location(), (36.0, 140.0));
        assert_eq!(point.point_type, PointType::Goal);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let (seq, _) = build(3);
        let updated = seq.update("missing", &PointPatch::comment("x"));
        assert_eq!(updated, seq);
    }

    #[test]
    fn test_remove_start_promotes_next() {
        let (seq, ids) = build(3);
        let removed = seq.remove(&ids[0]);
        assert_eq!(types(&removed), vec![PointType::Start, PointType::Goal]);
        assert_eq!(removed.points()[0].id, ids[2]);
        assert_invariants(&removed);
    }

    #[test]
    fn test_remove_goal_promotes_previous() {
        let (seq, ids) = build(3);
        let removed = seq.remove(&ids[1]);
        assert_eq!(types(&removed), vec![PointType::Start, PointType::Goal]);
        assert_eq!(removed.points()[1].id, ids[2]);
    }

    #[test]
    fn test_remove_down_to_one_point() {
        let (seq, ids) = build(2);
        let removed = seq.remove(&ids[0]);
        assert_eq!(types(&removed), vec![PointType::Start]);
        assert!(!removed.has_start_and_goal());
    }

    #[test]
    fn test_move_waypoint_up_and_down() {
        let (seq, ids) = build(4);
        // [start, w(ids2), w(ids3), goal]
        let moved = seq.move_point(&ids[3], Direction::Up).unwrap();
        assert_eq!(moved.points()[1].id, ids[3]);
        assert_eq!(moved.points()[2].id, ids[2]);
        assert_invariants(&moved);

        let back = moved.move_point(&ids[3], Direction::Down).unwrap();
        assert_eq!(back.points()[1].id, ids[2]);
        assert_eq!(back.points()[2].id, ids[3]);
    }

    #[test]
    fn test_start_and_goal_are_pinned() {
        let (seq, ids) = build(4);
        assert!(seq.move_point(&ids[0], Direction::Down).is_none());
        assert!(seq.move_point(&ids[1], Direction::Up).is_none());
        assert!(seq.move_point(&ids[0], Direction::Up).is_none());
    }

    #[test]
    fn test_waypoint_cannot_swap_with_start_or_goal() {
        let (seq, ids) = build(3);
        assert!(seq.move_point(&ids[2], Direction::Up).is_none());
        assert!(seq.move_point(&ids[2], Direction::Down).is_none());
    }

    #[test]
    fn test_move_unknown_id() {
        let (seq, _) = build(4);
        assert!(seq.move_point("missing", Direction::Up).is_none());
    }

    #[test]
    fn test_clear_and_has_start_and_goal() {
        let (seq, _) = build(3);
        assert!(seq.has_start_and_goal());
        let cleared = seq.clear();
        assert!(cleared.is_empty());
        assert!(!cleared.has_start_and_goal());
    }

    #[test]
    fn test_load_sorts_and_normalizes() {
        let (seq, ids) = build(3);
        let mut points = seq.into_points();
        points.reverse();
        points[0].point_type = PointType::Waypoint;
        let loaded = PointSequence::load(points);
        assert_eq!(loaded.points()[0].id, ids[0]);
        assert_invariants(&loaded);
    }

    #[test]
    fn test_invariants_hold_across_mixed_operations() {
        let (mut seq, mut ids) = build(6);
        seq = seq.move_point(&ids[4], Direction::Up).unwrap();
        assert_invariants(&seq);
        seq = seq.remove(&ids[0]);
        assert_invariants(&seq);
        seq = seq.remove(&ids[1]);
        assert_invariants(&seq);
        let (next, id) = seq.insert(35.5, 139.5, None);
        seq = next;
        ids.push(id);
        assert_invariants(&seq);
        assert_eq!(seq.len(), 5);
    }
}
