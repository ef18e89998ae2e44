// Copyright 2014 Google Inc.
// Copyright 2024 SWCanvas contributors
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// A simplified SkDashPathEffect/SkContourMeasure: operates directly on an
// already-flattened polyline rather than a recorded Path, since stroking
// always flattens its input before dashing.

use crate::point::Point;
use crate::scalar::Scalar;

/// A stroke dash pattern: alternating "on"/"off" lengths plus a phase
/// offset.
///
/// # Guarantees
///
/// - The pattern has an even, non-zero number of entries (an odd-length
///   input is duplicated, matching Canvas's `setLineDash`).
/// - Every entry is finite and `>= 0`.
/// - The sum of all entries is finite and `> 0`.
#[derive(Clone, PartialEq, Debug)]
pub struct StrokeDash {
    pattern: Vec<f32>,
    offset: f32,
    period: f32,
}

impl StrokeDash {
    /// Creates a dash pattern. Returns `None` when the array contains a
    /// negative or non-finite value, or when every entry is zero (the
    /// pattern would never toggle on/off and has no effect).
    pub fn new(mut array: Vec<f32>, offset: f32) -> Option<Self> {
        if array.is_empty() || !offset.is_finite() {
            return None;
        }
        if array.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return None;
        }
        if array.len() % 2 == 1 {
            let doubled = array.clone();
            array.extend(doubled);
        }

        let period: f32 = array.iter().sum();
        if period.is_nearly_zero() || !period.is_finite() {
            return None;
        }

        // Normalize the offset into [0, period) so the walk below never has
        // to special-case negative phases.
        let mut offset = offset % period;
        if offset < 0.0 {
            offset += period;
        }

        Some(StrokeDash { pattern: array, offset, period })
    }

    /// The normalized dash pattern (always even length).
    pub fn array(&self) -> &[f32] {
        &self.pattern
    }

    /// Walks `polyline` by arc length, emitting only the sub-polylines that
    /// fall within an "on" interval of the pattern.
    ///
    /// `closed` extends the dash phase across the join between the last and
    /// first point, matching how a closed stroked subpath dashes
    /// continuously through its closing edge.
    pub fn apply(&self, polyline: &[Point], closed: bool) -> Vec<Vec<Point>> {
        if polyline.len() < 2 {
            return Vec::new();
        }

        // Find which pattern index `self.offset` falls into, and how much
        // of that entry has already elapsed. An offset exactly on a
        // boundary starts the *next* entry.
        let mut remaining_in_entry = 0.0f32;
        let mut index = 0usize;
        let mut acc = 0.0f32;
        for (i, len) in self.pattern.iter().enumerate() {
            if self.offset < acc + len {
                index = i;
                remaining_in_entry = (acc + len) - self.offset;
                break;
            }
            acc += len;
            index = (i + 1) % self.pattern.len();
            remaining_in_entry = self.pattern[index];
        }

        let mut on = index % 2 == 0;
        let mut entry_remaining = remaining_in_entry.max(0.0);

        let mut out = Vec::new();
        let mut current: Vec<Point> = Vec::new();
        if on {
            current.push(polyline[0]);
        }

        let mut points = polyline.to_vec();
        if closed {
            points.push(polyline[0]);
        }

        for window in points.windows(2) {
            let (mut a, b) = (window[0], window[1]);
            let mut seg_len = a.distance(b);

            while seg_len > 0.0 {
                if entry_remaining >= seg_len {
                    entry_remaining -= seg_len;
                    if on {
                        current.push(b);
                    }
                    seg_len = 0.0;
                } else {
                    let t = entry_remaining / seg_len;
                    let split = Point::from_xy(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);

                    if on {
                        current.push(split);
                        out.push(std::mem::take(&mut current));
                    }

                    seg_len -= entry_remaining;
                    a = split;
                    on = !on;
                    index = (index + 1) % self.pattern.len();
                    entry_remaining = self.pattern[index];

                    if on {
                        current.push(split);
                    }

                    // Degenerate zero-length pattern entries keep toggling
                    // without consuming any arc length; bail rather than spin.
                    if entry_remaining.is_nearly_zero() && self.pattern.len() <= 1 {
                        break;
                    }
                }
            }
        }

        if on && current.len() >= 2 {
            out.push(current);
        }

        out.retain(|p| p.len() >= 2);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_all_zero_pattern() {
        assert!(StrokeDash::new(vec![0.0, 0.0], 0.0).is_none());
    }

    #[test]
    fn odd_length_is_doubled() {
        let dash = StrokeDash::new(vec![4.0, 2.0, 1.0], 0.0).unwrap();
        assert_eq!(dash.array(), &[4.0, 2.0, 1.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn simple_dash_produces_alternating_segments() {
        let dash = StrokeDash::new(vec![2.0, 2.0], 0.0).unwrap();
        let line = [Point::from_xy(0.0, 0.0), Point::from_xy(8.0, 0.0)];
        let segments = dash.apply(&line, false);
        // on:0-2, off:2-4, on:4-6, off:6-8
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0][0], Point::from_xy(0.0, 0.0));
        assert_eq!(segments[0][1], Point::from_xy(2.0, 0.0));
        assert_eq!(segments[1][0], Point::from_xy(4.0, 0.0));
        assert_eq!(segments[1][1], Point::from_xy(6.0, 0.0));
    }

    #[test]
    fn offset_exactly_on_boundary_starts_next_entry() {
        // offset == first "on" length must start the "off" entry, not
        // re-enter "on" at length zero.
        let dash = StrokeDash::new(vec![2.0, 2.0], 2.0).unwrap();
        let line = [Point::from_xy(0.0, 0.0), Point::from_xy(8.0, 0.0)];
        let segments = dash.apply(&line, false);
        // off:0-2(phase), on:2-4, off:4-6, on:6-8
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0][0], Point::from_xy(2.0, 0.0));
        assert_eq!(segments[0][1], Point::from_xy(4.0, 0.0));
    }
}
