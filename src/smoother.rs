//! Turns raw contact samples into smooth path segments.
//!
//! Each sample becomes a quadratic curve whose control point is the previous
//! raw sample, unless the three points fold back on themselves sharply enough
//! that the curve would loop; then a straight-line pair is used instead.

use std::f32::consts::PI;

use egui::{Pos2, Rect};

use crate::stroke::Segment;

/// Angles at the control point below this produce a line correction
pub const CORRECTION_ANGLE: f32 = PI / 20.0;

/// Extra margin around the dirty rect beyond half the line width
const DIRTY_MARGIN: f32 = 1.0;

/// Output of one smoothing step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed {
    pub segment: Segment,
    /// Region that must be repainted to show `segment`
    pub dirty_rect: Rect,
}

/// Smooth one sample.
///
/// `anchor` is the stroke's current terminal point, `raw_end` the desired end
/// point and `raw_control` the previous raw sample.
pub fn smooth_segment(anchor: Pos2, raw_end: Pos2, raw_control: Pos2, line_width: f32) -> Smoothed {
    let segment = match control_angle(anchor, raw_end, raw_control) {
        Some(angle) if !needs_correction(angle) => Segment::Quad {
            control: raw_control,
            to: raw_end,
        },
        _ => Segment::Lines {
            via: raw_control,
            to: raw_end,
        },
    };

    log::trace!("smoothed {:?} -> {:?}", anchor, segment);

    Smoothed {
        segment,
        dirty_rect: dirty_rect(&[anchor, raw_control, raw_end], line_width),
    }
}

/// Angle at `raw_control` between the rays to `anchor` and `raw_end`, in `[0, π]`.
///
/// `None` when either ray has zero length and the angle is undefined.
pub fn control_angle(anchor: Pos2, raw_end: Pos2, raw_control: Pos2) -> Option<f32> {
    let v1 = anchor - raw_control;
    let v2 = raw_end - raw_control;
    let lengths = v1.length() * v2.length();
    if lengths == 0.0 || !lengths.is_finite() {
        return None;
    }

    let cos = v1.dot(v2) / lengths;
    if !cos.is_finite() {
        return None;
    }
    Some(cos.clamp(-1.0, 1.0).acos())
}

/// Strictly below the threshold; exactly `CORRECTION_ANGLE` keeps the curve
pub fn needs_correction(angle: f32) -> bool {
    angle < CORRECTION_ANGLE
}

/// Bounding box of `points` grown by half the line width plus a pixel
pub fn dirty_rect(points: &[Pos2], line_width: f32) -> Rect {
    let rect = Rect::from_points(points);
    rect.expand(line_width / 2.0 + DIRTY_MARGIN)
}
