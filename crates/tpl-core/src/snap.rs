//! Snap resolver: picks at most one guideline per axis.
//!
//! Each axis is resolved independently. A candidate is eligible when its
//! distance to the raw coordinate is strictly below the threshold; among
//! eligible candidates the nearest wins, and exact ties go to the higher
//! [`GuideKind::priority`].

use crate::coords::PixelPoint;
use crate::guides::{GuideAxis, GuideKind, Guideline};
use crate::id::FieldId;
use serde::{Deserialize, Serialize};

/// The guideline that captured one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGuide {
    pub value: f64,
    pub kind: GuideKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<FieldId>,
}

impl From<&Guideline> for ResolvedGuide {
    fn from(line: &Guideline) -> Self {
        Self {
            value: line.value,
            kind: line.kind,
            owner: line.owner,
        }
    }
}

/// Outcome of snapping one raw position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapResult {
    pub position: PixelPoint,
    pub x: Option<ResolvedGuide>,
    pub y: Option<ResolvedGuide>,
}

impl SnapResult {
    /// Raw position, nothing snapped.
    pub fn passthrough(raw: PixelPoint) -> Self {
        Self {
            position: raw,
            x: None,
            y: None,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    /// Either axis landed on a grid line. This is the single source for
    /// the informational `snapToGrid` flag on commit.
    pub fn snapped_to_grid(&self) -> bool {
        [self.x, self.y]
            .iter()
            .flatten()
            .any(|g| g.kind == GuideKind::Grid)
    }
}

/// Resolve `raw` against `guides` using a pixel `threshold`.
pub fn resolve_snap(raw: PixelPoint, guides: &[Guideline], threshold: f64) -> SnapResult {
    let x = best_on_axis(raw.x, guides, GuideAxis::X, threshold);
    let y = best_on_axis(raw.y, guides, GuideAxis::Y, threshold);
    let result = SnapResult {
        position: PixelPoint::new(
            x.map_or(raw.x, |g| g.value),
            y.map_or(raw.y, |g| g.value),
        ),
        x,
        y,
    };
    log::trace!(
        "snap ({:.2}, {:.2}) -> ({:.2}, {:.2}) x={:?} y={:?}",
        raw.x,
        raw.y,
        result.position.x,
        result.position.y,
        x.map(|g| g.kind),
        y.map(|g| g.kind)
    );
    result
}

fn best_on_axis(
    raw: f64,
    guides: &[Guideline],
    axis: GuideAxis,
    threshold: f64,
) -> Option<ResolvedGuide> {
    let mut best: Option<(f64, &Guideline)> = None;
    for line in guides.iter().filter(|l| l.axis == axis) {
        let distance = (raw - line.value).abs();
        if distance.is_nan() || distance >= threshold {
            continue;
        }
        let better = match best {
            None => true,
            Some((best_distance, best_line)) => {
                distance < best_distance
                    || (distance == best_distance && line.kind.priority() > best_line.kind.priority())
            }
        };
        if better {
            best = Some((distance, line));
        }
    }
    best.map(|(_, line)| ResolvedGuide::from(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ImageSize;
    use crate::guides::{GuideParams, generate_guides};
    use crate::model::Field;

    fn line(axis: GuideAxis, value: f64, kind: GuideKind) -> Guideline {
        Guideline::new(axis, value, kind)
    }

    #[test]
    fn tie_goes_to_center_over_grid() {
        let guides = [
            line(GuideAxis::X, 100.0, GuideKind::Grid),
            line(GuideAxis::X, 110.0, GuideKind::Center),
        ];
        let r = resolve_snap(PixelPoint::new(105.0, 0.0), &guides, 10.0);
        assert_eq!(r.position.x, 110.0);
        assert_eq!(r.x.map(|g| g.kind), Some(GuideKind::Center));
    }

    #[test]
    fn tie_order_does_not_depend_on_candidate_order() {
        let guides = [
            line(GuideAxis::Y, 110.0, GuideKind::Center),
            line(GuideAxis::Y, 100.0, GuideKind::Grid),
        ];
        let r = resolve_snap(PixelPoint::new(0.0, 105.0), &guides, 10.0);
        assert_eq!(r.y.map(|g| g.kind), Some(GuideKind::Center));
    }

    #[test]
    fn nearer_low_priority_beats_farther_high_priority() {
        let guides = [
            line(GuideAxis::X, 100.0, GuideKind::Grid),
            line(GuideAxis::X, 108.0, GuideKind::Center),
        ];
        let r = resolve_snap(PixelPoint::new(101.0, 0.0), &guides, 10.0);
        assert_eq!(r.position.x, 100.0);
        assert_eq!(r.x.map(|g| g.kind), Some(GuideKind::Grid));
    }

    #[test]
    fn candidate_at_threshold_is_excluded() {
        let guides = [line(GuideAxis::X, 110.0, GuideKind::Center)];
        let at = resolve_snap(PixelPoint::new(100.0, 0.0), &guides, 10.0);
        assert_eq!(at.x, None);
        assert_eq!(at.position.x, 100.0);

        let inside = resolve_snap(PixelPoint::new(101.0, 0.0), &guides, 10.0);
        assert_eq!(inside.position.x, 110.0);
    }

    #[test]
    fn axes_snap_independently() {
        let guides = [line(GuideAxis::X, 50.0, GuideKind::Grid)];
        let r = resolve_snap(PixelPoint::new(52.0, 333.0), &guides, 10.0);
        assert_eq!(r.position, PixelPoint::new(50.0, 333.0));
        assert!(r.x.is_some());
        assert!(r.y.is_none());
    }

    #[test]
    fn grid_flag_comes_from_resolver_decision() {
        let guides = [
            line(GuideAxis::X, 500.0, GuideKind::Center),
            line(GuideAxis::Y, 50.0, GuideKind::Grid),
        ];
        assert!(resolve_snap(PixelPoint::new(499.0, 52.0), &guides, 10.0).snapped_to_grid());
        assert!(!resolve_snap(PixelPoint::new(499.0, 70.0), &guides, 10.0).snapped_to_grid());
    }

    #[test]
    fn empty_template_snaps_to_grid_then_center() {
        let params = GuideParams {
            image: ImageSize::new(1000.0, 1000.0),
            grid_size: 50.0,
            grid_enabled: true,
        };
        let guides = generate_guides(&[], None, &params);
        let r = resolve_snap(PixelPoint::new(504.0, 48.0), &guides, 10.0);
        assert_eq!(r.position, PixelPoint::new(500.0, 50.0));
        // x = 500 is both a grid line and the center line; center wins the tie
        assert_eq!(r.x.map(|g| g.kind), Some(GuideKind::Center));
        assert_eq!(r.y.map(|g| g.kind), Some(GuideKind::Grid));
    }

    #[test]
    fn snaps_to_other_field_center() {
        let params = GuideParams {
            image: ImageSize::new(1000.0, 1000.0),
            grid_size: 50.0,
            grid_enabled: true,
        };
        let fields = vec![
            Field::image(crate::id::FieldId(1), "a").at(20.0, 20.0),
            Field::image(crate::id::FieldId(2), "b").at(60.0, 60.0),
        ];
        let guides = generate_guides(&fields, Some(crate::id::FieldId(2)), &params);
        let r = resolve_snap(PixelPoint::new(205.0, 400.0), &guides, 10.0);
        assert_eq!(r.position, PixelPoint::new(200.0, 400.0));
        assert_eq!(r.x.map(|g| g.kind), Some(GuideKind::FieldCenter));
        assert_eq!(r.x.and_then(|g| g.owner), Some(crate::id::FieldId(1)));
        assert_eq!(r.y.map(|g| g.kind), Some(GuideKind::Grid));
    }
}
