//! Placing marker shapes at the vertices of a path.

use itertools::Itertools;

use crate::angle::Angle;
use crate::path_builder::Path;
use crate::point::Point;
use crate::segment::Segment;
use crate::transform::Transform;

/// Which template goes at a vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum MarkerType {
    Start,
    Middle,
    End,
}

/// Direction of a vertex given the segments that arrive at it and leave from it.
fn vertex_angle(incoming: Option<&Segment>, outgoing: Option<&Segment>) -> Angle {
    let incoming = incoming.map(|s| Angle::from_direction(s.end_tangent()));
    let outgoing = outgoing.map(|s| Angle::from_direction(s.start_tangent()));

    match (incoming, outgoing) {
        (Some(i), Some(o)) => i.bisect(o),
        (Some(i), None) => i,
        (None, Some(o)) => o,
        (None, None) => Angle::new(0.0),
    }
}

impl Path {
    /// Places copies of marker templates at the vertices of the path.
    ///
    /// Each template is drawn around its own origin, and is moved to the vertex
    /// and rotated to follow the direction of the path there.  At a vertex
    /// between two segments the direction is halfway between the incoming and
    /// the outgoing one.
    ///
    /// Open subpaths get `start` at their first vertex, `end` at their last one
    /// and `mid` at the vertices in between.  Closed subpaths get `mid` at every
    /// vertex, starting with their start point.  A subpath that draws nothing
    /// gets an unrotated `mid` at its start point.
    ///
    /// With `uniform`, copies of `mid` are not rotated.
    pub fn markers(&self, start: &Path, mid: &Path, end: &Path, uniform: bool) -> Vec<Path> {
        let mut markers = Vec::new();

        let mut place = |kind: MarkerType, at: Point, angle: Angle| {
            let (template, angle) = match kind {
                MarkerType::Start => (start, angle),
                MarkerType::Middle if uniform => (mid, Angle::new(0.0)),
                MarkerType::Middle => (mid, angle),
                MarkerType::End => (end, angle),
            };

            let t = Transform::new_translate(at.x, at.y).pre_rotate(angle);
            markers.push(template.transform(&t));
        };

        for subpath in self.iter_subpath() {
            let segments: Vec<Segment> = subpath
                .segments()
                .into_iter()
                .filter(|s| s.directionalities().is_some())
                .collect();

            let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
                place(MarkerType::Middle, subpath.origin(), Angle::new(0.0));
                continue;
            };

            if subpath.is_closed() {
                place(
                    MarkerType::Middle,
                    first.start(),
                    vertex_angle(Some(last), Some(first)),
                );
            } else {
                place(MarkerType::Start, first.start(), vertex_angle(None, Some(first)));
            }

            for (prev, next) in segments.iter().tuple_windows() {
                place(MarkerType::Middle, next.start(), vertex_angle(Some(prev), Some(next)));
            }

            if !subpath.is_closed() {
                place(MarkerType::End, last.end(), vertex_angle(Some(last), None));
            }
        }

        markers
    }
}
