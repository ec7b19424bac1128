//! Reversing the direction of paths.

use crate::path_builder::{Path, PathBuilder};
use crate::segment::Segment;

impl Path {
    /// Returns the path traversed backwards.
    ///
    /// Each subpath is reversed on its own and the subpaths stay in order.  An
    /// open subpath starts at its old end point.  A closed subpath starts at the
    /// same origin; its old closing line becomes the first segment, and the new
    /// last segment is left to the ClosePath when it is a line.
    pub fn reverse(&self) -> Path {
        let mut builder = PathBuilder::default();

        for subpath in self.iter_subpath() {
            let mut segments: Vec<Segment> =
                subpath.segments().iter().rev().map(Segment::reverse).collect();

            if subpath.is_closed() {
                let origin = subpath.origin();
                builder.move_to(origin.x, origin.y);

                if let Some(Segment::Line { .. }) = segments.last() {
                    segments.pop();
                }

                for segment in &segments {
                    segment.push_to(&mut builder);
                }

                builder.close_path();
            } else {
                let end = subpath.end_point();
                builder.move_to(end.x, end.y);

                for segment in &segments {
                    segment.push_to(&mut builder);
                }
            }
        }

        builder.into_path()
    }
}
