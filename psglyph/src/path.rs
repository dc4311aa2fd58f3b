//! Device space glyph path.
//!
//! The path is an arena of segments indexed by position. The hint
//! applicator keeps indices into the arena and adjusts points in place as
//! stem hints become known.

use alloc::vec::Vec;

use crate::{
    flatten::{self, Curve},
    sink::PathSink,
    types::{BoundingBox, Fixed, Point},
    Error,
};

/// Largest number of segments [`Path::flatten`] will produce.
pub const MAX_FLATTENED_SEGMENTS: usize = 1 << 16;

/// Type of a path segment.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SegmentKind {
    /// First segment of a subpath. Carries the subpath's start point.
    Start,
    Line,
    /// Line back to the start point, produced by closing a subpath.
    LineClose,
    Curve { p1: Point<Fixed>, p2: Point<Fixed> },
}

/// A path segment ending at `pt`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Segment {
    pub kind: SegmentKind,
    pub pt: Point<Fixed>,
}

impl Segment {
    pub fn is_curve(&self) -> bool {
        matches!(self.kind, SegmentKind::Curve { .. })
    }
}

/// Whether the path has an open subpath.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum PathState {
    /// No current point.
    #[default]
    Empty,
    /// A current point exists but no segment has been drawn from it.
    MovePending,
    /// Segments are being appended to the current subpath.
    Open,
}

/// Snapshot of the current point and subpath state.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct OpenState {
    position: Point<Fixed>,
    state: PathState,
}

#[derive(Clone, Default, Debug)]
pub struct Path {
    segments: Vec<Segment>,
    /// Index of the start segment of the most recent subpath.
    current_start: Option<usize>,
    position: Point<Fixed>,
    state: PathState,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.current_start = None;
        self.position = Point::ZERO;
        self.state = PathState::Empty;
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segments_mut(&mut self) -> &mut [Segment] {
        &mut self.segments
    }

    pub fn position(&self) -> Point<Fixed> {
        self.position
    }

    pub fn state(&self) -> PathState {
        self.state
    }

    /// Returns true if the current subpath is open and has segments.
    pub fn is_drawing(&self) -> bool {
        self.state == PathState::Open
    }

    /// Returns the index of the start segment of the most recent subpath.
    pub fn current_subpath_start(&self) -> Option<usize> {
        self.current_start
    }

    /// Returns the start point of the most recent subpath.
    pub fn subpath_start_point(&self) -> Option<Point<Fixed>> {
        self.current_start.map(|ix| self.segments[ix].pt)
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    pub fn last_segment_mut(&mut self) -> Option<&mut Segment> {
        self.segments.last_mut()
    }

    /// Sets the current point. The next drawing operation begins a new
    /// subpath there.
    pub fn add_point(&mut self, p: Point<Fixed>) {
        self.position = p;
        self.state = PathState::MovePending;
    }

    pub fn add_line(&mut self, p: Point<Fixed>) -> Result<(), Error> {
        self.ensure_open()?;
        self.push(Segment {
            kind: SegmentKind::Line,
            pt: p,
        })
    }

    pub fn add_curve(
        &mut self,
        p1: Point<Fixed>,
        p2: Point<Fixed>,
        p3: Point<Fixed>,
    ) -> Result<(), Error> {
        self.ensure_open()?;
        self.push(Segment {
            kind: SegmentKind::Curve { p1, p2 },
            pt: p3,
        })
    }

    /// Closes the current subpath with a line back to its start point.
    ///
    /// Does nothing if there is no open subpath.
    pub fn close(&mut self) -> Result<(), Error> {
        if self.state != PathState::Open {
            return Ok(());
        }
        let Some(start) = self.subpath_start_point() else {
            return Err(Error::InvalidState);
        };
        self.push(Segment {
            kind: SegmentKind::LineClose,
            pt: start,
        })?;
        self.state = PathState::MovePending;
        Ok(())
    }

    /// Removes the last drawn segment of the open subpath, restoring the
    /// current point to the end of the segment before it.
    pub fn pop_segment(&mut self) -> Option<Segment> {
        let last = *self.segments.last()?;
        if last.kind == SegmentKind::Start || self.state != PathState::Open {
            return None;
        }
        self.segments.pop();
        if let Some(prev) = self.segments.last() {
            self.position = prev.pt;
        }
        Some(last)
    }

    /// Captures the current point and subpath state.
    pub fn save_open_state(&self) -> OpenState {
        OpenState {
            position: self.position,
            state: self.state,
        }
    }

    /// Restores a state captured by [`Path::save_open_state`], keeping any
    /// segments added since.
    pub fn restore_open_state(&mut self, saved: OpenState) {
        self.position = saved.position;
        self.state = saved.state;
    }

    /// Returns the bounds of all points, including curve control points.
    pub fn bbox(&self) -> Option<BoundingBox<Fixed>> {
        let mut iter = self.segments.iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox::from_point(first.pt);
        for seg in iter {
            if let SegmentKind::Curve { p1, p2 } = seg.kind {
                bbox.add_point(p1);
                bbox.add_point(p2);
            }
            bbox.add_point(seg.pt);
        }
        Some(bbox)
    }

    /// Emits the path to the given sink.
    pub fn replay(&self, sink: &mut impl PathSink) -> Result<(), Error> {
        for seg in &self.segments {
            match seg.kind {
                SegmentKind::Start => sink.add_point(seg.pt)?,
                SegmentKind::Line => sink.add_line(seg.pt)?,
                SegmentKind::LineClose => sink.close_subpath()?,
                SegmentKind::Curve { p1, p2 } => sink.add_curve(p1, p2, seg.pt)?,
            }
        }
        Ok(())
    }

    /// Returns a copy of the path with every curve replaced by a polyline
    /// approximating it within the given flatness.
    ///
    /// Fails with [`Error::Resource`] if the result would hold more than
    /// [`MAX_FLATTENED_SEGMENTS`] segments.
    pub fn flatten(&self, flatness: Fixed) -> Result<Path, Error> {
        let mut result = Path::new();
        let mut points = Vec::new();
        let mut current = Point::ZERO;
        for seg in &self.segments {
            match seg.kind {
                SegmentKind::Start => result.add_point(seg.pt),
                SegmentKind::Line => result.add_line(seg.pt)?,
                SegmentKind::LineClose => result.close()?,
                SegmentKind::Curve { p1, p2 } => {
                    points.clear();
                    let curve = Curve::new(p1, p2, seg.pt);
                    flatten::flatten_with_flatness(current, &curve, flatness, &mut points);
                    if result.len() + points.len() > MAX_FLATTENED_SEGMENTS {
                        return Err(Error::Resource("flattened path"));
                    }
                    for p in &points {
                        result.add_line(*p)?;
                    }
                }
            }
            current = seg.pt;
        }
        Ok(result)
    }

    fn ensure_open(&mut self) -> Result<(), Error> {
        if self.state != PathState::Open {
            let ix = self.segments.len();
            self.push(Segment {
                kind: SegmentKind::Start,
                pt: self.position,
            })?;
            self.current_start = Some(ix);
            self.state = PathState::Open;
        }
        Ok(())
    }

    fn push(&mut self, seg: Segment) -> Result<(), Error> {
        self.segments
            .try_reserve(1)
            .map_err(|_| Error::Resource("path segment"))?;
        self.segments.push(seg);
        self.position = seg.pt;
        Ok(())
    }
}

impl PathSink for Path {
    fn add_point(&mut self, p: Point<Fixed>) -> Result<(), Error> {
        Path::add_point(self, p);
        Ok(())
    }

    fn add_line(&mut self, p: Point<Fixed>) -> Result<(), Error> {
        Path::add_line(self, p)
    }

    fn add_curve(
        &mut self,
        c1: Point<Fixed>,
        c2: Point<Fixed>,
        end: Point<Fixed>,
    ) -> Result<(), Error> {
        Path::add_curve(self, c1, c2, end)
    }

    fn close_subpath(&mut self) -> Result<(), Error> {
        self.close()
    }

    fn current_point(&self) -> Option<Point<Fixed>> {
        (self.state != PathState::Empty).then_some(self.position)
    }

    fn bbox(&self) -> Option<BoundingBox<Fixed>> {
        Path::bbox(self)
    }
}
