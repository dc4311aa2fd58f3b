//! Path construction interface.

use core::fmt::{self, Write};

use alloc::string::String;

use crate::{
    types::{BoundingBox, Fixed, Point},
    Error,
};

/// Interface for accepting a sequence of path commands in device space.
///
/// Errors returned by a sink are propagated unchanged to the caller of the
/// operation that produced the command.
pub trait PathSink {
    /// Begins a new subpath at the given point.
    fn add_point(&mut self, p: Point<Fixed>) -> Result<(), Error>;

    /// Emits a line from the current point to the given point.
    fn add_line(&mut self, p: Point<Fixed>) -> Result<(), Error>;

    /// Emits a cubic Bezier curve from the current point.
    fn add_curve(
        &mut self,
        c1: Point<Fixed>,
        c2: Point<Fixed>,
        end: Point<Fixed>,
    ) -> Result<(), Error>;

    /// Closes the current subpath.
    fn close_subpath(&mut self) -> Result<(), Error>;

    /// Returns the current point, if any.
    fn current_point(&self) -> Option<Point<Fixed>> {
        None
    }

    /// Returns the bounds of everything emitted so far, if known.
    fn bbox(&self) -> Option<BoundingBox<Fixed>> {
        None
    }
}

/// Sink that drops all path output into the ether.
#[derive(Copy, Clone, Default, Debug)]
pub struct NullSink;

impl PathSink for NullSink {
    fn add_point(&mut self, _p: Point<Fixed>) -> Result<(), Error> {
        Ok(())
    }

    fn add_line(&mut self, _p: Point<Fixed>) -> Result<(), Error> {
        Ok(())
    }

    fn add_curve(
        &mut self,
        _c1: Point<Fixed>,
        _c2: Point<Fixed>,
        _end: Point<Fixed>,
    ) -> Result<(), Error> {
        Ok(())
    }

    fn close_subpath(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Sink that generates SVG style path data.
#[derive(Clone, Default, Debug)]
pub struct SvgSink {
    data: String,
    precision: Option<usize>,
    current: Option<Point<Fixed>>,
}

impl SvgSink {
    /// Creates a new SVG sink that formats values with the standard
    /// floating point behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new SVG sink with the given precision (the number of
    /// digits that will be printed after the decimal).
    pub fn with_precision(precision: usize) -> Self {
        Self {
            precision: Some(precision),
            ..Default::default()
        }
    }

    /// Clears the content of the internal string.
    pub fn clear(&mut self) {
        self.data.clear();
        self.current = None;
    }

    fn push_command(&mut self, cmd: char, points: &[Point<Fixed>]) {
        if !self.data.is_empty() {
            self.data.push(' ');
        }
        self.data.push(cmd);
        for (i, p) in points.iter().enumerate() {
            if i != 0 {
                self.data.push(' ');
            }
            let (x, y) = (p.x.to_f64(), p.y.to_f64());
            let _ = if let Some(prec) = self.precision {
                write!(self.data, "{x:.0$},{y:.0$}", prec)
            } else {
                write!(self.data, "{x},{y}")
            };
        }
    }
}

impl core::ops::Deref for SvgSink {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.data.as_str()
    }
}

impl PathSink for SvgSink {
    fn add_point(&mut self, p: Point<Fixed>) -> Result<(), Error> {
        self.push_command('M', &[p]);
        self.current = Some(p);
        Ok(())
    }

    fn add_line(&mut self, p: Point<Fixed>) -> Result<(), Error> {
        self.push_command('L', &[p]);
        self.current = Some(p);
        Ok(())
    }

    fn add_curve(
        &mut self,
        c1: Point<Fixed>,
        c2: Point<Fixed>,
        end: Point<Fixed>,
    ) -> Result<(), Error> {
        self.push_command('C', &[c1, c2, end]);
        self.current = Some(end);
        Ok(())
    }

    fn close_subpath(&mut self) -> Result<(), Error> {
        self.push_command('Z', &[]);
        Ok(())
    }

    fn current_point(&self) -> Option<Point<Fixed>> {
        self.current
    }
}

impl fmt::Display for SvgSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data)
    }
}
