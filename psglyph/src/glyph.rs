//! Rendering of complete glyphs.
//!
//! [`render_glyph`] drives an [`Interpreter`] through every intervention
//! point and collects the result into an [`Outline`].

use crate::{
    charstring::{Interpreter, Status},
    hint::FontHints,
    params::FontHintParams,
    path::Path,
    provider::GlyphDataProvider,
    settings::RenderSettings,
    sink::PathSink,
    types::{BoundingBox, Fixed, GlyphId, Matrix, Point},
    Error,
};

/// Side bearing and advance overrides for a glyph, such as those from a
/// font's `Metrics` dictionary.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct GlyphMetrics {
    pub lsb: Option<Point<Fixed>>,
    pub width: Option<Point<Fixed>>,
}

/// A rendered glyph.
#[derive(Clone, Debug)]
pub struct Outline {
    /// Device space path. Curves are kept as curves.
    pub path: Path,
    /// Left side bearing in character space.
    pub lsb: Point<Fixed>,
    /// Advance width in character space.
    pub width: Point<Fixed>,
    /// Device space position of the next glyph origin.
    pub advance: Point<Fixed>,
    /// Flatness selected for the device transform, in device pixels.
    pub flatness: f64,
    /// Amount by which a rasterizer should widen the fill.
    pub fill_adjust: Fixed,
}

impl Outline {
    pub fn bbox(&self) -> Option<BoundingBox<Fixed>> {
        self.path.bbox()
    }

    /// Emits the outline to the given sink.
    pub fn draw(&self, sink: &mut impl PathSink) -> Result<(), Error> {
        self.path.replay(sink)
    }

    /// Returns the outline with curves replaced by line segments at the
    /// outline's flatness.
    pub fn flatten(&self) -> Result<Path, Error> {
        self.path.flatten(Fixed::from_f64(self.flatness))
    }
}

/// Renders the glyph with the given identifier.
///
/// OtherSubrs that the interpreter does not implement are dispatched to
/// [`GlyphDataProvider::other_subr`].
pub fn render_glyph<'a, P>(
    provider: &mut P,
    params: &'a FontHintParams,
    hints: &'a FontHints,
    matrix: &Matrix,
    settings: &RenderSettings,
    gid: GlyphId,
) -> Result<Outline, Error>
where
    P: GlyphDataProvider<'a>,
{
    let data = provider
        .glyph_data(gid)
        .ok_or(Error::MissingGlyph(gid.to_u32()))?;
    render_charstring(
        provider,
        params,
        hints,
        matrix,
        settings,
        data,
        GlyphMetrics::default(),
    )
}

/// Renders a charstring, applying the given metric overrides.
pub fn render_charstring<'a, P>(
    provider: &mut P,
    params: &'a FontHintParams,
    hints: &'a FontHints,
    matrix: &Matrix,
    settings: &RenderSettings,
    data: &'a [u8],
    metrics: GlyphMetrics,
) -> Result<Outline, Error>
where
    P: GlyphDataProvider<'a>,
{
    let mut interp = Interpreter::new(params, hints, matrix, settings);
    if let Some(lsb) = metrics.lsb {
        interp.set_lsb(lsb);
    }
    if let Some(width) = metrics.width {
        interp.set_width(width);
    }
    let mut status = interp.interpret(provider, Some(data))?;
    loop {
        match status {
            Status::Done => break,
            Status::NeedSbw => {}
            Status::CallOtherSubr(index) => provider.other_subr(index)?,
        }
        status = interp.interpret(provider, None)?;
    }
    let lsb = interp.lsb();
    let width = interp.width();
    let flatness = interp.flatness();
    let fill_adjust = interp.fill_adjust();
    let path = interp.into_path();
    Ok(Outline {
        advance: path.position(),
        path,
        lsb,
        width,
        flatness,
        fill_adjust,
    })
}

/// Returns an iterator over the glyphs of a provider, in the order given
/// by [`GlyphDataProvider::next_glyph`].
pub fn glyph_ids<'a, 'p, P>(provider: &'p P) -> impl Iterator<Item = GlyphId> + 'p
where
    P: GlyphDataProvider<'a>,
{
    let mut cursor = Some(0);
    core::iter::from_fn(move || {
        let (gid, next) = provider.next_glyph(cursor?)?;
        // a cursor that does not advance would never terminate
        cursor = (next > cursor?).then_some(next);
        Some(gid)
    })
}
