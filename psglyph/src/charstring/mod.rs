//! Charstring interpretation.
//!
//! A single [`Interpreter`] executes both Type 1 charstrings (from
//! PostScript Type 1 fonts) and Type 2 charstrings (from CFF fonts),
//! producing a hinted device space [`Path`].
//!
//! Interpretation may stop before the glyph is complete to ask the caller
//! for help. See [`Status`] for the protocol.

#[cfg(feature = "libm")]
#[allow(unused_imports)]
use core_maths::*;

mod decrypt;
mod stack;
mod type1;
mod type2;

use alloc::vec::Vec;

pub use decrypt::{decrypt, eexec_decrypt, Cipher, CHARSTRING_SEED, EEXEC_SEED};
pub use stack::{Stack, MAX_STACK};

use crate::{
    hint::{FontHints, GlyphStems, PathHintState},
    params::{CharstringType, FontHintParams},
    path::{OpenState, Path, SegmentKind},
    provider::GlyphDataProvider,
    settings::RenderSettings,
    types::{Fixed, FixedCoeff, Matrix, Point},
    Error,
};

/// Maximum depth of the subroutine call stack, including the glyph's own
/// charstring.
///
/// See "Appendix B Type 2 Charstring Implementation Limits" at
/// <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf#page=33>
pub const NESTING_DEPTH_LIMIT: usize = 10;

/// Number of points collected by a Type 1 Flex sequence.
pub const MAX_FLEX_POINTS: usize = 8;

/// Size of the Type 2 transient array.
pub const TRANSIENT_ARRAY_SIZE: usize = 32;

/// Ends of a closing line closer than this on both axes are merged.
const CLOSE_EPSILON: Fixed = Fixed::from_bits(25);

/// Outcome of a call to [`Interpreter::interpret`] that did not fail.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Status {
    /// The glyph is complete.
    Done,
    /// The side bearing and width are known. The caller may inspect or
    /// override them and must then resume with `interpret(None)`.
    NeedSbw,
    /// The charstring called an OtherSubr the interpreter does not
    /// implement. Its arguments have been pushed to the provider. The
    /// caller must run it and resume with `interpret(None)`; results are
    /// retrieved with the `pop` operator.
    CallOtherSubr(i32),
}

/// Lifecycle of an [`Interpreter`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum State {
    Idle,
    Running,
    AwaitingSbw,
    AwaitingOtherSubr,
    Completed,
    Failed,
}

/// Progress of the side bearing initialization.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Init {
    /// No side bearing operator has executed.
    AwaitingSbw,
    /// The side bearing is known and will be applied on resume.
    SbwPending,
    Done,
}

/// Saved state for composing a glyph from a base and an accent.
#[derive(Copy, Clone, Debug)]
struct Seac {
    accent: u8,
    /// Accent side bearing relative to the composite side bearing.
    save_asb: Fixed,
    /// Accent displacement.
    save_adxy: Point<Fixed>,
    /// Side bearing of the composite glyph.
    save_lsb: Point<Fixed>,
}

#[derive(Copy, Clone, Debug)]
enum SeacPhase {
    None,
    Base(Seac),
    Accent,
}

/// Points collected by a Type 1 Flex sequence.
#[derive(Copy, Clone, Default, Debug)]
struct Flex {
    /// Number of collected points, zero outside of Flex.
    count: usize,
    points: [Point<Fixed>; MAX_FLEX_POINTS],
    /// Path state when the sequence began.
    saved: Option<OpenState>,
}

impl Flex {
    fn is_active(&self) -> bool {
        self.count != 0
    }
}

/// Execution position within a charstring.
#[derive(Copy, Clone, Default, Debug)]
struct Frame<'a> {
    data: &'a [u8],
    pos: usize,
    cipher: Option<Cipher>,
}

impl<'a> Frame<'a> {
    /// Begins a charstring, skipping `len_iv` leading bytes if it is
    /// encrypted.
    fn new(data: &'a [u8], len_iv: i32) -> Self {
        let Ok(skip) = usize::try_from(len_iv) else {
            return Self {
                data,
                pos: 0,
                cipher: None,
            };
        };
        let mut cipher = Cipher::new(CHARSTRING_SEED);
        for byte in data.iter().take(skip) {
            cipher.decrypt(*byte);
        }
        Self {
            data,
            pos: skip,
            cipher: Some(cipher),
        }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(match &mut self.cipher {
            Some(cipher) => cipher.decrypt(byte),
            None => byte,
        })
    }
}

/// Charstring interpreter for a single glyph.
///
/// The lifetime `'a` is that of the font data and hint tables.
pub struct Interpreter<'a> {
    params: &'a FontHintParams,
    hints: &'a FontHints,
    matrix: Matrix,
    fc: FixedCoeff,
    settings: RenderSettings,
    state: State,
    init: Init,
    stack: Stack,
    frames: [Frame<'a>; NESTING_DEPTH_LIMIT],
    depth: usize,
    /// Frame position before the most recent opcode byte.
    mark: Frame<'a>,
    path: Path,
    /// Current point in device space.
    pt: Point<Fixed>,
    /// Device position of the character origin.
    origin: Point<Fixed>,
    lsb: Point<Fixed>,
    width: Point<Fixed>,
    sb_set: bool,
    width_set: bool,
    /// Offsets applied while drawing a seac accent.
    asb_diff: Fixed,
    adxy: Point<Fixed>,
    seac: SeacPhase,
    flex: Flex,
    ignore_pops: usize,
    stems: GlyphStems,
    path_hints: PathHintState,
    transient: [Fixed; TRANSIENT_ARRAY_SIZE],
    /// Registry 0, initialized from the weight vector.
    registry: Vec<f64>,
    random_seed: u32,
    /// The Type 2 width operand has been checked for the current
    /// charstring.
    width_parsed: bool,
    steps: usize,
    flatness: f64,
    fill_adjust: Fixed,
}

impl<'a> Interpreter<'a> {
    /// Creates an interpreter for one glyph.
    ///
    /// `hints` should be computed for the same parameters and the linear
    /// part of `matrix`. It is ignored when hinting is disabled in
    /// `settings`.
    pub fn new(
        params: &'a FontHintParams,
        hints: &'a FontHints,
        matrix: &Matrix,
        settings: &RenderSettings,
    ) -> Self {
        let hints = if settings.hinting {
            hints
        } else {
            &FontHints::UNHINTED
        };
        let origin = matrix.translation_fixed();
        let mut path = Path::new();
        path.add_point(origin);
        Self {
            params,
            hints,
            matrix: *matrix,
            fc: matrix.fixed_coeff(),
            settings: *settings,
            state: State::Idle,
            init: Init::AwaitingSbw,
            stack: Stack::new(),
            frames: [Frame::default(); NESTING_DEPTH_LIMIT],
            depth: 0,
            mark: Frame::default(),
            path,
            pt: origin,
            origin,
            lsb: Point::ZERO,
            width: Point::ZERO,
            sb_set: false,
            width_set: false,
            asb_diff: Fixed::ZERO,
            adxy: Point::ZERO,
            seac: SeacPhase::None,
            flex: Flex::default(),
            ignore_pops: 0,
            stems: GlyphStems::default(),
            path_hints: PathHintState::new(),
            transient: [Fixed::ZERO; TRANSIENT_ARRAY_SIZE],
            registry: params.weight_vector.clone(),
            random_seed: 0x2545_f491,
            width_parsed: false,
            steps: 0,
            flatness: compute_flatness(matrix, settings.flatness),
            fill_adjust: Fixed::ZERO,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Presets the left side bearing, overriding the charstring's value.
    pub fn set_lsb(&mut self, lsb: Point<Fixed>) {
        self.lsb = lsb;
        self.sb_set = true;
    }

    /// Presets the advance width, overriding the charstring's value.
    pub fn set_width(&mut self, width: Point<Fixed>) {
        self.width = width;
        self.width_set = true;
    }

    /// Left side bearing in character space.
    pub fn lsb(&self) -> Point<Fixed> {
        self.lsb
    }

    /// Advance width in character space.
    pub fn width(&self) -> Point<Fixed> {
        self.width
    }

    /// Flatness selected for the device transform, in device pixels.
    pub fn flatness(&self) -> f64 {
        self.flatness
    }

    /// Fill adjustment selected at the end of the glyph.
    pub fn fill_adjust(&self) -> Fixed {
        self.fill_adjust
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consumes the interpreter, returning the path.
    pub fn into_path(self) -> Path {
        self.path
    }

    /// Runs the interpreter until the glyph completes or the caller must
    /// intervene.
    ///
    /// The first call must supply the glyph's charstring; calls resuming
    /// after [`Status::NeedSbw`] or [`Status::CallOtherSubr`] must pass
    /// `None`.
    pub fn interpret<P>(&mut self, provider: &mut P, data: Option<&'a [u8]>) -> Result<Status, Error>
    where
        P: GlyphDataProvider<'a>,
    {
        match (self.state, data) {
            (State::Idle, Some(data)) => {
                self.frames[0] = Frame::new(data, self.params.len_iv);
                self.depth = 1;
            }
            (State::AwaitingSbw | State::AwaitingOtherSubr, None) => {
                if self.init == Init::SbwPending {
                    self.finish_init();
                }
            }
            _ => {
                self.state = State::Failed;
                return Err(Error::InvalidState);
            }
        }
        self.state = State::Running;
        let result = match self.params.charstring_type {
            CharstringType::Type1 => self.run_type1(provider),
            CharstringType::Type2 => self.run_type2(provider),
        };
        self.state = match &result {
            Ok(Status::Done) => State::Completed,
            Ok(Status::NeedSbw) => State::AwaitingSbw,
            Ok(Status::CallOtherSubr(_)) => State::AwaitingOtherSubr,
            Err(e) => {
                log::debug!("charstring failed: {e}");
                State::Failed
            }
        };
        result
    }

    /// Moves to the side bearing point once it is known.
    fn finish_init(&mut self) {
        self.pt = self.origin;
        self.accum(self.lsb);
        self.path.add_point(self.pt);
        self.init = Init::Done;
    }

    /// Reads the next opcode or operand lead byte, returning from
    /// subroutines that have run off their end.
    fn next_op_byte(&mut self) -> Result<u8, Error> {
        loop {
            let frame = &mut self.frames[self.depth - 1];
            if !frame.is_done() {
                self.mark = *frame;
                return frame.next_byte().ok_or(Error::UnexpectedEnd);
            }
            if self.depth == 1 {
                return Err(Error::UnexpectedEnd);
            }
            self.depth -= 1;
        }
    }

    /// Reads a byte that continues the current operand or operator.
    fn next_byte(&mut self) -> Result<u8, Error> {
        self.frames[self.depth - 1]
            .next_byte()
            .ok_or(Error::UnexpectedEnd)
    }

    /// Restores the position to the start of the most recent opcode so
    /// that it executes again on resume.
    ///
    /// The opcode is only charged once against the step budget.
    fn rewind(&mut self) {
        self.frames[self.depth - 1] = self.mark;
        self.steps = self.steps.saturating_sub(1);
    }

    /// Decodes the operand introduced by the given byte, which must be 32
    /// or greater.
    fn read_number(&mut self, b0: u8) -> Result<Fixed, Error> {
        Ok(match b0 {
            32..=246 => Fixed::from_i32(b0 as i32 - 139),
            247..=250 => {
                let b1 = self.next_byte()?;
                Fixed::from_i32((b0 as i32 - 247) * 256 + b1 as i32 + 108)
            }
            251..=254 => {
                let b1 = self.next_byte()?;
                Fixed::from_i32(-(b0 as i32 - 251) * 256 - b1 as i32 - 108)
            }
            _ => {
                let mut bytes = [0u8; 4];
                for byte in &mut bytes {
                    *byte = self.next_byte()?;
                }
                let value = i32::from_be_bytes(bytes);
                match self.params.charstring_type {
                    CharstringType::Type1 => {
                        Fixed::checked_from_i32(value).ok_or(Error::IntegerOverflow(value))?
                    }
                    // 16.16 fixed point, truncated rather than rounded
                    // to 24.8 so outlines match other Type 2 renderers
                    CharstringType::Type2 => Fixed::from_bits(value >> 8),
                }
            }
        })
    }

    /// Counts an executed operator against the step budget.
    fn step(&mut self) -> Result<(), Error> {
        self.steps += 1;
        if self.steps > self.settings.step_limit {
            return Err(Error::StepLimitExceeded);
        }
        Ok(())
    }

    fn call_subr<P>(&mut self, provider: &P, is_global: bool) -> Result<(), Error>
    where
        P: GlyphDataProvider<'a>,
    {
        let bias = if is_global {
            self.params.gsubr_bias
        } else {
            self.params.subr_bias
        };
        let index = self.stack.pop_i32()?.wrapping_add(bias);
        let data = provider
            .subr_data(index, is_global)
            .ok_or(Error::MissingSubroutine(index))?;
        if self.depth >= NESTING_DEPTH_LIMIT {
            return Err(Error::NestingDepthLimitExceeded);
        }
        log::trace!("call {} subr {index}", if is_global { "global" } else { "local" });
        self.frames[self.depth] = Frame::new(data, self.params.len_iv);
        self.depth += 1;
        Ok(())
    }

    fn return_from_subr(&mut self) -> Result<(), Error> {
        if self.depth <= 1 {
            return Err(Error::ReturnWithoutCall);
        }
        self.depth -= 1;
        Ok(())
    }

    /// Replaces the call stack with a new top level charstring.
    fn restart(&mut self, data: &'a [u8]) {
        self.frames[0] = Frame::new(data, self.params.len_iv);
        self.depth = 1;
    }

    /// Moves the current point by a character space distance.
    fn accum(&mut self, d: Point<Fixed>) {
        self.pt += self.fc.transform_distance(d);
    }

    fn accum_x(&mut self, dx: Fixed) {
        self.accum(Point::new(dx, Fixed::ZERO));
    }

    fn accum_y(&mut self, dy: Fixed) {
        self.accum(Point::new(Fixed::ZERO, dy));
    }

    fn apply_hints(&mut self, closing: bool) {
        if !self.settings.hinting {
            return;
        }
        self.path_hints
            .apply(self.hints, &mut self.stems, &mut self.path, closing);
    }

    /// Starts a new subpath at the current point.
    fn moveto(&mut self) {
        if (self.path_hints.is_pending() || self.path.is_drawing()) && !self.flex.is_active() {
            self.apply_hints(true);
        }
        self.path.add_point(self.pt);
    }

    /// Closes any open subpath and then starts a new one at the current
    /// point, as Type 2 charstrings do implicitly.
    fn close_and_moveto(&mut self) -> Result<(), Error> {
        let open = self.path.is_drawing();
        if open {
            self.path.close()?;
        }
        if open || self.path_hints.is_pending() {
            self.apply_hints(true);
        }
        self.path.add_point(self.pt);
        Ok(())
    }

    fn lineto(&mut self) -> Result<(), Error> {
        self.path.add_line(self.pt)
    }

    fn rrcurveto(&mut self, d: [Fixed; 6]) -> Result<(), Error> {
        let a0 = self.path.position() - self.pt;
        self.accum(Point::new(d[0], d[1]));
        let p1 = self.pt + a0;
        self.accum(Point::new(d[2], d[3]));
        let p2 = self.pt;
        self.accum(Point::new(d[4], d[5]));
        self.path.add_curve(p1, p2, self.pt)
    }

    /// Closes the current subpath, dropping a closing line too short to
    /// matter.
    fn closepath(&mut self) -> Result<(), Error> {
        if self.path.is_drawing() {
            if let (Some(start), Some(last)) =
                (self.path.subpath_start_point(), self.path.last_segment().copied())
            {
                let d = last.pt - start;
                if d.x.abs() < CLOSE_EPSILON && d.y.abs() < CLOSE_EPSILON {
                    match last.kind {
                        SegmentKind::Line => {
                            self.path.pop_segment();
                            self.path_hints.truncate(self.path.len());
                        }
                        SegmentKind::Curve { .. } => {
                            if let Some(seg) = self.path.last_segment_mut() {
                                seg.pt = start;
                                if let SegmentKind::Curve { p2, .. } = &mut seg.kind {
                                    *p2 -= d;
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
        self.path.close()?;
        self.path.add_point(self.pt);
        self.apply_hints(true);
        Ok(())
    }

    fn add_hstem(&mut self, y: Fixed, dy: Fixed) -> Result<(), Error> {
        let index = self.stems.num_hints;
        self.add_hstem_at(y, dy, index)
    }

    fn add_hstem_at(&mut self, y: Fixed, dy: Fixed, index: usize) -> Result<(), Error> {
        let y = y + self.lsb.y + self.adxy.y;
        self.stems
            .add_hstem(self.hints, &self.fc, self.origin, y, dy, index)
    }

    fn add_vstem(&mut self, x: Fixed, dx: Fixed) -> Result<(), Error> {
        let index = self.stems.num_hints;
        self.add_vstem_at(x, dx, index)
    }

    fn add_vstem_at(&mut self, x: Fixed, dx: Fixed, index: usize) -> Result<(), Error> {
        let x = x + self.lsb.x + self.adxy.x;
        self.stems.add_vstem(
            self.hints,
            &self.fc,
            self.origin,
            x,
            dx,
            self.params.force_bold,
            index,
        )
    }

    /// Records the side bearing and width.
    ///
    /// The first call moves to the side bearing point on resume. Later
    /// calls come from seac components: the accent's side bearing is
    /// applied immediately, while the base only corrects for a side
    /// bearing that differs from the composite's.
    fn sbw(&mut self, lsb: Point<Fixed>, width: Point<Fixed>) {
        if !self.sb_set {
            self.lsb = lsb;
            self.sb_set = true;
        }
        if !self.width_set {
            self.width = width;
            self.width_set = true;
        }
        log::trace!("sb={:?} w={:?}", self.lsb, self.width);
        match self.init {
            Init::AwaitingSbw => self.init = Init::SbwPending,
            Init::SbwPending => {}
            Init::Done => {
                if let SeacPhase::Base(seac) = &mut self.seac {
                    let dsb = lsb - seac.save_lsb;
                    if dsb != Point::ZERO {
                        seac.save_adxy -= dsb;
                        self.lsb += dsb;
                        self.accum(dsb);
                    }
                } else {
                    self.accum(self.lsb);
                }
                self.path.add_point(self.pt);
            }
        }
    }

    /// Begins a composite glyph by interpreting the base character. The
    /// accent follows when the base ends.
    fn seac<P>(
        &mut self,
        provider: &P,
        asb: Fixed,
        adxy: Point<Fixed>,
        bchar: Fixed,
        achar: Fixed,
    ) -> Result<(), Error>
    where
        P: GlyphDataProvider<'a>,
    {
        let code = |v: Fixed| {
            let code = v.to_i32();
            u8::try_from(code).map_err(|_| Error::InvalidSeacCode(code))
        };
        let (base, accent) = (code(bchar)?, code(achar)?);
        if !matches!(self.seac, SeacPhase::None) {
            return Err(Error::InvalidSeacCode(base as i32));
        }
        log::trace!("seac base={base} accent={accent} adxy={adxy:?}");
        self.seac = SeacPhase::Base(Seac {
            accent,
            save_asb: asb - self.lsb.x,
            save_adxy: adxy,
            save_lsb: self.lsb,
        });
        self.stack.clear();
        self.pt = self.origin;
        self.accum(self.lsb);
        self.path.add_point(self.pt);
        let data = provider
            .seac_data(base)
            .ok_or(Error::InvalidSeacCode(base as i32))?;
        self.restart(data);
        self.width_parsed = false;
        Ok(())
    }

    /// Handles the end of a charstring. Returns true if the glyph is
    /// complete, or false if interpretation continues with a seac accent.
    fn endchar<P>(&mut self, provider: &P) -> Result<bool, Error>
    where
        P: GlyphDataProvider<'a>,
    {
        if self.params.charstring_type == CharstringType::Type2 && self.path.is_drawing() {
            self.path.close()?;
            self.apply_hints(true);
        }
        if self.path_hints.is_pending() || self.path.is_drawing() {
            self.apply_hints(true);
        }
        if let SeacPhase::Base(seac) = self.seac {
            self.seac = SeacPhase::Accent;
            self.pt = self.origin;
            self.asb_diff = seac.save_asb;
            self.adxy = seac.save_adxy;
            self.accum(self.adxy);
            self.path.add_point(self.pt);
            self.stack.clear();
            self.stems.reset();
            self.path_hints.reset();
            self.width_parsed = false;
            let data = provider
                .seac_data(seac.accent)
                .ok_or(Error::InvalidSeacCode(seac.accent as i32))?;
            self.restart(data);
            return Ok(false);
        }
        let advance = self.matrix.transform_point_fixed(self.width);
        self.path.add_point(advance);
        self.fill_adjust = self.compute_fill_adjust();
        Ok(true)
    }

    /// Widens fills of small glyphs when there is no oversampling.
    fn compute_fill_adjust(&self) -> Fixed {
        let log2 = self.settings.log2_scale;
        if log2.x as u32 + log2.y as u32 != 0 {
            return Fixed::ZERO;
        }
        let dmax = self
            .path
            .bbox()
            .map(|bbox| {
                let ceil = |v: Fixed| (v + Fixed::from_bits(0xff)).to_i32();
                ceil(bbox.x_max - bbox.x_min).max(ceil(bbox.y_max - bbox.y_min))
            })
            .unwrap_or(0);
        let bits = if self.hints.has_hints() {
            match dmax {
                ..=14 => 38,
                15..=24 => 25,
                _ => 0,
            }
        } else {
            match dmax {
                ..=9 => 51,
                10..=24 => 25,
                _ => 12,
            }
        };
        Fixed::from_bits(bits)
    }

    /// Pushes a value returned by the client for the `pop` operator.
    fn pop_client<P>(&mut self, provider: &mut P) -> Result<(), Error>
    where
        P: GlyphDataProvider<'a>,
    {
        if self.ignore_pops > 0 {
            self.ignore_pops -= 1;
            return Ok(());
        }
        let value = provider.pop()?;
        self.stack.push(value)
    }

    /// Combines multiple master operands in place.
    ///
    /// The `num_values` values on top of the stack are `n` base values
    /// followed by `k - 1` deltas for each, where `k` is the number of
    /// masters. Leaves the `n` blended values.
    fn blend(&mut self, n: usize, num_values: usize) -> Result<(), Error> {
        if n == 0 || num_values < n || num_values % n != 0 || num_values > self.stack.len() {
            return Err(Error::InvalidBlend);
        }
        let k1 = num_values / n - 1;
        if k1 > 0 && k1 >= self.registry.len() {
            return Err(Error::InvalidBlend);
        }
        let base = self.stack.len() - num_values;
        let values = self.stack.values_mut();
        for j in 0..n {
            let mut value = values[base + j];
            for i in 1..=k1 {
                value += values[base + n + j * k1 + i - 1].mul_f64(self.registry[i]);
            }
            values[base + j] = value;
        }
        self.stack.truncate(base + n);
        Ok(())
    }

    /// Returns a pseudo random value in (0, 1].
    fn random(&mut self) -> Fixed {
        self.random_seed = self
            .random_seed
            .wrapping_mul(1_103_515_245)
            .wrapping_add(12345);
        let bits = (self.random_seed >> 16) & 0xff;
        Fixed::from_bits(bits as i32 + 1)
    }
}

/// Picks a flatness from the scale of the device transform. Tiny glyphs
/// get exact curves.
fn compute_flatness(matrix: &Matrix, limit: f64) -> f64 {
    let mut flatness = matrix.xx.abs().min(matrix.yy.abs());
    if matrix.is_skewed() {
        flatness = flatness.min(matrix.xy.abs()).min(matrix.yx.abs());
    }
    flatness = flatness.min(limit);
    if flatness < 0.2 {
        0.0
    } else {
        flatness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_skips_len_iv() {
        let plain = [0u8, 0, 0, 0, 139, 14];
        let mut enc = Cipher::new(CHARSTRING_SEED);
        let cipher = plain.map(|b| enc.encrypt(b));
        let mut frame = Frame::new(&cipher, 4);
        assert_eq!(frame.next_byte(), Some(139));
        assert_eq!(frame.next_byte(), Some(14));
        assert_eq!(frame.next_byte(), None);
        let mut frame = Frame::new(&plain, -1);
        assert_eq!(frame.next_byte(), Some(0));
    }

    #[test]
    fn flatness_from_matrix() {
        assert_eq!(compute_flatness(&Matrix::scale(0.5, 0.8), 1.0), 0.5);
        assert_eq!(compute_flatness(&Matrix::scale(4.0, 4.0), 1.0), 1.0);
        assert_eq!(compute_flatness(&Matrix::scale(0.01, 0.01), 1.0), 0.0);
        let skewed = Matrix::new(0.5, 0.3, 0.25, 0.5, 0.0, 0.0);
        assert_eq!(compute_flatness(&skewed, 1.0), 0.25);
    }
}
