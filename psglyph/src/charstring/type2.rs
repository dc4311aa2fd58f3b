//! Type 2 charstring operators.
//!
//! See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5177.Type2.pdf>

#[cfg(feature = "libm")]
#[allow(unused_imports)]
use core_maths::*;

use core::ops::Range;

use super::{Init, Interpreter, Status, TRANSIENT_ARRAY_SIZE};
use crate::{
    hint::MAX_STEMS,
    provider::GlyphDataProvider,
    types::{Fixed, Point},
    Error,
};

const ESCAPE: u8 = 12;
const SHORT_INT: u8 = 28;

/// Largest hint mask, covering a full table of stems in each direction.
const MAX_MASK_BYTES: usize = MAX_STEMS * 2 / 8;

/// Flex depth threshold of the hflex, hflex1 and flex1 operators, in
/// device pixels.
const DEFAULT_FLEX_DEPTH: f64 = 0.5;

/// Type 2 charstring operators.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(super) enum Operator {
    HStem,
    VStem,
    VMoveTo,
    RLineTo,
    HLineTo,
    VLineTo,
    RrCurveTo,
    CallSubr,
    Return,
    EndChar,
    Undocumented15,
    Blend,
    HStemHm,
    HintMask,
    CntrMask,
    RMoveTo,
    HMoveTo,
    VStemHm,
    RCurveLine,
    RLineCurve,
    VvCurveTo,
    HhCurveTo,
    CallGsubr,
    VhCurveTo,
    HvCurveTo,
    // Escaped operators
    DotSection,
    And,
    Or,
    Not,
    Store,
    Abs,
    Add,
    Sub,
    Div,
    Load,
    Neg,
    Eq,
    Drop,
    Put,
    Get,
    IfElse,
    Random,
    Mul,
    Sqrt,
    Dup,
    Exch,
    Index,
    Roll,
    HFlex,
    Flex,
    HFlex1,
    Flex1,
}

impl Operator {
    fn from_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            1 => HStem,
            3 => VStem,
            4 => VMoveTo,
            5 => RLineTo,
            6 => HLineTo,
            7 => VLineTo,
            8 => RrCurveTo,
            10 => CallSubr,
            11 => Return,
            14 => EndChar,
            15 => Undocumented15,
            16 => Blend,
            18 => HStemHm,
            19 => HintMask,
            20 => CntrMask,
            21 => RMoveTo,
            22 => HMoveTo,
            23 => VStemHm,
            24 => RCurveLine,
            25 => RLineCurve,
            26 => VvCurveTo,
            27 => HhCurveTo,
            29 => CallGsubr,
            30 => VhCurveTo,
            31 => HvCurveTo,
            _ => return None,
        })
    }

    fn from_escaped_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            0 => DotSection,
            3 => And,
            4 => Or,
            5 => Not,
            8 => Store,
            9 => Abs,
            10 => Add,
            11 => Sub,
            12 => Div,
            13 => Load,
            14 => Neg,
            15 => Eq,
            18 => Drop,
            20 => Put,
            21 => Get,
            22 => IfElse,
            23 => Random,
            24 => Mul,
            26 => Sqrt,
            27 => Dup,
            28 => Exch,
            29 => Index,
            30 => Roll,
            34 => HFlex,
            35 => Flex,
            36 => HFlex1,
            37 => Flex1,
            _ => return None,
        })
    }
}

impl<'a> Interpreter<'a> {
    pub(super) fn run_type2<P>(&mut self, provider: &mut P) -> Result<Status, Error>
    where
        P: GlyphDataProvider<'a>,
    {
        loop {
            let b0 = self.next_op_byte()?;
            if b0 == SHORT_INT {
                let b1 = self.next_byte()?;
                let b2 = self.next_byte()?;
                let value = i16::from_be_bytes([b1, b2]) as i32;
                self.stack.push(Fixed::from_i32(value))?;
                continue;
            }
            if b0 >= 32 {
                let value = self.read_number(b0)?;
                self.stack.push(value)?;
                continue;
            }
            let op = if b0 == ESCAPE {
                let b1 = self.next_byte()?;
                Operator::from_escaped_opcode(b1).ok_or(Error::InvalidEscapeOperator(b1))?
            } else {
                Operator::from_opcode(b0).ok_or(Error::InvalidOperator(b0))?
            };
            self.step()?;
            log::trace!("{op:?} {:?}", self.stack);
            if let Some(status) = self.eval_type2(provider, op)? {
                return Ok(status);
            }
        }
    }

    fn eval_type2<P>(&mut self, provider: &mut P, op: Operator) -> Result<Option<Status>, Error>
    where
        P: GlyphDataProvider<'a>,
    {
        use Operator::*;
        let len = self.stack.len();
        match op {
            HStem | HStemHm | VStem | VStemHm => {
                if self.check_width(self.stack.len_is_odd())? {
                    return Ok(Some(Status::NeedSbw));
                }
                self.stem_hints(matches!(op, VStem | VStemHm))?;
            }
            HintMask | CntrMask => {
                if op == HintMask {
                    if self.check_width(self.stack.len_is_odd())? {
                        return Ok(Some(Status::NeedSbw));
                    }
                    // Stems preceding the first mask are implied vstems.
                    self.stem_hints(true)?;
                }
                let (mask, mask_len) = self.read_hint_mask()?;
                if op == HintMask {
                    self.stems.enable(&mask[..mask_len]);
                } else {
                    log::warn!("ignoring counter mask {:?}", &mask[..mask_len]);
                }
            }
            VMoveTo | HMoveTo | RMoveTo => {
                let has_width = if op == RMoveTo { len > 2 } else { len > 1 };
                if self.check_width(has_width)? {
                    return Ok(Some(Status::NeedSbw));
                }
                match op {
                    VMoveTo => self.accum_y(self.stack.peek(0)?),
                    HMoveTo => self.accum_x(self.stack.peek(0)?),
                    _ => {
                        let dy = self.stack.peek(0)?;
                        let dx = self.stack.peek(1)?;
                        self.accum(Point::new(dx, dy));
                    }
                }
                self.close_and_moveto()?;
            }
            RLineTo => {
                let stack = self.stack.clone();
                for d in stack.values().chunks_exact(2) {
                    self.accum(Point::new(d[0], d[1]));
                    self.lineto()?;
                }
            }
            HLineTo | VLineTo => {
                let stack = self.stack.clone();
                let mut vertical = op == VLineTo;
                for d in stack.values() {
                    if vertical {
                        self.accum_y(*d);
                    } else {
                        self.accum_x(*d);
                    }
                    self.lineto()?;
                    vertical = !vertical;
                }
            }
            RrCurveTo => {
                let stack = self.stack.clone();
                for c in stack.values().chunks_exact(6) {
                    self.rrcurveto([c[0], c[1], c[2], c[3], c[4], c[5]])?;
                }
            }
            VhCurveTo | HvCurveTo => {
                let stack = self.stack.clone();
                let args = stack.values();
                let mut vertical = op == VhCurveTo;
                let mut i = 0;
                while i + 4 <= args.len() {
                    let a = &args[i..];
                    let last = if a.len() == 5 { a[4] } else { Fixed::ZERO };
                    let d = if vertical {
                        [Fixed::ZERO, a[0], a[1], a[2], a[3], last]
                    } else {
                        [a[0], Fixed::ZERO, a[1], a[2], last, a[3]]
                    };
                    self.rrcurveto(d)?;
                    vertical = !vertical;
                    i += 4;
                }
            }
            RCurveLine => {
                let stack = self.stack.clone();
                let args = stack.values();
                let mut i = 0;
                while i + 8 <= args.len() {
                    let c = &args[i..];
                    self.rrcurveto([c[0], c[1], c[2], c[3], c[4], c[5]])?;
                    i += 6;
                }
                let [dx, dy] = stack.get_array(i)?;
                self.accum(Point::new(dx, dy));
                self.lineto()?;
            }
            RLineCurve => {
                let stack = self.stack.clone();
                let args = stack.values();
                let mut i = 0;
                while i + 8 <= args.len() {
                    self.accum(Point::new(args[i], args[i + 1]));
                    self.lineto()?;
                    i += 2;
                }
                let curve = stack.get_array(i)?;
                self.rrcurveto(curve)?;
            }
            VvCurveTo | HhCurveTo => {
                let stack = self.stack.clone();
                // an odd count starts with the delta across the curve
                let (mut first, args) = match stack.values() {
                    [d, rest @ ..] if stack.len_is_odd() => (*d, rest),
                    args => (Fixed::ZERO, args),
                };
                for c in args.chunks_exact(4) {
                    let d = if op == VvCurveTo {
                        [first, c[0], c[1], c[2], Fixed::ZERO, c[3]]
                    } else {
                        [c[0], first, c[1], c[2], c[3], Fixed::ZERO]
                    };
                    self.rrcurveto(d)?;
                    first = Fixed::ZERO;
                }
            }
            HFlex => {
                let [dx1, dx2, dy2, dx3, dx4, dx5, dx6] = self.top_args()?;
                let zero = Fixed::ZERO;
                self.flex(
                    [dx1, zero, dx2, dy2, dx3, zero, dx4, zero, dx5, -dy2, dx6, zero],
                    DEFAULT_FLEX_DEPTH,
                )?;
            }
            Flex => {
                let args: [Fixed; 13] = self.top_args()?;
                let mut d = [Fixed::ZERO; 12];
                d.copy_from_slice(&args[..12]);
                let depth = Fixed::from_bits(args[12].to_bits() / 100).to_f64();
                self.flex(d, depth)?;
            }
            HFlex1 => {
                let [dx1, dy1, dx2, dy2, dx3, dx4, dx5, dy5, dx6] = self.top_args()?;
                let zero = Fixed::ZERO;
                let dy6 = -(dy1 + dy2 + dy5);
                self.flex(
                    [dx1, dy1, dx2, dy2, dx3, zero, dx4, zero, dx5, dy5, dx6, dy6],
                    DEFAULT_FLEX_DEPTH,
                )?;
            }
            Flex1 => {
                let args: [Fixed; 11] = self.top_args()?;
                let mut d = [Fixed::ZERO; 12];
                d[..10].copy_from_slice(&args[..10]);
                let mut sum = Point::ZERO;
                for pair in args[..10].chunks_exact(2) {
                    sum += Point::new(pair[0], pair[1]);
                }
                if sum.x.abs() > sum.y.abs() {
                    d[10] = args[10];
                    d[11] = -sum.y;
                } else {
                    d[10] = -sum.x;
                    d[11] = args[10];
                }
                self.flex(d, DEFAULT_FLEX_DEPTH)?;
            }
            CallSubr | CallGsubr => {
                self.call_subr(provider, op == CallGsubr)?;
                return Ok(None);
            }
            Return => {
                self.return_from_subr()?;
                return Ok(None);
            }
            EndChar => {
                if len >= 4 {
                    if self.check_width(len > 4)? {
                        return Ok(Some(Status::NeedSbw));
                    }
                    let [adx, ady, bchar, achar] = self.stack.get_array(0)?;
                    self.seac(provider, self.lsb.x, Point::new(adx, ady), bchar, achar)?;
                    return Ok(None);
                }
                if self.check_width(len >= 1)? {
                    return Ok(Some(Status::NeedSbw));
                }
                if self.endchar(provider)? {
                    return Ok(Some(Status::Done));
                }
                return Ok(None);
            }
            Blend => {
                let n = self.stack.pop_i32()?;
                let n = usize::try_from(n).map_err(|_| Error::InvalidBlend)?;
                let num_values = n
                    .checked_mul(self.registry.len())
                    .ok_or(Error::InvalidBlend)?;
                self.blend(n, num_values)?;
                return Ok(None);
            }
            DotSection | Undocumented15 => {}
            _ => {
                self.eval_arithmetic(op)?;
                return Ok(None);
            }
        }
        self.stack.clear();
        Ok(None)
    }

    /// Evaluates the operators that only manipulate the stack and
    /// storage.
    fn eval_arithmetic(&mut self, op: Operator) -> Result<(), Error> {
        use Operator::*;
        let bool_value = |b: bool| if b { Fixed::ONE } else { Fixed::ZERO };
        let stack = &mut self.stack;
        match op {
            And => {
                let b = stack.pop()?;
                let a = stack.pop()?;
                stack.push(bool_value(a != Fixed::ZERO && b != Fixed::ZERO))?;
            }
            Or => {
                let b = stack.pop()?;
                let a = stack.pop()?;
                stack.push(bool_value(a != Fixed::ZERO || b != Fixed::ZERO))?;
            }
            Not => {
                let a = stack.pop()?;
                stack.push(bool_value(a == Fixed::ZERO))?;
            }
            Eq => {
                let b = stack.pop()?;
                let a = stack.pop()?;
                stack.push(bool_value(a == b))?;
            }
            Abs => {
                let a = stack.pop()?;
                stack.push(a.abs())?;
            }
            Neg => {
                let a = stack.pop()?;
                stack.push(-a)?;
            }
            Add => {
                let b = stack.pop()?;
                let a = stack.pop()?;
                stack.push(a + b)?;
            }
            Sub => {
                let b = stack.pop()?;
                let a = stack.pop()?;
                stack.push(a - b)?;
            }
            Mul => {
                let b = stack.pop()?;
                let a = stack.pop()?;
                stack.push(a.saturating_mul(b))?;
            }
            Div => {
                let b = stack.pop()?;
                let a = stack.pop()?;
                if b == Fixed::ZERO {
                    return Err(Error::DivideByZero);
                }
                stack.push(Fixed::from_f64(a.to_f64() / b.to_f64()))?;
            }
            Sqrt => {
                let a = stack.pop()?;
                let root = if a >= Fixed::ZERO {
                    Fixed::from_f64(a.to_f64().sqrt())
                } else {
                    a
                };
                stack.push(root)?;
            }
            Drop => {
                stack.pop()?;
            }
            Dup => {
                let a = stack.peek(0)?;
                stack.push(a)?;
            }
            Exch => {
                let b = stack.pop()?;
                let a = stack.pop()?;
                stack.push(b)?;
                stack.push(a)?;
            }
            Index => {
                let i = stack.pop_i32()?;
                let value = match usize::try_from(i) {
                    Ok(depth) => stack.peek(depth)?,
                    // negative indices copy the top element
                    Err(_) => stack.peek(0)?,
                };
                stack.push(value)?;
            }
            Roll => {
                let distance = stack.pop_i32()?;
                let count = stack.pop_i32()?;
                stack.roll(count, distance)?;
            }
            IfElse => {
                let v2 = stack.pop()?;
                let v1 = stack.pop()?;
                let s2 = stack.pop()?;
                let s1 = stack.pop()?;
                stack.push(if v1 > v2 { s2 } else { s1 })?;
            }
            Put => {
                let i = stack.pop_i32()?;
                let value = stack.pop()?;
                let range = transient_range(i, 1)?;
                self.transient[range.start] = value;
            }
            Get => {
                let i = stack.pop_i32()?;
                let range = transient_range(i, 1)?;
                stack.push(self.transient[range.start])?;
            }
            Store => {
                let n = stack.pop_i32()?;
                let i = stack.pop_i32()?;
                let j = stack.pop_i32()?;
                let reg = stack.pop_i32()?;
                check_registry(reg)?;
                let from = transient_range(i, n)?;
                let to = checked_range(j, n, self.registry.len())
                    .ok_or(Error::InvalidRegistryIndex(j))?;
                for (dst, src) in self.registry[to].iter_mut().zip(&self.transient[from]) {
                    *dst = src.to_f64();
                }
            }
            Load => {
                let n = stack.pop_i32()?;
                let i = stack.pop_i32()?;
                let reg = stack.pop_i32()?;
                check_registry(reg)?;
                let to = transient_range(i, n)?;
                let from =
                    checked_range(0, n, self.registry.len()).ok_or(Error::InvalidRegistryIndex(n))?;
                for (dst, src) in self.transient[to].iter_mut().zip(&self.registry[from]) {
                    *dst = Fixed::from_f64(*src);
                }
            }
            Random => {
                let value = self.random();
                self.stack.push(value)?;
            }
            _ => return Err(Error::InvalidState),
        }
        Ok(())
    }

    /// Handles the width that may precede the first stack clearing
    /// operator of a charstring.
    ///
    /// Returns true if the interpreter must stop to report the side
    /// bearing and width. The current operator is then executed again
    /// on resume.
    fn check_width(&mut self, has_width: bool) -> Result<bool, Error> {
        if self.width_parsed {
            return Ok(false);
        }
        self.width_parsed = true;
        let wx = if has_width {
            self.params.nominal_width + self.stack.remove_first()?
        } else {
            self.params.default_width
        };
        if self.init != Init::AwaitingSbw {
            return Ok(false);
        }
        self.sbw(Point::ZERO, Point::new(wx, Fixed::ZERO));
        self.rewind();
        Ok(true)
    }

    /// Adds the stems on the stack, given as deltas from the previous
    /// edge.
    fn stem_hints(&mut self, vertical: bool) -> Result<(), Error> {
        self.apply_hints(false);
        let stack = self.stack.clone();
        let first_index = self.stems.num_hints;
        let mut v = Fixed::ZERO;
        for (i, pair) in stack.values().chunks_exact(2).enumerate() {
            v += pair[0];
            if vertical {
                self.add_vstem_at(v, pair[1], first_index + i)?;
            } else {
                self.add_hstem_at(v, pair[1], first_index + i)?;
            }
            v += pair[1];
        }
        self.stems.num_hints += stack.len() / 2;
        Ok(())
    }

    /// Reads the mask bytes that follow a hintmask or cntrmask operator.
    fn read_hint_mask(&mut self) -> Result<([u8; MAX_MASK_BYTES], usize), Error> {
        let len = self.stems.num_hints.div_ceil(8);
        if len > MAX_MASK_BYTES {
            return Err(Error::HintMaskOutOfRange);
        }
        let mut mask = [0u8; MAX_MASK_BYTES];
        for byte in &mut mask[..len] {
            *byte = self.next_byte()?;
        }
        Ok((mask, len))
    }

    /// Returns the `N` topmost operands.
    fn top_args<const N: usize>(&self) -> Result<[Fixed; N], Error> {
        let first = self
            .stack
            .len()
            .checked_sub(N)
            .ok_or(Error::StackUnderflow)?;
        self.stack.get_array(first)
    }

    /// Draws a pair of curves, or a single line if the curves deviate from
    /// it by less than `depth` device pixels.
    fn flex(&mut self, d: [Fixed; 12], depth: f64) -> Result<(), Error> {
        let join = Point::new(d[0] + d[2] + d[4], d[1] + d[3] + d[5]);
        let end = join + Point::new(d[6] + d[8] + d[10], d[7] + d[9] + d[11]);
        let join_dev = self.matrix.transform_distance(join.to_f64());
        let end_dev = self.matrix.transform_distance(end.to_f64());
        // Measure across the direction the curve mostly travels.
        let flex_depth = if end_dev.y.abs() > end_dev.x.abs() {
            join_dev.x
        } else {
            join_dev.y
        };
        if flex_depth.abs() < depth {
            self.accum(end);
            self.lineto()
        } else {
            self.rrcurveto([d[0], d[1], d[2], d[3], d[4], d[5]])?;
            self.rrcurveto([d[6], d[7], d[8], d[9], d[10], d[11]])
        }
    }
}

fn check_registry(reg: i32) -> Result<(), Error> {
    if reg != 0 {
        return Err(Error::InvalidRegistryIndex(reg));
    }
    Ok(())
}

fn transient_range(start: i32, count: i32) -> Result<Range<usize>, Error> {
    checked_range(start, count, TRANSIENT_ARRAY_SIZE).ok_or(Error::InvalidTransientIndex(start))
}

fn checked_range(start: i32, count: i32, len: usize) -> Option<Range<usize>> {
    let start = usize::try_from(start).ok()?;
    let end = start.checked_add(usize::try_from(count).ok()?)?;
    (end <= len).then_some(start..end)
}
