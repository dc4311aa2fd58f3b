//! Type 1 charstring operators.
//!
//! See "6 CharString Commands" in the Type 1 font format specification at
//! <https://adobe-type-tools.github.io/font-tech-notes/pdfs/T1_SPEC.pdf#page=47>

use super::{Interpreter, Status, MAX_FLEX_POINTS};
use crate::{
    provider::GlyphDataProvider,
    types::{Fixed, Point},
    Error,
};

const ESCAPE: u8 = 12;

/// Type 1 charstring operators.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(super) enum Operator {
    HStem,
    VStem,
    VMoveTo,
    RLineTo,
    HLineTo,
    VLineTo,
    RrCurveTo,
    ClosePath,
    CallSubr,
    Return,
    HSbw,
    EndChar,
    Undocumented15,
    RMoveTo,
    HMoveTo,
    VhCurveTo,
    HvCurveTo,
    // Escaped operators
    DotSection,
    VStem3,
    HStem3,
    Seac,
    Sbw,
    Div,
    CallOtherSubr,
    Pop,
    SetCurrentPoint,
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
            9 => ClosePath,
            10 => CallSubr,
            11 => Return,
            13 => HSbw,
            14 => EndChar,
            15 => Undocumented15,
            21 => RMoveTo,
            22 => HMoveTo,
            30 => VhCurveTo,
            31 => HvCurveTo,
            _ => return None,
        })
    }

    fn from_escaped_opcode(opcode: u8) -> Option<Self> {
        use Operator::*;
        Some(match opcode {
            0 => DotSection,
            1 => VStem3,
            2 => HStem3,
            6 => Seac,
            7 => Sbw,
            12 => Div,
            15 => Undocumented15,
            16 => CallOtherSubr,
            17 => Pop,
            33 => SetCurrentPoint,
            _ => return None,
        })
    }
}

impl<'a> Interpreter<'a> {
    pub(super) fn run_type1<P>(&mut self, provider: &mut P) -> Result<Status, Error>
    where
        P: GlyphDataProvider<'a>,
    {
        loop {
            let b0 = self.next_op_byte()?;
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
            if let Some(status) = self.eval_type1(provider, op)? {
                return Ok(status);
            }
        }
    }

    fn eval_type1<P>(&mut self, provider: &mut P, op: Operator) -> Result<Option<Status>, Error>
    where
        P: GlyphDataProvider<'a>,
    {
        use Operator::*;
        match op {
            HStem => {
                self.apply_hints(false);
                let [y, dy] = self.stack.get_array(0)?;
                self.add_hstem(y, dy)?;
            }
            VStem => {
                self.apply_hints(false);
                let [x, dx] = self.stack.get_array(0)?;
                self.add_vstem(x, dx)?;
            }
            HStem3 => {
                self.apply_hints(false);
                let args: [Fixed; 6] = self.stack.get_array(0)?;
                for stem in args.chunks_exact(2) {
                    self.add_hstem(stem[0], stem[1])?;
                }
            }
            VStem3 => {
                self.apply_hints(false);
                let args: [Fixed; 6] = self.stack.get_array(0)?;
                if !self.stems.vstem3_set && self.hints.use_x_hints {
                    self.stems.center_vstem(
                        self.hints,
                        &self.fc,
                        self.origin,
                        self.lsb.x + args[2],
                        args[3],
                    );
                    self.pt += self.stems.vs_offset;
                    self.stems.vstem3_set = true;
                }
                for stem in args.chunks_exact(2) {
                    self.add_vstem(stem[0], stem[1])?;
                }
            }
            DotSection => self.stems.dotsection = !self.stems.dotsection,
            RMoveTo => {
                let [dx, dy] = self.stack.get_array(0)?;
                self.accum(Point::new(dx, dy));
                self.moveto();
            }
            HMoveTo => {
                let dx = self.stack.get(0)?;
                self.accum_x(dx);
                self.moveto();
            }
            VMoveTo => {
                let dy = self.stack.get(0)?;
                self.accum_y(dy);
                self.moveto();
            }
            RLineTo => {
                let [dx, dy] = self.stack.get_array(0)?;
                self.accum(Point::new(dx, dy));
                self.lineto()?;
            }
            HLineTo => {
                let dx = self.stack.get(0)?;
                self.accum_x(dx);
                self.lineto()?;
            }
            VLineTo => {
                let dy = self.stack.get(0)?;
                self.accum_y(dy);
                self.lineto()?;
            }
            RrCurveTo => {
                let args = self.stack.get_array(0)?;
                self.rrcurveto(args)?;
            }
            VhCurveTo => {
                let [dy1, dx2, dy2, dx3] = self.stack.get_array(0)?;
                self.rrcurveto([Fixed::ZERO, dy1, dx2, dy2, dx3, Fixed::ZERO])?;
            }
            HvCurveTo => {
                let [dx1, dx2, dy2, dy3] = self.stack.get_array(0)?;
                self.rrcurveto([dx1, Fixed::ZERO, dx2, dy2, Fixed::ZERO, dy3])?;
            }
            ClosePath => self.closepath()?,
            CallSubr => {
                self.call_subr(provider, false)?;
                return Ok(None);
            }
            Return => {
                self.return_from_subr()?;
                return Ok(None);
            }
            HSbw => {
                let [sbx, wx] = self.stack.get_array(0)?;
                self.stack.clear();
                self.sbw(Point::new(sbx, Fixed::ZERO), Point::new(wx, Fixed::ZERO));
                return Ok(Some(Status::NeedSbw));
            }
            Sbw => {
                let [sbx, sby, wx, wy] = self.stack.get_array(0)?;
                self.stack.clear();
                self.sbw(Point::new(sbx, sby), Point::new(wx, wy));
                return Ok(Some(Status::NeedSbw));
            }
            Seac => {
                let [asb, adx, ady, bchar, achar] = self.stack.get_array(0)?;
                self.seac(provider, asb, Point::new(adx, ady), bchar, achar)?;
                return Ok(None);
            }
            EndChar => {
                if self.endchar(provider)? {
                    return Ok(Some(Status::Done));
                }
                return Ok(None);
            }
            Div => {
                let divisor = self.stack.pop()?;
                let dividend = self.stack.pop()?;
                if divisor == Fixed::ZERO {
                    return Err(Error::DivideByZero);
                }
                self.stack
                    .push(Fixed::from_f64(dividend.to_f64() / divisor.to_f64()))?;
                return Ok(None);
            }
            CallOtherSubr => return self.call_other_subr(provider),
            Pop => {
                self.pop_client(provider)?;
                return Ok(None);
            }
            SetCurrentPoint => {
                let [x, y] = self.stack.get_array(0)?;
                self.pt = self.origin;
                self.accum(Point::new(x + self.adxy.x, y + self.adxy.y));
            }
            Undocumented15 => {}
        }
        self.stack.clear();
        Ok(None)
    }

    /// Dispatches `callothersubr`. Flex, hint replacement and multiple
    /// master blending are handled here; any other index is passed to the
    /// caller.
    fn call_other_subr<P>(&mut self, provider: &mut P) -> Result<Option<Status>, Error>
    where
        P: GlyphDataProvider<'a>,
    {
        let index = self.stack.pop_i32()?;
        let num_args = self.stack.pop_i32()?;
        match index {
            0 => self.flex_end()?,
            1 => {
                self.flex.points[0] = self.path.position();
                self.flex.saved = Some(self.path.save_open_state());
                self.flex.count = 1;
            }
            2 => {
                if !self.flex.is_active() {
                    return Err(Error::InvalidFlex);
                }
                if self.flex.count >= MAX_FLEX_POINTS {
                    return Err(Error::FlexOverflow);
                }
                self.flex.points[self.flex.count] = self.path.position();
                self.flex.count += 1;
            }
            3 => {
                // The subroutine number stays on the stack for the pop
                // that follows.
                self.ignore_pops = 1;
                self.apply_hints(false);
                self.stems.clear_stems();
            }
            14..=18 => {
                let n = match index {
                    14 => 1,
                    15 => 2,
                    16 => 3,
                    17 => 4,
                    _ => 6,
                };
                let num_values = usize::try_from(num_args).map_err(|_| Error::InvalidBlend)?;
                self.blend(n, num_values)?;
                self.ignore_pops = n;
            }
            _ => {
                let n = usize::try_from(num_args)
                    .ok()
                    .filter(|n| *n <= self.stack.len())
                    .ok_or(Error::InvalidOtherSubrArgs)?;
                let first = self.stack.len() - n;
                provider.push(&self.stack.values()[first..])?;
                self.stack.truncate(first);
                self.apply_hints(false);
                log::warn!("deferring OtherSubr {index} with {n} arguments to the caller");
                return Ok(Some(Status::CallOtherSubr(index)));
            }
        }
        Ok(None)
    }

    /// Completes a Flex sequence, replacing the moves it collected with
    /// two curves, or a single line if the flex is shallower than its
    /// threshold.
    fn flex_end(&mut self) -> Result<(), Error> {
        if self.flex.count != MAX_FLEX_POINTS {
            return Err(Error::InvalidFlex);
        }
        let y = self.stack.pop()?;
        let x = self.stack.pop()?;
        let height = self.stack.pop()?;
        // The final point is returned through the two pops that follow.
        self.stack.push(x - self.asb_diff)?;
        self.stack.push(y)?;
        self.ignore_pops = 2;
        let end = self.path.position();
        let points = self.flex.points;
        self.path.add_point(points[0]);
        if let Some(saved) = self.flex.saved.take() {
            self.path.restore_open_state(saved);
        }
        let threshold = Fixed::from_bits(height.to_bits() / 100);
        let depth = (points[1] - points[4]).l1_norm();
        log::trace!("flex depth {depth} threshold {threshold}");
        if depth < threshold {
            self.path.add_line(end)?;
        } else {
            self.path.add_curve(points[2], points[3], points[4])?;
            self.path.add_curve(points[5], points[6], points[7])?;
        }
        self.flex.count = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        charstring::{
            testing::{pt, run, segments},
            State,
        },
        hint::FontHints,
        params::FontHintParams,
        path::SegmentKind,
        provider::MemoryProvider,
        settings::RenderSettings,
        types::{GlyphId, Matrix},
        ErrorKind,
    };
    use psglyph_test_data::charstring::{t1, CharstringBuilder};

    fn params() -> FontHintParams {
        FontHintParams {
            len_iv: -1,
            ..Default::default()
        }
    }

    #[test]
    fn hsbw_line_endchar() {
        let cs = CharstringBuilder::type1()
            .args(&[50, 500])
            .op(t1::HSBW)
            .args(&[100, 100])
            .op(t1::RLINETO)
            .op(t1::ENDCHAR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        let run = run(&params, &mut provider, &cs).unwrap();
        assert_eq!(run.lsb(), pt(50, 0));
        assert_eq!(run.width(), pt(500, 0));
        assert_eq!(segments(run.path()), vec![('M', pt(50, 0)), ('L', pt(150, 100))]);
        // the current point is left at the advance
        assert_eq!(run.path().position(), pt(500, 0));
    }

    #[test]
    fn needs_sbw_then_resumes() {
        let cs = CharstringBuilder::type1()
            .args(&[10, 300])
            .op(t1::HSBW)
            .op(t1::ENDCHAR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        let settings = RenderSettings::unhinted();
        let mut interp =
            Interpreter::new(&params, &FontHints::UNHINTED, &Matrix::IDENTITY, &settings);
        assert_eq!(interp.interpret(&mut provider, Some(&cs)), Ok(Status::NeedSbw));
        assert_eq!(interp.state(), State::AwaitingSbw);
        assert_eq!(interp.lsb(), pt(10, 0));
        // resuming with new data is an error
        assert_eq!(
            interp.interpret(&mut provider, Some(&cs)),
            Err(Error::InvalidState)
        );
        assert_eq!(interp.state(), State::Failed);
        assert_eq!(
            interp.interpret(&mut provider, None),
            Err(Error::InvalidState)
        );
    }

    #[test]
    fn preset_sbw_overrides_charstring() {
        let cs = CharstringBuilder::type1()
            .args(&[10, 300])
            .op(t1::HSBW)
            .args(&[5, 0])
            .op(t1::RLINETO)
            .op(t1::ENDCHAR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        let settings = RenderSettings::unhinted();
        let mut interp =
            Interpreter::new(&params, &FontHints::UNHINTED, &Matrix::IDENTITY, &settings);
        interp.set_lsb(pt(40, 0));
        assert_eq!(interp.interpret(&mut provider, Some(&cs)), Ok(Status::NeedSbw));
        interp.set_width(pt(700, 0));
        assert_eq!(interp.interpret(&mut provider, None), Ok(Status::Done));
        assert_eq!(interp.width(), pt(700, 0));
        assert_eq!(
            segments(interp.path()),
            vec![('M', pt(40, 0)), ('L', pt(45, 0))]
        );
    }

    #[test]
    fn encrypted_charstring() {
        let cs = CharstringBuilder::type1()
            .args(&[0, 400])
            .op(t1::HSBW)
            .args(&[0, 20])
            .op(t1::RLINETO)
            .op(t1::ENDCHAR)
            .encrypt(4);
        let params = FontHintParams::default();
        let mut provider = MemoryProvider::new(vec![]);
        let run = run(&params, &mut provider, &cs).unwrap();
        assert_eq!(segments(run.path()), vec![('M', pt(0, 0)), ('L', pt(0, 20))]);
    }

    #[test]
    fn subroutine_calls_and_implicit_return() {
        let subr0 = CharstringBuilder::type1()
            .args(&[10, 0])
            .op(t1::RLINETO)
            .op(t1::RETURN)
            .build();
        // no return: falls off the end
        let subr1 = CharstringBuilder::type1()
            .args(&[0, 10])
            .op(t1::RLINETO)
            .build();
        let cs = CharstringBuilder::type1()
            .args(&[0, 100])
            .op(t1::HSBW)
            .args(&[0])
            .op(t1::CALLSUBR)
            .args(&[1])
            .op(t1::CALLSUBR)
            .op(t1::ENDCHAR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]).with_subrs(vec![&subr0, &subr1]);
        let run = run(&params, &mut provider, &cs).unwrap();
        assert_eq!(
            segments(run.path()),
            vec![('M', pt(0, 0)), ('L', pt(10, 0)), ('L', pt(10, 10))]
        );
    }

    #[test]
    fn recursion_hits_depth_limit() {
        let subr = CharstringBuilder::type1().args(&[0]).op(t1::CALLSUBR).build();
        let cs = CharstringBuilder::type1()
            .args(&[0, 100])
            .op(t1::HSBW)
            .args(&[0])
            .op(t1::CALLSUBR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]).with_subrs(vec![&subr]);
        let err = run(&params, &mut provider, &cs).err().unwrap();
        assert_eq!(err, Error::NestingDepthLimitExceeded);
        assert_eq!(err.kind(), ErrorKind::MalformedCharstring);
    }

    #[test]
    fn missing_subroutine() {
        let cs = CharstringBuilder::type1()
            .args(&[0, 100])
            .op(t1::HSBW)
            .args(&[3])
            .op(t1::CALLSUBR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::MissingSubroutine(3))
        );
    }

    #[test]
    fn missing_endchar() {
        let cs = CharstringBuilder::type1().args(&[0, 100]).op(t1::HSBW).build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::UnexpectedEnd)
        );
    }

    #[test]
    fn return_without_call() {
        let cs = CharstringBuilder::type1()
            .args(&[0, 100])
            .op(t1::HSBW)
            .op(t1::RETURN)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::ReturnWithoutCall)
        );
    }

    #[test]
    fn invalid_operators() {
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        let cs = CharstringBuilder::type1().op(2).build();
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::InvalidOperator(2))
        );
        let cs = CharstringBuilder::type1().esc(40).build();
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::InvalidEscapeOperator(40))
        );
    }

    #[test]
    fn operand_overflow() {
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        // five byte integer beyond the 24.8 range
        let cs = CharstringBuilder::type1().args(&[10_000_000]).build();
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::IntegerOverflow(10_000_000))
        );
        let cs = CharstringBuilder::type1().args(&[1; 49]).build();
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::StackOverflow)
        );
    }

    #[test]
    fn step_limit() {
        // The subroutine calls itself, so the operator budget runs out
        // before the nesting limit is reached.
        let subr = CharstringBuilder::type1().args(&[0]).op(t1::CALLSUBR).build();
        let cs = CharstringBuilder::type1()
            .args(&[0, 100])
            .op(t1::HSBW)
            .args(&[0])
            .op(t1::CALLSUBR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]).with_subrs(vec![&subr]);
        let settings = RenderSettings {
            step_limit: 5,
            ..RenderSettings::unhinted()
        };
        let mut interp =
            Interpreter::new(&params, &FontHints::UNHINTED, &Matrix::IDENTITY, &settings);
        assert_eq!(interp.interpret(&mut provider, Some(&cs)), Ok(Status::NeedSbw));
        assert_eq!(
            interp.interpret(&mut provider, None),
            Err(Error::StepLimitExceeded)
        );
    }

    #[test]
    fn div_and_divide_by_zero() {
        let cs = CharstringBuilder::type1()
            .args(&[0, 100])
            .op(t1::HSBW)
            .args(&[0, 300, 4])
            .esc(t1::DIV)
            .op(t1::RLINETO)
            .op(t1::ENDCHAR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        let run_ok = run(&params, &mut provider, &cs).unwrap();
        assert_eq!(run_ok.path().segments()[1].pt, pt(0, 75));
        let cs = CharstringBuilder::type1()
            .args(&[0, 100])
            .op(t1::HSBW)
            .args(&[1, 0])
            .esc(t1::DIV)
            .build();
        let err = run(&params, &mut provider, &cs).err().unwrap();
        assert_eq!(err, Error::DivideByZero);
        assert_eq!(err.kind(), ErrorKind::NumericOverflow);
    }

    #[test]
    fn closepath_drops_short_closing_line() {
        let cs = CharstringBuilder::type1()
            .args(&[0, 500])
            .op(t1::HSBW)
            .args(&[100, 0])
            .op(t1::RLINETO)
            .args(&[0, 100])
            .op(t1::RLINETO)
            .args(&[-100, -100])
            .op(t1::RLINETO)
            .op(t1::CLOSEPATH)
            .op(t1::ENDCHAR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        let run = run(&params, &mut provider, &cs).unwrap();
        assert_eq!(
            segments(run.path()),
            vec![
                ('M', pt(0, 0)),
                ('L', pt(100, 0)),
                ('L', pt(100, 100)),
                ('Z', pt(0, 0)),
            ]
        );
    }

    /// Builds a glyph with a single Flex sequence from (0, 0) to (500, 0)
    /// that is 10 units deep.
    fn flex_glyph(height: i32) -> Vec<u8> {
        let mut b = CharstringBuilder::type1()
            .args(&[0, 1000])
            .op(t1::HSBW)
            .args(&[0, 0])
            .op(t1::RMOVETO)
            .args(&[0, 1])
            .esc(t1::CALLOTHERSUBR);
        // reference point, then the two curves
        let moves = [
            (250, 0),
            (-150, 0),
            (100, 10),
            (50, 0),
            (50, 0),
            (100, 0),
            (100, -10),
        ];
        for (dx, dy) in moves {
            b = b
                .args(&[dx, dy])
                .op(t1::RMOVETO)
                .args(&[0, 2])
                .esc(t1::CALLOTHERSUBR);
        }
        b.args(&[height, 500, 0, 3, 0])
            .esc(t1::CALLOTHERSUBR)
            .esc(t1::POP)
            .esc(t1::POP)
            .esc(t1::SETCURRENTPOINT)
            .args(&[0, 0])
            .op(t1::RLINETO)
            .op(t1::ENDCHAR)
            .build()
    }

    #[test]
    fn flex_as_curves() {
        let cs = flex_glyph(50);
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        let run = run(&params, &mut provider, &cs).unwrap();
        assert_eq!(
            segments(run.path()),
            vec![
                ('M', pt(0, 0)),
                ('C', pt(250, 10)),
                ('C', pt(500, 0)),
                ('L', pt(500, 0)),
            ]
        );
        let controls: Vec<_> = run.path().segments()[1..3]
            .iter()
            .map(|seg| match seg.kind {
                SegmentKind::Curve { p1, p2 } => (p1, p2),
                kind => panic!("expected a curve, got {kind:?}"),
            })
            .collect();
        assert_eq!(
            controls,
            [(pt(100, 0), pt(200, 10)), (pt(300, 10), pt(400, 10))]
        );
    }

    #[test]
    fn shallow_flex_is_a_line() {
        // threshold of 20 units exceeds the depth
        let cs = flex_glyph(2000);
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        let run = run(&params, &mut provider, &cs).unwrap();
        assert_eq!(
            segments(run.path()),
            vec![('M', pt(0, 0)), ('L', pt(500, 0)), ('L', pt(500, 0))]
        );
    }

    #[test]
    fn flex_end_without_points() {
        let cs = CharstringBuilder::type1()
            .args(&[0, 1000])
            .op(t1::HSBW)
            .args(&[50, 500, 0, 3, 0])
            .esc(t1::CALLOTHERSUBR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::InvalidFlex)
        );
    }

    #[test]
    fn unknown_othersubr_round_trips_through_client() {
        // two arguments for OtherSubr 20; the default client hands them
        // back in reverse order
        let cs = CharstringBuilder::type1()
            .args(&[0, 1000])
            .op(t1::HSBW)
            .args(&[7, 8, 2, 20])
            .esc(t1::CALLOTHERSUBR)
            .esc(t1::POP)
            .esc(t1::POP)
            .op(t1::RLINETO)
            .op(t1::ENDCHAR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        let settings = RenderSettings::unhinted();
        let mut interp =
            Interpreter::new(&params, &FontHints::UNHINTED, &Matrix::IDENTITY, &settings);
        assert_eq!(interp.interpret(&mut provider, Some(&cs)), Ok(Status::NeedSbw));
        assert_eq!(
            interp.interpret(&mut provider, None),
            Ok(Status::CallOtherSubr(20))
        );
        assert_eq!(interp.state(), State::AwaitingOtherSubr);
        assert_eq!(provider.stack.len(), 2);
        assert_eq!(interp.interpret(&mut provider, None), Ok(Status::Done));
        assert_eq!(interp.path().segments()[1].pt, pt(8, 7));
    }

    #[test]
    fn othersubr_argument_count_checked() {
        let cs = CharstringBuilder::type1()
            .args(&[0, 1000])
            .op(t1::HSBW)
            .args(&[1, 5, 20])
            .esc(t1::CALLOTHERSUBR)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::InvalidOtherSubrArgs)
        );
    }

    #[test]
    fn blend_two_masters() {
        let params = FontHintParams {
            weight_vector: vec![0.75, 0.25],
            ..params()
        };
        // two values with one delta each
        let cs = CharstringBuilder::type1()
            .args(&[0, 1000])
            .op(t1::HSBW)
            .args(&[100, 200, 40, 80, 4, 15])
            .esc(t1::CALLOTHERSUBR)
            .esc(t1::POP)
            .esc(t1::POP)
            .op(t1::RLINETO)
            .op(t1::ENDCHAR)
            .build();
        let mut provider = MemoryProvider::new(vec![]);
        let run = run(&params, &mut provider, &cs).unwrap();
        assert_eq!(run.path().segments()[1].pt, pt(110, 220));
    }

    #[test]
    fn blend_needs_enough_masters() {
        // three masters requested, one weight available
        let params = FontHintParams {
            weight_vector: vec![1.0],
            ..params()
        };
        let cs = CharstringBuilder::type1()
            .args(&[0, 1000])
            .op(t1::HSBW)
            .args(&[100, 1, 2, 3, 14])
            .esc(t1::CALLOTHERSUBR)
            .build();
        let mut provider = MemoryProvider::new(vec![]);
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::InvalidBlend)
        );
    }

    #[test]
    fn seac_composes_base_and_accent() {
        let base = CharstringBuilder::type1()
            .args(&[20, 500])
            .op(t1::HSBW)
            .args(&[100, 0])
            .op(t1::RLINETO)
            .op(t1::ENDCHAR)
            .build();
        let accent = CharstringBuilder::type1()
            .args(&[30, 300])
            .op(t1::HSBW)
            .args(&[0, 50])
            .op(t1::RLINETO)
            .op(t1::ENDCHAR)
            .build();
        let cs = CharstringBuilder::type1()
            .args(&[20, 600])
            .op(t1::HSBW)
            .args(&[30, 200, 400, 97, 194])
            .esc(t1::SEAC)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![&base, &accent])
            .with_standard_glyph(97, GlyphId::new(0))
            .with_standard_glyph(194, GlyphId::new(1));
        let run = run(&params, &mut provider, &cs).unwrap();
        // metrics come from the composite
        assert_eq!(run.width(), pt(600, 0));
        assert_eq!(run.lsb(), pt(20, 0));
        let lines: Vec<_> = segments(run.path())
            .into_iter()
            .filter(|seg| seg.0 == 'L')
            .map(|seg| seg.1)
            .collect();
        assert_eq!(lines, vec![pt(120, 0), pt(220, 450)]);
    }

    #[test]
    fn seac_base_with_different_side_bearing() {
        let base = CharstringBuilder::type1()
            .args(&[35, 500])
            .op(t1::HSBW)
            .args(&[100, 0])
            .op(t1::RLINETO)
            .op(t1::ENDCHAR)
            .build();
        let accent = CharstringBuilder::type1()
            .args(&[0, 300])
            .op(t1::HSBW)
            .op(t1::ENDCHAR)
            .build();
        let cs = CharstringBuilder::type1()
            .args(&[20, 600])
            .op(t1::HSBW)
            .args(&[20, 0, 0, 97, 194])
            .esc(t1::SEAC)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![&base, &accent])
            .with_standard_glyph(97, GlyphId::new(0))
            .with_standard_glyph(194, GlyphId::new(1));
        let run = run(&params, &mut provider, &cs).unwrap();
        // the base is drawn at its own side bearing
        assert_eq!(run.path().segments()[0].pt, pt(35, 0));
        assert_eq!(run.path().segments()[1].pt, pt(135, 0));
    }

    #[test]
    fn seac_with_invalid_code() {
        let cs = CharstringBuilder::type1()
            .args(&[0, 600])
            .op(t1::HSBW)
            .args(&[0, 0, 0, 65, 300])
            .esc(t1::SEAC)
            .build();
        let params = params();
        let mut provider = MemoryProvider::new(vec![]);
        assert_eq!(
            run(&params, &mut provider, &cs).err(),
            Some(Error::InvalidSeacCode(300))
        );
    }
}
