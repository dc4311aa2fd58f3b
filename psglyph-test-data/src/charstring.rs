//! Assembly of Type 1 and Type 2 charstrings.
//!
//! Tests describe glyph programs with [`CharstringBuilder`] rather than raw
//! byte arrays so that operands and operators read the way they would in a
//! disassembly.

/// Escape byte introducing two byte operators.
pub const ESCAPE: u8 = 12;

/// Initial cipher state for charstring encryption.
pub const CHARSTRING_SEED: u16 = 4330;

/// Type 1 operators.
///
/// Escaped operators share the numbering space with single byte operators
/// and must be emitted with [`CharstringBuilder::esc`].
pub mod t1 {
    pub const HSTEM: u8 = 1;
    pub const VSTEM: u8 = 3;
    pub const VMOVETO: u8 = 4;
    pub const RLINETO: u8 = 5;
    pub const HLINETO: u8 = 6;
    pub const VLINETO: u8 = 7;
    pub const RRCURVETO: u8 = 8;
    pub const CLOSEPATH: u8 = 9;
    pub const CALLSUBR: u8 = 10;
    pub const RETURN: u8 = 11;
    pub const HSBW: u8 = 13;
    pub const ENDCHAR: u8 = 14;
    pub const RMOVETO: u8 = 21;
    pub const HMOVETO: u8 = 22;
    pub const VHCURVETO: u8 = 30;
    pub const HVCURVETO: u8 = 31;

    // escaped
    pub const DOTSECTION: u8 = 0;
    pub const VSTEM3: u8 = 1;
    pub const HSTEM3: u8 = 2;
    pub const SEAC: u8 = 6;
    pub const SBW: u8 = 7;
    pub const DIV: u8 = 12;
    pub const CALLOTHERSUBR: u8 = 16;
    pub const POP: u8 = 17;
    pub const SETCURRENTPOINT: u8 = 33;
}

/// Type 2 operators.
pub mod t2 {
    pub const HSTEM: u8 = 1;
    pub const VSTEM: u8 = 3;
    pub const VMOVETO: u8 = 4;
    pub const RLINETO: u8 = 5;
    pub const HLINETO: u8 = 6;
    pub const VLINETO: u8 = 7;
    pub const RRCURVETO: u8 = 8;
    pub const CALLSUBR: u8 = 10;
    pub const RETURN: u8 = 11;
    pub const ENDCHAR: u8 = 14;
    pub const BLEND: u8 = 16;
    pub const HSTEMHM: u8 = 18;
    pub const HINTMASK: u8 = 19;
    pub const CNTRMASK: u8 = 20;
    pub const RMOVETO: u8 = 21;
    pub const HMOVETO: u8 = 22;
    pub const VSTEMHM: u8 = 23;
    pub const RCURVELINE: u8 = 24;
    pub const RLINECURVE: u8 = 25;
    pub const VVCURVETO: u8 = 26;
    pub const HHCURVETO: u8 = 27;
    pub const CALLGSUBR: u8 = 29;
    pub const VHCURVETO: u8 = 30;
    pub const HVCURVETO: u8 = 31;

    // escaped
    pub const DOTSECTION: u8 = 0;
    pub const AND: u8 = 3;
    pub const OR: u8 = 4;
    pub const NOT: u8 = 5;
    pub const STORE: u8 = 8;
    pub const ABS: u8 = 9;
    pub const ADD: u8 = 10;
    pub const SUB: u8 = 11;
    pub const DIV: u8 = 12;
    pub const LOAD: u8 = 13;
    pub const NEG: u8 = 14;
    pub const EQ: u8 = 15;
    pub const DROP: u8 = 18;
    pub const PUT: u8 = 20;
    pub const GET: u8 = 21;
    pub const IFELSE: u8 = 22;
    pub const RANDOM: u8 = 23;
    pub const MUL: u8 = 24;
    pub const SQRT: u8 = 26;
    pub const DUP: u8 = 27;
    pub const EXCH: u8 = 28;
    pub const INDEX: u8 = 29;
    pub const ROLL: u8 = 30;
    pub const HFLEX: u8 = 34;
    pub const FLEX: u8 = 35;
    pub const HFLEX1: u8 = 36;
    pub const FLEX1: u8 = 37;
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Dialect {
    Type1,
    Type2,
}

/// Incrementally assembles a charstring.
#[derive(Clone, Debug)]
pub struct CharstringBuilder {
    dialect: Dialect,
    data: Vec<u8>,
}

impl CharstringBuilder {
    pub fn type1() -> Self {
        Self {
            dialect: Dialect::Type1,
            data: Vec::new(),
        }
    }

    pub fn type2() -> Self {
        Self {
            dialect: Dialect::Type2,
            data: Vec::new(),
        }
    }

    /// Appends integer operands using the shortest encoding available.
    pub fn args(mut self, values: &[i32]) -> Self {
        for &value in values {
            self.push_int(value);
        }
        self
    }

    /// Appends a 16.16 fixed point operand.
    ///
    /// Only Type 2 charstrings can encode fractions; Type 1 operands are
    /// truncated to integers.
    pub fn fixed(mut self, value: f64) -> Self {
        match self.dialect {
            Dialect::Type1 => self.push_int(value as i32),
            Dialect::Type2 => {
                let bits = (value * 65536.0).round() as i32;
                self.data.push(255);
                self.data.extend_from_slice(&bits.to_be_bytes());
            }
        }
        self
    }

    pub fn op(mut self, op: u8) -> Self {
        self.data.push(op);
        self
    }

    /// Appends an escaped two byte operator.
    pub fn esc(mut self, op: u8) -> Self {
        self.data.extend_from_slice(&[ESCAPE, op]);
        self
    }

    /// Appends bytes verbatim, such as hint mask data.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn append(mut self, other: CharstringBuilder) -> Self {
        self.data.extend(other.data);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    /// Encrypts the charstring after prefixing `len_iv` filler bytes.
    pub fn encrypt(self, len_iv: usize) -> Vec<u8> {
        let mut state = CHARSTRING_SEED;
        core::iter::repeat_n(0u8, len_iv)
            .chain(self.data)
            .map(|plain| {
                let cipher = plain ^ (state >> 8) as u8;
                state = (cipher as u16)
                    .wrapping_add(state)
                    .wrapping_mul(52845)
                    .wrapping_add(22719);
                cipher
            })
            .collect()
    }

    fn push_int(&mut self, value: i32) {
        match value {
            -107..=107 => self.data.push((value + 139) as u8),
            108..=1131 => {
                let v = value - 108;
                self.data.extend_from_slice(&[(v / 256 + 247) as u8, (v % 256) as u8]);
            }
            -1131..=-108 => {
                let v = -value - 108;
                self.data.extend_from_slice(&[(v / 256 + 251) as u8, (v % 256) as u8]);
            }
            _ => match self.dialect {
                Dialect::Type1 => {
                    self.data.push(255);
                    self.data.extend_from_slice(&value.to_be_bytes());
                }
                Dialect::Type2 => {
                    if let Ok(short) = i16::try_from(value) {
                        self.data.push(28);
                        self.data.extend_from_slice(&short.to_be_bytes());
                    } else {
                        self.data.push(255);
                        self.data.extend_from_slice(&(value << 16).to_be_bytes());
                    }
                }
            },
        }
    }
}
