//! Charstring interpretation errors.

use core::fmt;

/// Broad classification of an [`Error`].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ErrorKind {
    /// The charstring or its subroutines are structurally invalid.
    MalformedCharstring,
    /// A value did not fit the fixed point range or a numeric buffer
    /// overflowed.
    NumericOverflow,
    /// A resource required by the interpreter was unavailable.
    Resource,
}

/// Errors that may occur while interpreting a charstring.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Error {
    InvalidOperator(u8),
    InvalidEscapeOperator(u8),
    StackUnderflow,
    StackOverflow,
    InvalidStackAccess(usize),
    NestingDepthLimitExceeded,
    ReturnWithoutCall,
    UnexpectedEnd,
    MissingSubroutine(i32),
    MissingGlyph(u32),
    InvalidSeacCode(i32),
    StemHintLimitExceeded,
    HintMaskOutOfRange,
    InvalidTransientIndex(i32),
    InvalidRegistryIndex(i32),
    InvalidFlex,
    FlexOverflow,
    IntegerOverflow(i32),
    DivideByZero,
    InvalidBlend,
    InvalidOtherSubrArgs,
    StepLimitExceeded,
    InvalidState,
    Resource(&'static str),
}

impl Error {
    /// Returns the broad classification of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StackOverflow | Self::FlexOverflow | Self::IntegerOverflow(_) | Self::DivideByZero => {
                ErrorKind::NumericOverflow
            }
            Self::Resource(_) => ErrorKind::Resource,
            _ => ErrorKind::MalformedCharstring,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOperator(op) => write!(f, "invalid charstring operator {op}"),
            Self::InvalidEscapeOperator(op) => {
                write!(f, "invalid escaped charstring operator 12 {op}")
            }
            Self::StackUnderflow => write!(f, "operand stack underflow"),
            Self::StackOverflow => write!(f, "operand stack overflow"),
            Self::InvalidStackAccess(index) => {
                write!(f, "stack index {index} was out of bounds")
            }
            Self::NestingDepthLimitExceeded => {
                write!(f, "subroutine nesting depth exceeded the limit")
            }
            Self::ReturnWithoutCall => write!(f, "return with no active subroutine call"),
            Self::UnexpectedEnd => write!(f, "unexpected end of charstring"),
            Self::MissingSubroutine(index) => write!(f, "subroutine {index} not found"),
            Self::MissingGlyph(gid) => write!(f, "charstring for glyph {gid} not found"),
            Self::InvalidSeacCode(code) => {
                write!(f, "seac character code {code} is not a standard encoding code")
            }
            Self::StemHintLimitExceeded => write!(f, "too many stem hints"),
            Self::HintMaskOutOfRange => write!(f, "hint mask exceeds the hint table"),
            Self::InvalidTransientIndex(index) => {
                write!(f, "transient array index {index} was out of bounds")
            }
            Self::InvalidRegistryIndex(index) => {
                write!(f, "registry index {index} was out of bounds")
            }
            Self::InvalidFlex => write!(f, "flex sequence was malformed"),
            Self::FlexOverflow => write!(f, "too many flex points"),
            Self::IntegerOverflow(value) => {
                write!(f, "integer operand {value} exceeds the fixed point range")
            }
            Self::DivideByZero => write!(f, "attempt to divide by 0"),
            Self::InvalidBlend => write!(f, "blend operands do not match the weight vector"),
            Self::InvalidOtherSubrArgs => write!(f, "invalid othersubr argument count"),
            Self::StepLimitExceeded => write!(f, "too many charstring operators executed"),
            Self::InvalidState => write!(f, "interpreter was resumed in an invalid state"),
            Self::Resource(what) => write!(f, "resource unavailable: {what}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
