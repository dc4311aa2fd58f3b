//! Access to charstring data and the client operand stack.

use alloc::vec::Vec;

use crate::{
    types::{Fixed, GlyphId},
    Error,
};

/// Supplies charstrings to the interpreter and acts as the PostScript
/// operand stack for OtherSubr calls the interpreter does not implement.
///
/// The lifetime `'a` is that of the underlying font data. Charstring bytes
/// are returned still encrypted; the interpreter decrypts them according to
/// `lenIV`.
pub trait GlyphDataProvider<'a> {
    /// Returns the charstring for the given glyph.
    fn glyph_data(&self, gid: GlyphId) -> Option<&'a [u8]>;

    /// Returns the subroutine with the given (biased) index from the local
    /// or global subroutine array.
    fn subr_data(&self, index: i32, is_global: bool) -> Option<&'a [u8]>;

    /// Returns the charstring for the glyph with the given standard
    /// encoding code, as used by `seac`.
    fn seac_data(&self, code: u8) -> Option<&'a [u8]>;

    /// Enumerates glyphs. Returns the glyph at `cursor` and the cursor of
    /// the next glyph.
    fn next_glyph(&self, cursor: usize) -> Option<(GlyphId, usize)> {
        let _ = cursor;
        None
    }

    /// Pushes OtherSubr arguments onto the client stack, first argument
    /// first.
    fn push(&mut self, values: &[Fixed]) -> Result<(), Error>;

    /// Pops a value from the client stack.
    fn pop(&mut self) -> Result<Fixed, Error>;

    /// Executes an OtherSubr the interpreter does not implement. Its
    /// arguments were pushed with [`GlyphDataProvider::push`] and its
    /// results are retrieved with [`GlyphDataProvider::pop`].
    ///
    /// The default leaves the arguments in place, so they are returned in
    /// reverse order.
    fn other_subr(&mut self, index: i32) -> Result<(), Error> {
        let _ = index;
        Ok(())
    }
}

/// Bounded operand stack for OtherSubr results.
#[derive(Clone, Default, Debug)]
pub struct ClientStack {
    values: Vec<Fixed>,
}

/// Limit matching the PostScript operand stack guarantee for font
/// procedures.
const CLIENT_STACK_LIMIT: usize = 500;

impl ClientStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, values: &[Fixed]) -> Result<(), Error> {
        if self.values.len() + values.len() > CLIENT_STACK_LIMIT {
            return Err(Error::StackOverflow);
        }
        self.values.extend_from_slice(values);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Fixed, Error> {
        self.values.pop().ok_or(Error::StackUnderflow)
    }
}

/// Provider backed by in memory charstring arrays.
#[derive(Clone, Default, Debug)]
pub struct MemoryProvider<'a> {
    pub glyphs: Vec<&'a [u8]>,
    pub subrs: Vec<&'a [u8]>,
    pub global_subrs: Vec<&'a [u8]>,
    /// Standard encoding code to glyph mapping for seac.
    pub standard_glyphs: Vec<(u8, GlyphId)>,
    pub stack: ClientStack,
}

impl<'a> MemoryProvider<'a> {
    pub fn new(glyphs: Vec<&'a [u8]>) -> Self {
        Self {
            glyphs,
            ..Default::default()
        }
    }

    pub fn with_subrs(mut self, subrs: Vec<&'a [u8]>) -> Self {
        self.subrs = subrs;
        self
    }

    pub fn with_global_subrs(mut self, subrs: Vec<&'a [u8]>) -> Self {
        self.global_subrs = subrs;
        self
    }

    pub fn with_standard_glyph(mut self, code: u8, gid: GlyphId) -> Self {
        self.standard_glyphs.push((code, gid));
        self
    }
}

impl<'a> GlyphDataProvider<'a> for MemoryProvider<'a> {
    fn glyph_data(&self, gid: GlyphId) -> Option<&'a [u8]> {
        self.glyphs.get(gid.to_u32() as usize).copied()
    }

    fn subr_data(&self, index: i32, is_global: bool) -> Option<&'a [u8]> {
        let subrs = if is_global {
            &self.global_subrs
        } else {
            &self.subrs
        };
        subrs.get(usize::try_from(index).ok()?).copied()
    }

    fn seac_data(&self, code: u8) -> Option<&'a [u8]> {
        let (_, gid) = self
            .standard_glyphs
            .iter()
            .find(|(entry_code, _)| *entry_code == code)?;
        self.glyph_data(*gid)
    }

    fn next_glyph(&self, cursor: usize) -> Option<(GlyphId, usize)> {
        (cursor < self.glyphs.len()).then(|| (GlyphId::new(cursor as u32), cursor + 1))
    }

    fn push(&mut self, values: &[Fixed]) -> Result<(), Error> {
        self.stack.push(values)
    }

    fn pop(&mut self) -> Result<Fixed, Error> {
        self.stack.pop()
    }
}
