#![no_main]
//! Runs arbitrary charstrings through the interpreter with arbitrary
//! hint parameters and device transforms.

use libfuzzer_sys::{
    arbitrary::{self, Arbitrary},
    fuzz_target,
};
use psglyph::{
    hint::FontHints,
    provider::MemoryProvider,
    render_glyph,
    sink::NullSink,
    types::{Fixed, GlyphId, Matrix, Point},
    FontHintParams, RenderSettings,
};

#[derive(Arbitrary, Debug)]
struct Request<'a> {
    type2: bool,
    encrypted: bool,
    hinted: bool,
    /// Matrix coefficients in 1/1024 units.
    matrix: [i16; 4],
    blue_values: Vec<(i16, i16)>,
    stem_snap: Vec<u8>,
    weight_vector: Vec<u8>,
    log2_scale: (u8, u8),
    glyphs: Vec<&'a [u8]>,
    subrs: Vec<&'a [u8]>,
    standard_glyphs: Vec<u8>,
}

impl Request<'_> {
    fn params(&self) -> FontHintParams {
        let mut params = if self.type2 {
            FontHintParams::type2(self.subrs.len(), self.subrs.len())
        } else {
            FontHintParams::default()
        };
        if !self.encrypted {
            params.len_iv = -1;
        }
        let fixed = |v: i16| Fixed::from_i32(v as i32);
        params.blue_values = self
            .blue_values
            .iter()
            .take(7)
            .map(|(a, b)| (fixed(*a), fixed(*b)))
            .collect();
        params.stem_snap_h = self
            .stem_snap
            .iter()
            .take(12)
            .map(|v| Fixed::from_i32(*v as i32))
            .collect();
        params.weight_vector = self
            .weight_vector
            .iter()
            .take(16)
            .map(|w| *w as f64 / 255.0)
            .collect();
        params
    }

    fn matrix(&self) -> Matrix {
        let [xx, xy, yx, yy] = self.matrix.map(|v| v as f64 / 1024.0);
        Matrix::new(xx, xy, yx, yy, 0.0, 0.0)
    }
}

fuzz_target!(|request: Request| {
    let params = request.params();
    let matrix = request.matrix();
    let settings = RenderSettings {
        hinting: request.hinted,
        log2_scale: Point::new(request.log2_scale.0 % 3, request.log2_scale.1 % 3),
        ..Default::default()
    };
    let hints = FontHints::new(&params, &matrix, settings.log2_scale);
    let mut provider = MemoryProvider::new(request.glyphs.clone())
        .with_subrs(request.subrs.clone())
        .with_global_subrs(request.subrs.clone());
    for (i, code) in request.standard_glyphs.iter().enumerate() {
        provider = provider.with_standard_glyph(*code, GlyphId::new(i as u32));
    }
    for i in 0..request.glyphs.len() {
        let Ok(outline) = render_glyph(
            &mut provider,
            &params,
            &hints,
            &matrix,
            &settings,
            GlyphId::new(i as u32),
        ) else {
            continue;
        };
        let _ = outline.draw(&mut NullSink);
        let _ = outline.flatten();
    }
});
