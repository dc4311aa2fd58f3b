//! End to end rendering of the shared glyph fixtures.

use pretty_assertions::assert_eq;
use psglyph::{
    glyph::glyph_ids,
    hint::FontHints,
    path::{Path, SegmentKind},
    render_glyph,
    types::{Fixed, GlyphId, Matrix, Point},
    CharstringType, Error, ErrorKind, FontHintParams, MemoryProvider, Outline, RenderSettings,
};
use psglyph_test_data::{
    charstring::{t1, CharstringBuilder},
    glyphs,
};

fn pt(x: i32, y: i32) -> Point<Fixed> {
    Point::new(Fixed::from_i32(x), Fixed::from_i32(y))
}

fn type1_params() -> FontHintParams {
    FontHintParams {
        len_iv: -1,
        ..Default::default()
    }
}

fn hinted_params(charstring_type: CharstringType) -> FontHintParams {
    let mut params = match charstring_type {
        CharstringType::Type1 => type1_params(),
        CharstringType::Type2 => FontHintParams::type2(0, 0),
    };
    params.blue_values = vec![
        (Fixed::from_i32(-12), Fixed::ZERO),
        (Fixed::from_i32(500), Fixed::from_i32(512)),
        (Fixed::from_i32(700), Fixed::from_i32(712)),
    ];
    params.std_hw = Some(Fixed::from_i32(80));
    params.std_vw = Some(Fixed::from_i32(90));
    params
}

fn render(
    params: &FontHintParams,
    matrix: &Matrix,
    settings: &RenderSettings,
    glyph: &[u8],
    subrs: &[Vec<u8>],
) -> Result<Outline, Error> {
    let _ = env_logger::builder().is_test(true).try_init();
    let hints = FontHints::new(params, matrix, settings.log2_scale);
    let mut provider = MemoryProvider::new(vec![glyph])
        .with_subrs(subrs.iter().map(|subr| subr.as_slice()).collect());
    render_glyph(
        &mut provider,
        params,
        &hints,
        matrix,
        settings,
        GlyphId::new(0),
    )
}

fn render_unhinted(params: &FontHintParams, glyph: &[u8], subrs: &[Vec<u8>]) -> Outline {
    render(
        params,
        &Matrix::IDENTITY,
        &RenderSettings::unhinted(),
        glyph,
        subrs,
    )
    .unwrap()
}

/// Returns the path as (command, end point) pairs.
fn commands(path: &Path) -> Vec<(char, Point<Fixed>)> {
    path.segments()
        .iter()
        .map(|seg| {
            let c = match seg.kind {
                SegmentKind::Start => 'M',
                SegmentKind::Line => 'L',
                SegmentKind::LineClose => 'Z',
                SegmentKind::Curve { .. } => 'C',
            };
            (c, seg.pt)
        })
        .collect()
}

#[test]
fn type1_box() {
    let outline = render_unhinted(&type1_params(), &glyphs::type1_box(), &[]);
    assert_eq!(
        commands(&outline.path),
        vec![
            ('M', pt(50, 0)),
            ('L', pt(550, 0)),
            ('L', pt(550, 700)),
            ('L', pt(50, 700)),
            ('Z', pt(50, 0)),
        ]
    );
    assert_eq!(outline.lsb, pt(50, 0));
    assert_eq!(outline.width, pt(600, 0));
    assert_eq!(outline.advance, pt(600, 0));
    let bbox = outline.bbox().unwrap();
    assert_eq!(
        (bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max),
        (
            Fixed::from_i32(50),
            Fixed::ZERO,
            Fixed::from_i32(550),
            Fixed::from_i32(700)
        )
    );
}

#[test]
fn charstring_types_agree() {
    let t2_params = FontHintParams::type2(0, 0);
    for (type1, type2) in [
        (glyphs::type1_box(), glyphs::type2_box()),
        (glyphs::type1_o(), glyphs::type2_o()),
    ] {
        let t1_outline = render_unhinted(&type1_params(), &type1, &[]);
        let t2_outline = render_unhinted(&t2_params, &type2, &[]);
        assert_eq!(commands(&t1_outline.path), commands(&t2_outline.path));
        assert_eq!(t1_outline.width, t2_outline.width);
        assert_eq!(t1_outline.advance, t2_outline.advance);
    }
}

#[test]
fn encrypted_and_plain_charstrings_agree() {
    let plain = glyphs::type1_o();
    let encrypted = CharstringBuilder::type1().raw(&plain).encrypt(4);
    let params = FontHintParams::default();
    assert_eq!(params.len_iv, 4);
    let from_plain = render_unhinted(&type1_params(), &plain, &[]);
    let from_encrypted = render_unhinted(&params, &encrypted, &[]);
    assert_eq!(
        commands(&from_plain.path),
        commands(&from_encrypted.path)
    );
}

#[test]
fn flex_through_subroutines() {
    let subrs = glyphs::type1_flex_subrs();
    let outline = render_unhinted(&type1_params(), &glyphs::type1_flex(10), &subrs);
    assert_eq!(
        commands(&outline.path),
        vec![
            ('M', pt(0, 0)),
            ('C', pt(250, 10)),
            ('C', pt(500, 0)),
            ('L', pt(500, 500)),
            ('L', pt(0, 500)),
            ('Z', pt(0, 0)),
        ]
    );
    let controls: Vec<_> = outline.path.segments()[1..3]
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
    let flat = render_unhinted(&type1_params(), &glyphs::type1_flex(0), &subrs);
    assert_eq!(
        commands(&flat.path),
        vec![
            ('M', pt(0, 0)),
            ('L', pt(500, 0)),
            ('L', pt(500, 500)),
            ('L', pt(0, 500)),
            ('Z', pt(0, 0)),
        ]
    );
}

#[test]
fn hint_replacement_through_subroutine() {
    let mut subrs = glyphs::type1_flex_subrs();
    // replacement hints
    subrs.push(
        CharstringBuilder::type1()
            .args(&[600, 80])
            .op(t1::HSTEM)
            .op(t1::RETURN)
            .build(),
    );
    let cs = CharstringBuilder::type1()
        .args(&[0, 600])
        .op(t1::HSBW)
        .args(&[0, 80])
        .op(t1::HSTEM)
        .args(&[0, 0])
        .op(t1::RMOVETO)
        .args(&[0, 680])
        .op(t1::RLINETO)
        .args(&[4, 3])
        .op(t1::CALLSUBR)
        .args(&[500, 0])
        .op(t1::RLINETO)
        .op(t1::CLOSEPATH)
        .op(t1::ENDCHAR)
        .build();
    let params = hinted_params(CharstringType::Type1);
    let matrix = Matrix::scale(0.05, 0.05);
    let outline = render(&params, &matrix, &RenderSettings::default(), &cs, &subrs).unwrap();
    let kinds: Vec<_> = commands(&outline.path).iter().map(|(c, _)| *c).collect();
    assert_eq!(kinds, ['M', 'L', 'L', 'Z']);
}

/// Hinting moves points by at most a couple of pixels and never changes
/// the structure of the path.
#[test]
fn hinting_preserves_structure() {
    let matrix = Matrix::scale(0.012, 0.012);
    for (charstring_type, glyph) in [
        (CharstringType::Type1, glyphs::type1_box()),
        (CharstringType::Type1, glyphs::type1_o()),
        (CharstringType::Type2, glyphs::type2_box()),
        (CharstringType::Type2, glyphs::type2_o()),
    ] {
        let params = hinted_params(charstring_type);
        let hinted = render(&params, &matrix, &RenderSettings::default(), &glyph, &[]).unwrap();
        let unhinted = render(&params, &matrix, &RenderSettings::unhinted(), &glyph, &[]).unwrap();
        let hinted = commands(&hinted.path);
        let unhinted = commands(&unhinted.path);
        assert_eq!(hinted.len(), unhinted.len());
        for ((c0, p0), (c1, p1)) in hinted.iter().zip(&unhinted) {
            assert_eq!(c0, c1);
            let d = *p0 - *p1;
            assert!(
                d.x.abs() <= Fixed::from_i32(2) && d.y.abs() <= Fixed::from_i32(2),
                "{p0:?} moved too far from {p1:?}"
            );
        }
    }
}

#[test]
fn flattened_outline_keeps_on_curve_points() {
    let matrix = Matrix::scale(0.1, 0.1);
    let params = type1_params();
    let outline = render(
        &params,
        &matrix,
        &RenderSettings::unhinted(),
        &glyphs::type1_o(),
        &[],
    )
    .unwrap();
    let flat = outline.flatten().unwrap();
    assert!(flat.segments().iter().all(|seg| !seg.is_curve()));
    assert!(flat.len() > outline.path.len());
    // every segment end point of the original appears, in order
    let mut flat_points = flat.segments().iter().map(|seg| seg.pt);
    for seg in outline.path.segments() {
        assert!(
            flat_points.any(|p| p == seg.pt),
            "missing on-curve point {:?}",
            seg.pt
        );
    }
}

#[test]
fn render_every_glyph() {
    let glyph_data = [glyphs::type1_box(), glyphs::type1_o(), glyphs::type1_box()];
    let params = type1_params();
    let matrix = Matrix::scale(0.02, 0.02);
    let settings = RenderSettings::default();
    let hints = FontHints::new(&params, &matrix, settings.log2_scale);
    let mut provider = MemoryProvider::new(glyph_data.iter().map(|g| g.as_slice()).collect());
    let ids: Vec<_> = glyph_ids(&provider).collect();
    assert_eq!(ids.len(), 3);
    for gid in ids {
        let outline = render_glyph(&mut provider, &params, &hints, &matrix, &settings, gid).unwrap();
        assert!(!outline.path.is_empty());
        assert_eq!(outline.advance, Point::new(Fixed::from_i32(12), Fixed::ZERO));
    }
}

#[test]
fn malformed_charstrings_report_kinds() {
    let params = type1_params();
    let render_error = |cs: Vec<u8>| {
        render(
            &params,
            &Matrix::IDENTITY,
            &RenderSettings::unhinted(),
            &cs,
            &[],
        )
        .unwrap_err()
    };
    let missing_subr = CharstringBuilder::type1()
        .args(&[0, 100])
        .op(t1::HSBW)
        .args(&[9])
        .op(t1::CALLSUBR)
        .build();
    let err = render_error(missing_subr);
    assert_eq!(err, Error::MissingSubroutine(9));
    assert_eq!(err.kind(), ErrorKind::MalformedCharstring);
    let truncated = CharstringBuilder::type1()
        .args(&[0, 100])
        .op(t1::HSBW)
        .build();
    assert_eq!(render_error(truncated).kind(), ErrorKind::MalformedCharstring);
    let overflow = CharstringBuilder::type1().args(&[1 << 30]).build();
    assert_eq!(render_error(overflow).kind(), ErrorKind::NumericOverflow);
}
