#![no_main]
//! Checks that flattened curves start and end at the curve endpoints.

use libfuzzer_sys::{
    arbitrary::{self, Arbitrary},
    fuzz_target,
};
use psglyph::{
    flatten::{flatten_with_flatness, Curve},
    types::{Fixed, Point},
};

#[derive(Arbitrary, Debug)]
struct Input {
    points: [(i32, i32); 4],
    flatness: u16,
}

fuzz_target!(|input: Input| {
    let [p0, p1, p2, p3] = input
        .points
        .map(|(x, y)| Point::new(Fixed::from_bits(x >> 4), Fixed::from_bits(y >> 4)));
    let flatness = Fixed::from_bits(input.flatness.max(1) as i32);
    let mut out = Vec::new();
    flatten_with_flatness(p0, &Curve::new(p1, p2, p3), flatness, &mut out);
    assert_eq!(out.last(), Some(&p3));
});
