//! ensure serde is working as expected

use super::*;

#[test]
fn test_serde() {
    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct MyTypes {
        f1: Fixed,
        f2: F16Dot16,
        gid: GlyphId,
        point: Point<Fixed>,
        bbox: BoundingBox<i32>,
        matrix: Matrix,
    }

    let my_instance = MyTypes {
        f1: Fixed::from_f64(521.5),
        f2: F16Dot16::from_f64(-1001.25),
        gid: GlyphId::new(69),
        point: Point::new(Fixed::from_i32(3), Fixed::from_f64(-0.5)),
        bbox: BoundingBox {
            x_min: -10,
            y_min: -20,
            x_max: 300,
            y_max: 700,
        },
        matrix: Matrix::new(0.012, 0.0, 0.0, -0.012, 10.0, 20.0),
    };

    let dumped = serde_json::to_string(&my_instance).unwrap();
    let loaded: MyTypes = serde_json::from_str(&dumped).unwrap();
    assert_eq!(my_instance, loaded)
}
