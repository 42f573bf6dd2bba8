use stravex::error::DecodeError;
use stravex::pipeline::polyline;

#[test]
fn decodes_reference_path() {
    let points = polyline::decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@", 5).expect("decode");
    let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.lat, p.lon)).collect();
    assert_eq!(
        coords,
        vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]
    );
}

#[test]
fn empty_input_decodes_to_no_points() {
    let points = polyline::decode("", 5).expect("decode");
    assert!(points.is_empty());
}

#[test]
fn precision_shifts_the_decimal_point() {
    let p5 = polyline::decode("_p~iF~ps|U", 5).expect("decode");
    let p6 = polyline::decode("_p~iF~ps|U", 6).expect("decode");
    assert!((p5[0].lat - 38.5).abs() < 1e-9);
    assert!((p6[0].lat - 3.85).abs() < 1e-9);
}

#[test]
fn truncated_value_is_an_error() {
    // The final '_' carries the continuation bit, so its value never ends.
    match polyline::decode("_p~iF~ps|U_", 5) {
        Err(DecodeError::UnexpectedEof(pos)) => assert_eq!(pos, 11),
        other => panic!("expected eof error, got {:?}", other),
    }
}

#[test]
fn dangling_latitude_is_an_error() {
    match polyline::decode("_p~iF", 5) {
        Err(DecodeError::UnexpectedEof(pos)) => assert_eq!(pos, 5),
        other => panic!("expected eof error, got {:?}", other),
    }
}

#[test]
fn byte_below_the_alphabet_floor_is_an_error() {
    match polyline::decode("_p~iF~ps|U!", 5) {
        Err(DecodeError::InvalidCharacter(byte, pos)) => {
            assert_eq!(byte, b'!');
            assert_eq!(pos, 10);
        }
        other => panic!("expected invalid character error, got {:?}", other),
    }
}

#[test]
fn unterminated_wide_value_overflows() {
    // Fourteen continuation chunks exceed any encodable 64-bit value.
    let encoded = "~".repeat(14);
    assert!(matches!(
        polyline::decode(&encoded, 5),
        Err(DecodeError::ValueOverflow(_))
    ));
}

#[test]
fn coordinate_sum_overflow_is_an_error() {
    // Each 13-chunk value decodes to i64::MIN; the second pair pushes the
    // running latitude past the integer range.
    let encoded = ("~".repeat(12) + "N").repeat(4);
    match polyline::decode(&encoded, 5) {
        Err(DecodeError::ValueOverflow(pos)) => assert_eq!(pos, 26),
        other => panic!("expected overflow error, got {:?}", other),
    }
}
