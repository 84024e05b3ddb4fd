use super::*;

#[test]
fn fps_new_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::new(30, 1).unwrap(), Fps { num: 30, den: 1 });
}

#[test]
fn fps_from_whole_float_is_integral() {
    assert_eq!(Fps::from_f64(30.0).unwrap(), Fps { num: 30, den: 1 });
    assert_eq!(Fps::from_f64(1.0).unwrap().to_string(), "1/1");
}

#[test]
fn fps_from_fractional_float_is_reduced() {
    assert_eq!(Fps::from_f64(29.97).unwrap(), Fps { num: 2997, den: 100 });
    assert_eq!(Fps::from_f64(12.5).unwrap(), Fps { num: 25, den: 2 });
}

#[test]
fn fps_from_f64_rejects_bad_values() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, 0.0001] {
        assert!(Fps::from_f64(bad).is_err(), "{bad} should be rejected");
    }
}

#[test]
fn frame_index_orders_numerically() {
    assert!(FrameIndex(2) > FrameIndex(1));
    let json = serde_json::to_string(&FrameIndex(7)).unwrap();
    assert_eq!(json, "7");
}
