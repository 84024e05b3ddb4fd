use super::*;

#[test]
fn mul_div255_edges() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(255, 128), 128);
}

#[test]
fn opacity_to_alpha_rounds_like_the_pipeline() {
    assert_eq!(opacity_to_alpha(1.0).unwrap(), 255);
    assert_eq!(opacity_to_alpha(0.0).unwrap(), 0);
    assert_eq!(opacity_to_alpha(0.5).unwrap(), 128);
    assert_eq!(opacity_to_alpha(0.25).unwrap(), 64);
}

#[test]
fn opacity_to_alpha_rejects_out_of_range() {
    for bad in [-0.01, 1.01, f64::NAN] {
        assert!(opacity_to_alpha(bad).is_err());
    }
}

#[test]
fn premultiply_scales_by_alpha_and_zeroes_transparent() {
    let mut px = [255, 128, 0, 255, 200, 100, 50, 128, 10, 255, 30, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [255, 128, 0, 255, 100, 50, 25, 128, 0, 0, 0, 0]);
}

#[test]
fn unpremultiply_restores_opaque_and_saturates() {
    let mut px = [255, 128, 0, 255, 100, 50, 25, 128, 200, 0, 0, 100, 9, 9, 9, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(
        px,
        [255, 128, 0, 255, 199, 100, 50, 128, 255, 0, 0, 100, 0, 0, 0, 0]
    );
}
