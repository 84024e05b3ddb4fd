use super::*;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

fn frame(w: u32, h: u32, v: u8) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba([v, v, v, 255]))
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(SinkConfig::new(0, 10, fps30()).validate().is_err());
    assert!(SinkConfig::new(10, 0, fps30()).validate().is_err());
    assert!(
        SinkConfig {
            macro_block_size: Some(0),
            ..SinkConfig::new(10, 10, fps30())
        }
        .validate()
        .is_err()
    );
    // Odd sizes are fine at this level; the ffmpeg sink pads them.
    assert!(SinkConfig::new(11, 7, fps30()).validate().is_ok());
}

#[test]
fn for_frame_copies_dimensions_and_disables_alignment() {
    let cfg = SinkConfig::for_frame(&frame(12, 8, 0), fps30());
    assert_eq!((cfg.width, cfg.height), (12, 8));
    assert_eq!(cfg.macro_block_size, None);
}

#[test]
fn in_memory_sink_captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig::new(4, 4, fps30())).unwrap();
    sink.push_frame(FrameIndex(0), &frame(4, 4, 1)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(4, 4, 2)).unwrap();
    sink.end().unwrap();

    assert!(sink.is_ended());
    assert_eq!(sink.config().unwrap().fps, fps30());
    let values: Vec<u8> = sink.frames().iter().map(|(_, f)| f.get_pixel(0, 0)[0]).collect();
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn in_memory_sink_rejects_out_of_order_and_mismatched_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig::new(4, 4, fps30())).unwrap();
    sink.push_frame(FrameIndex(3), &frame(4, 4, 0)).unwrap();

    let err = sink.push_frame(FrameIndex(3), &frame(4, 4, 0)).unwrap_err();
    assert!(matches!(err, ZoomreelError::Encoder(_)));

    let err = sink.push_frame(FrameIndex(4), &frame(5, 4, 0)).unwrap_err();
    assert!(err.to_string().contains("frame size mismatch"));
}

#[test]
fn in_memory_sink_requires_begin() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame(2, 2, 0)).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn push_after_end_is_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig::new(2, 2, fps30())).unwrap();
    sink.end().unwrap();
    assert!(sink.push_frame(FrameIndex(0), &frame(2, 2, 0)).is_err());
}

#[test]
fn mutable_reference_forwards_to_inner_sink() {
    let mut inner = InMemorySink::new();
    {
        let mut by_ref = &mut inner;
        FrameSink::begin(&mut by_ref, SinkConfig::new(2, 2, fps30())).unwrap();
        FrameSink::push_frame(&mut by_ref, FrameIndex(0), &frame(2, 2, 9)).unwrap();
        FrameSink::end(&mut by_ref).unwrap();
    }
    assert_eq!(inner.frames().len(), 1);
}
