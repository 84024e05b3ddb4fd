use super::*;
use crate::encode::sink::InMemorySink;

fn frame(marker: u8) -> RgbaImage {
    sized(8, 8, marker)
}

fn sized(w: u32, h: u32, marker: u8) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba([marker, 0, 0, 255]))
}

fn markers(sink: &InMemorySink) -> Vec<u8> {
    sink.frames().iter().map(|(_, f)| f.get_pixel(0, 0)[0]).collect()
}

fn fps() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn open_append_finish_writes_in_call_order() {
    let mut w = ContinuousVideoWriter::open_with_sink(InMemorySink::new(), &frame(0), fps(), 2)
        .unwrap();
    assert_eq!(w.frames_written(), 2);

    w.append(&[frame(1), frame(2)]).unwrap();
    w.append(vec![frame(3), frame(4), frame(5)].iter()).unwrap();
    let total = w.finish(&frame(9), 3).unwrap();

    assert_eq!(total, 2 + 2 + 3 + 3);
    assert!(w.is_finished());
    assert!(w.sink().is_ended());
    assert_eq!(markers(w.sink()), vec![0, 0, 1, 2, 3, 4, 5, 9, 9, 9]);
}

#[test]
fn sink_is_configured_from_initial_frame() {
    let w =
        ContinuousVideoWriter::open_with_sink(InMemorySink::new(), &sized(16, 10, 0), fps(), 0)
            .unwrap();
    let cfg = w.sink().config().unwrap();
    assert_eq!((cfg.width, cfg.height), (16, 10));
    assert_eq!(cfg.fps, fps());
    assert_eq!(cfg.macro_block_size, None);
    assert_eq!(w.frames_written(), 0);
}

#[test]
fn append_after_finish_is_use_after_finish() {
    let mut w = ContinuousVideoWriter::open_with_sink(InMemorySink::new(), &frame(0), fps(), 1)
        .unwrap();
    w.finish(&frame(1), 1).unwrap();

    let err = w.append(&[frame(2)]).unwrap_err();
    assert!(matches!(err, ZoomreelError::UseAfterFinish));
    let err = w.finish(&frame(2), 1).unwrap_err();
    assert!(matches!(err, ZoomreelError::UseAfterFinish));
    assert_eq!(w.frames_written(), 2);
}

#[test]
fn mismatched_frame_propagates_and_closes_writer() {
    let mut w = ContinuousVideoWriter::open_with_sink(InMemorySink::new(), &frame(0), fps(), 1)
        .unwrap();
    let err = w.append(&[frame(1), sized(4, 4, 2), frame(3)]).unwrap_err();
    assert!(matches!(err, ZoomreelError::Encoder(_)));

    assert!(w.is_finished());
    assert!(w.sink().is_ended());
    assert_eq!(markers(w.sink()), vec![0, 1]);
    assert!(matches!(
        w.append(&[frame(4)]).unwrap_err(),
        ZoomreelError::UseAfterFinish
    ));
}

#[test]
fn dropping_an_open_writer_ends_the_sink() {
    let mut sink = InMemorySink::new();
    {
        let mut w = ContinuousVideoWriter::open_with_sink(&mut sink, &frame(0), fps(), 1).unwrap();
        w.append(&[frame(1)]).unwrap();
    }
    assert!(sink.is_ended());
    assert_eq!(markers(&sink), vec![0, 1]);
}

#[test]
fn open_rejects_bad_fps_before_spawning() {
    let err = ContinuousVideoWriter::open("unused.mp4", &frame(0), -1.0, 15)
        .err()
        .unwrap();
    assert!(matches!(err, ZoomreelError::Validation(_)));
}
