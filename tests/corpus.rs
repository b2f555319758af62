//! Test corpus: generated patterns, hand-written files, and on-disk output.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use enough::{StopReason, Unstoppable};
use zenanymap::*;

/// Fresh scratch directory under the system temp dir.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("zenanymap-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ── Pattern roundtrips ───────────────────────────────────────────────

#[test]
fn patterns_roundtrip_at_several_sizes() {
    for (w, h) in [(4, 4), (8, 4), (12, 8), (24, 16)] {
        let bit = pattern::bit_pattern(w, h, &Unstoppable).unwrap();
        let gray = pattern::gray_pattern(w, h, &Unstoppable).unwrap();
        for encoding in [Encoding::Text, Encoding::Binary] {
            let out = decode(&encode(&bit, encoding, Unstoppable).unwrap(), Unstoppable).unwrap();
            assert_eq!(out.image.as_bit(), Some(&bit));
            let out = decode(&encode(&gray, encoding, Unstoppable).unwrap(), Unstoppable).unwrap();
            assert_eq!(out.image.as_gray(), Some(&gray));
        }
    }
    for (w, h) in [(6, 4), (12, 8), (36, 20)] {
        let color = pattern::color_pattern(w, h, &Unstoppable).unwrap();
        for encoding in [Encoding::Text, Encoding::Binary] {
            let bytes = encode(&color, encoding, Unstoppable).unwrap();
            let out = DecodeRequest::new(&bytes)
                .decode_as::<ColorImage>(Unstoppable)
                .unwrap();
            assert_eq!(out, color);
        }
    }
}

#[test]
fn bit_pattern_4x4_golden_file() {
    let img = pattern::bit_pattern(4, 4, &Unstoppable).unwrap();
    assert_eq!(
        encode(&img, Encoding::Text, Unstoppable).unwrap(),
        b"P1\n4 4\n1 1 1 1\n1 1 1 1\n1 1 1 1\n1 1 1 1\n"
    );
    assert_eq!(
        encode(&img, Encoding::Binary, Unstoppable).unwrap(),
        b"P4\n4 4\n\xf0\xf0\xf0\xf0"
    );
}

#[test]
fn bit_pattern_8x4_golden_file() {
    let img = pattern::bit_pattern(8, 4, &Unstoppable).unwrap();
    assert_eq!(
        encode(&img, Encoding::Binary, Unstoppable).unwrap(),
        b"P4\n8 4\n\xff\xe7\xdb\xff"
    );
}

#[test]
fn gray_pattern_4x4_golden_file() {
    let img = pattern::gray_pattern(4, 4, &Unstoppable).unwrap();
    assert_eq!(
        encode(&img, Encoding::Text, Unstoppable).unwrap(),
        b"P2\n4 4\n255\n0 0 0 0\n0 255 255 0\n0 255 0 0\n0 0 0 0\n"
    );
}

#[test]
fn extracted_channels_match_pattern_bands() {
    let color = pattern::color_pattern(6, 4, &Unstoppable).unwrap();
    let red = extract_channel(&color, Channel::Red);
    let green = extract_channel(&color, Channel::Green);
    let blue = extract_channel(&color, Channel::Blue);
    assert_eq!(red.rows().next().unwrap(), &[255, 255, 255, 255, 0, 0]);
    assert_eq!(green.rows().next().unwrap(), &[0, 0, 255, 255, 0, 0]);
    assert_eq!(blue.rows().next().unwrap(), &[0, 0, 255, 255, 255, 255]);
    for gray in [&red, &green, &blue] {
        assert_eq!((gray.width(), gray.height(), gray.max_value()), (6, 4, 255));
    }
}

// ── Files from other writers ─────────────────────────────────────────

#[test]
fn plain_files_with_comments_and_odd_spacing() {
    let pbm = b"P1\n# CREATOR: hand\n# second comment\n5 2\n01010\r\n1 1\t1 0 0\n";
    let out = decode(pbm, Unstoppable).unwrap();
    let bit = out.image.as_bit().unwrap();
    assert_eq!(bit.samples(), &[0, 1, 0, 1, 0, 1, 1, 1, 0, 0]);
    assert_eq!(out.encoding, Encoding::Text);

    let pgm = b"P2 3 1 # inline\n 15 # max\n 0\n\n 7 # mid\n15";
    let out = decode(pgm, Unstoppable).unwrap();
    let gray = out.image.as_gray().unwrap();
    assert_eq!(gray.samples(), &[0, 7, 15]);
    assert_eq!(gray.max_value(), 15);

    let ppm = b"P3\n2 1\n255\n255   0 0\n 0 255\n 0\n";
    let out = decode(ppm, Unstoppable).unwrap();
    let color = out.image.as_color().unwrap();
    assert_eq!(color.pixels(), &[RGB8::new(255, 0, 0), RGB8::new(0, 255, 0)]);
}

#[test]
fn raw_files_with_header_comments_and_trailing_bytes() {
    let pgm = b"P5\n# gimp\n2 2\n# depth\n255\n\x01\x02\x03\x04trailing";
    let out = decode(pgm, Unstoppable).unwrap();
    assert_eq!(out.image.as_gray().unwrap().samples(), &[1, 2, 3, 4]);

    // Sample data may itself start with a whitespace byte value.
    let ppm = b"P6 1 1 255 \x0a\x20\x09";
    let out = decode(ppm, Unstoppable).unwrap();
    assert_eq!(out.image.as_color().unwrap().get(0, 0), RGB8::new(10, 32, 9));

    // Padding bits set by a sloppy writer are ignored.
    let pbm = b"P4\n3 1\n\xbf";
    let out = decode(pbm, Unstoppable).unwrap();
    assert_eq!(out.image.as_bit().unwrap().samples(), &[1, 0, 1]);
}

// ── On-disk output ───────────────────────────────────────────────────

#[test]
fn write_and_read_file() {
    let dir = scratch("file");
    let img = pattern::gray_pattern(8, 8, &Unstoppable).unwrap();
    for (encoding, name) in [(Encoding::Text, "plain.pgm"), (Encoding::Binary, "raw.pgm")] {
        let path = dir.join(name);
        write_file(&img, &path, encoding, Unstoppable).unwrap();
        let out = read_file(&path, Unstoppable).unwrap();
        assert_eq!(out.encoding, encoding);
        assert_eq!(out.image.as_gray(), Some(&img));
    }
    let limits = Limits {
        max_width: Some(4),
        ..Default::default()
    };
    assert!(matches!(
        read_file_with_limits(dir.join("raw.pgm"), &limits, Unstoppable),
        Err(AnymapError::LimitExceeded(_))
    ));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_to_missing_directory_is_io_failure() {
    let dir = scratch("missing");
    let path = dir.join("no-such-dir").join("out.pbm");
    let img = pattern::bit_pattern(4, 4, &Unstoppable).unwrap();
    assert!(matches!(
        EncodeRequest::binary().write_file(&img, &path, Unstoppable),
        Err(AnymapError::Io(_))
    ));
    assert!(!path.exists());
    assert!(matches!(
        read_file(&path, Unstoppable),
        Err(AnymapError::Io(_))
    ));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn color_job_writes_three_channel_files() {
    let dir = scratch("job");
    for encoding in [Encoding::Text, Encoding::Binary] {
        let job = GenerateJob {
            format: PnmFormat::Ppm,
            width: 12,
            height: 8,
            output: dir.join("pattern.ppm"),
            encoding,
        };
        let report = job.run(Unstoppable).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.image, job.output);

        let color = read_file(&job.output, Unstoppable).unwrap();
        assert_eq!(color.encoding, encoding);
        let color = color.image.as_color().unwrap().clone();

        let names: Vec<_> = report
            .channels
            .iter()
            .map(|(_, p)| p.file_name().unwrap().to_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, ["RED_pattern.pgm", "GREEN_pattern.pgm", "BLUE_pattern.pgm"]);

        for (channel, path) in &report.channels {
            let out = read_file(path, Unstoppable).unwrap();
            assert_eq!(out.encoding, encoding);
            assert_eq!(out.image.as_gray(), Some(&extract_channel(&color, *channel)));
        }
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn channel_failure_does_not_stop_the_others() {
    let dir = scratch("partial");
    // A directory squatting on the GREEN output makes that one write fail.
    std::fs::create_dir_all(dir.join("GREEN_img.pgm")).unwrap();
    let job = GenerateJob {
        format: PnmFormat::Ppm,
        width: 6,
        height: 4,
        output: dir.join("img.ppm"),
        encoding: Encoding::Binary,
    };
    let report = job.run(Unstoppable).unwrap();
    assert!(report.image_error.is_none());
    assert!(!report.is_complete());
    let written: Vec<_> = report.channels.iter().map(|(c, _)| *c).collect();
    assert_eq!(written, [Channel::Red, Channel::Blue]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, Channel::Green);
    assert!(matches!(report.failed[0].1, AnymapError::Io(_)));
    assert!(dir.join("BLUE_img.pgm").is_file());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bit_and_gray_jobs_write_single_file() {
    let dir = scratch("single");
    for (format, name) in [(PnmFormat::Pbm, "b.pbm"), (PnmFormat::Pgm, "g.pgm")] {
        let job = GenerateJob {
            format,
            width: 8,
            height: 4,
            output: dir.join(name),
            encoding: Encoding::Text,
        };
        let report = job.run(Unstoppable).unwrap();
        assert!(report.is_complete());
        assert!(report.channels.is_empty());
        let info = ImageInfo::from_bytes(&std::fs::read(&job.output).unwrap()).unwrap();
        assert_eq!(info.format, format);
        assert_eq!((info.width, info.height), (8, 4));
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn main_image_failure_still_exports_channels() {
    let dir = scratch("main-blocked");
    // A directory squatting on the pixmap path makes only that write fail.
    std::fs::create_dir_all(dir.join("img.ppm")).unwrap();
    let job = GenerateJob {
        format: PnmFormat::Ppm,
        width: 6,
        height: 4,
        output: dir.join("img.ppm"),
        encoding: Encoding::Text,
    };
    let report = job.run(Unstoppable).unwrap();
    assert!(matches!(report.image_error, Some(AnymapError::Io(_))));
    assert!(report.failed.is_empty());
    assert_eq!(report.channels.len(), 3);
    assert!(dir.join("img.ppm").is_dir());
    for name in ["RED_img.pgm", "GREEN_img.pgm", "BLUE_img.pgm"] {
        let out = read_file(dir.join(name), Unstoppable).unwrap();
        assert_eq!(out.image.format(), PnmFormat::Pgm);
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unopenable_existing_file_is_left_alone() {
    let dir = scratch("readonly");
    let path = dir.join("keep.pgm");
    std::fs::write(&path, b"precious").unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(&path, perms).unwrap();

    let img = pattern::gray_pattern(4, 4, &Unstoppable).unwrap();
    match write_file(&img, &path, Encoding::Binary, Unstoppable) {
        // Privileged users can open read-only files; nothing to check then.
        Ok(()) => {}
        Err(e) => {
            assert!(matches!(e, AnymapError::Io(_)));
            assert_eq!(std::fs::read(&path).unwrap(), b"precious");
        }
    }
    let _ = std::fs::remove_dir_all(&dir);
}

// ── Cancellation ─────────────────────────────────────────────────────

/// Allows `checks` calls to `check`, then reports cancellation.
struct StopAfter(AtomicUsize);

impl StopAfter {
    fn new(checks: usize) -> Self {
        Self(AtomicUsize::new(checks))
    }
}

impl Stop for StopAfter {
    fn check(&self) -> Result<(), StopReason> {
        self.0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .map(|_| ())
            .map_err(|_| StopReason::Cancelled)
    }
}

fn is_cancelled<T>(result: Result<T, AnymapError>) -> bool {
    matches!(result, Err(AnymapError::Cancelled(StopReason::Cancelled)))
}

#[test]
fn decode_stops_partway_through_tall_images() {
    let gray = GrayImage::from_samples(2, 64, 255, (0..128).collect()).unwrap();
    for encoding in [Encoding::Text, Encoding::Binary] {
        let bytes = encode(&gray, encoding, Unstoppable).unwrap();
        // One check before the samples, one at row 0, then row 16 stops.
        assert!(is_cancelled(decode(&bytes, &StopAfter::new(2))), "{encoding:?}");
        assert!(decode(&bytes, &StopAfter::new(5)).is_ok());
    }
}

#[test]
fn encode_stops_partway() {
    let bit = BitImage::new(8, 64).unwrap();
    let color = ColorImage::new(3, 64, 255).unwrap();
    for encoding in [Encoding::Text, Encoding::Binary] {
        assert!(is_cancelled(encode(&bit, encoding, &StopAfter::new(2))));
        assert!(is_cancelled(encode(&color, encoding, &StopAfter::new(0))));
        assert!(encode(&color, encoding, &StopAfter::new(5)).is_ok());
    }
}

#[test]
fn pattern_generation_stops() {
    assert!(is_cancelled(pattern::color_pattern(6, 64, &StopAfter::new(1))));
    assert!(is_cancelled(pattern::gray_pattern(64, 64, &StopAfter::new(0))));
    assert!(is_cancelled(pattern::bit_pattern(4, 4, &StopAfter::new(0))));
}

#[test]
fn cancelled_job_leaves_no_partial_files() {
    let dir = scratch("cancel");
    let job = GenerateJob {
        format: PnmFormat::Ppm,
        width: 6,
        height: 8,
        output: dir.join("img.ppm"),
        encoding: Encoding::Binary,
    };
    let channel_files = ["RED_img.pgm", "GREEN_img.pgm", "BLUE_img.pgm"];

    // Stopped while generating, then while encoding the pixmap.
    for checks in [0, 1] {
        assert!(is_cancelled(job.run(&StopAfter::new(checks))));
        assert!(!job.output.exists());
        assert!(channel_files.iter().all(|name| !dir.join(name).exists()));
    }

    // Pixmap written, then stopped while encoding the first channel.
    assert!(is_cancelled(job.run(&StopAfter::new(3))));
    assert!(job.output.is_file());
    assert!(channel_files.iter().all(|name| !dir.join(name).exists()));
    let _ = std::fs::remove_dir_all(&dir);
}
