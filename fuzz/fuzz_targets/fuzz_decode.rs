#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Auto-detect decode and header probe must never panic
    let _ = zenanymap::decode(data, enough::Unstoppable);
    let _ = zenanymap::ImageInfo::from_bytes(data);

    // Typed decode of each format must never panic either
    let request = zenanymap::DecodeRequest::new(data);
    let _ = request.clone().decode_as::<zenanymap::BitImage>(enough::Unstoppable);
    let _ = request.clone().decode_as::<zenanymap::GrayImage>(enough::Unstoppable);
    let _ = request.decode_as::<zenanymap::ColorImage>(enough::Unstoppable);
});
