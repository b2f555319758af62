#![no_main]
use libfuzzer_sys::fuzz_target;
use zenanymap::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding in either encoding must decode to the same image
    let Ok(decoded) = decode(data, enough::Unstoppable) else {
        return;
    };

    for encoding in [Encoding::Text, Encoding::Binary] {
        let reencoded = match &decoded.image {
            AnyImage::Bit(img) => encode(img, encoding, enough::Unstoppable),
            AnyImage::Gray(img) => encode(img, encoding, enough::Unstoppable),
            AnyImage::Color(img) => encode(img, encoding, enough::Unstoppable),
        };
        let Ok(reencoded) = reencoded else {
            panic!("decoded image failed to encode");
        };
        let Ok(decoded2) = decode(&reencoded, enough::Unstoppable) else {
            panic!("re-encoded data failed to decode");
        };
        assert_eq!(decoded.image, decoded2.image, "roundtrip mismatch");
        assert_eq!(decoded2.encoding, encoding);
    }
});
