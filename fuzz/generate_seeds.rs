#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // Plain formats, with comments
    fs::write(format!("{dir}/pbm_plain.pbm"), b"P1\n# seed\n4 2\n1 0 1 0\n0101\n").unwrap();
    fs::write(format!("{dir}/pgm_plain.pgm"), b"P2\n3 2\n15\n0 7 15\n1 2 3\n").unwrap();
    fs::write(format!("{dir}/ppm_plain.ppm"), b"P3 1 1 255\n255 128 0\n").unwrap();

    // Raw formats
    fs::write(format!("{dir}/pbm_12x2.pbm"), b"P4\n12 2\n\xff\xf0\x80\x10").unwrap();
    fs::write(format!("{dir}/pgm_3x2.pgm"), b"P5\n3 2\n255\n\x00\x40\x80\xc0\xff\x64").unwrap();
    let ppm = b"P6\n2 2\n255\n\xff\x00\x00\x00\xff\x00\x00\x00\xff\x80\x80\x80";
    fs::write(format!("{dir}/ppm_2x2.ppm"), ppm).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_p6.bin"), b"P6").unwrap();
    fs::write(format!("{dir}/bad_max.bin"), b"P2\n2 2\nabc\n").unwrap();
    fs::write(format!("{dir}/huge_dims.bin"), b"P1\n4294967295 4294967295\n0").unwrap();

    println!("Generated seed corpus in {dir}/");
}
