//! pnmgen - write a PBM/PGM/PPM test pattern.
//!
//! Diagnostics go to stdout and the exit status is always 0.

use std::path::PathBuf;

use zenanymap::{Encoding, GenerateJob, PnmFormat, Unstoppable};

const USAGE: &str = "\
Usage: pnmgen <img_type> <width> <height> <filename> <format>
  img_type: 1=PBM, 2=PGM, 3=PPM (or bit, gray, color)
  format: 0=ASCII, 1=raw (or text, binary)";

fn parse_format(arg: &str) -> Option<PnmFormat> {
    match arg.to_ascii_lowercase().as_str() {
        "1" | "bit" | "pbm" => Some(PnmFormat::Pbm),
        "2" | "gray" | "pgm" => Some(PnmFormat::Pgm),
        "3" | "color" | "ppm" => Some(PnmFormat::Ppm),
        _ => None,
    }
}

fn parse_encoding(arg: &str) -> Option<Encoding> {
    match arg.to_ascii_lowercase().as_str() {
        "0" | "text" | "ascii" | "plain" => Some(Encoding::Text),
        "1" | "binary" | "raw" => Some(Encoding::Binary),
        _ => None,
    }
}

fn parse_job(args: &[String]) -> Result<GenerateJob, String> {
    let [_, kind, width, height, output, encoding] = args else {
        return Err(format!("Error: Invalid number of arguments\n{USAGE}"));
    };
    let format = parse_format(kind)
        .ok_or("Error: Invalid image type. Use 1=PBM, 2=PGM, or 3=PPM")?;
    let encoding =
        parse_encoding(encoding).ok_or("Error: Invalid format. Use 0=ASCII or 1=raw")?;
    let width = width
        .parse()
        .map_err(|_| format!("Error: Invalid width {width:?}"))?;
    let height = height
        .parse()
        .map_err(|_| format!("Error: Invalid height {height:?}"))?;
    Ok(GenerateJob {
        format,
        width,
        height,
        output: PathBuf::from(output),
        encoding,
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let job = match parse_job(&args) {
        Ok(job) => job,
        Err(msg) => {
            println!("{msg}");
            return;
        }
    };

    if let Err(e) = job.validate() {
        println!("Error: {e}");
        return;
    }

    log::info!(
        "generating {:?} {}x{} ({:?}) -> {}",
        job.format,
        job.width,
        job.height,
        job.encoding,
        job.output.display()
    );

    match job.run(Unstoppable) {
        Ok(report) => {
            match &report.image_error {
                None => println!("Image generated successfully: {}", report.image.display()),
                Some(e) => println!("Error: Failed to save {}: {e}", report.image.display()),
            }
            for (channel, path) in &report.channels {
                println!("{} channel saved: {}", channel.name(), path.display());
            }
            for (channel, e) in &report.failed {
                println!("Error: Failed to save {} channel image: {e}", channel.name());
            }
        }
        Err(e) => println!("Error: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("pnmgen")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parses_numeric_and_named_arguments() {
        let job = parse_job(&args(&["3", "12", "8", "out.ppm", "1"])).unwrap();
        assert_eq!(job.format, PnmFormat::Ppm);
        assert_eq!((job.width, job.height), (12, 8));
        assert_eq!(job.encoding, Encoding::Binary);

        let job = parse_job(&args(&["gray", "4", "4", "g.pgm", "text"])).unwrap();
        assert_eq!(job.format, PnmFormat::Pgm);
        assert_eq!(job.encoding, Encoding::Text);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_job(&args(&["1", "4", "4", "x.pbm"])).is_err());
        assert!(parse_job(&args(&["4", "4", "4", "x.pbm", "0"])).is_err());
        assert!(parse_job(&args(&["1", "4", "4", "x.pbm", "2"])).is_err());
        assert!(parse_job(&args(&["1", "-4", "4", "x.pbm", "0"])).is_err());
    }
}
