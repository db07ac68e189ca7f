//! Apply cosmetic overlays (lip color, eyeliner) to a face photograph
//! using landmark coordinates supplied on the command line.

use std::path::PathBuf;

use clap::Parser;
use kohl_pipeline::{
    apply_makeup, landmarks::parse_eyelid_block, Color, FaceLandmarks, MakeupConfig,
};

/// Composite lip color and eyeliner onto a photograph from facial
/// landmark coordinates.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input photograph (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Output image path (PNG recommended).
    #[arg(short, long)]
    output: PathBuf,

    /// Landmark file in JSON form, holding lip boundaries and/or
    /// eyelid lash lines.
    #[arg(long, value_name = "FILE")]
    landmarks: Option<PathBuf>,

    /// Eyelid lash lines in the plain-text form: two blocks of "x y"
    /// lines separated by one blank line, left eye first. Overrides
    /// any eyelids in --landmarks.
    #[arg(long, value_name = "FILE")]
    eyelids: Option<PathBuf>,

    /// Lip tint as a hex color (e.g. "aa143c").
    #[arg(long, value_name = "RRGGBB")]
    lip_color: Option<String>,

    /// Eyeliner color as a hex color (e.g. "000000").
    #[arg(long, value_name = "RRGGBB")]
    liner_color: Option<String>,
}

// ---------------------------------------------------------------------------
// Color parsing
// ---------------------------------------------------------------------------

/// Parse a six-digit hex color ("RRGGBB", optional leading '#').
fn parse_hex_color(s: &str) -> Result<Color, String> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("color must be six hex digits, got: '{s}'"));
    }
    let channel = |range: std::ops::Range<usize>| -> Result<u8, String> {
        u8::from_str_radix(&digits[range], 16).map_err(|e| format!("invalid hex color '{s}': {e}"))
    };
    Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

// ---------------------------------------------------------------------------
// Landmark loading
// ---------------------------------------------------------------------------

/// Assemble the landmark set from the JSON file and/or the legacy
/// eyelid text file.
fn load_landmarks(args: &Args) -> Result<FaceLandmarks, Box<dyn std::error::Error>> {
    let mut landmarks = match &args.landmarks {
        Some(path) => {
            eprintln!("Reading landmarks from {}", path.display());
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        }
        None => FaceLandmarks::default(),
    };

    if let Some(path) = &args.eyelids {
        eprintln!("Reading eyelid lash lines from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        landmarks.eyelids = Some(parse_eyelid_block(&text)?);
    }

    Ok(landmarks)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = MakeupConfig::default();
    if let Some(spec) = &args.lip_color {
        config.lip_color = parse_hex_color(spec).map_err(|e| format!("--lip-color: {e}"))?;
    }
    if let Some(spec) = &args.liner_color {
        config.liner_color = parse_hex_color(spec).map_err(|e| format!("--liner-color: {e}"))?;
    }

    let landmarks = load_landmarks(&args)?;

    eprintln!("Reading image from {}", args.input.display());
    let image = image::open(&args.input)?.into_rgb8();
    eprintln!("Image: {}x{}", image.width(), image.height());

    eprintln!("Applying makeup...");
    let result = apply_makeup(&image, &landmarks, &config)?;

    for feature in &result.applied {
        eprintln!("Applied: {feature:?}");
    }
    for (feature, err) in &result.skipped {
        eprintln!("Skipped {feature:?}: {err}");
    }

    eprintln!("Saving to {}", args.output.display());
    result.image.save(&args.output)?;

    eprintln!("Done.");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_parses_with_and_without_hash() {
        assert_eq!(parse_hex_color("aa143c").unwrap(), Color::new(170, 20, 60));
        assert_eq!(parse_hex_color("#000000").unwrap(), Color::new(0, 0, 0));
        assert_eq!(parse_hex_color("FFFFFF").unwrap(), Color::new(255, 255, 255));
    }

    #[test]
    fn hex_color_rejects_bad_input() {
        assert!(parse_hex_color("abc").is_err());
        assert!(parse_hex_color("gggggg").is_err());
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("").is_err());
    }
}
