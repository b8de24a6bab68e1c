//! Plain-text PPM (`P3`) image output.
//!
//! Layout: a `P3` line, a `<width> <height>` line, a `255` line, then one
//! `r g b` line per pixel, rows top to bottom, each row left to right.

use std::io::Write;

use thiserror::Error;

/// Maximum channel value written in the header.
pub const MAX_CHANNEL: u16 = 255;

#[derive(Error, Debug)]
pub enum PpmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported magic number {0:?}, expected \"P3\"")]
    UnsupportedMagic(String),

    #[error("Malformed PPM {what}: {token:?}")]
    Parse { what: &'static str, token: String },

    #[error("Channel value {value} exceeds maximum {max}")]
    ChannelOutOfRange { value: u32, max: u16 },

    #[error("Expected {expected} pixels, found {found}")]
    PixelCount { expected: usize, found: usize },
}

pub type PpmResult<T> = Result<T, PpmError>;

/// A parsed `P3` image.
#[derive(Debug, Clone, PartialEq)]
pub struct PpmImage {
    pub width: u32,
    pub height: u32,
    pub max_value: u16,
    pub pixels: Vec<[u8; 3]>,
}

/// Write `pixels` (row-major, row 0 at the top) as a `P3` image.
pub fn write_ppm<W: Write>(
    writer: &mut W,
    width: u32,
    height: u32,
    pixels: &[[u8; 3]],
) -> PpmResult<()> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(PpmError::PixelCount {
            expected,
            found: pixels.len(),
        });
    }

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", width, height)?;
    writeln!(writer, "{}", MAX_CHANNEL)?;
    for [r, g, b] in pixels {
        writeln!(writer, "{} {} {}", r, g, b)?;
    }
    writer.flush()?;

    Ok(())
}

/// Parse a `P3` image. Whitespace between tokens is not significant.
pub fn parse_ppm(text: &str) -> PpmResult<PpmImage> {
    let mut tokens = text.split_whitespace();

    let magic = tokens.next().unwrap_or_default();
    if magic != "P3" {
        return Err(PpmError::UnsupportedMagic(magic.to_string()));
    }

    let width = parse_token::<u32>(tokens.next(), "width")?;
    let height = parse_token::<u32>(tokens.next(), "height")?;
    let max_value = parse_token::<u16>(tokens.next(), "max value")?;
    if max_value == 0 || max_value > MAX_CHANNEL {
        return Err(PpmError::ChannelOutOfRange {
            value: max_value as u32,
            max: MAX_CHANNEL,
        });
    }

    let channels = tokens
        .map(|t| {
            let value = parse_token::<u32>(Some(t), "channel")?;
            if value > max_value as u32 {
                return Err(PpmError::ChannelOutOfRange {
                    value,
                    max: max_value,
                });
            }
            Ok(value as u8)
        })
        .collect::<PpmResult<Vec<u8>>>()?;

    let expected = width as usize * height as usize;
    if channels.len() != expected * 3 {
        return Err(PpmError::PixelCount {
            expected,
            found: channels.len() / 3,
        });
    }

    let pixels = channels
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    Ok(PpmImage {
        width,
        height,
        max_value,
        pixels,
    })
}

fn parse_token<T: std::str::FromStr>(token: Option<&str>, what: &'static str) -> PpmResult<T> {
    let token = token.unwrap_or_default();
    token.parse().map_err(|_| PpmError::Parse {
        what,
        token: token.to_string(),
    })
}
