use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};
use memmap2::Mmap;
use tracing::debug;

use crate::consts::{COLOR_CHANNEL_COUNT, MAX_SAMPLE};
use crate::error::{AstroError, Result};
use crate::frame::{quantize, PixelGrid};

const BLOCK_SIZE: usize = 2880;
const CARD_SIZE: usize = 80;

/// Primary HDU header fields needed to decode the image.
#[derive(Clone, Debug, PartialEq)]
pub struct FitsHeader {
    pub bitpix: i32,
    pub width: usize,
    pub height: usize,
    /// 1 for grayscale, 3 for planar RGB.
    pub planes: usize,
    pub bzero: f64,
    pub bscale: f64,
    /// Byte offset of the data unit.
    pub data_offset: usize,
}

impl FitsHeader {
    pub fn bytes_per_sample(&self) -> usize {
        (self.bitpix.unsigned_abs() / 8) as usize
    }

    /// Samples in the data unit; `None` when the axes overflow `usize`.
    pub fn sample_count(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.planes)
    }

    /// Byte offset one past the data unit.
    fn data_end(&self) -> Option<usize> {
        self.sample_count()?
            .checked_mul(self.bytes_per_sample())?
            .checked_add(self.data_offset)
    }

    /// Raw unsigned bytes with no scaling are used as-is.
    fn is_plain_u8(&self) -> bool {
        self.bitpix == 8 && self.bzero == 0.0 && self.bscale == 1.0
    }
}

/// Memory-map a FITS file and decode its primary image.
pub fn read_fits(path: &Path) -> Result<PixelGrid> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    decode_fits_bytes(&mmap)
}

/// Decode the primary image of an in-memory FITS file into 8-bit RGB.
///
/// Non-8-bit data is min-max normalized into 0..255 (NaN samples become 0);
/// a single plane is replicated into all three channels.
pub fn decode_fits_bytes(bytes: &[u8]) -> Result<PixelGrid> {
    let header = parse_header(bytes)?;
    debug!(?header, "FITS header");

    let end = header
        .data_end()
        .ok_or_else(|| AstroError::InvalidFits("image dimensions overflow".into()))?;
    if bytes.len() < end {
        return Err(AstroError::InvalidFits(format!(
            "Data unit truncated: expected at least {} bytes, got {}",
            end,
            bytes.len()
        )));
    }
    // The data unit fits in `bytes`, so the counts below cannot overflow.
    let samples = read_samples(&bytes[header.data_offset..end], &header)?;
    let levels = if header.is_plain_u8() {
        samples.iter().map(|&v| v as u8).collect()
    } else {
        normalize(&samples)
    };

    let plane_len = header.width * header.height;
    let mut interleaved = Vec::with_capacity(plane_len * COLOR_CHANNEL_COUNT);
    for i in 0..plane_len {
        for c in 0..COLOR_CHANNEL_COUNT {
            let plane = if header.planes == 1 { 0 } else { c };
            interleaved.push(levels[plane * plane_len + i]);
        }
    }
    PixelGrid::from_raw(header.width, header.height, interleaved)
}

/// Parse header cards up to `END`.
pub fn parse_header(bytes: &[u8]) -> Result<FitsHeader> {
    if bytes.len() < BLOCK_SIZE || !bytes.starts_with(b"SIMPLE") {
        return Err(AstroError::InvalidFits("Missing SIMPLE card".into()));
    }

    let mut bitpix = None;
    let mut naxis = None;
    let mut axes = [1usize; 3];
    let mut bzero = 0.0;
    let mut bscale = 1.0;
    let mut end_card = None;

    for (i, card) in bytes.chunks_exact(CARD_SIZE).enumerate() {
        let key = String::from_utf8_lossy(&card[..8]);
        let key = key.trim_end();
        if key == "END" {
            end_card = Some(i);
            break;
        }
        let Some(value) = card_value(card) else {
            continue;
        };
        match key {
            "BITPIX" => bitpix = Some(parse_int(key, &value)?),
            "NAXIS" => naxis = Some(parse_int(key, &value)?),
            "NAXIS1" => axes[0] = parse_axis(key, &value)?,
            "NAXIS2" => axes[1] = parse_axis(key, &value)?,
            "NAXIS3" => axes[2] = parse_axis(key, &value)?,
            "BZERO" => bzero = parse_float(key, &value)?,
            "BSCALE" => bscale = parse_float(key, &value)?,
            _ => {}
        }
    }

    let end_card = end_card.ok_or_else(|| AstroError::InvalidFits("Missing END card".into()))?;
    let bitpix = bitpix.ok_or_else(|| AstroError::InvalidFits("Missing BITPIX".into()))?;
    if !matches!(bitpix, 8 | 16 | 32 | -32 | -64) {
        return Err(AstroError::InvalidFits(format!("Unsupported BITPIX {bitpix}")));
    }
    let planes = match naxis {
        Some(2) => 1,
        Some(3) if axes[2] == 1 || axes[2] == 3 => axes[2],
        Some(n) => {
            return Err(AstroError::InvalidFits(format!(
                "Unsupported image layout: NAXIS={n}, NAXIS3={}",
                axes[2]
            )))
        }
        None => return Err(AstroError::InvalidFits("Missing NAXIS".into())),
    };

    let header_len = (end_card + 1) * CARD_SIZE;
    Ok(FitsHeader {
        bitpix,
        width: axes[0],
        height: axes[1],
        planes,
        bzero,
        bscale,
        data_offset: header_len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE,
    })
}

/// Value field of a `KEY     = value / comment` card.
fn card_value(card: &[u8]) -> Option<String> {
    if card.get(8..10) != Some(b"= ".as_slice()) {
        return None;
    }
    let text = String::from_utf8_lossy(&card[10..]);
    let value = text.split('/').next().unwrap_or("").trim();
    Some(value.to_string())
}

fn parse_int(key: &str, value: &str) -> Result<i32> {
    value
        .parse()
        .map_err(|_| AstroError::InvalidFits(format!("Bad {key} value '{value}'")))
}

fn parse_axis(key: &str, value: &str) -> Result<usize> {
    let n = parse_int(key, value)?;
    usize::try_from(n)
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| AstroError::InvalidFits(format!("Bad {key} value '{value}'")))
}

fn parse_float(key: &str, value: &str) -> Result<f64> {
    value
        .replace('D', "E")
        .parse()
        .map_err(|_| AstroError::InvalidFits(format!("Bad {key} value '{value}'")))
}

/// Big-endian samples with BZERO/BSCALE applied.
fn read_samples(data: &[u8], header: &FitsHeader) -> Result<Vec<f64>> {
    let count = data.len() / header.bytes_per_sample().max(1);
    let mut cursor = Cursor::new(data);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let raw = match header.bitpix {
            8 => f64::from(cursor.read_u8()?),
            16 => f64::from(cursor.read_i16::<BigEndian>()?),
            32 => f64::from(cursor.read_i32::<BigEndian>()?),
            -32 => f64::from(cursor.read_f32::<BigEndian>()?),
            _ => cursor.read_f64::<BigEndian>()?,
        };
        out.push(header.bzero + header.bscale * raw);
    }
    Ok(out)
}

/// Min-max scale finite samples into 0..255. A constant image maps to 0.
fn normalize(samples: &[f64]) -> Vec<u8> {
    let (min, max) = samples
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return vec![0; samples.len()];
    }
    samples
        .iter()
        .map(|&v| {
            if v.is_finite() {
                quantize(((v - min) / range * f64::from(MAX_SAMPLE)) as f32)
            } else {
                0
            }
        })
        .collect()
}
