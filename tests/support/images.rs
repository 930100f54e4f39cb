//! Encoded image fixtures
//!
//! Small GIF, PNG and APNG files built in memory. APNG has no encoder in
//! the `image` crate, so those chunks are assembled by hand.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::{Cursor, Write};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Animated GIF with one solid frame per delay
pub fn encode_gif(width: u32, height: u32, delays_ms: &[u32], repeat: Option<Repeat>) -> Vec<u8> {
    let mut data = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut data);
        if let Some(repeat) = repeat {
            encoder.set_repeat(repeat).unwrap();
        }
        let frames = delays_ms.iter().enumerate().map(|(i, &delay)| {
            let shade = (i as u8).wrapping_mul(60);
            Frame::from_parts(
                solid(width, height, [shade, 255 - shade, 0, 255]),
                0,
                0,
                Delay::from_numer_denom_ms(delay, 1),
            )
        });
        encoder.encode_frames(frames).unwrap();
    }
    data
}

pub fn encode_png(width: u32, height: u32) -> Vec<u8> {
    encode_still(width, height, ImageFormat::Png)
}

pub fn encode_still(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(solid(width, height, [10, 20, 30, 255]));
    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image,
    };
    let mut data = Vec::new();
    image.write_to(&mut Cursor::new(&mut data), format).unwrap();
    data
}

/// Baseline JPEG whose entropy-coded data dwarfs its headers
pub fn encode_noisy_jpeg(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        let seed = x.wrapping_mul(7919) ^ y.wrapping_mul(104_729);
        Rgb([seed as u8, (seed >> 8) as u8, (x ^ y) as u8])
    });
    let mut data = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut data), ImageFormat::Jpeg)
        .unwrap();
    data
}

pub fn make_png_chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut chunk = Vec::new();
    chunk.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    chunk.extend_from_slice(chunk_type);
    chunk.extend_from_slice(payload);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(payload);
    let crc = hasher.finalize();
    chunk.extend_from_slice(&crc.to_be_bytes());
    chunk
}

/// Zlib stream of unfiltered RGBA scanlines
fn compressed_rows(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let mut raw = Vec::with_capacity(((width * 4 + 1) * height) as usize);
    for _ in 0..height {
        raw.push(0);
        for _ in 0..width {
            raw.extend_from_slice(&color);
        }
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).unwrap();
    encoder.finish().unwrap()
}

fn fctl(sequence: u32, width: u32, height: u32, delay: (u16, u16)) -> Vec<u8> {
    let mut payload = Vec::with_capacity(26);
    payload.extend_from_slice(&sequence.to_be_bytes());
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload.extend_from_slice(&0u32.to_be_bytes());
    payload.extend_from_slice(&delay.0.to_be_bytes());
    payload.extend_from_slice(&delay.1.to_be_bytes());
    payload.push(0); // dispose: none
    payload.push(0); // blend: source
    make_png_chunk(b"fcTL", &payload)
}

/// RGBA APNG whose default image is the first frame
///
/// Each delay is a `(numerator, denominator)` pair in seconds.
pub fn build_apng(width: u32, height: u32, delays: &[(u16, u16)], num_plays: u32) -> Vec<u8> {
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(8);
    ihdr.push(6);
    ihdr.extend_from_slice(&[0, 0, 0]);

    let mut actl = Vec::new();
    actl.extend_from_slice(&(delays.len() as u32).to_be_bytes());
    actl.extend_from_slice(&num_plays.to_be_bytes());

    let mut data = PNG_SIGNATURE.to_vec();
    data.extend(make_png_chunk(b"IHDR", &ihdr));
    data.extend(make_png_chunk(b"acTL", &actl));

    let mut sequence = 0u32;
    for (i, &delay) in delays.iter().enumerate() {
        let shade = (i as u8).wrapping_mul(60);
        let rows = compressed_rows(width, height, [shade, 0, 255 - shade, 255]);

        data.extend(fctl(sequence, width, height, delay));
        sequence += 1;

        if i == 0 {
            data.extend(make_png_chunk(b"IDAT", &rows));
        } else {
            let mut fdat = sequence.to_be_bytes().to_vec();
            fdat.extend_from_slice(&rows);
            data.extend(make_png_chunk(b"fdAT", &fdat));
            sequence += 1;
        }
    }

    data.extend(make_png_chunk(b"IEND", &[]));
    data
}
