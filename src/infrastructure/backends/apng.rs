//! APNG chunk walk
//!
//! Counts animation frames and reads their delays straight off the chunk
//! stream. No image data is inflated.

use super::error::BackendError;

const SIGNATURE_LEN: usize = 8;
const CHUNK_HEADER_LEN: usize = 8;
const CHUNK_CRC_LEN: usize = 4;
const FCTL_LEN: usize = 26;
const MAX_CHUNK_LEN: usize = i32::MAX as usize;

/// Frames whose data is fully present
#[derive(Debug, Default)]
pub struct ApngScan {
    /// Delay of each frame in seconds
    pub delays: Vec<f64>,
    /// The walk reached IEND
    pub finished: bool,
}

#[derive(Debug)]
struct PendingFrame {
    delay: f64,
    has_data: bool,
}

impl ApngScan {
    fn close(&mut self, frame: Option<PendingFrame>, max_frames: usize) -> Result<(), BackendError> {
        // An fcTL without data chunks does not describe a frame.
        let Some(frame) = frame.filter(|f| f.has_data) else {
            return Ok(());
        };
        if self.delays.len() >= max_frames {
            return Err(BackendError::FrameLimit { limit: max_frames });
        }
        self.delays.push(frame.delay);
        Ok(())
    }
}

/// Walks the chunks of `data`, stopping at the first partial chunk
///
/// A frame counts once the chunk after its last data chunk has fully
/// arrived, since more fdAT chunks could otherwise still follow. An IDAT
/// with no fcTL ahead of it is a default image outside the animation.
pub fn scan_frames(data: &[u8], max_frames: usize) -> (ApngScan, Option<BackendError>) {
    let mut scan = ApngScan::default();
    let error = walk(data, max_frames, &mut scan).err();
    (scan, error)
}

fn walk(data: &[u8], max_frames: usize, scan: &mut ApngScan) -> Result<(), BackendError> {
    let mut pending: Option<PendingFrame> = None;
    let mut offset = SIGNATURE_LEN;

    while let Some(header) = data.get(offset..offset + CHUNK_HEADER_LEN) {
        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        if length > MAX_CHUNK_LEN {
            return Err(BackendError::MalformedApng("chunk length out of range"));
        }
        let chunk_type = [header[4], header[5], header[6], header[7]];

        let payload_start = offset + CHUNK_HEADER_LEN;
        let end = payload_start + length + CHUNK_CRC_LEN;
        if data.len() < end {
            break;
        }
        let payload = &data[payload_start..payload_start + length];

        match &chunk_type {
            b"fcTL" => {
                scan.close(pending.take(), max_frames)?;
                pending = Some(PendingFrame {
                    delay: fctl_delay(payload)?,
                    has_data: false,
                });
            }
            b"IDAT" | b"fdAT" => {
                if let Some(frame) = pending.as_mut() {
                    frame.has_data = true;
                }
            }
            b"IEND" => {
                scan.close(pending.take(), max_frames)?;
                scan.finished = true;
                break;
            }
            _ => {
                if pending.as_ref().is_some_and(|f| f.has_data) {
                    scan.close(pending.take(), max_frames)?;
                }
            }
        }

        offset = end;
    }

    Ok(())
}

/// Frame delay in seconds; a zero denominator means hundredths
fn fctl_delay(payload: &[u8]) -> Result<f64, BackendError> {
    if payload.len() < FCTL_LEN {
        return Err(BackendError::MalformedApng("short fcTL chunk"));
    }
    let numerator = u16::from_be_bytes([payload[20], payload[21]]);
    let denominator = match u16::from_be_bytes([payload[22], payload[23]]) {
        0 => 100,
        d => d,
    };
    Ok(f64::from(numerator) / f64::from(denominator))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut chunk = (payload.len() as u32).to_be_bytes().to_vec();
        chunk.extend_from_slice(chunk_type);
        chunk.extend_from_slice(payload);
        // The walk never checks CRCs.
        chunk.extend_from_slice(&[0; 4]);
        chunk
    }

    fn fctl(numerator: u16, denominator: u16) -> Vec<u8> {
        let mut payload = vec![0; FCTL_LEN];
        payload[20..22].copy_from_slice(&numerator.to_be_bytes());
        payload[22..24].copy_from_slice(&denominator.to_be_bytes());
        chunk(b"fcTL", &payload)
    }

    fn stream(parts: &[Vec<u8>]) -> Vec<u8> {
        let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend(chunk(b"IHDR", &[0; 13]));
        data.extend(chunk(b"acTL", &[0; 8]));
        for part in parts {
            data.extend_from_slice(part);
        }
        data
    }

    #[test]
    fn test_scan_complete_stream() {
        let data = stream(&[
            fctl(1, 20),
            chunk(b"IDAT", &[1, 2, 3]),
            fctl(0, 0),
            chunk(b"fdAT", &[0, 0, 0, 2, 4]),
            chunk(b"fdAT", &[0, 0, 0, 3, 5]),
            chunk(b"IEND", &[]),
        ]);

        let (scan, error) = scan_frames(&data, 16);
        assert!(error.is_none());
        assert!(scan.finished);
        assert_eq!(scan.delays, vec![0.05, 0.0]);
    }

    #[test]
    fn test_last_frame_waits_for_next_chunk() {
        let data = stream(&[fctl(1, 10), chunk(b"IDAT", &[1]), fctl(1, 10), chunk(b"fdAT", &[0, 0, 0, 2])]);

        let (scan, error) = scan_frames(&data, 16);
        assert!(error.is_none());
        assert!(!scan.finished);
        assert_eq!(scan.delays.len(), 1);
    }

    #[test]
    fn test_partial_chunk_stops_walk() {
        let data = stream(&[fctl(1, 10), chunk(b"IDAT", &[1]), fctl(1, 10)]);
        let cut = &data[..data.len() - 3];

        let (scan, error) = scan_frames(cut, 16);
        assert!(error.is_none());
        assert!(scan.delays.is_empty());
    }

    #[test]
    fn test_default_image_outside_animation() {
        let data = stream(&[chunk(b"IDAT", &[1]), fctl(3, 100), chunk(b"fdAT", &[0, 0, 0, 1]), chunk(b"IEND", &[])]);

        let (scan, _) = scan_frames(&data, 16);
        assert_eq!(scan.delays, vec![0.03]);
    }

    #[test]
    fn test_short_fctl_is_malformed() {
        let data = stream(&[fctl(1, 10), chunk(b"IDAT", &[1]), chunk(b"fcTL", &[0; 4])]);

        let (scan, error) = scan_frames(&data, 16);
        assert_eq!(scan.delays.len(), 1);
        assert!(matches!(error, Some(BackendError::MalformedApng(_))));
    }

    #[test]
    fn test_frame_limit() {
        let data = stream(&[
            fctl(1, 10),
            chunk(b"IDAT", &[1]),
            fctl(1, 10),
            chunk(b"fdAT", &[0, 0, 0, 1]),
            chunk(b"IEND", &[]),
        ]);

        let (scan, error) = scan_frames(&data, 1);
        assert_eq!(scan.delays.len(), 1);
        assert!(!scan.finished);
        assert!(matches!(error, Some(BackendError::FrameLimit { limit: 1 })));
    }
}
