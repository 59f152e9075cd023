//! Payload codec for the `/position` and `/interpolation` messages
//!
//! Every payload starts with a 2-byte header, all fields little-endian:
//! - Byte 0: Version
//! - Byte 1: Kind (1 = position, 2 = interpolation)
//!
//! Position body (8 bytes):
//! - Bytes 2-5: Azimuth in degrees (f32)
//! - Bytes 6-9: Colatitude in degrees (f32)
//!
//! Interpolation body:
//! - Bytes 2-5: Weight count (u32)
//! - Then `count` weights (f32 each)

use bytes::{Buf, BufMut, Bytes, BytesMut};
use nalgebra::DVector;
use swf_core::{Point3, SphericalCoord, SwfError, SwfResult};

/// Current payload version
pub const PAYLOAD_VERSION: u8 = 1;

/// Header size in bytes
pub const HEADER_SIZE: usize = 2;

/// Position body size in bytes
pub const POSITION_BODY_SIZE: usize = 8;

/// Payload kind tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PayloadKind {
    Position = 1,
    Interpolation = 2,
}

impl PayloadKind {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(PayloadKind::Position),
            2 => Some(PayloadKind::Interpolation),
            _ => None,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Message address used by the transport
    pub fn address(self) -> &'static str {
        match self {
            PayloadKind::Position => "/position",
            PayloadKind::Interpolation => "/interpolation",
        }
    }
}

/// Source direction request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionPayload {
    pub azimuth_deg: f32,
    pub colatitude_deg: f32,
}

impl PositionPayload {
    pub fn new(azimuth_deg: f32, colatitude_deg: f32) -> Self {
        Self {
            azimuth_deg,
            colatitude_deg,
        }
    }

    /// Unit direction
    pub fn direction(&self) -> Point3 {
        SphericalCoord::from_degrees(self.azimuth_deg as f64, self.colatitude_deg as f64)
            .to_cartesian()
    }
}

/// Per-vertex weights response
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolationPayload {
    pub weights: Vec<f32>,
}

impl InterpolationPayload {
    pub fn from_dense(weights: &DVector<f64>) -> Self {
        Self {
            weights: weights.iter().map(|&w| w as f32).collect(),
        }
    }
}

/// A decoded payload
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Position(PositionPayload),
    Interpolation(InterpolationPayload),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Position(_) => PayloadKind::Position,
            Payload::Interpolation(_) => PayloadKind::Interpolation,
        }
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE
            + match self {
                Payload::Position(_) => POSITION_BODY_SIZE,
                Payload::Interpolation(p) => 4 + 4 * p.weights.len(),
            }
    }

    /// Serialize to a new buffer
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        buf.put_u8(PAYLOAD_VERSION);
        buf.put_u8(self.kind().to_byte());
        match self {
            Payload::Position(p) => {
                buf.put_f32_le(p.azimuth_deg);
                buf.put_f32_le(p.colatitude_deg);
            }
            Payload::Interpolation(p) => {
                buf.put_u32_le(p.weights.len() as u32);
                for &w in &p.weights {
                    buf.put_f32_le(w);
                }
            }
        }
        buf.freeze()
    }

    /// Parse a complete payload. Trailing bytes are rejected.
    pub fn decode(bytes: &[u8]) -> SwfResult<Self> {
        let mut buf = bytes;
        ensure(&buf, HEADER_SIZE)?;

        let version = buf.get_u8();
        if version != PAYLOAD_VERSION {
            return Err(SwfError::InvalidPayload(format!(
                "unsupported version {version}"
            )));
        }
        let tag = buf.get_u8();
        let kind = PayloadKind::from_byte(tag)
            .ok_or_else(|| SwfError::InvalidPayload(format!("unknown kind {tag}")))?;

        let payload = match kind {
            PayloadKind::Position => {
                ensure(&buf, POSITION_BODY_SIZE)?;
                let azimuth_deg = buf.get_f32_le();
                let colatitude_deg = buf.get_f32_le();
                if !azimuth_deg.is_finite() || !colatitude_deg.is_finite() {
                    return Err(SwfError::InvalidPayload(format!(
                        "non-finite position ({azimuth_deg}, {colatitude_deg})"
                    )));
                }
                Payload::Position(PositionPayload::new(azimuth_deg, colatitude_deg))
            }
            PayloadKind::Interpolation => {
                ensure(&buf, 4)?;
                let count = buf.get_u32_le() as usize;
                ensure(&buf, count.saturating_mul(4))?;
                let weights = (0..count).map(|_| buf.get_f32_le()).collect();
                Payload::Interpolation(InterpolationPayload { weights })
            }
        };

        if buf.has_remaining() {
            return Err(SwfError::InvalidPayload(format!(
                "{} trailing bytes",
                buf.remaining()
            )));
        }
        Ok(payload)
    }
}

/// Fail with `BufferTooShort` unless `needed` more bytes remain
fn ensure(buf: &impl Buf, needed: usize) -> SwfResult<()> {
    if buf.remaining() < needed {
        return Err(SwfError::BufferTooShort {
            expected: needed,
            actual: buf.remaining(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_layout() {
        let bytes = Payload::Position(PositionPayload::new(90.0, 45.0)).encode();
        assert_eq!(bytes.len(), HEADER_SIZE + POSITION_BODY_SIZE);
        assert_eq!(bytes[0], PAYLOAD_VERSION);
        assert_eq!(bytes[1], 1);
        assert_eq!(&bytes[2..6], &90.0f32.to_le_bytes());
        assert_eq!(&bytes[6..10], &45.0f32.to_le_bytes());
    }

    #[test]
    fn test_interpolation_decode() {
        let payload = Payload::Interpolation(InterpolationPayload {
            weights: vec![0.25, 0.0, 0.75],
        });
        let bytes = payload.encode();
        assert_eq!(bytes.len(), payload.encoded_len());
        assert_eq!(&bytes[2..6], &3u32.to_le_bytes());
        assert_eq!(Payload::decode(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_truncated_buffers() {
        let position = Payload::Position(PositionPayload::new(10.0, 20.0)).encode();
        for len in 0..position.len() {
            assert!(
                matches!(
                    Payload::decode(&position[..len]),
                    Err(SwfError::BufferTooShort { .. })
                ),
                "length {len}"
            );
        }

        let weights = Payload::Interpolation(InterpolationPayload {
            weights: vec![1.0; 4],
        })
        .encode();
        assert_eq!(
            Payload::decode(&weights[..weights.len() - 1]).unwrap_err(),
            SwfError::BufferTooShort {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(
            Payload::decode(&[2, 1, 0, 0, 0, 0, 0, 0, 0, 0]),
            Err(SwfError::InvalidPayload(_))
        ));
        assert!(matches!(
            Payload::decode(&[PAYLOAD_VERSION, 9]),
            Err(SwfError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = Payload::Position(PositionPayload::new(0.0, 90.0))
            .encode()
            .to_vec();
        bytes.push(0);
        assert!(matches!(
            Payload::decode(&bytes),
            Err(SwfError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_huge_count_is_short_not_panic() {
        let bytes = [PAYLOAD_VERSION, 2, 0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            Payload::decode(&bytes),
            Err(SwfError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_position_direction() {
        let d = PositionPayload::new(90.0, 90.0).direction();
        assert!((d - Point3::y()).norm() < 1e-7);
        assert_eq!(PayloadKind::Position.address(), "/position");
    }

    #[test]
    fn test_non_finite_position_rejected() {
        for (azimuth, colatitude) in [(f32::NAN, 45.0), (0.0, f32::INFINITY)] {
            let bytes = Payload::Position(PositionPayload::new(azimuth, colatitude)).encode();
            assert!(matches!(
                Payload::decode(&bytes),
                Err(SwfError::InvalidPayload(_))
            ));
        }
    }
}
