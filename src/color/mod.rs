//! Packed RGB colors, color scales and legends.
//!
//! Colors are stored as `0xRRGGBB` and converted to `[f32; 3]` only when
//! written into a render buffer.

pub mod legend;
pub mod scale;

use std::fmt;

use serde::{Deserialize, Serialize};

/// A packed `0xRRGGBB` color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Black, also the sentinel of scales without colors.
    pub const BLACK: Self = Self(0x000000);

    /// Color from 8-bit channels.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// 8-bit channels.
    pub const fn to_rgb(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Channels in `[0, 1]`.
    pub fn to_normalized(self) -> [f32; 3] {
        self.to_rgb().map(|c| f32::from(c) / 255.0)
    }

    /// Linear blend, `t = 0` is `a`, `t = 1` is `b`. Channels truncate.
    pub fn interpolate(a: Self, b: Self, t: f64) -> Self {
        let [r1, g1, b1] = a.to_rgb();
        let [r2, g2, b2] = b.to_rgb();
        let mix = |x: u8, y: u8| {
            let x = f64::from(x);
            (x + (f64::from(y) - x) * t) as u8
        };
        Self::from_rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
    }

    /// Write 8-bit channels as numbers at `offset`.
    pub fn to_array(self, array: &mut [f32], offset: usize) {
        for (dst, c) in array.iter_mut().skip(offset).zip(self.to_rgb()) {
            *dst = f32::from(c);
        }
    }

    /// Write normalized channels at `offset`.
    pub fn to_array_normalized(self, array: &mut [f32], offset: usize) {
        for (dst, c) in array.iter_mut().skip(offset).zip(self.to_normalized())
        {
            *dst = c;
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

/// View a color buffer as raw bytes for GPU upload.
pub fn as_bytes(buffer: &[f32]) -> &[u8] {
    bytemuck::cast_slice(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_round_trip() {
        let c = Color::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(c, Color(0x123456));
        assert_eq!(c.to_rgb(), [0x12, 0x34, 0x56]);
        assert_eq!(c.to_string(), "#123456");
    }

    #[test]
    fn interpolate_endpoints_and_midpoint() {
        let a = Color(0x000000);
        let b = Color(0xffffff);
        assert_eq!(Color::interpolate(a, b, 0.0), a);
        assert_eq!(Color::interpolate(a, b, 1.0), b);
        assert_eq!(Color::interpolate(a, b, 0.5), Color(0x7f7f7f));
    }

    #[test]
    fn writes_into_buffers() {
        let mut buf = [0.0f32; 6];
        Color(0xff0080).to_array(&mut buf, 3);
        assert_eq!(buf, [0.0, 0.0, 0.0, 255.0, 0.0, 128.0]);
        Color(0xff0000).to_array_normalized(&mut buf, 0);
        assert_eq!(&buf[..3], &[1.0, 0.0, 0.0]);
        assert_eq!(as_bytes(&buf).len(), 24);
    }

    #[test]
    fn short_buffer_is_not_overrun() {
        let mut buf = [0.0f32; 2];
        Color(0xffffff).to_array_normalized(&mut buf, 1);
        assert_eq!(buf, [0.0, 1.0]);
    }
}
