//! Color model
//!
//! RGB565 is the only pixel format the panel is configured for (PIXFMT 0x55).
//! Colors travel over the wire big-endian: high byte first.

/// 16-bit RGB565 color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0x0000);
    pub const BLUE: Self = Self(0x001F);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const CYAN: Self = Self(0x07FF);
    pub const MAGENTA: Self = Self(0xF81F);
    pub const YELLOW: Self = Self(0xFFE0);
    pub const WHITE: Self = Self(0xFFFF);

    /// Pack 8-bit channels, dropping the low bits of each
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(pack_rgb565(r, g, b))
    }

    /// Raw 16-bit value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Wire order: high byte, then low byte
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<u16> for Rgb565 {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Rgb888> for Rgb565 {
    fn from(c: Rgb888) -> Self {
        Self::from_rgb(c.r, c.g, c.b)
    }
}

/// 8-bit per channel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb888 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb888 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Hue, saturation and value, each 0..=255
///
/// Hue 0 is red; the full circle spans 0..256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Pack 8-bit R, G, B into RGB565
pub const fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// Integer HSV to RGB conversion
///
/// Fixed point throughout: the hue is scaled to six sectors of 256 steps,
/// chroma is `s * v / 255` and every channel truncates.
pub fn hsv2rgb(hsv: Hsv) -> Rgb888 {
    if hsv.v == 0 {
        return Rgb888::default();
    }

    let v = u16::from(hsv.v);
    let chroma = u16::from(hsv.s) * v / 255;

    // Sector in the high byte, position inside it in the low byte
    let h_prime = i32::from(hsv.h) * 6;
    let scale = 256 - ((h_prime % 512) - 256).abs();
    let x = ((i32::from(chroma) * scale) >> 8) as u8;

    let c = chroma as u8;
    let m = (v - chroma) as u8;

    let (r, g, b) = match h_prime >> 8 {
        0 => (c, x, 0),
        1 => (x, c, 0),
        2 => (0, c, x),
        3 => (0, x, c),
        4 => (x, 0, c),
        _ => (c, 0, x),
    };

    Rgb888::new(r + m, g + m, b + m)
}
