use serde::{Deserialize, Serialize};

/// Opaque sRGB color. Serializes as `#rrggbb`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([0xff, 0xff, 0xff]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b])
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ColorParseError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ColorParseError(s.to_string()))
        };
        Ok(Color([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Moves every channel toward `target` by `amount` in `[0, 1]`.
    pub fn mix(self, target: Color, amount: f64) -> Color {
        let t = amount.clamp(0.0, 1.0);
        let mut out = [0u8; 3];
        for (i, c) in out.iter_mut().enumerate() {
            let a = self.0[i] as f64;
            let b = target.0[i] as f64;
            *c = (a + (b - a) * t).round() as u8;
        }
        Color(out)
    }

    /// Color from HSL, `hue` in degrees, `saturation`/`lightness` in `[0, 1]`.
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Color {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c * 0.5;
        let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Color([to_u8(r), to_u8(g), to_u8(b)])
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_hex()
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid color {:?}, expected #rrggbb", self.0)
    }
}

impl std::error::Error for ColorParseError {}

/// Stroke and fill of a drawn shape.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke: Color,
    pub stroke_opacity: f64,
    pub weight: f64,
    pub fill: Color,
    pub fill_opacity: f64,
}

impl ShapeStyle {
    /// Passive hit-target: present for pointer events, invisible on screen.
    pub const fn hit_target() -> Self {
        Self {
            stroke: Color::WHITE,
            stroke_opacity: 0.0,
            weight: 1.0,
            fill: Color::WHITE,
            fill_opacity: 0.0,
        }
    }

    /// Feature currently under the pointer.
    pub const fn hover(color: Color) -> Self {
        Self {
            stroke: color,
            stroke_opacity: 0.6,
            weight: 1.5,
            fill: color,
            fill_opacity: 0.12,
        }
    }

    /// Selected province or region; always heavier than [`ShapeStyle::hover`].
    pub const fn selected(color: Color) -> Self {
        Self {
            stroke: color,
            stroke_opacity: 0.9,
            weight: 3.0,
            fill: color,
            fill_opacity: 0.2,
        }
    }

    pub fn is_invisible(&self) -> bool {
        self.stroke_opacity <= 0.0 && self.fill_opacity <= 0.0
    }
}
