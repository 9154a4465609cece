//! Category colors.
//!
//! `color_of` is a pure function of the category id: the same id yields the
//! same color in every call and every process. Ids `1..=N` index the curated
//! palette by `id mod N`; larger ids get a hue derived from a blake3 digest of
//! the id; non-positive ids get [`DEFAULT_COLOR`].

use catalog::Category;
use foundation::CategoryId;
use scene::Color;
use serde::Serialize;

/// Curated, visually distinct category primaries.
pub const PALETTE: [Color; 12] = [
    Color::rgb(0x1f, 0x77, 0xb4),
    Color::rgb(0xff, 0x7f, 0x0e),
    Color::rgb(0x2c, 0xa0, 0x2c),
    Color::rgb(0xd6, 0x27, 0x28),
    Color::rgb(0x94, 0x67, 0xbd),
    Color::rgb(0x8c, 0x56, 0x4b),
    Color::rgb(0xe3, 0x77, 0xc2),
    Color::rgb(0x0f, 0x76, 0x6e),
    Color::rgb(0xbc, 0xbd, 0x22),
    Color::rgb(0x17, 0xbe, 0xcf),
    Color::rgb(0x1e, 0x3a, 0x8a),
    Color::rgb(0xb4, 0x53, 0x09),
];

pub const DEFAULT_COLOR: Color = Color::rgb(0x6b, 0x72, 0x80);

const LIGHT_MIX: f64 = 0.55;
const DARK_MIX: f64 = 0.3;
const HASH_DOMAIN: &[u8] = b"geodoc-category-color-v1";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSource {
    Table,
    Hashed,
    Default,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ColorVariants {
    pub light: Color,
    pub dark: Color,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryColor {
    pub primary: Color,
    pub variants: ColorVariants,
    pub source: ColorSource,
}

impl CategoryColor {
    fn from_primary(primary: Color, source: ColorSource) -> Self {
        Self {
            primary,
            variants: ColorVariants {
                light: primary.mix(Color::WHITE, LIGHT_MIX),
                dark: primary.mix(Color::BLACK, DARK_MIX),
            },
            source,
        }
    }
}

pub fn color_of(id: CategoryId) -> CategoryColor {
    match id.0 {
        i64::MIN..=0 => default_color(),
        n if n as u64 <= PALETTE.len() as u64 => table_color(id),
        _ => hashed_color(id),
    }
}

pub fn default_color() -> CategoryColor {
    CategoryColor::from_primary(DEFAULT_COLOR, ColorSource::Default)
}

/// Palette lookup by `id mod N`. Defined for every id; `color_of` only routes
/// `1..=N` here.
pub fn table_color(id: CategoryId) -> CategoryColor {
    let idx = id.0.rem_euclid(PALETTE.len() as i64) as usize;
    CategoryColor::from_primary(PALETTE[idx], ColorSource::Table)
}

/// Hue from a blake3 digest of the id; saturation and lightness are fixed so
/// hashed colors sit in the same visual range as the palette.
pub fn hashed_color(id: CategoryId) -> CategoryColor {
    let mut hasher = blake3::Hasher::new();
    hasher.update(HASH_DOMAIN);
    hasher.update(&id.0.to_le_bytes());
    let digest = hasher.finalize();
    let bytes = digest.as_bytes();
    let hue = u16::from_le_bytes([bytes[0], bytes[1]]) as f64 / 65_536.0 * 360.0;
    let primary = Color::from_hsl(hue, 0.62, 0.46);
    CategoryColor::from_primary(primary, ColorSource::Hashed)
}

/// Legend rows in category id order.
pub fn legend<'a>(
    categories: impl IntoIterator<Item = &'a Category>,
) -> Vec<(&'a Category, CategoryColor)> {
    let mut rows: Vec<(&'a Category, CategoryColor)> = categories
        .into_iter()
        .map(|c| (c, color_of(c.category_id())))
        .collect();
    rows.sort_by_key(|(c, _)| c.id);
    rows
}
