//! Sector grid: the map is split into 8x8 sectors of 64x64 columns,
//! labelled `A1`..`H8` (letter = x column, digit = y row).

use thiserror::Error;

/// Width of a sector in voxels.
pub const SECTOR_SIZE: i32 = 64;

/// Number of sectors along each horizontal axis.
pub const SECTORS_PER_AXIS: i32 = 8;

const LETTERS: &str = "abcdefgh";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SectorError {
    #[error("Invalid coordinates: {0}")]
    InvalidLabel(String),
}

/// Parse a sector label into the sector's top-left column.
pub fn parse_sector(label: &str) -> Result<(i32, i32), SectorError> {
    let invalid = || SectorError::InvalidLabel(label.to_string());
    let mut chars = label.chars();
    let (letter, digit) = match (chars.next(), chars.next(), chars.next()) {
        (Some(l), Some(d), None) => (l.to_ascii_lowercase(), d),
        _ => return Err(invalid()),
    };
    let column = LETTERS.find(letter).ok_or_else(invalid)? as i32;
    let row = digit
        .to_digit(10)
        .map(|d| d as i32)
        .filter(|d| (1..=SECTORS_PER_AXIS).contains(d))
        .ok_or_else(invalid)?;
    Ok((column * SECTOR_SIZE, (row - 1) * SECTOR_SIZE))
}

/// Label of the sector containing a world position. Positions slightly off
/// the map are attributed to the nearest edge sector.
pub fn to_sector(x: f32, y: f32) -> String {
    let index = |v: f32| ((v as i32) / SECTOR_SIZE).clamp(0, SECTORS_PER_AXIS - 1);
    let letter = (b'A' + index(x) as u8) as char;
    format!("{letter}{}", index(y) + 1)
}
