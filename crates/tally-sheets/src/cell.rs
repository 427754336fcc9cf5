//! Cell values and A1-style addresses.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::SheetError;

/// Largest column a worksheet can have (`XFD`).
const MAX_COLUMN: u32 = 16_384;

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Calculated value of one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A formula error such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    /// Renders the value as text. Empty and error cells yield an empty string.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty | Self::Error(_) => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
        }
    }

    /// Reads the value as hours.
    ///
    /// Empty cells and blank text are zero. Values come back normalized, so
    /// `7.50` and `7.5` render the same. On failure the raw value is returned
    /// so it can be reported.
    pub fn as_hours(&self) -> Result<Decimal, String> {
        match self {
            Self::Empty => Ok(Decimal::ZERO),
            Self::Number(n) => Decimal::try_from(*n)
                .map(|hours| hours.normalize())
                .map_err(|_| n.to_string()),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(Decimal::ZERO)
                } else {
                    trimmed
                        .parse::<Decimal>()
                        .map(|hours| hours.normalize())
                        .map_err(|_| s.clone())
                }
            }
            Self::Bool(b) => Err(b.to_string()),
            Self::Error(e) => Err(e.clone()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A 1-indexed cell address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub column: u32,
    pub row: u32,
}

impl CellRef {
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Parses an address like `A3` or `k12`.
    pub fn parse(address: &str) -> Result<Self, SheetError> {
        let invalid = || SheetError::InvalidAddress(address.to_string());
        let trimmed = address.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (letters, digits) = trimmed.split_at(split);

        let column = column_index(letters).map_err(|_| invalid())?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        Ok(Self { column, row })
    }
}

impl FromStr for CellRef {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.column), self.row)
    }
}

/// Converts column letters to a 1-indexed column number (`A` = 1).
pub fn column_index(letters: &str) -> Result<u32, SheetError> {
    let letters = letters.trim();
    if letters.is_empty() || letters.len() > 3 || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(SheetError::InvalidAddress(letters.to_string()));
    }

    let index = letters.bytes().fold(0u32, |acc, b| {
        acc * 26 + u32::from(b.to_ascii_uppercase() - b'A' + 1)
    });
    if index > MAX_COLUMN {
        return Err(SheetError::InvalidAddress(letters.to_string()));
    }
    Ok(index)
}

/// Converts a 1-indexed column number back to letters.
pub fn column_name(mut index: u32) -> String {
    let mut letters = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push(ALPHABET[rem as usize]);
        index = (index - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
