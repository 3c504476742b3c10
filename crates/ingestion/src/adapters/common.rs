//! Adapter common utility functions

use contracts::RecordKind;

use crate::error::{IngestionError, Result};

/// Parse a floating-point token
#[inline]
pub fn parse_f64(kind: RecordKind, field: &'static str, token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| IngestionError::numeric(kind, field, token))
}

/// Parse an integer id token
#[inline]
pub fn parse_id(kind: RecordKind, field: &'static str, token: &str) -> Result<i32> {
    token
        .parse::<i32>()
        .map_err(|_| IngestionError::numeric(kind, field, token))
}

/// Parse a numeric indicator: any non-zero value means true
#[inline]
pub fn parse_indicator(kind: RecordKind, field: &'static str, token: &str) -> Result<bool> {
    parse_f64(kind, field, token).map(|v| v != 0.0)
}

/// Parse a fixed-size run of floats, naming each field
pub fn parse_array<const N: usize>(
    kind: RecordKind,
    fields: &[&'static str; N],
    tokens: &[&str],
) -> Result<[f64; N]> {
    let mut out = [0.0; N];
    for (i, (field, token)) in fields.iter().zip(tokens).enumerate() {
        out[i] = parse_f64(kind, field, token)?;
    }
    Ok(out)
}
