/// Decimal units in ascending order with their scale in bytes.
const UNITS: [(&str, f64); 6] = [
    ("B", 1.0),
    ("KB", 1e3),
    ("MB", 1e6),
    ("GB", 1e9),
    ("TB", 1e12),
    ("PB", 1e15),
];

/// Render a byte count with a decimal unit suffix, e.g. `1.5 MB`.
///
/// The smallest unit whose thousandfold scale exceeds the value is used, and
/// anything past that stays in PB. Bytes print without decimals, every other
/// unit with exactly one, rounding half away from zero. Missing, NaN and
/// infinite inputs render as an empty string.
pub fn format_bytes(bytes: Option<f64>) -> String {
    let Some(bytes) = bytes.filter(|b| b.is_finite()) else {
        return String::new();
    };

    let (unit, scale) = UNITS
        .iter()
        .copied()
        .find(|(_, scale)| bytes < scale * 1000.0)
        .unwrap_or(UNITS[UNITS.len() - 1]);

    if scale == 1.0 {
        // adding 0.0 folds -0 into 0
        let whole = bytes.round() + 0.0;
        return format!("{whole:.0} {unit}");
    }

    let tenths = (bytes / scale * 10.0).round() / 10.0;
    format!("{tenths:.1} {unit}")
}

pub fn format_byte_count(bytes: u64) -> String {
    format_bytes(Some(bytes as f64))
}
