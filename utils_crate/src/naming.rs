//! Formatting helpers for result file names and parameter columns.
//!
//! Downstream analysis scripts key on the exact names the experiments
//! produce (`..._L21e-06.csv`, `Region134`), so floats are written in the
//! shortest round-trip notation with a two-digit exponent and label-set
//! names are capitalised.

/// Upper-cases the first character of a label-set name (`region134` ->
/// `Region134`) and lower-cases the rest.
#[must_use]
pub fn capitalize_label_set(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

/// Formats a float the way result tables and file names expect it.
///
/// Values whose decimal exponent lies in `[-4, 16)` use positional notation
/// and always carry a fractional part (`0.0`, `200.0`, `0.5`). Everything
/// else uses scientific notation with a signed exponent of at least two
/// digits (`1e-05`, `2.5e-07`, `1e+16`).
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // `{:e}` yields the shortest round-trip mantissa, e.g. "1e-6" or "2.5e-7".
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if (-4..16).contains(&exponent) {
        let positional = format!("{value}");
        if positional.contains('.') {
            positional
        } else {
            format!("{positional}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}
