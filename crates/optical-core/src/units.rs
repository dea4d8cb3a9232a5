//! Power unit conversions
//!
//! All conversions follow `dBm = 10·log10(P / 1 mW)`. No input checking:
//! zero maps to `-inf`, negative values to NaN.

/// Linear ratio to dB
pub fn lin2db(value: f64) -> f64 {
    10.0 * value.log10()
}

/// dB to linear ratio
pub fn db2lin(value_db: f64) -> f64 {
    10f64.powf(value_db / 10.0)
}

/// Watts to dBm
pub fn watt2dbm(value_w: f64) -> f64 {
    lin2db(value_w) + 30.0
}

/// dBm to watts
pub fn dbm2watt(value_dbm: f64) -> f64 {
    db2lin(value_dbm - 30.0)
}

/// Milliwatts to dBm
pub fn mw2dbm(value_mw: f64) -> f64 {
    lin2db(value_mw)
}

/// dBm to milliwatts
pub fn dbm2mw(value_dbm: f64) -> f64 {
    db2lin(value_dbm)
}
