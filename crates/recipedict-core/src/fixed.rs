use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Convert an f64 to Fixed64. Use only for initialization.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Number of whole `unit`s that fit in `amount`. Zero when `unit` is not positive.
#[inline]
pub fn whole_units(amount: u32, unit: Fixed64) -> i32 {
    if unit <= Fixed64::ZERO {
        return 0;
    }
    Fixed64::saturating_from_num(amount)
        .checked_div(unit)
        .map(|q| q.floor().to_num::<i32>())
        .unwrap_or(0)
}

/// Convert a whole percentage into a ratio (`75` -> `0.75`).
#[inline]
pub fn percent_to_ratio(percent: i32) -> Fixed64 {
    Fixed64::from_num(percent) / Fixed64::from_num(100)
}
