/// Truncates a multiplier to two decimal places (`floor(x * 100) / 100`).
pub fn floor_cents(value: f64) -> f64 {
    (value * 100.0).floor() / 100.0
}
