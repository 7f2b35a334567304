/// Integer percentage of `numerator / denominator`, rounded half up and clamped to 0..=100.
///
/// A zero or negative denominator yields 0.
pub fn round_half_up_percent(numerator: i64, denominator: i64) -> i64 {
    if denominator <= 0 || numerator <= 0 {
        return 0;
    }
    // round(100 * n / d) == floor((200 * n + d) / (2 * d)) for positive n, d.
    // Widened so 200 * n cannot overflow for any i64 input.
    let (n, d) = (i128::from(numerator), i128::from(denominator));
    let rounded = (200 * n + d) / (2 * d);
    rounded.clamp(0, 100) as i64
}
