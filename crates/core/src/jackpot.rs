/// Reel width at which the jackpot equals the configured base.
pub const JACKPOT_BASE_REELS: u32 = 3;
pub const JACKPOT_EXPONENT: f64 = 1.5;

/// `(reel_count / 3) ^ 1.5`, unrounded.
pub fn jackpot_scale(reel_count: u32) -> f64 {
    (f64::from(reel_count) / f64::from(JACKPOT_BASE_REELS)).powf(JACKPOT_EXPONENT)
}

/// Full-match ratio before rounding. Settlement multiplies this by the bet
/// and rounds once, so it must not be rounded here.
pub fn jackpot_raw(reel_count: u32, base_jackpot: f64) -> f64 {
    base_jackpot * jackpot_scale(reel_count)
}

/// Displayed jackpot for a reel width. Wider machines make an all-match
/// rarer, so the reward grows faster than linearly.
pub fn jackpot_for(reel_count: u32, base_jackpot: f64) -> i64 {
    jackpot_raw(reel_count, base_jackpot).round() as i64
}
