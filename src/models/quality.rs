//! Derives an SM-2 quality grade (0-5) from correctness and response latency.
//!
//! - 0-2: incorrect, graded by how quickly the wrong answer came
//! - 3-5: correct, graded by how quickly the right answer came

const FAST_RESPONSE_MS: u64 = 2_000;
const MEDIUM_RESPONSE_MS: u64 = 5_000;
const SLOW_RESPONSE_MS: u64 = 10_000;

/// Lowest grade that counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;
pub const MAX_QUALITY: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LatencyBand {
    Fast,
    Medium,
    Slow,
    VerySlow,
}

impl LatencyBand {
    pub fn from_millis(response_time_ms: u64) -> Self {
        if response_time_ms < FAST_RESPONSE_MS {
            LatencyBand::Fast
        } else if response_time_ms < MEDIUM_RESPONSE_MS {
            LatencyBand::Medium
        } else if response_time_ms < SLOW_RESPONSE_MS {
            LatencyBand::Slow
        } else {
            LatencyBand::VerySlow
        }
    }
}

pub fn estimate_quality(correct: bool, response_time_ms: u64) -> u8 {
    match (correct, LatencyBand::from_millis(response_time_ms)) {
        (false, LatencyBand::Fast | LatencyBand::Medium) => 2,
        (false, LatencyBand::Slow) => 1,
        (false, LatencyBand::VerySlow) => 0,
        (true, LatencyBand::Fast) => 5,
        (true, LatencyBand::Medium) => 4,
        (true, LatencyBand::Slow | LatencyBand::VerySlow) => 3,
    }
}

pub fn is_passing(quality: u8) -> bool {
    quality >= PASSING_QUALITY
}
