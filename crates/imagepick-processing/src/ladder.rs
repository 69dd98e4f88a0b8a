//! Resolution ladder: the search space for the compression loop
//!
//! A fixed list of (width, height) targets in descending megapixel order. The
//! compression loop walks down the ladder until its output satisfies the
//! caller's constraints; when a byte budget is set, the step size adapts to
//! how far over budget the previous attempt landed.

/// Downscale targets, largest first
pub const RESOLUTION_LADDER: [(u32, u32); 15] = [
    (2448, 3264), // 8.0 megapixel
    (2008, 3032), // 6.0 megapixel
    (1944, 2580), // 5.0 megapixel
    (1680, 2240), // 4.0 megapixel
    (1536, 2048), // 3.0 megapixel
    (1200, 1600), // 2.0 megapixel
    (1024, 1392), // 1.3 megapixel
    (960, 1280),  // 1.0 megapixel
    (768, 1024),  // 0.7 megapixel
    (600, 800),   // 0.4 megapixel
    (480, 640),   // 0.3 megapixel
    (240, 320),   // 0.15 megapixel
    (120, 160),   // 0.08 megapixel
    (60, 80),     // 0.04 megapixel
    (30, 40),     // 0.02 megapixel
];

/// Overshoot thresholds for step acceleration
const LARGE_OVERSHOOT: u64 = 1024 * 1024;
const MEDIUM_OVERSHOOT: u64 = 500 * 1024;

/// Target resolution for an attempt, clamped to the caller's max resolution
/// when the ladder entry exceeds it on either axis. Returns `None` once the
/// ladder is exhausted.
pub fn target_for_attempt(
    attempt: usize,
    max_resolution: Option<(u32, u32)>,
) -> Option<(u32, u32)> {
    let (mut width, mut height) = *RESOLUTION_LADDER.get(attempt)?;
    if let Some((max_width, max_height)) = max_resolution {
        if width > max_width || height > max_height {
            width = max_width;
            height = max_height;
        }
    }
    Some((width, height))
}

/// Next attempt index. `overshoot` is how many bytes over budget the previous
/// attempt landed; without a byte budget the ladder advances one step at a
/// time.
pub fn next_attempt(attempt: usize, overshoot: Option<u64>) -> usize {
    let step = match overshoot {
        Some(diff) if diff > LARGE_OVERSHOOT => 3,
        Some(diff) if diff > MEDIUM_OVERSHOOT => 2,
        _ => 1,
    };
    attempt + step
}
