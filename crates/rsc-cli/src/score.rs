//! Caller-assigned scores.

/// Draw a score uniformly from `[min, max]`.
///
/// Rejection sampling over `u32` keeps the draw unbiased for any span.
pub fn draw(min: u32, max: u32) -> anyhow::Result<u32> {
    anyhow::ensure!(min <= max, "min score {min} exceeds max score {max}");
    let span = u64::from(max - min) + 1;
    let zone = (u64::from(u32::MAX) + 1) / span * span;

    loop {
        let mut buf = [0u8; 4];
        getrandom::fill(&mut buf)
            .map_err(|error| anyhow::anyhow!("system randomness unavailable: {error}"))?;
        let value = u64::from(u32::from_le_bytes(buf));
        if value < zone {
            let offset = u32::try_from(value % span)?;
            return Ok(min + offset);
        }
    }
}
