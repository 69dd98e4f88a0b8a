/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Parse an `X:Y` aspect ratio, e.g. `1:1` or `16:9`.
pub fn parse_aspect(s: &str) -> anyhow::Result<(f32, f32)> {
    let (x, y) = s
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("aspect ratio must look like X:Y, got {:?}", s))?;
    let x: f32 = x.trim().parse()?;
    let y: f32 = y.trim().parse()?;
    anyhow::ensure!(x > 0.0 && y > 0.0, "aspect ratio components must be positive");
    Ok((x, y))
}
