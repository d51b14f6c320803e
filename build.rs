use shadow_rs::BuildPattern;
use shadow_rs::ShadowBuilder;

/// Embeds build metadata for `--version`.
fn main() -> std::io::Result<()> {
    ShadowBuilder::builder()
        .build_pattern(BuildPattern::Lazy)
        .deny_const(Default::default())
        .build()
        .map_err(|e| std::io::Error::other(format!("Failed to gather build info. {e}")))?;

    Ok(())
}
