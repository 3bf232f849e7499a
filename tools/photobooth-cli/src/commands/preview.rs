//! Render the viewfinder look of a single image.

use std::path::PathBuf;

use photobooth_common::config::BoothConfig;
use photobooth_model::{FilterKind, LayoutCount, StripTheme, ViewportClass};
use photobooth_render::{info_tags, render_viewfinder_bytes};

pub fn run(
    config: &BoothConfig,
    image: PathBuf,
    layout: Option<LayoutCount>,
    filter: Option<FilterKind>,
    theme: Option<StripTheme>,
    viewport: ViewportClass,
    output: PathBuf,
) -> anyhow::Result<()> {
    let (layout, filter, theme) = super::resolve_look(config, layout, filter, theme)?;

    let bytes = std::fs::read(&image)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", image.display()))?;
    let view = render_viewfinder_bytes(&bytes, filter, theme, viewport)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    view.save(&output)?;

    let tags = info_tags(layout, filter, theme);
    println!("Preview saved to: {}", output.display());
    println!("  Size: {}x{}", view.width(), view.height());
    println!("  [{}] [{}] [{}]", tags.layout, tags.filter, tags.theme);
    println!(
        "  Badge: {} @ {:.0}% with {} text",
        tags.badge.background.hex(),
        tags.badge.background_alpha * 100.0,
        tags.badge.text.hex()
    );
    Ok(())
}
