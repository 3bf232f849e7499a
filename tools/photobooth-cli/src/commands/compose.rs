//! Compose existing images into a photostrip.

use std::path::PathBuf;
use std::time::Duration;

use photobooth_common::config::BoothConfig;
use photobooth_model::{FilterKind, LayoutCount, RawFrame, StripTheme, ViewportClass};
use photobooth_render::{ComposeOptions, Compositor};

pub async fn run(
    config: &BoothConfig,
    images: Vec<PathBuf>,
    layout: Option<LayoutCount>,
    filter: Option<FilterKind>,
    theme: Option<StripTheme>,
    viewport: ViewportClass,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let layout = match layout {
        Some(layout) => Some(layout),
        None => LayoutCount::new(images.len() as u32).ok(),
    };
    let (layout, filter, theme) = super::resolve_look(config, layout, filter, theme)?;

    println!("Composing {} image(s) into a {} strip", images.len(), layout.label());

    let mut frames = Vec::with_capacity(images.len());
    for (i, path) in images.iter().enumerate() {
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        frames.push(RawFrame::new(i as u8 + 1, Duration::ZERO, bytes));
    }

    let compositor = Compositor::new(config.strip.clone());
    let strip = compositor
        .compose(
            &frames,
            ComposeOptions {
                filter,
                theme,
                layout,
                viewport,
            },
        )
        .await?;

    let path = super::save_strip(config, &strip, output)?;
    super::print_strip_summary(&strip, &path);
    Ok(())
}
