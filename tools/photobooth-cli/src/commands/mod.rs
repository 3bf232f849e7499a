pub mod check;
pub mod compose;
pub mod preview;
pub mod shoot;

use std::path::{Path, PathBuf};

use photobooth_common::config::BoothConfig;
use photobooth_model::{FilterKind, LayoutCount, StripTheme};
use photobooth_render::PhotoStrip;

/// Session selections from flags, falling back to the configured defaults.
pub(crate) fn resolve_look(
    config: &BoothConfig,
    layout: Option<LayoutCount>,
    filter: Option<FilterKind>,
    theme: Option<StripTheme>,
) -> anyhow::Result<(LayoutCount, FilterKind, StripTheme)> {
    let layout = match layout {
        Some(layout) => layout,
        None => LayoutCount::try_from(config.session.layout)
            .map_err(|e| anyhow::anyhow!("Invalid session.layout in config: {e}"))?,
    };
    let filter = match filter {
        Some(filter) => filter,
        None => config
            .session
            .filter
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid session.filter in config: {e}"))?,
    };
    let theme = match theme {
        Some(theme) => theme,
        None => config
            .session
            .theme
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid session.theme in config: {e}"))?,
    };
    Ok((layout, filter, theme))
}

/// Write `strip` to an explicit file, into an explicit directory, or into
/// the configured output directory.
pub(crate) fn save_strip(
    config: &BoothConfig,
    strip: &PhotoStrip,
    output: Option<PathBuf>,
) -> anyhow::Result<PathBuf> {
    let path = match output {
        Some(path) if is_file_target(&path) => {
            strip.save(&path)?;
            path
        }
        Some(dir) => strip.save_to_dir(&dir)?,
        None => strip.save_to_dir(&config.output_dir)?,
    };
    Ok(path)
}

fn is_file_target(path: &Path) -> bool {
    !path.is_dir() && path.extension().is_some()
}

pub(crate) fn print_strip_summary(strip: &PhotoStrip, path: &Path) {
    let g = &strip.geometry;
    println!();
    println!("Photostrip saved to: {}", path.display());
    println!("  Size: {}x{} ({} photos)", g.width, g.height, g.layout);
    println!("  Filter: {}", strip.filter.label());
    println!("  Theme: {}", strip.theme.tag());
    println!("  Bytes: {}", strip.bytes().len());
    if !strip.captions_drawn {
        println!("  [WARN] No caption font found; captions were not drawn");
    }
}
