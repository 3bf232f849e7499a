//! Show configuration, font availability, and defaults.

use photobooth_common::config::BoothConfig;
use photobooth_model::ViewportClass;
use photobooth_render::CaptionFont;

pub fn run(config: &BoothConfig) -> anyhow::Result<()> {
    println!("Photobooth Check");
    println!("{}", "=".repeat(50));

    let config_path = BoothConfig::path();
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!("[--] Config: {} (not found, using defaults)", config_path.display());
    }

    println!("[OK] Output directory: {}", config.output_dir.display());

    let font = CaptionFont::find(config.strip.font_path.as_deref());
    match &font {
        Some(font) => println!("[OK] Caption font: {}", font.path.display()),
        None => println!("[WARN] Caption font: none found; strips will have no captions"),
    }

    let pacing = &config.pacing;
    println!();
    println!("Session defaults");
    println!("  Layout: {} photos", config.session.layout);
    println!("  Filter: {}", config.session.filter);
    println!("  Theme: {}", config.session.theme);
    println!(
        "  Countdown: from {} every {}ms, flash {}ms, reset {}ms, handoff {}ms",
        pacing.countdown_from,
        pacing.tick_ms,
        pacing.flash_hold_ms,
        pacing.reset_hold_ms,
        pacing.handoff_delay_ms
    );
    println!(
        "  Strip: \"{}\" / \"{}\" at JPEG quality {}",
        config.strip.title, config.strip.watermark, config.strip.jpeg_quality
    );

    println!();
    println!("Capture sizes");
    for viewport in ViewportClass::ALL {
        let (w, h) = viewport.capture_constraints();
        println!("  {viewport}: {w}x{h}");
    }

    println!();
    let valid = config
        .validate()
        .map_err(anyhow::Error::from)
        .and_then(|()| super::resolve_look(config, None, None, None).map(|_| ()));
    match valid {
        Ok(()) => println!("Configuration is valid. Photobooth is ready."),
        Err(e) => println!("[WARN] {e}"),
    }
    Ok(())
}
