//! Run a capture session and save the photostrip.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use photobooth_capture::{
    open_source, CaptureSession, DropCaptures, Pacing, SequencerEvent, SessionConfig,
    SnapshotSource, SourceKind, StillsSource, SyntheticSource,
};
use photobooth_common::config::BoothConfig;
use photobooth_model::{FilterKind, LayoutCount, StripTheme, ViewportClass};
use photobooth_render::Compositor;

pub struct ShootArgs {
    pub layout: Option<LayoutCount>,
    pub stills: Option<PathBuf>,
    pub filter: Option<FilterKind>,
    pub theme: Option<StripTheme>,
    pub viewport: ViewportClass,
    pub output: Option<PathBuf>,
    pub fast: bool,
    pub drop_shots: Vec<u32>,
    pub json: bool,
}

pub async fn run(config: &BoothConfig, args: ShootArgs) -> anyhow::Result<()> {
    let (layout, filter, theme) = super::resolve_look(config, args.layout, args.filter, args.theme)?;
    let source = build_source(&args)?;
    let pacing = if args.fast {
        Pacing::instant()
    } else {
        Pacing::from(&config.pacing)
    };

    println!("Photo Booth");
    println!("  Camera: {}", source.name());
    println!("  Layout: {}", layout.label());
    println!("  {}", filter.tag());
    println!("  Theme: {}", theme.tag());
    println!("  Estimated run: {:.1}s", pacing.run_duration(layout).as_secs_f64());
    println!();

    let mut session = CaptureSession::new(
        SessionConfig {
            layout,
            filter,
            theme,
            pacing,
        },
        source,
    );
    let mut events = session.start()?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => report(&event, layout, args.json)?,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                session.teardown();
                println!();
                println!("Session cancelled.");
                return Ok(());
            }
        }
    }

    let handoff = session.wait().await?;
    if args.json {
        println!("{}", serde_json::to_string(&handoff.summary())?);
    }
    if !handoff.missed_shots.is_empty() {
        println!(
            "[WARN] Camera unavailable for shot(s) {:?}; strip has {} of {} photos",
            handoff.missed_shots,
            handoff.frames.len(),
            layout
        );
    }
    if handoff.frames.is_empty() {
        anyhow::bail!("No photos were captured");
    }

    let compositor = Compositor::new(config.strip.clone());
    let strip = match compositor.compose_handoff(&handoff, args.viewport).await {
        Ok(strip) => strip,
        Err(e) if e.is_compose_failure() => {
            println!("[ERROR] {e}");
            println!("The photos could not be turned into a strip; run `photobooth shoot` again to retake.");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    let path = super::save_strip(config, &strip, args.output)?;
    super::print_strip_summary(&strip, &path);

    Ok(())
}

fn build_source(args: &ShootArgs) -> anyhow::Result<Arc<dyn SnapshotSource>> {
    if args.drop_shots.is_empty() {
        let kind = match &args.stills {
            Some(dir) => SourceKind::Stills { dir: dir.clone() },
            None => SourceKind::Synthetic {
                viewport: args.viewport,
            },
        };
        return Ok(open_source(&kind)?);
    }

    let drops = args.drop_shots.iter().copied();
    let source: Arc<dyn SnapshotSource> = match &args.stills {
        Some(dir) => Arc::new(DropCaptures::new(StillsSource::from_dir(dir)?, drops)),
        None => Arc::new(DropCaptures::new(SyntheticSource::new(args.viewport), drops)),
    };
    Ok(source)
}

fn report(event: &SequencerEvent, layout: LayoutCount, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    match event {
        SequencerEvent::Started { .. } => println!("Get ready!"),
        SequencerEvent::Countdown {
            shot,
            value: Some(0),
        } => {
            print!("\r  Shot {shot}/{layout}: *flash*   ");
            std::io::stdout().flush()?;
        }
        SequencerEvent::Countdown {
            shot,
            value: Some(n),
        } => {
            print!("\r  Shot {shot}/{layout}: {n}...     ");
            std::io::stdout().flush()?;
        }
        SequencerEvent::Countdown { value: None, .. } => {}
        SequencerEvent::ShotCaptured { shots_taken, .. } => {
            println!("\r  [OK] {shots_taken}/{layout} captured       ");
        }
        SequencerEvent::ShotMissed { shot } => {
            println!("\r  [WARN] Shot {shot}: camera unavailable, skipped");
        }
        SequencerEvent::Finished { frames, .. } => {
            println!("Captured {frames} photo(s). Composing strip...");
        }
    }
    Ok(())
}
