//! VTT Thumbs CLI Tool
//!
//! Command-line interface for inspecting seek-bar thumbnail tracks and
//! replaying the overlay against a headless player.

mod console;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use console::{ConsoleDom, ConsoleHost, QueuedFetcher};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use vtt_thumbs_core::{CueFileParser, DocumentLocation, ParserOptions, ThumbnailTimeline};
use vtt_thumbs_overlay::{
    OverlayOptions, Placement, PointerEventKind, PositioningEngine, ThumbnailOverlay,
    ThumbnailStyle,
};

#[derive(Parser)]
#[command(name = "vtt-thumbs")]
#[command(about = "VTT Thumbs - Seek-bar preview thumbnails from timed-text sprite tracks")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    overlay: OverlayArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OverlayArgs {
    /// JSON file with overlay options (src, showTimestamp, thumbnailWidth, thumbnailHeight)
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    /// CSS width override for thumbnails
    #[arg(long, global = true)]
    width: Option<String>,

    /// CSS height override for thumbnails
    #[arg(long, global = true)]
    height: Option<String>,

    /// Keep the player's own time tooltip visible
    #[arg(long, global = true)]
    show_timestamp: bool,

    /// URL of the page hosting the player, used to resolve relative references
    #[arg(long, global = true)]
    page_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the cues of a thumbnail track
    Inspect {
        /// Cue file path
        cues: PathBuf,

        /// Print cues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the thumbnail at a playback time
    Lookup {
        /// Cue file path
        cues: PathBuf,

        /// Playback time in seconds
        #[arg(long)]
        time: f64,
    },

    /// Compute where the thumbnail is placed for a pointer position
    Place {
        /// Cue file path
        cues: PathBuf,

        /// Pointer position as a fraction of the progress bar (0-1)
        #[arg(long)]
        fraction: f64,

        /// Progress bar width in pixels
        #[arg(long, default_value = "640")]
        bar_width: f64,

        /// Media duration in seconds
        #[arg(long)]
        duration: f64,
    },

    /// Replay the overlay lifecycle while sweeping the pointer across the bar
    Sweep {
        /// Cue file path
        cues: PathBuf,

        /// Media duration in seconds
        #[arg(long)]
        duration: f64,

        /// Progress bar width in pixels
        #[arg(long, default_value = "640")]
        bar_width: f64,

        /// Number of pointer moves between the bar edges
        #[arg(long, default_value = "10")]
        steps: u32,
    },

    /// Crop the thumbnail at a playback time out of its local sprite sheet
    Extract {
        /// Cue file path
        cues: PathBuf,

        /// Playback time in seconds
        #[arg(long)]
        time: f64,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Inspect { cues, json } => inspect_cues(&cli.overlay, &cues, json)?,
        Commands::Lookup { cues, time } => lookup_cue(&cli.overlay, &cues, time)?,
        Commands::Place {
            cues,
            fraction,
            bar_width,
            duration,
        } => place_thumbnail(&cli.overlay, &cues, fraction, bar_width, duration)?,
        Commands::Sweep {
            cues,
            duration,
            bar_width,
            steps,
        } => sweep_overlay(&cli.overlay, &cues, duration, bar_width, steps)?,
        Commands::Extract { cues, time, output } => {
            extract_thumbnail(&cli.overlay, &cues, time, &output)?
        }
    }

    Ok(())
}

/// Merges the options file with command-line overrides
fn overlay_options(args: &OverlayArgs, cues: &Path) -> Result<OverlayOptions> {
    let mut options = match &args.options {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file {}", path.display()))?;
            OverlayOptions::from_json(&json).context("Failed to parse options file")?
        }
        None => OverlayOptions::default(),
    };

    options.src = Some(cues.display().to_string());
    if args.width.is_some() {
        options.thumbnail_width = args.width.clone();
    }
    if args.height.is_some() {
        options.thumbnail_height = args.height.clone();
    }
    options.show_timestamp |= args.show_timestamp;

    Ok(options)
}

fn page_location(args: &OverlayArgs) -> Result<DocumentLocation> {
    match &args.page_url {
        Some(url) => DocumentLocation::parse(url).context("Page URL must be absolute"),
        None => Ok(DocumentLocation::default()),
    }
}

fn load_timeline(args: &OverlayArgs, cues: &Path) -> Result<ThumbnailTimeline> {
    let options = overlay_options(args, cues)?;
    let page_base = page_location(args)?.base_url();
    let src = options.src.as_deref().unwrap_or_default();

    let raw = fs::read_to_string(cues)
        .with_context(|| format!("Failed to read cue file {}", cues.display()))?;
    let parser = CueFileParser::new(
        ParserOptions::for_source(src, &page_base)
            .with_thumbnail_size(options.thumbnail_width, options.thumbnail_height),
    );

    let timeline = ThumbnailTimeline::parse(&parser, &raw);
    info!("Loaded {} cues from {}", timeline.len(), cues.display());
    Ok(timeline)
}

fn inspect_cues(args: &OverlayArgs, cues: &Path, json: bool) -> Result<()> {
    let timeline = load_timeline(args, cues)?;

    if json {
        println!("{}", timeline.to_json().context("Failed to serialize cues")?);
        return Ok(());
    }

    println!("\n=== Thumbnail Track ===");
    println!("Cues: {}", timeline.len());
    if let Some(end) = timeline.end() {
        println!("Ends at: {:.3} s", end);
    }
    let sprites = timeline.cues().iter().filter(|c| c.sprite.is_some()).count();
    println!("Cues with a sprite: {}", sprites);

    println!("\n=== Cues ===");
    for (i, cue) in timeline.cues().iter().enumerate() {
        match &cue.sprite {
            Some(sprite) => println!(
                "  [{}] {:.3}s - {:.3}s  {} @ ({}, {}) {}x{}",
                i,
                cue.start,
                cue.end,
                sprite.image_url,
                sprite.rect.x,
                sprite.rect.y,
                sprite.rect.w,
                sprite.rect.h
            ),
            None => println!("  [{}] {:.3}s - {:.3}s  (no sprite)", i, cue.start, cue.end),
        }
    }

    Ok(())
}

fn lookup_cue(args: &OverlayArgs, cues: &Path, time: f64) -> Result<()> {
    let timeline = load_timeline(args, cues)?;

    let Some(cue) = timeline.lookup(time) else {
        println!("No thumbnail at {:.3}s", time);
        return Ok(());
    };

    println!("Cue {:.3}s - {:.3}s", cue.start, cue.end);
    match &cue.sprite {
        Some(sprite) => print_style(&ThumbnailStyle::for_sprite(cue.style, sprite)),
        None => println!("  (no sprite)"),
    }

    Ok(())
}

fn place_thumbnail(
    args: &OverlayArgs,
    cues: &Path,
    fraction: f64,
    bar_width: f64,
    duration: f64,
) -> Result<()> {
    if !(0.0..=1.0).contains(&fraction) {
        bail!("Fraction must be between 0 and 1, got {}", fraction);
    }

    let timeline = load_timeline(args, cues)?;
    let mut engine = PositioningEngine::new();

    match engine.compute_style(fraction, bar_width, duration, &timeline) {
        Placement::Hide => println!("Hidden: no thumbnail at {:.3}s", fraction * duration),
        Placement::Show { cue, left, style } => {
            println!("Cue {:.3}s - {:.3}s", cue.start, cue.end);
            match left {
                Some(left) => println!("  left: {}px", left),
                None => println!("  left: unchanged"),
            }
            if let Some(style) = style {
                print_style(&style);
            }
        }
    }

    Ok(())
}

fn sweep_overlay(
    args: &OverlayArgs,
    cues: &Path,
    duration: f64,
    bar_width: f64,
    steps: u32,
) -> Result<()> {
    let options = overlay_options(args, cues)?;
    let host = ConsoleHost::new(duration, bar_width, page_location(args)?);

    println!("Attaching overlay");
    let mut overlay = ThumbnailOverlay::new(host, ConsoleDom, QueuedFetcher::default(), options);

    while let Some(request) = overlay.fetcher_mut().next_request() {
        if request.url.contains("//") {
            warn!("Cannot fetch {} from disk, thumbnails stay hidden", request.url);
            continue;
        }
        let text = fs::read_to_string(&request.url)
            .with_context(|| format!("Failed to read cue file {}", request.url))?;
        overlay.on_cue_file_loaded(request.generation, &text);
    }

    let Some(enter) = overlay.host().listener(PointerEventKind::Enter) else {
        println!("Overlay is not ready, nothing to sweep");
        return Ok(());
    };

    println!("Pointer enters the progress bar");
    overlay.handle_pointer_event(enter, 0.0);

    let steps = steps.max(1);
    for step in 0..=steps {
        let fraction = step as f64 / steps as f64;
        println!(
            "Pointer at {:.1}% ({:.3}s)",
            fraction * 100.0,
            fraction * duration
        );
        if let Some(id) = overlay.host().listener(PointerEventKind::Move) {
            overlay.handle_pointer_event(id, fraction);
        }
    }

    if let Some(leave) = overlay.host().listener(PointerEventKind::Leave) {
        println!("Pointer leaves the progress bar");
        overlay.handle_pointer_event(leave, 1.0);
    }

    println!("Detaching overlay");
    overlay.detach();

    Ok(())
}

fn extract_thumbnail(args: &OverlayArgs, cues: &Path, time: f64, output: &Path) -> Result<()> {
    let timeline = load_timeline(args, cues)?;

    let cue = timeline
        .lookup(time)
        .with_context(|| format!("No thumbnail at {:.3}s", time))?;
    let sprite = cue
        .sprite
        .as_ref()
        .context("Cue has no sprite reference")?;

    if sprite.image_url.contains("//") {
        bail!("Sprite {} is not a local file", sprite.image_url);
    }
    let image_path = cues
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(&sprite.image_url);

    let sheet = image::open(&image_path)
        .with_context(|| format!("Failed to open sprite sheet {}", image_path.display()))?;

    let rect = sprite.rect;
    let fits_x = rect.x.checked_add(rect.w).is_some_and(|right| right <= sheet.width());
    let fits_y = rect.y.checked_add(rect.h).is_some_and(|bottom| bottom <= sheet.height());
    if !fits_x || !fits_y || rect.w == 0 || rect.h == 0 {
        bail!(
            "Frame {}x{} at ({}, {}) is outside the {}x{} sprite sheet",
            rect.w,
            rect.h,
            rect.x,
            rect.y,
            sheet.width(),
            sheet.height()
        );
    }

    let frame = sheet.crop_imm(rect.x, rect.y, rect.w, rect.h);
    frame.save(output).context("Failed to save thumbnail")?;
    println!(
        "Saved {}x{} thumbnail for {:.3}s - {:.3}s to {}",
        rect.w,
        rect.h,
        cue.start,
        cue.end,
        output.display()
    );

    Ok(())
}

fn print_style(style: &ThumbnailStyle) {
    for (name, value) in style.properties() {
        println!("  {}: {}", name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> OverlayArgs {
        OverlayArgs {
            options: None,
            width: None,
            height: None,
            show_timestamp: false,
            page_url: None,
        }
    }

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let mut args = args();
        args.width = Some("120px".to_string());
        args.show_timestamp = true;

        let options = overlay_options(&args, Path::new("thumbs/t.vtt")).unwrap();
        assert_eq!(options.src.as_deref(), Some("thumbs/t.vtt"));
        assert_eq!(options.thumbnail_width.as_deref(), Some("120px"));
        assert!(options.thumbnail_height.is_none());
        assert!(options.show_timestamp);
    }

    #[test]
    fn test_page_location() {
        let mut args = args();
        assert_eq!(page_location(&args).unwrap().base_url(), "");

        args.page_url = Some("https://x.com/watch/index.html".to_string());
        assert_eq!(page_location(&args).unwrap().base_url(), "https://x.com/watch/");

        args.page_url = Some("index.html".to_string());
        assert!(page_location(&args).is_err());
    }

    #[test]
    fn test_cli_parses_sweep() {
        let cli = Cli::try_parse_from([
            "vtt-thumbs",
            "sweep",
            "t.vtt",
            "--duration",
            "60",
            "--width",
            "10em",
        ])
        .unwrap();

        assert_eq!(cli.overlay.width.as_deref(), Some("10em"));
        assert!(matches!(
            cli.command,
            Commands::Sweep { steps: 10, bar_width, .. } if bar_width == 640.0
        ));
    }
}
