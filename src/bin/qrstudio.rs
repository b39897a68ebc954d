use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qrstudio_renderer::{
    ContentType, DotStyle, ErrorCorrection, EyeStyle, FrameStyle, HexColor,
    RegenerationController, StyleConfig, StylePatch,
};

/// Render a styled QR code to a PNG file.
///
/// Style sources are layered in order: defaults, then `--style`, then
/// `--template`, then individual flags.
#[derive(Parser, Debug)]
#[command(name = "qrstudio", version, about, long_about = None)]
struct Args {
    /// Content to encode. Falls back to the style file or the default.
    content: Option<String>,

    /// How the content is turned into a payload.
    #[arg(long = "type", value_name = "TYPE")]
    content_type: Option<ContentType>,

    /// WiFi password, used with `--type wifi`.
    #[arg(long)]
    wifi_password: Option<String>,

    /// Style JSON file (camelCase fields, all optional).
    #[arg(long)]
    style: Option<PathBuf>,

    /// Built-in template id, e.g. `instagram`.
    #[arg(short, long)]
    template: Option<String>,

    /// Logo image placed in the center.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Background image stretched over the code.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Output PNG path.
    #[arg(short, long, default_value = "qrcode.png")]
    out: PathBuf,

    /// Side of the exported PNG in pixels.
    #[arg(long)]
    export_size: Option<u32>,

    /// Error correction level: L, M, Q or H.
    #[arg(long = "ec-level")]
    error_correction: Option<ErrorCorrection>,

    #[arg(long)]
    dots: Option<DotStyle>,

    #[arg(long)]
    eyes: Option<EyeStyle>,

    /// Foreground color, `#rrggbb`.
    #[arg(long)]
    fg: Option<HexColor>,

    /// Background color, `#rrggbb`.
    #[arg(long)]
    bg: Option<HexColor>,

    /// Enables a gradient from the foreground to this color.
    #[arg(long)]
    gradient: Option<HexColor>,

    #[arg(long)]
    frame: Option<FrameStyle>,

    #[arg(long)]
    frame_text: Option<String>,

    /// Print the built-in templates and exit.
    #[arg(long)]
    list_templates: bool,

    /// Print the resolved style as JSON and exit.
    #[arg(long)]
    dump_style: bool,

    /// Also copy the rendered code to the clipboard (`clipboard` feature).
    #[arg(long)]
    copy: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn patch(&self) -> StylePatch {
        StylePatch {
            content_type: self.content_type,
            content: self.content.clone(),
            error_correction_level: self.error_correction,
            export_size: self.export_size,
            foreground_color: self.fg,
            background_color: self.bg,
            gradient_enabled: self.gradient.map(|_| true),
            gradient_color: self.gradient,
            dot_style: self.dots,
            eye_style: self.eyes,
            frame_style: self.frame,
            frame_text: self.frame_text.clone(),
            ..StylePatch::default()
        }
    }

    fn resolve_style(&self) -> anyhow::Result<StyleConfig> {
        let mut config = match &self.style {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("read style '{}'", path.display()))?;
                StyleConfig::from_json(&json)
                    .with_context(|| format!("parse style '{}'", path.display()))?
            }
            None => StyleConfig::default(),
        };

        if let Some(id) = &self.template {
            let preset = qrstudio_renderer::template(id)
                .with_context(|| format!("unknown template '{id}' (see --list-templates)"))?;
            config = qrstudio_renderer::apply_template(&config, &preset)?;
        }

        config = config.merged(&self.patch())?;
        if self.wifi_password.is_some() {
            config.wifi_password = self.wifi_password.clone();
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if args.list_templates {
        for preset in qrstudio_renderer::builtin_templates() {
            println!("{:<10} {}", preset.id, preset.name);
        }
        return Ok(());
    }

    let config = args.resolve_style()?;
    if args.dump_style {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let mut controller = RegenerationController::default();
    controller.set_config(config)?;
    if let Some(path) = &args.logo {
        controller.open_logo(path);
    }
    if let Some(path) = &args.background {
        controller.open_background(path);
    }

    controller.refresh().context("render QR code")?;

    controller
        .save_png(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    tracing::info!(path = %args.out.display(), "saved");

    if args.copy {
        copy(&controller)?;
    }

    Ok(())
}

#[cfg(feature = "clipboard")]
fn copy(controller: &RegenerationController) -> anyhow::Result<()> {
    controller.copy_to_clipboard().context("copy to clipboard")
}

#[cfg(not(feature = "clipboard"))]
fn copy(_controller: &RegenerationController) -> anyhow::Result<()> {
    anyhow::bail!("--copy needs qrstudio built with the `clipboard` feature")
}
