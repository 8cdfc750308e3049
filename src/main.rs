use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use rusty_stack::app::StackApp;
use rusty_stack::color::DisplayRange;
use rusty_stack::config::RunConfig;
use rusty_stack::data::loader::Delimiter;

/// Stack numbered text-matrix frames and render them with a magma colormap.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source directory holding <prefix><n>.txt files
    directory: Option<PathBuf>,

    /// Frame file prefix, e.g. t_, px_, pxs_
    #[arg(short, long)]
    prefix: Option<String>,

    /// Number of frames to load; derived from the directory when omitted
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Value separator inside a row
    #[arg(short, long, value_enum)]
    delimiter: Option<Delimiter>,

    /// Output directory for the rendered PNGs [default: <directory>/render]
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Lower end of a fixed display range
    #[arg(long, requires = "max")]
    min: Option<f64>,

    /// Upper end of a fixed display range
    #[arg(long, requires = "min")]
    max: Option<f64>,

    /// JSON run configuration; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build and summarize without rendering
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load_json(path)?,
            None => RunConfig::default(),
        };

        if let Some(dir) = self.directory {
            config.source.directory = dir;
        }
        if let Some(prefix) = self.prefix {
            config.source.prefix = prefix;
        }
        if self.count.is_some() {
            config.source.frame_count = self.count;
        }
        if let Some(delimiter) = self.delimiter {
            config.loader.delimiter = delimiter;
        }
        if self.out.is_some() {
            config.render.out_dir = self.out;
        }
        match (self.min, self.max) {
            (Some(min), Some(max)) => config.render.range = DisplayRange::Fixed { min, max },
            (None, None) => {}
            _ => bail!("--min and --max must be given together"),
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let dry_run = args.dry_run;
    let config = args.into_config()?;

    let mut app = StackApp::from_config(config);
    let summary = if dry_run { app.dry_run()? } else { app.run()? };

    let fmt_range = |range: Option<(f64, f64)>| {
        range
            .map(|(lo, hi)| format!("{lo} .. {hi}"))
            .unwrap_or_else(|| "n/a".to_string())
    };
    println!(
        "{} frames, {} each, values {}, display {}",
        summary.frames,
        summary.shape,
        fmt_range(summary.value_range),
        fmt_range(summary.range)
    );
    for file in &summary.files {
        println!("  {}", file.display());
    }
    Ok(())
}
