use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use postercraft::{
    template, DirectorySink, ExportFormat, LayoutHost, PosterRecord, Session, StudioConfig,
};

#[derive(Parser)]
#[command(name = "postercraft", version, about = "Render posters from templates and export them")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the template catalog
    Templates,
    /// Print the starting record as JSON
    Seed,
    /// Write the scaled onscreen preview as a PNG file
    Preview {
        #[command(flatten)]
        poster: PosterArgs,
        #[arg(short, long, default_value = "preview.png")]
        out: PathBuf,
    },
    /// Export the poster as an image, a document or both
    Export {
        #[command(flatten)]
        poster: PosterArgs,
        #[arg(short, long, value_enum, default_value_t = FormatArg::Png)]
        format: FormatArg,
        /// Directory downloads are written to
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Capture multiplier (2 to 4)
        #[arg(long)]
        supersample: Option<u32>,
        /// Print the SHA-256 digest of the captured bitmap
        #[arg(long)]
        digest: bool,
    },
}

#[derive(clap::Args)]
struct PosterArgs {
    /// Poster record as JSON; the seed record is used when omitted
    #[arg(long)]
    record: Option<PathBuf>,
    /// Template identifier (template1..template4)
    #[arg(short, long, default_value = "template1")]
    template: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Pdf,
    Both,
}

impl FormatArg {
    fn formats(self) -> &'static [ExportFormat] {
        match self {
            FormatArg::Png => &[ExportFormat::Png],
            FormatArg::Pdf => &[ExportFormat::Pdf],
            FormatArg::Both => &[ExportFormat::Png, ExportFormat::Pdf],
        }
    }
}

fn load_record(path: Option<&Path>) -> anyhow::Result<PosterRecord> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading record {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing record {}", path.display()))
        }
        None => Ok(PosterRecord::seed()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StudioConfig> {
    match path {
        Some(path) => Ok(StudioConfig::from_json_file(path)?),
        None => Ok(StudioConfig::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG, when set, takes precedence over the flag.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Templates => {
            for descriptor in template::registry() {
                println!("{}\t{}\t{}", descriptor.id, descriptor.name, descriptor.name_ar);
            }
        }
        Command::Seed => {
            println!("{}", serde_json::to_string_pretty(&PosterRecord::seed())?);
        }
        Command::Preview { poster, out } => {
            let record = load_record(poster.record.as_deref())?;
            let descriptor = template::find(&poster.template)?;
            let mut host = LayoutHost::new(config.target_id.clone(), config.preview_scale);
            host.mount(&record, descriptor)?;
            let Some(element) = host.onscreen() else {
                bail!("preview is not mounted");
            };
            let bitmap = element.snapshot().await?;
            std::fs::write(&out, bitmap.encode_png()?)
                .with_context(|| format!("writing {}", out.display()))?;
            println!("{} ({}x{})", out.display(), bitmap.width(), bitmap.height());
        }
        Command::Export {
            poster,
            format,
            out_dir,
            supersample,
            digest,
        } => {
            if let Some(dir) = out_dir {
                config.output_dir = dir;
            }
            if let Some(multiplier) = supersample {
                config.supersample = multiplier;
            }
            config.validate()?;

            let record = load_record(poster.record.as_deref())?;
            let sink = DirectorySink::new(&config.output_dir);
            let mut session = Session::new(config, record, Box::new(sink))?;
            session.select_template(&poster.template)?;

            for &format in format.formats() {
                let report = session.try_export(format).await.map_err(|e| {
                    anyhow::anyhow!("{} export failed: {}", format, e.user_message())
                })?;
                println!("{}", report.path.display());
                if digest {
                    println!("  sha256 {}", report.fingerprint);
                }
            }
        }
    }
    Ok(())
}
