use crate::{
    config::Config,
    format::{DataOutput, OutputRequest},
    image_source::ImageInput,
    lang::LangToken,
    session::{Recognize, Session},
};
use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tessy")]
#[command(about = "Tesseract-OCR wrapper: image to files, data or text")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./tessy.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the engine version.
    Version {},
    /// Print the cached engine path and the discovered data directory.
    Locate {},
    /// Recognize into output files and print their paths.
    File {
        #[command(flatten)]
        opts: RecognizeArgs,
        /// Output base; files are written as `<base>.<ext>`.
        #[arg(long)]
        output_base: Option<PathBuf>,
    },
    /// Recognize and print each output as JSON.
    Data {
        #[command(flatten)]
        opts: RecognizeArgs,
        /// bytes, string or dict.
        #[arg(long, default_value = "string")]
        mode: String,
    },
    /// Recognize and print the text.
    #[command(name = "string")]
    Text {
        #[command(flatten)]
        opts: RecognizeArgs,
    },
    /// Delete temporary files.
    ClearTemp {
        /// Every TESS_* file in the temp dir, not just this run's.
        #[arg(long)]
        all: bool,
    },
}

#[derive(ClapArgs, Debug)]
pub struct RecognizeArgs {
    pub input: PathBuf,
    /// Comma separated: txt, tsv, box, hocr, osd, pdf.
    #[arg(long, short = 'f', default_value = "txt")]
    pub format: String,
    /// Language codes, `eng+deu` or repeated.
    #[arg(long, short = 'l')]
    pub lang: Vec<String>,
    /// Extra engine arguments, shell quoted.
    #[arg(long = "config-args")]
    pub extra_args: Option<String>,
}

impl RecognizeArgs {
    fn to_recognize(&self) -> Result<Recognize> {
        let formats = OutputRequest::parse(&self.format)?;
        let lang: Vec<LangToken> = self
            .lang
            .iter()
            .flat_map(|l| l.split(['+', ',']))
            .filter(|l| !l.trim().is_empty())
            .map(LangToken::from)
            .collect();
        Ok(Recognize {
            formats,
            lang,
            extra_args: self.extra_args.clone(),
            output_base: None,
        })
    }
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    let mut session = Session::new(&cfg);

    match &args.cmd {
        Command::Version {} => {
            let version = session
                .tesseract_version()
                .ok_or_else(|| anyhow!("engine not runnable: {}", session.command()))?;
            println!("{version}");
        }
        Command::Locate {} => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "command": session.command(),
                    "cached": session.locate(),
                    "data_dir": session.locate_data(),
                }))?
            );
        }
        Command::File { opts, output_base } => {
            session.init();
            let mut rec = opts.to_recognize()?;
            rec.output_base = output_base.clone();
            let files = session.image_to_file(ImageInput::Path(&opts.input), &rec)?;
            println!("{}", serde_json::to_string_pretty(&files)?);
        }
        Command::Data { opts, mode } => {
            session.init();
            let mode: DataOutput = mode.parse()?;
            let data = session.image_to_data(ImageInput::Path(&opts.input), &opts.to_recognize()?, mode)?;
            let json: Vec<serde_json::Value> = data
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "format": d.format,
                        "data": d.record.as_ref().map(|r| r.to_json()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Command::Text { opts } => {
            session.init();
            let text = session
                .image_to_string(ImageInput::Path(&opts.input), &opts.to_recognize()?)?
                .unwrap_or_default();
            println!("{text}");
        }
        Command::ClearTemp { all } => {
            let removed = session.clear_temp(*all);
            info!("removed {removed} temp files from {}", session.temp_dir().display());
        }
    }
    Ok(())
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("tessy.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create_dir_all {}", parent.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(crate::util::temp_dir(&cfg.paths).join("tessy.log"))
}
