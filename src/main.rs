use clap::Parser;
use image_resize::options::{
    OptionError, OptionOverrides, ResolvedOptions, SubsamplingMode, TargetFormat,
};
use image_resize::process::BatchReport;
use image_resize::{config, output, process, scan};
use log::{debug, error, info};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; called a single time at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "image-resize")]
#[command(about = "Batch rescale and re-encode images")]
#[command(long_about = "\
Batch rescale and re-encode images

Pass either one quoted glob pattern or a list of files:

  image-resize -s 50 -f jpeg -d web 'photos/**/*.png'
  image-resize -q 85 -u _small a.jpg b.jpg

Output names are <directory>/<prefix><name><suffix>.<ext>. Without a
directory the output goes next to the input; with no directory, prefix or
suffix and no format change, the input is overwritten.

Subsampling (JPEG output only):
  0     4:4:4
  1     4:2:2
  2     4:2:0
  keep  same as the source JPEG, encoder default otherwise
  auto  encoder default

Defaults for any option can be kept in a TOML file passed with --config.
Flags given on the command line take precedence.")]
#[command(version = version_string())]
struct Cli {
    /// Glob pattern, or one or more image files
    #[arg(required = true, value_name = "GLOB | FILE")]
    inputs: Vec<PathBuf>,

    /// Scale to this percentage of the original size
    #[arg(short, long, value_name = "PERCENT")]
    scale: Option<u32>,

    /// Output format: jpeg or png [default: keep input format]
    #[arg(short, long)]
    format: Option<TargetFormat>,

    /// Write outputs into this directory (created if missing)
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Prepend to output file names
    #[arg(short, long)]
    prefix: Option<String>,

    /// Append to output file names, before the extension
    #[arg(short = 'u', long)]
    suffix: Option<String>,

    /// JPEG quality, 0 (worst) to 95 (best) [default: 75]
    #[arg(short, long)]
    quality: Option<u32>,

    /// PNG compression, 0 (none) to 9 (best) [default: 6]
    #[arg(short, long, value_name = "LEVEL")]
    compression: Option<u32>,

    /// JPEG chroma subsampling: 0, 1, 2, keep or auto [default: keep]
    #[arg(short = 'm', long, value_name = "MODE")]
    subsampling: Option<SubsamplingMode>,

    /// Do not carry ICC profiles over to the output
    #[arg(short = 'x', long)]
    exclude_icc: bool,

    /// Resolve everything but write nothing
    #[arg(short = 'r', long)]
    dry_run: bool,

    /// Print each input and output path
    #[arg(short, long)]
    verbose: bool,

    /// Print resolved options and per-file encoder settings
    #[arg(long)]
    debug: bool,

    /// Number of files processed in parallel [default: 1]
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// TOML file with option defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            scale: self.scale,
            format: self.format,
            directory: self.directory.clone(),
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            quality: self.quality,
            compression: self.compression,
            subsampling: self.subsampling,
            jobs: self.jobs,
            exclude_icc: self.exclude_icc,
            dry_run: self.dry_run,
            verbose: self.verbose,
            debug: self.debug,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(&cli);

    match run(cli) {
        Ok(report) if report.has_failures() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(2)
        }
    }
}

/// Resolve options, enumerate inputs and run the batch. Option errors abort
/// before any file is touched.
fn run(cli: Cli) -> Result<BatchReport, OptionError> {
    let file_config = config::load_config(cli.config.as_deref())?;
    let options = ResolvedOptions::resolve(cli.overrides(), file_config)?;
    for line in output::format_options(&options) {
        debug!("{line}");
    }

    let spec = scan::classify_positionals(cli.inputs);
    let inputs = scan::enumerate_inputs(spec.glob.as_deref(), &spec.files)?;
    if inputs.is_empty() {
        info!("No input files");
        return Ok(BatchReport::default());
    }

    init_thread_pool(options.jobs);
    let report = process::process_batch(&inputs, &options);
    info!("{}", output::format_summary(&report));
    Ok(report)
}

/// `warn` by default, `info` with --verbose, `debug` with --debug.
/// `RUST_LOG` takes precedence over all three.
fn init_logger(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Initialize the rayon thread pool.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(jobs: usize) {
    let threads = config::effective_threads(jobs);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
