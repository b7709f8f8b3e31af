//! CLI interface for slackq - Slack search with conversational context.
//!
//! Usage: `slackq '{"command":"search_messages","query":"deploy","withContext":"true"}'`

use std::env;
use std::ffi::OsString;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use env_logger::fmt::WriteStyle;
use log::{LevelFilter, debug};
use slackq_core::{AppConfig, AppPaths, CoreError, LogLevel, SlackClient, execute};

fn main() -> ExitCode {
    match try_main(env::args_os()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn try_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help and --version
            err.print()?;
            return Ok(());
        }
        Err(err) => {
            let message = err.render().to_string();
            return Err(CoreError::Input(message.trim_end().to_string()).into());
        }
    };

    let ctx = RuntimeContext::new(cli.common)?;
    ctx.init_logging();
    debug!("resolved paths: {}", ctx.paths);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    rt.block_on(execute(
        &ctx.config,
        &cli.params,
        |slack, token| SlackClient::from_config(slack, token),
        &mut out,
    ))?;
    Ok(())
}

/// Log a fatal error, installing a minimal logger if none is active yet.
fn report(err: &anyhow::Error) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error"))
        .try_init();
    log::error!("{err:#}");
}

#[derive(Debug, Parser)]
#[command(
    name = "slackq",
    author,
    version,
    about = "Search Slack with surrounding context, list channels and users"
)]
struct Cli {
    /// JSON request, e.g. '{"command":"list_channels"}'.
    #[arg(value_name = "JSON")]
    params: String,
    #[command(flatten)]
    common: CommonOpts,
}

/// Options controlling configuration and diagnostics.
#[derive(Debug, Clone, clap::Args)]
struct CommonOpts {
    /// Override the config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Reduce log output to only errors.
    #[arg(short, long)]
    quiet: bool,
    /// Increase logging verbosity (stackable).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
    /// Enable debug logging.
    #[arg(long)]
    debug: bool,
    /// Enable trace logging.
    #[arg(long)]
    trace: bool,
    /// Disable ANSI colors in log output.
    #[arg(long = "no-color", conflicts_with = "color")]
    no_color: bool,
    /// Control color output.
    #[arg(long, value_enum, default_value_t = ColorOption::Auto)]
    color: ColorOption,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorOption {
    /// Detect terminal capabilities automatically.
    Auto,
    /// Always emit ANSI color codes.
    Always,
    /// Never emit ANSI color codes.
    Never,
}

#[derive(Debug)]
struct RuntimeContext {
    common: CommonOpts,
    paths: AppPaths,
    config: AppConfig,
}

impl RuntimeContext {
    fn new(common: CommonOpts) -> Result<Self> {
        let paths = AppPaths::discover(common.config.as_deref())?;
        let config = AppConfig::load_from_path(&paths.config_file)
            .map_err(|e| CoreError::Config(format!("{e:#}")))?;
        Ok(Self {
            common,
            paths,
            config,
        })
    }

    fn init_logging(&self) {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
        builder.filter_level(self.effective_log_level());

        let force_color = self.common.color == ColorOption::Always
            || env::var_os("FORCE_COLOR").is_some();
        let disable_color = self.common.no_color
            || self.common.color == ColorOption::Never
            || env::var_os("NO_COLOR").is_some()
            || (!force_color && !io::stderr().is_terminal());

        if disable_color {
            builder.write_style(WriteStyle::Never);
        } else if force_color {
            builder.write_style(WriteStyle::Always);
        } else {
            builder.write_style(WriteStyle::Auto);
        }

        if let Err(err) = builder.try_init() {
            if self.common.verbose > 0 {
                eprintln!("logger already initialized: {err}");
            }
        }
    }

    const fn effective_log_level(&self) -> LevelFilter {
        if self.common.quiet {
            return LevelFilter::Error;
        }
        if self.common.trace {
            LevelFilter::Trace
        } else if self.common.debug {
            LevelFilter::Debug
        } else {
            match self.common.verbose {
                0 => level_filter(self.config.logging.level),
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        }
    }
}

const fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}
