//! apkcfg CLI
//!
//! Resolves Android build-target descriptors and renders them for Gradle.

use anyhow::Result;
use apkcfg_android::{gradle, resolve_file, BuildTarget, FrameworkDefaults, RawDescriptor};
use apkcfg_cli::output::{format_count, format_duration, print_error, Status};
use apkcfg_core::config::Config;
use apkcfg_core::error::{exit_codes, Error};
use apkcfg_telemetry::{level_for_verbosity, timed_span, TelemetryConfig, Timer};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "apkcfg")]
#[command(about = "Resolve and render Android build-target descriptors")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON file with values exported by the app framework
    #[arg(long, global = true, env = "APKCFG_FRAMEWORK_VALUES")]
    framework_values: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical build target
    Resolve {
        /// Descriptor file (TOML or JSON)
        #[arg(short, long, env = "APKCFG_DESCRIPTOR")]
        descriptor: Option<PathBuf>,
        /// Output format (defaults to general.output_format)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Validate a descriptor
    Check {
        /// Descriptor file (TOML or JSON)
        #[arg(short, long, env = "APKCFG_DESCRIPTOR")]
        descriptor: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render build.gradle.kts
    Render {
        /// Descriptor file (TOML or JSON)
        #[arg(short, long, env = "APKCFG_DESCRIPTOR")]
        descriptor: Option<PathBuf>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective framework values
    Framework {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Toml,
    Json,
}

impl OutputFormat {
    fn from_config(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    };

    apkcfg_telemetry::init_with_config(TelemetryConfig {
        log_level: level_for_verbosity(cli.verbose, cli.quiet, &config.schema.logging.level),
        ..TelemetryConfig::default()
    })?;

    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }

    let framework = match load_framework(&config, cli.framework_values.as_deref()) {
        Ok(framework) => framework,
        Err(e) => {
            print_error(&e);
            std::process::exit(e.exit_code());
        }
    };

    let exit_code = match cli.command {
        Commands::Resolve { descriptor, format } => {
            let path = descriptor_path(descriptor, &config);
            run_resolve(&path, format, &config, &framework)
        }
        Commands::Check { descriptor, json } => {
            let path = descriptor_path(descriptor, &config);
            run_check(&path, json, cli.quiet, &framework)
        }
        Commands::Render { descriptor, output } => {
            let path = descriptor_path(descriptor, &config);
            run_render(&path, output.as_deref(), cli.quiet, &framework)
        }
        Commands::Framework { json } => run_framework(&framework, json),
    };

    std::process::exit(exit_code);
}

fn descriptor_path(explicit: Option<PathBuf>, config: &Config) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(&config.schema.general.descriptor))
}

/// `[framework]` from the config, overlaid with an exported values file
fn load_framework(config: &Config, values: Option<&Path>) -> apkcfg_core::Result<FrameworkDefaults> {
    let base = FrameworkDefaults::from(&config.schema.framework);
    match values {
        Some(path) => Ok(base.merged(FrameworkDefaults::load_json(path)?)),
        None => Ok(base),
    }
}

fn resolve_or_report(path: &Path, framework: &FrameworkDefaults) -> Result<BuildTarget, i32> {
    timed_span!("resolve", path = %path.display());
    resolve_file(path, framework).map_err(|e| {
        print_error(&e);
        e.exit_code()
    })
}

fn run_resolve(
    path: &Path,
    format: Option<OutputFormat>,
    config: &Config,
    framework: &FrameworkDefaults,
) -> i32 {
    let format = match format {
        Some(format) => format,
        None => match OutputFormat::from_config(&config.schema.general.output_format) {
            Some(format) => format,
            None => {
                print_error(&Error::config(format!(
                    "Unknown output format: {}",
                    config.schema.general.output_format
                ))
                .with_suggestion("Set general.output_format to \"toml\" or \"json\""));
                return exit_codes::CONFIG_ERROR;
            }
        },
    };

    let target = match resolve_or_report(path, framework) {
        Ok(target) => target,
        Err(code) => return code,
    };

    let raw = RawDescriptor::from(&target);
    let rendered = match format {
        OutputFormat::Toml => raw.to_toml_string(),
        OutputFormat::Json => raw.to_json_string(),
    };

    match rendered {
        Ok(text) => {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(&e);
            e.exit_code()
        }
    }
}

fn run_check(path: &Path, json: bool, quiet: bool, framework: &FrameworkDefaults) -> i32 {
    let timer = Timer::start("check");
    let result = resolve_file(path, framework);
    let elapsed = timer.stop();

    match result {
        Ok(target) => {
            if json {
                let report = serde_json::json!({
                    "valid": true,
                    "descriptor": path.display().to_string(),
                    "application_id": target.application_id,
                    "variants": target.build_variants.len(),
                    "dependencies": target.dependencies.len(),
                });
                println!("{report:#}");
            } else if !quiet {
                Status::success(&format!(
                    "{} is valid: {}, {}, {} ({})",
                    path.display(),
                    target.application_id,
                    format_count(target.build_variants.len(), "variant", "variants"),
                    format_count(target.dependencies.len(), "dependency", "dependencies"),
                    format_duration(elapsed)
                ));
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            if json {
                let report = serde_json::json!({
                    "valid": false,
                    "descriptor": path.display().to_string(),
                    "error": e.to_report(),
                });
                println!("{report:#}");
            } else {
                print_error(&e);
            }
            e.exit_code()
        }
    }
}

fn run_render(
    path: &Path,
    output: Option<&Path>,
    quiet: bool,
    framework: &FrameworkDefaults,
) -> i32 {
    let target = match resolve_or_report(path, framework) {
        Ok(target) => target,
        Err(code) => return code,
    };

    match output {
        Some(out) => match gradle::write_script(&target, out) {
            Ok(()) => {
                if !quiet {
                    Status::success(&format!("Wrote {}", out.display()));
                }
                exit_codes::SUCCESS
            }
            Err(e) => {
                print_error(&e);
                e.exit_code()
            }
        },
        None => {
            print!("{}", gradle::render(&target));
            exit_codes::SUCCESS
        }
    }
}

fn run_framework(framework: &FrameworkDefaults, json: bool) -> i32 {
    if json {
        match serde_json::to_string_pretty(framework) {
            Ok(text) => {
                println!("{text}");
                return exit_codes::SUCCESS;
            }
            Err(e) => {
                let e = Error::from(e);
                print_error(&e);
                return e.exit_code();
            }
        }
    }

    let show = |value: Option<String>| value.unwrap_or_else(|| "(unset)".to_string());
    let ns = &framework.namespace;

    Status::header(&format!("Framework values ({ns})"));
    Status::field(
        &format!("{ns}.compileSdkVersion"),
        &show(framework.compile_sdk_version.map(|v| v.to_string())),
    );
    Status::field(
        &format!("{ns}.minSdkVersion"),
        &show(framework.min_sdk_version.map(|v| v.to_string())),
    );
    Status::field(
        &format!("{ns}.targetSdkVersion"),
        &show(framework.target_sdk_version.map(|v| v.to_string())),
    );
    Status::field(&format!("{ns}.ndkVersion"), &show(framework.ndk_version.clone()));
    Status::field(
        &format!("{ns}.versionCode"),
        &show(framework.version_code.map(|v| v.to_string())),
    );
    Status::field(&format!("{ns}.versionName"), &show(framework.version_name.clone()));

    exit_codes::SUCCESS
}
