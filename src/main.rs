use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info};

use lintconstraints::{
    parse_api_expression, ApiConstraint, Config, Finding, FloatRangeConstraint, IntRangeConstraint,
    MemberRef, Number, PrivateApiDetector, RangeConstraint, RangeDetector, ReportFormat, Reporter,
    Severity, SizeConstraint,
};

/// lintconstraints - API level, range and hidden API checks for Android lint
#[derive(Parser, Debug)]
#[command(name = "lintconstraints")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum, global = true)]
    format: Option<ReportFormat>,

    /// Output file (for json format)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// API level constraints implied by SDK_INT checks
    #[command(subcommand)]
    Api(ApiCommand),

    /// Check constants against @IntRange, @FloatRange and @Size
    #[command(subcommand)]
    Range(RangeCommand),

    /// Hidden API restriction data
    #[command(subcommand)]
    Restrictions(RestrictionsCommand),
}

#[derive(Subcommand, Debug)]
enum ApiCommand {
    /// Describe the API levels guaranteed when all expressions hold
    /// (e.g. ">= 21" "SDK_INT < 26")
    Describe {
        #[arg(required = true)]
        expressions: Vec<String>,

        /// Describe the levels excluded instead
        #[arg(long)]
        invert: bool,
    },

    /// Decode a serialized constraint
    Decode { hex: String },
}

#[derive(Subcommand, Debug)]
enum RangeCommand {
    /// Check values against a numeric range
    #[command(allow_negative_numbers = true)]
    Check {
        #[arg(required = true)]
        values: Vec<String>,

        /// Lower bound
        #[arg(long)]
        from: Option<String>,

        /// Upper bound
        #[arg(long)]
        to: Option<String>,

        /// Treat the range as @FloatRange
        #[arg(long)]
        float: bool,

        /// Exclude the lower bound (float ranges only)
        #[arg(long, requires = "float")]
        from_exclusive: bool,

        /// Exclude the upper bound (float ranges only)
        #[arg(long, requires = "float")]
        to_exclusive: bool,
    },

    /// Check sizes against a @Size constraint
    Size {
        #[arg(required = true)]
        actual: Vec<i64>,

        /// Exact size
        #[arg(long, conflicts_with_all = ["min", "max"])]
        exact: Option<i64>,

        #[arg(long)]
        min: Option<i64>,

        #[arg(long)]
        max: Option<i64>,

        #[arg(long)]
        multiple: Option<i64>,

        /// Word used in messages, "length" for strings and arrays
        #[arg(long, default_value = "size")]
        unit: String,
    },
}

#[derive(Subcommand, Debug)]
enum RestrictionsCommand {
    /// Build (or reuse) the binary restriction database
    Build {
        /// Restriction text file (overrides the config file)
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,

        /// Rebuild even if a valid cache exists
        #[arg(long)]
        force: bool,
    },

    /// Look up a member and report reflective access to it
    Lookup {
        /// Owner class, e.g. android.app.Activity or Landroid/app/Activity;
        owner: String,

        member: String,

        /// Method descriptor, e.g. "(Landroid/os/Bundle;)V"; omit for fields
        descriptor: Option<String>,

        /// Restriction text file (overrides the config file)
        #[arg(long, value_name = "FILE")]
        source: Option<PathBuf>,

        /// Target SDK of the app (overrides the config file)
        #[arg(long)]
        target_sdk: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completions
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    debug!("lintconstraints v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&cli)?;
    let format = cli.format.unwrap_or(config.format);
    let reporter = Reporter::new(format, cli.output.clone()).with_summary(!cli.quiet);

    let Some(command) = &cli.command else {
        Cli::command().print_help().into_diagnostic()?;
        return Ok(());
    };

    let findings = match command {
        Command::Api(command) => {
            run_api(command, format)?;
            return Ok(());
        }
        Command::Range(command) => run_range(command)?,
        Command::Restrictions(command) => match run_restrictions(command, config, format)? {
            Some(findings) => findings,
            None => return Ok(()),
        },
    };

    reporter.report(&findings)?;

    if findings.iter().any(|f| f.severity == Severity::Error) {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from default locations
        let cwd = std::env::current_dir().into_diagnostic()?;
        Config::from_default_locations(&cwd)?
    };
    Ok(config)
}

fn run_api(command: &ApiCommand, format: ReportFormat) -> Result<()> {
    let constraint = match command {
        ApiCommand::Describe { expressions, invert } => {
            let mut combined = ApiConstraint::ALL;
            for expression in expressions {
                combined = combined & parse_api_expression(expression)?;
            }
            if *invert {
                !combined
            } else {
                combined
            }
        }
        ApiCommand::Decode { hex } => ApiConstraint::deserialize(hex)?,
    };

    match format {
        ReportFormat::Terminal => {
            println!("{}", constraint.describe().bold());
            println!("  {} {}", "serialized:".dimmed(), constraint.serialize());
        }
        ReportFormat::Json => {
            let value = json!({
                "description": constraint.describe(),
                "serialized": constraint.serialize(),
                "from": constraint.from(),
                "to": constraint.to(),
                "empty": constraint.is_empty(),
            });
            println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
        }
    }
    Ok(())
}

fn run_range(command: &RangeCommand) -> Result<Vec<Finding>> {
    let detector = RangeDetector::new();
    let mut findings = Vec::new();

    match command {
        RangeCommand::Check {
            values,
            from,
            to,
            float,
            from_exclusive,
            to_exclusive,
        } => {
            let allowed: RangeConstraint = if *float {
                let from = parse_bound(from.as_deref(), f64::NEG_INFINITY)?;
                let to = parse_bound(to.as_deref(), f64::INFINITY)?;
                FloatRangeConstraint::range(from, to)
                    .with_from_inclusive(!from_exclusive)
                    .with_to_inclusive(!to_exclusive)
                    .into()
            } else {
                let from = parse_bound(from.as_deref(), i64::MIN)?;
                let to = parse_bound(to.as_deref(), i64::MAX)?;
                IntRangeConstraint::range(from, to).into()
            };
            debug!("Checking against: {}", allowed.describe());

            for text in values {
                let value: Number = text.parse()?;
                findings.extend(detector.check_value(text, &allowed, value));
            }
        }
        RangeCommand::Size {
            actual,
            exact,
            min,
            max,
            multiple,
            unit,
        } => {
            let mut allowed = match exact {
                Some(size) => SizeConstraint::exactly(*size),
                None => SizeConstraint::range(min.unwrap_or(i64::MIN), max.unwrap_or(i64::MAX)),
            };
            if let Some(multiple) = multiple {
                if *multiple <= 0 {
                    return Err(miette::miette!("--multiple must be positive (was {})", multiple));
                }
                allowed = allowed.with_multiple(*multiple);
            }

            for size in actual {
                findings.extend(detector.check_size(&size.to_string(), &allowed, unit, *size));
            }
        }
    }
    Ok(findings)
}

fn parse_bound<T: std::str::FromStr>(text: Option<&str>, default: T) -> Result<T> {
    match text {
        Some(text) => text
            .trim()
            .parse()
            .map_err(|_| miette::miette!("invalid range bound `{}`", text)),
        None => Ok(default),
    }
}

/// Returns the findings to report, or `None` when the command printed its
/// own output
fn run_restrictions(
    command: &RestrictionsCommand,
    mut config: Config,
    format: ReportFormat,
) -> Result<Option<Vec<Finding>>> {
    match command {
        RestrictionsCommand::Build { source, force } => {
            if let Some(source) = source {
                config.restrictions.source = Some(source.clone());
            }
            let cache = config.restriction_cache()?;
            let lookup = if *force { cache.rebuild()? } else { cache.load()? };
            let path = cache.cache_path()?;

            match format {
                ReportFormat::Terminal => println!(
                    "{} {} ({} containers, data version {})",
                    "Restriction database:".green().bold(),
                    path.display(),
                    lookup.container_count(),
                    lookup.data_version()
                ),
                ReportFormat::Json => {
                    let value = json!({
                        "path": path,
                        "containers": lookup.container_count(),
                        "data_version": lookup.data_version(),
                    });
                    println!("{}", serde_json::to_string_pretty(&value).into_diagnostic()?);
                }
            }
            Ok(None)
        }
        RestrictionsCommand::Lookup {
            owner,
            member,
            descriptor,
            source,
            target_sdk,
        } => {
            if let Some(source) = source {
                config.restrictions.source = Some(source.clone());
            }
            let target_sdk = target_sdk.unwrap_or(config.target_sdk);
            let lookup = config.restriction_cache()?.load_or_unknown();

            let member = MemberRef {
                owner: owner.clone(),
                name: member.clone(),
                descriptor: descriptor.clone(),
            };
            let restriction = lookup.restriction(&member.owner, &member.name, member.descriptor.as_deref());
            if format == ReportFormat::Terminal {
                println!("{}#{}: {}", member.owner, member.name, restriction.to_string().bold());
            }
            info!("Checked against target SDK {}", target_sdk);

            let detector = PrivateApiDetector::new(target_sdk);
            let findings = detector
                .check_class_name(&member.owner)
                .into_iter()
                .chain(detector.check_restriction(&member, restriction))
                .collect();
            Ok(Some(findings))
        }
    }
}
