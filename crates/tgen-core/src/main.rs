use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tgen_core::{CollisionPolicy, GeneratorConfig, TestGenerator};
use tgen_syntax::{CSharpSyntax, LineEnding, SourceSyntax};
use tgen_synth::{TestFramework, TestSynthesizer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

fn framework_arg() -> Arg {
    Arg::new("framework")
        .long("framework")
        .value_parser(value_parser!(TestFramework))
        .help("Test framework markers: mstest, nunit or xunit")
}

fn line_ending_arg() -> Arg {
    Arg::new("line-ending")
        .long("line-ending")
        .value_parser(value_parser!(LineEnding))
        .help("Line terminator of generated files: crlf or lf")
}

fn cli() -> Command {
    Command::new("tgen")
        .version(tgen_core::VERSION)
        .about("Generate failing test stubs for C# classes")
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log per-task detail"),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate test files for every class in the given sources")
                .arg(
                    Arg::new("paths")
                        .num_args(0..)
                        .value_parser(value_parser!(PathBuf))
                        .help("Source files (or directories with --recursive)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Output directory"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file; flags override its values"),
                )
                .arg(
                    Arg::new("read")
                        .long("read")
                        .value_parser(value_parser!(usize))
                        .help("Maximum concurrent file reads"),
                )
                .arg(
                    Arg::new("generate")
                        .long("generate")
                        .value_parser(value_parser!(usize))
                        .help("Maximum concurrent generation tasks"),
                )
                .arg(
                    Arg::new("write")
                        .long("write")
                        .value_parser(value_parser!(usize))
                        .help("Maximum concurrent file writes"),
                )
                .arg(framework_arg())
                .arg(line_ending_arg())
                .arg(
                    Arg::new("on-collision")
                        .long("on-collision")
                        .value_parser(value_parser!(CollisionPolicy))
                        .help("Output name collisions: overwrite or skip"),
                )
                .arg(
                    Arg::new("recursive")
                        .long("recursive")
                        .short('r')
                        .action(ArgAction::SetTrue)
                        .help("Expand directories to every .cs file beneath them"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the report as JSON"),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Print the generated test files for one source without writing")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Source file"),
                )
                .arg(framework_arg())
                .arg(line_ending_arg()),
        )
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Directories become their sorted `.cs` files when `recursive` is set
fn expand_paths(paths: Vec<PathBuf>, recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut expanded = Vec::with_capacity(paths.len());
    for path in paths {
        if !path.is_dir() {
            expanded.push(path);
            continue;
        }
        if !recursive {
            bail!("{} is a directory; pass --recursive to expand it", path.display());
        }
        for entry in WalkDir::new(&path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("cannot walk {}", path.display()))?;
            if entry.file_type().is_file() && is_csharp(entry.path()) {
                expanded.push(entry.into_path());
            }
        }
    }
    Ok(expanded)
}

fn is_csharp(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "cs")
}

fn generate_config(args: &ArgMatches) -> anyhow::Result<GeneratorConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(file) => GeneratorConfig::from_toml_file(file)
            .with_context(|| format!("loading {}", file.display()))?,
        None => GeneratorConfig::default(),
    };

    let paths: Vec<PathBuf> = args
        .get_many::<PathBuf>("paths")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if !paths.is_empty() {
        config.paths = paths;
    }
    config.paths = expand_paths(std::mem::take(&mut config.paths), args.get_flag("recursive"))?;

    if let Some(output) = args.get_one::<PathBuf>("output") {
        config.output_dir.clone_from(output);
    }
    if let Some(&n) = args.get_one::<usize>("read") {
        config.read_parallelism = n;
    }
    if let Some(&n) = args.get_one::<usize>("generate") {
        config.generate_parallelism = n;
    }
    if let Some(&n) = args.get_one::<usize>("write") {
        config.write_parallelism = n;
    }
    if let Some(&framework) = args.get_one::<TestFramework>("framework") {
        config.framework = framework;
    }
    if let Some(&line_ending) = args.get_one::<LineEnding>("line-ending") {
        config.line_ending = line_ending;
    }
    if let Some(&policy) = args.get_one::<CollisionPolicy>("on-collision") {
        config.collision_policy = policy;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn run_generate(args: &ArgMatches) -> anyhow::Result<bool> {
    let config = generate_config(args)?;
    let report = TestGenerator::csharp(config)
        .generate()
        .await
        .context("generation aborted")?;

    for failure in report.failures() {
        tracing::warn!(kind = failure.kind(), "{failure}");
    }

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(report.is_success())
}

async fn run_preview(args: &ArgMatches) -> anyhow::Result<bool> {
    let Some(file) = args.get_one::<PathBuf>("file") else {
        bail!("missing source file");
    };
    let framework = args
        .get_one::<TestFramework>("framework")
        .copied()
        .unwrap_or_default();
    let line_ending = args
        .get_one::<LineEnding>("line-ending")
        .copied()
        .unwrap_or_default();

    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))?;

    let synthesizer = TestSynthesizer::new(CSharpSyntax::new().with_line_ending(line_ending))
        .with_framework(framework);
    let files = synthesizer
        .generate_all(&text)
        .with_context(|| format!("cannot parse {}", file.display()))?;

    if files.is_empty() {
        tracing::info!(path = %file.display(), "no classes declared");
    }
    let extension = synthesizer.syntax().extension();
    for test_file in files {
        println!("// {}", test_file.file_name(extension));
        print!("{}", test_file.content);
        println!();
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let succeeded = match matches.subcommand() {
        Some(("generate", args)) => run_generate(args).await?,
        Some(("preview", args)) => run_preview(args).await?,
        _ => {
            cli().print_help()?;
            true
        }
    };

    std::process::exit(if succeeded { 0 } else { 1 });
}
