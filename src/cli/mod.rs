use crate::app_error::AppError;
use crate::client::HttpClient;
use crate::config::Config;
use crate::harness;
use crate::locator;
use crate::output;
use crate::parser;
use crate::version;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Generator, generate};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "probe",
    version = version::VALUE,
    about = "Markdown test harness for a remote agent execution service",
    styles = clap_styles()
)]
struct Cli {
    #[arg(long = "no-color", global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Run(RunArgs),
    List(ListArgs),
    Version,
    Completion(CompletionArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long)]
    dir: Option<PathBuf>,

    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    timeout: Option<u64>,

    #[arg(long = "results-file")]
    results_file: Option<PathBuf>,

    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,

    #[arg(long = "no-save-outputs")]
    no_save_outputs: bool,

    #[arg(long = "no-fail-on-error")]
    no_fail_on_error: bool,
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long)]
    dir: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct CompletionArgs {
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

fn clap_styles() -> Styles {
    Styles::plain()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Cyan.on_default())
        .valid(AnsiColor::Cyan.on_default())
        .invalid(AnsiColor::Cyan.on_default())
        .context(AnsiColor::White.on_default())
        .context_value(AnsiColor::Cyan.on_default())
}

pub fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    output::configure(cli.no_color);

    match cli.command {
        Commands::Run(args) => run_run(args),
        Commands::List(args) => run_list(args),
        Commands::Version => {
            println!("{}", version::VALUE);
            Ok(())
        }
        Commands::Completion(args) => run_completion(args),
    }
}

fn run_run(args: RunArgs) -> Result<(), AppError> {
    let mut cfg = Config::from_env().map_err(AppError::fatal)?;
    apply_overrides(&mut cfg, &args)?;

    let api_key = cfg.require_api_key().map_err(AppError::fatal)?.to_string();
    let client = HttpClient::new(&cfg.api_url, &api_key).map_err(AppError::fatal)?;

    harness::run(&cfg, &client)
}

fn apply_overrides(cfg: &mut Config, args: &RunArgs) -> Result<(), AppError> {
    if let Some(dir) = &args.dir {
        cfg.test_dir = dir.clone();
    }

    if let Some(model) = &args.model {
        cfg.model = model.clone();
    }

    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err(AppError::fatal("--timeout must be greater than zero"));
        }
        cfg.timeout_secs = timeout;
    }

    if let Some(results_file) = &args.results_file {
        cfg.results_file = results_file.clone();
    }

    if let Some(output_dir) = &args.output_dir {
        cfg.output_dir = output_dir.clone();
    }

    if args.no_save_outputs {
        cfg.save_outputs = false;
    }

    if args.no_fail_on_error {
        cfg.fail_on_error = false;
    }

    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), AppError> {
    let mut cfg = Config::from_env().map_err(AppError::fatal)?;
    if let Some(dir) = &args.dir {
        cfg.test_dir = dir.clone();
    }

    let files = locator::find_test_files(&cfg.test_dir).map_err(AppError::fatal)?;

    #[derive(Serialize)]
    struct DocumentJson {
        file: String,
        valid: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    }

    let mut items = Vec::with_capacity(files.len());
    for file in &files {
        let parsed = fs::read(file)
            .map_err(|e| format!("read document: {e}"))
            .and_then(|bytes| {
                parser::parse(file, &bytes, &cfg).map_err(|failure| failure.message)
            });

        items.push(match parsed {
            Ok(spec) => DocumentJson {
                file: file.display().to_string(),
                valid: true,
                name: Some(spec.name),
                description: if spec.description.is_empty() {
                    None
                } else {
                    Some(spec.description)
                },
                error: None,
            },
            Err(message) => DocumentJson {
                file: file.display().to_string(),
                valid: false,
                name: None,
                description: None,
                error: Some(message),
            },
        });
    }

    if args.json {
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &items)
            .map_err(|e| AppError::fatal(format!("encode list json: {e}")))?;
        writeln!(stdout).map_err(|e| AppError::fatal(format!("write output: {e}")))?;
        return Ok(());
    }

    if items.is_empty() {
        println!("{} {}", output::info("i"), output::muted("No test documents found."));
        return Ok(());
    }

    for item in &items {
        if item.valid {
            let name = item.name.as_deref().unwrap_or_default();
            println!("{}", output::bold(name));
            if let Some(description) = &item.description {
                println!("  description: {description}");
            }
            println!("  file: {}", output::command(&item.file));
        } else {
            println!("{}", output::bold(&item.file));
            println!(
                "  {} {}",
                output::failure("invalid:"),
                item.error.as_deref().unwrap_or_default()
            );
        }
    }

    Ok(())
}

fn run_completion(args: CompletionArgs) -> Result<(), AppError> {
    let mut cmd = Cli::command();
    let mut stdout = io::stdout().lock();

    match args.shell {
        Shell::Bash => generate_completion(clap_complete::shells::Bash, &mut cmd, &mut stdout),
        Shell::Zsh => generate_completion(clap_complete::shells::Zsh, &mut cmd, &mut stdout),
        Shell::Fish => generate_completion(clap_complete::shells::Fish, &mut cmd, &mut stdout),
        Shell::Powershell => {
            generate_completion(clap_complete::shells::PowerShell, &mut cmd, &mut stdout)
        }
    }
    .map_err(|e| AppError::fatal(format!("generate completion: {e}")))
}

fn generate_completion<G: Generator>(
    generator: G,
    cmd: &mut clap::Command,
    writer: &mut impl Write,
) -> Result<(), io::Error> {
    generate(generator, cmd, "probe", writer);
    writer.flush()
}
