use anyhow::{Context as AnyhowContext, Result};
use automap_protocol::{
    matching_keys, render_filters_yaml, serialize_json_pretty, DeploymentTarget, MappingConfig,
};
use automap_resolver::{
    discover_services, generate, list_root, resolve_labels, validate, FsProbe, Generation,
    LabelError, MappingFile, MappingSource, RootedFs, ValidationReport,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

pub mod relay;
mod report;
mod settings;

pub use settings::Settings;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "automap")]
#[command(about = "Resolve deployment mappings into CI path filters and targets", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Repository root that convention paths are relative to (overrides AUTOMAP_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Mapping document, YAML or JSON (overrides AUTOMAP_CONFIG; relative paths are under the root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the mapping document
    Validate(ValidateArgs),

    /// List services found in the repository and declared in the mapping
    Services(ServicesArgs),

    /// Generate the path-filter file and job matrix
    Generate(GenerateArgs),

    /// Resolve deploy:<service>:<environment>[:<stack>] labels
    Resolve(ResolveArgs),

    /// Show which filters a set of changed files would trigger
    Changed(ChangedArgs),

    /// Decode and bound captured tool output for display
    Relay(RelayArgs),

    /// Validate, generate, resolve labels and print statistics in one pass
    Check(CheckArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ServicesArgs {
    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Path-filter file (default: <root>/path-filters.yml, overrides AUTOMAP_FILTERS_OUT)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write the job matrix as JSON ({"include": [...]})
    #[arg(long)]
    matrix_out: Option<PathBuf>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ResolveArgs {
    /// Labels to resolve
    #[arg(required = true)]
    labels: Vec<String>,

    /// Exit non-zero when any label fails to resolve
    #[arg(long)]
    strict: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ChangedArgs {
    /// Changed files relative to the root (read from stdin when omitted)
    paths: Vec<String>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RelayArgs {
    /// File holding the percent-encoded capture
    #[arg(long)]
    file: PathBuf,

    /// Action the output belongs to (plan, apply, ...)
    #[arg(long, default_value = "command")]
    action: String,
}

#[derive(Args)]
struct CheckArgs {
    /// Label to resolve after generation (repeatable)
    #[arg(long = "label")]
    labels: Vec<String>,

    /// Path-filter file (default: <root>/path-filters.yml, overrides AUTOMAP_FILTERS_OUT)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct ValidationOutput<'a> {
    valid: bool,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    services: &'a [String],
    filters_path: Option<String>,
    #[serde(flatten)]
    generation: &'a Generation,
}

#[derive(Serialize)]
struct LabelOutput {
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<DeploymentTarget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    working_directory_exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn main_entry() -> Result<()> {
    let Cli {
        command,
        verbose,
        mut quiet,
        root,
        config,
    } = Cli::parse();

    // Keep stdout clean for JSON consumers.
    let json_output = match &command {
        Commands::Validate(args) => args.json,
        Commands::Services(args) => args.json,
        Commands::Generate(args) => args.json,
        Commands::Resolve(args) => args.json,
        Commands::Changed(args) => args.json,
        Commands::Relay(_) | Commands::Check(_) => false,
    };
    if json_output {
        quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let settings = Settings::resolve(root, config);
    log::debug!(
        "root={} config={}",
        settings.root().display(),
        settings.config_path.display()
    );

    match command {
        Commands::Validate(args) => run_validate(args, &settings)?,
        Commands::Services(args) => run_services(args, &settings)?,
        Commands::Generate(args) => run_generate(args, &settings)?,
        Commands::Resolve(args) => run_resolve(args, &settings)?,
        Commands::Changed(args) => run_changed(args, &settings)?,
        Commands::Relay(args) => run_relay(args)?,
        Commands::Check(args) => run_check(args, &settings)?,
    }

    Ok(())
}

fn load_mapping(settings: &Settings) -> Result<MappingConfig> {
    MappingFile::new(&settings.config_path)
        .load()
        .with_context(|| format!("Failed to load mapping {}", settings.config_path.display()))
}

/// Stop the process when the mapping has fatal errors.
fn require_valid(config: &MappingConfig, json: bool) -> Result<()> {
    let report = validate(config);
    if report.is_valid() {
        for warning in &report.warnings {
            log::warn!("{warning}");
        }
        return Ok(());
    }

    if json {
        print_stdout(&serialize_json_pretty(&ValidationOutput {
            valid: false,
            report: &report,
        })?)?;
    } else {
        print_stdout(&report::render_validation(&report))?;
        print_stdout("Refusing to continue until the mapping errors are fixed.")?;
    }
    std::process::exit(1);
}

fn discover(settings: &Settings, config: &MappingConfig, probe: &RootedFs) -> Result<Vec<String>> {
    let listing = list_root(settings.root()).with_context(|| {
        format!(
            "Failed to list repository root {}",
            settings.root().display()
        )
    })?;
    Ok(discover_services(&listing, config, probe))
}

/// Overwrite the filter file. An empty filter set writes nothing and removes
/// the file a previous run left behind.
fn write_filters(path: &Path, generation: &Generation) -> Result<Option<PathBuf>> {
    if generation.filters.is_empty() {
        if path.is_file() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove stale {}", path.display()))?;
            log::warn!("No filters to generate; removed stale {}", path.display());
        } else {
            log::warn!("No filters to generate; {} not written", path.display());
        }
        return Ok(None);
    }
    create_parent(path)?;
    fs::write(path, render_filters_yaml(&generation.filters))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!(
        "Wrote {} filters to {}",
        generation.filters.len(),
        path.display()
    );
    Ok(Some(path.to_path_buf()))
}

fn write_matrix(path: &Path, generation: &Generation) -> Result<()> {
    create_parent(path)?;
    fs::write(path, serialize_json_pretty(&generation.matrix())?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn print_resolutions(
    results: &[(String, std::result::Result<DeploymentTarget, LabelError>)],
    probe: &RootedFs,
) -> Result<()> {
    for (label, result) in results {
        print_stdout(label)?;
        match result {
            Ok(target) => print_stdout(&report::render_target(
                target,
                probe.exists(&target.working_directory),
            ))?,
            Err(err) => print_stdout(&report::render_label_error(err))?,
        }
    }
    Ok(())
}

fn run_validate(args: ValidateArgs, settings: &Settings) -> Result<()> {
    let config = load_mapping(settings)?;
    let report = validate(&config);

    if args.json {
        print_stdout(&serialize_json_pretty(&ValidationOutput {
            valid: report.is_valid(),
            report: &report,
        })?)?;
    } else {
        print_stdout(&report::render_validation(&report))?;
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_services(args: ServicesArgs, settings: &Settings) -> Result<()> {
    let config = load_mapping(settings)?;
    require_valid(&config, args.json)?;

    let probe = RootedFs::new(settings.root());
    let services = discover(settings, &config, &probe)?;

    if args.json {
        print_stdout(&serialize_json_pretty(&services)?)?;
    } else {
        for service in &services {
            print_stdout(service)?;
        }
    }
    Ok(())
}

fn run_generate(args: GenerateArgs, settings: &Settings) -> Result<()> {
    let config = load_mapping(settings)?;
    require_valid(&config, args.json)?;

    let probe = RootedFs::new(settings.root());
    let services = discover(settings, &config, &probe)?;
    let generation = generate(&services, &config, &probe);

    let filters_path = settings.filters_path(args.out);
    let written = write_filters(&filters_path, &generation)?;
    if let Some(matrix_out) = args.matrix_out {
        write_matrix(&settings.anchor(matrix_out), &generation)?;
    }

    if args.json {
        print_stdout(&serialize_json_pretty(&GenerateOutput {
            services: &services,
            filters_path: written.map(|p| p.display().to_string()),
            generation: &generation,
        })?)?;
        return Ok(());
    }

    print_stdout(report::render_checked(&generation.checked).trim_end())?;
    print_stdout(&report::render_generation_summary(&services, &generation))?;
    match written {
        Some(path) => print_stdout(&format!(
            "Wrote {} filters to {}",
            generation.filters.len(),
            path.display()
        ))?,
        None => print_stdout(&format!(
            "No filters to generate; {} not written",
            filters_path.display()
        ))?,
    }
    Ok(())
}

fn run_resolve(args: ResolveArgs, settings: &Settings) -> Result<()> {
    let config = load_mapping(settings)?;
    require_valid(&config, args.json)?;

    let probe = RootedFs::new(settings.root());
    let results = resolve_labels(args.labels.iter().map(String::as_str), &config);
    let failures = results.iter().filter(|(_, r)| r.is_err()).count();

    if args.json {
        let out: Vec<LabelOutput> = results
            .into_iter()
            .map(|(label, result)| match result {
                Ok(target) => LabelOutput {
                    label,
                    working_directory_exists: Some(probe.exists(&target.working_directory)),
                    target: Some(target),
                    error: None,
                },
                Err(err) => LabelOutput {
                    label,
                    target: None,
                    working_directory_exists: None,
                    error: Some(err.to_string()),
                },
            })
            .collect();
        print_stdout(&serialize_json_pretty(&out)?)?;
    } else {
        print_resolutions(&results, &probe)?;
    }

    if failures > 0 {
        log::warn!("{failures} label(s) failed to resolve");
        if args.strict {
            std::process::exit(1);
        }
    }
    Ok(())
}

fn run_changed(args: ChangedArgs, settings: &Settings) -> Result<()> {
    let config = load_mapping(settings)?;
    require_valid(&config, args.json)?;

    let probe = RootedFs::new(settings.root());
    let services = discover(settings, &config, &probe)?;
    let generation = generate(&services, &config, &probe);

    let paths = if args.paths.is_empty() {
        read_stdin_lines()?
    } else {
        args.paths
    };
    let keys = matching_keys(&generation.filters, &paths);
    log::info!("{} of {} filters triggered", keys.len(), generation.filters.len());

    if args.json {
        print_stdout(&serialize_json_pretty(&keys)?)?;
    } else {
        for key in keys {
            print_stdout(key)?;
        }
    }
    Ok(())
}

fn read_stdin_lines() -> Result<Vec<String>> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read changed paths from stdin")?;
    Ok(buf
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn run_relay(args: RelayArgs) -> Result<()> {
    print_stdout(&relay::render_file(&args.file, &args.action))
}

fn run_check(args: CheckArgs, settings: &Settings) -> Result<()> {
    let config = load_mapping(settings)?;
    let validation = validate(&config);
    print_stdout(&report::render_validation(&validation))?;
    if !validation.is_valid() {
        print_stdout("Refusing to continue until the mapping errors are fixed.")?;
        std::process::exit(1);
    }

    let probe = RootedFs::new(settings.root());
    let services = discover(settings, &config, &probe)?;
    let generation = generate(&services, &config, &probe);
    print_stdout("")?;
    print_stdout(report::render_checked(&generation.checked).trim_end())?;
    print_stdout(&report::render_generation_summary(&services, &generation))?;

    let filters_path = settings.filters_path(args.out);
    match write_filters(&filters_path, &generation)? {
        Some(path) => print_stdout(&format!(
            "Wrote {} filters to {}",
            generation.filters.len(),
            path.display()
        ))?,
        None => print_stdout(&format!(
            "No filters to generate; {} not written",
            filters_path.display()
        ))?,
    }

    if !args.labels.is_empty() {
        print_stdout("")?;
        let results = resolve_labels(args.labels.iter().map(String::as_str), &config);
        print_resolutions(&results, &probe)?;
    }

    print_stdout("")?;
    print_stdout(&report::render_stats(
        &config,
        &report::RunStats {
            filters: generation.filters.len(),
            matrix_items: generation.matrix.len(),
        },
    ))?;
    Ok(())
}
