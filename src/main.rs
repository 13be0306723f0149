use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sheetdoc::app::AppState;
use sheetdoc::batch::{BatchGenerator, archive_filename, deliver};
use sheetdoc::codec::DocxCodec;
use sheetdoc::codec::docx::starter_template;
use sheetdoc::config::AppConfig;
use sheetdoc::json_export::{InspectReport, export_json, serialize_to_json};
use sheetdoc::tabular::{self, ParseResult};
use sheetdoc::template::{TemplateMapper, starter_markup};
use sheetdoc::ui;

#[derive(Debug, Parser)]
#[command(
    name = "sheetdoc",
    version,
    about = "Fill document templates from spreadsheet or CSV rows"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// JSON configuration file (field mapping, naming, template paths).
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Markup template used for previews.
    #[arg(long, global = true)]
    preview_template: Option<PathBuf>,

    /// Document template used for generation.
    #[arg(long, global = true)]
    document_template: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the headers and record count of a data file.
    Inspect {
        /// Spreadsheet (.xlsx, .xls, .xlsm, .xlsb, .ods) or .csv file.
        data: PathBuf,

        /// Print the records as JSON instead.
        #[arg(long, short = 'j')]
        json: bool,

        /// Write the JSON report to a file instead of stdout.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the filled preview markup for one record.
    Render {
        data: PathBuf,

        /// Data row to render, starting at 1.
        #[arg(long, short = 'r', default_value_t = 1)]
        row: usize,

        /// Write the markup to a file instead of stdout.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Generate one document per record and write them out.
    Generate {
        data: PathBuf,

        /// Directory the document or archive is written to.
        #[arg(long, short = 'o', default_value = ".")]
        out_dir: PathBuf,

        /// Archive file name when several documents are produced.
        #[arg(long)]
        archive_name: Option<String>,
    },

    /// Browse the filled preview record by record in the terminal.
    Preview {
        data: PathBuf,

        /// Directory batches generated from the previewer are written to.
        #[arg(long, short = 'o', default_value = ".")]
        out_dir: PathBuf,
    },

    /// Write starter preview and document templates for the configured mapping.
    Init {
        /// Directory to create the templates in.
        #[arg(long, default_value = "templates")]
        dir: PathBuf,

        /// Overwrite existing templates.
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "sheetdoc=warn",
        1 => "sheetdoc=info",
        _ => "sheetdoc=debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn load_config(args: &GlobalArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(path) = &args.preview_template {
        config.preview_template = path.clone();
    }
    if let Some(path) = &args.document_template {
        config.document_template = path.clone();
    }

    Ok(config)
}

fn load_mapper(config: &AppConfig, codec: &DocxCodec) -> Result<TemplateMapper> {
    let mut mapper = TemplateMapper::new(config.field_mapping()?, config.filename_policy());
    mapper
        .load_templates(&config.template_sources(), codec)
        .context("failed to load templates (run `sheetdoc init` to create starter templates)")?;
    Ok(mapper)
}

fn load_data(path: &Path, config: &AppConfig) -> Result<ParseResult> {
    let parsed = tabular::parse_file(path)?;

    let mapping = config.field_mapping()?;
    let missing = parsed.missing_fields(&mapping);
    if !missing.is_empty() {
        warn!(
            fields = %missing.join(", "),
            "mapped fields missing from data headers; they will be left blank"
        );
    }

    Ok(parsed)
}

fn run_inspect(
    config: &AppConfig,
    data: &Path,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let parsed = load_data(data, config)?;
    let mapping = config.field_mapping()?;
    let report = InspectReport::new(&parsed, &mapping);

    if let Some(path) = output {
        export_json(&report, path)?;
        println!("{}", path.display());
        return Ok(());
    }
    if json {
        println!("{}", serialize_to_json(&report)?);
        return Ok(());
    }

    println!("File:    {}", data.display());
    println!("Records: {}", parsed.len());
    println!("Headers: {}", parsed.headers.join(", "));

    let missing = parsed.missing_fields(&mapping);
    if !missing.is_empty() {
        println!("Unmapped in data: {}", missing.join(", "));
    }

    Ok(())
}

fn run_render(config: &AppConfig, data: &Path, row: usize, output: Option<&Path>) -> Result<()> {
    let codec = DocxCodec::new(config.syntax());
    let mapper = load_mapper(config, &codec)?;
    let parsed = load_data(data, config)?;

    let Some(record) = row.checked_sub(1).and_then(|index| parsed.rows.get(index)) else {
        bail!("row {} is out of range (1-{})", row, parsed.len());
    };
    let markup = mapper.fill_for_preview(record)?;

    match output {
        Some(path) => fs::write(path, markup)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", markup),
    }

    Ok(())
}

fn run_generate(
    config: &AppConfig,
    data: &Path,
    out_dir: &Path,
    archive_name: Option<String>,
) -> Result<()> {
    let codec = DocxCodec::new(config.syntax());
    let mapper = load_mapper(config, &codec)?;
    let parsed = load_data(data, config)?;

    let documents = BatchGenerator::new(&mapper, &codec)
        .with_policy(config.yield_policy()?)
        .generate_all(&parsed.rows)?;

    let archive_name = archive_name
        .unwrap_or_else(|| archive_filename(&config.archive_stem, Local::now().date_naive()));
    let delivery = deliver(documents, &archive_name)?;
    let path = delivery.write_to(out_dir)?;

    println!("{}", path.display());
    Ok(())
}

fn run_preview(config: &AppConfig, data: &Path, out_dir: PathBuf) -> Result<()> {
    if !std::io::stdout().is_terminal() {
        bail!("the previewer needs a terminal; use `sheetdoc render` when piping");
    }

    let codec = DocxCodec::new(config.syntax());
    let mapper = load_mapper(config, &codec)?;
    let parsed = load_data(data, config)?;

    let app_state = AppState::new(&mapper, &codec, parsed.rows, data.to_path_buf())
        .with_output(out_dir, config.archive_stem.clone())
        .with_policy(config.yield_policy()?);
    ui::run_app(app_state)
}

fn run_init(config: &AppConfig, dir: &Path, force: bool) -> Result<()> {
    let mapping = config.field_mapping()?;
    let preview = dir.join("preview.html");
    let document = dir.join("template.docx");

    if !force {
        for path in [&preview, &document] {
            if path.exists() {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
        }
    }

    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    fs::write(&preview, starter_markup(&mapping))
        .with_context(|| format!("failed to write {}", preview.display()))?;
    fs::write(&document, starter_template(&mapping)?)
        .with_context(|| format!("failed to write {}", document.display()))?;

    println!("{}", preview.display());
    println!("{}", document.display());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.global)?;

    match cli.command {
        Commands::Inspect { data, json, output } => {
            run_inspect(&config, &data, json, output.as_deref())
        }
        Commands::Render { data, row, output } => {
            run_render(&config, &data, row, output.as_deref())
        }
        Commands::Generate {
            data,
            out_dir,
            archive_name,
        } => run_generate(&config, &data, &out_dir, archive_name),
        Commands::Preview { data, out_dir } => run_preview(&config, &data, out_dir),
        Commands::Init { dir, force } => run_init(&config, &dir, force),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The previewer owns the screen; log lines would corrupt it.
    if !matches!(cli.command, Commands::Preview { .. }) {
        init_tracing(cli.global.verbose);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            let input_error = error
                .downcast_ref::<sheetdoc::Error>()
                .is_some_and(sheetdoc::Error::is_input_error);
            if input_error {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}
