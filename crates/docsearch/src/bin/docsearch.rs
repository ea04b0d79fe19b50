use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};

use docsearch::document::{DirectorySource, ExclusionFilter, FileTextExtractor};
use docsearch::query::{QueryInput, QuerySet};
use docsearch::search::{
    worker_pool, ProgressSink, SearchOrchestrator, SilentProgress, StdoutProgress,
};
use docsearch::{Result, SearchConfig};

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Search documents with boolean queries")]
#[command(version)]
#[command(group(ArgGroup::new("queries").required(true).args(["search", "file"])))]
struct Cli {
    /// Folder containing the documents to search
    folder: PathBuf,

    /// Search expression, e.g. '"neural codec" AND (FPGA OR ASIC)'
    #[arg(short, long)]
    search: Option<String>,

    /// File with one query per line, or a JSON object with a `queries` list
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Number of documents processed at once (defaults to the CPU count)
    #[arg(short, long)]
    processes: Option<usize>,

    /// Skip documents whose file name matches this regex
    #[arg(short, long)]
    exclude: Option<String>,

    /// Extension of the files to search
    #[arg(long)]
    extension: Option<String>,

    /// Descend into sub-folders
    #[arg(long)]
    recursive: bool,

    /// JSON file with default settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Suppress progress lines
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Settings from the config file, overridden by command line flags.
    fn settings(&self) -> Result<SearchConfig> {
        let mut config = match self.config.as_deref() {
            Some(path) => SearchConfig::load(path)?,
            None => SearchConfig::default(),
        };
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }
        if self.recursive {
            config.recursive = true;
        }
        if self.processes.is_some() {
            config.workers = self.processes;
        }
        if self.exclude.is_some() {
            config.exclude = self.exclude.clone();
        }
        if self.quiet {
            config.progress = false;
        }
        Ok(config)
    }

    fn query_input(&self) -> Result<QueryInput> {
        match (&self.search, &self.file) {
            (_, Some(path)) => QueryInput::from_path(path),
            (Some(expression), None) => Ok(QueryInput::Expression(expression.clone())),
            (None, None) => Ok(QueryInput::Expression(String::new())),
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.settings()?;
    let queries = QuerySet::from_input(&cli.query_input()?)?;
    for rejected in queries.rejected() {
        eprintln!("Skipping query '{}': {}", rejected.query, rejected.reason);
    }

    let exclusion = config
        .exclude
        .as_deref()
        .map(ExclusionFilter::new)
        .transpose()?;
    let source =
        DirectorySource::new(cli.folder.clone(), &config.extension).recursive(config.recursive);
    let pool = worker_pool(config.worker_count())?;
    let progress: &dyn ProgressSink = if config.progress && !cli.json {
        &StdoutProgress
    } else {
        &SilentProgress
    };

    let outcome = SearchOrchestrator::new(&queries, &FileTextExtractor, pool.as_ref())
        .with_exclusion(exclusion)
        .with_progress(progress)
        .run(&source)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&outcome).map_err(std::io::Error::from)?;
        println!("{json}");
        return Ok(());
    }

    if outcome.summary.processed == 0 {
        println!("No documents to process.");
        return Ok(());
    }

    println!();
    print!("{}", outcome.report);
    println!();
    println!("{}", outcome.summary);
    Ok(())
}
