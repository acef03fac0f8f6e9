use clap::Parser;
use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use quickfind::{path_formatter, DirectorySource, FuzzySearcher, Options};

/// Lists files for a fuzzy finder, skipping whatever .gitignore files exclude.
#[derive(Debug, Parser)]
#[command(name = "quickfind", version)]
struct Cli {
    /// Directory to start from
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Also list directories
    #[arg(long, env = "QUICKFIND_DIRS")]
    dirs: bool,

    /// Do not list files
    #[arg(long, env = "QUICKFIND_NO_FILES")]
    no_files: bool,

    /// Do not read ignore files
    #[arg(long, env = "QUICKFIND_NO_IGNORE")]
    no_ignore: bool,

    /// Match the query against the whole path, not just the name
    #[arg(long, env = "QUICKFIND_FULL_PATH")]
    full_path: bool,

    /// Name of the per-directory ignore file
    #[arg(long, value_name = "NAME", default_value = ".gitignore", env = "QUICKFIND_IGNORE_FILE")]
    ignore_file: String,

    /// Print the best matches for this query instead of every entry
    #[arg(short, long)]
    query: Option<String>,

    /// Number of matches to print
    #[arg(short = 'n', long, default_value_t = 20)]
    limit: usize,

    /// Column budget for each printed match
    #[arg(long, default_value_t = 120)]
    width: u16,

    /// Print the candidate list as JSON
    #[arg(long, conflicts_with = "query")]
    json: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            start_dir: self.dir.clone(),
            collect_dirs: self.dirs,
            collect_files: !self.no_files,
            use_ignore_rules: !self.no_ignore,
            include_path: self.full_path,
            ignore_file_name: self.ignore_file.clone(),
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut source = DirectorySource::new(cli.options());
    let candidates = source.fetch()?;

    let mut out = BufWriter::new(io::stdout().lock());
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &candidates)?;
        writeln!(out)?;
    } else if let Some(query) = &cli.query {
        let searcher = FuzzySearcher::new(source.ranker());
        let rows = u16::try_from(cli.limit).unwrap_or(u16::MAX);
        for m in searcher.search(&candidates, query, cli.limit) {
            writeln!(out, "{}", path_formatter(m.candidate, query, (cli.width, rows)))?;
        }
    } else {
        for candidate in &candidates {
            writeln!(out, "{}", candidate.path().display())?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
