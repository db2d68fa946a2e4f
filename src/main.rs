use clap::Parser;
use rfq::filter::{Evaluator, Filter, FilterKind};
use rfq::{load, vault};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const ENV_LOG: &str = "RFQ_LOG";

#[derive(Parser)]
#[command(name = "rfq", about = "Filter YAML/JSON records or vault frontmatter with a filter list")]
struct Cli {
    #[arg(long, env = "RFQ_FILTERS", help = "YAML/JSON file with the list of filters")]
    filters: Option<PathBuf>,

    #[arg(long, env = "RFQ_RECORDS", conflicts_with = "vault", help = "YAML/JSON file with the records")]
    records: Option<PathBuf>,

    #[arg(long, env = "RFQ_VAULT", help = "Use the frontmatter of every Markdown file as a record")]
    vault: Option<PathBuf>,

    #[arg(long, requires = "vault", help = "Read file paths from stdin")]
    stdin: bool,

    #[arg(long, help = "Reject records missing a filtered field")]
    strict_missing: bool,

    #[arg(long, help = "Maximum nesting of child filters")]
    max_depth: Option<usize>,

    #[arg(long, help = "Print the number of matches only")]
    count: bool,

    #[arg(long, help = "List the recognised filter types")]
    list_types: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    if cli.list_types {
        for kind in FilterKind::AVAILABLE {
            println!("{}", kind);
        }
        return ExitCode::from(0);
    }

    let Some(filters_path) = cli.filters.as_deref() else {
        eprintln!("Error: No filters specified. Use --filters or set RFQ_FILTERS");
        return ExitCode::from(2);
    };

    let filters = match load::read_filters(filters_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let mut evaluator = Evaluator::new().skip_undefined(!cli.strict_missing);
    if let Some(depth) = cli.max_depth {
        evaluator = evaluator.max_depth(depth);
    }

    if let Some(vault_path) = cli.vault.as_deref() {
        return run_vault_mode(&evaluator, &filters, vault_path, cli.stdin, cli.count);
    }

    let Some(records_path) = cli.records.as_deref() else {
        eprintln!("Error: No records specified. Use --records or --vault");
        return ExitCode::from(2);
    };

    run_records_mode(&evaluator, &filters, records_path, cli.count)
}

fn init_logging() {
    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .with_env_filter(filter)
        .init();
}

fn run_records_mode(
    evaluator: &Evaluator,
    filters: &[Filter],
    records_path: &Path,
    show_count: bool,
) -> ExitCode {
    let records = match load::read_records(records_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let matched = evaluator.apply(filters, &records);

    if show_count {
        println!("{}", matched.len());
    } else {
        match serde_yaml::to_string(&matched) {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        }
    }

    exit_for(!matched.is_empty())
}

fn run_vault_mode(
    evaluator: &Evaluator,
    filters: &[Filter],
    vault_path: &Path,
    from_stdin: bool,
    show_count: bool,
) -> ExitCode {
    let files = if from_stdin {
        vault::read_paths_from_stdin()
    } else {
        vault::collect_markdown_files(vault_path)
    };

    let records = match vault::load_records(files) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let matched: Vec<&PathBuf> = records
        .iter()
        .filter(|(_, record)| evaluator.matches(filters, record))
        .map(|(path, _)| path)
        .collect();

    if show_count {
        println!("{}", matched.len());
    } else {
        for &path in &matched {
            let display_path = path.strip_prefix(vault_path).unwrap_or(path).display();
            println!("{}", display_path);
        }
    }

    exit_for(!matched.is_empty())
}

fn exit_for(found: bool) -> ExitCode {
    if found {
        ExitCode::from(0)
    } else {
        ExitCode::from(1)
    }
}
