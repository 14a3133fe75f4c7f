use clap::Parser;
use keisan::prelude::*;
use keisan::workspace::DEFAULT_MAX_DEPTH;
use std::fs;
use std::time::Instant;

/// Loads a workspace definition and evaluates its operations
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workspace definition JSON file
    definition_path: String,

    /// Operation paths to evaluate. Every operation is evaluated when omitted
    operations: Vec<String>,

    /// Print the operation tree of each evaluated operation
    #[arg(short, long)]
    tree: bool,

    /// Print validation problems instead of failing on them
    #[arg(short, long)]
    problems: bool,

    /// Write a bincode snapshot of the store to this file after evaluation
    #[arg(short, long)]
    snapshot: Option<String>,

    /// Register a kind alias, e.g. `--alias sum=add`
    #[arg(short, long = "alias", value_parser = parse_alias)]
    aliases: Vec<(String, String)>,

    /// Maximum nested operation evaluation depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn parse_alias(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(alias, kind)| (alias.trim().to_string(), kind.trim().to_string()))
        .filter(|(alias, kind)| !alias.is_empty() && !kind.is_empty())
        .ok_or_else(|| format!("expected ALIAS=KIND, got '{}'", raw))
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"));
    let cli = Cli::parse();

    // --- 1. Loading ---
    let load_start = Instant::now();
    let json = fs::read_to_string(&cli.definition_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read definition file '{}': {}",
            &cli.definition_path, e
        ))
    });

    let mut builder = Workspace::builder(MemoryStore::new()).with_max_depth(cli.max_depth);
    for (alias, kind) in &cli.aliases {
        builder = builder.with_alias(alias, kind);
    }
    let mut workspace = builder.build();
    workspace
        .apply_definition(json.as_str())
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load definition: {}", e)));
    let load_duration = load_start.elapsed();

    // --- 2. Selection ---
    let handles: Vec<OperationHandle> = if cli.operations.is_empty() {
        workspace
            .transformations()
            .iter()
            .flat_map(|t| t.operations().iter().cloned())
            .collect()
    } else {
        cli.operations
            .iter()
            .map(|path| OperationHandle::new(path.as_str()))
            .collect()
    };

    // --- 3. Evaluation ---
    let eval_start = Instant::now();
    let mut failures = 0;
    for handle in &handles {
        if workspace.operation(handle).is_none() {
            exit_with_error(&format!("Operation '{}' does not exist", handle));
        }
        if cli.tree {
            print!("{}", workspace.tree(handle));
        }
        if cli.problems {
            let problems = workspace
                .validate(handle)
                .unwrap_or_else(|e| exit_with_error(&e.to_string()));
            for problem in &problems {
                println!("{}", problem);
            }
            if problems.is_error() {
                failures += 1;
                continue;
            }
        }
        match workspace.get(handle) {
            Ok(result) => println!("{} = {}", handle, result),
            Err(e) if cli.problems => {
                failures += 1;
                println!("{}: {}", handle, e);
            }
            Err(e) => exit_with_error(&format!("Evaluation of '{}' failed: {}", handle, e)),
        }
    }
    let eval_duration = eval_start.elapsed();

    // --- 4. Snapshot ---
    if let Some(snapshot_path) = &cli.snapshot {
        workspace
            .store()
            .save(snapshot_path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write snapshot: {}", e)));
        println!("Wrote store snapshot to '{}'", snapshot_path);
    }

    println!("\n--- Summary ---");
    println!("Operations evaluated: {}", handles.len());
    println!("Failed:               {}", failures);
    println!("Loading:              {:?}", load_duration);
    println!("Evaluation:           {:?}", eval_duration);

    if failures > 0 {
        std::process::exit(2);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
