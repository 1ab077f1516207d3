//! CLI command implementations.

use crate::config::GroveConfig;
use colored::Colorize;
use grove_graph::{GraphStore, LegacyRequest};
use grove_indexer::{index_directory, IndexReport};
use grove_server::{GroveServer, ServerConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const STATS_QUERY: &str = "MATCH (c:Class) OPTIONAL MATCH (c)-[:HAS_METHOD]->(m:Method) \
                           RETURN count(DISTINCT c) as classes, count(m) as methods";

/// Initialize Grove in a directory.
pub fn init(path: &Path) -> Result<()> {
    let config_path = GroveConfig::path_for(path);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    GroveConfig::default().write(path)?;

    println!("{} Initialized Grove in {}", "✓".green(), path.display());
    println!("  Run {} to index your codebase", "grove index".cyan());

    Ok(())
}

/// Indexes `path` into a fresh store behind a spinner.
fn load(path: &Path, config: &GroveConfig) -> Result<(GraphStore, IndexReport)> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Indexing Java sources...");

    let store = GraphStore::new();
    let report = index_directory(path, &config.index_options(), &store);

    spinner.finish_and_clear();
    Ok((store, report?))
}

/// Index a directory and build the code graph.
pub fn index(path: &Path, output: Option<&Path>) -> Result<()> {
    let config = GroveConfig::load(path)?;
    println!("{}", "Indexing codebase...".cyan());

    let (store, report) = load(path, &config)?;

    println!(
        "{} Indexed {} files ({} types, {} methods, {} dependencies) in {}ms",
        "✓".green(),
        report.files_indexed.to_string().cyan(),
        report.ingest.types_stored.to_string().cyan(),
        report.ingest.members_stored.to_string().cyan(),
        report.ingest.dependencies_created.to_string().cyan(),
        report.duration_ms
    );

    let skipped = report.ingest.skipped;
    if skipped.total() > 0 {
        println!(
            "{} Skipped {} records ({} invalid, {} without owner, {} unresolved)",
            "⚠".yellow(),
            skipped.total(),
            skipped.validation,
            skipped.missing_owner,
            skipped.missing_endpoint
        );
    }

    // Show any errors
    if !report.errors.is_empty() {
        println!("\n{} files with parse errors:", "⚠".yellow());
        for (file, error) in report.errors.iter().take(5) {
            println!("  {} - {}", file.red(), error);
        }
        if report.errors.len() > 5 {
            println!("  ... and {} more", report.errors.len() - 5);
        }
    }

    // Export if requested
    if let Some(out_path) = output {
        let export = store.export();
        fs::write(out_path, serde_json::to_string_pretty(&export)?)?;
        println!("{} Exported to {}", "✓".green(), out_path.display());
    }

    store.close();
    Ok(())
}

/// List types related to `name`.
pub fn related(name: &str, depth: Option<usize>, path: &Path, json: bool) -> Result<()> {
    let config = GroveConfig::load(path)?;
    let (store, _) = load(path, &config)?;
    let depth = depth.unwrap_or(config.max_depth);

    let related = store.find_related(name, depth);

    if json {
        println!("{}", serde_json::to_string_pretty(&related)?);
        return Ok(());
    }

    if related.is_empty() {
        println!("No types related to \"{}\" within {} hops", name, depth);
        return Ok(());
    }

    println!("Found {} related types:\n", related.len());
    for r in &related {
        println!(
            "  {} {} {}",
            format!("[{}]", r.distance).yellow(),
            r.name.cyan(),
            display_namespace(&r.namespace).dimmed()
        );
    }

    Ok(())
}

/// List the methods of a type.
pub fn members(owner: &str, namespace: &str, path: &Path, json: bool) -> Result<()> {
    let config = GroveConfig::load(path)?;
    let (store, _) = load(path, &config)?;

    let members = store.list_members(owner, namespace);

    if json {
        println!("{}", serde_json::to_string_pretty(&members)?);
        return Ok(());
    }

    if members.is_empty() {
        println!("No methods found for {}", qualified(owner, namespace));
        return Ok(());
    }

    println!("{} methods of {}:\n", members.len(), qualified(owner, namespace).cyan());
    for m in &members {
        let params: Vec<String> = m
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect();
        println!(
            "  {} {}({}) {}",
            m.return_type.yellow(),
            m.name,
            params.join(", "),
            format!("line {}", m.line).dimmed()
        );
    }

    Ok(())
}

/// Print related types and methods for one type.
pub fn context(
    name: &str,
    namespace: &str,
    depth: Option<usize>,
    path: &Path,
    json: bool,
) -> Result<()> {
    let config = GroveConfig::load(path)?;
    let (store, _) = load(path, &config)?;
    let depth = depth.unwrap_or(config.max_depth);

    let context = store.context(name, namespace, depth);

    if json {
        println!("{}", serde_json::to_string_pretty(&context)?);
        return Ok(());
    }

    println!("{}", qualified(name, namespace).cyan().bold());
    if let Some(record) = store.find_type(name, namespace) {
        println!(
            "  {} {}",
            record.kind.to_string().yellow(),
            format!("({}:{})", record.file_path, record.line).dimmed()
        );
        if let Some(doc) = &record.documentation {
            println!("  {}", doc.dimmed());
        }
    }

    println!("\n{}", "Methods".bold());
    if context.members.is_empty() {
        println!("  (none)");
    }
    for m in &context.members {
        println!("  {} {}", m.return_type.yellow(), m.name);
    }

    println!("\n{}", "Related types".bold());
    if context.related.is_empty() {
        println!("  (none)");
    }
    for r in &context.related {
        println!(
            "  {} {} {}",
            format!("[{}]", r.distance).yellow(),
            r.name.cyan(),
            display_namespace(&r.namespace).dimmed()
        );
    }

    Ok(())
}

/// Show index statistics.
pub fn status(path: &Path) -> Result<()> {
    if !GroveConfig::path_for(path).exists() {
        println!("{} Grove not initialized in this directory", "✗".red());
        println!("  Run {} to initialize", "grove init".cyan());
        return Ok(());
    }

    let config = GroveConfig::load(path)?;
    let (store, report) = load(path, &config)?;

    // Served through the legacy statistics request.
    let counts = store
        .execute_legacy(&LegacyRequest::parse(STATS_QUERY))
        .into_iter()
        .next()
        .unwrap_or(grove_graph::GraphCounts {
            classes: 0,
            methods: 0,
        });

    println!("{}", "Grove Status".cyan().bold());
    println!();
    println!("  {} {}", "Files:".dimmed(), report.files_indexed);
    println!("  {} {}", "Types:".dimmed(), counts.classes);
    println!("  {} {}", "Methods:".dimmed(), counts.methods);
    println!("  {} {}", "Edges:".dimmed(), store.stats().edge_count);
    println!("  {} Java", "Languages:".dimmed());

    Ok(())
}

/// Run a legacy pattern query and print the rows.
pub fn query(text: &str, path: &Path) -> Result<()> {
    let config = GroveConfig::load(path)?;
    let (store, _) = load(path, &config)?;

    let request = LegacyRequest::parse(text);
    let rows = store.execute_legacy(&request);

    if let LegacyRequest::Unrecognized(_) = request {
        println!(
            "{} Unsupported query; only index creation and the statistics query are recognized",
            "⚠".yellow()
        );
    }

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

/// Start the Grove server.
pub async fn serve(port: Option<u16>, headless: bool, path: &Path) -> Result<()> {
    let config = GroveConfig::load(path)?;
    let host = if headless {
        "0.0.0.0".to_string()
    } else {
        config.server.host.clone()
    };
    let port = port.unwrap_or(config.server.port);

    if headless {
        println!("{}", "Starting Grove server in headless mode...".cyan());
    } else {
        println!("{}", "Starting Grove server...".cyan());
    }

    // Index the codebase first
    let (store, report) = load(path, &config)?;

    println!(
        "{} Indexed {} files ({} types)",
        "✓".green(),
        report.files_indexed,
        report.ingest.types_stored
    );

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let server_config = ServerConfig {
        addr,
        default_depth: config.max_depth,
        index: config.index_options(),
    };
    let server = GroveServer::new(store, server_config);

    println!("{} Listening on ws://{}", "✓".green(), addr);
    if headless {
        println!("  Headless mode: accepting connections from any host");
    }
    println!("  Press {} to stop", "Ctrl+C".cyan());

    server.run().await?;

    Ok(())
}

fn qualified(name: &str, namespace: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

fn display_namespace(namespace: &str) -> String {
    if namespace.is_empty() {
        "(default package)".to_string()
    } else {
        format!("({})", namespace)
    }
}
