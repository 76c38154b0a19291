use annai::prelude::*;
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Loads a workflow document, validates it, and either prints its outline or
/// walks it interactively from stdin.
#[derive(Parser, Debug)]
#[command(name = "annai-cli", version, about)]
struct Cli {
    /// Path to the workflow JSON document.
    workflow: PathBuf,

    /// Directory holding the delimited reference datasets named by the
    /// document's data sources.
    #[arg(long)]
    resources: Option<PathBuf>,

    /// Print the page/step outline and exit instead of walking.
    #[arg(long)]
    outline: bool,
}

/// Serves data source resources from a local directory.
struct DirectoryFetcher {
    root: PathBuf,
}

impl ResourceFetcher for DirectoryFetcher {
    fn fetch(&self, resource: &str) -> std::result::Result<String, DataSourceError> {
        let path = self.root.join(resource.trim_start_matches('/'));
        fs::read_to_string(&path).map_err(|e| DataSourceError::FetchError {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let json = fs::read_to_string(&cli.workflow)?;
    let load_start = Instant::now();
    let document = Arc::new(load_document(&json)?);
    println!(
        "Loaded {} pages in {:.2?}",
        document.pages.len(),
        load_start.elapsed()
    );

    if cli.outline {
        print_outline(&document);
        return Ok(());
    }

    let resolver = cli.resources.map(|root| {
        OptionResolver::new(DirectoryFetcher { root }).with_case_insensitive_filter(true)
    });

    walk(document, resolver.as_ref())
}

fn print_outline(document: &WorkflowDocument) {
    for page in &document.pages {
        println!("page {} ({})", page.id, page.name);
        for step in &page.steps {
            let next = step.next().unwrap_or("-");
            println!("  [{:<14}] {:<28} next: {}", step.type_name(), step.id(), next);
        }
    }
}

fn walk(
    document: Arc<WorkflowDocument>,
    resolver: Option<&OptionResolver<DirectoryFetcher>>,
) -> Result<()> {
    let mut navigator = Navigator::builder(document).build()?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !navigator.is_complete() {
        let pass = navigator.render_pass()?;
        let step_id = pass.step.id().to_string();

        println!();
        println!("=== {} ({})", pass.step.label(), pass.step.type_name());

        let mut data = AHashMap::new();
        match pass.step {
            Step::Decision { options, .. } => {
                for option in options {
                    println!("  - {} ({})", option.label, option.value);
                }
                print!("decision> ");
                io::stdout().flush()?;
                let Some(line) = lines.next() else { break };
                data.insert("decision".to_string(), Value::Text(line?.trim().to_string()));
            }
            Step::Form { .. } => {
                for field in &pass.visible_fields {
                    if let Some(source) = &field.data_source
                        && let Some(resolver) = resolver
                    {
                        let filter = navigator
                            .filter_value(source)
                            .map(|value| value.to_string());
                        let (options, _) = resolver.resolve_or_empty(source, filter.as_deref());
                        println!("  {} [{} options]", field.name, options.len());
                    } else {
                        println!("  {}", field.name);
                    }
                }
                print!("[enter to submit]> ");
                io::stdout().flush()?;
                if lines.next().is_none() {
                    break;
                }
            }
            _ => {}
        }

        let transition = navigator.submit(&step_id, data)?;
        println!("-> {:?}", transition);
    }

    if navigator.is_complete() {
        println!("\nWorkflow completed successfully.");
    }
    Ok(())
}
