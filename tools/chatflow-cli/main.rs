use chatflow::prelude::*;
use clap::Parser;
use std::fs;
use std::time::Instant;

/// A CLI for validating chat automation flow documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Paths to flow document JSON files. Loaded together, they form the
    /// catalog sub-flow references resolve against.
    #[arg(required = true)]
    flow_paths: Vec<String>,

    /// Optional path to an attribute-definitions JSON file
    #[arg(short, long)]
    attributes: Option<String>,

    /// Emit the validation reports as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. Attribute registry ---
    let registry = match &cli.attributes {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read attributes file '{}': {}", path, e))
            });
            let definitions: Vec<AttributeDefinition> = serde_json::from_str(&json)
                .unwrap_or_else(|e| {
                    exit_with_error(&format!("Failed to parse attributes JSON: {}", e))
                });
            AttributeRegistry::new(definitions)
        }
        None => AttributeRegistry::default(),
    };

    // --- 2. Load all documents ---
    let load_start = Instant::now();
    let mut flows = Vec::new();
    let mut load_reports = Vec::new();
    for path in &cli.flow_paths {
        let json = fs::read_to_string(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read flow file '{}': {}", path, e))
        });
        let doc = FlowDocument::from_json(&json).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to parse flow JSON '{}': {}", path, e))
        });
        let (flow, report) = FlowDefinition::from_document(doc);
        flows.push(flow);
        load_reports.push(report);
    }
    let catalog: ahash::AHashMap<String, FlowDefinition> = flows
        .iter()
        .map(|f| (f.id.clone(), f.clone()))
        .collect();
    let load_duration = load_start.elapsed();

    // --- 3. Validate each flow against the set ---
    let validate_start = Instant::now();
    let mut results = Vec::new();
    for (flow, load_report) in flows.iter().zip(load_reports) {
        let mut report = load_report;
        report.merge(flow.validate(&registry, &catalog));
        results.push((flow, report));
    }
    let validate_duration = validate_start.elapsed();

    // --- 4. Report ---
    let mut failed = 0usize;
    if cli.json {
        let payload: Vec<_> = results
            .iter()
            .map(|(flow, report)| {
                serde_json::json!({
                    "flowId": flow.id,
                    "name": flow.name,
                    "publishable": report.publishable(),
                    "report": report,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("reports always serialize")
        );
        failed = results.iter().filter(|(_, r)| !r.publishable()).count();
    } else {
        for (flow, report) in &results {
            println!("Flow '{}' ({})", flow.name, flow.id);
            if report.is_empty() {
                println!("  no issues");
            }
            for (node, issue) in report.iter() {
                let severity = match issue.severity() {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                };
                match node {
                    Some(id) => println!("  [{}] {}: {}", severity, id, issue),
                    None => println!("  [{}] {}", severity, issue),
                }
            }
            if report.publishable() {
                println!("  -> publishable");
            } else {
                println!("  -> blocked ({} error(s))", report.error_count());
                failed += 1;
            }
            println!();
        }

        println!("--- Summary ---");
        println!("Flows checked:     {}", results.len());
        println!("Attribute defs:    {}", registry.len());
        println!("Loading:           {:?}", load_duration);
        println!("Validation:        {:?}", validate_duration);
        println!("Total:             {:?}", total_start.elapsed());
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
