//! Wizflow CLI - drive k8s workflow wizards from the command line

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;

use wizflow::k8s::{self, workflows::RESOLVER_INPUT};
use wizflow::transport::create_transport;
use wizflow::{
    Edit, FixSuggestion, HydratorRegistry, LayoutDefinition, MockResolver, MockTransport,
    ResolverQuery, SubmitOutcome, Transport, WizardError, WizflowConfig,
};

#[derive(Parser)]
#[command(name = "wizflow")]
#[command(about = "Wizflow - guided k8s workflows on a reactive data layout")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available workflows and hydrators
    List,

    /// Validate a layout definition file
    Validate {
        /// Path to the layout .yaml file
        file: PathBuf,
    },

    /// Run a workflow end to end from a scenario file
    Run {
        /// Path to the scenario .yaml file
        file: PathBuf,

        /// Transport for the update call (mock, http)
        #[arg(short, long, default_value = "mock")]
        transport: String,

        /// Override transport.base_url
        #[arg(long)]
        base_url: Option<String>,

        /// Print the event log as JSON
        #[arg(long)]
        events: bool,
    },
}

/// Scenario file: which workflow, what the resolver finds, what gets edited
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Scenario {
    workflow: String,
    #[serde(default)]
    resolver_type: Option<String>,
    #[serde(default)]
    query: Value,
    /// Query input the resolver reports back
    #[serde(default)]
    input: Option<Value>,
    /// Resources the resolver returns
    results: Vec<Value>,
    #[serde(default)]
    edits: Vec<ScenarioEdit>,
    /// Mock transport response (defaults to echoing the request)
    #[serde(default)]
    response: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioEdit {
    path: String,
    value: Value,
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List => {
            list();
            Ok(())
        }
        Commands::Validate { file } => validate(&file),
        Commands::Run {
            file,
            transport,
            base_url,
            events,
        } => run(&file, &transport, base_url, events).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.downcast_ref::<WizardError>().and_then(|w| w.fix_suggestion()) {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn list() {
    println!("{}", "Workflows:".cyan().bold());
    for info in &k8s::CATALOGUE {
        println!(
            "  {:<16} {:<18} {}",
            info.key.bold(),
            format!("k8s/{}", info.path),
            info.description
        );
    }

    println!("{}", "Hydrators:".cyan().bold());
    for name in HydratorRegistry::with_k8s().names() {
        println!("  {}", name);
    }
}

fn validate(file: &Path) -> anyhow::Result<()> {
    let definition = LayoutDefinition::load(file)?;
    let summary = definition.validate(&HydratorRegistry::with_k8s())?;

    println!("{} Layout '{}' is valid", "✓".green(), file.display());
    println!("  Root nodes: {}", summary.roots);
    println!("  Derived nodes: {}", summary.derived);
    println!("  Steps: {}", summary.steps);
    Ok(())
}

async fn run(
    file: &Path,
    transport_name: &str,
    base_url: Option<String>,
    print_events: bool,
) -> anyhow::Result<()> {
    let yaml = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading scenario '{}'", file.display()))?;
    let scenario: Scenario = serde_yaml::from_str(&yaml).map_err(WizardError::from)?;

    let mut config = WizflowConfig::load()?.with_env();
    if base_url.is_some() {
        config.transport.base_url = base_url;
    }

    let definition = k8s::definition(&scenario.workflow)?;
    let info = definition.info;
    let resource_node = definition.resource_node;
    let action_node = definition.action_node;

    let transport: Arc<dyn Transport> = match (transport_name, &scenario.response) {
        ("mock", Some(response)) => {
            let mock = MockTransport::new();
            mock.respond(response.clone());
            Arc::new(mock)
        }
        _ => create_transport(transport_name, &config)?,
    };

    println!(
        "{} Workflow: {} | transport: {}",
        "→".cyan(),
        info.display_name.cyan().bold(),
        transport.name().cyan()
    );

    let wizard = definition.into_wizard(transport)?;

    let resolver = MockResolver::new();
    resolver.respond(scenario.results, resolver_input(scenario.input, &config));
    let query = ResolverQuery::new(
        scenario
            .resolver_type
            .unwrap_or_else(|| info.default_resolver_type.to_string()),
        scenario.query,
    )
    .with_limit(config.resolver.search_limit);

    let mut outcome = wizard
        .resolve_and_submit(&resolver, &query, resource_node, RESOLVER_INPUT)
        .await?;

    for edit in scenario.edits {
        wizard.stage(Edit::update(resource_node, edit.path, edit.value))?;
    }

    // one submit per remaining step at most
    let mut submits = 0;
    loop {
        match &outcome {
            SubmitOutcome::Done => break,
            SubmitOutcome::Blocked { node, error } => {
                return Err(anyhow::Error::new(WizardError::Hydration {
                    node: node.to_string(),
                    source: error.clone(),
                })
                .context(format!(
                    "step '{}' blocked",
                    wizard.step_view().map(|s| s.name).unwrap_or_default()
                )));
            }
            SubmitOutcome::Advanced { to, .. } => {
                println!("  {} {}", "✓".green(), wizard.step_names()[*to]);
            }
            SubmitOutcome::Busy { .. } | SubmitOutcome::Superseded => {}
        }

        submits += 1;
        if submits > wizard.len() {
            bail!("workflow did not complete (last outcome: {outcome:?})");
        }
        outcome = wizard.on_submit().await?;
    }

    println!("{} Done", "✓".green().bold());
    let result = wizard.graph().value(action_node)?.unwrap_or(Value::Null);
    println!("{}", serde_json::to_string_pretty(&result)?);

    if print_events {
        println!(
            "{}",
            serde_json::to_string_pretty(&wizard.graph().event_log().to_json())?
        );
    }

    Ok(())
}

/// Resolver input with the configured default clientset filled in
fn resolver_input(input: Option<Value>, config: &WizflowConfig) -> Value {
    let mut input = input.unwrap_or_else(|| Value::Object(Default::default()));
    if let (Value::Object(map), Some(clientset)) = (&mut input, &config.defaults.clientset) {
        map.entry("clientset")
            .or_insert_with(|| Value::String(clientset.clone()));
    }
    input
}
