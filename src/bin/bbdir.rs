use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use biobank_directory::app::{App, DirectoryCommand, Outcome};
use biobank_directory::config::ConfigLoader;
use biobank_directory::directory::DirectoryHttpClient;
use biobank_directory::domain::{FacetAttribute, FacetFilter};
use biobank_directory::error::DirectoryError;
use biobank_directory::negotiator::{NegotiatorHttpClient, QuerySummarizer};
use biobank_directory::output::JsonOutput;
use biobank_directory::state::{DirectoryStore, FilterSelection};

#[derive(Parser)]
#[command(name = "bbdir")]
#[command(about = "Biobank directory query driver: facet retrieval and negotiator export")]
#[command(version, author)]
struct Cli {
    /// Directory base URL (overrides bbdir.json)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file path (defaults to ./bbdir.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Fetch the biobank catalog with expanded collections")]
    Biobanks,
    #[command(about = "Fetch biobanks matching one facet filter")]
    Filter(FilterArgs),
    #[command(about = "Fetch the country catalog")]
    Countries,
    #[command(about = "Fetch the material-type catalog")]
    Materials,
    #[command(about = "Fetch the quality-standard catalog")]
    Quality,
    #[command(about = "Search disease types by free text")]
    Diseases(DiseaseArgs),
    #[command(about = "Submit the current selection to the negotiator")]
    Export(ExportArgs),
}

#[derive(Args)]
struct FilterArgs {
    /// Facet to filter on: material_types|quality|countries|disease_types
    attribute: String,

    /// Selected option identifiers
    #[arg(required = true)]
    options: Vec<String>,
}

#[derive(Args)]
struct DiseaseArgs {
    #[arg(default_value = "")]
    query: String,
}

#[derive(Args)]
struct ExportArgs {
    /// Page URL the shareable export URL is derived from
    #[arg(long)]
    url: String,

    /// Session token (nToken) carried through the negotiation workflow
    #[arg(long)]
    token: Option<String>,

    #[arg(long = "material-type")]
    material_types: Vec<String>,

    #[arg(long = "quality")]
    quality: Vec<String>,

    #[arg(long = "country")]
    countries: Vec<String>,

    #[arg(long = "disease")]
    disease_types: Vec<String>,

    /// Exported collections as biobank:collection identifier pairs
    #[arg(long = "collection")]
    collections: Vec<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<DirectoryError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &DirectoryError) -> u8 {
    match error {
        DirectoryError::UnknownFacet(_) => 2,
        DirectoryError::ConfigRead(_) | DirectoryError::ConfigParse(_) => 2,
        DirectoryError::DirectoryHttp(_)
        | DirectoryError::DirectoryStatus { .. }
        | DirectoryError::NegotiatorHttp(_)
        | DirectoryError::NegotiatorStatus { .. } => 3,
        _ => 1,
    }
}

#[tokio::main]
async fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ConfigLoader::resolve(cli.config.as_deref()).into_diagnostic()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let directory = DirectoryHttpClient::new(&config.base_url).into_diagnostic()?;
    let negotiator =
        NegotiatorHttpClient::new(&config.base_url, &config.negotiator_endpoint).into_diagnostic()?;
    let store = DirectoryStore::new();

    match cli.command {
        Commands::Biobanks => {
            let app = App::new(directory, negotiator, CliSummarizer::default());
            app.dispatch(DirectoryCommand::FetchBiobanksAndCollections, &store)
                .await;
            JsonOutput::print_snapshot(&store.snapshot()).into_diagnostic()?;
        }
        Commands::Filter(args) => {
            let attribute: FacetAttribute = args.attribute.parse().into_diagnostic()?;
            let filter = FacetFilter {
                attribute,
                options: args.options,
            };
            let app = App::new(directory, negotiator, CliSummarizer::default());
            app.dispatch(DirectoryCommand::FetchBiobankIdentifiers { filter }, &store)
                .await;
            JsonOutput::print_snapshot(&store.snapshot()).into_diagnostic()?;
        }
        Commands::Countries => {
            let app = App::new(directory, negotiator, CliSummarizer::default());
            app.dispatch(DirectoryCommand::FetchCountries, &store).await;
            JsonOutput::print_items(&store.snapshot().countries).into_diagnostic()?;
        }
        Commands::Materials => {
            let app = App::new(directory, negotiator, CliSummarizer::default());
            app.dispatch(DirectoryCommand::FetchMaterialTypes, &store)
                .await;
            JsonOutput::print_items(&store.snapshot().material_types).into_diagnostic()?;
        }
        Commands::Quality => {
            let app = App::new(directory, negotiator, CliSummarizer::default());
            app.dispatch(DirectoryCommand::FetchQuality, &store).await;
            JsonOutput::print_items(&store.snapshot().quality).into_diagnostic()?;
        }
        Commands::Diseases(args) => {
            let app = App::new(directory, negotiator, CliSummarizer::default());
            app.dispatch(
                DirectoryCommand::QueryDiseaseTypes { query: args.query },
                &store,
            )
            .await;
            JsonOutput::print_items(&store.snapshot().disease_types).into_diagnostic()?;
        }
        Commands::Export(args) => {
            let collections = args
                .collections
                .iter()
                .map(|pair| parse_collection_pair(pair))
                .collect::<Result<Vec<_>, _>>()?;
            let selection = FilterSelection {
                material_types: args.material_types,
                quality: args.quality,
                countries: args.countries,
                disease_types: args.disease_types,
                n_token: args.token,
                current_url: args.url,
            };
            let app = App::new(directory, negotiator, CliSummarizer { collections });
            let outcome = app
                .dispatch(DirectoryCommand::SendToNegotiator { selection }, &store)
                .await;
            if let Outcome::Redirect(redirect) = outcome {
                JsonOutput::print_redirect(&redirect).into_diagnostic()?;
            }
        }
    }

    Ok(())
}

fn parse_collection_pair(pair: &str) -> miette::Result<Value> {
    let (biobank, collection) = pair.split_once(':').ok_or_else(|| {
        miette::Report::msg(format!(
            "expected --collection as biobank:collection, got {pair}"
        ))
    })?;
    Ok(json!({
        "biobankId": biobank,
        "collectionId": collection,
    }))
}

/// Collaborator implementation for the CLI: the exported collections come
/// from explicit `--collection` pairs, the summary renders the non-empty
/// facets of the selection.
#[derive(Default)]
struct CliSummarizer {
    collections: Vec<Value>,
}

impl QuerySummarizer for CliSummarizer {
    fn filtered_collections(&self, _selection: &FilterSelection) -> Vec<Value> {
        self.collections.clone()
    }

    fn human_readable(&self, selection: &FilterSelection) -> String {
        let mut parts = Vec::new();
        if !selection.material_types.is_empty() {
            parts.push(format!(
                "material types: {}",
                selection.material_types.join(", ")
            ));
        }
        if !selection.quality.is_empty() {
            parts.push(format!(
                "quality standards: {}",
                selection.quality.join(", ")
            ));
        }
        if !selection.countries.is_empty() {
            parts.push(format!("countries: {}", selection.countries.join(", ")));
        }
        if !selection.disease_types.is_empty() {
            parts.push(format!(
                "disease types: {}",
                selection.disease_types.join(", ")
            ));
        }
        parts.join(" and ")
    }
}
