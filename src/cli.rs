// src/cli.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use crate::core::export::{export_file_name, export_leads_csv};
use crate::core::{ConfigManager, Database, LeadService};
use crate::lead_search::{FilterSet, SearchOutcome};
use crate::web::{build_state, start_web_server};

#[derive(Parser)]
#[command(name = "leadfinder")]
#[command(about = "Search LinkedIn leads and manage lead lists")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Override the configured database file
    #[arg(long, global = true)]
    pub database_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Search the upstream service and print one page of results
    Search {
        #[command(flatten)]
        filters: SearchArgs,
        #[arg(long)]
        page: Option<String>,
        /// Print the raw outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show every list with its lead count
    Lists,
    /// Create an empty list
    ListCreate {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a list by name
    ListDelete { name: String },
    /// Export a list to CSV
    Export {
        name: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Create the database and its tables
    Init,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long)]
    pub seniority_level: Option<String>,
    #[arg(long)]
    pub company_size: Option<String>,
    #[arg(long)]
    pub keywords: Option<String>,
    #[arg(long)]
    pub limit: Option<String>,
}

impl From<SearchArgs> for FilterSet {
    fn from(args: SearchArgs) -> Self {
        FilterSet {
            name: args.name,
            title: args.title,
            company: args.company,
            location: args.location,
            country: args.country,
            region: args.region,
            industry: args.industry,
            seniority_level: args.seniority_level,
            company_size: args.company_size,
            keywords: args.keywords,
            limit: args.limit,
        }
    }
}

fn print_outcome(outcome: &SearchOutcome) {
    if !outcome.success {
        println!(
            "❌ Search failed: {}",
            outcome.error.as_deref().unwrap_or("unknown error")
        );
        return;
    }

    println!(
        "{} leads (page {} of {}){}",
        outcome.total_results,
        outcome.pagination.page,
        outcome.pagination.num_pages,
        if outcome.from_cache { " [cached]" } else { "" }
    );
    println!(
        "{:<12} {:<28} {:<32} {:<24} {:<12}",
        "ID", "Name", "Title", "Company", "Seniority"
    );
    println!("{}", "-".repeat(110));
    for lead in &outcome.leads {
        println!(
            "{:<12} {:<28} {:<32} {:<24} {:<12}",
            lead.external_id,
            lead.full_name,
            lead.current_title,
            lead.current_company,
            lead.seniority_label()
        );
    }
}

pub async fn run(cli: Cli, mut config: ConfigManager) -> Result<()> {
    if let Some(path) = cli.database_path {
        config.environment.database_path = path;
    }

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            start_web_server(&config).await
        }

        Command::Search {
            filters,
            page,
            json,
        } => {
            let state = build_state(&config).await?;
            let filters = FilterSet::from(filters);
            let outcome = state.search.search(&filters, page.as_deref()).await;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&outcome).context("Failed to encode outcome")?
                );
            } else {
                print_outcome(&outcome);
            }
            Ok(())
        }

        Command::Lists => {
            let db = open_database(&config).await?;
            let lists = LeadService::new(db.pool()).all_lists_with_leads().await?;
            if lists.is_empty() {
                println!("No lists found.");
            } else {
                println!("{:<5} {:<30} {:<30} {:<7} {:<20}", "ID", "Name", "Slug", "Leads", "Created");
                println!("{}", "-".repeat(95));
                for entry in lists {
                    println!(
                        "{:<5} {:<30} {:<30} {:<7} {:<20}",
                        entry.list.id,
                        entry.list.name,
                        entry.list.slug,
                        entry.lead_count,
                        entry.list.created_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
            Ok(())
        }

        Command::ListCreate { name, description } => {
            let db = open_database(&config).await?;
            let (outcome, list) = LeadService::new(db.pool())
                .create_list(&name, &description)
                .await?;
            match list {
                Some(list) => {
                    println!("✅ {}", outcome.message);
                    println!("   ID: {}", list.id);
                    println!("   Slug: {}", list.slug);
                }
                None => println!("❌ {}", outcome.message),
            }
            Ok(())
        }

        Command::ListDelete { name } => {
            let db = open_database(&config).await?;
            let service = LeadService::new(db.pool());
            match service.lists().find_by_name(&name).await? {
                Some(list) => {
                    let outcome = service.delete_list(list.id).await?;
                    println!("✅ {}", outcome.message);
                }
                None => println!("❌ No list named '{}'", name),
            }
            Ok(())
        }

        Command::Export { name, output } => {
            let db = open_database(&config).await?;
            let service = LeadService::new(db.pool());
            let Some(list) = service.lists().find_by_name(&name).await? else {
                println!("❌ No list named '{}'", name);
                return Ok(());
            };

            let leads = service.leads_in_list(list.id).await?;
            let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(&list.slug)));
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;

            match export_leads_csv(file, leads.iter().map(|l| &l.lead.lead)) {
                Ok(rows) => {
                    info!("Exported list '{}' to {}", list.name, path.display());
                    println!("✅ Exported {} leads to {}", rows, path.display());
                    Ok(())
                }
                Err(e) => {
                    error!("Export of '{}' failed: {:#}", list.name, e);
                    Err(e)
                }
            }
        }

        Command::Init => {
            open_database(&config).await?;
            println!(
                "✅ Database initialized at: {}",
                config.environment.database_path.display()
            );
            println!("   Tables: leads, lead_lists, lead_list_items");
            Ok(())
        }
    }
}

async fn open_database(config: &ConfigManager) -> Result<Database> {
    config.ensure_directories().await?;
    Database::new(&config.environment.database_path).await
}
