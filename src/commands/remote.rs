//! Read-through commands against the collection backend.

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use eggtally_core::sync::{CollectChickenDto, CollectEggDataDto, WaterDto};
use eggtally_core::{load_remote_aviaries, ApiClient, Change, CollectionApi};

use super::open_store;
use crate::config::Config;

#[derive(Args)]
pub struct RemoteCommand {
    #[command(subcommand)]
    pub command: RemoteSubcommand,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RecordKind {
    Aviary,
    Egg,
    Chicken,
    Water,
}

#[derive(Subcommand)]
pub enum RemoteSubcommand {
    /// List backend aviaries
    Aviaries {
        /// Only aviaries of this backend batch
        #[arg(long)]
        batch: Option<i64>,
    },

    /// Show one backend aviary
    Aviary {
        /// Backend aviary ID
        id: i64,
    },

    /// Merge backend aviaries into local batches
    Import,

    /// List egg collections
    Eggs {
        /// Backend aviary ID
        #[arg(long)]
        aviary: Option<i64>,

        /// Collection date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "aviary")]
        date: Option<String>,
    },

    /// List mortality records
    Chickens {
        /// Backend aviary ID
        #[arg(long)]
        aviary: Option<i64>,

        /// Collection date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "aviary")]
        date: Option<String>,
    },

    /// List water records
    Water {
        /// Backend aviary ID
        #[arg(long)]
        aviary: Option<i64>,
    },

    /// Delete a backend record
    Delete {
        #[arg(value_enum)]
        kind: RecordKind,
        id: i64,
    },
}

impl RemoteCommand {
    pub async fn run(
        &self,
        config: &Config,
        api: &ApiClient,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RemoteSubcommand::Aviaries { batch } => {
                let aviaries = match batch {
                    Some(batch_id) => api.list_aviaries_by_batch(*batch_id).await?,
                    None => api.list_aviaries().await?,
                };
                if aviaries.is_empty() {
                    println!("No aviaries found.");
                }
                for aviary in aviaries {
                    println!(
                        "{:<6} {:<24} batch {:<6} roosters {:>5}  chickens {:>6}",
                        aviary.id,
                        aviary.name,
                        aviary.batch_id,
                        aviary.current_amount_of_rooster,
                        aviary.current_amount_of_chickens
                    );
                }
            }
            RemoteSubcommand::Aviary { id } => {
                let aviary = api.get_aviary(*id).await?;
                println!("{} (batch {})", aviary.name, aviary.batch_id);
                println!(
                    "  roosters: {} of {}",
                    aviary.current_amount_of_rooster, aviary.initial_amount_of_roosters
                );
                println!(
                    "  chickens: {} of {}",
                    aviary.current_amount_of_chickens, aviary.initial_amount_of_chickens
                );
            }
            RemoteSubcommand::Import => {
                let mut store = open_store(config)?;
                if let Change::AviariesImported {
                    batches_created,
                    aviaries,
                } = load_remote_aviaries(&mut store, api).await?
                {
                    println!(
                        "Imported {} aviaries ({} new batches)",
                        aviaries, batches_created
                    );
                }
            }
            RemoteSubcommand::Eggs { aviary, date } => {
                let collections = match (aviary, date) {
                    (Some(id), _) => api.list_egg_collections_by_aviary(*id).await?,
                    (None, Some(date)) => api.egg_collections_on(parse_date(date)?).await?,
                    (None, None) => api.list_egg_collections().await?,
                };
                print_eggs(&collections);
            }
            RemoteSubcommand::Chickens { aviary, date } => {
                let records = match (aviary, date) {
                    (Some(id), _) => api.list_chicken_collections_by_aviary(*id).await?,
                    (None, Some(date)) => api.chicken_collections_on(parse_date(date)?).await?,
                    (None, None) => api.list_chicken_collections().await?,
                };
                print_chickens(&records);
            }
            RemoteSubcommand::Water { aviary } => {
                let records = match aviary {
                    Some(id) => api.list_water_by_aviary(*id).await?,
                    None => api.list_water().await?,
                };
                print_water(&records);
            }
            RemoteSubcommand::Delete { kind, id } => {
                match kind {
                    RecordKind::Aviary => api.delete_aviary(*id).await?,
                    RecordKind::Egg => api.delete_egg_collection(*id).await?,
                    RecordKind::Chicken => api.delete_chicken_collection(*id).await?,
                    RecordKind::Water => api.delete_water(*id).await?,
                }
                println!("Deleted {}", id);
            }
        }
        Ok(())
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY-MM-DD format.", s))
}

fn format_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn print_eggs(collections: &[CollectEggDataDto]) {
    if collections.is_empty() {
        println!("No egg collections found.");
        return;
    }
    for collection in collections {
        let details: Vec<String> = collection
            .egg_detail
            .iter()
            .map(|d| format!("{} {}", d.egg_type, d.quantity))
            .collect();
        println!(
            "{:<6} aviary {:<6} {:<10} {}",
            format_id(collection.id),
            collection.aviary_id,
            collection.collection_date.as_deref().unwrap_or("-"),
            details.join(", ")
        );
    }
}

fn print_chickens(records: &[CollectChickenDto]) {
    if records.is_empty() {
        println!("No mortality records found.");
        return;
    }
    for record in records {
        println!(
            "{:<6} aviary {:<6} {:<10} roosters {:>4}  chickens {:>4}  {}",
            format_id(record.id),
            record.aviary_id,
            record.collection_date.as_deref().unwrap_or("-"),
            record.dead_roosters,
            record.dead_chickens,
            record.observation
        );
    }
}

fn print_water(records: &[WaterDto]) {
    if records.is_empty() {
        println!("No water records found.");
        return;
    }
    for record in records {
        println!(
            "{:<6} aviary {:<6} {:<10} {} L",
            format_id(record.id),
            record.aviary_id,
            record.collection_date.as_deref().unwrap_or("-"),
            record.volume
        );
    }
}
