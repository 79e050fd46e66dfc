use clap::{Args, Subcommand, ValueEnum};

use eggtally_core::{CollectionMode, FileStore, StateStore};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct CountCommand {
    #[command(subcommand)]
    pub command: CountSubcommand,
}

#[derive(Subcommand)]
pub enum CountSubcommand {
    /// Show every category tally
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Record trays and loose units for a category
    Set {
        /// Category ID
        id: String,

        #[arg(long, default_value_t = 0)]
        trays: u32,

        #[arg(long, default_value_t = 0)]
        units: u32,
    },

    /// Reset every tally to zero
    Clear,

    /// Switch between tray and unit entry
    Mode {
        /// trays or units
        mode: CollectionMode,
    },
}

impl CountCommand {
    pub fn run(&self, store: &mut StateStore<FileStore>) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            CountSubcommand::List { format } => match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(store.eggs())?);
                }
                OutputFormat::Text => {
                    let batch = store
                        .selected_batch()
                        .map(|b| b.name.clone())
                        .unwrap_or_else(|| "-".to_string());
                    let aviary = store
                        .selected_aviary()
                        .map(|a| a.name.clone())
                        .unwrap_or_else(|| "-".to_string());

                    println!("Batch: {}  Aviary: {}", batch, aviary);
                    println!(
                        "Mode: {}  Tray value: {}",
                        store.collection_mode(),
                        store.tray_value()
                    );
                    println!();
                    for egg in store.eggs() {
                        println!("{:>3}  {}", egg.id, egg);
                    }
                }
            },
            CountSubcommand::Set { id, trays, units } => {
                if store.collection_mode() == CollectionMode::Units && *trays > 0 {
                    return Err("Collection mode is 'units'; use --units or switch with 'tally count mode trays'".into());
                }

                store.set_selected_egg(Some(id))?;
                store.update_egg_count(id, *trays, *units)?;
                if let Some(egg) = store.selected_egg() {
                    println!("{}", egg);
                }
            }
            CountSubcommand::Clear => {
                store.clear_all_egg_counts();
                println!("Cleared all tallies");
            }
            CountSubcommand::Mode { mode } => {
                store.set_collection_mode(*mode);
                println!("Collection mode set to {}", mode);
            }
        }
        Ok(())
    }
}
