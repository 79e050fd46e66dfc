use clap::{Args, Subcommand};

use eggtally_core::{Batch, FileStore, StateError, StateStore};

#[derive(Args)]
pub struct BatchCommand {
    #[command(subcommand)]
    pub command: BatchSubcommand,
}

#[derive(Subcommand)]
pub enum BatchSubcommand {
    /// List all batches
    List,

    /// Create a new batch with one aviary
    Add {
        /// Name of the batch
        name: String,
    },

    /// Rename a batch
    Rename {
        /// Batch ID
        id: String,
        /// New name
        name: String,
    },

    /// Make a batch the active one and select it
    Activate {
        /// Batch ID
        id: String,
    },

    /// Delete a batch
    Delete {
        /// Batch ID
        id: String,
    },

    /// Select a batch without changing which one is active
    Select {
        /// Batch ID
        id: String,
    },
}

impl BatchCommand {
    pub fn run(&self, store: &mut StateStore<FileStore>) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            BatchSubcommand::List => {
                if store.batches().is_empty() {
                    println!("No batches found.");
                    return Ok(());
                }

                let selected = store.selection().batch_id.clone();
                for batch in store.batches() {
                    let marker = if selected.as_deref() == Some(batch.id.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!("{} {:<16} {}", marker, batch.id, batch);
                }
            }
            BatchSubcommand::Add { name } => {
                let batch = Batch::new(name.trim());
                let id = batch.id.clone();
                store.add_batch(batch)?;
                println!("Created batch '{}' ({})", name.trim(), id);
            }
            BatchSubcommand::Rename { id, name } => {
                let batch = store
                    .batch(id)
                    .cloned()
                    .ok_or_else(|| StateError::BatchNotFound(id.clone()))?;
                store.update_batch(Batch {
                    name: name.trim().to_string(),
                    ..batch
                })?;
                println!("Renamed batch {} to '{}'", id, name.trim());
            }
            BatchSubcommand::Activate { id } => {
                store.activate_batch(id)?;
                println!("Batch {} is now active", id);
            }
            BatchSubcommand::Delete { id } => {
                store.delete_batch(id)?;
                println!("Deleted batch {}", id);
            }
            BatchSubcommand::Select { id } => {
                store.set_selected_batch(Some(id))?;
                match store.selected_aviary() {
                    Some(aviary) => println!("Selected batch {} ({})", id, aviary),
                    None => println!("Selected batch {} (no aviaries)", id),
                }
            }
        }
        Ok(())
    }
}
