use clap::{Args, Subcommand};

use eggtally_core::{Aviary, FileStore, StateError, StateStore, DEFAULT_TRAY_VALUE};

/// Aviary commands act on the selected batch
#[derive(Args)]
pub struct AviaryCommand {
    #[command(subcommand)]
    pub command: AviarySubcommand,
}

#[derive(Subcommand)]
pub enum AviarySubcommand {
    /// List aviaries of the selected batch
    List,

    /// Add an aviary to the selected batch
    Add {
        /// Name of the aviary
        name: String,

        /// Eggs per tray
        #[arg(long, default_value_t = DEFAULT_TRAY_VALUE)]
        tray_value: u32,
    },

    /// Update an aviary's name or tray value
    Update {
        /// Aviary ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// Eggs per tray
        #[arg(long)]
        tray_value: Option<u32>,
    },

    /// Delete an aviary
    Delete {
        /// Aviary ID
        id: String,
    },

    /// Select the aviary tallies are counted for
    Select {
        /// Aviary ID
        id: String,
    },
}

impl AviaryCommand {
    pub fn run(&self, store: &mut StateStore<FileStore>) -> Result<(), Box<dyn std::error::Error>> {
        let batch = store.require_selected_batch()?.clone();

        match &self.command {
            AviarySubcommand::List => {
                println!("{}", batch.name);
                if batch.aviaries.is_empty() {
                    println!("  No aviaries.");
                    return Ok(());
                }

                let selected = store.selection().aviary_id.clone();
                for aviary in &batch.aviaries {
                    let marker = if selected.as_deref() == Some(aviary.id.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!("{} {:<6} {}", marker, aviary.id, aviary);
                }
            }
            AviarySubcommand::Add { name, tray_value } => {
                let aviary =
                    Aviary::new(batch.next_aviary_id(), name.trim()).with_tray_value(*tray_value);
                let id = aviary.id.clone();
                store.add_aviary(&batch.id, aviary)?;
                println!("Added aviary '{}' ({}) to {}", name.trim(), id, batch.name);
            }
            AviarySubcommand::Update {
                id,
                name,
                tray_value,
            } => {
                let mut aviary =
                    batch
                        .aviary(id)
                        .cloned()
                        .ok_or_else(|| StateError::AviaryNotFound {
                            batch_id: batch.id.clone(),
                            aviary_id: id.clone(),
                        })?;
                if let Some(name) = name {
                    aviary.name = name.trim().to_string();
                }
                if let Some(tray_value) = tray_value {
                    aviary.tray_value = *tray_value;
                }

                store.update_aviary(&batch.id, aviary.clone())?;
                println!("Updated aviary {}", aviary);
            }
            AviarySubcommand::Delete { id } => {
                store.delete_aviary(&batch.id, id)?;
                println!("Deleted aviary {} from {}", id, batch.name);
            }
            AviarySubcommand::Select { id } => {
                store.set_selected_aviary(Some(id))?;
                println!("Selected aviary {} (tray value {})", id, store.tray_value());
            }
        }
        Ok(())
    }
}
