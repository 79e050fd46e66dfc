use clap::Args;

use eggtally_core::sync::StepStatus;
use eggtally_core::{submit_all_collections, ApiClient, FileStore, StateStore, SubmitError};

/// Submit every non-empty tally for the selected aviary
#[derive(Args)]
pub struct SubmitCommand {}

impl SubmitCommand {
    pub async fn run(
        &self,
        store: &mut StateStore<FileStore>,
        api: &ApiClient,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let target = store
            .selected_aviary()
            .map(|a| a.name.clone())
            .unwrap_or_default();

        match submit_all_collections(store, api).await {
            Ok(plan) => {
                if plan.is_empty() {
                    println!("Nothing to submit.");
                } else {
                    for step in &plan.steps {
                        println!("✓ {}", step.category_name);
                    }
                    println!();
                    println!(
                        "Submitted {} collections for {} to {}",
                        plan.steps.len(),
                        target,
                        api.base_url()
                    );
                }
                for id in &plan.skipped {
                    println!("Skipped category {} (no backend type)", id);
                }
                Ok(())
            }
            Err(SubmitError::Request {
                category,
                source,
                report,
            }) => {
                for step in &report.steps {
                    match &step.status {
                        StepStatus::Submitted => println!("✓ {}", step.category_name),
                        StepStatus::Failed(reason) => {
                            println!("✗ {}: {}", step.category_name, reason)
                        }
                        StepStatus::Pending => println!("  {} (not sent)", step.category_name),
                    }
                }
                println!();
                println!(
                    "{} of {} collections submitted. Run 'tally submit' again to send the rest.",
                    report.submitted().count(),
                    report.steps.len()
                );
                Err(format!("Failed to submit '{}': {}", category, source).into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
