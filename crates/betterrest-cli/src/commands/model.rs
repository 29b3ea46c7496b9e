//! Model file inspection commands.

use std::path::PathBuf;

use clap::Subcommand;

use betterrest_core::{Config, ModelFile};

use super::resolve_model_path;

#[derive(Subcommand)]
pub enum ModelAction {
    /// Load the model and print its coefficients
    Show {
        /// Path to the trained model file
        #[arg(long)]
        model: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved model file location
    Path,
}

pub fn run(action: ModelAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    match action {
        ModelAction::Show { model, json } => {
            let path = resolve_model_path(&config, model)?;
            let model = ModelFile::load(&path)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&model)?);
                return Ok(());
            }

            let c = &model.coefficients;
            println!("Model: {}", path.display());
            if let Some(name) = &model.metadata.name {
                println!("  Name: {name}");
            }
            if let Some(trained_on) = &model.metadata.trained_on {
                println!("  Trained on: {trained_on}");
            }
            if let Some(description) = &model.metadata.description {
                println!("  Description: {description}");
            }
            println!("\nactualSleep = {}", c.intercept);
            println!("  + {} * wake", c.wake);
            println!("  + {} * estimatedSleep", c.estimated_sleep);
            println!("  + {} * coffee", c.coffee);
        }
        ModelAction::Path => {
            println!("{}", resolve_model_path(&config, None)?.display());
        }
    }
    Ok(())
}
