//! Bedtime calculation command.

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use betterrest_core::{ClockFormat, Config, ModelFile, Regressor, SleepForm, TimeOfDay};

use super::resolve_model_path;

#[derive(Args)]
pub struct PredictArgs {
    /// Wake-up time (HH:MM or h:MM AM/PM)
    #[arg(long)]
    wake: Option<String>,
    /// Desired sleep in hours (0-24, half-hour steps)
    #[arg(long)]
    sleep: Option<f64>,
    /// Cups of coffee per day (1-5)
    #[arg(long)]
    coffee: Option<u8>,
    /// Path to the trained model file
    #[arg(long)]
    model: Option<PathBuf>,
    /// Clock style for the result (12h or 24h)
    #[arg(long)]
    clock: Option<ClockFormat>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: PredictArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    // Stored defaults are consulted only for flags that were left out.
    let wake = match args.wake.as_deref() {
        Some(text) => TimeOfDay::parse(text)?,
        None => config.default_wake()?,
    };
    let sleep = match args.sleep {
        Some(hours) => hours,
        None => config.default_sleep()?,
    };
    let coffee = match args.coffee {
        Some(cups) => cups,
        None => config.default_coffee()?,
    };
    let clock = args.clock.unwrap_or(config.display.clock);

    let mut form = SleepForm::new().with_clock(clock);
    form.set_wake_time(wake);
    form.set_sleep_hours(sleep)?;
    form.set_coffee_cups(coffee)?;

    let model_path = resolve_model_path(&config, args.model)?;
    debug!(path = %model_path.display(), "using model file");
    let model = ModelFile::load(&model_path).ok();
    let regressor = model.as_ref().map(|m| &m.coefficients as &dyn Regressor);

    let outcome = form.calculate(regressor);

    if args.json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else if !outcome.is_error() {
        println!("{}", outcome.title);
        println!("{}", outcome.message);
    }

    if outcome.is_error() {
        if !args.json {
            eprintln!("{}", outcome.message);
        }
        std::process::exit(1);
    }
    Ok(())
}
