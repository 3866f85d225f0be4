//! Example: interactive wizard against a running generation service.
//!
//! Run with:
//! `CONTENT_WIZARD_API_URL=http://localhost:8000 cargo run --example http_wizard -- "your topic"`

use content_wizard::{Stage, StepController, WizardConfig, WizardError};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn choose(stage: Stage, candidates: &[String]) -> anyhow::Result<Option<String>> {
    if candidates.is_empty() {
        return Ok(None);
    }
    println!("\nStep {} ({}):", stage.step_number(), stage);
    for (i, c) in candidates.iter().enumerate() {
        println!("  [{}] {}", i + 1, c);
    }

    let stdin = io::stdin();
    loop {
        print!("Pick 1-{}: ", candidates.len());
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let picked = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| candidates.get(i));
        if let Some(item) = picked {
            return Ok(Some(item.clone()));
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = WizardConfig::from_env()?;
    let wizard = StepController::from_config(&config)?;
    wizard.set_topic(std::env::args().nth(1).unwrap_or_else(|| "home espresso".to_string()));

    while wizard.current_stage() != Stage::Summary {
        let stage = wizard.current_stage();
        match wizard.generate().await {
            Ok(_) => {}
            Err(WizardError::Generation(failure)) => {
                eprintln!("Generation failed ({:?}): {}. Retrying once...", failure.kind(), failure);
                wizard.generate().await?;
            }
            Err(other) => return Err(other.into()),
        }

        let candidates = wizard
            .snapshot()
            .state
            .candidates(stage)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        if let Some(item) = choose(stage, &candidates)? {
            wizard.select(stage, &item)?;
        }
    }

    let summary = wizard.snapshot().summary().unwrap_or_default();
    println!("\n{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
