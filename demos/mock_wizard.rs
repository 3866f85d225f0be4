//! Example: walking the whole wizard against MockGateway.
//!
//! Run with: `RUST_LOG=debug cargo run --example mock_wizard`

use content_wizard::events::{FnEventHandler, WizardEvent};
use content_wizard::{MockGateway, Stage, StepController, Tone};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn options(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // One canned answer per generative step, in order
    let gateway = MockGateway::new(vec![
        Ok(options(&["1. Ten espresso myths", "2. Budget grinder shootout"])),
        Ok(options(&["I Tested 5 Grinders Under $100"])),
        Ok(options(&["$100 WINNER?", "DON'T BUY YET"])),
        Ok(options(&["You're wasting money on your grinder. Here's proof."])),
    ]);

    let wizard = StepController::new(Arc::new(gateway)).with_event_handler(Arc::new(
        FnEventHandler(|event: WizardEvent| {
            if let WizardEvent::StageAdvanced { to, .. } = event {
                println!("-- Step {}: {}", to.step_number(), to);
            }
        }),
    ));
    wizard.set_topic("home espresso");
    wizard.set_tone(Tone::Educational);

    // Pick the first option at every step
    for stage in [Stage::Ideas, Stage::Title, Stage::Thumbnail, Stage::Hook] {
        wizard.generate().await?;
        let snapshot = wizard.snapshot();
        if let Some(first) = snapshot.state.candidates(stage).and_then(|c| c.first()) {
            wizard.select(stage, first)?;
        }
    }

    if let Some(summary) = wizard.snapshot().summary() {
        println!("\nYour Content Summary");
        println!("Selected Idea:  {}", summary.idea.unwrap_or_default());
        println!("Title:          {}", summary.title.unwrap_or_default());
        println!("Thumbnail Text: {}", summary.thumbnail_text.unwrap_or_default());
        println!("Hook:           {}", summary.hook.unwrap_or_default());
    }

    Ok(())
}
