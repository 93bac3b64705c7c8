use anyhow::{anyhow, Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};
use std::io::{self, Write};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::controller::ChatController;
use crate::render;

fn spinner() -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message(render::PENDING_TEXT);
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}

/// Waits for the exchange to settle while showing the pending indicator
async fn await_exchange(exchange: JoinHandle<()>) -> Result<()> {
    let spinner = spinner()?;
    let joined = exchange.await;
    spinner.finish_and_clear();

    if let Err(e) = joined {
        // The controller has already rendered the apology
        error!("Exchange task failed: {}", e);
    }
    Ok(())
}

/// Prints entries added since `printed`, returning the new count
fn print_new_entries(controller: &ChatController, printed: usize, echo_user: bool) -> usize {
    let view = controller.view();
    let new_entries = view.entries.get(printed..).unwrap_or_default();
    render::printable_entries(new_entries, echo_user).for_each(render::print_entry);
    view.entries.len()
}

/// Runs a single query: one exchange, then print the reply
pub async fn run_single_query(prompt: String, controller: &ChatController) -> Result<()> {
    info!("Running single query");

    let exchange = controller
        .submit(&prompt)
        .ok_or_else(|| anyhow!("Nothing to send: the prompt is empty"))?;
    await_exchange(exchange).await?;

    print_new_entries(controller, 0, false);
    Ok(())
}

/// Runs an interactive chat session against the relay
pub async fn run_interactive_chat(controller: &ChatController) -> Result<()> {
    render::print_greeting();
    render::print_suggestions(&controller.suggestions());
    println!("Type 'exit' or 'quit' to end the session.");
    println!();

    let mut printed = 0;
    loop {
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            // EOF
            println!();
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("Exiting chat session.");
            break;
        }

        let message = controller.resolve_input(input);
        let from_suggestion = message != input;

        debug!("Submitting message ({} chars)", message.len());
        match controller.submit(&message) {
            Some(exchange) => await_exchange(exchange).await?,
            None => continue,
        }

        printed = print_new_entries(controller, printed, from_suggestion);
        println!(); // Add spacing between interactions
    }

    Ok(())
}
