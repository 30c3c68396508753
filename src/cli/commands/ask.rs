//! Ask command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::responder::CannedResponder;
use anyhow::Result;
use console::style;

/// Answer one question, or walk through every known question.
pub fn run_ask(question: Option<&str>, settings: Settings) -> Result<()> {
    let responder = CannedResponder::from_settings(&settings.responder);

    match question {
        Some(q) => println!("{}", responder.respond(q)),
        None => {
            Output::header("Known questions");
            for q in responder.questions() {
                println!("\n{} {}", style("User:").cyan().bold(), q);
                println!("{} {}", style("Agent:").green().bold(), responder.respond(q));
            }
        }
    }

    Ok(())
}
