use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;
use strum::EnumString;

use crate::generator::Generator;
use crate::store::{AddOutcome, RemoveOutcome, ResponseStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
enum MenuChoice {
    #[strum(serialize = "1")]
    Ask,
    #[strum(serialize = "2")]
    View,
    #[strum(serialize = "3")]
    Add,
    #[strum(serialize = "4")]
    Remove,
    #[strum(serialize = "5")]
    Reset,
    #[strum(serialize = "6")]
    Exit,
}

const MENU: &str = "\nWhat would you like to do?
1. Ask a question
2. View all responses
3. Add a custom response
4. Remove a custom response
5. Reset response counts
6. Exit";

/// Runs the interactive session until the user exits or input runs out.
pub async fn run<R: BufRead, W: Write>(
    store: &mut ResponseStore,
    generator: &dyn Generator,
    max_length: usize,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    loop {
        writeln!(output, "{MENU}")?;
        let Some(line) = read_line(input, output, "Enter your choice (1/2/3/4/5/6): ")? else {
            break;
        };

        let Ok(choice) = MenuChoice::from_str(line.trim()) else {
            writeln!(
                output,
                "Invalid choice. Please enter a valid option (1/2/3/4/5/6)."
            )?;
            continue;
        };

        match choice {
            MenuChoice::Ask => {
                let Some(question) = read_line(input, output, "Ask Heisenberg a question: ")?
                else {
                    break;
                };
                match store.answer(&question, generator, max_length).await {
                    Ok(reply) => writeln!(output, "Heisenberg says: {reply}")?,
                    Err(error) => writeln!(output, "Heisenberg could not answer: {error:#}")?,
                }
            }
            MenuChoice::View => {
                writeln!(output, "All Responses:")?;
                for listed in store.list_responses() {
                    writeln!(
                        output,
                        "{}. {} - {} times",
                        listed.position, listed.text, listed.count
                    )?;
                }
            }
            MenuChoice::Add => {
                let Some(text) = read_line(input, output, "Enter your custom response: ")? else {
                    break;
                };
                match store.add_response(&text) {
                    Ok(AddOutcome::Added) => {
                        writeln!(output, "Custom response added successfully!")?
                    }
                    Ok(AddOutcome::Empty) => {
                        writeln!(output, "Custom response cannot be empty.")?
                    }
                    Err(error) => writeln!(output, "Could not save responses: {error:#}")?,
                }
            }
            MenuChoice::Remove => {
                let Some(text) =
                    read_line(input, output, "Enter the custom response to remove: ")?
                else {
                    break;
                };
                match store.remove_response(&text) {
                    Ok(RemoveOutcome::Removed) => {
                        writeln!(output, "Custom response removed successfully!")?
                    }
                    Ok(RemoveOutcome::NotFound) => {
                        writeln!(output, "Custom response not found.")?
                    }
                    Err(error) => writeln!(output, "Could not save responses: {error:#}")?,
                }
            }
            MenuChoice::Reset => match store.reset_counts() {
                Ok(()) => writeln!(output, "Response counts reset successfully!")?,
                Err(error) => writeln!(output, "Could not save responses: {error:#}")?,
            },
            MenuChoice::Exit => break,
        }
    }

    writeln!(output, "Goodbye! Thanks for consulting Heisenberg.")?;
    Ok(())
}

/// Prompts and reads one line without its line ending. `None` on end of input.
fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    if input.read_line(&mut line).context("Failed to read stdin")? == 0 {
        return Ok(None);
    }

    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}
