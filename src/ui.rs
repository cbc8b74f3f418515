// UI layer: the interactive menu built on `dialoguer`. Every action runs
// inside its own error boundary so a failure prints a message and brings
// the operator back to the menu.

use crate::actions::{self, UploadOutcome};
use crate::api::{AssistantService, ListOrder};
use crate::config::Config;
use crate::menu::MenuAction;
use crate::poll::{Poller, ThreadSleeper};
use crate::registry::{AssistantRecord, AssistantRegistry};
use crate::session::{self, ChatIo, SessionContext};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Main interactive menu. Loops until the operator picks "Exit".
pub fn main_menu<A: AssistantService>(api: &A, config: &Config) -> Result<()> {
    let mut ctx = SessionContext {
        selected_assistant: config.assistant_id.clone(),
        vector_store_id: config.vector_store_id.clone(),
    };
    let registry = AssistantRegistry::new(&config.registry_path);
    let mut poller = Poller::new(config.poll.clone(), ThreadSleeper);
    let actions = config.menu.actions();

    loop {
        let selection = Select::new()
            .with_prompt("Please choose an option")
            .items(&actions)
            .default(0)
            .interact()
            .context("Failed to read menu selection")?;

        let action = match actions.get(selection) {
            Some(action) => *action,
            None => {
                println!("Invalid option selected.");
                continue;
            }
        };

        let result = match action {
            MenuAction::ListAssistants => list_assistants(api, &mut ctx),
            MenuAction::CreateAssistant => create_assistant(&registry),
            MenuAction::ChatWithAssistant => chat_with_assistant(api, &ctx, &mut poller),
            MenuAction::UploadFile => upload_file(api, &ctx),
            MenuAction::CreateThread => create_thread(api),
            MenuAction::Exit => {
                println!("Goodbye!");
                return Ok(());
            }
        };

        if let Err(e) = result {
            tracing::error!(action = action.label(), error = ?e, "action failed");
            println!("An error occurred: {e:#}");
        }
        println!();
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Fetch remote assistants and let the operator pick the active one.
fn list_assistants<A: AssistantService>(api: &A, ctx: &mut SessionContext) -> Result<()> {
    let bar = spinner("Fetching assistants...");
    let assistants = api.list_assistants(ListOrder::Desc);
    bar.finish_and_clear();
    let assistants = assistants.context("Failed to list assistants")?;

    if assistants.is_empty() {
        println!("No assistants found.");
        return Ok(());
    }

    let names: Vec<&str> = assistants.iter().map(|a| a.display_name()).collect();
    let current = ctx
        .selected_assistant
        .as_deref()
        .and_then(|id| assistants.iter().position(|a| a.id == id))
        .unwrap_or(0);

    let picked = Select::new()
        .with_prompt("Select an assistant")
        .items(&names)
        .default(current)
        .interact_opt()?;

    if let Some(index) = picked {
        let chosen = &assistants[index];
        ctx.selected_assistant = Some(chosen.id.clone());
        println!("Selected assistant: {} ({})", chosen.display_name(), chosen.id);
    }
    Ok(())
}

/// Record a new assistant name/description in the local registry.
fn create_assistant(registry: &AssistantRegistry) -> Result<()> {
    let name: String = Input::new()
        .with_prompt("Enter the assistant name")
        .interact_text()?;
    let description: String = Input::new()
        .with_prompt("Enter a description for the assistant")
        .allow_empty(true)
        .interact_text()?;

    let record = AssistantRecord { name, description };
    let name = record.name.clone();
    registry
        .append(record)
        .with_context(|| format!("Failed to save {}", registry.path().display()))?;
    println!("Assistant '{}' created successfully!", name);
    Ok(())
}

fn chat_with_assistant<A: AssistantService>(
    api: &A,
    ctx: &SessionContext,
    poller: &mut Poller<ThreadSleeper>,
) -> Result<()> {
    println!("Type your message, or 'menu' to go back.");
    let mut io = TerminalChat::default();
    match session::chat(api, ctx, poller, &mut io) {
        Ok(transcript) => {
            tracing::debug!(turns = transcript.len(), "chat session closed");
            Ok(())
        }
        Err(e) => {
            io.clear_spinner();
            Err(e.into())
        }
    }
}

fn upload_file<A: AssistantService>(api: &A, ctx: &SessionContext) -> Result<()> {
    let input: String = Input::new()
        .with_prompt("Enter the path of the file to upload")
        .interact_text()?;
    let path = actions::resolve_path(&input)?;
    if path.exists() {
        println!("File '{}' is ready to be uploaded.", path.display());
    }

    let bar = spinner("Uploading...");
    let outcome = actions::upload_file(api, ctx, &path);
    bar.finish_and_clear();

    match outcome? {
        UploadOutcome::Missing(_) => println!("File does not exist."),
        UploadOutcome::Uploaded { file_id, batch_id } => {
            println!("File uploaded with ID: {}", file_id);
            match batch_id {
                Some(batch) => println!("Added to vector store batch {}", batch),
                None => println!("No VECTOR_STORE_ID configured, skipped the vector store step."),
            }
        }
    }
    Ok(())
}

fn create_thread<A: AssistantService>(api: &A) -> Result<()> {
    let id = actions::create_thread(api)?;
    println!("Created thread {}", id);
    Ok(())
}

/// Chat I/O on the terminal: `dialoguer` for input, a spinner while a run
/// is pending.
#[derive(Default)]
struct TerminalChat {
    spinner: Option<ProgressBar>,
}

impl TerminalChat {
    fn clear_spinner(&mut self) {
        if let Some(bar) = self.spinner.take() {
            bar.finish_and_clear();
        }
    }
}

impl ChatIo for TerminalChat {
    fn read_input(&mut self) -> Result<String> {
        self.clear_spinner();
        let line: String = Input::new()
            .with_prompt(">")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read chat input")?;
        Ok(line)
    }

    fn reply(&mut self, text: &str) {
        self.clear_spinner();
        println!("{} {}", "Assistant:".bold().cyan(), text);
    }

    fn notice(&mut self, text: &str) {
        self.clear_spinner();
        println!("{}", text);
    }

    fn waiting(&mut self, waited: Duration) {
        let bar = self.spinner.get_or_insert_with(|| spinner("Waiting for the assistant..."));
        if waited >= Duration::from_secs(1) {
            bar.set_message(format!("Waiting for the assistant... {}s", waited.as_secs()));
        }
    }
}
