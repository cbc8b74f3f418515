// Chat session: one thread, many turns. Each turn sends the operator's line,
// starts a run, waits for it through the poller, and prints the newest
// assistant message. Typing "menu" ends the session.

use crate::api::AssistantService;
use crate::error::SessionError;
use crate::poll::{PollOutcome, Poller, Sleeper};
use crate::types::{Role, ThreadMessage};
use std::time::Duration;

/// Input that ends a chat session, compared case-insensitively after trimming.
pub const EXIT_SENTINEL: &str = "menu";

/// State the operator builds up across menu actions. Passed to each action
/// instead of living in a global.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub selected_assistant: Option<String>,
    pub vector_store_id: Option<String>,
}

/// Operator input and console output for a chat session.
pub trait ChatIo {
    /// Read one line from the operator.
    fn read_input(&mut self) -> anyhow::Result<String>;

    /// Show the assistant's reply.
    fn reply(&mut self, text: &str);

    /// Show a status line ("Returning to the main menu...", etc).
    fn notice(&mut self, text: &str);

    /// Called before every poll delay with the time waited so far.
    fn waiting(&mut self, _waited: Duration) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

/// Whether `input` is the sentinel that returns to the menu.
pub fn is_exit_command(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(EXIT_SENTINEL)
}

/// Runs one conversation against the selected assistant and returns the
/// transcript when the operator leaves with "menu".
pub fn chat<A, S, IO>(
    service: &A,
    ctx: &SessionContext,
    poller: &mut Poller<S>,
    io: &mut IO,
) -> Result<Vec<TranscriptEntry>, SessionError>
where
    A: AssistantService + ?Sized,
    S: Sleeper,
    IO: ChatIo + ?Sized,
{
    let assistant_id = ctx
        .selected_assistant
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or(SessionError::NoAssistantSelected)?;

    let thread = service.create_thread(&[])?;
    let thread_id = thread
        .usable_id()
        .ok_or(SessionError::ThreadCreationFailed)?
        .to_string();
    tracing::info!(%thread_id, assistant_id, "chat session started");

    let mut transcript = Vec::new();

    loop {
        let input = io.read_input().map_err(SessionError::Input)?;
        if is_exit_command(&input) {
            io.notice("Returning to the main menu...");
            return Ok(transcript);
        }
        if input.trim().is_empty() {
            continue;
        }

        transcript.push(TranscriptEntry {
            role: Role::User,
            content: input.clone(),
        });
        service.append_message(&thread_id, Role::User, &input)?;

        let run = service.start_run(&thread_id, assistant_id)?;
        let run_id = run
            .usable_id()
            .ok_or(SessionError::RunInitiationFailed)?
            .to_string();

        match poller.wait_for_run(service, &thread_id, &run_id, |waited| io.waiting(waited))? {
            PollOutcome::Succeeded(messages) => match first_assistant_message(&messages) {
                Some(message) => {
                    let text = message.plain_text();
                    io.reply(&text);
                    transcript.push(TranscriptEntry {
                        role: Role::Assistant,
                        content: text,
                    });
                }
                None => io.notice("Assistant did not respond."),
            },
            PollOutcome::Failed(run) => {
                return Err(SessionError::RunFailed {
                    status: run.status.to_string(),
                    reason: run.failure_reason(),
                });
            }
        }
    }
}

/// Messages come back newest first, so the first assistant message is the
/// reply to the turn that just finished.
fn first_assistant_message(messages: &[ThreadMessage]) -> Option<&ThreadMessage> {
    messages.iter().find(|m| m.role == Role::Assistant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_sentinel_ignores_case_and_whitespace() {
        assert!(is_exit_command("menu"));
        assert!(is_exit_command("  MeNu \n"));
        assert!(!is_exit_command("menus"));
        assert!(!is_exit_command("main menu"));
    }

    #[test]
    fn first_assistant_message_skips_user_messages() {
        let messages = vec![
            ThreadMessage::text(Role::User, "q"),
            ThreadMessage::text(Role::Assistant, "newest"),
            ThreadMessage::text(Role::Assistant, "older"),
        ];
        let found = first_assistant_message(&messages).unwrap();
        assert_eq!(found.plain_text(), "newest");
    }
}
