use crate::core::editor::MatrixEditor;
use crate::domain::model::{Term, Tier};
use crate::domain::ports::{Notifier, PricingApi};
use crate::utils::error::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const HELP: &str = "\
commands:
  fetch                         load the matrix from the API
  edit                          toggle edit mode
  set <term> <tier> [value]     edit one cell (empty value = 0)
  clear                         set every price to 0
  cancel                        discard edits
  save                          save the matrix
  show                          print the table
  help                          print this help
  quit                          leave the editor
terms: 36months, 24months, 12months
tiers: lite, standard, unlimited
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch,
    Edit,
    Set { term: Term, tier: Tier, value: String },
    Clear,
    Cancel,
    Save,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Name of the action that must be on offer for this command to run.
    fn required_action(&self) -> Option<&'static str> {
        match self {
            Command::Fetch => Some("fetch"),
            Command::Edit => Some("edit"),
            Command::Clear => Some("clear"),
            Command::Cancel => Some("cancel"),
            Command::Save => Some("save"),
            // 只有編輯模式下才能修改儲存格
            Command::Set { .. } => Some("save"),
            Command::Show | Command::Help | Command::Quit => None,
        }
    }
}

pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();

    let command = match name {
        "fetch" => Command::Fetch,
        "edit" => Command::Edit,
        "clear" => Command::Clear,
        "cancel" => Command::Cancel,
        "save" => Command::Save,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "set" => {
            let term = parts
                .next()
                .ok_or("usage: set <term> <tier> [value]")?
                .parse::<Term>()?;
            let tier = parts
                .next()
                .ok_or("usage: set <term> <tier> [value]")?
                .parse::<Tier>()?;
            let value = parts.collect::<Vec<_>>().join(" ");
            Command::Set { term, tier, value }
        }
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };

    Ok(command)
}

/// Prints notices straight to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        tracing::debug!("notice: {}", message);
        println!("🔔 {}", message);
    }
}

/// 互動式編輯迴圈：每行一個指令，直到 `quit` 或輸入結束
pub async fn run_session<A, N, R, W>(
    editor: &mut MatrixEditor<A, N>,
    input: R,
    output: &mut W,
) -> Result<()>
where
    A: PricingApi,
    N: Notifier,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(editor.render().as_bytes()).await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                output.write_all(format!("{}\n", message).as_bytes()).await?;
                output.flush().await?;
                continue;
            }
        };

        if let Some(action) = command.required_action() {
            if !editor.actions().contains(&action) {
                let message = format!(
                    "'{}' is not available now (available: {})\n",
                    line.trim(),
                    editor.actions().join(", ")
                );
                output.write_all(message.as_bytes()).await?;
                output.flush().await?;
                continue;
            }
        }

        let reply = match command {
            Command::Fetch => match editor.fetch_data_from_api().await {
                Ok(()) => editor.render(),
                Err(e) => format!("fetch failed: {}\n", e),
            },
            Command::Edit => {
                editor.edit();
                editor.render()
            }
            Command::Set { term, tier, value } => {
                match editor.on_input_change(term, tier, &value) {
                    Ok(()) => editor.render(),
                    // 通知已由 notifier 顯示
                    Err(_) => String::new(),
                }
            }
            Command::Clear => {
                editor.clear();
                editor.render()
            }
            Command::Cancel => {
                editor.cancel();
                editor.render()
            }
            Command::Save => match editor.save().await {
                Ok(()) => editor.render(),
                Err(e) => format!("save failed: {}\n", e),
            },
            Command::Show => editor.render(),
            Command::Help => HELP.to_string(),
            Command::Quit => break,
        };

        output.write_all(reply.as_bytes()).await?;
        output.flush().await?;
    }

    Ok(())
}
