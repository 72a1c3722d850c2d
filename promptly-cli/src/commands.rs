pub const HELP_TEXT: &str = "\
Commands:
  /modes        List enhancement modes
  /mode ID      Switch mode (creative, precise, academic, image)
  /clear        Clear the input and result
  /regen        Enhance the same input again
  /copy         Copy the enhanced prompt to the clipboard
  /compare      Toggle the before/after comparison
  /theme        Toggle dark/light theme
  /help         Show this help
  /quit         Exit
Any other line is enhanced with the current mode.
Start a prompt with // to enhance text that begins with /.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalCommand {
    ListModes,
    SelectMode(String),
    Clear,
    Regenerate,
    Copy,
    ToggleComparison,
    ToggleTheme,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalCommandResult {
    Command(LocalCommand),

    /// Recognised syntax but unusable, carries the message to show
    Invalid { msg: String },

    /// A command to exit the app was detected
    Exit,

    /// A `//` line: the prompt to enhance, with the escaping slash removed
    Prompt(String),

    /// Not a command; the line is the prompt to enhance
    Unhandled,
}

pub fn handle_local_command(input: &str) -> LocalCommandResult {
    let input = input.trim();
    if !input.starts_with('/') {
        return LocalCommandResult::Unhandled;
    }
    if let Some(prompt) = input.strip_prefix("//") {
        return LocalCommandResult::Prompt(format!("/{prompt}"));
    }

    let (name, arg) = match input.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (input, ""),
    };

    let command = match name {
        "/modes" => LocalCommand::ListModes,
        "/mode" if arg.is_empty() => {
            return LocalCommandResult::Invalid {
                msg: "Usage: /mode ID".to_string(),
            }
        }
        "/mode" => LocalCommand::SelectMode(arg.to_string()),
        "/clear" => LocalCommand::Clear,
        "/regen" | "/regenerate" => LocalCommand::Regenerate,
        "/copy" => LocalCommand::Copy,
        "/compare" => LocalCommand::ToggleComparison,
        "/theme" => LocalCommand::ToggleTheme,
        "/help" => LocalCommand::Help,
        "/exit" | "/quit" => return LocalCommandResult::Exit,
        _ => {
            return LocalCommandResult::Invalid {
                msg: format!("Unknown command {name}. Type /help for commands."),
            }
        }
    };
    LocalCommandResult::Command(command)
}
