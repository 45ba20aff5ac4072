//! Interactive terminal front end
//!
//! Reads one command per line from stdin and drives the session through
//! the command layer. Summarize runs on its own task so the prompt stays
//! usable (and selection changes can race the request).

use crate::commands::{self, SummarizerState};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  add <path>...            replace the selection with these files
  rm <n>                   remove file n (1-based)
  clear                    remove all files
  length <short|medium|long>
  note [text]              set (or clear) extra instructions
  go                       summarize the selection
  copy <n|combined>        copy a summary to the clipboard
  save <n|combined>        save a summary as a .txt file
  show [json]              print the current state
  example                  show a sample summary
  help                     this text
  quit";

/// Export target addressed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// 0-based result position
    Item(usize),
    Combined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(Vec<PathBuf>),
    Remove(usize),
    Clear,
    Length(String),
    Note(Option<String>),
    Go,
    Copy(Target),
    Save(Target),
    Show,
    ShowJson,
    Example,
    Help,
    Quit,
}

fn parse_position(raw: Option<&str>) -> Result<usize, String> {
    let raw = raw.ok_or_else(|| "missing position".to_string())?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("'{}' is not a position (use 1, 2, ...)", raw)),
    }
}

fn parse_target(raw: Option<&str>) -> Result<Target, String> {
    match raw {
        Some("combined") | Some("all") => Ok(Target::Combined),
        other => parse_position(other).map(Target::Item),
    }
}

/// Parse one input line; `Ok(None)` for blank lines
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let command = match verb.to_lowercase().as_str() {
        "add" | "select" => {
            let paths: Vec<PathBuf> = args.map(PathBuf::from).collect();
            if paths.is_empty() {
                return Err("add needs at least one path".to_string());
            }
            ShellCommand::Add(paths)
        }
        "rm" | "remove" => ShellCommand::Remove(parse_position(args.next())?),
        "clear" => ShellCommand::Clear,
        "length" => ShellCommand::Length(
            args.next()
                .ok_or_else(|| "length needs short, medium or long".to_string())?
                .to_string(),
        ),
        "note" => ShellCommand::Note((!rest.is_empty()).then(|| rest.to_string())),
        "go" | "summarize" => ShellCommand::Go,
        "copy" => ShellCommand::Copy(parse_target(args.next())?),
        "save" | "download" => ShellCommand::Save(parse_target(args.next())?),
        "show" | "ls" => match args.next() {
            Some("json") => ShellCommand::ShowJson,
            Some(other) => return Err(format!("unknown view '{}' (try show json)", other)),
            None => ShellCommand::Show,
        },
        "example" => ShellCommand::Example,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{}' (try help)", other)),
    };
    Ok(Some(command))
}

fn print_view(state: &SummarizerState) {
    match commands::summarizer_view(state) {
        Ok(view) => println!("{}", view.render()),
        Err(e) => eprintln!("{}", e),
    }
}

/// Run one command; returns false when the shell should exit
async fn execute(command: ShellCommand, state: &SummarizerState) -> bool {
    let outcome: Result<String, String> = match command {
        ShellCommand::Add(paths) => commands::summarizer_select_files(paths, state)
            .await
            .map(|names| format!("Selected: {}", names.join(", "))),
        ShellCommand::Remove(index) => {
            commands::summarizer_remove_file(index, state).map(|name| format!("Removed {}", name))
        }
        ShellCommand::Clear => {
            commands::summarizer_clear_files(state).map(|_| "Selection cleared".to_string())
        }
        ShellCommand::Length(length) => commands::summarizer_set_length(length, state)
            .map(|length| format!("Length: {}", length.label())),
        ShellCommand::Note(text) => commands::summarizer_set_instructions(text, state)
            .map(|_| "Instructions updated".to_string()),
        ShellCommand::Go => {
            let state = state.clone();
            tokio::spawn(async move {
                match commands::summarizer_summarize(&state).await {
                    Ok(_) => print_view(&state),
                    Err(e) => eprintln!("{}", e),
                }
            });
            Ok("Generating summaries...".to_string())
        }
        ShellCommand::Copy(Target::Item(index)) => {
            commands::summarizer_copy(index, state).map(|_| "Copied!".to_string())
        }
        ShellCommand::Copy(Target::Combined) => {
            commands::summarizer_copy_combined(state).map(|_| "Copied!".to_string())
        }
        ShellCommand::Save(Target::Item(index)) => {
            commands::summarizer_download(index, state).map(|path| format!("Saved {}", path))
        }
        ShellCommand::Save(Target::Combined) => {
            commands::summarizer_download_combined(state).map(|path| format!("Saved {}", path))
        }
        ShellCommand::Show => commands::summarizer_view(state).map(|view| view.render()),
        ShellCommand::ShowJson => commands::summarizer_view_json(state),
        ShellCommand::Example => Ok(commands::summarizer_example().to_string()),
        ShellCommand::Help => Ok(HELP.to_string()),
        ShellCommand::Quit => return false,
    };

    match outcome {
        Ok(message) => println!("{}", message),
        Err(e) => eprintln!("{}", e),
    }
    true
}

/// Prompt loop over stdin until `quit` or end of input
pub async fn run_shell(state: SummarizerState) -> std::io::Result<()> {
    print_view(&state);
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Some(command)) => {
                if !execute(command, &state).await {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => eprintln!("{}", e),
        }
    }

    tracing::info!("[Shell] Input closed, exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_and_positions() {
        assert_eq!(
            parse_line("add a.pdf b.docx").unwrap(),
            Some(ShellCommand::Add(vec![
                PathBuf::from("a.pdf"),
                PathBuf::from("b.docx")
            ]))
        );
        assert_eq!(parse_line("rm 2").unwrap(), Some(ShellCommand::Remove(1)));
        assert!(parse_line("rm 0").is_err());
        assert!(parse_line("add").is_err());
    }

    #[test]
    fn test_parse_targets() {
        assert_eq!(
            parse_line("copy combined").unwrap(),
            Some(ShellCommand::Copy(Target::Combined))
        );
        assert_eq!(
            parse_line("save 1").unwrap(),
            Some(ShellCommand::Save(Target::Item(0)))
        );
        assert!(parse_line("copy").is_err());
    }

    #[test]
    fn test_parse_note_keeps_spacing() {
        assert_eq!(
            parse_line("note focus on   methods").unwrap(),
            Some(ShellCommand::Note(Some("focus on   methods".to_string())))
        );
        assert_eq!(parse_line("note").unwrap(), Some(ShellCommand::Note(None)));
    }

    #[test]
    fn test_parse_blank_and_unknown() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("GO").unwrap(), Some(ShellCommand::Go));
        assert_eq!(
            parse_line("show json").unwrap(),
            Some(ShellCommand::ShowJson)
        );
        assert!(parse_line("show xml").is_err());
        assert!(parse_line("launch").unwrap_err().contains("unknown command"));
    }
}
