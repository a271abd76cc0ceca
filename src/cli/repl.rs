//! Line-oriented gesture session for `pyramid edit`.
//!
//! Each input line is translated into the gesture sequence a pointer user
//! would produce, e.g. `drag a b` becomes drag start, drag over, drop and
//! drag end.

use std::io::{BufRead, Write};

use tracing::{debug, instrument};

use crate::application::{EditorController, Gesture, Key, MenuAction};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::domain::PyramidTree;
use crate::infrastructure::InfraError;

pub const HELP: &str = "\
commands:
  drag <id> <target>            drop a node onto a same-level sibling (swap)
  menu <id> <action>            context menu: edit | add-child | add-sibling | delete
  edit <id> <text>              replace a node's content (\\n for a line break)
  add-argument                  append a key argument to the main message
  show                          print the tree
  layout                        print node positions and connectors
  save                          write the document
  quit                          save pending changes and leave
  help                          this text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Gestures(Vec<Gesture>),
    Show,
    Layout,
    Save,
    Quit,
    Help,
}

/// Parse one input line; blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let mut args = rest.split_whitespace();

    let parsed = match command {
        "drag" => {
            let (Some(node), Some(target)) = (args.next(), args.next()) else {
                return Err("usage: drag <id> <target>".to_string());
            };
            ReplCommand::Gestures(vec![
                Gesture::DragStart(node.to_string()),
                Gesture::DragOver(target.to_string()),
                Gesture::Drop(target.to_string()),
                Gesture::DragEnd,
            ])
        }
        "menu" => {
            let (Some(node), Some(action)) = (args.next(), args.next()) else {
                return Err("usage: menu <id> <action>".to_string());
            };
            let action: MenuAction = action.parse()?;
            ReplCommand::Gestures(vec![
                Gesture::ContextMenu(node.to_string()),
                Gesture::MenuSelect(action),
            ])
        }
        "edit" => {
            let Some(node) = args.next() else {
                return Err("usage: edit <id> <text>".to_string());
            };
            let text = rest[node.len()..].trim().replace("\\n", "\n");
            ReplCommand::Gestures(vec![
                Gesture::ActivateEdit(node.to_string()),
                Gesture::Input(text),
                Gesture::KeyDown {
                    key: Key::Enter,
                    shift: false,
                },
            ])
        }
        "add-argument" => ReplCommand::Gestures(vec![Gesture::AddArgument]),
        "show" => ReplCommand::Show,
        "layout" => ReplCommand::Layout,
        "save" => ReplCommand::Save,
        "quit" | "exit" => ReplCommand::Quit,
        "help" => ReplCommand::Help,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };
    Ok(Some(parsed))
}

fn write_err(e: std::io::Error) -> CliError {
    CliError::Infra(InfraError::io("write session output", e))
}

fn print_layout<W: Write>(editor: &EditorController, out: &mut W) -> CliResult<()> {
    let Some(layout) = editor.layout() else {
        return Ok(());
    };
    writeln!(
        out,
        "canvas {}x{} (pass {})",
        layout.placement.width,
        layout.placement.height,
        editor.layout_passes()
    )
    .map_err(write_err)?;
    for node_box in &layout.placement.boxes {
        writeln!(
            out,
            "  L{} {} at ({}, {})",
            node_box.level, node_box.id, node_box.x, node_box.y
        )
        .map_err(write_err)?;
    }
    for connector in &layout.connectors {
        writeln!(
            out,
            "  {} -> {}: {}",
            connector.parent_id,
            connector.child_id,
            connector.curve.to_svg_path()
        )
        .map_err(write_err)?;
    }
    Ok(())
}

/// Drive `editor` with the commands read from `input`.
///
/// `save` is called on `save`, and once more on `quit` or end of input
/// when there are unsaved changes. Returns the number of saves.
#[instrument(level = "debug", skip_all)]
pub fn run<R, W, S>(
    editor: &mut EditorController,
    input: R,
    out: &mut W,
    mut save: S,
) -> CliResult<usize>
where
    R: BufRead,
    W: Write,
    S: FnMut(&PyramidTree) -> CliResult<()>,
{
    let mut dirty = false;
    let mut saves = 0;

    let mut save_tree = |editor: &EditorController, dirty: &mut bool| -> CliResult<bool> {
        match editor.tree() {
            Some(tree) => {
                save(tree)?;
                *dirty = false;
                Ok(true)
            }
            None => Ok(false),
        }
    };

    for line in input.lines() {
        let line = line.map_err(|e| CliError::Infra(InfraError::io("read session input", e)))?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                output::warning(&message);
                continue;
            }
        };
        debug!("command: {:?}", command);

        match command {
            ReplCommand::Gestures(gestures) => {
                for gesture in gestures {
                    let outcome = editor.handle(gesture);
                    dirty |= outcome.changed;
                    if let Some(id) = outcome.created {
                        writeln!(out, "created {}", id).map_err(write_err)?;
                    }
                    if let Some(notice) = outcome.notice {
                        output::warning(&notice);
                    }
                }
            }
            ReplCommand::Show => {
                if let Some(tree) = editor.tree() {
                    writeln!(out, "{}", output::tree_view(tree)).map_err(write_err)?;
                }
            }
            ReplCommand::Layout => print_layout(editor, out)?,
            ReplCommand::Save => {
                if save_tree(&*editor, &mut dirty)? {
                    saves += 1;
                }
            }
            ReplCommand::Quit => break,
            ReplCommand::Help => writeln!(out, "{}", HELP).map_err(write_err)?,
        }
    }

    if dirty && save_tree(&*editor, &mut dirty)? {
        saves += 1;
    }
    Ok(saves)
}
