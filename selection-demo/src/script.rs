//! Line-oriented driver script.
//!
//! ```text
//! # comment
//! new city single Berlin,Paris,Rome label=City cleanable
//! json price 10,20,30,40 {"mode": "range", "name": "price", "label": "Price"}
//! open city                 # also: close toggle reset clear refresh dispose
//! pick city Paris
//! filter city par
//! focus price max
//! type price min 15
//! key city escape [item]    # escape up down space
//! click city toggle         # toggle, item <id>, clean, reset, field
//! click outside
//! tab
//! show city
//! ```

use std::collections::BTreeMap;
use std::io::Write;

use selection::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: missing {what}")]
    MissingArgument { line: usize, what: &'static str },

    #[error("line {line}: invalid {what} `{value}`")]
    InvalidValue {
        line: usize,
        what: &'static str,
        value: String,
    },

    #[error("line {line}: no selection named `{name}`")]
    UnknownSelection { line: usize, name: String },

    #[error("line {line}: {source}")]
    Selection {
        line: usize,
        #[source]
        source: SelectionError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Selections built by a script, keyed by the name the script gave them.
pub struct Session<W: Write> {
    router: KeyboardRouter,
    selections: BTreeMap<String, Selection>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(out: W) -> Self {
        Self {
            router: KeyboardRouter::new(Registry::new()),
            selections: BTreeMap::new(),
            out,
        }
    }

    /// Run every line of `script`, stopping at the first error.
    pub fn run(&mut self, script: &str) -> Result<(), ScriptError> {
        for (index, raw) in script.lines().enumerate() {
            let line = index + 1;
            let text = raw.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }
            log::debug!("Session::run line={} {:?}", line, text);
            self.execute(line, text)?;
        }
        Ok(())
    }

    fn execute(&mut self, line: usize, text: &str) -> Result<(), ScriptError> {
        let mut words = text.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        let arg = |i: usize, what: &'static str| {
            args.get(i)
                .copied()
                .ok_or(ScriptError::MissingArgument { line, what })
        };

        match command {
            "new" => {
                let name = arg(0, "selection name")?;
                let mode = parse_mode(line, arg(1, "mode")?)?;
                let items = arg(2, "item list")?;
                let mut config = SelectionConfig::new(mode, name);
                for option in &args[3..] {
                    config = apply_option(line, config, option)?;
                }
                self.create(line, name, config, items)
            }
            "json" => {
                let name = arg(0, "selection name")?;
                let items = arg(1, "item list")?;
                let json = args[2..].join(" ");
                let config = SelectionConfig::from_json(&json).map_err(|e| ScriptError::Selection {
                    line,
                    source: e.into(),
                })?;
                self.create(line, name, config, items)
            }
            "open" | "close" | "toggle" | "reset" | "clear" | "refresh" | "dispose" => {
                let selection = self.get(line, arg(0, "selection name")?)?;
                let outcome = selection
                    .invoke(command)
                    .map_err(|source| ScriptError::Selection { line, source })?;
                writeln!(self.out, "{} {}: {:?}", command, args[0], outcome)?;
                Ok(())
            }
            "pick" => {
                let selection = self.get(line, arg(0, "selection name")?)?;
                selection
                    .toggle_item(&ItemId::from(arg(1, "item id")?))
                    .map_err(|source| ScriptError::Selection { line, source })
            }
            "filter" => {
                let selection = self.get(line, arg(0, "selection name")?)?;
                let term = args[1..].join(" ");
                let visible = selection.apply_filter(&term);
                writeln!(self.out, "filter {}: {} visible", args[0], visible)?;
                Ok(())
            }
            "focus" => {
                let selection = self.get(line, arg(0, "selection name")?)?;
                selection.focus_range_input(parse_focus(line, arg(1, "endpoint")?)?);
                Ok(())
            }
            "type" => {
                let selection = self.get(line, arg(0, "selection name")?)?;
                let focus = parse_focus(line, arg(1, "endpoint")?)?;
                selection.type_range_endpoint(focus, arg(2, "endpoint value")?);
                Ok(())
            }
            "key" => {
                let selection = self.get(line, arg(0, "selection name")?)?;
                let key = parse_key(line, arg(1, "key")?)?;
                let kind = match args.get(2) {
                    Some(id) => TargetKind::Item(ItemId::from(*id)),
                    None => TargetKind::Toggle,
                };
                let target = EventTarget::inside(selection.id(), kind);
                let result = self.router.handle_keydown(key, &target);
                if let Some(focus) = selection.take_focus_request() {
                    writeln!(self.out, "key {}: {:?} focus={:?}", args[0], result, focus)?;
                } else {
                    writeln!(self.out, "key {}: {:?}", args[0], result)?;
                }
                Ok(())
            }
            "click" => {
                let target = match arg(0, "click target")? {
                    "outside" => EventTarget::outside(),
                    name => {
                        let selection = self.get(line, name)?;
                        let kind = match arg(1, "click target")? {
                            "toggle" => TargetKind::Toggle,
                            "item" => TargetKind::Item(ItemId::from(arg(2, "item id")?)),
                            "clean" => TargetKind::CleanButton,
                            "reset" => TargetKind::ResetButton,
                            "field" => TargetKind::TextField,
                            other => {
                                return Err(ScriptError::InvalidValue {
                                    line,
                                    what: "click target",
                                    value: other.to_string(),
                                });
                            }
                        };
                        EventTarget::inside(selection.id(), kind)
                    }
                };
                self.router.handle_click(MouseButton::Left, target);
                Ok(())
            }
            "tab" => {
                let report = self.router.handle_keyup(Key::Tab, EventTarget::outside());
                writeln!(self.out, "tab: closed {}", report.closed.len())?;
                Ok(())
            }
            "show" => {
                let selection = self.get(line, arg(0, "selection name")?)?;
                let view = selection.view();
                selection.clear_dirty();
                writeln!(self.out, "{}", serde_json::to_string_pretty(&view)?)?;
                Ok(())
            }
            other => Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            }),
        }
    }

    fn create(
        &mut self,
        line: usize,
        name: &str,
        config: SelectionConfig,
        items: &str,
    ) -> Result<(), ScriptError> {
        let labels: Vec<&str> = items.split(',').filter(|s| !s.is_empty()).collect();
        let selection = Selection::builder(config)
            .sources(&labels)
            .build(self.router.registry())
            .map_err(|source| ScriptError::Selection { line, source })?;
        if let Some(previous) = self.selections.insert(name.to_string(), selection) {
            previous.dispose();
        }
        Ok(())
    }

    fn get(&self, line: usize, name: &str) -> Result<Selection, ScriptError> {
        self.selections
            .get(name)
            .cloned()
            .ok_or_else(|| ScriptError::UnknownSelection {
                line,
                name: name.to_string(),
            })
    }
}

fn parse_mode(line: usize, value: &str) -> Result<Mode, ScriptError> {
    match value {
        "single" => Ok(Mode::Single),
        "multiple" => Ok(Mode::Multiple),
        "range" => Ok(Mode::Range),
        other => Err(ScriptError::InvalidValue {
            line,
            what: "mode",
            value: other.to_string(),
        }),
    }
}

fn parse_focus(line: usize, value: &str) -> Result<RangeFocus, ScriptError> {
    match value {
        "min" => Ok(RangeFocus::Min),
        "max" => Ok(RangeFocus::Max),
        other => Err(ScriptError::InvalidValue {
            line,
            what: "endpoint",
            value: other.to_string(),
        }),
    }
}

fn parse_key(line: usize, value: &str) -> Result<Key, ScriptError> {
    match value {
        "escape" | "esc" => Ok(Key::Escape),
        "up" => Ok(Key::Up),
        "down" => Ok(Key::Down),
        "space" => Ok(Key::Space),
        "enter" => Ok(Key::Enter),
        "tab" => Ok(Key::Tab),
        other => Err(ScriptError::InvalidValue {
            line,
            what: "key",
            value: other.to_string(),
        }),
    }
}

fn apply_option(
    line: usize,
    config: SelectionConfig,
    option: &str,
) -> Result<SelectionConfig, ScriptError> {
    let invalid = || ScriptError::InvalidValue {
        line,
        what: "option",
        value: option.to_string(),
    };
    match option.split_once('=') {
        None if option == "cleanable" => Ok(config.cleanable()),
        None if option == "disabled" => Ok(config.disabled()),
        Some(("label", label)) => Ok(config.label(label)),
        Some(("limit", limit)) => {
            let limit = limit.parse().map_err(|_| invalid())?;
            Ok(config.overflow_limit(limit))
        }
        Some(("markers", markers)) => {
            let (from, to) = markers.split_once(',').ok_or_else(invalid)?;
            Ok(config.range_markers(from, to))
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> Result<String, ScriptError> {
        let mut session = Session::new(Vec::new());
        session.run(script)?;
        Ok(String::from_utf8(session.out).unwrap())
    }

    #[test]
    fn test_single_pick_script() {
        let out = run("new city single Berlin,Paris label=City\nopen city\npick city Paris\nshow city\n")
            .unwrap();
        assert!(out.contains("open city: Proceeded"));
        assert!(out.contains("\"open\": false"));
        assert!(out.contains("\"label\": \"City\""));
    }

    #[test]
    fn test_click_outside_closes() {
        let out = run("new a multiple A,B\nnew b multiple A,B\nopen a\nclick outside\nclose a\n")
            .unwrap();
        assert!(out.contains("close a: Skipped"));
    }

    #[test]
    fn test_json_config() {
        let out = run(
            "json price 10,20,30 {\"mode\": \"range\", \"name\": \"price\"}\n\
             open price\npick price 30\npick price 10\nshow price\n",
        )
        .unwrap();
        assert!(out.contains("\"min\": \"10\""));
        assert!(out.contains("\"max\": \"30\""));
    }

    #[test]
    fn test_unknown_command() {
        let err = run("# nothing\nexplode\n").unwrap_err();
        assert_eq!(err.to_string(), "line 2: unknown command `explode`");
    }

    #[test]
    fn test_unknown_selection() {
        let err = run("open ghost").unwrap_err();
        assert!(matches!(err, ScriptError::UnknownSelection { line: 1, .. }));
    }

    #[test]
    fn test_bad_option() {
        let err = run("new a multiple A limit=x").unwrap_err();
        assert!(matches!(err, ScriptError::InvalidValue { what: "option", .. }));
    }
}
