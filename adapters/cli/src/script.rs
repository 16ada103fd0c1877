//! Parser for headless input scripts.
//!
//! A script is a list of `FRAME:ACTION` entries separated by commas or
//! whitespace, for example `0:space 30:web@600/200 90:flip`. Frames are
//! zero-based. Actions are `space`, `jump`, `flip`, `web@X/Y` (screen
//! pixels), `restart` and `quit`.

use dungeon_runner_core::{InputEvent, ScreenPoint};
use thiserror::Error;

/// Errors produced while parsing a script.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ScriptError {
    /// An entry did not contain the `:` separator.
    #[error("entry `{0}` is not of the form FRAME:ACTION")]
    MissingSeparator(String),
    /// The frame index was not a non-negative integer.
    #[error("invalid frame `{0}`")]
    InvalidFrame(String),
    /// The action name is unknown.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    /// The web target was not two numbers separated by `/`.
    #[error("invalid web target `{0}`, expected web@X/Y")]
    InvalidPointer(String),
}

/// Parses `source` into `(frame, input)` pairs in the order written.
pub(crate) fn parse(source: &str) -> Result<Vec<(u64, InputEvent)>, ScriptError> {
    source
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|entry| !entry.is_empty())
        .map(parse_entry)
        .collect()
}

fn parse_entry(entry: &str) -> Result<(u64, InputEvent), ScriptError> {
    let (frame, action) = entry
        .split_once(':')
        .ok_or_else(|| ScriptError::MissingSeparator(entry.to_owned()))?;
    let frame = frame
        .parse()
        .map_err(|_| ScriptError::InvalidFrame(frame.to_owned()))?;
    Ok((frame, parse_action(action)?))
}

fn parse_action(action: &str) -> Result<InputEvent, ScriptError> {
    if let Some(target) = action.strip_prefix("web@") {
        return parse_pointer(target).map(|pointer| InputEvent::ToggleWebAttach { pointer });
    }
    match action {
        "space" => Ok(InputEvent::ToggleWebOrJump),
        "jump" => Ok(InputEvent::Jump),
        "flip" => Ok(InputEvent::FlipDirection),
        "restart" => Ok(InputEvent::Restart),
        "quit" => Ok(InputEvent::Quit),
        other => Err(ScriptError::UnknownAction(other.to_owned())),
    }
}

fn parse_pointer(target: &str) -> Result<ScreenPoint, ScriptError> {
    let invalid = || ScriptError::InvalidPointer(target.to_owned());
    let (x, y) = target.split_once('/').ok_or_else(invalid)?;
    let x: f32 = x.parse().map_err(|_| invalid())?;
    let y: f32 = y.parse().map_err(|_| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }
    Ok(ScreenPoint::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_action() {
        let script = parse("0:space, 5:jump 9:flip\n12:web@600/200.5 40:restart,41:quit")
            .expect("script parses");
        assert_eq!(
            script,
            vec![
                (0, InputEvent::ToggleWebOrJump),
                (5, InputEvent::Jump),
                (9, InputEvent::FlipDirection),
                (
                    12,
                    InputEvent::ToggleWebAttach {
                        pointer: ScreenPoint::new(600.0, 200.5)
                    }
                ),
                (40, InputEvent::Restart),
                (41, InputEvent::Quit),
            ]
        );
    }

    #[test]
    fn empty_script_is_valid() {
        assert_eq!(parse("  ,, "), Ok(Vec::new()));
    }

    #[test]
    fn reports_the_offending_entry() {
        assert_eq!(
            parse("0:space jump"),
            Err(ScriptError::MissingSeparator("jump".to_owned()))
        );
        assert_eq!(
            parse("-3:jump"),
            Err(ScriptError::InvalidFrame("-3".to_owned()))
        );
        assert_eq!(
            parse("1:dance"),
            Err(ScriptError::UnknownAction("dance".to_owned()))
        );
        assert_eq!(
            parse("1:web@600"),
            Err(ScriptError::InvalidPointer("600".to_owned()))
        );
        assert_eq!(
            parse("1:web@nan/4"),
            Err(ScriptError::InvalidPointer("nan/4".to_owned()))
        );
    }
}
