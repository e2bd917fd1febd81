//! Invertible stack commands derived from events.

use super::stack::{Location, LocationStack};
use crate::parser::schema::{Event, EventKind};

/// One invertible transformation of a [`LocationStack`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enter a frame at `location`
    PushLocation(Location),
    /// Leave the frame at `location` (the current top)
    PopLocation(Location),
    /// Move the top frame from line `old` to line `new`
    ChangeLine { old: u32, new: u32 },
}

impl Command {
    /// Apply to a stack, returning the new stack
    ///
    /// Pop and line changes on an empty stack leave it unchanged; commands
    /// derived by [`command_for_event`] never hit that case.
    pub fn apply(&self, stack: &LocationStack) -> LocationStack {
        match self {
            Command::PushLocation(location) => stack.push(location.clone()),
            Command::PopLocation(_) => stack.pop().unwrap_or_else(|| stack.clone()),
            Command::ChangeLine { new, .. } => stack
                .top()
                .map(|top| Location::new(top.file.clone(), *new))
                .and_then(|moved| stack.replace_top(moved))
                .unwrap_or_else(|| stack.clone()),
        }
    }

    /// The command that reverses this one
    pub fn undo_command(&self) -> Command {
        match self {
            Command::PushLocation(location) => Command::PopLocation(location.clone()),
            Command::PopLocation(location) => Command::PushLocation(location.clone()),
            Command::ChangeLine { old, new } => Command::ChangeLine {
                old: *new,
                new: *old,
            },
        }
    }
}

/// Derive the command for `event` given the stack immediately before it
///
/// - call: push the call's location
/// - return/exception: pop the top location
/// - line on a non-empty stack: change the top's line
/// - line on an empty stack: push its location as a synthetic root frame
///
/// Returns None for a return/exception with no open frame; the event then
/// leaves the stack untouched.
pub fn command_for_event(stack: &LocationStack, event: &Event) -> Option<Command> {
    let location = || Location::new(event.file_name(), event.line_number());

    match event.kind() {
        EventKind::Call => Some(Command::PushLocation(location())),
        EventKind::Return | EventKind::Exception => {
            stack.top().map(|top| Command::PopLocation(top.clone()))
        }
        EventKind::Line => match stack.top() {
            Some(top) => Some(Command::ChangeLine {
                old: top.line,
                new: event.line_number(),
            }),
            None => Some(Command::PushLocation(location())),
        },
    }
}
