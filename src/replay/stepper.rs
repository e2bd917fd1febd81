//! Bidirectional cursor over the call-stack state of a trace.
//!
//! The stepper walks the event list on demand. Each forward step derives a
//! [`Command`] from the event and the current stack, applies it, and records
//! it. A backward step applies the recorded command's inverse, which restores
//! exactly the stack that existed before the matching forward step.
//!
//! The higher-level operations (`step_over`, `step_out`,
//! `step_until_location`, `seek`) are built only from the two primitive steps.

use super::command::{command_for_event, Command};
use super::stack::{Location, LocationStack};
use crate::parser::schema::Event;
use log::debug;

/// Replay cursor over a finite event sequence
#[derive(Debug, Clone)]
pub struct Stepper {
    events: Vec<Event>,
    /// One entry per applied event; None when the event left the stack alone
    history: Vec<Option<Command>>,
    locations: LocationStack,
    next_event_index: usize,
}

impl Stepper {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        let events: Vec<Event> = events.into_iter().collect();
        debug!("Stepper created over {} events", events.len());

        Self {
            history: Vec::with_capacity(events.len()),
            events,
            locations: LocationStack::new(),
            next_event_index: 0,
        }
    }

    pub fn at_first_step(&self) -> bool {
        self.next_event_index == 0
    }

    pub fn at_last_step(&self) -> bool {
        self.next_event_index == self.events.len()
    }

    /// Index of the next event to apply, in `0..=len()`
    pub fn position(&self) -> usize {
        self.next_event_index
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Current location stack
    pub fn locations(&self) -> &LocationStack {
        &self.locations
    }

    /// Number of open frames
    pub fn depth(&self) -> usize {
        self.locations.len()
    }

    /// Innermost current location
    pub fn current_location(&self) -> Option<&Location> {
        self.locations.top()
    }

    /// The most recently applied event
    pub fn current_event(&self) -> Option<&Event> {
        self.next_event_index
            .checked_sub(1)
            .and_then(|index| self.events.get(index))
    }

    /// Number of recorded (undoable) steps
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Apply the event at the cursor. Returns false at the end of the trace.
    pub fn step_forwards(&mut self) -> bool {
        let Some(event) = self.events.get(self.next_event_index) else {
            return false;
        };

        let command = command_for_event(&self.locations, event);
        if let Some(command) = &command {
            self.locations = command.apply(&self.locations);
        }
        self.history.push(command);
        self.next_event_index += 1;
        true
    }

    /// Undo the last applied event. Returns false at the start of the trace.
    pub fn step_backwards(&mut self) -> bool {
        let Some(command) = self.history.pop() else {
            return false;
        };

        if let Some(command) = command {
            self.locations = command.undo_command().apply(&self.locations);
        }
        self.next_event_index -= 1;
        true
    }

    /// Run forward until the depth drops below the depth at entry, or the trace ends
    pub fn step_out(&mut self) {
        let entry_depth = self.depth();
        while self.depth() >= entry_depth && self.step_forwards() {}
    }

    /// Take one step; if it entered a call, run until that call has returned
    pub fn step_over(&mut self) {
        let entry_depth = self.depth();
        self.step_forwards();
        if self.depth() > entry_depth {
            self.step_out();
        }
    }

    /// Run forward until the top of the stack is `location`, or the trace ends
    pub fn step_until_location(&mut self, location: &Location) {
        while self.current_location() != Some(location) && self.step_forwards() {}
    }

    /// Step forwards or backwards until the cursor sits at `index` (clamped to the trace)
    pub fn seek(&mut self, index: usize) {
        let target = index.min(self.events.len());
        while self.next_event_index < target && self.step_forwards() {}
        while self.next_event_index > target && self.step_backwards() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::EventHeader;
    use chrono::NaiveDateTime;

    fn header(file: &str, line: u32) -> EventHeader {
        EventHeader::new(NaiveDateTime::default(), file, line)
    }

    /// module line, call f, line in f, call g, line in g, return g, line in f, return f
    fn events() -> Vec<Event> {
        vec![
            Event::line(header("m.py", 1)),
            Event::call(header("m.py", 10), "f", None),
            Event::line(header("m.py", 11)),
            Event::call(header("g.py", 20), "g", None),
            Event::line(header("g.py", 21)),
            Event::ret(header("g.py", 21), "g", None),
            Event::line(header("m.py", 12)),
            Event::ret(header("m.py", 12), "f", None),
        ]
    }

    #[test]
    fn test_boundaries_are_noops() {
        let mut stepper = Stepper::new(events());
        assert!(!stepper.step_backwards());
        assert!(stepper.at_first_step());

        stepper.seek(usize::MAX);
        assert!(stepper.at_last_step());
        assert!(!stepper.step_forwards());
        assert_eq!(stepper.position(), 8);
    }

    #[test]
    fn test_forward_then_backward_restores_each_stack() {
        let mut stepper = Stepper::new(events());
        let mut snapshots = vec![stepper.locations().clone()];
        while stepper.step_forwards() {
            snapshots.push(stepper.locations().clone());
        }

        while let Some(expected) = snapshots.pop() {
            assert_eq!(stepper.locations(), &expected);
            stepper.step_backwards();
        }
        assert!(stepper.at_first_step());
        assert!(stepper.locations().is_empty());
    }

    #[test]
    fn test_step_over_skips_call_body() {
        let mut stepper = Stepper::new(events());
        stepper.seek(3);
        assert_eq!(stepper.current_location(), Some(&Location::new("m.py", 11)));

        stepper.step_over();

        // call g, line in g, return g all consumed
        assert_eq!(stepper.position(), 6);
        assert_eq!(stepper.depth(), 2);
    }

    #[test]
    fn test_step_out_and_until() {
        let mut stepper = Stepper::new(events());
        stepper.seek(5);
        assert_eq!(stepper.depth(), 3);

        stepper.step_out();
        assert_eq!(stepper.position(), 6);
        assert_eq!(stepper.depth(), 2);

        stepper.seek(0);
        stepper.step_until_location(&Location::new("g.py", 21));
        assert_eq!(stepper.position(), 5);

        stepper.step_until_location(&Location::new("nowhere.py", 1));
        assert!(stepper.at_last_step());
    }

    #[test]
    fn test_current_event_tracks_cursor() {
        let events = events();
        let mut stepper = Stepper::new(events.clone());
        assert_eq!(stepper.current_event(), None);

        stepper.step_forwards();
        stepper.step_forwards();
        assert_eq!(stepper.current_event(), Some(&events[1]));

        stepper.step_backwards();
        assert_eq!(stepper.current_event(), Some(&events[0]));

        stepper.seek(usize::MAX);
        assert_eq!(stepper.current_event(), Some(&events[7]));
    }

    #[test]
    fn test_unmatched_return_is_undoable() {
        let mut stepper = Stepper::new(vec![Event::ret(header("m.py", 1), "f", None)]);
        assert!(stepper.step_forwards());
        assert!(stepper.locations().is_empty());
        assert!(stepper.step_backwards());
        assert!(stepper.at_first_step());
    }
}
