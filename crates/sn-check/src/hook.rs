//! Intercepting move requesters.
//!
//! A hook is installed as the engine's [`MoveRequester`]. It sees every
//! decision point, compares the implementation under test with the recorded
//! outcome, and decides which move the engine continues with.

use core::fmt;

use sn_core::{BotState, Move, MoveRequester, PlayerPerspective, Seat, SimpleMoveRequester};

use crate::guard::invoke_guarded;

/// Index cursor over a recorded sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<T> {
    values: Vec<T>,
    position: usize,
}

impl<T: Clone> Cursor<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    /// Next value, `None` once the sequence is exhausted. Always advances.
    pub fn next_value(&mut self) -> Option<T> {
        let value = self.values.get(self.position).cloned();
        self.position += 1;
        value
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Values not consumed yet
    pub fn remaining(&self) -> usize {
        self.values.len().saturating_sub(self.position)
    }
}

/// A decision procedure under test, with the name used in reports.
pub struct Implementation<'f, T> {
    name: String,
    fun: Box<dyn Fn(&PlayerPerspective, Option<Move>) -> T + 'f>,
}

impl<'f, T> Implementation<'f, T> {
    pub fn new(
        name: impl Into<String>,
        fun: impl Fn(&PlayerPerspective, Option<Move>) -> T + 'f,
    ) -> Self {
        Self {
            name: name.into(),
            fun: Box::new(fun),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> T {
        (self.fun)(perspective, leader_move)
    }
}

impl<T> fmt::Debug for Implementation<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation").field("name", &self.name).finish()
    }
}

/// Hook for conditions and actions.
///
/// The move fed back to the engine always comes from the seat's own policy,
/// so a wrong answer never changes the course of the game and every later
/// decision point still matches the recorded run.
#[derive(Debug)]
pub struct CheckingRequester<'h, T> {
    implementation: &'h Implementation<'h, T>,
    expected: Cursor<T>,
    /// `None` compares at every decision point
    gate: Option<Cursor<bool>>,
    delegate: SimpleMoveRequester,
    errors: Vec<String>,
    decision_points: usize,
    invocations: usize,
}

impl<'h, T> CheckingRequester<'h, T>
where
    T: Clone + PartialEq + fmt::Display,
{
    pub fn new(
        implementation: &'h Implementation<'h, T>,
        expected: Vec<T>,
        gate: Option<Vec<bool>>,
    ) -> Self {
        Self {
            implementation,
            expected: Cursor::new(expected),
            gate: gate.map(Cursor::new),
            delegate: SimpleMoveRequester,
            errors: Vec::new(),
            decision_points: 0,
            invocations: 0,
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Decision points seen so far
    pub fn decision_points(&self) -> usize {
        self.decision_points
    }

    /// Times the implementation under test was called
    pub fn invocations(&self) -> usize {
        self.invocations
    }

    /// Recorded outcomes left over after the game
    pub fn unconsumed_outcomes(&self) -> usize {
        self.expected.remaining()
    }

    fn in_scope(&mut self) -> bool {
        match self.gate.as_mut() {
            None => true,
            // a gate shorter than the game leaves the tail out of scope
            Some(gate) => gate.next_value().unwrap_or(false),
        }
    }

    fn compare(&mut self, perspective: &PlayerPerspective, leader_move: Option<Move>) {
        let implementation = self.implementation;
        self.invocations += 1;

        match invoke_guarded(|| implementation.call(perspective, leader_move)) {
            // a failed call consumes no recorded outcome
            Err(message) => self.errors.push(format!(
                "An exception was raised from {} with message: {}",
                implementation.name(),
                message
            )),
            Ok(outcome) => match self.expected.next_value() {
                None => self.errors.push(format!(
                    "The recorded trace for {} ended early. For input {}, no outcome was recorded, but got {}.",
                    implementation.name(),
                    perspective,
                    outcome
                )),
                Some(expected) if expected != outcome => self.errors.push(format!(
                    "Something is wrong with {}. For input {}, {} was expected, but got {}.",
                    implementation.name(),
                    perspective,
                    expected,
                    outcome
                )),
                Some(_) => {}
            },
        }
    }
}

impl<T> MoveRequester for CheckingRequester<'_, T>
where
    T: Clone + PartialEq + fmt::Display,
{
    fn get_move(
        &mut self,
        bot: &mut BotState<'_>,
        perspective: &PlayerPerspective,
        leader_move: Option<Move>,
    ) -> Move {
        self.decision_points += 1;
        if self.in_scope() {
            self.compare(perspective, leader_move);
        }
        self.delegate.get_move(bot, perspective, leader_move)
    }
}

/// Hook for the complete student bot.
///
/// Only decision points of `student_seat` are checked. When the bot fails or
/// deviates, the recorded move is played instead so the game stays on the
/// recorded track.
#[derive(Debug)]
pub struct IntegrationCheckingRequester {
    student_seat: Seat,
    expected: Cursor<Move>,
    errors: Vec<String>,
    checked: usize,
}

impl IntegrationCheckingRequester {
    pub fn new(student_seat: Seat, expected: Vec<Move>) -> Self {
        Self {
            student_seat,
            expected: Cursor::new(expected),
            errors: Vec::new(),
            checked: 0,
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Decision points of the student seat seen so far
    pub fn checked(&self) -> usize {
        self.checked
    }

    pub fn unconsumed_outcomes(&self) -> usize {
        self.expected.remaining()
    }
}

impl MoveRequester for IntegrationCheckingRequester {
    fn get_move(
        &mut self,
        bot: &mut BotState<'_>,
        perspective: &PlayerPerspective,
        leader_move: Option<Move>,
    ) -> Move {
        let expected = self.expected.next_value();
        if bot.seat != self.student_seat {
            return bot.implementation.get_move(perspective, leader_move);
        }

        self.checked += 1;
        let played = invoke_guarded(|| bot.implementation.get_move(perspective, leader_move));

        let Some(expected) = expected else {
            self.errors.push(format!(
                "The recorded trace ended early. For input {perspective}, no move was recorded."
            ));
            return match played {
                Ok(mv) => mv,
                Err(message) => {
                    self.errors.push(format!(
                        "An exception was raised your bot with message: {message}"
                    ));
                    perspective.valid_moves()[0]
                }
            };
        };

        match played {
            Err(message) => {
                self.errors.push(format!(
                    "An exception was raised your bot with message: {message}"
                ));
                expected
            }
            Ok(mv) if mv != expected => {
                self.errors.push(format!(
                    "Bot played a wrong move. For input {perspective}, {expected} was expected, but got {mv}."
                ));
                expected
            }
            Ok(mv) => mv,
        }
    }
}
