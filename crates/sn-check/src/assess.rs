//! Orchestration of all categories for one student bot.

use serde::{Deserialize, Serialize};
use sn_core::{Bot, Move, PlayerPerspective};
use sn_trace::GameLog;
use tracing::info;

use crate::error::CheckError;
use crate::hook::Implementation;
use crate::verify::{
    Divergences, assess_actions_correctness, assess_conditions_correctness,
    assess_integration_correctness,
};

/// The decision procedures a student submits.
///
/// Conditions and actions are pure functions of the perspective. The
/// composite move of the bot comes from its [`Bot`] implementation.
pub trait Assignment: Bot {
    fn condition1(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> bool;
    fn condition2(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> bool;
    fn condition3(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> bool;

    fn action1(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move;
    fn action2(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move;
    fn action3(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move;
    fn action4(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move;
}

/// Divergences per category. The groups are kept apart so each broken
/// capability is visible on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// Conditions 1 to 3
    pub conditions: Vec<Divergences>,
    /// Actions 1 to 4
    pub actions: Vec<Divergences>,
    /// The complete bot
    pub integration: Vec<Divergences>,
}

impl Assessment {
    pub fn is_conformant(&self) -> bool {
        self.conditions
            .iter()
            .chain(&self.actions)
            .chain(&self.integration)
            .all(Vec::is_empty)
    }
}

/// Check every category of `bot` against the trace.
///
/// Order: conditions 1 to 3, action 1 gated by the condition 1 outcomes,
/// actions 2 to 4, then the complete bot.
pub fn assess_correctness<A: Assignment>(
    bot: &mut A,
    student_id: u64,
    log: &GameLog,
) -> Result<Assessment, CheckError> {
    let conditions = {
        let student: &A = bot;
        let implementations = [
            Implementation::new("condition1", |p: &PlayerPerspective, m| student.condition1(p, m)),
            Implementation::new("condition2", |p: &PlayerPerspective, m| student.condition2(p, m)),
            Implementation::new("condition3", |p: &PlayerPerspective, m| student.condition3(p, m)),
        ];
        implementations
            .iter()
            .zip(log.conditions())
            .map(|(implementation, games)| {
                assess_conditions_correctness(implementation, student_id, games)
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let actions = {
        let student: &A = bot;
        let implementations = [
            Implementation::new("action1", |p: &PlayerPerspective, m| student.action1(p, m)),
            Implementation::new("action2", |p: &PlayerPerspective, m| student.action2(p, m)),
            Implementation::new("action3", |p: &PlayerPerspective, m| student.action3(p, m)),
            Implementation::new("action4", |p: &PlayerPerspective, m| student.action4(p, m)),
        ];
        let mut actions = Vec::with_capacity(implementations.len());
        let groups = implementations.iter().zip(log.actions());
        for (index, (implementation, games)) in groups.enumerate() {
            // action 1 is only in scope where condition 1 was recorded true
            let gates = (index == 0).then_some(log.condition1.as_slice());
            actions.push(assess_actions_correctness(implementation, student_id, games, gates)?);
        }
        actions
    };

    let integration = vec![assess_integration_correctness(bot, student_id, &log.integration)?];

    let assessment = Assessment {
        conditions,
        actions,
        integration,
    };
    info!(student_id, conformant = assessment.is_conformant(), "assessment complete");
    Ok(assessment)
}
