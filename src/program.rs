//! The program model: a finite, immutable set of named states, each carrying
//! an ordered list of input-conditioned clauses. Split into [`ProgramBuilder`]
//! (building phase) and [`Program`] (finalized, read-only phase); the two
//! are distinct types so that "modifying a finalized program" and "finalizing
//! twice" are compile-time impossibilities rather than runtime panics — see
//! `DESIGN.md` for why this is the idiomatic Rust rendition of the builder
//! contract in the core spec.

use std::collections::HashMap;

use crate::error::TurError;
use crate::sym::StateName;
use crate::tape::BLANK;

/// One primitive action a clause may dictate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Print(u8),
    /// Produced only by the interpreter when no clause matches; never
    /// constructed by the parser.
    Error,
}

/// One `(input, action, successor)` rule inside a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub input: u8,
    pub action: ClauseAction,
    pub successor: StateName,
}

/// The action half of a clause, restricted to the three actions a clause can
/// actually name in source (`Error` is interpreter-only and has no surface
/// syntax).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseAction {
    MoveLeft,
    MoveRight,
    Print(u8),
}

impl From<ClauseAction> for Action {
    fn from(a: ClauseAction) -> Action {
        match a {
            ClauseAction::MoveLeft => Action::MoveLeft,
            ClauseAction::MoveRight => Action::MoveRight,
            ClauseAction::Print(b) => Action::Print(b),
        }
    }
}

/// A program under construction. Each setter may be called in any order;
/// `add_state` rejects a duplicate name or an empty clause list.
/// `finalize()` consumes the builder, so there is no way to call a setter
/// after finalizing — the "builder misuse" category of the core error model
/// is ruled out by ownership rather than checked at runtime.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    name: Option<String>,
    num_inputs: Option<i64>,
    init_state: Option<StateName>,
    states: HashMap<StateName, Vec<Clause>>,
    order: Vec<StateName>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        ProgramBuilder::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn set_num_inputs(&mut self, n: i64) {
        self.num_inputs = Some(n);
    }

    pub fn set_init_state(&mut self, name: StateName) {
        self.init_state = Some(name);
    }

    /// Adds a state with its ordered clause list. Fails if the name was
    /// already added or the clause list is empty.
    pub fn add_state(&mut self, name: StateName, clauses: Vec<Clause>) -> Result<(), String> {
        if clauses.is_empty() {
            return Err(format!("state '{name}' has no clauses"));
        }
        if self.states.contains_key(&name) {
            return Err(format!("duplicate state '{name}'"));
        }
        self.order.push(name.clone());
        self.states.insert(name, clauses);
        Ok(())
    }

    /// Validates the invariants in the core data model and, on success,
    /// produces an immutable [`Program`].
    pub fn finalize(self) -> Result<Program, TurError> {
        let name = self
            .name
            .ok_or_else(|| TurError::Finalize("missing 'name' declaration".into()))?;
        let num_inputs = self
            .num_inputs
            .ok_or_else(|| TurError::Finalize("missing 'inputs' declaration".into()))?;
        let init_state = self
            .init_state
            .ok_or_else(|| TurError::Finalize("missing 'init' declaration".into()))?;

        if num_inputs < 0 {
            return Err(TurError::Finalize(format!(
                "input count must be non-negative, got {num_inputs}"
            )));
        }

        if self.states.is_empty() {
            return Err(TurError::Finalize("program has no states".into()));
        }

        if !self.states.contains_key(&init_state) {
            return Err(TurError::Finalize(format!(
                "initial state '{init_state}' is not a declared state"
            )));
        }

        // Every state added via add_state already has >= 1 clause; this is
        // a defense against future internal misuse of the builder, not a
        // reachable user-facing error.
        for (name, clauses) in &self.states {
            if clauses.is_empty() {
                return Err(TurError::Finalize(format!("state '{name}' has no clauses")));
            }
        }

        Ok(Program {
            name,
            num_inputs: num_inputs as u64,
            init_state,
            states: self.states,
        })
    }
}

/// A finalized, immutable Turing machine program.
#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    num_inputs: u64,
    init_state: StateName,
    states: HashMap<StateName, Vec<Clause>>,
}

impl Program {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn init_state(&self) -> &StateName {
        &self.init_state
    }

    pub fn num_inputs(&self) -> u64 {
        self.num_inputs
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn is_state_defined(&self, name: &StateName) -> bool {
        self.states.contains_key(name)
    }

    /// The ordered clause list declared for `state`, or `None` if unknown.
    ///
    /// Not part of the core accessor contract in the spec (which only
    /// requires the two lookup operations below); exists purely so a viewer
    /// can list "available rules" for display without re-deriving the
    /// clause table.
    pub fn clauses(&self, state: &StateName) -> Option<&[Clause]> {
        self.states.get(state).map(Vec::as_slice)
    }

    fn find_clause(&self, state: &StateName, input: u8) -> Option<&Clause> {
        self.states
            .get(state)?
            .iter()
            .find(|clause| clause.input == input)
    }

    /// Locates the clause list for `state` and returns the action of the
    /// first clause whose input matches `input`. `Error` if the state is
    /// unknown or no clause matches.
    pub fn next_instruction(&self, state: &StateName, input: u8) -> Action {
        match self.find_clause(state, input) {
            Some(clause) => clause.action.into(),
            None => Action::Error,
        }
    }

    /// Same lookup as [`Program::next_instruction`]; returns the clause's
    /// successor state, or `None` under the same unknown-state/no-match
    /// conditions.
    pub fn next_transition(&self, state: &StateName, input: u8) -> Option<StateName> {
        self.find_clause(state, input)
            .map(|clause| clause.successor.clone())
    }
}

/// Resolves the literal `blank` keyword to the tape's blank byte; used by
/// the parser when building clause inputs/outputs.
pub fn resolve_blank_byte(is_blank_keyword: bool, literal: u8) -> u8 {
    if is_blank_keyword {
        BLANK
    } else {
        literal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_clause(input: u8, action: ClauseAction, successor: &str) -> Clause {
        Clause {
            input,
            action,
            successor: StateName::from(successor),
        }
    }

    #[test]
    fn finalize_rejects_unknown_init_state() {
        let mut b = ProgramBuilder::new();
        b.set_name("p");
        b.set_num_inputs(0);
        b.set_init_state(StateName::from("scan"));
        b.add_state(
            StateName::from("other"),
            vec![simple_clause(b'1', ClauseAction::MoveRight, "halt")],
        )
        .unwrap();

        assert!(matches!(b.finalize(), Err(TurError::Finalize(_))));
    }

    #[test]
    fn finalize_rejects_zero_states() {
        let mut b = ProgramBuilder::new();
        b.set_name("p");
        b.set_num_inputs(0);
        b.set_init_state(StateName::from("scan"));

        assert!(matches!(b.finalize(), Err(TurError::Finalize(_))));
    }

    #[test]
    fn add_state_rejects_duplicate_and_empty() {
        let mut b = ProgramBuilder::new();
        b.add_state(
            StateName::from("scan"),
            vec![simple_clause(b'1', ClauseAction::MoveRight, "halt")],
        )
        .unwrap();

        assert!(b.add_state(StateName::from("scan"), vec![]).is_err());
        assert!(b
            .add_state(StateName::from("SCAN"), vec![simple_clause(b'1', ClauseAction::MoveRight, "halt")])
            .is_err());
    }

    #[test]
    fn lookup_consistency_on_match_and_miss() {
        let mut b = ProgramBuilder::new();
        b.set_name("p");
        b.set_num_inputs(0);
        b.set_init_state(StateName::from("scan"));
        b.add_state(
            StateName::from("scan"),
            vec![simple_clause(b'1', ClauseAction::MoveRight, "scan")],
        )
        .unwrap();
        let program = b.finalize().unwrap();

        let state = StateName::from("scan");
        assert_eq!(program.next_instruction(&state, b'1'), Action::MoveRight);
        assert_eq!(
            program.next_transition(&state, b'1'),
            Some(StateName::from("scan"))
        );

        assert_eq!(program.next_instruction(&state, b'9'), Action::Error);
        assert_eq!(program.next_transition(&state, b'9'), None);
    }

    #[test]
    fn clauses_lists_the_declared_state_body() {
        let mut b = ProgramBuilder::new();
        b.set_name("p");
        b.set_num_inputs(0);
        b.set_init_state(StateName::from("scan"));
        b.add_state(
            StateName::from("scan"),
            vec![
                simple_clause(b'1', ClauseAction::MoveRight, "scan"),
                simple_clause(BLANK, ClauseAction::Print(b'1'), "halt"),
            ],
        )
        .unwrap();
        let program = b.finalize().unwrap();

        let clauses = program.clauses(&StateName::from("scan")).unwrap();
        assert_eq!(clauses.len(), 2);
        assert!(program.clauses(&StateName::from("nowhere")).is_none());
    }

    #[test]
    fn state_name_lookup_is_case_insensitive() {
        let mut b = ProgramBuilder::new();
        b.set_name("p");
        b.set_num_inputs(0);
        b.set_init_state(StateName::from("Scan"));
        b.add_state(
            StateName::from("Scan"),
            vec![simple_clause(b'1', ClauseAction::MoveRight, "halt")],
        )
        .unwrap();
        let program = b.finalize().unwrap();

        assert!(program.is_state_defined(&StateName::from("SCAN")));
    }
}
