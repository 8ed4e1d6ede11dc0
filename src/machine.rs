//! The tape machine and interpreter: drives a `(tape, head, current_state)`
//! triple forward one step at a time against a finalized [`Program`].

use crate::error::TurError;
use crate::program::{Action, Program};
use crate::sym::StateName;
use crate::tape::{Tape, BLANK};

/// A Turing machine: an owned tape plus the interpreter's view of where it
/// is in the program (`current_state = None` is the error-halt terminal
/// state; equality with the literal `halt` is the normal-halt terminal
/// state — both are checked by [`halted`]).
///
/// `head_position` is not duplicated as separate mutable state: it is always
/// read through [`Machine::head_position`], which delegates to the tape's
/// own offset, so the two can never drift out of sync.
pub struct Machine {
    tape: Tape,
    current_state: Option<StateName>,
}

impl Machine {
    /// Builds a machine from a finalized program and its bootstrap inputs.
    ///
    /// `inputs.len()` must equal `program.num_inputs()`. Each `inputs[i]` is
    /// laid down as `inputs[i]` copies of `'1'` followed by a single blank
    /// separator, advancing the head after every write; once all inputs are
    /// laid down the head is reset to its starting position.
    pub fn new(program: &Program, inputs: &[u64]) -> Result<Self, TurError> {
        if inputs.len() as u64 != program.num_inputs() {
            return Err(TurError::Arity {
                expected: program.num_inputs() as usize,
                got: inputs.len(),
            });
        }

        let mut tape = Tape::new();
        tape.mark_start();

        for &n in inputs {
            for _ in 0..n {
                tape.write(b'1');
                tape.move_right();
            }
            tape.write(BLANK);
            tape.move_right();
        }

        tape.reset_head();

        Ok(Machine {
            tape,
            current_state: Some(program.init_state().clone()),
        })
    }

    pub fn head_position(&self) -> i64 {
        self.tape.offset()
    }

    pub fn current_state(&self) -> Option<&StateName> {
        self.current_state.as_ref()
    }

    /// The byte at `head + offset`, without moving the head.
    pub fn peek(&self, offset: i64) -> u8 {
        self.tape.peek(offset)
    }

    pub fn read(&self) -> u8 {
        self.tape.read()
    }
}

/// True when the machine's current state is the error-halt marker or the
/// literal `halt` state (case-insensitive). Once true, [`step`] is a no-op.
pub fn halted(m: &Machine) -> bool {
    match &m.current_state {
        None => true,
        Some(state) => state.is_halt(),
    }
}

/// Performs one transition: read the cell under the head, look up the
/// action for `(current_state, cell)`, apply it, then replace the current
/// state with the clause's successor. A single step performs the action and
/// the state transition together; there is no externally observable
/// intermediate state between the two.
pub fn step(m: &mut Machine, p: &Program) {
    if halted(m) {
        return;
    }

    let state = m
        .current_state
        .clone()
        .expect("halted() returned false, current_state must be Some");

    let c = m.tape.read();
    let action = p.next_instruction(&state, c);

    match action {
        Action::MoveLeft => m.tape.move_left(),
        Action::MoveRight => m.tape.move_right(),
        Action::Print(b) => m.tape.write(b),
        Action::Error => {
            m.current_state = None;
            return;
        }
    }

    m.current_state = p.next_transition(&state, c);
}
