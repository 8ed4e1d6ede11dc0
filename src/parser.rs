//! A hand-written recursive-descent lexer and parser for the Turing machine
//! program DSL described in the grammar below. No parser-generator is used:
//! the core's purpose is explicitly "a deterministic recursive-descent
//! translator", so the whole source is tokenized once and then walked with
//! ordinary recursive functions over an index cursor.
//!
//! ```text
//! PROGRAM ::= HEADER DEFINITION+
//! HEADER  ::= NAME_DECL INPUTS_DECL INIT_DECL        (in any order, each at most once)
//! NAME_DECL   ::= "name"   ":" IDEN "."
//! INPUTS_DECL ::= "inputs" ":" NUMBER "."
//! INIT_DECL   ::= "init"   ":" IDEN "."
//! DEFINITION  ::= IDEN ":" CLAUSE+
//! CLAUSE      ::= SYMBOL "->" ACTION "," IDEN "."
//! ACTION      ::= "left" | "right" | SYMBOL
//! SYMBOL      ::= single-character-token | "blank"
//! NUMBER      ::= [0-9]+
//! ```
//!
//! Clauses within a state are parsed in two passes: a structural counting
//! pass determines how many clauses follow (so the clause `Vec` is sized up
//! front rather than grown one push at a time), then a second pass builds
//! each clause in order.

use crate::error::TurError;
use crate::program::{Clause, ClauseAction, ProgramBuilder};
use crate::sym::StateName;
use crate::tape::BLANK;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tok {
    Iden(String),
    Colon,
    Dot,
    Comma,
    Arrow,
    Char(u8),
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    line: usize,
}

fn parse_err(line: usize, message: impl Into<String>) -> TurError {
    TurError::Parse {
        line,
        message: message.into(),
    }
}

/// Splits `src` into a flat token stream, tracking line numbers. Both `\r`
/// and `\n` each advance the line counter by one, per the grammar's
/// whitespace rule.
fn lex(src: &str) -> Result<Vec<Token>, TurError> {
    let bytes = src.as_bytes();
    let mut i = 0;
    let mut line = 1usize;
    let mut tokens = Vec::new();

    while i < bytes.len() {
        let c = bytes[i];

        match c {
            b' ' | b'\t' => {
                i += 1;
            }
            b'\r' | b'\n' => {
                line += 1;
                i += 1;
            }
            b':' => {
                tokens.push(Token { tok: Tok::Colon, line });
                i += 1;
            }
            b'.' => {
                tokens.push(Token { tok: Tok::Dot, line });
                i += 1;
            }
            b',' => {
                tokens.push(Token { tok: Tok::Comma, line });
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'>') => {
                tokens.push(Token { tok: Tok::Arrow, line });
                i += 2;
            }
            b if b.is_ascii_alphanumeric() => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let word = std::str::from_utf8(&bytes[start..i])
                    .expect("ASCII-alphanumeric run is valid UTF-8")
                    .to_string();
                tokens.push(Token { tok: Tok::Iden(word), line });
            }
            b if b.is_ascii() => {
                tokens.push(Token { tok: Tok::Char(b), line });
                i += 1;
            }
            _ => return Err(parse_err(line, "unexpected non-ASCII byte in source")),
        }
    }

    Ok(tokens)
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

const HEADER_KEYWORDS: [&str; 3] = ["name", "inputs", "init"];

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn bump(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, want: &Tok, what: &str) -> Result<(), TurError> {
        match self.peek() {
            Some(t) if &t.tok == want => {
                self.pos += 1;
                Ok(())
            }
            Some(t) => Err(parse_err(t.line, format!("expected {what}"))),
            None => Err(parse_err(self.line(), format!("expected {what}, found end of input"))),
        }
    }

    fn parse_iden(&mut self) -> Result<(String, usize), TurError> {
        match self.peek() {
            Some(Token { tok: Tok::Iden(s), line }) => {
                let (s, line) = (s.clone(), *line);
                self.pos += 1;
                Ok((s, line))
            }
            Some(t) => Err(parse_err(t.line, "expected an identifier")),
            None => Err(parse_err(self.line(), "expected an identifier, found end of input")),
        }
    }

    fn parse_number(&mut self) -> Result<i64, TurError> {
        let (s, line) = self.parse_iden()?;
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(parse_err(line, format!("'{s}' is not a valid number")));
        }
        s.parse::<i64>()
            .map_err(|_| parse_err(line, format!("'{s}' is out of range")))
    }

    /// One `SYMBOL`: either a single non-alphanumeric character token, or an
    /// identifier token that is exactly `blank` (any case) or exactly one
    /// character long. Any other multi-character identifier is fatal.
    fn parse_symbol_byte(&mut self) -> Result<u8, TurError> {
        let line = self.line();
        match self.bump().cloned() {
            Some(Token { tok: Tok::Char(b), .. }) => Ok(b),
            Some(Token { tok: Tok::Iden(s), line }) => {
                if s.eq_ignore_ascii_case("blank") {
                    Ok(BLANK)
                } else if s.len() == 1 {
                    Ok(s.as_bytes()[0])
                } else {
                    Err(parse_err(
                        line,
                        format!("'{s}' is not a valid symbol (expected a single character or 'blank')"),
                    ))
                }
            }
            Some(t) => Err(parse_err(t.line, "expected a symbol")),
            None => Err(parse_err(line, "expected a symbol, found end of input")),
        }
    }

    fn peek_iden_matches(&self, keyword: &str) -> bool {
        matches!(&self.peek().map(|t| &t.tok), Some(Tok::Iden(s)) if s.eq_ignore_ascii_case(keyword))
    }

    /// `ACTION ::= "left" | "right" | SYMBOL`. Guards against the reserved
    /// `INVOCATION` form (`IDEN.IDEN(ARGLIST?)`), which lexes as an
    /// identifier followed by a stray `.` where a `,` is expected.
    fn parse_action(&mut self) -> Result<ClauseAction, TurError> {
        if self.peek_iden_matches("left") {
            self.bump();
            return Ok(ClauseAction::MoveLeft);
        }
        if self.peek_iden_matches("right") {
            self.bump();
            return Ok(ClauseAction::MoveRight);
        }

        let byte = self.parse_symbol_byte()?;
        if matches!(self.peek().map(|t| &t.tok), Some(Tok::Dot)) {
            return Err(parse_err(
                self.line(),
                "the 'IDEN.IDEN(...)' invocation form is reserved and not supported",
            ));
        }
        Ok(ClauseAction::Print(byte))
    }

    /// True if a `DEFINITION` (not a `CLAUSE`) starts at `pos`: an
    /// identifier immediately followed by `:`.
    fn starts_definition(&self, pos: usize) -> bool {
        matches!(self.tokens.get(pos).map(|t| &t.tok), Some(Tok::Iden(_)))
            && matches!(self.tokens.get(pos + 1).map(|t| &t.tok), Some(Tok::Colon))
    }

    /// Structurally skips over one `CLAUSE` starting at `pos`, without
    /// building a value, returning the position just past it. Used by the
    /// counting pass.
    fn skip_one_clause(&self, mut pos: usize) -> Result<usize, TurError> {
        let line_at = |p: usize| self.tokens.get(p).map(|t| t.line).unwrap_or(self.line());

        let mut expect_one = |pos: &mut usize, what: &str, matcher: &dyn Fn(&Tok) -> bool| -> Result<(), TurError> {
            match self.tokens.get(*pos) {
                Some(t) if matcher(&t.tok) => {
                    *pos += 1;
                    Ok(())
                }
                Some(t) => Err(parse_err(t.line, format!("expected {what}"))),
                None => Err(parse_err(line_at(*pos), format!("expected {what}, found end of input"))),
            }
        };

        // SYMBOL
        expect_one(&mut pos, "a symbol", &|t| matches!(t, Tok::Iden(_) | Tok::Char(_)))?;
        // "->"
        expect_one(&mut pos, "'->'", &|t| matches!(t, Tok::Arrow))?;
        // ACTION (always exactly one token: keyword, symbol char, or symbol identifier)
        expect_one(&mut pos, "an action", &|t| matches!(t, Tok::Iden(_) | Tok::Char(_)))?;
        // A stray '.' here instead of ',' is the reserved invocation form
        // ('IDEN.IDEN(...)') leaking through the single-token ACTION slot.
        if matches!(self.tokens.get(pos).map(|t| &t.tok), Some(Tok::Dot)) {
            return Err(parse_err(
                line_at(pos),
                "the 'IDEN.IDEN(...)' invocation form is reserved and not supported",
            ));
        }
        // ","
        expect_one(&mut pos, "','", &|t| matches!(t, Tok::Comma))?;
        // successor IDEN
        expect_one(&mut pos, "a successor state name", &|t| matches!(t, Tok::Iden(_)))?;
        // "."
        expect_one(&mut pos, "'.'", &|t| matches!(t, Tok::Dot))?;

        Ok(pos)
    }

    fn count_clauses(&self) -> Result<usize, TurError> {
        let mut pos = self.pos;
        let mut count = 0;
        while pos < self.tokens.len() && !self.starts_definition(pos) {
            pos = self.skip_one_clause(pos)?;
            count += 1;
        }
        Ok(count)
    }

    fn parse_one_clause(&mut self) -> Result<Clause, TurError> {
        let input = self.parse_symbol_byte()?;
        self.expect(&Tok::Arrow, "'->'")?;
        let action = self.parse_action()?;
        self.expect(&Tok::Comma, "','")?;
        let (successor, _) = self.parse_iden()?;
        self.expect(&Tok::Dot, "'.'")?;
        Ok(Clause {
            input,
            action,
            successor: StateName::from(successor),
        })
    }

    fn parse_clauses(&mut self) -> Result<Vec<Clause>, TurError> {
        let count = self.count_clauses()?;
        if count == 0 {
            return Err(parse_err(self.line(), "state has no clauses"));
        }
        let mut clauses = Vec::with_capacity(count);
        for _ in 0..count {
            clauses.push(self.parse_one_clause()?);
        }
        Ok(clauses)
    }

    fn parse_definition(&mut self, builder: &mut ProgramBuilder) -> Result<(), TurError> {
        let (name, line) = self.parse_iden()?;
        self.expect(&Tok::Colon, "':'")?;
        let clauses = self.parse_clauses()?;
        builder
            .add_state(StateName::from(name), clauses)
            .map_err(|message| parse_err(line, message))
    }

    fn parse_header(&mut self, builder: &mut ProgramBuilder) -> Result<(), TurError> {
        let mut seen = [false; 3];

        loop {
            let keyword = match self.peek() {
                Some(Token { tok: Tok::Iden(s), .. }) => {
                    HEADER_KEYWORDS.iter().position(|k| s.eq_ignore_ascii_case(k))
                }
                _ => None,
            };
            let Some(idx) = keyword else { break };
            let line = self.line();

            if seen[idx] {
                return Err(parse_err(line, format!("duplicate '{}' declaration", HEADER_KEYWORDS[idx])));
            }
            seen[idx] = true;
            self.bump();
            self.expect(&Tok::Colon, "':'")?;

            match HEADER_KEYWORDS[idx] {
                "name" => {
                    let (name, _) = self.parse_iden()?;
                    self.expect(&Tok::Dot, "'.'")?;
                    builder.set_name(name);
                }
                "inputs" => {
                    let n = self.parse_number()?;
                    self.expect(&Tok::Dot, "'.'")?;
                    if n < 0 {
                        return Err(parse_err(line, format!("input count must be non-negative, got {n}")));
                    }
                    builder.set_num_inputs(n);
                }
                "init" => {
                    let (name, _) = self.parse_iden()?;
                    self.expect(&Tok::Dot, "'.'")?;
                    builder.set_init_state(StateName::from(name));
                }
                _ => unreachable!(),
            }
        }

        for (idx, keyword) in HEADER_KEYWORDS.iter().enumerate() {
            if !seen[idx] {
                return Err(parse_err(self.line(), format!("missing '{keyword}' declaration")));
            }
        }

        Ok(())
    }
}

/// Parses `input` into a finalized [`crate::program::Program`], or returns
/// the first fatal parse/finalization error encountered.
pub fn parse(input: &str) -> Result<crate::program::Program, TurError> {
    let tokens = lex(input)?;
    let mut cursor = Cursor::new(&tokens);
    let mut builder = ProgramBuilder::new();

    cursor.parse_header(&mut builder)?;

    if cursor.pos >= tokens.len() {
        return Err(parse_err(cursor.line(), "expected at least one state definition"));
    }
    while cursor.pos < tokens.len() {
        cursor.parse_definition(&mut builder)?;
    }

    builder.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCREMENT: &str = "
name: Increment.
inputs: 1.
init: scan.
scan:
  1 -> right, scan.
  blank -> 1, halt.
";

    #[test]
    fn parses_minimal_well_formed_example() {
        let program = parse(INCREMENT).unwrap();
        assert_eq!(program.name(), "Increment");
        assert_eq!(program.num_inputs(), 1);
        assert_eq!(program.init_state().as_str(), "scan");
        assert_eq!(program.num_states(), 1);
    }

    #[test]
    fn header_declarations_may_appear_in_any_order() {
        let src = "
init: scan.
inputs: 0.
name: Reordered.
scan:
  blank -> halt, halt.
";
        let program = parse(src).unwrap();
        assert_eq!(program.name(), "Reordered");
    }

    #[test]
    fn rejects_duplicate_header_declaration() {
        let src = "
name: A.
name: B.
inputs: 0.
init: scan.
scan:
  blank -> right, halt.
";
        let err = parse(src).unwrap_err();
        match err {
            TurError::Parse { message, .. } => assert!(message.contains("duplicate 'name'")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_declaration() {
        let src = "
name: A.
inputs: 0.
scan:
  blank -> right, halt.
";
        assert!(matches!(parse(src), Err(TurError::Parse { .. })));
    }

    #[test]
    fn rejects_empty_state_body() {
        let src = "
name: A.
inputs: 0.
init: scan.
scan:
";
        let err = parse(src).unwrap_err();
        match err {
            TurError::Parse { message, .. } => assert!(message.contains("no clauses")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_input_count() {
        let src = "
name: A.
inputs: -1.
init: scan.
scan:
  blank -> right, halt.
";
        assert!(parse(src).is_err());
    }

    #[test]
    fn rejects_multi_character_symbol() {
        let src = "
name: A.
inputs: 0.
init: scan.
scan:
  ab -> right, halt.
";
        let err = parse(src).unwrap_err();
        match err {
            TurError::Parse { message, .. } => assert!(message.contains("not a valid symbol")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invocation_form() {
        let src = "
name: A.
inputs: 0.
init: scan.
scan:
  1 -> foo.bar, halt.
";
        let err = parse(src).unwrap_err();
        match err {
            TurError::Parse { message, .. } => assert!(message.contains("invocation")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn state_names_are_case_insensitive_at_lookup() {
        let src = "
name: A.
inputs: 0.
init: SCAN.
scan:
  blank -> right, halt.
";
        let program = parse(src).unwrap();
        assert!(program.is_state_defined(&StateName::from("Scan")));
    }

    #[test]
    fn blank_keyword_resolves_to_blank_byte() {
        let program = parse(INCREMENT).unwrap();
        let scan = StateName::from("scan");
        assert_eq!(
            program.next_instruction(&scan, BLANK),
            crate::program::Action::Print(b'1')
        );
    }

    #[test]
    fn reports_line_number_of_failure() {
        let src = "name: A.\ninputs: 0.\ninit: scan.\nscan:\n  ab -> right, halt.\n";
        match parse(src) {
            Err(TurError::Parse { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected a line-tagged Parse error, got {other:?}"),
        }
    }

    #[test]
    fn two_pass_clause_counting_handles_multiple_clauses() {
        let src = "
name: Multi.
inputs: 0.
init: scan.
scan:
  1 -> right, scan.
  2 -> left, scan.
  blank -> halt, halt.
next:
  1 -> 1, halt.
";
        let program = parse(src).unwrap();
        assert_eq!(program.num_states(), 2);
        let scan = StateName::from("scan");
        assert_eq!(program.next_transition(&scan, b'2'), Some(StateName::from("scan")));
    }
}
