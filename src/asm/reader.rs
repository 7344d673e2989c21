//! Reading an assembly listing back into instructions.
use thiserror::Error;

use crate::{error::LineError, tables::Line};

use super::{Instruction, Opcode, Word};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unknown mnemonic '{0}'")]
    UnknownMnemonic(String),
    #[error("'{mnemonic}' takes {expected} operand(s), but {found} were given")]
    Arity {
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid operand '{0}'")]
    InvalidOperand(String),
}

/// An error encountered while reading an assembly listing.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{kind}")]
pub struct ParseError {
    kind: ParseErrorKind,
    line: Line,
}
impl ParseError {
    pub fn new(kind: ParseErrorKind, line: Line) -> Self {
        Self { kind, line }
    }
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}
impl LineError for ParseError {
    fn line(&self) -> Line {
        self.line
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

/// Read a textual assembly listing. Each non-empty line holds one instruction
/// as `MNEMONIC op1 [op2 [op3]]`; blank lines and lines starting with `#` are
/// skipped. Line numbers in errors are 1-based.
pub fn parse_assembly(source: &str) -> Result<Vec<Instruction>, ParseError> {
    source
        .lines()
        .enumerate()
        .map(|(idx, text)| (idx + 1, text.trim()))
        .filter(|(_, text)| !text.is_empty() && !text.starts_with('#'))
        .map(|(line, text)| parse_line(text).map_err(|kind| ParseError::new(kind, line)))
        .collect()
}

fn parse_line(text: &str) -> Result<Instruction, ParseErrorKind> {
    let mut fields = text.split_whitespace();
    let mnemonic = fields.next().unwrap_or_default();
    let opcode = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| ParseErrorKind::UnknownMnemonic(mnemonic.to_string()))?;

    let operands = fields
        .map(|field| {
            field
                .parse::<Word>()
                .map_err(|_| ParseErrorKind::InvalidOperand(field.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if operands.len() != opcode.arity() {
        return Err(ParseErrorKind::Arity {
            mnemonic: opcode.mnemonic(),
            expected: opcode.arity(),
            found: operands.len(),
        });
    }

    Ok(Instruction::from_operands(opcode, &operands))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_parse_fails(source: &str, line: Line, kind: ParseErrorKind) {
        match parse_assembly(source) {
            Ok(instrs) => panic!("Expected reader to fail, but it produced: {instrs:#?}"),
            Err(err) => {
                assert_eq!(line, err.line());
                assert_eq!(&kind, err.kind());
            }
        }
    }

    #[test]
    fn reads_one_instruction_per_line() {
        let instrs = parse_assembly("AFC 0 -1\nJMP 5\nADD 2 0 1\nNOP\n").unwrap();

        assert_eq!(
            vec![
                Instruction::binary(Opcode::Afc, 0, -1),
                Instruction::unary(Opcode::Jmp, 5),
                Instruction::new(Opcode::Add, 2, 0, 1),
                Instruction::nullary(Opcode::Nop),
            ],
            instrs
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let instrs = parse_assembly("# header\n\n  PRI 3  \n").unwrap();

        assert_eq!(vec![Instruction::unary(Opcode::Print, 3)], instrs);
    }

    #[test]
    fn rejects_unknown_mnemonic() {
        assert_parse_fails(
            "NOP\nMOV 1 2",
            2,
            ParseErrorKind::UnknownMnemonic("MOV".to_string()),
        );
    }

    #[test]
    fn rejects_wrong_operand_count() {
        assert_parse_fails(
            "COP 1",
            1,
            ParseErrorKind::Arity {
                mnemonic: "COP",
                expected: 2,
                found: 1,
            },
        );
    }

    #[test]
    fn rejects_non_numeric_operand() {
        assert_parse_fails(
            "JMP end",
            1,
            ParseErrorKind::InvalidOperand("end".to_string()),
        );
    }

    #[test]
    fn report_includes_line_number() {
        let err = parse_assembly("\n\nFOO").unwrap_err();
        assert_eq!("line 3: unknown mnemonic 'FOO'", err.report());
    }
}
