use std::io;

use crate::{
    asm::{Instruction, Opcode, Word},
    config::Limits,
    listing::Position,
    prelude::*,
    tables::{
        Depth, FunctionTable, InstructionTable, Line, Slot, SymbolTable, TableError, TableKind,
    },
};

use super::{AddLine, BinaryOp, GenError};

/// Operand of a jump whose target is not known yet.
pub const UNRESOLVED: Word = -1;

/// Return address of the top-level frame; returning to it ends the program.
pub const TOP_LEVEL_RETURN: Word = -1;

const MAIN: &str = "main";
const MAIN_RETURN_ADDRESS: &str = "?ADRMain";
const MAIN_RETURN_VALUE: &str = "?VALMain";
const CALLEE_RETURN_ADDRESS: &str = "?ADR";
const CALLEE_RETURN_VALUE: &str = "?VAL";
const CALLER_RETURN_ADDRESS: &str = "!ADR";
const CALLER_RETURN_VALUE: &str = "!VAL";

type GenResult<T> = std::result::Result<T, GenError>;

/// Generates three-address code for one compilation unit. The generator owns
/// the symbol, instruction and function tables for the duration of the unit.
#[derive(Debug)]
pub struct CodeGenerator {
    symbols: SymbolTable,
    instructions: InstructionTable,
    functions: FunctionTable,
    /// The jump over all function bodies into `main`, emitted by
    /// [`Self::program_start`].
    main_jump: Option<Position>,
    /// The most recent source line an entry point was called with. Used to
    /// annotate errors of entry points that do not take a line.
    line: Line,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            symbols: SymbolTable::with_limits(&limits),
            instructions: InstructionTable::with_limits(&limits),
            functions: FunctionTable::with_limits(&limits),
            main_jump: None,
            line: 0,
        }
    }

    /// Forget everything generated so far, so a new unit can be compiled.
    pub fn reset(&mut self) {
        self.symbols.clear();
        self.instructions.clear();
        self.functions.clear();
        self.main_jump = None;
        self.line = 0;
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn instructions(&self) -> &InstructionTable {
        &self.instructions
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// The textual assembly listing generated so far.
    pub fn assembly(&self) -> String {
        self.instructions.assembly()
    }

    pub fn write_assembly<W: io::Write>(&self, out: W) -> Result<()> {
        self.instructions.write_assembly(out)
    }

    /// Dumps of all three tables, for diagnostics.
    pub fn dump(&self) -> String {
        let symbols = self.symbols.dump();
        let instructions = self.instructions.dump();
        let functions = self.functions.dump();
        format!("{symbols}\n{instructions}\n{functions}")
    }

    /// Emit the program prologue: the top-level frame's return address is set
    /// to [`TOP_LEVEL_RETURN`], then control jumps to `main`, whose position
    /// is patched in once `main` is declared.
    pub fn program_start(&mut self) -> GenResult<()> {
        let adr = self
            .symbols
            .reserve(MAIN_RETURN_ADDRESS, None, 0, 0)
            .add_line(0)?;
        self.symbols
            .reserve(MAIN_RETURN_VALUE, None, 0, 0)
            .add_line(0)?;
        self.emit(Instruction::binary(Opcode::Afc, adr.into(), TOP_LEVEL_RETURN))?;
        self.main_jump = Some(self.emit(Instruction::unary(Opcode::Jmp, UNRESOLVED))?);
        debug!("program start, return address in {adr}");
        Ok(())
    }

    /// Load an integer literal into a fresh temporary.
    pub fn literal(&mut self, value: Word, line: Line, depth: Depth) -> GenResult<Slot> {
        self.line = line;
        let slot = self.symbols.insert_tmp(value, line, depth).add_line(line)?;
        self.emit(Instruction::binary(Opcode::Afc, slot.into(), value))?;
        debug!("literal {value} in {slot}");
        Ok(slot)
    }

    /// Declare a variable in the current scope. No code is emitted.
    pub fn declare(&mut self, name: &str, line: Line, depth: Depth) -> GenResult<Slot> {
        self.line = line;
        let slot = self.symbols.insert(name, line, depth).add_line(line)?;
        debug!("declare '{name}' in {slot} at depth {depth}");
        Ok(slot)
    }

    /// Resolve a variable used as an expression.
    pub fn variable(&mut self, name: &str, line: Line) -> GenResult<Slot> {
        self.line = line;
        self.symbols.search(name).add_line(line)
    }

    /// Leave a block: every symbol declared at `depth` or deeper goes out of
    /// scope. Returns the number of symbols still live.
    pub fn leave_scope(&mut self, depth: Depth) -> usize {
        let live = self.symbols.pop_depth(depth);
        debug!("leave depth {depth}, {live} symbol(s) live");
        live
    }

    /// Apply a binary operator. Operand temporaries are consumed, and the
    /// result lands in a fresh temporary.
    pub fn binary(
        &mut self,
        op: BinaryOp,
        lhs: Slot,
        rhs: Slot,
        line: Line,
        depth: Depth,
    ) -> GenResult<Slot> {
        self.line = line;
        let consumed = [lhs, rhs]
            .into_iter()
            .filter(|&slot| self.symbols.is_tmp(slot))
            .count();
        for _ in 0..consumed {
            self.symbols.pop_tmp();
        }
        let result = self.symbols.insert_tmp(0, line, depth).add_line(line)?;
        self.emit(Instruction::new(
            op.opcode(),
            result.into(),
            lhs.into(),
            rhs.into(),
        ))?;
        debug!("{result} = {lhs} {op} {rhs}");
        Ok(result)
    }

    /// Arithmetic negation, computed as `0 - operand`.
    pub fn negate(&mut self, operand: Slot, line: Line, depth: Depth) -> GenResult<Slot> {
        self.line = line;
        let result = self.symbols.insert_tmp(0, line, depth).add_line(line)?;
        self.emit(Instruction::binary(Opcode::Afc, result.into(), 0))?;
        self.emit(Instruction::new(
            Opcode::Sou,
            result.into(),
            result.into(),
            operand.into(),
        ))?;
        debug!("{result} = -{operand}");
        Ok(result)
    }

    /// Logical negation. Only the result slot appears in the listing.
    pub fn not(&mut self, operand: Slot, line: Line, depth: Depth) -> GenResult<Slot> {
        self.line = line;
        let result = self.symbols.insert_tmp(0, line, depth).add_line(line)?;
        self.emit(Instruction::binary(Opcode::Not, result.into(), operand.into()))?;
        debug!("{result} = !{operand}");
        Ok(result)
    }

    /// Copy `source` into the variable called `name`.
    pub fn assign(&mut self, name: &str, source: Slot, line: Line) -> GenResult<()> {
        self.line = line;
        let target = self.symbols.search(name).add_line(line)?;
        self.emit(Instruction::binary(Opcode::Cop, target.into(), source.into()))?;
        self.free_if_tmp(source);
        debug!("'{name}' ({target}) = {source}");
        Ok(())
    }

    pub fn print(&mut self, operand: Slot, line: Line) -> GenResult<()> {
        self.line = line;
        self.free_if_tmp(operand);
        self.emit(Instruction::unary(Opcode::Print, operand.into()))?;
        Ok(())
    }

    /// Emit the conditional jump that skips the then-branch. Returns its
    /// position, to be passed to [`Self::if_patch`].
    pub fn if_prepare(&mut self, cond: Slot, line: Line) -> GenResult<Position> {
        self.line = line;
        self.free_if_tmp(cond);
        let jump = self.emit(Instruction::binary(Opcode::Jmpf, cond.into(), UNRESOLVED))?;
        debug!("if {cond} at {jump}");
        Ok(jump)
    }

    /// Resolve the then-branch's conditional jump. The target lies one past
    /// the next instruction, which is always the branch-skip jump of
    /// [`Self::else_prepare`] or the no-op of [`Self::else_empty`].
    pub fn if_patch(&mut self, jump: Position) -> GenResult<()> {
        let target = self.instructions.get_index() + 1;
        self.instructions
            .patch_op2(jump, target.into())
            .add_line(self.line)
    }

    /// Emit the jump from the end of the then-branch over the else-branch.
    /// Returns its position, to be passed to [`Self::else_patch`].
    pub fn else_prepare(&mut self) -> GenResult<Position> {
        self.emit(Instruction::unary(Opcode::Jmp, UNRESOLVED))
    }

    /// Resolve the branch-skip jump to the instruction after the else-branch.
    pub fn else_patch(&mut self, jump: Position) -> GenResult<()> {
        let target = self.instructions.get_index();
        self.instructions
            .patch_op1(jump, target.into())
            .add_line(self.line)
    }

    /// Stand in for the branch-skip jump of an if-statement without an
    /// else-branch.
    pub fn else_empty(&mut self) -> GenResult<()> {
        self.emit(Instruction::nullary(Opcode::Nop))?;
        Ok(())
    }

    /// Emit the loop's exit jump. Returns its position, to be passed to
    /// [`Self::while_patch`]. The condition temporary stays live until then.
    pub fn while_prepare(&mut self, cond: Slot, line: Line) -> GenResult<Position> {
        self.line = line;
        let jump = self.emit(Instruction::binary(Opcode::Jmpf, cond.into(), UNRESOLVED))?;
        debug!("while {cond} at {jump}");
        Ok(jump)
    }

    /// Close the loop: the exit jump is resolved to the instruction after the
    /// back edge, and the back edge returns to the instruction preceding the
    /// exit jump.
    pub fn while_patch(&mut self, jump: Position) -> GenResult<()> {
        let cond = self
            .instructions
            .get(jump)
            .map(|instr| instr.op1)
            .ok_or(TableError::OutOfRange(TableKind::Instruction, jump.0))
            .add_line(self.line)?;

        let exit = self.instructions.get_index() + 1;
        self.instructions
            .patch_op2(jump, exit.into())
            .add_line(self.line)?;

        let test = jump.previous().unwrap_or(jump);
        self.emit(Instruction::unary(Opcode::Jmp, test.into()))?;

        if let Ok(cond) = usize::try_from(cond) {
            let cond = Slot(cond);
            if self.symbols.is_tmp(cond) && cond.0 + 1 == self.symbols.count() {
                self.symbols.pop_tmp();
            }
        }
        debug!("end while at {jump}, back edge to {test}");
        Ok(())
    }

    /// Begin a function body. The function enters at the next instruction;
    /// declaring `main` also resolves the program's initial jump.
    pub fn function_new_start(
        &mut self,
        name: &str,
        line: Line,
        depth: Depth,
    ) -> GenResult<Position> {
        self.line = line;
        let entry = self.instructions.get_index();
        self.functions.insert(name, entry).add_line(line)?;

        if name == MAIN {
            if let Some(jump) = self.main_jump {
                self.instructions
                    .patch_op1(jump, entry.into())
                    .add_line(line)?;
            } else {
                warn!("'{MAIN}' declared before the program start was emitted");
            }
        }

        self.symbols
            .reserve(CALLEE_RETURN_ADDRESS, None, line, depth)
            .add_line(line)?;
        self.symbols
            .reserve(CALLEE_RETURN_VALUE, None, line, depth)
            .add_line(line)?;
        debug!("function '{name}' enters at {entry}");
        Ok(entry)
    }

    /// End a function body: its parameters and return slots go out of scope,
    /// and control returns to the caller.
    pub fn function_new_end(&mut self, nb_params: usize) -> GenResult<()> {
        for _ in 0..nb_params + 2 {
            self.symbols.pop();
        }
        self.emit(Instruction::unary(Opcode::Ret, 0))?;
        Ok(())
    }

    /// Open a call frame. Returns the frame base: the symbol count before the
    /// frame's return address and return value slots were reserved.
    pub fn function_prepare_stack(&mut self, line: Line, depth: Depth) -> GenResult<Slot> {
        self.line = line;
        let tsp = Slot(self.symbols.count());
        self.symbols
            .reserve(CALLER_RETURN_ADDRESS, None, line, depth)
            .add_line(line)?;
        self.symbols
            .reserve(CALLER_RETURN_VALUE, None, line, depth)
            .add_line(line)?;
        debug!("call frame at {tsp}");
        Ok(tsp)
    }

    /// Pass `address` as the argument at `arg_index`. A temporary is turned
    /// into the argument in place; a variable is copied into a new slot.
    pub fn function_call_arg(
        &mut self,
        address: Slot,
        arg_index: usize,
        line: Line,
        depth: Depth,
    ) -> GenResult<Slot> {
        self.line = line;
        let name = format!("arg{arg_index}");
        let slot = if self.symbols.is_tmp(address) {
            let value = self.symbols.get_tmp(address).add_line(line)?;
            self.symbols.pop_tmp();
            self.symbols
                .reserve(&name, Some(value), line, depth)
                .add_line(line)?
        } else {
            let slot = self.symbols.reserve(&name, None, line, depth).add_line(line)?;
            self.emit(Instruction::binary(Opcode::Cop, slot.into(), address.into()))?;
            slot
        };
        debug!("{name} = {address} in {slot}");
        Ok(slot)
    }

    /// Call `name` with the frame opened at `tsp`. The frame and anything
    /// left at `depth` or deeper is discarded; the result is read from the
    /// slot just above the restored top.
    pub fn function_call(&mut self, name: &str, tsp: Slot, depth: Depth) -> GenResult<Slot> {
        let line = self.line;
        let target = self.functions.search(name).add_line(line)?;

        self.emit(Instruction::unary(Opcode::Push, tsp.into()))?;
        self.emit(Instruction::unary(Opcode::Call, target.into()))?;
        self.emit(Instruction::unary(Opcode::Pop, tsp.into()))?;

        let frame = self.symbols.restore(tsp);
        trace!("call frame of '{name}' held {} symbol(s)", frame.len());
        let before = self.symbols.count();
        let live = self.symbols.pop_depth(depth);
        if live < before {
            let swept = before - live;
            warn!("call to '{name}' swept {swept} stray symbol(s) at depth {depth}");
        }

        let result = Slot(live).above();
        debug!("call '{name}' at {target}, result in {result}");
        Ok(result)
    }

    /// Return `expr` from the current function.
    pub fn function_return(&mut self, expr: Slot, depth: Depth) -> GenResult<()> {
        let line = self.line;
        let value = self
            .symbols
            .search_reserved(CALLEE_RETURN_VALUE)
            .add_line(line)?;
        self.emit(Instruction::binary(Opcode::Cop, value.into(), expr.into()))?;
        self.symbols.pop_depth(depth);
        self.emit(Instruction::unary(Opcode::Ret, 0))?;
        debug!("return {expr} through {value}");
        Ok(())
    }

    fn free_if_tmp(&mut self, slot: Slot) {
        if self.symbols.is_tmp(slot) {
            self.symbols.pop_tmp();
        }
    }

    fn emit(&mut self, instr: Instruction) -> GenResult<Position> {
        self.instructions.push(instr).add_line(self.line)
    }
}
impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
