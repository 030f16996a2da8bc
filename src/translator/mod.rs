/*
 * The translation engine.  Consumes a parsed Program block by block
 * and emits MIPS assembly text into an in-memory builder.  Most
   mnemonics translate one to one; pushl runs, cmpl and the procedure
   prologue/epilogue need lookahead over the instruction stream and
   are handled by the fusion paths below.
 */

pub mod operand;
pub mod registers;

pub use operand::*;
pub use registers::*;

use crate::compiler::ast::*;
use crate::logger::*;

// Appended to the output in place of a translation whenever an operand
// is missing, unclassifiable or no rule covers the matched shapes.
pub const WRONG_INSTRUCTION: &str = "wrong instruction\n";

// Procedure boundary tracking.  Translation starts at a head and only
// the leave/ret epilogue returns there, block ends never do.  A label
// seen AtHead opens a procedure, a label seen InBody is internal.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ProcedureState {
    AtHead,
    InBody,
}

// Cursor over one block's instructions.  The fusion paths peek ahead
// and consume a variable number of entries, so every access is bounds
// checked; running off the end is reported, never a panic.
struct Cursor<'a> {
    instructions: &'a [Instruction],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(instructions: &'a [Instruction]) -> Cursor<'a> {
        Cursor {
            instructions,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'a Instruction> {
        self.instructions.get(self.position)
    }

    fn next(&mut self) -> Option<&'a Instruction> {
        let instruction = self.instructions.get(self.position);
        if instruction.is_some() {
            self.position += 1;
        }
        instruction
    }
}

fn unary_operand(instruction: &Instruction) -> Option<Operand> {
    Operand::classify(instruction.operand1.as_ref()?)
}

fn binary_operands(instruction: &Instruction) -> Option<(Operand, Operand)> {
    Some((
        Operand::classify(instruction.operand1.as_ref()?)?,
        Operand::classify(instruction.operand2.as_ref()?)?,
    ))
}

// Translators report malformed shapes as None; the output still has to
// show the failure, so None becomes the sentinel text.
fn or_wrong(translated: Option<String>) -> String {
    translated.unwrap_or_else(|| WRONG_INSTRUCTION.to_string())
}

pub struct Translator {
    registers: &'static RegisterTable,
    builder: String,
    state: ProcedureState,
    procedure_name: String,
}

impl Translator {
    pub fn new() -> Translator {
        Translator {
            registers: &REGISTERS,
            builder: String::new(),
            state: ProcedureState::AtHead,
            procedure_name: String::new(),
        }
    }

    pub fn get_output<'a>(&'a self) -> &'a str {
        &self.builder
    }

    pub fn translate_program(&mut self, program: &Program) {
        for block in &program.blocks {
            self.translate_block(block);
        }
    }

    fn translate_block(&mut self, block: &Block) {
        if !block.label.is_empty() {
            if self.state == ProcedureState::AtHead {
                self.builder += &format!(".globl {}\n", block.label);
                self.builder += &format!(".ent {}\n", block.label);
                self.procedure_name = block.label.clone();
                self.state = ProcedureState::InBody;
            }
            self.builder += &format!("{}:\n", block.label);
        }

        let mut cursor = Cursor::new(&block.instructions);
        while let Some(instruction) = cursor.next() {
            let translated = self.dispatch(instruction, &mut cursor);
            self.builder += &translated;
        }

        // fires only when the epilogue in this very block reset the
        // state, which is exactly the one-block-per-procedure input
        if !block.label.is_empty() && self.state == ProcedureState::AtHead {
            self.builder += &format!(".end {}\n", self.procedure_name);
        }
        self.builder += "\n";
    }

    fn dispatch<'a>(&mut self, instruction: &'a Instruction, cursor: &mut Cursor<'a>) -> String {
        match instruction.mnemonic.as_str() {
            "movl" => or_wrong(self.translate_movl(instruction)),
            "addl" | "xorl" | "andl" | "orl" => or_wrong(self.translate_arith(instruction)),
            "subl" => or_wrong(self.translate_subl(instruction)),
            "imull" => or_wrong(self.translate_imull(instruction)),
            "sall" | "shll" => or_wrong(self.translate_sall_or_shll(instruction)),
            "sarl" => or_wrong(self.translate_sarl(instruction)),
            "shrl" => or_wrong(self.translate_shrl(instruction)),
            "incl" => or_wrong(self.translate_step(instruction, "1")),
            "decl" => or_wrong(self.translate_step(instruction, "-1")),
            "negl" => or_wrong(self.translate_negl(instruction)),
            "notl" => or_wrong(self.translate_notl(instruction)),
            "popl" => or_wrong(self.translate_popl(instruction)),
            "jmp" => or_wrong(self.translate_jmp(instruction)),
            "call" => or_wrong(self.translate_call(instruction)),
            "pushl" => self.translate_pushl_sequence(instruction, cursor),
            "leave" => self.translate_leave(cursor),
            "cmpl" => or_wrong(self.translate_cmpl_jump(instruction, cursor)),
            other => {
                // deliberately silent in the output, visible in the log
                log_unknown_mnemonic(other);
                String::new()
            }
        }
    }

    // pushl starts one of three shapes: the frame setup pair, a run of
    // argument pushes fused with the call behind them, or plain pushes.
    fn translate_pushl_sequence<'a>(
        &mut self,
        instruction: &'a Instruction,
        cursor: &mut Cursor<'a>,
    ) -> String {
        if instruction.operand1.as_ref().map(|operand| operand.as_str()) == Some("%ebp") {
            // frame setup: the movl %esp, %ebp that follows is consumed
            // without being looked at, the prologue is fixed text
            if cursor.next().is_none() {
                log_truncated_fusion("pushl");
                return WRONG_INSTRUCTION.to_string();
            }
            return self.translate_procedure_head();
        }

        let mut pushes: Vec<&Instruction> = vec![instruction];
        while let Some(next) = cursor.peek() {
            if next.mnemonic != "pushl" {
                break;
            }
            pushes.push(next);
            cursor.next();
        }

        if let Some(next) = cursor.peek() {
            if next.mnemonic == "call" {
                cursor.next();
                return self.translate_call_with_arguments(&pushes, next);
            }
        }

        self.translate_batch_pushl(&pushes)
    }

    fn translate_procedure_head(&self) -> String {
        let mut translated = String::new();
        translated += "addi $sp, $sp, -8\n";
        translated += "sw $ra, 4($sp)\n";
        translated += "sw $fp, 0($sp)\n";
        translated += "addi $fp, $sp, 0\n";
        translated
    }

    fn translate_procedure_end(&self) -> String {
        let mut translated = String::new();
        translated += "lw $fp, 0($sp)\n";
        translated += "lw $ra, 4($sp)\n";
        translated += "addi $sp, $sp, 8\n";
        translated += "jr $ra\n";
        translated
    }

    fn translate_leave(&mut self, cursor: &mut Cursor) -> String {
        // the state resets here and only here
        self.state = ProcedureState::AtHead;

        // the ret that follows is folded into the epilogue unseen
        if cursor.next().is_none() {
            log_truncated_fusion("leave");
            return WRONG_INSTRUCTION.to_string();
        }
        self.translate_procedure_end()
    }

    fn translate_call_with_arguments(&self, pushes: &[&Instruction], call: &Instruction) -> String {
        let mut translated = String::new();

        // arguments go out in their original left-to-right order
        for push in pushes {
            translated += &or_wrong(self.translate_pushl(push));
        }
        translated += &or_wrong(self.translate_call(call));
        translated += &format!("addi $sp, $sp, {}\n", 4 * pushes.len());

        translated
    }

    fn translate_batch_pushl(&self, pushes: &[&Instruction]) -> String {
        pushes
            .iter()
            .map(|push| or_wrong(self.translate_pushl(push)))
            .collect()
    }

    fn translate_pushl(&self, instruction: &Instruction) -> Option<String> {
        let translated = match unary_operand(instruction)? {
            Operand::Register(name) => format!(
                "addi $sp, $sp, -4\nsw {}, 0($sp)\n",
                self.registers.alias(&name)?
            ),
            Operand::Immediate(value) => format!(
                "addi $sp, $sp, -4\nli {}, {}\nsw {}, 0($sp)\n",
                IMMEDIATE_SCRATCH, value, IMMEDIATE_SCRATCH
            ),
            Operand::Memory(_) => return None,
        };
        Some(translated)
    }

    fn translate_popl(&self, instruction: &Instruction) -> Option<String> {
        let register = self.registers.alias(unary_operand(instruction)?.as_register()?)?;
        Some(format!("lw {}, 0($sp)\naddi $sp, $sp, 4\n", register))
    }

    fn translate_movl(&self, instruction: &Instruction) -> Option<String> {
        let translated = match binary_operands(instruction)? {
            (Operand::Register(from), Operand::Register(to)) => {
                let to = self.registers.alias(&to)?;
                format!("add {}, $zero, {}\n", to, self.registers.alias(&from)?)
            }
            (Operand::Register(from), Operand::Memory(memory)) => format!(
                "sw {}, {}({})\n",
                self.registers.alias(&from)?,
                memory.offset,
                self.registers.alias(&memory.base)?
            ),
            (Operand::Immediate(value), Operand::Register(to)) => {
                format!("li {}, {}\n", self.registers.alias(&to)?, value)
            }
            (Operand::Immediate(value), Operand::Memory(memory)) => format!(
                "li {}, {}\nsw {}, {}({})\n",
                IMMEDIATE_SCRATCH,
                value,
                IMMEDIATE_SCRATCH,
                memory.offset,
                self.registers.alias(&memory.base)?
            ),
            (Operand::Memory(memory), Operand::Register(to)) => format!(
                "lw {}, {}({})\n",
                self.registers.alias(&to)?,
                memory.offset,
                self.registers.alias(&memory.base)?
            ),
            _ => return None,
        };
        Some(translated)
    }

    // addl, xorl, andl and orl share every shape; the MIPS opcode is
    // the mnemonic minus the trailing 'l', immediates append an 'i'
    fn translate_arith(&self, instruction: &Instruction) -> Option<String> {
        let opcode = &instruction.mnemonic[..instruction.mnemonic.len() - 1];

        let translated = match binary_operands(instruction)? {
            (Operand::Register(from), Operand::Register(to)) => {
                let to = self.registers.alias(&to)?;
                format!(
                    "{} {}, {}, {}\n",
                    opcode,
                    to,
                    to,
                    self.registers.alias(&from)?
                )
            }
            (Operand::Immediate(value), Operand::Register(to)) => {
                let to = self.registers.alias(&to)?;
                format!("{}i {}, {}, {}\n", opcode, to, to, value)
            }
            (Operand::Immediate(value), Operand::Memory(memory)) => format!(
                "{} {}, $zero, {}\nsw {}, {}({})\n",
                opcode,
                MEMORY_SCRATCH,
                value,
                MEMORY_SCRATCH,
                memory.offset,
                self.registers.alias(&memory.base)?
            ),
            (Operand::Memory(memory), Operand::Register(to)) => {
                let to = self.registers.alias(&to)?;
                format!(
                    "lw {}, {}({})\n{} {}, {}, {}\n",
                    MEMORY_SCRATCH,
                    memory.offset,
                    self.registers.alias(&memory.base)?,
                    opcode,
                    to,
                    to,
                    MEMORY_SCRATCH
                )
            }
            _ => return None,
        };
        Some(translated)
    }

    fn translate_subl(&self, instruction: &Instruction) -> Option<String> {
        let translated = match binary_operands(instruction)? {
            (Operand::Register(from), Operand::Register(to)) => {
                let to = self.registers.alias(&to)?;
                format!("sub {}, {}, {}\n", to, to, self.registers.alias(&from)?)
            }
            (Operand::Immediate(value), Operand::Register(to)) => {
                let to = self.registers.alias(&to)?;
                // the displayed sign is flipped textually: negatives
                // lose their minus, everything else gains one
                let inverted = if value.starts_with('-') {
                    value[1..].to_string()
                } else {
                    format!("-{}", value)
                };
                format!("addi {}, {}, {}\n", to, to, inverted)
            }
            _ => return None,
        };
        Some(translated)
    }

    fn translate_imull(&self, instruction: &Instruction) -> Option<String> {
        let translated = match binary_operands(instruction)? {
            (Operand::Register(from), Operand::Register(to)) => {
                let to = self.registers.alias(&to)?;
                format!(
                    "mult {}, {}\nmflo {}\n",
                    self.registers.alias(&from)?,
                    to,
                    to
                )
            }
            (Operand::Immediate(value), Operand::Register(to)) => {
                let to = self.registers.alias(&to)?;
                format!(
                    "mult {}, $zero, {}\nmult {}, {}\nmflo {}\n",
                    MULTIPLY_SCRATCH, value, MULTIPLY_SCRATCH, to, to
                )
            }
            _ => return None,
        };
        Some(translated)
    }

    fn translate_sall_or_shll(&self, instruction: &Instruction) -> Option<String> {
        let translated = match binary_operands(instruction)? {
            (Operand::Register(from), Operand::Register(to)) => {
                let to = self.registers.alias(&to)?;
                format!("sllv {}, {}, {}\n", to, to, self.registers.alias(&from)?)
            }
            (Operand::Immediate(value), Operand::Register(to)) => {
                let to = self.registers.alias(&to)?;
                format!("sll {}, {}, {}\n", to, to, value)
            }
            _ => return None,
        };
        Some(translated)
    }

    // arithmetic right shift only comes in the immediate form
    fn translate_sarl(&self, instruction: &Instruction) -> Option<String> {
        let (value, to) = self.immediate_register_operands(instruction)?;
        Some(format!("sra {}, {}, {}\n", to, to, value))
    }

    fn translate_shrl(&self, instruction: &Instruction) -> Option<String> {
        let (value, to) = self.immediate_register_operands(instruction)?;
        Some(format!("srl {}, {}, {}\n", to, to, value))
    }

    fn immediate_register_operands(&self, instruction: &Instruction) -> Option<(String, &'static str)> {
        match binary_operands(instruction)? {
            (Operand::Immediate(value), Operand::Register(to)) => {
                Some((value, self.registers.alias(&to)?))
            }
            _ => None,
        }
    }

    fn translate_step(&self, instruction: &Instruction, amount: &str) -> Option<String> {
        let register = self.registers.alias(unary_operand(instruction)?.as_register()?)?;
        Some(format!("addi {}, {}, {}\n", register, register, amount))
    }

    fn translate_negl(&self, instruction: &Instruction) -> Option<String> {
        let register = self.registers.alias(unary_operand(instruction)?.as_register()?)?;
        Some(format!("sub {}, $zero, {}\n", register, register))
    }

    fn translate_notl(&self, instruction: &Instruction) -> Option<String> {
        let register = self.registers.alias(unary_operand(instruction)?.as_register()?)?;
        Some(format!("not {}, {}\n", register, register))
    }

    fn translate_jmp(&self, instruction: &Instruction) -> Option<String> {
        Some(format!("b {}\n", instruction.operand1.as_ref()?))
    }

    fn translate_call(&self, instruction: &Instruction) -> Option<String> {
        Some(format!("jal {}\n", instruction.operand1.as_ref()?))
    }

    // cmpl never stands alone, the conditional jump behind it supplies
    // the branch opcode and target.  MIPS branches compare directly, so
    // cmpl's destination operand comes first to keep the polarity.
    fn translate_cmpl_jump(&self, cmpl: &Instruction, cursor: &mut Cursor) -> Option<String> {
        let jump = match cursor.next() {
            Some(jump) => jump,
            None => {
                log_truncated_fusion("cmpl");
                return None;
            }
        };

        let destination = self.compare_operand(cmpl.operand2.as_ref()?)?;
        let source = self.compare_operand(cmpl.operand1.as_ref()?)?;

        let opcode = match jump.mnemonic.as_str() {
            "je" => "beq",
            "jne" => "bne",
            "jl" => "blt",
            "jle" => "ble",
            "jg" => "bgt",
            "jge" => "bge",
            _ => return None,
        };

        Some(format!(
            "{} {}, {}, {}\n",
            opcode,
            destination,
            source,
            jump.operand1.as_ref()?
        ))
    }

    // a compared operand is either a register alias or a bare literal
    fn compare_operand(&self, text: &str) -> Option<String> {
        match Operand::classify(text)? {
            Operand::Register(name) => Some(self.registers.alias(&name)?.to_string()),
            Operand::Immediate(value) => Some(value),
            Operand::Memory(_) => None,
        }
    }
}

impl Default for Translator {
    fn default() -> Translator {
        Translator::new()
    }
}
