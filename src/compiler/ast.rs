/*
 * Source-level representation of the IA-32 input.
 * A program is an ordered list of labeled blocks and each block
   is an ordered list of decoded instructions, so the translator
   never has to look at raw text.  Everything here is produced
   once by the parser and then only read.
 */

use std::collections::HashMap;

pub type Label = String;

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub mnemonic: String,
    pub operand1: Option<String>,
    pub operand2: Option<String>,
}

impl Instruction {
    pub fn new(mnemonic: &str, operand1: Option<&str>, operand2: Option<&str>) -> Instruction {
        Instruction {
            mnemonic: mnemonic.to_string(),
            operand1: operand1.map(|operand| operand.to_string()),
            operand2: operand2.map(|operand| operand.to_string()),
        }
    }

    // an instruction is 1 to 3 tokens, anything else isn't one
    pub fn from_tokens(tokens: Vec<String>) -> Option<Instruction> {
        if tokens.is_empty() || tokens.len() > 3 {
            return None;
        }

        let mut tokens = tokens.into_iter();
        Some(Instruction {
            mnemonic: tokens.next()?,
            operand1: tokens.next(),
            operand2: tokens.next(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    // empty label means the block was opened implicitly
    pub label: Label,
    pub instructions: Vec<Instruction>,
}

impl Block {
    pub fn new(label: Label) -> Block {
        Block {
            label,
            instructions: vec![],
        }
    }

    pub fn push_instruction(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub blocks: Vec<Block>,
    pub label_index: HashMap<Label, usize>,
}

impl Program {
    pub fn block_index(&self, label: &str) -> Option<usize> {
        self.label_index.get(label).copied()
    }
}
