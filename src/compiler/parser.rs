use super::ast::*;
use super::lexer::*;
use crate::logger::*;

use std::collections::HashMap;

pub struct Parser<'a> {
    it: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn parse_program(lexer: Lexer<'a>) -> Program {
        let mut parser = Parser { it: lexer };
        parser.program()
    }

    fn program(&mut self) -> Program {
        let mut blocks: Vec<Block> = vec![];
        let mut label_index = HashMap::new();

        while let Some(line) = self.it.next() {
            if let Some(label) = line.label {
                label_index.insert(label.clone(), blocks.len());
                blocks.push(Block::new(label));
            }

            if line.tokens.is_empty() {
                continue;
            }

            let token_count = line.tokens.len();
            match Instruction::from_tokens(line.tokens) {
                Some(instruction) => {
                    // instructions before the first label still need a home
                    if blocks.is_empty() {
                        blocks.push(Block::new(String::new()));
                    }
                    if let Some(block) = blocks.last_mut() {
                        block.push_instruction(instruction);
                    }
                }
                None => log_discarded_line(token_count),
            }
        }

        Program {
            blocks,
            label_index,
        }
    }
}
