#[macro_use]
extern crate enum_as_inner;
#[macro_use]
extern crate lazy_static;

mod logger;
pub mod compiler;
pub mod translator;
pub use compiler::ast::*;
pub use compiler::lexer::*;
pub use compiler::parser::*;
pub use translator::*;

// Parse IA-32 source text and hand the resulting program to the
// translation engine, returning the MIPS assembly as one string.
pub fn translate_ia32_to_mips(source: &str) -> String {
    let lexer = Lexer::new(source);
    let program = Parser::parse_program(lexer);
    let mut translator = Translator::new();
    translator.translate_program(&program);
    translator.get_output().to_string()
}
