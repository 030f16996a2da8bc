use std::fs;
use std::fs::File;
use std::io::Write;

extern crate clap;
use clap::{App, SubCommand};

extern crate log;
extern crate simple_logger;

extern crate remips_lib;
use remips_lib::*;

fn main() -> std::io::Result<()> {
    simple_logger::init().unwrap();

    let matches = App::new("remips")
        .version("0.1")
        .about("IA-32 to MIPS assembly translator")
        .subcommand(SubCommand::with_name("build")
            .args_from_usage(
                "-o --output=[FILE] 'Sets the output file to use'
                 <INPUT>            'Sets the input file to use'")
        )
        .subcommand(SubCommand::with_name("dev")
            .args_from_usage(
                "--lines            'Get the output of the line lexer'
                 --blocks           'Construct and print the code blocks'
                 --mips             'Print the translated MIPS assembly'
                 <INPUT>            'Sets the input file to use'")
        )
        .get_matches();

    match matches.subcommand() {
        ("build", Some(sub_matches)) => {
            let filename = sub_matches.value_of("INPUT").unwrap();
            let text = fs::read_to_string(filename)?;
            let output = translate_ia32_to_mips(&text);

            match sub_matches.value_of("output") {
                Some(path) => {
                    let mut file = File::create(path)?;
                    file.write_all(output.as_bytes())?;
                }
                None => println!("{}", output),
            }
        }
        ("dev", Some(sub_matches)) => {
            let filename = sub_matches.value_of("INPUT").unwrap();
            let text = fs::read_to_string(filename)?;

            if sub_matches.is_present("lines") {
                println!("== Lexer Output Started ==");
                for line in Lexer::new(&text) {
                    println!("{:?}", line);
                }
                println!("== Lexer Output Finished ==");
            }

            // the later steps always need the parsed program, so it is
            // built once and the flags just pick what gets printed
            let program = Parser::parse_program(Lexer::new(&text));

            if sub_matches.is_present("blocks") {
                println!("== Code Block Output Started ==");
                for block in &program.blocks {
                    println!("{:?}", block);
                }
                println!("== Code Block Output Finished ==");
            }

            if sub_matches.is_present("mips") {
                println!("== Translation Started ==");
                let mut translator = Translator::new();
                translator.translate_program(&program);
                println!("== Translation Finished ==");
                println!("== Result of Translation Started ==");
                println!("{}", translator.get_output());
                println!("== Result of Translation Finished ==");
            }
        }
        _ => {}
    }

    Ok(())
}
