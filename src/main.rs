pub mod assemble;
pub mod cli;
pub mod decl;
pub mod error;
pub mod expand;
pub mod exports;
pub mod lexer;
pub mod loader;
pub mod manifest;
pub mod oracle;
pub mod parse;
pub mod resolve;
pub mod schema;
pub mod ty;

use colored::Colorize;

fn main() {
    let command_line_interface = cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
