use std::io::{self, BufRead, Write};
use std::path::Path;

mod csv_handler;
mod error;
mod normalizer;
mod record_set;

fn read_input_path() -> io::Result<String> {
    if let Some(path) = std::env::args().nth(1) {
        return Ok(path);
    }
    let mut stdout = io::stdout();
    write!(stdout, "Enter the path of the input CSV file: ")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn main() {
    env_logger::init();

    let raw = match read_input_path() {
        Ok(raw) => raw,
        Err(e) => {
            println!("{}", error::NormalizeError::Io(e).console_message());
            return;
        }
    };
    let input = Path::new(normalizer::strip_quotes(&raw));

    match normalizer::clean_csv(input) {
        Ok(output) => println!("Cleaning completed. Output file saved as '{}'.", output.display()),
        Err(e) => {
            log::debug!("Cleaning {} failed: {:?}", input.display(), e);
            println!("{}", e.console_message());
        }
    }
}
