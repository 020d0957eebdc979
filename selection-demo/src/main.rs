mod script;

use std::fs::File;
use std::io::Read;

use simplelog::{Config, LevelFilter, WriteLogger};

use script::{ScriptError, Session};

fn read_script() -> Result<String, ScriptError> {
    let mut script = String::new();
    match std::env::args().nth(1) {
        Some(path) => {
            File::open(path)?.read_to_string(&mut script)?;
        }
        None => {
            std::io::stdin().read_to_string(&mut script)?;
        }
    }
    Ok(script)
}

fn main() {
    let log_file = File::create("selection-demo.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let result =
        read_script().and_then(|script| Session::new(std::io::stdout().lock()).run(&script));

    if let Err(e) = result {
        log::error!("selection-demo: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
