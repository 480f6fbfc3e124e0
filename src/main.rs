use std::io::{self, Write};
use std::process;

use genprint::cli::{self, Command};
use genprint::{CallStack, Printer, Settings, logging};

fn main() {
    let command = cli::parse_args();

    let settings = Settings::from_env();
    logging::init(&settings);

    let invocation = std::env::args().collect::<Vec<_>>().join(" ");
    let gp = Printer::new(CallStack::main("genprint", invocation)).with_settings(settings);

    match cli::execute(&command, &gp) {
        Ok(text) => {
            let text = gp.replace_passwords(&text);
            let mut out = io::stdout().lock();
            if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
                eprintln!("genprint: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::debug!(?command, "command failed");
            match command {
                Command::Resolve { .. } | Command::Args { .. } => {
                    gp.print_error(&e.report_text());
                }
                _ => eprintln!("genprint: {}", e),
            }
            process::exit(1);
        }
    }
}
