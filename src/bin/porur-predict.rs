//! Command-line prediction for one patient, without the desktop form.

use porur::cli;
use porur::logging;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = cli::parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init_stderr(options.verbose) {
        eprintln!("Logging disabled: {err}");
    }
    cli::execute(&options, &mut std::io::stdout().lock())
}
