use std::process::ExitCode;

use georesolve::ui::output;

fn main() -> ExitCode {
    match georesolve::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
