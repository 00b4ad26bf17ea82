use std::process::ExitCode;

use take_over::TakeOverError;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = take_over::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.downcast_ref::<TakeOverError>().map_or(1, TakeOverError::code);
            take_over::output::print_error(&format!("{e:#}"));
            ExitCode::from(code)
        }
    }
}
