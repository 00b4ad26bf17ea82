//! User-facing one-line messages.
//!
//! Tracing goes to stderr; these helpers are for the short summaries a person
//! (or a script) reads. Colors are enabled only when the target stream is a TTY.

use owo_colors::OwoColorize;

fn is_tty(stream: atty::Stream) -> bool {
    atty::is(stream)
}

pub fn print_info(msg: &str) {
    if is_tty(atty::Stream::Stdout) {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty(atty::Stream::Stderr) {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty(atty::Stream::Stdout) {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Dry-run summary line, e.g. "dry-run: would take over 3 files".
pub fn print_dry_run(msg: &str) {
    if is_tty(atty::Stream::Stdout) {
        println!("{} {}", "dry-run:".magenta().bold(), msg);
    } else {
        println!("dry-run: {}", msg);
    }
}

/// Print a plain line with no prefix. `list` output goes through here so it stays scriptable.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}
