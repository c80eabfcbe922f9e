use num_format::{Locale, ToFormattedString};
use std::io::{self, Write};

#[cfg(windows)]
use winapi::um::consoleapi::{GetConsoleMode, SetConsoleMode};
#[cfg(windows)]
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
#[cfg(windows)]
use winapi::um::processenv::GetStdHandle;
#[cfg(windows)]
use winapi::um::winbase::STD_OUTPUT_HANDLE;
#[cfg(windows)]
use winapi::um::wincon::ENABLE_VIRTUAL_TERMINAL_PROCESSING;

/// Initialize ANSI color support on Windows
#[cfg(windows)]
pub fn enable_ansi_support() {
    unsafe {
        let handle = GetStdHandle(STD_OUTPUT_HANDLE);
        if handle != INVALID_HANDLE_VALUE {
            let mut mode = 0;
            if GetConsoleMode(handle, &mut mode) != 0 {
                SetConsoleMode(handle, mode | ENABLE_VIRTUAL_TERMINAL_PROCESSING);
            }
        }
    }
}

/// Initialize ANSI color support (no-op on non-Windows platforms)
#[cfg(not(windows))]
pub fn enable_ansi_support() {}

/// Cross-platform color helper functions
pub mod colors {
    use colored::Colorize;

    pub fn red(text: &str) -> String {
        text.red().to_string()
    }

    pub fn green(text: &str) -> String {
        text.green().to_string()
    }

    pub fn yellow(text: &str) -> String {
        text.yellow().to_string()
    }

    pub fn blue(text: &str) -> String {
        text.blue().to_string()
    }

    pub fn cyan(text: &str) -> String {
        text.cyan().to_string()
    }

    pub fn gray(text: &str) -> String {
        text.bright_black().to_string()
    }
}

/// Terminal control sequences
pub mod terminal_codes {
    pub const HIDE_CURSOR: &str = "\x1b[?25l";
    pub const SHOW_CURSOR: &str = "\x1b[?25h";
    pub const CLEAR_LINE: &str = "\x1b[2K";
}

/// Group digits for display, e.g. `1,234,567`.
pub fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Helper functions for formatted indicators
pub fn failed_indicator() -> String {
    colors::red("✗")
}

pub fn success_indicator() -> String {
    colors::green("✔")
}

pub fn hide_cursor() {
    print!("{}", terminal_codes::HIDE_CURSOR);
    let _ = io::stdout().flush();
}

/// Clear the progress line and show the cursor again.
pub fn reset_terminal() {
    print!("\r{}", terminal_codes::CLEAR_LINE);
    print!("{}", terminal_codes::SHOW_CURSOR);
    let _ = io::stdout().flush();
}

/// Print an error line to stderr and exit non-zero.
pub fn exit_with_error(message: &str) -> ! {
    eprintln!("{}: {message}", colors::red("ERROR"));
    std::process::exit(1);
}

pub fn format_runtime(elapsed_secs: u64) -> String {
    format_runtime_with_nanos(elapsed_secs, elapsed_secs as u128 * 1_000_000_000)
}

pub fn format_runtime_with_nanos(elapsed_secs: u64, elapsed_nanos: u128) -> String {
    // Handle sub-second durations
    if elapsed_secs == 0 && elapsed_nanos > 0 {
        let millis = (elapsed_nanos / 1_000_000) as u64;
        if millis == 0 {
            return "1ms".to_string();
        }
        return format!("{millis}ms");
    }

    let hours = elapsed_secs / 3600;
    let minutes = (elapsed_secs % 3600) / 60;
    let seconds = elapsed_secs % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

pub fn print_header(threads: usize, steps: u64) -> usize {
    let steps = format_count(steps);
    let header = format!(
        "Checking group law on {} chains of {} basepoint multiples",
        colors::cyan(&threads.to_string()),
        colors::cyan(&steps),
    );
    let plain_header =
        format!("Checking group law on {threads} chains of {steps} basepoint multiples");

    println!("{header}");
    plain_header.len()
}

pub fn print_progress(completed_steps: u64, total_steps: u64, elapsed_secs: u64, failures: usize) {
    let failures_str = if failures == 0 {
        colors::green("0")
    } else {
        colors::red(&failures.to_string())
    };

    let progress = format!(
        "\r{}{} {}/{} {} {} {} {} {}",
        terminal_codes::CLEAR_LINE,
        colors::gray("Steps:"),
        format_count(completed_steps),
        format_count(total_steps),
        colors::gray("·"),
        colors::gray("Failures:"),
        failures_str,
        colors::gray("· Runtime:"),
        format_runtime(elapsed_secs),
    );

    let mut stdout = io::stdout();
    let _ = stdout.write_all(progress.as_bytes());
    let _ = stdout.flush();
}
