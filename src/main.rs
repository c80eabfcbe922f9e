use edmerlin::cli::{
    args::{Config, parse_and_validate_args},
    commands::{derive_nonce, run_transcript},
    display::{print_challenges, print_nonce, print_selftest_stats},
    terminal::{
        colors, enable_ansi_support, exit_with_error, hide_cursor, print_header, print_progress,
        reset_terminal,
    },
};
use edmerlin::crypto::entropy::OsEntropy;
use edmerlin::runner::parallel::run_selftest;

fn setup_signal_handler() {
    let installed = ctrlc::set_handler(move || {
        reset_terminal();
        println!();
        std::process::exit(130);
    });

    if let Err(e) = installed {
        exit_with_error(&format!("Error setting Ctrl+C handler: {e}"));
    }
}

fn main() {
    // Enable ANSI color support on Windows
    enable_ansi_support();

    let config = parse_and_validate_args();

    match config {
        Config::Challenge { label, ops, json } => {
            let (_, challenges) = run_transcript(&label, &ops);
            print_challenges(&label, &challenges, json);
        }
        Config::Nonce {
            label,
            ops,
            witnesses,
            len,
            entropy,
            json,
        } => {
            let (transcript, _) = run_transcript(&label, &ops);
            let nonce = match &entropy {
                Some(bytes) => {
                    eprintln!(
                        "{}: using caller-supplied entropy; do not use this nonce in production",
                        colors::yellow("WARNING")
                    );
                    derive_nonce(&transcript, &witnesses, len, &mut bytes.as_slice())
                }
                None => derive_nonce(&transcript, &witnesses, len, &mut OsEntropy::new()),
            }
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));

            print_nonce(&label, &nonce, json);
        }
        Config::Selftest { threads, steps } => {
            setup_signal_handler();

            let header_length = print_header(threads, steps);
            println!("{}", "─".repeat(header_length));
            hide_cursor();

            let stats = run_selftest(threads, steps, |progress| {
                print_progress(
                    progress.completed_steps,
                    progress.total_steps,
                    progress.elapsed_secs,
                    progress.failures,
                );
            });
            reset_terminal();

            print_selftest_stats(&stats);
            if !stats.passed() {
                std::process::exit(1);
            }
        }
    }
}
