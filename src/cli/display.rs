use crate::cli::commands::Challenge;
use crate::cli::terminal::{
    colors, failed_indicator, format_count, format_runtime_with_nanos, success_indicator,
};
use crate::runner::SelftestStats;
use serde_json::{Value, json};

pub fn challenges_json(app_label: &str, challenges: &[Challenge]) -> Value {
    json!({
        "label": app_label,
        "challenges": challenges
            .iter()
            .map(|c| json!({
                "label": c.label,
                "length": c.bytes.len(),
                "hex": hex::encode(&c.bytes),
            }))
            .collect::<Vec<_>>(),
    })
}

pub fn print_challenges(app_label: &str, challenges: &[Challenge], as_json: bool) {
    if as_json {
        let document = challenges_json(app_label, challenges);
        println!("{}", serde_json::to_string_pretty(&document).unwrap_or_default());
        return;
    }

    for challenge in challenges {
        println!(
            "{} {} {}",
            colors::blue("•"),
            colors::gray(&format!("{}:", challenge.label)),
            hex::encode(&challenge.bytes)
        );
    }
}

pub fn nonce_json(app_label: &str, nonce: &[u8]) -> Value {
    json!({
        "label": app_label,
        "length": nonce.len(),
        "nonce": hex::encode(nonce),
    })
}

pub fn print_nonce(app_label: &str, nonce: &[u8], as_json: bool) {
    if as_json {
        let document = nonce_json(app_label, nonce);
        println!("{}", serde_json::to_string_pretty(&document).unwrap_or_default());
    } else {
        println!("{}", hex::encode(nonce));
    }
}

pub fn print_selftest_stats(stats: &SelftestStats) {
    let runtime = format_runtime_with_nanos((stats.elapsed_nanos / 1_000_000_000) as u64, stats.elapsed_nanos);

    println!();
    println!(
        "{} {} {} {} {} {} {} {}",
        colors::gray("Threads:"),
        stats.threads,
        colors::gray("Points:"),
        format_count(stats.total_steps),
        colors::gray("Checks:"),
        format_count(stats.total_checks),
        colors::gray("Runtime:"),
        runtime
    );

    if stats.passed() {
        println!("{} {}", success_indicator(), colors::green("all group-law checks passed"));
        return;
    }

    for failure in &stats.failures {
        eprintln!(
            "  {} worker {} step {}: {}",
            failed_indicator(),
            failure.worker,
            failure.step,
            colors::red(failure.check)
        );
    }
    eprintln!(
        "{}: {} group-law check(s) failed",
        colors::red("FAIL"),
        stats.failures.len()
    );
}
