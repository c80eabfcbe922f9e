use clap::{Arg, ArgAction, ArgMatches, Command};
use zeroize::Zeroizing;

use crate::cli::terminal::exit_with_error;

/// Default nonce length in bytes
pub const DEFAULT_NONCE_LEN: usize = 32;

/// Default number of basepoint multiples each self-test worker walks
pub const DEFAULT_SELFTEST_STEPS: u64 = 256;

/// One transcript call, in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOp {
    Append { label: String, message: Vec<u8> },
    AppendU64 { label: String, value: u64 },
    Extract { label: String, len: usize },
}

/// A labelled secret witness for rekeying the nonce RNG.
#[derive(Debug, Clone)]
pub struct Witness {
    pub label: String,
    pub bytes: Zeroizing<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub enum Config {
    Challenge {
        label: String,
        ops: Vec<TranscriptOp>,
        json: bool,
    },
    Nonce {
        label: String,
        ops: Vec<TranscriptOp>,
        witnesses: Vec<Witness>,
        len: usize,
        entropy: Option<Zeroizing<Vec<u8>>>,
        json: bool,
    },
    Selftest {
        threads: usize,
        steps: u64,
    },
}

/// Split `LABEL=VALUE`.
fn parse_label_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((label, value)) if !label.is_empty() => Ok((label.to_string(), value.to_string())),
        _ => Err(format!("expected LABEL=VALUE, got '{arg}'")),
    }
}

fn parse_u64_arg(arg: &str) -> Result<(String, u64), String> {
    let (label, value) = parse_label_value(arg)?;
    let value = value
        .parse::<u64>()
        .map_err(|e| format!("invalid integer '{value}': {e}"))?;
    Ok((label, value))
}

/// Split `LABEL:LEN`.
fn parse_extract_arg(arg: &str) -> Result<(String, usize), String> {
    let (label, len) = match arg.rsplit_once(':') {
        Some((label, len)) if !label.is_empty() => (label, len),
        _ => return Err(format!("expected LABEL:LEN, got '{arg}'")),
    };
    let len = len
        .parse::<usize>()
        .map_err(|e| format!("invalid length '{len}': {e}"))?;
    if len == 0 || len > u32::MAX as usize {
        return Err(format!("length must be between 1 and {}", u32::MAX));
    }
    Ok((label.to_string(), len))
}

fn parse_hex(value: &str) -> Result<Vec<u8>, String> {
    hex::decode(value.trim_start_matches("0x")).map_err(|e| format!("invalid hex '{value}': {e}"))
}

fn parse_witness_arg(arg: &str) -> Result<(String, String), String> {
    let (label, value) = parse_label_value(arg)?;
    parse_hex(&value).map(|_| (label, value))
}

fn transcript_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("label")
            .long("label")
            .short('l')
            .value_name("APP")
            .help("Application label the transcript is domain-separated by")
            .required(true),
    )
    .arg(
        Arg::new("append")
            .long("append")
            .short('a')
            .value_name("LABEL=MSG")
            .help("Append MSG (as UTF-8 bytes) under LABEL; repeatable, order is kept")
            .action(ArgAction::Append)
            .value_parser(parse_label_value),
    )
    .arg(
        Arg::new("append-hex")
            .long("append-hex")
            .value_name("LABEL=HEX")
            .help("Append hex-decoded bytes under LABEL; repeatable, order is kept")
            .action(ArgAction::Append)
            .value_parser(parse_witness_arg),
    )
    .arg(
        Arg::new("u64")
            .long("u64")
            .value_name("LABEL=N")
            .help("Append N as 8 little-endian bytes under LABEL; repeatable")
            .action(ArgAction::Append)
            .value_parser(parse_u64_arg),
    )
    .arg(
        Arg::new("json")
            .long("json")
            .help("Print results as JSON")
            .action(ArgAction::SetTrue),
    )
}

pub fn build_cli() -> Command {
    Command::new("edmerlin")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Merlin transcripts and Ed25519 group-law self-tests")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(transcript_args(
            Command::new("challenge")
                .about("Run a transcript and print the extracted challenges")
                .arg(
                    Arg::new("extract")
                        .long("extract")
                        .short('e')
                        .value_name("LABEL:LEN")
                        .help("Extract LEN challenge bytes under LABEL; repeatable, order is kept")
                        .action(ArgAction::Append)
                        .value_parser(parse_extract_arg),
                ),
        ))
        .subcommand(transcript_args(
            Command::new("nonce")
                .about("Derive nonce bytes from a transcript, secret witnesses and entropy")
                .arg(
                    Arg::new("witness")
                        .long("witness")
                        .short('w')
                        .value_name("LABEL=HEX")
                        .help("Rekey with hex-encoded secret witness bytes; repeatable")
                        .action(ArgAction::Append)
                        .required(true)
                        .value_parser(parse_witness_arg),
                )
                .arg(
                    Arg::new("len")
                        .long("len")
                        .short('n')
                        .value_name("BYTES")
                        .help("Number of nonce bytes to print")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("32"),
                )
                .arg(
                    Arg::new("entropy")
                        .long("entropy")
                        .value_name("HEX")
                        .help("Use these bytes as entropy instead of the OS source (needs 32 bytes)"),
                ),
        ))
        .subcommand(
            Command::new("selftest")
                .about("Check the group law over chains of basepoint multiples")
                .arg(
                    Arg::new("threads")
                        .long("threads")
                        .value_name("COUNT")
                        .help("Number of threads to use (default: number of CPU cores)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("steps")
                        .long("steps")
                        .value_name("COUNT")
                        .help("Basepoint multiples walked by each thread")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("256"),
                ),
        )
}

/// Collect transcript calls from every op-bearing argument, ordered by their
/// position on the command line.
fn collect_ops(matches: &ArgMatches, with_extract: bool) -> Result<Vec<TranscriptOp>, String> {
    let mut indexed: Vec<(usize, TranscriptOp)> = Vec::new();

    if let (Some(values), Some(indices)) = (
        matches.get_many::<(String, String)>("append"),
        matches.indices_of("append"),
    ) {
        for ((label, message), index) in values.zip(indices) {
            indexed.push((
                index,
                TranscriptOp::Append {
                    label: label.clone(),
                    message: message.as_bytes().to_vec(),
                },
            ));
        }
    }

    if let (Some(values), Some(indices)) = (
        matches.get_many::<(String, String)>("append-hex"),
        matches.indices_of("append-hex"),
    ) {
        for ((label, hex_value), index) in values.zip(indices) {
            indexed.push((
                index,
                TranscriptOp::Append {
                    label: label.clone(),
                    message: parse_hex(hex_value)?,
                },
            ));
        }
    }

    if let (Some(values), Some(indices)) = (
        matches.get_many::<(String, u64)>("u64"),
        matches.indices_of("u64"),
    ) {
        for ((label, value), index) in values.zip(indices) {
            indexed.push((
                index,
                TranscriptOp::AppendU64 {
                    label: label.clone(),
                    value: *value,
                },
            ));
        }
    }

    if with_extract
        && let (Some(values), Some(indices)) = (
            matches.get_many::<(String, usize)>("extract"),
            matches.indices_of("extract"),
        )
    {
        for ((label, len), index) in values.zip(indices) {
            indexed.push((
                index,
                TranscriptOp::Extract {
                    label: label.clone(),
                    len: *len,
                },
            ));
        }
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, op)| op).collect())
}

/// Turn parsed matches into a [`Config`], validating cross-argument rules.
pub fn config_from_matches(matches: &ArgMatches) -> Result<Config, String> {
    match matches.subcommand() {
        Some(("challenge", sub)) => {
            let ops = collect_ops(sub, true)?;
            if !ops.iter().any(|op| matches!(op, TranscriptOp::Extract { .. })) {
                return Err("nothing to print: give at least one --extract LABEL:LEN".to_string());
            }
            Ok(Config::Challenge {
                label: required_string(sub, "label")?,
                ops,
                json: sub.get_flag("json"),
            })
        }
        Some(("nonce", sub)) => {
            let len = sub.get_one::<usize>("len").copied().unwrap_or(DEFAULT_NONCE_LEN);
            if len == 0 || len > u32::MAX as usize {
                return Err(format!("--len must be between 1 and {}", u32::MAX));
            }

            let mut witnesses = Vec::new();
            for (label, hex_value) in sub.get_many::<(String, String)>("witness").into_iter().flatten() {
                witnesses.push(Witness {
                    label: label.clone(),
                    bytes: Zeroizing::new(parse_hex(hex_value)?),
                });
            }

            let entropy = match sub.get_one::<String>("entropy") {
                Some(value) => Some(Zeroizing::new(parse_hex(value)?)),
                None => None,
            };

            Ok(Config::Nonce {
                label: required_string(sub, "label")?,
                ops: collect_ops(sub, false)?,
                witnesses,
                len,
                entropy,
                json: sub.get_flag("json"),
            })
        }
        Some(("selftest", sub)) => {
            let threads = sub
                .get_one::<usize>("threads")
                .map_or_else(num_cpus::get, |t| *t);
            if threads == 0 {
                return Err("Thread count must be at least 1".to_string());
            }
            Ok(Config::Selftest {
                threads,
                steps: sub
                    .get_one::<u64>("steps")
                    .copied()
                    .unwrap_or(DEFAULT_SELFTEST_STEPS),
            })
        }
        _ => Err("unknown command".to_string()),
    }
}

fn required_string(matches: &ArgMatches, id: &str) -> Result<String, String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| format!("missing --{id}"))
}

pub fn parse_and_validate_args() -> Config {
    let matches = build_cli().get_matches();

    config_from_matches(&matches).unwrap_or_else(|e| exit_with_error(&e))
}
