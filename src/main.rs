mod report;

use crate::report::{ReportConfig, write_report};
use bitcomb::{BitArray, Combinations, DepthFirstCombinations, Error, Result};
use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum,
    builder::styling::{AnsiColor, Style, Styles},
};
use clio::{Input, Output};
use env_logger::Builder;
use itertools::Itertools;
use log::{LevelFilter, debug, info, warn};
use std::io::{BufRead, BufReader, IsTerminal, Write};
use std::process::ExitCode;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Cyan.on_default().bold())
    .usage(AnsiColor::Yellow.on_default().bold())
    .literal(AnsiColor::Yellow.on_default().bold())
    .placeholder(Style::new().dimmed());

/// Maximum subset size for depth-first enumeration; `None` is unbounded.
#[derive(Debug, Clone, Copy)]
struct MaxDepth(Option<usize>);

fn parse_max_depth(s: &str) -> std::result::Result<MaxDepth, String> {
    if s == "-1" {
        return Ok(MaxDepth(None));
    }
    s.parse()
        .map(|depth| MaxDepth(Some(depth)))
        .map_err(|_| format!("`{s}` is not a valid depth"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SetOp {
    And,
    Or,
    Xor,
    Not,
}

#[derive(Parser)]
#[command(version, about, styles = STYLES, max_term_width = 88)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (-v for normal logging, -vv for detailed logging)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbosity: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Report size, set-bit count and set indices of bit strings, one per line
    Stats {
        /// Input file with one string of 0s and 1s per line
        #[arg(default_value = "-")]
        input: Input,

        /// Output file
        #[arg(short = 'o', long, default_value = "-")]
        output: Output,

        /// Markdown report file path
        #[arg(short = 'r', long)]
        report: Option<String>,
    },

    /// List every k-subset of an n-bit universe
    Combinations {
        /// Universe size
        #[arg(short = 'n', long)]
        size: usize,

        /// Number of set bits in each subset
        #[arg(short = 'k', long)]
        choose: usize,

        /// Output file
        #[arg(short = 'o', long, default_value = "-")]
        output: Output,
    },

    /// List non-empty subsets of an n-bit universe in depth-first order
    Subsets {
        /// Universe size
        #[arg(short = 'n', long)]
        size: usize,

        /// Maximum subset size (-1 for no limit)
        #[arg(short = 'd', long, default_value = "-1", allow_negative_numbers = true, value_parser = parse_max_depth)]
        max_depth: MaxDepth,

        /// Output file
        #[arg(short = 'o', long, default_value = "-")]
        output: Output,
    },

    /// Combine bit strings with a set operation
    Combine {
        /// Set operation to apply
        #[arg(long, value_enum)]
        op: SetOp,

        /// Left operand
        left: String,

        /// Right operand (ignored by `not`)
        right: Option<String>,

        /// Output file
        #[arg(short = 'o', long, default_value = "-")]
        output: Output,
    },

    /// Write a bit string as a raw binary dump (size is not recorded)
    Dump {
        /// String of 0s and 1s
        bits: String,

        /// Output file
        #[arg(short = 'o', long, default_value = "-")]
        output: Output,
    },

    /// Read a raw binary dump of a known number of bits
    Load {
        /// Input file
        #[arg(default_value = "-")]
        input: Input,

        /// Number of bits in the dump
        #[arg(short = 's', long)]
        size: usize,

        /// Output file
        #[arg(short = 'o', long, default_value = "-")]
        output: Output,
    },
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{}] {}", buf.timestamp(), record.args()))
        .init();
}

fn io_name(is_std: bool, path: &std::path::Path, std_name: &str) -> String {
    if is_std {
        std_name.to_string()
    } else {
        path.to_string_lossy().into_owned()
    }
}

fn read_bit_strings(input: Input) -> Result<Vec<BitArray<'static>>> {
    let reader = BufReader::new(input);
    let mut arrays = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(Error::ReadInput)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        arrays.push(BitArray::from_bit_str(line));
    }
    if arrays.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(arrays)
}

fn run_stats(input: Input, mut output: Output, report: Option<&str>) -> Result<()> {
    if input.is_std() && std::io::stdin().is_terminal() {
        #[allow(clippy::unwrap_used)]
        Cli::command().print_help().unwrap();
        return Ok(());
    }

    let input_path = io_name(input.is_std(), input.path(), "<stdin>");
    let output_path = io_name(output.is_std(), output.path(), "<stdout>");

    let arrays = read_bit_strings(input)?;
    info!("Loaded {} bit arrays from {}", arrays.len(), input_path);

    for bits in &arrays {
        writeln!(
            output,
            "{}\t{}\t{}",
            bits.size(),
            bits.num_set(),
            bits.iter_set_bits().format(",")
        )?;
    }

    if let Some(report_path) = report {
        let config = ReportConfig {
            input_path,
            output_path,
        };
        write_report(report_path, &config, &arrays)?;
        info!("Report written to {}", report_path);
    }

    Ok(())
}

fn run_combinations(size: usize, choose: usize, mut output: Output) -> Result<()> {
    let mut count = 0usize;
    for bits in Combinations::new(size, choose)? {
        writeln!(output, "{bits}")?;
        count += 1;
    }
    info!("Listed {count} combinations of {choose} from {size}");
    Ok(())
}

fn run_subsets(size: usize, max_depth: MaxDepth, mut output: Output) -> Result<()> {
    let mut count = 0usize;
    for bits in DepthFirstCombinations::new(size, max_depth.0) {
        writeln!(output, "{bits}")?;
        count += 1;
    }
    info!("Listed {count} subsets of a universe of {size}");
    Ok(())
}

fn operand(left: &BitArray<'_>, right: Option<&str>, op: SetOp) -> Result<BitArray<'static>> {
    let right = right.ok_or_else(|| Error::MissingOperand(format!("{op:?}").to_lowercase()))?;
    let right = BitArray::from_bit_str(right);
    left.check_same_words(&right)?;
    debug!("Combining {left} and {right} with {op:?}");
    Ok(right)
}

fn run_combine(op: SetOp, left: &str, right: Option<&str>, mut output: Output) -> Result<()> {
    let left = BitArray::from_bit_str(left);
    let result = match op {
        SetOp::Not => {
            if right.is_some() {
                warn!("Ignoring right operand for `not`");
            }
            !left
        }
        SetOp::And => {
            let right = operand(&left, right, op)?;
            left & &right
        }
        SetOp::Or => {
            let right = operand(&left, right, op)?;
            left | &right
        }
        SetOp::Xor => {
            let right = operand(&left, right, op)?;
            left ^ &right
        }
    };
    writeln!(output, "{result}")?;
    Ok(())
}

fn run_dump(bits: &str, mut output: Output) -> Result<()> {
    let bits = BitArray::from_bit_str(bits);
    let path = output.path().to_path_buf();
    bits.write_to(&mut output)
        .and_then(|()| output.flush())
        .map_err(|source| Error::DumpWrite { path, source })?;
    info!("Wrote {} bytes for {} bits", bits.byte_len(), bits.size());
    Ok(())
}

fn run_load(mut input: Input, size: usize, mut output: Output) -> Result<()> {
    let path = input.path().to_path_buf();
    let bits = BitArray::from_reader(&mut input, size)
        .map_err(|source| Error::DumpRead { path, source })?;
    writeln!(output, "{bits}")?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Stats {
            input,
            output,
            report,
        } => run_stats(input, output, report.as_deref()),
        Command::Combinations {
            size,
            choose,
            output,
        } => run_combinations(size, choose, output),
        Command::Subsets {
            size,
            max_depth,
            output,
        } => run_subsets(size, max_depth, output),
        Command::Combine {
            op,
            left,
            right,
            output,
        } => run_combine(op, &left, right.as_deref(), output),
        Command::Dump { bits, output } => run_dump(&bits, output),
        Command::Load {
            input,
            size,
            output,
        } => run_load(input, size, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbosity);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
