use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use avl::Tree;
use clap::{ArgAction, Parser};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(
    name = "avl",
    version,
    about = "Insert values into an AVL tree and print them in ascending order"
)]
struct Cli {
    /// Values to insert, in this order. Without any, `0..count` is inserted.
    #[arg(allow_negative_numbers = true)]
    values: Vec<i64>,

    /// How many ascending values to insert when none are given.
    #[arg(short = 'n', long, env = "AVL_COUNT", default_value_t = 1000)]
    count: i64,

    /// Start printing at the first value greater than or equal to this one.
    #[arg(long, allow_negative_numbers = true)]
    from: Option<i64>,

    /// Written after every printed value.
    #[arg(long, env = "AVL_DELIMITER", default_value_t = ',')]
    delimiter: char,

    /// Log verbosity, repeat for more (-d info, -dd debug, -ddd trace).
    #[arg(short, long, action = ArgAction::Count)]
    debug: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let mut tree = Tree::new();
    if cli.values.is_empty() {
        tree.extend(0..cli.count);
    } else {
        tree.extend(cli.values.iter().copied());
    }
    tracing::info!(len = tree.len(), "built tree");

    let start = match cli.from {
        Some(threshold) => tree.find_bigger_equal_than(&threshold),
        None => tree.begin(),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_values(&mut out, start, cli.delimiter).context("failed to write values to stdout")?;
    out.flush().context("failed to flush stdout")?;

    Ok(())
}

/// Writes every value from `values` followed by `delimiter`, then a newline.
fn write_values<W, I>(out: &mut W, values: I, delimiter: char) -> io::Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: std::fmt::Display,
{
    for value in values {
        write!(out, "{value}{delimiter}")?;
    }
    writeln!(out)
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // `RUST_LOG` wins over `-d` when it's set.
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
}
