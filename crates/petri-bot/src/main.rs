//! Arena driver: the outer read-decide-emit loop.
//!
//! stdout is the command channel, so all diagnostics go to stderr.

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use petri_core::{Board, Planner, Stock, Tunables};
use petri_protocol::{wire, WireError};

#[derive(Parser)]
#[command(name = "petri-bot")]
#[command(about = "Organism-growth contest bot", version)]
struct Cli {
    /// Wall-clock budget per steady-state turn, in milliseconds.
    #[arg(long, default_value_t = 45)]
    turn_budget_ms: u64,

    /// Wall-clock budget for the first turn, in milliseconds.
    #[arg(long, default_value_t = 900)]
    init_budget_ms: u64,

    /// Verbose diagnostics on stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let stdout = std::io::stdout();
    let mut output = stdout.lock();

    let init = wire::read_init(&mut input)?;
    info!(width = init.width, height = init.height, "game started");

    let planner = Planner::new(Tunables::default());
    let mut turn = 0u32;

    loop {
        let input_result = wire::read_turn(&mut input);
        let turn_input = match input_result {
            Ok(turn_input) => turn_input,
            // The referee closing the stream is the normal end of game.
            Err(WireError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let received = Instant::now();
        turn += 1;

        let budget = if turn == 1 {
            Duration::from_millis(cli.init_budget_ms)
        } else {
            Duration::from_millis(cli.turn_budget_ms)
        };

        let board = Board::from_entities(init.width, init.height, &turn_input.entities)?;
        let stock = Stock::new(turn_input.my_stock);

        let commands = planner.plan_until(&board, stock, Some(received + budget));
        debug_assert_eq!(commands.len() as u32, turn_input.required_actions);

        for command in &commands {
            writeln!(output, "{command}")?;
        }
        output.flush()?;

        debug!(
            turn,
            actions = commands.len(),
            elapsed_ms = received.elapsed().as_millis() as u64,
        );
    }

    info!(turns = turn, "input closed, shutting down");
    Ok(())
}
