//! Wordle Chain - CLI
//!
//! Play the daily Wordle in a TUI or line mode, decode result codes, and run
//! the encrypted submission pipeline end to end.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use wordle_chain::{
    commands::{
        LocalSubmitter, SnapshotIndexer, collect_results, daily_puzzle, decode_code, run_demo,
        run_simple,
    },
    config::AppConfig,
    game::puzzle_number,
    output::{print_decoded, print_results, print_today},
    submission::RelayConfig,
};

#[derive(Parser)]
#[command(
    name = "wordle_chain",
    about = "Daily Wordle with encrypted, wallet-signed score submission",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Wordlist: 'all' (default), 'answers' (answers only), or path to a guess list
    #[arg(short = 'w', long, global = true, default_value = "all", env = "WORDLE_WORDLIST")]
    wordlist: String,

    /// Puzzle date as YYYY-MM-DD (default: today, UTC)
    #[arg(short, long, global = true, env = "WORDLE_DATE")]
    date: Option<String>,

    /// Domain the sign-in message is bound to
    #[arg(long, global = true, default_value = "wordle.local", env = "WORDLE_RELAY_DOMAIN")]
    domain: String,

    /// Chain ID the sign-in message is bound to
    #[arg(long, global = true, default_value = "137", env = "WORDLE_CHAIN_ID")]
    chain_id: u64,

    /// Seconds a relay nonce stays valid
    #[arg(long, global = true, default_value = "300", env = "WORDLE_NONCE_TTL")]
    nonce_ttl: u64,

    /// Hex vault secret (32 bytes)
    #[arg(long, global = true, env = "WORDLE_VAULT_SECRET", hide_env_values = true)]
    vault_secret: Option<String>,

    /// Pass token finished daily games are submitted under
    #[arg(long, global = true, default_value = "1", env = "WORDLE_TOKEN_ID")]
    token_id: u64,

    /// Hex key of the signing wallet (default: a fresh wallet per run)
    #[arg(long, global = true, env = "WORDLE_WALLET_KEY", hide_env_values = true)]
    wallet_key: Option<String>,

    /// Snapshot file that submitted scores are kept in (readable by 'results')
    #[arg(long, global = true, env = "WORDLE_SNAPSHOT")]
    snapshot: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive TUI mode (default)
    Play,

    /// Simple CLI mode (one guess per line, no TUI)
    Simple,

    /// Show the puzzle number for the date
    Today {
        /// Also print the answer
        #[arg(long)]
        reveal: bool,
    },

    /// Decode a result code into rows
    Decode {
        /// The code, e.g. XYXXGGGGGG
        code: String,

        /// Reject partial rows and unknown characters instead of repairing them
        #[arg(long)]
        strict: bool,
    },

    /// Decrypt and tabulate stored scores from a JSON snapshot
    Results {
        /// Snapshot file (JSON array of records)
        file: PathBuf,

        /// Game ID (default: puzzle number for --date)
        #[arg(short, long)]
        game: Option<i64>,

        /// Only these wallets (repeatable)
        #[arg(long = "wallet")]
        wallets: Vec<String>,

        /// Wallet to request decryption credentials for
        #[arg(long, default_value = "0xresults")]
        reader: String,
    },

    /// Simulate players submitting through the relay, then read results back
    Demo {
        /// Number of simulated players
        #[arg(short = 'n', long, default_value = "5")]
        players: usize,

        /// Write the stored records to this JSON file
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let cli = Cli::parse();

    let relay = RelayConfig {
        domain: cli.domain.clone(),
        uri: format!("http://{}", cli.domain),
        chain_id: cli.chain_id,
        nonce_ttl_secs: cli.nonce_ttl,
        ..RelayConfig::default()
    };
    let config = AppConfig::resolve(&cli.wordlist, cli.date.as_deref(), relay, cli.vault_secret)?;
    let submitter = || {
        LocalSubmitter::new(
            config.relay.clone(),
            config.vault_secret.as_deref(),
            cli.wallet_key.as_deref(),
            cli.token_id,
            cli.snapshot.clone(),
        )
    };

    // Default to Play mode if no command given
    let command = cli.command.unwrap_or(Commands::Play);

    match command {
        Commands::Play => {
            let submitter = submitter()?;
            run_play_command(&config, &submitter)?;
            report_submitter(&config, &submitter);
            Ok(())
        }
        Commands::Simple => {
            let submitter = submitter()?;
            run_simple(&config.dictionary, config.date, Some(&submitter))
                .map_err(|e| anyhow::anyhow!(e))?;
            report_submitter(&config, &submitter);
            Ok(())
        }
        Commands::Today { reveal } => {
            let puzzle = daily_puzzle(&config.dictionary, config.date);
            print_today(puzzle.date, reveal.then_some(puzzle.answer.as_str()));
            Ok(())
        }
        Commands::Decode { code, strict } => {
            let result = decode_code(&code, strict)?;
            print_decoded(&result.code, &result.rows);
            Ok(())
        }
        Commands::Results {
            file,
            game,
            wallets,
            reader,
        } => run_results_command(&config, &file, game, &wallets, &reader),
        Commands::Demo { players, out } => run_demo_command(&config, players, out.as_deref()),
    }
}

fn run_play_command(config: &AppConfig, submitter: &LocalSubmitter) -> Result<()> {
    use wordle_chain::interactive::{App, run_tui};

    let app = App::new(&config.dictionary, config.date).with_submitter(submitter);
    run_tui(app)
}

/// Point at the snapshot so its scores can be read back with `results`
fn report_submitter(config: &AppConfig, submitter: &LocalSubmitter) {
    let Some(path) = submitter.snapshot() else {
        return;
    };
    println!("💾 Scores are kept in {}", path.display());
    if config.vault_secret.is_none() {
        println!("   Vault secret: {}", submitter.vault_secret());
    }
}

fn run_results_command(
    config: &AppConfig,
    file: &std::path::Path,
    game: Option<i64>,
    wallets: &[String],
    reader: &str,
) -> Result<()> {
    let secret = config
        .vault_secret
        .as_deref()
        .context("a vault secret is required (--vault-secret or WORDLE_VAULT_SECRET)")?;
    let game_id = game.unwrap_or_else(|| puzzle_number(config.date));

    let snapshot = SnapshotIndexer::load(file)?;
    let summary = collect_results(&snapshot, secret, reader, game_id, wallets)?;
    print_results(summary.game_id, &summary.report, &summary.groups);
    Ok(())
}

fn run_demo_command(config: &AppConfig, players: usize, out: Option<&std::path::Path>) -> Result<()> {
    println!("🎯 Simulating {players} players for puzzle #{}...", puzzle_number(config.date));

    let summary = run_demo(
        &config.dictionary,
        config.date,
        players,
        &config.relay,
        config.vault_secret.as_deref(),
    )?;

    println!(
        "\n{} {} recorded, {} already submitted",
        "Relay:".bright_cyan().bold(),
        summary.recorded,
        summary.already_submitted
    );
    print_results(summary.game_id, &summary.report, &summary.groups);

    if let Some(path) = out {
        let json = serde_json::to_string_pretty(&summary.records)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("\n💾 Records written to {}", path.display());
        if config.vault_secret.is_none() {
            println!("   Vault secret: {}", summary.vault_secret);
        }
    }
    Ok(())
}
