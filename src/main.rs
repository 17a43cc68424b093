// Auctioneer entry point: a local "hotseat" draft where every captain
// shares one terminal and bids are routed by line prefix.
//
// Startup sequence:
// 1. Initialize tracing (log to a timestamped file, not the terminal)
// 2. Load draft.toml (auction settings + lobby)
// 3. Wire the channel messenger and the stdin router
// 4. Run the draft; Ctrl+C fires the cancellation signal
// 5. Print the final teams (or the cancellation notice)

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use tokio::io::AsyncBufReadExt;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use draft_auctioneer::comms::{ChannelInput, ChannelMessenger};
use draft_auctioneer::config;
use draft_auctioneer::draft::coordinator::{run_draft, DraftError};
use draft_auctioneer::draft::{CaptainId, PlayerName};
use draft_auctioneer::rng::DraftRng;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, terminal belongs to the draft)
    init_tracing()?;
    info!("auctioneer starting up");

    // 2. Load config
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "draft.toml".to_string());
    let config =
        config::load_config(Path::new(&path)).context("failed to load draft configuration")?;
    info!(
        "Config loaded: {} captains, {} players, ${} initial currency",
        config.lobby.captains.len(),
        config.lobby.players.len(),
        config.auction.initial_currency
    );

    let captains: Vec<CaptainId> = config.lobby.captains.iter().map(CaptainId::new).collect();
    let players: Vec<PlayerName> = config.lobby.players.iter().map(PlayerName::new).collect();

    // 3. Wire the in-process transport
    let (messenger, mut outbox) = ChannelMessenger::unbounded();
    let (input, senders) = ChannelInput::bind(&captains);

    let printer = tokio::spawn(async move {
        while let Some((captain, text)) = outbox.recv().await {
            println!("[to {captain}] {text}");
        }
    });
    let router = tokio::spawn(route_stdin(senders));

    // 4. Cancellation: Ctrl+C flips the draft-scoped signal
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received; cancelling the draft");
            let _ = cancel_tx.send(true);
        }
    });

    let rng = match config.lobby.seed {
        Some(seed) => DraftRng::seeded(seed),
        None => DraftRng::from_entropy(),
    };

    println!("Drafting has now started. Bid with lines like \"alice: 50\".");
    let result = run_draft(
        captains,
        players,
        &config.auction,
        &messenger,
        &input,
        cancel_rx,
        rng,
    )
    .await;

    // 5. Report the outcome
    match result {
        Ok(teams) => {
            let mut lines: Vec<String> = teams
                .iter()
                .map(|(captain, team)| {
                    let members: Vec<&str> = team.iter().map(|p| p.as_str()).collect();
                    format!("{captain} (captain): {}", members.join(", "))
                })
                .collect();
            lines.sort();
            println!("DRAFTING COMPLETE. TEAMS:\n{}", lines.join("\n"));
        }
        Err(DraftError::Cancelled) => {
            println!("Draft cancelled; no teams were formed.");
        }
        Err(e) => {
            error!("draft failed: {e}");
            return Err(e.into());
        }
    }

    router.abort();
    printer.abort();
    info!("auctioneer shut down cleanly");
    Ok(())
}

/// Route stdin lines of the form `<captain>: <text>` to that captain's
/// input channel. Unknown names and unprefixed lines are reported on
/// stderr and dropped.
async fn route_stdin(senders: HashMap<CaptainId, mpsc::UnboundedSender<String>>) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Some((name, rest)) = line.split_once(':') else {
            eprintln!("Input must look like \"captain: bid\"");
            continue;
        };
        let captain = CaptainId::new(name.trim());
        match senders.get(&captain) {
            Some(tx) => {
                let _ = tx.send(rest.trim().to_string());
            }
            None => eprintln!("Unknown captain '{captain}'"),
        }
    }
}

/// Initialize tracing to a timestamped log file under `logs/`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let stamp = chrono::Local::now().format("%Y-%m-%d_%H_%M_%S");
    let log_file = std::fs::File::create(log_dir.join(format!("{stamp}.log")))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draft_auctioneer=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
