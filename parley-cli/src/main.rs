mod console;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use console::{ChatRelay, ConsoleObserver};
use dialoguer::Input;
use parley_core::{PeerId, Role, RoomCode};
use parley_session::{
    LocalMedia, MemoryNetwork, MemoryNetworkConfig, Session, SessionHandle, SessionObserver,
    SessionSetup, SessionSnapshot,
};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const MESH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "parley", version, about = "Full-mesh call rooms over an in-process network")]
struct Cli {
    /// Show session logs (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a fresh room code
    RoomCode,

    /// Host a room, let joiners in one by one and report the resulting mesh
    Simulate {
        #[arg(long, default_value_t = 3)]
        joiners: usize,

        /// Report every media stream twice, like multi-track transports do
        #[arg(long)]
        duplicate_streams: bool,
    },

    /// Host a room and chat with simulated participants
    Chat {
        #[arg(long, env = "PARLEY_NAME")]
        name: Option<String>,

        #[arg(long, default_value_t = 2)]
        peers: usize,
    },
}

struct Participant {
    name: String,
    peer_id: PeerId,
    handle: SessionHandle,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::RoomCode => println!("{}", RoomCode::generate()),
        Commands::Simulate {
            joiners,
            duplicate_streams,
        } => simulate(joiners, duplicate_streams).await?,
        Commands::Chat { name, peers } => chat(name.unwrap_or_default(), peers).await?,
    }

    Ok(())
}

async fn simulate(joiners: usize, duplicate_streams: bool) -> Result<()> {
    let network = MemoryNetwork::new(MemoryNetworkConfig { duplicate_streams });
    let room = RoomCode::generate();
    println!("{} {}", "Room".green().bold(), room.to_string().bold());

    let mut participants = vec![join(
        &network,
        &room,
        Role::Host,
        "host",
        Box::new(ConsoleObserver::labelled("host")),
    )?];

    for i in 1..=joiners {
        let name = format!("joiner-{}", i);
        let observer = Box::new(ConsoleObserver::labelled(name.clone()));
        let joiner = join(&network, &room, Role::Joiner, &name, observer)?;

        let everyone: Vec<PeerId> = participants
            .iter()
            .map(|p| p.peer_id.clone())
            .chain(std::iter::once(joiner.peer_id.clone()))
            .collect();
        wait_for_mesh(&joiner.handle, &everyone).await?;
        participants.push(joiner);
    }

    let everyone: Vec<PeerId> = participants.iter().map(|p| p.peer_id.clone()).collect();
    println!();
    println!("{}", "Mesh".cyan().bold());
    for participant in &participants {
        let snapshot = wait_for_mesh(&participant.handle, &everyone).await?;
        println!(
            "   {:<12} {}  data {}  media {}  queued {}",
            participant.name,
            participant.peer_id,
            snapshot.data_peers.len(),
            snapshot.media_peers.len(),
            snapshot.queued.iter().map(|(_, n)| n).sum::<usize>()
        );
    }
    println!(
        "{}",
        format!("✨ {} participants fully meshed", participants.len())
            .green()
            .bold()
    );

    for participant in participants {
        participant.handle.leave().await?;
    }
    Ok(())
}

async fn chat(name: String, peers: usize) -> Result<()> {
    let network = MemoryNetwork::default();
    let room = RoomCode::generate();

    let me = join(
        &network,
        &room,
        Role::Host,
        &name,
        Box::new(ConsoleObserver::new()),
    )?;
    let snapshot = me.handle.snapshot().await?;
    println!(
        "{} {} as {}",
        "Hosting room".green().bold(),
        room.to_string().bold(),
        snapshot.display_name.bold()
    );
    println!(
        "{}",
        "Commands: /mute /unmute /name <new name> /peers /quit".dimmed()
    );

    let mut bots = Vec::new();
    for i in 1..=peers {
        bots.push(spawn_bot(&network, &room, &me.peer_id, &format!("bot-{}", i))?);
    }

    loop {
        let prompt = me.handle.snapshot().await?.display_name;
        let line = tokio::task::spawn_blocking(move || {
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
        })
        .await?;

        let Ok(line) = line else {
            break;
        };
        let line = line.trim();

        match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit", _) => break,
            ("/mute", _) => me.handle.set_muted(true).await?,
            ("/unmute", _) => me.handle.set_muted(false).await?,
            ("/name", rest) => me.handle.change_name(rest).await?,
            ("/peers", _) => print_peers(&me.handle.snapshot().await?),
            _ if line.starts_with('/') => {
                println!("{} {}", "Unknown command".red(), line);
            }
            _ => me.handle.send_chat(line).await?,
        }
    }

    for bot in bots {
        bot.handle.leave().await?;
    }
    me.handle.leave().await?;
    Ok(())
}

fn join(
    network: &MemoryNetwork,
    room: &RoomCode,
    role: Role,
    name: &str,
    observer: Box<dyn SessionObserver>,
) -> Result<Participant> {
    let requested = role.is_host().then(|| room.peer_id());
    let (transport, events) = network
        .join(requested)
        .with_context(|| format!("{} could not join the network", name))?;
    let peer_id = transport.local_id().clone();

    let media = LocalMedia::new(format!("{}-cam", peer_id));
    let setup = match role {
        Role::Host => SessionSetup::host(room.clone(), media),
        Role::Joiner => SessionSetup::joiner(room.clone(), media),
    }
    .with_name(name);
    let name = setup.display_name.clone();

    let (session, handle) = Session::new(setup, transport, events, observer);
    session.spawn();
    info!("{} started as {:?} ({})", name, role, peer_id);

    Ok(Participant {
        name,
        peer_id,
        handle,
    })
}

/// A joiner that answers whatever `listen_to` says in chat.
fn spawn_bot(
    network: &MemoryNetwork,
    room: &RoomCode,
    listen_to: &PeerId,
    name: &str,
) -> Result<Participant> {
    let (relay, mut lines) = ChatRelay::new();
    let bot = join(network, room, Role::Joiner, name, Box::new(relay))?;

    let handle = bot.handle.clone();
    let listen_to = listen_to.clone();
    let bot_name = bot.name.clone();
    tokio::spawn(async move {
        while let Some((from, text)) = lines.recv().await {
            if from != listen_to {
                continue;
            }
            let reply = format!("{} heard \"{}\"", bot_name, text);
            if handle.send_chat(reply).await.is_err() {
                break;
            }
        }
        debug!("{} stopped replying", bot_name);
    });

    Ok(bot)
}

async fn wait_for_mesh(handle: &SessionHandle, peers: &[PeerId]) -> Result<SessionSnapshot> {
    let start = Instant::now();

    loop {
        let snapshot = handle.snapshot().await?;
        if snapshot.is_meshed_with(peers) {
            return Ok(snapshot);
        }
        if start.elapsed() > MESH_TIMEOUT {
            bail!(
                "mesh did not converge within {:?} ({} of {} peers reached)",
                MESH_TIMEOUT,
                snapshot.media_peers.len(),
                peers.len().saturating_sub(1)
            );
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn print_peers(snapshot: &SessionSnapshot) {
    if snapshot.data_peers.is_empty() && snapshot.media_peers.is_empty() {
        println!("{}", "Nobody else is here yet".dimmed());
        return;
    }
    for peer_id in &snapshot.data_peers {
        match snapshot.view(peer_id) {
            Some(view) => {
                let mic = if view.muted { "muted".yellow() } else { "live".green() };
                println!("   {} {} [{}]", view.display_name.bold(), peer_id, mic);
            }
            None => println!("   {} {}", peer_id, "(waiting for media)".dimmed()),
        }
    }
}
