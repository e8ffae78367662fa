//! fpbridge CLI - run and talk to the asset-import bridge.
//!
//! This is the main entry point for the fpbridge command-line application.

mod scene;

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::Deserialize;

use fpbridge::prelude::*;

use crate::scene::LogScene;

/// fpbridge - loopback bridge for exported game assets
#[derive(Parser)]
#[command(name = "fpbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Endpoint {
    /// Bridge address
    #[arg(long, env = "FPBRIDGE_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Bridge port
    #[arg(long, env = "FPBRIDGE_PORT", default_value_t = fpbridge::net::DEFAULT_PORT)]
    port: u16,
}

impl Endpoint {
    fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bridge with a scene that logs every operation
    Serve {
        #[command(flatten)]
        endpoint: Endpoint,

        /// Poll interval in milliseconds
        #[arg(long, env = "FPBRIDGE_POLL_MS", default_value_t = 10)]
        poll_ms: u64,

        /// Resolve assets under this directory instead of the document's AssetsRoot
        #[arg(long, env = "FPBRIDGE_ASSETS_ROOT")]
        assets_root: Option<PathBuf>,

        /// Name of the armature emotes are applied to
        #[arg(long)]
        armature: Option<String>,

        /// Stop after this many seconds
        #[arg(long)]
        run_for: Option<u64>,
    },

    /// Send a request document to a running bridge
    Send {
        /// JSON request document
        file: PathBuf,

        #[command(flatten)]
        endpoint: Endpoint,

        /// Acknowledgement timeout in milliseconds
        #[arg(long, default_value_t = 5000)]
        timeout_ms: u64,
    },

    /// Check whether a bridge is listening
    Probe {
        #[command(flatten)]
        endpoint: Endpoint,

        /// Acknowledgement timeout in milliseconds
        #[arg(long, default_value_t = 1000)]
        timeout_ms: u64,
    },

    /// Merge part skeletons from a JSON file and print the result
    Merge {
        /// JSON list of `{slot, socket, bones: [{name, parent}]}`
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            endpoint,
            poll_ms,
            assets_root,
            armature,
            run_for,
        } => {
            cmd_serve(
                endpoint.addr(),
                Duration::from_millis(poll_ms),
                assets_root,
                armature,
                run_for.map(Duration::from_secs),
            )?;
        }
        Commands::Send {
            file,
            endpoint,
            timeout_ms,
        } => {
            cmd_send(&file, endpoint.addr(), Duration::from_millis(timeout_ms))?;
        }
        Commands::Probe {
            endpoint,
            timeout_ms,
        } => {
            cmd_probe(endpoint.addr(), Duration::from_millis(timeout_ms))?;
        }
        Commands::Merge { input, output } => {
            cmd_merge(&input, output.as_deref())?;
        }
    }

    Ok(())
}

fn cmd_serve(
    addr: SocketAddr,
    poll: Duration,
    assets_root: Option<PathBuf>,
    armature: Option<String>,
    run_for: Option<Duration>,
) -> Result<()> {
    let mut session = ImportSession::new(LogScene::new(armature));
    if let Some(root) = assets_root {
        session = session.with_assets_root(root);
    }

    let config = ListenerConfig::default().with_bind_addr(addr);
    let mut server = Server::start(&config, session)
        .with_context(|| format!("Failed to start the bridge on {}", addr))?;

    println!("Bridge listening on {}", server.local_addr());

    let deadline = run_for.map(|d| Instant::now() + d);
    loop {
        server.poll();

        for notice in server.drain_notices() {
            match notice {
                Notice::Completed { summary } => println!("Import finished: {}", summary),
                Notice::Failed { message } => println!("Import failed: {}", message),
                Notice::Dropped { dropped_total } => {
                    println!("A pending request was replaced before import ({} so far)", dropped_total)
                }
            }
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        std::thread::sleep(poll);
    }

    let stats = server.stats();
    let session = server.stop();
    info!(
        "Received {} documents ({} replaced), imported {}, created {} objects and {} materials",
        stats.published,
        stats.dropped,
        session.documents(),
        session.scene().objects(),
        session.scene().materials()
    );

    Ok(())
}

fn cmd_send(file: &Path, addr: SocketAddr, timeout: Duration) -> Result<()> {
    let text = fs::read_to_string(file).context("Failed to read request document")?;
    serde_json::from_str::<serde_json::Value>(&text).context("Request document is not valid JSON")?;

    let client = Client::connect(ClientConfig::new(addr).with_ack_timeout(timeout))
        .context("Failed to open client socket")?;

    let pb = ProgressBar::new(text.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes}")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    client
        .send_with_progress(&text, |sent, _| pb.set_position(sent as u64))
        .with_context(|| format!("Bridge at {} did not acknowledge the document", addr))?;

    pb.finish_with_message("Done");
    println!("Sent {} bytes in {:?}", text.len(), start.elapsed());

    Ok(())
}

fn cmd_probe(addr: SocketAddr, timeout: Duration) -> Result<()> {
    let client = Client::connect(ClientConfig::new(addr).with_ack_timeout(timeout))
        .context("Failed to open client socket")?;

    if client.check_server()? {
        println!("Bridge at {} is listening", addr);
        Ok(())
    } else {
        anyhow::bail!("No bridge answered at {}", addr)
    }
}

#[derive(Deserialize)]
struct MergeInput {
    /// Label used for the part in the output; defaults to its index.
    #[serde(default)]
    name: Option<String>,
    slot: PartSlot,
    #[serde(default)]
    socket: Option<String>,
    bones: Vec<BoneNode>,
}

fn cmd_merge(input: &Path, output: Option<&Path>) -> Result<()> {
    let data = fs::read(input).context("Failed to read input file")?;
    let inputs: Vec<MergeInput> = serde_json::from_slice(&data).context("Failed to parse merge input")?;

    let mut parts = Vec::with_capacity(inputs.len());
    for (index, part) in inputs.into_iter().enumerate() {
        let label = part.name.unwrap_or_else(|| format!("part{}", index));
        let tree = HierarchyTree::from_bones(part.bones)
            .with_context(|| format!("Invalid skeleton for {}", label))?;
        parts.push(RigPart::new(part.slot, part.socket, tree, label));
    }

    let outcome = merge(parts, &MergeOptions::default());
    let json = serde_json::to_string_pretty(&outcome).context("Failed to serialize merge result")?;

    match output {
        Some(path) => {
            fs::write(path, json).context("Failed to write output file")?;
            println!(
                "Merged {} bones ({} removed, {} attachments) into {}",
                outcome.tree.len(),
                outcome.removed.len(),
                outcome.attachments.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
