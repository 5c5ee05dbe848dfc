mod cli;

use roomcast::{
    library::{scan::scan_directory, VideoEntry},
    metadata::{FfprobeProber, MetadataResolver, Prober},
    net, server,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "roomcast=debug,tower_http=debug".to_string()
        } else {
            "roomcast=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Serve {
            directory,
            host,
            port,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(directory, host, port))
        }
        Commands::Scan { directory } => scan(&directory),
        Commands::Probe { file, json } => probe(&file, json),
        Commands::Version => {
            println!("roomcast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn serve(directory: PathBuf, host: String, port: u16) -> Result<()> {
    let entries = scan_directory(&directory)?;
    if entries.is_empty() {
        tracing::warn!(
            "no video files found in {}, serving an empty gallery",
            directory.display()
        );
    } else {
        tracing::info!(count = entries.len(), "found video files");
        for entry in &entries {
            tracing::debug!("  - {}", entry.filename);
        }
    }

    let port = if port == 0 {
        let picked = net::find_free_port(5000, 100)
            .ok_or_else(|| anyhow::anyhow!("no free port found starting from 5000"))?;
        tracing::info!(port = picked, "auto-selected free port");
        picked
    } else {
        port
    };

    let prober: Arc<dyn Prober> = match FfprobeProber::from_path() {
        Some(p) => Arc::new(p),
        None => {
            tracing::warn!("ffprobe not found on PATH; metadata extraction will fail until it is installed");
            Arc::new(FfprobeProber::new(PathBuf::from("ffprobe")))
        }
    };

    let ip = net::local_ip();
    let ctx = server::AppContext::new(prober, ip.clone());
    ctx.initialize(entries);

    // Eager pre-cache before the listener starts accepting requests.
    let precache_ctx = ctx.clone();
    tokio::task::spawn_blocking(move || precache_ctx.precache_metadata()).await?;

    print_banner(&ip, port);

    server::start_server(ctx, &host, port).await
}

fn print_banner(ip: &str, port: u16) {
    println!();
    println!("==================================================");
    println!("        ROOMCAST - LOCAL VIDEO STREAMING");
    println!("==================================================");
    println!("Open http://{ip}:{port}/ on any device on this network.");
    println!("Press Ctrl+C to stop the server.");
    println!("==================================================");
    println!();
}

fn scan(directory: &Path) -> Result<()> {
    let entries = scan_directory(directory)?;
    if entries.is_empty() {
        println!("No video files found in {}", directory.display());
        return Ok(());
    }

    println!("Found {} video file(s):", entries.len());
    for entry in &entries {
        println!("  - {}", entry.filename);
    }
    Ok(())
}

fn probe(file: &Path, json: bool) -> Result<()> {
    let prober =
        FfprobeProber::from_path().ok_or_else(|| anyhow::anyhow!("ffprobe not found on PATH"))?;

    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let entry = VideoEntry {
        filename,
        path: file.to_path_buf(),
    };

    let resolver = MetadataResolver::new(Arc::new(prober));
    let meta = resolver.resolve(&entry)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meta)?);
    } else {
        println!("File: {}", meta.path);
        println!("Resolution: {}x{}", meta.width, meta.height);
        println!("FPS: {:.3}", meta.fps);
        println!("Duration: {:.2}s ({} frames)", meta.duration, meta.frame_count);
        println!("Mime type: {}", meta.mime_type);
    }

    Ok(())
}
