#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use live_squirrel::{
    Config, Pipeline,
    events::{Event, Level},
    util::{init_http_client, spawn_ct_watcher},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const STAGING_FILE_NAME: &str = "live-squirrel-staging.json";

/// Collects live-stream sources from a remote directory into a deduplicated M3U playlist
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// URL of the root directory document
    #[arg(
        short,
        long,
        env = "LIVE_SQUIRREL_URL",
        default_value = "http://api.hclyz.com:81/mf/json.txt"
    )]
    url: String,

    /// Prefix prepended to relative addresses
    #[arg(
        short,
        long,
        env = "LIVE_SQUIRREL_PREFIX",
        default_value = "http://api.hclyz.com:81/mf/"
    )]
    prefix: String,

    /// Where the playlist is written
    #[arg(
        short,
        long,
        env = "LIVE_SQUIRREL_OUTPUT",
        default_value = "result_deduplicated.m3u"
    )]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let client = init_http_client();
    let ct = CancellationToken::new();

    spawn_ct_watcher(ct.clone());

    let pipeline = Pipeline::new(
        client,
        Config {
            root_url: args.url,
            prefix: args.prefix,
            output_path: args.output,
        },
    )
    .with_staging_file(std::env::temp_dir().join(STAGING_FILE_NAME));

    info!("Collecting sources from {}", pipeline.config().root_url);

    let (reporter, mut events) = live_squirrel::events::Reporter::channel();
    let worker = tokio::spawn({
        let ct = ct.clone();
        async move { pipeline.run(&ct, &reporter).await }
    });

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .context("Building progress bar style")?,
    );

    // The channel closes once the worker drops its reporter
    while let Some(event) = events.recv().await {
        match event {
            Event::Stage(stage) => pb.suspend(|| debug!("Stage: {stage}")),
            Event::Log { level, message } => pb.suspend(|| match level {
                Level::Debug => debug!("{message}"),
                Level::Info => info!("{message}"),
                Level::Warn => warn!("{message}"),
                Level::Error => error!("{message}"),
            }),
            Event::Progress { done, total } => {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            }
            Event::Stats(stats) => pb.set_message(format!(
                "staged {}, extracted {}, unique {}",
                stats.staged, stats.extracted, stats.deduplicated
            )),
        }
    }
    pb.finish_and_clear();

    let summary = worker
        .await
        .context("Pipeline worker panicked")?
        .context("Collecting sources")?;

    if summary.cancelled {
        warn!("Run was cancelled, the playlist only holds what was collected until then");
    }

    let Some(output) = summary.output else {
        if summary.cancelled {
            return Ok(());
        }
        bail!("No entries were collected, nothing to write");
    };

    info!(
        "{}",
        indoc::formatdoc!(
            "All done!
            Staged entries: {}
            Extracted entries: {}
            Unique entries: {}
            Playlist: {}",
            summary.stats.staged,
            summary.stats.extracted,
            summary.stats.deduplicated,
            output.display()
        )
    );

    Ok(())
}
