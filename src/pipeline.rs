use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde_json::Value;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::{
    dedupe::dedupe,
    document::{Document, UNNAMED_TITLE},
    error::PipelineError,
    events::{Reporter, Stage},
    fetch::fetch_text,
    playlist,
    resolve::resolve,
    structs::{Entry, Stats},
    util::truncate_string,
};

/// Root entries carrying this title are satellite TV listings and are never resolved
pub const SKIPPED_TITLE: &str = "卫视直播";

pub const ROOT_TIMEOUT: Duration = Duration::from_secs(30);
pub const ITEM_TIMEOUT: Duration = Duration::from_secs(10);

/// Length at which logged error causes are cut
const CAUSE_MAX_LEN: usize = 100;

/// Caller supplied inputs of a run
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the root directory document
    pub root_url: String,
    /// Prepended to addresses that are not already absolute
    pub prefix: String,
    /// Where the playlist is written
    pub output_path: PathBuf,
}

/// Entries gathered before deduplication
#[derive(Debug, Clone, Default)]
pub struct Collected {
    pub staging: Vec<Entry>,
    pub entries: Vec<Entry>,
    pub cancelled: bool,
}

/// Final status of a completed run
#[derive(Debug, Clone)]
pub struct Summary {
    pub stats: Stats,
    pub cancelled: bool,
    /// Path of the written playlist, `None` when there was nothing to write
    pub output: Option<PathBuf>,
}

pub struct Pipeline {
    client: reqwest::Client,
    config: Config,
    staging_file: Option<PathBuf>,
    root_timeout: Duration,
    item_timeout: Duration,
}

impl Pipeline {
    #[must_use]
    pub const fn new(client: reqwest::Client, config: Config) -> Self {
        Self {
            client,
            config,
            staging_file: None,
            root_timeout: ROOT_TIMEOUT,
            item_timeout: ITEM_TIMEOUT,
        }
    }

    /// Mirror the staging list into a JSON file for inspection
    #[must_use]
    pub fn with_staging_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.staging_file = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_timeouts(mut self, root: Duration, item: Duration) -> Self {
        self.root_timeout = root;
        self.item_timeout = item;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Collects, deduplicates and writes the playlist
    ///
    /// A cancelled run still writes whatever was collected before the cancellation.
    ///
    /// # Errors
    /// Errors when the root document is unusable or the playlist cannot be written
    #[instrument(skip_all, fields(root_url = %self.config.root_url))]
    pub async fn run(
        &self,
        ct: &CancellationToken,
        reporter: &Reporter,
    ) -> Result<Summary, PipelineError> {
        let collected = self.collect(ct, reporter).await?;

        let mut stats = Stats {
            staged: collected.staging.len(),
            extracted: collected.entries.len(),
            deduplicated: 0,
        };

        if collected.entries.is_empty() {
            reporter.warn("No entries were collected, playlist not written");
            if !collected.cancelled {
                reporter.stage(Stage::Done);
            }
            return Ok(Summary {
                stats,
                cancelled: collected.cancelled,
                output: None,
            });
        }

        reporter.info("Deduplicating entries by title");
        let entries = dedupe(collected.entries);
        stats.deduplicated = entries.len();
        reporter.stats(stats);
        reporter.info(format!(
            "Deduplication done, {} unique titles",
            entries.len()
        ));

        let path = &self.config.output_path;
        reporter.info(format!("Writing playlist to {}", path.display()));
        if let Err(source) = playlist::write(path, &entries).await {
            let e = PipelineError::Write {
                path: path.clone(),
                source,
            };
            reporter.error(e.to_string());
            reporter.stage(Stage::Aborted);
            return Err(e);
        }

        let output = std::path::absolute(path).unwrap_or_else(|_| path.clone());
        reporter.info(format!(
            "Playlist written with {} entries: {}",
            entries.len(),
            output.display()
        ));

        if !collected.cancelled {
            reporter.stage(Stage::Done);
        }

        Ok(Summary {
            stats,
            cancelled: collected.cancelled,
            output: Some(output),
        })
    }

    /// Runs the fetch and resolve stages, stopping early when `ct` is cancelled
    ///
    /// Ends on [`Stage::Collect`], or [`Stage::Aborted`] when cancelled; [`Self::run`] emits
    /// [`Stage::Done`] once the playlist is on disk.
    ///
    /// # Errors
    /// Errors when the root document cannot be fetched, parsed, or lacks a `pingtai` array
    pub async fn collect(
        &self,
        ct: &CancellationToken,
        reporter: &Reporter,
    ) -> Result<Collected, PipelineError> {
        reporter.stage(Stage::FetchRoot);
        reporter.info(format!("Fetching root document from {}", self.config.root_url));
        let root = select! {
            () = ct.cancelled() => {
                reporter.warn("Cancelled while fetching root document");
                reporter.stage(Stage::Aborted);
                return Ok(Collected { cancelled: true, ..Collected::default() });
            }
            root = self.fetch_root() => root,
        };
        let root = match root {
            Ok(root) => root,
            Err(e) => {
                reporter.error(format!("Unable to use root document: {e}"));
                reporter.stage(Stage::Aborted);
                return Err(e);
            }
        };

        reporter.stage(Stage::BuildStaging);
        let staging = match build_staging(&root, &self.config.prefix, reporter) {
            Ok(staging) => staging,
            Err(e) => {
                reporter.error(e.to_string());
                reporter.stage(Stage::Aborted);
                return Err(e);
            }
        };
        let mut stats = Stats {
            staged: staging.len(),
            ..Stats::default()
        };
        reporter.stats(stats);
        reporter.info(format!("Staging list built with {} entries", staging.len()));

        if let Some(path) = &self.staging_file {
            write_staging_file(path, &staging, reporter).await;
        }

        reporter.stage(Stage::ResolveEach);
        let total = staging.len();
        let mut entries = Vec::new();
        let mut cancelled = false;

        for (i, item) in staging.iter().enumerate() {
            if ct.is_cancelled() {
                reporter.warn(format!(
                    "Cancelled, keeping the {} entries collected so far",
                    entries.len()
                ));
                cancelled = true;
                break;
            }

            reporter.progress(i + 1, total);
            reporter.info(format!(
                "Fetching ({}/{total}): {} - {}",
                i + 1,
                item.title,
                item.address
            ));

            let found = self.resolve_item(item, reporter).await;
            entries.extend(found);

            stats.extracted = entries.len();
            reporter.stats(stats);
        }

        reporter.stage(Stage::Collect);
        reporter.info(format!(
            "Got {} entries out of {total} staging entries",
            entries.len()
        ));
        if cancelled {
            reporter.stage(Stage::Aborted);
        }

        Ok(Collected {
            staging,
            entries,
            cancelled,
        })
    }

    async fn fetch_root(&self) -> Result<Value, PipelineError> {
        let body = fetch_text(&self.client, &self.config.root_url, self.root_timeout)
            .await
            .map_err(PipelineError::RootFetch)?;
        serde_json::from_str(&body).map_err(PipelineError::RootParse)
    }

    /// Fetches one staging entry's address and turns the response into entries
    ///
    /// Fetch failures are logged and yield nothing.
    async fn resolve_item(&self, item: &Entry, reporter: &Reporter) -> Vec<Entry> {
        let body = match fetch_text(&self.client, &item.address, self.item_timeout).await {
            Ok(body) => body,
            Err(e) => {
                let cause = if e.is_timeout() {
                    "timed out".to_string()
                } else {
                    truncate_string(&e, CAUSE_MAX_LEN)
                };
                reporter.warn(format!(
                    "Unable to fetch {} ({}): {cause}. Skipping",
                    item.title, item.address
                ));
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => {
                let document = Document::classify(&value);
                reporter.debug(format!("{} returned a {document}", item.title));
                document.entries(&item.title, &self.config.prefix)
            }
            Err(e) => {
                reporter.info(format!(
                    "{} did not return JSON ({}), reading it as an address",
                    item.title,
                    truncate_string(&e, CAUSE_MAX_LEN)
                ));
                text_candidate(&body, &item.title, &self.config.prefix)
                    .into_iter()
                    .collect()
            }
        }
    }
}

/// Builds the staging list from the root document's `pingtai` array
///
/// # Errors
/// Errors when `pingtai` is missing or is not an array
pub fn build_staging(
    root: &Value,
    prefix: &str,
    reporter: &Reporter,
) -> Result<Vec<Entry>, PipelineError> {
    let Some(items) = root.get("pingtai").and_then(Value::as_array) else {
        return Err(PipelineError::RootShape(
            "missing `pingtai` array".to_string(),
        ));
    };

    let mut staging = Vec::with_capacity(items.len());
    for item in items {
        let Some(item) = item.as_object() else {
            reporter.warn(format!("Skipping non-object root entry: {item}"));
            continue;
        };

        let title = item.get("title").and_then(Value::as_str).unwrap_or_default();
        if title == SKIPPED_TITLE {
            reporter.info(format!("Skipping entry titled '{SKIPPED_TITLE}'"));
            continue;
        }

        let address = item
            .get("address")
            .and_then(Value::as_str)
            .unwrap_or_default();
        staging.push(Entry::new(title, resolve(address, prefix)));
    }

    Ok(staging)
}

/// Treats a non-JSON body as a single address for the staging entry
#[must_use]
pub fn text_candidate(body: &str, staging_title: &str, prefix: &str) -> Option<Entry> {
    let text = body.trim();
    if text.is_empty() {
        return None;
    }

    let title = if staging_title.is_empty() {
        UNNAMED_TITLE
    } else {
        staging_title
    };
    Some(Entry::new(title, resolve(text, prefix)))
}

async fn write_staging_file(path: &Path, staging: &[Entry], reporter: &Reporter) {
    let json = match serde_json::to_string_pretty(staging) {
        Ok(json) => json,
        Err(e) => {
            reporter.warn(format!("Unable to serialize staging list: {e}"));
            return;
        }
    };

    match tokio::fs::write(path, json).await {
        Ok(()) => debug!("Staging list written to {path:?}"),
        Err(e) => reporter.warn(format!(
            "Unable to write staging file {}: {e}. Continuing without it",
            path.display()
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::events::Event;

    const PREFIX: &str = "http://h/";

    #[test]
    fn staging_skips_satellite_listing() {
        let (reporter, _rx) = Reporter::channel();
        let root = json!({
            "pingtai": [
                { "title": "A", "address": "x" },
                { "title": "卫视直播", "address": "y" },
            ]
        });

        let staging = build_staging(&root, PREFIX, &reporter).unwrap();
        assert_eq!(staging, vec![Entry::new("A", "http://h/x")]);
    }

    #[test]
    fn staging_count_is_total_minus_skipped() {
        let (reporter, _rx) = Reporter::channel();
        let titles = ["a", "卫视直播", "b", "卫视直播", "c", "卫视直播 ", "d"];
        let root = json!({
            "pingtai": titles
                .iter()
                .map(|t| json!({ "title": t, "address": "x" }))
                .collect::<Vec<_>>()
        });

        let staging = build_staging(&root, PREFIX, &reporter).unwrap();
        // Only exact matches are skipped
        assert_eq!(staging.len(), titles.len() - 2);
    }

    #[test]
    fn staging_leaves_absolute_addresses_alone() {
        let (reporter, _rx) = Reporter::channel();
        let root = json!({
            "pingtai": [
                { "title": "rtmp", "address": "rtmp://live/app" },
                { "title": "http", "address": "http://other/x.json" },
                { "title": "missing" },
            ]
        });

        let staging = build_staging(&root, PREFIX, &reporter).unwrap();
        assert_eq!(
            staging,
            vec![
                Entry::new("rtmp", "rtmp://live/app"),
                Entry::new("http", "http://other/x.json"),
                Entry::new("missing", "http://h/"),
            ]
        );
    }

    #[test]
    fn staging_warns_on_non_objects() {
        let (reporter, mut rx) = Reporter::channel();
        let root = json!({ "pingtai": [1, { "title": "A", "address": "x" }] });

        let staging = build_staging(&root, PREFIX, &reporter).unwrap();
        assert_eq!(staging.len(), 1);
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::Log { level: crate::events::Level::Warn, .. })
        ));
    }

    #[test]
    fn root_without_pingtai_is_rejected() {
        let (reporter, _rx) = Reporter::channel();
        for root in [json!({ "zhubo": [] }), json!({ "pingtai": {} }), json!([])] {
            assert!(matches!(
                build_staging(&root, PREFIX, &reporter),
                Err(PipelineError::RootShape(_))
            ));
        }
    }

    #[test]
    fn text_candidate_rules() {
        assert_eq!(
            text_candidate("  rtmp://live/app/1\n", "A", PREFIX),
            Some(Entry::new("A", "rtmp://live/app/1"))
        );
        assert_eq!(
            text_candidate("live/1.flv", "A", PREFIX),
            Some(Entry::new("A", "http://h/live/1.flv"))
        );
        assert_eq!(
            text_candidate("x", "", PREFIX),
            Some(Entry::new(UNNAMED_TITLE, "http://h/x"))
        );
        assert_eq!(text_candidate(" \n\t", "A", PREFIX), None);
    }
}
