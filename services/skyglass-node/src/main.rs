use anyhow::{bail, Context};
use serde::Serialize;
use skyglass_core::{logging, GlassConfig};
use skyglass_domain::{StyleTables, TrackEvent, TrackLayer};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

const NODE_PROTOCOL_VERSION: u32 = 1;
const NODE_RUNTIME_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct NodeVersionHandshake {
    version: &'static str,
    runtime_version: u32,
    protocol_version: u32,
}

#[derive(Debug, Serialize)]
struct Removed<'a> {
    removed: &'a str,
}

/// Track layer plus the stream clock used for pruning.
struct Projection {
    layer: TrackLayer,
    stale_after_ms: u64,
    latest_ms: u64,
}

impl Projection {
    fn new(tables: Arc<StyleTables>, stale_after_ms: u64) -> Self {
        Self {
            layer: TrackLayer::new(tables),
            stale_after_ms,
            latest_ms: 0,
        }
    }

    /// Apply one input line and return the output lines it produces.
    fn handle_line(&mut self, line: &str) -> Vec<String> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }

        let mut event = match TrackEvent::from_json(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Dropping malformed track event");
                return Vec::new();
            }
        };

        // Untimed telemetry is stamped with the stream clock.
        let created = match &mut event {
            TrackEvent::Telemetry(update) => {
                if update.timestamp_ms == 0 {
                    update.timestamp_ms = self.latest_ms;
                }
                self.latest_ms = self.latest_ms.max(update.timestamp_ms);
                self.layer.get(&update.id).is_none().then(|| update.id.clone())
            }
            _ => None,
        };

        let mut changes = self.layer.apply(event);
        if self.stale_after_ms > 0 {
            let pruned = self.layer.prune_stale(self.latest_ms, self.stale_after_ms);
            changes.changed.retain(|id| !pruned.contains(id));
            for id in pruned {
                if created.as_ref() == Some(&id) {
                    debug!(identity = %id, "Dropped track that arrived already stale");
                } else {
                    changes.removed.push(id);
                }
            }
        }

        let mut out = Vec::with_capacity(changes.changed.len() + changes.removed.len());
        for id in &changes.changed {
            let Some(feature) = self.layer.feature(id) else {
                continue;
            };
            match feature.to_json() {
                Ok(json) => out.push(json),
                Err(e) => warn!(identity = %id, error = %e, "Failed to encode map feature"),
            }
        }
        for id in &changes.removed {
            match serde_json::to_string(&Removed { removed: id }) {
                Ok(json) => out.push(json),
                Err(e) => warn!(identity = %id, error = %e, "Failed to encode removal"),
            }
        }
        out
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--version-json") {
        let handshake = NodeVersionHandshake {
            version: env!("CARGO_PKG_VERSION"),
            runtime_version: NODE_RUNTIME_VERSION,
            protocol_version: NODE_PROTOCOL_VERSION,
        };
        println!("{}", serde_json::to_string(&handshake)?);
        return Ok(());
    }

    let config_path = parse_config_path(&args)?;
    let config = GlassConfig::from_file(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    if args.iter().any(|arg| arg == "--json-logs") {
        logging::init_json(&config.logging.level);
    } else {
        logging::init_from_config(&config.logging);
    }

    let tables = Arc::new(StyleTables::from_config(&config.map).context("building style tables")?);
    info!(
        config = %config_path.display(),
        stations = tables.stations.len(),
        stale_after_ms = config.map.stale_after_ms,
        "skyglass-node started"
    );

    let mut projection = Projection::new(tables, config.map.stale_after_ms);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    debug!("Input closed");
                    break;
                };
                for out in projection.handle_line(&line) {
                    stdout.write_all(out.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                }
                stdout.flush().await?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!(tracks = projection.layer.len(), "skyglass-node stopped");
    Ok(())
}

fn parse_config_path(args: &[String]) -> anyhow::Result<PathBuf> {
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        if arg == "--config" {
            if let Some(path) = args_iter.next() {
                return Ok(PathBuf::from(path));
            }
            bail!("--config was provided without a path");
        }
    }

    bail!("missing required --config <path> argument")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn projection(stale_after_ms: u64) -> Projection {
        Projection::new(Arc::new(StyleTables::standard()), stale_after_ms)
    }

    fn parse(lines: &[String]) -> Vec<Value> {
        lines
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_parse_config_path() {
        let args: Vec<String> = ["skyglass-node", "--config", "glass.toml"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(parse_config_path(&args).unwrap(), PathBuf::from("glass.toml"));

        let dangling = vec!["skyglass-node".to_string(), "--config".to_string()];
        assert!(parse_config_path(&dangling).is_err());
        assert!(parse_config_path(&["skyglass-node".to_string()]).is_err());
    }

    #[test]
    fn test_first_telemetry_emits_feature() {
        let mut projection = projection(0);

        let out = parse(&projection.handle_line(
            r#"{"type":"telemetry","id":"7","heading":90,"timestamp_ms":1000}"#,
        ));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id"], "7");
    }

    #[test]
    fn test_unchanged_telemetry_is_silent() {
        let mut projection = projection(0);
        let line = r#"{"type":"telemetry","id":"7","heading":90,"timestamp_ms":1000}"#;

        projection.handle_line(line);
        assert!(projection.handle_line(line).is_empty());
    }

    #[test]
    fn test_malformed_and_blank_lines_skipped() {
        let mut projection = projection(0);

        assert!(projection.handle_line("not json").is_empty());
        assert!(projection.handle_line("   ").is_empty());
        assert!(projection.handle_line(r#"{"type":"warp"}"#).is_empty());
        assert!(projection.layer.is_empty());
    }

    #[test]
    fn test_remove_emits_removal() {
        let mut projection = projection(0);
        projection.handle_line(r#"{"type":"telemetry","id":"7","timestamp_ms":0}"#);

        let out = parse(&projection.handle_line(r#"{"type":"remove","id":"7"}"#));

        assert_eq!(out, vec![serde_json::json!({"removed": "7"})]);
    }

    #[test]
    fn test_select_emits_flipped_tracks() {
        let mut projection = projection(0);
        projection.handle_line(r#"{"type":"telemetry","id":"1","timestamp_ms":0}"#);
        projection.handle_line(r#"{"type":"telemetry","id":"2","timestamp_ms":0}"#);

        let out = parse(&projection.handle_line(r#"{"type":"select","ids":["2"]}"#));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id"], "2");
    }

    #[test]
    fn test_stale_tracks_pruned_by_stream_clock() {
        let mut projection = projection(5_000);
        projection.handle_line(r#"{"type":"telemetry","id":"1","timestamp_ms":1000}"#);

        let out = parse(&projection.handle_line(
            r#"{"type":"telemetry","id":"2","timestamp_ms":7000}"#,
        ));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["id"], "2");
        assert_eq!(out[1], serde_json::json!({"removed": "1"}));
        assert!(projection.layer.get("1").is_none());
    }

    #[test]
    fn test_untimed_telemetry_uses_stream_clock() {
        let mut projection = projection(5_000);
        projection.handle_line(r#"{"type":"telemetry","id":"1","timestamp_ms":100000}"#);

        let out = parse(&projection.handle_line(
            r#"{"type":"telemetry","id":"9","heading":45}"#,
        ));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["id"], "9");
        assert_eq!(projection.layer.get("9").unwrap().last_seen_ms(), 100_000);
    }

    #[test]
    fn test_already_stale_new_track_is_not_reported_removed() {
        let mut projection = projection(5_000);
        projection.handle_line(r#"{"type":"telemetry","id":"1","timestamp_ms":100000}"#);

        let out = projection.handle_line(r#"{"type":"telemetry","id":"9","timestamp_ms":1000}"#);

        assert!(out.is_empty());
        assert!(projection.layer.get("9").is_none());
    }

    #[test]
    fn test_stale_update_of_known_track_reports_removal() {
        let mut projection = projection(5_000);
        projection.handle_line(r#"{"type":"telemetry","id":"9","timestamp_ms":1000}"#);
        projection.handle_line(r#"{"type":"telemetry","id":"1","timestamp_ms":3000}"#);
        let out = parse(&projection.handle_line(
            r#"{"type":"telemetry","id":"1","timestamp_ms":100000}"#,
        ));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["id"], "1");
        assert_eq!(out[1], serde_json::json!({"removed": "9"}));
        assert!(projection.layer.get("9").is_none());
    }
}
