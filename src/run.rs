use catalog_worker::config::Config;
use catalog_worker::engine::{Engine, EngineHandle, EngineWorker};
use catalog_worker::messaging::JsonLinesSink;
use catalog_worker::observability::Metrics;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Feed task lines from `input` (or stdin) through the engine worker,
/// writing every outbound message to stdout as one JSON line.
pub async fn run(config: Config, input: Option<PathBuf>) -> Result<(), AnyError> {
    let sink = Arc::new(JsonLinesSink::new(std::io::stdout()));
    let metrics = Arc::new(Metrics::new());
    let engine = Engine::from_config(&config, sink).with_metrics(metrics.clone());
    let (handle, worker) = EngineWorker::spawn(engine, config.worker.queue_capacity);

    let submitted = match &input {
        Some(path) => {
            info!(path = %path.display(), "Reading task messages from file");
            let file = File::open(path).await?;
            feed(BufReader::new(file), &handle).await?
        }
        None => {
            info!("Reading task messages from stdin");
            feed(BufReader::new(tokio::io::stdin()), &handle).await?
        }
    };

    drop(handle);
    let processed = worker.join().await?;

    let snapshot = metrics.snapshot();
    info!(
        submitted,
        processed,
        succeeded = snapshot.tasks_succeeded,
        failed = snapshot.tasks_failed,
        progress_messages = snapshot.progress_emitted,
        "Run finished"
    );

    Ok(())
}

async fn feed<R>(reader: R, handle: &EngineHandle) -> Result<usize, AnyError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut submitted = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        handle.submit_line(line).await?;
        submitted += 1;
    }

    debug!(submitted, "Input exhausted");
    Ok(submitted)
}
