//! Daily-rotated file logging.
//!
//! Two independent append-only sinks: `dailyLog/` for operational/telemetry lines and
//! `errorLog/` for failures, each laid out as `<root>/<sink>/YYYY-MM/YYYY-MM-DD.log`.
//! Each sink is guarded by its own async mutex — the binary-semaphore discipline the
//! source design uses for shared mutable state — so concurrent writers serialize
//! instead of interleaving lines. Rotation happens lazily: a write checks whether
//! today's date still matches the open file and reopens if not, and the lifecycle
//! event loop also pulses a rotation at local midnight so a quiet log file still rolls
//! over on schedule.
//!
//! This is distinct from [`crate::tracing`]'s stderr subscriber: that one is for
//! operators watching the process live, this one is the durable history the hit-ratio
//! sampler and error path write into.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

struct Sink {
    subdir: &'static str,
    state: Mutex<SinkState>,
}

struct SinkState {
    date: Option<NaiveDate>,
    writer: Option<BufWriter<File>>,
}

pub struct Logger {
    root: PathBuf,
    daily: Sink,
    error: Sink,
}

impl Logger {
    pub async fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let logger = Self {
            root: root.into(),
            daily: Sink {
                subdir: "dailyLog",
                state: Mutex::new(SinkState {
                    date: None,
                    writer: None,
                }),
            },
            error: Sink {
                subdir: "errorLog",
                state: Mutex::new(SinkState {
                    date: None,
                    writer: None,
                }),
            },
        };
        // Fail fast at startup if the log directory can't be created at all.
        logger.write_line(&logger.daily, "logger initialized").await;
        Ok(logger)
    }

    pub async fn daily_line(&self, line: &str) {
        self.write_line(&self.daily, line).await;
    }

    pub async fn error_line(&self, line: &str) {
        tracing::error!("{line}");
        self.write_line(&self.error, line).await;
    }

    pub async fn flush_all(&self) {
        Self::flush_sink(&self.daily).await;
        Self::flush_sink(&self.error).await;
    }

    /// Closes and reopens both sinks against today's date. Called by the lifecycle
    /// event loop at local midnight so a file rolls over even with no traffic.
    pub async fn rotate(&self) {
        Self::rotate_sink(&self.root, &self.daily).await;
        Self::rotate_sink(&self.root, &self.error).await;
    }

    async fn write_line(&self, sink: &Sink, line: &str) {
        let today = Local::now().date_naive();
        let mut state = sink.state.lock().await;

        if state.date != Some(today) || state.writer.is_none() {
            match open_for(&self.root, sink.subdir, today).await {
                Ok(w) => {
                    state.writer = Some(w);
                    state.date = Some(today);
                }
                Err(err) => {
                    tracing::error!(%err, sink = sink.subdir, "failed to open log file");
                    return;
                }
            }
        }

        if let Some(writer) = state.writer.as_mut() {
            let stamped = format!("{} {line}\n", Local::now().format("%Y-%m-%d %H:%M:%S"));
            if let Err(err) = writer.write_all(stamped.as_bytes()).await {
                tracing::error!(%err, sink = sink.subdir, "failed to write log line");
            }
        }
    }

    async fn flush_sink(sink: &Sink) {
        let mut state = sink.state.lock().await;
        if let Some(writer) = state.writer.as_mut() {
            let _ = writer.flush().await;
        }
    }

    async fn rotate_sink(root: &Path, sink: &Sink) {
        let today = Local::now().date_naive();
        let mut state = sink.state.lock().await;
        if let Some(writer) = state.writer.as_mut() {
            let _ = writer.flush().await;
        }
        match open_for(root, sink.subdir, today).await {
            Ok(w) => {
                state.writer = Some(w);
                state.date = Some(today);
            }
            Err(err) => {
                tracing::error!(%err, sink = sink.subdir, "failed to rotate log file");
            }
        }
    }
}

async fn open_for(root: &Path, subdir: &str, date: NaiveDate) -> anyhow::Result<BufWriter<File>> {
    let month_dir = root.join(subdir).join(date.format("%Y-%m").to_string());
    fs::create_dir_all(&month_dir).await?;
    set_dir_permissions(&month_dir).await;

    let file_path = month_dir.join(format!("{}.log", date.format("%Y-%m-%d")));
    let mut opts = OpenOptions::new();
    opts.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o666);
    }
    let file = opts.open(&file_path).await?;
    Ok(BufWriter::new(file))
}

#[cfg(unix)]
async fn set_dir_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await;
}

#[cfg(not(unix))]
async fn set_dir_permissions(_path: &Path) {}
