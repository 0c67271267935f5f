use std::{
    env, fs, io,
    net::SocketAddr,
    panic,
    path::{Path, PathBuf},
    str::FromStr,
    thread,
    time::{Duration, SystemTime},
};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

const DEFAULT_LOG_DIR: &str = "/var/log/vanitygen";

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} is not valid unicode")]
    NotUnicode(&'static str),
}

/// Keeps the non-blocking file writer alive; drop it only at process exit.
pub struct TracingGuards {
    file_guard: Option<WorkerGuard>,
}

impl TracingGuards {
    pub fn file_logging(&self) -> bool {
        self.file_guard.is_some()
    }
}

/// Installs the global subscriber: stdout always, plus a daily rolling file
/// under `$LOG_DIR/<service_name>/` when that directory can be created.
pub fn init_tracing(service_name: &str) -> TracingGuards {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_root = log_root(service_name);
    let stdout_layer = fmt::layer().with_writer(io::stdout);

    let file_writer = fs::create_dir_all(&log_root).ok().and_then(|_| {
        // The rolling appender panics if the directory turns out unwritable.
        panic::catch_unwind(|| {
            tracing_appender::rolling::daily(&log_root, format!("{service_name}.log"))
        })
        .ok()
    });

    let file_guard = match file_writer {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let subscriber = Registry::default()
                .with(filter)
                .with(stdout_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer));
            let _ = tracing::subscriber::set_global_default(subscriber);
            Some(guard)
        }
        None => {
            let subscriber = Registry::default().with(filter).with(stdout_layer);
            let _ = tracing::subscriber::set_global_default(subscriber);
            None
        }
    };

    if file_guard.is_some() {
        let retention_days = env_or("LOG_RETENTION_DAYS", 14u64);
        let cleanup_interval = env_or("LOG_CLEANUP_INTERVAL_MINUTES", 360u64);
        spawn_log_cleanup(log_root, retention_days, cleanup_interval);
    }

    TracingGuards { file_guard }
}

fn log_root(service_name: &str) -> PathBuf {
    let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
    PathBuf::from(log_dir).join(service_name)
}

/// Typed environment lookup; unset or unparsable values fall back to `default`.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}

pub fn required_env(key: &'static str) -> Result<String, EnvError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) | Err(env::VarError::NotPresent) => Err(EnvError::Missing(key)),
        Err(env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode(key)),
    }
}

fn spawn_log_cleanup(log_root: PathBuf, retention_days: u64, cleanup_interval_minutes: u64) {
    if retention_days == 0 || cleanup_interval_minutes == 0 {
        return;
    }

    let retention = Duration::from_secs(retention_days * 24 * 60 * 60);
    let interval = Duration::from_secs(cleanup_interval_minutes * 60);

    thread::spawn(move || loop {
        if let Some(cutoff) = SystemTime::now().checked_sub(retention) {
            let removed = cleanup_old_logs(&log_root, cutoff);
            if removed > 0 {
                tracing::debug!(removed, root = %log_root.display(), "removed rolled log files");
            }
        }
        thread::sleep(interval);
    });
}

/// Removes files last modified before `cutoff`, recursing into subdirectories.
/// Returns how many files were removed.
fn cleanup_old_logs(root: &Path, cutoff: SystemTime) -> usize {
    let Ok(entries) = fs::read_dir(root) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            removed += cleanup_old_logs(&path, cutoff);
            continue;
        }
        let modified = fs::metadata(&path).and_then(|metadata| metadata.modified());
        match modified {
            Ok(modified) if modified < cutoff => {
                if fs::remove_file(&path).is_ok() {
                    removed += 1;
                }
            }
            _ => {}
        }
    }
    removed
}

/// Binds on all interfaces so the service is reachable from inside a container.
pub async fn bind_listener(port: u16) -> io::Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    Ok(listener)
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "ctrl-c handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "sigterm handler unavailable");
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }

    tracing::info!("shutdown requested");
}
