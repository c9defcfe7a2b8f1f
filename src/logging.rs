//! 日志初始化
//!
//! tracing-subscriber 注册表 + EnvFilter，输出同时写入按天滚动的日志文件
//! 和一个进程内通道（宿主可以取走接收端，自己展示日志）。

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "ztext=info";
pub const LOG_FILE_PREFIX: &str = "ztext.log";

/// drop 时后台写线程刷新剩余日志
pub struct LoggingGuard {
    _worker: WorkerGuard,
    log_dir: PathBuf,
    log_rx: Option<Receiver<String>>,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// 只能取一次
    pub fn take_log_rx(&mut self) -> Option<Receiver<String>> {
        self.log_rx.take()
    }
}

/// 按行发送到通道；不完整的行留在缓冲区，drop 时补发
struct LineSender {
    pending: Vec<u8>,
    tx: Sender<String>,
}

impl LineSender {
    fn new(tx: Sender<String>) -> Self {
        Self {
            pending: Vec::new(),
            tx,
        }
    }

    fn send(&self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            // 接收端已丢弃时静默忽略
            let _ = self.tx.send(line.to_string());
        }
    }
}

impl Write for LineSender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = memchr::memchr(b'\n', &self.pending) {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.send(&line[..pos]);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineSender {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.send(&rest);
        }
    }
}

#[derive(Clone)]
struct FileAndChannel {
    file: NonBlocking,
    tx: Sender<String>,
}

struct FileAndChannelWriter {
    file: NonBlocking,
    lines: LineSender,
}

impl<'a> MakeWriter<'a> for FileAndChannel {
    type Writer = FileAndChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FileAndChannelWriter {
            file: self.file.make_writer(),
            lines: LineSender::new(self.tx.clone()),
        }
    }
}

impl Write for FileAndChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        self.lines.write_all(&buf[..n])?;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// 安装全局 subscriber 和 panic hook
///
/// 目录无法创建，或者全局 subscriber 已经存在时返回 None。
pub fn init(log_dir: &Path) -> Option<LoggingGuard> {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("create log dir {} failed: {}", log_dir.display(), e);
        return None;
    }

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (file, worker) = tracing_appender::non_blocking(appender);
    let (tx, rx) = mpsc::channel::<String>();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(FileAndChannel { file, tx })
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "logging initialized");

    Some(LoggingGuard {
        _worker: worker,
        log_dir: log_dir.to_path_buf(),
        log_rx: Some(rx),
    })
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
