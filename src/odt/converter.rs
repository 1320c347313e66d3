use crate::common::config::ConverterConfig;
use crate::common::errors::AppError;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const STDERR_GRACE: Duration = Duration::from_secs(1);
const STDERR_TAIL_CHARS: usize = 2000;

// Turns a rendered ODT into a PDF inside `out_dir`.
pub trait DocumentConverter {
    fn convert(&self, odt: &Path, out_dir: &Path) -> Result<PathBuf, AppError>;
}

#[derive(Debug, Clone)]
pub struct OfficeConverter {
    program: String,
    timeout: Duration,
}

impl OfficeConverter {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            program: config.program.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn wait_with_timeout(&self, child: &mut Child) -> Result<ExitStatus, AppError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AppError::ConversionFailed(format!(
                    "{} timed out after {}s",
                    self.program,
                    self.timeout.as_secs()
                )));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    // Reads stderr while the child runs so a chatty converter never stalls on a full pipe.
    fn drain_stderr(child: &mut Child) -> Option<Receiver<String>> {
        let mut pipe = child.stderr.take()?;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut stderr = Vec::new();
            let _ = pipe.read_to_end(&mut stderr);
            let _ = tx.send(String::from_utf8_lossy(&stderr).into_owned());
        });
        Some(rx)
    }
}

impl DocumentConverter for OfficeConverter {
    fn convert(&self, odt: &Path, out_dir: &Path) -> Result<PathBuf, AppError> {
        if !odt.is_file() {
            return Err(AppError::FileNotFound(odt.display().to_string()));
        }
        let stem = odt
            .file_stem()
            .ok_or_else(|| AppError::InvalidPath(odt.display().to_string()))?;
        let pdf = out_dir.join(format!("{}.pdf", stem.to_string_lossy()));

        let mut child = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(odt)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                AppError::ConversionFailed(format!("failed to start {}: {e}", self.program))
            })?;

        let stderr_reader = Self::drain_stderr(&mut child);
        let status = self.wait_with_timeout(&mut child)?;
        if !status.success() {
            // Grandchildren may keep the pipe open past the exit; wait only briefly.
            let stderr = stderr_reader
                .and_then(|rx| rx.recv_timeout(STDERR_GRACE).ok())
                .unwrap_or_default();
            let stderr = tail(stderr.trim(), STDERR_TAIL_CHARS);
            warn!("{} exited with {status}: {stderr}", self.program);
            return Err(AppError::ConversionFailed(format!(
                "{} exited with {status}: {stderr}",
                self.program
            )));
        }
        if !pdf.is_file() {
            return Err(AppError::ConversionFailed(format!(
                "converted pdf not found at {}",
                pdf.display()
            )));
        }

        info!("converted {} to {}", odt.display(), pdf.display());
        Ok(pdf)
    }
}

fn tail(text: &str, max_chars: usize) -> &str {
    match text.char_indices().rev().nth(max_chars) {
        Some((index, ch)) => &text[index + ch.len_utf8()..],
        None => text,
    }
}
