//! Logging initialization utilities.

use crate::error::Result;
use env_logger::{Env, Target};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Initialize logging with a default filter level.
///
/// `RUST_LOG` still wins over the default; `verbose` only lowers the
/// fallback from `info` to `debug`. With `log_file`, records go to stderr
/// and are also appended to that file.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default = if verbose { "debug" } else { "info" };
    let env = Env::default().default_filter_or(default);
    let mut builder = env_logger::Builder::from_env(env);
    builder.format_target(false);

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(TeeWriter { file })));
    }

    let _ = builder.try_init();
    Ok(())
}

/// Copies every log record to stderr and a file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        io::stderr().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::TeeWriter;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn tee_writer_appends_to_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("xclean.log");
        std::fs::write(&path, "earlier\n").expect("seed");

        let file = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .expect("open");
        let mut writer = TeeWriter { file };
        writer.write_all(b"INFO Saved tokens\n").expect("write");
        writer.flush().expect("flush");

        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text, "earlier\nINFO Saved tokens\n");
    }
}
