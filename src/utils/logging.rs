use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::{
    format::FmtSpan,
    writer::{BoxMakeWriter, MakeWriterExt},
};

pub const LOG_PREFIX: &str = "awdash";

/// Logs go to stderr, so that stdout only carries the dashboard. Files are written only when a
/// directory is given.
pub fn enable_logging(
    log_dir: Option<&Path>,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    let writer = log_writer(log_dir, show_std)?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter_directive(log_level)))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
        .pretty()
        .init();
    Ok(())
}

fn log_writer(log_dir: Option<&Path>, show_std: bool) -> Result<BoxMakeWriter> {
    let stderr = std::io::stderr.with_filter(move |_| show_std);

    let writer = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::Builder::new()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix(LOG_PREFIX)
                .build(dir)?;
            BoxMakeWriter::new(stderr.and(appender))
        }
        None => BoxMakeWriter::new(stderr),
    };
    Ok(writer)
}

/// Level from the arguments, then `RUST_LOG`. Only warnings are kept otherwise.
fn filter_directive(log_level: Option<LevelFilter>) -> String {
    let level = log_level
        .map(|v| v.to_string())
        .unwrap_or_else(|| std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()));

    format!("{}={level}", env!("CARGO_PKG_NAME").replace("-", "_"))
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::fmt::MakeWriter;

    use super::{filter_directive, log_writer, LOG_PREFIX};

    #[test]
    fn writes_into_log_dir() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let writer = log_writer(Some(dir.path()), false)?;
        let mut line = writer.make_writer();
        line.write_all(b"rolled line\n")?;
        line.flush()?;
        drop(line);

        let files = std::fs::read_dir(dir.path())?
            .map(|v| v.map(|v| v.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        assert_eq!(files.len(), 1);
        let name = files[0].file_name().and_then(|v| v.to_str()).unwrap_or_default();
        assert!(name.starts_with(LOG_PREFIX));
        assert!(std::fs::read_to_string(&files[0])?.contains("rolled line"));
        Ok(())
    }

    #[test]
    fn writer_without_dir() -> Result<()> {
        log_writer(None, false)?;
        Ok(())
    }

    #[test]
    fn directive_is_scoped_to_crate() {
        assert_eq!(filter_directive(Some(LevelFilter::TRACE)), "awdash=trace");
        assert_eq!(filter_directive(Some(LevelFilter::WARN)), "awdash=warn");
    }
}
