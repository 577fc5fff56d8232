use std::{fs::File, io::Write};

use env_logger::{Builder, Target, WriteStyle};

use crate::{
    Error, Result,
    io::options::{LogFormat, SolverOptions},
};

/// Wires the `log` facade to stderr, or to the configured log file.
pub fn init_logger(options: &SolverOptions) -> Result<()> {
    let format = options.log_format;
    let with_timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder.filter_level(options.log_level.to_filter());
    builder.write_style(WriteStyle::Never);
    builder.format(move |buf, record| {
        let stamp = with_timestamp
            .then(|| format!("{} ", buf.timestamp_millis()))
            .unwrap_or_default();
        match format {
            LogFormat::Compact => writeln!(buf, "{stamp}{} {}", record.level(), record.args()),
            LogFormat::Pretty => writeln!(
                buf,
                "{stamp}{} [{}] {}",
                record.level(),
                record.target(),
                record.args()
            ),
        }
    });
    builder.target(resolve_target(options)?);

    builder
        .try_init()
        .map_err(|e| Error::setup(format!("logger init failed: {e}")))
}

fn resolve_target(options: &SolverOptions) -> Result<Target> {
    let Some(path) = options.log_output_path() else {
        return Ok(Target::Stderr);
    };

    let file = File::create(&path)
        .map_err(|e| Error::setup(format!("cannot create log file {}: {e}", path.display())))?;
    Ok(Target::Pipe(Box::new(file)))
}
