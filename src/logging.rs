//! Logging setup for drivers embedding the generator.

use crate::prelude::*;

/// Route the crate's log records to stderr. A `verbosity` of 0 only shows
/// errors; every step up enables the next level (warn, info, debug, trace).
pub fn init_logging(verbosity: usize) -> Result<()> {
    stderrlog::new()
        .module("tacgen")
        .verbosity(verbosity)
        .init()
        .map_err(|err| anyhow!("Failed to initialise the logger: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_reports_an_error() {
        // Another test may have initialised the logger first, so only the
        // second call in this test is guaranteed to fail.
        let _ = init_logging(0);
        assert!(init_logging(0).is_err());
    }
}
