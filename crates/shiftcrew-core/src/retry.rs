//! Linear-backoff retry for blocking transport calls.

use std::time::Duration;
use tracing::warn;

/// Run `op` up to `tries` times, sleeping `base * attempt` between attempts.
/// Only errors `is_transient` accepts are retried; everything else (and the
/// final failure) propagates unchanged.
pub fn with_backoff<T, E, F, P>(
    tries: u32,
    base: Duration,
    mut op: F,
    mut is_transient: P,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    P: FnMut(&E) -> bool,
    E: std::fmt::Display,
{
    let tries = tries.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= tries || !is_transient(&err) {
                    return Err(err);
                }
                warn!(attempt, tries, error = %err, "transient failure, retrying");
                std::thread::sleep(base * attempt);
                attempt += 1;
            }
        }
    }
}
