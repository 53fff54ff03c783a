pub mod builders;
pub mod fake_client;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use snapctl::backup::SchedulerOptions;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Upper bound for any single scheduler run in tests.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialise tracing for tests.
///
/// Output goes through `with_test_writer()`, so it is only shown for failing
/// tests unless run with `-- --nocapture`. `RUST_LOG` overrides the default
/// `warn,snapctl=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,snapctl=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Scheduler options for tests: the given parallelism and no sleep between
/// polling rounds.
pub fn fast_options(parallelism: usize) -> SchedulerOptions {
    SchedulerOptions::new(parallelism)
        .expect("parallelism must be >= 1")
        .with_poll_interval(Duration::ZERO)
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .expect("scheduler run did not finish in time")
}
