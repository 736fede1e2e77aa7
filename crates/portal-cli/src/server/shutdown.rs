//! Process signals that end the server.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::signal;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Signal that ended the serve loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => f.write_str("SIGINT"),
            Self::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Resolves once SIGINT or SIGTERM arrives.
///
/// A handler that cannot be installed is logged and never fires, so the other
/// signal still stops the server.
pub async fn shutdown_signal(shutdown_timeout: Duration) {
    let received = first_signal(interrupt(), terminate()).await;

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal = %received,
        timeout_secs = shutdown_timeout.as_secs(),
        "Draining connections before shutdown"
    );
}

async fn first_signal(
    interrupt: impl Future<Output = ()>,
    terminate: impl Future<Output = ()>,
) -> ShutdownSignal {
    tokio::select! {
        () = interrupt => ShutdownSignal::Interrupt,
        () = terminate => ShutdownSignal::Terminate,
    }
}

async fn interrupt() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %err,
            "Cannot listen for SIGINT"
        );
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %err,
                "Cannot listen for SIGTERM"
            );
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_the_signal_that_fired() {
        let received = first_signal(std::future::pending(), async {}).await;
        assert_eq!(received, ShutdownSignal::Terminate);

        let received = first_signal(async {}, std::future::pending()).await;
        assert_eq!(received, ShutdownSignal::Interrupt);
    }

    #[test]
    fn signal_names() {
        assert_eq!(ShutdownSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(ShutdownSignal::Terminate.to_string(), "SIGTERM");
    }
}
