use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Quiet period before a burst of filter edits is dispatched
pub const DEFAULT_QUIET: Duration = Duration::from_millis(500);

/// Collapse bursts of values into the last one of each burst
///
/// A value is forwarded once `quiet` has passed without a newer one. When
/// the input closes, a pending value is flushed before the output closes.
pub fn debounce<T: Send + 'static>(
    mut input: mpsc::UnboundedReceiver<T>,
    quiet: Duration,
) -> mpsc::UnboundedReceiver<T> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(mut latest) = input.recv().await {
            loop {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(value) => latest = value,
                        None => {
                            let _ = tx.send(latest);
                            return;
                        }
                    },
                    _ = sleep(quiet) => {
                        if tx.send(latest).is_err() {
                            return;
                        }
                        break;
                    }
                }
            }
        }
    });
    rx
}

/// Sender/receiver pair with debouncing in between
pub fn debounced_channel<T: Send + 'static>(
    quiet: Duration,
) -> (mpsc::UnboundedSender<T>, mpsc::UnboundedReceiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, debounce(rx, quiet))
}
