//! Debounced values

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Publishes the latest input once `delay` has passed without a newer one.
///
/// Must be created inside a tokio runtime; the timer runs on a spawned task that stops
/// when the debouncer is dropped.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: watch::Receiver<T>,
    delay: Duration,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, mut pending_rx) = mpsc::unbounded_channel::<T>();
        let (publish, output) = watch::channel(initial);

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => match pending_rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(value) => {
                        tokio::select! {
                            next = pending_rx.recv() => match next {
                                Some(newer) => pending = Some(newer),
                                None => {
                                    publish.send_replace(value);
                                    break;
                                }
                            },
                            _ = tokio::time::sleep(delay) => {
                                publish.send_replace(value);
                            }
                        }
                    }
                }
            }
        });

        Self {
            input,
            output,
            delay,
            task,
        }
    }

    /// Schedule `value`; restarts the quiet period
    pub fn set(&self, value: T) {
        if self.input.send(value).is_err() {
            tracing::warn!("Debouncer task has stopped; value dropped");
        }
    }

    /// The last published value
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
