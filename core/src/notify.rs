use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Mutex, PoisonError};

/// Sent after any successful save or delete. Carries no payload; listeners
/// re-read the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceUpdated;

/// Fan-out of [`AttendanceUpdated`] to registered listeners.
#[derive(Debug, Default)]
pub struct UpdateNotifier {
    subscribers: Mutex<Vec<Sender<AttendanceUpdated>>>,
}

impl UpdateNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<AttendanceUpdated> {
        let (tx, rx) = channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Notifies every live subscriber, forgetting the ones that hung up.
    pub fn notify(&self) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(AttendanceUpdated).is_ok());
        tracing::debug!(listeners = subscribers.len(), "attendance updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_is_notified() {
        let notifier = UpdateNotifier::new();
        let a = notifier.subscribe();
        let b = notifier.subscribe();

        notifier.notify();

        assert_eq!(a.try_recv(), Ok(AttendanceUpdated));
        assert_eq!(b.try_recv(), Ok(AttendanceUpdated));
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let notifier = UpdateNotifier::new();
        let kept = notifier.subscribe();
        drop(notifier.subscribe());
        assert_eq!(notifier.subscribers.lock().unwrap().len(), 2);

        notifier.notify();

        assert_eq!(notifier.subscribers.lock().unwrap().len(), 1);
        assert_eq!(kept.try_recv(), Ok(AttendanceUpdated));
    }
}
