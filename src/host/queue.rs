//! Notification queue between the host and the UI thread.
//!
//! The host may raise notifications from any thread; the margin processes
//! them on its own thread when [`PanelHost::pump`](crate::margin::PanelHost::pump)
//! drains the queue.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use super::Notification;

/// Sending half handed to the host.
#[derive(Debug, Clone)]
pub struct NotificationSender {
    tx: Sender<Notification>,
}

impl NotificationSender {
    /// Queue a notification.
    ///
    /// Returns `false` if the queue has been dropped.
    pub fn send(&self, notification: Notification) -> bool {
        self.tx.send(notification).is_ok()
    }
}

/// Receiving half, owned by the UI thread.
#[derive(Debug)]
pub struct NotificationQueue {
    tx: Sender<Notification>,
    rx: Receiver<Notification>,
}

impl NotificationQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// A sender for the host.
    pub fn sender(&self) -> NotificationSender {
        NotificationSender { tx: self.tx.clone() }
    }

    /// Poll for the next notification (non-blocking).
    pub fn poll(&self) -> Option<Notification> {
        match self.rx.try_recv() {
            Ok(notification) => Some(notification),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain all pending notifications in arrival order.
    pub fn drain(&self) -> Vec<Notification> {
        self.rx.try_iter().collect()
    }

    /// Number of notifications waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Check if no notification is waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NodeId;

    #[test]
    fn test_queue_preserves_order() {
        let queue = NotificationQueue::new();
        let sender = queue.sender();

        assert!(sender.send(Notification::CaretMoved));
        assert!(sender.send(Notification::EncodingChanged { node: NodeId(1) }));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert!(matches!(drained[0], Notification::CaretMoved));
        assert!(matches!(drained[1], Notification::EncodingChanged { node: NodeId(1) }));
        assert!(queue.is_empty());
        assert!(queue.poll().is_none());
    }

    #[test]
    fn test_sender_after_queue_dropped() {
        let queue = NotificationQueue::new();
        let sender = queue.sender();
        drop(queue);
        assert!(!sender.send(Notification::SelectionChanged));
    }
}
