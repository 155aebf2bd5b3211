//! In-process message bus.
//!
//! [`LoopbackTransport`] implements [`Transport`] without any connection:
//! whatever is passed to [`publish`](LoopbackTransport::publish) is handed to
//! the handlers subscribed on that topic, synchronously and in subscription
//! order. It backs the demos and tests, and suits hosts that decode messages
//! themselves and only need in-process fan-out.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rosviz_core::{Message, MessageHandler, Result, RosvizError, SubscriptionHandle, Transport};

type SharedHandler<M> = Rc<RefCell<MessageHandler<M>>>;

struct Subscriber<M> {
    id: u64,
    topic: String,
    handler: SharedHandler<M>,
}

struct Bus<M> {
    next_id: u64,
    subscribers: Vec<Subscriber<M>>,
    closed: bool,
}

impl<M> Bus<M> {
    fn contains(&self, id: u64) -> bool {
        self.subscribers.iter().any(|s| s.id == id)
    }
}

/// Synchronous in-memory transport for messages of type `M`.
pub struct LoopbackTransport<M> {
    bus: Rc<RefCell<Bus<M>>>,
}

impl<M: Message> LoopbackTransport<M> {
    /// Creates an open bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bus: Rc::new(RefCell::new(Bus {
                next_id: 0,
                subscribers: Vec::new(),
                closed: false,
            })),
        }
    }

    /// Delivers `message` to every handler subscribed on `topic`.
    ///
    /// A handle released while the message is being delivered (for example by
    /// an earlier handler) receives nothing. Returns the number of handlers
    /// that were invoked.
    pub fn publish(&self, topic: &str, message: &M) -> usize {
        let targets: Vec<(u64, SharedHandler<M>)> = self
            .bus
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.topic == topic)
            .map(|s| (s.id, s.handler.clone()))
            .collect();

        let mut delivered = 0;
        for (id, handler) in targets {
            if !self.bus.borrow().contains(id) {
                continue;
            }
            match handler.try_borrow_mut() {
                Ok(mut handler) => {
                    (*handler)(message);
                    delivered += 1;
                }
                Err(_) => log::warn!("skipping re-entrant delivery on '{topic}'"),
            }
        }
        delivered
    }

    /// Returns the number of live subscriptions on `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.bus
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.topic == topic)
            .count()
    }

    /// Drops every subscriber and rejects new subscriptions.
    pub fn close(&self) {
        let mut bus = self.bus.borrow_mut();
        bus.closed = true;
        // Handlers may own node state; release them after the borrow ends.
        let dropped = std::mem::take(&mut bus.subscribers);
        drop(bus);
        drop(dropped);
        log::debug!("loopback transport closed");
    }

    /// Returns whether [`close`](Self::close) was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.bus.borrow().closed
    }
}

impl<M: Message> Default for LoopbackTransport<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clone for LoopbackTransport<M> {
    fn clone(&self) -> Self {
        Self {
            bus: self.bus.clone(),
        }
    }
}

impl<M: Message> Transport<M> for LoopbackTransport<M> {
    fn subscribe(
        &self,
        topic: &str,
        message_type: &str,
        handler: MessageHandler<M>,
    ) -> Result<Box<dyn SubscriptionHandle>> {
        if message_type != M::MESSAGE_TYPE {
            return Err(RosvizError::Transport(format!(
                "topic '{topic}' carries {}, not {message_type}",
                M::MESSAGE_TYPE
            )));
        }

        let mut bus = self.bus.borrow_mut();
        if bus.closed {
            return Err(RosvizError::Transport(format!(
                "cannot subscribe to '{topic}': transport closed"
            )));
        }
        let id = bus.next_id;
        bus.next_id += 1;
        bus.subscribers.push(Subscriber {
            id,
            topic: topic.to_string(),
            handler: Rc::new(RefCell::new(handler)),
        });

        Ok(Box::new(LoopbackHandle {
            id,
            topic: topic.to_string(),
            bus: Rc::downgrade(&self.bus),
        }))
    }
}

/// Registration on a [`LoopbackTransport`].
struct LoopbackHandle<M> {
    id: u64,
    topic: String,
    bus: Weak<RefCell<Bus<M>>>,
}

impl<M: Message> SubscriptionHandle for LoopbackHandle<M> {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn is_active(&self) -> bool {
        let Some(bus) = self.bus.upgrade() else {
            return false;
        };
        let active = bus.borrow().contains(self.id);
        active
    }

    fn unsubscribe(&mut self) {
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        // The handler may hold the last reference to node state; drop it
        // outside the bus borrow.
        let removed: Vec<Subscriber<M>> = {
            let mut bus = bus.borrow_mut();
            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut bus.subscribers)
                .into_iter()
                .partition(|s| s.id == self.id);
            bus.subscribers = kept;
            removed
        };
        drop(removed);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rosviz_core::{CameraInfo, Intrinsics};

    use super::*;

    fn counter(count: &Rc<Cell<usize>>) -> MessageHandler<CameraInfo> {
        let count = count.clone();
        Box::new(move |_| count.set(count.get() + 1))
    }

    fn message() -> CameraInfo {
        CameraInfo::new("cam", Intrinsics::new(1.0, 1.0, 0.0, 0.0), 1, 1)
    }

    #[test]
    fn test_publish_reaches_topic_only() {
        let transport = LoopbackTransport::<CameraInfo>::new();
        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));
        let _ha = transport
            .subscribe("/a", CameraInfo::MESSAGE_TYPE, counter(&a))
            .unwrap();
        let _hb = transport
            .subscribe("/b", CameraInfo::MESSAGE_TYPE, counter(&b))
            .unwrap();

        assert_eq!(transport.publish("/a", &message()), 1);
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 0);
        assert_eq!(transport.publish("/none", &message()), 0);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let transport = LoopbackTransport::<CameraInfo>::new();
        let count = Rc::new(Cell::new(0));
        let mut handle = transport
            .subscribe("/a", CameraInfo::MESSAGE_TYPE, counter(&count))
            .unwrap();
        assert!(handle.is_active());
        assert_eq!(transport.subscriber_count("/a"), 1);

        handle.unsubscribe();
        handle.unsubscribe();
        assert!(!handle.is_active());
        assert_eq!(transport.subscriber_count("/a"), 0);
        assert_eq!(transport.publish("/a", &message()), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_wrong_message_type_rejected() {
        let transport = LoopbackTransport::<CameraInfo>::new();
        let result = transport.subscribe("/a", "sensor_msgs/Image", Box::new(|_| {}));
        assert!(matches!(result, Err(RosvizError::Transport(_))));
    }

    #[test]
    fn test_closed_transport_rejects_subscriptions() {
        let transport = LoopbackTransport::<CameraInfo>::new();
        let count = Rc::new(Cell::new(0));
        let handle = transport
            .subscribe("/a", CameraInfo::MESSAGE_TYPE, counter(&count))
            .unwrap();
        transport.close();
        assert!(transport.is_closed());
        assert!(!handle.is_active());
        assert!(transport
            .subscribe("/a", CameraInfo::MESSAGE_TYPE, counter(&count))
            .is_err());
    }

    #[test]
    fn test_release_during_delivery() {
        let transport = LoopbackTransport::<CameraInfo>::new();
        let second_count = Rc::new(Cell::new(0));
        let second: Rc<RefCell<Option<Box<dyn SubscriptionHandle>>>> = Rc::default();

        let to_release = second.clone();
        let _first = transport
            .subscribe(
                "/a",
                CameraInfo::MESSAGE_TYPE,
                Box::new(move |_| {
                    if let Some(handle) = to_release.borrow_mut().as_mut() {
                        handle.unsubscribe();
                    }
                }),
            )
            .unwrap();
        *second.borrow_mut() = Some(
            transport
                .subscribe("/a", CameraInfo::MESSAGE_TYPE, counter(&second_count))
                .unwrap(),
        );

        assert_eq!(transport.publish("/a", &message()), 1);
        assert_eq!(second_count.get(), 0);
    }
}
