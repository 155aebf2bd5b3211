//! Single-subscription lifecycle.
//!
//! A [`SubscriptionLifecycle`] holds at most one live [`SubscriptionHandle`].
//! Subscribing again always releases the held handle before registering the
//! new one, so a topic change never leaves two handlers receiving messages.

use rosviz_core::{Message, MessageHandler, Result, SubscriptionHandle, Transport};

/// Owner of zero or one live subscription.
#[derive(Default)]
pub struct SubscriptionLifecycle {
    handle: Option<Box<dyn SubscriptionHandle>>,
}

impl SubscriptionLifecycle {
    /// Creates a lifecycle with no subscription.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current subscription with one on `topic`.
    ///
    /// If the transport fails, the previous handle has already been released
    /// and the lifecycle holds nothing.
    pub fn subscribe<M, T>(
        &mut self,
        transport: &T,
        topic: &str,
        handler: MessageHandler<M>,
    ) -> Result<&dyn SubscriptionHandle>
    where
        M: Message,
        T: Transport<M> + ?Sized,
    {
        self.unsubscribe();

        let handle = transport.subscribe(topic, M::MESSAGE_TYPE, handler)?;
        log::debug!("subscribed to '{topic}' ({})", M::MESSAGE_TYPE);
        Ok(&**self.handle.insert(handle))
    }

    /// Releases the held subscription, if any.
    pub fn unsubscribe(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            log::debug!("unsubscribing from '{}'", handle.topic());
            handle.unsubscribe();
        }
    }

    /// Returns whether a live subscription is held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_active())
    }

    /// Returns the topic of the held subscription.
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.handle.as_ref().map(|h| h.topic())
    }
}

impl Drop for SubscriptionLifecycle {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rosviz_core::{CameraInfo, RosvizError};

    use super::*;

    /// Records every registration and release.
    #[derive(Default)]
    struct Log {
        subscribed: Vec<String>,
        released: Vec<String>,
        fail_next: bool,
    }

    struct RecordingTransport(Rc<RefCell<Log>>);

    struct RecordingHandle {
        topic: String,
        active: bool,
        log: Rc<RefCell<Log>>,
    }

    impl SubscriptionHandle for RecordingHandle {
        fn topic(&self) -> &str {
            &self.topic
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn unsubscribe(&mut self) {
            if self.active {
                self.active = false;
                self.log.borrow_mut().released.push(self.topic.clone());
            }
        }
    }

    impl Transport<CameraInfo> for RecordingTransport {
        fn subscribe(
            &self,
            topic: &str,
            message_type: &str,
            _handler: MessageHandler<CameraInfo>,
        ) -> Result<Box<dyn SubscriptionHandle>> {
            assert_eq!(message_type, "sensor_msgs/CameraInfo");
            let mut log = self.0.borrow_mut();
            if std::mem::take(&mut log.fail_next) {
                return Err(RosvizError::Transport("connection closed".into()));
            }
            log.subscribed.push(topic.to_string());
            Ok(Box::new(RecordingHandle {
                topic: topic.to_string(),
                active: true,
                log: self.0.clone(),
            }))
        }
    }

    fn noop() -> MessageHandler<CameraInfo> {
        Box::new(|_| {})
    }

    #[test]
    fn test_subscribe_releases_previous() {
        let log = Rc::new(RefCell::new(Log::default()));
        let transport = RecordingTransport(log.clone());
        let mut lifecycle = SubscriptionLifecycle::new();

        lifecycle.subscribe(&transport, "/a", noop()).unwrap();
        let handle = lifecycle.subscribe(&transport, "/b", noop()).unwrap();
        assert_eq!(handle.topic(), "/b");

        let log = log.borrow();
        assert_eq!(log.subscribed, ["/a", "/b"]);
        assert_eq!(log.released, ["/a"]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let log = Rc::new(RefCell::new(Log::default()));
        let transport = RecordingTransport(log.clone());
        let mut lifecycle = SubscriptionLifecycle::new();

        lifecycle.unsubscribe();
        lifecycle.subscribe(&transport, "/a", noop()).unwrap();
        assert!(lifecycle.is_active());
        lifecycle.unsubscribe();
        lifecycle.unsubscribe();
        assert!(!lifecycle.is_active());
        assert_eq!(lifecycle.topic(), None);
        assert_eq!(log.borrow().released, ["/a"]);
    }

    #[test]
    fn test_failed_subscribe_holds_nothing() {
        let log = Rc::new(RefCell::new(Log::default()));
        let transport = RecordingTransport(log.clone());
        let mut lifecycle = SubscriptionLifecycle::new();

        lifecycle.subscribe(&transport, "/a", noop()).unwrap();
        log.borrow_mut().fail_next = true;
        let err = lifecycle.subscribe(&transport, "/b", noop());
        assert!(matches!(err, Err(RosvizError::Transport(_))));
        assert!(!lifecycle.is_active());
        assert_eq!(log.borrow().released, ["/a"]);

        // Still usable after the failure.
        lifecycle.subscribe(&transport, "/b", noop()).unwrap();
        assert_eq!(lifecycle.topic(), Some("/b"));
    }

    #[test]
    fn test_drop_releases() {
        let log = Rc::new(RefCell::new(Log::default()));
        let transport = RecordingTransport(log.clone());
        {
            let mut lifecycle = SubscriptionLifecycle::new();
            lifecycle.subscribe(&transport, "/a", noop()).unwrap();
        }
        assert_eq!(log.borrow().released, ["/a"]);
    }
}
