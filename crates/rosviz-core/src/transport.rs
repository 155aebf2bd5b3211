//! Message transport interface.
//!
//! A [`Transport`] delivers decoded messages for a topic to a callback. The
//! connection itself (websocket, shared memory, in-process bus) lives outside
//! this crate.

use crate::error::Result;
use crate::message::Message;

/// Callback invoked once per delivered message.
pub type MessageHandler<M> = Box<dyn FnMut(&M)>;

/// One live registration with a transport.
pub trait SubscriptionHandle {
    /// Returns the topic this handle is registered on.
    fn topic(&self) -> &str;

    /// Returns whether the handle still receives messages.
    fn is_active(&self) -> bool;

    /// Stops delivery to this handle.
    ///
    /// Calling this on an already released handle does nothing.
    fn unsubscribe(&mut self);
}

/// Source of decoded messages of type `M`.
pub trait Transport<M: Message> {
    /// Registers `handler` for every message published on `topic`.
    ///
    /// Messages for one subscription are delivered in the order the
    /// transport received them.
    fn subscribe(
        &self,
        topic: &str,
        message_type: &str,
        handler: MessageHandler<M>,
    ) -> Result<Box<dyn SubscriptionHandle>>;
}
