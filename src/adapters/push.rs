//! Local push dispatcher.
//!
//! Stands in for the hosted topic dispatcher when running on the host: it
//! logs every message and delivers those on subscribed topics straight into
//! the local [`NotificationInbox`], the way a foreground handler would.

use log::{info, warn};

use super::inbox::NotificationInbox;
use crate::alerts::AlertMessage;
use crate::app::ports::{DispatchError, NotificationPort, TimePort};

pub struct LocalPushDispatcher<C: TimePort> {
    clock: C,
    topics: Vec<String>,
    inbox: NotificationInbox,
}

impl<C: TimePort> LocalPushDispatcher<C> {
    pub fn new(clock: C, inbox_capacity: usize) -> Self {
        Self {
            clock,
            topics: Vec::new(),
            inbox: NotificationInbox::new(inbox_capacity),
        }
    }

    /// Start receiving messages published to `topic`.
    pub fn subscribe_topic(&mut self, topic: &str) {
        if !self.topics.iter().any(|t| t == topic) {
            self.topics.push(topic.to_owned());
            info!("Subscribed to topic: {topic}");
        }
    }

    pub fn inbox(&self) -> &NotificationInbox {
        &self.inbox
    }
}

impl<C: TimePort> NotificationPort for LocalPushDispatcher<C> {
    fn send(&mut self, message: &AlertMessage) -> Result<(), DispatchError> {
        if message.title.is_empty() {
            warn!("Rejecting push without a title on {}", message.topic);
            return Err(DispatchError::Rejected);
        }
        info!("PUSH | topic={} | {} | {}", message.topic, message.title, message.body);
        if self.topics.contains(&message.topic) {
            self.inbox.save_alert(message, self.clock.now());
        }
        Ok(())
    }
}
