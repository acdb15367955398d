// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2018-2026 Meridian Markets Pty Ltd. All rights reserved.
//  https://meridianmarkets.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! A common in-memory `MessageBus` for loosely coupled message passing patterns.
//!
//! The bus dispatches messages serially: each handler runs to completion before
//! the next message is processed. Components therefore require no internal
//! locking (single-threaded cooperative scheduling).

pub mod handler;
pub mod matching;

use std::{any::Any, cell::RefCell, rc::Rc};

use handler::ShareableMessageHandler;
use indexmap::IndexMap;
use matching::is_matching;
use ustr::Ustr;

/// A subscription of a handler to a topic pattern.
#[derive(Clone, Debug)]
pub struct Subscription {
    /// The topic pattern subscribed to (may contain wildcards).
    pub pattern: Ustr,
    /// The handler to dispatch matching messages to.
    pub handler: ShareableMessageHandler,
    /// The priority for the subscription (higher dispatched first).
    pub priority: u8,
}

/// A message bus connecting components via topic publishing and endpoints.
#[derive(Default)]
pub struct MessageBus {
    subscriptions: Vec<Subscription>,
    endpoints: IndexMap<Ustr, ShareableMessageHandler>,
}

impl MessageBus {
    /// Creates a new [`MessageBus`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of current subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns the handler registered for the given `endpoint` (if any).
    #[must_use]
    pub fn get_endpoint(&self, endpoint: &Ustr) -> Option<&ShareableMessageHandler> {
        self.endpoints.get(endpoint)
    }

    /// Returns all subscriptions matching the given `topic`, in priority order.
    #[must_use]
    pub fn matching_subscriptions(&self, topic: &Ustr) -> Vec<Subscription> {
        let mut matching: Vec<Subscription> = self
            .subscriptions
            .iter()
            .filter(|sub| is_matching(topic, &sub.pattern))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.priority.cmp(&a.priority));
        matching
    }

    fn subscribe(&mut self, pattern: Ustr, handler: ShareableMessageHandler, priority: u8) {
        let exists = self
            .subscriptions
            .iter()
            .any(|sub| sub.pattern == pattern && sub.handler.0.id() == handler.0.id());
        if exists {
            log::warn!("Handler {} already subscribed to '{pattern}'", handler.0.id());
            return;
        }
        self.subscriptions.push(Subscription {
            pattern,
            handler,
            priority,
        });
    }

    fn unsubscribe(&mut self, pattern: &Ustr, handler: &ShareableMessageHandler) {
        self.subscriptions
            .retain(|sub| !(sub.pattern == *pattern && sub.handler.0.id() == handler.0.id()));
    }

    fn register(&mut self, endpoint: Ustr, handler: ShareableMessageHandler) {
        self.endpoints.insert(endpoint, handler);
    }

    fn deregister(&mut self, endpoint: &Ustr) {
        self.endpoints.shift_remove(endpoint);
    }
}

thread_local! {
    static MESSAGE_BUS: RefCell<Option<Rc<RefCell<MessageBus>>>> = const { RefCell::new(None) };
}

/// Sets the message bus for the current thread.
pub fn set_message_bus(msgbus: Rc<RefCell<MessageBus>>) {
    MESSAGE_BUS.with(|bus| {
        *bus.borrow_mut() = Some(msgbus);
    });
}

/// Returns the message bus for the current thread, initializing a default
/// instance on first use.
pub fn get_message_bus() -> Rc<RefCell<MessageBus>> {
    MESSAGE_BUS.with(|bus| {
        let mut bus = bus.borrow_mut();
        if bus.is_none() {
            *bus = Some(Rc::new(RefCell::new(MessageBus::default())));
        }
        bus.as_ref().unwrap().clone()
    })
}

/// Sends the `message` to the handler registered for the `endpoint` address.
pub fn send(endpoint: &Ustr, message: &dyn Any) {
    let handler = get_message_bus().borrow().get_endpoint(endpoint).cloned();
    if let Some(handler) = handler {
        handler.0.handle(message);
    } else {
        log::error!("No registered endpoint '{endpoint}'");
    }
}

/// Publishes the `message` to the given `topic`.
pub fn publish(topic: &Ustr, message: &dyn Any) {
    log::trace!("Publishing topic '{topic}'");
    let matching_subs = get_message_bus().borrow().matching_subscriptions(topic);

    for sub in matching_subs {
        sub.handler.0.handle(message);
    }
}

/// Subscribes the `handler` to the given `pattern` with an optional priority.
pub fn subscribe<T: AsRef<str>>(pattern: T, handler: ShareableMessageHandler, priority: Option<u8>) {
    get_message_bus().borrow_mut().subscribe(
        Ustr::from(pattern.as_ref()),
        handler,
        priority.unwrap_or(0),
    );
}

/// Unsubscribes the `handler` from the given `pattern`.
pub fn unsubscribe<T: AsRef<str>>(pattern: T, handler: &ShareableMessageHandler) {
    get_message_bus()
        .borrow_mut()
        .unsubscribe(&Ustr::from(pattern.as_ref()), handler);
}

/// Registers the given `handler` for the `endpoint` address.
pub fn register<T: AsRef<str>>(endpoint: T, handler: ShareableMessageHandler) {
    get_message_bus()
        .borrow_mut()
        .register(Ustr::from(endpoint.as_ref()), handler);
}

/// Deregisters the handler for the `endpoint` address.
pub fn deregister(endpoint: &Ustr) {
    get_message_bus().borrow_mut().deregister(endpoint);
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use rstest::rstest;

    use super::{handler::TypedMessageHandler, *};

    fn collecting_handler(
        received: Rc<RefCell<Vec<u64>>>,
        id: &str,
    ) -> ShareableMessageHandler {
        ShareableMessageHandler(Rc::new(TypedMessageHandler::new(
            Some(id),
            move |msg: &u64| received.borrow_mut().push(*msg),
        )))
    }

    #[rstest]
    fn test_publish_dispatches_to_matching_subscription() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let handler = collecting_handler(received.clone(), "test-sub-1");
        subscribe("test1.topic.*", handler.clone(), None);

        publish(&Ustr::from("test1.topic.a"), &42u64);
        publish(&Ustr::from("other.topic"), &43u64);

        assert_eq!(*received.borrow(), vec![42]);
        unsubscribe("test1.topic.*", &handler);
    }

    #[rstest]
    fn test_unsubscribe_stops_dispatch() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let handler = collecting_handler(received.clone(), "test-sub-2");
        subscribe("test2.topic", handler.clone(), None);
        unsubscribe("test2.topic", &handler);

        publish(&Ustr::from("test2.topic"), &42u64);
        assert!(received.borrow().is_empty());
    }

    #[rstest]
    fn test_endpoint_send() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let handler = collecting_handler(received.clone(), "test-endpoint");
        register("Test.endpoint", handler);

        send(&Ustr::from("Test.endpoint"), &7u64);
        assert_eq!(*received.borrow(), vec![7]);
        deregister(&Ustr::from("Test.endpoint"));
    }

    #[rstest]
    fn test_duplicate_subscription_ignored() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let handler = collecting_handler(received.clone(), "test-sub-3");
        subscribe("test3.topic", handler.clone(), None);
        subscribe("test3.topic", handler.clone(), None);

        publish(&Ustr::from("test3.topic"), &1u64);
        assert_eq!(*received.borrow(), vec![1]);
        unsubscribe("test3.topic", &handler);
    }
}
