//! Broadcast event bus for out-of-band notification.
//!
//! Downstream consumers (notification senders, invoicing, analytics feeds)
//! subscribe to order events; publishing never blocks the request path and a
//! publish with no subscribers is not an error.

use rxflow_types::OrderEvent;
use tokio::sync::broadcast;

/// Clonable handle to the broadcast channel carrying order events.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<OrderEvent>,
}

impl EventBus {
	/// Creates an event bus with the given channel capacity.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns the number of subscribers that received the event; an
	/// unobserved event is dropped silently.
	pub fn publish(&self, event: OrderEvent) -> usize {
		self.sender.send(event).unwrap_or(0)
	}

	/// Creates a new subscription receiving all events published after it.
	pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
		self.sender.subscribe()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rxflow_types::WorkflowStatus;

	#[tokio::test]
	async fn subscribers_receive_published_events() {
		let bus = EventBus::new(16);
		let mut rx = bus.subscribe();

		let delivered = bus.publish(OrderEvent::WorkflowTransitioned {
			order_id: "o1".into(),
			from: WorkflowStatus::PendingApproval,
			to: WorkflowStatus::Approved,
			actor_id: "D1".into(),
		});
		assert_eq!(delivered, 1);

		match rx.recv().await.unwrap() {
			OrderEvent::WorkflowTransitioned { order_id, to, .. } => {
				assert_eq!(order_id, "o1");
				assert_eq!(to, WorkflowStatus::Approved);
			},
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[test]
	fn publish_without_subscribers_is_not_an_error() {
		let bus = EventBus::new(16);
		let delivered = bus.publish(OrderEvent::Placed {
			order_id: "o1".into(),
			order_number: "ORD-1001".into(),
			retailer_id: "R1".into(),
		});
		assert_eq!(delivered, 0);
	}
}
