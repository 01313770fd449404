use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Events emitted by the service layer after a successful mutation. The
/// route layer's notification fan-out (WebSocket push to connected shop
/// clients) consumes these; the services themselves never push directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    TicketCreated(Uuid),
    TicketUpdated(Uuid),
    TicketDeleted(Uuid),
    TicketStatusChanged {
        ticket_id: Uuid,
        old_status: String,
        new_status: String,
    },
    ClientDeleted {
        client_id: Uuid,
        tickets_removed: u64,
    },
    PartsOrderCreated(Uuid),
    PartsOrderDelivered(Uuid),
    TimerStarted {
        time_log_id: Uuid,
        ticket_id: Uuid,
    },
    TimerStopped {
        time_log_id: Uuid,
        ticket_id: Uuid,
        duration_seconds: i64,
    },
    InvoiceGenerated {
        invoice_id: Uuid,
        ticket_id: Uuid,
        total: Decimal,
    },
    SaleCompleted {
        transaction_id: Uuid,
        total: Decimal,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes the event channel. Currently this only logs each event; the
/// WebSocket notifier subscribes here when the realtime surface is enabled.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::TicketStatusChanged {
                ticket_id,
                old_status,
                new_status,
            } => {
                info!(%ticket_id, %old_status, %new_status, "ticket status changed");
            }
            Event::InvoiceGenerated {
                invoice_id,
                ticket_id,
                total,
            } => {
                info!(%invoice_id, %ticket_id, %total, "invoice generated");
            }
            Event::TimerStopped {
                time_log_id,
                ticket_id,
                duration_seconds,
            } => {
                info!(%time_log_id, %ticket_id, duration_seconds, "timer stopped");
            }
            other => debug!(event = ?other, "event received"),
        }
    }

    info!("Event channel closed; processing loop exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        let id = Uuid::new_v4();

        sender.send(Event::TicketCreated(id)).await.unwrap();

        match rx.recv().await {
            Some(Event::TicketCreated(got)) => assert_eq!(got, id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        assert!(sender.send(Event::TicketUpdated(Uuid::new_v4())).await.is_err());
    }
}
