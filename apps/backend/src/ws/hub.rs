//! Connection registry: the push-messaging substrate the session controller
//! writes to.

use actix::prelude::*;
use dashmap::DashMap;
use tracing::warn;
use uuid::Uuid;

use crate::ws::protocol::{Effect, ServerMsg};

/// Outbound message for a single connection.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Deliver(pub ServerMsg);

/// Server-initiated disconnect.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

struct ConnectionHandle {
    deliver: Recipient<Deliver>,
    shutdown: Recipient<Shutdown>,
}

/// Live connections, keyed by connection id. Mutated only by the transport
/// layer (connect/disconnect); the session controller only emits effects
/// against it.
#[derive(Default)]
pub struct ConnectionRegistry {
    conns: DashMap<Uuid, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        conn_id: Uuid,
        deliver: Recipient<Deliver>,
        shutdown: Recipient<Shutdown>,
    ) {
        self.conns
            .insert(conn_id, ConnectionHandle { deliver, shutdown });
    }

    pub fn unregister(&self, conn_id: &Uuid) {
        self.conns.remove(conn_id);
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    pub fn send_to(&self, conn_id: &Uuid, msg: ServerMsg) {
        match self.conns.get(conn_id) {
            Some(handle) => handle.deliver.do_send(Deliver(msg)),
            None => warn!(conn_id = %conn_id, "unicast to unknown connection dropped"),
        }
    }

    pub fn broadcast(&self, msg: ServerMsg) {
        for handle in self.conns.iter() {
            handle.value().deliver.do_send(Deliver(msg.clone()));
        }
    }

    /// Sever every connection. Each actor unregisters itself as it stops.
    pub fn shutdown_all(&self) {
        for handle in self.conns.iter() {
            handle.value().shutdown.do_send(Shutdown);
        }
    }

    /// Execute the session controller's effects in order.
    pub fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Broadcast(msg) => self.broadcast(msg),
                Effect::Unicast(conn_id, msg) => self.send_to(&conn_id, msg),
                Effect::DisconnectAll => self.shutdown_all(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    struct Sink {
        delivered: Arc<AtomicUsize>,
    }

    impl Actor for Sink {
        type Context = Context<Self>;
    }

    impl Handler<Deliver> for Sink {
        type Result = ();

        fn handle(&mut self, _msg: Deliver, _ctx: &mut Self::Context) {
            self.delivered.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Handler<Shutdown> for Sink {
        type Result = ();

        fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) {
            ctx.stop();
        }
    }

    fn spawn_sink() -> (Addr<Sink>, Arc<AtomicUsize>) {
        let delivered = Arc::new(AtomicUsize::new(0));
        let addr = Sink {
            delivered: delivered.clone(),
        }
        .start();
        (addr, delivered)
    }

    #[actix::test]
    async fn registry_tracks_connections_and_routes_effects() {
        let registry = ConnectionRegistry::new();
        assert!(registry.is_empty());

        let (addr_a, delivered_a) = spawn_sink();
        let (addr_b, delivered_b) = spawn_sink();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        registry.register(a, addr_a.clone().recipient(), addr_a.clone().recipient());
        registry.register(b, addr_b.clone().recipient(), addr_b.clone().recipient());
        assert_eq!(registry.len(), 2);

        registry.dispatch(vec![
            Effect::Broadcast(ServerMsg::MoveToInput),
            Effect::Unicast(a, ServerMsg::StartRevealPhase),
        ]);
        // Mailboxes are FIFO, so a completed round-trip flushes the earlier
        // fire-and-forget deliveries.
        addr_a.send(Deliver(ServerMsg::MoveToInput)).await.unwrap();
        addr_b.send(Deliver(ServerMsg::MoveToInput)).await.unwrap();
        assert_eq!(delivered_a.load(Ordering::SeqCst), 3);
        assert_eq!(delivered_b.load(Ordering::SeqCst), 2);

        registry.unregister(&a);
        assert_eq!(registry.len(), 1);
        registry.unregister(&b);
        assert!(registry.is_empty());
    }

    #[actix::test]
    async fn shutdown_all_severs_every_connection() {
        let registry = ConnectionRegistry::new();
        let (addr, _delivered) = spawn_sink();
        let id = Uuid::new_v4();
        registry.register(id, addr.clone().recipient(), addr.clone().recipient());

        registry.dispatch(vec![Effect::DisconnectAll]);
        // The sink stops on Shutdown, so later sends find a closed mailbox.
        assert!(addr.send(Deliver(ServerMsg::MoveToInput)).await.is_err());
    }
}
