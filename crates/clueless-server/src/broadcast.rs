//! Barrier fan-out.
//!
//! Every message is dispatched before any reply is awaited, then all replies
//! are joined. A seat that closes or misses the reply deadline is reported
//! as dropped; the caller decides what happens to it.

use crate::connection::{request_within, ConnectionError};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::Seat;
use clueless_core::PlayerId;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// What came back from one fan-out
#[derive(Debug, Default)]
pub struct Delivery {
    pub acknowledged: Vec<PlayerId>,
    pub dropped: Vec<(PlayerId, ConnectionError)>,
}

impl Delivery {
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Send each seat its message and wait until every one has answered or failed.
///
/// Seats already marked disconnected, or with no message, are skipped.
pub async fn fan_out(
    seats: &mut [Seat],
    messages: Vec<(PlayerId, ServerMessage)>,
    reply_timeout: Option<Duration>,
) -> Delivery {
    let mut pending: BTreeMap<PlayerId, ServerMessage> = messages.into_iter().collect();

    let requests = seats
        .iter_mut()
        .filter(|seat| seat.connected)
        .filter_map(|seat| {
            let msg = pending.remove(&seat.id)?;
            Some(async move {
                let kind = msg.kind();
                let result = request_within(seat.connection.as_mut(), msg, reply_timeout).await;
                if let Ok(reply) = &result {
                    if *reply != ClientMessage::Ack {
                        debug!(seat = seat.id, kind, reply = reply.kind(), "non-ack reply to notification");
                    }
                }
                (seat.id, result)
            })
        });

    let mut delivery = Delivery::default();
    for (id, result) in join_all(requests).await {
        match result {
            Ok(_) => delivery.acknowledged.push(id),
            Err(e) => {
                warn!(seat = id, "dropped from fan-out: {}", e);
                delivery.dropped.push((id, e));
            }
        }
    }
    delivery
}
