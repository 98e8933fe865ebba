//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! WebSocket transport adapter for the Armordex protocol engines.
//!
//! [`StreamDriver`] owns one engine ([`armordex_core::UserStream`] or
//! [`armordex_core::MarketStream`], anything implementing
//! [`ProtocolHandler`]) and drives it over a WebSocket: inbound frames go to
//! `deliver`, outbound frames queue through an injected sink, open and close
//! are reported with the clean/unclean distinction.
//!
//! The engines expect all calls on one thread, so access from other tasks
//! goes through the driver's mailbox: a [`StreamHandle`] submits closures
//! which the driver applies to the engine between transport events. That is
//! the serialization boundary; nothing else may touch the engine while the
//! driver runs.
//!
//! Reconnecting is deliberately left to the caller: run the driver again with
//! the engine it returned, and a user stream will re-handshake on open.

use anyhow::{anyhow, Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, warn};

use armordex_core::error::TransportError;
use armordex_core::transport::{OutboundSink, ProtocolHandler};

/// Closure applied to the engine between transport events.
pub type StreamOp<H> = Box<dyn FnOnce(&mut H) + Send>;

/// Cloneable handle submitting operations to a running [`StreamDriver`].
pub struct StreamHandle<H> {
    ops: mpsc::UnboundedSender<StreamOp<H>>,
}

impl<H> Clone for StreamHandle<H> {
    fn clone(&self) -> Self {
        StreamHandle {
            ops: self.ops.clone(),
        }
    }
}

impl<H> StreamHandle<H> {
    /// Run `op` against the engine on the driver's thread. Fails once the
    /// driver has shut down.
    pub fn with(&self, op: impl FnOnce(&mut H) + Send + 'static) -> Result<()> {
        self.ops
            .send(Box::new(op))
            .map_err(|_| anyhow!("stream driver is gone"))
    }
}

/// Sink handing outbound engine frames to the WebSocket write half.
struct ChannelSink {
    frames: mpsc::UnboundedSender<Vec<u8>>,
}

impl OutboundSink for ChannelSink {
    fn send(&mut self, frame: Vec<u8>) -> Result<(), TransportError> {
        self.frames
            .send(frame)
            .map_err(|_| TransportError::SendFailed("connection closed".to_owned()))
    }
}

/// Drives one protocol engine over one WebSocket connection.
pub struct StreamDriver<H> {
    handler: H,
    ops: mpsc::UnboundedReceiver<StreamOp<H>>,
    handle: StreamHandle<H>,
}

impl<H: ProtocolHandler + Send> StreamDriver<H> {
    pub fn new(handler: H) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        StreamDriver {
            handler,
            ops: rx,
            handle: StreamHandle { ops: tx },
        }
    }

    /// Handle for other tasks to reach the engine while the driver runs.
    pub fn handle(&self) -> StreamHandle<H> {
        self.handle.clone()
    }

    /// Direct access to the engine before the driver runs, e.g. to register
    /// listeners.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Connect to `url` and run until the connection is gone. Returns the
    /// engine so the caller can inspect it or reconnect with it.
    pub async fn run(mut self, url: &str) -> Result<H> {
        let (socket, _response) = connect_async(url)
            .await
            .with_context(|| format!("failed to connect to {url}"))?;
        debug!(url, "websocket connected");
        let (mut write, mut read) = socket.split();
        let (frames_tx, mut frames_rx) = mpsc::unbounded_channel();
        self.handler.opened(Box::new(ChannelSink { frames: frames_tx }));

        loop {
            tokio::select! {
                Some(op) = self.ops.recv() => op(&mut self.handler),
                Some(frame) = frames_rx.recv() => {
                    if let Err(error) = write.send(WsMessage::Binary(frame)).await {
                        warn!(%error, "websocket send failed");
                        self.handler.closed(false, 1006, &error.to_string());
                        break;
                    }
                }
                message = read.next() => match message {
                    Some(Ok(WsMessage::Text(text))) => self.handler.deliver(&text),
                    Some(Ok(WsMessage::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => self.handler.deliver(text),
                        Err(_) => warn!("dropping non-UTF-8 frame"),
                    },
                    Some(Ok(WsMessage::Close(frame))) => {
                        let (code, reason) = frame
                            .map(|f| (u16::from(f.code), f.reason.into_owned()))
                            .unwrap_or((1005, String::new()));
                        debug!(code, reason = %reason, "websocket closed");
                        self.handler.closed(true, code, &reason);
                        break;
                    }
                    // Ping/pong replies are handled by tungstenite itself.
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        warn!(%error, "websocket failed");
                        self.handler.closed(false, 1006, &error.to_string());
                        break;
                    }
                    None => {
                        self.handler.closed(true, 1000, "stream ended");
                        break;
                    }
                },
            }
        }
        Ok(self.handler)
    }
}
