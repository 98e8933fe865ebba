//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Transport abstraction between the protocol engines and the WebSocket.
//!
//! The adapter owns the connection and its reconnect policy; the engines own
//! the protocol. On open the adapter hands the engine an [`OutboundSink`],
//! then forwards every inbound frame through [`ProtocolHandler::deliver`] and
//! reports the close, distinguishing clean from unclean. All calls must be
//! serialized onto one thread (or an equivalent mailbox); the engines hold no
//! locks.

use crate::error::TransportError;

/// Outbound half of the connection, injected into the engine on open.
pub trait OutboundSink: Send {
    /// Queue one outbound frame. Frames are UTF-8 bytes of armored
    /// ciphertext.
    fn send(&mut self, frame: Vec<u8>) -> Result<(), TransportError>;
}

/// Inbound contract the engines offer to a transport adapter.
pub trait ProtocolHandler {
    /// The connection is established. The engine keeps the sink for the
    /// lifetime of the connection.
    fn opened(&mut self, sink: Box<dyn OutboundSink>);

    /// One inbound transport frame, UTF-8 text.
    fn deliver(&mut self, frame: &str);

    /// The connection is gone. `clean` distinguishes an orderly close from a
    /// failure; the engine resets its session state either way and does not
    /// reconnect by itself.
    fn closed(&mut self, clean: bool, code: u16, reason: &str);
}
