//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Private user stream engine.
//!
//! Owns the session handshake, the nonce counter and the batch state
//! machine. Every outbound command is validated, stamped with
//! `(account_id, nonce, nonce_group)`, signed with the trader key and
//! encrypted to the exchange; every inbound payload is decrypted with the
//! trader key, verified against the exchange key and fanned out to
//! listeners.
//!
//! The nonce counter is seeded from the exchange's `last_nonce` reply on
//! every connect and never persisted: a reconnect always re-handshakes.

use std::sync::Arc;

use serde::Serialize;

use armordex_types::command::{
    AddTimerCommand, BatchCommand, CancelAllOrders, CancelOrder, CancelTimerCommand, Command,
    InternalTransfer, InternalTransferCommand, ModifyOrder, NonceGroup, OrderCommand, PlaceOrder,
    SequencedCommand, TimerCommand, UpdateTimerCommand,
};
use armordex_types::user::UserMessage;
use armordex_types::validate::validate_order_command;

use crate::error::{BatchMode, CommandError, StreamError, TransportError};
use crate::exchange::ExchangeDescriptor;
use crate::frame::Frame;
use crate::listener::{ListenerSet, UserListener};
use crate::trader::TraderIdentity;
use crate::transport::{OutboundSink, ProtocolHandler};

/// Connection state of the user stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Disconnected,
    /// `get_last_nonce` sent, waiting for the exchange's reply.
    AwaitingLastNonce,
    /// Nonce seeded and `subscribe` sent, waiting for confirmation.
    AwaitingSubscribed,
    /// Handshake complete; the command API is live.
    Ready,
}

/// Batch collection state. The pending list and any pre-stamped timer
/// envelope live inside the active variant, so a batch cannot exist without
/// its mode nor survive leaving it.
enum BatchState {
    Idle,
    Standard {
        pending: Vec<SequencedCommand>,
    },
    TimeTriggeredCreate {
        envelope: AddTimerCommand,
        pending: Vec<SequencedCommand>,
    },
    TimeTriggeredUpdate {
        envelope: UpdateTimerCommand,
        pending: Vec<SequencedCommand>,
    },
}

/// Engine for the encrypted private stream: account state in, commands out.
pub struct UserStream {
    exchange: ExchangeDescriptor,
    trader: TraderIdentity,
    nonce_group: NonceGroup,
    listeners: ListenerSet<dyn UserListener>,
    state: StreamState,
    nonce: Option<u64>,
    batch: BatchState,
    sink: Option<Box<dyn OutboundSink>>,
}

impl UserStream {
    /// Build an engine for `trader` on the given nonce group.
    ///
    /// Every concurrent connection for the same account needs its own group;
    /// use [`with_default_nonce_group`](UserStream::with_default_nonce_group)
    /// unless you run several sessions.
    pub fn new(
        exchange: ExchangeDescriptor,
        trader: TraderIdentity,
        nonce_group: NonceGroup,
    ) -> Self {
        UserStream {
            exchange,
            trader,
            nonce_group,
            listeners: ListenerSet::default(),
            state: StreamState::Disconnected,
            nonce: None,
            batch: BatchState::Idle,
            sink: None,
        }
    }

    pub fn with_default_nonce_group(
        exchange: ExchangeDescriptor,
        trader: TraderIdentity,
    ) -> Self {
        Self::new(exchange, trader, NonceGroup::default())
    }

    /// URL the transport adapter should connect to.
    pub fn user_stream_url(&self) -> String {
        self.exchange.user_stream_url()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn UserListener>) {
        self.listeners.add(listener);
    }

    pub fn remove_listener(&mut self, listener: &Arc<dyn UserListener>) {
        self.listeners.remove(listener);
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn nonce_group(&self) -> NonceGroup {
        self.nonce_group
    }

    /// Last stamped nonce, once the handshake has seeded the counter.
    pub fn nonce(&self) -> Option<u64> {
        self.nonce
    }

    pub fn batch_mode(&self) -> BatchMode {
        match self.batch {
            BatchState::Idle => BatchMode::None,
            BatchState::Standard { .. } => BatchMode::Standard,
            BatchState::TimeTriggeredCreate { .. } => BatchMode::TimeTriggeredCreate,
            BatchState::TimeTriggeredUpdate { .. } => BatchMode::TimeTriggeredUpdate,
        }
    }

    /// Open the handshake: send `get_last_nonce` for this nonce group.
    ///
    /// Called automatically when the transport opens; public so a host can
    /// re-handshake explicitly.
    pub fn initialize(&mut self) -> Result<(), StreamError> {
        let command = Command::GetLastNonce {
            account_id: self.trader.account_id().to_owned(),
            nonce_group: self.nonce_group,
        };
        self.encrypt_send(&command)?;
        self.state = StreamState::AwaitingLastNonce;
        Ok(())
    }

    /// Place a limit order, or append it to the active batch.
    pub fn place_order(&mut self, place_order: PlaceOrder) -> Result<(), StreamError> {
        self.submit(OrderCommand::PlaceOrder(place_order))
    }

    /// Cancel one order by client order id, or append to the active batch.
    pub fn cancel_order(&mut self, cancel_order: CancelOrder) -> Result<(), StreamError> {
        self.submit(OrderCommand::CancelOrder(cancel_order))
    }

    /// Modify an order's price and/or quantity, or append to the active batch.
    pub fn modify_order(&mut self, modify_order: ModifyOrder) -> Result<(), StreamError> {
        self.submit(OrderCommand::ModifyOrder(modify_order))
    }

    /// Cancel every pending order, or append to the active batch.
    pub fn cancel_all_orders(&mut self) -> Result<(), StreamError> {
        self.submit(OrderCommand::CancelAllOrders(CancelAllOrders::default()))
    }

    /// Send `commands` as one atomic batch, stamping each child in order.
    pub fn batch(&mut self, commands: Vec<OrderCommand>) -> Result<(), StreamError> {
        self.ensure_ready()?;
        let batch = self.sequence_batch(commands)?;
        self.encrypt_send(&Command::Batch(batch))
    }

    /// Start collecting order commands into a batch; `send_batch` ships it.
    pub fn start_batch(&mut self) -> Result<(), StreamError> {
        self.ensure_ready()?;
        self.ensure_no_batch("start a batch")?;
        self.batch = BatchState::Standard { pending: Vec::new() };
        Ok(())
    }

    /// Ship the batch collected since [`start_batch`](UserStream::start_batch).
    pub fn send_batch(&mut self) -> Result<(), StreamError> {
        let pending = match &self.batch {
            BatchState::Standard { pending } => pending.clone(),
            _ => {
                return Err(CommandError::BatchModeConflict {
                    attempted: "send a batch",
                    active: self.batch_mode(),
                }
                .into())
            }
        };
        if pending.is_empty() {
            return Err(CommandError::EmptyBatch.into());
        }
        let command = Command::Batch(BatchCommand {
            account_id: self.trader.account_id().to_owned(),
            batch: pending,
        });
        self.encrypt_send(&command)?;
        self.batch = BatchState::Idle;
        Ok(())
    }

    /// Register a timer executing `commands` as a batch inside the
    /// `[execution_start_timestamp, execution_expiration_timestamp]` window.
    ///
    /// The `add_timer` envelope is stamped before its children, so its nonce
    /// precedes theirs.
    pub fn time_triggered_batch(
        &mut self,
        timer_id: u64,
        execution_start_timestamp: i64,
        execution_expiration_timestamp: i64,
        commands: Vec<OrderCommand>,
    ) -> Result<(), StreamError> {
        self.ensure_ready()?;
        if commands.is_empty() {
            return Err(CommandError::EmptyBatch.into());
        }
        for command in &commands {
            validate_order_command(command).map_err(CommandError::from)?;
        }
        let mut envelope = AddTimerCommand {
            timer_id,
            execution_start_timestamp,
            execution_expiration_timestamp,
            command: None,
            account_id: self.trader.account_id().to_owned(),
            nonce: self.next_nonce()?,
            nonce_group: self.nonce_group,
        };
        let children = self.stamp_all(commands)?;
        envelope.command = Some(TimerCommand::Batch(BatchCommand {
            account_id: self.trader.account_id().to_owned(),
            batch: children,
        }));
        self.encrypt_send(&Command::AddTimer(envelope))
    }

    /// Start collecting order commands for a new time-triggered batch. The
    /// `add_timer` envelope is stamped now and held until
    /// [`send_time_triggered_batch`](UserStream::send_time_triggered_batch).
    pub fn start_time_triggered_batch(
        &mut self,
        timer_id: u64,
        execution_start_timestamp: i64,
        execution_expiration_timestamp: i64,
    ) -> Result<(), StreamError> {
        self.ensure_ready()?;
        self.ensure_no_batch("start a time-triggered batch")?;
        let envelope = AddTimerCommand {
            timer_id,
            execution_start_timestamp,
            execution_expiration_timestamp,
            command: None,
            account_id: self.trader.account_id().to_owned(),
            nonce: self.next_nonce()?,
            nonce_group: self.nonce_group,
        };
        self.batch = BatchState::TimeTriggeredCreate {
            envelope,
            pending: Vec::new(),
        };
        Ok(())
    }

    /// Ship the time-triggered batch collected since
    /// [`start_time_triggered_batch`](UserStream::start_time_triggered_batch).
    pub fn send_time_triggered_batch(&mut self) -> Result<(), StreamError> {
        let (mut envelope, pending) = match &self.batch {
            BatchState::TimeTriggeredCreate { envelope, pending } => {
                (envelope.clone(), pending.clone())
            }
            _ => {
                return Err(CommandError::BatchModeConflict {
                    attempted: "send a time-triggered batch",
                    active: self.batch_mode(),
                }
                .into())
            }
        };
        if pending.is_empty() {
            return Err(CommandError::EmptyBatch.into());
        }
        envelope.command = Some(TimerCommand::Batch(BatchCommand {
            account_id: self.trader.account_id().to_owned(),
            batch: pending,
        }));
        self.encrypt_send(&Command::AddTimer(envelope))?;
        self.batch = BatchState::Idle;
        Ok(())
    }

    /// Update an existing timer. At least one of the new window bounds or a
    /// non-empty replacement command list must be given; a replacement list
    /// replaces the batch registered at creation.
    pub fn update_time_triggered_batch(
        &mut self,
        timer_id: u64,
        new_execution_start_timestamp: Option<i64>,
        new_execution_expiration_timestamp: Option<i64>,
        new_commands: Option<Vec<OrderCommand>>,
    ) -> Result<(), StreamError> {
        self.ensure_ready()?;
        let commands = new_commands.unwrap_or_default();
        if new_execution_start_timestamp.is_none()
            && new_execution_expiration_timestamp.is_none()
            && commands.is_empty()
        {
            return Err(CommandError::NoUpdateFields.into());
        }
        for command in &commands {
            validate_order_command(command).map_err(CommandError::from)?;
        }
        let mut envelope = UpdateTimerCommand {
            timer_id,
            new_execution_start_timestamp,
            new_execution_expiration_timestamp,
            new_command: None,
            account_id: self.trader.account_id().to_owned(),
            nonce: self.next_nonce()?,
            nonce_group: self.nonce_group,
        };
        if !commands.is_empty() {
            let children = self.stamp_all(commands)?;
            envelope.new_command = Some(TimerCommand::Batch(BatchCommand {
                account_id: self.trader.account_id().to_owned(),
                batch: children,
            }));
        }
        self.encrypt_send(&Command::UpdateTimer(envelope))
    }

    /// Start collecting replacement commands for an existing timer. The
    /// `update_timer` envelope is stamped now; commands submitted before
    /// [`send_update_time_triggered_batch`](UserStream::send_update_time_triggered_batch)
    /// replace the batch registered at creation.
    pub fn start_update_time_triggered_batch(
        &mut self,
        timer_id: u64,
        new_execution_start_timestamp: Option<i64>,
        new_execution_expiration_timestamp: Option<i64>,
    ) -> Result<(), StreamError> {
        self.ensure_ready()?;
        self.ensure_no_batch("start a time-triggered batch update")?;
        let envelope = UpdateTimerCommand {
            timer_id,
            new_execution_start_timestamp,
            new_execution_expiration_timestamp,
            new_command: None,
            account_id: self.trader.account_id().to_owned(),
            nonce: self.next_nonce()?,
            nonce_group: self.nonce_group,
        };
        self.batch = BatchState::TimeTriggeredUpdate {
            envelope,
            pending: Vec::new(),
        };
        Ok(())
    }

    /// Ship the timer update collected since
    /// [`start_update_time_triggered_batch`](UserStream::start_update_time_triggered_batch).
    /// Fails with `NoUpdateFields` when neither a window bound nor a command
    /// was supplied; the batch stays open in that case.
    pub fn send_update_time_triggered_batch(&mut self) -> Result<(), StreamError> {
        let (mut envelope, pending) = match &self.batch {
            BatchState::TimeTriggeredUpdate { envelope, pending } => {
                (envelope.clone(), pending.clone())
            }
            _ => {
                return Err(CommandError::BatchModeConflict {
                    attempted: "send a time-triggered batch update",
                    active: self.batch_mode(),
                }
                .into())
            }
        };
        if !pending.is_empty() {
            envelope.new_command = Some(TimerCommand::Batch(BatchCommand {
                account_id: self.trader.account_id().to_owned(),
                batch: pending,
            }));
        }
        if envelope.is_empty_update() {
            return Err(CommandError::NoUpdateFields.into());
        }
        self.encrypt_send(&Command::UpdateTimer(envelope))?;
        self.batch = BatchState::Idle;
        Ok(())
    }

    /// Cancel an existing timer by id.
    pub fn cancel_time_triggered_batch(&mut self, timer_id: u64) -> Result<(), StreamError> {
        self.ensure_ready()?;
        let command = Command::CancelTimer(CancelTimerCommand {
            timer_id,
            account_id: self.trader.account_id().to_owned(),
            nonce: self.next_nonce()?,
            nonce_group: self.nonce_group,
        });
        self.encrypt_send(&command)
    }

    /// Transfer funds to another account on the exchange.
    pub fn execute_internal_transfer(
        &mut self,
        transfer: InternalTransfer,
    ) -> Result<(), StreamError> {
        self.ensure_ready()?;
        let command = Command::InternalTransfer(InternalTransferCommand {
            destination_account_id: transfer.destination_account_id,
            amount: transfer.amount,
            account_id: self.trader.account_id().to_owned(),
            nonce: self.next_nonce()?,
            nonce_group: self.nonce_group,
        });
        self.encrypt_send(&command)
    }

    /// Surface an externally observed error to every listener.
    pub fn on_error(&self, error: &anyhow::Error) {
        self.listeners.notify(|l| l.on_error(error));
    }

    // ---- outbound internals ----

    fn submit(&mut self, command: OrderCommand) -> Result<(), StreamError> {
        self.ensure_ready()?;
        validate_order_command(&command).map_err(CommandError::from)?;
        let sequenced = self.stamp(command)?;
        if matches!(self.batch, BatchState::Idle) {
            self.encrypt_send(&sequenced)
        } else {
            self.push_pending(sequenced);
            Ok(())
        }
    }

    fn push_pending(&mut self, sequenced: SequencedCommand) {
        match &mut self.batch {
            BatchState::Idle => {}
            BatchState::Standard { pending }
            | BatchState::TimeTriggeredCreate { pending, .. }
            | BatchState::TimeTriggeredUpdate { pending, .. } => pending.push(sequenced),
        }
    }

    fn sequence_batch(&mut self, commands: Vec<OrderCommand>) -> Result<BatchCommand, StreamError> {
        if commands.is_empty() {
            return Err(CommandError::EmptyBatch.into());
        }
        for command in &commands {
            validate_order_command(command).map_err(CommandError::from)?;
        }
        let children = self.stamp_all(commands)?;
        Ok(BatchCommand {
            account_id: self.trader.account_id().to_owned(),
            batch: children,
        })
    }

    fn stamp_all(
        &mut self,
        commands: Vec<OrderCommand>,
    ) -> Result<Vec<SequencedCommand>, CommandError> {
        commands.into_iter().map(|c| self.stamp(c)).collect()
    }

    fn stamp(&mut self, command: OrderCommand) -> Result<SequencedCommand, CommandError> {
        Ok(SequencedCommand {
            command,
            account_id: self.trader.account_id().to_owned(),
            nonce: self.next_nonce()?,
            nonce_group: self.nonce_group,
        })
    }

    fn next_nonce(&mut self) -> Result<u64, CommandError> {
        let seeded = self.nonce.ok_or(CommandError::NotInitialized)?;
        let next = seeded + 1;
        self.nonce = Some(next);
        Ok(next)
    }

    fn ensure_ready(&self) -> Result<(), CommandError> {
        if self.state != StreamState::Ready {
            return Err(CommandError::NotInitialized);
        }
        Ok(())
    }

    fn ensure_no_batch(&self, attempted: &'static str) -> Result<(), CommandError> {
        match self.batch_mode() {
            BatchMode::None => Ok(()),
            active => Err(CommandError::BatchModeConflict { attempted, active }),
        }
    }

    fn encrypt_send(&mut self, payload: &impl Serialize) -> Result<(), StreamError> {
        let json = serde_json::to_string(payload)?;
        let armored = self
            .trader
            .sign_encrypt_to(&json, self.exchange.public_key())?;
        let sink = self.sink.as_mut().ok_or(CommandError::NotConnected)?;
        sink.send(armored.into_bytes())?;
        Ok(())
    }

    // ---- inbound internals ----

    fn process_frame(&mut self, raw: &str) -> Result<(), StreamError> {
        match Frame::parse(raw)? {
            Frame::Keepalive | Frame::Unknown => Ok(()),
            Frame::Error { error_code } => {
                if error_code == "maintenance" {
                    // Graceful shutdown notice; the clean close that follows
                    // is reported through on_disconnect.
                    Ok(())
                } else {
                    Err(TransportError::ErrorFrame { error_code }.into())
                }
            }
            Frame::Data { data } => self.process_data(&data),
        }
    }

    fn process_data(&mut self, data: &str) -> Result<(), StreamError> {
        let plaintext = self
            .trader
            .decrypt_verify_from(data, self.exchange.public_key())?;
        let entities: Vec<serde_json::Value> = serde_json::from_str(&plaintext)?;
        for entity in entities {
            let message: UserMessage = serde_json::from_value(entity)?;
            match &message {
                UserMessage::LastNonce(last_nonce)
                    if last_nonce.nonce_group == self.nonce_group =>
                {
                    self.nonce = Some(last_nonce.last_nonce);
                    let subscribe = Command::Subscribe {
                        account_id: self.trader.account_id().to_owned(),
                        nonce: self.next_nonce()?,
                        nonce_group: self.nonce_group,
                    };
                    self.encrypt_send(&subscribe)?;
                    self.state = StreamState::AwaitingSubscribed;
                    // The handshake consumes the remainder of this payload.
                    return Ok(());
                }
                UserMessage::Subscribed(subscribed)
                    if subscribed.message_nonce_group == self.nonce_group =>
                {
                    self.state = StreamState::Ready;
                    self.listeners
                        .dispatch(|l| l.on_ready(), |l, e| l.on_error(e));
                }
                UserMessage::Unknown => {}
                _ => self.dispatch(&message),
            }
        }
        Ok(())
    }

    fn dispatch(&self, message: &UserMessage) {
        self.listeners
            .dispatch(|l| l.on_message(message), |l, e| l.on_error(e));
        match message {
            UserMessage::AccountState(m) => self
                .listeners
                .dispatch(|l| l.on_account_state(m), |l, e| l.on_error(e)),
            UserMessage::OpenPosition(m) => self
                .listeners
                .dispatch(|l| l.on_open_position(m), |l, e| l.on_error(e)),
            UserMessage::OpenPositionForcefullyClosed(m) => self.listeners.dispatch(
                |l| l.on_open_position_forcefully_closed(m),
                |l, e| l.on_error(e),
            ),
            UserMessage::OrderPlaced(m) => self
                .listeners
                .dispatch(|l| l.on_order_placed(m), |l, e| l.on_error(e)),
            UserMessage::OrderPlaceFailed(m) => self
                .listeners
                .dispatch(|l| l.on_order_place_failed(m), |l, e| l.on_error(e)),
            UserMessage::OrderCancelled(m) => self
                .listeners
                .dispatch(|l| l.on_order_cancelled(m), |l, e| l.on_error(e)),
            UserMessage::OrderForcefullyCancelled(m) => self.listeners.dispatch(
                |l| l.on_order_forcefully_cancelled(m),
                |l, e| l.on_error(e),
            ),
            UserMessage::OrderCancelFailed(m) => self
                .listeners
                .dispatch(|l| l.on_order_cancel_failed(m), |l, e| l.on_error(e)),
            UserMessage::AllOrdersCancelled(m) => self
                .listeners
                .dispatch(|l| l.on_all_orders_cancelled(m), |l, e| l.on_error(e)),
            UserMessage::CancelAllOrdersFailed(m) => self.listeners.dispatch(
                |l| l.on_cancel_all_orders_failed(m),
                |l, e| l.on_error(e),
            ),
            UserMessage::OrderModified(m) => self
                .listeners
                .dispatch(|l| l.on_order_modified(m), |l, e| l.on_error(e)),
            UserMessage::OrderModificationFailed(m) => self.listeners.dispatch(
                |l| l.on_order_modification_failed(m),
                |l, e| l.on_error(e),
            ),
            UserMessage::OrderFilled(m) => self
                .listeners
                .dispatch(|l| l.on_order_filled(m), |l, e| l.on_error(e)),
            UserMessage::TimerAdded(m) => self
                .listeners
                .dispatch(|l| l.on_timer_added(m), |l, e| l.on_error(e)),
            UserMessage::TimerRejected(m) => self
                .listeners
                .dispatch(|l| l.on_timer_rejected(m), |l, e| l.on_error(e)),
            UserMessage::TimerExpired(m) => self
                .listeners
                .dispatch(|l| l.on_timer_expired(m), |l, e| l.on_error(e)),
            UserMessage::TimerTriggered(m) => self
                .listeners
                .dispatch(|l| l.on_timer_triggered(m), |l, e| l.on_error(e)),
            UserMessage::TimerUpdated(m) => self
                .listeners
                .dispatch(|l| l.on_timer_updated(m), |l, e| l.on_error(e)),
            UserMessage::TimerUpdateFailed(m) => self
                .listeners
                .dispatch(|l| l.on_timer_update_failed(m), |l, e| l.on_error(e)),
            UserMessage::TimerCancelled(m) => self
                .listeners
                .dispatch(|l| l.on_timer_cancelled(m), |l, e| l.on_error(e)),
            UserMessage::TimerCancelFailed(m) => self
                .listeners
                .dispatch(|l| l.on_timer_cancel_failed(m), |l, e| l.on_error(e)),
            UserMessage::InternalTransferReceived(m) => self.listeners.dispatch(
                |l| l.on_internal_transfer_received(m),
                |l, e| l.on_error(e),
            ),
            UserMessage::InternalTransferExecuted(m) => self.listeners.dispatch(
                |l| l.on_internal_transfer_executed(m),
                |l, e| l.on_error(e),
            ),
            UserMessage::InternalTransferRejected(m) => self.listeners.dispatch(
                |l| l.on_internal_transfer_rejected(m),
                |l, e| l.on_error(e),
            ),
            // Handshake messages for a foreign nonce group reach on_message
            // only; unknown types never get here.
            UserMessage::LastNonce(_) | UserMessage::Subscribed(_) | UserMessage::Unknown => {}
        }
    }
}

impl ProtocolHandler for UserStream {
    fn opened(&mut self, sink: Box<dyn OutboundSink>) {
        self.sink = Some(sink);
        if let Err(error) = self.initialize() {
            self.on_error(&anyhow::Error::new(error));
        }
    }

    fn deliver(&mut self, frame: &str) {
        if let Err(error) = self.process_frame(frame) {
            self.on_error(&anyhow::Error::new(error));
        }
    }

    fn closed(&mut self, clean: bool, code: u16, reason: &str) {
        self.state = StreamState::Disconnected;
        self.nonce = None;
        self.batch = BatchState::Idle;
        self.sink = None;
        if clean {
            let message = format!("connection closed cleanly - {code} : {reason}");
            self.listeners.notify(|l| l.on_disconnect(&message));
        } else {
            let error = anyhow::Error::new(StreamError::from(TransportError::ClosedWithError {
                code,
                reason: reason.to_owned(),
            }));
            self.on_error(&error);
        }
    }
}
