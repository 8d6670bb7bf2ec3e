//! The IEC 60870-5-104 link state machine.
//!
//! A [`Connection`] wraps an established TCP stream with the sequence
//! number bookkeeping, the k/w flow-control window and the three protocol
//! timers:
//!
//! - t1 bounds the wait for any acknowledgement or confirmation
//! - t2 schedules the delayed supervisory acknowledgement
//! - t3 probes an idle link with TESTFR
//!
//! All link state lives behind a single mutex. The reader task, the timer
//! tasks and application callers each take that lock for their critical
//! section, so timer work interleaves atomically with frame processing.
//! Timers are one-shot spawned tasks guarded by generation counters; a
//! handler that wakes up re-checks its generation under the lock, so
//! disarming never races a firing.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep_until, Instant};
use tokio_util::codec::Encoder;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::codec::{read_apdu, Apdu, ApduCodec};
use crate::error::{Iec60870Error, Result};
use crate::settings::ConnectionSettings;
use crate::types::{
    seq_diff, seq_next, Apci, Asdu, Cot, Cp56Time2a, QualifierOfInterrogation, UFunction,
    MAX_APDU_LENGTH,
};

/// Link layer state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Transport established, neither side has started data transfer.
    Idle,
    /// STARTDT exchange completed, I-frames may flow.
    Started,
    /// Local STOPDT sent, waiting for the confirmation.
    PendingStop,
    /// STOPDT exchange completed, only S- and U-frames are allowed.
    Stopped,
    /// Terminal state.
    Closed,
}

/// Callback surface of a connection toward the application.
///
/// Both callbacks run on the connection's reader context, so ASDUs are
/// delivered in frame order. Calling [`Connection::send`] from inside a
/// callback is allowed; a send that cannot make progress ends no later
/// than the connection's own t1 failure.
#[async_trait]
pub trait ConnectionListener: Send + Sync {
    /// One decoded ASDU arrived in an I-frame.
    async fn on_asdu_received(&self, connection: &Connection, asdu: Asdu);

    /// The connection reached `Closed` for any reason other than a local
    /// `close()`. Invoked exactly once.
    async fn on_connection_lost(&self, connection: &Connection, error: Iec60870Error);
}

struct SentFrame {
    seq: u16,
    deadline: Instant,
    _permit: OwnedSemaphorePermit,
}

struct Link {
    writer: OwnedWriteHalf,
    encoder: ApduCodec,
    scratch: BytesMut,
    state: LinkState,
    send_seq: u16,
    recv_seq: u16,
    ack_seq: u16,
    sent: VecDeque<SentFrame>,
    unconfirmed_received: u16,
    test_deadline: Option<Instant>,
    confirm_waiters: Vec<(UFunction, oneshot::Sender<()>)>,
    t1_gen: u64,
    t2_gen: u64,
    t3_gen: u64,
}

impl Link {
    async fn write_apdu(&mut self, apdu: Apdu) -> Result<()> {
        trace!(frame = %apdu, "sending");
        self.scratch.clear();
        self.encoder.encode(apdu, &mut self.scratch)?;
        self.writer.write_all(&self.scratch).await?;
        Ok(())
    }

    /// Acknowledge the peer's receive counter and disarm the pending t2.
    async fn emit_s_frame(&mut self) -> Result<()> {
        self.write_apdu(Apdu::s_frame(self.recv_seq)).await?;
        self.unconfirmed_received = 0;
        self.t2_gen += 1;
        Ok(())
    }

    /// Apply an incoming acknowledgement, releasing window slots.
    fn process_ack(&mut self, recv_seq: u16) -> Result<()> {
        // The acknowledgement must fall between what was already
        // acknowledged and what was actually sent.
        if seq_diff(recv_seq, self.ack_seq) < 0 || seq_diff(self.send_seq, recv_seq) < 0 {
            return Err(Iec60870Error::SequenceMismatch {
                expected: self.send_seq,
                actual: recv_seq,
            });
        }
        while let Some(front) = self.sent.front() {
            if seq_diff(recv_seq, front.seq) > 0 {
                self.sent.pop_front();
            } else {
                break;
            }
        }
        self.ack_seq = recv_seq;
        Ok(())
    }

    fn resolve_confirmation(&mut self, function: UFunction) -> bool {
        match self.confirm_waiters.iter().position(|(f, _)| *f == function) {
            Some(index) => {
                let (_, tx) = self.confirm_waiters.swap_remove(index);
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }

    fn next_t1_deadline(&self) -> Option<Instant> {
        match (self.sent.front().map(|f| f.deadline), self.test_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

struct Inner {
    settings: ConnectionSettings,
    peer_addr: SocketAddr,
    window: Arc<Semaphore>,
    link: Mutex<Link>,
    listener: Arc<dyn ConnectionListener>,
    shutdown: CancellationToken,
}

impl Inner {
    /// Re-arm t1 against the oldest outstanding I-frame or pending test
    /// frame, or disarm it when nothing is outstanding.
    fn arm_t1(self: &Arc<Self>, link: &mut Link) {
        link.t1_gen += 1;
        let Some(deadline) = link.next_t1_deadline() else {
            return;
        };
        let gen = link.t1_gen;
        let inner = self.clone();
        tokio::spawn(async move {
            sleep_until(deadline).await;
            let expired = {
                let link = inner.link.lock().await;
                link.t1_gen == gen && link.state != LinkState::Closed
            };
            if expired {
                warn!(peer = %inner.peer_addr, "t1 expired without acknowledgement");
                inner.fail(Iec60870Error::HandshakeTimeout).await;
            }
        });
    }

    /// Arm the delayed-acknowledgement timer.
    fn arm_t2(self: &Arc<Self>, link: &mut Link) {
        link.t2_gen += 1;
        let gen = link.t2_gen;
        let deadline = Instant::now() + self.settings.t2_timeout;
        let inner = self.clone();
        tokio::spawn(async move {
            sleep_until(deadline).await;
            let mut link = inner.link.lock().await;
            if link.t2_gen != gen || link.state == LinkState::Closed {
                return;
            }
            if link.unconfirmed_received > 0 {
                trace!(peer = %inner.peer_addr, recv_seq = link.recv_seq, "t2 expired, acknowledging");
                if let Err(error) = link.emit_s_frame().await {
                    drop(link);
                    inner.fail(error).await;
                }
            }
        });
    }

    /// Re-arm the idle supervision timer.
    fn arm_t3(self: &Arc<Self>, link: &mut Link) {
        link.t3_gen += 1;
        let gen = link.t3_gen;
        let deadline = Instant::now() + self.settings.t3_timeout;
        let inner = self.clone();
        tokio::spawn(async move {
            sleep_until(deadline).await;
            let mut link = inner.link.lock().await;
            if link.t3_gen != gen || link.state == LinkState::Closed {
                return;
            }
            debug!(peer = %inner.peer_addr, "link idle for t3, sending test frame");
            match link.write_apdu(Apdu::u_frame(UFunction::TestFrAct)).await {
                Ok(()) => {
                    link.test_deadline = Some(Instant::now() + inner.settings.t1_timeout);
                    inner.arm_t1(&mut link);
                }
                Err(error) => {
                    drop(link);
                    inner.fail(error).await;
                }
            }
        });
    }

    /// Transition to `Closed`: disarm timers, release blocked senders,
    /// drop queued sends and shut the socket down.
    async fn teardown(&self, link: &mut Link) {
        link.state = LinkState::Closed;
        link.t1_gen += 1;
        link.t2_gen += 1;
        link.t3_gen += 1;
        link.test_deadline = None;
        link.sent.clear();
        link.confirm_waiters.clear();
        self.window.close();
        self.shutdown.cancel();
        let _ = link.writer.shutdown().await;
    }

    /// Fail the connection. The first fatal error wins; later calls are
    /// no-ops, so `on_connection_lost` fires at most once.
    async fn fail(self: &Arc<Self>, error: Iec60870Error) {
        {
            let mut link = self.link.lock().await;
            if link.state == LinkState::Closed {
                return;
            }
            self.teardown(&mut link).await;
        }
        warn!(peer = %self.peer_addr, error = %error, "connection lost");
        let connection = Connection {
            inner: self.clone(),
        };
        self.listener.on_connection_lost(&connection, error).await;
    }

    /// Process one inbound frame, returning an ASDU to deliver.
    async fn handle_apdu(self: &Arc<Self>, apdu: Apdu) -> Result<Option<Asdu>> {
        let mut link = self.link.lock().await;
        if link.state == LinkState::Closed {
            return Ok(None);
        }
        // Every inbound frame restarts idle supervision.
        self.arm_t3(&mut link);

        match apdu.apci {
            Apci::IFrame { send_seq, recv_seq } => {
                if !matches!(link.state, LinkState::Started | LinkState::PendingStop) {
                    return Err(Iec60870Error::malformed_apdu_static(
                        "I-frame outside active data transfer",
                    ));
                }
                link.process_ack(recv_seq)?;
                self.arm_t1(&mut link);

                if send_seq != link.recv_seq {
                    return Err(Iec60870Error::SequenceMismatch {
                        expected: link.recv_seq,
                        actual: send_seq,
                    });
                }
                link.recv_seq = seq_next(link.recv_seq);

                link.unconfirmed_received += 1;
                if link.unconfirmed_received >= self.settings.w {
                    link.emit_s_frame().await?;
                } else if link.unconfirmed_received == 1 {
                    self.arm_t2(&mut link);
                }
                Ok(apdu.asdu)
            }

            Apci::SFrame { recv_seq } => {
                link.process_ack(recv_seq)?;
                self.arm_t1(&mut link);
                Ok(None)
            }

            Apci::UFrame { function } => {
                match function {
                    UFunction::StartDtAct => {
                        link.write_apdu(Apdu::u_frame(UFunction::StartDtCon)).await?;
                        link.state = LinkState::Started;
                        debug!(peer = %self.peer_addr, "data transfer started by peer");
                    }
                    UFunction::StopDtAct => {
                        if link.unconfirmed_received > 0 {
                            link.emit_s_frame().await?;
                        }
                        link.write_apdu(Apdu::u_frame(UFunction::StopDtCon)).await?;
                        link.state = LinkState::Stopped;
                        debug!(peer = %self.peer_addr, "data transfer stopped by peer");
                    }
                    UFunction::TestFrAct => {
                        link.write_apdu(Apdu::u_frame(UFunction::TestFrCon)).await?;
                    }
                    UFunction::StartDtCon => {
                        if link.resolve_confirmation(UFunction::StartDtCon) {
                            link.state = LinkState::Started;
                        } else {
                            debug!(peer = %self.peer_addr, "unsolicited STARTDT con ignored");
                        }
                    }
                    UFunction::StopDtCon => {
                        if link.resolve_confirmation(UFunction::StopDtCon) {
                            link.state = LinkState::Stopped;
                        } else {
                            debug!(peer = %self.peer_addr, "unsolicited STOPDT con ignored");
                        }
                    }
                    UFunction::TestFrCon => {
                        link.test_deadline = None;
                        self.arm_t1(&mut link);
                    }
                }
                Ok(None)
            }
        }
    }
}

async fn read_loop(inner: Arc<Inner>, mut reader: OwnedReadHalf) {
    let mut codec = ApduCodec::new(inner.settings.clone());
    let mut buf = BytesMut::with_capacity(MAX_APDU_LENGTH + 2);
    let connection = Connection {
        inner: inner.clone(),
    };

    {
        let mut link = inner.link.lock().await;
        inner.arm_t3(&mut link);
    }

    loop {
        let apdu = tokio::select! {
            _ = inner.shutdown.cancelled() => return,
            result = read_apdu(&mut reader, &mut codec, &mut buf) => match result {
                Ok(apdu) => apdu,
                Err(error) => {
                    inner.fail(error).await;
                    return;
                }
            },
        };
        trace!(peer = %inner.peer_addr, frame = %apdu, "received");

        match inner.handle_apdu(apdu).await {
            Ok(Some(asdu)) => inner.listener.on_asdu_received(&connection, asdu).await,
            Ok(None) => {}
            Err(error) => {
                inner.fail(error).await;
                return;
            }
        }
    }
}

/// One IEC 60870-5-104 connection, client or server side.
///
/// Cheap to clone; all clones refer to the same link.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<Inner>,
}

impl Connection {
    /// Wrap an established stream and start its read path.
    pub(crate) fn spawn(
        stream: TcpStream,
        settings: ConnectionSettings,
        listener: Arc<dyn ConnectionListener>,
    ) -> Result<Self> {
        stream.set_nodelay(true).ok();
        let peer_addr = stream.peer_addr()?;
        let (reader, writer) = stream.into_split();

        let inner = Arc::new(Inner {
            peer_addr,
            window: Arc::new(Semaphore::new(usize::from(settings.k))),
            link: Mutex::new(Link {
                writer,
                encoder: ApduCodec::new(settings.clone()),
                scratch: BytesMut::with_capacity(MAX_APDU_LENGTH + 2),
                state: LinkState::Idle,
                send_seq: 0,
                recv_seq: 0,
                ack_seq: 0,
                sent: VecDeque::new(),
                unconfirmed_received: 0,
                test_deadline: None,
                confirm_waiters: Vec::new(),
                t1_gen: 0,
                t2_gen: 0,
                t3_gen: 0,
            }),
            listener,
            shutdown: CancellationToken::new(),
            settings,
        });

        tokio::spawn(read_loop(inner.clone(), reader));
        debug!(peer = %inner.peer_addr, "connection up");
        Ok(Self { inner })
    }

    /// The peer's socket address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.inner.peer_addr
    }

    /// The immutable settings of this connection.
    pub fn settings(&self) -> &ConnectionSettings {
        &self.inner.settings
    }

    /// The current link state.
    pub async fn state(&self) -> LinkState {
        self.inner.link.lock().await.state
    }

    /// Whether the connection has reached `Closed`.
    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Activate data transfer: send STARTDT act and wait up to `timeout`
    /// for the confirmation. Failure to confirm closes the connection.
    pub async fn start_data_transfer(&self, timeout: Duration) -> Result<()> {
        let rx = {
            let mut link = self.inner.link.lock().await;
            match link.state {
                LinkState::Idle | LinkState::Stopped => {}
                LinkState::Started => return Ok(()),
                LinkState::PendingStop => return Err(Iec60870Error::NotStarted),
                LinkState::Closed => return Err(Iec60870Error::ConnectionClosed),
            }
            let (tx, rx) = oneshot::channel();
            link.confirm_waiters.push((UFunction::StartDtCon, tx));
            if let Err(error) = link.write_apdu(Apdu::u_frame(UFunction::StartDtAct)).await {
                drop(link);
                self.inner.fail(error).await;
                return Err(Iec60870Error::ConnectionClosed);
            }
            rx
        };

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(Iec60870Error::ConnectionClosed),
            Err(_) => {
                self.inner.fail(Iec60870Error::HandshakeTimeout).await;
                Err(Iec60870Error::HandshakeTimeout)
            }
        }
    }

    /// Deactivate data transfer: send STOPDT act and wait up to `timeout`
    /// for the confirmation. No new I-frames are accepted while the stop
    /// is pending.
    pub async fn stop_data_transfer(&self, timeout: Duration) -> Result<()> {
        let rx = {
            let mut link = self.inner.link.lock().await;
            match link.state {
                LinkState::Started => {}
                LinkState::Stopped => return Ok(()),
                LinkState::Closed => return Err(Iec60870Error::ConnectionClosed),
                _ => return Err(Iec60870Error::NotStarted),
            }
            link.state = LinkState::PendingStop;
            let (tx, rx) = oneshot::channel();
            link.confirm_waiters.push((UFunction::StopDtCon, tx));
            if let Err(error) = link.write_apdu(Apdu::u_frame(UFunction::StopDtAct)).await {
                drop(link);
                self.inner.fail(error).await;
                return Err(Iec60870Error::ConnectionClosed);
            }
            rx
        };

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(Iec60870Error::ConnectionClosed),
            Err(_) => {
                self.inner.fail(Iec60870Error::HandshakeTimeout).await;
                Err(Iec60870Error::HandshakeTimeout)
            }
        }
    }

    /// Send an ASDU as an I-frame.
    ///
    /// With the k-window full, the call blocks until an acknowledgement
    /// frees a slot. The wait cannot outlive the connection: the missing
    /// acknowledgement trips t1, which fails the connection and releases
    /// every blocked sender.
    pub async fn send(&self, asdu: Asdu) -> Result<()> {
        let permit = self
            .inner
            .window
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Iec60870Error::ConnectionClosed)?;
        self.transmit(asdu, permit).await
    }

    /// Like [`send`](Self::send), but give up with `WindowExhausted`
    /// when no window slot frees up within `timeout`.
    pub async fn send_timeout(&self, asdu: Asdu, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.inner.window.clone().acquire_owned()).await {
            Err(_) => Err(Iec60870Error::WindowExhausted(self.inner.settings.k)),
            Ok(Err(_)) => Err(Iec60870Error::ConnectionClosed),
            Ok(Ok(permit)) => self.transmit(asdu, permit).await,
        }
    }

    /// Mirror an inbound command back as its activation confirmation.
    pub async fn send_confirmation(&self, asdu: &Asdu) -> Result<()> {
        self.send(asdu.clone().with_cause(Cot::ActivationCon)).await
    }

    /// Send a station or group interrogation command.
    pub async fn interrogation(
        &self,
        common_address: u16,
        qualifier: QualifierOfInterrogation,
    ) -> Result<()> {
        self.send(Asdu::interrogation(common_address, qualifier)).await
    }

    /// Send a clock synchronization command.
    pub async fn synchronize_clocks(&self, common_address: u16, time: Cp56Time2a) -> Result<()> {
        self.send(Asdu::clock_sync(common_address, time)).await
    }

    async fn transmit(&self, asdu: Asdu, permit: OwnedSemaphorePermit) -> Result<()> {
        let mut link = self.inner.link.lock().await;
        match link.state {
            LinkState::Started => {}
            LinkState::Closed => return Err(Iec60870Error::ConnectionClosed),
            _ => return Err(Iec60870Error::NotStarted),
        }

        let apdu = Apdu::i_frame(link.send_seq, link.recv_seq, asdu);
        if let Err(error) = link.write_apdu(apdu).await {
            drop(link);
            self.inner.fail(error).await;
            return Err(Iec60870Error::ConnectionClosed);
        }

        let was_idle = link.sent.is_empty() && link.test_deadline.is_none();
        let seq = link.send_seq;
        link.sent.push_back(SentFrame {
            seq,
            deadline: Instant::now() + self.inner.settings.t1_timeout,
            _permit: permit,
        });
        link.send_seq = seq_next(link.send_seq);
        // The I-frame carries the receive counter, so a pending
        // supervisory acknowledgement becomes unnecessary.
        link.unconfirmed_received = 0;
        link.t2_gen += 1;
        if was_idle {
            self.inner.arm_t1(&mut link);
        }
        Ok(())
    }

    /// Close the connection locally. Idempotent; `on_connection_lost` is
    /// not invoked for a local close.
    pub async fn close(&self) {
        let mut link = self.inner.link.lock().await;
        if link.state == LinkState::Closed {
            return;
        }
        debug!(peer = %self.inner.peer_addr, "closing connection");
        self.inner.teardown(&mut link).await;
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("peer_addr", &self.inner.peer_addr)
            .field("closed", &self.is_closed())
            .finish()
    }
}
