//! TCP server implementing the [`Transport`] port.
use crate::{
    codec::{encode_frame, FrameDecoder},
    TcpTransportConfig,
};
use anyhow::Result;
use armlink_core::{error::ArmlinkError, Command, Observation, Transport};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{info, warn};
use std::{
    io::{ErrorKind, Read, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

const ACCEPT_IDLE: Duration = Duration::from_millis(10);
const READ_TIMEOUT: Duration = Duration::from_millis(1);

/// TCP server speaking length-prefixed JSON with a single agent.
///
/// Binding happens at construction and a failure there is fatal; everything
/// after that is best-effort. The dispatcher-facing side is wired through
/// SPSC channels: [`try_recv`](Transport::try_recv) drains decoded commands
/// at tick boundaries and the send methods queue outbound strings for the
/// I/O thread to write.
pub struct TcpTransport {
    cmd_rx: Receiver<Command>,
    out_tx: Sender<String>,
    running: Arc<AtomicBool>,
    connected: Arc<AtomicBool>,
    local_addr: SocketAddr,
    handle: Option<JoinHandle<()>>,
}

impl TcpTransport {
    /// Binds the listener and starts the background I/O thread.
    pub fn bind(config: &TcpTransportConfig) -> Result<Self> {
        let listener = TcpListener::bind((config.bind_addr.as_str(), config.port))?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let (cmd_tx, cmd_rx) = unbounded();
        let (out_tx, out_rx) = unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let connected = Arc::new(AtomicBool::new(false));

        let handle = {
            let running = running.clone();
            let connected = connected.clone();
            thread::spawn(move || io_loop(listener, running, connected, cmd_tx, out_rx))
        };

        Ok(Self {
            cmd_rx,
            out_tx,
            running,
            connected,
            local_addr,
            handle: Some(handle),
        })
    }

    /// Address the server is actually bound to, useful with port `0`.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether an agent is currently connected.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    fn queue(&self, payload: String) -> Result<()> {
        if !self.is_connected() {
            return Err(ArmlinkError::NotConnected.into());
        }
        self.out_tx
            .send(payload)
            .map_err(|_| ArmlinkError::TransportClosed)?;
        Ok(())
    }
}

impl Transport for TcpTransport {
    fn try_recv(&mut self) -> Option<Command> {
        self.cmd_rx.try_recv().ok()
    }

    fn send_observation(&mut self, obs: &Observation) -> Result<()> {
        self.queue(serde_json::to_string(obs)?)
    }

    fn send_response(&mut self, response: &str) -> Result<()> {
        self.queue(response.to_string())
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("I/O thread panicked during shutdown");
            }
        }
        info!("Transport shut down");
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}

fn io_loop(
    listener: TcpListener,
    running: Arc<AtomicBool>,
    connected: Arc<AtomicBool>,
    cmd_tx: Sender<Command>,
    out_rx: Receiver<String>,
) {
    let mut client: Option<TcpStream> = None;
    let mut decoder = FrameDecoder::new();
    let mut chunk = [0u8; 4096];

    while running.load(Ordering::Relaxed) {
        match client.as_mut() {
            None => {
                // Nothing can be delivered without a client; drop stale
                // outbound messages instead of queueing them forever.
                while out_rx.try_recv().is_ok() {}

                match listener.accept() {
                    Ok((stream, peer)) => {
                        if let Err(e) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
                            warn!("Failed to configure client socket: {}", e);
                            continue;
                        }
                        info!("Agent connected from {}", peer);
                        decoder.clear();
                        connected.store(true, Ordering::Relaxed);
                        client = Some(stream);
                    }
                    Err(ref e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_IDLE),
                    Err(e) => {
                        warn!("Accept failed: {}", e);
                        thread::sleep(ACCEPT_IDLE);
                    }
                }
            }
            Some(stream) => {
                let mut drop_client = false;

                match stream.read(&mut chunk) {
                    Ok(0) => {
                        info!("Agent disconnected");
                        drop_client = true;
                    }
                    Ok(n) => {
                        decoder.extend(&chunk[..n]);
                        if !drain_frames(&mut decoder, &cmd_tx) {
                            drop_client = true;
                        }
                    }
                    Err(ref e)
                        if e.kind() == ErrorKind::WouldBlock
                            || e.kind() == ErrorKind::TimedOut => {}
                    Err(e) => {
                        warn!("Read failed: {}", e);
                        drop_client = true;
                    }
                }

                while !drop_client {
                    let payload = match out_rx.try_recv() {
                        Ok(p) => p,
                        Err(_) => break,
                    };
                    if let Err(e) = stream.write_all(&encode_frame(payload.as_bytes())) {
                        warn!("Write failed: {}", e);
                        drop_client = true;
                    }
                }

                if drop_client {
                    connected.store(false, Ordering::Relaxed);
                    client = None;
                    decoder.clear();
                }
            }
        }
    }
}

/// Decodes buffered frames into commands. Returns `false` when the stream
/// must be dropped (corrupt framing).
fn drain_frames(decoder: &mut FrameDecoder, cmd_tx: &Sender<Command>) -> bool {
    loop {
        match decoder.next_frame() {
            Ok(Some(payload)) => match serde_json::from_slice::<Command>(&payload) {
                Ok(cmd) => {
                    // Receiver gone means the transport was dropped; the
                    // loop will notice `running` soon enough.
                    if cmd_tx.send(cmd).is_err() {
                        return true;
                    }
                }
                // Malformed content is skipped, never fatal.
                Err(e) => warn!("Failed to parse command: {}", e),
            },
            Ok(None) => return true,
            Err(e) => {
                warn!("Corrupt frame from agent: {}", e);
                return false;
            }
        }
    }
}
