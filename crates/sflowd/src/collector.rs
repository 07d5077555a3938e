//! UDP collector
//!
//! A single reader task pulls datagrams off the socket and hands them
//! round-robin to a fixed pool of decode workers over bounded queues. When a
//! worker's queue is full the datagram is dropped and counted; the reader
//! never blocks on decoding.

use crate::config::SflowdConfig;
use crate::error::Result;
use crate::sink::MetricSink;
use crate::stats::DaemonStats;
use chrono::{DateTime, Utc};
use sflow_v5::{SflowDecoder, SflowError};
use sflow_decoder::DecodeError;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// One received datagram, stamped at arrival
#[derive(Debug)]
struct Datagram {
    bytes: Vec<u8>,
    peer: SocketAddr,
    received_at: DateTime<Utc>,
}

/// Bound UDP collector, ready to run
pub struct Collector {
    socket: UdpSocket,
    config: SflowdConfig,
    decoder: SflowDecoder,
    stats: DaemonStats,
}

impl Collector {
    /// Validates the configuration, builds the decoder and binds the socket.
    pub async fn bind(config: SflowdConfig, stats: DaemonStats) -> Result<Self> {
        config.validate()?;
        let addr = config.listen_addr()?;
        let decoder = SflowDecoder::new(&config.decoder);
        let socket = UdpSocket::bind(addr).await?;

        info!(
            address = %socket.local_addr()?,
            workers = config.listener.workers,
            queue_depth = config.listener.queue_depth,
            "sflowd listening"
        );

        Ok(Self {
            socket,
            config,
            decoder,
            stats,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receives until `shutdown` resolves, then drains the worker queues.
    pub async fn run<F>(self, shutdown: F, sink: Arc<dyn MetricSink>) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let Collector {
            socket,
            config,
            decoder,
            stats,
        } = self;

        let mut senders = Vec::with_capacity(config.listener.workers);
        let mut workers: Vec<JoinHandle<()>> = Vec::with_capacity(config.listener.workers);
        for id in 0..config.listener.workers {
            let (tx, rx) = mpsc::channel(config.listener.queue_depth);
            senders.push(tx);
            workers.push(tokio::spawn(worker(
                id,
                rx,
                decoder.clone(),
                Arc::clone(&sink),
                stats.clone(),
            )));
        }

        let mut buf = vec![0u8; config.listener.read_buffer_bytes];
        let mut next = 0usize;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested, draining workers");
                    break;
                }
                received = socket.recv_from(&mut buf) => {
                    let (len, peer) = match received {
                        Ok(r) => r,
                        Err(e) => {
                            warn!(error = %e, "recv_from failed");
                            continue;
                        }
                    };
                    stats.record_received();

                    let datagram = Datagram {
                        bytes: buf[..len].to_vec(),
                        peer,
                        received_at: Utc::now(),
                    };
                    match senders[next].try_send(datagram) {
                        Ok(()) => {}
                        Err(TrySendError::Full(d)) => {
                            stats.record_dropped();
                            debug!(worker = next, peer = %d.peer, "worker queue full, datagram dropped");
                        }
                        Err(TrySendError::Closed(_)) => {
                            error!(worker = next, "worker exited unexpectedly");
                            break;
                        }
                    }
                    next = (next + 1) % senders.len();
                }
            }
        }

        drop(senders);
        for (id, handle) in workers.into_iter().enumerate() {
            if let Err(e) = handle.await {
                error!(worker = id, error = %e, "worker task failed");
            }
        }

        info!(
            received = stats.datagrams_received(),
            dropped = stats.datagrams_dropped(),
            emitted = stats.metrics_emitted(),
            "sflowd stopped"
        );
        Ok(())
    }
}

async fn worker(
    id: usize,
    mut rx: mpsc::Receiver<Datagram>,
    mut decoder: SflowDecoder,
    sink: Arc<dyn MetricSink>,
    stats: DaemonStats,
) {
    debug!(worker = id, "decode worker started");

    while let Some(datagram) = rx.recv().await {
        let timer = stats.start_decode_latency();
        let decoded = decoder.decode_metrics_at(&datagram.bytes, datagram.received_at);
        timer.observe_duration();

        let metrics = match decoded {
            Ok(metrics) => metrics,
            Err(e) => {
                stats.record_decode_failure(failure_reason(&e));
                warn!(
                    worker = id,
                    peer = %datagram.peer,
                    length = datagram.bytes.len(),
                    error = %e,
                    "failed to decode datagram"
                );
                continue;
            }
        };

        // sinks do blocking I/O; keep it off the runtime threads
        let count = metrics.len();
        let writer = Arc::clone(&sink);
        match tokio::task::spawn_blocking(move || writer.write(&metrics)).await {
            Ok(Ok(())) => stats.record_emitted(count),
            Ok(Err(e)) => {
                stats.record_sink_failure();
                error!(worker = id, error = %e, "failed to write metrics");
            }
            Err(e) => {
                stats.record_sink_failure();
                error!(worker = id, error = %e, "metric write task failed");
            }
        }
    }

    debug!(worker = id, "decode worker stopped");
}

/// Resolves once `signal` fires.
///
/// If the signal cannot be installed the error is logged and this never
/// resolves, so the collector keeps running instead of shutting down at once.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("sflowd: Received SIGINT, shutting down"),
        Err(e) => {
            error!(error = %e, "sflowd: Failed to listen for SIGINT, running until killed");
            std::future::pending::<()>().await
        }
    }
}

/// Stable label for the decode failure counter.
fn failure_reason(err: &SflowError) -> &'static str {
    match err {
        SflowError::UnsupportedVersion { .. } => "version",
        SflowError::Decode(DecodeError::ShortRead { .. }) => "short_read",
        SflowError::Decode(
            DecodeError::IterationLimit { .. }
            | DecodeError::LengthLimit { .. }
            | DecodeError::AssertMax { .. },
        ) => "limit",
        SflowError::Decode(_) => "malformed",
    }
}
