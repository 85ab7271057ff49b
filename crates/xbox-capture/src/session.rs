//! Handshake and read loop over a [`UsbChannel`].

use crate::{CaptureError, CaptureResult, HandshakePolicy, SessionConfig};
use hid_xbox_one_protocol::{
    decode, handshake_frames, resolve, DecodedState, EndpointPair, TransferError, UsbChannel,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Result of sending one handshake frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOutcome {
    /// 1-based position in the handshake sequence.
    pub frame: usize,
    pub len: usize,
    pub result: Result<usize, TransferError>,
}

/// One received report, handed to the session sink.
#[derive(Debug, Clone, Copy)]
pub struct ReportEvent<'a> {
    /// Time since the read loop started.
    pub elapsed: Duration,
    pub raw: &'a [u8],
    /// `None` for short reports.
    pub state: Option<DecodedState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub reports: u64,
    pub decoded: u64,
    /// Reports too short to carry state.
    pub short: u64,
    /// Reads that returned no data within the timeout.
    pub timeouts: u64,
}

pub struct Session<C: UsbChannel> {
    channel: C,
    endpoints: EndpointPair,
    config: SessionConfig,
}

impl<C: UsbChannel> Session<C> {
    /// Resolve the interrupt endpoints and claim their interface.
    pub fn open(mut channel: C, config: SessionConfig) -> CaptureResult<Self> {
        config.validate()?;

        let tree = channel.descriptor_tree()?;
        let endpoints = resolve(&tree)?;
        info!(
            interface = endpoints.interface_number,
            ep_in = %format!("0x{:02x}", endpoints.ep_in),
            ep_out = %format!("0x{:02x}", endpoints.ep_out),
            "Resolved interrupt endpoints"
        );

        channel
            .claim(endpoints.interface_number)
            .map_err(|source| CaptureError::Claim {
                interface: endpoints.interface_number,
                source,
            })?;

        Ok(Self {
            channel,
            endpoints,
            config,
        })
    }

    pub fn endpoints(&self) -> EndpointPair {
        self.endpoints
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Send the three handshake frames in order.
    ///
    /// Under [`HandshakePolicy::Strict`] the first failed frame aborts with
    /// [`CaptureError::Handshake`]; under `Lenient` it is logged and the
    /// remaining frames are still sent.
    pub fn handshake(&mut self) -> CaptureResult<Vec<FrameOutcome>> {
        let frames = handshake_frames();
        let mut outcomes = Vec::with_capacity(frames.len());

        for (index, data) in frames.iter().enumerate() {
            let frame = index + 1;
            if index > 0 && !self.config.handshake_delay.is_zero() {
                std::thread::sleep(self.config.handshake_delay);
            }

            let result =
                self.channel
                    .send(self.endpoints.ep_out, data, self.config.handshake_timeout);
            match &result {
                Ok(transferred) => {
                    info!(frame, transferred, "Handshake frame sent");
                }
                Err(e) => match self.config.handshake_policy {
                    HandshakePolicy::Strict => {
                        return Err(CaptureError::Handshake {
                            frame,
                            source: e.clone(),
                        });
                    }
                    HandshakePolicy::Lenient => {
                        warn!(frame, error = %e, "Handshake frame failed, continuing");
                    }
                },
            }

            outcomes.push(FrameOutcome {
                frame,
                len: data.len(),
                result,
            });
        }

        Ok(outcomes)
    }

    /// Receive reports until a configured limit is hit or the transport fails.
    ///
    /// Read timeouts are retried. Any other transport error ends the loop and
    /// is returned unchanged. The sink sees every report, including short
    /// ones that decode to nothing.
    pub fn run<F>(&mut self, sink: F) -> CaptureResult<SessionStats>
    where
        F: FnMut(&ReportEvent<'_>) -> CaptureResult<()>,
    {
        self.run_until(&AtomicBool::new(false), sink)
    }

    /// Like [`Session::run`], but also stops once `stop` is set.
    ///
    /// The flag is checked before every read, so a stop takes effect within
    /// one read timeout. Stopping is a normal exit and returns the stats.
    pub fn run_until<F>(&mut self, stop: &AtomicBool, mut sink: F) -> CaptureResult<SessionStats>
    where
        F: FnMut(&ReportEvent<'_>) -> CaptureResult<()>,
    {
        let mut stats = SessionStats::default();
        let start = Instant::now();
        debug!(
            max_reports = ?self.config.max_reports,
            duration = ?self.config.duration,
            "Entering read loop"
        );

        loop {
            if stop.load(Ordering::Relaxed) {
                info!(reports = stats.reports, "Stop requested");
                break;
            }
            if self.config.max_reports.is_some_and(|max| stats.reports >= max) {
                debug!(reports = stats.reports, "Report limit reached");
                break;
            }
            if self.config.duration.is_some_and(|d| start.elapsed() >= d) {
                debug!(reports = stats.reports, "Capture duration elapsed");
                break;
            }

            let raw = match self.channel.receive(
                self.endpoints.ep_in,
                self.config.buffer_capacity,
                self.config.read_timeout,
            ) {
                Ok(raw) => raw,
                Err(TransferError::Timeout) => {
                    stats.timeouts += 1;
                    trace!("Read timed out, retrying");
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, reports = stats.reports, "Read failed");
                    return Err(e.into());
                }
            };

            let state = decode(&raw);
            stats.reports += 1;
            if state.is_some() {
                stats.decoded += 1;
            } else {
                stats.short += 1;
            }
            trace!(len = raw.len(), decoded = state.is_some(), "Report received");

            sink(&ReportEvent {
                elapsed: start.elapsed(),
                raw: &raw,
                state,
            })?;
        }

        info!(
            reports = stats.reports,
            decoded = stats.decoded,
            short = stats.short,
            timeouts = stats.timeouts,
            "Read loop finished"
        );
        Ok(stats)
    }
}
