//! Orientation sensor decoding
//!
//! The sensor streams one ASCII record per line: a delimiter character, eight
//! byte values joined by `.`, and a closing delimiter. Each pair of bytes is a
//! 2.14 fixed-point quaternion channel in unsigned form. [`decode_frame`]
//! turns one record into a unit quaternion; [`SerialOrientationDecoder`] keeps
//! the most recent good sample across frames; [`FramedLink`] assembles
//! records from the raw byte stream.

use glam::{Quat, Vec4};
use std::io::{BufRead, Read};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;

/// Fixed-point scale of one channel (2.14 format)
pub const FIXED_POINT_SCALE: f32 = 16384.0;
/// Decoded values at or above this are negative values in unsigned form
pub const WRAP_LIMIT: f32 = 2.0;
const WRAP_SPAN: f32 = 4.0;
/// Separator between byte values inside a record
pub const CHANNEL_SEPARATOR: char = '.';
/// Byte values per record (two per quaternion channel)
pub const RAW_CHANNEL_COUNT: usize = 8;

/// Errors that can occur while decoding a sensor record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error("frame too short to carry delimiters: {0:?}")]
    TooShort(String),

    #[error("expected {expected} channels, got {actual}")]
    ChannelCount { expected: usize, actual: usize },

    #[error("channel {index} is not a byte value: {value:?}")]
    InvalidChannel { index: usize, value: String },

    /// All channels decoded to zero (e.g. sensor without a lock yet)
    #[error("decoded quaternion has zero length")]
    Degenerate,
}

/// Result type for frame decoding
pub type Result<T> = std::result::Result<T, FrameError>;

/// One decoded absolute orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationSample {
    /// Unit quaternion, axes already remapped to scene space
    pub rotation: Quat,
    /// Wrapped channel values `[q0, q1, q2, q3]` as sent by the sensor
    pub channels: [f32; 4],
}

/// Map an unsigned fixed-point value in [0, 4) onto the signed range [-2, 2)
pub fn wrap_fixed_point(value: f32) -> f32 {
    if value >= WRAP_LIMIT {
        value - WRAP_SPAN
    } else {
        value
    }
}

/// Reorder sensor channels into scene quaternion order `(x, y, z, w)`
///
/// The sensor's axes do not match the scene's: `[q0, q1, q2, q3]` becomes
/// `[q1, q3, -q2, q0]`.
pub fn remap_axes(q: [f32; 4]) -> [f32; 4] {
    [q[1], q[3], -q[2], q[0]]
}

fn strip_delimiters(frame: &str) -> Result<&str> {
    let mut chars = frame.chars();
    if chars.next().is_none() || chars.next_back().is_none() {
        return Err(FrameError::TooShort(frame.to_string()));
    }
    Ok(chars.as_str())
}

/// Decode one delimited record into an orientation sample
pub fn decode_frame(frame: &str) -> Result<OrientationSample> {
    let payload = strip_delimiters(frame)?;
    let tokens: Vec<&str> = payload.split(CHANNEL_SEPARATOR).collect();
    if tokens.len() != RAW_CHANNEL_COUNT {
        return Err(FrameError::ChannelCount {
            expected: RAW_CHANNEL_COUNT,
            actual: tokens.len(),
        });
    }

    let mut bytes = [0u8; RAW_CHANNEL_COUNT];
    for (index, (byte, token)) in bytes.iter_mut().zip(&tokens).enumerate() {
        *byte = token
            .trim()
            .parse()
            .map_err(|_| FrameError::InvalidChannel {
                index,
                value: token.to_string(),
            })?;
    }

    let mut channels = [0.0f32; 4];
    for (channel, pair) in channels.iter_mut().zip(bytes.chunks_exact(2)) {
        let raw = (u16::from(pair[0]) << 8) | u16::from(pair[1]);
        *channel = wrap_fixed_point(f32::from(raw) / FIXED_POINT_SCALE);
    }

    let quat = Vec4::from_array(remap_axes(channels));
    let length = quat.length();
    if length == 0.0 {
        return Err(FrameError::Degenerate);
    }

    Ok(OrientationSample {
        rotation: Quat::from_vec4(quat / length),
        channels,
    })
}

/// Read side of a serial connection carrying sensor records
pub trait SerialTransport {
    /// Whether the connection is open
    fn is_connected(&self) -> bool;

    /// Most recent complete record, delimiters included
    fn latest_frame(&self) -> Option<String>;
}

/// Holds the latest good orientation sample
///
/// Malformed or degenerate records are dropped and the previous sample stays
/// in place, so a noisy link never interrupts the frame loop.
#[derive(Debug, Default)]
pub struct SerialOrientationDecoder {
    latest: Option<OrientationSample>,
    last_frame: Option<String>,
    rejected: u64,
}

impl SerialOrientationDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the transport's current record if connected
    ///
    /// Returns the latest good sample while the transport is connected. A
    /// closed transport invalidates the held sample, so a reopened link only
    /// drives orientation once it delivers a new record.
    pub fn update(&mut self, transport: &dyn SerialTransport) -> Option<OrientationSample> {
        if !transport.is_connected() {
            self.latest = None;
            self.last_frame = None;
            return None;
        }

        if let Some(frame) = transport.latest_frame() {
            if self.last_frame.as_deref() != Some(frame.as_str()) {
                match decode_frame(&frame) {
                    Ok(sample) => self.latest = Some(sample),
                    Err(e) => {
                        self.rejected += 1;
                        tracing::debug!("Dropping sensor frame {:?}: {}", frame, e);
                    }
                }
                self.last_frame = Some(frame);
            }
        }

        self.latest
    }

    /// Most recent good sample from the current connection
    pub fn latest(&self) -> Option<OrientationSample> {
        self.latest
    }

    /// Number of records dropped since creation
    pub fn rejected_frames(&self) -> u64 {
        self.rejected
    }
}

#[derive(Debug, Default)]
struct LinkState {
    connected: bool,
    buffer: Vec<u8>,
    latest: Option<String>,
}

/// Line-framed serial link
///
/// Accumulates raw bytes, splits them on `\n` and keeps only the most recent
/// complete record. Cloning yields another handle onto the same link, so a
/// reader thread can feed it while the frame loop reads it.
#[derive(Debug, Clone, Default)]
pub struct FramedLink {
    state: Arc<Mutex<LinkState>>,
}

impl FramedLink {
    /// Create a closed link
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark the link as connected
    pub fn open(&self) {
        self.lock().connected = true;
        tracing::info!("Serial link opened");
    }

    /// Mark the link as closed and forget buffered data
    pub fn close(&self) {
        let mut state = self.lock();
        if state.connected {
            tracing::info!("Serial link closed");
        }
        *state = LinkState::default();
    }

    /// Append received bytes, updating the latest record for every completed line
    pub fn feed(&self, bytes: &[u8]) {
        let mut state = self.lock();
        state.buffer.extend_from_slice(bytes);

        while let Some(end) = state.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = state.buffer.drain(..=end).collect();
            let text = String::from_utf8_lossy(&line[..end]);
            let text = text.trim_end_matches('\r');
            if !text.is_empty() {
                state.latest = Some(text.to_string());
            }
        }
    }

    /// Open the link and pump `reader` into it on a background thread
    ///
    /// The link closes when the reader reports end of stream or an error.
    pub fn spawn_reader<R>(&self, mut reader: R) -> JoinHandle<()>
    where
        R: Read + Send + 'static,
    {
        let link = self.clone();
        link.open();
        std::thread::spawn(move || {
            let mut chunk = [0u8; 256];
            loop {
                match reader.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => link.feed(&chunk[..n]),
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        tracing::warn!("Serial read failed: {}", e);
                        break;
                    }
                }
            }
            link.close();
        })
    }

    /// Open the link and replay recorded lines from `reader`, one every `interval`
    ///
    /// Unlike [`spawn_reader`](FramedLink::spawn_reader) the link stays open
    /// once the capture is exhausted, holding its final record. Only a read
    /// error closes it.
    pub fn spawn_replay<R>(&self, reader: R, interval: Duration) -> JoinHandle<()>
    where
        R: BufRead + Send + 'static,
    {
        let link = self.clone();
        link.open();
        std::thread::spawn(move || {
            let mut records: u64 = 0;
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        let mut bytes = line.into_bytes();
                        bytes.push(b'\n');
                        link.feed(&bytes);
                        records += 1;
                        std::thread::sleep(interval);
                    }
                    Err(e) => {
                        tracing::warn!("Serial replay failed: {}", e);
                        link.close();
                        return;
                    }
                }
            }
            tracing::info!("Serial replay finished after {} records", records);
        })
    }
}

impl SerialTransport for FramedLink {
    fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn latest_frame(&self) -> Option<String> {
        self.lock().latest.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    /// Encode a value in [-2, 2) as the sensor's two byte values
    fn encode(value: f32) -> (u8, u8) {
        let unsigned = if value < 0.0 { value + 4.0 } else { value };
        let raw = (unsigned * FIXED_POINT_SCALE).round() as u16;
        ((raw >> 8) as u8, (raw & 0xff) as u8)
    }

    fn frame(values: [f32; 4]) -> String {
        let bytes: Vec<String> = values
            .iter()
            .flat_map(|&v| {
                let (high, low) = encode(v);
                [high.to_string(), low.to_string()]
            })
            .collect();
        format!("#{}#", bytes.join("."))
    }

    struct FixedTransport {
        connected: bool,
        frame: Option<String>,
    }

    impl SerialTransport for FixedTransport {
        fn is_connected(&self) -> bool {
            self.connected
        }

        fn latest_frame(&self) -> Option<String> {
            self.frame.clone()
        }
    }

    #[test]
    fn test_wraparound_correction() {
        assert_eq!(wrap_fixed_point(3.5), -0.5);
        assert_eq!(wrap_fixed_point(2.0), -2.0);
        assert_eq!(wrap_fixed_point(1.999), 1.999);
        assert_eq!(wrap_fixed_point(0.0), 0.0);
    }

    #[test]
    fn test_wraparound_applies_to_every_channel() {
        // 0xE000 / 16384 = 3.5 on each channel
        let sample = decode_frame("<224.0.224.0.224.0.224.0>").unwrap();
        assert_eq!(sample.channels, [-0.5; 4]);
    }

    #[test]
    fn test_axis_remap() {
        assert_eq!(remap_axes([0.1, 0.2, 0.3, 0.4]), [0.2, 0.4, -0.3, 0.1]);
    }

    #[test]
    fn test_decode_remaps_and_normalizes() {
        let sample = decode_frame(&frame([0.25, 0.5, 0.75, 1.0])).unwrap();
        assert_eq!(sample.channels, [0.25, 0.5, 0.75, 1.0]);

        let expected = Vec4::new(0.5, 1.0, -0.75, 0.25).normalize();
        let actual = Vec4::from(sample.rotation);
        assert!(actual.abs_diff_eq(expected, EPSILON));
        assert!((sample.rotation.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_decoded_quaternion_is_unit_length() {
        for values in [
            [0.1, -0.2, 0.3, -0.4],
            [1.9, 0.0, 0.0, 0.0],
            [-2.0, 1.5, -1.5, 0.01],
            [0.0, 0.0, 0.0, 0.0001],
        ] {
            let sample = decode_frame(&frame(values)).unwrap();
            assert!((sample.rotation.length() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_zero_quaternion_is_rejected() {
        assert_eq!(
            decode_frame("#0.0.0.0.0.0.0.0#"),
            Err(FrameError::Degenerate)
        );
    }

    #[test]
    fn test_malformed_frames() {
        assert!(matches!(decode_frame(""), Err(FrameError::TooShort(_))));
        assert!(matches!(decode_frame("#"), Err(FrameError::TooShort(_))));
        assert_eq!(
            decode_frame("#1.2.3#"),
            Err(FrameError::ChannelCount {
                expected: 8,
                actual: 3
            })
        );
        assert!(matches!(
            decode_frame("#1.2.3.x.5.6.7.8#"),
            Err(FrameError::InvalidChannel { index: 3, .. })
        ));
        assert!(matches!(
            decode_frame("#1.2.3.4.5.6.7.256#"),
            Err(FrameError::InvalidChannel { index: 7, .. })
        ));
    }

    #[test]
    fn test_decoder_keeps_previous_sample_on_bad_frame() {
        let mut decoder = SerialOrientationDecoder::new();
        let mut transport = FixedTransport {
            connected: true,
            frame: Some(frame([0.0, 1.0, 0.0, 0.0])),
        };

        let first = decoder.update(&transport).unwrap();

        transport.frame = Some("#garbage#".to_string());
        assert_eq!(decoder.update(&transport), Some(first));

        transport.frame = Some("#0.0.0.0.0.0.0.0#".to_string());
        assert_eq!(decoder.update(&transport), Some(first));
        assert_eq!(decoder.rejected_frames(), 2);
    }

    #[test]
    fn test_decoder_ignores_disconnected_transport() {
        let mut decoder = SerialOrientationDecoder::new();
        let transport = FixedTransport {
            connected: false,
            frame: Some(frame([1.0, 0.0, 0.0, 0.0])),
        };

        assert!(decoder.update(&transport).is_none());
        assert!(decoder.latest().is_none());
    }

    #[test]
    fn test_decoder_forgets_sample_when_link_closes() {
        let mut decoder = SerialOrientationDecoder::new();
        let mut transport = FixedTransport {
            connected: true,
            frame: Some(frame([0.0, 1.0, 0.0, 0.0])),
        };
        assert!(decoder.update(&transport).is_some());

        transport.connected = false;
        assert!(decoder.update(&transport).is_none());
        assert!(decoder.latest().is_none());

        // Reopened without a record yet
        transport.connected = true;
        transport.frame = None;
        assert!(decoder.update(&transport).is_none());

        // The same record arriving again after reconnect is decoded afresh
        transport.frame = Some(frame([0.0, 1.0, 0.0, 0.0]));
        assert!(decoder.update(&transport).is_some());
    }

    #[test]
    fn test_framed_link_keeps_latest_line() {
        let link = FramedLink::new();
        assert!(!link.is_connected());
        link.open();

        link.feed(b"#1.2.3.4.5.6.7.8#\r\n#9.10");
        assert_eq!(link.latest_frame().as_deref(), Some("#1.2.3.4.5.6.7.8#"));

        link.feed(b".11.12.13.14.15.16#\n");
        assert_eq!(
            link.latest_frame().as_deref(),
            Some("#9.10.11.12.13.14.15.16#")
        );

        link.close();
        assert!(!link.is_connected());
        assert!(link.latest_frame().is_none());
    }

    #[test]
    fn test_spawned_reader_closes_on_eof() {
        let link = FramedLink::new();
        let input = std::io::Cursor::new(b"#0.0.64.0.0.0.0.0#\n".to_vec());
        link.spawn_reader(input).join().unwrap();

        assert!(!link.is_connected());
    }

    #[test]
    fn test_replay_holds_last_record_open() {
        let link = FramedLink::new();
        let capture = std::io::Cursor::new(
            b"#0.0.64.0.0.0.0.0#\r\n\n#0.0.0.0.64.0.0.0#\n".to_vec(),
        );
        link.spawn_replay(capture, Duration::ZERO).join().unwrap();

        assert!(link.is_connected());
        assert_eq!(link.latest_frame().as_deref(), Some("#0.0.0.0.64.0.0.0#"));
    }
}
