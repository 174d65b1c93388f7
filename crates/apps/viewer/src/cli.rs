//! Command line arguments for the viewer

use clap::Parser;
use devices::Key;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "viewer")]
#[command(about = "Drive a headless scene with a gamepad and an orientation sensor", long_about = None)]
pub struct Args {
    /// Load controller configuration from a TOML file
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of frames to run (runs until interrupted when omitted)
    #[arg(long, value_name = "FRAMES")]
    pub frames: Option<u64>,

    /// Frame rate of the tick loop
    #[arg(long, default_value = "60")]
    pub fps: u32,

    /// Capture file (or serial device with --serial-live) of orientation records
    #[arg(long, value_name = "PATH")]
    pub serial: Option<PathBuf>,

    /// Records per second when replaying a capture (defaults to --fps)
    #[arg(long, value_name = "RATE")]
    pub serial_rate: Option<u32>,

    /// Stream --serial as a live device instead of replaying it
    #[arg(long)]
    pub serial_live: bool,

    /// Key codes dispatched before the first frame (e.g. Digit5,KeyD)
    #[arg(long, value_delimiter = ',', value_name = "KEYS")]
    pub keys: Vec<Key>,

    /// Objects to add to the scene, last one becomes active
    #[arg(long = "object", value_name = "NAME", default_value = "goethe")]
    pub objects: Vec<String>,

    /// Log the active pose every N frames
    #[arg(long, default_value = "30")]
    pub report_every: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["viewer"]);
        assert!(args.config.is_none());
        assert!(args.frames.is_none());
        assert_eq!(args.fps, 60);
        assert!(args.serial.is_none());
        assert!(args.serial_rate.is_none());
        assert!(!args.serial_live);
        assert!(args.keys.is_empty());
        assert_eq!(args.objects, vec!["goethe".to_string()]);
    }

    #[test]
    fn test_serial_replay_options() {
        let args = Args::parse_from(["viewer", "--serial", "imu.log", "--serial-rate", "20"]);
        assert_eq!(args.serial, Some(PathBuf::from("imu.log")));
        assert_eq!(args.serial_rate, Some(20));
        assert!(!args.serial_live);

        let args = Args::parse_from(["viewer", "--serial", "/dev/ttyUSB0", "--serial-live"]);
        assert!(args.serial_live);
    }

    #[test]
    fn test_keys_are_parsed() {
        let args = Args::parse_from(["viewer", "--keys", "Digit5,KeyD,Space"]);
        assert_eq!(args.keys, vec![Key::Digit(5), Key::D, Key::Space]);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(Args::try_parse_from(["viewer", "--keys", "KeyQ"]).is_err());
    }

    #[test]
    fn test_multiple_objects() {
        let args = Args::parse_from([
            "viewer", "--object", "chair", "--object", "mate", "--frames", "10", "-c",
            "pose.toml",
        ]);
        assert_eq!(args.objects, vec!["chair".to_string(), "mate".to_string()]);
        assert_eq!(args.frames, Some(10));
        assert_eq!(args.config, Some(PathBuf::from("pose.toml")));
    }
}
