//! Output backends for publishing diagnostic arrays.

use std::io::Write;
use std::net::TcpStream;
use std::path::PathBuf;
use std::sync::Arc;

use jointwatch_types::DiagnosticArray;

use crate::error::PublishError;

/// Anything a diagnostic array can be published to.
pub trait DiagnosticPublisher {
    fn publish(&self, array: &DiagnosticArray) -> Result<(), PublishError>;
}

impl<T: DiagnosticPublisher + ?Sized> DiagnosticPublisher for &T {
    fn publish(&self, array: &DiagnosticArray) -> Result<(), PublishError> {
        (**self).publish(array)
    }
}

impl<T: DiagnosticPublisher + ?Sized> DiagnosticPublisher for Box<T> {
    fn publish(&self, array: &DiagnosticArray) -> Result<(), PublishError> {
        (**self).publish(array)
    }
}

impl<T: DiagnosticPublisher + ?Sized> DiagnosticPublisher for Arc<T> {
    fn publish(&self, array: &DiagnosticArray) -> Result<(), PublishError> {
        (**self).publish(array)
    }
}

/// Output destination for diagnostic arrays.
#[derive(Debug)]
pub enum Output {
    /// Write each array to a JSON file.
    ///
    /// The file is overwritten with each array.
    File(PathBuf),

    /// Send each array to a TCP server as a newline-delimited JSON message.
    ///
    /// A new connection is opened per array.
    Tcp(String),

    /// Print each array as one JSON line on stdout.
    Stdout,

    /// Send arrays through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    #[cfg(feature = "tokio")]
    Channel(tokio::sync::mpsc::Sender<DiagnosticArray>),
}

impl Output {
    /// Create a file output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use jointwatch_sdk::Output;
    ///
    /// let output = Output::file("diagnostics.json");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Output::File(path.into())
    }

    /// Create a TCP output.
    pub fn tcp(addr: impl Into<String>) -> Self {
        Output::Tcp(addr.into())
    }

    /// Create a channel output and return both the output and receiver.
    ///
    /// Sending never blocks: a full buffer is reported as
    /// [`PublishError::ChannelFull`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use jointwatch_sdk::Output;
    ///
    /// let (output, mut rx) = Output::channel(16);
    /// assert!(rx.try_recv().is_err());
    /// ```
    #[cfg(feature = "tokio")]
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<DiagnosticArray>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Output::Channel(tx), rx)
    }

    /// Short description for log lines.
    pub fn describe(&self) -> String {
        match self {
            Output::File(path) => format!("file: {}", path.display()),
            Output::Tcp(addr) => format!("tcp: {addr}"),
            Output::Stdout => "stdout".to_string(),
            #[cfg(feature = "tokio")]
            Output::Channel(_) => "channel".to_string(),
        }
    }
}

impl DiagnosticPublisher for Output {
    fn publish(&self, array: &DiagnosticArray) -> Result<(), PublishError> {
        match self {
            Output::File(path) => {
                let json = serde_json::to_string_pretty(array)?;
                std::fs::write(path, json)?;
            }
            Output::Tcp(addr) => {
                let mut stream = TcpStream::connect(addr.as_str())?;
                let json = serde_json::to_string(array)?;
                stream.write_all(json.as_bytes())?;
                stream.write_all(b"\n")?;
            }
            Output::Stdout => {
                let json = serde_json::to_string(array)?;
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}")?;
                stdout.flush()?;
            }
            #[cfg(feature = "tokio")]
            Output::Channel(tx) => {
                use tokio::sync::mpsc::error::TrySendError;

                tx.try_send(array.clone()).map_err(|e| match e {
                    TrySendError::Full(_) => PublishError::ChannelFull,
                    TrySendError::Closed(_) => PublishError::ChannelClosed,
                })?;
            }
        }
        Ok(())
    }
}

/// Publish to every output in turn.
///
/// All outputs are attempted even if one fails; the first error is returned.
impl DiagnosticPublisher for Vec<Output> {
    fn publish(&self, array: &DiagnosticArray) -> Result<(), PublishError> {
        let mut first_err = None;
        for output in self {
            if let Err(e) = output.publish(array) {
                tracing::warn!("Output {} failed: {}", output.describe(), e);
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jointwatch_types::{DiagnosticStatus, Level};
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;

    fn sample() -> DiagnosticArray {
        DiagnosticArray::builder()
            .timestamp_ms(1703160000000)
            .status(
                DiagnosticStatus::builder("joints:J1", "J1")
                    .level(Level::Warn)
                    .message("Hot")
                    .value("Temperature", 70.0_f32)
                    .build(),
            )
            .build()
    }

    #[test]
    fn file_output_overwrites_with_latest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagnostics.json");
        let output = Output::file(&path);

        output.publish(&DiagnosticArray::with_timestamp(1)).unwrap();
        output.publish(&sample()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: DiagnosticArray = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn file_output_reports_io_error() {
        let output = Output::file("/nonexistent/dir/diagnostics.json");
        let err = output.publish(&sample()).unwrap_err();
        assert!(matches!(err, PublishError::Io(_)));
    }

    #[test]
    fn tcp_output_sends_one_json_line() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut line = String::new();
            BufReader::new(stream).read_line(&mut line).unwrap();
            line
        });

        Output::tcp(addr).publish(&sample()).unwrap();

        let line = server.join().unwrap();
        assert!(line.ends_with('\n'));
        let parsed: DiagnosticArray = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed, sample());
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn channel_output_delivers_array() {
        let (output, mut rx) = Output::channel(4);
        output.publish(&sample()).unwrap();
        assert_eq!(rx.try_recv().unwrap(), sample());
        assert!(rx.try_recv().is_err());
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn channel_output_full_and_closed() {
        let (output, rx) = Output::channel(1);
        output.publish(&sample()).unwrap();
        assert!(matches!(output.publish(&sample()), Err(PublishError::ChannelFull)));

        drop(rx);
        assert!(matches!(output.publish(&sample()), Err(PublishError::ChannelClosed)));
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn fan_out_attempts_every_output() {
        let (good, mut rx) = Output::channel(4);
        let outputs = vec![Output::file("/nonexistent/dir/d.json"), good];

        let err = outputs.publish(&sample()).unwrap_err();
        assert!(matches!(err, PublishError::Io(_)));
        assert_eq!(rx.try_recv().unwrap(), sample());
    }

    #[test]
    fn describe_outputs() {
        assert_eq!(Output::file("d.json").describe(), "file: d.json");
        assert_eq!(Output::tcp("localhost:9090").describe(), "tcp: localhost:9090");
        assert_eq!(Output::Stdout.describe(), "stdout");
    }
}
