//! Shared line reader for terminal prompts.
//!
//! The start form, the console bridge and the console checkout all read from
//! the same terminal. They share one line source so no adapter swallows
//! input meant for another.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::{Mutex, mpsc};

type BoxedLines = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;

enum LineSource {
    Reader(BoxedLines),
    /// Fed by a detached thread, so a pending read never holds up runtime
    /// shutdown.
    Channel(mpsc::UnboundedReceiver<io::Result<String>>),
}

impl LineSource {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        match self {
            Self::Reader(lines) => lines.next_line().await,
            Self::Channel(rx) => rx.recv().await.transpose(),
        }
    }
}

/// Cloneable handle onto a line-oriented input.
#[derive(Clone)]
pub struct ConsolePrompt {
    source: Arc<Mutex<LineSource>>,
}

impl ConsolePrompt {
    /// Read from the process's standard input on a dedicated thread.
    pub fn stdin() -> Self {
        Self::from_blocking(io::BufReader::new(io::stdin()))
    }

    /// Read from a blocking source on a dedicated thread. The thread ends at
    /// end of input, on a read error, or once every handle is dropped.
    pub fn from_blocking(reader: impl BufRead + Send + 'static) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        });
        Self::with_source(LineSource::Channel(rx))
    }

    /// Read from any async buffered source.
    pub fn from_reader(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        let boxed: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(reader);
        Self::with_source(LineSource::Reader(boxed.lines()))
    }

    fn with_source(source: LineSource) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
        }
    }

    /// Print `label` and read one trimmed line; `None` at end of input.
    pub async fn ask(&self, label: &str) -> io::Result<Option<String>> {
        if !label.is_empty() {
            println!("{label}");
        }
        let mut source = self.source.lock().await;
        let line = source.next_line().await?;
        Ok(line.map(|raw| raw.trim().to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rstest::rstest;

    #[tokio::test]
    async fn clones_share_one_cursor() {
        let prompt = ConsolePrompt::from_reader(&b"Jane Doe\n  LN-42 \n"[..]);
        let other = prompt.clone();

        assert_eq!(prompt.ask("").await.ok().flatten().as_deref(), Some("Jane Doe"));
        assert_eq!(other.ask("").await.ok().flatten().as_deref(), Some("LN-42"));
        assert_eq!(prompt.ask("").await.ok().flatten(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn blocking_sources_are_read_off_the_runtime() {
        let input = io::Cursor::new(b" Jane Doe \nLN-7\n".to_vec());
        let prompt = ConsolePrompt::from_blocking(input);

        assert_eq!(prompt.ask("").await.ok().flatten().as_deref(), Some("Jane Doe"));
        assert_eq!(prompt.ask("").await.ok().flatten().as_deref(), Some("LN-7"));
        assert_eq!(prompt.ask("").await.ok().flatten(), None);
    }

    /// Never yields a line, like a terminal nobody types into.
    struct SilentTerminal;

    impl io::Read for SilentTerminal {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            thread::sleep(Duration::from_secs(3600));
            Ok(0)
        }
    }

    #[rstest]
    fn a_pending_read_does_not_block_runtime_shutdown() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("runtime");
        let prompt = ConsolePrompt::from_blocking(io::BufReader::new(SilentTerminal));
        let pending = runtime.spawn(async move { prompt.ask("").await });

        runtime.block_on(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
        });
        assert!(!pending.is_finished());

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        thread::spawn(move || {
            drop(runtime);
            let _sent = done_tx.send(());
        });
        assert!(
            done_rx.recv_timeout(Duration::from_secs(5)).is_ok(),
            "runtime shutdown waited on the pending read"
        );
    }
}
