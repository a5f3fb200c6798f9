//! Line-oriented terminal I/O shared by the commands.

use std::io::{self, IsTerminal};

use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use ob_core::ports::ConfirmationPort;

type Reader = Box<dyn AsyncBufRead + Unpin + Send>;
type Writer = Box<dyn AsyncWrite + Unpin + Send>;

struct Io {
    reader: Reader,
    writer: Writer,
}

/// Question/answer over a reader and a writer.
///
/// Each call holds the lock for one exchange only, so a [`TerminalConfirmation`]
/// sharing the prompt can ask while a command is between questions.
pub struct Prompt {
    io: Mutex<Io>,
    /// Read secrets from the terminal with echo off.
    hide_secrets: bool,
}

impl Prompt {
    pub fn new(
        reader: impl AsyncBufRead + Unpin + Send + 'static,
        writer: impl AsyncWrite + Unpin + Send + 'static,
    ) -> Self {
        Self {
            io: Mutex::new(Io {
                reader: Box::new(reader),
                writer: Box::new(writer),
            }),
            hide_secrets: false,
        }
    }

    /// Prompt on stdin/stdout. Secrets are masked when stdin is a terminal.
    pub fn stdio() -> Self {
        Self {
            hide_secrets: io::stdin().is_terminal(),
            ..Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        }
    }

    pub async fn say(&self, line: impl AsRef<str>) -> io::Result<()> {
        let mut io = self.io.lock().await;
        io.writer.write_all(line.as_ref().as_bytes()).await?;
        io.writer.write_all(b"\n").await?;
        io.writer.flush().await
    }

    /// Print `question` and read one line, without its line ending.
    ///
    /// `None` means the input is closed.
    pub async fn ask(&self, question: &str) -> io::Result<Option<String>> {
        let mut io = self.io.lock().await;
        io.writer.write_all(question.as_bytes()).await?;
        io.writer.flush().await?;

        let mut line = String::new();
        if io.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Like [`Prompt::ask`], but the answer is not echoed on a terminal.
    ///
    /// Piped input is read as a plain line.
    pub async fn ask_secret(&self, question: &str) -> io::Result<Option<String>> {
        if !self.hide_secrets {
            return self.ask(question).await;
        }

        let mut io = self.io.lock().await;
        io.writer.write_all(question.as_bytes()).await?;
        io.writer.flush().await?;

        let answer = tokio::task::spawn_blocking(read_hidden_line)
            .await
            .map_err(std::io::Error::other)??;
        io.writer.write_all(b"\n").await?;
        io.writer.flush().await?;
        Ok(answer)
    }
}

/// Raw mode for the lifetime of the guard.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::warn!(error = %err, "failed to restore terminal mode");
        }
    }
}

/// Progress of a line typed with echo off.
#[derive(Debug, PartialEq, Eq)]
enum SecretKey {
    Pending,
    Submitted,
    Cancelled,
}

fn apply_secret_key(line: &mut String, key: KeyEvent) -> SecretKey {
    if key.kind != KeyEventKind::Press {
        return SecretKey::Pending;
    }
    match key.code {
        KeyCode::Enter => SecretKey::Submitted,
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            SecretKey::Cancelled
        }
        KeyCode::Backspace => {
            line.pop();
            SecretKey::Pending
        }
        KeyCode::Char(c) => {
            line.push(c);
            SecretKey::Pending
        }
        _ => SecretKey::Pending,
    }
}

fn read_hidden_line() -> io::Result<Option<String>> {
    let _raw = RawMode::enable()?;
    let mut line = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match apply_secret_key(&mut line, key) {
            SecretKey::Pending => {}
            SecretKey::Submitted => return Ok(Some(line)),
            SecretKey::Cancelled => return Ok(None),
        }
    }
}

/// Yes/no confirmation on the terminal. Anything but `y`/`yes` declines.
pub struct TerminalConfirmation {
    prompt: std::sync::Arc<Prompt>,
}

impl TerminalConfirmation {
    pub fn new(prompt: std::sync::Arc<Prompt>) -> Self {
        Self { prompt }
    }
}

#[async_trait]
impl ConfirmationPort for TerminalConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        match self.prompt.ask(&format!("{prompt} [y/N] ")).await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "confirmation prompt failed");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
