//! Link openers for the messaging hand-off

use std::io::ErrorKind;

use async_trait::async_trait;
use cart_core::error::OpenError;
use cart_core::ports::LinkOpener;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{info, warn};

/// Opens links with the desktop's default handler.
pub struct SystemLinkOpener {
    program: String,
    args: Vec<String>,
}

impl SystemLinkOpener {
    pub fn new() -> Self {
        if cfg!(target_os = "macos") {
            Self::with_program("open", &[])
        } else if cfg!(target_os = "windows") {
            Self::with_program("cmd", &["/C", "start", ""])
        } else {
            Self::with_program("xdg-open", &[])
        }
    }

    pub fn with_program(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Default for SystemLinkOpener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkOpener for SystemLinkOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .status()
            .await
            .map_err(|e| match e.kind() {
                // No handler to open links with: the hand-off cannot happen.
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    warn!("Link handler {} unavailable: {}", self.program, e);
                    OpenError::Blocked
                }
                _ => OpenError::Failed(e.to_string()),
            })?;

        if !status.success() {
            return Err(OpenError::Failed(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        info!("Opened messaging link with {}", self.program);
        Ok(())
    }
}

/// Prints the link instead of opening it; the user follows it by hand.
pub struct PrintLinkOpener;

#[async_trait]
impl LinkOpener for PrintLinkOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{}\n", url).as_bytes())
            .await
            .map_err(|e| OpenError::Failed(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| OpenError::Failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_handler_counts_as_blocked() {
        let opener = SystemLinkOpener::with_program("definitely-not-a-real-opener-binary", &[]);
        let result = opener.open("https://wa.me/1?text=hi").await;
        assert!(matches!(result, Err(OpenError::Blocked)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_handler_exit_status_checked() {
        let ok = SystemLinkOpener::with_program("true", &[]);
        assert!(ok.open("https://wa.me/1").await.is_ok());

        let failing = SystemLinkOpener::with_program("false", &[]);
        assert!(matches!(
            failing.open("https://wa.me/1").await,
            Err(OpenError::Failed(_))
        ));
    }
}
