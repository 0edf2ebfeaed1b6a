use crate::config::Config;
use crate::protocol;
use anyhow::Result;
use steering_power::PowerRegistry;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{debug, error, info, warn};

/// Gateway service - serves steering requests over stdio
pub struct GatewayService {
    config: Config,
}

impl GatewayService {
    /// Create a new gateway service
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the power registry from the configured directories
    fn build_registry(&self) -> Result<PowerRegistry> {
        let mut registry = PowerRegistry::new().with_load_mode(self.config.powers.load_mode);
        for dir in self.config.power_directories() {
            registry = registry.add_directory(dir);
        }

        let report = registry.discover()?;
        for skipped in &report.skipped {
            warn!("Skipped power at {}: {}", skipped.path.display(), skipped.reason);
        }
        info!("Discovered {} powers", report.loaded.len());

        Ok(registry)
    }

    /// Run the gateway service
    pub async fn run(self) -> Result<()> {
        steering_logging::init_logging(&self.config.logging.level)?;
        info!("Starting steering gateway");

        let registry = self.build_registry()?;
        if registry.is_empty() {
            warn!("No powers installed; every request will fail");
        } else {
            debug!("{}", registry.generate_system_prompt());
        }

        let shutdown = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to install Ctrl+C handler: {}", e);
            }
            info!("Received shutdown signal");
        };

        let stdin = BufReader::new(io::stdin());
        let stdout = io::stdout();

        tokio::select! {
            result = serve(&registry, stdin, stdout) => {
                if let Err(e) = result {
                    error!("Gateway I/O error: {}", e);
                }
            }
            _ = shutdown => {
                info!("Shutting down gracefully...");
            }
        }

        info!("Gateway service stopped");
        Ok(())
    }
}

/// Answer one JSON request per line until the reader is exhausted
pub async fn serve<R, W>(registry: &PowerRegistry, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = protocol::handle_line(registry, line);
        if let Some(err) = &response.error {
            debug!("Request failed ({}): {}", err.kind, err.message);
        }

        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }
    Ok(())
}
