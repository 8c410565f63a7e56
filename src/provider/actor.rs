//! Provider actor - runs generation calls in the Tokio runtime

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{ProviderCommand, ProviderReply};
use crate::provider::client::GenerationClient;

/// Provider actor that processes generation commands. Each command runs as
/// its own task; replies carry the request id so the app can drop stale
/// results.
pub struct ProviderActor {
    client: Arc<GenerationClient>,
    reply_tx: mpsc::UnboundedSender<ProviderReply>,
    active: JoinSet<()>,
}

impl ProviderActor {
    pub fn new(client: GenerationClient, reply_tx: mpsc::UnboundedSender<ProviderReply>) -> Self {
        ProviderActor {
            client: Arc::new(client),
            reply_tx,
            active: JoinSet::new(),
        }
    }

    /// Run the provider actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<ProviderCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(ProviderCommand::GenerateWord { id, situation, style }) => {
                            let client = self.client.clone();
                            let reply_tx = self.reply_tx.clone();
                            self.active.spawn(async move {
                                tracing::info!(id, situation = %situation, "Generating word");
                                let reply = match client.generate_word(&situation, &style).await {
                                    Ok(text) => ProviderReply::Generated { id, text },
                                    Err(e) => failed(id, e),
                                };
                                let _ = reply_tx.send(reply);
                            });
                        }

                        Some(ProviderCommand::GenerateLetter { id, label, context, style }) => {
                            let client = self.client.clone();
                            let reply_tx = self.reply_tx.clone();
                            self.active.spawn(async move {
                                tracing::info!(id, label = %label, "Generating letter");
                                let reply = match client.generate_letter(&label, &context, &style).await {
                                    Ok(text) => ProviderReply::Generated { id, text },
                                    Err(e) => failed(id, e),
                                };
                                let _ = reply_tx.send(reply);
                            });
                        }

                        Some(ProviderCommand::GenerateJournalReply { id, user_text }) => {
                            let client = self.client.clone();
                            let reply_tx = self.reply_tx.clone();
                            self.active.spawn(async move {
                                tracing::info!(id, "Generating journal reply");
                                let reply = match client.generate_journal_reply(&user_text).await {
                                    Ok(text) => ProviderReply::Generated { id, text },
                                    Err(e) => failed(id, e),
                                };
                                let _ = reply_tx.send(reply);
                            });
                        }

                        Some(ProviderCommand::GenerateDaily { id }) => {
                            let client = self.client.clone();
                            let reply_tx = self.reply_tx.clone();
                            self.active.spawn(async move {
                                tracing::info!(id, "Generating daily message");
                                let reply = match client.generate_daily().await {
                                    Ok(text) => ProviderReply::Generated { id, text },
                                    Err(e) => failed(id, e),
                                };
                                let _ = reply_tx.send(reply);
                            });
                        }

                        Some(ProviderCommand::GenerateImage { id, user_prompt, style_prompt }) => {
                            let client = self.client.clone();
                            let reply_tx = self.reply_tx.clone();
                            self.active.spawn(async move {
                                tracing::info!(id, "Generating image");
                                let reply = match client.generate_image(&user_prompt, &style_prompt).await {
                                    Ok(source) => ProviderReply::Image { id, source },
                                    Err(e) => failed(id, e),
                                };
                                let _ = reply_tx.send(reply);
                            });
                        }

                        Some(ProviderCommand::SaveImage { id, source }) => {
                            let client = self.client.clone();
                            let reply_tx = self.reply_tx.clone();
                            self.active.spawn(async move {
                                let reply = match client.save_image(&source).await {
                                    Ok(path) => {
                                        tracing::info!(id, path = %path.display(), "Image saved");
                                        ProviderReply::ImageSaved { id, path }
                                    }
                                    Err(e) => failed(id, e),
                                };
                                let _ = reply_tx.send(reply);
                            });
                        }

                        Some(ProviderCommand::NotifyNewUser { name, user_id }) => {
                            let client = self.client.clone();
                            // Fire-and-forget: no reply either way
                            self.active.spawn(async move {
                                client.notify_new_user(&name, &user_id).await;
                            });
                        }

                        Some(ProviderCommand::Shutdown) | None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active.join_next() => {}
            }
        }
    }
}

fn failed(id: u64, e: crate::provider::error::ProviderError) -> ProviderReply {
    tracing::warn!(id, error = %e, "Provider call failed");
    ProviderReply::Failed {
        id,
        message: e.user_message(),
    }
}
