use std::thread;
use tokio::sync::{mpsc, oneshot};
use anyhow::Result;
use shared::types::{AssetRecord, FieldUpdate};
use crate::store::db::AssetDb;

/// Commands sent to the store thread
pub enum StoreCommand {
    Find(String, oneshot::Sender<Result<Option<AssetRecord>>>),
    Update {
        unique_id: String,
        update: FieldUpdate,
        reply: oneshot::Sender<Result<usize>>,
    },
    Shutdown,
}

/// Handle to the thread that owns the database connection. Cloned into every
/// request; commands are applied one at a time in arrival order.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    /// Spawn a new store thread with the given database
    pub fn spawn(db: AssetDb) -> Self {
        let (tx, mut rx) = mpsc::channel::<StoreCommand>(256);

        thread::spawn(move || {
            while let Some(cmd) = rx.blocking_recv() {
                match cmd {
                    StoreCommand::Find(unique_id, reply) => {
                        let _ = reply.send(db.find_by_id(&unique_id));
                    }
                    StoreCommand::Update { unique_id, update, reply } => {
                        let result = db.update_fields(&unique_id, &update);
                        if matches!(&result, Ok(0)) {
                            tracing::debug!("Update for {} matched no record", unique_id);
                        }
                        let _ = reply.send(result);
                    }
                    StoreCommand::Shutdown => {
                        tracing::info!("Store thread shutting down");
                        break;
                    }
                }
            }
        });

        Self { tx }
    }

    /// Look up a record by unique ID
    pub async fn find(&self, unique_id: String) -> Result<Option<AssetRecord>> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(StoreCommand::Find(unique_id, reply)).await?;
        rx.await?
    }

    /// Overwrite some fields of a record. Returns rows touched (0 for an unknown ID).
    pub async fn update(&self, unique_id: String, update: FieldUpdate) -> Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(StoreCommand::Update { unique_id, update, reply }).await?;
        rx.await?
    }

    /// Shutdown the store thread
    pub async fn shutdown(&self) -> Result<()> {
        self.tx.send(StoreCommand::Shutdown).await?;
        Ok(())
    }
}
