//! Single-writer actor.
//!
//! All mutations flow through one dedicated connection, processed serially
//! and each wrapped in an immediate transaction. This is the serialization
//! point for trade application: a job validates against exactly the state it
//! commits against, and SQLite never sees two concurrent writers.

use diesel::SqliteConnection;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;
use paperledger_core::errors::{Error, Result};

type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Transaction error wrapper. Keeps core errors intact across the rollback
/// path so typed rejections (insufficient funds/holdings) reach the caller
/// instead of degrading to an opaque database error.
enum TxError {
    Diesel(diesel::result::Error),
    Core(Error),
}

impl From<diesel::result::Error> for TxError {
    fn from(e: diesel::result::Error) -> Self {
        TxError::Diesel(e)
    }
}

impl From<TxError> for Error {
    fn from(e: TxError) -> Self {
        match e {
            TxError::Diesel(e) => StorageError::QueryFailed(e).into(),
            TxError::Core(e) => e,
        }
    }
}

/// Handle for sending jobs to the writer actor.
///
/// Cloneable; dropping the last clone closes the channel, which lets the
/// actor drain queued jobs and stop. This is the shutdown flush.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(ErasedJob, Reply)>,
}

impl WriteHandle {
    /// Runs `job` on the writer's connection inside an immediate
    /// transaction. An `Err` return rolls the whole job back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |conn| job(conn).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                reply_tx,
            ))
            .await
            .expect("Writer actor channel closed; the actor has stopped.");

        reply_rx
            .await
            .expect("Writer actor dropped the reply sender without a result.")
            .map(|boxed: Box<dyn Any + Send + 'static>| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("Failed to downcast writer actor result."))
            })
    }
}

/// Spawns the writer actor on the Tokio runtime. The actor holds one pooled
/// connection for its lifetime and processes jobs strictly in order.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, Reply)>(1024);

    tokio::spawn(async move {
        let mut conn = pool
            .get()
            .expect("Failed to get a connection from the pool for the writer actor.");

        while let Some((job, reply_tx)) = rx.recv().await {
            let result = conn
                .immediate_transaction::<_, TxError, _>(|c| job(c).map_err(TxError::Core))
                .map_err(Error::from);

            // Receiver may have been dropped (caller cancelled); nothing to do.
            let _ = reply_tx.send(result);
        }
        // Channel closed: every WriteHandle is gone, actor terminates.
    });

    WriteHandle { tx }
}
