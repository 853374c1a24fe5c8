//! Process lifecycle: signal handling, supervised tasks and shutdown.
//!
//! All supervised tasks share one cancellation scope derived from the root
//! token. The first task to fail (or panic) cancels the scope; tasks
//! returning [`AppError::Cancelled`] are treated as a clean stop.

use std::{future::Future, sync::Arc};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{error::AppError, subscriber::Transport};

pub struct Supervisor {
    cancel: CancellationToken,
    tasks: JoinSet<(&'static str, Result<(), AppError>)>,
}

impl Supervisor {
    pub fn new(root: &CancellationToken) -> Self {
        Self {
            cancel: root.child_token(),
            tasks: JoinSet::new(),
        }
    }

    /// Cancel the scope once `signal` resolves
    pub fn watch_signal<S>(&self, signal: S)
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = signal => {
                    tracing::info!("Service is interrupted");
                    cancel.cancel();
                }
                _ = cancel.cancelled() => {}
            }
        });
    }

    pub fn spawn<F, Fut>(&mut self, name: &'static str, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        let run = task(self.cancel.clone());
        self.tasks.spawn(async move { (name, run.await) });
    }

    /// Wait for every task, then run completion and report the first failure
    pub async fn wait(mut self) -> Result<(), AppError> {
        let mut first_error = None;

        while let Some(joined) = self.tasks.join_next().await {
            let failure = match joined {
                Ok((_, Ok(()))) | Ok((_, Err(AppError::Cancelled))) => None,
                Ok((name, Err(err))) => {
                    tracing::error!(task = name, error = %err, "Supervised task failed");
                    Some(err)
                }
                Err(join_error) => Some(AppError::TaskPanicked(join_error.to_string())),
            };

            if let Some(err) = failure {
                self.cancel.cancel();
                first_error.get_or_insert(err);
            }
        }

        // Nothing left to flush; releases the signal watcher
        self.cancel.cancel();

        match first_error {
            Some(err) => {
                tracing::error!(error = %err, "Service is stopped");
                Err(err)
            }
            None => {
                tracing::info!("Service is stopped");
                Ok(())
            }
        }
    }
}

/// Serve `transport` under a supervisor until `signal` fires or it fails
pub async fn run<T, S>(transport: Arc<T>, root: &CancellationToken, signal: S) -> Result<(), AppError>
where
    T: Transport + 'static,
    S: Future<Output = ()> + Send + 'static,
{
    let mut supervisor = Supervisor::new(root);
    supervisor.watch_signal(signal);
    supervisor.spawn("transport", move |cancel| async move { transport.serve(cancel).await });

    tracing::info!("Service is started");
    supervisor.wait().await
}

/// Resolves on SIGINT (Ctrl+C) or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use super::*;

    /// Serves until cancelled, like a healthy subscription
    #[derive(Default)]
    struct IdleTransport {
        stopped: AtomicBool,
    }

    #[async_trait]
    impl Transport for IdleTransport {
        async fn serve(&self, cancel: CancellationToken) -> Result<(), AppError> {
            cancel.cancelled().await;
            self.stopped.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn serve(&self, _cancel: CancellationToken) -> Result<(), AppError> {
            Err(AppError::MaxReconnectsExceeded(3))
        }
    }

    const BOUND: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_signal_stops_service_cleanly() {
        let transport = Arc::new(IdleTransport::default());
        let (signal_tx, signal_rx) = oneshot::channel::<()>();
        let root = CancellationToken::new();

        let service = tokio::spawn({
            let transport = transport.clone();
            let root = root.clone();
            async move {
                run(transport, &root, async move {
                    let _ = signal_rx.await;
                })
                .await
            }
        });

        signal_tx.send(()).unwrap();
        let result = tokio::time::timeout(BOUND, service).await.unwrap().unwrap();

        assert!(result.is_ok());
        assert!(transport.stopped.load(Ordering::SeqCst));
        // the root scope is not cancelled by a child shutdown
        assert!(!root.is_cancelled());
    }

    #[tokio::test]
    async fn test_root_cancellation_stops_service() {
        let root = CancellationToken::new();
        let service = tokio::spawn({
            let root = root.clone();
            async move {
                run(
                    Arc::new(IdleTransport::default()),
                    &root,
                    std::future::pending(),
                )
                .await
            }
        });

        root.cancel();
        let result = tokio::time::timeout(BOUND, service).await.unwrap().unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failing_task_cancels_the_group() {
        let root = CancellationToken::new();
        let idle = Arc::new(IdleTransport::default());

        let mut supervisor = Supervisor::new(&root);
        let scope = supervisor.cancel.clone();
        {
            let idle = idle.clone();
            supervisor.spawn("idle", move |cancel| async move { idle.serve(cancel).await });
        }
        supervisor.spawn("failing", |cancel| async move {
            FailingTransport.serve(cancel).await
        });

        let result = tokio::time::timeout(BOUND, supervisor.wait()).await.unwrap();

        assert!(matches!(result, Err(AppError::MaxReconnectsExceeded(3))));
        assert!(scope.is_cancelled());
        assert!(idle.stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancelled_error_is_not_a_failure() {
        let root = CancellationToken::new();
        let mut supervisor = Supervisor::new(&root);
        supervisor.spawn("cancelled", |_| async { Err::<(), _>(AppError::Cancelled) });

        assert!(supervisor.wait().await.is_ok());
    }

    #[tokio::test]
    async fn test_panicking_task_is_reported() {
        let root = CancellationToken::new();
        let mut supervisor = Supervisor::new(&root);
        supervisor.spawn("panics", |_| async {
            if true {
                panic!("handler bug");
            }
            Ok::<(), AppError>(())
        });

        let result = supervisor.wait().await;
        assert!(matches!(result, Err(AppError::TaskPanicked(_))));
    }
}
