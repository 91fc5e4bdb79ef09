//! The video upload workflow.
//!
//! Drives one file from disk to the video host and records it against a
//! project, in three strictly ordered steps: open an upload session with
//! the host, stream the bytes, insert the Video Record. Progress is
//! published through a watch channel so any number of observers can follow
//! the transfer; a cancellation token aborts an in-flight run and always
//! releases the single-flight busy flag.

use crate::database::models::{CreateVideoRecord, VideoRecord};
use crate::errors::UploadError;
use crate::repositories::video_repository::VideoRepository;
use crate::services::video_host::{NewUploadSession, ProgressFn, VideoHost};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// How long the success message stays visible before being cleared.
const MESSAGE_LINGER: Duration = Duration::from_secs(3);

/// Observable state of the uploader. `percent` only moves forward during a
/// run; `message` distinguishes success from failure by its prefix.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct UploadProgress {
    pub percent: u8,
    pub message: Option<String>,
    pub busy: bool,
}

/// Everything one upload needs: the file and its descriptive metadata.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    pub title: String,
    pub description: Option<String>,
    pub project_id: String,
    pub category: String,
    pub duration_seconds: i64,
}

/// Callback fired exactly once, strictly after persistence succeeds.
pub type CompletionFn = Box<dyn FnOnce(&VideoRecord) + Send>;

pub struct VideoUploader {
    host: Arc<dyn VideoHost>,
    pool: SqlitePool,
    playback_base_url: String,
    progress: watch::Sender<UploadProgress>,
    busy: Arc<AtomicBool>,
    cancel: CancellationToken,
    /// Child token for the run currently in flight, replaced on every run
    /// so a cancel only ever hits that run.
    run_cancel: Mutex<CancellationToken>,
}

/// Releases the busy flag whatever way the run ends.
struct BusyGuard {
    busy: Arc<AtomicBool>,
    progress: watch::Sender<UploadProgress>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
        self.progress.send_modify(|p| p.busy = false);
    }
}

impl VideoUploader {
    pub fn new(
        host: Arc<dyn VideoHost>,
        pool: SqlitePool,
        playback_base_url: String,
        cancel: CancellationToken,
    ) -> Self {
        let (progress, _) = watch::channel(UploadProgress::default());
        let run_cancel = Mutex::new(cancel.child_token());
        Self {
            host,
            pool,
            playback_base_url,
            progress,
            busy: Arc::new(AtomicBool::new(false)),
            cancel,
            run_cancel,
        }
    }

    /// Observe progress, message, and busy state.
    pub fn subscribe(&self) -> watch::Receiver<UploadProgress> {
        self.progress.subscribe()
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> UploadProgress {
        self.progress.borrow().clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Aborts the run currently in flight, if any. Later runs are not
    /// affected.
    pub fn cancel_current(&self) {
        if let Ok(token) = self.run_cancel.lock() {
            token.cancel();
        }
    }

    /// Runs the whole workflow. Only one upload may be in flight per
    /// uploader; a concurrent call fails with `UploadError::Busy` without
    /// touching the running transfer.
    pub async fn upload(
        &self,
        request: UploadRequest,
        on_complete: Option<CompletionFn>,
    ) -> Result<VideoRecord, UploadError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(UploadError::Busy);
        }
        let _guard = BusyGuard {
            busy: self.busy.clone(),
            progress: self.progress.clone(),
        };
        self.progress.send_modify(|p| {
            p.busy = true;
            p.percent = 0;
            p.message = None;
        });

        let run_token = self.cancel.child_token();
        if let Ok(mut slot) = self.run_cancel.lock() {
            *slot = run_token.clone();
        }

        let result = self.run(request, on_complete, &run_token).await;

        if let Err(err) = &result {
            // Failure messages carry a distinct prefix; percent stays
            // where the run stopped.
            self.progress
                .send_modify(|p| p.message = Some(format!("Error: {}", err)));
        }

        result
    }

    async fn run(
        &self,
        request: UploadRequest,
        on_complete: Option<CompletionFn>,
        cancel: &CancellationToken,
    ) -> Result<VideoRecord, UploadError> {
        let size_bytes = tokio::fs::metadata(&request.file_path).await?.len();

        // Step 1: upload session. Without a usable endpoint the run ends
        // here and no transfer is ever attempted.
        let session = self
            .host
            .create_upload_session(&NewUploadSession {
                title: request.title.clone(),
                description: request.description.clone(),
                size_bytes,
            })
            .await?;

        info!(
            "Upload session open for {} ({} bytes)",
            session.resource_id(),
            size_bytes
        );

        // Step 2: transfer, observable and cancellable. The percentage only
        // ever moves forward.
        let progress = self.progress.clone();
        let on_chunk: ProgressFn = Arc::new(move |percent| {
            progress.send_modify(|p| {
                if percent > p.percent {
                    p.percent = percent;
                }
            });
        });

        tokio::select! {
            _ = cancel.cancelled() => return Err(UploadError::Cancelled),
            transferred = self.host.transfer(&session, &request.file_path, on_chunk) => transferred?,
        }

        // Step 3: persistence. A failure here orphans the remote asset;
        // the resource id is logged so it can be reconciled by hand.
        let resource_id = session.resource_id().to_string();
        let record = CreateVideoRecord {
            playback_url: format!("{}/{}", self.playback_base_url, resource_id),
            resource_id: resource_id.clone(),
            project_id: request.project_id,
            category: request.category,
            title: request.title,
            description: request.description,
            duration_seconds: request.duration_seconds,
        };

        let repo = VideoRepository::new(&self.pool);
        let video = repo
            .create_video(&Uuid::now_v7().to_string(), &record)
            .await
            .map_err(|e| {
                warn!(
                    "Remote video {} is now orphaned: local insert failed: {}",
                    resource_id, e
                );
                UploadError::persistence(e.to_string())
            })?;

        self.progress.send_modify(|p| {
            p.percent = 100;
            p.message = Some("Upload complete".to_string());
        });

        if let Some(callback) = on_complete {
            callback(&video);
        }

        // Transient success state clears itself shortly after.
        let progress = self.progress.clone();
        tokio::spawn(async move {
            tokio::time::sleep(MESSAGE_LINGER).await;
            progress.send_modify(|p| {
                p.percent = 0;
                p.message = None;
            });
        });

        Ok(video)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::video_host::UploadSession;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct MockHost {
        fail_session: bool,
        fail_transfer: bool,
        transfer_attempts: AtomicUsize,
        /// When set, transfer blocks until notified.
        hold_transfer: Option<Arc<Notify>>,
    }

    impl MockHost {
        fn ok() -> Self {
            Self {
                fail_session: false,
                fail_transfer: false,
                transfer_attempts: AtomicUsize::new(0),
                hold_transfer: None,
            }
        }
    }

    #[async_trait]
    impl VideoHost for MockHost {
        async fn create_upload_session(
            &self,
            _request: &NewUploadSession,
        ) -> Result<UploadSession, UploadError> {
            if self.fail_session {
                return Err(UploadError::session_creation(
                    "Host returned no upload endpoint",
                    Some(400),
                ));
            }
            Ok(UploadSession {
                upload_url: "https://upload.example.com/session".to_string(),
                resource_uri: "/videos/555000111".to_string(),
            })
        }

        async fn transfer(
            &self,
            _session: &UploadSession,
            _file_path: &Path,
            progress: ProgressFn,
        ) -> Result<(), UploadError> {
            self.transfer_attempts.fetch_add(1, Ordering::SeqCst);
            if let Some(hold) = &self.hold_transfer {
                hold.notified().await;
            }
            if self.fail_transfer {
                return Err(UploadError::transfer("Upload endpoint returned 500"));
            }
            for percent in [25, 50, 75, 100] {
                progress(percent);
            }
            Ok(())
        }

        async fn delete_video(&self, _resource_id: &str) -> Result<(), UploadError> {
            Ok(())
        }
    }

    async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();

        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, role) \
             VALUES ('client-1', 'client@example.com', 'Client', 'x', 'cliente')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO projects (id, client_id, name) VALUES ('project-1', 'client-1', 'Site')",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    fn temp_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, vec![7u8; 4096]).unwrap();
        path
    }

    fn request(path: PathBuf) -> UploadRequest {
        UploadRequest {
            file_path: path,
            title: "Walkthrough".to_string(),
            description: Some("Week 12 walkthrough".to_string()),
            project_id: "project-1".to_string(),
            category: "avance".to_string(),
            duration_seconds: 95,
        }
    }

    fn uploader(host: MockHost, pool: SqlitePool) -> VideoUploader {
        VideoUploader::new(
            Arc::new(host),
            pool,
            "https://player.example.com/video".to_string(),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn successful_run_persists_and_reports_full_progress() {
        let pool = test_pool().await;
        let up = uploader(MockHost::ok(), pool.clone());
        let rx = up.subscribe();

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in_cb = fired.clone();
        let video = up
            .upload(
                request(temp_file("upload_ok.bin")),
                Some(Box::new(move |record| {
                    assert_eq!(record.resource_id, "555000111");
                    fired_in_cb.fetch_add(1, Ordering::SeqCst);
                })),
            )
            .await
            .unwrap();

        assert_eq!(video.resource_id, "555000111");
        assert_eq!(
            video.playback_url,
            "https://player.example.com/video/555000111"
        );
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        let snapshot = rx.borrow();
        assert_eq!(snapshot.percent, 100);
        assert_eq!(snapshot.message.as_deref(), Some("Upload complete"));
        assert!(!snapshot.busy);
        drop(snapshot);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn session_failure_skips_transfer_and_releases_busy() {
        let pool = test_pool().await;
        let host = Arc::new(MockHost {
            fail_session: true,
            ..MockHost::ok()
        });
        let up = VideoUploader::new(
            host.clone(),
            pool.clone(),
            "https://player.example.com/video".to_string(),
            CancellationToken::new(),
        );
        let rx = up.subscribe();

        let err = up
            .upload(request(temp_file("upload_no_session.bin")), None)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::SessionCreation { .. }));
        assert_eq!(err.upstream_status(), Some(400));

        // PATCH was never attempted and nothing was recorded.
        assert_eq!(host.transfer_attempts.load(Ordering::SeqCst), 0);
        let snapshot = rx.borrow();
        assert!(!snapshot.busy);
        assert_ne!(snapshot.percent, 100);
        assert!(snapshot.message.as_deref().unwrap().starts_with("Error: "));
        drop(snapshot);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn transfer_failure_skips_persistence() {
        let pool = test_pool().await;
        let host = MockHost {
            fail_transfer: true,
            ..MockHost::ok()
        };
        let up = uploader(host, pool.clone());

        let err = up
            .upload(request(temp_file("upload_bad_transfer.bin")), None)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Transfer { .. }));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn second_upload_while_busy_is_rejected() {
        let pool = test_pool().await;
        let hold = Arc::new(Notify::new());
        let host = MockHost {
            hold_transfer: Some(hold.clone()),
            ..MockHost::ok()
        };
        let up = Arc::new(uploader(host, pool));

        let first = {
            let up = up.clone();
            tokio::spawn(async move {
                up.upload(request(temp_file("upload_first.bin")), None).await
            })
        };

        // Wait until the first run is inside the transfer step.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let err = up
            .upload(request(temp_file("upload_second.bin")), None)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Busy));

        hold.notify_one();
        first.await.unwrap().unwrap();

        // Flag released after completion.
        assert!(!up.subscribe().borrow().busy);
    }

    #[tokio::test]
    async fn cancellation_aborts_transfer_and_releases_busy() {
        let pool = test_pool().await;
        let hold = Arc::new(Notify::new());
        let host = MockHost {
            hold_transfer: Some(hold),
            ..MockHost::ok()
        };
        let up = Arc::new(uploader(host, pool.clone()));
        let cancel = up.cancel_token();

        let run = {
            let up = up.clone();
            tokio::spawn(async move {
                up.upload(request(temp_file("upload_cancelled.bin")), None)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let err = run.await.unwrap().unwrap_err();
        assert!(matches!(err, UploadError::Cancelled));
        assert!(!up.subscribe().borrow().busy);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn cancel_only_affects_the_run_in_flight() {
        let pool = test_pool().await;
        let hold = Arc::new(Notify::new());
        let host = MockHost {
            hold_transfer: Some(hold.clone()),
            ..MockHost::ok()
        };
        let up = Arc::new(uploader(host, pool));

        let first = {
            let up = up.clone();
            tokio::spawn(async move {
                up.upload(request(temp_file("upload_abandoned.bin")), None)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        up.cancel_current();
        let err = first.await.unwrap().unwrap_err();
        assert!(matches!(err, UploadError::Cancelled));

        // A fresh run gets its own token and is free to finish.
        hold.notify_one();
        let video = up
            .upload(request(temp_file("upload_retry.bin")), None)
            .await
            .unwrap();
        assert_eq!(video.resource_id, "555000111");
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_ends_at_hundred() {
        let pool = test_pool().await;
        let up = uploader(MockHost::ok(), pool);
        let mut rx = up.subscribe();

        let observer = tokio::spawn(async move {
            let mut seen = vec![rx.borrow().percent];
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow();
                seen.push(snapshot.percent);
                if snapshot.percent == 100 {
                    break;
                }
            }
            seen
        });

        up.upload(request(temp_file("upload_progress.bin")), None)
            .await
            .unwrap();

        let seen = observer.await.unwrap();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]), "regressed: {:?}", seen);
        assert_eq!(*seen.last().unwrap(), 100);
    }
}
