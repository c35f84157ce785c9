use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use clipshelf::adapters::{JsonRepositoryAdapter, LocalFsAdapter};
use clipshelf::app::{AppContainer, DefaultAppContainer, Ports, RepositoryStore};
use clipshelf::config_initialization::Settings;
use clipshelf::ports::*;
use clipshelf::*;

/// In-test doubles for the external collaborators
mod test_utils {
    use super::*;

    /// Transcoder that records its arguments and exits with scripted statuses
    #[derive(Default)]
    pub struct FakeTranscoder {
        pub calls: Mutex<Vec<Vec<String>>>,
        pub statuses: Mutex<VecDeque<i32>>,
    }

    impl FakeTranscoder {
        pub fn failing_once() -> Arc<Self> {
            let fake = Self::default();
            fake.statuses.lock().unwrap().push_back(1);
            Arc::new(fake)
        }

        pub fn last_call(&self) -> Vec<String> {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl TranscodePort for FakeTranscoder {
        async fn transcode(&self, args: &[String]) -> Result<TranscodeOutput, DomainError> {
            self.calls.lock().unwrap().push(args.to_vec());
            let status = self.statuses.lock().unwrap().pop_front().unwrap_or(0);
            if status == 0 {
                let output = args.last().unwrap();
                std::fs::write(output, b"edited").unwrap();
            }
            Ok(TranscodeOutput {
                status: Some(status),
                output: format!("fake transcoder exited with {}", status),
                elapsed: Duration::from_millis(5),
            })
        }
    }

    /// Uploader that hands out sequential identifiers, or scripted failures
    #[derive(Default)]
    pub struct FakeUploader {
        pub requests: Mutex<Vec<UploadRequest>>,
        pub failures: Mutex<VecDeque<String>>,
    }

    impl FakeUploader {
        pub fn fail_next(&self, message: &str) {
            self.failures.lock().unwrap().push_back(message.to_string());
        }
    }

    #[async_trait]
    impl UploadPort for FakeUploader {
        async fn upload(&self, request: &UploadRequest) -> Result<String, DomainError> {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            if let Some(message) = self.failures.lock().unwrap().pop_front() {
                return Err(DomainError::Upload { message });
            }
            Ok(format!("yt-{}", requests.len()))
        }
    }

    /// Operator who always types the id shown
    pub struct EchoConfirm;

    #[async_trait]
    impl ConfirmPort for EchoConfirm {
        async fn confirm_upload(&self, record: &VideoRecord) -> Result<u64, DomainError> {
            Ok(record.id)
        }
    }

    pub struct Fixture {
        pub dir: TempDir,
        pub transcoder: Arc<FakeTranscoder>,
        pub uploader: Arc<FakeUploader>,
        pub container: DefaultAppContainer,
    }

    impl Fixture {
        pub fn source(&self) -> PathBuf {
            self.dir.path().join("source")
        }

        pub fn staged(&self) -> PathBuf {
            self.dir.path().join("staged")
        }

        pub fn edited(&self) -> PathBuf {
            self.dir.path().join("edited")
        }

        pub fn repository_file(&self) -> PathBuf {
            self.dir.path().join("clipshelf.json")
        }

        pub fn add_source(&self, name: &str) {
            std::fs::write(self.source().join(name), name.as_bytes()).unwrap();
        }

        pub async fn open(&self) -> RepositoryStore {
            self.container.open_store().await.unwrap()
        }

        /// Repository as persisted on disk
        pub fn persisted(&self) -> RepositoryState {
            let text = std::fs::read_to_string(self.repository_file()).unwrap();
            serde_json::from_str(&text).unwrap()
        }
    }

    pub async fn fixture_with(transcoder: Arc<FakeTranscoder>) -> Fixture {
        let dir = TempDir::new().unwrap();
        let state = RepositoryState {
            next_id: 1000,
            source_dir: dir.path().join("source"),
            staged_dir: dir.path().join("staged"),
            edited_dir: dir.path().join("edited"),
            credential_file: dir.path().join("client_secret.json"),
            videos: Vec::new(),
        };
        std::fs::create_dir(&state.source_dir).unwrap();

        let repository = Arc::new(JsonRepositoryAdapter::new(dir.path().join("clipshelf.json")));
        repository.save(&state).await.unwrap();

        let uploader = Arc::new(FakeUploader::default());
        let ports = Ports {
            repository,
            fs: Arc::new(LocalFsAdapter::new()),
            transcode: transcoder.clone(),
            upload: uploader.clone(),
            confirm: Arc::new(EchoConfirm),
        };
        let container = DefaultAppContainer::new(&Settings::default(), ports).unwrap();

        Fixture {
            dir,
            transcoder,
            uploader,
            container,
        }
    }

    pub async fn fixture() -> Fixture {
        fixture_with(Arc::new(FakeTranscoder::default())).await
    }

    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }
}

use test_utils::*;

#[tokio::test]
async fn test_first_ingestion_assigns_initial_id_and_stages_copy() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;

    let report = fx.container.ingest_interactor().execute(&mut store).await.unwrap();

    assert_eq!(report.ingested.len(), 1);
    let record = &report.ingested[0];
    assert_eq!(record.id, 1000);
    assert_eq!(record.category_id, "lol");
    assert_eq!(record.extension, "mp4");
    assert_eq!(record.state(), LifecycleState::New);

    let persisted = fx.persisted();
    assert_eq!(persisted.next_id, 1001);
    assert_eq!(persisted.videos, vec![record.clone()]);
    assert!(exists(&fx.staged().join("1000.mp4")));
    assert!(fx.edited().is_dir());
}

#[tokio::test]
async fn test_ingestion_is_idempotent() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;
    let ingest = fx.container.ingest_interactor();

    ingest.execute(&mut store).await.unwrap();
    let before = fx.persisted();
    let second = ingest.execute(&mut store).await.unwrap();

    assert!(second.is_empty());
    assert_eq!(fx.persisted(), before);
}

#[tokio::test]
async fn test_unknown_format_and_category_are_skipped() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game2.mkv");
    fx.add_source("Minecraft 2024.mp4");
    fx.add_source("desktop.ini");
    let mut store = fx.open().await;

    let report = fx.container.ingest_interactor().execute(&mut store).await.unwrap();

    assert!(report.ingested.is_empty());
    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.file_name.as_str()).collect();
    assert_eq!(skipped, vec!["League of Legends Game2.mkv", "Minecraft 2024.mp4"]);
    assert_eq!(fx.persisted().next_id, 1000);
    assert!(fx.persisted().videos.is_empty());
}

#[tokio::test]
async fn test_missing_staged_copy_is_repaired() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;
    let ingest = fx.container.ingest_interactor();
    ingest.execute(&mut store).await.unwrap();

    std::fs::remove_file(fx.staged().join("1000.mp4")).unwrap();
    let report = ingest.execute(&mut store).await.unwrap();

    assert_eq!(report.repaired, vec![1000]);
    assert!(report.ingested.is_empty());
    assert!(exists(&fx.staged().join("1000.mp4")));
}

#[tokio::test]
async fn test_failed_transcode_leaves_record_editable() {
    let fx = fixture_with(FakeTranscoder::failing_once()).await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;
    fx.container.ingest_interactor().execute(&mut store).await.unwrap();
    let edit = fx.container.edit_interactor();

    let err = edit.execute(&mut store, 1000).await.unwrap_err();
    assert_eq!(err.operation, Operation::Edit);
    assert!(matches!(err.source, DomainError::Transcode { status: Some(1), .. }));
    assert!(!err.is_fatal());
    assert_eq!(fx.persisted().videos[0].edited_at, None);

    let outcome = edit.execute(&mut store, 1000).await.unwrap();
    assert_eq!(outcome.output, fx.edited().join("1000.mp4"));
    assert!(fx.persisted().videos[0].edited_at.is_some());

    let args = fx.transcoder.last_call();
    assert_eq!(&args[2..7], &["-y", "-ss", "00:00:14", "-to", "00:00:29"]);
    assert!(args.iter().any(|a| a.starts_with("pad=1920:1920:0:200:black")));
}

#[tokio::test]
async fn test_missing_staged_original_stops_before_transcoding() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;
    fx.container.ingest_interactor().execute(&mut store).await.unwrap();
    std::fs::remove_file(fx.staged().join("1000.mp4")).unwrap();

    let err = fx.container.edit_interactor().execute(&mut store, 1000).await.unwrap_err();
    assert!(matches!(err.source, DomainError::StagedOriginalMissing { id: 1000, .. }));
    assert!(fx.transcoder.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_set_range_then_edit_uses_override() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;
    fx.container.ingest_interactor().execute(&mut store).await.unwrap();

    let range = TrimRange::new(3, 40).unwrap();
    fx.container
        .edit_interactor()
        .set_range_and_edit(&mut store, 1000, range)
        .await
        .unwrap();

    assert_eq!(fx.persisted().videos[0].range, Some(range));
    let args = fx.transcoder.last_call();
    assert_eq!(&args[3..7], &["-ss", "00:00:03", "-to", "00:00:40"]);
}

#[tokio::test]
async fn test_upload_confirmation_mismatch_has_no_side_effects() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;
    fx.container.ingest_interactor().execute(&mut store).await.unwrap();
    fx.container.edit_interactor().execute(&mut store, 1000).await.unwrap();
    let upload = fx.container.upload_interactor();

    let err = upload.upload_confirmed(&mut store, 1000, 999).await.unwrap_err();
    assert!(matches!(
        err.source,
        DomainError::UploadConfirmationMismatch { expected: 1000, supplied: 999 }
    ));
    assert!(fx.uploader.requests.lock().unwrap().is_empty());
    assert_eq!(fx.persisted().videos[0].uploaded_at, None);

    let outcome = upload.upload_confirmed(&mut store, 1000, 1000).await.unwrap();
    assert_eq!(outcome.url, "yt-1");

    let requests = fx.uploader.requests.lock().unwrap();
    assert_eq!(requests[0].title, "1000 #leagueoflegends");
    assert_eq!(requests[0].category_code, "20");
    assert_eq!(requests[0].file_path, fx.edited().join("1000.mp4"));

    let persisted = fx.persisted();
    let record = &persisted.videos[0];
    assert_eq!(record.state(), LifecycleState::Uploaded);
    assert_eq!(record.url.as_deref(), Some("yt-1"));
}

#[tokio::test]
async fn test_failed_upload_leaves_record_edited() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;
    fx.container.ingest_interactor().execute(&mut store).await.unwrap();
    fx.container.edit_interactor().execute(&mut store, 1000).await.unwrap();
    fx.uploader.fail_next("quota");
    let upload = fx.container.upload_interactor();

    let err = upload.upload_confirmed(&mut store, 1000, 1000).await.unwrap_err();
    assert_eq!(err.operation, Operation::Upload);
    assert!(matches!(&err.source, DomainError::Upload { message } if message == "quota"));
    assert!(!err.is_fatal());
    assert_eq!(err.to_string(), "upload failed: uploader error: quota");

    let in_memory = store.find(1000).unwrap();
    assert_eq!(in_memory.state(), LifecycleState::Edited);
    assert_eq!(in_memory.uploaded_at, None);
    assert_eq!(in_memory.url, None);
    let persisted = fx.persisted();
    assert_eq!(persisted.videos[0].uploaded_at, None);
    assert_eq!(persisted.videos[0].url, None);

    // A later attempt goes through
    let outcome = upload.upload_confirmed(&mut store, 1000, 1000).await.unwrap();
    assert_eq!(outcome.url, "yt-2");
}

#[tokio::test]
async fn test_uploaded_record_is_not_published_twice() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;
    fx.container.ingest_interactor().execute(&mut store).await.unwrap();
    fx.container.edit_interactor().execute(&mut store, 1000).await.unwrap();
    let upload = fx.container.upload_interactor();
    upload.upload_confirmed(&mut store, 1000, 1000).await.unwrap();

    let err = upload.upload_confirmed(&mut store, 1000, 1000).await.unwrap_err();
    assert!(matches!(err.source, DomainError::AlreadyUploaded { id: 1000 }));
    let err = upload.execute(&mut store, 1000).await.unwrap_err();
    assert!(matches!(err.source, DomainError::AlreadyUploaded { id: 1000 }));

    assert_eq!(fx.uploader.requests.lock().unwrap().len(), 1);
    assert_eq!(fx.persisted().videos[0].url.as_deref(), Some("yt-1"));
}

#[tokio::test]
async fn test_unedited_record_is_not_uploaded() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;
    fx.container.ingest_interactor().execute(&mut store).await.unwrap();

    let err = fx
        .container
        .upload_interactor()
        .execute(&mut store, 1000)
        .await
        .unwrap_err();
    assert!(matches!(err.source, DomainError::NotEdited { id: 1000 }));
}

#[tokio::test]
async fn test_batch_edit_upload_and_purge() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    fx.add_source("League of Legends Game2.mp4");
    let mut store = fx.open().await;
    fx.container.ingest_interactor().execute(&mut store).await.unwrap();

    let oldest = fx
        .container
        .edit_interactor()
        .edit_oldest_unedited(&mut store)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(oldest.id, 1000);

    let rest = fx.container.edit_interactor().edit_all_unedited(&mut store).await.unwrap();
    assert_eq!(rest.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1001]);

    let uploaded = fx.container.upload_interactor().upload_pending(&mut store).await.unwrap();
    assert_eq!(uploaded.len(), 2);

    let purged = fx.container.purge_interactor().purge_uploaded(&mut store).await.unwrap();
    assert_eq!(purged.len(), 2);
    assert!(purged.iter().all(|p| p.leftovers.is_empty()));
    assert!(fx.persisted().videos.is_empty());
    assert_eq!(fx.persisted().next_id, 1002);
    assert!(!exists(&fx.source().join("League of Legends Game1.mp4")));
}

#[tokio::test]
async fn test_purge_tolerates_missing_files() {
    let fx = fixture().await;
    fx.add_source("League of Legends Game1.mp4");
    let mut store = fx.open().await;
    fx.container.ingest_interactor().execute(&mut store).await.unwrap();
    std::fs::remove_file(fx.staged().join("1000.mp4")).unwrap();

    let outcome = fx.container.purge_interactor().execute(&mut store, 1000).await.unwrap();

    assert_eq!(outcome.leftovers, vec![fx.staged().join("1000.mp4")]);
    assert!(fx.persisted().videos.is_empty());
    assert!(!exists(&fx.source().join("League of Legends Game1.mp4")));

    // Lookups after a purge see the new state without reopening
    let err = fx.container.purge_interactor().execute(&mut store, 1000).await.unwrap_err();
    assert!(matches!(err.source, DomainError::RecordNotFound { id: 1000 }));
    assert!(err.is_fatal());
}
