mod support;

use std::sync::Arc;

use support::*;
use unzipper_job::{AbortReason, JobContext, JobRunner, JobState};
use unzipper_transport::{MessageId, MessageRef};

fn context(file_id: &str, file_name: &str) -> JobContext {
    JobContext {
        requester: requester(),
        origin: MessageRef {
            chat: USER_CHAT,
            message: MessageId(7),
        },
        archive: archive(file_id, file_name),
    }
}

fn clips_zip() -> Vec<u8> {
    zip_bytes(&[
        ("a.mp4", vec![1; 100]),
        ("b.mp4", vec![2; 2048]),
        ("notes.txt", vec![3; 10]),
    ])
}

fn runner(transport: &Arc<RecordingTransport>, config: unzipper_job::JobConfig) -> JobRunner<RecordingTransport> {
    JobRunner::new(Arc::clone(transport), Arc::new(config))
}

#[tokio::test]
async fn media_archive_is_reported_and_redistributed() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let transport = Arc::new(RecordingTransport::new());
    transport.serve("clips", clips_zip());

    let summary = runner(&transport, config.clone())
        .on_archive_received(context("clips", "clips.zip"))
        .await
        .unwrap();

    assert_eq!(summary.total_entries, 3);
    assert_eq!(summary.files_sent, 2);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.files_failed, 0);
    assert_eq!(summary.archive_name, "clips.zip");

    assert_eq!(transport.uploads(), ["a.mp4", "notes.txt"]);
    assert_eq!(
        transport.texts_in(USER_CHAT),
        [
            "✅ File received. Starting download...",
            "📥 Download complete! Analyzing archive...",
            "✅ clips (2 videos)\n\nNow extracting and sending the files...",
            "⚠️ Skipping 'b.mp4' because it is larger than 1KB.",
            "✅ All done! Sent 2 files from clips.",
        ]
    );

    assert!(is_empty_dir(&config.download_root));
    assert!(is_empty_dir(&config.extract_root));
}

#[tokio::test]
async fn archive_without_media_reports_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(RecordingTransport::new());
    let entries: Vec<_> = ["1.txt", "2.txt", "3.txt", "4.txt", "5.txt"]
        .into_iter()
        .map(|name| (name, b"hello".to_vec()))
        .collect();
    transport.serve("docs", zip_bytes(&entries));

    let summary = runner(&transport, config_in(dir.path()))
        .on_archive_received(context("docs", "docs.zip"))
        .await
        .unwrap();

    assert_eq!(summary.files_sent, 5);
    assert_eq!(transport.uploads(), ["1.txt", "2.txt", "3.txt", "4.txt", "5.txt"]);
    assert!(
        transport
            .texts_in(USER_CHAT)
            .contains(&"✅ docs (5 files)\n\nNow extracting and sending the files...".to_string())
    );
}

#[tokio::test]
async fn nested_files_are_sent_depth_first() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(RecordingTransport::new());
    transport.serve(
        "nested",
        zip_bytes(&[
            ("docs/", Vec::new()),
            ("docs/readme.txt", b"read me".to_vec()),
            ("top.txt", b"top".to_vec()),
        ]),
    );

    let summary = runner(&transport, config_in(dir.path()))
        .on_archive_received(context("nested", "nested.zip"))
        .await
        .unwrap();

    assert_eq!(summary.files_sent, 2);
    assert_eq!(transport.uploads(), ["top.txt", "readme.txt"]);
}

#[tokio::test]
async fn invalid_archive_aborts_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let transport = Arc::new(RecordingTransport::new());
    transport.serve("bogus", b"definitely not a zip".to_vec());

    let err = runner(&transport, config.clone())
        .on_archive_received(context("bogus", "bogus.zip"))
        .await
        .unwrap_err();

    assert!(matches!(err, AbortReason::InvalidArchive(_)));
    assert_eq!(err.stage(), JobState::Analyzing);
    assert_eq!(
        transport.texts_in(USER_CHAT).last().map(String::as_str),
        Some("❌ Error: The file is not a valid ZIP archive or it is corrupted.")
    );
    assert!(transport.uploads().is_empty());
    assert!(is_empty_dir(&config.download_root));
    assert!(is_empty_dir(&config.extract_root));
}

#[tokio::test]
async fn extraction_failure_aborts_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let transport = Arc::new(RecordingTransport::new());
    transport.serve(
        "slip",
        zip_bytes(&[("ok.txt", b"fine".to_vec()), ("../escape.txt", b"evil".to_vec())]),
    );

    let err = runner(&transport, config.clone())
        .on_archive_received(context("slip", "slip.zip"))
        .await
        .unwrap_err();

    assert!(matches!(err, AbortReason::Extraction(_)));
    assert_eq!(err.stage(), JobState::Extracting);
    let texts = transport.texts_in(USER_CHAT);
    assert!(texts.contains(&"✅ slip (2 files)\n\nNow extracting and sending the files...".to_string()));
    assert_eq!(texts.last().map(String::as_str), Some("❌ An error occurred during unzipping."));
    assert!(transport.uploads().is_empty());
    assert!(!dir.path().join("escape.txt").exists());
    assert!(is_empty_dir(&config.download_root));
    assert!(is_empty_dir(&config.extract_root));
}

#[tokio::test]
async fn workspace_failure_aborts_before_download() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::write(&config.extract_root, "not a directory").unwrap();
    let transport = Arc::new(RecordingTransport::new());
    transport.serve("clips", clips_zip());

    let err = runner(&transport, config.clone())
        .on_archive_received(context("clips", "clips.zip"))
        .await
        .unwrap_err();

    assert!(matches!(err, AbortReason::Workspace(_)));
    assert_eq!(err.stage(), JobState::Received);
    assert_eq!(
        transport.texts_in(USER_CHAT),
        [
            "✅ File received. Starting download...",
            "❌ Could not prepare a workspace for this archive.",
        ]
    );
    assert!(!transport.calls().iter().any(|call| matches!(call, Call::Download { .. })));
    assert!(is_empty_dir(&config.download_root));
}

#[tokio::test]
async fn download_failure_aborts_before_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let transport = Arc::new(RecordingTransport::new());
    transport.serve("clips", clips_zip());
    transport.fail_downloads();

    let err = runner(&transport, config.clone())
        .on_archive_received(context("clips", "clips.zip"))
        .await
        .unwrap_err();

    assert!(matches!(err, AbortReason::Download(_)));
    assert_eq!(
        transport.texts_in(USER_CHAT),
        [
            "✅ File received. Starting download...",
            "❌ An error occurred during download.",
        ]
    );
    assert!(is_empty_dir(&config.download_root));
}

#[tokio::test]
async fn failed_upload_does_not_stop_the_walk() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(RecordingTransport::new());
    transport.serve(
        "abc",
        zip_bytes(&[
            ("a.txt", b"a".to_vec()),
            ("b.txt", b"b".to_vec()),
            ("c.txt", b"c".to_vec()),
        ]),
    );
    transport.fail_upload_of("b.txt");

    let summary = runner(&transport, config_in(dir.path()))
        .on_archive_received(context("abc", "abc.zip"))
        .await
        .unwrap();

    assert_eq!(summary.files_sent, 2);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(transport.uploads(), ["a.txt", "b.txt", "c.txt"]);

    let texts = transport.texts_in(USER_CHAT);
    assert!(texts.contains(&"❌ Could not send file: b.txt".to_string()));
    assert_eq!(texts.last().map(String::as_str), Some("✅ All done! Sent 2 files from abc."));
}

#[tokio::test]
async fn audit_chat_gets_the_archive_and_a_summary() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.audit_chat = Some(AUDIT_CHAT);
    let transport = Arc::new(RecordingTransport::new());
    transport.serve("clips", clips_zip());

    let ctx = context("clips", "clips.zip");
    let origin = ctx.origin;
    runner(&transport, config).on_archive_received(ctx).await.unwrap();

    assert_eq!(
        transport.calls().first(),
        Some(&Call::Forward {
            to: AUDIT_CHAT,
            origin
        })
    );
    assert_eq!(
        transport.texts_in(AUDIT_CHAT),
        ["✅ Job Complete\n\nFile: clips.zip\nUser: Ada (42)\nTotal Files in Zip: 3\nSent to User: 2 files"]
    );
}

#[tokio::test]
async fn audit_failures_do_not_affect_the_job() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.audit_chat = Some(AUDIT_CHAT);
    let transport = Arc::new(RecordingTransport::new());
    transport.serve("clips", clips_zip());
    transport.fail_forwards();
    transport.fail_text_to(AUDIT_CHAT);

    let summary = runner(&transport, config)
        .on_archive_received(context("clips", "clips.zip"))
        .await
        .unwrap();

    assert_eq!(summary.files_sent, 2);
    assert_eq!(transport.uploads(), ["a.mp4", "notes.txt"]);
}

#[tokio::test]
async fn no_audit_traffic_without_audit_chat() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(RecordingTransport::new());
    transport.serve("clips", clips_zip());

    runner(&transport, config_in(dir.path()))
        .on_archive_received(context("clips", "clips.zip"))
        .await
        .unwrap();

    assert!(!transport.calls().iter().any(|call| matches!(call, Call::Forward { .. })));
    assert!(transport.texts_in(AUDIT_CHAT).is_empty());
}

#[tokio::test]
async fn status_falls_back_to_plain_messages() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(RecordingTransport::new());
    transport.serve("clips", clips_zip());
    transport.fail_status_messages();

    let summary = runner(&transport, config_in(dir.path()))
        .on_archive_received(context("clips", "clips.zip"))
        .await
        .unwrap();

    assert_eq!(summary.files_sent, 2);
    assert!(!transport.calls().iter().any(|call| matches!(call, Call::EditStatus { .. })));
    let texts = transport.texts_in(USER_CHAT);
    assert!(texts.contains(&"📥 Download complete! Analyzing archive...".to_string()));
    assert_eq!(texts.last().map(String::as_str), Some("✅ All done! Sent 2 files from clips."));
}

#[tokio::test]
async fn remote_name_cannot_escape_download_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let transport = Arc::new(RecordingTransport::new());
    transport.serve("clips", clips_zip());

    runner(&transport, config.clone())
        .on_archive_received(context("clips", "../../clips.zip"))
        .await
        .unwrap();

    let dest = transport
        .calls()
        .into_iter()
        .find_map(|call| match call {
            Call::Download { dest, .. } => Some(dest),
            _ => None,
        })
        .unwrap();
    assert!(dest.starts_with(&config.download_root));
    assert_eq!(dest.file_name().unwrap(), "clips.zip");
}

#[tokio::test]
async fn concurrent_jobs_use_disjoint_workspaces() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let transport = Arc::new(RecordingTransport::new());
    transport.serve("clips", clips_zip());
    let runner = runner(&transport, config.clone());

    let (first, second) = tokio::join!(
        runner.on_archive_received(context("clips", "clips.zip")),
        runner.on_archive_received(context("clips", "clips.zip")),
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_ne!(first.job_id, second.job_id);
    assert_eq!(first.files_sent + second.files_sent, 4);
    assert!(is_empty_dir(&config.download_root));
    assert!(is_empty_dir(&config.extract_root));
}
