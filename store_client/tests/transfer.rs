use std::io;

use tokio::{
    fs,
    io::{self as tokio_io, AsyncRead, AsyncWrite, DuplexStream, ReadHalf, WriteHalf},
};

use comms::{
    Receiver, Sender,
    msg::{FileFrame, StoreRequest, StoreResponse},
    specs::{FileMetadata, FileType},
};
use store_client::{StoreClient, StoreErr, expand_artifacts};

const BUF_SIZE: usize = 4096;
const FILE_ID: &str = "file-1";

fn channel_pair() -> (
    (
        Receiver<ReadHalf<DuplexStream>>,
        Sender<WriteHalf<DuplexStream>>,
    ),
    (
        Receiver<ReadHalf<DuplexStream>>,
        Sender<WriteHalf<DuplexStream>>,
    ),
) {
    let (one, two) = tokio_io::duplex(BUF_SIZE);
    let (rx1, tx1) = tokio_io::split(one);
    let (rx2, tx2) = tokio_io::split(two);
    (comms::channel(rx1, tx1), comms::channel(rx2, tx2))
}

/// What the mock store captured from one upload stream.
#[derive(Debug)]
struct StoredFile {
    metadata: FileMetadata,
    content: Vec<u8>,
    chunk_frames: usize,
}

/// Consumes an upload stream until the client closes it, then acknowledges
/// with the given file id and the checksum echoed from the metadata frame.
async fn serve_upload<R, W>(mut rx: Receiver<R>, mut tx: Sender<W>) -> io::Result<StoredFile>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut metadata = None;
    let mut content = Vec::new();
    let mut chunk_frames = 0;

    loop {
        match rx.recv_eof::<FileFrame>().await? {
            None => break,
            Some(FileFrame::Metadata(meta)) => metadata = Some(meta),
            Some(FileFrame::Chunk(chunk)) => {
                chunk_frames += 1;
                content.extend_from_slice(chunk);
            }
        }
    }

    let metadata = metadata.expect("upload stream carried no metadata frame");
    tx.send(&StoreResponse::FileUploaded {
        file_id: FILE_ID.into(),
        checksum: metadata.checksum.clone(),
    })
    .await?;

    Ok(StoredFile {
        metadata,
        content,
        chunk_frames,
    })
}

/// Serves one download request, streaming `content` in 1024-byte chunks.
/// When `metadata_first` is false the metadata frame is sent after the
/// first chunk instead, exercising the interleaved layout.
async fn serve_download<R, W>(
    mut rx: Receiver<R>,
    mut tx: Sender<W>,
    metadata: FileMetadata,
    content: Vec<u8>,
    metadata_first: bool,
) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    match rx.recv::<StoreRequest>().await? {
        StoreRequest::DownloadFile { file_id } => assert_eq!(file_id, FILE_ID),
        other => panic!("unexpected request: {other:?}"),
    }

    let mut metadata = Some(metadata);
    if metadata_first {
        tx.send(&FileFrame::Metadata(metadata.take().unwrap()))
            .await?;
    }

    for chunk in content.chunks(1024) {
        tx.send(&FileFrame::Chunk(chunk)).await?;
        if let Some(meta) = metadata.take() {
            tx.send(&FileFrame::Metadata(meta)).await?;
        }
    }

    if let Some(meta) = metadata.take() {
        tx.send(&FileFrame::Metadata(meta)).await?;
    }

    tx.finish().await
}

fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 256) as u8).collect()
}

#[tokio::test]
async fn upload_then_download_is_byte_identical() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let source = dir.path().join("weights.ckpt");
    let content = patterned(3000);
    fs::write(&source, &content).await?;

    // Upload.
    let ((sv_rx, sv_tx), (cl_rx, cl_tx)) = channel_pair();
    let server = tokio::spawn(serve_upload(sv_rx, sv_tx));
    let uploaded = StoreClient::new(cl_rx, cl_tx)
        .upload_file("exp-1", &source, FileType::Checkpoint)
        .await
        .expect("upload succeeds");
    let stored = server.await.unwrap()?;

    assert_eq!(uploaded.file_id, FILE_ID);
    assert_eq!(uploaded.bytes, content.len() as u64);
    assert_eq!(stored.content, content);
    assert_eq!(stored.metadata.checksum, uploaded.checksum);
    assert_eq!(stored.metadata.parent_id, "exp-1");
    // 3000 bytes at 1024 per frame: two full chunks and one partial.
    assert_eq!(stored.chunk_frames, 3);

    // Download into a fresh path.
    let dest = dir.path().join("restored.ckpt");
    let ((sv_rx, sv_tx), (cl_rx, cl_tx)) = channel_pair();
    let server = tokio::spawn(serve_download(
        sv_rx,
        sv_tx,
        stored.metadata.clone(),
        stored.content.clone(),
        true,
    ));
    let downloaded = StoreClient::new(cl_rx, cl_tx)
        .download_file(FILE_ID, &dest)
        .await
        .expect("download succeeds");
    server.await.unwrap()?;

    let restored = fs::read(&dest).await?;
    assert_eq!(restored, content);
    assert_eq!(downloaded.checksum, uploaded.checksum);
    assert_eq!(downloaded.bytes, content.len() as u64);

    Ok(())
}

#[tokio::test]
async fn interleaved_metadata_frame_is_accepted() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let source = dir.path().join("model.onnx");
    let content = patterned(2048);
    fs::write(&source, &content).await?;

    let ((sv_rx, sv_tx), (cl_rx, cl_tx)) = channel_pair();
    let server = tokio::spawn(serve_upload(sv_rx, sv_tx));
    let uploaded = StoreClient::new(cl_rx, cl_tx)
        .upload_file("model-3", &source, FileType::Model)
        .await
        .expect("upload succeeds");
    let stored = server.await.unwrap()?;

    let dest = dir.path().join("restored.onnx");
    let ((sv_rx, sv_tx), (cl_rx, cl_tx)) = channel_pair();
    let server = tokio::spawn(serve_download(
        sv_rx,
        sv_tx,
        stored.metadata.clone(),
        stored.content.clone(),
        false,
    ));
    let downloaded = StoreClient::new(cl_rx, cl_tx)
        .download_file(FILE_ID, &dest)
        .await
        .expect("download succeeds");
    server.await.unwrap()?;

    assert_eq!(fs::read(&dest).await?, content);
    assert_eq!(downloaded.checksum, uploaded.checksum);

    Ok(())
}

#[tokio::test]
async fn tampered_content_fails_digest_comparison() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let source = dir.path().join("weights.ckpt");
    let content = patterned(1500);
    fs::write(&source, &content).await?;

    let ((sv_rx, sv_tx), (cl_rx, cl_tx)) = channel_pair();
    let server = tokio::spawn(serve_upload(sv_rx, sv_tx));
    StoreClient::new(cl_rx, cl_tx)
        .upload_file("exp-1", &source, FileType::Checkpoint)
        .await
        .expect("upload succeeds");
    let mut stored = server.await.unwrap()?;

    // Flip a single byte between upload and download.
    stored.content[10] ^= 0xff;

    let dest = dir.path().join("restored.ckpt");
    let ((sv_rx, sv_tx), (cl_rx, cl_tx)) = channel_pair();
    let server = tokio::spawn(serve_download(
        sv_rx,
        sv_tx,
        stored.metadata.clone(),
        stored.content.clone(),
        true,
    ));
    let err = StoreClient::new(cl_rx, cl_tx)
        .download_file(FILE_ID, &dest)
        .await
        .expect_err("tampering must be detected");
    server.await.unwrap()?;

    assert!(matches!(err, StoreErr::ChecksumMismatch { .. }));

    Ok(())
}

#[tokio::test]
async fn zero_byte_upload_sends_metadata_and_no_chunks() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let source = dir.path().join("empty.bin");
    fs::write(&source, b"").await?;

    let ((sv_rx, sv_tx), (cl_rx, cl_tx)) = channel_pair();
    let server = tokio::spawn(serve_upload(sv_rx, sv_tx));
    let uploaded = StoreClient::new(cl_rx, cl_tx)
        .upload_file("exp-1", &source, FileType::Unknown)
        .await
        .expect("upload succeeds");
    let stored = server.await.unwrap()?;

    assert_eq!(uploaded.bytes, 0);
    assert_eq!(stored.chunk_frames, 0);
    assert!(stored.content.is_empty());
    assert_eq!(stored.metadata.checksum, uploaded.checksum);

    Ok(())
}

#[tokio::test]
async fn download_creates_parent_directories() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let content = patterned(100);
    let metadata = FileMetadata {
        parent_id: "exp-1".into(),
        path: "metrics.csv".into(),
        checksum: comms::checksum::digest(&content),
        file_type: FileType::Text,
    };

    let dest = dir.path().join("nested").join("deep").join("metrics.csv");
    let ((sv_rx, sv_tx), (cl_rx, cl_tx)) = channel_pair();
    let server = tokio::spawn(serve_download(sv_rx, sv_tx, metadata, content.clone(), true));
    let downloaded = StoreClient::new(cl_rx, cl_tx)
        .download_file(FILE_ID, &dest)
        .await
        .expect("download succeeds");
    server.await.unwrap()?;

    assert_eq!(fs::read(&dest).await?, content);
    assert_eq!(downloaded.bytes, content.len() as u64);

    Ok(())
}

#[tokio::test]
async fn directory_inputs_expand_to_one_artifact_per_file() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path().join("run-7");
    fs::create_dir_all(root.join("sub/deep")).await?;
    fs::write(root.join("a.txt"), b"alpha").await?;
    fs::write(root.join("sub/b.ckpt"), b"beta").await?;
    fs::write(root.join("sub/deep/c.png"), b"gamma").await?;

    let standalone = dir.path().join("notes.log");
    fs::write(&standalone, b"delta").await?;

    let artifacts = expand_artifacts("exp-1", &[root, standalone])
        .await
        .expect("expansion succeeds");

    assert_eq!(artifacts.len(), 4);
    assert!(artifacts.iter().all(|a| a.parent_id == "exp-1"));
    assert!(artifacts.iter().all(|a| !a.checksum.is_empty()));
    assert!(
        artifacts
            .iter()
            .any(|a| a.path.ends_with("b.ckpt") && a.file_type == FileType::Checkpoint)
    );
    assert!(
        artifacts
            .iter()
            .any(|a| a.path.ends_with("c.png") && a.file_type == FileType::Image)
    );

    // The batch round-trips through the track call.
    let ((mut sv_rx, mut sv_tx), (cl_rx, cl_tx)) = channel_pair();
    let server = tokio::spawn(async move {
        let StoreRequest::TrackArtifacts { files } = sv_rx.recv().await? else {
            panic!("unexpected request");
        };
        let count = files.len() as u64;
        sv_tx
            .send(&StoreResponse::ArtifactsTracked {
                num_files_tracked: count,
            })
            .await?;
        Ok::<_, io::Error>(())
    });

    let tracked = StoreClient::new(cl_rx, cl_tx)
        .track_artifacts(artifacts)
        .await
        .expect("tracking succeeds");
    server.await.unwrap()?;

    assert_eq!(tracked, 4);

    Ok(())
}
