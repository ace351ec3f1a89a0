use shorescan::{
    config::{Config, Images},
    error::ImageError,
    image::{ImageFile, read_preview},
};
use std::io::Write;

#[tokio::test]
async fn preview_is_a_base64_data_url() {
    let limits = Config::default().images;
    let loaded = read_preview(&ImageFile::from_bytes("tide.png", vec![1, 2, 3]), &limits)
        .await
        .unwrap();
    assert_eq!(loaded.preview.data_url, "data:image/png;base64,AQID");
    assert_eq!(loaded.attachment.content_type, "image/png");
    assert_eq!(loaded.attachment.bytes, 3);
}

#[tokio::test]
async fn reads_photo_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("juhu.jpg");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(&[0xff, 0xd8, 0xff, 0xe0]).unwrap();
    drop(f);

    let loaded = read_preview(&ImageFile::from_path(&path), &Images::default())
        .await
        .unwrap();
    assert_eq!(loaded.attachment.name, "juhu.jpg");
    assert!(loaded.preview.data_url.starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn rejects_non_images() {
    let err = read_preview(&ImageFile::from_bytes("notes.txt", b"hello".to_vec()), &Images::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ImageError::Unsupported { .. }));
}

#[tokio::test]
async fn rejects_oversized_and_empty_photos() {
    let limits = Images {
        max_bytes: 4,
        ..Images::default()
    };
    let err = read_preview(&ImageFile::from_bytes("big.png", vec![0; 5]), &limits)
        .await
        .unwrap_err();
    assert!(matches!(err, ImageError::TooLarge { bytes: 5, limit: 4, .. }));

    let err = read_preview(&ImageFile::from_bytes("blank.png", Vec::new()), &limits)
        .await
        .unwrap_err();
    assert!(matches!(err, ImageError::Empty { .. }));
}

#[tokio::test]
async fn oversized_file_is_refused_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pano.png");
    std::fs::write(&path, vec![0u8; 64]).unwrap();
    let limits = Images {
        max_bytes: 16,
        ..Images::default()
    };
    let err = read_preview(&ImageFile::from_path(&path), &limits).await.unwrap_err();
    assert!(matches!(err, ImageError::TooLarge { bytes: 64, .. }));
}
