use std::path::Path;

use subdrawer_common::config::{AppConfig, GENERATED_IMAGES_DIR, INITIAL_POSE_FILE_NAME, POSE_FILE_NAME};
use subdrawer_editor::{AnnotationSession, BackgroundMode, InteractionState, ToggleOutcome};
use subdrawer_pose_model::{Keypoint, Point2D};
use subdrawer_render_engine::{DisplayList, Layer};

const INITIAL: &str = r#"{"image_1.jpg": {"pose1": {"nose": [100, 100], "neck": [100, 150]}}}"#;

fn write_initial(dir: &Path, content: &str) {
    std::fs::write(dir.join(INITIAL_POSE_FILE_NAME), content).unwrap();
}

fn config(dir: &Path) -> AppConfig {
    AppConfig {
        working_folder: dir.to_path_buf(),
        home_dir: dir.to_path_buf(),
        placeholder_count: 6,
        ..AppConfig::default()
    }
}

fn open(dir: &Path) -> AnnotationSession<DisplayList> {
    AnnotationSession::open(config(dir), DisplayList::new()).unwrap()
}

fn write_image(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
        .save(path)
        .unwrap();
}

#[test]
fn resize_rescales_active_pose() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(dir.path(), INITIAL);
    let mut session = open(dir.path());
    assert_eq!(session.canvas().size(), (512, 512));

    session.resize_canvas(256, 256).unwrap();

    let pose = session.active_pose().unwrap();
    assert_eq!(pose.get(Keypoint::Nose), Some(Point2D::new(50.0, 50.0)));
    assert_eq!(pose.get(Keypoint::Neck), Some(Point2D::new(50.0, 75.0)));
}

#[test]
fn resize_leaves_other_images_untouched() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(dir.path(), INITIAL);
    let mut session = open(dir.path());
    session.handle_key('s').unwrap();
    assert_eq!(session.active_image(), "image_2.jpg");

    session.resize_canvas(1024, 256).unwrap();

    let moved = session.dataset().pose("image_2.jpg", "pose1").unwrap();
    assert_eq!(moved.get(Keypoint::Nose), Some(Point2D::new(200.0, 50.0)));
    let untouched = session.dataset().pose("image_1.jpg", "pose1").unwrap();
    assert_eq!(untouched.get(Keypoint::Nose), Some(Point2D::new(100.0, 100.0)));
}

#[test]
fn toggle_left_ankle_on_narrow_canvas() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(dir.path(), INITIAL);
    let mut cfg = config(dir.path());
    cfg.canvas.width = 300;
    let mut session = AnnotationSession::open(cfg, DisplayList::new()).unwrap();
    let before = session.active_pose().cloned().unwrap();

    assert_eq!(session.toggle_keypoint(Keypoint::LeftAnkle).unwrap(), ToggleOutcome::Added);
    assert_eq!(
        session.active_pose().unwrap().get(Keypoint::LeftAnkle),
        Some(Point2D::new(300.0, 0.0))
    );
    assert_eq!(session.surface().count(Layer::Circles), 3);

    assert_eq!(session.toggle_keypoint(Keypoint::LeftAnkle).unwrap(), ToggleOutcome::Removed);
    assert_eq!(session.active_pose().unwrap(), &before);
}

#[test]
fn selecting_unknown_image_copies_most_recent_pose() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(
        dir.path(),
        r#"{"image_1.jpg": {"pose1": {"neck": [1, 1]}}, "image_2.jpg": {"pose1": {"nose": [10, 10]}}}"#,
    );
    let mut session = open(dir.path());

    session.select_image(4).unwrap();
    assert_eq!(session.active_image(), "image_5.jpg");
    let created = session.dataset().pose("image_5.jpg", "pose1").unwrap();
    assert_eq!(created.keypoints().collect::<Vec<_>>(), vec![Keypoint::Nose]);
    assert_eq!(created.get(Keypoint::Nose), Some(Point2D::new(10.0, 10.0)));

    // Drag the copied nose; the source must not move.
    session.pointer_move(10.0, 10.0, false).unwrap();
    session.pointer_move(40.0, 30.0, true).unwrap();
    session.pointer_release().unwrap();

    assert_eq!(
        session.active_pose().unwrap().get(Keypoint::Nose),
        Some(Point2D::new(40.0, 30.0))
    );
    assert_eq!(
        session.dataset().pose("image_2.jpg", "pose1").unwrap().get(Keypoint::Nose),
        Some(Point2D::new(10.0, 10.0))
    );
}

#[test]
fn hover_boundary_is_inclusive() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(dir.path(), INITIAL);
    let mut session = open(dir.path());

    session.pointer_move(100.0, 100.0, false).unwrap();
    assert_eq!(session.interaction_state(), InteractionState::Hovering(Keypoint::Nose));

    session.pointer_move(109.0 + 1e-6, 100.0, false).unwrap();
    assert_eq!(session.interaction_state(), InteractionState::Idle);

    session.pointer_move(109.0, 100.0, false).unwrap();
    assert_eq!(session.interaction_state(), InteractionState::Hovering(Keypoint::Nose));
}

#[test]
fn save_gating_tracks_disk_state() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(dir.path(), INITIAL);
    let mut session = open(dir.path());

    // Nothing saved yet: compared against the bundled default.
    assert!(session.is_pose_data_saved().unwrap());

    session.toggle_keypoint(Keypoint::RightEye).unwrap();
    assert!(!session.is_pose_data_saved().unwrap());

    session.save_pose_data().unwrap();
    assert!(dir.path().join(POSE_FILE_NAME).is_file());
    assert!(session.is_pose_data_saved().unwrap());

    session.pointer_move(100.0, 150.0, false).unwrap();
    session.pointer_move(90.0, 150.0, true).unwrap();
    assert!(!session.is_pose_data_saved().unwrap());
}

#[test]
fn initial_pose_moves_to_first_real_image() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(dir.path(), INITIAL);
    write_image(&dir.path().join("b.png"), 20, 10);
    write_image(&dir.path().join("a.jpg"), 20, 10);

    let session = open(dir.path());

    assert_eq!(session.image_names(), ["a.jpg", "b.png"]);
    assert!(!session.dataset().contains_image("image_1.jpg"));
    assert!(session.dataset().contains_image("a.jpg"));
}

#[test]
fn original_image_background_resizes_canvas() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(dir.path(), INITIAL);
    write_image(&dir.path().join("a.jpg"), 40, 20);

    let mut session = open(dir.path());

    // 40x20 scaled to the 512 canvas height.
    assert_eq!(session.canvas().size(), (1024, 512));
    let background = session.background().unwrap();
    assert_eq!((background.width(), background.height()), (1024, 512));
    assert_eq!(
        session.active_pose().unwrap().get(Keypoint::Nose),
        Some(Point2D::new(200.0, 100.0))
    );

    session.set_background_mode(BackgroundMode::BlackBg).unwrap();
    assert!(session.background().is_none());
    assert_eq!(session.canvas().size(), (1024, 512));
}

#[test]
fn corrupt_image_opens_without_background() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(dir.path(), INITIAL);
    std::fs::write(dir.path().join("a.jpg"), b"definitely not a jpeg").unwrap();
    write_image(&dir.path().join("b.png"), 40, 20);

    let mut session = open(dir.path());

    assert_eq!(session.active_image(), "a.jpg");
    assert!(session.background().is_none());
    assert_eq!(session.canvas().size(), (512, 512));
    assert_eq!(
        session.active_pose().unwrap().get(Keypoint::Nose),
        Some(Point2D::new(100.0, 100.0))
    );

    // The readable neighbour still gets its background.
    session.handle_key('s').unwrap();
    assert!(session.background().is_some());
    assert_eq!(session.canvas().size(), (1024, 512));
}

#[test]
fn batch_export_writes_images_then_pose_file() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(dir.path(), INITIAL);
    write_image(&dir.path().join("a.jpg"), 16, 16);
    write_image(&dir.path().join("b.png"), 16, 16);
    write_image(&dir.path().join("c.JPEG"), 16, 16);

    let mut session = open(dir.path());
    session.handle_key('s').unwrap();
    assert_eq!(session.active_image(), "b.png");
    let canvas = *session.canvas();

    let report = session.save_images_and_poses().unwrap();

    let out = dir.path().join(GENERATED_IMAGES_DIR);
    assert_eq!(
        report.images,
        vec![out.join("a.jpg"), out.join("b.png"), out.join("c.JPEG")]
    );
    assert_eq!(report.pose_file, dir.path().join(POSE_FILE_NAME));

    let pose_written = std::fs::metadata(&report.pose_file).unwrap().modified().unwrap();
    for image in &report.images {
        let written = image::open(image).unwrap();
        assert_eq!((written.width(), written.height()), canvas.size());
        assert!(std::fs::metadata(image).unwrap().modified().unwrap() <= pose_written);
    }

    // Every image now has a pose, and the active image is restored.
    assert_eq!(session.dataset().len(), 3);
    assert_eq!(session.active_image(), "b.png");
    assert!(session.background().is_some());
    assert!(session.is_pose_data_saved().unwrap());
}

#[test]
fn placeholder_export_writes_blank_skeleton_rasters() {
    let dir = tempfile::tempdir().unwrap();
    write_initial(dir.path(), INITIAL);
    let mut session = open(dir.path());
    session.resize_canvas(64, 64).unwrap();

    let path = session.save_as_image().unwrap();

    assert_eq!(path, dir.path().join(GENERATED_IMAGES_DIR).join("image_1.jpg"));
    let written = image::open(&path).unwrap();
    assert_eq!((written.width(), written.height()), (64, 64));
    assert!(!dir.path().join(POSE_FILE_NAME).exists());
}
