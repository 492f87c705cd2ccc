//! Integration tests for the image record store and schema manager.

mod common;

use common::{sample_image, TestStore};
use imagestore::images::{seed, Consent, ResetOutcome};
use imagestore_common::{BoundingBox, Error, ImageId, ImageStatus, Prediction};
use imagestore_db::schema::TABLE_NAMES;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_save_assigns_increasing_ids() {
    let t = TestStore::new();

    let ids: Vec<ImageId> = (0..3)
        .map(|i| t.store.save(format!("bytes-{}", i).as_bytes()).unwrap())
        .collect();

    assert_eq!(ids, vec![ImageId::from(1), ImageId::from(2), ImageId::from(3)]);
    assert_eq!(t.store.count().unwrap(), 3);
    assert_eq!(t.image_files().len(), 3);
}

#[test]
fn test_saved_record_matches_file() {
    let t = TestStore::new();
    let id = t.store.save(b"payload").unwrap();

    let record = t.store.get(id).unwrap().unwrap();
    assert_eq!(record.status, ImageStatus::Pending);
    assert!(record.class_confidence.is_none());
    assert!(record.bbox.is_none());

    let path = std::path::PathBuf::from(record.path.as_deref().unwrap());
    assert_eq!(path.parent(), Some(t.config.images_path().as_path()));
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        format!("{}_{}.png", id, record.timestamp)
    );
    assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    assert!(t.store.check_consistency().unwrap().is_consistent());
}

#[test]
fn test_save_image_writes_png() {
    let t = TestStore::new();
    let id = t.store.save_image(&sample_image(10)).unwrap();

    let record = t.store.get(id).unwrap().unwrap();
    let decoded = image::open(record.path.unwrap()).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (4, 3));
}

#[test]
fn test_partial_write_keeps_row_without_path() {
    let t = TestStore::new();
    std::fs::remove_dir(t.config.images_path()).unwrap();

    let id = match t.store.save(b"lost").unwrap_err() {
        Error::PartialWrite { id, .. } => id,
        other => panic!("expected PartialWrite, got {:?}", other),
    };

    let record = t.store.get(id).unwrap().unwrap();
    assert!(record.path.is_none());

    let report = t.store.check_consistency().unwrap();
    assert_eq!(report.without_path, vec![id]);
    assert!(!report.is_consistent());
}

#[test]
fn test_attach_prediction_transitions() {
    let t = TestStore::new();
    let id = t.store.save(b"x").unwrap();

    let prediction = Prediction::new(0.82, Some(BoundingBox::new(0.2, 0.2, 0.6, 0.7)));
    t.store.attach_prediction(id, prediction).unwrap();

    let record = t.store.get(id).unwrap().unwrap();
    assert_eq!(record.status, ImageStatus::Predicted);
    assert_eq!(record.class_confidence, Some(0.82));
    assert_eq!(record.bbox, prediction.bbox);

    let again = t.store.attach_prediction(id, Prediction::new(0.5, None));
    assert!(matches!(again, Err(Error::InvalidTransition { .. })));

    let missing = t.store.attach_prediction(ImageId::from(99), Prediction::new(0.5, None));
    assert!(matches!(missing, Err(Error::NotFound(_))));
}

#[test]
fn test_attach_prediction_rejects_out_of_range() {
    let t = TestStore::new();
    let id = t.store.save(b"x").unwrap();

    let err = t
        .store
        .attach_prediction(id, Prediction::new(1.5, None))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));

    let inverted = Prediction::new(0.4, Some(BoundingBox::new(0.8, 0.1, 0.2, 0.9)));
    assert!(t.store.attach_prediction(id, inverted).is_err());

    assert_eq!(
        t.store.get(id).unwrap().unwrap().status,
        ImageStatus::Pending
    );
}

#[test]
fn test_list_filters_by_status() {
    let t = TestStore::new();
    let first = t.store.save(b"a").unwrap();
    let second = t.store.save(b"b").unwrap();
    t.store
        .attach_prediction(second, Prediction::new(0.9, None))
        .unwrap();

    let pending: Vec<_> = t
        .store
        .list(Some(ImageStatus::Pending))
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(pending, vec![first]);

    let predicted = t.store.list(Some(ImageStatus::Predicted)).unwrap();
    assert_eq!(predicted.len(), 1);
    assert_eq!(predicted[0].id, second);

    assert_eq!(t.store.list(None).unwrap().len(), 2);
}

#[test]
fn test_seed_all_examples() {
    let t = TestStore::new();
    t.add_examples(3);

    let mut rng = StdRng::seed_from_u64(42);
    let report = seed::seed_from_examples(&t.store, 0, &mut rng).unwrap();
    assert_eq!(report.available, 3);
    assert_eq!(report.added(), 3);
    assert_eq!(t.image_files().len(), 3);

    let records = t.store.list(None).unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.status == ImageStatus::Predicted));

    assert_eq!(records[0].class_confidence, Some(0.3));
    assert_eq!(records[1].class_confidence, Some(0.7));
    for record in &records {
        let confidence = record.class_confidence.unwrap();
        assert!(confidence == 0.3 || confidence == 0.7);
        if confidence < 0.5 {
            assert_eq!(record.bbox, Some(BoundingBox::new(0.1, 0.1, 0.9, 0.9)));
        } else {
            assert!(record.bbox.is_none());
        }
    }
    assert!(t.store.check_consistency().unwrap().is_consistent());
}

#[test]
fn test_seed_subset_without_replacement() {
    let t = TestStore::new();
    t.add_examples(5);

    let mut rng = StdRng::seed_from_u64(9);
    let report = seed::seed_from_examples(&t.store, 2, &mut rng).unwrap();
    assert_eq!(report.added(), 2);
    assert_ne!(report.seeded[0].source, report.seeded[1].source);
    assert_eq!(t.store.count().unwrap(), 2);
}

#[test]
fn test_seed_empty_examples_writes_nothing() {
    let t = TestStore::new();

    let report = t.store.seed_from_examples(0).unwrap();
    assert_eq!(report.available, 0);
    assert_eq!(report.added(), 0);
    assert_eq!(t.store.count().unwrap(), 0);
    assert!(t.image_files().is_empty());
}

#[test]
fn test_seed_with_corrupt_example_stores_nothing() {
    let t = TestStore::new();
    t.add_examples(2);
    std::fs::write(t.config.examples_path().join("zzz_broken.png"), b"not a png").unwrap();

    let err = t.store.seed_from_examples(0).unwrap_err();
    assert!(matches!(err, Error::Image(_)));
    assert_eq!(t.store.count().unwrap(), 0);
    assert!(t.image_files().is_empty());
}

#[test]
fn test_seed_limit_above_available_fails_before_writing() {
    let t = TestStore::new();
    t.add_examples(3);

    let err = t.store.seed_from_examples(4).unwrap_err();
    assert!(matches!(
        err,
        Error::InsufficientSamples {
            requested: 4,
            available: 3
        }
    ));
    assert_eq!(t.store.count().unwrap(), 0);
    assert!(t.image_files().is_empty());
}

#[test]
fn test_purge_leaves_dangling_rows() {
    let t = TestStore::new();
    let id = t.store.save(b"a").unwrap();

    assert_eq!(t.store.purge_images().unwrap(), 1);
    assert!(t.image_files().is_empty());
    assert_eq!(t.store.count().unwrap(), 1);

    let report = t.store.check_consistency().unwrap();
    assert_eq!(report.missing_files, vec![id]);
}

#[test]
fn test_reset_declined_changes_nothing() {
    let t = TestStore::new();
    t.store.save(b"a").unwrap();

    let outcome = t.store.reset_all(Consent::Declined).unwrap();
    assert_eq!(outcome, ResetOutcome::Declined);
    assert_eq!(t.store.count().unwrap(), 1);
    assert_eq!(t.image_files().len(), 1);
}

#[test]
fn test_reset_clears_store_and_restarts_ids() {
    let t = TestStore::new();
    t.store.save(b"a").unwrap();
    t.store.save(b"b").unwrap();

    let outcome = t.store.reset_all(Consent::Granted).unwrap();
    assert_eq!(
        outcome,
        ResetOutcome::Completed {
            images_removed: 2,
            database_existed: true
        }
    );
    assert_eq!(t.store.count().unwrap(), 0);
    assert!(t.image_files().is_empty());

    assert_eq!(t.store.save(b"c").unwrap(), ImageId::from(1));
}

#[test]
fn test_reset_then_export_lists_every_table() {
    let t = TestStore::new();
    t.store.reset_all(Consent::Granted).unwrap();

    let written = t.manager.export_schema(None).unwrap();
    let dump = std::fs::read_to_string(written).unwrap();
    let tables: Vec<&str> = dump
        .lines()
        .filter_map(|l| l.strip_prefix("TABLE: "))
        .collect();
    assert_eq!(tables, TABLE_NAMES);
}

#[test]
fn test_describe_image_columns() {
    let t = TestStore::new();
    let schema = t.manager.describe().unwrap();

    let image = schema.iter().find(|s| s.name == "image").unwrap();
    let columns: Vec<&str> = image.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        columns,
        ["id", "timestamp", "path", "status", "class", "xmin", "ymin", "xmax", "ymax"]
    );
}
