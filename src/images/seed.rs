//! Demo-data seeding from the example-image directory.
//!
//! Seeded records get placeholder predictions: confidences cycle through
//! [`BASE_CONFIDENCES`], low-confidence records receive a fixed box and
//! high-confidence records none. This asymmetry only exists to produce
//! varied sample data; real detector output goes through
//! [`ImageStore::attach_prediction`].

use std::path::{Path, PathBuf};

use imagestore_common::paths::is_image_file;
use imagestore_common::{BoundingBox, Error, ImageId, Prediction, Result};
use imagestore_db::queries::images;
use rand::seq::SliceRandom;
use rand::Rng;
use walkdir::WalkDir;

use super::service::ImageStore;
use super::storage;

/// Confidences assigned to the first seeded images, in order.
pub const BASE_CONFIDENCES: [f64; 2] = [0.3, 0.7];

/// Records below this confidence get [`PLACEHOLDER_BOX`].
pub const BOX_THRESHOLD: f64 = 0.5;

pub const PLACEHOLDER_BOX: BoundingBox = BoundingBox {
    xmin: 0.1,
    ymin: 0.1,
    xmax: 0.9,
    ymax: 0.9,
};

/// One image added by a seeding run.
#[derive(Debug, Clone, PartialEq)]
pub struct SeededImage {
    pub id: ImageId,
    pub source: PathBuf,
    pub prediction: Prediction,
}

/// Outcome of [`ImageStore::seed_from_examples`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    /// Example images found in the directory.
    pub available: usize,
    pub seeded: Vec<SeededImage>,
}

impl SeedReport {
    pub fn added(&self) -> usize {
        self.seeded.len()
    }
}

/// Confidences for `count` images: the base sequence first, then uniform
/// random picks among the base values.
pub fn assign_confidences<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<f64> {
    let mut confidences: Vec<f64> = BASE_CONFIDENCES.iter().copied().take(count).collect();
    while confidences.len() < count {
        let pick = BASE_CONFIDENCES
            .choose(rng)
            .copied()
            .unwrap_or(BASE_CONFIDENCES[0]);
        confidences.push(pick);
    }
    confidences
}

/// Placeholder prediction for a seeded image with the given confidence.
pub fn placeholder_prediction(confidence: f64) -> Prediction {
    if confidence < BOX_THRESHOLD {
        Prediction::new(confidence, Some(PLACEHOLDER_BOX))
    } else {
        Prediction::new(confidence, None)
    }
}

/// Image files directly inside `dir`, sorted by name.
pub fn list_examples(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if entry.file_type().is_file() && is_image_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Pick `limit` examples uniformly without replacement, or all when `limit == 0`.
fn select_examples<R: Rng + ?Sized>(
    examples: Vec<PathBuf>,
    limit: usize,
    rng: &mut R,
) -> Result<Vec<PathBuf>> {
    if limit == 0 {
        return Ok(examples);
    }
    if limit > examples.len() {
        return Err(Error::InsufficientSamples {
            requested: limit,
            available: examples.len(),
        });
    }

    Ok(rand::seq::index::sample(rng, examples.len(), limit)
        .into_iter()
        .map(|i| examples[i].clone())
        .collect())
}

/// Save sampled example images and attach placeholder predictions.
///
/// Every selected file is decoded before the first write, so an unreadable
/// example fails the run with nothing stored. Images are then stored through
/// [`ImageStore::save_image`] and predictions written in a single
/// transaction.
pub fn seed_from_examples<R: Rng + ?Sized>(
    store: &ImageStore,
    limit: usize,
    rng: &mut R,
) -> Result<SeedReport> {
    let examples = list_examples(&store.config().examples_path())?;
    let available = examples.len();
    if available == 0 {
        tracing::info!(
            dir = %store.config().examples_path().display(),
            "No example images found"
        );
        return Ok(SeedReport::default());
    }

    let selected = select_examples(examples, limit, rng)?;
    let confidences = assign_confidences(selected.len(), rng);

    let decoded = selected
        .into_iter()
        .map(|source| storage::decode_file(&source).map(|img| (source, img)))
        .collect::<Result<Vec<_>>>()?;

    let mut saved = Vec::with_capacity(decoded.len());
    for (source, img) in decoded {
        let id = store.save_image(&img)?;
        tracing::debug!(%id, source = %source.display(), "Seeded example image");
        saved.push((id, source));
    }

    let mut conn = store.connection()?;
    let tx = conn
        .transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    let mut seeded = Vec::with_capacity(saved.len());
    for ((id, source), confidence) in saved.into_iter().zip(confidences) {
        let prediction = placeholder_prediction(confidence);
        images::mark_predicted(&tx, id, &prediction)?;
        seeded.push(SeededImage {
            id,
            source,
            prediction,
        });
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    tracing::info!(added = seeded.len(), available, "Added example images");
    Ok(SeedReport { available, seeded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_assign_confidences_prefix() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(assign_confidences(0, &mut rng).is_empty());
        assert_eq!(assign_confidences(1, &mut rng), vec![0.3]);
        assert_eq!(assign_confidences(2, &mut rng), vec![0.3, 0.7]);
    }

    #[test]
    fn test_assign_confidences_extension() {
        let mut rng = StdRng::seed_from_u64(7);
        let confidences = assign_confidences(50, &mut rng);
        assert_eq!(confidences.len(), 50);
        assert_eq!(&confidences[..2], &[0.3, 0.7]);
        assert!(confidences.iter().all(|c| *c == 0.3 || *c == 0.7));
        // Both values show up among the random tail.
        assert!(confidences[2..].contains(&0.3));
        assert!(confidences[2..].contains(&0.7));
    }

    #[test]
    fn test_placeholder_policy() {
        let low = placeholder_prediction(0.3);
        assert_eq!(low.confidence, 0.3);
        assert_eq!(low.bbox, Some(BoundingBox::new(0.1, 0.1, 0.9, 0.9)));

        let high = placeholder_prediction(0.7);
        assert_eq!(high.bbox, None);

        assert_eq!(placeholder_prediction(0.5).bbox, None);
    }

    #[test]
    fn test_select_all_when_limit_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let files: Vec<PathBuf> = ["a.png", "b.png", "c.png"].iter().map(PathBuf::from).collect();
        assert_eq!(select_examples(files.clone(), 0, &mut rng).unwrap(), files);
    }

    #[test]
    fn test_select_without_replacement() {
        let mut rng = StdRng::seed_from_u64(3);
        let files: Vec<PathBuf> = (0..10).map(|i| PathBuf::from(format!("{i}.png"))).collect();

        let mut selected = select_examples(files.clone(), 4, &mut rng).unwrap();
        assert_eq!(selected.len(), 4);
        selected.sort();
        selected.dedup();
        assert_eq!(selected.len(), 4);
        assert!(selected.iter().all(|f| files.contains(f)));
    }

    #[test]
    fn test_select_more_than_available() {
        let mut rng = StdRng::seed_from_u64(3);
        let files = vec![PathBuf::from("a.png")];

        let err = select_examples(files, 2, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientSamples {
                requested: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn test_list_examples_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();

        let files = list_examples(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.jpg", "b.png"]);
    }
}
