// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::an::{AttributeMap, ObjectRecord, classify};
use crate::cv::{Contour, find_external_contours};
use crate::error::SilhouetteError;
use crate::im::{ImageShape, Segment, normalize};
use crate::mp::{FeatureVector, describe};
use crate::ut::timer::Stopwatch;

/// Options controlling a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Close each mask with a 3x3 elliptical element before tracing
    pub morphology: bool,
    /// Worker threads for segment normalization, all available if unset
    pub threads: Option<usize>,
    /// Compute skeleton lengths
    pub skeleton: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            morphology: true,
            threads: None,
            skeleton: true,
        }
    }
}

/// A segment that could not be normalized
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFailure {
    pub segment: usize,
    pub error: SilhouetteError,
}

impl Serialize for SegmentFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("segment", &self.segment)?;
        map.serialize_entry("error", &self.error.to_string())?;
        map.end()
    }
}

/// Objects measured from one image and the segments that failed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineOutput {
    pub records: Vec<ObjectRecord>,
    pub failures: Vec<SegmentFailure>,
}

impl PipelineOutput {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn raw_features(&self) -> Vec<FeatureVector> {
        self.records.iter().map(|r| *r.features()).collect()
    }

    pub fn contours(&self) -> Vec<&Contour> {
        self.records.iter().map(|r| r.contour()).collect()
    }

    pub fn attributes(&self) -> Vec<AttributeMap> {
        self.records.iter().map(|r| *r.attributes()).collect()
    }
}

impl Serialize for PipelineOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("objects", &self.records)?;
        map.serialize_entry("failures", &self.failures)?;
        map.end()
    }
}

/// Segment-to-attribute pipeline with its own worker pool
///
/// # Examples
///
/// ```
/// use silhouette_core::an::{Pipeline, PipelineOptions};
/// use silhouette_core::im::{ImageShape, Segment};
///
/// let pipeline = Pipeline::new(PipelineOptions::default()).unwrap();
///
/// let shape = ImageShape::new(32, 32).unwrap();
/// let segments = vec![
///     Segment::Polygon(vec![[4, 4], [20, 4], [20, 20], [4, 20]]),
///     Segment::Polygon(vec![]),
/// ];
///
/// let output = pipeline.run(&shape, &segments);
///
/// assert_eq!(output.records.len(), 1);
/// assert_eq!(output.failures.len(), 1);
/// assert_eq!(output.failures[0].segment, 1);
/// ```
pub struct Pipeline {
    options: PipelineOptions,
    pool: ThreadPool,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Result<Pipeline, SilhouetteError> {
        let threads = match options.threads {
            Some(0) => {
                return Err(SilhouetteError::ThreadPoolError(
                    "Number of threads must be positive.".to_string(),
                ));
            }
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };

        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| SilhouetteError::ThreadPoolError(err.to_string()))?;

        Ok(Pipeline { options, pool })
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Number of worker threads used for normalization
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Measure and classify every object in a set of segments
    pub fn run(&self, shape: &ImageShape, segments: &[Segment]) -> PipelineOutput {
        let mut stopwatch = Stopwatch::new();
        self.run_timed(shape, segments, &mut stopwatch)
    }

    /// Run the pipeline while recording stage durations
    ///
    /// Records the `normalize`, `contours`, `describe` and `classify` tasks.
    pub fn run_timed(
        &self,
        shape: &ImageShape,
        segments: &[Segment],
        stopwatch: &mut Stopwatch,
    ) -> PipelineOutput {
        stopwatch.start("normalize");
        let masks = self
            .pool
            .install(|| normalize(shape, segments, self.options.morphology));
        stopwatch.stop("normalize");

        stopwatch.start("contours");
        let mut failures = Vec::new();
        let mut traced: Vec<(usize, Contour)> = Vec::new();
        for (segment, mask) in masks.into_iter().enumerate() {
            match mask {
                Ok(mask) => traced.extend(
                    find_external_contours(&mask)
                        .into_iter()
                        .map(|contour| (segment, contour)),
                ),
                Err(error) => failures.push(SegmentFailure { segment, error }),
            }
        }
        stopwatch.stop("contours");

        stopwatch.start("describe");
        let image_shape = self.options.skeleton.then_some(shape);
        let features: Vec<FeatureVector> = traced
            .iter()
            .map(|(_, contour)| describe(contour, image_shape))
            .collect();
        stopwatch.stop("describe");

        stopwatch.start("classify");
        let attributes: Vec<AttributeMap> = features.iter().map(|f| classify(f)).collect();
        stopwatch.stop("classify");

        let records = traced
            .into_iter()
            .zip(features)
            .zip(attributes)
            .enumerate()
            .map(|(id, (((segment, contour), features), attributes))| {
                ObjectRecord::new(id, segment, contour, features, attributes)
            })
            .collect();

        PipelineOutput { records, failures }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::im::Mask;

    fn segments() -> Vec<Segment> {
        let mut buffer = vec![0u8; 40 * 40];
        for y in 2..10 {
            for x in 2..10 {
                buffer[y * 40 + x] = 1;
            }
            for x in 20..36 {
                buffer[y * 40 + x] = 1;
            }
        }

        vec![
            Segment::Polygon(vec![[5, 20], [30, 20], [30, 35], [5, 35]]),
            Segment::Mask(Mask::new(40, 40, buffer).unwrap()),
            Segment::Mask(Mask::zeros(10, 10)),
            Segment::Polygon(vec![[12, 12], [18, 12], [15, 17]]),
        ]
    }

    #[test]
    fn test_flattening_order_and_provenance() {
        let shape = ImageShape::new(40, 40).unwrap();
        let pipeline = Pipeline::new(PipelineOptions::default()).unwrap();

        let output = pipeline.run(&shape, &segments());

        let ids: Vec<usize> = output.records.iter().map(|r| r.id()).collect();
        let provenance: Vec<usize> = output.records.iter().map(|r| r.segment()).collect();

        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(provenance, vec![0, 1, 1, 3]);

        // Raster discovery order within a segment
        assert_eq!(output.records[1].contour()[0], [2, 2]);
        assert_eq!(output.records[2].contour()[0], [20, 2]);

        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].segment, 2);
        assert!(matches!(
            output.failures[0].error,
            SilhouetteError::MaskShapeError { .. }
        ));
    }

    #[test]
    fn test_stable_across_thread_counts() {
        let shape = ImageShape::new(40, 40).unwrap();
        let segments = segments();

        let outputs: Vec<PipelineOutput> = [1, 2, 4]
            .iter()
            .map(|&threads| {
                let options = PipelineOptions {
                    threads: Some(threads),
                    ..Default::default()
                };
                Pipeline::new(options).unwrap().run(&shape, &segments)
            })
            .collect();

        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[0], outputs[2]);
    }

    #[test]
    fn test_all_zero_segments() {
        let shape = ImageShape::new(16, 16).unwrap();
        let segments = vec![Segment::Mask(Mask::zeros(16, 16)); 3];

        let output = Pipeline::new(PipelineOptions::default())
            .unwrap()
            .run(&shape, &segments);

        assert!(output.is_empty());
        assert!(output.failures.is_empty());
    }

    #[test]
    fn test_zero_mask_among_segments() {
        let shape = ImageShape::new(40, 40).unwrap();
        let pipeline = Pipeline::new(PipelineOptions::default()).unwrap();

        let square = Segment::Polygon(vec![[5, 20], [30, 20], [30, 35], [5, 35]]);
        let triangle = Segment::Polygon(vec![[12, 4], [18, 4], [15, 9]]);

        let mixed = pipeline.run(
            &shape,
            &[square.clone(), Segment::Mask(Mask::zeros(40, 40)), triangle.clone()],
        );
        let plain = pipeline.run(&shape, &[square, triangle]);

        let provenance: Vec<usize> = mixed.records.iter().map(|r| r.segment()).collect();

        assert_eq!(provenance, vec![0, 2]);
        assert!(mixed.failures.is_empty());
        assert_eq!(mixed.raw_features(), plain.raw_features());
        assert_eq!(mixed.contours(), plain.contours());
        assert_eq!(mixed.attributes(), plain.attributes());
    }

    #[test]
    fn test_extreme_polygon_vertices() {
        let shape = ImageShape::new(10, 10).unwrap();
        let pipeline = Pipeline::new(PipelineOptions::default()).unwrap();

        let output = pipeline.run(
            &shape,
            &[
                Segment::Polygon(vec![[-2_000_000_000, 0], [2_000_000_000, 5], [0, 9]]),
                Segment::Polygon(vec![[0, 0], [200_000_000, 0], [0, 9]]),
                Segment::Polygon(vec![[i32::MIN, i32::MIN], [i32::MAX, i32::MIN], [i32::MAX, i32::MAX]]),
            ],
        );

        assert!(output.failures.is_empty());
        assert!(output.records.iter().any(|r| r.segment() == 0));
        assert!(output.records.iter().any(|r| r.segment() == 1));
        assert!(output.records.iter().any(|r| r.segment() == 2));
    }

    #[test]
    fn test_skeleton_option() {
        let shape = ImageShape::new(40, 40).unwrap();
        let segments = segments();

        let with = Pipeline::new(PipelineOptions::default())
            .unwrap()
            .run(&shape, &segments);

        let without = Pipeline::new(PipelineOptions {
            skeleton: false,
            ..Default::default()
        })
        .unwrap()
        .run(&shape, &segments);

        assert!(with.raw_features().iter().all(|f| f.skeleton_length.is_some()));
        assert!(without.raw_features().iter().all(|f| f.skeleton_length.is_none()));
        assert_eq!(with.contours(), without.contours());
    }

    #[test]
    fn test_timed_tasks() {
        let shape = ImageShape::new(40, 40).unwrap();
        let pipeline = Pipeline::new(PipelineOptions {
            threads: Some(2),
            ..Default::default()
        })
        .unwrap();

        let mut stopwatch = Stopwatch::new();
        let output = pipeline.run_timed(&shape, &segments(), &mut stopwatch);

        assert_eq!(output.len(), 4);
        assert_eq!(pipeline.threads(), 2);
        assert_eq!(
            stopwatch.tasks(),
            vec!["normalize", "contours", "describe", "classify"]
        );
    }

    #[test]
    fn test_zero_threads() {
        let options = PipelineOptions {
            threads: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Pipeline::new(options),
            Err(SilhouetteError::ThreadPoolError(_))
        ));
    }

    #[test]
    fn test_serialize_output() {
        let shape = ImageShape::new(40, 40).unwrap();
        let output = Pipeline::new(PipelineOptions::default())
            .unwrap()
            .run(&shape, &segments());

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["objects"].as_array().unwrap().len(), 4);
        assert_eq!(value["failures"][0]["segment"], 2);
        assert!(value["failures"][0]["error"].is_string());
    }
}
