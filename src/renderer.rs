use crate::camera::Camera;
use crate::film::{AccumulateWeights, AccumulationBuffer};
use crate::integrator::IntegratorRadiance;
use crate::scene::Scene;
use crate::spectrum::Spectrum;
use crate::{Float, Point2f};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, debug_span, error, warn};

/// Rows `offset, offset + partitions, offset + 2 * partitions, ...` below `height`.
pub fn interleaved_rows(offset: usize, partitions: usize, height: usize) -> impl Iterator<Item = usize> {
    (offset..height).step_by(partitions.max(1))
}

/// Row sets for every partition. Each row in `0..height` appears in exactly one set.
pub fn partition_rows(height: usize, partitions: usize) -> Vec<Vec<usize>> {
    let partitions = partitions.max(1);
    (0..partitions)
        .map(|offset| interleaved_rows(offset, partitions, height).collect())
        .collect()
}

/// What one trace pass did.
#[derive(Clone, Debug, PartialEq)]
pub struct PassReport {
    pub elapsed: Duration,

    /// Passes accumulated in the buffer after this one.
    pub samples: u32,

    /// The camera moved (or the viewport changed) and the buffer was cleared first.
    pub camera_changed: bool,

    /// Cancellation was requested before every row was traced.
    pub cancelled: bool,

    pub rows_traced: usize,

    /// Partitions whose worker panicked. Their remaining rows were skipped and the pass
    /// was not counted.
    pub failed_partitions: usize,
}

impl PassReport {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Splits each pass over a fixed-size thread pool, one worker per row partition.
#[derive(Default)]
pub struct PartitionedRenderer {
    pool: Option<rayon::ThreadPool>,
}

impl PartitionedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn pool(&mut self, partitions: usize) -> anyhow::Result<&rayon::ThreadPool> {
        let rebuild = self.pool.as_ref().map_or(true, |p| p.current_num_threads() != partitions);
        if rebuild {
            debug!(partitions, "building trace thread pool");
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(partitions)
                .thread_name(|i| format!("trace-partition-{}", i))
                .build()?;
            self.pool = Some(pool);
        }
        self.pool.as_ref().ok_or_else(|| anyhow::anyhow!("trace thread pool missing"))
    }

    /// Traces one sample for every pixel of `buffer` and blends it into the running mean.
    ///
    /// `sample` is the sub-pixel offset used for the whole pass. Workers check `cancel`
    /// before each row and stop early once it is set; rows already written stay written,
    /// and the pass is not counted. The same holds when a partition worker panics.
    pub fn render_pass<C, I>(
        &mut self,
        scene: &Scene,
        camera: &C,
        integrator: &I,
        buffer: &mut AccumulationBuffer,
        partitions: usize,
        sample: Point2f,
        cancel: &AtomicBool,
    ) -> anyhow::Result<PassReport>
        where C: Camera, I: IntegratorRadiance
    {
        let start = Instant::now();
        let partitions = partitions.max(1);
        let weights = buffer.accumulate_weights();

        // hand each partition its rows as disjoint mutable slices
        let mut rows: Vec<Option<&mut [Spectrum]>> = buffer.rows_mut().map(Some).collect();
        let height = rows.len();
        let work: Vec<Vec<(usize, &mut [Spectrum])>> = (0..partitions)
            .map(|offset| {
                interleaved_rows(offset, partitions, height)
                    .filter_map(|y| rows[y].take().map(|row| (y, row)))
                    .collect()
            })
            .collect();

        let rows_traced = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);
        let interrupted = AtomicBool::new(false);

        self.pool(partitions)?.scope(|s| {
            for (offset, rows) in work.into_iter().enumerate() {
                let rows_traced = &rows_traced;
                let failed = &failed;
                let interrupted = &interrupted;
                s.spawn(move |_| {
                    let _span = debug_span!("partition", offset).entered();
                    let result = panic::catch_unwind(AssertUnwindSafe(|| {
                        render_rows(scene, camera, integrator, rows, weights, sample, cancel, rows_traced)
                    }));
                    match result {
                        Ok(true) => {}
                        Ok(false) => { interrupted.store(true, Ordering::Relaxed); }
                        Err(cause) => {
                            error!(offset, cause = %panic_message(&*cause), "partition worker panicked");
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        // an incomplete pass must not be weighted as a full sample
        let cancelled = interrupted.load(Ordering::Relaxed);
        let failed_partitions = failed.into_inner();
        if cancelled {
            warn!("trace pass cancelled");
        } else if failed_partitions > 0 {
            warn!(failed_partitions, "trace pass incomplete, not counted");
        } else {
            buffer.finish_pass();
        }

        Ok(PassReport {
            elapsed: start.elapsed(),
            samples: buffer.sample_count(),
            camera_changed: false,
            cancelled,
            rows_traced: rows_traced.into_inner(),
            failed_partitions,
        })
    }
}

/// Returns false if cancelled before finishing.
#[allow(clippy::too_many_arguments)]
fn render_rows<C: Camera, I: IntegratorRadiance>(
    scene: &Scene,
    camera: &C,
    integrator: &I,
    rows: Vec<(usize, &mut [Spectrum])>,
    weights: AccumulateWeights,
    sample: Point2f,
    cancel: &AtomicBool,
    rows_traced: &AtomicUsize,
) -> bool {
    for (y, row) in rows {
        if cancel.load(Ordering::Relaxed) {
            return false;
        }

        for (x, pixel) in row.iter_mut().enumerate() {
            let p_film = Point2f::new(x as Float + sample.x, y as Float + sample.y);
            let ray = camera.generate_ray(p_film);
            let radiance = integrator.incident_radiance(&ray, scene, 0);
            check_radiance(&radiance, (x, y));
            *pixel = weights.blend(*pixel, radiance);
        }
        rows_traced.fetch_add(1, Ordering::Relaxed);
    }
    true
}

fn check_radiance(l: &Spectrum, pixel: (usize, usize)) {
    debug_assert!(!l.has_nans(), "NaN radiance value for pixel {:?}", pixel);
}

fn panic_message(cause: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = cause.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
