use crate::assets::AssetLookup;
use crate::detection::FaceSignal;
use crate::overlay::{Composition, Compositor};
use image::DynamicImage;
use num_cpus::get as get_cpu_count;
use std::thread;
use tracing::{Level, debug, span};

/// One image and the faces detected on it.
#[derive(Debug, Clone)]
pub struct Job {
    pub image: DynamicImage,
    pub faces: Vec<FaceSignal>,
}

/// Composes every job on up to `max_threads` workers.
///
/// Images never share a canvas, so they are composed in parallel. Results
/// are returned in job order.
pub fn compose_all<L>(
    compositor: &Compositor<'_, L>,
    jobs: Vec<Job>,
    max_threads: usize,
) -> Vec<Composition<DynamicImage>>
where
    L: AssetLookup + Sync,
{
    let total = jobs.len();
    let threads = max_threads.min(get_cpu_count()).min(total).max(1);
    debug!("Composing {total} images on {threads} threads");

    let (job_tx, job_rx) = flume::unbounded::<(usize, Job)>();
    let (result_tx, result_rx) = flume::unbounded();

    let mut results: Vec<(usize, Composition<DynamicImage>)> = thread::scope(|s| {
        for worker in 0..threads {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            s.spawn(move || {
                for (idx, job) in job_rx.iter() {
                    let span = span!(Level::DEBUG, "batch_job", worker, idx);
                    let _guard = span.enter();

                    let composed = compositor.compose_dynamic(&job.image, &job.faces);
                    if result_tx.send((idx, composed)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        for job in jobs.into_iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);

        result_rx.iter().collect()
    });

    results.sort_by_key(|(idx, _)| *idx);
    results.into_iter().map(|(_, composed)| composed).collect()
}
