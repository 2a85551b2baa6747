use crate::annotate::germline::GermlineMatcher;
use crate::annotate::protocol::AnnotationProtocol;
use crate::annotate::report::AnnotationResult;
use crate::batch::reader::Entry;
use crate::batch::writer::RowSink;
use crate::shared::options::{Options, OPTIMIZED_PRECISION, OPTIMIZED_RECALL};
use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

#[cfg(feature = "kdam")]
use kdam::{tqdm, BarExt};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub records: usize,
    // rows written as N/A
    pub degraded: usize,
    pub annotated: usize,
    pub corrected_records: usize,
    // bases of the corrected records, and how many were replaced
    pub bases: usize,
    pub corrected_bases: usize,
}

impl BatchSummary {
    fn add(&mut self, result: &AnnotationResult) {
        self.records += 1;
        if result.v.is_some() {
            self.annotated += 1;
        }
        if result.productive.is_none() {
            self.degraded += 1;
        }
        if let (Some(corrected), Some(n)) = (&result.corrected_nt, result.n_errors) {
            self.corrected_records += 1;
            self.bases += corrected.len();
            self.corrected_bases += n;
        }
    }

    /// Sequencing error rate of the run: the number of flagged bases,
    /// rescaled by the precision and recall of the default threshold.
    ///```
    /// use igcorrect::batch::BatchSummary;
    ///let summary = BatchSummary { bases: 1000, corrected_bases: 4, ..Default::default() };
    ///let rate = summary.estimated_error_rate().unwrap();
    ///assert!((rate - 4. * 0.663 / 0.448 / 1000.).abs() < 1e-12);
    ///assert_eq!(BatchSummary::default().estimated_error_rate(), None);
    ///```
    pub fn estimated_error_rate(&self) -> Option<f64> {
        if self.bases == 0 {
            return None;
        }
        Some(
            (self.corrected_bases as f64 * OPTIMIZED_PRECISION / OPTIMIZED_RECALL)
                / self.bases as f64,
        )
    }
}

pub struct BatchRunner<'a> {
    options: &'a Options,
    protocol: AnnotationProtocol<'a>,
    pool: ThreadPool,
    // off unless the caller writes the report to a file
    progress: bool,
}

impl<'a> BatchRunner<'a> {
    pub fn new(options: &'a Options, matcher: Option<&'a dyn GermlineMatcher>) -> Result<Self> {
        options.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(options.num_threads())
            .build()
            .context("Unable to start the worker threads")?;
        Ok(BatchRunner {
            options,
            protocol: AnnotationProtocol::new(options, matcher),
            pool,
            progress: false,
        })
    }

    /// Show a progress bar on stderr (only with `verbose >= 1`)
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn shows_progress(&self) -> bool {
        self.progress && self.options.verbose >= 1
    }

    pub fn protocol(&self) -> &AnnotationProtocol<'a> {
        &self.protocol
    }

    /// Annotate every entry of `source` and hand the rows to `sink` in input
    /// order. Only a failing source or sink stops the run.
    pub fn run<I>(&self, source: I, sink: &mut dyn RowSink) -> Result<BatchSummary>
    where
        I: Iterator<Item = Result<Entry>>,
    {
        let mut source = source;
        let mut summary = BatchSummary::default();

        #[cfg(feature = "kdam")]
        let mut progress = self
            .shows_progress()
            .then(|| tqdm!(desc = "Correcting", unit = " reads"));

        loop {
            let chunk = source
                .by_ref()
                .take(self.options.chunk_size)
                .collect::<Result<Vec<Entry>>>()?;
            if chunk.is_empty() {
                break;
            }
            let results: Vec<AnnotationResult> = self.pool.install(|| {
                chunk
                    .par_iter()
                    .map(|entry| self.protocol.process(entry))
                    .collect()
            });
            for result in &results {
                summary.add(result);
                sink.write_result(result)?;
            }

            #[cfg(feature = "kdam")]
            if let Some(pb) = progress.as_mut() {
                pb.update(chunk.len())?;
            }
        }
        sink.finish()?;

        #[cfg(feature = "kdam")]
        if let Some(pb) = progress.as_mut() {
            pb.refresh()?;
            eprintln!();
        }

        info!(
            "{} records, {} with a V gene, {} corrected, {} not processed",
            summary.records, summary.annotated, summary.corrected_records, summary.degraded
        );
        if let Some(rate) = summary.estimated_error_rate() {
            info!(
                "{} bases flagged as errors out of {}, estimated error rate {:.3e}",
                summary.corrected_bases, summary.bases, rate
            );
        }
        Ok(summary)
    }
}
