use crate::batch::Batcher;
use crate::config::{OutputPolicy, RunConfig};
use crate::error::PipelineError;
use crate::format;
use crate::lookup::{reconcile, BulkLookupClient, HashLookup};
use crate::reader::LineReader;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::num::NonZeroUsize;

/// Where the driver is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Nothing written yet.
    Init,
    /// Header written; batches are being submitted.
    Streaming,
    /// All input processed and output flushed.
    Complete,
    /// A batch or I/O failure stopped the run. Terminal.
    Aborted,
}

/// Counters for a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub records: usize,
    pub found: usize,
    pub not_found: usize,
    pub rows_written: usize,
}

/// Feeds batches of input hashes through a [`HashLookup`] and writes the
/// report. One batch is in flight at a time; the first failure ends the run.
pub struct Driver<L, W> {
    lookup: L,
    output: W,
    policy: OutputPolicy,
    batch_size: NonZeroUsize,
    state: DriverState,
}

impl<L: HashLookup, W: Write> Driver<L, W> {
    pub fn new(config: &RunConfig, lookup: L, output: W) -> Self {
        Self {
            lookup,
            output,
            policy: config.policy,
            batch_size: config.batch_size,
            state: DriverState::Init,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Give back the output sink, e.g. to inspect what was written.
    pub fn into_output(self) -> W {
        self.output
    }

    pub async fn run<R: BufRead>(&mut self, input: R) -> Result<RunSummary, PipelineError> {
        let outcome = self.stream(input).await;
        self.state = match outcome {
            Ok(_) => DriverState::Complete,
            Err(_) => DriverState::Aborted,
        };
        if outcome.is_err() {
            // Rows from earlier batches must reach the sink before we bail.
            if let Err(e) = self.output.flush() {
                tracing::warn!(error = %e, "failed to flush output after abort");
            }
        }
        outcome
    }

    async fn stream<R: BufRead>(&mut self, input: R) -> Result<RunSummary, PipelineError> {
        self.write_line(self.policy.header())?;
        self.state = DriverState::Streaming;
        tracing::info!(
            policy = ?self.policy,
            batch_size = self.batch_size.get(),
            "starting processing"
        );

        let mut summary = RunSummary::default();
        let batches = Batcher::new(LineReader::new(input), self.batch_size);

        for (index, batch) in batches.enumerate() {
            let number = index + 1;
            let batch = batch.map_err(PipelineError::Read)?;

            let results = match self.lookup.submit(&batch).await {
                Ok(results) => reconcile(&batch, &results).map(|_| results),
                Err(e) => Err(e),
            };
            let results = results.map_err(|source| {
                tracing::error!(
                    batch = number,
                    size = batch.len(),
                    kind = source.kind(),
                    error = %source,
                    "bulk lookup failed"
                );
                PipelineError::Lookup {
                    batch: number,
                    source,
                }
            })?;

            for result in &results {
                if result.exists {
                    summary.found += 1;
                } else {
                    summary.not_found += 1;
                }
                if let Some(row) = format::render(result, self.policy) {
                    self.write_line(&row)?;
                    summary.rows_written += 1;
                }
            }

            summary.batches += 1;
            summary.records += batch.len();
            tracing::debug!(
                batch = number,
                size = batch.len(),
                results = results.len(),
                "batch processed"
            );
        }

        self.output.flush().map_err(PipelineError::Write)?;
        tracing::info!(
            batches = summary.batches,
            records = summary.records,
            found = summary.found,
            not_found = summary.not_found,
            rows = summary.rows_written,
            "processing complete"
        );
        Ok(summary)
    }

    fn write_line(&mut self, line: &str) -> Result<(), PipelineError> {
        writeln!(self.output, "{}", line).map_err(PipelineError::Write)
    }
}

/// Run the whole pipeline against the files and server named in `config`.
pub async fn run_files(config: &RunConfig) -> Result<RunSummary, PipelineError> {
    let client = BulkLookupClient::new(config).map_err(PipelineError::Client)?;
    tracing::debug!(url = client.url(), "using lookup endpoint");

    let input = File::open(&config.input).map_err(|source| PipelineError::OpenInput {
        path: config.input.clone(),
        source,
    })?;
    let output = File::create(&config.output).map_err(|source| PipelineError::CreateOutput {
        path: config.output.clone(),
        source,
    })?;

    let mut driver = Driver::new(config, client, BufWriter::new(output));
    driver.run(BufReader::new(input)).await
}
