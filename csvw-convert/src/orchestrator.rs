//! Chunk orchestration: sequential, parallel, and parallel-with-fallback
//!
//! Parallel mode runs one feeder thread that chunks the row stream into a
//! bounded channel, and `workers` threads that each own a [`RowProcessor`],
//! encode their chunk to bytes, and send it back keyed by chunk index. The
//! orchestrating thread reorders with a `BTreeMap` and only writes once every
//! chunk has arrived, so a structural failure leaves the output untouched
//! and the whole job is rerun sequentially.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::mpsc::{sync_channel, Receiver};
use std::sync::Arc;
use std::thread;

use csvw_graph_format::{QuadEncoder, StreamWriter};
use csvw_graph_ir::Term;
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::{ConvertError, ParallelExecutionError, Result, SourceError};
use crate::processor::{ConversionStats, RowProcessor};
use crate::row::{Chunk, Chunker, RowSource};
use crate::schema::Schema;

/// How a job actually ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    Sequential,
    Parallel,
    /// Parallel attempt failed structurally and the job was rerun sequentially
    FallbackSequential,
}

/// Result of running all chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: ExecutionMode,
    pub chunks: usize,
    pub stats: ConversionStats,
}

type ChunkResult = (usize, std::result::Result<Vec<u8>, ParallelExecutionError>, ConversionStats);

pub struct Orchestrator {
    schema: Arc<Schema>,
    graph: Option<Term>,
    encoder: QuadEncoder,
    workers: usize,
    chunk_size: usize,
}

impl Orchestrator {
    pub fn new(
        schema: Arc<Schema>,
        graph: Option<Term>,
        encoder: QuadEncoder,
        workers: usize,
        chunk_size: usize,
    ) -> Result<Self> {
        if workers == 0 {
            return Err(ConvertError::Config("worker count must be at least 1".into()));
        }
        if chunk_size == 0 {
            return Err(ConvertError::Config("chunk size must be at least 1".into()));
        }
        Ok(Self {
            schema,
            graph,
            encoder,
            workers,
            chunk_size,
        })
    }

    /// Convert every chunk of `source` and write the bodies to `out` in
    /// chunk order
    pub fn run<W: Write>(
        &self,
        source: &dyn RowSource,
        out: &mut StreamWriter<W>,
    ) -> Result<RunSummary> {
        if self.workers == 1 {
            tracing::info!(chunk_size = self.chunk_size, "converting sequentially");
            return self.run_sequential(source, out, ExecutionMode::Sequential);
        }

        tracing::info!(
            workers = self.workers,
            chunk_size = self.chunk_size,
            "converting in parallel"
        );
        match self.run_parallel(source) {
            Ok((bodies, stats)) => {
                for body in &bodies {
                    out.write_encoded(body)?;
                }
                Ok(RunSummary {
                    mode: ExecutionMode::Parallel,
                    chunks: bodies.len(),
                    stats,
                })
            }
            Err(error) => {
                tracing::error!(error = %error, "parallel conversion failed; rerunning sequentially");
                self.run_sequential(source, out, ExecutionMode::FallbackSequential)
            }
        }
    }

    fn run_sequential<W: Write>(
        &self,
        source: &dyn RowSource,
        out: &mut StreamWriter<W>,
        mode: ExecutionMode,
    ) -> Result<RunSummary> {
        let mut processor = RowProcessor::new(Arc::clone(&self.schema), self.graph.clone());
        let mut stats = ConversionStats::default();
        let mut chunks = 0;

        for chunk in Chunker::new(source.open()?, self.chunk_size) {
            let chunk = chunk?;
            let (dataset, chunk_stats) = processor.process_chunk(&chunk);
            out.write_quads(dataset.quads())?;
            stats.merge(&chunk_stats);
            chunks += 1;
            tracing::debug!(chunk = chunk.index(), statements = chunk_stats.statements, "chunk written");
        }

        Ok(RunSummary {
            mode,
            chunks,
            stats,
        })
    }

    /// Encoded chunk bodies in chunk order, or the first structural failure
    pub(crate) fn run_parallel(
        &self,
        source: &dyn RowSource,
    ) -> std::result::Result<(Vec<Vec<u8>>, ConversionStats), ParallelExecutionError> {
        let capacity = self.workers * 2;

        thread::scope(|scope| {
            let (chunk_tx, chunk_rx) = sync_channel::<Chunk>(capacity);
            let chunk_rx: Arc<Mutex<Receiver<Chunk>>> = Arc::new(Mutex::new(chunk_rx));
            let (result_tx, result_rx) = sync_channel::<ChunkResult>(capacity);
            let chunk_size = self.chunk_size;

            let feeder = thread::Builder::new()
                .name("csvw-feeder".to_string())
                .spawn_scoped(scope, move || -> std::result::Result<usize, SourceError> {
                    let mut sent = 0;
                    for chunk in Chunker::new(source.open()?, chunk_size) {
                        if chunk_tx.send(chunk?).is_err() {
                            break;
                        }
                        sent += 1;
                    }
                    Ok(sent)
                })
                .map_err(|e| ParallelExecutionError::Spawn(e.to_string()))?;

            let mut failure: Option<ParallelExecutionError> = None;
            let mut handles = Vec::with_capacity(self.workers);
            for worker in 0..self.workers {
                let chunk_rx = Arc::clone(&chunk_rx);
                let result_tx = result_tx.clone();
                let schema = Arc::clone(&self.schema);
                let graph = self.graph.clone();
                let encoder = self.encoder.clone();
                let name = format!("csvw-worker-{}", worker);

                let spawned = thread::Builder::new()
                    .name(name.clone())
                    .spawn_scoped(scope, move || {
                        let mut processor = RowProcessor::new(schema, graph);
                        loop {
                            let next = chunk_rx.lock().recv();
                            let Ok(chunk) = next else { break };
                            let (dataset, stats) = processor.process_chunk(&chunk);
                            let body = encoder.encode(dataset.quads()).map_err(|e| {
                                ParallelExecutionError::Encode {
                                    index: chunk.index(),
                                    message: e.to_string(),
                                }
                            });
                            if result_tx.send((chunk.index(), body, stats)).is_err() {
                                break;
                            }
                        }
                    });
                match spawned {
                    Ok(handle) => handles.push((name, handle)),
                    Err(e) => {
                        failure = Some(ParallelExecutionError::Spawn(e.to_string()));
                        break;
                    }
                }
            }
            // Workers hold the only remaining handles: if they all exit, the
            // feeder's sends fail and the result loop ends.
            drop(chunk_rx);
            drop(result_tx);

            let mut pending: BTreeMap<usize, Vec<u8>> = BTreeMap::new();
            let mut stats = ConversionStats::default();
            if failure.is_none() {
                for (index, body, chunk_stats) in result_rx.iter() {
                    match body {
                        Ok(body) => {
                            tracing::debug!(chunk = index, statements = chunk_stats.statements, "chunk converted");
                            pending.insert(index, body);
                            stats.merge(&chunk_stats);
                        }
                        Err(e) => {
                            failure = Some(e);
                            break;
                        }
                    }
                }
            }
            drop(result_rx);

            for (name, handle) in handles {
                if handle.join().is_err() && failure.is_none() {
                    failure = Some(ParallelExecutionError::WorkerPanicked(name));
                }
            }
            let expected = match feeder.join() {
                Ok(Ok(sent)) => sent,
                Ok(Err(e)) => {
                    failure.get_or_insert(ParallelExecutionError::Source(e));
                    0
                }
                Err(_) => {
                    failure.get_or_insert(ParallelExecutionError::WorkerPanicked(
                        "csvw-feeder".to_string(),
                    ));
                    0
                }
            };
            if let Some(error) = failure {
                return Err(error);
            }

            let mut bodies = Vec::with_capacity(expected);
            for index in 0..expected {
                let body = pending
                    .remove(&index)
                    .ok_or(ParallelExecutionError::MissingChunk(index))?;
                bodies.push(body);
            }
            Ok((bodies, stats))
        })
    }
}
