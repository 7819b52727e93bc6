//! Sequential stream runner: the pipeline composition root.

use std::collections::BTreeMap;

use stream_api::MetricSpec;
use stream_spi::{ModelPort, OutputSink, RecordSource, Result, ShiftedResult};

use crate::metrics::MetricsWindow;
use crate::shifter::InferenceShifter;

const PROGRESS_EVERY: u64 = 100;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Records processed.
    pub records: u64,
    /// Final snapshot of every rolling metric.
    pub metrics: BTreeMap<String, f64>,
}

/// Drives source → model → shifter → metrics → sink, one record at a
/// time, fully sequentially.
///
/// On stream exhaustion the sink is closed and a summary returned. On
/// any fatal error the sink is still closed best-effort, so already
/// buffered output is flushed before the error propagates.
pub struct StreamRunner<S: RecordSource, M: ModelPort> {
    source: S,
    model: M,
    sink: Box<dyn OutputSink>,
    shifter: InferenceShifter,
    metrics: MetricsWindow,
    align: bool,
}

impl<S: RecordSource, M: ModelPort> StreamRunner<S, M> {
    pub fn new(source: S, model: M, sink: Box<dyn OutputSink>) -> Self {
        Self {
            source,
            model,
            sink,
            shifter: InferenceShifter::new(1),
            metrics: MetricsWindow::new(Vec::new()),
            align: true,
        }
    }

    /// Set the horizon whose predictions are emitted.
    pub fn with_primary_horizon(mut self, horizon: usize) -> Self {
        self.shifter = InferenceShifter::new(horizon);
        self
    }

    /// Configure rolling error metrics.
    pub fn with_metrics(mut self, specs: Vec<MetricSpec>) -> Self {
        self.metrics = MetricsWindow::new(specs);
        self
    }

    /// Enable or disable inference alignment. When disabled, raw
    /// (future-step) predictions are emitted as-is.
    pub fn with_alignment(mut self, align: bool) -> Self {
        self.align = align;
        self
    }

    /// Run the pipeline to exhaustion.
    pub fn run(mut self) -> Result<RunSummary> {
        let outcome = self.process_all();
        match outcome {
            Ok(summary) => {
                self.sink.close()?;
                tracing::info!(records = summary.records, "stream exhausted");
                Ok(summary)
            }
            Err(e) => {
                // Flush whatever the sink has buffered before failing.
                let _ = self.sink.close();
                Err(e)
            }
        }
    }

    fn process_all(&mut self) -> Result<RunSummary> {
        let mut count: u64 = 0;
        while let Some(record) = self.source.next_record()? {
            count += 1;
            if count % PROGRESS_EVERY == 0 {
                tracing::info!(records = count, "read records");
            }

            let result = self.model.run(&record)?;

            let shifted = if self.align {
                self.shifter.shift(&record, &result)
            } else {
                let horizon = self.shifter.primary_horizon();
                let raw = result.prediction(horizon).unwrap_or(record.target);
                ShiftedResult::unaligned(&record, raw, result.anomaly_score)
            };

            self.metrics.update(&shifted);
            self.sink.write(&shifted.to_output())?;
        }

        Ok(RunSummary {
            records: count,
            metrics: self.metrics.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::sync::{Arc, Mutex};
    use stream_api::{ErrorKind, MetricSpec};
    use stream_spi::{
        FieldKind, FieldSpec, InferenceResult, OutputRecord, Record, Schema, StreamError,
        DATE_FORMAT,
    };

    struct VecSource {
        schema: Schema,
        records: Vec<Record>,
        cursor: usize,
        fail_at: Option<usize>,
    }

    impl VecSource {
        fn new(targets: &[f64]) -> Self {
            let base =
                NaiveDateTime::parse_from_str("2017-08-24 03:00:00", DATE_FORMAT).unwrap();
            let fields = vec![
                FieldSpec::new("timestamp", FieldKind::DateTime),
                FieldSpec::new("class", FieldKind::Float),
            ];
            let schema = Schema::new(fields, 0, "class").unwrap();
            let records = targets
                .iter()
                .enumerate()
                .map(|(i, &t)| {
                    Record::new(base + chrono::Duration::seconds(i as i64), vec![], t)
                })
                .collect();
            Self {
                schema,
                records,
                cursor: 0,
                fail_at: None,
            }
        }
    }

    impl RecordSource for VecSource {
        fn schema(&self) -> &Schema {
            &self.schema
        }

        fn next_record(&mut self) -> stream_spi::Result<Option<Record>> {
            if Some(self.cursor) == self.fail_at {
                return Err(StreamError::MalformedRecord {
                    line: self.cursor as u64,
                    reason: "injected".to_string(),
                });
            }
            let record = self.records.get(self.cursor).cloned();
            self.cursor += 1;
            Ok(record)
        }
    }

    /// Predicts next target = current target, horizon 1, score 0.
    struct EchoModel;

    impl ModelPort for EchoModel {
        fn run(&mut self, record: &Record) -> stream_spi::Result<InferenceResult> {
            Ok(InferenceResult::single(1, record.target, 0.0))
        }
    }

    /// Sink wrapper sharing its record log with the test.
    struct SharedSink {
        records: Arc<Mutex<Vec<OutputRecord>>>,
        closed: Arc<Mutex<bool>>,
    }

    impl OutputSink for SharedSink {
        fn write(&mut self, record: &OutputRecord) -> stream_spi::Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        fn close(&mut self) -> stream_spi::Result<()> {
            *self.closed.lock().unwrap() = true;
            Ok(())
        }
    }

    fn shared_sink() -> (SharedSink, Arc<Mutex<Vec<OutputRecord>>>, Arc<Mutex<bool>>) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(Mutex::new(false));
        let sink = SharedSink {
            records: records.clone(),
            closed: closed.clone(),
        };
        (sink, records, closed)
    }

    #[test]
    fn test_end_to_end_five_record_scenario() {
        let source = VecSource::new(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let (sink, records, closed) = shared_sink();

        let summary = StreamRunner::new(source, EchoModel, Box::new(sink))
            .with_metrics(vec![MetricSpec::new("class", ErrorKind::AbsoluteError, 10)])
            .run()
            .unwrap();

        assert_eq!(summary.records, 5);
        assert!(*closed.lock().unwrap());

        let written = records.lock().unwrap();
        assert_eq!(written.len(), 5);
        let predictions: Vec<f64> = written[1..].iter().map(|r| r.prediction).collect();
        let actuals: Vec<f64> = written[1..].iter().map(|r| r.actual).collect();
        assert_eq!(predictions, vec![10.0, 20.0, 30.0, 40.0]);
        assert_eq!(actuals, vec![20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_output_order_matches_input_order() {
        let targets: Vec<f64> = (0..200).map(|i| i as f64).collect();
        let source = VecSource::new(&targets);
        let (sink, records, _) = shared_sink();

        StreamRunner::new(source, EchoModel, Box::new(sink))
            .run()
            .unwrap();

        let written = records.lock().unwrap();
        assert_eq!(written.len(), targets.len());
        for pair in written.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        for (i, record) in written.iter().enumerate() {
            assert_eq!(record.actual, i as f64);
        }
    }

    #[test]
    fn test_fatal_source_error_still_closes_sink() {
        let mut source = VecSource::new(&[1.0, 2.0, 3.0]);
        source.fail_at = Some(2);
        let (sink, records, closed) = shared_sink();

        let err = StreamRunner::new(source, EchoModel, Box::new(sink))
            .run()
            .unwrap_err();

        assert!(matches!(err, StreamError::MalformedRecord { .. }));
        assert!(*closed.lock().unwrap(), "sink must be closed on fatal error");
        assert_eq!(records.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_model_failure_is_fatal_and_closes_sink() {
        struct FailingModel;
        impl ModelPort for FailingModel {
            fn run(&mut self, _: &Record) -> stream_spi::Result<InferenceResult> {
                Err(StreamError::Model("boom".to_string()))
            }
        }

        let source = VecSource::new(&[1.0, 2.0]);
        let (sink, _, closed) = shared_sink();

        let err = StreamRunner::new(source, FailingModel, Box::new(sink))
            .run()
            .unwrap_err();
        assert!(matches!(err, StreamError::Model(_)));
        assert!(*closed.lock().unwrap());
    }

    #[test]
    fn test_alignment_disabled_emits_raw_predictions() {
        let source = VecSource::new(&[10.0, 20.0, 30.0]);
        let (sink, records, _) = shared_sink();

        StreamRunner::new(source, EchoModel, Box::new(sink))
            .with_alignment(false)
            .run()
            .unwrap();

        let written = records.lock().unwrap();
        // Raw one-step-ahead predictions: each row predicts itself.
        for record in written.iter() {
            assert_eq!(record.prediction, record.actual);
        }
    }

    #[test]
    fn test_summary_carries_final_metric_snapshot() {
        let source = VecSource::new(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let (sink, _, _) = shared_sink();

        let summary = StreamRunner::new(source, EchoModel, Box::new(sink))
            .with_metrics(vec![MetricSpec::new("class", ErrorKind::AbsoluteError, 10)])
            .run()
            .unwrap();

        // Errors: cold start 0, then |20-10|, |30-20|, |40-30|, |50-40|.
        let aae = summary.metrics["aae:window=10:field=class"];
        assert!((aae - 8.0).abs() < 1e-12);
    }
}
