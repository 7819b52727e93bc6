//! Live chart output sink.

use std::collections::VecDeque;
use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use stream_spi::{OutputRecord, OutputSink, Result, StreamError, DATE_FORMAT};

use crate::chart::{anomaly_chart, transaction_chart};

/// Points retained for the rolling chart window.
const DEFAULT_CAPACITY: usize = 600;
/// Writes between redraws.
const DEFAULT_REDRAW_EVERY: usize = 5;

fn sink_err(e: impl std::fmt::Display) -> StreamError {
    StreamError::Sink(e.to_string())
}

/// Output sink that renders the stream as a live terminal chart.
///
/// Every write lands in the rolling point buffer (bounded; oldest
/// points dropped); redraws are throttled to every N writes, so
/// visualization may lag but no point is lost between redraws.
/// `close` forces a final redraw and restores the terminal.
pub struct PlotOutput<B: Backend> {
    terminal: Terminal<B>,
    dataset: String,
    points: VecDeque<OutputRecord>,
    capacity: usize,
    redraw_every: usize,
    since_redraw: usize,
    /// Total writes accepted; x-coordinate of the next point.
    total: u64,
    manage_terminal: bool,
    closed: bool,
}

impl PlotOutput<CrosstermBackend<Stdout>> {
    /// Take over the terminal (raw mode, alternate screen) and chart
    /// into it.
    pub fn new(dataset: &str) -> Result<Self> {
        enable_raw_mode().map_err(sink_err)?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(sink_err)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(sink_err)?;
        Ok(Self::build(terminal, dataset, true))
    }
}

impl<B: Backend> PlotOutput<B> {
    /// Chart into a caller-supplied terminal; the caller keeps
    /// responsibility for terminal modes. Used with a test backend.
    pub fn with_terminal(terminal: Terminal<B>, dataset: &str) -> Self {
        Self::build(terminal, dataset, false)
    }

    fn build(terminal: Terminal<B>, dataset: &str, manage_terminal: bool) -> Self {
        Self {
            terminal,
            dataset: dataset.to_string(),
            points: VecDeque::with_capacity(DEFAULT_CAPACITY),
            capacity: DEFAULT_CAPACITY,
            redraw_every: DEFAULT_REDRAW_EVERY,
            since_redraw: 0,
            total: 0,
            manage_terminal,
            closed: false,
        }
    }

    /// Rolling buffer length (points kept on screen).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Redraw cadence in writes (1 = every write).
    pub fn with_redraw_every(mut self, every: usize) -> Self {
        self.redraw_every = every.max(1);
        self
    }

    /// Points currently buffered.
    pub fn buffered(&self) -> usize {
        self.points.len()
    }

    /// Total writes accepted.
    pub fn writes(&self) -> u64 {
        self.total
    }

    fn redraw(&mut self) -> Result<()> {
        // Index of the oldest buffered point in the whole stream.
        let start = self.total - self.points.len() as u64;

        let mut actual = Vec::with_capacity(self.points.len());
        let mut predicted = Vec::with_capacity(self.points.len());
        let mut scores = Vec::with_capacity(self.points.len());
        for (i, point) in self.points.iter().enumerate() {
            let x = (start + i as u64) as f64;
            actual.push((x, point.actual));
            predicted.push((x, point.prediction));
            scores.push((x, point.anomaly_score));
        }

        let title = match self.points.back() {
            Some(last) => format!(
                "{} | {}",
                self.dataset,
                last.timestamp.format(DATE_FORMAT)
            ),
            None => self.dataset.clone(),
        };

        self.terminal
            .draw(|frame| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(10), Constraint::Length(8)])
                    .split(frame.area());
                frame.render_widget(transaction_chart(&actual, &predicted, &title), chunks[0]);
                frame.render_widget(anomaly_chart(&scores), chunks[1]);
            })
            .map_err(sink_err)?;
        Ok(())
    }

    fn restore(&mut self) {
        if self.manage_terminal {
            let _ = disable_raw_mode();
            // manage_terminal is only set by the stdout constructor, so
            // the escape goes to stdout rather than the generic backend.
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = self.terminal.show_cursor();
        }
    }
}

impl<B: Backend + Send> OutputSink for PlotOutput<B> {
    fn write(&mut self, record: &OutputRecord) -> Result<()> {
        if self.closed {
            return Err(StreamError::Sink("write after close".to_string()));
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(record.clone());
        self.total += 1;

        self.since_redraw += 1;
        if self.since_redraw >= self.redraw_every {
            self.redraw()?;
            self.since_redraw = 0;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        // Show whatever arrived since the last throttled redraw.
        self.redraw()?;
        self.restore();
        self.closed = true;
        Ok(())
    }
}

impl<B: Backend> Drop for PlotOutput<B> {
    fn drop(&mut self) {
        if !self.closed {
            self.restore();
        }
    }
}
