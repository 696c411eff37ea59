use crate::prelude::{GprResult, SweepConfig};
use crate::telemetry::log::LogManager;
use tokio::sync::mpsc::UnboundedSender;

/// Position within the cyclic frequency schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepState {
    pub current_step_index: usize,
    pub samples_into_step: usize,
}

/// Cyclic generator producing the sweep frequency for every incoming sample.
///
/// The incremental counters avoid recomputing the schedule per sample; the
/// observable output matches [`frequency_at`](Self::frequency_at) for every
/// cumulative sample index. The sequence never terminates; the caller stops
/// pacing it, and a restart means building a fresh sequencer.
pub struct FrequencyStepSequencer {
    frequencies: Vec<f64>,
    dwell_samples: usize,
    state: StepState,
    step_tx: Option<UnboundedSender<f64>>,
    logger: LogManager,
}

impl FrequencyStepSequencer {
    pub fn new(config: &SweepConfig) -> GprResult<Self> {
        config.validate()?;
        Ok(Self {
            frequencies: config.frequencies(),
            dwell_samples: config.dwell_samples(),
            state: StepState {
                current_step_index: 0,
                samples_into_step: 0,
            },
            step_tx: None,
            logger: LogManager::new(),
        })
    }

    /// Attach a channel that receives the new frequency on every step advance.
    ///
    /// The reference oscillator is the intended consumer; the message is the
    /// bare frequency in Hz.
    pub fn with_notifier(mut self, step_tx: UnboundedSender<f64>) -> Self {
        self.step_tx = Some(step_tx);
        self
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    /// Frequency for the next incoming sample, advancing the internal state.
    pub fn next_frequency(&mut self) -> f64 {
        if self.state.samples_into_step >= self.dwell_samples {
            self.state.current_step_index =
                (self.state.current_step_index + 1) % self.frequencies.len();
            self.state.samples_into_step = 0;
            let frequency = self.frequencies[self.state.current_step_index];
            if let Some(step_tx) = &self.step_tx {
                if step_tx.send(frequency).is_err() {
                    self.logger.detail("step-change listener dropped");
                }
            }
        }
        self.state.samples_into_step += 1;
        self.frequencies[self.state.current_step_index]
    }

    /// Pure restart-safe form: the frequency at cumulative sample index `n`.
    pub fn frequency_at(&self, n: u64) -> f64 {
        let step = (n / self.dwell_samples as u64) % self.frequencies.len() as u64;
        self.frequencies[step as usize]
    }

    /// Block-paced variant; a step transition inside the block is carried
    /// across calls without loss or double counting.
    pub fn fill_block(&mut self, out: &mut [f64]) {
        for slot in out.iter_mut() {
            *slot = self.next_frequency();
        }
    }
}
