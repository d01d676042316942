use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::QuizConfig;
use crate::error::{ConfigError, QuizError, QuizResult};
use crate::quiz::shuffle::{shuffle, shuffled};
use crate::quiz::view::{progress_label, QuizView};
use crate::quiz::{Question, QuestionSet};
use crate::store::{HighScoreStore, KeyValueStore};
use crate::timer::{CountdownId, Scheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InProgress { revealed: bool },
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::InProgress { revealed: false } => write!(f, "waiting for an answer"),
            Phase::InProgress { revealed: true } => write!(f, "showing the answer"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub current_index: usize,
    pub score: u32,
    pub time_remaining: u32,
}

/// The question currently on screen.
#[derive(Debug, Clone)]
struct Round {
    choices: Vec<String>,
    correct_choice: String,
}

pub struct QuizController<V, S, T> {
    questions: QuestionSet,
    config: QuizConfig,
    view: V,
    high_scores: HighScoreStore<S>,
    scheduler: T,
    rng: StdRng,
    phase: Phase,
    session: Session,
    round: Option<Round>,
    countdown: Option<CountdownId>,
    last_countdown: CountdownId,
}

impl<V, S, T> QuizController<V, S, T>
where
    V: QuizView,
    S: KeyValueStore,
    T: Scheduler,
{
    pub fn new(
        questions: QuestionSet,
        config: QuizConfig,
        view: V,
        store: S,
        scheduler: T,
    ) -> QuizResult<Self> {
        if config.time_limit_secs == 0 {
            return Err(ConfigError::NotPositive {
                name: "time_limit_secs",
                value: "0".to_string(),
            }
            .into());
        }
        if config.tick_period.is_zero() {
            return Err(ConfigError::NotPositive {
                name: "tick_period",
                value: format!("{:?}", config.tick_period),
            }
            .into());
        }

        let high_scores = HighScoreStore::new(store, config.high_score_key.clone());
        Ok(Self {
            questions,
            config,
            view,
            high_scores,
            scheduler,
            rng: StdRng::from_entropy(),
            phase: Phase::Idle,
            session: Session::default(),
            round: None,
            countdown: None,
            last_countdown: CountdownId::default(),
        })
    }

    /// Replaces the random source, e.g. with a seeded one for reproducible runs.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn start(&mut self) -> QuizResult<()> {
        match self.phase {
            Phase::Idle | Phase::Finished => {
                self.begin();
                Ok(())
            }
            phase => Err(QuizError::InvalidTransition {
                operation: "start",
                phase,
            }),
        }
    }

    pub fn restart(&mut self) -> QuizResult<()> {
        match self.phase {
            Phase::Finished => {
                self.begin();
                Ok(())
            }
            phase => Err(QuizError::InvalidTransition {
                operation: "restart",
                phase,
            }),
        }
    }

    /// Scores `choice` against the current question. `None` is the timeout
    /// submission. Text that is not among the displayed choices counts as wrong.
    pub fn select_answer(&mut self, choice: Option<&str>) -> QuizResult<()> {
        if self.phase != (Phase::InProgress { revealed: false }) {
            return Err(QuizError::InvalidTransition {
                operation: "select_answer",
                phase: self.phase,
            });
        }
        self.cancel_countdown();

        // `round` is set whenever the phase is InProgress.
        let Some(round) = self.round.as_ref() else {
            log::warn!("No question on screen to answer, ending the quiz");
            self.finish();
            return Ok(());
        };

        let correct = choice == Some(round.correct_choice.as_str());
        if correct {
            self.session.score += 1;
        }
        log::debug!(
            "Question #{} answered {:?}: {}",
            self.session.current_index + 1,
            choice,
            if correct { "correct" } else { "wrong" }
        );

        self.view.on_answer_revealed(choice, &round.correct_choice);
        self.phase = Phase::InProgress { revealed: true };
        Ok(())
    }

    pub fn advance(&mut self) -> QuizResult<()> {
        if self.phase != (Phase::InProgress { revealed: true }) {
            return Err(QuizError::InvalidTransition {
                operation: "advance",
                phase: self.phase,
            });
        }
        self.cancel_countdown();

        self.session.current_index += 1;
        if self.session.current_index < self.questions.len() {
            self.phase = Phase::InProgress { revealed: false };
            self.present_question();
        } else {
            self.finish();
        }
        Ok(())
    }

    /// Countdown tick from the scheduler. Ticks of anything but the active
    /// countdown are dropped.
    pub fn tick(&mut self, id: CountdownId) {
        if self.countdown != Some(id) {
            log::debug!("Dropping stale tick from {}", id);
            return;
        }

        self.session.time_remaining = self.session.time_remaining.saturating_sub(1);
        self.view.on_tick(self.session.time_remaining);

        if self.session.time_remaining == 0 {
            self.cancel_countdown();
            log::debug!("Question #{} timed out", self.session.current_index + 1);
            self.view.on_timed_out();
            if let Err(err) = self.select_answer(None) {
                log::warn!("Timeout submission rejected: {}", err);
            }
        }
    }

    /// Stops the active countdown without touching the session. Used when the host shuts down.
    pub(crate) fn halt(&mut self) {
        self.cancel_countdown();
    }

    fn begin(&mut self) {
        self.cancel_countdown();
        shuffle(self.questions.as_mut_slice(), &mut self.rng);
        self.session = Session::default();
        self.round = None;
        self.view.on_session_reset();

        log::info!("Starting quiz with {} questions", self.questions.len());
        self.phase = Phase::InProgress { revealed: false };
        self.present_question();
    }

    fn present_question(&mut self) {
        let index = self.session.current_index;
        let total = self.questions.len();
        let prompt = match self.questions.get(index) {
            Some(question) => {
                // Shuffle a copy, the stored question keeps its own order.
                self.round = Some(Round {
                    choices: shuffled(&question.choices, &mut self.rng),
                    correct_choice: question.correct_choice.clone(),
                });
                question.prompt.clone()
            }
            // Callers only present indices below `questions.len()`.
            None => {
                log::warn!("Question #{} is out of range, ending the quiz", index + 1);
                self.finish();
                return;
            }
        };

        self.start_countdown();

        let progress = progress_label(index, total);
        let choices = self
            .round
            .as_ref()
            .map(|round| round.choices.as_slice())
            .unwrap_or_default();
        self.view.on_question_rendered(&prompt, choices, &progress);
        self.view.on_tick(self.session.time_remaining);
    }

    fn finish(&mut self) {
        self.cancel_countdown();
        self.round = None;
        self.phase = Phase::Finished;
        self.show_result();
    }

    fn show_result(&mut self) {
        let score = self.session.score;
        let stored = self.high_scores.get();
        let high_score = if score > stored {
            self.high_scores.set(score);
            log::info!("New high score {} (was {})", score, stored);
            score
        } else {
            stored
        };

        log::info!(
            "Quiz finished with {} of {} correct",
            score,
            self.questions.len()
        );
        self.view
            .on_result(score, self.questions.len(), high_score);
    }

    fn start_countdown(&mut self) {
        self.cancel_countdown();
        let id = self.last_countdown.next();
        self.last_countdown = id;
        self.countdown = Some(id);
        self.session.time_remaining = self.config.time_limit_secs;
        self.scheduler.start(id, self.config.tick_period);
    }

    fn cancel_countdown(&mut self) {
        if let Some(id) = self.countdown.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl<V, S, T> QuizController<V, S, T> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.session.time_remaining
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    /// The question on screen, if any.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::InProgress { .. } => self.questions.get(self.session.current_index),
            _ => None,
        }
    }

    /// The current question's choices in the order they were displayed.
    pub fn displayed_choices(&self) -> &[String] {
        self.round
            .as_ref()
            .map(|round| round.choices.as_slice())
            .unwrap_or_default()
    }

    pub fn active_countdown(&self) -> Option<CountdownId> {
        self.countdown
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn high_scores(&self) -> &HighScoreStore<S> {
        &self.high_scores
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }
}
