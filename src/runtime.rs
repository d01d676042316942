use rand::rngs::StdRng;
use tokio::sync::mpsc;

use crate::config::QuizConfig;
use crate::error::{QuizError, QuizResult};
use crate::quiz::controller::QuizController;
use crate::quiz::view::QuizView;
use crate::quiz::QuestionSet;
use crate::store::KeyValueStore;
use crate::timer::{CountdownId, TokioScheduler};

/// Everything the quiz reacts to: user input and countdown ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    SelectAnswer(Option<String>),
    Advance,
    Restart,
    Tick(CountdownId),
    Shutdown,
}

/// Cloneable input side of a running quiz.
#[derive(Debug, Clone)]
pub struct QuizHandle {
    events: mpsc::UnboundedSender<Event>,
}

impl QuizHandle {
    pub fn start(&self) -> QuizResult<()> {
        self.send(Event::Start)
    }

    pub fn select_answer(&self, choice: impl Into<String>) -> QuizResult<()> {
        self.send(Event::SelectAnswer(Some(choice.into())))
    }

    pub fn advance(&self) -> QuizResult<()> {
        self.send(Event::Advance)
    }

    pub fn restart(&self) -> QuizResult<()> {
        self.send(Event::Restart)
    }

    pub fn shutdown(&self) -> QuizResult<()> {
        self.send(Event::Shutdown)
    }

    pub fn send(&self, event: Event) -> QuizResult<()> {
        self.events
            .send(event)
            .map_err(|_| QuizError::RuntimeStopped)
    }
}

pub type RuntimeController<V, S> = QuizController<V, S, TokioScheduler>;

/// Single-consumer event loop. Events are handled one at a time, each to
/// completion, in the order they were queued.
pub struct QuizRuntime<V, S> {
    controller: RuntimeController<V, S>,
    events: mpsc::UnboundedReceiver<Event>,
    sender: mpsc::UnboundedSender<Event>,
}

impl<V, S> QuizRuntime<V, S>
where
    V: QuizView,
    S: KeyValueStore,
{
    pub fn new(questions: QuestionSet, config: QuizConfig, view: V, store: S) -> QuizResult<Self> {
        let (sender, events) = mpsc::unbounded_channel();
        let scheduler = TokioScheduler::new(sender.clone());
        let controller = QuizController::new(questions, config, view, store, scheduler)?;
        Ok(Self {
            controller,
            events,
            sender,
        })
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.controller = self.controller.with_rng(rng);
        self
    }

    pub fn handle(&self) -> QuizHandle {
        QuizHandle {
            events: self.sender.clone(),
        }
    }

    pub fn controller(&self) -> &RuntimeController<V, S> {
        &self.controller
    }

    /// Processes events until `Event::Shutdown`, then hands the controller back.
    pub async fn run(mut self) -> RuntimeController<V, S> {
        log::info!("Quiz runtime started");
        while let Some(event) = self.events.recv().await {
            if event == Event::Shutdown {
                break;
            }
            self.dispatch(event);
        }
        self.controller.halt();
        log::info!("Quiz runtime stopped");
        self.controller
    }

    fn dispatch(&mut self, event: Event) {
        log::debug!("Handling {:?} while {}", event, self.controller.phase());
        let result = match event {
            Event::Start => self.controller.start(),
            Event::SelectAnswer(choice) => self.controller.select_answer(choice.as_deref()),
            Event::Advance => self.controller.advance(),
            Event::Restart => self.controller.restart(),
            Event::Tick(id) => {
                self.controller.tick(id);
                Ok(())
            }
            Event::Shutdown => Ok(()),
        };
        if let Err(err) = result {
            log::warn!("Ignoring event: {}", err);
        }
    }
}
