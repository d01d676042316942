/// One-way notifications from the controller to whatever renders the quiz.
pub trait QuizView {
    fn on_question_rendered(&mut self, prompt: &str, choices: &[String], progress: &str);

    fn on_tick(&mut self, seconds_remaining: u32);

    /// Sent right before the reveal of a question whose countdown ran out.
    fn on_timed_out(&mut self) {}

    /// `selected` is `None` on timeout. A wrong `selected` is marked wrong and
    /// the displayed choice equal to `correct` is marked correct.
    fn on_answer_revealed(&mut self, selected: Option<&str>, correct: &str);

    fn on_result(&mut self, score: u32, total: usize, high_score: u32);

    fn on_session_reset(&mut self);
}

pub fn progress_label(index: usize, total: usize) -> String {
    format!("Question {} of {}", index + 1, total)
}

pub fn timer_label(seconds_remaining: u32) -> String {
    format!("⏳ Time: {}s", seconds_remaining)
}

pub fn score_label(score: u32, total: usize) -> String {
    format!("{} out of {}", score, total)
}

pub fn high_score_label(high_score: u32) -> String {
    format!("🏆 High Score: {}", high_score)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Correct,
    Wrong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceLine {
    pub text: String,
    pub mark: Option<Mark>,
}

/// Text rendering of the quiz page: keeps the current screen and a transcript
/// of every line it has drawn.
#[derive(Debug, Clone, Default)]
pub struct TranscriptView {
    pub prompt: String,
    pub progress: String,
    pub timer: String,
    pub choices: Vec<ChoiceLine>,
    pub interactive: bool,
    pub timed_out: bool,
    pub score: Option<String>,
    pub high_score: Option<String>,
    lines: Vec<String>,
}

impl TranscriptView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn mark_of(&self, choice: &str) -> Option<Mark> {
        self.choices
            .iter()
            .find(|line| line.text == choice)
            .and_then(|line| line.mark)
    }

    fn mark(&mut self, choice: &str, mark: Mark) {
        if let Some(line) = self.choices.iter_mut().find(|line| line.text == choice) {
            line.mark = Some(mark);
        }
    }

    fn push(&mut self, line: String) {
        log::debug!("view: {}", line);
        self.lines.push(line);
    }
}

impl QuizView for TranscriptView {
    fn on_question_rendered(&mut self, prompt: &str, choices: &[String], progress: &str) {
        self.prompt = prompt.to_string();
        self.progress = progress.to_string();
        self.timer.clear();
        self.timed_out = false;
        self.interactive = true;
        self.choices = choices
            .iter()
            .map(|text| ChoiceLine {
                text: text.clone(),
                mark: None,
            })
            .collect();

        self.push(format!("{} | {}", progress, prompt));
        for (n, choice) in choices.iter().enumerate() {
            self.push(format!("  {}) {}", n + 1, choice));
        }
    }

    fn on_tick(&mut self, seconds_remaining: u32) {
        self.timer = timer_label(seconds_remaining);
        let line = self.timer.clone();
        self.push(line);
    }

    fn on_timed_out(&mut self) {
        self.timed_out = true;
        self.push("Time is up!".to_string());
    }

    fn on_answer_revealed(&mut self, selected: Option<&str>, correct: &str) {
        match selected {
            Some(choice) if choice == correct => self.mark(choice, Mark::Correct),
            Some(choice) => {
                self.mark(choice, Mark::Wrong);
                self.mark(correct, Mark::Correct);
            }
            None => self.mark(correct, Mark::Correct),
        }
        self.interactive = false;

        let verdict = match selected {
            Some(choice) if choice == correct => format!("Correct: {}", correct),
            Some(choice) => format!("Wrong: {} (answer: {})", choice, correct),
            None => format!("No answer (answer: {})", correct),
        };
        self.push(verdict);
    }

    fn on_result(&mut self, score: u32, total: usize, high_score: u32) {
        let score = score_label(score, total);
        let high_score = high_score_label(high_score);
        self.push(format!("Score: {}", score));
        self.push(high_score.clone());
        self.score = Some(score);
        self.high_score = Some(high_score);
        self.choices.clear();
        self.interactive = false;
    }

    fn on_session_reset(&mut self) {
        self.prompt.clear();
        self.progress.clear();
        self.timer.clear();
        self.choices.clear();
        self.interactive = false;
        self.timed_out = false;
        self.score = None;
        self.high_score = None;
        self.push("--- new quiz ---".to_string());
    }
}
