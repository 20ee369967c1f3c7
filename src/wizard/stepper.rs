/// Tracks the active wizard step and keeps it inside `0..total_steps`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepperController {
    current: usize,
    total: usize,
}

impl StepperController {
    /// A wizard always has at least one step.
    pub fn new(total_steps: usize) -> Self {
        Self {
            current: 0,
            total: total_steps.max(1),
        }
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn total_steps(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.total
    }

    /// Moves to `step`, clamped to the valid range.
    pub fn goto_step(&mut self, step: usize) {
        let target = step.min(self.total - 1);
        if target != self.current {
            tracing::debug!(from = self.current, to = target, "stepper moved");
        }
        self.current = target;
    }

    pub fn goto_prev_step(&mut self) {
        self.goto_step(self.current.saturating_sub(1));
    }

    pub fn goto_next_step(&mut self) {
        self.goto_step(self.current.saturating_add(1));
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}
