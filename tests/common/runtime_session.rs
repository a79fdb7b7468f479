use lockstep_gb::cpu::Cpu;

/// Binds together a running machine and whatever is judging it.
pub struct RuntimeSession<E: EvaluationSpec> {
    pub cpu: Cpu,
    pub evaluator: E,
}

pub trait EvaluationSpec {
    /// Called after every CPU step.
    /// Returns true to continue, false to stop (e.g., mismatch or success).
    fn evaluate(&mut self, _cpu: &Cpu) -> bool {
        true
    }

    /// Called before every CPU step.
    fn pre_step(&mut self, _cpu: &Cpu) -> bool {
        true
    }

    /// Called when the session ends to report findings.
    fn report(&self, _cpu: &Cpu) {}
}

impl<E: EvaluationSpec> RuntimeSession<E> {
    pub fn run_to_completion(&mut self) {
        while self.step() {}
        self.evaluator.report(&self.cpu);
    }

    pub fn step(&mut self) -> bool {
        if !self.evaluator.pre_step(&self.cpu) {
            return false;
        }
        self.cpu.step();
        self.evaluator.evaluate(&self.cpu)
    }
}
