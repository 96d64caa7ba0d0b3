/// Number of most recent answers inspected for stabilization.
pub const STABILIZATION_WINDOW: usize = 5;

const STABLE_HIGH: f64 = 0.9;
const STABLE_LOW: f64 = 0.1;

pub struct TerminationPolicy;

impl TerminationPolicy {
    /// `recent` holds correctness flags in chronological order.
    pub fn should_complete(questions_answered: i32, max_questions: i32, recent: &[bool]) -> bool {
        if questions_answered >= max_questions {
            return true;
        }

        if recent.len() < STABILIZATION_WINDOW {
            return false;
        }

        let window = &recent[recent.len() - STABILIZATION_WINDOW..];
        let correct = window.iter().filter(|is_correct| **is_correct).count();
        let ratio = correct as f64 / STABILIZATION_WINDOW as f64;

        ratio >= STABLE_HIGH || ratio <= STABLE_LOW
    }
}
