use crate::models::domain::DifficultyBucket;

pub const MIN_DIFFICULTY: i32 = 1;
pub const MAX_DIFFICULTY: i32 = 10;

const RAISE_ABOVE: f64 = 0.8;
const LOWER_BELOW: f64 = 0.4;

pub struct DifficultyController;

impl DifficultyController {
    /// Share of correct answers, 0 when nothing has been answered.
    pub fn performance(correct_count: i32, answered_count: i32) -> f64 {
        if answered_count <= 0 {
            return 0.0;
        }
        correct_count as f64 / answered_count as f64
    }

    /// Moves `current` one step towards the learner's running performance.
    /// Applies from the first answer on; there is no minimum sample size.
    pub fn next_difficulty(current: i32, correct_count: i32, answered_count: i32) -> i32 {
        let current = current.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        let performance = Self::performance(correct_count, answered_count);

        let next = if performance > RAISE_ABOVE && current < MAX_DIFFICULTY {
            current + 1
        } else if performance < LOWER_BELOW && current > MIN_DIFFICULTY {
            current - 1
        } else {
            current
        };

        next.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
    }

    pub fn bucket_for(level: i32) -> DifficultyBucket {
        match level {
            i32::MIN..=3 => DifficultyBucket::Easy,
            4..=6 => DifficultyBucket::Medium,
            _ => DifficultyBucket::Hard,
        }
    }
}
