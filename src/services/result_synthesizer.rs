use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    domain::{
        assessment_result::percentage, Answer, AssessmentResult, ProficiencyLevel,
        SubjectBreakdown, TopicBreakdown,
    },
    dto::response::DEFAULT_TOPIC,
};

/// One graded answer as seen by the synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnsweredItem {
    pub is_correct: bool,
    pub difficulty: i32,
    pub subject: Option<String>,
    pub topic: Option<String>,
}

impl From<&Answer> for AnsweredItem {
    fn from(answer: &Answer) -> Self {
        AnsweredItem {
            is_correct: answer.is_correct,
            difficulty: answer.difficulty,
            subject: answer.subject.clone(),
            topic: answer.topic.clone(),
        }
    }
}

/// Subject guess for answers recorded before questions carried a subject.
pub fn legacy_subject_for_difficulty(difficulty: i32) -> &'static str {
    if difficulty <= 3 {
        "Math"
    } else if difficulty <= 6 {
        "Japanese"
    } else if difficulty <= 8 {
        "Science"
    } else {
        "Social"
    }
}

/// Everything derived from a list of answers, before ids and timestamps are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSynthesis {
    pub overall_score: i32,
    pub overall_percentage: f64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub subjects: Vec<SubjectBreakdown>,
    pub recommendations: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub next_steps: Vec<String>,
}

impl ResultSynthesis {
    pub fn into_result(self, user_id: &str, session_id: &str, time_spent: i64) -> AssessmentResult {
        AssessmentResult {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            overall_score: self.overall_score,
            overall_percentage: self.overall_percentage,
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            time_spent: time_spent.max(0),
            subjects: self.subjects,
            recommendations: self.recommendations,
            strengths: self.strengths,
            weaknesses: self.weaknesses,
            next_steps: self.next_steps,
            completed_at: Utc::now(),
        }
    }
}

#[derive(Default)]
struct Tally {
    correct: i32,
    total: i32,
}

impl Tally {
    fn add(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
    }
}

struct SubjectTally {
    subject: String,
    tally: Tally,
    topics: Vec<(String, Tally)>,
}

pub struct ResultSynthesizer;

impl ResultSynthesizer {
    /// Pure function of `answers`: identical input always yields identical output.
    pub fn synthesize(answers: &[AnsweredItem]) -> ResultSynthesis {
        let total_questions = answers.len() as i32;
        let correct_answers = answers.iter().filter(|a| a.is_correct).count() as i32;
        let overall_percentage = percentage(correct_answers, total_questions);

        let subjects = Self::breakdown(answers);

        ResultSynthesis {
            overall_score: correct_answers,
            overall_percentage,
            total_questions,
            correct_answers,
            recommendations: Self::recommendations(&subjects, overall_percentage),
            strengths: Self::strengths(&subjects),
            weaknesses: Self::weaknesses(&subjects),
            next_steps: Self::next_steps(&subjects, overall_percentage),
            subjects,
        }
    }

    /// Groups by subject, then topic, keeping first-seen order at both levels.
    fn breakdown(answers: &[AnsweredItem]) -> Vec<SubjectBreakdown> {
        let mut subjects: Vec<SubjectTally> = Vec::new();

        for answer in answers {
            let subject = answer
                .subject
                .clone()
                .unwrap_or_else(|| legacy_subject_for_difficulty(answer.difficulty).to_string());
            let topic = answer
                .topic
                .clone()
                .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

            let position = match subjects.iter().position(|s| s.subject == subject) {
                Some(position) => position,
                None => {
                    subjects.push(SubjectTally {
                        subject,
                        tally: Tally::default(),
                        topics: Vec::new(),
                    });
                    subjects.len() - 1
                }
            };

            let entry = &mut subjects[position];
            entry.tally.add(answer.is_correct);

            match entry.topics.iter_mut().find(|(name, _)| *name == topic) {
                Some((_, tally)) => tally.add(answer.is_correct),
                None => {
                    let mut tally = Tally::default();
                    tally.add(answer.is_correct);
                    entry.topics.push((topic, tally));
                }
            }
        }

        subjects
            .into_iter()
            .map(|entry| {
                let subject_percentage = percentage(entry.tally.correct, entry.tally.total);
                SubjectBreakdown {
                    subject: entry.subject,
                    score: entry.tally.correct,
                    max_score: entry.tally.total,
                    percentage: subject_percentage,
                    level: ProficiencyLevel::from_percentage(subject_percentage),
                    topics: entry
                        .topics
                        .into_iter()
                        .map(|(topic, tally)| TopicBreakdown {
                            topic,
                            score: tally.correct,
                            max_score: tally.total,
                            percentage: percentage(tally.correct, tally.total),
                            questions_answered: tally.total,
                            correct_answers: tally.correct,
                        })
                        .collect(),
                }
            })
            .collect()
    }

    fn recommendations(subjects: &[SubjectBreakdown], overall_percentage: f64) -> Vec<String> {
        let mut recommendations = Vec::new();

        let overall = if overall_percentage >= 80.0 {
            "Excellent work! Try taking on more advanced problems."
        } else if overall_percentage >= 60.0 {
            "Good result. Focusing on your weaker areas will help you improve further."
        } else {
            "We recommend reviewing the fundamentals thoroughly."
        };
        recommendations.push(overall.to_string());

        for subject in subjects {
            if subject.percentage < 50.0 {
                recommendations.push(format!(
                    "{}: review of the fundamental concepts is needed.",
                    subject.subject
                ));
            } else if subject.percentage < 70.0 {
                recommendations.push(format!(
                    "{}: work through applied problems to deepen your understanding.",
                    subject.subject
                ));
            }
        }

        for subject in subjects {
            let weak_topics: Vec<&str> = subject
                .topics
                .iter()
                .filter(|t| t.percentage < 60.0)
                .map(|t| t.topic.as_str())
                .collect();
            if !weak_topics.is_empty() {
                recommendations.push(format!(
                    "{}: focus your study on {}.",
                    subject.subject,
                    weak_topics.join(", ")
                ));
            }
        }

        recommendations
    }

    fn strengths(subjects: &[SubjectBreakdown]) -> Vec<String> {
        let mut strengths = Vec::new();
        for subject in subjects {
            if subject.percentage >= 80.0 {
                strengths.push(format!(
                    "{}: strong understanding, including applied problems.",
                    subject.subject
                ));
            }
            for topic in &subject.topics {
                if topic.percentage >= 90.0 {
                    strengths.push(format!(
                        "{} / {}: very well understood.",
                        subject.subject, topic.topic
                    ));
                }
            }
        }
        strengths
    }

    fn weaknesses(subjects: &[SubjectBreakdown]) -> Vec<String> {
        let mut weaknesses = Vec::new();
        for subject in subjects {
            if subject.percentage < 50.0 {
                weaknesses.push(format!(
                    "{}: understanding of the basic concepts is insufficient.",
                    subject.subject
                ));
            }
            for topic in &subject.topics {
                if topic.percentage < 40.0 {
                    weaknesses.push(format!(
                        "{} / {}: understanding is insufficient.",
                        subject.subject, topic.topic
                    ));
                }
            }
        }
        weaknesses
    }

    fn next_steps(subjects: &[SubjectBreakdown], overall_percentage: f64) -> Vec<String> {
        let mut next_steps = Vec::new();

        if overall_percentage < 60.0 {
            next_steps.push(
                "Start from a foundational problem set and build understanding step by step."
                    .to_string(),
            );
            next_steps.push("Check the explanation right away whenever you get stuck.".to_string());
        } else {
            next_steps.push(
                "Challenge yourself with applied problems to deepen your understanding."
                    .to_string(),
            );
        }

        // ties keep the earlier subject
        let weakest = subjects.iter().fold(None::<&SubjectBreakdown>, |weakest, s| {
            match weakest {
                Some(current) if current.percentage <= s.percentage => Some(current),
                _ => Some(s),
            }
        });
        if let Some(weakest) = weakest {
            if weakest.percentage < 70.0 {
                next_steps.push(format!(
                    "Spend more study time on {} and focus on it intensively.",
                    weakest.subject
                ));
            }
        }

        next_steps
            .push("Retake the diagnostic test periodically to track your progress.".to_string());
        next_steps.push(
            "Collect missed questions in a review notebook and revisit them regularly.".to_string(),
        );

        next_steps
    }
}
