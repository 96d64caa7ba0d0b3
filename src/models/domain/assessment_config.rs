use std::{collections::HashMap, fs, path::Path};

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, SimpleObject)]
pub struct AssessmentConfig {
    #[validate(length(min = 1, max = 100))]
    pub id: String,
    pub subjects: Vec<String>,
    pub topics: Vec<String>,
    #[validate(range(min = 1))]
    pub max_questions: i32,
    #[validate(range(min = 1, max = 10))]
    pub initial_difficulty: i32,
    /// Advisory only. Clients decide when to call complete early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<i64>,
}

/// Lookup table from config id to assessment parameters.
#[derive(Clone, Debug, Default)]
pub struct AssessmentCatalog {
    configs: HashMap<String, AssessmentConfig>,
}

impl AssessmentCatalog {
    pub fn new(configs: Vec<AssessmentConfig>) -> AppResult<Self> {
        let mut table = HashMap::with_capacity(configs.len());
        for config in configs {
            config.validate()?;
            if table.contains_key(&config.id) {
                return Err(AppError::AlreadyExists(format!(
                    "Assessment config '{}' is defined twice",
                    config.id
                )));
            }
            table.insert(config.id.clone(), config);
        }
        Ok(Self { configs: table })
    }

    pub fn builtin() -> Self {
        let configs = vec![
            AssessmentConfig {
                id: "math_basic".to_string(),
                subjects: vec!["Math".to_string()],
                topics: vec![
                    "Basic Calculation".to_string(),
                    "Fractions".to_string(),
                    "Decimals".to_string(),
                    "Geometry".to_string(),
                ],
                max_questions: 20,
                initial_difficulty: 3,
                time_limit_seconds: None,
            },
            AssessmentConfig {
                id: "comprehensive".to_string(),
                subjects: vec![
                    "Math".to_string(),
                    "Japanese".to_string(),
                    "Science".to_string(),
                    "Social".to_string(),
                ],
                topics: vec![
                    "Basic Calculation".to_string(),
                    "Reading Comprehension".to_string(),
                    "Experiments".to_string(),
                    "History".to_string(),
                ],
                max_questions: 40,
                initial_difficulty: 4,
                time_limit_seconds: None,
            },
        ];

        Self {
            configs: configs.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        let configs: Vec<AssessmentConfig> = serde_json::from_str(raw)?;
        Self::new(configs)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::InternalError(format!(
                "Failed to read assessment config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn get(&self, config_id: &str) -> AppResult<&AssessmentConfig> {
        self.configs.get(config_id).ok_or_else(|| {
            AppError::NotFound(format!("Assessment config '{}' not found", config_id))
        })
    }

    pub fn list(&self) -> Vec<AssessmentConfig> {
        let mut configs: Vec<_> = self.configs.values().cloned().collect();
        configs.sort_by(|a, b| a.id.cmp(&b.id));
        configs
    }
}
