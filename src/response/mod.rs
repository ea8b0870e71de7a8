//! Response collection: validates an evaluator's scores and closes out the
//! assignment through the gateway.

use crate::config::{Competency, Config, ScaleConfig};
use crate::error::ResponseError;
use crate::store::{AssignmentResponse, CallPolicy, PersistenceGateway};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::info;

pub struct ResponseCollector {
    competencies: Vec<Competency>,
    scale: ScaleConfig,
    policy: CallPolicy,
}

impl ResponseCollector {
    pub fn new(competencies: Vec<Competency>, scale: ScaleConfig, policy: CallPolicy) -> Self {
        Self {
            competencies,
            scale,
            policy,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.competencies.clone(),
            config.scale,
            CallPolicy::from_config(config),
        )
    }

    /// Check scores against the configured competencies and scale.
    ///
    /// With competencies configured every one of them must be rated and no
    /// other id is accepted; without them any id is accepted.
    pub fn validate(&self, scores: &BTreeMap<String, u8>) -> Result<(), ResponseError> {
        if !self.competencies.is_empty() {
            if let Some(unknown) = scores
                .keys()
                .find(|id| !self.competencies.iter().any(|c| &c.id == *id))
            {
                return Err(ResponseError::UnknownCompetency(unknown.clone()));
            }

            let missing: Vec<String> = self
                .competencies
                .iter()
                .filter(|c| !scores.contains_key(&c.id))
                .map(|c| c.id.clone())
                .collect();
            if !missing.is_empty() {
                return Err(ResponseError::MissingScores(missing));
            }
        }

        for (competency, &score) in scores {
            if !self.scale.contains(score) {
                return Err(ResponseError::ScoreOutOfRange {
                    competency: competency.clone(),
                    score,
                    min: self.scale.min,
                    max: self.scale.max,
                });
            }
        }

        Ok(())
    }

    /// Validate and persist one response. Exactly one assignment is updated.
    pub async fn submit(
        &self,
        gateway: &dyn PersistenceGateway,
        assignment_id: &str,
        scores: BTreeMap<String, u8>,
        comments: &str,
    ) -> Result<AssignmentResponse, ResponseError> {
        self.validate(&scores)?;

        let response = AssignmentResponse {
            scores,
            comments: comments.to_string(),
            completed_at: Utc::now(),
        };

        self.policy
            .run(|| gateway.update_assignment(assignment_id, &response))
            .await?;

        info!(
            "Recorded response for assignment {} via {}",
            assignment_id,
            gateway.name()
        );
        Ok(response)
    }
}

/// Parse `competency=score` pairs as given on the command line. Each
/// competency may appear once.
pub fn parse_scores(pairs: &[String]) -> Result<BTreeMap<String, u8>, ResponseError> {
    let mut scores = BTreeMap::new();
    for pair in pairs {
        let (id, value) = pair
            .split_once('=')
            .ok_or_else(|| ResponseError::MalformedScore(pair.clone()))?;
        let id = id.trim();
        let value: u8 = value
            .trim()
            .parse()
            .map_err(|_| ResponseError::MalformedScore(pair.clone()))?;
        if id.is_empty() || scores.insert(id.to_string(), value).is_some() {
            return Err(ResponseError::MalformedScore(pair.clone()));
        }
    }
    Ok(scores)
}
