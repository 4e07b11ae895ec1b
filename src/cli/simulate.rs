//! Simulate command implementation
//!
//! Plays the part of externally hosted agents: creates a question on a
//! running hub and pushes every stage for each mock agent through
//! `POST /submit/{id}`, then fetches the finished context.

use super::output::{Mark, Output};
use crate::{
    agents::{Agent, AgentRegistry},
    auth::middleware::API_KEY_HEADER,
    types::{AgentSubmission, AppError, Context, CreateQuestionResponse, Result, Stage},
    utils::toml_config::HubConfig,
};
use reqwest::{Client, Response};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Options for the simulate command
pub struct SimulateOptions {
    /// Hub base URL, e.g. `http://127.0.0.1:5000`
    pub base_url: String,
    /// Question to create
    pub question: String,
    /// Sent as `X-API-Key` when set
    pub api_key: Option<String>,
}

/// HTTP client for the submission endpoints of a running hub.
pub struct HubClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HubClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = format!("Hub returned {}: {}", status, body);
        Err(match status.as_u16() {
            401 => AppError::Auth(message),
            404 => AppError::NotFound(message),
            400 => AppError::InvalidInput(message),
            _ => AppError::Internal(message),
        })
    }

    pub async fn create_question(&self, text: &str) -> Result<String> {
        let response = self
            .http
            .post(self.url("/question"))
            .form(&[("question_text", text)])
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reach hub: {}", e)))?;
        let created: CreateQuestionResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Invalid hub response: {}", e)))?;
        Ok(created.question_id)
    }

    pub async fn submit<T: Serialize>(
        &self,
        question_id: &str,
        agent: &dyn Agent,
        stage: Stage,
        record: &T,
    ) -> Result<()> {
        let payload = serde_json::to_value(record)
            .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", stage, e)))?;
        let submission = AgentSubmission {
            agent_id: agent.id().to_string(),
            agent_name: Some(agent.name().to_string()),
            stage: stage.to_string(),
            payload,
        };

        let mut request = self
            .http
            .post(self.url(&format!("/submit/{}", question_id)))
            .json(&submission);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reach hub: {}", e)))?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn context(&self, question_id: &str) -> Result<Context> {
        let response = self
            .http
            .get(self.url(&format!("/context/{}", question_id)))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reach hub: {}", e)))?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Invalid hub response: {}", e)))
    }
}

/// Submit a full mock pipeline to the hub and print the final context.
pub async fn run(config: HubConfig, options: SimulateOptions, output: &Output) -> Result<Context> {
    let client = HubClient::new(&options.base_url, options.api_key)?;
    let agents = AgentRegistry::new(Arc::new(config)).mock_agents();

    output.section(&format!("Simulating against {}", options.base_url));
    let question_id = client.create_question(&options.question).await?;
    output.field("question_id", &question_id);

    output.stage(Stage::Response);
    let mut responses = Vec::with_capacity(agents.len());
    for agent in &agents {
        let response = agent.respond(&options.question).await?;
        client
            .submit(&question_id, agent.as_ref(), Stage::Response, &response)
            .await?;
        output.agent_done(agent.name(), "responded");
        responses.push((agent.id().to_string(), response));
    }

    output.stage(Stage::Critique);
    for agent in &agents {
        for (target_id, target_response) in &responses {
            if target_id == agent.id() {
                continue;
            }
            let critique = agent
                .critique(&options.question, target_id, target_response)
                .await?;
            client
                .submit(&question_id, agent.as_ref(), Stage::Critique, &critique)
                .await?;
            output.agent_done(agent.name(), &format!("critiqued {}", target_id));
        }
    }

    output.stage(Stage::Research);
    for agent in &agents {
        let research = agent.research(&options.question).await?;
        client
            .submit(&question_id, agent.as_ref(), Stage::Research, &research)
            .await?;
        output.agent_done(agent.name(), "submitted research");
    }

    output.stage(Stage::Conclusion);
    let context = client.context(&question_id).await?;
    for agent in &agents {
        let conclusion = agent.conclude(&options.question, &context).await?;
        client
            .submit(&question_id, agent.as_ref(), Stage::Conclusion, &conclusion)
            .await?;
        output.agent_done(agent.name(), "concluded");
    }

    let context = client.context(&question_id).await?;
    let json = serde_json::to_string_pretty(&context)
        .map_err(|e| AppError::Internal(format!("Failed to serialize context: {}", e)))?;
    println!("{}", json);
    output.line(Mark::Done, "Simulation complete");
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = HubClient::new("http://localhost:5000/", None).unwrap();
        assert_eq!(client.url("/questions"), "http://localhost:5000/questions");
    }
}
