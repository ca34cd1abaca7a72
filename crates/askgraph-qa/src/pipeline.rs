//! The three-stage pipeline: generate Cypher → execute → synthesize answer.
//!
//! External collaborators sit behind traits so the stages can be
//! exercised without a live database or model endpoint.

use askgraph_graph::{GraphClient, GraphError};
use askgraph_llm::{ChatClient, LlmError};

use crate::error::{PipelineError, Result};
use crate::prompts;
use crate::state::{PipelineState, QueryOutcome};

/// Exposes the database's current structural description as text.
#[allow(async_fn_in_trait)]
pub trait SchemaProvider {
    async fn schema_text(&self) -> std::result::Result<String, GraphError>;
}

/// Runs a Cypher statement, returning serialized rows or a driver fault.
#[allow(async_fn_in_trait)]
pub trait QueryExecutor {
    async fn execute(&self, cypher: &str) -> std::result::Result<String, GraphError>;
}

/// Prompt in, generated text out.
#[allow(async_fn_in_trait)]
pub trait LanguageModel {
    async fn complete(&self, system: &str, user: &str)
        -> std::result::Result<String, LlmError>;
}

impl SchemaProvider for GraphClient {
    async fn schema_text(&self) -> std::result::Result<String, GraphError> {
        let schema = self.introspect_schema().await?;
        if schema.is_empty() {
            tracing::warn!("Graph schema is empty; generation will be unguided");
        }
        Ok(schema.to_prompt_text())
    }
}

impl QueryExecutor for GraphClient {
    async fn execute(&self, cypher: &str) -> std::result::Result<String, GraphError> {
        self.execute_raw(cypher).await
    }
}

impl LanguageModel for ChatClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> std::result::Result<String, LlmError> {
        ChatClient::complete(self, system, user).await
    }
}

/// The pipeline orchestrator: a three-stage chain with a single entry
/// and a single terminal stage. No branching, no retries.
pub struct Pipeline<L, D> {
    llm: L,
    db: D,
}

impl<L, D> Pipeline<L, D>
where
    L: LanguageModel,
    D: SchemaProvider + QueryExecutor,
{
    pub fn new(llm: L, db: D) -> Self {
        Self { llm, db }
    }

    /// Stage 1: translate the question into a Cypher statement, grounded
    /// in schema text fetched fresh from the database.
    ///
    /// The generated text is kept verbatim; no syntactic validation
    /// happens before execution. A blank generation is rejected so the
    /// database is never called with an empty statement.
    pub async fn generate_cypher(&self, state: PipelineState) -> Result<PipelineState> {
        let schema = self.db.schema_text().await?;
        let user = prompts::text2cypher_user(&schema, state.question());
        let cypher = self
            .llm
            .complete(prompts::TEXT2CYPHER_SYSTEM, &user)
            .await?;

        if cypher.trim().is_empty() {
            return Err(PipelineError::EmptyGeneration);
        }

        tracing::info!(cypher = %cypher, "Cypher statement generated");
        Ok(state.with_cypher(cypher))
    }

    /// Stage 2: run the statement. Driver faults are captured as the
    /// outcome text instead of raised, so the pipeline always reaches
    /// the synthesis stage.
    pub async fn execute_cypher(&self, state: PipelineState) -> PipelineState {
        let outcome = match state.cypher_statement() {
            Some(cypher) => match self.db.execute(cypher).await {
                Ok(rows) => QueryOutcome::Rows(rows),
                Err(e) => {
                    tracing::warn!(error = %e, "Cypher execution failed, forwarding fault text");
                    QueryOutcome::Fault(e.to_string())
                }
            },
            None => QueryOutcome::Fault("no cypher statement generated".to_string()),
        };

        state.with_result(outcome)
    }

    /// Stage 3: summarize the outcome (rows or fault text, the model
    /// cannot tell which) into a direct answer to the question.
    pub async fn synthesize_answer(&self, state: PipelineState) -> Result<PipelineState> {
        let user = prompts::answer_user(state.outcome_text(), state.question());
        let answer = self.llm.complete(prompts::ANSWER_SYSTEM, &user).await?;

        tracing::info!("Answer synthesized");
        Ok(state.with_answer(answer))
    }

    /// Run all three stages and return the final state.
    pub async fn run(&self, question: &str) -> Result<PipelineState> {
        let state = PipelineState::new(question);
        let state = self.generate_cypher(state).await?;
        let state = self.execute_cypher(state).await;
        self.synthesize_answer(state).await
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct FakeLlm {
        cypher: String,
        answer: String,
    }

    impl LanguageModel for FakeLlm {
        async fn complete(
            &self,
            system: &str,
            _user: &str,
        ) -> std::result::Result<String, LlmError> {
            if system == prompts::TEXT2CYPHER_SYSTEM {
                Ok(self.cypher.clone())
            } else {
                Ok(self.answer.clone())
            }
        }
    }

    /// Fails every call, standing in for an unreachable model endpoint.
    struct DeadLlm;

    impl LanguageModel for DeadLlm {
        async fn complete(
            &self,
            _system: &str,
            _user: &str,
        ) -> std::result::Result<String, LlmError> {
            Err(LlmError::EmptyResponse { provider: "Fake" })
        }
    }

    struct FakeDb {
        schema: String,
        result: std::result::Result<String, String>,
        executions: Cell<usize>,
    }

    impl FakeDb {
        fn returning(rows: &str) -> Self {
            Self {
                schema: "Node properties:\nNode {name: String}\n".to_string(),
                result: Ok(rows.to_string()),
                executions: Cell::new(0),
            }
        }

        fn faulting(message: &str) -> Self {
            Self {
                schema: "Node properties:\nNode {name: String}\n".to_string(),
                result: Err(message.to_string()),
                executions: Cell::new(0),
            }
        }
    }

    impl SchemaProvider for FakeDb {
        async fn schema_text(&self) -> std::result::Result<String, GraphError> {
            Ok(self.schema.clone())
        }
    }

    impl QueryExecutor for FakeDb {
        async fn execute(&self, _cypher: &str) -> std::result::Result<String, GraphError> {
            self.executions.set(self.executions.get() + 1);
            match &self.result {
                Ok(rows) => Ok(rows.clone()),
                Err(msg) => Err(GraphError::Connection(msg.clone())),
            }
        }
    }

    #[tokio::test]
    async fn test_count_question_flows_through_all_stages() {
        let llm = FakeLlm {
            cypher: "MATCH (n) RETURN count(n) AS cnt".to_string(),
            answer: "There are 7 nodes.".to_string(),
        };
        let db = FakeDb::returning("[{\"cnt\":7}]");
        let pipeline = Pipeline::new(llm, db);

        let state = pipeline.run("How many nodes are there?").await.unwrap();

        assert_eq!(
            state.cypher_statement(),
            Some("MATCH (n) RETURN count(n) AS cnt")
        );
        assert_eq!(
            state.query_result(),
            Some(&QueryOutcome::Rows("[{\"cnt\":7}]".to_string()))
        );
        assert_eq!(state.answer(), Some("There are 7 nodes."));
    }

    #[tokio::test]
    async fn test_executor_fault_is_captured_and_pipeline_completes() {
        let llm = FakeLlm {
            cypher: "MATCH (n) RETURN n.no_such_property".to_string(),
            answer: "The database reported an error.".to_string(),
        };
        let db = FakeDb::faulting("Unknown property");
        let pipeline = Pipeline::new(llm, db);

        let state = pipeline.run("What is the missing property?").await.unwrap();

        let expected_fault = GraphError::Connection("Unknown property".to_string()).to_string();
        assert_eq!(
            state.query_result(),
            Some(&QueryOutcome::Fault(expected_fault))
        );
        assert_eq!(state.answer(), Some("The database reported an error."));
    }

    #[tokio::test]
    async fn test_blank_generation_never_reaches_the_database() {
        let llm = FakeLlm {
            cypher: "   \n".to_string(),
            answer: "unused".to_string(),
        };
        let db = FakeDb::returning("[]");
        let pipeline = Pipeline::new(llm, db);

        let err = pipeline.run("Anything?").await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyGeneration));
        assert_eq!(pipeline.db.executions.get(), 0);
    }

    #[tokio::test]
    async fn test_generation_fault_propagates() {
        let pipeline = Pipeline::new(DeadLlm, FakeDb::returning("[]"));

        let err = pipeline.run("Anything?").await.unwrap_err();
        assert!(matches!(err, PipelineError::Llm(_)));
        assert_eq!(pipeline.db.executions.get(), 0);
    }

    #[tokio::test]
    async fn test_synthesis_fault_propagates_after_execution() {
        let db = FakeDb::returning("[{\"cnt\":1}]");
        let pipeline = Pipeline::new(DeadLlm, db);

        // Drive stages directly so execution succeeds before synthesis fails.
        let state = PipelineState::new("q").with_cypher("MATCH (n) RETURN count(n) AS cnt");
        let state = pipeline.execute_cypher(state).await;
        assert_eq!(pipeline.db.executions.get(), 1);

        let err = pipeline.synthesize_answer(state).await.unwrap_err();
        assert!(matches!(err, PipelineError::Llm(_)));
    }

    #[tokio::test]
    async fn test_generated_statement_kept_verbatim() {
        let llm = FakeLlm {
            cypher: "```cypher\nMATCH (n) RETURN n\n```".to_string(),
            answer: "ok".to_string(),
        };
        let db = FakeDb::returning("[]");
        let pipeline = Pipeline::new(llm, db);

        let state = pipeline
            .generate_cypher(PipelineState::new("q"))
            .await
            .unwrap();
        assert_eq!(
            state.cypher_statement(),
            Some("```cypher\nMATCH (n) RETURN n\n```")
        );
    }
}
