//! The two fixed prompt pairs driving the pipeline.

/// System message for Cypher generation: raw statement only, nothing else.
pub const TEXT2CYPHER_SYSTEM: &str = "Given an input question, convert it to a Cypher query. No pre-amble. \
     Do not wrap the response in any backticks or anything else. \
     Respond with a Cypher statement only!";

/// User message for Cypher generation, grounded in the live schema.
pub fn text2cypher_user(schema: &str, question: &str) -> String {
    format!(
        "You are a Neo4j expert. Given an input question, create a syntactically correct Cypher query to run.\n\
         Do not wrap the response in any backticks or anything else. Respond with a Cypher statement only!\n\
         Here is the schema information\n\
         {schema}\n\
         \n\
         User input: {question}\n\
         Cypher query:"
    )
}

/// System message for answer synthesis.
pub const ANSWER_SYSTEM: &str = "You are a helpful assistant";

/// User message for answer synthesis. `results` may be a row payload or
/// a database fault's text; the model sees both the same way.
pub fn answer_user(results: &str, question: &str) -> String {
    format!(
        "Use the following results retrieved from a database to provide\n\
         a succinct, definitive answer to the user's question.\n\
         \n\
         Respond as if you are answering the question directly.\n\
         \n\
         Results: {results}\n\
         Question: {question}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text2cypher_user_embeds_schema_and_question() {
        let prompt = text2cypher_user("Node properties:\nPerson {}", "Who acted in Heat?");
        assert!(prompt.contains("Node properties:\nPerson {}"));
        assert!(prompt.contains("User input: Who acted in Heat?"));
        assert!(prompt.ends_with("Cypher query:"));
    }

    #[test]
    fn test_answer_user_embeds_results_and_question() {
        let prompt = answer_user("[{\"cnt\":3}]", "How many?");
        assert!(prompt.contains("Results: [{\"cnt\":3}]"));
        assert!(prompt.contains("Question: How many?"));
    }

    #[test]
    fn test_generation_prompt_forbids_fences() {
        assert!(TEXT2CYPHER_SYSTEM.contains("backticks"));
        assert!(text2cypher_user("", "").contains("backticks"));
    }
}
