// Feedback prompt templates and the prompt builder.
// The system instruction is shared by both conditions; only the condition
// instruction differs between arms.

use crate::feedback::models::{Condition, FeedbackRequest, PromptBundle};
use crate::feedback::sanitize::strip_tags;
use crate::llm_client::{ChatMessage, CompletionRequest};

/// Output bound for every feedback completion.
pub const MAX_OUTPUT_TOKENS: u32 = 250;
/// Low-to-moderate sampling keeps replies consistent within a condition.
pub const TEMPERATURE: f32 = 0.4;

pub const FEEDBACK_SYSTEM: &str = "\
You are a reasoning coach giving brief written feedback to a participant in a research study. \
The participant has just attempted a problem and explained their reasoning. \
Follow these rules without exception:
1. Never reveal or hint at the correct answer.
2. Never introduce facts, numbers, or information beyond what the problem itself states or implies.
3. Never state or imply whether the participant's answer is correct or incorrect.
4. Keep your reply under 150 words.
5. Refer explicitly to the participant's own reasoning, quoting or paraphrasing it.
Write in plain prose addressed to the participant. No headings, lists, or markdown.";

pub const SYCOPHANTIC_INSTRUCTION: &str = "\
Affirm the participant's thinking. Validate their reasoning and their conclusion, \
highlight what is sensible about how they approached the problem, and express confidence \
in their judgment. Do not raise doubts, alternatives, or questions about their reasoning, \
even if it appears flawed.";

pub const DIALECTICAL_INSTRUCTION: &str = "\
Challenge the participant's thinking. Ask two or three reflective questions that probe \
their reasoning, and point out assumptions they may be making without stating what the \
right answer is. Encourage them to reconsider each step, but never supply the solution \
or say which step is wrong.";

/// User block: cleaned problem, answer (blank if absent), reasoning verbatim.
fn user_content(problem: &str, answer: &str, reasoning: &str) -> String {
    format!(
        "Problem:\n{problem}\n\n\
         Participant's answer:\n{answer}\n\n\
         Participant's reasoning:\n{reasoning}"
    )
}

pub fn condition_instruction(condition: Condition) -> &'static str {
    match condition {
        Condition::Sycophantic => SYCOPHANTIC_INSTRUCTION,
        Condition::Dialectical => DIALECTICAL_INSTRUCTION,
    }
}

/// Builds the three prompt blocks. Tags are stripped from the problem only;
/// the answer and reasoning are passed through verbatim.
pub fn build_prompt(request: &FeedbackRequest) -> PromptBundle {
    PromptBundle {
        system_instruction: FEEDBACK_SYSTEM.to_string(),
        condition_instruction: condition_instruction(request.condition).to_string(),
        user_content: user_content(
            &strip_tags(&request.problem),
            request.answer.as_deref().unwrap_or(""),
            &request.reasoning,
        ),
    }
}

impl PromptBundle {
    /// Orders the blocks as `system`, `system`, `user` with the fixed sampling bounds.
    pub fn into_completion_request(self) -> CompletionRequest {
        CompletionRequest {
            messages: vec![
                ChatMessage::system(self.system_instruction),
                ChatMessage::system(self.condition_instruction),
                ChatMessage::user(self.user_content),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}
