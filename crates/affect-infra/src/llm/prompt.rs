//! Prompt templates sent to the remote models.
//!
//! Both templates ask for the same strict JSON answer
//! (`{"score": 0|1|2, "reasoning": "..."}`); the Gemini one is written in
//! Vietnamese.

use affect_types::sentiment::AnalysisContext;

/// System message for chat-style APIs.
pub const SYSTEM_PROMPT: &str = "You are a psychological assessment expert analyzing children's responses to psychological questions. Respond in JSON format only.";

/// English user prompt (OpenAI).
pub fn english_prompt(context: &AnalysisContext) -> String {
    format!(
        r#"Analyze the sentiment of this child's answer to a psychological question.

Question: "{question}"
Answer: "{answer}"
Category: {category}

Rate the sentiment as:
- 0: Positive (happy, healthy, optimistic, shows good relationships)
- 1: Neutral (normal, balanced, neither positive nor negative)
- 2: Negative (sad, distressed, concerning, shows problems)

Respond ONLY in this JSON format:
{{
  "score": 0 | 1 | 2,
  "reasoning": "brief explanation in Vietnamese"
}}"#,
        question = context.question_text,
        answer = context.answer_text,
        category = context.category().unwrap_or("General"),
    )
}

/// Vietnamese user prompt (Gemini).
pub fn vietnamese_prompt(context: &AnalysisContext) -> String {
    format!(
        r#"Phân tích cảm xúc của câu trả lời này từ một em nhỏ trong bài trắc nghiệm tâm lý.

Câu hỏi: "{question}"
Câu trả lời: "{answer}"
Danh mục: {category}

Đánh giá cảm xúc:
- 0: Tích cực (vui vẻ, khỏe mạnh, lạc quan, mối quan hệ tốt)
- 1: Trung tính (bình thường, cân bằng, không rõ ràng)
- 2: Tiêu cực (buồn, lo lắng, đáng quan ngại, có vấn đề)

Trả lời CHỈ theo format JSON này:
{{
  "score": 0 | 1 | 2,
  "reasoning": "giải thích ngắn gọn"
}}"#,
        question = context.question_text,
        answer = context.answer_text,
        category = context.category().unwrap_or("Chung"),
    )
}
