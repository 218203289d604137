mod template;

pub use template::{ChatPromptTemplate, PromptTemplate};

/// Persona and output rules prepended to every chat exchange.
pub const SYSTEM_PROMPT: &str = "あなたは親切で実用的なAIメンターです。
・箇条書きで簡潔に。
・必要なら短いコード例も。
・嘘はつかない。わからない時は正直に言う。";

/// Placeholder carrying the user's message in the chat template.
pub const QUESTION_VARIABLE: &str = "question";

pub const HUMAN_TEMPLATE: &str = "{question}";

/// Used when an image request carries no `prompt`.
pub const DEFAULT_IMAGE_PROMPT: &str = "画像の内容を詳しく分析してください。";

pub const PROMPT_VARIABLE: &str = "prompt";

pub const IMAGE_ANALYSIS_TEMPLATE: &str = "以下の画像を分析し、構造化された形で情報を提供してください。

{prompt}

以下の形式で回答してください：
1. 画像の概要
2. 主要な要素・オブジェクト
3. 色彩・構成
4. 注目すべき詳細
5. 推測される文脈・用途";

/// Inline JPEG reference for a base64 payload.
pub fn image_data_uri(base64_payload: &str) -> String {
    format!("data:image/jpeg;base64,{base64_payload}")
}
