/// One prompt for the generation backend.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Persona, tone or formatting rules sent apart from the prompt
    pub system_prompt: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    pub text: String,
    /// Token counts, when the backend reports them
    pub usage: Option<TokenUsage>,
    pub finish_reason: Option<String>,
}

impl GenerateResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub output_tokens: u32,
}
