use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::{
   config::Config,
   error::{Error, Result},
   llm::{ChatModel, CompletionRequest},
};

pub(crate) fn build_client(config: &Config) -> Result<Client> {
   Ok(Client::builder()
      .timeout(config.request_timeout())
      .build()?)
}

/// Passes 2xx responses through; anything else becomes a provider error
/// carrying the status and body.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
   let status = response.status();
   if status.is_success() {
      return Ok(response);
   }

   let body = response.text().await.unwrap_or_default();
   Err(Error::Provider(format!("OpenAI API error {status}: {}", body.trim())))
}

pub struct OpenAiChat {
   client:   Client,
   endpoint: String,
   api_key:  String,
   model:    String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
   model:       &'a str,
   messages:    [Message<'a>; 2],
   temperature: f32,
   max_tokens:  u32,
}

#[derive(Serialize)]
struct Message<'a> {
   role:    &'a str,
   content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
   #[serde(default)]
   choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
   message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
   #[serde(default)]
   content: Option<String>,
}

impl OpenAiChat {
   pub fn new(config: &Config) -> Result<Self> {
      let api_key = config
         .api_key()
         .ok_or(Error::MissingConfig("openai_api_key"))?
         .to_string();

      Ok(Self {
         client: build_client(config)?,
         endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
         api_key,
         model: config.chat_model.clone(),
      })
   }

   fn body<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
      ChatRequest {
         model:       &self.model,
         messages:    [
            Message { role: "system", content: &request.system },
            Message { role: "user", content: &request.user },
         ],
         temperature: request.temperature,
         max_tokens:  request.max_tokens,
      }
   }
}

#[async_trait::async_trait]
impl ChatModel for OpenAiChat {
   async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>> {
      let response = self
         .client
         .post(&self.endpoint)
         .bearer_auth(&self.api_key)
         .json(&self.body(request))
         .send()
         .await?;

      let reply: ChatResponse = check_status(response).await?.json().await?;
      Ok(first_content(reply))
   }
}

fn first_content(reply: ChatResponse) -> Option<String> {
   reply
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
}
