use std::io::Write;

use ollama_client::{ChatOptions, ChatRequestMessage, OllamaClient, DEFAULT_BASE_URL};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let model = std::env::var("OLLAMA_MODEL")
        .unwrap_or_else(|_| "fluffy/l3-8b-stheno-v3.2:latest".to_string());

    let client = OllamaClient::with_base_url(base_url);
    let messages = vec![ChatRequestMessage::new("user", "Hello, how are you?")];

    let response = client
        .chat_stream(&model, messages, ChatOptions::default(), |chunk| async move {
            print!("{}", chunk.content);
            std::io::stdout().flush()?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    println!("\n\n({} chars)", response.chars().count());

    Ok(())
}
