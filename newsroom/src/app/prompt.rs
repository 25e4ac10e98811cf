use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, Password};

// dialoguer blocks on the terminal, so every prompt runs on the blocking pool.

pub async fn prompt_query() -> Result<String> {
    let input = tokio::task::spawn_blocking(|| {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Research question")
            .interact_text()
            .context("Failed to read research question")
    })
    .await
    .context("Blocking task failed (panic)")??;
    Ok(input)
}

/// Asks for article URLs, one per line, until an empty line.
pub async fn prompt_urls() -> Result<Vec<String>> {
    let urls = tokio::task::spawn_blocking(|| {
        let mut urls = Vec::new();
        loop {
            let url: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Article URL #{} (empty to finish)", urls.len() + 1))
                .allow_empty(true)
                .interact_text()
                .context("Failed to read URL")?;
            if url.trim().is_empty() {
                return Ok::<_, anyhow::Error>(urls);
            }
            urls.push(url.trim().to_string());
        }
    })
    .await
    .context("Blocking task failed (panic)")??;
    Ok(urls)
}

pub async fn prompt_api_key() -> Result<String> {
    let key = tokio::task::spawn_blocking(|| {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Groq API key")
            .interact()
            .context("Failed to read API key")
    })
    .await
    .context("Blocking task failed (panic)")??;
    Ok(key)
}
