use anyhow::{bail, Context, Result};
use console::style;
use newsroom_core::chat::ChatApi;
use newsroom_core::research::ResearchReport;
use tracing::info;

use crate::app::{prompt_query, prompt_urls, Newsroom};
use crate::cli::ResearchArgs;

const MAX_WIDTH: usize = 100;

// --- Handler Functions ---

pub async fn handle_research(args: ResearchArgs, mut newsroom: Newsroom) -> Result<()> {
    if let Some(model) = args.model {
        newsroom.config.chat_model = model;
    }
    if let Some(temperature) = args.temperature {
        newsroom.config.temperature = temperature;
    }
    if let Some(max_tokens) = args.max_tokens {
        newsroom.config.max_tokens = max_tokens;
    }

    let urls = match args.urls {
        urls if !urls.is_empty() => urls,
        _ if console::user_attended() => prompt_urls().await?,
        _ => bail!("No article URLs given. Pass them with --url."),
    };
    let query = match args.query {
        Some(query) => query,
        None if console::user_attended() => prompt_query().await?,
        None => bail!("No research question given. Pass it with --query."),
    };

    let researcher = newsroom.researcher().await?;
    let report = researcher.research(&urls, &query).await.context("Research failed")?;
    info!(request_id = %report.request_id, source = %report.source, degraded = report.degraded, "Research complete.");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub async fn handle_models(newsroom: Newsroom) -> Result<()> {
    let client = newsroom.chat_client().await?;
    let mut models = client.list_models().await.context("Failed to list models")?;
    models.sort_by(|a, b| a.id.cmp(&b.id));

    for model in models {
        let marker = if model.id == client.default_model() { "*" } else { " " };
        print!("{} {}", marker, style(&model.id).bold());
        if let Some(owner) = &model.owned_by {
            print!("  {}", style(owner).dim());
        }
        if let Some(window) = model.context_window {
            print!("  {}", style(format!("{} tokens", window)).dim());
        }
        println!();
    }
    Ok(())
}

fn print_report(report: &ResearchReport) {
    let width = console::Term::stdout().size().1.clamp(40, MAX_WIDTH as u16) as usize;

    println!("{}", style("Answer").bold().cyan());
    println!("{}", textwrap::fill(&report.answer, width));
    println!();
    println!("{}", style("Source").bold().cyan());
    println!("{}", report.source);

    if let Some(reason) = &report.fallback_reason {
        println!();
        let warning = format!("Could not rank the articles ({}); the first article was used instead.", reason);
        println!("{} {}", style("warning:").yellow().bold(), textwrap::fill(&warning, width.saturating_sub(9)));
    }
}
