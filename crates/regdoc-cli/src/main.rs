//! Regdoc CLI: list, upload and ask about regional documents from a terminal.
//!
//! Reads the same environment as the API server (storage backend, regions and
//! ANTHROPIC_API_KEY). The caller's identity comes from --region, --role and
//! --identity or REGDOC_REGION, REGDOC_ROLE and REGDOC_IDENTITY.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use regdoc_cli::{
    format_document_table, init_tracing, quick_question_for, read_upload_file, render_message,
    resolve_user, ListOutput, OutputFormat, Portal,
};
use regdoc_core::models::{UploadOutcome, UserContext};
use regdoc_core::{Config, RegionSet};
use regdoc_services::{create_language_model, quick_questions, ChatSession};
use regdoc_storage::create_storage;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "regdoc", about = "Regional document portal CLI")]
struct Cli {
    #[command(flatten)]
    identity: IdentityArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IdentityArgs {
    /// Region code of the caller; super administrators default to ALL
    #[arg(long, global = true, env = "REGDOC_REGION")]
    region: Option<String>,
    /// Role tag: admin or super-admin
    #[arg(long, global = true, env = "REGDOC_ROLE")]
    role: Option<String>,
    /// Display label, usually an e-mail address
    #[arg(long, global = true, env = "REGDOC_IDENTITY")]
    identity: Option<String>,
}

impl IdentityArgs {
    fn user(&self, regions: &RegionSet) -> anyhow::Result<UserContext> {
        resolve_user(
            self.region.as_deref(),
            self.role.as_deref(),
            self.identity.clone(),
            regions,
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the documents visible to the caller
    List {
        /// Region filter (super administrators only); ALL lists everything
        #[arg(long)]
        region_filter: Option<String>,
        /// Case-insensitive search over name and region
        #[arg(long)]
        search: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Upload a file into the caller's region
    Upload {
        /// Path to the file to upload
        file: PathBuf,
    },
    /// Ask one question, optionally grounded on a stored document
    Ask {
        question: String,
        /// Storage key of the document to ground on
        #[arg(long)]
        document: Option<String>,
    },
    /// Interactive chat session
    Chat {
        /// Storage key of the document to ground on
        #[arg(long)]
        document: Option<String>,
    },
    /// Check storage and language model connectivity
    Status,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let storage = create_storage(&config)
        .await
        .context("Failed to initialize document storage")?;
    let model =
        create_language_model(&config.llm).context("Failed to initialize language model client")?;
    tracing::debug!(
        storage_backend = %config.storage_backend(),
        regions = config.regions().len(),
        grounding_mode = config.grounding_mode().as_str(),
        "CLI configured"
    );
    let portal = Portal::new(&config, storage, model);

    match cli.command {
        Commands::List {
            region_filter,
            search,
            format,
        } => {
            let user = cli.identity.user(config.regions())?;
            let listing = portal.lister.list_documents(&user).await;
            let output = ListOutput::new(
                &listing,
                &user,
                region_filter.as_deref(),
                search.as_deref(),
            );
            match format {
                OutputFormat::Json => print_json(&output)?,
                OutputFormat::Table => print!("{}", format_document_table(&output)),
            }
        }
        Commands::Upload { file } => {
            let user = cli.identity.user(config.regions())?;
            let region = user.upload_region().with_context(|| {
                format!(
                    "No upload region for {}; pass --region with a region code",
                    user.identity
                )
            })?;

            let upload = read_upload_file(&file).await?;
            match portal.uploader.upload(upload, region).await {
                UploadOutcome::Stored(receipt) => print_json(&receipt)?,
                UploadOutcome::Failed { error } => anyhow::bail!("Upload failed: {}", error),
            }
        }
        Commands::Ask { question, document } => {
            let user = cli.identity.user(config.regions())?;
            if question.trim().is_empty() {
                anyhow::bail!("Question must not be empty");
            }

            let document_text = match document {
                Some(key) => portal.document_context(&user, &key).await?.1,
                None => String::new(),
            };
            let answer = portal
                .responder
                .ask(question.trim(), &document_text, &user.region, user.role)
                .await?;
            println!("{}", answer);
        }
        Commands::Chat { document } => {
            let user = cli.identity.user(config.regions())?;
            run_chat(&portal, user, document).await?;
        }
        Commands::Status => {
            print_json(&portal.status().await)?;
        }
    }

    Ok(())
}

async fn run_chat(portal: &Portal, user: UserContext, document: Option<String>) -> anyhow::Result<()> {
    let questions = quick_questions(&user);
    let mut session = ChatSession::new(user.clone(), portal.responder.clone());
    session.start().await;

    if let Some(key) = document {
        let (doc, text) = portal.document_context(&user, &key).await?;
        session.set_document_context(text);
        println!("Grounded on {} ({})\n", doc.name, doc.region);
    }

    for message in session.transcript().messages() {
        println!("{}\n", render_message(message));
    }
    print_quick_questions(&questions);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "/quit" | "/exit" => break,
            "/restart" => {
                session.restart();
                for message in session.transcript().messages() {
                    println!("{}\n", render_message(message));
                }
                continue;
            }
            "/questions" => {
                print_quick_questions(&questions);
                continue;
            }
            _ => {}
        }

        let question = quick_question_for(input, &questions).unwrap_or(input);
        if let Some(reply) = session.send(question).await {
            println!("{}\n", render_message(reply));
        }
    }

    Ok(())
}

fn print_quick_questions(questions: &[String]) {
    println!("Quick questions (type the number to ask):");
    for (index, question) in questions.iter().enumerate() {
        println!("  {}. {}", index + 1, question);
    }
    println!("Commands: /questions, /restart, /quit\n");
}
