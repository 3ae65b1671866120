use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use voice_notes::client::{
    session::should_send_edit, NotesClient, RecognitionResult, RecordingSession,
};
use voice_notes::models::note::Note;

#[derive(Parser)]
#[command(name = "voice-notes-cli", about = "Record and manage voice notes")]
struct Cli {
    /// Base URL of the voice notes server
    #[arg(long, env = "VOICE_NOTES_URL", default_value = "http://localhost:5000")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture a transcript from stdin (one recognized phrase per line) and save it
    Record {
        #[arg(long)]
        title: Option<String>,
    },
    /// List all notes, newest first
    List,
    /// Show one note
    Show { id: String },
    /// Replace a note's transcript
    Edit { id: String, transcript: String },
    /// Delete a note
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Generate an AI summary for a note
    Summarize { id: String },
}

fn print_note(note: &Note) {
    println!("{} [{}]", note.title, note.id);
    println!("  {}", note.transcript);
    if !note.summary.is_empty() {
        println!("  AI Summary: {}", note.summary);
    }
    let mut meta = format!("  Created: {}", note.created_at.format("%Y-%m-%d %H:%M"));
    if note.updated_at != note.created_at {
        meta.push_str(&format!(" • Updated: {}", note.updated_at.format("%Y-%m-%d %H:%M")));
    }
    if note.summary_enabled() {
        meta.push_str(" • summary available");
    }
    println!("{meta}");
}

async fn read_line() -> std::io::Result<Option<String>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    lines.next_line().await
}

async fn record(client: &NotesClient, title: Option<String>) -> Result<()> {
    let mut session = RecordingSession::new();
    session.start()?;
    if let Some(title) = title {
        session.set_title(title);
    }
    eprintln!("Recording... enter one phrase per line, end with Ctrl-D");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading transcript from stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        session.on_results(&[RecognitionResult::finalized(line.trim())]);
    }
    session.stop();

    let draft = session.draft()?;
    let note = client.create(&draft).await.context("saving note")?;
    session.clear();

    println!("Note saved successfully!");
    print_note(&note);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let client = NotesClient::new(&cli.api_url);

    match cli.command {
        Command::Record { title } => record(&client, title).await?,
        Command::List => {
            let notes = client.list().await.context("listing notes")?;
            if notes.is_empty() {
                println!("No notes yet. Run `voice-notes-cli record` to create your first voice note!");
            }
            for note in &notes {
                print_note(note);
            }
        }
        Command::Show { id } => {
            let note = client
                .get(&id)
                .await
                .with_context(|| format!("fetching note {id}"))?;
            print_note(&note);
        }
        Command::Edit { id, transcript } => {
            let note = client
                .get(&id)
                .await
                .with_context(|| format!("fetching note {id}"))?;
            if !should_send_edit(&note, &transcript) {
                println!("Nothing to update");
                return Ok(());
            }
            let note = client
                .update(&id, &transcript)
                .await
                .with_context(|| format!("updating note {id}"))?;
            println!("Note updated! Summary can be generated again.");
            print_note(&note);
        }
        Command::Delete { id, yes } => {
            if !yes {
                eprint!("Are you sure you want to delete this note? [y/N] ");
                let answer = read_line().await.context("reading confirmation")?;
                if !matches!(answer.as_deref().map(str::trim), Some("y") | Some("Y")) {
                    println!("Cancelled");
                    return Ok(());
                }
            }
            client
                .delete(&id)
                .await
                .with_context(|| format!("deleting note {id}"))?;
            println!("Note deleted!");
        }
        Command::Summarize { id } => {
            let note = client
                .get(&id)
                .await
                .with_context(|| format!("fetching note {id}"))?;
            if !note.summary_enabled() {
                println!("Summary is up to date: {}", note.summary);
                return Ok(());
            }
            let summary = client
                .summarize(&id)
                .await
                .with_context(|| format!("summarizing note {id}"))?;
            println!("AI Summary: {summary}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    run(Cli::parse()).await
}
