//! Terminal chat against the RAG backend, falling back to canned answers.
//!
//! Configure with FOLIO_API_URL, FOLIO_SESSION_ID and FOLIO_ACCESS_TOKEN.
//! Without FOLIO_API_URL every reply comes from the canned table.
//!
//! Run with: RUST_LOG=folio=debug cargo run --example chat_repl -p folio-session

use std::io::{BufRead, Write};

use folio_client::{ClientConfig, RagApi};
use folio_session::{
    ChatSession, HEALTH_POLL_INTERVAL, HealthMonitor, SessionConfig, SessionEvent,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let api = RagApi::from_config(&ClientConfig::from_env());

    let mut session = ChatSession::with_config(api.clone(), SessionConfig::demo());
    let monitor = HealthMonitor::spawn(api, HEALTH_POLL_INTERVAL, session.cancellation_token());
    session.attach_status(monitor.status_sender());

    // Print increments as they arrive while a reply holds the session.
    let mut events = session.subscribe();
    let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Delta(text) => print!("{text}"),
                SessionEvent::FellBack(text) => {
                    print!("{text}");
                    let _ = done_tx.send(());
                }
                _ => {
                    let _ = done_tx.send(());
                }
            }
            let _ = std::io::stdout().flush();
        }
    });

    if let Some(greeting) = session.messages().first() {
        println!("bot> {}", greeting.content);
    }

    let stdin = std::io::stdin();
    loop {
        print!("[{}] you> ", monitor.status());
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        session.set_input(line.trim_end_matches(['\r', '\n']));

        let Some(pending) = session.submit_input() else {
            continue;
        };
        print!("bot> ");
        std::io::stdout().flush()?;
        let outcome = session.respond(pending).await;
        done_rx.recv().await;
        println!();
        tracing::debug!(?outcome, "reply finished");
    }

    session.close();
    drop(session);
    monitor.stop().await;
    printer.await?;
    Ok(())
}
