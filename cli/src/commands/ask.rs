use super::AskArgs;
use deepculture_client::{DeepCultureClient, SequenceEvent, Sequencer};
use std::time::Duration;
use tokio::sync::mpsc;

pub async fn run(args: AskArgs) -> Result<(), String> {
    let AskArgs {
        question,
        url,
        delay_ms,
    } = args;

    if question.trim().is_empty() {
        return Err("Question cannot be empty".to_string());
    }

    let client = DeepCultureClient::new(url);
    let answer = client
        .initial_question(&question)
        .await
        .map_err(|e| format!("Initial question failed: {}", e))?;

    println!("{}", answer.initial_response);
    println!();
    println!("{}", answer.json_file_message);

    let analyses = match (answer.analyses_list, answer.analyses_list_error) {
        (Some(analyses), _) => analyses,
        (None, Some(error)) => {
            return Err(format!("Could not fetch the analysis list: {}", error));
        }
        (None, None) => return Ok(()),
    };

    println!();
    println!("Suggested analyses:");
    for (position, entry) in analyses.iter().enumerate() {
        println!("  {}. {}: {}", position + 1, entry.analysis_type, entry.description);
    }
    if let Some(message) = answer.analyses_json_file_message {
        println!("{}", message);
    }

    let (tx, mut rx) = mpsc::channel(16);
    let total = analyses.len();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                SequenceEvent::Pending {
                    index,
                    analysis_type,
                } => {
                    eprintln!("[{}/{}] {} ...", index + 1, total, analysis_type);
                }
                SequenceEvent::Completed { reply, .. } => {
                    println!();
                    println!("## {} analysis", reply.analysis_type);
                    println!("{}", reply.analysis_response);
                }
                SequenceEvent::Failed {
                    analysis_type,
                    error,
                    ..
                } => {
                    eprintln!("Analysis {} failed: {}", analysis_type, error);
                }
                SequenceEvent::Finished(summary) => {
                    eprintln!(
                        "Done: {} completed, {} failed",
                        summary.completed, summary.failed
                    );
                }
            }
        }
    });

    let sequencer = Sequencer::new(client).with_delay(Duration::from_millis(delay_ms));
    sequencer.run(&question, &analyses, &tx).await;
    drop(tx);

    printer
        .await
        .map_err(|e| format!("Output task failed: {}", e))
}
