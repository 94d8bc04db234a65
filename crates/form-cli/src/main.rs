mod wizard;

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use form_engine::{
    FormRepository, MemoryCredentialStore, MemoryFormRepository, MemorySubmissionRepository,
    RestTableClient, SubmissionEngine, SubmissionReceipt,
};
use form_spec::{
    AnswerSet, Form, OwnerCredentials, RenderQuestion, build_render_payload, is_blank,
    map_to_external_record, render_text, resolve_visible, validate,
};
use serde_json::Value;
use wizard::{PromptContext, Verbosity, WizardPresenter, parse_answer};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form filling and submission CLI",
    long_about = "Fills forms with live conditional visibility, validates answers, and mirrors submissions into the linked external table."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill a form interactively with live conditional visibility.
    Wizard {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Optional JSON file containing initial answers.
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
        /// Show verbose output (statuses, visible questions, parse expectations).
        #[arg(long, alias = "debug")]
        verbose: bool,
    },
    /// Validate answers the way the submission path would.
    Validate {
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Print the external record the answers would map to.
    Map {
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
    },
    /// Show the current visibility state of a form.
    Show {
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        #[arg(long, value_name = "ANSWERS")]
        answers: Option<PathBuf>,
    },
    /// Submit answers: validate, write to the external table, keep a
    /// local snapshot.
    Submit {
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        #[arg(long, value_name = "ANSWERS")]
        answers: PathBuf,
        /// Access token for the owner's external account.
        #[arg(long, value_name = "TOKEN")]
        token: String,
        /// Base URL of the external table API.
        #[arg(long, value_name = "URL", default_value = "https://api.airtable.com")]
        api_url: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(error) = run(Cli::parse()) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Wizard {
            form,
            answers,
            verbose,
        } => {
            let form = load_form(&form)?;
            let answers = match answers {
                Some(path) => load_answers(&path)?,
                None => AnswerSet::new(),
            };
            run_wizard(&form, answers, verbose)
        }
        Command::Validate { form, answers } => {
            let form = load_form(&form)?;
            let answers = load_answers(&answers)?;
            let visible = resolve_visible(&form.questions, &answers);
            validate(&answers, &visible)?;
            println!("Answers are valid.");
            Ok(())
        }
        Command::Map { form, answers } => {
            let form = load_form(&form)?;
            let answers = load_answers(&answers)?;
            let record = map_to_external_record(&answers, &form.questions);
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Command::Show { form, answers } => {
            let form = load_form(&form)?;
            let answers = match answers {
                Some(path) => load_answers(&path)?,
                None => AnswerSet::new(),
            };
            println!("{}", render_text(&build_render_payload(&form, &answers)));
            Ok(())
        }
        Command::Submit {
            form,
            answers,
            token,
            api_url,
        } => {
            let form = load_form(&form)?;
            let answers = load_answers(&answers)?;
            let runtime = tokio::runtime::Runtime::new()?;
            let receipt = runtime.block_on(submit(form, answers, token, api_url))?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            Ok(())
        }
    }
}

fn load_form(path: &Path) -> CliResult<Form> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn load_answers(path: &Path) -> CliResult<AnswerSet> {
    let raw = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err("answers file must contain a JSON object".into()),
    }
}

async fn submit(
    form: Form,
    answers: AnswerSet,
    token: String,
    api_url: String,
) -> CliResult<SubmissionReceipt> {
    let form_id = form.id.clone();
    let owner_id = form.owner_id.clone();

    let forms = Arc::new(MemoryFormRepository::new());
    forms.insert_form(form).await?;
    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials
        .store(OwnerCredentials {
            owner_id,
            access_token: token,
        })
        .await;

    let engine = SubmissionEngine::new(
        forms,
        Arc::new(MemorySubmissionRepository::new()),
        credentials,
        Arc::new(RestTableClient::with_base_url(api_url)?),
    );
    Ok(engine.submit(&form_id, &answers).await?)
}

fn run_wizard(form: &Form, mut answers: AnswerSet, verbose: bool) -> CliResult<()> {
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose));
    // Optional questions the respondent chose to leave blank; without
    // this the loop would keep offering them.
    let mut skipped = BTreeSet::new();
    let stdin = io::stdin();

    loop {
        let payload = build_render_payload(form, &answers);
        presenter.show_header(&payload);
        presenter.show_status(&payload);

        let Some(question) = next_unanswered(&payload.questions, &skipped) else {
            break;
        };

        let prompt = PromptContext::new(
            question,
            payload.progress.answered,
            payload.progress.total,
        );
        presenter.show_prompt(&prompt);

        let mut line = String::new();
        print!("> ");
        io::stdout().flush()?;
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF: stop prompting and fall through to validation.
            break;
        }

        match parse_answer(question, &line) {
            Ok(Some(value)) => {
                answers.insert(question.key.clone(), value);
            }
            Ok(None) => {
                skipped.insert(question.key.clone());
            }
            Err(error) => presenter.show_parse_error(&error),
        }
    }

    // Authoritative pass over the final answer set, the same pipeline the
    // server runs at submission time.
    let visible = resolve_visible(&form.questions, &answers);
    validate(&answers, &visible)?;

    println!("Done");
    let record = map_to_external_record(&answers, &form.questions);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn next_unanswered<'a>(
    questions: &'a [RenderQuestion],
    skipped: &BTreeSet<String>,
) -> Option<&'a RenderQuestion> {
    questions.iter().find(|question| {
        question.visible && is_blank(question.current_value.as_ref()) && !skipped.contains(&question.key)
    })
}
