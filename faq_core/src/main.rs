//! faqbot - FAQ responder CLI
//!
//! Answers questions from the knowledge bases on the command line, or runs an
//! interactive chat over stdin.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use faq_base::{EntryId, IntentSet};
use faq_core::{
    BotConfig, DialogueShell, Formatter, IntentMatcher, Library, Session, Sessions, UserId,
};

/// faqbot - answer questions from a curated knowledge base
#[derive(Parser, Debug)]
#[command(name = "faqbot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file path (TOML)
    #[arg(long, global = true, env = "FAQBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a single question
    Ask(AskArgs),

    /// Chat interactively over stdin
    Chat,

    /// Show how each entry scored against a question
    Explain(ExplainArgs),

    /// Print one entry as it would be answered
    Show(ShowArgs),

    /// Match text against the intent set
    Intent {
        /// Text to classify
        text: String,
    },

    /// Show knowledge base statistics
    Stats,
}

#[derive(Args, Debug)]
struct AskArgs {
    /// Question text
    text: String,

    /// Also consult exam cards
    #[arg(long)]
    exam: bool,
}

#[derive(Args, Debug)]
struct ExplainArgs {
    /// Question text
    text: String,

    /// Score the exam base instead of the FAQ
    #[arg(long)]
    exam: bool,

    /// Show at most this many entries
    #[arg(long, default_value_t = 5)]
    top: usize,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Entry ID: its key, or `#N` for the N-th element of the source
    id: String,

    /// Look in the exam base instead of the FAQ
    #[arg(long)]
    exam: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": true,
                    "message": format!("{e:#}"),
                });
                println!("{}", serde_json::to_string(&error_json).unwrap_or_default());
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = BotConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    match &cli.command {
        Commands::Ask(args) => ask(&config, args, cli.json),
        Commands::Chat => chat(&config),
        Commands::Explain(args) => explain(&config, args, cli.json),
        Commands::Show(args) => show(&config, args, cli.json),
        Commands::Intent { text } => intent(&config, text, cli.json),
        Commands::Stats => stats(&config, cli.json),
    }
}

fn ask(config: &BotConfig, args: &AskArgs, json: bool) -> Result<()> {
    let shell = DialogueShell::new(config);
    let mut session = Session {
        exam_mode: args.exam,
    };
    let reply = shell.handle(&mut session, &args.text);
    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply.text);
    }
    Ok(())
}

fn chat(config: &BotConfig) -> Result<()> {
    let shell = DialogueShell::new(config);
    let mut sessions = Sessions::new();
    let user = UserId(0);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if !line.trim().is_empty() {
            let reply = shell.handle_user(&mut sessions, user, &line);
            writeln!(stdout, "{}\n", reply.text)?;
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn explain(config: &BotConfig, args: &ExplainArgs, json: bool) -> Result<()> {
    let library = Library::load(&config.knowledge);
    let base = if args.exam { &library.exam } else { &library.faq };
    let ranker = config.ranker();

    if json {
        let tallies: Vec<_> = ranker.explain(base, &args.text).into_iter().take(args.top).collect();
        println!("{}", serde_json::to_string_pretty(&tallies)?);
        return Ok(());
    }

    let normalized = ranker.normalizer().analyze(&args.text);
    println!("query: {:?}", normalized.text);

    let tallies = ranker.explain(base, &args.text);
    if tallies.is_empty() {
        println!("no entry scored");
        return Ok(());
    }

    for tally in tallies.iter().take(args.top) {
        let entry = &base.entries()[tally.position];
        println!("{:>6.2}  {} [{}]", tally.total(), entry.id, entry.kind);
        for hit in &tally.hits {
            println!(
                "        {:?} {:?} sim={:.2} +{:.2}",
                hit.kind, hit.keyword, hit.similarity, hit.award
            );
        }
        if tally.bonus > 0.0 {
            println!("        bonus +{:.2}", tally.bonus);
        }
    }

    let result = ranker.rank(base, &args.text);
    match result.entry {
        Some(entry) => println!("winner: {} ({:.2})", entry.id, result.score),
        None => println!(
            "no winner: best {:.2} <= gate {:.2}",
            result.score,
            ranker.config().min_score
        ),
    }
    Ok(())
}

fn show(config: &BotConfig, args: &ShowArgs, json: bool) -> Result<()> {
    let library = Library::load(&config.knowledge);
    let base = if args.exam { &library.exam } else { &library.faq };
    let id = EntryId::parse(&args.id);
    let entry = base
        .get(&id)
        .with_context(|| format!("no entry {} in {}", id, base.name()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
    } else {
        println!("{}", Formatter::new(config.dialogue.disclaimer.clone()).format(entry));
    }
    Ok(())
}

fn intent(config: &BotConfig, text: &str, json: bool) -> Result<()> {
    let path = config
        .knowledge
        .intents_path
        .as_deref()
        .context("no intents_path configured")?;
    let set = IntentSet::try_load(path)
        .with_context(|| format!("failed to load intents from {}", path.display()))?;

    let ranker = config.ranker();
    let matcher = IntentMatcher::new(
        &set,
        ranker.normalizer().clone(),
        ranker.similarity().clone(),
    );
    let found = matcher.match_text(text);
    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }
    match found {
        Some(found) => println!("{} ({:.1})", found.name, found.score),
        None => println!("no intents loaded"),
    }
    Ok(())
}

fn stats(config: &BotConfig, json: bool) -> Result<()> {
    let library = Library::load(&config.knowledge);
    if json {
        let stats: Vec<_> = [&library.faq, &library.exam]
            .into_iter()
            .map(|base| {
                serde_json::json!({
                    "name": base.name(),
                    "entries": base.len(),
                    "searchable": base.searchable_count(),
                    "sections": base.sections(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    for base in [&library.faq, &library.exam] {
        println!(
            "{}: {} entries, {} searchable",
            base.name(),
            base.len(),
            base.searchable_count()
        );
        for section in base.sections() {
            println!("  {}", section);
        }
    }
    Ok(())
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,faq_core=info,faq_base=info",
        1 => "info,faq_core=debug,faq_base=debug",
        2 => "debug,faq_core=trace,faq_base=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
