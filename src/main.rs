//! Trivia Core entry point
//!
//! Native: a small command-line front end over a file-backed data directory.
//! Web: wires the stores to LocalStorage and the document theme.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    use std::rc::Rc;
    use trivia_core::TriviaApp;
    use trivia_core::platform::{BodyClassTheme, LocalStorage, SystemClock};

    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let app = TriviaApp::new(
        Rc::new(LocalStorage),
        Box::new(BodyClassTheme),
        Rc::new(SystemClock),
    );
    log::info!(
        "Trivia core ready: {} results, {} favorites",
        app.stats.len(),
        app.favorites.count()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use cli::{Cli, Commands};
    use std::rc::Rc;
    use trivia_core::TriviaApp;
    use trivia_core::platform::{FileStorage, LogTheme, SystemClock};

    let args = Cli::parse();
    env_logger::init();

    let storage = match FileStorage::open(&args.data_dir) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("Cannot open data directory {}: {}", args.data_dir.display(), err);
            std::process::exit(1);
        }
    };
    log::info!("Trivia core (native) using {}", storage.root().display());

    let clock = Rc::new(SystemClock);
    let mut app = TriviaApp::new(Rc::new(storage), Box::new(LogTheme), clock.clone());

    match args.command.unwrap_or(Commands::Stats) {
        Commands::Stats => cli::print_stats(&app, clock.as_ref()),
        Commands::Favorites => cli::print_favorites(&app),
        Commands::Settings => println!("{:#?}", app.settings.get_all()),
        Commands::DarkMode { state } => cli::set_dark_mode(&mut app, state),
        Commands::Demo => cli::run_demo(&mut app),
        Commands::ClearStats => {
            app.stats.clear();
            println!("History cleared.");
        }
        Commands::ClearFavorites => {
            app.favorites.clear();
            println!("Favorites cleared.");
        }
        Commands::ResetSettings => {
            app.settings.reset_to_default();
            println!("Settings reset.");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::{Parser, Subcommand, ValueEnum};
    use trivia_core::consts::{DATA_DIR_ENV, DEFAULT_DATA_DIR, RECENT_RESULTS};
    use trivia_core::model::{Category, Difficulty, Question, QuestionType, ScoreBand};
    use trivia_core::platform::Clock;
    use trivia_core::settings::SettingsPatch;
    use trivia_core::source::StaticQuestionSource;
    use trivia_core::stats::format_relative;
    use trivia_core::{QuizRequest, TriviaApp};

    #[derive(Debug, Parser)]
    #[command(name = "trivia-core", about = "Inspect and manage local trivia data")]
    pub struct Cli {
        /// Directory holding the stored JSON documents
        #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
        pub data_dir: PathBuf,

        #[command(subcommand)]
        pub command: Option<Commands>,
    }

    #[derive(Debug, PartialEq, Eq, Subcommand)]
    pub enum Commands {
        /// Show aggregate statistics and recent results (default)
        Stats,
        /// List saved questions
        Favorites,
        /// Print the current settings
        Settings,
        /// Turn dark mode on or off
        DarkMode { state: Switch },
        /// Play a short canned quiz
        Demo,
        /// Delete the quiz history
        ClearStats,
        /// Delete all saved questions
        ClearFavorites,
        /// Restore default settings
        ResetSettings,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum Switch {
        On,
        Off,
    }

    pub fn print_stats(app: &TriviaApp, clock: &dyn Clock) {
        let stats = app.stats.aggregate();
        println!("Quizzes played:     {}", stats.total_quizzes);
        println!(
            "Questions answered: {} ({} correct)",
            stats.total_questions, stats.total_correct
        );
        println!("Average score:      {:.2}%", stats.average_score);
        println!("Best score:         {}%", stats.best_score);
        println!("Favorite category:  {}", stats.favorite_category);
        println!(
            "By difficulty:      easy {} / medium {} / hard {}",
            stats.quizzes_by_difficulty.easy,
            stats.quizzes_by_difficulty.medium,
            stats.quizzes_by_difficulty.hard
        );

        let now = clock.now_ms();
        for result in app.stats.recent(RECENT_RESULTS) {
            println!(
                "  {:>10}  {:<24} {:>3}% ({})",
                format_relative(result.timestamp, now),
                result.category,
                result.score,
                ScoreBand::from_score(result.score).as_str()
            );
        }
    }

    pub fn print_favorites(app: &TriviaApp) {
        if app.favorites.count() == 0 {
            println!("No favorites saved.");
            return;
        }
        for q in app.favorites.favorites() {
            println!("[{}] {} -> {}", q.difficulty.as_str(), q.question, q.correct_answer);
        }
    }

    pub fn set_dark_mode(app: &mut TriviaApp, state: Switch) {
        let enabled = state == Switch::On;
        app.settings.update(SettingsPatch::default().dark_mode(enabled));
        println!("Dark mode {}.", if enabled { "enabled" } else { "disabled" });
    }

    /// Play a short canned quiz, always picking the first listed answer
    pub fn run_demo(app: &mut TriviaApp) {
        let source = demo_source();
        let request = QuizRequest {
            category_id: Some(9),
            ..app.default_request()
        };
        if !app.start_quiz(&source, &request) {
            println!("No questions available.");
            return;
        }

        loop {
            let Some(question) = app.session.current_question().cloned() else {
                break;
            };
            let progress = app.session.progress();
            let pick = question.all_answers.first().cloned().unwrap_or_default();
            println!(
                "({}/{}) {} -> {}",
                progress.current, progress.total, question.question, pick
            );
            app.session.submit_answer(pick);
            if !app.session.advance() {
                break;
            }
        }

        match app.finish_quiz() {
            Ok(result) => {
                println!(
                    "Score: {}% ({}/{})",
                    result.score, result.correct_answers, result.total_questions
                );
                if let Some(first) = app.session.state().questions.first().cloned() {
                    app.favorites.add(first);
                }
            }
            Err(err) => eprintln!("Could not finish quiz: {}", err),
        }
    }

    fn demo_question(
        id: &str,
        kind: QuestionType,
        text: &str,
        correct: &str,
        wrong: &[&str],
    ) -> Question {
        let incorrect_answers: Vec<String> = wrong.iter().map(|s| s.to_string()).collect();
        let mut all_answers = incorrect_answers.clone();
        all_answers.insert(1.min(all_answers.len()), correct.to_string());
        Question {
            id: id.to_string(),
            category: "General Knowledge".into(),
            kind,
            difficulty: Difficulty::Easy,
            question: text.to_string(),
            correct_answer: correct.to_string(),
            incorrect_answers,
            all_answers,
        }
    }

    fn demo_source() -> StaticQuestionSource {
        StaticQuestionSource::new(
            vec![
                demo_question(
                    "demo-1",
                    QuestionType::Multiple,
                    "What is the capital of France?",
                    "Paris",
                    &["Lyon", "Nice", "Lille"],
                ),
                demo_question(
                    "demo-2",
                    QuestionType::Boolean,
                    "The Moon orbits the Earth.",
                    "True",
                    &["False"],
                ),
                demo_question(
                    "demo-3",
                    QuestionType::Multiple,
                    "How many legs does a spider have?",
                    "8",
                    &["6", "10", "12"],
                ),
            ],
            vec![Category {
                id: 9,
                name: "General Knowledge".into(),
            }],
        )
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
            Cli::try_parse_from(std::iter::once("trivia-core").chain(args.iter().copied()))
        }

        #[test]
        fn test_parse_subcommands() {
            let cli = parse(&["--data-dir", "/tmp/t", "clear-stats"]).unwrap();
            assert_eq!(cli.data_dir, PathBuf::from("/tmp/t"));
            assert_eq!(cli.command, Some(Commands::ClearStats));

            let cli = parse(&["--data-dir", "d", "dark-mode", "on"]).unwrap();
            let expected = Commands::DarkMode { state: Switch::On };
            assert_eq!(cli.command, Some(expected));

            let cli = parse(&["--data-dir", "d"]).unwrap();
            assert_eq!(cli.command, None);
        }

        #[test]
        fn test_rejects_bad_arguments() {
            assert!(parse(&["dark-mode", "maybe"]).is_err());
            assert!(parse(&["dark-mode"]).is_err());
            assert!(parse(&["play"]).is_err());
        }
    }
}
