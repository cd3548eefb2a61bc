//! Interactive driver for the keyboard core.
//!
//! Each input line is either plain text, typed one character at a time, or a
//! `:command`. After every line the field content, composing text, mode and
//! suggestions are printed.
//!
//! Usage:
//!   cargo run -p softkey-core --bin softkey -- --dict-dir data --language en
//!   RUST_LOG=debug cargo run -p softkey-core --bin softkey -- --store prefs.json

use anyhow::Context;
use clap::Parser;
use softkey_core::{
    DictionarySource, DirectorySource, FileStore, InputRouter, KeyValueStore, KeyboardConfig,
    MemoryStore, Mode, PredictionEngine, RouterEvent, StaticSource, TextBuffer,
};
use std::cell::RefCell;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "softkey")]
#[command(about = "Type into an in-memory text field through the keyboard core")]
struct Args {
    /// Directory holding tr_full.txt / en_full.txt word lists
    #[arg(short, long)]
    dict_dir: Option<PathBuf>,

    /// Language code (overrides the config file)
    #[arg(short, long)]
    language: Option<String>,

    /// JSON file for shortcuts and clipboard history (in-memory if omitted)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

const DEMO_WORDS: &str = "\
the 500
to 400
test 60
tea 40
team 35
thanks 30
merhaba 50
merak 20
teşekkürler 45
";

const HELP: &str = "\
  text          type the characters
  :space :enter :tab :bs
  :shift :caps
  :mode <normal|emoji|gif|translate|clipboard>
  :pick <n>     tap suggestion n (1-based)
  :lp <key>     long-press key, then :drag <x> and :up
  :cancel       abandon the long press
  :clip <text>  add text to clipboard history
  :paste <n>    insert clipboard entry n (1-based)
  :lang <code>  switch language
  :help";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => KeyboardConfig::load_toml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => KeyboardConfig::default(),
    };
    if let Some(language) = args.language {
        config.language = language;
    }

    let source: Arc<dyn DictionarySource> = match &args.dict_dir {
        Some(dir) => Arc::new(DirectorySource::new(dir)),
        None => {
            println!("ℹ No --dict-dir given, using the built-in demo word list");
            Arc::new(
                StaticSource::new()
                    .with_list("tr", DEMO_WORDS)
                    .with_list("en", DEMO_WORDS),
            )
        }
    };

    let engine = Arc::new(PredictionEngine::with_max_words(config.max_dictionary_words));
    match engine
        .spawn_load(config.language.clone(), Arc::clone(&source))
        .join()
    {
        Ok(Ok(outcome)) => println!("✓ Dictionary: {:?}", outcome),
        Ok(Err(e)) => eprintln!("⚠ {}", e),
        Err(_) => anyhow::bail!("dictionary loader thread panicked"),
    }

    let store: Arc<dyn KeyValueStore> = match &args.store {
        Some(path) => Arc::new(FileStore::new(path)),
        None => Arc::new(MemoryStore::new()),
    };

    let mut router = InputRouter::new(Arc::clone(&engine), store, config);
    let field = Rc::new(RefCell::new(TextBuffer::new()));
    router.start_input(Box::new(Rc::clone(&field)));

    println!("Ready. Type text or :help. Ctrl+D to exit.");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim_end_matches(['\r', '\n']);
        if input.is_empty() {
            continue;
        }

        match input.strip_prefix(':') {
            Some(command) => {
                if !run_command(&mut router, &engine, &source, command) {
                    println!("{}", HELP);
                    continue;
                }
            }
            None => {
                for c in input.chars() {
                    router.on_character(&c.to_string());
                }
            }
        }

        for event in router.take_events() {
            match event {
                RouterEvent::ShortcutFired(fired) => println!("  {}", fired.feedback_text()),
                RouterEvent::GifQueryChanged(query) => println!("  gif query: {:?}", query),
                RouterEvent::GifSearchClosed => println!("  gif search closed"),
                RouterEvent::TranslateRequested(text) => println!("  translate: {:?}", text),
                RouterEvent::ModeChanged(_) | RouterEvent::SuggestionsChanged(_) => {}
            }
        }

        println!("  field:       {:?}", field.borrow().text());
        println!("  composing:   {:?}", router.current_composing_text());
        println!("  mode:        {}", router.current_mode());
        println!("  suggestions: {:?}", router.current_suggestions());
        if let Some(popup) = router.popup() {
            println!(
                "  popup:       {:?} selected {} (centers from {:.0})",
                popup.candidates(),
                popup.selected_index(),
                popup.layout().center_x(0)
            );
        }
        println!();
    }

    router.finish_input();
    Ok(())
}

/// Run one `:command`. Returns `false` for unknown or malformed commands.
fn run_command(
    router: &mut InputRouter,
    engine: &Arc<PredictionEngine>,
    source: &Arc<dyn DictionarySource>,
    command: &str,
) -> bool {
    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match (name, arg) {
        ("space", _) => router.on_space(),
        ("enter", _) => router.on_enter(),
        ("tab", _) => router.on_tab(),
        ("bs", _) => router.on_backspace(),
        ("shift", _) => router.on_shift_toggle(),
        ("caps", _) => router.toggle_caps_lock(),
        ("mode", name) => match Mode::from_name(name) {
            Some(mode) => router.on_mode_change(mode),
            None => return false,
        },
        ("pick", n) => {
            let Some(word) = one_based(n).and_then(|i| router.current_suggestions().get(i).cloned())
            else {
                return false;
            };
            router.commit_suggestion(&word);
        }
        ("lp", key) if !key.is_empty() => {
            if !router.begin_long_press(key, 0.0) {
                println!("  (no variants for {:?})", key);
            }
        }
        ("drag", x) => match x.parse::<f32>() {
            Ok(x) => {
                router.on_drag_to(x, 0.0);
            }
            Err(_) => return false,
        },
        ("up", _) => {
            if let Some(value) = router.end_long_press() {
                println!("  long press -> {:?}", value);
            }
        }
        ("cancel", _) => router.cancel_long_press(),
        ("clip", text) if !text.is_empty() => router.clipboard().add_clip(text),
        ("paste", n) => match one_based(n) {
            Some(index) if router.insert_clip(index) => {}
            _ => return false,
        },
        ("lang", code) if !code.is_empty() => {
            router.set_language(code);
            if let Err(e) = engine.load(code, &**source) {
                eprintln!("⚠ {}", e);
            }
        }
        _ => return false,
    }
    true
}

fn one_based(n: &str) -> Option<usize> {
    n.parse::<usize>().ok()?.checked_sub(1)
}
