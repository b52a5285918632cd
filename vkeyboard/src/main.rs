use std::cell::RefCell;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use vkeyboard::{
    create_session_from_profile, parse_script, play_all, share, KeyboardEvent, KeyboardProfile,
    KeyboardSession, LayoutKind, SlotGrid, StrokeOutcome, TextField, TextTarget, PRESET_NAMES,
};

#[derive(Parser)]
#[command(name = "vkeyboard")]
#[command(about = "Drive the on-screen keyboard engine from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Keyboard profile (TOML); overrides --preset
    #[arg(short, long, global = true)]
    profile: Option<PathBuf>,

    /// Built-in layout preset
    #[arg(long, global = true, default_value = "qwerty")]
    preset: String,

    /// Single key script for quick testing
    script: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive REPL mode
    Repl {
        #[command(flatten)]
        field: FieldArgs,
    },
    /// Play a key script against a text field and print the result
    Type {
        /// Key script, e.g. "hello :space :shift world :submit"
        script: String,
        #[command(flatten)]
        field: FieldArgs,
    },
    /// Print a layout as bound onto the slot grid
    Show {
        #[arg(value_enum, default_value_t = LayoutArg::Alpha)]
        layout: LayoutArg,
    },
    /// List built-in presets
    Presets,
    /// Print the effective profile as TOML
    Profile,
}

#[derive(clap::Args, Clone, Default)]
struct FieldArgs {
    /// Initial field content; the caret starts at the end
    #[arg(long, default_value = "")]
    text: String,
    /// Initial selection as ANCHOR:FOCUS (char offsets)
    #[arg(long, value_parser = parse_selection)]
    select: Option<(usize, usize)>,
    /// Treat the field as multi-line (return inserts a line break)
    #[arg(long)]
    multiline: bool,
    /// The field selects all of its text when focused
    #[arg(long)]
    select_all_on_focus: bool,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum LayoutArg {
    Alpha,
    Shift,
    Caps,
    Numbers,
    Symbols,
}

impl From<LayoutArg> for LayoutKind {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Alpha => LayoutKind::Alpha,
            LayoutArg::Shift => LayoutKind::Shift,
            LayoutArg::Caps => LayoutKind::Caps,
            LayoutArg::Numbers => LayoutKind::Numbers,
            LayoutArg::Symbols => LayoutKind::Symbols,
        }
    }
}

fn parse_selection(s: &str) -> Result<(usize, usize), String> {
    let (anchor, focus) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ANCHOR:FOCUS, got '{}'", s))?;
    let anchor = anchor.trim().parse().map_err(|e| format!("bad anchor: {}", e))?;
    let focus = focus.trim().parse().map_err(|e| format!("bad focus: {}", e))?;
    Ok((anchor, focus))
}

fn load_profile(cli: &Cli) -> Result<KeyboardProfile> {
    match &cli.profile {
        Some(path) => KeyboardProfile::load_toml(path),
        None => Ok(KeyboardProfile {
            preset: cli.preset.clone(),
            ..KeyboardProfile::default()
        }),
    }
}

fn build_field(args: &FieldArgs) -> Rc<RefCell<TextField>> {
    let mut field = TextField::with_content(args.text.as_str());
    if let Some((anchor, focus)) = args.select {
        field = field.with_selection(anchor, focus);
    }
    if args.multiline {
        field = field.multiline();
    }
    if args.select_all_on_focus {
        field = field.with_select_all_on_focus();
    }
    share(field)
}

fn open_session(
    profile: &KeyboardProfile,
    field: &Rc<RefCell<TextField>>,
) -> Result<KeyboardSession<SlotGrid>> {
    let mut session = create_session_from_profile(profile)?;
    session.on_focus(field.clone());
    session.flush();
    Ok(session)
}

fn print_events(session: &mut KeyboardSession<SlotGrid>) {
    for event in session.take_events() {
        match event {
            KeyboardEvent::Opened { layout } => println!("  > opened ({})", layout),
            KeyboardEvent::Closed => println!("  > closed"),
            KeyboardEvent::LayoutChanged { layout } => println!("  > layout {}", layout),
            KeyboardEvent::Submitted => println!("  > submitted"),
        }
    }
    if let Some(err) = session.keyboard().last_bind_error() {
        eprintln!("  ! layout bind failed: {}", err);
    }
}

fn print_field(field: &Rc<RefCell<TextField>>) {
    let f = field.borrow();
    let (lo, hi) = f.selection();
    if lo == hi {
        println!("text: {:?}  caret: {}", f.content(), f.caret());
    } else {
        println!("text: {:?}  selection: {}..{}", f.content(), lo, hi);
    }
    if f.submit_count() > 0 {
        println!("submitted: {} time(s)", f.submit_count());
    }
}

fn run_script(session: &mut KeyboardSession<SlotGrid>, script: &str) -> Result<()> {
    let strokes = parse_script(script)?;
    let outcomes = play_all(session, &strokes);
    for (stroke, outcome) in strokes.iter().zip(outcomes) {
        if outcome == StrokeOutcome::NotOnLayout {
            println!("  ? {:?} is not on the current layout", stroke);
        }
    }
    session.flush();
    Ok(())
}

fn handle_type_command(profile: &KeyboardProfile, script: &str, args: &FieldArgs) -> Result<()> {
    let field = build_field(args);
    let mut session = open_session(profile, &field)?;
    run_script(&mut session, script)?;
    print_events(&mut session);
    print_field(&field);
    println!("layout: {}", session.keyboard().active_layout());
    Ok(())
}

fn handle_show_command(profile: &KeyboardProfile, layout: LayoutKind) -> Result<()> {
    let field = build_field(&FieldArgs::default());
    let mut session = open_session(profile, &field)?;
    session.keyboard_mut().set_active_layout(layout, false);
    let keyboard = session.keyboard();
    println!("{} ({})", keyboard.active_layout_config().name, layout);
    print!("{}", keyboard.binder().render());
    if let Some(err) = keyboard.last_bind_error() {
        eprintln!("layout bind failed: {}", err);
    }
    Ok(())
}

fn run_repl(profile: &KeyboardProfile, args: &FieldArgs) -> Result<()> {
    let field = build_field(args);
    let mut session = open_session(profile, &field)?;
    session.take_events();

    println!("vkeyboard demo REPL - type a key script and press Enter");
    println!("Example: hello :space :shift world :submit");
    println!("Commands: /show  /blur  /focus  /quit");
    println!("Ctrl-D to exit.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let raw = match line {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("error reading stdin: {}", e);
                break;
            }
        };
        let input = raw.trim();
        match input {
            "" => continue,
            "/quit" => break,
            "/show" => {
                let keyboard = session.keyboard();
                println!("{}", keyboard.active_layout_config().name);
                print!("{}", keyboard.binder().render());
                continue;
            }
            "/blur" => session.on_blur(),
            "/focus" => session.on_focus(field.clone()),
            script => {
                if let Err(e) = run_script(&mut session, script) {
                    eprintln!("  ! {}", e);
                    continue;
                }
            }
        }
        session.flush();
        print_events(&mut session);
        print_field(&field);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let profile = load_profile(&cli)?;

    match cli.command {
        Some(Commands::Repl { field }) => run_repl(&profile, &field),
        Some(Commands::Type { script, field }) => handle_type_command(&profile, &script, &field),
        Some(Commands::Show { layout }) => handle_show_command(&profile, layout.into()),
        Some(Commands::Presets) => {
            for name in PRESET_NAMES {
                println!("{}", name);
            }
            Ok(())
        }
        Some(Commands::Profile) => {
            print!("{}", profile.to_toml_string()?);
            Ok(())
        }
        None => {
            let field = FieldArgs::default();
            match cli.script {
                Some(script) => handle_type_command(&profile, &script, &field),
                None => run_repl(&profile, &field),
            }
        }
    }
}
