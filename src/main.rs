use std::cell::RefCell;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use fretlab::audio::{AudioOutput, RecordingOutput};
use fretlab::caged::caged_boxes_for_tuning;
use fretlab::metronome::{
    find_drum_pattern, find_time_signature, MetronomeEngine, ScheduledStep, SCHEDULER_INTERVAL,
};
use fretlab::pitch::normalize_accidentals;
use fretlab::progression::{find_progression, resolve_progression};
use fretlab::tuning::{build_fretboard_for_tuning, get_instrument};
use fretlab::{describe_chord, describe_key, describe_scale, FretlabError, Result, Settings};

#[derive(Parser)]
#[command(name = "fretlab", about = "Scales, chords, fretboard voicings, tuner and metronome")]
#[command(version)]
struct Cli {
    /// YAML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Notes and triads of a scale
    Scale {
        root: String,
        #[arg(long, default_value = "Major")]
        scale: String,
    },

    /// Key signature, diatonic chords, secondary dominants and borrowed chords
    Key {
        root: String,
        #[arg(long)]
        minor: bool,
    },

    /// Chord tones, inversions and voicings
    Chord { name: String },

    /// Resolve roman numerals (or a named progression) in a key
    Progression {
        root: String,
        #[arg(long)]
        minor: bool,
        /// Catalog progression, e.g. "ii-V-I"
        #[arg(long)]
        name: Option<String>,
        numerals: Vec<String>,
    },

    /// Note names on every string of the configured tuning
    Fretboard {
        #[arg(long)]
        tuning: Option<String>,
        #[arg(long)]
        frets: Option<usize>,
    },

    /// CAGED box positions for a key
    Caged { root: String },

    /// Print (or with the `audio` feature, play) the click and drum schedule
    Metronome {
        #[arg(long)]
        bpm: Option<u32>,
        #[arg(long)]
        time_sig: Option<String>,
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long, default_value_t = 1)]
        measures: usize,
        /// Play through the default output device
        #[cfg(feature = "audio")]
        #[arg(long)]
        play: bool,
    },

    /// Preview a chord, or with --scale run up a scale, on the default output device
    #[cfg(feature = "audio")]
    Play {
        /// Chord name, or scale root with --scale
        name: String,
        #[arg(long)]
        scale: Option<String>,
    },

    /// Listen on the default input device and print readings
    #[cfg(feature = "audio")]
    Tuner {
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    let json = cli.json;

    match cli.command {
        Command::Scale { root, scale } => {
            let root = normalize_accidentals(&root);
            let report = describe_scale(&root, &scale)
                .ok_or_else(|| FretlabError::Config(format!("Unknown scale or root: {} {}", root, scale)))?;
            emit(json, &report, |r| {
                println!("{} {}: {}", r.root, r.scale, r.notes.join(" "));
                for triad in r.triads.iter().flatten() {
                    println!("  {:<5} {}", triad.numeral, triad.chord_name);
                }
            })
        }
        Command::Key { root, minor } => {
            let root = normalize_accidentals(&root);
            let report = describe_key(&root, minor)
                .ok_or_else(|| FretlabError::Config(format!("Unknown root: {}", root)))?;
            emit(json, &report, |r| {
                println!("Key of {}", r.key);
                if let Some(sig) = r.signature {
                    println!("  signature: {} (relative {})", sig.accidentals.join(" "), sig.relative_minor);
                }
                println!("  diatonic:  {}", r.diatonic_chords.join(" "));
                for sd in &r.secondary_dominants {
                    println!("  {:<8} {} -> {}", sd.symbol, sd.chord, sd.resolves_to);
                }
                for bc in &r.borrowed_chords {
                    println!("  {:<8} {} (from {})", bc.numeral, bc.chord, bc.source);
                }
            })
        }
        Command::Chord { name } => {
            let name = normalize_accidentals(&name);
            let tuning = settings.resolve_tuning();
            let report = describe_chord(&name, Some(&tuning))
                .ok_or_else(|| FretlabError::Config(format!("Unknown chord: {}", name)))?;
            emit(json, &report, |r| {
                println!("{} ({}): {}", r.name, r.tones.formula_name, r.tones.notes.join(" "));
                for inv in &r.inversions {
                    println!("  {:<15} {}", inv.inversion.label, inv.inversion.slash_notation);
                }
                if r.voicings_suppressed {
                    println!("  voicings need a standard-interval tuning ({} is not)", tuning.name);
                }
                for v in &r.voicings {
                    let frets: Vec<String> = v
                        .frets
                        .iter()
                        .map(|&f| if f < 0 { "x".to_string() } else { f.to_string() })
                        .collect();
                    println!("  {:<8} {:<12} bass {}", v.category.label(), frets.join(" "), v.bass_note);
                }
            })
        }
        Command::Progression { root, minor, name, numerals } => {
            let root = normalize_accidentals(&root);
            let numerals: Vec<String> = match name {
                Some(name) => {
                    let (_, progression) = find_progression(&name)
                        .ok_or_else(|| FretlabError::Config(format!("Unknown progression: {}", name)))?;
                    progression.chords.iter().map(|c| c.to_string()).collect()
                }
                None => numerals.iter().map(|n| normalize_accidentals(n)).collect(),
            };
            let chords = resolve_progression(&numerals, &root, minor);
            emit(json, &chords, |c| println!("{}", c.join(" ")))
        }
        Command::Fretboard { tuning, frets } => {
            let instrument = get_instrument(settings.instrument);
            let tuning = match tuning {
                Some(name) => instrument.find_tuning(&name).cloned().ok_or_else(|| {
                    FretlabError::UnknownTuning {
                        instrument: instrument.id.as_str().to_string(),
                        tuning: name,
                    }
                })?,
                None => settings.resolve_tuning(),
            };
            let board = build_fretboard_for_tuning(&tuning.notes, frets.unwrap_or(settings.frets));
            emit(json, &board, |b| {
                println!("{}", tuning.name);
                for row in b {
                    println!("  {}", row.iter().map(|n| format!("{:<3}", n)).collect::<String>());
                }
            })
        }
        Command::Caged { root } => {
            let root = normalize_accidentals(&root);
            let instrument = get_instrument(settings.instrument);
            let tuning = settings.resolve_tuning();
            let boxes = caged_boxes_for_tuning(&root, &instrument, &tuning, settings.frets);
            emit(json, &boxes, |b| match b {
                Some(boxes) => {
                    for cb in boxes {
                        println!("  {:?} shape: frets {}-{}", cb.shape, cb.low_fret, cb.high_fret);
                    }
                }
                None => println!("  CAGED boxes are unavailable for {} {}", instrument.label, tuning.name),
            })
        }
        #[cfg(feature = "audio")]
        Command::Metronome { bpm, time_sig, pattern, measures, play: true } => {
            let output = fretlab::backend::CpalOutput::open()?;
            let mut engine = MetronomeEngine::new(output);
            configure_metronome(&mut engine, &settings, bpm, time_sig, pattern)?;
            play_metronome(&mut engine, measures);
            Ok(())
        }
        Command::Metronome { bpm, time_sig, pattern, measures, .. } => {
            let mut engine = MetronomeEngine::new(RecordingOutput::new());
            configure_metronome(&mut engine, &settings, bpm, time_sig, pattern)?;
            let steps = schedule_offline(&mut engine, measures);
            emit(json, &steps, |s| {
                for step in s {
                    let drums: Vec<String> = step.drums.iter().map(|d| format!("{:?}", d)).collect();
                    let click = match (step.click, step.accent) {
                        (true, true) => "ACCENT",
                        (true, false) => "click",
                        _ => "",
                    };
                    println!("{:>8.3}s  step {:>2}  {:<6} {}", step.time, step.step, click, drums.join(" "));
                }
            })
        }
        #[cfg(feature = "audio")]
        Command::Play { name, scale } => play_preview(&normalize_accidentals(&name), scale.as_deref()),
        #[cfg(feature = "audio")]
        Command::Tuner { seconds } => run_tuner(seconds),
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value)
            .map_err(|e| FretlabError::Config(format!("serialization failed: {}", e)))?;
        println!("{}", out);
    } else {
        text(value);
    }
    Ok(())
}

fn configure_metronome<O: AudioOutput>(
    engine: &mut MetronomeEngine<O>,
    settings: &Settings,
    bpm: Option<u32>,
    time_sig: Option<String>,
    pattern: Option<String>,
) -> Result<()> {
    settings.metronome.apply(engine);
    if let Some(bpm) = bpm {
        engine.set_bpm(bpm);
    }
    if let Some(label) = time_sig {
        let ts = find_time_signature(&label)
            .ok_or_else(|| FretlabError::Config(format!("Unknown time signature: {}", label)))?;
        engine.set_time_signature(*ts);
    }
    if let Some(name) = pattern {
        let pattern = find_drum_pattern(&name)
            .ok_or_else(|| FretlabError::Config(format!("Unknown drum pattern: {}", name)))?;
        engine.set_drum_pattern(Some(pattern));
        engine.set_drums_enabled(true);
    }
    Ok(())
}

/// Run the scheduler against an offline clock until `measures` measures are scheduled.
fn schedule_offline(engine: &mut MetronomeEngine<RecordingOutput>, measures: usize) -> Vec<ScheduledStep> {
    let steps = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&steps);
    engine.on_step(move |s| sink.borrow_mut().push(s.clone()));

    let wanted = measures * engine.time_signature().steps_per_measure();
    engine.start();
    while steps.borrow().len() < wanted {
        engine.tick();
        engine.output_mut().advance(SCHEDULER_INTERVAL);
    }
    engine.stop();

    let mut steps = steps.take();
    steps.truncate(wanted);
    steps
}

#[cfg(feature = "audio")]
fn play_metronome<O: AudioOutput>(engine: &mut MetronomeEngine<O>, measures: usize) {
    use std::time::Duration;

    let ts = engine.time_signature();
    let seconds = measures as f64 * ts.steps_per_measure() as f64 * ts.step_duration(engine.bpm());
    engine.on_beat(|beat| println!("beat {}", beat + 1));
    engine.start();
    let end = engine.output().current_time() + seconds;
    while engine.output().current_time() < end {
        engine.tick();
        let wait = engine
            .next_notice_delay()
            .map_or(SCHEDULER_INTERVAL, |d| d.min(SCHEDULER_INTERVAL));
        std::thread::sleep(Duration::from_secs_f64(wait.max(0.001)));
    }
    engine.dispose();
}

#[cfg(feature = "audio")]
fn play_preview(name: &str, scale: Option<&str>) -> Result<()> {
    use std::time::Duration;

    use fretlab::audio::{Player, NOTE_DURATION};

    let mut player = Player::new(fretlab::backend::CpalOutput::open()?);
    match scale {
        Some(scale) => {
            let report = describe_scale(name, scale)
                .ok_or_else(|| FretlabError::Config(format!("Unknown scale or root: {} {}", name, scale)))?;
            player.play_scale(&report.notes);
            while player.is_playing_scale() {
                player.tick();
                std::thread::sleep(Duration::from_millis(10));
            }
        }
        None => {
            let tones = fretlab::chord::get_chord_tones(name)
                .ok_or_else(|| FretlabError::Config(format!("Unknown chord: {}", name)))?;
            player.play_chord(&tones.notes);
        }
    }
    std::thread::sleep(Duration::from_secs_f64(NOTE_DURATION));
    player.close();
    Ok(())
}

#[cfg(feature = "audio")]
fn run_tuner(seconds: f64) -> Result<()> {
    use std::time::{Duration, Instant};

    use fretlab::backend::CpalInputDevice;
    use fretlab::tuner::TunerEngine;

    let mut tuner = TunerEngine::new(Some(Box::new(CpalInputDevice)));
    tuner.on_result(|reading| match reading {
        Some(r) => println!("{:<4} {:>+4} cents  {:>8.2} Hz  clarity {:.2}", r.label(), r.cents, r.frequency, r.clarity),
        None => println!("--"),
    });
    tuner.start()?;

    let started = Instant::now();
    while started.elapsed().as_secs_f64() < seconds {
        tuner.detect();
        std::thread::sleep(Duration::from_millis(16));
    }
    tuner.dispose();
    Ok(())
}
