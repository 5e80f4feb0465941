//! Aspirin Synthesis CLI - Run a scripted lab walkthrough headlessly.

use std::time::{Duration, Instant};

use aspirin_synthesis::{
    compute::SynthesisSession,
    scene::TextPresenter,
    schema::{LabScript, SynthesisConfig},
};

/// Frame interval of the simulated display.
const FRAME: Duration = Duration::from_millis(16);

/// Upper bound on frames spent waiting for effects to settle after the script.
const MAX_SETTLE_FRAMES: u32 = 1_000;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: {} [config.json] [script.json]", args[0]);
        eprintln!();
        eprintln!("Run the aspirin synthesis lab with a scripted walkthrough.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Lab configuration (default: built-in)");
        eprintln!("  script.json  Walkthrough script (default: the correct procedure)");
        eprintln!();
        eprintln!("Example files are printed with the --example flag.");
        std::process::exit(1);
    }

    if args.get(1).is_some_and(|a| a == "--example") {
        print_example_config();
        return;
    }

    let config = match args.get(1) {
        Some(path) => SynthesisConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }),
        None => SynthesisConfig::default(),
    };

    let script = match args.get(2) {
        Some(path) => LabScript::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading script: {}", e);
            std::process::exit(1);
        }),
        None => LabScript::default(),
    };

    println!("Aspirin Synthesis Lab");
    println!("=====================");
    println!(
        "Canvas: {}x{}",
        config.canvas.width, config.canvas.height
    );
    println!("Script: {} actions", script.steps.len());
    println!(
        "Simulated time: {:.1}s",
        script.total_duration().as_secs_f32()
    );
    println!();

    let mut session = SynthesisSession::new(config);
    let mut presenter = TextPresenter::new();
    let start = Instant::now();
    let mut rejected = 0usize;

    session.render(&mut presenter);
    flush(&mut presenter);

    for step in &script.steps {
        println!("> {:?}", step.action);
        if session.handle(&step.action).is_err() {
            rejected += 1;
        }
        session.render(&mut presenter);
        flush(&mut presenter);

        let mut waited = Duration::ZERO;
        while waited < step.wait() {
            let dt = FRAME.min(step.wait() - waited);
            session.advance(dt);
            waited += dt;
            session.render(&mut presenter);
            flush(&mut presenter);
        }
    }

    // Let running effects and toasts play out
    let mut settle = 0;
    while !session.is_idle() && settle < MAX_SETTLE_FRAMES {
        session.advance(FRAME);
        session.render(&mut presenter);
        flush(&mut presenter);
        settle += 1;
    }

    let elapsed = start.elapsed();
    let controller = session.controller();

    println!();
    println!("Final state:");
    println!("  Step: {}", controller.step());
    println!(
        "  Reagents: {}",
        controller
            .reagents()
            .iter()
            .map(|r| r.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Reaction complete: {}", controller.is_complete());
    println!("  Rejected actions: {}", rejected);
    println!("  Peak particles: {}", presenter.peak_particles());
    println!(
        "Frames: {} in {:.3}s wall time",
        presenter.frames(),
        elapsed.as_secs_f32()
    );

    if !session.is_finished() {
        std::process::exit(2);
    }
}

fn flush(presenter: &mut TextPresenter) {
    for line in presenter.take_lines() {
        println!("{line}");
    }
}

fn print_example_config() {
    let config = SynthesisConfig::default();
    let script = LabScript::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
    println!();
    println!("Example script (script.json):");
    println!("{}", serde_json::to_string_pretty(&script).unwrap());
}
