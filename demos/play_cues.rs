//! Play every cue once on a chosen output device, then through the global facade
//!
//! Run with: cargo run --example play_cues --features cpal_sink
//!
//! Each tone is logged at trace level as it fires.

use std::io::{self, Write};
use std::thread::sleep;
use std::time::Duration;

use cuetone::{Cue, CueDispatcher, CuePlayer, CpalDevice, Engine, PlayerConfig};

fn main() -> cuetone::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let devices = CpalDevice::list_outputs();
    if devices.is_empty() {
        eprintln!("No audio output devices found!");
        return Ok(());
    }

    println!("Available audio output devices:");
    for (i, device) in devices.iter().enumerate() {
        println!(
            "  [{}] {} ({}Hz, {} ch)",
            i,
            device.name(),
            device.sample_rate(),
            device.channels()
        );
    }

    print!("\nSelect device [0]: ");
    io::stdout().flush().unwrap();

    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    let choice: usize = input.trim().parse().unwrap_or(0);
    let device = devices.into_iter().nth(choice).unwrap_or_else(|| {
        println!("Invalid choice, using default device");
        CpalDevice::default_output().expect("No default device")
    });

    println!("\nUsing: {} @ {}Hz", device.name(), device.sample_rate());

    let engine = Engine::with_layout(device.sample_rate(), device.channels() as usize)
        .with_output(device.create_sink()?);
    let mut cues = CueDispatcher::new(CuePlayer::spawn(engine, &PlayerConfig::default())?);

    for cue in Cue::ALL {
        println!("Playing {} ({:.2}s)", cue, cue.recipe().span().as_secs_f64());
        cues.play(cue)?;
        sleep(cue.recipe().span() + Duration::from_millis(600));
    }

    println!("Muted, this keypress should be silent");
    cues.toggle();
    cues.play(Cue::Keypress)?;
    sleep(Duration::from_millis(500));

    let engine = cues.into_sink().shutdown()?;
    println!("Rendered {:.2}s of audio", cuetone::SynthHost::current_time(&engine));

    println!("\nNow through the global facade");
    cuetone::play_sound(Cue::Login);
    sleep(Duration::from_secs(1));
    cuetone::play_sound_named("diskRead")?;
    sleep(Duration::from_secs(2));

    Ok(())
}
