use std::thread::sleep;
use std::time::Duration;

use cuetone::nodes::{RtrbSink, Waveform};
use cuetone::{
    Cue, CueDispatcher, CuePlayer, CueRecipe, CueSink, CueStep, Engine, PlaybackClock,
    PlayerConfig, Sequencer, SynthHost, ToneSpec,
};
use rtrb::{Consumer, RingBuffer};

const RATE: u32 = 48_000;

fn mono_engine() -> (Engine, Consumer<f32>) {
    let (producer, consumer) = RingBuffer::new(1 << 17);
    let engine = Engine::with_layout(RATE, 1).with_output(RtrbSink::mono(producer));
    (engine, consumer)
}

fn render_until(sequencer: &mut Sequencer<Engine>, seconds: f64) {
    while sequencer.host().current_time() < seconds {
        sequencer.run_due();
        sequencer.host_mut().process();
    }
}

fn drain(consumer: &mut Consumer<f32>) -> Vec<f32> {
    let mut out = Vec::new();
    while let Ok(s) = consumer.pop() {
        out.push(s);
    }
    out
}

static SQUARE_300MS: CueRecipe = CueRecipe {
    name: "square",
    steps: &[CueStep {
        tone: ToneSpec::fixed(1_000.0, 0.3, Waveform::Square),
        delay: Duration::from_millis(0),
    }],
};

#[test]
fn rendered_envelope_decays_from_peak_to_floor() {
    let (engine, mut consumer) = mono_engine();
    let mut sequencer = Sequencer::new(engine);
    sequencer.play_sequence(&SQUARE_300MS).unwrap();
    render_until(&mut sequencer, 0.4);

    let samples = drain(&mut consumer);
    let end = (0.3 * RATE as f64) as usize;
    assert!(samples.len() > end + 64);

    // A full-scale square wave exposes the gain directly
    let env: Vec<f32> = samples.iter().map(|s| s.abs()).collect();

    assert!((env[0] - 0.2).abs() < 1e-6, "starts at {}", env[0]);
    assert!((env[end / 2] as f64 - (0.2f64 * 0.01).sqrt()).abs() < 1e-5);
    assert!((env[end - 1] - 0.01).abs() < 1e-4, "ends at {}", env[end - 1]);

    for (i, pair) in env[..end].windows(2).enumerate() {
        assert!(pair[1] <= pair[0] + 1e-7, "envelope rose at sample {}", i + 1);
    }
    assert!(env[end..].iter().all(|&s| s == 0.0), "sound after stop");
}

#[test]
fn stopped_tones_are_removed_from_the_graph() {
    let (engine, _consumer) = mono_engine();
    let baseline = engine.node_count();
    let mut sequencer = Sequencer::new(engine);

    sequencer.play_sequence(Cue::Login.recipe()).unwrap();
    render_until(&mut sequencer, 0.25);
    assert_eq!(sequencer.host().voice_count(), 3);
    assert_eq!(sequencer.host().node_count(), baseline + 6);

    render_until(&mut sequencer, 0.6);
    assert_eq!(sequencer.host().voice_count(), 0);
    assert_eq!(sequencer.host().node_count(), baseline);
}

fn rising_zero_crossings(samples: &[f32]) -> usize {
    samples.windows(2).filter(|w| w[0] <= 0.0 && w[1] > 0.0).count()
}

#[test]
fn logout_pitch_falls_over_the_tone() {
    let (engine, mut consumer) = mono_engine();
    let mut cues = CueDispatcher::new(Sequencer::new(engine));
    cues.play(Cue::Logout).unwrap();
    render_until(cues.sink_mut(), 0.55);

    let samples = drain(&mut consumer);
    let window = RATE as usize / 10;
    let first = rising_zero_crossings(&samples[..window]);
    let last = rising_zero_crossings(&samples[4 * window..5 * window]);

    // ~41 cycles at the top of the glide, ~14 at the bottom
    assert!((38..=44).contains(&first), "first window had {} cycles", first);
    assert!((12..=16).contains(&last), "last window had {} cycles", last);
}

#[test]
fn player_renders_cues_on_its_own_thread() {
    let (engine, mut consumer) = mono_engine();
    let config = PlayerConfig::default().with_command_queue_size(8);
    let mut player = CuePlayer::spawn(engine, &config).unwrap();

    player.submit(Cue::Login.recipe()).unwrap();
    sleep(Duration::from_millis(1_000));

    let engine = player.shutdown().unwrap();
    assert!(engine.current_time() > 0.5);
    assert_eq!(engine.voice_count(), 0);

    let samples = drain(&mut consumer);
    let loud = samples.iter().filter(|s| s.abs() > 0.05).count();
    assert!(loud > 1_000, "only {} audible samples", loud);
}

#[test]
fn player_stays_lead_time_ahead_of_the_device() {
    let (engine, _consumer) = mono_engine();
    let played = PlaybackClock::new(1);
    let config = PlayerConfig::default().with_lead_time(Duration::from_millis(20));

    // The device has played nothing: render only the lead
    let player = CuePlayer::spawn(engine.with_playback_clock(played.clone()), &config).unwrap();
    sleep(Duration::from_millis(200));
    let engine = player.shutdown().unwrap();
    let block = 64.0 / RATE as f64;
    assert!(engine.current_time() < 0.02 + 2.0 * block, "ran ahead to {}", engine.current_time());

    // Half a second played: catch up to it plus the lead, no further
    played.advance(RATE as usize / 2);
    let player = CuePlayer::spawn(engine, &config).unwrap();
    sleep(Duration::from_millis(200));
    let engine = player.shutdown().unwrap();
    assert!(engine.current_time() > 0.519, "stalled at {}", engine.current_time());
    assert!(engine.current_time() < 0.52 + 2.0 * block, "ran ahead to {}", engine.current_time());
}
