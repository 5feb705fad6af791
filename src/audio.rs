use anyhow::{Context, Result};
use fundsp::prelude32::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

const SAMPLE_RATE: u32 = 44_100;

// ── Sounds ──────────────────────────────────────────────────────────────────

/// Bass line the music loop walks through, as MIDI notes.
const BASS_LINE: [f32; 8] = [45.0, 52.0, 57.0, 52.0, 48.0, 55.0, 60.0, 55.0];
const NOTES_PER_SECOND: f32 = 4.0;

fn render(mut unit: impl AudioUnit, seconds: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    unit.reset();
    let len = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..len).map(|_| unit.get_mono()).collect()
}

/// One pass of the bass line; it is exactly one loop long so it can repeat
/// without a seam.
fn music_loop() -> Vec<f32> {
    let note = |t: f32| (t * NOTES_PER_SECOND) as usize % BASS_LINE.len();
    let freq = lfo(move |t: f32| midi_hz(BASS_LINE[note(t)]));
    // plucky decay on every note
    let gain = lfo(|t: f32| 0.08 * (1.0 - (t * NOTES_PER_SECOND).fract()));
    let sound = (freq >> triangle()) * gain;
    render(sound, BASS_LINE.len() as f32 / NOTES_PER_SECOND)
}

/// Falling saw: 400Hz to 80Hz over 0.4s, fading out over 0.5s.
fn death_sting() -> Vec<f32> {
    let freq = lfo(|t: f32| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
    let sound = (freq >> saw()) * gain;
    render(sound, 0.5)
}

// ── Output ──────────────────────────────────────────────────────────────────

/// Music and sound effects on the default output device.
pub struct Audio {
    // Dropping the stream silences every sink.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Sink,
    music_track: SamplesBuffer<f32>,
    death: SamplesBuffer<f32>,
}

impl Audio {
    pub fn open() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("no audio output device")?;
        let music = Sink::try_new(&handle).context("could not open music sink")?;
        Ok(Self {
            _stream: stream,
            handle,
            music,
            music_track: SamplesBuffer::new(1, SAMPLE_RATE, music_loop()),
            death: SamplesBuffer::new(1, SAMPLE_RATE, death_sting()),
        })
    }

    /// Start the loop from the top.
    pub fn play_music(&self) {
        self.music.clear();
        self.music.append(self.music_track.clone().repeat_infinite());
        self.music.play();
    }

    pub fn stop_music(&self) {
        self.music.clear();
    }

    pub fn play_death(&self) {
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(self.death.clone());
                sink.detach(); // Play in background
            }
            Err(err) => log::warn!("death sound skipped: {err}"),
        }
    }
}
