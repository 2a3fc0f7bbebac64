use mania_bmson::{
    ConvertConfig, ConvertError, TimingError, bmson::pulse::PulseNumber, convert_mania, to_json,
};
use pretty_assertions::assert_eq;

const FIXTURE: &str = include_str!("files/twilight_7k.osu");

fn minimal_chart(timing_points: &str, hit_objects: &str) -> String {
    format!(
        "osu file format v14\n\n[General]\nAudioFilename: song.mp3\nMode: 3\n\n[Difficulty]\nCircleSize: 7\n\n[TimingPoints]\n{timing_points}\n\n[HitObjects]\n{hit_objects}\n"
    )
}

#[test]
fn worked_example_bpm_120_note_at_one_second() {
    // 240 * 120 * 1000 / 60000 = 480.
    let source = minimal_chart("0,500,4,2,0,100,1,0", "256,192,1000,1,0,0:0:0:0:");
    let output = convert_mania(&source, &ConvertConfig::default()).expect("must convert");
    assert_eq!(output.bmson.sound_channels[0].notes[0].y, PulseNumber(480));
    assert_eq!(output.bmson.info.init_bpm.as_f64(), 120.0);
    assert!(output.warnings.is_empty());
}

#[test]
fn zero_timing_points_fail_with_timing_error() {
    let source = minimal_chart("", "256,192,1000,1,0,0:0:0:0:");
    assert_eq!(
        convert_mania(&source, &ConvertConfig::default()).err(),
        Some(ConvertError::Timing(TimingError::NoBpmBasis))
    );
}

#[test]
fn sv_point_adds_scroll_event_without_moving_notes() {
    let plain = minimal_chart("0,500,4,2,0,100,1,0", "256,192,1000,1,0,0:0:0:0:");
    let with_sv = minimal_chart(
        "0,500,4,2,0,100,1,0\n500,-50,4,2,0,100,0,0",
        "256,192,1000,1,0,0:0:0:0:",
    );
    let plain = convert_mania(&plain, &ConvertConfig::default()).expect("must convert");
    let with_sv = convert_mania(&with_sv, &ConvertConfig::default()).expect("must convert");

    assert_eq!(plain.bmson.bpm_events, with_sv.bmson.bpm_events);
    assert_eq!(plain.bmson.sound_channels, with_sv.bmson.sound_channels);
    assert_eq!(plain.bmson.scroll_events, vec![]);
    assert_eq!(with_sv.bmson.scroll_events.len(), 1);
    assert_eq!(with_sv.bmson.scroll_events[0].y, PulseNumber(240));
    assert_eq!(with_sv.bmson.scroll_events[0].rate.as_f64(), 2.0);
}

#[test]
fn hold_shorter_than_a_pulse_still_has_length_one() {
    let source = minimal_chart("0,500,4,2,0,100,1,0", "36,192,1000,128,0,1001:0:0:0:0:");
    let output = convert_mania(&source, &ConvertConfig::default()).expect("must convert");
    assert_eq!(output.bmson.sound_channels[0].notes[0].l, 1);
    assert_eq!(output.warnings.len(), 1);
}

#[test]
fn offset_composition_is_linear() {
    // Shifting the chart by o1 and converting with o2 equals converting with o1 + o2.
    let note_at = |time_ms: u32| minimal_chart("0,500,4,2,0,100,1,0", &format!("256,192,{time_ms},1,0,0:0:0:0:"));
    let convert = |source: &str, offset_ms: f64| {
        let config = ConvertConfig {
            offset_ms,
            ..ConvertConfig::default()
        };
        convert_mania(source, &config).expect("must convert").bmson.sound_channels[0].notes[0].y
    };

    let summed = convert(&note_at(1000), 250.0);
    let staged = convert(&note_at(1100), 150.0);
    let baked = convert(&note_at(1250), 0.0);
    assert_eq!(summed, staged);
    assert_eq!(summed, baked);
}

#[test]
fn offset_shifts_notes_but_not_the_audio_track() {
    let source = minimal_chart("0,500,4,2,0,100,1,0", "256,192,1000,1,0,0:0:0:0:");
    let config = ConvertConfig {
        offset_ms: 95.0,
        ..ConvertConfig::default()
    };
    let output = convert_mania(&source, &config).expect("must convert");

    // round(0.48 * 1095) = 526.
    assert_eq!(output.bmson.sound_channels[0].notes[0].y, PulseNumber(526));
    let audio = output.bmson.sound_channels.last().expect("audio channel");
    assert_eq!(audio.name, "song.mp3");
    assert_eq!(audio.notes[0].y, PulseNumber::ZERO);
    assert_eq!(audio.notes[0].x, None);
    assert!(audio.notes[0].c);
}

#[test]
fn emission_is_deterministic() {
    let first = convert_mania(FIXTURE, &ConvertConfig::default()).expect("must convert");
    let second = convert_mania(FIXTURE, &ConvertConfig::default()).expect("must convert");
    assert_eq!(first.bmson, second.bmson);
    assert_eq!(
        to_json(&first.bmson).expect("must serialize"),
        to_json(&second.bmson).expect("must serialize")
    );
}

#[test]
fn align_first_beat_pads_notes_and_audio_together() {
    let source = minimal_chart("1300,500,4,2,0,100,1,0", "256,192,1300,1,0,0:0:0:0:");
    let config = ConvertConfig {
        align_first_beat: true,
        ..ConvertConfig::default()
    };
    let output = convert_mania(&source, &config).expect("must convert");

    // The first BPM point is 200 ms short of a beat boundary, so everything shifts by 200 ms:
    // note at 1300 ms lands on round(0.48 * 1500) = 720, the audio start on round(0.48 * 200).
    assert_eq!(output.bmson.sound_channels[0].notes[0].y, PulseNumber(720));
    let audio = output.bmson.sound_channels.last().expect("audio channel");
    assert_eq!(audio.notes[0].y, PulseNumber(96));
}

#[test]
fn fixture_conversion_end_to_end() {
    let output = convert_mania(FIXTURE, &ConvertConfig::default()).expect("must convert");
    let bmson = &output.bmson;

    assert_eq!(bmson.info.title, "Twilight Starfall");
    assert_eq!(bmson.info.subtitle, "7K Hyper");
    assert_eq!(bmson.info.subartists, vec!["obj:mapper42".to_string()]);
    assert_eq!(bmson.info.mode_hint, "beat-7k");
    assert_eq!(bmson.info.resolution, 240);
    assert!((bmson.info.init_bpm.as_f64() - 130.0).abs() < 1e-9);
    assert_eq!(bmson.info.back_image.as_deref(), Some("bg.jpg"));
    assert_eq!(bmson.bga.bga_header.len(), 1);

    assert_eq!(bmson.bpm_events.len(), 2);
    assert_eq!(bmson.scroll_events.len(), 2);

    // Channels appear in order of first appearance: default, kick, snare, then the audio track.
    let names: Vec<_> = bmson
        .sound_channels
        .iter()
        .map(|channel| channel.name.as_str())
        .collect();
    assert_eq!(names, vec!["", "kick.wav", "snare.wav", "audio.mp3"]);

    // The 1 ms hold in the fixture collapses below one pulse and is clamped.
    assert_eq!(output.warnings.len(), 1);

    // Notes in every channel are sorted by pulse.
    for channel in &bmson.sound_channels {
        assert!(channel.notes.windows(2).all(|pair| pair[0].y <= pair[1].y));
    }

    // Bar lines every 4 quarter notes, strictly before the last note.
    let lines = bmson.lines.as_ref().expect("lines emitted");
    assert!(!lines.is_empty());
    assert!(lines.windows(2).all(|pair| pair[1].y.0 - pair[0].y.0 == 960));
}
